//! Turns extracted rows into record collections.

use crate::error::MappingError;
use crate::schema::{map_row, FromRow};

/// Maps every row after the header row, in order.
///
/// The first failing row aborts the whole collection; its error carries the
/// 1-based position of the row on the page.
pub fn assemble<R, I>(rows: I) -> Result<Vec<R>, MappingError>
where
    R: FromRow,
    I: IntoIterator<Item = Vec<String>>,
{
    map_rows(rows.into_iter().enumerate().skip(1))
}

/// Maps every row, for selections that already exclude the header.
pub fn assemble_all<R, I>(rows: I) -> Result<Vec<R>, MappingError>
where
    R: FromRow,
    I: IntoIterator<Item = Vec<String>>,
{
    map_rows(rows.into_iter().enumerate())
}

fn map_rows<R, I>(rows: I) -> Result<Vec<R>, MappingError>
where
    R: FromRow,
    I: Iterator<Item = (usize, Vec<String>)>,
{
    let records = rows
        .map(|(position, cells)| map_row::<R>(&cells).map_err(|error| error.at_row(position + 1)))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(records = records.len(), "assembled records");
    Ok(records)
}
