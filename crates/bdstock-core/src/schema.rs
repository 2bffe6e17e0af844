//! Positional column schemas and the row mapper.
//!
//! Exchange tables carry no machine-readable headers, so each record shape
//! declares the column layout of its source page as a list of [`Column`]s.
//! The layout is part of the page contract; a reordered page produces wrong
//! values rather than an error.

use crate::error::MappingError;
use crate::normalize;

/// Value type a column is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    WideInteger,
    Float,
    Percent,
}

impl ColumnKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::WideInteger => "wide_integer",
            Self::Float => "float",
            Self::Percent => "percent",
        }
    }
}

/// One named position in a source table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub index: usize,
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn text(index: usize, name: &'static str) -> Self {
        Self {
            index,
            name,
            kind: ColumnKind::Text,
        }
    }

    pub const fn integer(index: usize, name: &'static str) -> Self {
        Self {
            index,
            name,
            kind: ColumnKind::Integer,
        }
    }

    pub const fn wide_integer(index: usize, name: &'static str) -> Self {
        Self {
            index,
            name,
            kind: ColumnKind::WideInteger,
        }
    }

    pub const fn float(index: usize, name: &'static str) -> Self {
        Self {
            index,
            name,
            kind: ColumnKind::Float,
        }
    }

    pub const fn percent(index: usize, name: &'static str) -> Self {
        Self {
            index,
            name,
            kind: ColumnKind::Percent,
        }
    }
}

/// Record shapes that can be built from one table row.
pub trait FromRow: Sized {
    /// Column layout of the source table.
    const COLUMNS: &'static [Column];

    fn from_row(row: &RowReader<'_>) -> Result<Self, MappingError>;
}

/// Typed, column-checked view over the raw cells of a single row.
///
/// Errors carry row `0`; the assembler fills in the real row number.
#[derive(Debug, Clone, Copy)]
pub struct RowReader<'a> {
    cells: &'a [String],
}

impl<'a> RowReader<'a> {
    pub fn new(cells: &'a [String]) -> Self {
        Self { cells }
    }

    fn cell(&self, column: Column) -> Result<&'a str, MappingError> {
        self.cells
            .get(column.index)
            .map(String::as_str)
            .ok_or(MappingError::MissingCell {
                row: 0,
                column: column.name,
                index: column.index,
                len: self.cells.len(),
            })
    }

    /// Trimmed text with internal whitespace collapsed.
    pub fn text(&self, column: Column) -> Result<String, MappingError> {
        self.cell(column).map(normalize::clean_text)
    }

    pub fn integer(&self, column: Column) -> Result<i32, MappingError> {
        let raw = self.cell(column)?;
        normalize::to_integer(raw).map_err(|source| invalid(column, source))
    }

    pub fn wide_integer(&self, column: Column) -> Result<i64, MappingError> {
        let raw = self.cell(column)?;
        normalize::to_wide_integer(raw).map_err(|source| invalid(column, source))
    }

    pub fn float(&self, column: Column) -> Result<f64, MappingError> {
        let raw = self.cell(column)?;
        normalize::to_float(raw).map_err(|source| invalid(column, source))
    }

    pub fn percent(&self, column: Column) -> Result<f64, MappingError> {
        let raw = self.cell(column)?;
        normalize::to_percent(raw).map_err(|source| invalid(column, source))
    }
}

fn invalid(column: Column, source: crate::error::NormalizeError) -> MappingError {
    MappingError::InvalidCell {
        row: 0,
        column: column.name,
        index: column.index,
        source,
    }
}

/// Maps a single row of cells into `R`.
pub fn map_row<R: FromRow>(cells: &[String]) -> Result<R, MappingError> {
    R::from_row(&RowReader::new(cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;

    const CODE: Column = Column::text(1, "trading_code");
    const PRICE: Column = Column::float(2, "ltp");
    const TRADES: Column = Column::wide_integer(3, "trade");

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn reads_typed_columns_by_position() {
        let row = cells(&["1", "  GP  ", "1,250.50", "3,400"]);
        let reader = RowReader::new(&row);

        assert_eq!(reader.text(CODE).expect("text"), "GP");
        assert_eq!(reader.float(PRICE).expect("float"), 1250.5);
        assert_eq!(reader.wide_integer(TRADES).expect("int"), 3400);
    }

    #[test]
    fn missing_cell_names_the_column() {
        let row = cells(&["1", "GP"]);
        let err = RowReader::new(&row).float(PRICE).expect_err("must fail");
        assert_eq!(
            err,
            MappingError::MissingCell {
                row: 0,
                column: "ltp",
                index: 2,
                len: 2,
            }
        );
    }

    #[test]
    fn malformed_cell_wraps_normalizer_error() {
        let row = cells(&["1", "GP", "n/a"]);
        let err = RowReader::new(&row).float(PRICE).expect_err("must fail");
        match err {
            MappingError::InvalidCell { column, source, .. } => {
                assert_eq!(column, "ltp");
                assert!(matches!(source, NormalizeError::InvalidFloat { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
