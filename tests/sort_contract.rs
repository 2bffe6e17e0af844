//! Contract tests for the field-selectable sort and the cell normalization
//! rules every record goes through.

use bdstock_core::normalize::{to_float, to_integer, to_percent};
use bdstock_core::{
    is_valid_category, sort_records, sorted, CseShare, DsePriceChange, DseShare, SortError,
    SortField, SortOrder, SortRequest, Sortable,
};

fn dse_share(id: i32, code: &str, ltp: f64, volume: i64) -> DseShare {
    DseShare {
        id,
        trading_code: code.to_owned(),
        ltp,
        high: ltp + 1.0,
        low: ltp - 1.0,
        close_price: ltp,
        ycp: ltp,
        change: 0.0,
        trade: volume / 100,
        value_in_mn: ltp * volume as f64 / 1_000_000.0,
        volume,
    }
}

fn market() -> Vec<DseShare> {
    vec![
        dse_share(1, "ACI", 240.1, 187_553),
        dse_share(2, "BATBC", 518.7, 256_101),
        dse_share(3, "GP", f64::NAN, 210_400),
        dse_share(4, "BRACBANK", 37.9, 187_553),
        dse_share(5, "AAMRANET", 52.3, 9_000),
    ]
}

fn dse_codes(records: &[DseShare]) -> Vec<String> {
    records
        .iter()
        .map(|share| share.trading_code.clone())
        .collect()
}

// =============================================================================
// Ordering properties
// =============================================================================

#[test]
fn sorting_twice_gives_the_same_result() {
    for field in SortField::ALL {
        if DseShare::accessor(field).is_none() {
            continue;
        }
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            let once = sorted(market(), SortRequest::new(field, order)).expect("sort");
            let twice = sorted(once.clone(), SortRequest::new(field, order)).expect("sort");
            assert_eq!(dse_codes(&once), dse_codes(&twice), "{field} {order}");
        }
    }
}

#[test]
fn descending_reverses_ascending_when_keys_are_distinct() {
    for field in [SortField::Ltp, SortField::High, SortField::Low] {
        let ascending = sorted(market(), SortRequest::new(field, SortOrder::Ascending))
            .expect("ascending");
        let mut descending = sorted(market(), SortRequest::new(field, SortOrder::Descending))
            .expect("descending");
        descending.reverse();
        assert_eq!(dse_codes(&ascending), dse_codes(&descending), "{field}");
    }
}

#[test]
fn equal_keys_keep_their_input_order() {
    let by_volume = sorted(
        market(),
        SortRequest::new(SortField::Volume, SortOrder::Descending),
    )
    .expect("sort");

    assert_eq!(
        dse_codes(&by_volume),
        ["BATBC", "GP", "ACI", "BRACBANK", "AAMRANET"]
    );
}

#[test]
fn ascending_trading_code_returns_input_order() {
    let input = market();
    let output = sorted(
        input.clone(),
        SortRequest::new(SortField::TradingCode, SortOrder::Ascending),
    )
    .expect("sort");

    assert_eq!(dse_codes(&output), dse_codes(&input));
}

#[test]
fn descending_trading_code_is_reverse_lexicographic() {
    let output = sorted(
        market(),
        SortRequest::new(SortField::TradingCode, SortOrder::Descending),
    )
    .expect("sort");

    assert_eq!(
        dse_codes(&output),
        ["GP", "BRACBANK", "BATBC", "ACI", "AAMRANET"]
    );
}

#[test]
fn missing_prices_sort_last_ascending() {
    let output = sorted(market(), SortRequest::new(SortField::Ltp, SortOrder::Ascending))
        .expect("sort");

    assert_eq!(
        dse_codes(&output),
        ["BRACBANK", "AAMRANET", "ACI", "BATBC", "GP"]
    );
}

#[test]
fn empty_collections_sort_to_empty() {
    for field in SortField::ALL {
        let mut empty: Vec<CseShare> = Vec::new();
        let outcome = sort_records(&mut empty, field, SortOrder::Descending);
        assert_eq!(outcome.is_ok(), CseShare::accessor(field).is_some());
        assert!(empty.is_empty());
    }
}

// =============================================================================
// Rejected requests
// =============================================================================

#[test]
fn unsupported_field_leaves_the_collection_untouched() {
    let mut shares = market();
    let before = dse_codes(&shares);

    let err = sort_records(
        &mut shares,
        SortField::OpeningPrice,
        SortOrder::Descending,
    )
    .expect_err("DSE tables have no opening price");

    assert!(matches!(
        err,
        SortError::UnsupportedField { record: "DseShare", .. }
    ));
    assert_eq!(dse_codes(&shares), before);
}

#[test]
fn each_record_shape_declares_its_own_fields() {
    assert!(DseShare::accessor(SortField::PriceChange).is_some());
    assert!(DseShare::accessor(SortField::PercentageChange).is_none());
    assert!(DsePriceChange::accessor(SortField::PercentageChange).is_some());
    assert!(DsePriceChange::accessor(SortField::PriceChange).is_none());
    assert!(CseShare::accessor(SortField::OpeningPrice).is_some());
    assert!(CseShare::accessor(SortField::PercentageChange).is_none());
}

#[test]
fn invalid_order_is_reported_before_an_invalid_field() {
    let err = SortRequest::parse("not-a-field", "sideways").expect_err("must fail");
    assert!(matches!(err, SortError::InvalidOrder { .. }));

    let err = SortRequest::parse("not-a-field", "desc").expect_err("must fail");
    assert!(matches!(err, SortError::UnsupportedField { .. }));
}

#[test]
fn caller_input_is_case_and_separator_insensitive() {
    let request = SortRequest::parse("Number-Of-Trades", "DESC").expect("valid");
    assert_eq!(
        request,
        SortRequest::new(SortField::NumberOfTrades, SortOrder::Descending)
    );
    assert_eq!(SortOrder::try_from(1u8), Ok(SortOrder::Descending));
    assert!(SortOrder::try_from(2u8).is_err());
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn float_cells_follow_the_published_formats() {
    assert_eq!(to_float("20,000.78"), Ok(20000.78));
    assert_eq!(to_float(" 1,234 "), Ok(1234.0));
    assert!(to_float("--").expect("sentinel").is_nan());
    assert!(to_float("N/A").expect("sentinel").is_nan());
    assert!(to_float("abc").is_err());
    assert!(to_float("").is_err());
}

#[test]
fn integer_cells_drop_separators_and_spaces() {
    assert_eq!(to_integer("1 234"), Ok(1234));
    assert_eq!(to_integer("50,000"), Ok(50000));
    assert!(to_integer("--").is_err());
    assert!(to_integer("12.5").is_err());
}

#[test]
fn percent_cells_accept_a_trailing_sign() {
    assert_eq!(to_percent("4.39%"), Ok(4.39));
    assert_eq!(to_percent("-0.11 %"), Ok(-0.11));
}

#[test]
fn only_published_categories_are_valid() {
    for code in ["A", "B", "G", "N", "Z", "a", " z "] {
        assert!(is_valid_category(code), "{code}");
    }
    for code in ["", "C", "ABAA", "A&B", "1"] {
        assert!(!is_valid_category(code), "{code}");
    }
}
