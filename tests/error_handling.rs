//! Failure behavior: what callers see when input is rejected or an exchange
//! misbehaves. No operation retries and no partial results leak out.

use bdstock_core::{
    Envelope, EnvelopeError, EnvelopeMeta, ExchangeError, ExchangeErrorKind, ExchangeId,
    HttpError, MappingError, NormalizeError, SortField, SortOrder, ValidationError,
};
use bdstock_tests::{cse, dse, dse_price_page, RecordingHttpClient};

// =============================================================================
// Rejected input never reaches the network
// =============================================================================

#[tokio::test]
async fn invalid_category_is_rejected_before_any_request() {
    let client = RecordingHttpClient::html(&dse_price_page(&[]));
    let adapter = dse(&client);

    for code in ["C", "A&group=B", ""] {
        let err = adapter
            .get_latest_prices_by_category(code, SortField::TradingCode, SortOrder::Ascending)
            .await
            .expect_err("must fail");

        assert!(matches!(
            err,
            ExchangeError::Validation(ValidationError::InvalidGroupName { .. })
        ));
        assert!(err.is_caller_error());
    }

    assert!(client.requests().is_empty(), "no request may be sent");
}

#[tokio::test]
async fn unsupported_sort_field_is_a_caller_error() {
    let row = [
        "1", "ACI", "240.10", "243.00", "238.50", "240.00", "239.20", "0.90", "1,204", "45.1",
        "187,553",
    ];
    let client = RecordingHttpClient::html(&dse_price_page(&[row]));
    let adapter = dse(&client);

    let err = adapter
        .get_latest_prices(SortField::OpeningPrice, SortOrder::Ascending)
        .await
        .expect_err("DSE has no opening price");

    assert_eq!(err.kind(), ExchangeErrorKind::Sort);
    assert_eq!(err.code(), "exchange.sort");
    assert!(err.is_caller_error());
}

// =============================================================================
// Exchange failures
// =============================================================================

#[tokio::test]
async fn non_success_status_is_reported_with_the_url() {
    let client = RecordingHttpClient::status(503);
    let adapter = cse(&client);

    let err = adapter.get_market_summary().await.expect_err("must fail");

    assert_eq!(
        err,
        ExchangeError::Status {
            status: 503,
            url: String::from("https://cse.test/market/historical_market"),
        }
    );
    assert!(!err.is_caller_error());
    assert_eq!(client.requests().len(), 1, "no retry");
}

#[tokio::test]
async fn transport_timeouts_are_flagged() {
    let client = RecordingHttpClient::failing(HttpError::Timeout { timeout_ms: 2_500 });
    let adapter = dse(&client);

    let err = adapter.get_market_status().await.expect_err("must fail");

    match err {
        ExchangeError::Transport { url, source } => {
            assert_eq!(url, "https://dse.test/");
            assert!(source.is_timeout());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_table_is_a_structure_error() {
    let client = RecordingHttpClient::html("<html><body><div>No data</div></body></html>");
    let adapter = dse(&client);

    let err = adapter
        .get_latest_prices(SortField::TradingCode, SortOrder::Ascending)
        .await
        .expect_err("must fail");

    assert_eq!(
        err,
        ExchangeError::Structure {
            selector: String::from("table tr"),
        }
    );
}

#[tokio::test]
async fn one_bad_cell_aborts_the_whole_table() {
    let good = [
        "1", "ACI", "240.10", "243.00", "238.50", "240.00", "239.20", "0.90", "1,204", "45.1",
        "187,553",
    ];
    let bad = [
        "2", "GP", "two hundred", "286.00", "284.00", "285.10", "285.30", "-0.20", "850",
        "60.02", "210,400",
    ];
    let client = RecordingHttpClient::html(&dse_price_page(&[good, bad]));
    let adapter = dse(&client);

    let err = adapter
        .get_latest_prices(SortField::TradingCode, SortOrder::Ascending)
        .await
        .expect_err("no partial result");

    match err {
        ExchangeError::Mapping(MappingError::InvalidCell {
            row,
            column,
            source,
            ..
        }) => {
            assert_eq!(row, 3, "header is row 1");
            assert_eq!(column, "ltp");
            assert_eq!(
                source,
                NormalizeError::InvalidFloat {
                    value: String::from("two hundred"),
                }
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn short_rows_report_the_missing_column() {
    let client = RecordingHttpClient::html(
        "<table><tr><th>#</th><th>CODE</th></tr><tr><td>1</td><td>ACI</td></tr></table>",
    );
    let adapter = dse(&client);

    let err = adapter
        .get_latest_prices(SortField::TradingCode, SortOrder::Ascending)
        .await
        .expect_err("must fail");

    assert!(matches!(
        err,
        ExchangeError::Mapping(MappingError::MissingCell {
            row: 2,
            column: "ltp",
            len: 2,
            ..
        })
    ));
}

// =============================================================================
// Envelope
// =============================================================================

#[test]
fn exchange_errors_fit_into_the_envelope() {
    let err = ExchangeError::Structure {
        selector: String::from("#dataTable tbody tr"),
    };
    let meta = EnvelopeMeta::new("req-00000001", Some(ExchangeId::Cse), 12).expect("meta");
    let envelope_error = EnvelopeError::from_exchange(ExchangeId::Cse, &err);

    let envelope = Envelope::with_errors(meta, (), vec![envelope_error]).expect("envelope");

    assert!(envelope.has_errors());
    assert_eq!(envelope.errors[0].code, "exchange.structure");
    assert!(envelope.errors[0].message.contains("#dataTable tbody tr"));
}

#[test]
fn blank_envelope_errors_are_rejected() {
    assert_eq!(
        EnvelopeError::new("", "boom").expect_err("must fail"),
        ValidationError::EmptyErrorCode
    );
    assert_eq!(
        EnvelopeError::new("exchange.status", "  ").expect_err("must fail"),
        ValidationError::EmptyErrorMessage
    );
    assert!(EnvelopeMeta::new("", None, 0).is_err());
}
