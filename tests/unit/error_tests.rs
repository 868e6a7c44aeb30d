// Error handling tests

use dragonfly_imgproxy::error::{ErrorStatusMode, ProxyError};
use rstest::rstest;

#[rstest]
#[case(ProxyError::Extraction, "Failed to extract base64 string from URL")]
#[case(ProxyError::MissingSignature, "Failed to get sha from query string")]
#[case(ProxyError::SignatureMismatch, "SHA validate failed")]
#[case(ProxyError::size_spec("abc"), "Failed to parse thumb size spec 'abc'")]
#[case(
    ProxyError::Config("DragonflySecret required".to_string()),
    "Configuration error: DragonflySecret required"
)]
fn test_error_messages_name_the_failure(#[case] err: ProxyError, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[test]
fn test_extraction_and_missing_signature_are_distinct() {
    assert_ne!(ProxyError::Extraction, ProxyError::MissingSignature);
    assert_eq!(ProxyError::Extraction.stage(), "pattern_matcher");
    assert_eq!(ProxyError::MissingSignature.stage(), "pattern_matcher");
}

#[test]
fn test_legacy_mode_is_the_default() {
    assert_eq!(ErrorStatusMode::default(), ErrorStatusMode::Legacy);
    for err in [
        ProxyError::Extraction,
        ProxyError::decode("x"),
        ProxyError::SignatureMismatch,
    ] {
        assert_eq!(err.to_http_status(ErrorStatusMode::default()), 500);
    }
}

#[test]
fn test_errors_convert_into_anyhow() {
    fn fails() -> anyhow::Result<()> {
        Err(ProxyError::SignatureMismatch)?
    }
    let err = fails().unwrap_err();
    assert_eq!(err.to_string(), "SHA validate failed");
    assert_eq!(
        err.downcast_ref::<ProxyError>(),
        Some(&ProxyError::SignatureMismatch)
    );
}
