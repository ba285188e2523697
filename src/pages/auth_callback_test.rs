use super::*;

#[test]
fn parse_callback_returns_trimmed_token() {
    assert_eq!(parse_callback(Some(" tok123 "), None), Ok("tok123".to_owned()));
}

#[test]
fn parse_callback_prefers_provider_error() {
    let err = parse_callback(Some("tok"), Some("access_denied")).unwrap_err();
    assert!(err.contains("access_denied"));
}

#[test]
fn parse_callback_ignores_blank_error() {
    assert_eq!(parse_callback(Some("tok"), Some("  ")), Ok("tok".to_owned()));
}

#[test]
fn parse_callback_requires_token() {
    assert!(parse_callback(None, None).is_err());
    assert!(parse_callback(Some("   "), None).is_err());
}
