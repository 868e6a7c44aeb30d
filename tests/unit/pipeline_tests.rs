// Request context unit tests

use dragonfly_imgproxy::pipeline::RequestContext;

// Test: RequestContext includes request ID (UUID)
#[test]
fn test_request_context_includes_request_id() {
    let context1 = RequestContext::new("GET".to_string(), "/media/a.jpg".to_string());
    let context2 = RequestContext::new("GET".to_string(), "/media/b.jpg".to_string());

    let id1 = context1.request_id();
    let id2 = context2.request_id();

    assert!(!id1.is_empty(), "Request ID should not be empty");
    assert_ne!(id1, id2, "Each request should have a unique ID");
    assert_eq!(id1.len(), 36, "UUID should be 36 characters long");
    assert!(uuid::Uuid::parse_str(id1).is_ok());
}

#[test]
fn test_request_context_records_outcome() {
    let mut context = RequestContext::default();
    context.set_request("GET", "/media/abc.jpg");
    context.set_upstream_path("/insecure/plain/a.jpg".to_string());

    assert_eq!(context.path(), "/media/abc.jpg");
    assert_eq!(context.upstream_path(), Some("/insecure/plain/a.jpg"));
    assert_eq!(context.rejected_stage(), None);

    let mut rejected = RequestContext::default();
    rejected.set_rejected_stage("signature_verifier");
    assert_eq!(rejected.rejected_stage(), Some("signature_verifier"));
    assert_eq!(rejected.upstream_path(), None);
}

#[test]
fn test_request_context_measures_elapsed_time() {
    let context = RequestContext::default();
    std::thread::sleep(std::time::Duration::from_millis(5));
    assert!(context.elapsed() >= std::time::Duration::from_millis(5));
}
