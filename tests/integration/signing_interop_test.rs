// Signatures must stay byte-identical to what Dragonfly issuers produce

use dragonfly_imgproxy::dragonfly::job::parse_jobs;
use dragonfly_imgproxy::dragonfly::{decode_jobs, encode_jobs, sign, verify, Job};
use rstest::rstest;

use super::test_harness::SECRET;

#[test]
fn test_reference_signature() {
    let jobs = parse_jobs(
        br#"[["f","public/images/some-image.jpg"],["p","thumb","400x300#"]]"#,
    )
    .unwrap();

    assert_eq!(sign(SECRET, &jobs), "ed169fbef25cac31");
}

#[test]
fn test_reference_signature_with_encode_step() {
    let jobs = parse_jobs(
        br#"[["f","public/images/some-image.jpg"],["p","encode","webp"]]"#,
    )
    .unwrap();

    assert_eq!(sign(SECRET, &jobs), "17efa8f81f9e82db");
}

#[rstest]
#[case(vec![Job::fetch("a.jpg")])]
#[case(vec![Job::fetch("dir/with space/b.png"), Job::thumb("1x1>")])]
#[case(vec![Job::thumb("10x"), Job::fetch("c.gif"), Job::thumb("20x20#")])]
#[case(vec![Job::fetch("d.jpg"), Job::process("encode", "webp")])]
#[case(vec![])]
fn test_issued_urls_verify(#[case] jobs: Vec<Job>) {
    let payload = encode_jobs(&jobs);
    let signature = sign(SECRET, &jobs);

    assert!(!payload.contains('='), "payload must be unpadded");
    assert!(!payload.contains('+') && !payload.contains('/'));
    assert_eq!(signature.len(), 16);
    assert!(signature.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    let decoded = decode_jobs(&payload).unwrap();
    assert!(verify(SECRET, &decoded, &signature).is_ok());
}

#[test]
fn test_operand_order_matters() {
    let a = vec![Job::fetch("a.jpg"), Job::thumb("10x10")];
    let b = vec![Job::thumb("10x10"), Job::fetch("a.jpg")];

    assert_ne!(sign(SECRET, &a), sign(SECRET, &b));
}
