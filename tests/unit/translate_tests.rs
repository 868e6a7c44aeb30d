// URL translation tests through the public API

use dragonfly_imgproxy::dragonfly::translate::TranslationContext;
use dragonfly_imgproxy::dragonfly::{translate, Job, SizeSpec};
use dragonfly_imgproxy::error::ProxyError;

#[test]
fn test_manual_fold_matches_translate() {
    let jobs = vec![
        Job::fetch("uploads/2024/cat picture.gif"),
        Job::thumb("120x90#"),
    ];

    let manual = jobs
        .iter()
        .try_fold(TranslationContext::new("s3://bucket/"), |ctx, job| ctx.apply(job))
        .unwrap()
        .finish();

    assert_eq!(manual, translate("s3://bucket/", &jobs).unwrap());
    assert_eq!(
        manual,
        "/insecure/rs:fill:120:90:g:ce/f:gif/plain/s3://bucket/uploads/2024/cat%20picture.gif"
    );
}

#[test]
fn test_empty_prefix_and_two_thumbs() {
    let jobs = vec![
        Job::fetch("a.jpg"),
        Job::thumb("100x"),
        Job::thumb("50x50>"),
    ];

    assert_eq!(
        translate("", &jobs).unwrap(),
        "/insecure/rs:fit:100:/rs:fit:50:50:0/plain/a.jpg"
    );
}

#[test]
fn test_size_spec_display() {
    assert_eq!(SizeSpec::parse("400x300#").unwrap().to_string(), "/rs:fill:400:300:g:ce");
    assert_eq!(
        SizeSpec::parse("400x300!"),
        Err(ProxyError::size_spec("400x300!"))
    );
}
