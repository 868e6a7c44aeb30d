// Shared helpers for pipeline tests

use dragonfly_imgproxy::config::DragonflyConfig;
use dragonfly_imgproxy::dragonfly::{encode_jobs, sign, DragonflyEngine, Job};
use pingora_http::RequestHeader;

pub const SECRET: &str = "my-super-secret-key";
pub const URL_PREFIX: &str = "https://images.example.com/";

pub fn engine() -> DragonflyEngine {
    DragonflyEngine::new(&DragonflyConfig {
        secret: SECRET.to_string(),
        url_prefix: URL_PREFIX.to_string(),
    })
    .expect("test engine has a secret")
}

/// `/media/<payload><ext>?sha=<sig><extra_query>` signed with `SECRET`
pub fn signed_uri(jobs: &[Job], ext: &str, extra_query: &str) -> String {
    format!(
        "/media/{}{}?sha={}{}",
        encode_jobs(jobs),
        ext,
        sign(SECRET, jobs),
        extra_query
    )
}

/// GET request as a browser would send it
pub fn browser_request(uri: &str) -> RequestHeader {
    let mut req = RequestHeader::build("GET", uri.as_bytes(), None).expect("valid test uri");
    req.insert_header("Host", "proxy.example.com").unwrap();
    req.insert_header("Accept", "image/avif,image/webp,image/*,*/*;q=0.8")
        .unwrap();
    req
}

/// What the next stage observed when it was invoked
#[derive(Debug, Default)]
pub struct Recorded {
    pub path: String,
    pub query: Option<String>,
    pub accept: Option<String>,
}

/// A next stage that records the rewritten request
pub fn recorder(slot: &mut Option<Recorded>) -> impl FnOnce(&mut RequestHeader) + '_ {
    move |req: &mut RequestHeader| {
        *slot = Some(Recorded {
            path: req.uri.path().to_string(),
            query: req.uri.query().map(str::to_string),
            accept: req
                .headers
                .get("accept")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
    }
}
