//! Proxy utility functions.

use pingora_core::Result;
use pingora_http::{RequestHeader, ResponseHeader};
use pingora_proxy::Session;

use super::special_endpoints::EndpointResponse;

/// Write a complete response and end the stream.
pub async fn write_response(session: &mut Session, response: EndpointResponse) -> Result<()> {
    let mut header = ResponseHeader::build(response.status, None)?;
    header.insert_header("Content-Type", response.content_type)?;
    header.insert_header("Content-Length", response.body.len().to_string())?;

    session
        .write_response_header(Box::new(header), false)
        .await?;
    session
        .write_response_body(Some(response.body.into()), true)
        .await?;

    Ok(())
}

/// Host header value for the upstream: port omitted when it is the scheme default.
pub fn upstream_host_header(host: &str, port: u16, tls: bool) -> String {
    match (tls, port) {
        (true, 443) | (false, 80) => host.to_string(),
        _ => format!("{}:{}", host, port),
    }
}

/// Set or replace the Host header of an outbound request.
pub fn set_host(req: &mut RequestHeader, host: String) -> Result<()> {
    req.insert_header("Host", host)?;
    Ok(())
}
