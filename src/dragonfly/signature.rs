//! Job list signing with truncated HMAC-SHA256
//!
//! The signature is computed as:
//! ```text
//! message   = concat(for each job: "f" + path | "p" + operation + argument)
//! signature = hex(HMAC-SHA256(secret, message))[..16]
//! ```
//!
//! Every `p` job is signed, including ones the translator ignores. Jobs with
//! any other tag contribute nothing to the message. Issuers compute the
//! same value, so the output must stay byte-identical across releases.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::job::Job;
use crate::constants::{FETCH_TAG, PROCESS_TAG, SIGNATURE_HEX_LEN, THUMB_OPERATION};
use crate::error::ProxyError;

type HmacSha256 = Hmac<Sha256>;

/// Builds the canonical message that is fed to the HMAC.
pub fn canonical_message(jobs: &[Job]) -> String {
    let mut message = String::new();
    for job in jobs {
        match job {
            Job::Fetch { path } => {
                message.push_str(FETCH_TAG);
                message.push_str(path);
            }
            Job::Thumb { size_spec } => {
                message.push_str(PROCESS_TAG);
                message.push_str(THUMB_OPERATION);
                message.push_str(size_spec);
            }
            Job::Process {
                operation,
                argument,
            } => {
                message.push_str(PROCESS_TAG);
                message.push_str(operation);
                message.push_str(argument);
            }
            Job::Unrecognized(_) => {}
        }
    }
    message
}

/// Computes the 16 hex character signature of a job list.
pub fn sign(secret: &str, jobs: &[Job]) -> String {
    let message = canonical_message(jobs);

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    let digest = hex::encode(mac.finalize().into_bytes());
    let signature = digest[..SIGNATURE_HEX_LEN].to_string();

    tracing::debug!(message = %message, signature = %signature, "Computed job list signature");

    signature
}

/// Checks a supplied signature against the job list.
pub fn verify(secret: &str, jobs: &[Job], supplied: &str) -> Result<(), ProxyError> {
    let expected = sign(secret, jobs);

    if constant_time_compare(supplied, &expected) {
        Ok(())
    } else {
        Err(ProxyError::SignatureMismatch)
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
