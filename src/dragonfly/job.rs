//! Dragonfly job list decoding.
//!
//! A payload is `base64url_nopad(json)` where the JSON is an array of string
//! arrays, e.g. `[["f","public/a.jpg"],["p","thumb","400x300#"]]`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::constants::{FETCH_TAG, PROCESS_TAG, THUMB_OPERATION};
use crate::error::ProxyError;

/// One instruction of a signed job list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// `["f", path]` - fetch a source resource
    Fetch { path: String },
    /// `["p", "thumb", size_spec]` - resize
    Thumb { size_spec: String },
    /// `["p", operation, argument]` for any operation other than thumb.
    /// Signed like a thumb, ignored by translation.
    Process { operation: String, argument: String },
    /// Any other tag, kept verbatim and ignored by signing and translation
    Unrecognized(Vec<String>),
}

impl Job {
    pub fn fetch(path: impl Into<String>) -> Self {
        Job::Fetch { path: path.into() }
    }

    pub fn thumb(size_spec: impl Into<String>) -> Self {
        Job::Thumb {
            size_spec: size_spec.into(),
        }
    }

    pub fn process(operation: impl Into<String>, argument: impl Into<String>) -> Self {
        Job::Process {
            operation: operation.into(),
            argument: argument.into(),
        }
    }

    /// Builds a job from its wire form, validating operand counts.
    fn from_parts(parts: Vec<String>) -> Result<Self, ProxyError> {
        let Some(tag) = parts.first() else {
            return Err(ProxyError::decode("job must have at least a tag"));
        };

        // Extra trailing operands are tolerated and dropped.
        match tag.as_str() {
            FETCH_TAG => match parts.get(1) {
                Some(path) => Ok(Job::fetch(path.clone())),
                None => Err(ProxyError::decode("fetch job requires a path")),
            },
            PROCESS_TAG => match (parts.get(1), parts.get(2)) {
                (Some(operation), Some(size_spec)) if operation == THUMB_OPERATION => {
                    Ok(Job::thumb(size_spec.clone()))
                }
                (Some(operation), Some(argument)) => Ok(Job::Process {
                    operation: operation.clone(),
                    argument: argument.clone(),
                }),
                (Some(operation), None) if operation == THUMB_OPERATION => {
                    Err(ProxyError::decode("thumb job requires a size spec"))
                }
                _ => Err(ProxyError::decode(
                    "process job requires an operation and an argument",
                )),
            },
            _ => Ok(Job::Unrecognized(parts)),
        }
    }

    /// The wire form of this job.
    pub fn to_parts(&self) -> Vec<String> {
        match self {
            Job::Fetch { path } => vec![FETCH_TAG.to_string(), path.clone()],
            Job::Thumb { size_spec } => vec![
                PROCESS_TAG.to_string(),
                THUMB_OPERATION.to_string(),
                size_spec.clone(),
            ],
            Job::Process {
                operation,
                argument,
            } => vec![PROCESS_TAG.to_string(), operation.clone(), argument.clone()],
            Job::Unrecognized(parts) => parts.clone(),
        }
    }
}

/// Ordered job list; order drives both signing and URL assembly
pub type JobList = Vec<Job>;

/// Decodes an extracted payload into a job list.
///
/// Either the whole list is produced or a `Decode` error is returned.
pub fn decode_jobs(payload: &str) -> Result<JobList, ProxyError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ProxyError::decode(e.to_string()))?;

    parse_jobs(&bytes)
}

/// Parses the JSON layer of a payload.
pub fn parse_jobs(json: &[u8]) -> Result<JobList, ProxyError> {
    let raw: Vec<Vec<String>> =
        serde_json::from_slice(json).map_err(|e| ProxyError::decode(e.to_string()))?;

    raw.into_iter().map(Job::from_parts).collect()
}

/// Encodes a job list into its payload form.
pub fn encode_jobs(jobs: &[Job]) -> String {
    let raw: Vec<Vec<String>> = jobs.iter().map(Job::to_parts).collect();
    // Vec<Vec<String>> always serializes
    let json = serde_json::to_vec(&raw).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}
