//! Dragonfly job list to imgproxy URL translation.
//!
//! The job list is folded into a [`TranslationContext`], then assembled as:
//! ```text
//! /insecure{resize directives}{/f:svg}/plain/{url_prefix}{encoded path}
//! ```
//!
//! Thumb size specs follow Dragonfly's geometry subset:
//! - `WxH#` → `/rs:fill:W:H:g:ce` (crop to fill, centered)
//! - `WxH>` → `/rs:fit:W:H:0` (fit, never enlarge)
//! - `WxH`  → `/rs:fit:W:H`
//!
//! `H` may be empty, in which case imgproxy keeps the aspect ratio.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::job::Job;
use crate::constants::{
    FORMAT_GIF_DIRECTIVE, FORMAT_SVG_DIRECTIVE, INSECURE_SEGMENT, PLAIN_SEGMENT,
};
use crate::error::ProxyError;

static SIZE_SPEC_PATTERN: OnceLock<Regex> = OnceLock::new();

fn size_spec_pattern() -> &'static Regex {
    SIZE_SPEC_PATTERN.get_or_init(|| {
        // SAFETY: compile-time constant pattern, covered by tests.
        Regex::new(r"^([0-9]+)x([0-9]*)(>|#)?$")
            .expect("Invalid size spec regex - this is a compile-time bug")
    })
}

/// How a thumb fits its target box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// `WxH` - fit within bounds
    Fit,
    /// `WxH>` - fit within bounds, never enlarge
    FitNoEnlarge,
    /// `WxH#` - crop to fill exactly, center gravity
    FillCenter,
}

/// A parsed thumb size spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeSpec {
    pub width: String,
    pub height: String,
    pub mode: ResizeMode,
}

impl SizeSpec {
    /// Parses `<digits>x<digits or empty><empty | > | #>`.
    pub fn parse(spec: &str) -> Result<Self, ProxyError> {
        let caps = size_spec_pattern()
            .captures(spec)
            .ok_or_else(|| ProxyError::size_spec(spec))?;

        let mode = match caps.get(3).map(|m| m.as_str()) {
            Some(">") => ResizeMode::FitNoEnlarge,
            Some("#") => ResizeMode::FillCenter,
            _ => ResizeMode::Fit,
        };

        Ok(Self {
            width: caps[1].to_string(),
            height: caps[2].to_string(),
            mode,
        })
    }
}

/// Renders the imgproxy resize directive, e.g. `/rs:fill:100:100:g:ce`.
impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            ResizeMode::Fit => write!(f, "/rs:fit:{}:{}", self.width, self.height),
            ResizeMode::FitNoEnlarge => write!(f, "/rs:fit:{}:{}:0", self.width, self.height),
            ResizeMode::FillCenter => {
                write!(f, "/rs:fill:{}:{}:g:ce", self.width, self.height)
            }
        }
    }
}

/// Interpreter state threaded through the job list
#[derive(Debug, Clone, Default)]
pub struct TranslationContext {
    /// URL prefix followed by every encoded fetch path
    source: String,
    /// One `/plain/` marker is emitted per fetch job
    fetches: usize,
    /// Accumulated resize and per-resize format directives
    directives: String,
    force_gif: bool,
    force_svg: bool,
}

impl TranslationContext {
    pub fn new(url_prefix: &str) -> Self {
        Self {
            source: url_prefix.to_string(),
            ..Default::default()
        }
    }

    /// Interprets one job.
    pub fn apply(mut self, job: &Job) -> Result<Self, ProxyError> {
        match job {
            Job::Fetch { path } => {
                let (dir, file_name) = split_path(path);
                self.source
                    .push_str(&join_clean(dir, &escape_file_name(file_name)));
                self.fetches += 1;
                self.force_gif = file_name.ends_with(".gif");
                self.force_svg = file_name.ends_with(".svg");
            }
            Job::Thumb { size_spec } => {
                let spec = SizeSpec::parse(size_spec)?;
                self.directives.push_str(&spec.to_string());
                if self.force_gif {
                    self.directives.push_str(FORMAT_GIF_DIRECTIVE);
                }
            }
            Job::Process { .. } | Job::Unrecognized(_) => {}
        }
        Ok(self)
    }

    /// Assembles the final imgproxy path.
    pub fn finish(self) -> String {
        let mut url = String::from(INSECURE_SEGMENT);
        url.push_str(&self.directives);
        if self.force_svg {
            url.push_str(FORMAT_SVG_DIRECTIVE);
        }
        url.push_str(&PLAIN_SEGMENT.repeat(self.fetches));
        url.push_str(&self.source);
        url
    }
}

/// Translates a verified job list into an imgproxy path.
pub fn translate(url_prefix: &str, jobs: &[Job]) -> Result<String, ProxyError> {
    jobs.iter()
        .try_fold(TranslationContext::new(url_prefix), TranslationContext::apply)
        .map(TranslationContext::finish)
}

/// Percent-encodes a file name; space becomes `%20`, never `+`.
///
/// Only ASCII alphanumerics and `-_.~` pass through, so existing `%XX`
/// sequences are encoded again.
pub fn escape_file_name(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Splits after the last `/`; the directory keeps its trailing slash.
fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    }
}

/// Joins directory and file name, then cleans the result lexically.
fn join_clean(dir: &str, file_name: &str) -> String {
    let joined = match (dir.is_empty(), file_name.is_empty()) {
        (true, true) => return String::new(),
        (true, false) => file_name.to_string(),
        (false, true) => dir.to_string(),
        (false, false) => format!("{}/{}", dir, file_name),
    };
    clean_path(&joined)
}

/// Lexical path cleaning: collapses `//`, drops `.`, resolves `..`.
fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let body = segments.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}
