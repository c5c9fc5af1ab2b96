//! Data-model path parsing and normalization.
//!
//! Three notations are accepted and may be mixed in one path:
//!
//! ```text
//! /users/0/name        slash
//! users.0.name         dot
//! users[0].name        bracket index
//! ```
//!
//! Parsing never fails. A path that yields no segments resolves to
//! "not found" wherever it is used.

use regex::Regex;
use std::sync::LazyLock;

/// The absolute-path marker and segment separator.
pub const SEPARATOR: char = '/';

/// The root context path.
pub const ROOT: &str = "/";

static BRACKET_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("bracket-index pattern is valid"));

static REPEATED_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/{2,}").expect("separator pattern is valid"));

/// Splits a path into its canonical segment sequence.
///
/// Strips a single leading `/`, rewrites `[n]` and `.` into `/`, splits and
/// drops empty segments.
pub fn parse_segments(path: &str) -> Vec<String> {
    let trimmed = path.strip_prefix(SEPARATOR).unwrap_or(path);
    let slashed = BRACKET_INDEX.replace_all(trimmed, "/$1");
    slashed
        .replace('.', "/")
        .split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves `path` against `context_path`.
///
/// Absolute paths are returned unchanged. Relative paths are appended to the
/// context and repeated separators are collapsed.
pub fn normalize(path: &str, context_path: &str) -> String {
    if is_absolute(path) {
        return path.to_string();
    }
    let joined = format!("{}{}{}", context_path, SEPARATOR, path);
    REPEATED_SEPARATORS.replace_all(&joined, ROOT).into_owned()
}

/// True when the path starts at the data model root, i.e. with `/`.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

/// True when the segment addresses a sequence position (ASCII digits only).
pub fn is_index_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Parses an index segment. Returns `None` for non-digit segments and for
/// values that do not fit in `usize`.
pub fn parse_index(segment: &str) -> Option<usize> {
    if is_index_segment(segment) {
        segment.parse().ok()
    } else {
        None
    }
}

/// Appends a child segment to a base path: `join("/items", 2)` is `/items/2`.
pub fn join(base: &str, child: impl std::fmt::Display) -> String {
    normalize(&child.to_string(), base)
}

/// Renders segments back into an absolute slash path.
pub fn to_path(segments: &[String]) -> String {
    format!("{}{}", ROOT, segments.join(ROOT))
}
