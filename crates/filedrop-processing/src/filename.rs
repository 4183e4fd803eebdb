//! Filename sanitization and destination naming.
//!
//! Client filenames go through two passes, in this order:
//!
//! 1. [`strip_path`] drops any directory components, POSIX or Windows style.
//! 2. [`collapse_unsafe`] replaces each run of characters outside
//!    `[a-zA-Z0-9.-]` with a single `_`.
//!
//! The result only contains `[a-zA-Z0-9._-]`, so it is safe both on disk and
//! inside a URL path segment.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static TRAILING_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^/\\]+$").expect("trailing segment pattern is valid"));

static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9.-]+").expect("unsafe run pattern is valid"));

/// Greedy base so the split happens at the last dot; the base must be non-empty.
static NAME_AND_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\.([^.]+)$").expect("extension pattern is valid"));

/// Keep the trailing run of characters that contains neither `/` nor `\`.
///
/// A name ending in a separator has no such run and is returned unchanged; the
/// separators are then neutralized by [`collapse_unsafe`].
pub fn strip_path(name: &str) -> &str {
    TRAILING_SEGMENT
        .find(name)
        .map(|m| m.as_str())
        .unwrap_or(name)
}

/// Replace every maximal run of characters outside `[a-zA-Z0-9.-]` with `_`.
pub fn collapse_unsafe(name: &str) -> String {
    UNSAFE_RUN.replace_all(name, "_").into_owned()
}

/// Both sanitization passes.
pub fn sanitize_filename(name: &str) -> String {
    collapse_unsafe(strip_path(name))
}

/// A sanitized name split at its last dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitName {
    pub base: String,
    /// Empty when the name has no usable extension.
    pub extension: String,
}

/// Split into base name and extension.
///
/// `photo.tar.gz` splits into `photo.tar` / `gz`. Names without a dot, with
/// nothing before the last dot (`.htaccess`) or nothing after it (`notes.`)
/// have no extension and the whole name is the base.
pub fn split_extension(name: &str) -> SplitName {
    match NAME_AND_EXTENSION.captures(name) {
        Some(caps) => SplitName {
            base: caps[1].to_string(),
            extension: caps[2].to_string(),
        },
        None => SplitName {
            base: name.to_string(),
            extension: String::new(),
        },
    }
}

/// A prefix made only of ASCII digits (an ID or timestamp) becomes the whole
/// base name.
pub fn is_numeric_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit())
}

/// Build the stored file name from the prefix and the split client name.
///
/// The prefix is concatenated without a separator; callers that want one put
/// it in the prefix itself (`user42_`).
pub fn destination_file_name(prefix: &str, name: &SplitName) -> String {
    let mut file_name = if is_numeric_prefix(prefix) {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, name.base)
    };

    if !name.extension.is_empty() {
        file_name.push('.');
        file_name.push_str(&name.extension);
    }

    file_name
}

/// Whether `name` can be used as a single entry inside the destination
/// directory.
pub fn is_storable_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// Drop redundant and trailing separators so the directory joins with exactly
/// one separator.
pub fn normalize_directory(directory: &Path) -> PathBuf {
    directory.components().collect()
}
