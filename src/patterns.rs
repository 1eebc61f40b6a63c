//! Compiled markup patterns, built once at first use.
//!
//! Shared read-only cache for the sanitizer, converter and splitter.

use std::sync::LazyLock;

use regex::Regex;

/// A whole fenced code block, including the fences.
pub(crate) static CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());

/// A fenced code block, capturing the body after an optional language tag.
pub(crate) static CODE_BLOCK_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:\w*\n)?(.*?)```").unwrap());

/// A whole inline code span, including the backticks.
pub(crate) static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]+`").unwrap());

/// An inline code span, capturing the body.
pub(crate) static INLINE_CODE_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// A well-formed link `[text](url)`, as one span.
pub(crate) static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]\([^)]+\)").unwrap());

/// A well-formed link, capturing text and url.
pub(crate) static LINK_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Double-asterisk bold. Must run before [`BOLD_SINGLE`].
pub(crate) static BOLD_DOUBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

/// Single-asterisk emphasis.
pub(crate) static BOLD_SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());

/// Underscore-delimited emphasis.
pub(crate) static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(.+?)_").unwrap());

/// An already-converted `<pre>` block, as one span.
pub(crate) static PRE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<pre>.*?</pre>").unwrap());
