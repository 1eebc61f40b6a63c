//! Markdown-aware message splitting for Telegram's payload limit.
//!
//! Splits long text by paragraphs, then lines, then words, then (last
//! resort) characters, never cutting through a fenced code block. Works on
//! raw markdown (``` fences) and on already-converted HTML (`<pre>`
//! blocks) alike.

use tracing::debug;

use crate::convert::md_to_html;
use crate::patterns;
use crate::sanitize::sanitize_markdown;

/// Stand-in for blank lines inside code blocks while paragraph-splitting.
const CODE_BLOCK_NL: &str = "\u{0}CB\u{0}";

/// Sanitize, split and convert `text` into sequential Telegram HTML parts.
///
/// The full delivery pipeline: repair the markup, split the repaired text
/// into bounded chunks, repair each chunk again (a split can separate a
/// marker pair across chunks), then convert every chunk to HTML. Send the
/// parts in order as separate messages.
pub fn prepare_html_parts(text: &str, max_len: usize) -> Vec<String> {
    let clean = sanitize_markdown(text);
    if clean.len() <= max_len {
        return vec![md_to_html(&clean)];
    }
    split_message_safe(&clean, max_len)
        .iter()
        .map(|chunk| md_to_html(&sanitize_markdown(chunk)))
        .collect()
}

/// Split text into chunks of at most `max_len` bytes, keeping code blocks
/// whole.
///
/// Strategy, outermost boundary first:
/// 1. accumulate paragraphs (blank-line separated) greedily;
/// 2. an oversized paragraph containing a code block is emitted whole:
///    atomicity takes priority over the length bound;
/// 3. other oversized paragraphs are split by lines, then words;
/// 4. an oversized word is hard-cut at char boundaries.
pub fn split_message_safe(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let protected = protect_code_block_newlines(text);

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for para in protected.split("\n\n") {
        let candidate_len = if current.is_empty() {
            para.len()
        } else {
            current.len() + 2 + para.len()
        };
        if candidate_len <= max_len {
            if !current.is_empty() {
                current.push_str("\n\n");
            }
            current.push_str(para);
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if para.len() <= max_len {
            current = para.to_string();
            continue;
        }

        // Oversized paragraph holding a code block: never cut inside it.
        if para.contains(CODE_BLOCK_NL) || para.contains("```") || para.contains("<pre>") {
            debug!(len = para.len(), max_len, "emitting oversized atomic code chunk");
            chunks.push(para.to_string());
            continue;
        }

        for line in para.split('\n') {
            let candidate_len = if current.is_empty() {
                line.len()
            } else {
                current.len() + 1 + line.len()
            };
            if candidate_len <= max_len {
                if !current.is_empty() {
                    current.push('\n');
                }
                current.push_str(line);
                continue;
            }

            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }

            if line.len() <= max_len {
                current = line.to_string();
                continue;
            }

            chunks.extend(hard_split(line, max_len));
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    let restored: Vec<String> = chunks
        .iter()
        .map(|c| c.replace(CODE_BLOCK_NL, "\n\n"))
        .collect();

    if restored.is_empty() {
        // Pathological input (separators only); bounded prefix is the best
        // remaining answer.
        vec![text[..floor_char_boundary(text, max_len)].to_string()]
    } else {
        restored
    }
}

/// Truncate at a paragraph, line or word boundary, appending `suffix`.
///
/// The single-chunk sibling of [`split_message_safe`], for previews and
/// summaries where only one bounded message is wanted.
pub fn truncate_safe(text: &str, max_len: usize, suffix: &str) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }

    let target = floor_char_boundary(text, max_len.saturating_sub(suffix.len()));
    let head = &text[..target];
    let cut = head
        .rfind("\n\n")
        .or_else(|| head.rfind('\n'))
        .or_else(|| head.rfind(' '))
        .unwrap_or(target);

    format!("{}{}", &text[..cut], suffix)
}

/// Replace blank lines inside code blocks so paragraph-splitting cannot
/// cut through them. The blocks themselves stay inline.
fn protect_code_block_newlines(text: &str) -> String {
    let fenced = patterns::CODE_BLOCK.replace_all(text, |caps: &regex::Captures| {
        caps[0].replace("\n\n", CODE_BLOCK_NL)
    });
    patterns::PRE_BLOCK
        .replace_all(&fenced, |caps: &regex::Captures| {
            caps[0].replace("\n\n", CODE_BLOCK_NL)
        })
        .into_owned()
}

/// Split an oversized line by words, falling back to a character split for
/// words longer than `max_len`.
fn hard_split(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate_len = if current.is_empty() {
            word.len()
        } else {
            current.len() + 1 + word.len()
        };
        if candidate_len <= max_len {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            if word.len() > max_len {
                chunks.extend(char_split(word, max_len));
            } else {
                current = word.to_string();
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Last resort: cut every `max_len` bytes, rounded down to char boundaries.
fn char_split(word: &str, max_len: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        if !piece.is_empty() && piece.len() + ch.len_utf8() > max_len {
            out.push(std::mem::take(&mut piece));
        }
        piece.push(ch);
    }
    if !piece.is_empty() {
        out.push(piece);
    }
    out
}

/// Largest char-boundary index not beyond `index`.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut i = index;
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}
