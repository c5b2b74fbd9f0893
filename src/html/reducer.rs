// src/html/reducer.rs
//! Pattern-based HTML to plain-text reduction.
//!
//! Works on the raw markup with regular expressions rather than a parse tree.
//! Each rewrite matches a start tag through the *nearest* matching end tag, so
//! nested elements of the same name (or unclosed ones) can leave fragments of
//! markup text behind. Callers only see [`reduce`], so a real parser can be
//! dropped in later without touching them.

use crate::constants::REDUCED_TEXT_MAX_CHARS;
use crate::types::truncate_owned;
use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Failed to compile reducer regex - this is a bug in the code")
}

/// Subtrees that never carry documentation text.
static NON_CONTENT: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["script", "style", "nav", "footer", "header", "aside"]
        .iter()
        .map(|tag| compile(&format!(r"(?i)<{tag}\b[^>]*>[\s\S]*?</{tag}\s*>")))
        .chain(std::iter::once(compile(r"<!--[\s\S]*?-->")))
        .collect()
});

/// Structural elements and their plain-text stand-ins, applied in order.
static STRUCTURAL: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            compile(r"(?i)<h[1-6]\b[^>]*>([\s\S]*?)</h[1-6]\s*>"),
            "\n\n## ${1}\n\n",
        ),
        (compile(r"(?i)<p\b[^>]*>([\s\S]*?)</p\s*>"), "\n${1}\n"),
        (compile(r"(?i)<li\b[^>]*>([\s\S]*?)</li\s*>"), "\n- ${1}"),
        (compile(r"(?i)<br\s*/?>"), "\n"),
        (compile(r"(?i)<code\b[^>]*>([\s\S]*?)</code\s*>"), "`${1}`"),
        (
            compile(r"(?i)<pre\b[^>]*>([\s\S]*?)</pre\s*>"),
            "\n```\n${1}\n```\n",
        ),
    ]
});

static ANY_TAG: Lazy<Regex> = Lazy::new(|| compile(r"<[^>]+>"));

/// The only entities decoded. `&amp;` goes first, so `&amp;lt;` ends up as `<`.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
];

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| compile(r"\n\s*\n\s*\n"));
static HORIZONTAL_RUN: Lazy<Regex> = Lazy::new(|| compile(r"[ \t]+"));
static LINE_INDENT: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^[ \t]+"));

/// Reduces raw HTML to readable plain text, bounded to the default limit.
///
/// Total: malformed input yields best-effort text, never an error.
pub fn reduce(html: &str) -> String {
    reduce_with_limit(html, REDUCED_TEXT_MAX_CHARS)
}

/// [`reduce`] with an explicit character bound.
pub fn reduce_with_limit(html: &str, max_chars: usize) -> String {
    let text = strip_non_content(html);
    let text = convert_structure(&text);
    let text = ANY_TAG.replace_all(&text, " ");
    let text = decode_entities(&text);
    let text = normalize_whitespace(&text);
    truncate_owned(text, max_chars)
}

fn strip_non_content(html: &str) -> String {
    NON_CONTENT.iter().fold(html.to_string(), |text, pattern| {
        pattern.replace_all(&text, "").into_owned()
    })
}

fn convert_structure(html: &str) -> String {
    STRUCTURAL
        .iter()
        .fold(html.to_string(), |text, (pattern, replacement)| {
            pattern.replace_all(&text, *replacement).into_owned()
        })
}

fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, decoded)| {
            acc.replace(entity, decoded)
        })
}

/// Collapses blank-line runs to a single blank line and horizontal runs to one
/// space, then drops per-line indentation and outer whitespace.
fn normalize_whitespace(text: &str) -> String {
    let text = BLANK_RUN.replace_all(text, "\n\n");
    let text = HORIZONTAL_RUN.replace_all(&text, " ");
    let text = LINE_INDENT.replace_all(&text, "");
    text.trim().to_string()
}
