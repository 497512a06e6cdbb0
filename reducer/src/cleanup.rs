use once_cell::sync::Lazy;
use regex::Regex;

static EMPTY_IF_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mi)^if \S+\nendif\n").unwrap());

/// Final cleanup: remove degenerate single-arm `if X` / `endif` pairs
/// with no body. Multi-arm blocks never match, so emptied-but-kept arms
/// survive. Deliberately a single pass: a pair only exposed by removing
/// an inner pair is left alone.
pub fn strip_empty_conditionals(text: &str) -> String {
    EMPTY_IF_REGEX.replace_all(text, "").into_owned()
}
