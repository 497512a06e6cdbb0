use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.+?\*/").unwrap());

/// `percent_chance N content` on one line is legal in the DSL but the
/// parsers want one directive per line; the content moves to its own line.
static PERCENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)percent_chance ([0-9]+) (.+)").unwrap());

/// Lexical pre-filter applied before any reduction pass: strips block
/// comments, collapses whitespace and blank lines, and splits trailing
/// content off `percent_chance` lines. Idempotent.
pub fn normalize(source: &str) -> String {
    let mut text = COMMENT_REGEX.replace_all(source, "").into_owned();
    text = text.replace('\t', " ");
    text = text.replace('\r', "");
    while text.contains("  ") {
        text = text.replace("  ", " ");
    }
    text = text.replace("\n ", "\n");
    while text.contains("\n\n") {
        text = text.replace("\n\n", "\n");
    }
    text = text.replace(" \n", "\n");
    PERCENT_REGEX
        .replace_all(&text, "percent_chance $1\n$2")
        .into_owned()
}
