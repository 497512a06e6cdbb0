use crate::feed::LineFeed;
use crate::parser::ParseError;

/// Pre-pass delimiter count over normalized source. Unequal counts mean
/// the reducers will run on a structurally broken script; that is
/// surfaced as a warning and reduction proceeds best-effort.
pub fn check(source: &str, file_id: usize) -> Vec<ParseError> {
    let mut start_random = 0usize;
    let mut end_random = 0usize;
    let mut ifs = 0usize;
    let mut endifs = 0usize;

    let mut feed = LineFeed::new(source);
    while let Some((line, _)) = feed.next() {
        match line.split_whitespace().next().unwrap_or("") {
            "start_random" => start_random += 1,
            "end_random" => end_random += 1,
            "if" => ifs += 1,
            "endif" => endifs += 1,
            _ => {}
        }
    }

    let mut warnings = Vec::new();
    if start_random != end_random {
        warnings.push(
            ParseError::warning(
                format!(
                    "unbalanced random blocks: {} start_random, {} end_random",
                    start_random, end_random
                ),
                0..0,
                file_id,
            )
            .with_note("the reduced map will probably be missing content or contain too much"),
        );
    }
    if ifs != endifs {
        warnings.push(
            ParseError::warning(
                format!("unbalanced conditions: {} if, {} endif", ifs, endifs),
                0..0,
                file_id,
            )
            .with_note("this will most likely reduce to nonsense; fix the script first"),
        );
    }
    warnings
}
