use rms::balance;
use rms::normalize::normalize;
use rms::parser::{ParseError, Parser};

use crate::cleanup::strip_empty_conditionals;
use crate::environment::SymbolEnvironment;
use crate::error::ReduceError;
use crate::event::ReduceEvent;
use crate::{condition, random};

/// Which intermediate text a diagnostic's span points into. The two
/// passes parse different texts, so each stage registers its text with
/// the caller and diagnostics carry the file ID the caller handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Output of lexical normalization, input to the random pass.
    Normalized,
    /// Output of the random pass, input to the conditional pass.
    RandomReduced,
}

/// Everything produced by reducing one document.
#[derive(Debug)]
pub struct Reduction {
    /// The reduced script text.
    pub text: String,
    /// Pruning and collapse decisions, in the order they were made.
    pub events: Vec<ReduceEvent>,
    /// Non-fatal structural warnings (imbalanced delimiters, blocks left
    /// open at end of input).
    pub warnings: Vec<ParseError>,
}

/// Run the full pass sequence over one raw script: normalize, check
/// delimiter balance, reduce random blocks, reduce conditionals, strip
/// empty conditionals.
///
/// `register` is called once per [`Stage`] with that stage's text and
/// returns the file ID diagnostics against that text should carry
/// (callers rendering with codespan add each text to their file
/// database; callers that don't care return any number).
///
/// The environment is mutated in place by `#define` discovery; give each
/// document a fresh copy of the seed set.
pub fn reduce_source<R>(
    source: &str,
    env: &mut SymbolEnvironment,
    mut register: R,
) -> Result<Reduction, ReduceError>
where
    R: FnMut(Stage, &str) -> usize,
{
    let mut events = Vec::new();
    let mut warnings = Vec::new();

    let text = normalize(source);
    let file_id = register(Stage::Normalized, &text);
    warnings.extend(balance::check(&text, file_id));

    // First pass: random blocks.
    let parser = Parser::new(text, file_id);
    let script = parser.parse_random()?;
    warnings.extend(script.warnings);
    let text = random::reduce(script.document, &mut events).to_string();

    // Second pass: conditionals, over the first pass's output.
    let file_id = register(Stage::RandomReduced, &text);
    let parser = Parser::new(text, file_id);
    let script = parser.parse_conditions()?;
    warnings.extend(script.warnings);
    let text = condition::reduce(script.document, env, &mut events).to_string();

    let text = strip_empty_conditionals(&text);
    Ok(Reduction {
        text: text.trim().to_string(),
        events,
        warnings,
    })
}
