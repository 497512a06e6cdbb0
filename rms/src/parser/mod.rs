pub mod error;

pub use error::ParseError;

use std::ops::Range;

use crate::Script;
use crate::document::{Arm, ArmKind, Branch, ConditionBlock, Document, Node, RandomBlock};
use crate::feed::LineFeed;

/// Parser entry point. Each reduction pass parses with its own grammar:
/// the random pass recognizes `start_random`/`percent_chance`/`end_random`,
/// the conditional pass `if`/`elseif`/`else`/`endif`/`#define`. Every
/// other line is opaque content and is carried through verbatim.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse the source with the random-block grammar.
    pub fn parse_random(&self) -> Result<Script, Vec<ParseError>> {
        let mut feed = LineFeed::new(&self.source);
        let mut state = State::new(self.file_id);
        let document = state.random_document(&mut feed);
        state.finish(document)
    }

    /// Parse the source with the conditional-block grammar.
    pub fn parse_conditions(&self) -> Result<Script, Vec<ParseError>> {
        let mut feed = LineFeed::new(&self.source);
        let mut state = State::new(self.file_id);
        let document = state.condition_document(&mut feed);
        state.finish(document)
    }
}

struct State {
    file_id: usize,
    errors: Vec<ParseError>,
    warnings: Vec<ParseError>,
}

impl State {
    fn new(file_id: usize) -> Self {
        State {
            file_id,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn finish(self, document: Document) -> Result<Script, Vec<ParseError>> {
        if self.errors.is_empty() {
            Ok(Script {
                document,
                source_id: self.file_id,
                warnings: self.warnings,
            })
        } else {
            Err(self.errors)
        }
    }

    // --- random-block grammar ---

    /// The outermost level: no block is open, so `end_random` has nothing
    /// to close and passes through as content.
    fn random_document(&mut self, feed: &mut LineFeed<'_>) -> Document {
        let mut doc = Document::empty();
        while let Some((line, span)) = feed.next() {
            match head(line) {
                "start_random" => {
                    doc.nodes.push(Node::Random(self.random_block(feed, span)));
                }
                "end_random" => {
                    self.warnings.push(ParseError::warning(
                        "end_random without an open random block",
                        span,
                        self.file_id,
                    ));
                    doc.nodes.push(Node::Line(line.to_string()));
                }
                _ => doc.nodes.push(Node::Line(line.to_string())),
            }
        }
        doc
    }

    /// One `start_random` region; the opening line is already consumed.
    fn random_block(&mut self, feed: &mut LineFeed<'_>, open_span: Range<usize>) -> RandomBlock {
        let mut block = RandomBlock {
            lead: Document::empty(),
            branches: Vec::new(),
        };
        loop {
            let Some((line, span)) = feed.next() else {
                self.warnings.push(
                    ParseError::warning(
                        "start_random without a matching end_random",
                        open_span,
                        self.file_id,
                    )
                    .with_note("the block is closed at end of input"),
                );
                break;
            };
            match head(line) {
                "end_random" => break,
                "start_random" => {
                    let nested = self.random_block(feed, span);
                    tail(&mut block).nodes.push(Node::Random(nested));
                }
                "percent_chance" => match weight_arg(line) {
                    Ok(weight) => block.branches.push(Branch {
                        weight,
                        body: Document::empty(),
                    }),
                    Err(message) => {
                        self.errors
                            .push(ParseError::error(message, span, self.file_id));
                    }
                },
                _ => tail(&mut block).nodes.push(Node::Line(line.to_string())),
            }
        }
        block
    }

    // --- conditional-block grammar ---

    /// The outermost level: stray arm or closer lines have no block to
    /// attach to and pass through as content.
    fn condition_document(&mut self, feed: &mut LineFeed<'_>) -> Document {
        let mut doc = Document::empty();
        while let Some((line, span)) = feed.next() {
            match head(line) {
                "if" => match symbol_arg(line) {
                    Some(symbol) => {
                        let block = self.condition_block(feed, symbol.to_string(), span);
                        doc.nodes.push(Node::Condition(block));
                    }
                    None => self.errors.push(ParseError::error(
                        "if without a symbol",
                        span,
                        self.file_id,
                    )),
                },
                "#define" => self.define(line, span, &mut doc),
                "elseif" | "else" | "endif" => {
                    self.warnings.push(ParseError::warning(
                        format!("{} without an open condition block", head(line)),
                        span,
                        self.file_id,
                    ));
                    doc.nodes.push(Node::Line(line.to_string()));
                }
                _ => doc.nodes.push(Node::Line(line.to_string())),
            }
        }
        doc
    }

    /// One `if` region; the opening line is already consumed.
    fn condition_block(
        &mut self,
        feed: &mut LineFeed<'_>,
        first_symbol: String,
        open_span: Range<usize>,
    ) -> ConditionBlock {
        let mut block = ConditionBlock { arms: Vec::new() };
        let mut current = Arm {
            kind: ArmKind::If,
            symbol: Some(first_symbol),
            body: Document::empty(),
        };
        loop {
            let Some((line, span)) = feed.next() else {
                self.warnings.push(
                    ParseError::warning(
                        "if without a matching endif",
                        open_span,
                        self.file_id,
                    )
                    .with_note("the block is closed at end of input"),
                );
                break;
            };
            match head(line) {
                "endif" => break,
                "if" => match symbol_arg(line) {
                    Some(symbol) => {
                        let nested = self.condition_block(feed, symbol.to_string(), span);
                        current.body.nodes.push(Node::Condition(nested));
                    }
                    None => self.errors.push(ParseError::error(
                        "if without a symbol",
                        span,
                        self.file_id,
                    )),
                },
                "elseif" => match symbol_arg(line) {
                    Some(symbol) => {
                        let next = Arm {
                            kind: ArmKind::ElseIf,
                            symbol: Some(symbol.to_string()),
                            body: Document::empty(),
                        };
                        block.arms.push(std::mem::replace(&mut current, next));
                    }
                    None => self.errors.push(ParseError::error(
                        "elseif without a symbol",
                        span,
                        self.file_id,
                    )),
                },
                "else" => {
                    let next = Arm {
                        kind: ArmKind::Else,
                        symbol: None,
                        body: Document::empty(),
                    };
                    block.arms.push(std::mem::replace(&mut current, next));
                }
                "#define" => self.define(line, span, &mut current.body),
                _ => current.body.nodes.push(Node::Line(line.to_string())),
            }
        }
        block.arms.push(current);
        block
    }

    fn define(&mut self, line: &str, span: Range<usize>, doc: &mut Document) {
        match symbol_arg(line) {
            Some(name) => doc.nodes.push(Node::Define(name.to_string())),
            None => self.errors.push(ParseError::error(
                "#define without a name",
                span,
                self.file_id,
            )),
        }
    }
}

/// The directive word of a line, i.e. its first whitespace-separated token.
fn head(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

/// The symbol argument of an `if`/`elseif`/`#define` line.
fn symbol_arg(line: &str) -> Option<&str> {
    line.split_whitespace().nth(1)
}

/// The integer argument of a `percent_chance` line.
fn weight_arg(line: &str) -> Result<u32, String> {
    match symbol_arg(line) {
        Some(arg) => arg
            .parse()
            .map_err(|_| format!("percent_chance weight '{}' is not an integer", arg)),
        None => Err("percent_chance without a weight".to_string()),
    }
}

/// The document the next content line of a random block belongs to: the
/// open branch's body, or the lead when no branch has opened yet.
fn tail(block: &mut RandomBlock) -> &mut Document {
    match block.branches.last_mut() {
        Some(branch) => &mut branch.body,
        None => &mut block.lead,
    }
}
