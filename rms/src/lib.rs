pub mod balance;
pub mod document;
pub mod feed;
pub mod normalize;
pub mod parser;

use crate::document::Document;
use crate::parser::ParseError;

/// One parse of a map script, for a single reduction pass.
#[derive(Debug, Clone)]
pub struct Script {
    /// The block tree built by that pass's grammar.
    pub document: Document,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
    /// Non-fatal problems found while parsing (e.g. a block left open at
    /// end of input).
    pub warnings: Vec<ParseError>,
}
