use std::ops::Range;

/// An ordered, consumable sequence of logical lines with their byte
/// spans in the source text. Each parser call takes the remaining suffix
/// and advances past everything it consumed, including nested blocks and
/// their terminators.
#[derive(Debug)]
pub struct LineFeed<'a> {
    lines: Vec<(&'a str, Range<usize>)>,
    pos: usize,
}

impl<'a> LineFeed<'a> {
    /// Build a feed over normalized source. Empty lines carry no
    /// directive or content and are skipped.
    pub fn new(source: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut offset = 0;
        for line in source.split('\n') {
            if !line.is_empty() {
                lines.push((line, offset..offset + line.len()));
            }
            offset += line.len() + 1;
        }
        LineFeed { lines, pos: 0 }
    }

    /// Look at the next line without consuming it.
    pub fn peek(&self) -> Option<(&'a str, Range<usize>)> {
        self.lines.get(self.pos).cloned()
    }

    /// Consume and return the next line.
    pub fn next(&mut self) -> Option<(&'a str, Range<usize>)> {
        let line = self.lines.get(self.pos).cloned();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.lines.len()
    }
}
