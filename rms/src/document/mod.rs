use std::fmt;

/// A Document is an ordered sequence of nodes at one nesting level: raw
/// lines interleaved with nested blocks, in source order. It is both the
/// input and the output shape at every recursion level; `Display` emits
/// it back as DSL text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn empty() -> Self {
        Document { nodes: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A single node at one nesting level.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A content line carried through verbatim.
    Line(String),
    /// A `#define NAME` declaration. Read by the conditional reducer and
    /// always kept in the output.
    Define(String),
    /// A `start_random .. end_random` region.
    Random(RandomBlock),
    /// An `if .. [elseif ..]* [else]? endif` region.
    Condition(ConditionBlock),
}

/// A weighted-random block: one of the branches is selected at map
/// generation time according to its `percent_chance` weight.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomBlock {
    /// Content between `start_random` and the first `percent_chance`.
    /// When the block has no branches at all this is the whole content.
    pub lead: Document,
    pub branches: Vec<Branch>,
}

/// One `percent_chance` alternative of a random block.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    /// Declared weight. Well-formed scripts keep the per-block sum ≤ 100.
    pub weight: u32,
    pub body: Document,
}

/// A symbol-gated conditional block.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionBlock {
    pub arms: Vec<Arm>,
}

/// One arm of a conditional block. The header is part of the construct's
/// control flow and survives reduction even when the body does not.
#[derive(Debug, Clone, PartialEq)]
pub struct Arm {
    pub kind: ArmKind,
    /// Required for `If`/`ElseIf` arms, absent for `Else`.
    pub symbol: Option<String>,
    pub body: Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmKind {
    If,
    ElseIf,
    Else,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Line(line) => writeln!(f, "{}", line),
            Node::Define(name) => writeln!(f, "#define {}", name),
            Node::Random(block) => block.fmt(f),
            Node::Condition(block) => block.fmt(f),
        }
    }
}

impl fmt::Display for RandomBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start_random")?;
        write!(f, "{}", self.lead)?;
        for branch in &self.branches {
            writeln!(f, "percent_chance {}", branch.weight)?;
            write!(f, "{}", branch.body)?;
        }
        writeln!(f, "end_random")
    }
}

impl fmt::Display for ConditionBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for arm in &self.arms {
            match arm.kind {
                ArmKind::If => writeln!(f, "if {}", arm.symbol.as_deref().unwrap_or(""))?,
                ArmKind::ElseIf => writeln!(f, "elseif {}", arm.symbol.as_deref().unwrap_or(""))?,
                ArmKind::Else => writeln!(f, "else")?,
            }
            write!(f, "{}", arm.body)?;
        }
        writeln!(f, "endif")
    }
}
