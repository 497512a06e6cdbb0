use serde::Serialize;

/// A pruning or collapse decision made during reduction, in the order it
/// was made. The reducers only record that a rewrite happened and why;
/// rendering is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReduceEvent {
    /// A `percent_chance` branch opened after the block's running total
    /// had already reached 100. Its content was dropped.
    UnreachablePercentChance { weight: u32 },
    /// A random block degenerated to a single 100% branch and was
    /// replaced by that branch's body.
    CollapsedRandomBlock,
    /// An `if`/`elseif` arm whose symbol was not defined. Its body was
    /// emptied; the header stays.
    UnreachableCondition { symbol: Option<String> },
}
