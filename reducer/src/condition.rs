use rms::document::{Arm, ArmKind, ConditionBlock, Document, Node};

use crate::environment::SymbolEnvironment;
use crate::event::ReduceEvent;

/// Rewrite every conditional block in the document against `env`,
/// recording `#define` declarations as they are passed in document
/// order. Unreachable arms keep their header and lose their body; the
/// header carries the construct's control flow (the DSL builds logical
/// NOT out of an arm that matches nothing), so it is never deleted.
pub fn reduce(
    doc: Document,
    env: &mut SymbolEnvironment,
    events: &mut Vec<ReduceEvent>,
) -> Document {
    let mut nodes = Vec::with_capacity(doc.nodes.len());
    for node in doc.nodes {
        match node {
            Node::Define(name) => {
                env.define(name.clone());
                nodes.push(Node::Define(name));
            }
            Node::Condition(block) => {
                nodes.push(Node::Condition(reduce_block(block, env, events)));
            }
            other => nodes.push(other),
        }
    }
    Document { nodes }
}

fn reduce_block(
    block: ConditionBlock,
    env: &mut SymbolEnvironment,
    events: &mut Vec<ReduceEvent>,
) -> ConditionBlock {
    let mut arms = Vec::with_capacity(block.arms.len());
    for arm in block.arms {
        let Arm { kind, symbol, body } = arm;
        // The body is walked before the arm's own reachability check, so
        // a define inside the arm counts for the arm itself.
        let body = reduce(body, env, events);
        let reachable = match kind {
            ArmKind::Else => true,
            ArmKind::If | ArmKind::ElseIf => {
                symbol.as_deref().is_some_and(|s| env.contains(s))
            }
        };
        if reachable {
            arms.push(Arm { kind, symbol, body });
        } else {
            events.push(ReduceEvent::UnreachableCondition {
                symbol: symbol.clone(),
            });
            arms.push(Arm {
                kind,
                symbol,
                body: Document::empty(),
            });
        }
    }
    ConditionBlock { arms }
}
