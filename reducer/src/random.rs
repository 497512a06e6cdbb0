use rms::document::{Branch, Document, Node, RandomBlock};

use crate::event::ReduceEvent;

/// Rewrite every random block in the document, innermost first.
pub fn reduce(doc: Document, events: &mut Vec<ReduceEvent>) -> Document {
    let mut nodes = Vec::with_capacity(doc.nodes.len());
    for node in doc.nodes {
        match node {
            Node::Random(block) => reduce_block(block, events, &mut nodes),
            other => nodes.push(other),
        }
    }
    Document { nodes }
}

/// Reduce one block and splice its replacement into `out`.
fn reduce_block(block: RandomBlock, events: &mut Vec<ReduceEvent>, out: &mut Vec<Node>) {
    let lead = reduce(block.lead, events);
    if block.branches.is_empty() {
        // No percent_chance at all: the block degrades to its content.
        out.extend(lead.nodes);
        return;
    }

    // Content before the first percent_chance belongs to no branch and
    // can never be selected; it is dropped with the wrapper.
    let mut kept: Vec<Branch> = Vec::new();
    let mut chances: u32 = 0;
    for branch in block.branches {
        if chances >= 100 {
            // Unreachable: still walked so nested rewrites are reported,
            // but nothing of it survives. Its weight never counts.
            events.push(ReduceEvent::UnreachablePercentChance {
                weight: branch.weight,
            });
            let _ = reduce(branch.body, events);
            continue;
        }
        // The weight counts from the moment the branch opens, even when
        // its body turns out empty and the branch itself is dropped.
        chances = chances.saturating_add(branch.weight);
        let body = reduce(branch.body, events);
        if branch.weight > 0 && !body.is_empty() {
            kept.push(Branch {
                weight: branch.weight,
                body,
            });
        }
    }

    if kept.len() == 1 && kept[0].weight == 100 {
        // Degenerate: the single surviving branch always runs, so the
        // wrapper disappears.
        events.push(ReduceEvent::CollapsedRandomBlock);
        if let Some(only) = kept.pop() {
            out.extend(only.body.nodes);
        }
    } else if !kept.is_empty() {
        out.push(Node::Random(RandomBlock {
            lead: Document::empty(),
            branches: kept,
        }));
    }
}
