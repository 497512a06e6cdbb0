use std::path::Path;

use rms::document::{Arm, ArmKind, Branch, ConditionBlock, Document, Node, RandomBlock};
use sha2::{Digest, Sha256};

use crate::error::ReduceError;

/// One reduced map going into a pack.
#[derive(Debug, Clone)]
pub struct MapEntry {
    /// Source filename; the synthetic symbol is derived from it.
    pub filename: String,
    /// Fully reduced text of that map.
    pub content: String,
}

/// Default fingerprint for synthetic symbols: the first four bytes of a
/// SHA-256 digest as eight uppercase hex characters.
pub fn sha256_fingerprint(name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    digest[..4].iter().map(|b| format!("{:02X}", b)).collect()
}

/// Build the combined mappack document: an outer random block that
/// defines exactly one synthetic symbol per run, then an outer condition
/// block dispatching on that symbol to the matching map's content. The
/// fingerprint only has to be deterministic; [`sha256_fingerprint`] is
/// the stock choice.
pub fn synthesize<F>(entries: &[MapEntry], fingerprint: F) -> Result<Document, ReduceError>
where
    F: Fn(&str) -> String,
{
    if entries.is_empty() {
        return Err(ReduceError::NoMaps);
    }

    let symbols: Vec<String> = entries
        .iter()
        .map(|entry| synthetic_symbol(&entry.filename, &fingerprint))
        .collect();
    let weights = distribute_weights(entries.len());

    let branches = symbols
        .iter()
        .zip(&weights)
        .map(|(symbol, &weight)| Branch {
            weight,
            body: Document {
                nodes: vec![Node::Define(symbol.clone())],
            },
        })
        .collect();
    let selector = RandomBlock {
        lead: Document::empty(),
        branches,
    };

    let arms = entries
        .iter()
        .zip(&symbols)
        .enumerate()
        .map(|(i, (entry, symbol))| Arm {
            kind: if i == 0 { ArmKind::If } else { ArmKind::ElseIf },
            symbol: Some(symbol.clone()),
            body: Document {
                nodes: entry
                    .content
                    .lines()
                    .map(|line| Node::Line(line.to_string()))
                    .collect(),
            },
        })
        .collect();
    let dispatch = ConditionBlock { arms };

    Ok(Document {
        nodes: vec![Node::Random(selector), Node::Condition(dispatch)],
    })
}

/// Every map gets `100 / n`; the remainder is handed out one unit at a
/// time from the front. The weights sum to exactly 100 and no two differ
/// by more than one.
fn distribute_weights(n: usize) -> Vec<u32> {
    let n = n as u32;
    let base = 100 / n;
    let remainder = 100 - base * n;
    (0..n)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// A collision-resistant symbol unique to one filename: `MP`, then the
/// fingerprint uppercased, then the filename stem with everything
/// non-alphanumeric stripped, uppercased. The `MP` prefix keeps the
/// symbol from starting with a digit.
fn synthetic_symbol<F>(filename: &str, fingerprint: &F) -> String
where
    F: Fn(&str) -> String,
{
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename);
    let sanitized: String = stem
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    format!(
        "MP{}_{}",
        fingerprint(filename).to_uppercase(),
        sanitized.to_uppercase()
    )
}
