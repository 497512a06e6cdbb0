use std::collections::HashSet;

/// Symbols the host game defines before any map script runs: map-size
/// and game-mode tags. Conditions on these are always reachable.
pub const DEFAULT_SEED_SYMBOLS: &[&str] = &[
    "KING_OF_THE_HILL",
    "REGICIDE",
    "TINY_MAP",
    "SMALL_MAP",
    "MEDIUM_MAP",
    "LARGE_MAP",
    "HUGE_MAP",
    "GIGANTIC_MAP",
];

/// The set of symbols currently known to be defined. Read by arm
/// reachability checks and extended in place by `#define` discovery;
/// both happen in the same left-to-right pass, so a define only affects
/// conditions after it in document order.
///
/// Each document's reduction must start from a fresh copy of the seed
/// set; defines never leak between documents.
#[derive(Debug, Clone, Default)]
pub struct SymbolEnvironment {
    symbols: HashSet<String>,
}

impl SymbolEnvironment {
    /// An empty environment with no seed symbols.
    pub fn new() -> Self {
        SymbolEnvironment::default()
    }

    /// An environment seeded with a caller-supplied symbol list.
    pub fn with_seeds<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SymbolEnvironment {
            symbols: seeds.into_iter().map(Into::into).collect(),
        }
    }

    /// An environment seeded with [`DEFAULT_SEED_SYMBOLS`].
    pub fn with_default_seeds() -> Self {
        Self::with_seeds(DEFAULT_SEED_SYMBOLS.iter().copied())
    }

    pub fn define(&mut self, name: impl Into<String>) {
        self.symbols.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains(name)
    }
}
