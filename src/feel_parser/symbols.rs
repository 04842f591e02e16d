//! Scanner input and output types.

/// One matchable name: the text the scanner looks for and the repository key
/// of the variable it stands for. Qualified imports arrive pre-joined
/// (`"tax.Rate"`), which makes the atomicity rule fall out of plain matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub text: String,
    pub key: String,
}

impl SymbolEntry {
    pub fn new(text: impl Into<String>, key: impl Into<String>) -> Self {
        SymbolEntry {
            text: text.into(),
            key: key.into(),
        }
    }
}

/// The names visible from one scope, prepared for longest-match scanning.
///
/// Entries are supplied in priority order (nearest scope first); when two
/// scopes declare the same name the earliest entry wins, which is exactly the
/// lexical-shadowing rule. After dedup the table is ordered by descending
/// name length so the scanner's first hit is the longest hit.
#[derive(Debug, Clone, Default)]
pub struct ScopeSymbols {
    entries: Vec<SymbolEntry>,
}

impl ScopeSymbols {
    pub fn new(prioritized: Vec<SymbolEntry>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut entries: Vec<SymbolEntry> = prioritized
            .into_iter()
            .filter(|entry| !entry.text.is_empty() && seen.insert(entry.text.clone()))
            .collect();
        // Stable sort: equal lengths keep their priority order.
        entries.sort_by(|a, b| b.text.len().cmp(&a.text.len()));
        ScopeSymbols { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// One variable-reference occurrence found in a FEEL text.
///
/// `start_index` is a byte offset into the scanned text. `length` and `text`
/// are the span as matched at scan time; the rename engine works from the
/// referenced variable's current name instead, so these two are diagnostic.
/// `source` is the repository key of the resolved variable, `None` for an
/// unresolved candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeelOccurrence {
    pub start_index: usize,
    pub length: usize,
    pub text: String,
    pub source: Option<String>,
}
