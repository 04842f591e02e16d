//! One tracked FEEL text and the in-place rename engine.

use crate::feel_parser::FeelOccurrence;

use super::variable::Variable;

/// A FEEL source text together with the variable occurrences found in it.
///
/// Occurrences are kept in ascending `start_index` order, exactly as the
/// scanner produced them, and are never re-sorted. The rename walk below
/// depends on that order to carry a running byte offset across the text.
#[derive(Debug, Clone)]
pub struct Expression {
    uuid: String,
    full_expression: String,
    variables: Vec<FeelOccurrence>,
}

impl Expression {
    pub fn new(uuid: impl Into<String>, full_expression: impl Into<String>) -> Self {
        Expression {
            uuid: uuid.into(),
            full_expression: full_expression.into(),
            variables: Vec::new(),
        }
    }

    /// Id of the document element holding this text.
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// The current text, including any renames applied since the last scan.
    pub fn full_expression(&self) -> &str {
        &self.full_expression
    }

    /// Occurrences as of the last scan. After a rename, `start_index` values
    /// are kept current but `text`/`length` of renamed spans reflect the old
    /// name until the text is scanned again.
    pub fn variables(&self) -> &[FeelOccurrence] {
        &self.variables
    }

    pub fn set_variables(&mut self, variables: Vec<FeelOccurrence>) {
        self.variables = variables;
    }

    /// Rewrite every occurrence of `renamed` to `new_name`.
    ///
    /// Single left-to-right pass: the running `offset` is added to every
    /// occurrence's `start_index` first, so positions stay correct for both
    /// renamed and untouched occurrences; matching spans are then spliced at
    /// the shifted position. The span length spliced out is the length of the
    /// variable's current (pre-rename) name, not the occurrence's recorded
    /// length. Each call handles exactly one variable; batch renames are one
    /// full pass per variable.
    pub fn rename_variable(&mut self, renamed: &Variable, new_name: &str) {
        let renamed_key = renamed.key();
        let old_len = renamed.name().len();
        let mut offset: isize = 0;
        for occurrence in &mut self.variables {
            let shifted = occurrence.start_index as isize + offset;
            debug_assert!(shifted >= 0, "occurrence shifted below zero");
            occurrence.start_index = shifted.max(0) as usize;
            if occurrence.source.as_deref() == Some(renamed_key.as_str()) {
                Self::splice(
                    &mut self.full_expression,
                    occurrence.start_index,
                    old_len,
                    new_name,
                );
                offset += new_name.len() as isize - old_len as isize;
            }
        }
    }

    /// Replace `old_len` bytes at `at` with `replacement`.
    ///
    /// Out-of-range or boundary-breaking positions can only come from an
    /// occurrence list that does not belong to this text; the splice is
    /// skipped rather than corrupting the text further.
    fn splice(text: &mut String, at: usize, old_len: usize, replacement: &str) {
        let end = at.saturating_add(old_len).min(text.len());
        if at > text.len() || !text.is_char_boundary(at) || !text.is_char_boundary(end) {
            debug_assert!(false, "splice outside char boundaries: {}..{}", at, end);
            return;
        }
        text.replace_range(at..end, replacement);
    }
}
