//! Decision-table clause and rule mutators.
//!
//! Clause edits are two-dimensional: inserting or deleting an input or output
//! clause touches every rule in the same call so entry counts keep tracking
//! the clause counts. Data columns run inputs first, then outputs, and share
//! one width entry keyed by the table id.
//!
//! Input clause expressions, rule input entries, and rule output entries are
//! all tracked texts, registered cell-style so their references resolve in
//! the table's containing scope.

use crate::dmn_model::{
    DecisionRule, DecisionTableExpression, InputClause, LiteralExpression, OutputClause,
    UnaryTests, WidthsMap,
};
use crate::utils::ids::generate_uuid;
use crate::utils::naming::next_available_prefixed_name;
use crate::variables::VariablesRepository;

use super::errors::MutationError;
use super::widths::{insert_width_slot, remove_width_slot};

/// The unary-tests text a fresh rule cell starts with; FEEL for "any value".
const ANY_VALUE: &str = "-";

/// Insert a rule at `at` with a `-` entry per input clause and an empty entry
/// per output clause, all registered under `scope`. Returns the rule's id.
pub fn add_decision_table_rule(
    table: &mut DecisionTableExpression,
    scope: &str,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<String, MutationError> {
    if at > table.rules.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "decision table rule",
            index: at,
            len: table.rules.len(),
        });
    }
    let mut input_entries = Vec::with_capacity(table.input.len());
    for _ in &table.input {
        let entry = UnaryTests {
            id: generate_uuid(),
            text: ANY_VALUE.to_string(),
        };
        repository.register_text_cell(&entry.id, scope)?;
        input_entries.push(entry);
    }
    let mut output_entries = Vec::with_capacity(table.output.len());
    for _ in &table.output {
        let entry = LiteralExpression {
            id: generate_uuid(),
            text: String::new(),
            type_ref: None,
        };
        repository.register_text_cell(&entry.id, scope)?;
        output_entries.push(entry);
    }
    let rule = DecisionRule {
        id: generate_uuid(),
        input_entries,
        output_entries,
    };
    let rule_id = rule.id.clone();
    table.rules.insert(at, rule);
    Ok(rule_id)
}

/// Remove the rule at `at` and its entry registrations. The last rule stays;
/// at the floor this logs and leaves the table untouched.
pub fn remove_decision_table_rule(
    table: &mut DecisionTableExpression,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    if table.rules.len() <= 1 {
        log::warn!("decision table {} keeps its last rule", table.id);
        return Ok(());
    }
    if at >= table.rules.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "decision table rule",
            index: at,
            len: table.rules.len(),
        });
    }
    for entry in &table.rules[at].input_entries {
        repository.remove_variable(&entry.id, true)?;
    }
    for entry in &table.rules[at].output_entries {
        repository.remove_variable(&entry.id, true)?;
    }
    table.rules.remove(at);
    Ok(())
}

/// Duplicate the rule at `at` directly below itself, entry texts kept, every
/// id fresh, each copied entry registered under `scope`.
pub fn duplicate_decision_table_rule(
    table: &mut DecisionTableExpression,
    scope: &str,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<String, MutationError> {
    if at >= table.rules.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "decision table rule",
            index: at,
            len: table.rules.len(),
        });
    }
    let mut copy = table.rules[at].clone();
    copy.id = generate_uuid();
    for entry in &mut copy.input_entries {
        entry.id = generate_uuid();
        repository.register_text_cell(&entry.id, scope)?;
    }
    for entry in &mut copy.output_entries {
        entry.id = generate_uuid();
        repository.register_text_cell(&entry.id, scope)?;
    }
    let rule_id = copy.id.clone();
    table.rules.insert(at + 1, copy);
    Ok(rule_id)
}

/// Insert an input clause at `at` with an empty header expression, give every
/// rule a `-` entry at the same index, and open a width slot. Returns the
/// clause's id.
pub fn add_decision_table_input(
    table: &mut DecisionTableExpression,
    scope: &str,
    at: usize,
    repository: &mut VariablesRepository,
    widths: &mut WidthsMap,
) -> Result<String, MutationError> {
    if at > table.input.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "decision table input",
            index: at,
            len: table.input.len(),
        });
    }
    let clause = InputClause {
        id: generate_uuid(),
        input_expression: LiteralExpression {
            id: generate_uuid(),
            text: String::new(),
            type_ref: None,
        },
    };
    repository.register_text_cell(&clause.input_expression.id, scope)?;
    for rule in &mut table.rules {
        let entry = UnaryTests {
            id: generate_uuid(),
            text: ANY_VALUE.to_string(),
        };
        repository.register_text_cell(&entry.id, scope)?;
        rule.input_entries.insert(at, entry);
    }
    let clause_id = clause.id.clone();
    table.input.insert(at, clause);
    insert_width_slot(widths, &table.id, at);
    Ok(clause_id)
}

/// Remove the input clause at `at`, the matching entry from every rule, their
/// registrations, and the width slot. The last input stays; at the floor this
/// logs and leaves the table untouched.
pub fn remove_decision_table_input(
    table: &mut DecisionTableExpression,
    at: usize,
    repository: &mut VariablesRepository,
    widths: &mut WidthsMap,
) -> Result<(), MutationError> {
    if table.input.len() <= 1 {
        log::warn!("decision table {} keeps its last input clause", table.id);
        return Ok(());
    }
    if at >= table.input.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "decision table input",
            index: at,
            len: table.input.len(),
        });
    }
    repository.remove_variable(&table.input[at].input_expression.id, true)?;
    for rule in &mut table.rules {
        if at < rule.input_entries.len() {
            repository.remove_variable(&rule.input_entries[at].id, true)?;
            rule.input_entries.remove(at);
        }
    }
    table.input.remove(at);
    remove_width_slot(widths, &table.id, at);
    Ok(())
}

/// Insert an output clause at `at` named `output-N`, give every rule an empty
/// entry at the same index, and open a width slot past the input section.
/// Returns the clause's id.
pub fn add_decision_table_output(
    table: &mut DecisionTableExpression,
    scope: &str,
    at: usize,
    repository: &mut VariablesRepository,
    widths: &mut WidthsMap,
) -> Result<String, MutationError> {
    if at > table.output.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "decision table output",
            index: at,
            len: table.output.len(),
        });
    }
    let taken: Vec<String> = table
        .output
        .iter()
        .filter_map(|clause| clause.name.clone())
        .collect();
    let clause = OutputClause {
        id: generate_uuid(),
        name: Some(next_available_prefixed_name(&taken, "output")),
        type_ref: None,
    };
    for rule in &mut table.rules {
        let entry = LiteralExpression {
            id: generate_uuid(),
            text: String::new(),
            type_ref: None,
        };
        repository.register_text_cell(&entry.id, scope)?;
        rule.output_entries.insert(at, entry);
    }
    let clause_id = clause.id.clone();
    let slot = table.input.len() + at;
    table.output.insert(at, clause);
    insert_width_slot(widths, &table.id, slot);
    Ok(clause_id)
}

/// Remove the output clause at `at`, the matching entry from every rule,
/// their registrations, and the width slot. The last output stays; at the
/// floor this logs and leaves the table untouched.
pub fn remove_decision_table_output(
    table: &mut DecisionTableExpression,
    at: usize,
    repository: &mut VariablesRepository,
    widths: &mut WidthsMap,
) -> Result<(), MutationError> {
    if table.output.len() <= 1 {
        log::warn!("decision table {} keeps its last output clause", table.id);
        return Ok(());
    }
    if at >= table.output.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "decision table output",
            index: at,
            len: table.output.len(),
        });
    }
    for rule in &mut table.rules {
        if at < rule.output_entries.len() {
            repository.remove_variable(&rule.output_entries[at].id, true)?;
            rule.output_entries.remove(at);
        }
    }
    table.output.remove(at);
    remove_width_slot(widths, &table.id, table.input.len() + at);
    Ok(())
}

/// Set an input clause's header expression text and re-scan it.
pub fn update_input_clause(
    table: &mut DecisionTableExpression,
    at: usize,
    text: &str,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    let len = table.input.len();
    let Some(clause) = table.input.get_mut(at) else {
        return Err(MutationError::IndexOutOfBounds {
            what: "decision table input",
            index: at,
            len,
        });
    };
    clause.input_expression.text = text.to_string();
    repository.parse(&clause.input_expression.id, text);
    Ok(())
}

/// Set one rule's input entry text (unary tests) and re-scan it.
pub fn update_rule_input(
    table: &mut DecisionTableExpression,
    rule: usize,
    at: usize,
    text: &str,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    let rules = table.rules.len();
    let Some(rule) = table.rules.get_mut(rule) else {
        return Err(MutationError::IndexOutOfBounds {
            what: "decision table rule",
            index: rule,
            len: rules,
        });
    };
    let entries = rule.input_entries.len();
    let Some(entry) = rule.input_entries.get_mut(at) else {
        return Err(MutationError::IndexOutOfBounds {
            what: "rule input entry",
            index: at,
            len: entries,
        });
    };
    entry.text = text.to_string();
    repository.parse(&entry.id, text);
    Ok(())
}

/// Set one rule's output entry text and re-scan it.
pub fn update_rule_output(
    table: &mut DecisionTableExpression,
    rule: usize,
    at: usize,
    text: &str,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    let rules = table.rules.len();
    let Some(rule) = table.rules.get_mut(rule) else {
        return Err(MutationError::IndexOutOfBounds {
            what: "decision table rule",
            index: rule,
            len: rules,
        });
    };
    let entries = rule.output_entries.len();
    let Some(entry) = rule.output_entries.get_mut(at) else {
        return Err(MutationError::IndexOutOfBounds {
            what: "rule output entry",
            index: at,
            len: entries,
        });
    };
    entry.text = text.to_string();
    repository.parse(&entry.id, text);
    Ok(())
}
