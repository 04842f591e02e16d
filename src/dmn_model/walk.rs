//! Text-slot walks over the boxed-expression tree.
//!
//! Two walks with different coverage, both exhaustive over the variant set:
//!
//! - [`visit_tracked_texts`] visits the FEEL texts that participate in rename
//!   tracking. It recurses through contexts, relations, decision tables,
//!   lists, and invocation bindings, but never descends into a function body:
//!   a FEEL body is its own scope root, and Java/PMML bodies are opaque.
//! - [`visit_all_texts_mut`] visits every text slot, function bodies included.
//!   The flush step uses it so that a body text that was parsed explicitly can
//!   still be written back.

use super::boxed::BoxedExpression;
use super::document::{DmnDefinitions, DrgElement};

/// Visit `(element id, text)` for every tracked FEEL text under `expr`.
pub fn visit_tracked_texts<'a, F>(expr: &'a BoxedExpression, f: &mut F)
where
    F: FnMut(&'a str, &'a str),
{
    match expr {
        BoxedExpression::Literal(literal) => f(&literal.id, &literal.text),
        BoxedExpression::Context(context) => {
            for entry in &context.entries {
                visit_tracked_texts(&entry.expression, f);
            }
        }
        BoxedExpression::Relation(relation) => {
            for row in &relation.rows {
                for cell in &row.cells {
                    f(&cell.id, &cell.text);
                }
            }
        }
        BoxedExpression::DecisionTable(table) => {
            for input in &table.input {
                f(&input.input_expression.id, &input.input_expression.text);
            }
            for rule in &table.rules {
                for entry in &rule.input_entries {
                    f(&entry.id, &entry.text);
                }
                for entry in &rule.output_entries {
                    f(&entry.id, &entry.text);
                }
            }
        }
        BoxedExpression::Invocation(invocation) => {
            for binding in &invocation.bindings {
                visit_tracked_texts(&binding.expression, f);
            }
        }
        BoxedExpression::List(list) => {
            for item in &list.items {
                visit_tracked_texts(item, f);
            }
        }
        BoxedExpression::Function(_) => {}
        BoxedExpression::Undefined => {}
    }
}

/// Visit every text slot under `expr` mutably, function bodies included.
pub fn visit_all_texts_mut<F>(expr: &mut BoxedExpression, f: &mut F)
where
    F: FnMut(&str, &mut String),
{
    match expr {
        BoxedExpression::Literal(literal) => f(&literal.id, &mut literal.text),
        BoxedExpression::Context(context) => {
            for entry in &mut context.entries {
                visit_all_texts_mut(&mut entry.expression, f);
            }
        }
        BoxedExpression::Relation(relation) => {
            for row in &mut relation.rows {
                for cell in &mut row.cells {
                    f(&cell.id, &mut cell.text);
                }
            }
        }
        BoxedExpression::DecisionTable(table) => {
            for input in &mut table.input {
                f(&input.input_expression.id, &mut input.input_expression.text);
            }
            for rule in &mut table.rules {
                for entry in &mut rule.input_entries {
                    f(&entry.id, &mut entry.text);
                }
                for entry in &mut rule.output_entries {
                    f(&entry.id, &mut entry.text);
                }
            }
        }
        BoxedExpression::Invocation(invocation) => {
            f(
                &invocation.invoked_function.id,
                &mut invocation.invoked_function.text,
            );
            for binding in &mut invocation.bindings {
                visit_all_texts_mut(&mut binding.expression, f);
            }
        }
        BoxedExpression::List(list) => {
            for item in &mut list.items {
                visit_all_texts_mut(item, f);
            }
        }
        BoxedExpression::Function(function) => {
            if let Some(body) = function.body.as_deref_mut() {
                visit_all_texts_mut(body, f);
            }
        }
        BoxedExpression::Undefined => {}
    }
}

/// Tracked texts of a whole document. Only decisions carry tracked expression
/// trees; a BKM's encapsulated logic is a function and stays out of tracking.
pub fn visit_document_tracked_texts<'a, F>(definitions: &'a DmnDefinitions, f: &mut F)
where
    F: FnMut(&'a str, &'a str),
{
    for element in &definitions.drg_element {
        if let DrgElement::Decision(decision) = element {
            if let Some(expression) = &decision.expression {
                visit_tracked_texts(expression, f);
            }
        }
    }
}

/// Every text slot of a whole document, mutably.
pub fn visit_document_texts_mut<F>(definitions: &mut DmnDefinitions, f: &mut F)
where
    F: FnMut(&str, &mut String),
{
    for element in &mut definitions.drg_element {
        match element {
            DrgElement::Decision(decision) => {
                if let Some(expression) = &mut decision.expression {
                    visit_all_texts_mut(expression, f);
                }
            }
            DrgElement::BusinessKnowledgeModel(bkm) => {
                if let Some(logic) = &mut bkm.encapsulated_logic {
                    if let Some(body) = logic.body.as_deref_mut() {
                        visit_all_texts_mut(body, f);
                    }
                }
            }
            _ => {}
        }
    }
}
