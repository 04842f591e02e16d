//! Integration tests for rename batches over a whole document
//!
//! Covers the editor's main flow: build the index once, apply a command
//! batch, and read the rewritten texts back out of the document.

use feelscope::dmn_model::{BoxedExpression, DmnDefinitions, DrgElement};
use feelscope::variables::{apply_batch, DocumentCommand, VariablesError};
use feelscope::FeelVariables;

/// Input "Age" plus two decisions: "Check" reads Age, "Offer" reads both.
fn loan_model() -> DmnDefinitions {
    serde_json::from_value(serde_json::json!({
        "id": "_DEFS",
        "name": "loan",
        "namespace": "https://example.com/loan",
        "drgElement": [
            { "element": "inputData", "id": "_AGE", "name": "Age",
              "variable": { "id": "_AGE-vi", "name": "Age", "typeRef": "number" } },
            { "element": "decision", "id": "_CHECK", "name": "Check",
              "variable": { "id": "_CHECK-vi", "name": "Check", "typeRef": "boolean" },
              "expression": { "element": "literalExpression", "id": "_T1",
                              "text": "Age > 18" } },
            { "element": "decision", "id": "_OFFER", "name": "Offer",
              "variable": { "id": "_OFFER-vi", "name": "Offer" },
              "expression": { "element": "literalExpression", "id": "_T2",
                              "text": "if Check then Age * 2 else 0" } }
        ]
    }))
    .unwrap_or_else(|e| panic!("fixture does not deserialize: {e}"))
}

fn literal_text<'a>(definitions: &'a DmnDefinitions, decision_id: &str) -> &'a str {
    match definitions.find_drg_element(decision_id) {
        Some(DrgElement::Decision(decision)) => match &decision.expression {
            Some(BoxedExpression::Literal(literal)) => &literal.text,
            other => panic!("decision '{decision_id}' logic is not a literal: {other:?}"),
        },
        other => panic!("'{decision_id}' is not a decision: {other:?}"),
    }
}

fn rename(element_id: &str, new_name: &str) -> DocumentCommand {
    DocumentCommand::RenameDrgElement {
        element_id: element_id.to_string(),
        new_name: new_name.to_string(),
    }
}

#[test]
fn test_rename_input_rewrites_dependent_literals() {
    let mut definitions = loan_model();
    let mut variables = FeelVariables::new(&definitions, &[])
        .unwrap_or_else(|e| panic!("facade build failed: {e}"));

    apply_batch(&mut variables, &mut definitions, vec![rename("_AGE", "Years")]).unwrap();

    assert_eq!(literal_text(&definitions, "_CHECK"), "Years > 18");
    assert_eq!(
        literal_text(&definitions, "_OFFER"),
        "if Check then Years * 2 else 0"
    );
}

#[test]
fn test_rename_updates_element_and_variable_names() {
    let mut definitions = loan_model();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();

    apply_batch(&mut variables, &mut definitions, vec![rename("_AGE", "Years")]).unwrap();

    let element = definitions.find_drg_element("_AGE").unwrap();
    assert_eq!(element.name(), "Years");
    assert_eq!(element.variable().unwrap().name, "Years");
}

#[test]
fn test_rename_decision_rewrites_downstream_texts() {
    let mut definitions = loan_model();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();

    apply_batch(
        &mut variables,
        &mut definitions,
        vec![rename("_CHECK", "Eligible")],
    )
    .unwrap();

    assert_eq!(
        literal_text(&definitions, "_OFFER"),
        "if Eligible then Age * 2 else 0"
    );
    // The renamed decision's own logic does not reference itself.
    assert_eq!(literal_text(&definitions, "_CHECK"), "Age > 18");
}

#[test]
fn test_two_renames_in_one_batch() {
    let mut definitions = loan_model();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();

    apply_batch(
        &mut variables,
        &mut definitions,
        vec![rename("_AGE", "Years"), rename("_CHECK", "Eligible")],
    )
    .unwrap();

    assert_eq!(
        literal_text(&definitions, "_OFFER"),
        "if Eligible then Years * 2 else 0"
    );
}

#[test]
fn test_rename_trims_surrounding_whitespace() {
    let mut definitions = loan_model();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();

    apply_batch(
        &mut variables,
        &mut definitions,
        vec![rename("_AGE", "  Years  ")],
    )
    .unwrap();

    assert_eq!(definitions.find_drg_element("_AGE").unwrap().name(), "Years");
    assert_eq!(literal_text(&definitions, "_CHECK"), "Years > 18");
}

#[test]
fn test_all_space_rename_is_dropped() {
    let mut definitions = loan_model();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();

    apply_batch(&mut variables, &mut definitions, vec![rename("_AGE", "   ")]).unwrap();

    assert_eq!(definitions.find_drg_element("_AGE").unwrap().name(), "Age");
    assert_eq!(literal_text(&definitions, "_CHECK"), "Age > 18");
}

#[test]
fn test_update_variable_type_reaches_the_document() {
    let mut definitions = loan_model();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();

    apply_batch(
        &mut variables,
        &mut definitions,
        vec![DocumentCommand::UpdateVariableType {
            element_id: "_AGE".to_string(),
            type_ref: Some("years and months duration".to_string()),
        }],
    )
    .unwrap();

    let variable = definitions.find_drg_element("_AGE").unwrap().variable().unwrap();
    assert_eq!(variable.type_ref.as_deref(), Some("years and months duration"));
    // Types never appear inside FEEL texts.
    assert_eq!(literal_text(&definitions, "_CHECK"), "Age > 18");

    // Clearing works the same way.
    apply_batch(
        &mut variables,
        &mut definitions,
        vec![DocumentCommand::UpdateVariableType {
            element_id: "_AGE".to_string(),
            type_ref: None,
        }],
    )
    .unwrap();
    let variable = definitions.find_drg_element("_AGE").unwrap().variable().unwrap();
    assert_eq!(variable.type_ref, None);
}

/// A failing command stops the batch, but everything applied before it is
/// still flushed so the document and the repository agree.
#[test]
fn test_failing_batch_flushes_applied_prefix() {
    let mut definitions = loan_model();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();

    let outcome = apply_batch(
        &mut variables,
        &mut definitions,
        vec![
            rename("_AGE", "Years"),
            rename("_MISSING", "x"),
            rename("_CHECK", "Never Applied"),
        ],
    );

    assert!(matches!(
        outcome,
        Err(VariablesError::UnknownVariable { .. })
    ));
    assert_eq!(literal_text(&definitions, "_CHECK"), "Years > 18");
    assert_eq!(definitions.find_drg_element("_CHECK").unwrap().name(), "Check");
}

/// AddVariable/RemoveVariable shape what completion surfaces can see.
#[test]
fn test_add_and_remove_variable_commands() {
    let mut definitions = loan_model();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();

    apply_batch(
        &mut variables,
        &mut definitions,
        vec![DocumentCommand::AddVariable {
            uuid: "_BONUS".to_string(),
            name: "Bonus".to_string(),
            parent_scope: "_DEFS".to_string(),
            child_scope: None,
        }],
    )
    .unwrap();
    let names: Vec<&str> = variables
        .available_variables("_DEFS")
        .iter()
        .map(|v| v.name())
        .collect();
    assert!(names.contains(&"Bonus"));

    apply_batch(
        &mut variables,
        &mut definitions,
        vec![DocumentCommand::RemoveVariable {
            uuid: "_BONUS".to_string(),
            remove_children: false,
        }],
    )
    .unwrap();
    let names: Vec<&str> = variables
        .available_variables("_DEFS")
        .iter()
        .map(|v| v.name())
        .collect();
    assert!(!names.contains(&"Bonus"));
}
