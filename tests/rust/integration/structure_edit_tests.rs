//! Integration tests for structural edits keeping the scope tree in step
//!
//! Each test mutates a boxed expression through the sanctioned edit path and
//! then checks both sides: the document shape and the variable repository.

use feelscope::dmn_model::{BoxedExpression, DmnDefinitions, DrgElement, FunctionExpression};
use feelscope::mutations::context::{add_context_entry, remove_context_entry};
use feelscope::mutations::decision_table::{
    add_decision_table_output, duplicate_decision_table_rule, remove_decision_table_rule,
};
use feelscope::mutations::relation::{
    add_relation_column, remove_relation_column, remove_relation_row,
};
use feelscope::mutations::function::rename_function_parameter;
use feelscope::FeelVariables;

fn model(elements: serde_json::Value, widths: serde_json::Value) -> DmnDefinitions {
    serde_json::from_value(serde_json::json!({
        "id": "_DEFS",
        "name": "demo",
        "namespace": "https://example.com/demo",
        "drgElement": elements,
        "widths": widths
    }))
    .unwrap_or_else(|e| panic!("fixture does not deserialize: {e}"))
}

/// Decision "_D" holding a two-column, two-row relation "_REL".
fn people_relation() -> DmnDefinitions {
    model(
        serde_json::json!([
            { "element": "decision", "id": "_D", "name": "People",
              "variable": { "id": "_D-vi", "name": "People" },
              "expression": {
                  "element": "relation", "id": "_REL",
                  "columns": [
                      { "id": "_C1", "name": "name", "typeRef": "string" },
                      { "id": "_C2", "name": "age", "typeRef": "number" }
                  ],
                  "rows": [
                      { "id": "_R1", "cells": [
                          { "id": "_R1C1", "text": "\"Ada\"" },
                          { "id": "_R1C2", "text": "30" } ] },
                      { "id": "_R2", "cells": [
                          { "id": "_R2C1", "text": "\"Grace\"" },
                          { "id": "_R2C2", "text": "31" } ] }
                  ]
              } }
        ]),
        serde_json::json!({ "_REL": [60.0, 100.0, 100.0] }),
    )
}

/// Decision "_CTX" holding a context: "Discount" (a nested relation),
/// "Extra", and the result entry.
fn pricing_context() -> DmnDefinitions {
    model(
        serde_json::json!([
            { "element": "decision", "id": "_CTX", "name": "Pricing",
              "variable": { "id": "_CTX-vi", "name": "Pricing" },
              "expression": {
                  "element": "context", "id": "_C",
                  "entries": [
                      { "id": "_E1",
                        "variable": { "id": "_V1", "name": "Discount" },
                        "expression": {
                            "element": "relation", "id": "_NREL",
                            "columns": [ { "id": "_NC1", "name": "rate" } ],
                            "rows": [ { "id": "_NR1", "cells": [
                                { "id": "_NCELL", "text": "0.1" } ] } ]
                        } },
                      { "id": "_E2",
                        "variable": { "id": "_V2", "name": "Extra" },
                        "expression": { "element": "literalExpression",
                                        "id": "_T2", "text": "1" } },
                      { "id": "_ERES",
                        "expression": { "element": "literalExpression",
                                        "id": "_TRES", "text": "Discount" } }
                  ]
              } }
        ]),
        serde_json::json!({}),
    )
}

/// Input "Age" plus decision "_DT_D" holding a two-input, one-output table.
fn category_table() -> DmnDefinitions {
    model(
        serde_json::json!([
            { "element": "inputData", "id": "_AGE", "name": "Age",
              "variable": { "id": "_AGE-vi", "name": "Age", "typeRef": "number" } },
            { "element": "decision", "id": "_DT_D", "name": "Category",
              "variable": { "id": "_DT_D-vi", "name": "Category" },
              "expression": {
                  "element": "decisionTable", "id": "_DT", "hitPolicy": "UNIQUE",
                  "input": [
                      { "id": "_IN1", "inputExpression": { "id": "_INX1", "text": "Age" } },
                      { "id": "_IN2", "inputExpression": { "id": "_INX2", "text": "Age * 2" } }
                  ],
                  "output": [ { "id": "_OUT1", "name": "category" } ],
                  "rules": [
                      { "id": "_RULE1",
                        "inputEntries": [
                            { "id": "_IE1", "text": ">= 18" },
                            { "id": "_IE2", "text": "-" } ],
                        "outputEntries": [ { "id": "_OE1", "text": "\"adult\"" } ] }
                  ]
              } }
        ]),
        serde_json::json!({ "_DT": [60.0, 80.0, 90.0, 110.0] }),
    )
}

/// BKM "Fee" with one FEEL parameter and a literal body.
fn fee_bkm() -> DmnDefinitions {
    model(
        serde_json::json!([
            { "element": "businessKnowledgeModel", "id": "_BKM", "name": "Fee",
              "variable": { "id": "_BKM-vi", "name": "Fee" },
              "encapsulatedLogic": {
                  "id": "_FN", "kind": "FEEL",
                  "parameters": [ { "id": "_P1", "name": "amount" } ],
                  "body": { "element": "literalExpression", "id": "_BODY",
                            "text": "amount * 2" }
              } }
        ]),
        serde_json::json!({}),
    )
}

fn decision_logic_mut<'a>(elements: &'a mut [DrgElement], id: &str) -> &'a mut BoxedExpression {
    let element = elements
        .iter_mut()
        .find(|el| el.id() == id)
        .unwrap_or_else(|| panic!("no element '{id}' in fixture"));
    match element {
        DrgElement::Decision(decision) => decision
            .expression
            .as_mut()
            .unwrap_or_else(|| panic!("decision '{id}' has no logic")),
        other => panic!("'{id}' is not a decision: {other:?}"),
    }
}

fn bkm_logic_mut<'a>(elements: &'a mut [DrgElement], id: &str) -> &'a mut FunctionExpression {
    let element = elements
        .iter_mut()
        .find(|el| el.id() == id)
        .unwrap_or_else(|| panic!("no element '{id}' in fixture"));
    match element {
        DrgElement::BusinessKnowledgeModel(bkm) => bkm
            .encapsulated_logic
            .as_mut()
            .unwrap_or_else(|| panic!("BKM '{id}' has no logic")),
        other => panic!("'{id}' is not a BKM: {other:?}"),
    }
}

fn visible_names(variables: &FeelVariables, scope: &str) -> Vec<String> {
    variables
        .available_variables(scope)
        .iter()
        .map(|v| v.name().to_string())
        .collect()
}

#[test]
fn test_add_relation_column_keeps_rows_rectangular() {
    let mut definitions = people_relation();
    let mut variables = FeelVariables::new(&definitions, &[])
        .unwrap_or_else(|e| panic!("facade build failed: {e}"));

    let DmnDefinitions {
        drg_element,
        widths,
        ..
    } = &mut definitions;
    let BoxedExpression::Relation(relation) = decision_logic_mut(drg_element, "_D") else {
        panic!("fixture logic is not a relation");
    };

    let column_id =
        add_relation_column(relation, "_D", 1, variables.repository_mut(), widths).unwrap();

    assert_eq!(relation.columns.len(), 3);
    assert_eq!(relation.columns[1].id, column_id);
    assert_eq!(relation.columns[1].name, "column-3");
    for row in &relation.rows {
        assert_eq!(row.cells.len(), 3);
        assert_eq!(row.cells[1].text, "");
    }
    assert_eq!(widths["_REL"], vec![60.0, 100.0, 100.0, 100.0]);

    // The fresh cell is tracked in the relation's scope: its text resolves
    // sibling columns, and the new column itself is visible there.
    let fresh_cell = relation.rows[0].cells[1].id.clone();
    let scanned = variables.parse(&fresh_cell, "age + 1");
    assert_eq!(scanned.variables()[0].source.as_deref(), Some("_C2"));
    assert!(visible_names(&variables, "_D").contains(&"column-3".to_string()));
}

#[test]
fn test_remove_relation_column_drops_registrations() {
    let mut definitions = people_relation();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();
    assert!(variables.expressions().contains_key("_R1C1"));

    let DmnDefinitions {
        drg_element,
        widths,
        ..
    } = &mut definitions;
    let BoxedExpression::Relation(relation) = decision_logic_mut(drg_element, "_D") else {
        panic!("fixture logic is not a relation");
    };

    remove_relation_column(relation, 0, variables.repository_mut(), widths).unwrap();

    assert_eq!(relation.columns.len(), 1);
    assert_eq!(relation.columns[0].name, "age");
    for row in &relation.rows {
        assert_eq!(row.cells.len(), 1);
    }
    assert_eq!(widths["_REL"], vec![60.0, 100.0]);

    assert!(!visible_names(&variables, "_D").contains(&"name".to_string()));
    // The removed cells' cached texts are gone with them.
    assert!(!variables.expressions().contains_key("_R1C1"));
    assert!(variables.expressions().contains_key("_R1C2"));
}

#[test]
fn test_last_row_and_last_rule_survive_removal() {
    let mut definitions = people_relation();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();
    {
        let DmnDefinitions { drg_element, .. } = &mut definitions;
        let BoxedExpression::Relation(relation) = decision_logic_mut(drg_element, "_D") else {
            panic!("fixture logic is not a relation");
        };
        remove_relation_row(relation, 0, variables.repository_mut()).unwrap();
        // Removing the now-last row is refused quietly.
        remove_relation_row(relation, 0, variables.repository_mut()).unwrap();
        assert_eq!(relation.rows.len(), 1);
        assert_eq!(relation.rows[0].id, "_R2");
    }

    let mut definitions = category_table();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();
    let DmnDefinitions { drg_element, .. } = &mut definitions;
    let BoxedExpression::DecisionTable(table) = decision_logic_mut(drg_element, "_DT_D") else {
        panic!("fixture logic is not a decision table");
    };
    remove_decision_table_rule(table, 0, variables.repository_mut()).unwrap();
    assert_eq!(table.rules.len(), 1);
}

#[test]
fn test_add_context_entry_before_the_result() {
    let mut definitions = pricing_context();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();

    let DmnDefinitions { drg_element, .. } = &mut definitions;
    let BoxedExpression::Context(context) = decision_logic_mut(drg_element, "_CTX") else {
        panic!("fixture logic is not a context");
    };

    let variable_id = add_context_entry(context, "_CTX", 2, variables.repository_mut()).unwrap();

    assert_eq!(context.entries.len(), 4);
    let added = &context.entries[2];
    let item = added.variable.as_ref().unwrap();
    assert_eq!(item.id, variable_id);
    assert_eq!(item.name, "ContextEntry-3");
    assert!(matches!(added.expression, BoxedExpression::Undefined));
    // The result entry stays last.
    assert!(context.entries[3].variable.is_none());

    let names = visible_names(&variables, "_CTX");
    assert!(names.contains(&"ContextEntry-3".to_string()));
    assert!(names.contains(&"Discount".to_string()));
}

#[test]
fn test_remove_context_entry_unregisters_nested_content() {
    let mut definitions = pricing_context();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();
    assert!(variables.expressions().contains_key("_NCELL"));

    let DmnDefinitions { drg_element, .. } = &mut definitions;
    let BoxedExpression::Context(context) = decision_logic_mut(drg_element, "_CTX") else {
        panic!("fixture logic is not a context");
    };

    remove_context_entry(context, 0, variables.repository_mut()).unwrap();

    assert_eq!(context.entries.len(), 2);
    assert_eq!(
        context.entries[0].variable.as_ref().map(|v| v.name.as_str()),
        Some("Extra")
    );

    let names = visible_names(&variables, "_CTX");
    assert!(!names.contains(&"Discount".to_string()));
    assert!(names.contains(&"Extra".to_string()));
    // Everything nested under the entry went with it.
    assert!(!variables.expressions().contains_key("_NCELL"));
}

#[test]
fn test_add_output_column_slots_width_after_inputs() {
    let mut definitions = category_table();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();

    let DmnDefinitions {
        drg_element,
        widths,
        ..
    } = &mut definitions;
    let BoxedExpression::DecisionTable(table) = decision_logic_mut(drg_element, "_DT_D") else {
        panic!("fixture logic is not a decision table");
    };

    add_decision_table_output(table, "_DT_D", 0, variables.repository_mut(), widths).unwrap();

    assert_eq!(table.output.len(), 2);
    assert_eq!(table.output[0].name.as_deref(), Some("output-2"));
    assert_eq!(table.output[1].name.as_deref(), Some("category"));
    for rule in &table.rules {
        assert_eq!(rule.output_entries.len(), 2);
        assert_eq!(rule.output_entries[0].text, "");
    }
    // Data columns run inputs first, so the new output lands between the
    // second input's slot and the old output's slot.
    assert_eq!(widths["_DT"], vec![60.0, 80.0, 90.0, 100.0, 110.0]);
}

#[test]
fn test_duplicate_rule_gets_fresh_registered_cells() {
    let mut definitions = category_table();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();

    let DmnDefinitions { drg_element, .. } = &mut definitions;
    let BoxedExpression::DecisionTable(table) = decision_logic_mut(drg_element, "_DT_D") else {
        panic!("fixture logic is not a decision table");
    };

    duplicate_decision_table_rule(table, "_DT_D", 0, variables.repository_mut()).unwrap();

    assert_eq!(table.rules.len(), 2);
    assert_ne!(table.rules[1].id, table.rules[0].id);
    assert_ne!(table.rules[1].input_entries[0].id, "_IE1");
    assert_eq!(table.rules[1].input_entries[0].text, ">= 18");
    assert_eq!(table.rules[1].output_entries[0].text, "\"adult\"");

    // The copied cells are registered: their texts resolve in table scope.
    let fresh_entry = table.rules[1].input_entries[0].id.clone();
    let scanned = variables.parse(&fresh_entry, "Age");
    assert_eq!(scanned.variables()[0].source.as_deref(), Some("_AGE"));
}

#[test]
fn test_function_parameter_rename_rewrites_cached_body() {
    let mut definitions = fee_bkm();
    let mut variables = FeelVariables::new(&definitions, &[]).unwrap();
    // Function bodies are parsed on demand, not at build time.
    variables.parse("_BODY", "amount * 2");

    {
        let DmnDefinitions { drg_element, .. } = &mut definitions;
        let logic = bkm_logic_mut(drg_element, "_BKM");
        rename_function_parameter(logic, 0, "base", variables.repository_mut()).unwrap();
        assert_eq!(logic.parameters[0].name, "base");
    }

    assert_eq!(
        variables.expressions()["_BODY"].full_expression(),
        "base * 2"
    );

    // The flush writes the respliced body back into the document.
    variables.apply_changes_to_definition(&mut definitions);
    let DmnDefinitions { drg_element, .. } = &mut definitions;
    let logic = bkm_logic_mut(drg_element, "_BKM");
    match logic.body.as_deref() {
        Some(BoxedExpression::Literal(literal)) => assert_eq!(literal.text, "base * 2"),
        other => panic!("body is not a literal: {other:?}"),
    }
}
