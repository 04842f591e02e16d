//! Integration tests for imported models and alias-qualified resolution
//!
//! An importing document sees external variables only through their alias;
//! these tests pin down resolution, visibility, and the read-only rules.

use feelscope::dmn_model::DmnDefinitions;
use feelscope::variables::{apply_batch, DocumentCommand, VariablesError};
use feelscope::FeelVariables;

const TAX_NS: &str = "https://example.com/tax";
const FX_NS: &str = "https://example.com/fx";

fn tax_model() -> DmnDefinitions {
    serde_json::from_value(serde_json::json!({
        "id": "_TAXDEFS",
        "name": "tax",
        "namespace": TAX_NS,
        "drgElement": [
            { "element": "inputData", "id": "_RATE", "name": "Rate",
              "variable": { "id": "_RATE-vi", "name": "Rate", "typeRef": "number" } }
        ]
    }))
    .unwrap_or_else(|e| panic!("tax fixture does not deserialize: {e}"))
}

fn fx_model() -> DmnDefinitions {
    serde_json::from_value(serde_json::json!({
        "id": "_FXDEFS",
        "name": "fx",
        "namespace": FX_NS,
        "drgElement": [
            { "element": "inputData", "id": "_EUR", "name": "Euro Rate",
              "variable": { "id": "_EUR-vi", "name": "Euro Rate" } }
        ]
    }))
    .unwrap_or_else(|e| panic!("fx fixture does not deserialize: {e}"))
}

/// "Amount * tax.Rate" under one import alias, plus optionally a second
/// import for alias-collision cases.
fn invoice_model(with_fx: bool) -> DmnDefinitions {
    let mut imports = vec![serde_json::json!(
        { "id": "_IMP1", "name": "tax", "namespace": TAX_NS }
    )];
    if with_fx {
        imports.push(serde_json::json!(
            { "id": "_IMP2", "name": "fx", "namespace": FX_NS }
        ));
    }
    serde_json::from_value(serde_json::json!({
        "id": "_DEFS",
        "name": "invoice",
        "namespace": "https://example.com/invoice",
        "import": imports,
        "drgElement": [
            { "element": "inputData", "id": "_AMT", "name": "Amount",
              "variable": { "id": "_AMT-vi", "name": "Amount", "typeRef": "number" } },
            { "element": "decision", "id": "_TOTAL", "name": "Total",
              "variable": { "id": "_TOTAL-vi", "name": "Total" },
              "expression": { "element": "literalExpression", "id": "_TEXT",
                              "text": "Amount * tax.Rate" } }
        ]
    }))
    .unwrap_or_else(|e| panic!("invoice fixture does not deserialize: {e}"))
}

fn imported_rate_key() -> String {
    format!("{}#{}", TAX_NS, "_RATE")
}

#[test]
fn test_qualified_reference_resolves_to_imported_variable() {
    let definitions = invoice_model(false);
    let variables = FeelVariables::new(&definitions, &[tax_model()])
        .unwrap_or_else(|e| panic!("facade build failed: {e}"));

    let occurrences = variables.expressions()["_TEXT"].variables();
    assert_eq!(occurrences.len(), 2);
    assert_eq!(occurrences[0].text, "Amount");
    assert_eq!(occurrences[0].source.as_deref(), Some("_AMT"));
    assert_eq!(occurrences[1].text, "tax.Rate");
    assert_eq!(occurrences[1].source.as_deref(), Some(imported_rate_key().as_str()));
}

#[test]
fn test_imported_names_are_only_reachable_through_the_alias() {
    let definitions = invoice_model(false);
    let mut variables = FeelVariables::new(&definitions, &[tax_model()]).unwrap();

    let names: Vec<&str> = variables
        .available_variables("_DEFS")
        .iter()
        .map(|v| v.name())
        .collect();
    assert!(names.contains(&"Amount"));
    assert!(names.contains(&"Total"));
    assert!(!names.contains(&"Rate"));
    assert!(!names.contains(&"tax.Rate"));

    // A bare "Rate" does not resolve; only the qualified form does.
    let bare = variables.parse("_DEFS", "Rate");
    assert_eq!(bare.variables()[0].source, None);
}

#[test]
fn test_rename_import_changes_future_resolution_only() {
    let mut definitions = invoice_model(false);
    let mut variables = FeelVariables::new(&definitions, &[tax_model()]).unwrap();

    apply_batch(
        &mut variables,
        &mut definitions,
        vec![DocumentCommand::RenameImport {
            old_alias: "tax".to_string(),
            new_alias: "vat".to_string(),
        }],
    )
    .unwrap();

    assert_eq!(definitions.imports[0].name, "vat");
    // The cached text keeps its old qualifier until the user edits it.
    assert_eq!(
        variables.expressions()["_TEXT"].full_expression(),
        "Amount * tax.Rate"
    );

    let fresh = variables.parse("_DEFS", "vat.Rate + 1");
    assert_eq!(fresh.variables()[0].source.as_deref(), Some(imported_rate_key().as_str()));

    let stale = variables.parse("_DEFS", "tax.Rate");
    assert!(stale.variables().iter().all(|o| o.source.is_none()));
}

#[test]
fn test_rename_import_to_taken_alias_is_rejected() {
    let mut definitions = invoice_model(true);
    let mut variables =
        FeelVariables::new(&definitions, &[tax_model(), fx_model()]).unwrap();

    let outcome = apply_batch(
        &mut variables,
        &mut definitions,
        vec![DocumentCommand::RenameImport {
            old_alias: "tax".to_string(),
            new_alias: "fx".to_string(),
        }],
    );

    assert!(matches!(outcome, Err(VariablesError::DuplicateImport { .. })));
    assert_eq!(definitions.imports[0].name, "tax");
}

#[test]
fn test_unknown_alias_rename_is_an_error() {
    let mut definitions = invoice_model(false);
    let mut variables = FeelVariables::new(&definitions, &[tax_model()]).unwrap();

    let outcome = apply_batch(
        &mut variables,
        &mut definitions,
        vec![DocumentCommand::RenameImport {
            old_alias: "customs".to_string(),
            new_alias: "x".to_string(),
        }],
    );
    assert!(matches!(outcome, Err(VariablesError::UnknownImport { .. })));
}

/// Imported variables change in their own model, never from here.
#[test]
fn test_imported_variables_are_read_only() {
    let definitions = invoice_model(false);
    let mut variables = FeelVariables::new(&definitions, &[tax_model()]).unwrap();

    let err = variables
        .rename_variable(&imported_rate_key(), "Levy")
        .unwrap_err();
    assert!(matches!(err, VariablesError::ImportedVariable { .. }));

    let err = variables
        .update_variable_type(&imported_rate_key(), Some("string".to_string()))
        .unwrap_err();
    assert!(matches!(err, VariablesError::ImportedVariable { .. }));

    // The text scanned against the import is untouched.
    assert_eq!(
        variables.expressions()["_TEXT"].full_expression(),
        "Amount * tax.Rate"
    );
}

/// The same element id may appear in two models; namespacing keeps the
/// records apart.
#[test]
fn test_shared_element_ids_across_models_do_not_collide() {
    let mut external = tax_model();
    // Give the external model an element id the local model also uses.
    external.drg_element[0] = serde_json::from_value(serde_json::json!(
        { "element": "inputData", "id": "_AMT", "name": "Rate",
          "variable": { "id": "_AMT-vi", "name": "Rate" } }
    ))
    .unwrap();

    let definitions = invoice_model(false);
    let mut variables = FeelVariables::new(&definitions, &[external]).unwrap();

    let scanned = variables.parse("_DEFS", "Amount * tax.Rate");
    assert_eq!(scanned.variables()[0].source.as_deref(), Some("_AMT"));
    assert_eq!(
        scanned.variables()[1].source.as_deref(),
        Some(format!("{}#{}", TAX_NS, "_AMT").as_str())
    );
}
