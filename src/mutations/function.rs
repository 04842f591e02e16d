//! Function definition mutators.
//!
//! FEEL functions declare their parameters as variables in the containing
//! scope, so parameter edits here run through the repository and renames
//! rewrite any cached texts referencing the parameter. Java and PMML
//! functions keep their parameters document-side only.
//!
//! A Java body is a fixed-shape context: one entry named `class`, one named
//! `method signature`, displayed in that order. A PMML body follows the same
//! shape with `document` and `model`. Either entry may be missing in an
//! authored model and is created on first edit; writing the fields rebuilds
//! the entry list in display order and drops strays.

use crate::dmn_model::{
    BoxedExpression, ContextEntry, ContextExpression, FunctionExpression, FunctionKind,
    InformationItem, LiteralExpression,
};
use crate::utils::ids::generate_uuid;
use crate::utils::naming::next_available_prefixed_name;
use crate::variables::VariablesRepository;

use super::errors::MutationError;

const JAVA_CLASS_FIELD: &str = "class";
const JAVA_METHOD_FIELD: &str = "method signature";
const PMML_DOCUMENT_FIELD: &str = "document";
const PMML_MODEL_FIELD: &str = "model";

/// Insert a parameter at `at` with a fresh `p-N` name. FEEL parameters
/// register as variables under `scope`; other kinds stay document-side.
/// Returns the parameter's id.
pub fn add_function_parameter(
    function: &mut FunctionExpression,
    scope: &str,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<String, MutationError> {
    if at > function.parameters.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "function parameter",
            index: at,
            len: function.parameters.len(),
        });
    }
    let taken: Vec<String> = function
        .parameters
        .iter()
        .map(|parameter| parameter.name.clone())
        .collect();
    let name = next_available_prefixed_name(&taken, "p");
    let parameter_id = generate_uuid();
    if function.kind == FunctionKind::Feel {
        repository.add_variable_to_context(&parameter_id, &name, scope, None)?;
    }
    function.parameters.insert(
        at,
        InformationItem {
            id: parameter_id.clone(),
            name,
            type_ref: None,
        },
    );
    Ok(parameter_id)
}

/// Remove the parameter at `at`. A function may end up with no parameters.
pub fn remove_function_parameter(
    function: &mut FunctionExpression,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    if at >= function.parameters.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "function parameter",
            index: at,
            len: function.parameters.len(),
        });
    }
    if function.kind == FunctionKind::Feel {
        repository.remove_variable(&function.parameters[at].id, false)?;
    }
    function.parameters.remove(at);
    Ok(())
}

/// Rename the parameter at `at`, trimming surrounding whitespace. For FEEL
/// functions the repository rewrite runs first, so cached body texts follow
/// the new name; an all-whitespace name is refused with a warning.
pub fn rename_function_parameter(
    function: &mut FunctionExpression,
    at: usize,
    name: &str,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    let len = function.parameters.len();
    let kind = function.kind;
    let Some(parameter) = function.parameters.get_mut(at) else {
        return Err(MutationError::IndexOutOfBounds {
            what: "function parameter",
            index: at,
            len,
        });
    };
    let trimmed = name.trim();
    if trimmed.is_empty() {
        log::warn!(
            "refusing to rename parameter '{}' to an empty name",
            parameter.name
        );
        return Ok(());
    }
    if kind == FunctionKind::Feel {
        repository.rename_variable(&parameter.id, trimmed)?;
    }
    parameter.name = trimmed.to_string();
    Ok(())
}

/// Change the parameter's type at `at`, in the document and, for FEEL
/// functions, in the repository record.
pub fn update_function_parameter_type(
    function: &mut FunctionExpression,
    at: usize,
    type_ref: Option<&str>,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    let len = function.parameters.len();
    let kind = function.kind;
    let Some(parameter) = function.parameters.get_mut(at) else {
        return Err(MutationError::IndexOutOfBounds {
            what: "function parameter",
            index: at,
            len,
        });
    };
    if kind == FunctionKind::Feel {
        repository.update_variable_type(&parameter.id, type_ref.map(str::to_string))?;
    }
    parameter.type_ref = type_ref.map(str::to_string);
    Ok(())
}

/// Switch the function's implementation kind, resetting the body to that
/// kind's starting shape. Parameters are kept.
///
/// Document-level only: registrations of the old body are reconciled by the
/// next repository rebuild.
pub fn set_function_kind(function: &mut FunctionExpression, kind: FunctionKind) {
    if function.kind == kind {
        return;
    }
    function.kind = kind;
    function.body = match kind {
        FunctionKind::Feel => Some(Box::new(BoxedExpression::Literal(LiteralExpression {
            id: generate_uuid(),
            text: String::new(),
            type_ref: None,
        }))),
        // Java and PMML bodies appear on first field edit.
        FunctionKind::Java | FunctionKind::Pmml => None,
    };
}

/// Write a Java function's class and method-signature fields. A `None` leaves
/// that field's current text alone.
pub fn set_java_function_fields(
    function: &mut FunctionExpression,
    class_name: Option<&str>,
    method_signature: Option<&str>,
) -> Result<(), MutationError> {
    if function.kind != FunctionKind::Java {
        return Err(MutationError::WrongShape {
            expected: "Java function",
            actual: kind_name(function.kind),
        });
    }
    set_fixed_body_fields(
        function,
        [JAVA_CLASS_FIELD, JAVA_METHOD_FIELD],
        [class_name, method_signature],
    )
}

/// Write a PMML function's document and model fields. A `None` leaves that
/// field's current text alone.
pub fn set_pmml_function_fields(
    function: &mut FunctionExpression,
    document: Option<&str>,
    model: Option<&str>,
) -> Result<(), MutationError> {
    if function.kind != FunctionKind::Pmml {
        return Err(MutationError::WrongShape {
            expected: "PMML function",
            actual: kind_name(function.kind),
        });
    }
    set_fixed_body_fields(
        function,
        [PMML_DOCUMENT_FIELD, PMML_MODEL_FIELD],
        [document, model],
    )
}

/// Read back a Java function's `(class, method signature)` texts.
pub fn java_function_fields(
    function: &FunctionExpression,
) -> Result<(Option<&str>, Option<&str>), MutationError> {
    if function.kind != FunctionKind::Java {
        return Err(MutationError::WrongShape {
            expected: "Java function",
            actual: kind_name(function.kind),
        });
    }
    Ok((
        body_entry_text(function, JAVA_CLASS_FIELD),
        body_entry_text(function, JAVA_METHOD_FIELD),
    ))
}

/// Read back a PMML function's `(document, model)` texts.
pub fn pmml_function_fields(
    function: &FunctionExpression,
) -> Result<(Option<&str>, Option<&str>), MutationError> {
    if function.kind != FunctionKind::Pmml {
        return Err(MutationError::WrongShape {
            expected: "PMML function",
            actual: kind_name(function.kind),
        });
    }
    Ok((
        body_entry_text(function, PMML_DOCUMENT_FIELD),
        body_entry_text(function, PMML_MODEL_FIELD),
    ))
}

fn kind_name(kind: FunctionKind) -> &'static str {
    match kind {
        FunctionKind::Feel => "FEEL function",
        FunctionKind::Java => "Java function",
        FunctionKind::Pmml => "PMML function",
    }
}

fn set_fixed_body_fields(
    function: &mut FunctionExpression,
    names: [&str; 2],
    values: [Option<&str>; 2],
) -> Result<(), MutationError> {
    let body = function.body.get_or_insert_with(|| {
        Box::new(BoxedExpression::Context(ContextExpression {
            id: generate_uuid(),
            type_ref: None,
            entries: Vec::new(),
        }))
    });
    let BoxedExpression::Context(context) = body.as_mut() else {
        return Err(MutationError::WrongShape {
            expected: "context",
            actual: body.shape_name(),
        });
    };
    let mut first = take_entry(context, names[0]);
    let mut second = take_entry(context, names[1]);
    if let Some(text) = values[0] {
        set_entry_text(&mut first, text);
    }
    if let Some(text) = values[1] {
        set_entry_text(&mut second, text);
    }
    context.entries = vec![first, second];
    Ok(())
}

/// Detach the entry named `name`, or make a fresh one with empty text.
fn take_entry(context: &mut ContextExpression, name: &str) -> ContextEntry {
    let position = context.entries.iter().position(|entry| {
        entry.variable.as_ref().map(|item| item.name.as_str()) == Some(name)
    });
    match position {
        Some(position) => context.entries.remove(position),
        None => ContextEntry {
            id: generate_uuid(),
            variable: Some(InformationItem {
                id: generate_uuid(),
                name: name.to_string(),
                type_ref: None,
            }),
            expression: BoxedExpression::Literal(LiteralExpression {
                id: generate_uuid(),
                text: String::new(),
                type_ref: None,
            }),
        },
    }
}

fn set_entry_text(entry: &mut ContextEntry, text: &str) {
    match &mut entry.expression {
        BoxedExpression::Literal(literal) => literal.text = text.to_string(),
        other => {
            *other = BoxedExpression::Literal(LiteralExpression {
                id: generate_uuid(),
                text: text.to_string(),
                type_ref: None,
            });
        }
    }
}

fn body_entry_text<'a>(function: &'a FunctionExpression, name: &str) -> Option<&'a str> {
    let body = function.body.as_deref()?;
    let BoxedExpression::Context(context) = body else {
        return None;
    };
    let entry = context.entries.iter().find(|entry| {
        entry.variable.as_ref().map(|item| item.name.as_str()) == Some(name)
    })?;
    match &entry.expression {
        BoxedExpression::Literal(literal) => Some(&literal.text),
        _ => None,
    }
}
