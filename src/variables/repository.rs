//! Scope tree and variable records for one DMN document.
//!
//! The repository is built once from a marshalled document, then kept in step
//! with edits through the targeted mutators below instead of being rebuilt on
//! every keystroke. It owns three related maps: the scope arena (id to node),
//! the variable records (repository key to [`Variable`]), and the tracked
//! expression cache (text element uuid to [`Expression`]).
//!
//! Scope ids reuse document element ids. The root scope is the definitions
//! element itself; a decision's boxed logic lives in a scope keyed by the
//! decision id; a context entry's value lives in a scope keyed by the entry's
//! variable id. External models each contribute one flat scope keyed by their
//! namespace URI, reachable only through an import alias.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::dmn_model::{
    BoxedExpression, DmnDefinitions, DrgElement, FunctionExpression, FunctionKind,
};
use crate::feel_parser::{self, ScopeSymbols, SymbolEntry};

use super::errors::VariablesError;
use super::expression::Expression;
use super::variable::Variable;

#[derive(Debug, Default, Clone)]
struct ScopeNode {
    parent: Option<String>,
    /// Keys of variables declared directly in this scope, in declaration order.
    variables: Vec<String>,
    /// Child scope ids, used for cascade removal.
    children: Vec<String>,
}

/// All variables and scopes of a document plus its imported models.
#[derive(Debug, Default)]
pub struct VariablesRepository {
    root_scope: String,
    scopes: HashMap<String, ScopeNode>,
    variables: HashMap<String, Variable>,
    /// Import alias to namespace URI. Ordered so symbol tables come out stable.
    import_aliases: BTreeMap<String, String>,
    /// Text element uuid to the scope its FEEL text resolves in. Membership
    /// here is what makes a text "tracked": only tracked texts are cached and
    /// written back to the document.
    scope_of_text: HashMap<String, String>,
    expressions: BTreeMap<String, Expression>,
}

impl VariablesRepository {
    /// Build the scope tree for `definitions`. `external` holds the imported
    /// models' definitions; each is registered under its namespace URI.
    ///
    /// Two passes over the DRG: first every element's variable goes into the
    /// root scope, then expression subtrees are walked. Forward references
    /// between sibling decisions resolve because of the split.
    pub fn build(
        definitions: &DmnDefinitions,
        external: &[DmnDefinitions],
    ) -> Result<Self, VariablesError> {
        let mut repository = VariablesRepository {
            root_scope: definitions.id.clone(),
            ..Default::default()
        };
        repository
            .scopes
            .insert(definitions.id.clone(), ScopeNode::default());

        for import in &definitions.imports {
            repository
                .import_aliases
                .insert(import.name.clone(), import.namespace.clone());
        }
        for model in external {
            repository.add_external_definitions(model)?;
        }

        check_element_ids(definitions)?;
        repository.check_requirements(definitions)?;

        for element in &definitions.drg_element {
            if matches!(element, DrgElement::KnowledgeSource(_)) {
                continue;
            }
            let type_ref = element.variable().and_then(|v| v.type_ref.clone());
            let mut variable =
                Variable::new(element.id(), element.name(), &repository.root_scope)
                    .with_type_ref(type_ref);
            if element_owns_scope(element) {
                variable = variable.with_child_scope(element.id());
            }
            repository.add_variable(variable)?;
        }

        for element in &definitions.drg_element {
            match element {
                DrgElement::Decision(decision) => {
                    if let Some(expression) = &decision.expression {
                        repository.register_expression(expression, &decision.id)?;
                    }
                }
                DrgElement::BusinessKnowledgeModel(bkm) => {
                    if let Some(logic) = &bkm.encapsulated_logic {
                        repository.register_function(logic, &bkm.id)?;
                    }
                }
                _ => {}
            }
        }

        Ok(repository)
    }

    /// Register one imported model's variables under a scope keyed by its
    /// namespace URI. Only top-level names are taken; nested expression
    /// structure of external models is not tracked.
    fn add_external_definitions(
        &mut self,
        definitions: &DmnDefinitions,
    ) -> Result<(), VariablesError> {
        let namespace = definitions.namespace.clone();
        if self.scopes.contains_key(&namespace) {
            return Err(VariablesError::DuplicateElementId { id: namespace });
        }
        self.scopes.insert(namespace.clone(), ScopeNode::default());
        for element in &definitions.drg_element {
            if matches!(element, DrgElement::KnowledgeSource(_)) {
                continue;
            }
            let type_ref = element.variable().and_then(|v| v.type_ref.clone());
            let variable = Variable::new(element.id(), element.name(), &namespace)
                .with_type_ref(type_ref)
                .with_namespace(&namespace);
            self.add_variable(variable)?;
        }
        Ok(())
    }

    fn check_requirements(&self, definitions: &DmnDefinitions) -> Result<(), VariablesError> {
        let local_ids: HashSet<&str> = definitions
            .drg_element
            .iter()
            .map(|element| element.id())
            .collect();
        let known_namespaces: HashSet<&str> = self
            .import_aliases
            .values()
            .map(String::as_str)
            .collect();
        let check = |href: &crate::dmn_model::Href| -> Result<(), VariablesError> {
            let value = href.href.as_str();
            if let Some(id) = value.strip_prefix('#') {
                if local_ids.contains(id) {
                    return Ok(());
                }
            } else if let Some((namespace, _)) = value.split_once('#') {
                if known_namespaces.contains(namespace) {
                    return Ok(());
                }
            }
            Err(VariablesError::DanglingHref {
                href: value.to_string(),
            })
        };
        for element in &definitions.drg_element {
            match element {
                DrgElement::Decision(decision) => {
                    for requirement in &decision.information_requirement {
                        for href in [&requirement.required_input, &requirement.required_decision]
                            .into_iter()
                            .flatten()
                        {
                            check(href)?;
                        }
                    }
                    for requirement in &decision.knowledge_requirement {
                        if let Some(href) = &requirement.required_knowledge {
                            check(href)?;
                        }
                    }
                }
                DrgElement::BusinessKnowledgeModel(bkm) => {
                    for requirement in &bkm.knowledge_requirement {
                        if let Some(href) = &requirement.required_knowledge {
                            check(href)?;
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Register the variables and tracked texts of one boxed expression
    /// subtree, resolving in `scope`. Structural mutators call this when they
    /// splice a freshly-built subtree into the document, e.g. a duplicated
    /// context entry.
    pub(crate) fn register_expression(
        &mut self,
        expression: &BoxedExpression,
        scope: &str,
    ) -> Result<(), VariablesError> {
        match expression {
            BoxedExpression::Undefined => {}
            BoxedExpression::Literal(literal) => {
                self.track_text(&literal.id, scope);
            }
            BoxedExpression::Context(context) => {
                // Entries first, nested values second: an entry's value sees
                // every sibling entry, not only the ones declared above it.
                for entry in &context.entries {
                    if let Some(item) = &entry.variable {
                        let variable = Variable::new(&item.id, &item.name, scope)
                            .with_type_ref(item.type_ref.clone())
                            .with_child_scope(&item.id);
                        self.add_variable(variable)?;
                    }
                }
                for entry in &context.entries {
                    match &entry.variable {
                        Some(item) => self.register_expression(&entry.expression, &item.id)?,
                        None => {
                            // Result row: its own scope, no name.
                            self.declare_scope(&entry.id, scope)?;
                            self.register_expression(&entry.expression, &entry.id)?;
                        }
                    }
                }
            }
            BoxedExpression::Relation(relation) => {
                for column in &relation.columns {
                    let variable = Variable::new(&column.id, &column.name, scope)
                        .with_type_ref(column.type_ref.clone());
                    self.add_variable(variable)?;
                }
                for row in &relation.rows {
                    for cell in &row.cells {
                        self.register_text_cell(&cell.id, scope)?;
                    }
                }
            }
            BoxedExpression::DecisionTable(table) => {
                for clause in &table.input {
                    self.register_text_cell(&clause.input_expression.id, scope)?;
                }
                for rule in &table.rules {
                    for entry in &rule.input_entries {
                        self.register_text_cell(&entry.id, scope)?;
                    }
                    for entry in &rule.output_entries {
                        self.register_text_cell(&entry.id, scope)?;
                    }
                }
            }
            BoxedExpression::Invocation(invocation) => {
                // The invoked function names a BKM, not a variable reference
                // in this scope, so its text is left untracked. Binding
                // parameters belong to the callee and are not declared here.
                for binding in &invocation.bindings {
                    self.register_expression(&binding.expression, scope)?;
                }
            }
            BoxedExpression::List(list) => {
                for item in &list.items {
                    self.register_expression(item, scope)?;
                }
            }
            BoxedExpression::Function(function) => {
                self.register_function(function, scope)?;
            }
        }
        Ok(())
    }

    /// Register a function's parameters and, for FEEL functions, its body.
    /// Java and PMML bodies hold class and model references, not FEEL.
    fn register_function(
        &mut self,
        function: &FunctionExpression,
        scope: &str,
    ) -> Result<(), VariablesError> {
        if function.kind != FunctionKind::Feel {
            return Ok(());
        }
        for parameter in &function.parameters {
            let variable = Variable::new(&parameter.id, &parameter.name, scope)
                .with_type_ref(parameter.type_ref.clone());
            self.add_variable(variable)?;
        }
        if let Some(body) = &function.body {
            self.register_expression(body, scope)?;
        }
        Ok(())
    }

    /// A text-bearing cell without a real name: relation cells and
    /// decision-table entries. The slot is keyed and named by the element's
    /// own id and owns a scope of the same id, so the cell's text is tracked
    /// and resolves against everything declared around it.
    pub(crate) fn register_text_cell(&mut self, id: &str, scope: &str) -> Result<(), VariablesError> {
        let variable = Variable::new(id, id, scope).with_child_scope(id);
        self.add_variable(variable)?;
        self.track_text(id, id);
        Ok(())
    }

    fn track_text(&mut self, uuid: &str, scope: &str) {
        self.scope_of_text
            .insert(uuid.to_string(), scope.to_string());
    }

    fn declare_scope(&mut self, id: &str, parent: &str) -> Result<(), VariablesError> {
        if self.scopes.contains_key(id) {
            return Err(VariablesError::DuplicateElementId { id: id.to_string() });
        }
        let Some(parent_node) = self.scopes.get_mut(parent) else {
            return Err(VariablesError::UnknownScope {
                scope_id: parent.to_string(),
            });
        };
        parent_node.children.push(id.to_string());
        self.scopes.insert(
            id.to_string(),
            ScopeNode {
                parent: Some(parent.to_string()),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn add_variable(&mut self, variable: Variable) -> Result<(), VariablesError> {
        let key = variable.key();
        if self.variables.contains_key(&key) {
            return Err(VariablesError::DuplicateVariable { uuid: key });
        }
        if !self.scopes.contains_key(variable.scope()) {
            return Err(VariablesError::UnknownScope {
                scope_id: variable.scope().to_string(),
            });
        }
        if let Some(child) = variable.child_scope() {
            let child = child.to_string();
            let parent = variable.scope().to_string();
            self.declare_scope(&child, &parent)?;
        }
        if let Some(scope) = self.scopes.get_mut(variable.scope()) {
            scope.variables.push(key.clone());
        }
        self.variables.insert(key, variable);
        Ok(())
    }

    /// Insert a variable under `parent_scope_id`, optionally owning a new
    /// nested scope. Reusing a registered uuid is a caller bug: it errors in
    /// every build and additionally asserts in debug builds.
    pub fn add_variable_to_context(
        &mut self,
        uuid: &str,
        name: &str,
        parent_scope_id: &str,
        child_scope_id: Option<&str>,
    ) -> Result<(), VariablesError> {
        debug_assert!(
            !self.variables.contains_key(uuid),
            "duplicate variable uuid: {}",
            uuid
        );
        let mut variable = Variable::new(uuid, name, parent_scope_id);
        if let Some(child) = child_scope_id {
            variable = variable.with_child_scope(child);
        }
        self.add_variable(variable)
    }

    /// Detach a variable. With `remove_children` set, every variable and scope
    /// nested under its child scope goes with it; otherwise nested content is
    /// reparented to the removed variable's own scope.
    pub fn remove_variable(
        &mut self,
        uuid: &str,
        remove_children: bool,
    ) -> Result<(), VariablesError> {
        let Some(variable) = self.variables.get(uuid) else {
            return Err(VariablesError::UnknownVariable {
                uuid: uuid.to_string(),
            });
        };
        let key = variable.key();
        let parent_scope = variable.scope().to_string();
        let child_scope = variable.child_scope().map(str::to_string);

        if let Some(scope) = self.scopes.get_mut(&parent_scope) {
            scope.variables.retain(|k| k != &key);
        }

        if let Some(child) = child_scope {
            if remove_children {
                self.remove_scope_subtree(&child);
            } else {
                self.reparent_scope_contents(&child, &parent_scope);
            }
        }

        self.variables.remove(&key);
        Ok(())
    }

    /// Drop `scope_id` and everything under it: nested scopes, the variables
    /// declared in them, and cache entries for texts that lived there.
    fn remove_scope_subtree(&mut self, scope_id: &str) {
        let mut removed_scopes = HashSet::new();
        let mut stack = vec![scope_id.to_string()];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.scopes.remove(&id) {
                for key in node.variables {
                    self.variables.remove(&key);
                }
                stack.extend(node.children);
            }
            removed_scopes.insert(id);
        }
        // Only the subtree root can appear in a surviving children list.
        for node in self.scopes.values_mut() {
            node.children.retain(|c| c != scope_id);
        }
        self.scope_of_text
            .retain(|_, scope| !removed_scopes.contains(scope));
        let tracked: HashSet<&str> = self.scope_of_text.keys().map(String::as_str).collect();
        self.expressions
            .retain(|uuid, _| tracked.contains(uuid.as_str()));
    }

    /// Splice a scope's direct contents into `target`: variables move over in
    /// order, child scopes are re-hung, tracked texts re-point.
    fn reparent_scope_contents(&mut self, scope_id: &str, target: &str) {
        let Some(node) = self.scopes.remove(scope_id) else {
            return;
        };
        for key in &node.variables {
            if let Some(variable) = self.variables.get_mut(key) {
                variable.set_scope(target);
            }
        }
        for child in &node.children {
            if let Some(child_node) = self.scopes.get_mut(child) {
                child_node.parent = Some(target.to_string());
            }
        }
        if let Some(target_node) = self.scopes.get_mut(target) {
            target_node.children.retain(|c| c != scope_id);
            target_node.variables.extend(node.variables);
            target_node.children.extend(node.children);
        }
        for scope in self.scope_of_text.values_mut() {
            if scope == scope_id {
                *scope = target.to_string();
            }
        }
    }

    /// Rename a variable and rewrite every tracked text that references it.
    ///
    /// The rewrite runs against the still-unrenamed record, so the spliced-out
    /// span length is the old name's length; the record is updated last.
    pub fn rename_variable(&mut self, uuid: &str, new_name: &str) -> Result<(), VariablesError> {
        let Some(variable) = self.variables.get(uuid) else {
            return Err(VariablesError::UnknownVariable {
                uuid: uuid.to_string(),
            });
        };
        if variable.namespace().is_some() {
            // Qualified spans embed the import alias; splicing them with a
            // bare name would corrupt the text, and the new name could not
            // be persisted anywhere from this document anyway.
            return Err(VariablesError::ImportedVariable {
                key: variable.key(),
            });
        }
        for expression in self.expressions.values_mut() {
            expression.rename_variable(variable, new_name);
        }
        if let Some(variable) = self.variables.get_mut(uuid) {
            variable.set_name(new_name);
        }
        Ok(())
    }

    /// Change a variable's type. Types never appear inside FEEL texts, so no
    /// rewrite pass is needed.
    pub fn update_variable_type(
        &mut self,
        uuid: &str,
        type_ref: Option<String>,
    ) -> Result<(), VariablesError> {
        let Some(variable) = self.variables.get_mut(uuid) else {
            return Err(VariablesError::UnknownVariable {
                uuid: uuid.to_string(),
            });
        };
        if variable.namespace().is_some() {
            return Err(VariablesError::ImportedVariable {
                key: variable.key(),
            });
        }
        variable.set_type_ref(type_ref);
        Ok(())
    }

    /// Re-key an import alias. Variable records are untouched; only lookups
    /// made after the rename see the new qualifier.
    pub fn rename_import(
        &mut self,
        old_alias: &str,
        new_alias: &str,
    ) -> Result<(), VariablesError> {
        if old_alias == new_alias {
            return Ok(());
        }
        let Some(namespace) = self.import_aliases.get(old_alias).cloned() else {
            return Err(VariablesError::UnknownImport {
                alias: old_alias.to_string(),
            });
        };
        if self.import_aliases.contains_key(new_alias) {
            return Err(VariablesError::DuplicateImport {
                alias: new_alias.to_string(),
            });
        }
        self.import_aliases.remove(old_alias);
        self.import_aliases.insert(new_alias.to_string(), namespace);
        Ok(())
    }

    /// Resolve `name` from `scope_id`, walking up to the root. Qualified
    /// names (`alias.variable`) resolve against the aliased model's scope.
    /// `None` is not an error: the token may be a literal, a built-in, or a
    /// half-typed name.
    pub fn resolve(&self, scope_id: &str, name: &str) -> Option<&Variable> {
        let mut cursor = Some(scope_id);
        while let Some(id) = cursor {
            let Some(node) = self.scopes.get(id) else {
                break;
            };
            for key in &node.variables {
                if let Some(variable) = self.variables.get(key) {
                    if variable.name() == name {
                        return Some(variable);
                    }
                }
            }
            cursor = node.parent.as_deref();
        }
        let (alias, rest) = name.split_once('.')?;
        let namespace = self.import_aliases.get(alias)?;
        let node = self.scopes.get(namespace)?;
        node.variables
            .iter()
            .filter_map(|key| self.variables.get(key))
            .find(|variable| variable.name() == rest)
    }

    /// Variables visible from `scope_id`, nearest scope first, shadowed names
    /// dropped. Imported variables are not listed; they are reachable only
    /// through their alias.
    pub fn visible_variables(&self, scope_id: &str) -> Vec<&Variable> {
        let mut seen = HashSet::new();
        let mut visible = Vec::new();
        let mut cursor = Some(scope_id);
        while let Some(id) = cursor {
            let Some(node) = self.scopes.get(id) else {
                break;
            };
            for key in &node.variables {
                if let Some(variable) = self.variables.get(key) {
                    if seen.insert(variable.name()) {
                        visible.push(variable);
                    }
                }
            }
            cursor = node.parent.as_deref();
        }
        visible
    }

    /// The symbol table for one scope: every visible name paired with its
    /// repository key, plus `alias.name` entries for every imported variable.
    pub fn symbols_for_scope(&self, scope_id: &str) -> ScopeSymbols {
        let mut entries = Vec::new();
        let mut cursor = Some(scope_id);
        while let Some(id) = cursor {
            let Some(node) = self.scopes.get(id) else {
                break;
            };
            for key in &node.variables {
                if let Some(variable) = self.variables.get(key) {
                    entries.push(SymbolEntry::new(variable.name(), key.as_str()));
                }
            }
            cursor = node.parent.as_deref();
        }
        for (alias, namespace) in &self.import_aliases {
            let Some(node) = self.scopes.get(namespace) else {
                continue;
            };
            for key in &node.variables {
                if let Some(variable) = self.variables.get(key) {
                    entries.push(SymbolEntry::new(
                        format!("{}.{}", alias, variable.name()),
                        key.as_str(),
                    ));
                }
            }
        }
        ScopeSymbols::new(entries)
    }

    /// Scan `text` and return the occurrences found, wrapped in an
    /// [`Expression`].
    ///
    /// `id` may be a tracked text element (the text scans in that element's
    /// scope and the result is cached, so later renames rewrite it) or a bare
    /// scope id for ad-hoc scans. Anything else scans against the root scope.
    /// Only tracked texts are cached; ad-hoc results are never written back
    /// to the document.
    pub fn parse(&mut self, id: &str, text: &str) -> Expression {
        let scope = if let Some(scope) = self.scope_of_text.get(id) {
            scope.clone()
        } else if self.scopes.contains_key(id) {
            id.to_string()
        } else {
            log::debug!(
                "parse of unknown element '{}', resolving against root scope",
                id
            );
            self.root_scope.clone()
        };
        let symbols = self.symbols_for_scope(&scope);
        let occurrences = feel_parser::scan(&symbols, text);
        let mut expression = Expression::new(id, text);
        expression.set_variables(occurrences);
        if self.scope_of_text.contains_key(id) {
            self.expressions.insert(id.to_string(), expression.clone());
        }
        expression
    }

    pub fn root_scope(&self) -> &str {
        &self.root_scope
    }

    pub fn variable(&self, key: &str) -> Option<&Variable> {
        self.variables.get(key)
    }

    /// Direct child scopes of `scope_id`, in declaration order.
    pub fn child_scopes(&self, scope_id: &str) -> &[String] {
        self.scopes
            .get(scope_id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Variables declared directly in `scope_id`, in declaration order.
    pub fn declared_variables(&self, scope_id: &str) -> Vec<&Variable> {
        self.scopes
            .get(scope_id)
            .map(|node| {
                node.variables
                    .iter()
                    .filter_map(|key| self.variables.get(key))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the document has a text element with this uuid.
    pub fn is_tracked_text(&self, uuid: &str) -> bool {
        self.scope_of_text.contains_key(uuid)
    }

    pub fn scope_of_text(&self, uuid: &str) -> Option<&str> {
        self.scope_of_text.get(uuid).map(String::as_str)
    }

    /// The tracked expression cache, keyed by text element uuid.
    pub fn expressions(&self) -> &BTreeMap<String, Expression> {
        &self.expressions
    }

    pub fn expression(&self, uuid: &str) -> Option<&Expression> {
        self.expressions.get(uuid)
    }
}

/// Whether a DRG element carries nested expressions that need a scope.
fn element_owns_scope(element: &DrgElement) -> bool {
    matches!(
        element,
        DrgElement::Decision(_) | DrgElement::BusinessKnowledgeModel(_)
    )
}

fn check_element_ids(definitions: &DmnDefinitions) -> Result<(), VariablesError> {
    let mut seen = HashSet::new();
    for element in &definitions.drg_element {
        if !seen.insert(element.id()) {
            return Err(VariablesError::DuplicateElementId {
                id: element.id().to_string(),
            });
        }
    }
    Ok(())
}
