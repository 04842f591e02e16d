//! A single tracked variable declaration.

/// One name visible to FEEL expressions, together with the scope that declares
/// it.
///
/// Every variable also owns a scope node keyed by its own uuid, so expressions
/// nested under the element it mirrors (a context entry's value, a decision's
/// boxed logic) resolve the variable itself plus everything above it.
///
/// Fields are private: the repository is the only writer, and renames must go
/// through it so tracked expression texts stay in step with the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    uuid: String,
    name: String,
    type_ref: Option<String>,
    scope: String,
    child_scope: Option<String>,
    namespace: Option<String>,
}

impl Variable {
    pub(crate) fn new(
        uuid: impl Into<String>,
        name: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Variable {
            uuid: uuid.into(),
            name: name.into(),
            type_ref: None,
            scope: scope.into(),
            child_scope: None,
            namespace: None,
        }
    }

    pub(crate) fn with_type_ref(mut self, type_ref: Option<String>) -> Self {
        self.type_ref = type_ref;
        self
    }

    pub(crate) fn with_child_scope(mut self, child_scope: impl Into<String>) -> Self {
        self.child_scope = Some(child_scope.into());
        self
    }

    pub(crate) fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Element id of the declaration this variable mirrors. Doubles as the id
    /// of the variable's own scope node.
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_ref(&self) -> Option<&str> {
        self.type_ref.as_deref()
    }

    /// Id of the scope node that declares this variable.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Id of the nested scope this variable owns, if any. Expressions under
    /// the owning element resolve there; removing the variable with
    /// `remove_children` tears the whole subtree down.
    pub fn child_scope(&self) -> Option<&str> {
        self.child_scope.as_deref()
    }

    /// Namespace URI of the model this variable came from. `None` for
    /// variables of the document being edited.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Repository key: plain uuid for local variables, namespace-qualified for
    /// imported ones so two models may reuse element ids.
    pub fn key(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{}#{}", namespace, self.uuid),
            None => self.uuid.clone(),
        }
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_type_ref(&mut self, type_ref: Option<String>) {
        self.type_ref = type_ref;
    }

    pub(crate) fn set_scope(&mut self, scope: impl Into<String>) {
        self.scope = scope.into();
    }
}
