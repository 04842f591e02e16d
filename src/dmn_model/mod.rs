pub mod boxed;
pub mod document;
pub mod walk;

// Re-export commonly used types
pub use boxed::{
    Binding, BoxedExpression, ContextEntry, ContextExpression, DecisionRule,
    DecisionTableExpression, FunctionExpression, FunctionKind, InputClause, InvocationExpression,
    ListExpression, LiteralExpression, OutputClause, RelationExpression, RelationRow, UnaryTests,
};
pub use document::{
    AuthorityRequirement, BusinessKnowledgeModel, Decision, DecisionService, DmnDefinitions,
    DmnImport, DrgElement, Href, InformationItem, InformationRequirement, InputData,
    KnowledgeRequirement, KnowledgeSource, WidthsMap,
};
