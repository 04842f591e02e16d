//! Typed DMN document tree.
//!
//! This is the marshalled form the engine works on. The XML layer lives outside
//! this crate; models arrive as JSON produced by that layer and leave the same
//! way, so every struct here derives serde both ways. Element ids are plain
//! strings assigned by the authoring side and are never regenerated here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::boxed::{BoxedExpression, FunctionExpression};

/// Column widths keyed by expression element id.
///
/// The first entry of each width list is the row-index column, matching the
/// layout the boxed-expression editor persists.
pub type WidthsMap = BTreeMap<String, Vec<f64>>;

/// Root of a marshalled DMN model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmnDefinitions {
    pub id: String,
    pub name: String,
    /// Namespace URI of this model; import elements in other models point here.
    pub namespace: String,
    #[serde(rename = "import", default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<DmnImport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drg_element: Vec<DrgElement>,
    /// Column widths for boxed expressions, keyed by element id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub widths: WidthsMap,
}

impl DmnDefinitions {
    /// Look up a DRG element by its id.
    pub fn find_drg_element(&self, id: &str) -> Option<&DrgElement> {
        self.drg_element.iter().find(|el| el.id() == id)
    }

    /// Look up a DRG element by its id, mutably.
    pub fn find_drg_element_mut(&mut self, id: &str) -> Option<&mut DrgElement> {
        self.drg_element.iter_mut().find(|el| el.id() == id)
    }
}

/// An `import` element: makes another model's variables reachable under an
/// alias. `name` is the alias used to qualify references (`alias.variable`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmnImport {
    pub id: String,
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_type: Option<String>,
}

/// The named, typed variable element carried by DRG elements, context entries,
/// relation columns, and function parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformationItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
}

/// An `href`-style reference to another element, value includes the leading `#`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Href {
    pub href: String,
}

impl Href {
    /// The referenced element id, without the leading `#`.
    pub fn target_id(&self) -> &str {
        self.href.strip_prefix('#').unwrap_or(&self.href)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformationRequirement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_input: Option<Href>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_decision: Option<Href>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeRequirement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_knowledge: Option<Href>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityRequirement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_input: Option<Href>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_decision: Option<Href>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_authority: Option<Href>,
}

/// A top-level decision requirement graph element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "camelCase")]
pub enum DrgElement {
    InputData(InputData),
    Decision(Decision),
    BusinessKnowledgeModel(BusinessKnowledgeModel),
    DecisionService(DecisionService),
    KnowledgeSource(KnowledgeSource),
}

impl DrgElement {
    pub fn id(&self) -> &str {
        match self {
            DrgElement::InputData(el) => &el.id,
            DrgElement::Decision(el) => &el.id,
            DrgElement::BusinessKnowledgeModel(el) => &el.id,
            DrgElement::DecisionService(el) => &el.id,
            DrgElement::KnowledgeSource(el) => &el.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DrgElement::InputData(el) => &el.name,
            DrgElement::Decision(el) => &el.name,
            DrgElement::BusinessKnowledgeModel(el) => &el.name,
            DrgElement::DecisionService(el) => &el.name,
            DrgElement::KnowledgeSource(el) => &el.name,
        }
    }

    pub fn variable(&self) -> Option<&InformationItem> {
        match self {
            DrgElement::InputData(el) => el.variable.as_ref(),
            DrgElement::Decision(el) => el.variable.as_ref(),
            DrgElement::BusinessKnowledgeModel(el) => el.variable.as_ref(),
            DrgElement::DecisionService(el) => el.variable.as_ref(),
            // Knowledge sources are not referenceable from FEEL.
            DrgElement::KnowledgeSource(_) => None,
        }
    }

    pub fn variable_mut(&mut self) -> Option<&mut InformationItem> {
        match self {
            DrgElement::InputData(el) => el.variable.as_mut(),
            DrgElement::Decision(el) => el.variable.as_mut(),
            DrgElement::BusinessKnowledgeModel(el) => el.variable.as_mut(),
            DrgElement::DecisionService(el) => el.variable.as_mut(),
            DrgElement::KnowledgeSource(_) => None,
        }
    }

    /// Rename the element and, when present, its variable element. The two
    /// names are kept equal by every edit path.
    pub fn set_name(&mut self, new_name: &str) {
        let variable = match self {
            DrgElement::InputData(el) => {
                el.name = new_name.to_string();
                el.variable.as_mut()
            }
            DrgElement::Decision(el) => {
                el.name = new_name.to_string();
                el.variable.as_mut()
            }
            DrgElement::BusinessKnowledgeModel(el) => {
                el.name = new_name.to_string();
                el.variable.as_mut()
            }
            DrgElement::DecisionService(el) => {
                el.name = new_name.to_string();
                el.variable.as_mut()
            }
            DrgElement::KnowledgeSource(el) => {
                el.name = new_name.to_string();
                None
            }
        };
        if let Some(variable) = variable {
            variable.name = new_name.to_string();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputData {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<InformationItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<InformationItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<BoxedExpression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub information_requirement: Vec<InformationRequirement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge_requirement: Vec<KnowledgeRequirement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessKnowledgeModel {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<InformationItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encapsulated_logic: Option<FunctionExpression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge_requirement: Vec<KnowledgeRequirement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionService {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<InformationItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_decision: Vec<Href>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub encapsulated_decision: Vec<Href>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_decision: Vec<Href>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_data: Vec<Href>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSource {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authority_requirement: Vec<AuthorityRequirement>,
}
