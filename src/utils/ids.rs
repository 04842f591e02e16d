//! Element id generation.
//!
//! Every structural insert (new context entry, relation row/column, function
//! parameter, binding, list item) gets a fresh id from here. Ids double as scope
//! keys in the variables repository, so they must never be reused or regenerated
//! for an existing element.

use uuid::Uuid;

/// Generate a fresh element id.
///
/// Format: `_` followed by an uppercase UUIDv4, matching the id shape produced
/// by the marshalling layer for authored models, so generated and authored ids
/// are indistinguishable downstream.
///
/// # Examples
/// ```
/// use feelscope::utils::ids::generate_uuid;
///
/// let id = generate_uuid();
/// assert!(id.starts_with('_'));
/// assert_eq!(id.len(), 37); // '_' + 36 uuid chars
/// ```
pub fn generate_uuid() -> String {
    format!("_{}", Uuid::new_v4()).to_uppercase()
}
