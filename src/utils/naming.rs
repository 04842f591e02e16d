//! Default naming for inserted elements.
//!
//! New columns, context entries, and parameters get a `prefix-N` name. The
//! first candidate index is one past the number of taken names, then the index
//! climbs until a free slot is found, so deleting an element in the middle does
//! not cause the next insert to collide with a survivor.

/// Pick the next free `prefix-N` name against the names already taken.
///
/// # Examples
/// ```
/// use feelscope::utils::naming::next_available_prefixed_name;
///
/// assert_eq!(next_available_prefixed_name(&[], "column"), "column-1");
/// assert_eq!(
///     next_available_prefixed_name(&["column-1".to_string()], "column"),
///     "column-2"
/// );
/// // Two names taken, so the first candidate is column-3, which is itself
/// // taken; the search climbs to column-4.
/// assert_eq!(
///     next_available_prefixed_name(&["column-1".to_string(), "column-3".to_string()], "column"),
///     "column-4"
/// );
/// ```
pub fn next_available_prefixed_name(taken_names: &[String], prefix: &str) -> String {
    let mut index = taken_names.len() + 1;
    loop {
        let candidate = format!("{}-{}", prefix, index);
        if !taken_names.iter().any(|name| name == &candidate) {
            return candidate;
        }
        index += 1;
    }
}
