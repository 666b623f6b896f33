//! Package set comparison.
//!
//! Declared package lists are ordered as the user wrote them, but order carries
//! no meaning: two lists describe the same container when they hold the same
//! multiset of names.

/// Returns true if `a` and `b` contain the same packages, ignoring order.
///
/// Duplicates count: `["gcc", "gcc"]` is not equal to `["gcc"]`. Neither input
/// is modified.
pub fn packages_equal<S: AsRef<str>>(a: &[S], b: &[S]) -> bool {
  if a.len() != b.len() {
    return false;
  }

  let mut left: Vec<&str> = a.iter().map(AsRef::as_ref).collect();
  let mut right: Vec<&str> = b.iter().map(AsRef::as_ref).collect();
  left.sort_unstable();
  right.sort_unstable();

  left == right
}
