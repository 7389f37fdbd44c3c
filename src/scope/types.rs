//! Wildcard-aware scope sets
//!
//! Organization and workspace scope is a set of non-negative ids in which
//! the id `0` is a sentinel meaning "every id in this dimension", including
//! ids that do not exist yet. The sentinel appears symmetrically on caller
//! scope and on stored resource rows.

use indexmap::IndexSet;
use serde_json::Value;
use std::fmt;

fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A set of organization or workspace ids honoring the `0` wildcard
///
/// The invariant lives here instead of being special-cased at call sites:
/// a set containing `0` matches every id, and ambiguous or absent input
/// normalizes to `{0}` (unrestricted), never to the empty set. An empty
/// caller scope would make a logged-in principal unable to act on anything,
/// which is never the intended default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSet {
    ids: IndexSet<i64>,
}

impl ScopeSet {
    /// The unrestricted scope `{0}`
    pub fn unrestricted() -> Self {
        let mut ids = IndexSet::new();
        ids.insert(0);
        Self { ids }
    }

    /// Builds a scope from explicit ids
    ///
    /// An empty input or any occurrence of `0` collapses to `{0}`.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let ids: IndexSet<i64> = ids.into_iter().collect();
        if ids.is_empty() || ids.contains(&0) {
            return Self::unrestricted();
        }
        Self { ids }
    }

    /// Normalizes a scope claim (scalar, list, or absent) into a set
    ///
    /// Absent, empty, unparsable, and zero-valued claims all normalize to
    /// `{0}`.
    pub fn from_claim(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::from_ids(items.iter().filter_map(parse_id)),
            Value::Null => Self::unrestricted(),
            other => match parse_id(other) {
                Some(id) if id != 0 => Self::from_ids([id]),
                _ => Self::unrestricted(),
            },
        }
    }

    /// Whether this scope matches every id
    pub fn is_unrestricted(&self) -> bool {
        self.ids.contains(&0)
    }

    /// Membership test; the wildcard absorbs every id
    pub fn contains(&self, id: i64) -> bool {
        self.is_unrestricted() || self.ids.contains(&id)
    }

    /// Whether any of the given ids is in scope
    pub fn contains_any(&self, ids: &[i64]) -> bool {
        self.is_unrestricted() || ids.iter().any(|id| self.ids.contains(id))
    }

    /// The stored ids, in insertion order
    pub fn to_vec(&self) -> Vec<i64> {
        self.ids.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        // the normalization invariant makes this unreachable in practice
        self.ids.is_empty()
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for id in &self.ids {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}", id)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_ids() {
        let scope = ScopeSet::from_ids([3, 5, 3]);
        assert_eq!(scope.to_vec(), vec![3, 5]);
        assert!(!scope.is_unrestricted());
    }

    #[test]
    fn test_empty_normalizes_to_unrestricted() {
        assert!(ScopeSet::from_ids([]).is_unrestricted());
        assert_eq!(ScopeSet::from_ids([]).to_vec(), vec![0]);
    }

    #[test]
    fn test_zero_collapses_the_set() {
        let scope = ScopeSet::from_ids([1, 0, 2]);
        assert!(scope.is_unrestricted());
        assert_eq!(scope.to_vec(), vec![0]);
    }

    #[test]
    fn test_wildcard_absorbs_every_id() {
        let scope = ScopeSet::unrestricted();
        assert!(scope.contains(1));
        assert!(scope.contains(999_999));
        assert!(scope.contains(0));
    }

    #[test]
    fn test_restricted_membership() {
        let scope = ScopeSet::from_ids([3, 7]);
        assert!(scope.contains(3));
        assert!(!scope.contains(4));
        assert!(scope.contains_any(&[9, 7]));
        assert!(!scope.contains_any(&[9, 8]));
    }

    #[test]
    fn test_from_claim_scalar() {
        assert_eq!(ScopeSet::from_claim(&json!(5)).to_vec(), vec![5]);
        assert_eq!(ScopeSet::from_claim(&json!("5")).to_vec(), vec![5]);
        assert!(ScopeSet::from_claim(&json!(0)).is_unrestricted());
        assert!(ScopeSet::from_claim(&json!(null)).is_unrestricted());
        assert!(ScopeSet::from_claim(&json!("oops")).is_unrestricted());
    }

    #[test]
    fn test_from_claim_list() {
        assert_eq!(ScopeSet::from_claim(&json!([1, "2"])).to_vec(), vec![1, 2]);
        assert!(ScopeSet::from_claim(&json!([])).is_unrestricted());
        assert!(ScopeSet::from_claim(&json!([1, 0])).is_unrestricted());
    }

    #[test]
    fn test_display() {
        assert_eq!(ScopeSet::from_ids([1, 2, 3]).to_string(), "1,2,3");
        assert_eq!(ScopeSet::unrestricted().to_string(), "0");
    }
}
