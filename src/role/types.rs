//! Role normalization across legacy claim encodings
//!
//! The `role` claim has accumulated several on-the-wire shapes over time:
//! a plain string, an array of names (with the numeric `0` sentinel for the
//! platform super user), or an object carrying a sentinel key, a `role`/`name`
//! field, or an explicit `permissions` list. Everything is normalized once at
//! context construction and the raw form is discarded.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Canonical role names after resolving legacy encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleName {
    Super,
    Admin,
    Manager,
    User,
    Viewer,
    Device,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Super => "super",
            RoleName::Admin => "admin",
            RoleName::Manager => "manager",
            RoleName::User => "user",
            RoleName::Viewer => "viewer",
            RoleName::Device => "device",
        }
    }
}

impl FromStr for RoleName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super" => Ok(RoleName::Super),
            "admin" => Ok(RoleName::Admin),
            "manager" => Ok(RoleName::Manager),
            "user" => Ok(RoleName::User),
            "viewer" => Ok(RoleName::Viewer),
            "device" => Ok(RoleName::Device),
            _ => Err(()),
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_zero(value: &Value) -> bool {
    value.as_i64() == Some(0) || value.as_str() == Some("0")
}

/// Checks whether a raw role claim carries the super sentinel
///
/// The sentinel is the id `0` (number or string) in the array encoding, or a
/// truthy `"0"`/`super` key in the object encoding. This is a side channel:
/// it is checked independently of whether a named role is also derivable.
pub fn has_super_sentinel(raw: &Value) -> bool {
    match raw {
        Value::Array(items) => items.iter().any(is_zero),
        Value::Object(map) => {
            map.get("0").and_then(Value::as_bool) == Some(true)
                || map.get("super").and_then(Value::as_bool) == Some(true)
        }
        _ => false,
    }
}

/// Resolves the canonical role name from a raw role claim
///
/// Rules, in priority order:
/// 1. String role is taken as-is.
/// 2. Array encoding: the super sentinel wins; otherwise the first match
///    among `admin`, `manager`, `user`, `viewer` (synonym of `user`),
///    `device`.
/// 3. Object encoding: the super sentinel wins; otherwise an explicit
///    `role` or `name` field.
/// 4. Any other shape has no role; callers must deny.
pub fn canonical_role_name(raw: &Value) -> Option<RoleName> {
    match raw {
        Value::String(name) => name.parse().ok(),
        Value::Array(items) => {
            if items.iter().any(is_zero) {
                return Some(RoleName::Super);
            }
            let has = |name: &str| items.iter().any(|item| item.as_str() == Some(name));
            if has("admin") {
                Some(RoleName::Admin)
            } else if has("manager") {
                Some(RoleName::Manager)
            } else if has("user") || has("viewer") {
                // viewer is a legacy synonym in the array encoding
                Some(RoleName::User)
            } else if has("device") {
                Some(RoleName::Device)
            } else {
                None
            }
        }
        Value::Object(map) => {
            if has_super_sentinel(raw) {
                return Some(RoleName::Super);
            }
            map.get("role")
                .or_else(|| map.get("name"))
                .and_then(Value::as_str)
                .and_then(|name| name.parse().ok())
        }
        _ => None,
    }
}

/// Extracts an explicit permission list from the object encoding, if present
pub fn explicit_permissions(raw: &Value) -> Option<Vec<String>> {
    let patterns = raw.get("permissions")?.as_array()?;
    Some(
        patterns
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

/// A role claim normalized into its canonical form
///
/// Constructed once per request via [`Role::normalize`]; check sites never
/// re-inspect the raw encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// A named role looked up in the static permission table
    Named(RoleName),
    /// An explicit permission list that bypasses the table
    ExplicitPermissions(Vec<String>),
    /// Unrecognized encoding; grants nothing
    Unknown,
}

impl Role {
    /// Normalizes a raw role claim
    ///
    /// The super sentinel takes precedence over everything else, then an
    /// explicit permission list, then a derivable name.
    pub fn normalize(raw: &Value) -> Self {
        if has_super_sentinel(raw) {
            return Role::Named(RoleName::Super);
        }
        if let Some(patterns) = explicit_permissions(raw) {
            return Role::ExplicitPermissions(patterns);
        }
        match canonical_role_name(raw) {
            Some(name) => Role::Named(name),
            None => Role::Unknown,
        }
    }

    /// Canonical name, when the encoding carries one
    pub fn name(&self) -> Option<RoleName> {
        match self {
            Role::Named(name) => Some(*name),
            _ => None,
        }
    }
}

/// Normalizes a role payload for persistence
///
/// Absent or empty input defaults to the least-privileged viewer role; a bare
/// string is wrapped into the stored object shape; arrays and objects are
/// stored as given.
pub fn normalize_role_payload(raw: &Value) -> Value {
    match raw {
        Value::Null => serde_json::json!({ "role": "viewer" }),
        Value::String(s) if s.is_empty() => serde_json::json!({ "role": "viewer" }),
        Value::String(s) => serde_json::json!({ "role": s }),
        Value::Array(_) | Value::Object(_) => raw.clone(),
        _ => serde_json::json!({ "role": "viewer" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_role_as_is() {
        assert_eq!(canonical_role_name(&json!("admin")), Some(RoleName::Admin));
        assert_eq!(
            canonical_role_name(&json!("viewer")),
            Some(RoleName::Viewer)
        );
        assert_eq!(canonical_role_name(&json!("intruder")), None);
    }

    #[test]
    fn test_array_sentinel_is_super() {
        assert_eq!(canonical_role_name(&json!([0])), Some(RoleName::Super));
        assert_eq!(canonical_role_name(&json!(["0"])), Some(RoleName::Super));
        assert_eq!(
            canonical_role_name(&json!(["admin", 0])),
            Some(RoleName::Super)
        );
    }

    #[test]
    fn test_array_first_match_priority() {
        assert_eq!(
            canonical_role_name(&json!(["manager", "admin"])),
            Some(RoleName::Admin)
        );
        assert_eq!(
            canonical_role_name(&json!(["viewer"])),
            Some(RoleName::User)
        );
        assert_eq!(
            canonical_role_name(&json!(["device"])),
            Some(RoleName::Device)
        );
        assert_eq!(canonical_role_name(&json!(["ghost"])), None);
    }

    #[test]
    fn test_object_encodings() {
        assert_eq!(
            canonical_role_name(&json!({ "super": true })),
            Some(RoleName::Super)
        );
        assert_eq!(
            canonical_role_name(&json!({ "0": true })),
            Some(RoleName::Super)
        );
        assert_eq!(
            canonical_role_name(&json!({ "role": "manager" })),
            Some(RoleName::Manager)
        );
        assert_eq!(
            canonical_role_name(&json!({ "name": "device" })),
            Some(RoleName::Device)
        );
        assert_eq!(canonical_role_name(&json!({})), None);
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert_eq!(canonical_role_name(&json!(null)), None);
        assert_eq!(canonical_role_name(&json!(42)), None);
        assert_eq!(canonical_role_name(&json!(true)), None);
    }

    #[test]
    fn test_super_sentinel_side_channel() {
        assert!(has_super_sentinel(&json!([0])));
        assert!(has_super_sentinel(&json!(["0"])));
        assert!(has_super_sentinel(&json!({ "super": true })));
        assert!(has_super_sentinel(&json!({ "0": true })));
        // a plain "super" string names the role but does not carry the sentinel
        assert!(!has_super_sentinel(&json!("super")));
        assert!(!has_super_sentinel(&json!({ "super": false })));
        assert!(!has_super_sentinel(&json!(["admin"])));
    }

    #[test]
    fn test_normalize_explicit_permissions() {
        let raw = json!({ "permissions": ["tenant.sensors.read", "health.*"] });
        assert_eq!(
            Role::normalize(&raw),
            Role::ExplicitPermissions(vec![
                "tenant.sensors.read".to_string(),
                "health.*".to_string()
            ])
        );
    }

    #[test]
    fn test_normalize_sentinel_wins_over_permissions() {
        let raw = json!({ "super": true, "permissions": ["tenant.sensors.read"] });
        assert_eq!(Role::normalize(&raw), Role::Named(RoleName::Super));
    }

    #[test]
    fn test_normalize_unknown() {
        assert_eq!(Role::normalize(&json!(null)), Role::Unknown);
        assert_eq!(Role::normalize(&json!(7)), Role::Unknown);
        assert_eq!(Role::Unknown.name(), None);
    }

    #[test]
    fn test_normalize_role_payload() {
        assert_eq!(
            normalize_role_payload(&json!(null)),
            json!({ "role": "viewer" })
        );
        assert_eq!(normalize_role_payload(&json!("")), json!({ "role": "viewer" }));
        assert_eq!(
            normalize_role_payload(&json!("manager")),
            json!({ "role": "manager" })
        );
        assert_eq!(normalize_role_payload(&json!(["admin"])), json!(["admin"]));
        assert_eq!(
            normalize_role_payload(&json!({ "role": "user" })),
            json!({ "role": "user" })
        );
    }
}
