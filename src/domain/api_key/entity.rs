//! API Key entity and related types

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_permission, ApiKeyValidationError};

/// Number of token characters safe to show in logs and admin listings
pub const TOKEN_DISPLAY_PREFIX_LEN: usize = 12;

/// Set of permission labels granted to (or required from) an API key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set of granted permissions, validating every label
    ///
    /// Labels are trimmed and duplicates collapse.
    pub fn parse<I, S>(labels: I) -> Result<Self, ApiKeyValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();

        for label in labels {
            let label = label.as_ref().trim();
            validate_permission(label)?;
            set.insert(label.to_string());
        }

        Ok(Self(set))
    }

    /// Build a set from trusted labels (route declarations)
    pub fn from_static(labels: &[&str]) -> Self {
        Self(labels.iter().map(|s| s.to_string()).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }

    /// Check whether this set grants every permission in `required`
    pub fn satisfies(&self, required: &PermissionSet) -> bool {
        required.0.is_subset(&self.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// API Key entity
///
/// The token is both identifier and credential. Permissions are fixed at
/// issuance; only `last_used_at` changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    token: String,
    permissions: PermissionSet,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_used_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    /// Create a new API key issued now
    pub fn new(token: impl Into<String>, permissions: PermissionSet) -> Self {
        Self {
            token: token.into(),
            permissions,
            created_at: Utc::now(),
            last_used_at: None,
        }
    }

    // Getters

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Leading characters of the token, for logs and listings
    pub fn token_prefix(&self) -> &str {
        token_prefix(&self.token)
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    /// Check whether the key grants every permission in `required`
    pub fn allows(&self, required: &PermissionSet) -> bool {
        self.permissions.satisfies(required)
    }

    /// Record key usage
    pub fn record_usage(&mut self, at: DateTime<Utc>) {
        self.last_used_at = Some(at);
    }
}

/// Leading characters of a raw token, safe to log
pub fn token_prefix(token: &str) -> &str {
    match token.char_indices().nth(TOKEN_DISPLAY_PREFIX_LEN) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(labels: &[&str]) -> PermissionSet {
        PermissionSet::parse(labels).unwrap()
    }

    #[test]
    fn test_permission_set_parse_trims_and_dedups() {
        let set = perms(&[" read ", "read", "write"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("read"));
        assert!(set.contains("write"));
    }

    #[test]
    fn test_permission_set_rejects_blank_label() {
        assert!(PermissionSet::parse(["read", "  "]).is_err());
    }

    #[test]
    fn test_satisfies_is_subset_test() {
        let granted = perms(&["read", "write"]);

        assert!(granted.satisfies(&PermissionSet::new()));
        assert!(granted.satisfies(&perms(&["read"])));
        assert!(granted.satisfies(&perms(&["write", "read"])));
        assert!(!granted.satisfies(&perms(&["read", "admin"])));
    }

    #[test]
    fn test_api_key_creation() {
        let key = ApiKey::new("fk_live_abcdefghijklmnop", perms(&["read"]));

        assert_eq!(key.token(), "fk_live_abcdefghijklmnop");
        assert_eq!(key.token_prefix(), "fk_live_abcd");
        assert!(key.last_used_at().is_none());
        assert!(key.allows(&perms(&["read"])));
        assert!(!key.allows(&perms(&["write"])));
    }

    #[test]
    fn test_api_key_record_usage() {
        let mut key = ApiKey::new("token", perms(&["read"]));
        let now = Utc::now();

        key.record_usage(now);
        assert_eq!(key.last_used_at(), Some(now));
    }

    #[test]
    fn test_token_prefix_short_token() {
        assert_eq!(token_prefix("short"), "short");
        assert_eq!(token_prefix(""), "");
    }

    #[test]
    fn test_permission_set_serializes_as_list() {
        let json = serde_json::to_string(&perms(&["write", "read"])).unwrap();
        assert_eq!(json, r#"["read","write"]"#);
    }
}
