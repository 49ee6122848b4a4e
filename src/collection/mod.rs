//! Collection naming and tenant isolation.
//!
//! A collection is the partition key sent with every request. Tenant
//! scoped collections are named `<prefix>-<tenant>`; because a
//! [`TenantId`] can never contain the `-` separator, the last hyphen of a
//! scoped name always splits it back into the same `(prefix, tenant)` pair,
//! so two distinct pairs never produce the same collection.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::EnumString;
use thiserror::Error;

/// Separator between prefix and tenant id.
pub const SEPARATOR: char = '-';

/// Errors raised while validating collection names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("collection name must not be empty")]
    EmptyCollection,
    #[error("invalid collection name '{0}': use letters, digits, '.', '_' or '-' only")]
    InvalidCollection(String),
    #[error("collection prefix must not be empty")]
    EmptyPrefix,
    #[error("invalid collection prefix '{0}': must not start or end with '-'")]
    InvalidPrefix(String),
    #[error("tenant id must not be empty")]
    EmptyTenant,
    #[error("invalid tenant id '{0}': must not contain '-'")]
    TenantContainsSeparator(String),
    #[error("invalid tenant id '{0}': use letters, digits, '.', '_', '@' or '+' only")]
    InvalidTenant(String),
}

fn collection_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9._@+-]+$").ok())
        .as_ref()
}

fn tenant_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9._@+]+$").ok())
        .as_ref()
}

/// A pattern that failed to compile matches nothing.
fn matches(pattern: Option<&Regex>, value: &str) -> bool {
    pattern.is_some_and(|re| re.is_match(value))
}

/// A validated collection name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Result<Self, CollectionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CollectionError::EmptyCollection);
        }
        if !matches(collection_pattern(), &name) {
            return Err(CollectionError::InvalidCollection(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for CollectionName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CollectionName {
    type Error = CollectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CollectionName> for String {
    fn from(value: CollectionName) -> Self {
        value.0
    }
}

impl FromStr for CollectionName {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Caller-supplied tenant identifier (end-user id, case id, session id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Result<Self, CollectionError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CollectionError::EmptyTenant);
        }
        if id.contains(SEPARATOR) {
            return Err(CollectionError::TenantContainsSeparator(id));
        }
        if !matches(tenant_pattern(), &id) {
            return Err(CollectionError::InvalidTenant(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TenantId {
    type Error = CollectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.0
    }
}

impl FromStr for TenantId {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Per-integration collection prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, EnumString)]
pub enum CollectionPrefix {
    #[default]
    #[strum(serialize = "user")]
    User,
    #[strum(serialize = "learning")]
    Learning,
    #[strum(serialize = "legal")]
    Legal,
    #[strum(serialize = "legal-session")]
    LegalSession,
    #[strum(serialize = "lifecoach")]
    LifeCoach,
    #[strum(serialize = "secondbrain")]
    SecondBrain,
    #[strum(serialize = "customer")]
    Customer,
    /// Application-defined prefix, e.g. `prod-user`.
    #[strum(default)]
    Custom(String),
}

impl CollectionPrefix {
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Learning => "learning",
            Self::Legal => "legal",
            Self::LegalSession => "legal-session",
            Self::LifeCoach => "lifecoach",
            Self::SecondBrain => "secondbrain",
            Self::Customer => "customer",
            Self::Custom(s) => s,
        }
    }

    fn validate(&self) -> Result<(), CollectionError> {
        let prefix = self.as_str();
        if prefix.is_empty() {
            return Err(CollectionError::EmptyPrefix);
        }
        if prefix.starts_with(SEPARATOR) || prefix.ends_with(SEPARATOR) {
            return Err(CollectionError::InvalidPrefix(prefix.to_string()));
        }
        if !matches(collection_pattern(), prefix) {
            return Err(CollectionError::InvalidCollection(prefix.to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for CollectionPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tenant bound to a prefix, resolving to one isolated collection.
///
/// ```
/// use deltamemory::collection::{CollectionPrefix, TenantId, TenantScope};
///
/// let scope = TenantScope::new(CollectionPrefix::Legal, TenantId::new("case42")?)?;
/// assert_eq!(scope.collection().as_str(), "legal-case42");
/// # Ok::<(), deltamemory::collection::CollectionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantScope {
    prefix: CollectionPrefix,
    tenant: TenantId,
    collection: CollectionName,
}

impl TenantScope {
    pub fn new(prefix: CollectionPrefix, tenant: TenantId) -> Result<Self, CollectionError> {
        prefix.validate()?;
        let collection = CollectionName::new(format!("{prefix}{SEPARATOR}{tenant}"))?;
        Ok(Self {
            prefix,
            tenant,
            collection,
        })
    }

    /// Parse a scoped collection name back into its prefix and tenant.
    pub fn parse(name: &str) -> Result<Self, CollectionError> {
        let (prefix, tenant) = name
            .rsplit_once(SEPARATOR)
            .ok_or_else(|| CollectionError::InvalidCollection(name.to_string()))?;
        let prefix: CollectionPrefix = prefix
            .parse()
            .map_err(|_| CollectionError::InvalidPrefix(prefix.to_string()))?;
        Self::new(prefix, TenantId::new(tenant)?)
    }

    pub fn prefix(&self) -> &CollectionPrefix {
        &self.prefix
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scope(prefix: CollectionPrefix, tenant: &str) -> TenantScope {
        TenantScope::new(prefix, TenantId::new(tenant).unwrap()).unwrap()
    }

    #[test]
    fn name_patterns_compile() {
        assert!(collection_pattern().is_some());
        assert!(tenant_pattern().is_some());
        assert!(matches(collection_pattern(), "user-alice"));
        assert!(!matches(tenant_pattern(), "user-alice"));
        assert!(!matches(None, "anything"));
    }

    #[test]
    fn builds_prefix_tenant_names_for_every_integration() {
        let cases = [
            (CollectionPrefix::User, "user-u1"),
            (CollectionPrefix::Learning, "learning-u1"),
            (CollectionPrefix::Legal, "legal-u1"),
            (CollectionPrefix::LegalSession, "legal-session-u1"),
            (CollectionPrefix::LifeCoach, "lifecoach-u1"),
            (CollectionPrefix::SecondBrain, "secondbrain-u1"),
            (CollectionPrefix::Customer, "customer-u1"),
            (CollectionPrefix::Custom("prod-user".into()), "prod-user-u1"),
        ];
        for (prefix, expected) in cases {
            assert_eq!(scope(prefix, "u1").collection().as_str(), expected);
        }
    }

    #[test]
    fn default_prefix_is_user() {
        assert_eq!(CollectionPrefix::default().as_str(), "user");
    }

    #[test]
    fn prefix_parses_known_and_custom_values() {
        assert_eq!(
            "legal-session".parse::<CollectionPrefix>().unwrap(),
            CollectionPrefix::LegalSession
        );
        assert_eq!(
            "myapp".parse::<CollectionPrefix>().unwrap(),
            CollectionPrefix::Custom("myapp".into())
        );
    }

    #[test]
    fn tenant_with_separator_is_rejected() {
        let err = TenantId::new("session-x").unwrap_err();
        assert_eq!(err, CollectionError::TenantContainsSeparator("session-x".into()));
    }

    #[test]
    fn ambiguous_pair_cannot_be_constructed() {
        // ("legal", "session-x") would collide with ("legal-session", "x").
        assert!(TenantId::new("session-x").is_err());
        let legal = scope(CollectionPrefix::LegalSession, "x");
        assert_eq!(legal.collection().as_str(), "legal-session-x");
    }

    #[test]
    fn tenant_rejects_path_and_whitespace_characters() {
        assert!(matches!(
            TenantId::new("a/b"),
            Err(CollectionError::InvalidTenant(_))
        ));
        assert!(matches!(
            TenantId::new("a b"),
            Err(CollectionError::InvalidTenant(_))
        ));
        assert_eq!(TenantId::new(""), Err(CollectionError::EmptyTenant));
    }

    #[test]
    fn tenant_accepts_email_like_ids() {
        assert!(TenantId::new("ada@example.com").is_ok());
    }

    #[test]
    fn prefix_must_not_dangle_separator() {
        let tenant = TenantId::new("u1").unwrap();
        let err = TenantScope::new(CollectionPrefix::Custom("app-".into()), tenant.clone())
            .unwrap_err();
        assert_eq!(err, CollectionError::InvalidPrefix("app-".into()));

        let err = TenantScope::new(CollectionPrefix::Custom(String::new()), tenant).unwrap_err();
        assert_eq!(err, CollectionError::EmptyPrefix);
    }

    #[test]
    fn parse_recovers_prefix_and_tenant() {
        let parsed = TenantScope::parse("legal-session-case7").unwrap();
        assert_eq!(parsed.prefix(), &CollectionPrefix::LegalSession);
        assert_eq!(parsed.tenant().as_str(), "case7");
    }

    #[test]
    fn distinct_tenants_get_distinct_collections() {
        let a = scope(CollectionPrefix::User, "alice");
        let b = scope(CollectionPrefix::User, "bob");
        assert_ne!(a.collection(), b.collection());
    }

    #[test]
    fn collection_name_validation() {
        assert!(CollectionName::new("hello-world").is_ok());
        assert_eq!(CollectionName::new(""), Err(CollectionError::EmptyCollection));
        assert!(matches!(
            CollectionName::new("a/b"),
            Err(CollectionError::InvalidCollection(_))
        ));
    }

    #[test]
    fn collection_name_deserialization_validates() {
        let ok: CollectionName = serde_json::from_str("\"team\"").unwrap();
        assert_eq!(ok.as_str(), "team");
        assert!(serde_json::from_str::<CollectionName>("\"bad name\"").is_err());
    }
}
