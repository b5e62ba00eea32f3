use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Canonical user entity, owned by the relational store.
///
/// Created during ingestion and immutable within a recommendation session.
/// `user_id` is the stable key (`u###` in the shipped datasets).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub school: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
}

/// Merged bio text for one user, regenerated wholesale on each ingestion run.
///
/// A user may have zero or multiple source fragments; `sources` keeps the
/// provenance tags in merge order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BioDocument {
    pub user_id: String,
    pub bio: String,
    pub sources: Vec<String>,
}

/// A single recommended user with human-readable provenance.
///
/// Ephemeral, produced per-request, never persisted. When more than one
/// retriever recommends the same user the aggregator concatenates reasons
/// rather than overwriting them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub user_id: String,
    pub reason: String,
}

impl Recommendation {
    pub fn new(user_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            reason: reason.into(),
        }
    }
}

/// Result of one routed request: the router's textual summary plus the
/// merged, insertion-ordered recommendation set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterResult {
    pub text: String,
    pub recommendations: Vec<Recommendation>,
}

/// Allow-listed structured lookup fields.
///
/// The structured retriever only ever interpolates columns from this enum
/// into SQL, so arbitrary column injection is impossible by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeField {
    Company,
    School,
    Location,
}

impl AttributeField {
    /// Names accepted by [`AttributeField::parse`], in canonical order.
    pub const ALLOWED: [&'static str; 3] = ["company", "school", "location"];

    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "company" => Some(Self::Company),
            "school" => Some(Self::School),
            "location" => Some(Self::Location),
            _ => None,
        }
    }

    /// Column name in the users table.
    pub const fn column(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::School => "school",
            Self::Location => "location",
        }
    }
}

impl std::fmt::Display for AttributeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_field_parse_allowed() {
        assert_eq!(AttributeField::parse("company"), Some(AttributeField::Company));
        assert_eq!(AttributeField::parse("school"), Some(AttributeField::School));
        assert_eq!(AttributeField::parse("location"), Some(AttributeField::Location));
    }

    #[test]
    fn test_attribute_field_parse_rejects_unknown() {
        assert_eq!(AttributeField::parse("email"), None);
        assert_eq!(AttributeField::parse("user_id"), None);
        // Near-misses must not pass either
        assert_eq!(AttributeField::parse("Company"), None);
        assert_eq!(AttributeField::parse(" company"), None);
    }

    #[test]
    fn test_attribute_field_display_matches_column() {
        for field in ["company", "school", "location"] {
            let parsed = AttributeField::parse(field).unwrap();
            assert_eq!(parsed.to_string(), field);
            assert_eq!(parsed.column(), field);
        }
    }

    #[test]
    fn test_recommendation_new() {
        let rec = Recommendation::new("u001", "Same company: Acme");
        assert_eq!(rec.user_id, "u001");
        assert_eq!(rec.reason, "Same company: Acme");
    }
}
