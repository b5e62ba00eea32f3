//! Structured retrieval: exact filters over tabular user attributes

use std::sync::Arc;

use tracing::debug;

use crate::database::Database;
use crate::errors::NetRecError;
use crate::models::AttributeField;
use crate::models::Recommendation;
use crate::Result;

/// Retriever for allow-listed attribute filters.
pub struct StructuredRetriever {
    database: Arc<Database>,
}

impl StructuredRetriever {
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Validate a requested field against the allow-list.
    ///
    /// This is a security boundary, not convenience validation: only fields
    /// from [`AttributeField::ALLOWED`] may ever reach the query builder, so
    /// arbitrary column injection is impossible.
    pub fn parse_field(field: &str) -> Result<AttributeField> {
        AttributeField::parse(field)
            .ok_or_else(|| NetRecError::invalid_field(field, &AttributeField::ALLOWED))
    }

    /// All users whose `field` equals `value`, tagged with the matching
    /// attribute as the reason. An empty result is a valid answer, not an
    /// error.
    pub async fn find(&self, field: &str, value: &str) -> Result<Vec<Recommendation>> {
        // Validation happens before any backend access; an invalid field
        // never executes a query.
        let field = Self::parse_field(field)?;

        debug!("Structured lookup: {} = {}", field, value);

        let users = self.database.find_users_by_attribute(field, value).await?;

        Ok(users
            .into_iter()
            .map(|user| Recommendation::new(user.user_id, format!("Same {field}: {value}")))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_accepts_allow_list() {
        for field in AttributeField::ALLOWED {
            assert!(StructuredRetriever::parse_field(field).is_ok());
        }
    }

    #[test]
    fn test_parse_field_rejects_disallowed() {
        let err = StructuredRetriever::parse_field("email").unwrap_err();
        match err {
            NetRecError::InvalidField { field, allowed } => {
                assert_eq!(field, "email");
                assert_eq!(allowed, "company, school, location");
            }
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_field_error_names_allowed_set() {
        let err = StructuredRetriever::parse_field("user_id").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("user_id"));
        assert!(message.contains("company"));
        assert!(message.contains("school"));
        assert!(message.contains("location"));
    }
}
