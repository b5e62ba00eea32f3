//! Entity resolution: person names in free text become canonical user ids
//!
//! Name extraction is an external NLU capability; it is injected behind
//! [`PersonNameExtractor`] so a proper NER model can replace the shipped
//! heuristic without touching the router. Resolution always degrades
//! gracefully: no extracted name, no match, or a backend failure all leave
//! the request text untouched.

use std::sync::Arc;

use tracing::debug;
use tracing::warn;

use crate::database::Database;
use crate::Result;

/// Injected name-extraction capability.
pub trait PersonNameExtractor: Send + Sync {
    /// Extract a candidate person name from free text, if any.
    fn extract(&self, text: &str) -> Option<String>;
}

/// Capitalized-run heuristic: the first run of two or more capitalized
/// words is taken as a candidate name ("Find connections for Alice Heart"
/// yields "Alice Heart"). A lossy stand-in for a proper NER model; single
/// capitalized words and all-caps tokens are ignored to avoid matching
/// sentence starts and acronyms.
pub struct HeuristicNameExtractor;

impl PersonNameExtractor for HeuristicNameExtractor {
    fn extract(&self, text: &str) -> Option<String> {
        let mut run: Vec<String> = Vec::new();

        for raw in text.split_whitespace() {
            let token = clean_token(raw);
            if is_name_word(&token) {
                run.push(token);
            } else {
                if run.len() >= 2 {
                    return Some(run.join(" "));
                }
                run.clear();
            }
        }

        if run.len() >= 2 {
            Some(run.join(" "))
        } else {
            None
        }
    }
}

/// Strip surrounding punctuation and a trailing possessive.
fn clean_token(raw: &str) -> String {
    let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
    trimmed
        .strip_suffix("'s")
        .or_else(|| trimmed.strip_suffix("\u{2019}s"))
        .unwrap_or(trimmed)
        .to_string()
}

/// Capitalized word with a lowercase tail ("Alice" yes, "MIT" no).
fn is_name_word(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let rest: Vec<char> = chars.collect();
            !rest.is_empty() && rest.iter().all(|c| c.is_lowercase() && c.is_alphabetic())
        }
        _ => false,
    }
}

/// A resolved person reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntity {
    pub name: String,
    pub user_id: String,
}

/// Resolves free-text person references against the relational store.
pub struct EntityResolver {
    database: Arc<Database>,
    extractor: Box<dyn PersonNameExtractor>,
}

impl EntityResolver {
    pub fn new(database: Arc<Database>, extractor: Box<dyn PersonNameExtractor>) -> Self {
        Self {
            database,
            extractor,
        }
    }

    /// Resolver with the built-in heuristic extractor.
    pub fn with_heuristics(database: Arc<Database>) -> Self {
        Self::new(database, Box::new(HeuristicNameExtractor))
    }

    /// Resolve a person name mentioned in the text to a user id.
    ///
    /// Exact match on `name`; names are assumed unique in the dataset (an
    /// assumption about the shipped data, not an enforced invariant).
    /// `None` when nothing was extracted or nothing matched; a name shared
    /// by several users is `AmbiguousEntity`, which [`Self::preprocess`]
    /// degrades to the unresolved input.
    pub async fn resolve_name(&self, text: &str) -> Result<Option<ResolvedEntity>> {
        let Some(name) = self.extractor.extract(text) else {
            return Ok(None);
        };

        let mut user_ids = self.database.get_user_ids_by_name(&name).await?;
        if user_ids.len() > 1 {
            return Err(crate::NetRecError::AmbiguousEntity(name));
        }

        Ok(user_ids.pop().map(|user_id| {
            debug!("Resolved '{}' to {}", name, user_id);
            ResolvedEntity { name, user_id }
        }))
    }

    /// Rewrite the request with the resolved name replaced by its id.
    ///
    /// Any failure along the way (including a backend error) degrades to the
    /// original text; resolution is never allowed to fail the request.
    pub async fn preprocess(&self, text: &str) -> String {
        match self.resolve_name(text).await {
            Ok(Some(resolved)) => text.replace(&resolved.name, &resolved.user_id),
            Ok(None) => text.to_string(),
            Err(e) => {
                warn!("Name resolution failed, using request as-is: {}", e);
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_two_word_name() {
        let extractor = HeuristicNameExtractor;
        assert_eq!(
            extractor.extract("Find connections for Alice Heart"),
            Some("Alice Heart".to_string())
        );
    }

    #[test]
    fn test_extract_possessive() {
        let extractor = HeuristicNameExtractor;
        assert_eq!(
            extractor.extract("Who is in John Smith's network?"),
            Some("John Smith".to_string())
        );
    }

    #[test]
    fn test_extract_ignores_single_capitalized_word() {
        let extractor = HeuristicNameExtractor;
        // "Find" starts the sentence; "Google" is one word
        assert_eq!(extractor.extract("Find users who work at Google"), None);
    }

    #[test]
    fn test_extract_ignores_acronyms() {
        let extractor = HeuristicNameExtractor;
        assert_eq!(extractor.extract("Who went to MIT?"), None);
    }

    #[test]
    fn test_extract_none_on_lowercase_text() {
        let extractor = HeuristicNameExtractor;
        assert_eq!(extractor.extract("find users similar to u001"), None);
    }

    #[test]
    fn test_clean_token_strips_punctuation() {
        assert_eq!(clean_token("Heart,"), "Heart");
        assert_eq!(clean_token("Smith's"), "Smith");
        assert_eq!(clean_token("(Alice)"), "Alice");
    }
}
