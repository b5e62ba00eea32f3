//! Result aggregation across retriever invocations
//!
//! All recommendations from all successful invocations fold into one
//! insertion-ordered mapping keyed by user id. The fold is left-to-right in
//! dispatch order, so the final reason string is deterministic even when
//! invocations completed concurrently. A user recommended by several
//! invocations keeps every reason, joined with `" & "`; provenance is never
//! overwritten.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::Recommendation;

/// Joins reasons contributed by different invocations for the same user.
pub const REASON_SEPARATOR: &str = " & ";

/// Result of one retriever invocation, success or contained failure.
///
/// Failures carry the diagnostic string produced at the invocation
/// boundary; the error never propagates past it.
#[derive(Debug, Clone)]
pub struct InvocationOutcome {
    /// Label of the invocation, e.g. `structured(company=Acme)`
    pub invocation: String,
    pub result: std::result::Result<Vec<Recommendation>, String>,
}

impl InvocationOutcome {
    pub fn ok(invocation: impl Into<String>, recommendations: Vec<Recommendation>) -> Self {
        Self {
            invocation: invocation.into(),
            result: Ok(recommendations),
        }
    }

    pub fn failed(invocation: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            invocation: invocation.into(),
            result: Err(diagnostic.into()),
        }
    }
}

/// Fold invocation outcomes into a merged, deduplicated recommendation set.
///
/// Outcomes are visited in dispatch order; failed invocations contribute
/// nothing but do not disturb the fold. First appearance fixes a user's
/// position; later reasons append.
pub fn merge(outcomes: &[InvocationOutcome]) -> Vec<Recommendation> {
    let mut order: Vec<String> = Vec::new();
    let mut reasons: HashMap<String, String> = HashMap::new();

    for outcome in outcomes {
        let Ok(recommendations) = &outcome.result else {
            continue;
        };
        for recommendation in recommendations {
            if let Some(existing) = reasons.get_mut(&recommendation.user_id) {
                existing.push_str(REASON_SEPARATOR);
                existing.push_str(&recommendation.reason);
            } else {
                order.push(recommendation.user_id.clone());
                reasons.insert(recommendation.user_id.clone(), recommendation.reason.clone());
            }
        }
    }

    order
        .into_iter()
        .map(|user_id| {
            let reason = reasons.remove(&user_id).unwrap_or_default();
            Recommendation { user_id, reason }
        })
        .collect()
}

fn user_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bu\d{3}\b").expect("valid regex"))
}

/// Best-effort recovery: scan free text for canonical user ids.
///
/// A lossy last resort for when retrievers produced prose instead of
/// structured records: it loses reasons and can pick up ids that were
/// merely mentioned. Never the primary aggregation path. Duplicates are
/// dropped, first-seen order kept.
pub fn extract_user_ids(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for found in user_id_re().find_iter(text) {
        let id = found.as_str().to_string();
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(user_id: &str, reason: &str) -> Recommendation {
        Recommendation::new(user_id, reason)
    }

    #[test]
    fn test_merge_concatenates_reasons_in_dispatch_order() {
        let outcomes = vec![
            InvocationOutcome::ok("relational(u001)", vec![rec("u002", "Shared Company: Acme")]),
            InvocationOutcome::ok("semantic(u001)", vec![rec("u002", "Similar profile")]),
        ];

        let merged = merge(&outcomes);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].reason, "Shared Company: Acme & Similar profile");
    }

    #[test]
    fn test_merge_never_drops_a_reason() {
        let outcomes = vec![
            InvocationOutcome::ok("a", vec![rec("u002", "first")]),
            InvocationOutcome::ok("b", vec![rec("u002", "second")]),
            InvocationOutcome::ok("c", vec![rec("u002", "third")]),
        ];

        let merged = merge(&outcomes);
        assert_eq!(merged[0].reason, "first & second & third");
    }

    #[test]
    fn test_merge_preserves_first_seen_position() {
        let outcomes = vec![
            InvocationOutcome::ok("a", vec![rec("u005", "A"), rec("u002", "B")]),
            InvocationOutcome::ok("b", vec![rec("u001", "C"), rec("u005", "D")]),
        ];

        let merged = merge(&outcomes);
        let ids: Vec<_> = merged.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["u005", "u002", "u001"]);
        assert_eq!(merged[0].reason, "A & D");
    }

    #[test]
    fn test_merge_failed_invocation_does_not_block_siblings() {
        let outcomes = vec![
            InvocationOutcome::failed("semantic(u001)", "Backend unavailable: vector index"),
            InvocationOutcome::ok("structured(company=Acme)", vec![rec("u002", "Same company: Acme")]),
        ];

        let merged = merge(&outcomes);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].user_id, "u002");
    }

    #[test]
    fn test_merge_all_failed_is_empty() {
        let outcomes = vec![
            InvocationOutcome::failed("a", "down"),
            InvocationOutcome::failed("b", "also down"),
        ];
        assert!(merge(&outcomes).is_empty());
    }

    #[test]
    fn test_extract_user_ids_word_bounded() {
        let ids = extract_user_ids("Recommended: u001 and u023. Not u12, not u1234, not xu001x.");
        assert_eq!(ids, vec!["u001", "u023"]);
    }

    #[test]
    fn test_extract_user_ids_dedup_keeps_first_seen_order() {
        let ids = extract_user_ids("u003, u001, u003, u001");
        assert_eq!(ids, vec!["u003", "u001"]);
    }

    #[test]
    fn test_extract_user_ids_empty_text() {
        assert!(extract_user_ids("no identifiers here").is_empty());
    }
}
