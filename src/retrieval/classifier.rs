//! Request classification: which retrievers run, with which arguments
//!
//! The classifier is the injectable half of the router. The dispatch and
//! aggregation contract never changes; swapping [`RuleClassifier`] for
//! [`LlmClassifier`] only changes how the plan is produced. A plan may hold
//! zero, one, or several invocations, including repeated invocations of the
//! same retriever with different arguments.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::AttributeField;
use crate::retrieval::llm::LlmClassifier;
use crate::Result;

/// One planned retriever invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    Structured {
        field: String,
        value: String,
    },
    Semantic {
        user_id: String,
        k: Option<usize>,
    },
    Relational {
        user_id: String,
        max_results: Option<usize>,
    },
}

impl ToolCall {
    /// Short label used in diagnostics and logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Structured { field, value } => format!("structured({field}={value})"),
            Self::Semantic { user_id, .. } => format!("semantic({user_id})"),
            Self::Relational { user_id, .. } => format!("relational({user_id})"),
        }
    }
}

/// Injectable classification strategy.
pub enum RouteStrategy {
    Rule(RuleClassifier),
    Llm(LlmClassifier),
}

impl RouteStrategy {
    pub async fn classify(&self, request: &str) -> Result<Vec<ToolCall>> {
        match self {
            Self::Rule(classifier) => Ok(classifier.classify(request)),
            Self::Llm(classifier) => classifier.classify(request).await,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rule(_) => "rule",
            Self::Llm(_) => "llm",
        }
    }
}

fn field_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(company|school|location)\s*[:=]\s*([^,;?!]+)").expect("valid regex")
    })
}

fn user_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bu\d{3}\b").expect("valid regex"))
}

fn works_at_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bwork(?:s|ed|ing)?\s+(?:at|for)\s+([^?.,!]+)").expect("valid regex")
    })
}

fn school_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:went to|attended|studied at|graduated from)\s+([^?.,!]+)")
            .expect("valid regex")
    })
}

fn location_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:based in|located in|living in|lives in)\s+([^?.,!]+)")
            .expect("valid regex")
    })
}

/// Keyword- and pattern-based classifier; the zero-dependency default.
pub struct RuleClassifier;

impl RuleClassifier {
    /// Build a dispatch plan from the request text.
    ///
    /// Explicit `field:value` pairs always dispatch structured lookups. A
    /// canonical user id in the text unlocks the semantic and relational
    /// strategies, keyed on their vocabulary; both can fire for the same
    /// request. Phrase patterns ("works at X", "went to X") catch the common
    /// structured phrasings without explicit syntax. An unclassifiable
    /// request yields an empty plan, which the router reports as no results.
    pub fn classify(&self, request: &str) -> Vec<ToolCall> {
        let mut plan = Vec::new();

        for capture in field_value_re().captures_iter(request) {
            let field = capture[1].to_lowercase();
            let value = capture[2].trim().to_string();
            if AttributeField::parse(&field).is_some() && !value.is_empty() {
                plan.push(ToolCall::Structured { field, value });
            }
        }

        let user_id = user_id_re()
            .find(request)
            .map(|m| m.as_str().to_string());
        let lowered = request.to_lowercase();

        if let Some(user_id) = &user_id {
            if ["similar", "like", "resembl"]
                .iter()
                .any(|kw| lowered.contains(kw))
            {
                plan.push(ToolCall::Semantic {
                    user_id: user_id.clone(),
                    k: None,
                });
            }
            if ["connection", "connected", "network", "knows"]
                .iter()
                .any(|kw| lowered.contains(kw))
            {
                plan.push(ToolCall::Relational {
                    user_id: user_id.clone(),
                    max_results: None,
                });
            }
        }

        if plan.is_empty() {
            if let Some(capture) = works_at_re().captures(request) {
                plan.push(ToolCall::Structured {
                    field: "company".to_string(),
                    value: capture[1].trim().to_string(),
                });
            }
            if let Some(capture) = school_re().captures(request) {
                plan.push(ToolCall::Structured {
                    field: "school".to_string(),
                    value: capture[1].trim().to_string(),
                });
            }
            if let Some(capture) = location_re().captures(request) {
                plan.push(ToolCall::Structured {
                    field: "location".to_string(),
                    value: capture[1].trim().to_string(),
                });
            }
        }

        plan
    }
}
