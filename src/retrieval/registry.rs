//! Retriever capability registry
//!
//! Each retrieval strategy declares a name, a description, and an input
//! schema. The LLM classifier hands these to the model as callable tools;
//! the API exposes the same list so callers can see what the router can
//! dispatch to.

use serde::Serialize;

/// Tool name for the structured retriever
pub const STRUCTURED_TOOL: &str = "structured_retriever";
/// Tool name for the semantic retriever
pub const SEMANTIC_TOOL: &str = "semantic_retriever";
/// Tool name for the relational retriever
pub const RELATIONAL_TOOL: &str = "graph_retriever";

/// Declared capability of one retriever
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// The three built-in retrieval capabilities.
pub fn builtin_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: STRUCTURED_TOOL.to_string(),
            description: "Searches for users based on structured data like company, school, \
                          or location. Use this for queries like 'Find users who work at \
                          Google' or 'Who went to MIT?'."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "field": {
                        "type": "string",
                        "enum": ["company", "school", "location"],
                        "description": "The attribute to filter on"
                    },
                    "value": {
                        "type": "string",
                        "description": "The exact value to match"
                    }
                },
                "required": ["field", "value"]
            }),
        },
        ToolSpec {
            name: SEMANTIC_TOOL.to_string(),
            description: "Finds users with semantically similar bios or profiles. Use this \
                          for queries like 'Find users similar to u001' or 'Who has a \
                          profile like u001?'."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "Canonical user id, e.g. u001"
                    },
                    "k": {
                        "type": "integer",
                        "description": "Number of neighbors to retrieve",
                        "default": 5
                    }
                },
                "required": ["user_id"]
            }),
        },
        ToolSpec {
            name: RELATIONAL_TOOL.to_string(),
            description: "Finds users connected through a shared school or company \
                          (2nd-degree connections). Use this for queries about network \
                          connections, like 'Who is in u001's network?' or 'Find \
                          connections for u001'."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "Canonical user id, e.g. u001"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Cap on returned users",
                        "default": 10
                    }
                },
                "required": ["user_id"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tools_complete() {
        let tools = builtin_tools();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec![STRUCTURED_TOOL, SEMANTIC_TOOL, RELATIONAL_TOOL]);
    }

    #[test]
    fn test_schemas_declare_required_fields() {
        for tool in builtin_tools() {
            let required = tool.input_schema.get("required").unwrap();
            assert!(required.as_array().is_some_and(|r| !r.is_empty()));
        }
    }
}
