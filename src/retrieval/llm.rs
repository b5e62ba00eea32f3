//! LLM tool-calling classifier
//!
//! Sends the request text to an OpenAI-compatible chat endpoint together
//! with the retriever capability registry as callable tools, and turns the
//! model's tool calls into a dispatch plan. The model may call zero, one, or
//! several tools, including the same tool twice with different arguments;
//! the router treats the resulting plan exactly like a rule-based one.

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::NetRecError;
use crate::retrieval::registry;
use crate::retrieval::registry::ToolSpec;
use crate::retrieval::ToolCall;
use crate::Result;

const SYSTEM_PROMPT: &str = "You are an AI assistant that helps find users in a professional \
                             network. Use the available tools to answer the user's request. \
                             Be precise and concise.";

/// Classifier backed by an LLM with function calling.
pub struct LlmClassifier {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    tools: Vec<ToolSpec>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    tools: Vec<ToolDef<'a>>,
    tool_choice: &'a str,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ToolDef<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    function: FunctionDef<'a>,
}

#[derive(Serialize)]
struct FunctionDef<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallMessage>>,
}

#[derive(Deserialize)]
struct ToolCallMessage {
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    /// JSON-encoded argument object, per the OpenAI wire format
    arguments: String,
}

impl LlmClassifier {
    /// Build a classifier from application configuration.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.llm_endpoint().to_string(),
            api_key: config.llm_key().to_string(),
            model: config.llm_model().to_string(),
            tools: registry::builtin_tools(),
        })
    }

    /// Ask the model which retrievers to invoke for this request.
    pub async fn classify(&self, request: &str) -> Result<Vec<ToolCall>> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        debug!("Calling LLM classifier: {}", url);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: request,
                },
            ],
            tools: self
                .tools
                .iter()
                .map(|tool| ToolDef {
                    kind: "function",
                    function: FunctionDef {
                        name: &tool.name,
                        description: &tool.description,
                        parameters: &tool.input_schema,
                    },
                })
                .collect(),
            tool_choice: "auto",
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NetRecError::Llm(format!(
                "Chat API error ({status}): {error_text}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| NetRecError::Llm(format!("Failed to parse response: {e}")))?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Ok(Vec::new());
        };

        let mut plan = Vec::new();
        for tool_call in choice.message.tool_calls.unwrap_or_default() {
            match parse_tool_call(&tool_call.function.name, &tool_call.function.arguments) {
                Ok(call) => plan.push(call),
                Err(e) => {
                    // One malformed call does not poison the rest of the plan
                    tracing::warn!(
                        "Ignoring malformed tool call '{}': {}",
                        tool_call.function.name,
                        e
                    );
                }
            }
        }

        debug!("LLM produced {} tool call(s)", plan.len());

        Ok(plan)
    }
}

/// Decode one wire-format tool call into a planned invocation.
fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)?;

    let string_arg = |key: &str| -> Result<String> {
        args.get(key)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| NetRecError::Llm(format!("Missing argument '{key}' for {name}")))
    };
    let usize_arg = |key: &str| -> Option<usize> {
        args.get(key)
            .and_then(serde_json::Value::as_u64)
            .map(|v| v as usize)
    };

    match name {
        registry::STRUCTURED_TOOL => Ok(ToolCall::Structured {
            field: string_arg("field")?.to_lowercase(),
            value: string_arg("value")?,
        }),
        registry::SEMANTIC_TOOL => Ok(ToolCall::Semantic {
            user_id: string_arg("user_id")?,
            k: usize_arg("k"),
        }),
        registry::RELATIONAL_TOOL => Ok(ToolCall::Relational {
            user_id: string_arg("user_id")?,
            max_results: usize_arg("max_results"),
        }),
        other => Err(NetRecError::Llm(format!("Unknown tool '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structured_tool_call() {
        let call = parse_tool_call(
            registry::STRUCTURED_TOOL,
            r#"{"field": "Company", "value": "Acme"}"#,
        )
        .unwrap();
        assert_eq!(
            call,
            ToolCall::Structured {
                field: "company".to_string(),
                value: "Acme".to_string()
            }
        );
    }

    #[test]
    fn test_parse_semantic_tool_call_with_k() {
        let call = parse_tool_call(
            registry::SEMANTIC_TOOL,
            r#"{"user_id": "u001", "k": 3}"#,
        )
        .unwrap();
        assert_eq!(
            call,
            ToolCall::Semantic {
                user_id: "u001".to_string(),
                k: Some(3)
            }
        );
    }

    #[test]
    fn test_parse_relational_defaults_cap() {
        let call = parse_tool_call(registry::RELATIONAL_TOOL, r#"{"user_id": "u002"}"#).unwrap();
        assert_eq!(
            call,
            ToolCall::Relational {
                user_id: "u002".to_string(),
                max_results: None
            }
        );
    }

    #[test]
    fn test_parse_rejects_missing_arguments() {
        assert!(parse_tool_call(registry::STRUCTURED_TOOL, r#"{"field": "company"}"#).is_err());
        assert!(parse_tool_call(registry::SEMANTIC_TOOL, "{}").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_tool() {
        assert!(parse_tool_call("shell", r#"{"cmd": "rm -rf /"}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(parse_tool_call(registry::SEMANTIC_TOOL, "not json").is_err());
    }
}
