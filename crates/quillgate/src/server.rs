//! MCP (Model Context Protocol) server.
//!
//! Exposes the scorer and prompt builders to AI assistants over stdio. The
//! assistant acts as the generator: it asks for a prompt, writes the post,
//! scores it, and requests a revision prompt when the score is too low.
//!
//! Each tool delegates to `quillgate_core`; nothing here makes scoring
//! decisions of its own.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use quillgate_core::config::{DEFAULT_LANGUAGE, ScoringConfig};
use quillgate_core::evaluation::{evaluation_prompt, parse_model_evaluation};
use quillgate_core::prompt::{PromptParams, generate_prompt};
use quillgate_core::revision::revision_prompt;
use quillgate_core::{ContentEvaluator, check_input_size};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `evaluate_content` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct EvaluateContentParams {
    /// The blog post (Markdown or HTML).
    pub content: String,
    /// Language hint; defaults to the server's configured language.
    pub language: Option<String>,
}

/// Parameters for the `revision_prompt` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RevisionPromptParams {
    /// The blog post to revise.
    pub content: String,
    /// Pass bar; defaults to the configured pass score.
    pub min_score: Option<f64>,
}

/// Parameters for the `parse_evaluation` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ParseEvaluationParams {
    /// A judge model's raw reply.
    pub reply: String,
}

/// Parameters for the `evaluation_prompt` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct EvaluationPromptParams {
    /// The blog post to be judged.
    pub content: String,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

/// MCP server exposing quillgate to AI assistants.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    scoring: ScoringConfig,
    language: String,
    max_input_bytes: Option<usize>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl ProjectServer {
    /// Create a server with default thresholds and the default input limit.
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
            scoring: ScoringConfig::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            max_input_bytes: Some(quillgate_core::DEFAULT_MAX_INPUT_BYTES),
        }
    }

    /// Use the given thresholds, language and input limit.
    #[must_use]
    pub fn with_settings(
        mut self,
        scoring: ScoringConfig,
        language: impl Into<String>,
        max_input_bytes: Option<usize>,
    ) -> Self {
        self.scoring = scoring;
        self.language = language.into();
        self.max_input_bytes = max_input_bytes;
        self
    }

    fn checked<'a>(&self, text: &'a str) -> Result<&'a str, McpError> {
        check_input_size(text, self.max_input_bytes)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        Ok(text)
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "promptVersion": quillgate_core::prompt::PROMPT_VERSION,
            "passScore": self.scoring.pass_score,
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Score a blog post.
    #[tool(
        description = "Score a blog post (0-110). Returns score, feedback, suggestions, readability, sentiment and keyword density."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn evaluate_content(
        &self,
        Parameters(params): Parameters<EvaluateContentParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "evaluate_content", "executing MCP tool");

        let content = self.checked(&params.content)?;
        let language = params.language.as_deref().unwrap_or(&self.language);
        let report = ContentEvaluator::new(self.scoring.clone()).evaluate(content, language);
        let json = to_json(&report)?;

        tracing::info!(
            tool = "evaluate_content",
            score = report.score,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Build a blog-post generation prompt.
    #[tool(
        description = "Build a blog-post generation prompt from topic, writingStyle, audienceType, formalityLevel, lengthDetail and additionalInstructions."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn generate_prompt(
        &self,
        Parameters(params): Parameters<PromptParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "generate_prompt", topic = %params.topic, "executing MCP tool");
        let prompt = generate_prompt(&params);
        tracing::info!(tool = "generate_prompt", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(prompt)]))
    }

    /// Score a post and, when it fails, return the prompt asking for a rewrite.
    #[tool(
        description = "Score a blog post; if it is below the pass bar, return a prompt describing what to fix. Returns JSON with passed, score and prompt."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn revision_prompt(
        &self,
        Parameters(params): Parameters<RevisionPromptParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "revision_prompt", "executing MCP tool");

        let content = self.checked(&params.content)?;
        let pass_score = params.min_score.unwrap_or(self.scoring.pass_score);
        let report = ContentEvaluator::new(self.scoring.clone()).evaluate(content, &self.language);
        let passed = report.passes(pass_score);
        let prompt = (!passed).then(|| revision_prompt(&report, content));

        let json = to_json(&serde_json::json!({
            "passed": passed,
            "score": report.score,
            "prompt": prompt,
        }))?;

        tracing::info!(tool = "revision_prompt", passed, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Build the model-as-judge prompt.
    #[tool(description = "Build a prompt asking a model to judge a blog post and reply with JSON.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn evaluation_prompt(
        &self,
        Parameters(params): Parameters<EvaluationPromptParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "evaluation_prompt", "executing MCP tool");
        let content = self.checked(&params.content)?;
        Ok(CallToolResult::success(vec![Content::text(
            evaluation_prompt(content),
        )]))
    }

    /// Parse a judge model's reply.
    #[tool(
        description = "Parse a judge model's reply into {score, feedback, suggestions}. Unparseable replies yield score 0."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn parse_evaluation(
        &self,
        Parameters(params): Parameters<ParseEvaluationParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "parse_evaluation", "executing MCP tool");

        let reply = self.checked(&params.reply)?;
        let evaluation = parse_model_evaluation(reply);
        let json = to_json(&evaluation)?;

        tracing::info!(
            tool = "parse_evaluation",
            score = evaluation.score,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use generate_prompt to draft a post, evaluate_content to score it, \
                 and revision_prompt to get rewrite instructions when it falls short.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    const POST: &str = "# Tea\n\nTea is a drink.\n\nHowever, it is also a ritual.\n\nTherefore, brew it well.";

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn json_of(result: &CallToolResult) -> serde_json::Value {
        let text = extract_text(result).expect("should have text content");
        serde_json::from_str(text).expect("valid JSON")
    }

    #[test]
    fn server_info_has_correct_name() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);
        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = ProjectServer::new();
        let result = server
            .get_info(Parameters(GetInfoParams {
                format: "json".to_string(),
            }))
            .expect("get_info should succeed");
        let json = json_of(&result);
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["passScore"], 70.0);
    }

    #[test]
    fn get_info_tool_returns_text_by_default() {
        let server = ProjectServer::new();
        let result = server
            .get_info(Parameters(GetInfoParams {
                format: default_format(),
            }))
            .expect("get_info should succeed");
        let text = extract_text(&result).expect("should have text content");
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn evaluate_content_tool_returns_report() {
        let server = ProjectServer::new();
        let result = server
            .evaluate_content(Parameters(EvaluateContentParams {
                content: POST.to_string(),
                language: None,
            }))
            .expect("evaluate_content should succeed");
        assert!(!result.is_error.unwrap_or(false));
        let json = json_of(&result);
        assert!(json["score"].as_f64().is_some());
        assert!(json["feedback"].is_array());
        assert!(json["keywordDensity"].is_object());
        assert_eq!(json["grammarErrors"], serde_json::json!([]));
    }

    #[test]
    fn evaluate_content_rejects_oversized_input() {
        let server = ProjectServer::new().with_settings(ScoringConfig::default(), "en", Some(8));
        let result = server.evaluate_content(Parameters(EvaluateContentParams {
            content: POST.to_string(),
            language: None,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn generate_prompt_tool_works() {
        let server = ProjectServer::new();
        let result = server
            .generate_prompt(Parameters(PromptParams::for_topic("Tea")))
            .expect("generate_prompt should succeed");
        let text = extract_text(&result).unwrap();
        assert!(text.contains("on the topic: \"Tea\""));
    }

    #[test]
    fn revision_prompt_tool_for_weak_post() {
        let server = ProjectServer::new();
        let result = server
            .revision_prompt(Parameters(RevisionPromptParams {
                content: "Too short.".to_string(),
                min_score: None,
            }))
            .expect("revision_prompt should succeed");
        let json = json_of(&result);
        assert_eq!(json["passed"], false);
        assert!(
            json["prompt"]
                .as_str()
                .unwrap()
                .ends_with("Original content:\nToo short.")
        );
    }

    #[test]
    fn revision_prompt_tool_skips_passing_post() {
        let server = ProjectServer::new();
        let result = server
            .revision_prompt(Parameters(RevisionPromptParams {
                content: "Anything.".to_string(),
                min_score: Some(0.0),
            }))
            .expect("revision_prompt should succeed");
        let json = json_of(&result);
        assert_eq!(json["passed"], true);
        assert!(json["prompt"].is_null());
    }

    #[test]
    fn evaluation_prompt_tool_embeds_content() {
        let server = ProjectServer::new();
        let result = server
            .evaluation_prompt(Parameters(EvaluationPromptParams {
                content: POST.to_string(),
            }))
            .expect("evaluation_prompt should succeed");
        assert!(extract_text(&result).unwrap().ends_with(POST));
    }

    #[test]
    fn parse_evaluation_tool_handles_garbage() {
        let server = ProjectServer::new();
        let result = server
            .parse_evaluation(Parameters(ParseEvaluationParams {
                reply: "not json".to_string(),
            }))
            .expect("parse_evaluation should succeed");
        let json = json_of(&result);
        assert_eq!(json["score"], 0.0);
        assert_eq!(json["suggestions"][0], "not json");
    }
}
