//! Blog-post generation prompts.

use std::fmt::Write as _;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Version tag of the prompt template, recorded alongside generated posts.
pub const PROMPT_VERSION: &str = "1.0";

/// Knobs for [`generate_prompt`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PromptParams {
    /// What the post is about.
    pub topic: String,
    /// e.g. Persuasive, Narrative, Informative, Descriptive, Expository.
    pub writing_style: String,
    /// e.g. General Public, Technical/Expert, Academic, Business.
    pub audience_type: String,
    /// Formal, Semi-formal or Informal.
    pub formality_level: String,
    /// Short, Medium or Long.
    pub length_detail: String,
    /// Free-form extra requirements; omitted from the prompt when blank.
    pub additional_instructions: String,
}

impl Default for PromptParams {
    fn default() -> Self {
        Self {
            topic: String::new(),
            writing_style: "Informative".to_string(),
            audience_type: "General Public".to_string(),
            formality_level: "Semi-formal".to_string(),
            length_detail: "Medium".to_string(),
            additional_instructions: String::new(),
        }
    }
}

impl PromptParams {
    /// Default parameters for `topic`.
    pub fn for_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }
}

/// Build the generation prompt for `params`.
///
/// A blank topic has nothing to write about, so it yields [`fallback_prompt`].
pub fn generate_prompt(params: &PromptParams) -> String {
    let topic = params.topic.trim();
    if topic.is_empty() {
        tracing::debug!("blank topic, using fallback prompt");
        return fallback_prompt().to_string();
    }

    let length = params.length_detail.trim();
    let mut prompt = format!(
        "Write a {} blog post on the topic: \"{topic}\".\n\n",
        length.to_lowercase()
    );
    let _ = writeln!(prompt, "Writing Style: {}", params.writing_style.trim());
    let _ = writeln!(prompt, "Audience Type: {}", params.audience_type.trim());
    let _ = writeln!(prompt, "Formality Level: {}", params.formality_level.trim());
    let _ = writeln!(prompt, "Length/Detail Level: {length}");
    prompt.push_str(
        "\nThe blog post should include:\n\
         - An engaging introduction that hooks the reader\n\
         - Well-structured body with clear arguments and supporting evidence\n\
         - A conclusion that summarizes key points and provides closure\n\
         \n\
         Additional Requirements:\n\
         - Ensure content is accurate and properly structured\n\
         - Use language appropriate for the specified audience\n\
         - Include relevant examples and explanations\n\
         - Avoid unsupported claims or offensive language\n\
         - Use HTML headings (h1, h2, h3) for proper structure\n\
         - Format the content with appropriate HTML tags (p, ul, ol, li, etc.)",
    );

    let extra = params.additional_instructions.trim();
    if !extra.is_empty() {
        let _ = write!(prompt, "\n\nSpecific Instructions:\n{extra}");
    }

    prompt
}

/// Topic-less prompt used when no usable parameters are available.
pub const fn fallback_prompt() -> &'static str {
    "Write a blog post on the given topic. Include an introduction, body, and conclusion. \
     Use appropriate language and structure for a general audience. \
     Use HTML headings (h1, h2, h3) and format the content with appropriate HTML tags."
}
