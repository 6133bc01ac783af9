//! Prompt resources as exchanged with the LiminalDB API.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::error::{LiminalError, Result};

const MAX_SLUG_LEN: usize = 200;
const MAX_NAME_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 2_000;
const MAX_CONTENT_LEN: usize = 100_000;
const MAX_TAGS: usize = 50;

static SLUG_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Tags accepted by the service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tag {
    Instruction,
    Reference,
    Persona,
    Workflow,
    Snippet,
    Code,
    Writing,
    Analysis,
    Planning,
    Design,
    Data,
    Communication,
    Review,
    Summarize,
    Explain,
    Debug,
    Transform,
    Extract,
    Translate,
}

/// Parse a comma-separated tag list such as `code, review`.
pub fn parse_tags(csv: &str) -> Result<Vec<Tag>> {
    csv.split(',')
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.parse::<Tag>().map_err(|_| {
                LiminalError::Validation(format!(
                    "Invalid tag: {raw}. Use: {}",
                    Tag::VARIANTS.join(", ")
                ))
            })
        })
        .collect()
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn split_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "string[]")]
    StringList,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Boolean,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::StringList => "string[]",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// Template parameter declared by a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A stored prompt.
///
/// Tags are kept as strings so prompts carrying tags newer than this client
/// still deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<PromptParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorited: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u64>,
    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<i64>,
}

/// Payload for creating a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptInput {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<PromptParameter>>,
}

impl PromptInput {
    pub fn validate(&self) -> Result<()> {
        validate_slug(&self.slug)?;
        check_len("name", &self.name, MAX_NAME_LEN)?;
        check_len("description", &self.description, MAX_DESCRIPTION_LEN)?;
        check_len("content", &self.content, MAX_CONTENT_LEN)?;
        if self.tags.len() > MAX_TAGS {
            return Err(LiminalError::Validation(format!(
                "Prompt {} has {} tags; at most {MAX_TAGS} are allowed.",
                self.slug,
                self.tags.len()
            )));
        }
        Ok(())
    }

    /// Accepts a single prompt object, an array, or `{"prompts": [...]}`.
    pub fn parse_many(input: &str) -> Result<Vec<Self>> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Batch {
            List(Vec<PromptInput>),
            Wrapped { prompts: Vec<PromptInput> },
            Single(PromptInput),
        }

        let batch: Batch = serde_json::from_str(input)
            .map_err(|e| LiminalError::Validation(format!("Invalid prompt JSON: {e}")))?;
        Ok(match batch {
            Batch::List(prompts) | Batch::Wrapped { prompts } => prompts,
            Batch::Single(prompt) => vec![prompt],
        })
    }
}

/// Partial update; unset fields are left unchanged by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorited: Option<bool>,
}

impl PromptUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Flag toggles sent to `PATCH /api/prompts/{slug}/flags`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromptFlags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorited: Option<bool>,
}

pub fn validate_slug(slug: &str) -> Result<()> {
    let pattern = SLUG_PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is valid")
    });
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN || !pattern.is_match(slug) {
        return Err(LiminalError::Validation(format!(
            "Invalid slug: {slug}. Use lowercase letters, digits and single hyphens."
        )));
    }
    Ok(())
}

fn check_len(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(LiminalError::Validation(format!(
            "Prompt {field} must be between 1 and {max} characters."
        )));
    }
    Ok(())
}
