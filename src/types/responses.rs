//! Response bodies and account-level types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use super::prompt::Prompt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        rename = "sessionId",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub convex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoamiResponse {
    pub user: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePromptsResponse {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePromptResponse {
    pub updated: Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePromptResponse {
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreviewResponse {
    pub total: u64,
    pub new_slugs: Vec<String>,
    pub duplicate_slugs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceResponse {
    pub theme: String,
}

/// Tag names grouped by dimension (`purpose`, `domain`, `task`).
pub type TagCatalog = BTreeMap<String, Vec<String>>;

/// Client surface a preference applies to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Surface {
    Webapp,
    Chatgpt,
    Vscode,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
pub enum ThemeId {
    #[serde(rename = "light-1")]
    #[strum(serialize = "light-1")]
    Light1,
    #[serde(rename = "light-2")]
    #[strum(serialize = "light-2")]
    Light2,
    #[serde(rename = "light-3")]
    #[strum(serialize = "light-3")]
    Light3,
    #[serde(rename = "dark-1")]
    #[strum(serialize = "dark-1")]
    Dark1,
    #[serde(rename = "dark-2")]
    #[strum(serialize = "dark-2")]
    Dark2,
    #[serde(rename = "dark-3")]
    #[strum(serialize = "dark-3")]
    Dark3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_and_theme_parse_from_cli_strings() {
        assert_eq!("vscode".parse::<Surface>().unwrap(), Surface::Vscode);
        assert_eq!("dark-2".parse::<ThemeId>().unwrap(), ThemeId::Dark2);
        assert_eq!(ThemeId::Light3.to_string(), "light-3");
        assert!("sepia".parse::<ThemeId>().is_err());
    }

    #[test]
    fn theme_serializes_with_hyphen() {
        assert_eq!(serde_json::to_string(&ThemeId::Dark1).unwrap(), "\"dark-1\"");
    }

    #[test]
    fn variant_names_match_wire_values() {
        assert_eq!(Surface::VARIANTS, &["webapp", "chatgpt", "vscode"]);
        assert_eq!(ThemeId::VARIANTS[0], "light-1");
    }
}
