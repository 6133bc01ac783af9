//! REST routes exposed by the LiminalDB service.

/// A route relative to the API base URL.
///
/// Slugs are kept as separate path segments so they are percent-encoded when
/// joined onto the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Health,
    HealthAuth,
    Whoami,
    Prompts,
    PromptBySlug(&'a str),
    PromptFlags(&'a str),
    PromptUsage(&'a str),
    PromptTags,
    PromptsExport,
    PromptsImportPreview,
    PromptsImport,
    Preferences,
}

impl<'a> Endpoint<'a> {
    pub fn segments(&self) -> Vec<&'a str> {
        match *self {
            Self::Health => vec!["health"],
            Self::HealthAuth => vec!["api", "health"],
            Self::Whoami => vec!["auth", "me"],
            Self::Prompts => vec!["api", "prompts"],
            Self::PromptBySlug(slug) => vec!["api", "prompts", slug],
            Self::PromptFlags(slug) => vec!["api", "prompts", slug, "flags"],
            Self::PromptUsage(slug) => vec!["api", "prompts", slug, "usage"],
            Self::PromptTags => vec!["api", "prompts", "tags"],
            Self::PromptsExport => vec!["api", "prompts", "export"],
            Self::PromptsImportPreview => vec!["api", "prompts", "import", "preview"],
            Self::PromptsImport => vec!["api", "prompts", "import"],
            Self::Preferences => vec!["api", "preferences"],
        }
    }

    /// Unencoded path, for logs.
    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }
}
