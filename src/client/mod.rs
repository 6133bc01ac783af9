//! Authenticated REST client for the LiminalDB API.

pub mod endpoints;
pub mod http;

pub use endpoints::Endpoint;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::TokenResolver;
use crate::config::LiminalConfig;
use crate::error::{LiminalError, Result};
use crate::types::{
    DeletePromptResponse, HealthResponse, ImportPreviewResponse, ImportResponse,
    PreferenceResponse, Prompt, PromptFlags, PromptInput, PromptUpdate, SavePromptsResponse,
    Surface, TagCatalog, ThemeId, UpdatePromptResponse, WhoamiResponse,
};

/// Filters shared by list and search.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub limit: Option<u32>,
    pub tags: Vec<String>,
}

impl ListOptions {
    fn push_query(&self, query: &mut Vec<(&'static str, String)>) {
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            query.push(("limit", limit.to_string()));
        }
        if !self.tags.is_empty() {
            query.push(("tags", self.tags.join(",")));
        }
    }
}

/// REST client; the bearer token is resolved again for every request.
///
/// # Example
/// ```no_run
/// use liminaldb::client::ApiClient;
/// use liminaldb::config::LiminalConfig;
///
/// # async fn example() -> liminaldb::error::Result<()> {
/// let client = ApiClient::from_config(&LiminalConfig::load())?;
/// for prompt in client.list_prompts(&Default::default()).await? {
///     println!("{}", prompt.slug);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    resolver: TokenResolver,
}

impl ApiClient {
    pub fn new(base_url: &str, resolver: TokenResolver) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| LiminalError::Configuration(format!("Invalid API URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(LiminalError::Configuration(format!(
                "Invalid API URL {base_url}"
            )));
        }
        Ok(Self {
            http: http::build_client()?,
            base_url,
            resolver,
        })
    }

    pub fn from_config(config: &LiminalConfig) -> Result<Self> {
        Self::new(&config.url, config.token_resolver())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Health

    pub async fn health(&self) -> Result<HealthResponse> {
        self.get(Endpoint::Health, &[], false).await
    }

    pub async fn health_auth(&self) -> Result<HealthResponse> {
        self.get(Endpoint::HealthAuth, &[], true).await
    }

    // Auth

    pub async fn whoami(&self) -> Result<WhoamiResponse> {
        self.get(Endpoint::Whoami, &[], true).await
    }

    // Prompts

    pub async fn list_prompts(&self, options: &ListOptions) -> Result<Vec<Prompt>> {
        let mut query = Vec::new();
        options.push_query(&mut query);
        self.get(Endpoint::Prompts, &query, true).await
    }

    pub async fn search_prompts(&self, query: &str, options: &ListOptions) -> Result<Vec<Prompt>> {
        let mut params = vec![("q", query.to_string())];
        options.push_query(&mut params);
        self.get(Endpoint::Prompts, &params, true).await
    }

    pub async fn get_prompt(&self, slug: &str) -> Result<Prompt> {
        self.get(Endpoint::PromptBySlug(slug), &[], true).await
    }

    pub async fn save_prompts(&self, prompts: &[PromptInput]) -> Result<SavePromptsResponse> {
        let body = json!({ "prompts": prompts });
        let resp = self
            .send(Method::POST, Endpoint::Prompts, &[], Some(body), true)
            .await?;
        read_json(resp).await
    }

    pub async fn update_prompt(
        &self,
        slug: &str,
        updates: &PromptUpdate,
    ) -> Result<UpdatePromptResponse> {
        let resp = self
            .send(
                Method::PUT,
                Endpoint::PromptBySlug(slug),
                &[],
                Some(to_body(updates)?),
                true,
            )
            .await?;
        read_json(resp).await
    }

    pub async fn delete_prompt(&self, slug: &str) -> Result<DeletePromptResponse> {
        let resp = self
            .send(Method::DELETE, Endpoint::PromptBySlug(slug), &[], None, true)
            .await?;
        Ok(read_optional_json(resp)
            .await?
            .unwrap_or(DeletePromptResponse { deleted: true }))
    }

    pub async fn update_flags(&self, slug: &str, flags: &PromptFlags) -> Result<()> {
        let resp = self
            .send(
                Method::PATCH,
                Endpoint::PromptFlags(slug),
                &[],
                Some(to_body(flags)?),
                true,
            )
            .await?;
        check_status(resp).await.map(drop)
    }

    pub async fn track_usage(&self, slug: &str) -> Result<()> {
        let resp = self
            .send(Method::POST, Endpoint::PromptUsage(slug), &[], Some(json!({})), true)
            .await?;
        check_status(resp).await.map(drop)
    }

    // Tags

    pub async fn list_tags(&self) -> Result<TagCatalog> {
        self.get(Endpoint::PromptTags, &[], true).await
    }

    // Import/Export

    /// Raw YAML document of every prompt.
    pub async fn export_prompts(&self) -> Result<String> {
        let resp = self
            .send(Method::GET, Endpoint::PromptsExport, &[], None, true)
            .await?;
        check_status(resp).await?.text().await.map_err(network_error)
    }

    pub async fn import_preview(&self, yaml: &str) -> Result<ImportPreviewResponse> {
        let resp = self
            .send(
                Method::POST,
                Endpoint::PromptsImportPreview,
                &[],
                Some(json!({ "yaml": yaml })),
                true,
            )
            .await?;
        read_json(resp).await
    }

    pub async fn import_prompts(
        &self,
        yaml: &str,
        slugs: Option<&[String]>,
    ) -> Result<ImportResponse> {
        let mut body = json!({ "yaml": yaml });
        if let Some(slugs) = slugs {
            body["slugs"] = json!(slugs);
        }
        let resp = self
            .send(Method::POST, Endpoint::PromptsImport, &[], Some(body), true)
            .await?;
        read_json(resp).await
    }

    // Preferences

    pub async fn get_preferences(&self, surface: Option<Surface>) -> Result<PreferenceResponse> {
        let query: Vec<(&str, String)> = surface
            .map(|s| vec![("surface", s.to_string())])
            .unwrap_or_default();
        self.get(Endpoint::Preferences, &query, true).await
    }

    pub async fn set_preferences(&self, surface: Surface, theme: ThemeId) -> Result<()> {
        let body = json!({ "surface": surface, "theme": theme });
        let resp = self
            .send(Method::PUT, Endpoint::Preferences, &[], Some(body), true)
            .await?;
        check_status(resp).await.map(drop)
    }

    // HTTP primitives

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint<'_>,
        query: &[(&str, String)],
        auth: bool,
    ) -> Result<T> {
        let resp = self.send(Method::GET, endpoint, query, None, auth).await?;
        read_json(resp).await
    }

    async fn send(
        &self,
        method: Method,
        endpoint: Endpoint<'_>,
        query: &[(&str, String)],
        body: Option<Value>,
        auth: bool,
    ) -> Result<reqwest::Response> {
        let url = self.url_for(endpoint)?;
        // Resolved per request so a login in another shell is picked up.
        let token = if auth {
            Some(self.resolver.resolve()?)
        } else {
            None
        };
        tracing::debug!(method = %method, path = %endpoint.path(), auth, "api request");

        let mut request = self
            .http
            .request(method, url)
            .headers(http::request_headers(token.as_deref())?);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }
        request.send().await.map_err(network_error)
    }

    fn url_for(&self, endpoint: Endpoint<'_>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                LiminalError::Configuration(format!("Invalid API URL {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(endpoint.segments());
        Ok(url)
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn network_error(err: reqwest::Error) -> LiminalError {
    LiminalError::Network(format!("Request failed: {err}"))
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let is_json = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    let body = resp.text().await.unwrap_or_default();
    Err(http::status_to_error(status.as_u16(), &body, is_json))
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let text = check_status(resp).await?.text().await.map_err(network_error)?;
    Ok(serde_json::from_str(&text)?)
}

/// `None` for `204 No Content` or an empty body.
async fn read_optional_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Option<T>> {
    let resp = check_status(resp).await?;
    if resp.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let text = resp.text().await.map_err(network_error)?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&text)?))
}
