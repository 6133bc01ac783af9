//! Handlers for `health`, `tags` and `prefs`.

use std::str::FromStr;

use strum::VariantNames;

use crate::client::ApiClient;
use crate::config::LiminalConfig;
use crate::error::{LiminalError, Result};
use crate::output::human;
use crate::types::{Surface, ThemeId};

use super::{emit, PrefsCommands, TagCommands};

pub async fn handle_health(config: &LiminalConfig, auth: bool) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let data = if auth {
        client.health_auth().await?
    } else {
        client.health().await?
    };
    emit(config, &data, human::format_health)
}

pub async fn handle_tags(config: &LiminalConfig, command: TagCommands) -> Result<()> {
    match command {
        TagCommands::List => {
            let client = ApiClient::from_config(config)?;
            let tags = client.list_tags().await?;
            emit(config, &tags, human::format_tags)
        }
    }
}

pub async fn handle_prefs(config: &LiminalConfig, command: PrefsCommands) -> Result<()> {
    match command {
        PrefsCommands::Get { surface } => {
            let surface = surface
                .as_deref()
                .map(parse_choice::<Surface>("surface"))
                .transpose()?;
            let client = ApiClient::from_config(config)?;
            let result = client.get_preferences(surface).await?;
            emit(config, &result, |r| human::format_preference(&r.theme))
        }
        PrefsCommands::Set { surface, theme } => {
            let surface_id = parse_choice::<Surface>("surface")(&surface)?;
            let theme_id = parse_choice::<ThemeId>("theme")(&theme)?;
            let client = ApiClient::from_config(config)?;
            client.set_preferences(surface_id, theme_id).await?;
            println!("Set {surface_id} theme to {theme_id}.");
            Ok(())
        }
    }
}

/// Parser for a closed set of values, rejecting others with the valid list.
fn parse_choice<T>(label: &'static str) -> impl Fn(&str) -> Result<T>
where
    T: FromStr + VariantNames,
{
    move |raw| {
        raw.parse::<T>().map_err(|_| {
            LiminalError::Validation(format!(
                "Invalid {label}: {raw}. Use: {}",
                T::VARIANTS.join(", ")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_choices_parse() {
        assert_eq!(parse_choice::<Surface>("surface")("vscode").unwrap(), Surface::Vscode);
        assert_eq!(parse_choice::<ThemeId>("theme")("dark-2").unwrap(), ThemeId::Dark2);
    }

    #[test]
    fn invalid_surface_lists_choices() {
        let err = parse_choice::<Surface>("surface")("desktop").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid surface: desktop. Use: webapp, chatgpt, vscode"
        );
    }

    #[test]
    fn invalid_theme_lists_choices() {
        let err = parse_choice::<ThemeId>("theme")("dark-9").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid theme: dark-9. Use: light-1, light-2, light-3, dark-1, dark-2, dark-3"
        );
    }
}
