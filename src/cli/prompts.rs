//! Handlers for `liminaldb prompts ...`.

use std::fs;
use std::io::{self, Read, Write};

use serde_json::json;

use crate::client::{ApiClient, ListOptions};
use crate::config::LiminalConfig;
use crate::error::{LiminalError, Result};
use crate::output::human;
use crate::types::{parse_tags, split_csv, PromptInput, PromptUpdate};

use super::{
    emit, ExportArgs, ImportArgs, ListArgs, PromptCommands, SaveArgs, SearchArgs, UpdateArgs,
};

pub async fn handle(config: &LiminalConfig, command: PromptCommands) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    match command {
        PromptCommands::List(args) => list(config, &client, args).await,
        PromptCommands::Search(args) => search(config, &client, args).await,
        PromptCommands::Get(args) => {
            let prompt = client.get_prompt(&args.slug).await?;
            emit(config, &prompt, human::format_prompt_detail)
        }
        PromptCommands::Save(args) => {
            let prompts = read_save_input(&args)?;
            let result = client.save_prompts(&prompts).await?;
            emit(config, &result, |r| human::format_save_result(&r.ids))
        }
        PromptCommands::Update(args) => {
            let slug = args.slug.clone();
            let updates = build_update(args)?;
            let result = client.update_prompt(&slug, &updates).await?;
            emit(config, &result, |r| human::format_update_result(&r.updated))
        }
        PromptCommands::Delete(args) => {
            let result = client.delete_prompt(&args.slug).await?;
            emit(config, &result, |_| human::format_delete_result(&args.slug))
        }
        PromptCommands::Use(args) => {
            client.track_usage(&args.slug).await?;
            emit(config, &json!({ "tracked": true, "slug": args.slug }), |_| {
                human::format_usage_tracked(&args.slug)
            })
        }
        PromptCommands::Export(args) => export(&client, args).await,
        PromptCommands::Import(args) => import(config, &client, args).await,
    }
}

async fn list(config: &LiminalConfig, client: &ApiClient, args: ListArgs) -> Result<()> {
    let options = ListOptions {
        limit: args.limit,
        tags: args.tags.as_deref().map(split_csv).unwrap_or_default(),
    };
    let prompts = client.list_prompts(&options).await?;
    emit(config, &prompts, |p| human::format_prompt_list(p, config.verbose))
}

async fn search(config: &LiminalConfig, client: &ApiClient, args: SearchArgs) -> Result<()> {
    let options = ListOptions {
        limit: args.limit,
        tags: args.tags.as_deref().map(split_csv).unwrap_or_default(),
    };
    let prompts = client.search_prompts(&args.query, &options).await?;
    emit(config, &prompts, |p| human::format_prompt_list(p, config.verbose))
}

async fn export(client: &ApiClient, args: ExportArgs) -> Result<()> {
    let yaml = client.export_prompts().await?;
    match args.output {
        Some(path) => {
            fs::write(&path, &yaml)?;
            println!("Exported to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(yaml.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

async fn import(config: &LiminalConfig, client: &ApiClient, args: ImportArgs) -> Result<()> {
    let yaml = fs::read_to_string(&args.file).map_err(|_| {
        LiminalError::Validation(format!("Cannot read file: {}", args.file.display()))
    })?;

    if args.preview {
        let preview = client.import_preview(&yaml).await?;
        return emit(config, &preview, human::format_import_preview);
    }

    let slugs = args.slugs.as_deref().map(split_csv);
    let result = client.import_prompts(&yaml, slugs.as_deref()).await?;
    emit(config, &result, |r| human::format_import_result(r.imported, r.skipped))
}

/// Prompts from `--stdin`, `--file`, or the inline `--slug --name --content` fields.
pub fn read_save_input(args: &SaveArgs) -> Result<Vec<PromptInput>> {
    if args.stdin {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        return PromptInput::parse_many(&input);
    }
    if let Some(path) = &args.file {
        let input = fs::read_to_string(path).map_err(|_| {
            LiminalError::Validation(format!("Cannot read file: {}", path.display()))
        })?;
        return PromptInput::parse_many(&input);
    }

    let (Some(slug), Some(name), Some(content)) = (&args.slug, &args.name, &args.content) else {
        return Err(LiminalError::Validation(
            "Provide --stdin, --file, or all of --slug --name --content.".to_string(),
        ));
    };
    let prompt = PromptInput {
        slug: slug.clone(),
        name: name.clone(),
        description: args.description.clone().unwrap_or_else(|| name.clone()),
        content: content.clone(),
        tags: args.tags.as_deref().map(parse_tags).transpose()?.unwrap_or_default(),
        parameters: None,
    };
    prompt.validate()?;
    Ok(vec![prompt])
}

pub fn build_update(args: UpdateArgs) -> Result<PromptUpdate> {
    let flag = |on: bool, off: bool| match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
    let updates = PromptUpdate {
        name: non_empty(args.name),
        description: non_empty(args.description),
        content: non_empty(args.content),
        tags: args.tags.as_deref().map(parse_tags).transpose()?,
        pinned: flag(args.pin, args.unpin),
        favorited: flag(args.favorite, args.unfavorite),
    };
    if updates.is_empty() {
        return Err(LiminalError::Validation(
            "Nothing to update. Pass at least one field or flag.".to_string(),
        ));
    }
    Ok(updates)
}
