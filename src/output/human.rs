//! Human-readable rendering of API results.

use chrono::{DateTime, Local};

use crate::types::{
    HealthResponse, ImportPreviewResponse, Prompt, TagCatalog, WhoamiResponse,
};

pub fn format_prompt_list(prompts: &[Prompt], verbose: bool) -> String {
    if prompts.is_empty() {
        return "No prompts found.".to_string();
    }

    let mut lines = vec![format!("{} prompt(s):\n", prompts.len())];
    for p in prompts {
        if verbose {
            lines.push(format!("  {}", p.slug));
            lines.push(format!("    Name: {}", p.name));
            lines.push(format!("    Tags: {}", join_tags(&p.tags)));
            lines.push(format!("    Description: {}", truncate(&p.description, 80)));
            if let Some(uses) = p.usage_count.filter(|n| *n > 0) {
                lines.push(format!("    Uses: {uses}"));
            }
            lines.push(String::new());
        } else {
            let tags = if p.tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", p.tags.join(", "))
            };
            lines.push(format!(
                "  {}{tags} — {}",
                p.slug,
                truncate(&p.description, 60)
            ));
        }
    }
    lines.join("\n")
}

pub fn format_prompt_detail(prompt: &Prompt) -> String {
    let mut lines = vec![
        format!("Slug: {}", prompt.slug),
        format!("Name: {}", prompt.name),
        format!("Description: {}", prompt.description),
        format!("Tags: {}", join_tags(&prompt.tags)),
    ];

    if prompt.pinned == Some(true) {
        lines.push("Pinned: yes".to_string());
    }
    if prompt.favorited == Some(true) {
        lines.push("Favorited: yes".to_string());
    }
    if let Some(count) = prompt.usage_count.filter(|n| *n > 0) {
        lines.push(format!("Usage count: {count}"));
    }
    if let Some(last_used) = prompt
        .last_used_at
        .filter(|ms| *ms > 0)
        .and_then(DateTime::from_timestamp_millis)
    {
        lines.push(format!(
            "Last used: {}",
            last_used.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ));
    }
    if let Some(params) = prompt.parameters.as_ref().filter(|p| !p.is_empty()) {
        let rendered: Vec<String> = params
            .iter()
            .map(|p| format!("{}:{}", p.name, p.kind.as_str()))
            .collect();
        lines.push(format!("Parameters: {}", rendered.join(", ")));
    }

    lines.push(String::new());
    lines.push("--- Content ---".to_string());
    lines.push(prompt.content.clone());
    lines.join("\n")
}

pub fn format_health(health: &HealthResponse) -> String {
    let mut lines = vec![
        format!("Status: {}", health.status),
        format!("Convex: {}", health.convex),
    ];
    if let Some(user) = &health.user {
        lines.push(format!("User: {}", user.id));
        if let Some(email) = &user.email {
            lines.push(format!("Email: {email}"));
        }
    }
    lines.join("\n")
}

pub fn format_whoami(data: &WhoamiResponse) -> String {
    let mut lines = vec![format!("User ID: {}", data.user.id)];
    if let Some(email) = &data.user.email {
        lines.push(format!("Email: {email}"));
    }
    lines.join("\n")
}

pub fn format_tags(tags: &TagCatalog) -> String {
    tags.iter()
        .map(|(dimension, names)| format!("{dimension}: {}", names.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_import_preview(preview: &ImportPreviewResponse) -> String {
    let mut lines = vec![
        format!("Total prompts in file: {}", preview.total),
        format!("New (will import): {}", preview.new_slugs.len()),
        format!("Duplicates (will skip): {}", preview.duplicate_slugs.len()),
    ];
    if !preview.new_slugs.is_empty() {
        lines.push(String::new());
        lines.push("New slugs:".to_string());
        lines.extend(preview.new_slugs.iter().map(|s| format!("  {s}")));
    }
    if !preview.duplicate_slugs.is_empty() {
        lines.push(String::new());
        lines.push("Duplicate slugs:".to_string());
        lines.extend(preview.duplicate_slugs.iter().map(|s| format!("  {s}")));
    }
    lines.join("\n")
}

pub fn format_import_result(imported: u64, skipped: u64) -> String {
    format!("Imported {imported} prompt(s). Skipped {skipped} duplicate(s).")
}

pub fn format_save_result(ids: &[String]) -> String {
    format!("Saved {} prompt(s).", ids.len())
}

pub fn format_delete_result(slug: &str) -> String {
    format!("Deleted prompt: {slug}")
}

pub fn format_update_result(prompt: &Prompt) -> String {
    format!("Updated prompt: {}", prompt.slug)
}

pub fn format_usage_tracked(slug: &str) -> String {
    format!("Usage tracked for: {slug}")
}

pub fn format_preference(theme: &str) -> String {
    format!("Theme: {theme}")
}

fn join_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        "(none)".to_string()
    } else {
        tags.join(", ")
    }
}

/// Cut to at most `max` characters, ending in `...` when shortened.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
