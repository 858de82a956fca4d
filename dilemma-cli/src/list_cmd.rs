//! List command - show the strategy catalog

use anyhow::{Context, Result};
use clap::Args;

use dilemma_core::{catalog, CatalogEntry};

#[derive(Args)]
pub struct ListArgs {
    /// Output the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run list command
pub fn run(args: ListArgs) -> Result<()> {
    let rendered = if args.json {
        render_json(catalog())?
    } else {
        render_text(catalog())
    };
    println!("{}", rendered);
    Ok(())
}

fn render_json(entries: &[CatalogEntry]) -> Result<String> {
    #[derive(serde::Serialize)]
    struct JsonEntry<'a> {
        key: &'a str,
        description: &'a str,
        aliases: &'a [&'a str],
    }

    let output: Vec<JsonEntry> = entries
        .iter()
        .map(|e| JsonEntry {
            key: e.key,
            description: e.description,
            aliases: e.aliases,
        })
        .collect();

    serde_json::to_string_pretty(&output).context("Failed to serialize catalog")
}

fn render_text(entries: &[CatalogEntry]) -> String {
    let width = entries.iter().map(|e| e.key.len()).max().unwrap_or(0);
    let mut lines = vec![format!("Available agents ({}):", entries.len())];

    for (i, e) in entries.iter().enumerate() {
        let mut line = format!("{:>2}. {:<width$}  {}", i + 1, e.key, e.description, width = width);
        if !e.aliases.is_empty() {
            line.push_str(&format!(" (also: {})", e.aliases.join(", ")));
        }
        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_lists_every_entry() {
        let text = render_text(catalog());
        assert!(text.starts_with("Available agents (30):"));
        assert_eq!(text.lines().count(), 31);
        assert!(text.contains(" 1. tit-for-tat"));
        assert!(text.contains("(also: always-beat)"));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(catalog()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 30);
        assert_eq!(value[1]["key"], "always-defect");
        assert_eq!(value[1]["aliases"][0], "always-beat");
    }
}
