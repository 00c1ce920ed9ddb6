//! Single-description commands

use anyhow::Result;
use serde_json::json;
use spendlens_core::{extract_keywords, normalize_text};

use super::{print_json, Context};

pub fn cmd_categorize(ctx: &Context, text: &str) -> Result<()> {
    let engine = ctx.engine()?;
    let category = engine.categorize(text);

    if ctx.json {
        return print_json(&json!({
            "description": text,
            "merchant": normalize_text(text),
            "category": category,
        }));
    }

    println!("{} → {}", text, category);
    Ok(())
}

pub fn cmd_keywords(ctx: &Context, text: &str, top_k: usize) -> Result<()> {
    let keywords = extract_keywords(text, top_k)?;

    if ctx.json {
        return print_json(&keywords);
    }

    if keywords.is_empty() {
        println!("No keywords found.");
    } else {
        println!("{}", keywords.join(", "));
    }
    Ok(())
}
