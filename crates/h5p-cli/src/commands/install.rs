//! Install command implementation

use std::path::Path;

use colored::Colorize;
use h5p_core::ContentService;
use serde_json::json;

use crate::error::{CliError, Result};

/// Run `h5p install <package> [--json]`
pub fn run_install(service: &ContentService, package: &Path, json: bool) -> Result<()> {
    if !package.exists() {
        return Err(CliError::user(format!(
            "Package '{}' does not exist",
            package.display()
        )));
    }

    let outcome = if package.is_dir() {
        service.install_dir(package)?
    } else {
        service.install(package)?
    };

    if json {
        return super::print_json(&json!({
            "contentId": outcome.content_id,
            "title": outcome.title,
            "libraries": outcome.libraries.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "scripts": outcome.script_count,
            "styles": outcome.style_count,
        }));
    }

    println!(
        "{} Installed '{}' as {}",
        "=>".blue().bold(),
        outcome.title.cyan(),
        outcome.content_id.to_string().green()
    );
    println!(
        "   {} {}",
        "Load order:".dimmed(),
        outcome
            .libraries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    println!(
        "   {} {} scripts, {} styles",
        "Assets:".dimmed(),
        outcome.script_count,
        outcome.style_count
    );
    println!(
        "   {} Run {} to render it",
        "Next:".dimmed(),
        format!("h5p integration {}", outcome.content_id).bold()
    );
    Ok(())
}
