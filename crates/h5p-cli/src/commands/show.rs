//! Show command implementation

use colored::Colorize;
use h5p_core::ContentService;
use serde_json::json;

use crate::error::Result;

/// Run `h5p show <id> [--json]`
pub fn run_show(service: &ContentService, id: &str, json: bool) -> Result<()> {
    let id = super::parse_content_id(id)?;
    let record = service.load(&id)?;

    if json {
        return super::print_json(&json!({
            "contentId": record.id,
            "manifest": record.manifest,
            "assets": record.assets,
            "install": record.info,
        }));
    }

    println!("{}", record.manifest.title.bold());
    println!();
    println!("{}:   {}", "Id".dimmed(), record.id);
    println!("{}:   {}", "Main".dimmed(), record.manifest.main_library.cyan());
    println!("{}:   {}", "Installed".dimmed(), record.info.installed_at.to_rfc3339());
    if let Some(checksum) = &record.info.archive_checksum {
        println!("{}:   {}", "Archive".dimmed(), checksum);
    }
    println!(
        "{}:   {}",
        "Path".dimmed(),
        service.store().record_dir(&id).display()
    );
    println!();

    println!("{}:", "Libraries".bold());
    for library in &record.info.libraries {
        println!("  {} {}", "+".green(), library);
    }
    println!();

    println!("{}:", "Scripts".bold());
    for script in &record.assets.scripts {
        println!("  {script}");
    }
    println!("{}:", "Styles".bold());
    for style in &record.assets.styles {
        println!("  {style}");
    }
    Ok(())
}
