//! List command implementation

use colored::Colorize;
use h5p_core::ContentService;
use serde_json::json;

use crate::error::Result;

/// Run `h5p list [--json]`
///
/// Records that fail to load are still listed, marked as unreadable.
pub fn run_list(service: &ContentService, json: bool) -> Result<()> {
    let ids = service.list_available()?;

    if json {
        let entries: Vec<_> = ids
            .iter()
            .map(|id| match service.load(id) {
                Ok(record) => json!({
                    "contentId": id,
                    "title": record.manifest.title,
                    "mainLibrary": record.manifest.main_library,
                    "installedAt": record.info.installed_at,
                }),
                Err(e) => json!({ "contentId": id, "error": e.to_string() }),
            })
            .collect();
        return super::print_json(&entries);
    }

    println!("{}", "Installed Content".bold());
    println!();

    if ids.is_empty() {
        println!("  {} (use {} to add)", "None".dimmed(), "h5p install".cyan());
        return Ok(());
    }

    for id in &ids {
        match service.load(id) {
            Ok(record) => println!(
                "  {}  {} ({})",
                id.to_string().green(),
                record.manifest.title,
                record.manifest.main_library.dimmed()
            ),
            Err(e) => println!("  {}  {} {}", id.to_string().red(), "unreadable:".red(), e),
        }
    }

    println!();
    println!("{} {} installed", "Total:".dimmed(), ids.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use h5p_core::InstallerConfig;
    use h5p_test_utils::TestPackage;
    use tempfile::TempDir;

    #[test]
    fn test_list_empty_store() {
        let temp = TempDir::new().unwrap();
        let service = ContentService::new(InstallerConfig::default().with_store_root(temp.path()));
        assert!(run_list(&service, false).is_ok());
        assert!(run_list(&service, true).is_ok());
    }

    #[test]
    fn test_list_survives_corrupt_record() {
        let temp = TempDir::new().unwrap();
        let service = ContentService::new(InstallerConfig::default().with_store_root(temp.path()));
        let (_dir, archive) = TestPackage::widget().temp_archive();
        let outcome = service.install(&archive).unwrap();
        std::fs::remove_file(service.store().record_dir(&outcome.content_id).join("h5p.json"))
            .unwrap();

        assert!(run_list(&service, false).is_ok());
    }
}
