//! Clean command implementation

use colored::Colorize;
use h5p_core::ContentService;

use crate::error::Result;

/// Run `h5p clean`
pub fn run_clean(service: &ContentService) -> Result<()> {
    let removed = service.store().remove_stale_staging()?;
    if removed == 0 {
        println!("{} Nothing to clean", "=>".blue().bold());
    } else {
        println!(
            "{} Removed {} interrupted install(s)",
            "=>".blue().bold(),
            removed.to_string().yellow()
        );
    }
    Ok(())
}
