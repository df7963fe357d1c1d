//! Command implementations for h5p-cli

pub mod clean;
pub mod install;
pub mod integration;
pub mod list;
pub mod show;

pub use clean::run_clean;
pub use install::run_install;
pub use integration::run_integration;
pub use list::run_list;
pub use show::run_show;

use h5p_core::ContentId;

use crate::error::Result;

fn parse_content_id(value: &str) -> Result<ContentId> {
    Ok(value.trim().parse()?)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
