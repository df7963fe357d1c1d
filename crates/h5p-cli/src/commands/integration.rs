//! Integration command implementation

use h5p_core::ContentService;

use crate::error::Result;

/// Run `h5p integration <id> [--settings]`
///
/// Always prints JSON: the descriptor, or with `settings` the player settings
/// object ready to embed in a page.
pub fn run_integration(service: &ContentService, id: &str, settings: bool) -> Result<()> {
    let id = super::parse_content_id(id)?;
    let descriptor = service.build_integration(&id)?;

    if settings {
        super::print_json(&descriptor.to_player_settings())
    } else {
        super::print_json(&descriptor)
    }
}
