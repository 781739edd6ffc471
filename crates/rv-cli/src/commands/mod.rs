pub mod check;
pub mod play;
pub mod save;

use std::path::Path;

use rv_play::ContentPack;

/// Load a content directory, mapping errors for display.
fn load_pack(dir: &Path) -> Result<ContentPack, String> {
    ContentPack::load(dir).map_err(|e| e.to_string())
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
