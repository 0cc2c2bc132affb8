pub mod list;
pub mod play;
pub mod show;
pub mod stats;

use std::path::Path;

use mg_engine::{Catalog, GameRegistry};

/// Progress file used when `--store` is not given to `stats`.
pub const DEFAULT_STORE: &str = "mindgarden-progress.json";

/// Load the catalog from `path`, or the built-in one.
fn load_catalog(path: Option<&Path>) -> Result<Catalog, String> {
    let Some(path) = path else {
        return Ok(Catalog::builtin());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Catalog::from_json(&json).map_err(|e| format!("invalid catalog {}: {e}", path.display()))
}

fn load_registry(path: Option<&Path>) -> Result<GameRegistry, String> {
    load_catalog(path).map(GameRegistry::new)
}
