//! Project-wide constants.

use std::path::PathBuf;

/// Pause between two items of a batch unless `--delay` says otherwise.
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Collection targeted when `collection` is given no targets.
pub const DEFAULT_COLLECTION: &str = "root";

/// Header carrying the API token on every repository request.
pub const API_KEY_HEADER: &str = "X-Dataverse-key";

/// Environment variable pointing at the configuration file.
pub const CONFIG_ENV: &str = "DVCLI_CONFIG";

/// Environment variable that overrides `dataverse.apiKey`.
pub const API_KEY_ENV: &str = "DATAVERSE_API_KEY";

/// Fixed Postgres port used when the configuration does not name one.
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Request timeout for the repository API.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default configuration path: `<config dir>/dvcli/config.yml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dvcli").join("config.yml"))
}
