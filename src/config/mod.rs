pub mod loader;
pub mod schema;

pub use loader::{discover, load_from_path, load_from_str, ConfigError, CONFIG_FILE_NAMES};
pub use schema::{EngineConfig, LanguageConfig, ValidationError, ValidationIssue};
