//! CLI configuration.
//! Provides the configuration types, default paths and XML loading used by
//! the `fsops` binary. The library operations themselves take everything
//! they need as arguments.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{ConfigSource, load_config, load_config_from_xml_path};
