pub mod config;
pub mod error;
pub mod frontmatter;
pub mod types;

pub use config::{CONFIG_FILE, parse_site_toml};
pub use error::{Error, Result};
pub use frontmatter::{RawEntry, parse_entry};
pub use types::*;
