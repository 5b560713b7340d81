pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod xml;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::LocalStorage;
pub use core::{engine::SweepEngine, pipeline::SweepPipeline};
pub use domain::model::{Diagnostics, SweepReport};
pub use utils::error::{Result, SweepError};
pub use xml::XmlDocument;
