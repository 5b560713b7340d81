pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROCESS_SUFFIX: &str = ".bpel";
pub const DEFAULT_CONTRACT_SUFFIX: &str = "Artifacts.wsdl";
pub const DEFAULT_COMPONENT_SUFFIX: &str = ".component";

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "bpel-sweep")]
#[command(about = "Removes unused partner links from BPEL modules")]
pub struct CliConfig {
    /// Module root to scan for process documents
    pub root: String,

    #[arg(long, default_value = DEFAULT_PROCESS_SUFFIX)]
    pub process_suffix: String,

    #[arg(long, default_value = DEFAULT_CONTRACT_SUFFIX)]
    pub contract_suffix: String,

    #[arg(long, default_value = DEFAULT_COMPONENT_SUFFIX)]
    pub component_suffix: String,

    #[arg(
        long,
        help = "Remove xmlns declarations without checking for remaining uses of the prefix"
    )]
    pub assume_unique_prefixes: bool,

    #[arg(long, help = "Write a JSON summary of the sweep to this path")]
    pub summary_json: Option<String>,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn root_path(&self) -> &str {
        &self.root
    }

    fn process_suffix(&self) -> &str {
        &self.process_suffix
    }

    fn contract_suffix(&self) -> &str {
        &self.contract_suffix
    }

    fn component_suffix(&self) -> &str {
        &self.component_suffix
    }

    fn verify_namespace_usage(&self) -> bool {
        !self.assume_unique_prefixes
    }

    fn summary_json(&self) -> Option<&str> {
        self.summary_json.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("root", &self.root)?;
        validation::validate_suffix("process_suffix", &self.process_suffix)?;
        validation::validate_suffix("contract_suffix", &self.contract_suffix)?;
        validation::validate_suffix("component_suffix", &self.component_suffix)?;
        Ok(())
    }
}
