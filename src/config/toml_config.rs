use crate::config::{DEFAULT_COMPONENT_SUFFIX, DEFAULT_CONTRACT_SUFFIX, DEFAULT_PROCESS_SUFFIX};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, SweepError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub module: ModuleConfig,
    pub scan: ScanConfig,
    pub siblings: Option<SiblingsConfig>,
    pub namespaces: Option<NamespacesConfig>,
    pub report: Option<ReportConfig>,
    pub environment: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub root: String,
    pub process_suffix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiblingsConfig {
    pub contract_suffix: Option<String>,
    pub component_suffix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespacesConfig {
    pub verify_usage: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub summary_json: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SweepError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SweepError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces ${VAR_NAME} placeholders with environment values.
    /// Unset variables are left as-is so validation can flag them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("module.name", &self.module.name)?;
        validation::validate_path("scan.root", &self.scan.root)?;
        validation::validate_suffix("scan.process_suffix", self.process_suffix())?;
        validation::validate_suffix("siblings.contract_suffix", self.contract_suffix())?;
        validation::validate_suffix("siblings.component_suffix", self.component_suffix())?;
        Ok(())
    }

    pub fn process_suffix(&self) -> &str {
        self.scan
            .process_suffix
            .as_deref()
            .unwrap_or(DEFAULT_PROCESS_SUFFIX)
    }

    pub fn contract_suffix(&self) -> &str {
        self.siblings
            .as_ref()
            .and_then(|s| s.contract_suffix.as_deref())
            .unwrap_or(DEFAULT_CONTRACT_SUFFIX)
    }

    pub fn component_suffix(&self) -> &str {
        self.siblings
            .as_ref()
            .and_then(|s| s.component_suffix.as_deref())
            .unwrap_or(DEFAULT_COMPONENT_SUFFIX)
    }
}

impl ConfigProvider for TomlConfig {
    fn root_path(&self) -> &str {
        &self.scan.root
    }

    fn process_suffix(&self) -> &str {
        self.process_suffix()
    }

    fn contract_suffix(&self) -> &str {
        self.contract_suffix()
    }

    fn component_suffix(&self) -> &str {
        self.component_suffix()
    }

    fn verify_namespace_usage(&self) -> bool {
        self.namespaces
            .as_ref()
            .and_then(|n| n.verify_usage)
            .unwrap_or(true)
    }

    fn summary_json(&self) -> Option<&str> {
        self.report.as_ref().and_then(|r| r.summary_json.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
