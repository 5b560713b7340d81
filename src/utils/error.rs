use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttrError(#[from] quick_xml::events::attributes::AttrError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Discovery error: {message}")]
    DiscoveryError { message: String },

    #[error("Failed to parse {path}: {message}")]
    DocumentParseError { path: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Storage,
    Parsing,
    Configuration,
    Processing,
}

impl SweepError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SweepError::IoError(_) => ErrorCategory::Storage,
            SweepError::XmlError(_)
            | SweepError::XmlAttrError(_)
            | SweepError::DocumentParseError { .. } => ErrorCategory::Parsing,
            SweepError::ConfigError { .. }
            | SweepError::InvalidConfigValueError { .. }
            | SweepError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SweepError::SerializationError(_)
            | SweepError::DiscoveryError { .. }
            | SweepError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SweepError::IoError(_) => ErrorSeverity::Critical,
            SweepError::XmlError(_) | SweepError::XmlAttrError(_) => ErrorSeverity::High,
            SweepError::DocumentParseError { .. } => ErrorSeverity::High,
            SweepError::SerializationError(_) => ErrorSeverity::High,
            SweepError::DiscoveryError { .. } => ErrorSeverity::Medium,
            SweepError::ConfigError { .. }
            | SweepError::InvalidConfigValueError { .. }
            | SweepError::MissingConfigError { .. } => ErrorSeverity::High,
            SweepError::ProcessingError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SweepError::IoError(_) => {
                "Check that the module root exists and the files are readable and writable"
            }
            SweepError::XmlError(_) | SweepError::XmlAttrError(_) => {
                "Check that the document is well-formed XML"
            }
            SweepError::DocumentParseError { .. } => {
                "Fix or exclude the malformed document and re-run"
            }
            SweepError::SerializationError(_) => {
                "Check the summary output path and available disk space"
            }
            SweepError::DiscoveryError { .. } => {
                "Check the module root path and the process suffix setting"
            }
            SweepError::ConfigError { .. }
            | SweepError::InvalidConfigValueError { .. }
            | SweepError::MissingConfigError { .. } => {
                "Review the command line arguments or the TOML configuration file"
            }
            SweepError::ProcessingError { .. } => {
                "Inspect the referenced document for unexpected structure"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SweepError::IoError(e) => format!("File system operation failed: {}", e),
            SweepError::XmlError(e) => format!("XML processing failed: {}", e),
            SweepError::XmlAttrError(e) => format!("XML attribute could not be read: {}", e),
            SweepError::SerializationError(e) => format!("Could not write the summary: {}", e),
            SweepError::DiscoveryError { message } => {
                format!("No process documents were found: {}", message)
            }
            SweepError::DocumentParseError { path, message } => {
                format!("Document '{}' could not be parsed: {}", path, message)
            }
            SweepError::ConfigError { message } => format!("Configuration problem: {}", message),
            SweepError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("'{}' is not a valid {}: {}", value, field, reason),
            SweepError::MissingConfigError { field } => {
                format!("Required setting '{}' was not provided", field)
            }
            SweepError::ProcessingError { message } => {
                format!("Processing stopped: {}", message)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;
