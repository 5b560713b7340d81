use crate::utils::error::{Result, SweepError};
use std::path::{Path, PathBuf};

/// The two companion documents of a process document. Both live next
/// to it: the process suffix is stripped from the file name and the
/// sibling suffix appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingPaths {
    pub contract: PathBuf,
    pub component: PathBuf,
}

pub fn derive(
    process_path: &Path,
    process_suffix: &str,
    contract_suffix: &str,
    component_suffix: &str,
) -> Result<SiblingPaths> {
    let base = stem(process_path, process_suffix)?;
    Ok(SiblingPaths {
        contract: process_path.with_file_name(format!("{}{}", base, contract_suffix)),
        component: process_path.with_file_name(format!("{}{}", base, component_suffix)),
    })
}

fn stem<'a>(process_path: &'a Path, process_suffix: &str) -> Result<&'a str> {
    let file_name = process_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SweepError::ProcessingError {
            message: format!("unusable process path: {}", process_path.display()),
        })?;
    file_name
        .strip_suffix(process_suffix)
        .ok_or_else(|| SweepError::ProcessingError {
            message: format!(
                "process path {} does not end with '{}'",
                process_path.display(),
                process_suffix
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn siblings_live_next_to_the_process_document() {
        let paths = derive(
            Path::new("module/flows/OrderFlow.bpel"),
            ".bpel",
            "Artifacts.wsdl",
            ".component",
        )
        .unwrap();

        assert_eq!(
            paths.contract,
            PathBuf::from("module/flows/OrderFlowArtifacts.wsdl")
        );
        assert_eq!(
            paths.component,
            PathBuf::from("module/flows/OrderFlow.component")
        );
    }

    #[test]
    fn derivation_rejects_foreign_suffix() {
        let result = derive(
            Path::new("module/OrderFlow.xml"),
            ".bpel",
            "Artifacts.wsdl",
            ".component",
        );
        assert!(result.is_err());
    }
}
