use crate::utils::error::{Result, SweepError};
use crate::xml::XmlDocument;

/// Prefix part of a qualified name: "plnk:BillingLT" gives "plnk".
pub fn prefix_of(qname: &str) -> Option<&str> {
    qname.split_once(':').map(|(prefix, _)| prefix)
}

/// Local part of a qualified name: "plnk:BillingLT" gives "BillingLT",
/// an unprefixed name is returned unchanged.
pub fn local_of(qname: &str) -> &str {
    qname.split_once(':').map_or(qname, |(_, local)| local)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReclaimOutcome {
    Removed(String),
    Retained(String),
}

/// Reclaims the xmlns declaration left behind by a removed element.
/// With usage verification on, the declaration stays when any other
/// element or attribute still refers to the prefix.
pub fn reclaim(
    document: &mut XmlDocument,
    prefix: Option<&str>,
    verify_usage: bool,
) -> Result<ReclaimOutcome> {
    let prefix = prefix.ok_or_else(|| SweepError::ProcessingError {
        message: format!(
            "namespace prefix could not be determined for {}",
            document.path.display()
        ),
    })?;

    if verify_usage && document.uses_prefix(prefix)? {
        return Ok(ReclaimOutcome::Retained(prefix.to_string()));
    }

    let declaration = format!("xmlns:{}", prefix);
    if !document.remove_root_attribute(&declaration)? {
        return Err(SweepError::ProcessingError {
            message: format!(
                "no {} declaration on the root element of {}",
                declaration,
                document.path.display()
            ),
        });
    }

    Ok(ReclaimOutcome::Removed(prefix.to_string()))
}
