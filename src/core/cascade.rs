use crate::core::namespace::{self, ReclaimOutcome};
use crate::core::siblings;
use crate::domain::model::{Diagnostics, PartnerLinkDecl};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{Result, SweepError};
use crate::xml::{AttrMatch, XmlDocument};
use std::path::Path;

/// Removes one partner link from its process document and carries the
/// removal into the component and contract documents next to it.
/// Sibling failures are recorded in the diagnostics instead of
/// stopping the run; the process-document edit stands either way.
pub struct CascadingPruner<'a, S: Storage, C: ConfigProvider> {
    storage: &'a S,
    config: &'a C,
}

impl<'a, S: Storage, C: ConfigProvider> CascadingPruner<'a, S, C> {
    pub fn new(storage: &'a S, config: &'a C) -> Self {
        Self { storage, config }
    }

    pub async fn prune_link(
        &self,
        process: &mut XmlDocument,
        link: &PartnerLinkDecl,
        diagnostics: &mut Diagnostics,
    ) -> Result<bool> {
        let matcher = AttrMatch::exact("name", &link.name);
        if !process.remove_element("partnerLink", Some(&matcher))? {
            return Ok(false);
        }

        let paths = siblings::derive(
            &process.path,
            self.config.process_suffix(),
            self.config.contract_suffix(),
            self.config.component_suffix(),
        )?;
        let process_label = process.path.display().to_string();

        if let Err(e) = self.cascade_component(&paths.component, link).await {
            diagnostics.record(process_label.clone(), e.to_string());
        }
        if let Err(e) = self.cascade_contract(&paths.contract, link).await {
            diagnostics.record(process_label, e.to_string());
        }

        Ok(true)
    }

    async fn cascade_component(&self, path: &Path, link: &PartnerLinkDecl) -> Result<()> {
        let mut component = self.load_sibling(path, "component").await?;
        let matcher = AttrMatch::ignore_case("name", &link.name);

        // The interface port type has to be captured before the
        // reference subtree is gone.
        let port_type =
            component.nested_attribute("reference", &matcher, "interface", "portType")?;

        if !component.remove_element("reference", Some(&matcher))? {
            tracing::info!(
                "no reference named '{}' in {}, nothing to cascade",
                link.name,
                path.display()
            );
            return Ok(());
        }
        tracing::debug!("removed reference '{}' from {}", link.name, path.display());

        self.reclaim_prefix(&mut component, port_type.as_deref())?;
        self.storage
            .write_file(&component.path, &component.to_bytes()?)
            .await?;
        Ok(())
    }

    async fn cascade_contract(&self, path: &Path, link: &PartnerLinkDecl) -> Result<()> {
        let Some(link_type) = link.link_type.as_deref() else {
            tracing::info!(
                "partner link '{}' has no partnerLinkType, skipping contract cascade",
                link.name
            );
            return Ok(());
        };
        let local = namespace::local_of(link_type);

        let mut contract = self.load_sibling(path, "contract").await?;
        let matcher = AttrMatch::exact("name", local);

        let port_type = contract.nested_attribute("partnerLinkType", &matcher, "portType", "name")?;

        if !contract.remove_element("partnerLinkType", Some(&matcher))? {
            tracing::info!(
                "no partner link type named '{}' in {}, nothing to cascade",
                local,
                path.display()
            );
            return Ok(());
        }
        tracing::debug!(
            "removed partner link type '{}' from {}",
            local,
            path.display()
        );

        self.reclaim_prefix(&mut contract, port_type.as_deref())?;
        self.storage
            .write_file(&contract.path, &contract.to_bytes()?)
            .await?;
        Ok(())
    }

    async fn load_sibling(&self, path: &Path, kind: &str) -> Result<XmlDocument> {
        let bytes = self.storage.read_file(path).await.map_err(|e| {
            SweepError::ProcessingError {
                message: format!("{} document {} could not be read: {}", kind, path.display(), e),
            }
        })?;
        XmlDocument::parse(path.to_path_buf(), bytes)
    }

    fn reclaim_prefix(&self, document: &mut XmlDocument, port_type: Option<&str>) -> Result<()> {
        let prefix = port_type.and_then(namespace::prefix_of);
        match namespace::reclaim(document, prefix, self.config.verify_namespace_usage())? {
            ReclaimOutcome::Removed(p) => {
                tracing::debug!("reclaimed xmlns:{} from {}", p, document.path.display())
            }
            ReclaimOutcome::Retained(p) => {
                tracing::debug!(
                    "kept xmlns:{} in {}, prefix still in use",
                    p,
                    document.path.display()
                )
            }
        }
        Ok(())
    }
}
