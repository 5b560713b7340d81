use crate::core::cascade::CascadingPruner;
use crate::core::reachability;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{LinkDecision, LinkOutcome, SweepReport};
use crate::utils::error::{Result, SweepError};
use crate::xml::XmlDocument;
use std::path::Path;

pub struct SweepPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> SweepPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SweepPipeline<S, C> {
    async fn discover(&self) -> Result<Vec<XmlDocument>> {
        let suffix = self.config.process_suffix();
        let paths = self.storage.list_files(suffix).await?;

        if paths.is_empty() {
            return Err(SweepError::DiscoveryError {
                message: format!(
                    "no '{}' documents under {}",
                    suffix,
                    self.config.root_path()
                ),
            });
        }

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            tracing::debug!("loading {}", path.display());
            let bytes = self.storage.read_file(&path).await?;
            documents.push(XmlDocument::parse(path, bytes)?);
        }
        Ok(documents)
    }

    async fn prune(&self, documents: Vec<XmlDocument>) -> Result<SweepReport> {
        let mut report = SweepReport::new();
        report.documents_seen = documents.len();
        let pruner = CascadingPruner::new(&self.storage, &self.config);

        for mut document in documents {
            let label = document.path.display().to_string();
            tracing::info!("processing {}", label);

            let analysis = reachability::analyze(&document)?;
            let mut changed = false;

            for decl in &analysis.used {
                tracing::debug!("keeping partner link '{}', invoked", decl.name);
                report.decisions.push(LinkOutcome {
                    document: label.clone(),
                    partner_link: decl.name.clone(),
                    decision: LinkDecision::Used,
                });
            }
            for decl in &analysis.inbound {
                tracing::debug!("keeping partner link '{}', inbound role", decl.name);
                report.decisions.push(LinkOutcome {
                    document: label.clone(),
                    partner_link: decl.name.clone(),
                    decision: LinkDecision::InboundRole,
                });
            }
            for decl in &analysis.unreferenced {
                tracing::info!("removing partner link '{}'", decl.name);
                if pruner
                    .prune_link(&mut document, decl, &mut report.diagnostics)
                    .await?
                {
                    changed = true;
                    report.removed_links += 1;
                    report.decisions.push(LinkOutcome {
                        document: label.clone(),
                        partner_link: decl.name.clone(),
                        decision: LinkDecision::Removed,
                    });
                }
            }

            // An empty container is dropped even when this run removed nothing.
            if document.count_elements("partnerLink")? == 0
                && document.remove_element("partnerLinks", None)?
            {
                tracing::debug!("removed empty partnerLinks container from {}", label);
                changed = true;
            }

            if changed {
                let serialized = document.to_bytes()?;
                self.storage.write_file(&document.path, &serialized).await?;
                report.documents_changed += 1;
            }
        }

        Ok(report)
    }

    async fn report(&self, report: SweepReport) -> Result<String> {
        for (path, reason) in report.diagnostics.iter() {
            tracing::warn!("could not fully process {}: {}", path, reason);
        }

        if let Some(target) = self.config.summary_json() {
            let json = serde_json::to_string_pretty(&report)?;
            self.storage
                .write_file(Path::new(target), json.as_bytes())
                .await?;
            tracing::info!("summary written to {}", target);
        }

        Ok(format!(
            "Removed {} partner links across {} of {} process documents",
            report.removed_links, report.documents_changed, report.documents_seen
        ))
    }
}
