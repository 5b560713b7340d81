use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct SweepEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SweepEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting partner link sweep");

        tracing::info!("Discovering process documents...");
        let documents = self.pipeline.discover().await?;
        tracing::info!("Discovered {} process documents", documents.len());

        tracing::info!("Pruning partner links...");
        let report = self.pipeline.prune(documents).await?;
        tracing::info!(
            "Removed {} partner links, {} documents changed",
            report.removed_links,
            report.documents_changed
        );

        tracing::info!("Reporting...");
        let summary = self.pipeline.report(report).await?;

        Ok(summary)
    }
}
