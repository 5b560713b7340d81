use crate::domain::model::SweepReport;
use crate::utils::error::Result;
use crate::xml::XmlDocument;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait Storage: Send + Sync {
    fn list_files(
        &self,
        suffix: &str,
    ) -> impl std::future::Future<Output = Result<Vec<PathBuf>>> + Send;
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn root_path(&self) -> &str;
    fn process_suffix(&self) -> &str;
    fn contract_suffix(&self) -> &str;
    fn component_suffix(&self) -> &str;
    fn verify_namespace_usage(&self) -> bool;
    fn summary_json(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn discover(&self) -> Result<Vec<XmlDocument>>;
    async fn prune(&self, documents: Vec<XmlDocument>) -> Result<SweepReport>;
    async fn report(&self, report: SweepReport) -> Result<String>;
}
