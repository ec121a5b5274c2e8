// Repository trait for artifact access
use crate::domain::artifact::Artifact;
use crate::domain::dataset::Dataset;
use async_trait::async_trait;

#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Whether the artifact file is present
    async fn exists(&self, artifact: Artifact) -> bool;

    /// Load an artifact as a dataset; `Ok(None)` when the file is absent
    async fn load(&self, artifact: Artifact) -> anyhow::Result<Option<Dataset>>;
}
