// Filesystem repository reading CSV artifacts from the output directory
use crate::application::artifact_repository::ArtifactRepository;
use crate::domain::artifact::Artifact;
use crate::domain::dataset::Dataset;
use crate::infrastructure::csv_dataset::decode_dataset;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CsvArtifactRepository {
    output_dir: PathBuf,
}

impl CsvArtifactRepository {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn path_for(&self, artifact: Artifact) -> PathBuf {
        self.output_dir.join(artifact.file_name())
    }
}

#[async_trait]
impl ArtifactRepository for CsvArtifactRepository {
    async fn exists(&self, artifact: Artifact) -> bool {
        tokio::fs::try_exists(self.path_for(artifact))
            .await
            .unwrap_or(false)
    }

    async fn load(&self, artifact: Artifact) -> Result<Option<Dataset>> {
        let path = self.path_for(artifact);
        if !self.exists(artifact).await {
            tracing::debug!("Artifact not found: {}", path.display());
            return Ok(None);
        }

        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let dataset = decode_dataset(&bytes)
            .with_context(|| format!("Failed to decode {}", path.display()))?;

        Ok(Some(dataset))
    }
}
