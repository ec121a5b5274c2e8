// Per-render artifact loading
use crate::application::artifact_repository::ArtifactRepository;
use crate::domain::artifact::{Artifact, ArtifactStatus};
use crate::domain::dataset::Dataset;

#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded(Dataset),
    Missing,
    Unreadable(String),
}

impl LoadOutcome {
    /// The dataset, if it was loaded and has at least one row.
    pub fn non_empty(&self) -> Option<&Dataset> {
        match self {
            LoadOutcome::Loaded(dataset) if !dataset.is_empty() => Some(dataset),
            _ => None,
        }
    }
}

/// Everything one render reads from disk. Built fresh per render and dropped
/// with it.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub rfm_with_clusters: LoadOutcome,
    pub cluster_profiles: LoadOutcome,
    pub monthly_trend: LoadOutcome,
    pub anova_results: LoadOutcome,
    pub tukey_results: LoadOutcome,
    pub predictions: LoadOutcome,
    // Loaded for completeness; nothing renders it.
    pub executive_summary: LoadOutcome,
    pub statuses: Vec<ArtifactStatus>,
}

impl ArtifactBundle {
    pub fn outcome(&self, artifact: Artifact) -> &LoadOutcome {
        match artifact {
            Artifact::RfmWithClusters => &self.rfm_with_clusters,
            Artifact::ClusterProfiles => &self.cluster_profiles,
            Artifact::MonthlyEventsTrend => &self.monthly_trend,
            Artifact::AnovaResults => &self.anova_results,
            Artifact::TukeyResults => &self.tukey_results,
            Artifact::Predictions => &self.predictions,
            Artifact::ExecutiveSummary => &self.executive_summary,
        }
    }
}

async fn load_one(repository: &dyn ArtifactRepository, artifact: Artifact) -> LoadOutcome {
    match repository.load(artifact).await {
        Ok(Some(dataset)) => {
            tracing::debug!(
                file = artifact.file_name(),
                rows = dataset.row_count(),
                columns = dataset.columns().len(),
                "Loaded artifact"
            );
            LoadOutcome::Loaded(dataset)
        }
        Ok(None) => LoadOutcome::Missing,
        Err(e) => {
            tracing::warn!("Error loading {}: {:#}", artifact.file_name(), e);
            LoadOutcome::Unreadable(format!("{e:#}"))
        }
    }
}

pub async fn load_bundle(repository: &dyn ArtifactRepository) -> ArtifactBundle {
    let mut statuses = Vec::with_capacity(Artifact::ALL.len());
    for artifact in Artifact::ALL {
        statuses.push(ArtifactStatus::new(artifact, repository.exists(artifact).await));
    }

    ArtifactBundle {
        rfm_with_clusters: load_one(repository, Artifact::RfmWithClusters).await,
        cluster_profiles: load_one(repository, Artifact::ClusterProfiles).await,
        monthly_trend: load_one(repository, Artifact::MonthlyEventsTrend).await,
        anova_results: load_one(repository, Artifact::AnovaResults).await,
        tukey_results: load_one(repository, Artifact::TukeyResults).await,
        predictions: load_one(repository, Artifact::Predictions).await,
        executive_summary: load_one(repository, Artifact::ExecutiveSummary).await,
        statuses,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// In-memory repository keyed by artifact. A `None` entry simulates an
    /// unreadable file.
    #[derive(Default)]
    pub(crate) struct FakeRepository {
        pub files: HashMap<Artifact, Option<Dataset>>,
    }

    impl FakeRepository {
        pub fn with(mut self, artifact: Artifact, headers: &[&str], rows: &[&[&str]]) -> Self {
            let dataset = Dataset::from_rows(
                headers.iter().map(|h| h.to_string()).collect(),
                rows.iter()
                    .map(|r| r.iter().map(|c| c.to_string()).collect())
                    .collect(),
            );
            self.files.insert(artifact, Some(dataset));
            self
        }

        pub fn broken(mut self, artifact: Artifact) -> Self {
            self.files.insert(artifact, None);
            self
        }
    }

    #[async_trait]
    impl ArtifactRepository for FakeRepository {
        async fn exists(&self, artifact: Artifact) -> bool {
            self.files.contains_key(&artifact)
        }

        async fn load(&self, artifact: Artifact) -> anyhow::Result<Option<Dataset>> {
            match self.files.get(&artifact) {
                Some(Some(dataset)) => Ok(Some(dataset.clone())),
                Some(None) => anyhow::bail!("malformed CSV"),
                None => Ok(None),
            }
        }
    }

    #[tokio::test]
    async fn test_load_bundle_outcomes() {
        let repo = FakeRepository::default()
            .with(Artifact::AnovaResults, &["p_value"], &[&["0.1"]])
            .with(Artifact::ClusterProfiles, &["cluster"], &[])
            .broken(Artifact::TukeyResults);

        let bundle = load_bundle(&repo).await;

        assert!(bundle.anova_results.non_empty().is_some());
        assert!(bundle.cluster_profiles.non_empty().is_none());
        assert!(matches!(bundle.cluster_profiles, LoadOutcome::Loaded(_)));
        assert!(matches!(bundle.tukey_results, LoadOutcome::Unreadable(_)));
        assert!(matches!(bundle.rfm_with_clusters, LoadOutcome::Missing));
        assert!(matches!(bundle.outcome(Artifact::ExecutiveSummary), LoadOutcome::Missing));

        let found: Vec<bool> = bundle.statuses.iter().map(|s| s.found).collect();
        assert_eq!(found, vec![false, true, false, true, true, false, false]);
        assert_eq!(bundle.statuses[0].file_name, "rfm_with_clusters.csv");
    }
}
