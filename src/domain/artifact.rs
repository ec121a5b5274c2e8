// Artifact domain model: the fixed set of CSV files produced upstream
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    RfmWithClusters,
    ClusterProfiles,
    MonthlyEventsTrend,
    AnovaResults,
    TukeyResults,
    Predictions,
    ExecutiveSummary,
}

impl Artifact {
    /// Every artifact, in the order the status panel lists them.
    pub const ALL: [Artifact; 7] = [
        Artifact::RfmWithClusters,
        Artifact::ClusterProfiles,
        Artifact::MonthlyEventsTrend,
        Artifact::AnovaResults,
        Artifact::TukeyResults,
        Artifact::Predictions,
        Artifact::ExecutiveSummary,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Artifact::RfmWithClusters => "rfm_with_clusters.csv",
            Artifact::ClusterProfiles => "cluster_profiles.csv",
            Artifact::MonthlyEventsTrend => "monthly_events_trend.csv",
            Artifact::AnovaResults => "anova_results.csv",
            Artifact::TukeyResults => "tukey_results.csv",
            Artifact::Predictions => "predictions_m_plus_1.csv",
            Artifact::ExecutiveSummary => "executive_summary.csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactStatus {
    pub file_name: String,
    pub found: bool,
}

impl ArtifactStatus {
    pub fn new(artifact: Artifact, found: bool) -> Self {
        Self {
            file_name: artifact.file_name().to_string(),
            found,
        }
    }

    /// Status line as shown in the sidebar.
    pub fn label(&self) -> String {
        format!("- {} {}", self.file_name, if self.found { "✅" } else { "❌" })
    }
}
