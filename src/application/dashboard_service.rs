// Dashboard service - Use case for building the dashboard page
use crate::application::artifact_bundle::{load_bundle, ArtifactBundle, LoadOutcome};
use crate::application::artifact_repository::ArtifactRepository;
use crate::domain::artifact::{Artifact, ArtifactStatus};
use crate::domain::chart::BarChart;
use crate::domain::clusters::cluster_means;
use crate::domain::dashboard::{Block, Dashboard, Section, Sidebar, Tab, TableView};
use crate::domain::hypothesis::min_p_value;
use crate::domain::trend::{resolve, TrendResolution};
use crate::infrastructure::config::DashboardSettings;
use std::sync::Arc;

const SIDEBAR_HEADER: &str = "Arquivos carregados";
const SIDEBAR_HINT: &str = "Dica: gere os CSVs rodando o notebook primeiro.";

const TAB_CLUSTERS: &str = "Clusters (RFM)";
const TAB_TREND: &str = "Tendência mensal";
const TAB_HYPOTHESIS: &str = "Testes de hipótese";

const TREND_UNRESOLVED: &str = "Não foi possível identificar colunas de mês e eventos no CSV.";
const TUKEY_CAPTION: &str = "Coluna 'reject' = True indica pares com diferença significativa (α=0.05).";

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn ArtifactRepository>,
    settings: DashboardSettings,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn ArtifactRepository>, settings: DashboardSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Load every artifact and build the page. Never fails: problems with
    /// individual files end up as messages inside their own section.
    pub async fn get_dashboard(&self) -> Dashboard {
        let bundle = load_bundle(self.repository.as_ref()).await;
        let dashboard = self.build(&bundle);

        tracing::debug!(
            charts = dashboard.blocks().filter(|b| b.is_chart()).count(),
            blocks = dashboard.blocks().count(),
            "Built dashboard"
        );
        dashboard
    }

    pub async fn artifact_statuses(&self) -> Vec<ArtifactStatus> {
        let mut statuses = Vec::with_capacity(Artifact::ALL.len());
        for artifact in Artifact::ALL {
            statuses.push(ArtifactStatus::new(artifact, self.repository.exists(artifact).await));
        }
        statuses
    }

    fn build(&self, bundle: &ArtifactBundle) -> Dashboard {
        let sidebar = Sidebar {
            header: SIDEBAR_HEADER.to_string(),
            artifacts: bundle.statuses.clone(),
            hint: SIDEBAR_HINT.to_string(),
        };

        let tabs = vec![
            self.clusters_tab(bundle),
            self.trend_tab(bundle),
            self.hypothesis_tab(bundle),
        ];

        Dashboard::new(self.settings.title.clone(), sidebar, tabs)
    }

    fn clusters_tab(&self, bundle: &ArtifactBundle) -> Tab {
        let mut rfm = Section::new("RFM com Clusters");
        match bundle.rfm_with_clusters.non_empty() {
            Some(dataset) => {
                rfm.push(Block::Table(TableView::from_dataset(
                    dataset,
                    Some(self.settings.table_preview_rows),
                )));

                if let Some(means) = cluster_means(dataset) {
                    rfm.push(Block::BarChart(BarChart {
                        id: "monetary-by-cluster".to_string(),
                        title: "Média de Monetary por Cluster".to_string(),
                        x_label: "Cluster".to_string(),
                        y_label: "Monetary (média)".to_string(),
                        bars: means.into_iter().map(Into::into).collect(),
                    }));
                }
            }
            None => rfm.push(unavailable(bundle, Artifact::RfmWithClusters)),
        }

        let mut profiles = Section::new("Perfis de Cluster");
        match bundle.cluster_profiles.non_empty() {
            Some(dataset) => profiles.push(Block::Table(TableView::from_dataset(dataset, None))),
            None => profiles.push(unavailable(bundle, Artifact::ClusterProfiles)),
        }

        Tab::new(TAB_CLUSTERS, vec![rfm, profiles])
    }

    fn trend_tab(&self, bundle: &ArtifactBundle) -> Tab {
        let mut trend = Section::new("Tendência Mensal de Eventos");

        match bundle.monthly_trend.non_empty() {
            Some(dataset) => match resolve(dataset) {
                TrendResolution::Resolved(series) => {
                    tracing::debug!(
                        time = %series.time_column,
                        metric = %series.metric_column,
                        points = series.len(),
                        "Rendering monthly trend"
                    );
                    if series.is_empty() {
                        tracing::warn!("No parseable dates in column {}", series.time_column);
                    }
                    trend.push(Block::LineChart(series.to_chart(
                        "monthly-trend",
                        "Eventos por mês",
                        "Mês",
                        "Eventos",
                    )));

                    if let Some(predictions) = bundle.predictions.non_empty() {
                        trend.push(Block::Note {
                            message: "Previsão M+1 (eventos):".to_string(),
                        });
                        trend.push(Block::Table(TableView::from_dataset(predictions, None)));
                    }
                }
                TrendResolution::Unresolved => {
                    tracing::warn!("Could not identify month and event columns in monthly trend");
                    trend.push(Block::warning(TREND_UNRESOLVED));
                }
            },
            None => trend.push(unavailable(bundle, Artifact::MonthlyEventsTrend)),
        }

        Tab::new(TAB_TREND, vec![trend])
    }

    fn hypothesis_tab(&self, bundle: &ArtifactBundle) -> Tab {
        let mut anova = Section::new("ANOVA");
        match bundle.anova_results.non_empty() {
            Some(dataset) => {
                anova.push(Block::Table(TableView::from_dataset(dataset, None)));
                if let Some(callout) = min_p_value(dataset) {
                    anova.push(Block::Callout {
                        message: callout.message(),
                    });
                }
            }
            None => anova.push(unavailable(bundle, Artifact::AnovaResults)),
        }

        let mut tukey = Section::new("Tukey HSD (pares de clusters)");
        match bundle.tukey_results.non_empty() {
            Some(dataset) => {
                tukey.push(Block::Table(TableView::from_dataset(dataset, None)));
                tukey.push(Block::Caption {
                    message: TUKEY_CAPTION.to_string(),
                });
            }
            None => tukey.push(unavailable(bundle, Artifact::TukeyResults)),
        }

        Tab::new(TAB_HYPOTHESIS, vec![anova, tukey])
    }
}

/// Message shown in place of an artifact that is absent, empty or unreadable.
fn unavailable(bundle: &ArtifactBundle, artifact: Artifact) -> Block {
    match bundle.outcome(artifact) {
        LoadOutcome::Unreadable(reason) => {
            tracing::debug!(file = artifact.file_name(), %reason, "Showing unreadable artifact");
            Block::warning(format!("{} não pôde ser lido.", artifact.file_name()))
        }
        _ => Block::info(format!("{} não encontrado.", artifact.file_name())),
    }
}
