// Dashboard page model
use super::artifact::ArtifactStatus;
use super::chart::{BarChart, ChartData};
use super::dataset::Dataset;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub sidebar: Sidebar,
    pub tabs: Vec<Tab>,
}

impl Dashboard {
    pub fn new(title: String, sidebar: Sidebar, tabs: Vec<Tab>) -> Self {
        Self {
            title,
            sidebar,
            tabs,
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.tabs
            .iter()
            .flat_map(|t| t.sections.iter())
            .flat_map(|s| s.blocks.iter())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Sidebar {
    pub header: String,
    pub artifacts: Vec<ArtifactStatus>,
    pub hint: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tab {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Tab {
    pub fn new(title: &str, sections: Vec<Section>) -> Self {
        Self {
            title: title.to_string(),
            sections,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub heading: String,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(heading: &str) -> Self {
        Self {
            heading: heading.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Table(TableView),
    BarChart(BarChart),
    LineChart(ChartData),
    Info { message: String },
    Warning { message: String },
    Callout { message: String },
    Caption { message: String },
    Note { message: String },
}

impl Block {
    pub fn info(message: impl Into<String>) -> Self {
        Block::Info {
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Block::Warning {
            message: message.into(),
        }
    }

    pub fn is_chart(&self) -> bool {
        matches!(self, Block::BarChart(_) | Block::LineChart(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Row count of the source dataset, before any preview limit.
    pub total_rows: usize,
}

impl TableView {
    pub fn from_dataset(dataset: &Dataset, limit: Option<usize>) -> Self {
        let shown = match limit {
            Some(limit) => dataset.head(limit),
            None => dataset.clone(),
        };

        let rows = (0..shown.row_count())
            .map(|row| {
                shown
                    .columns()
                    .iter()
                    .map(|c| c.text(row).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();

        Self {
            columns: dataset.columns().iter().map(|c| c.name.clone()).collect(),
            rows,
            total_rows: dataset.row_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_view_preview_limit() {
        let ds = Dataset::from_rows(
            vec!["Cluster".to_string(), "monetary".to_string()],
            (0..5)
                .map(|i| vec![i.to_string(), String::new()])
                .collect(),
        );

        let view = TableView::from_dataset(&ds, Some(2));
        assert_eq!(view.columns, vec!["Cluster", "monetary"]);
        assert_eq!(view.rows, vec![vec!["0", ""], vec!["1", ""]]);
        assert_eq!(view.total_rows, 5);
    }

    #[test]
    fn test_block_serializes_with_type_tag() {
        let json = serde_json::to_value(Block::warning("careful")).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["message"], "careful");
    }
}
