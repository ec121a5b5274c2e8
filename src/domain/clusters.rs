// Per-cluster summary of the RFM segmentation
use super::chart::Bar;
use super::dataset::{ColumnKind, Dataset};
use std::cmp::Ordering;

pub const CLUSTER_COLUMN: &str = "cluster";
pub const MONETARY_COLUMN: &str = "monetary";

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterMean {
    pub cluster: String,
    /// `None` when every `monetary` value in the group is missing.
    pub mean: Option<f64>,
}

impl From<ClusterMean> for Bar {
    fn from(value: ClusterMean) -> Self {
        Bar {
            label: value.cluster,
            value: value.mean,
        }
    }
}

struct Group {
    label: String,
    key: Option<f64>,
    sum: f64,
    count: usize,
}

/// Mean `monetary` per `cluster`, ascending by mean.
///
/// Returns `None` when either column is absent or `monetary` is not numeric.
/// Rows without a cluster label are ignored.
pub fn cluster_means(dataset: &Dataset) -> Option<Vec<ClusterMean>> {
    let cluster = dataset.column(CLUSTER_COLUMN)?;
    let monetary = dataset.column(MONETARY_COLUMN)?;
    if !monetary.is_numeric() {
        return None;
    }

    // Boolean labels group by their text.
    let numeric_keys = cluster.kind == ColumnKind::Number;
    let mut groups: Vec<Group> = Vec::new();

    for row in 0..dataset.row_count() {
        let Some(raw) = cluster.text(row) else {
            continue;
        };
        let key = if numeric_keys { cluster.number(row) } else { None };
        let label = key.map(format_key).unwrap_or_else(|| raw.to_string());

        let idx = match groups.iter().position(|g| g.label == label) {
            Some(idx) => idx,
            None => {
                groups.push(Group {
                    label,
                    key,
                    sum: 0.0,
                    count: 0,
                });
                groups.len() - 1
            }
        };

        if let Some(value) = monetary.number(row) {
            groups[idx].sum += value;
            groups[idx].count += 1;
        }
    }

    // Group order first, then a stable sort by mean.
    groups.sort_by(|a, b| match (a.key, b.key) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.label.cmp(&b.label),
    });

    let mut means: Vec<ClusterMean> = groups
        .into_iter()
        .map(|g| ClusterMean {
            cluster: g.label,
            mean: (g.count > 0).then(|| g.sum / g.count as f64),
        })
        .collect();

    means.sort_by(|a, b| match (a.mean, b.mean) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    Some(means)
}

fn format_key(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_cluster_labels_keep_text() {
        let ds = dataset(
            &["cluster", "monetary"],
            &[&["True", "10"], &["False", "30"], &["True", "20"]],
        );

        let means = cluster_means(&ds).unwrap();
        assert_eq!(means[0].cluster, "True");
        assert_eq!(means[0].mean, Some(15.0));
        assert_eq!(means[1].cluster, "False");
    }

    fn dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::from_rows(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_means_sorted_ascending() {
        let ds = dataset(
            &["customer_id", "cluster", "monetary"],
            &[&["a", "0", "100"], &["b", "1", "50"], &["c", "0", "200"]],
        );

        let means = cluster_means(&ds).unwrap();
        assert_eq!(
            means,
            vec![
                ClusterMean {
                    cluster: "1".to_string(),
                    mean: Some(50.0)
                },
                ClusterMean {
                    cluster: "0".to_string(),
                    mean: Some(150.0)
                },
            ]
        );
    }

    #[test]
    fn test_missing_columns_skip_chart() {
        let ds = dataset(&["cluster", "frequency"], &[&["0", "3"]]);
        assert!(cluster_means(&ds).is_none());

        let ds = dataset(&["Cluster", "monetary"], &[&["0", "3"]]);
        assert!(cluster_means(&ds).is_none());
    }

    #[test]
    fn test_non_numeric_monetary_skips_chart() {
        let ds = dataset(&["cluster", "monetary"], &[&["0", "lots"]]);
        assert!(cluster_means(&ds).is_none());
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let ds = dataset(
            &["cluster", "monetary"],
            &[
                &["2", "10"],
                &["", "500"],
                &["2", ""],
                &["7", ""],
                &["3", "4"],
            ],
        );

        let means = cluster_means(&ds).unwrap();
        let labels: Vec<&str> = means.iter().map(|m| m.cluster.as_str()).collect();
        assert_eq!(labels, vec!["3", "2", "7"]);
        assert_eq!(means[1].mean, Some(10.0));
        assert_eq!(means[2].mean, None);
    }

    #[test]
    fn test_text_clusters_and_ties_keep_key_order() {
        let ds = dataset(
            &["cluster", "monetary"],
            &[&["vip", "5"], &["churn", "5"], &["new", "1"]],
        );

        let labels: Vec<String> = cluster_means(&ds)
            .unwrap()
            .into_iter()
            .map(|m| Bar::from(m).label)
            .collect();
        assert_eq!(labels, vec!["new", "churn", "vip"]);
    }

    #[test]
    fn test_numeric_keys_merge_equal_values() {
        let ds = dataset(&["cluster", "monetary"], &[&["1", "2"], &["1.0", "4"]]);

        let means = cluster_means(&ds).unwrap();
        assert_eq!(means.len(), 1);
        assert_eq!(means[0].cluster, "1");
        assert_eq!(means[0].mean, Some(3.0));
    }
}
