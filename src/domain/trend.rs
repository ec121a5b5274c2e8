// Monthly trend resolution: picks a time column and a metric column out of a
// loosely structured dataset and turns them into an ordered series.
use super::chart::{ChartData, SeriesData, TimeSeriesPoint};
use super::dataset::{Column, Dataset};
use chrono::NaiveDateTime;

/// Substrings that mark a column as the time axis. The first column whose
/// lower-cased name contains any of them wins.
pub const TIME_COLUMN_HINTS: [&str; 6] = ["month", "mes", "data", "date", "dt", "period"];

/// Preferred metric column, used whenever present.
pub const EVENTS_COLUMN: &str = "events";

/// Optional precomputed overlay column.
pub const MOVING_AVERAGE_COLUMN: &str = "ma";

pub const MOVING_AVERAGE_LABEL: &str = "moving avg (6m)";

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub time_column: String,
    pub metric_column: String,
    /// Metric column name as it appears in the source file.
    pub metric_label: String,
    pub timestamps: Vec<NaiveDateTime>,
    pub values: Vec<Option<f64>>,
    pub moving_average: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrendResolution {
    Resolved(TrendSeries),
    Unresolved,
}

/// Resolve the time and metric columns of `dataset` and build the sorted series.
pub fn resolve(dataset: &Dataset) -> TrendResolution {
    let normalized = dataset.with_lowercase_headers();
    let columns = normalized.columns();

    let time_idx = find_time_column(columns);
    let metric_idx = find_metric_column(columns, time_idx);

    let (Some(time_idx), Some(metric_idx)) = (time_idx, metric_idx) else {
        tracing::debug!(
            ?time_idx,
            ?metric_idx,
            "Trend columns unresolved"
        );
        return TrendResolution::Unresolved;
    };

    let time = &columns[time_idx];
    let metric = &columns[metric_idx];
    let moving_average = columns.iter().find(|c| c.name == MOVING_AVERAGE_COLUMN);

    let mut rows: Vec<(NaiveDateTime, usize)> = (0..normalized.row_count())
        .filter_map(|row| time.timestamp(row).map(|ts| (ts, row)))
        .collect();
    rows.sort_by_key(|(ts, _)| *ts);

    tracing::debug!(
        time_column = %time.name,
        metric_column = %metric.name,
        kept = rows.len(),
        dropped = normalized.row_count() - rows.len(),
        "Resolved trend columns"
    );

    TrendResolution::Resolved(TrendSeries {
        time_column: time.name.clone(),
        metric_column: metric.name.clone(),
        metric_label: dataset.columns()[metric_idx].name.clone(),
        timestamps: rows.iter().map(|(ts, _)| *ts).collect(),
        values: rows.iter().map(|(_, row)| metric.number(*row)).collect(),
        moving_average: moving_average.map(|ma| rows.iter().map(|(_, row)| ma.number(*row)).collect()),
    })
}

fn find_time_column(columns: &[Column]) -> Option<usize> {
    columns
        .iter()
        .position(|c| TIME_COLUMN_HINTS.iter().any(|hint| c.name.contains(hint)))
}

fn find_metric_column(columns: &[Column], time_idx: Option<usize>) -> Option<usize> {
    if let Some(idx) = columns.iter().position(|c| c.name == EVENTS_COLUMN) {
        return Some(idx);
    }

    columns
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != time_idx)
        .find(|(_, c)| c.is_numeric())
        .map(|(idx, _)| idx)
}

impl TrendSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    fn points(&self, values: &[Option<f64>]) -> Vec<TimeSeriesPoint> {
        self.timestamps
            .iter()
            .zip(values)
            .map(|(ts, value)| TimeSeriesPoint::new(ts.and_utc().timestamp_millis(), *value))
            .collect()
    }

    pub fn to_chart(&self, id: &str, title: &str, x_label: &str, y_label: &str) -> ChartData {
        let mut series = vec![SeriesData::new(
            self.metric_column.clone(),
            self.metric_label.clone(),
            self.points(&self.values),
        )];

        if let Some(ma) = &self.moving_average {
            series.push(SeriesData::new(
                MOVING_AVERAGE_COLUMN.to_string(),
                MOVING_AVERAGE_LABEL.to_string(),
                self.points(ma),
            ));
        }

        ChartData::new(
            id.to_string(),
            title.to_string(),
            x_label.to_string(),
            y_label.to_string(),
            series,
        )
    }
}
