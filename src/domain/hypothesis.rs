// Statistical test result helpers
use super::dataset::{ColumnKind, Dataset};

pub const P_VALUE_COLUMN: &str = "p_value";

/// Callout reporting the smallest ANOVA p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PValueCallout {
    pub min_p_value: f64,
}

impl PValueCallout {
    pub fn message(&self) -> String {
        format!(
            "Menor p-value: {:.6} — valores < 0.05 sugerem diferença significativa de médias entre grupos.",
            self.min_p_value
        )
    }
}

/// Minimum of the `p_value` column, if it has one that reads as a number.
pub fn min_p_value(dataset: &Dataset) -> Option<PValueCallout> {
    let column = dataset.column(P_VALUE_COLUMN)?;

    let min_p_value = match column.kind {
        ColumnKind::Number => (0..column.len())
            .filter_map(|row| column.number(row))
            .min_by(|a, b| a.total_cmp(b))?,
        // Text columns compare lexicographically; the winner must still parse.
        _ => column.texts().flatten().min()?.trim().parse::<f64>().ok()?,
    };

    Some(PValueCallout { min_p_value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::from_rows(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_min_p_value() {
        let ds = dataset(
            &["metric", "f_stat", "p_value"],
            &[&["monetary", "4.1", "0.03"], &["recency", "1.2", "0.2"], &["frequency", "9.9", "0.001"]],
        );

        let callout = min_p_value(&ds).unwrap();
        assert_eq!(callout.min_p_value, 0.001);
        assert!(callout.message().starts_with("Menor p-value: 0.001000 "));
    }

    #[test]
    fn test_no_column_no_callout() {
        let ds = dataset(&["metric"], &[&["monetary"]]);
        assert!(min_p_value(&ds).is_none());
    }

    #[test]
    fn test_all_missing_no_callout() {
        let ds = dataset(&["p_value"], &[&[""], &["NaN"]]);
        assert!(min_p_value(&ds).is_none());
    }

    #[test]
    fn test_text_column_parses_lexicographic_min() {
        let ds = dataset(&["p_value"], &[&["<0.001"], &["0.5"]]);
        // "0.5" sorts before "<0.001" and parses.
        assert_eq!(min_p_value(&ds).unwrap().min_p_value, 0.5);

        let ds = dataset(&["p_value"], &[&["n.s."], &["<0.001"]]);
        assert!(min_p_value(&ds).is_none());
    }
}
