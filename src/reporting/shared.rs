use crate::types::{CohesionReport, EdgeReason, TypeMetrics};
use std::time::Duration;

pub(crate) fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

pub(crate) fn duration(report: &CohesionReport) -> Duration {
    let ms = u64::try_from(report.duration_ms).unwrap_or(u64::MAX);
    Duration::from_millis(ms)
}

/// `{a, b} {c}` rendering of component groups.
pub(crate) fn format_groups(metrics: &TypeMetrics) -> String {
    metrics
        .groups
        .iter()
        .map(|g| format!("{{{}}}", g.join(", ")))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn format_lcom5(metrics: &TypeMetrics) -> String {
    format_ratio(metrics.lcom5)
}

/// The shared field, or `call` for an internal call edge.
pub(crate) fn edge_label(reason: &EdgeReason) -> String {
    match reason {
        EdgeReason::SharedField(field) => field.to_string(),
        EdgeReason::Call => "call".to_string(),
    }
}

pub(crate) fn format_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), |v| format!("{v:.3}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Lcom5Data, PairData};

    fn metrics(groups: Vec<Vec<&str>>, lcom5: Option<f64>) -> TypeMetrics {
        TypeMetrics {
            lcom4: groups.len(),
            groups: groups
                .into_iter()
                .map(|g| g.into_iter().map(String::from).collect())
                .collect(),
            methods: 3,
            fields: 0,
            edges: 1,
            isolated: 1,
            lcom1: 2,
            lcom2: 2,
            lcom3: 3,
            lcom5,
            lcom5_data: Lcom5Data::default(),
            lcom1_normalized: None,
            lcom2_normalized: None,
            lcom3_normalized: 1.0,
            lcom4_normalized: 0.0,
            pairs: PairData::default(),
            dependencies: Vec::new(),
            aliases: Vec::new(),
            type_params: Vec::new(),
        }
    }

    #[test]
    fn test_format_groups() {
        let m = metrics(vec![vec!["methodOne", "methodTwo"], vec!["methodThree"]], None);
        assert_eq!(format_groups(&m), "{methodOne, methodTwo} {methodThree}");
    }

    #[test]
    fn test_format_lcom5() {
        assert_eq!(format_lcom5(&metrics(vec![], None)), "undefined");
        assert_eq!(format_lcom5(&metrics(vec![], Some(0.75))), "0.750");
        assert_eq!(format_ratio(Some(2.0 / 3.0)), "0.667");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("type", 1), "type");
        assert_eq!(pluralize("type", 2), "types");
    }
}
