use crate::reporting::shared::edge_label;
use crate::types::CohesionReport;
use std::fmt::Write;

/// Renders the method dependency graphs of all measured types as one DOT
/// digraph, one cluster per type.
#[must_use]
pub fn to_dot(report: &CohesionReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "digraph {{");
    let _ = writeln!(out, "  compound=true;");
    let _ = writeln!(out, "  rankdir=\"BT\";");

    let measured = report
        .types
        .iter()
        .filter_map(|(name, outcome)| outcome.metrics().map(|m| (name, m)));
    for (index, (name, metrics)) in measured.enumerate() {
        let _ = writeln!(out, "  subgraph cluster_{index} {{");
        let _ = writeln!(out, "    style=\"rounded\";");
        let _ = writeln!(
            out,
            "    label=\"{} (LCOM4 = {})\";",
            escape(name),
            metrics.lcom4
        );
        for method in metrics.groups.iter().flatten() {
            let _ = writeln!(
                out,
                "    \"{}\"[ label = \"{}\" ];",
                node_id(name, method),
                escape(method)
            );
        }
        for edge in &metrics.dependencies {
            let _ = writeln!(
                out,
                "    \"{}\" -> \"{}\"[ label = \"{}\", dir = none ];",
                node_id(name, &edge.from),
                node_id(name, &edge.to),
                escape(&edge_label(&edge.reason))
            );
        }
        let _ = writeln!(out, "  }}");
    }

    let _ = writeln!(out, "}}");
    out
}

fn node_id(type_name: &str, method: &str) -> String {
    escape(&format!("{type_name}::{method}"))
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
