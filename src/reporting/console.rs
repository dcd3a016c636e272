use crate::reporting::shared::{
    duration, edge_label, format_groups, format_lcom5, format_ratio, pluralize,
};
use crate::types::{CohesionReport, TypeMetrics, TypeOutcome};
use colored::Colorize;

/// Prints a formatted cohesion report to stdout, one block per type in
/// name order, followed by a summary line.
pub fn print_report(report: &CohesionReport) {
    for (name, outcome) in &report.types {
        print_outcome(name, outcome);
    }
    print_summary(report);
}

fn print_outcome(name: &str, outcome: &TypeOutcome) {
    match outcome {
        TypeOutcome::Measured(metrics) => print_measured(name, metrics),
        TypeOutcome::NotApplicable { reason } => {
            let label = format!("{}:", outcome.label());
            println!(
                "{} {} {}",
                label.dimmed(),
                name.bold(),
                format!("({reason})").dimmed()
            );
        }
        TypeOutcome::Failed { error } => {
            println!("{} {}", "error:".red().bold(), error);
        }
        TypeOutcome::Excluded => {
            let label = format!("{}:", outcome.label());
            println!("{} {}", label.dimmed(), name.dimmed());
        }
    }
}

fn print_measured(name: &str, m: &TypeMetrics) {
    let header = format!("{name}: LCOM4 = {}", m.lcom4);
    if m.is_cohesive() {
        println!("{}", header.green().bold());
    } else {
        println!("{}", header.yellow().bold());
    }

    println!("   {} {}", "groups:".cyan(), format_groups(m));
    println!(
        "   {} {} {}, {} {}, {} {}",
        "=".blue(),
        m.methods,
        pluralize("method", m.methods),
        m.fields,
        pluralize("field", m.fields),
        m.edges,
        pluralize("edge", m.edges)
    );
    println!(
        "   {} LCOM1 {}  LCOM2 {}  LCOM3 {}  LCOM5 {}",
        "=".blue(),
        m.lcom1,
        m.lcom2,
        m.lcom3,
        format_lcom5(m)
    );
    println!(
        "   {} normalized LCOM1 {}  LCOM2 {}  LCOM3 {:.3}  LCOM4 {:.3}",
        "=".blue(),
        format_ratio(m.lcom1_normalized),
        format_ratio(m.lcom2_normalized),
        m.lcom3_normalized,
        m.lcom4_normalized
    );
    println!(
        "   {} LCOM5 inputs a={} l={} k={}",
        "=".blue(),
        m.lcom5_data.accesses,
        m.lcom5_data.fields,
        m.lcom5_data.methods
    );
    for edge in &m.dependencies {
        let label = edge_label(&edge.reason);
        println!("   {} {} -- {} ({label})", "-->".blue(), edge.from, edge.to);
    }
    println!();
}

fn print_summary(report: &CohesionReport) {
    let total = report.types.len();
    let measured = report.measured_count();
    let split = report.non_cohesive_count();
    let failed = report.failed_count();

    let line = format!(
        "{total} {} analyzed, {measured} measured, {split} non-cohesive, {failed} failed ({:?})",
        pluralize("type", total),
        duration(report)
    );
    if failed > 0 {
        println!("{}", line.red().bold());
    } else if split > 0 {
        println!("{}", line.yellow());
    } else {
        println!("{}", line.green());
    }
}
