//! Property-based tests for the cohesion engine
//!
//! These tests verify invariants that should hold for all inputs:
//! - The metric is bounded by the method count and groups partition methods
//! - Results do not depend on event, field, or method order
//! - Turning alias tracking or result unification off never lowers the metric

use lcom_core::analysis::analyze_type;
use lcom_core::config::{AnalysisConfig, Config};
use lcom_core::model::{BodyEvent, MethodDecl, TypeModel, WrappedSource};
use lcom_core::types::{TypeMetrics, TypeOutcome};
use proptest::prelude::*;

const FIELDS: usize = 4;
const TYPE: &str = "Subject";

/// One body event over a small fixed vocabulary of fields and methods.
fn event(methods: usize) -> impl Strategy<Value = BodyEvent> {
    prop_oneof![
        (0..FIELDS).prop_map(|f| BodyEvent::read(&format!("self.f{f}"))),
        (0..FIELDS).prop_map(|f| BodyEvent::write(&format!("self.f{f}[1]"))),
        (0..FIELDS, 0..FIELDS)
            .prop_map(|(a, b)| BodyEvent::copy(&format!("f{a}"), &format!("f{b}"))),
        (0..FIELDS)
            .prop_map(|f| BodyEvent::bind_view(&format!("v{f}"), &format!("self.f{f}[0:2]"))),
        (0..FIELDS).prop_map(|f| BodyEvent::view_write(&format!("v{f}"))),
        (0..methods).prop_map(|m| BodyEvent::call(Some(TYPE), &format!("m{m}"))),
        (0..FIELDS, 0..methods).prop_map(|(f, m)| BodyEvent::wrap(vec![
            WrappedSource::Field(format!("f{f}")),
            WrappedSource::Call(lcom_core::model::CallTarget::new(Some(TYPE), &format!("m{m}"))),
        ])),
        Just(BodyEvent::opaque("*(p + 1)")),
    ]
}

fn subject() -> impl Strategy<Value = TypeModel> {
    (1usize..7).prop_flat_map(|methods| {
        prop::collection::vec(prop::collection::vec(event(methods), 0..5), methods).prop_map(
            move |bodies| {
                let mut model = TypeModel::new(TYPE);
                for f in 0..FIELDS {
                    model = model.with_field(&format!("f{f}"));
                }
                for (i, body) in bodies.into_iter().enumerate() {
                    let mut method = MethodDecl::new(&format!("m{i}"), TYPE);
                    method.body = body;
                    model = model.with_method(method);
                }
                model
            },
        )
    })
}

fn measure(model: &TypeModel, analysis: AnalysisConfig) -> TypeMetrics {
    match analyze_type(model, &Config::with_analysis(analysis)) {
        TypeOutcome::Measured(m) => m,
        other => panic!("expected a measurement, got {other:?}"),
    }
}

fn reversed(model: &TypeModel) -> TypeModel {
    let mut out = model.clone();
    out.fields.reverse();
    out.methods.reverse();
    for method in &mut out.methods {
        method.body.reverse();
    }
    out
}

proptest! {
    #[test]
    fn prop_metric_is_bounded_and_groups_partition(model in subject()) {
        let m = measure(&model, AnalysisConfig::default());
        prop_assert!(m.lcom4 >= 1);
        prop_assert!(m.lcom4 <= model.methods.len());
        prop_assert_eq!(m.groups.len(), m.lcom4);

        let mut members: Vec<String> = m.groups.iter().flatten().cloned().collect();
        members.sort();
        let mut names: Vec<String> = model.methods.iter().map(|d| d.name.clone()).collect();
        names.sort();
        prop_assert_eq!(members, names);
    }

    #[test]
    fn prop_order_independent(model in subject()) {
        let forward = measure(&model, AnalysisConfig::default());
        let backward = measure(&reversed(&model), AnalysisConfig::default());
        prop_assert_eq!(forward.lcom4, backward.lcom4);
        prop_assert_eq!(forward.groups, backward.groups);
    }

    #[test]
    fn prop_alias_tracking_never_splits(model in subject()) {
        let on = measure(&model, AnalysisConfig::default());
        let off = measure(&model, AnalysisConfig {
            alias_tracking: false,
            ..AnalysisConfig::default()
        });
        prop_assert!(off.lcom4 >= on.lcom4);
    }

    #[test]
    fn prop_unification_never_splits(model in subject()) {
        let on = measure(&model, AnalysisConfig::default());
        let off = measure(&model, AnalysisConfig {
            unify_wrapped_results: false,
            ..AnalysisConfig::default()
        });
        prop_assert!(off.lcom4 >= on.lcom4);
    }

    #[test]
    fn prop_companion_metrics_consistent(model in subject()) {
        let m = measure(&model, AnalysisConfig::default());
        prop_assert_eq!(m.pairs.total_pairs, m.pairs.shared_pairs + m.pairs.unshared_pairs);
        prop_assert!(m.lcom3 >= 1);
        if let Some(lcom5) = m.lcom5 {
            prop_assert!((0.0..=1.0).contains(&lcom5));
        }
    }
}
