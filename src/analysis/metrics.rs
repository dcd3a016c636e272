// src/analysis/metrics.rs
//! Cohesion metrics over a resolved [`Scope`] (LCOM1-LCOM5).

use super::graph::DependencyGraph;
use super::scope::{Method, Scope};
use crate::types::{Lcom5Data, MethodAlias, PairData, TypeMetrics};
use std::collections::BTreeSet;

pub struct ScopeMetrics;

impl ScopeMetrics {
    /// Calculates every metric for a non-empty scope.
    #[must_use]
    pub fn calculate(scope: &Scope) -> TypeMetrics {
        let graph = DependencyGraph::build(scope, true);
        let groups = graph.components();
        let pairs = Self::calculate_pairs(scope);
        let methods = scope.methods().len();
        let lcom4 = groups.len();
        let lcom3 = Self::calculate_lcom3(scope);
        let lcom1 = pairs.unshared_pairs;
        let lcom2 = pairs.unshared_pairs.saturating_sub(pairs.shared_pairs);
        let lcom5_data = Self::lcom5_data(scope);

        TypeMetrics {
            lcom4,
            lcom4_normalized: ratio(lcom4, methods),
            groups,
            methods,
            fields: scope.fields().len(),
            edges: graph.edge_count(),
            isolated: scope.methods().values().filter(|m| m.is_isolated()).count(),
            lcom1,
            lcom2,
            lcom3,
            lcom5: lcom5(lcom5_data),
            lcom5_data,
            lcom1_normalized: per_pair(lcom1, pairs.total_pairs),
            lcom2_normalized: per_pair(lcom2, pairs.total_pairs),
            lcom3_normalized: ratio(lcom3, methods),
            pairs,
            dependencies: graph.method_edges(),
            aliases: Self::aliases(scope),
            type_params: scope.type_params().to_vec(),
        }
    }

    /// Calculates LCOM4: components over shared-field and call edges.
    #[must_use]
    pub fn calculate_lcom4(scope: &Scope) -> usize {
        if scope.is_empty() {
            return 0;
        }
        DependencyGraph::build(scope, true).components().len()
    }

    /// Calculates LCOM3: components over shared-field edges only.
    #[must_use]
    pub fn calculate_lcom3(scope: &Scope) -> usize {
        if scope.is_empty() {
            return 0;
        }
        DependencyGraph::build(scope, false).components().len()
    }

    /// Counts method pairs that do and do not share a field path.
    #[must_use]
    pub fn calculate_pairs(scope: &Scope) -> PairData {
        let methods: Vec<&Method> = scope.methods().values().collect();
        let total_pairs = unique_pairs(methods.len());
        let mut shared_pairs = 0;
        for (i, a) in methods.iter().enumerate() {
            for b in &methods[i + 1..] {
                if !a.field_access.is_disjoint(&b.field_access) {
                    shared_pairs += 1;
                }
            }
        }
        PairData {
            shared_pairs,
            unshared_pairs: total_pairs - shared_pairs,
            total_pairs,
        }
    }

    /// Calculates LCOM5 `(a - k*l) / (l - k*l)` over declared fields.
    /// `None` when undefined (no fields used, or a single method).
    #[must_use]
    pub fn calculate_lcom5(scope: &Scope) -> Option<f64> {
        lcom5(Self::lcom5_data(scope))
    }

    /// Counts the LCOM5 inputs. Synthetic keys are not fields.
    #[must_use]
    pub fn lcom5_data(scope: &Scope) -> Lcom5Data {
        let mut used = BTreeSet::new();
        let mut accesses = 0usize;
        for method in scope.methods().values() {
            for field in method.field_access.iter().filter(|f| !f.is_synthetic()) {
                accesses += 1;
                used.insert(field);
            }
        }
        Lcom5Data {
            accesses,
            fields: used.len(),
            methods: scope.methods().len(),
        }
    }

    fn aliases(scope: &Scope) -> Vec<MethodAlias> {
        scope
            .methods()
            .values()
            .flat_map(|m| {
                m.aliases.iter().map(|alias| MethodAlias {
                    method: m.name.clone(),
                    view: alias.view.clone(),
                    target: alias.target.clone(),
                })
            })
            .collect()
    }
}

#[allow(clippy::cast_precision_loss)]
fn lcom5(data: Lcom5Data) -> Option<f64> {
    let a = data.accesses as f64;
    let l = data.fields as f64;
    let k = data.methods as f64;
    let denominator = l - k * l;
    if denominator == 0.0 {
        return None;
    }
    Some((a - k * l) / denominator)
}

const fn unique_pairs(n: usize) -> usize {
    if n < 2 {
        0
    } else {
        n * (n - 1) / 2
    }
}

fn per_pair(count: usize, total_pairs: usize) -> Option<f64> {
    (total_pairs > 0).then(|| ratio(count, total_pairs))
}

#[allow(clippy::cast_precision_loss)]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        return 0.0;
    }
    num as f64 / den as f64
}
