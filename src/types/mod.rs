use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::AnalysisConfig;
use crate::model::FieldPath;

/// Method pair counts used by LCOM1 and LCOM2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PairData {
    pub shared_pairs: usize,
    pub unshared_pairs: usize,
    pub total_pairs: usize,
}

/// Inputs of LCOM5: field accesses `a`, distinct fields `l`, methods `k`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Lcom5Data {
    pub accesses: usize,
    pub fields: usize,
    pub methods: usize,
}

/// Why two methods are connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum EdgeReason {
    SharedField(FieldPath),
    Call,
}

/// One edge of the method dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodEdge {
    pub from: String,
    pub to: String,
    pub reason: EdgeReason,
}

/// A local view a method bound over a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodAlias {
    pub method: String,
    pub view: String,
    pub target: FieldPath,
}

/// Cohesion measurements for one type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeMetrics {
    /// Connected components over shared-field and call edges.
    pub lcom4: usize,
    /// Method names per component, sorted.
    pub groups: Vec<Vec<String>>,
    pub methods: usize,
    pub fields: usize,
    pub edges: usize,
    /// Methods with no field access and no internal call.
    pub isolated: usize,
    pub lcom1: usize,
    pub lcom2: usize,
    pub lcom3: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcom5: Option<f64>,
    pub lcom5_data: Lcom5Data,
    /// LCOM1 over total pairs; `None` with fewer than two methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcom1_normalized: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcom2_normalized: Option<f64>,
    pub lcom3_normalized: f64,
    pub lcom4_normalized: f64,
    pub pairs: PairData,
    /// Graph edges, first reason per method pair.
    pub dependencies: Vec<MethodEdge>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<MethodAlias>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
}

impl TypeMetrics {
    #[must_use]
    pub fn is_cohesive(&self) -> bool {
        self.lcom4 == 1
    }
}

/// Result of analyzing a single type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TypeOutcome {
    Measured(TypeMetrics),
    /// The metric is undefined, e.g. a type without receiver methods.
    NotApplicable { reason: String },
    /// The symbol model for this type was malformed.
    Failed { error: String },
    /// Skipped by an `exclude_types` pattern.
    Excluded,
}

impl TypeOutcome {
    #[must_use]
    pub fn metrics(&self) -> Option<&TypeMetrics> {
        match self {
            Self::Measured(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn lcom4(&self) -> Option<usize> {
        self.metrics().map(|m| m.lcom4)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Measured(_) => "measured",
            Self::NotApplicable { .. } => "n/a",
            Self::Failed { .. } => "failed",
            Self::Excluded => "excluded",
        }
    }
}

/// Aggregated results for a batch of types, keyed by type name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CohesionReport {
    pub types: BTreeMap<String, TypeOutcome>,
    pub options: AnalysisConfig,
    pub duration_ms: u128,
}

impl CohesionReport {
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&TypeOutcome> {
        self.types.get(type_name)
    }

    #[must_use]
    pub fn measured_count(&self) -> usize {
        self.types.values().filter(|t| t.metrics().is_some()).count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.types
            .values()
            .filter(|t| matches!(t, TypeOutcome::Failed { .. }))
            .count()
    }

    /// Measured types whose methods split into more than one group.
    #[must_use]
    pub fn non_cohesive_count(&self) -> usize {
        self.types
            .values()
            .filter_map(TypeOutcome::metrics)
            .filter(|m| !m.is_cohesive())
            .count()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}
