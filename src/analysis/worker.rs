//! Worker module for single-type analysis.
//!
//! Resolver, call builder, graph and metrics run strictly in sequence; each
//! stage needs the previous stage's complete output.

use crate::config::Config;
use crate::error::LcomError;
use crate::model::TypeModel;
use crate::types::TypeOutcome;

use super::metrics::ScopeMetrics;
use super::scope::Scope;

#[must_use]
pub fn analyze_type(model: &TypeModel, config: &Config) -> TypeOutcome {
    if config.is_excluded(&model.name) {
        tracing::debug!(type_name = %model.name, "Excluded by pattern");
        return TypeOutcome::Excluded;
    }

    let scope = match Scope::from_model(model, &config.analysis) {
        Ok(scope) => scope,
        Err(source) => {
            let err = LcomError::model(&model.name, source);
            tracing::warn!(type_name = %model.name, "{err}");
            return TypeOutcome::Failed {
                error: err.to_string(),
            };
        }
    };

    if scope.is_empty() {
        return TypeOutcome::NotApplicable {
            reason: not_applicable_reason(model),
        };
    }

    let metrics = ScopeMetrics::calculate(&scope);
    tracing::debug!(
        type_name = %scope.name(),
        lcom4 = metrics.lcom4,
        methods = metrics.methods,
        edges = metrics.edges,
        "Measured"
    );
    TypeOutcome::Measured(metrics)
}

fn not_applicable_reason(model: &TypeModel) -> String {
    if model.methods.is_empty() {
        "type declares no methods".to_string()
    } else {
        format!(
            "none of {} declared methods has a '{}' receiver",
            model.methods.len(),
            model.base_name()
        )
    }
}
