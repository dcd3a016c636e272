// src/analysis/calls.rs
//! Intra-type call resolution.
//!
//! Calls resolve by static receiver type only. Anything that does not name
//! this type and one of its receiver methods is external, and unresolvable
//! targets are never promoted to internal.

use crate::config::AnalysisConfig;
use crate::model::{BodyEvent, CallTarget, MethodDecl, TypeModel, WrappedSource};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallKind {
    /// Same-type receiver method.
    Internal(String),
    /// Method on another type, rendered `Type::method`.
    External(String),
    /// Free function, or a target without a known receiver type.
    Unresolved,
}

#[derive(Debug, Clone, Default)]
pub struct MethodCalls {
    pub internal: BTreeSet<String>,
    pub external: BTreeSet<String>,
    pub unresolved: usize,
}

pub struct CallGraphBuilder<'a> {
    model: &'a TypeModel,
    methods: BTreeSet<&'a str>,
    config: &'a AnalysisConfig,
}

impl<'a> CallGraphBuilder<'a> {
    #[must_use]
    pub fn new(model: &'a TypeModel, config: &'a AnalysisConfig) -> Self {
        let methods = model.receiver_methods().map(|m| m.name.as_str()).collect();
        Self {
            model,
            methods,
            config,
        }
    }

    #[must_use]
    pub fn classify(&self, target: &CallTarget) -> CallKind {
        let Some(receiver) = target.receiver.as_deref() else {
            return CallKind::Unresolved;
        };
        if !self.model.is_same_type(receiver) {
            return CallKind::External(format!(
                "{}::{}",
                crate::model::erase_generics(receiver.trim_start_matches(['*', '&'])),
                target.method
            ));
        }
        if self.methods.contains(target.method.as_str()) {
            CallKind::Internal(target.method.clone())
        } else {
            CallKind::Unresolved
        }
    }

    #[must_use]
    pub fn build(&self, method: &MethodDecl) -> MethodCalls {
        let mut calls = MethodCalls::default();
        for target in self.targets(method) {
            match self.classify(target) {
                CallKind::Internal(name) if name == method.name => {}
                CallKind::Internal(name) => {
                    calls.internal.insert(name);
                }
                CallKind::External(name) => {
                    calls.external.insert(name);
                }
                CallKind::Unresolved => calls.unresolved += 1,
            }
        }

        if !self.config.filter_external_calls && !calls.external.is_empty() {
            tracing::debug!(
                method = %method.name,
                count = calls.external.len(),
                "Keeping external calls as shared keys"
            );
        }
        calls
    }

    fn targets<'m>(&self, method: &'m MethodDecl) -> Vec<&'m CallTarget> {
        let mut targets = Vec::new();
        for event in &method.body {
            match event {
                BodyEvent::Call { target } => targets.push(target),
                BodyEvent::Wrap { sources } if self.config.unify_wrapped_results => {
                    targets.extend(sources.iter().filter_map(|s| match s {
                        WrappedSource::Call(target) => Some(target),
                        WrappedSource::Field(_) => None,
                    }));
                }
                _ => {}
            }
        }
        targets
    }
}
