// src/analysis/mod.rs
//! Cohesion analysis: symbol model in, per-type LCOM metrics out.
//!
//! Per type the pipeline is resolver and call builder, then [`scope::Scope`],
//! then [`graph::DependencyGraph`], then [`metrics::ScopeMetrics`]. Types are
//! independent; [`Engine`] runs them in parallel.

pub mod calls;
pub mod engine;
pub mod graph;
pub mod metrics;
pub mod resolver;
pub mod scope;
pub mod worker;

pub use engine::{CancellationToken, Engine};
pub use worker::analyze_type;
