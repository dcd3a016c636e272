// src/analysis/scope.rs
use super::calls::CallGraphBuilder;
use super::resolver::{AliasRelation, FieldAccessResolver};
use crate::config::AnalysisConfig;
use crate::error::ModelError;
use crate::model::{FieldPath, FieldTree, TypeModel};
use std::collections::{BTreeMap, BTreeSet};

/// A type resolved for cohesion analysis: declared fields plus every
/// receiver method with its access and call sets computed once.
#[derive(Debug, Clone)]
pub struct Scope {
    name: String,
    type_params: Vec<String>,
    fields: FieldTree,
    methods: BTreeMap<String, Method>,
}

/// Represents a method within a scope.
#[derive(Debug, Clone, Default)]
pub struct Method {
    pub name: String,
    /// Canonical field paths read or written by this method
    pub field_access: BTreeSet<FieldPath>,
    /// Other methods in the same scope called by this method (Cohesion)
    pub internal_calls: BTreeSet<String>,
    /// Calls into other types, `Type::method`
    pub external_calls: BTreeSet<String>,
    /// Free or unresolvable calls
    pub unresolved_calls: usize,
    pub aliases: Vec<AliasRelation>,
}

impl Method {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.field_access.is_empty() && self.internal_calls.is_empty()
    }
}

impl Scope {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_params: Vec::new(),
            fields: FieldTree::default(),
            methods: BTreeMap::new(),
        }
    }

    /// Resolves every receiver method of `model`.
    ///
    /// # Errors
    /// Returns `ModelError` if the field declarations are inconsistent or a
    /// method name is declared twice.
    pub fn from_model(model: &TypeModel, config: &AnalysisConfig) -> Result<Self, ModelError> {
        let fields = FieldTree::build(&model.fields)?;
        let resolver = FieldAccessResolver::new(model, &fields, config);
        let builder = CallGraphBuilder::new(model, config);

        let mut methods = BTreeMap::new();
        for decl in model.receiver_methods() {
            let access = resolver.resolve(decl);
            let calls = builder.build(decl);

            let mut method = Method {
                name: decl.name.clone(),
                field_access: access.accessed_fields,
                internal_calls: calls.internal,
                external_calls: calls.external,
                unresolved_calls: calls.unresolved,
                aliases: access.aliases,
            };
            if !config.filter_external_calls {
                let shared = method
                    .external_calls
                    .iter()
                    .map(|call| FieldPath::synthetic(&format!("external:{call}")));
                method.field_access.extend(shared);
            }

            if methods.insert(decl.name.clone(), method).is_some() {
                return Err(ModelError::DuplicateMethod(decl.name.clone()));
            }
        }

        Ok(Self {
            name: model.name.clone(),
            type_params: model.type_params.clone(),
            fields,
            methods,
        })
    }

    pub fn insert_method(&mut self, method: Method) {
        self.methods.insert(method.name.clone(), method);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn type_params(&self) -> &[String] {
        &self.type_params
    }

    #[must_use]
    pub fn fields(&self) -> &FieldTree {
        &self.fields
    }

    #[must_use]
    pub fn methods(&self) -> &BTreeMap<String, Method> {
        &self.methods
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BodyEvent, MethodDecl};

    fn filter_calls() -> TypeModel {
        TypeModel::new("FilterMethodCalls")
            .with_field("i")
            .with_field("j")
            .with_method(
                MethodDecl::new("A", "*FilterMethodCalls")
                    .event(BodyEvent::call(Some("ExternalClass"), "External"))
                    .event(BodyEvent::write("i")),
            )
            .with_method(
                MethodDecl::new("B", "*FilterMethodCalls")
                    .event(BodyEvent::call(Some("ExternalClass"), "External"))
                    .event(BodyEvent::write("j")),
            )
    }

    #[test]
    fn test_external_calls_are_kept_out_of_access_sets() {
        let scope = Scope::from_model(&filter_calls(), &AnalysisConfig::default()).unwrap();
        let a = &scope.methods()["A"];
        assert_eq!(a.field_access.len(), 1);
        assert!(a.internal_calls.is_empty());
        assert!(a.external_calls.contains("ExternalClass::External"));
    }

    #[test]
    fn test_unfiltered_external_calls_become_shared_keys() {
        let config = AnalysisConfig {
            filter_external_calls: false,
            ..AnalysisConfig::default()
        };
        let scope = Scope::from_model(&filter_calls(), &config).unwrap();
        let a = &scope.methods()["A"].field_access;
        let b = &scope.methods()["B"].field_access;
        assert!(!a.is_disjoint(b));
    }

    #[test]
    fn test_duplicate_methods_are_rejected() {
        let model = TypeModel::new("T")
            .with_method(MethodDecl::new("m", "T"))
            .with_method(MethodDecl::new("m", "T"));
        assert_eq!(
            Scope::from_model(&model, &AnalysisConfig::default()).unwrap_err(),
            ModelError::DuplicateMethod("m".into())
        );
    }

    #[test]
    fn test_free_functions_are_not_nodes() {
        let model = TypeModel::new("T")
            .with_method(MethodDecl::free("helper"))
            .with_method(MethodDecl::new("m", "T"));
        let scope = Scope::from_model(&model, &AnalysisConfig::default()).unwrap();
        assert_eq!(scope.methods().len(), 1);
        assert!(scope.methods()["m"].is_isolated());
    }
}
