// src/analysis/resolver.rs
//! Field-access resolution for a single method body.

use crate::config::{AnalysisConfig, FieldGranularity};
use crate::model::{
    is_receiver_qualified, BodyEvent, FieldPath, FieldTree, MethodDecl, TypeModel, WrappedSource,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A local value that is a view over a receiver field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AliasRelation {
    pub view: String,
    pub target: FieldPath,
}

/// Fields a method touches, plus the views it bound along the way.
#[derive(Debug, Clone, Default)]
pub struct MethodAccess {
    pub accessed_fields: BTreeSet<FieldPath>,
    pub aliases: Vec<AliasRelation>,
}

pub struct FieldAccessResolver<'a> {
    model: &'a TypeModel,
    tree: &'a FieldTree,
    config: &'a AnalysisConfig,
}

/// Per-body working state. Views are collected up front so the result does
/// not depend on where a binding appears relative to its uses.
struct BodyState<'m> {
    method: &'m str,
    views: BTreeMap<String, BTreeSet<FieldPath>>,
    accessed: BTreeSet<FieldPath>,
    opaque: usize,
}

impl<'a> FieldAccessResolver<'a> {
    #[must_use]
    pub fn new(model: &'a TypeModel, tree: &'a FieldTree, config: &'a AnalysisConfig) -> Self {
        Self {
            model,
            tree,
            config,
        }
    }

    #[must_use]
    pub fn resolve(&self, method: &MethodDecl) -> MethodAccess {
        let mut state = BodyState {
            method: &method.name,
            views: self.bind_views(&method.body),
            accessed: BTreeSet::new(),
            opaque: 0,
        };

        for event in &method.body {
            self.apply(event, &mut state);
        }

        let aliases = state
            .views
            .iter()
            .flat_map(|(view, targets)| {
                targets.iter().map(move |target| AliasRelation {
                    view: view.clone(),
                    target: target.clone(),
                })
            })
            .collect();

        MethodAccess {
            accessed_fields: state.accessed,
            aliases,
        }
    }

    fn apply(&self, event: &BodyEvent, state: &mut BodyState) {
        match event {
            BodyEvent::Read { path } | BodyEvent::Write { path } => self.access(path, state),
            BodyEvent::Copy { dest, src } => {
                self.access(dest, state);
                self.access(src, state);
            }
            BodyEvent::ViewRead { view } | BodyEvent::ViewWrite { view } => {
                self.through_view(view, None, state);
            }
            BodyEvent::Wrap { sources } if self.config.unify_wrapped_results => {
                for source in sources {
                    if let WrappedSource::Field(path) = source {
                        self.access(path, state);
                    }
                }
            }
            BodyEvent::Opaque { text } => {
                tracing::debug!(method = state.method, text = %text, "Opaque member access");
                let path = synthetic(state);
                state.accessed.insert(path);
            }
            BodyEvent::BindView { .. } | BodyEvent::Call { .. } | BodyEvent::Wrap { .. } => {}
        }
    }

    /// A member chain off the receiver, or off a bound view. An explicit
    /// receiver prefix always means the field, even if a view shadows it.
    fn access(&self, raw: &str, state: &mut BodyState) {
        let Some(path) = FieldPath::canonicalize(raw) else {
            let path = synthetic(state);
            state.accessed.insert(path);
            return;
        };
        let root = path.root();
        if !is_receiver_qualified(raw) && state.views.contains_key(root.as_str()) {
            let rest = rest_after_root(&path);
            self.through_view(root.as_str(), rest.as_deref(), state);
            return;
        }
        self.touch(&path, state);
    }

    fn through_view(&self, view: &str, rest: Option<&str>, state: &mut BodyState) {
        if !self.config.alias_tracking {
            tracing::debug!(method = state.method, view, "Ignoring access through view");
            return;
        }
        let Some(targets) = state.views.get(view).cloned() else {
            return;
        };
        for target in targets {
            let path = match rest {
                Some(rest) => extend(&target, rest),
                None => target,
            };
            self.touch(&path, state);
        }
    }

    /// Records a receiver path under the configured granularity.
    fn touch(&self, path: &FieldPath, state: &mut BodyState) {
        let Some((declared, exact)) = self.declared_prefix(path) else {
            let path = synthetic(state);
            state.accessed.insert(path);
            return;
        };
        match self.config.field_granularity {
            FieldGranularity::Root => {
                state.accessed.insert(declared.root());
            }
            FieldGranularity::Leaf if self.tree.is_leaf(&declared) => {
                state.accessed.insert(declared);
            }
            // The composite as a whole: itself and every leaf below it.
            FieldGranularity::Leaf if exact => {
                state.accessed.extend(self.tree.leaves_under(&declared));
                state.accessed.insert(declared);
            }
            // An undeclared member of a composite only relates to accesses of
            // the whole composite, never to its declared siblings.
            FieldGranularity::Leaf => {
                state.accessed.insert(declared);
            }
        }
    }

    /// Deepest declared prefix, allowing one leading type qualifier
    /// (`Complex.re` for `Complex<Number>::re`). The flag is set when the
    /// whole path is declared.
    fn declared_prefix(&self, path: &FieldPath) -> Option<(FieldPath, bool)> {
        let lookup = |p: &FieldPath| {
            self.tree.deepest_declared(p).map(|found| {
                let exact = found == *p;
                (found, exact)
            })
        };
        if let Some(hit) = lookup(path) {
            return Some(hit);
        }
        if !self.model.is_same_type(path.root().as_str()) {
            return None;
        }
        let rest = rest_after_root(path)?;
        lookup(&FieldPath::canonicalize(&rest)?)
    }

    fn bind_views(&self, body: &[BodyEvent]) -> BTreeMap<String, BTreeSet<FieldPath>> {
        let mut bindings: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for event in body {
            if let BodyEvent::BindView { view, of } = event {
                bindings.entry(view.as_str()).or_default().push(of.as_str());
            }
        }

        bindings
            .keys()
            .copied()
            .map(|view| {
                let mut visiting = BTreeSet::new();
                let targets = self.view_targets(view, &bindings, &mut visiting);
                (view.to_string(), targets)
            })
            .collect()
    }

    fn view_targets<'b>(
        &self,
        view: &'b str,
        bindings: &BTreeMap<&'b str, Vec<&'b str>>,
        visiting: &mut BTreeSet<&'b str>,
    ) -> BTreeSet<FieldPath> {
        let mut targets = BTreeSet::new();
        if !visiting.insert(view) {
            return targets;
        }
        for of in bindings.get(view).into_iter().flatten() {
            let Some(path) = FieldPath::canonicalize(of) else {
                continue;
            };
            let root = path.root();
            // `buf := self.buf[0:2]` views the field, not itself.
            let over_local = !is_receiver_qualified(of) && root.as_str() != view;
            if let Some((inner, _)) = bindings
                .get_key_value(root.as_str())
                .filter(|_| over_local)
            {
                let rest = rest_after_root(&path);
                for target in self.view_targets(*inner, bindings, visiting) {
                    targets.insert(match &rest {
                        Some(rest) => extend(&target, rest),
                        None => target,
                    });
                }
            } else if self.declared_prefix(&path).is_some() {
                targets.insert(path);
            }
        }
        visiting.remove(view);
        targets
    }
}

fn synthetic(state: &mut BodyState) -> FieldPath {
    let path = FieldPath::synthetic(&format!("opaque:{}#{}", state.method, state.opaque));
    state.opaque += 1;
    path
}

fn rest_after_root(path: &FieldPath) -> Option<String> {
    path.as_str().split_once('.').map(|(_, rest)| rest.to_string())
}

fn extend(base: &FieldPath, rest: &str) -> FieldPath {
    FieldPath::canonicalize(&format!("{base}.{rest}")).unwrap_or_else(|| base.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_with(
        model: &TypeModel,
        method: &MethodDecl,
        config: &AnalysisConfig,
    ) -> Vec<String> {
        let tree = FieldTree::build(&model.fields).unwrap();
        let resolver = FieldAccessResolver::new(model, &tree, config);
        resolver
            .resolve(method)
            .accessed_fields
            .into_iter()
            .map(|p| p.to_string())
            .collect()
    }

    fn nested() -> TypeModel {
        TypeModel::new("Nested")
            .with_field("Record1")
            .with_field("Record1.Field1")
            .with_field("Record1.Field2")
            .with_field("Record2")
            .with_field("Record2.Field1")
            .with_field("Record2.Field2")
    }

    fn leaf() -> AnalysisConfig {
        AnalysisConfig {
            field_granularity: FieldGranularity::Leaf,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_root_granularity_collapses_to_top_level() {
        let m = MethodDecl::new("SetField1", "Nested").event(BodyEvent::write("Record1.Field1"));
        assert_eq!(resolve_with(&nested(), &m, &AnalysisConfig::default()), vec!["Record1"]);
    }

    #[test]
    fn test_leaf_granularity_keeps_deepest_path() {
        let m =
            MethodDecl::new("SetField1", "Nested").event(BodyEvent::write("n.Record1.Field1"));
        // `n` is not a receiver marker, so the chain is unknown.
        assert!(resolve_with(&nested(), &m, &leaf())[0].starts_with('<'));

        let m =
            MethodDecl::new("SetField1", "Nested").event(BodyEvent::write("self.Record1.Field1"));
        assert_eq!(resolve_with(&nested(), &m, &leaf()), vec!["Record1.Field1"]);
    }

    #[test]
    fn test_whole_record_copy_touches_both_subtrees() {
        let m =
            MethodDecl::new("SetRecords", "Nested").event(BodyEvent::copy("Record1", "Record2"));
        assert_eq!(
            resolve_with(&nested(), &m, &leaf()),
            vec![
                "Record1",
                "Record1.Field1",
                "Record1.Field2",
                "Record2",
                "Record2.Field1",
                "Record2.Field2"
            ]
        );
    }

    #[test]
    fn test_undeclared_member_of_composite_stays_off_siblings() {
        let model = TypeModel::new("Outer")
            .with_field("B")
            .with_field("B.x")
            .with_field("B.y");
        let z = MethodDecl::new("GetZ", "Outer").event(BodyEvent::read("self.B.z"));
        assert_eq!(resolve_with(&model, &z, &leaf()), vec!["B"]);

        let x = MethodDecl::new("GetX", "Outer").event(BodyEvent::read("self.B.x.bits"));
        assert_eq!(resolve_with(&model, &x, &leaf()), vec!["B.x"]);
    }

    #[test]
    fn test_view_named_after_its_field() {
        let model = TypeModel::new("Buffer").with_field("buf");
        let m = MethodDecl::new("viaView", "Buffer")
            .event(BodyEvent::bind_view("buf", "self.buf[0:2]"))
            .event(BodyEvent::view_write("buf"));
        assert_eq!(resolve_with(&model, &m, &AnalysisConfig::default()), vec!["buf"]);

        let off = AnalysisConfig {
            alias_tracking: false,
            ..AnalysisConfig::default()
        };
        assert!(resolve_with(&model, &m, &off).is_empty());
    }

    #[test]
    fn test_receiver_prefix_bypasses_shadowing_view() {
        let model = TypeModel::new("Buffer").with_field("buf");
        let m = MethodDecl::new("reset", "Buffer")
            .event(BodyEvent::bind_view("buf", "self.buf[0:2]"))
            .event(BodyEvent::write("self.buf[3]"));
        let off = AnalysisConfig {
            alias_tracking: false,
            ..AnalysisConfig::default()
        };
        assert_eq!(resolve_with(&model, &m, &off), vec!["buf"]);
    }

    #[test]
    fn test_view_write_respects_alias_policy() {
        let model = TypeModel::new("Array").with_field("i");
        let m = MethodDecl::new("aliasMethod", "Array")
            .event(BodyEvent::bind_view("j", "i[0:4]"))
            .event(BodyEvent::write("j[0]"));

        assert_eq!(resolve_with(&model, &m, &AnalysisConfig::default()), vec!["i"]);

        let off = AnalysisConfig {
            alias_tracking: false,
            ..AnalysisConfig::default()
        };
        assert!(resolve_with(&model, &m, &off).is_empty());
    }

    #[test]
    fn test_view_use_before_bind_still_resolves() {
        let model = TypeModel::new("Array").with_field("i");
        let m = MethodDecl::new("aliasMethod", "Array")
            .event(BodyEvent::view_write("j"))
            .event(BodyEvent::bind_view("j", "i"));
        assert_eq!(resolve_with(&model, &m, &AnalysisConfig::default()), vec!["i"]);
    }

    #[test]
    fn test_view_chains_and_cycles() {
        let model = TypeModel::new("Array").with_field("i");
        let m = MethodDecl::new("m", "Array")
            .event(BodyEvent::bind_view("a", "i[1:]"))
            .event(BodyEvent::bind_view("b", "a[2:]"))
            .event(BodyEvent::bind_view("c", "d"))
            .event(BodyEvent::bind_view("d", "c"))
            .event(BodyEvent::view_write("b"))
            .event(BodyEvent::view_write("c"));
        assert_eq!(resolve_with(&model, &m, &AnalysisConfig::default()), vec!["i"]);
    }

    #[test]
    fn test_binding_alone_is_not_an_access() {
        let model = TypeModel::new("Array").with_field("i");
        let m = MethodDecl::new("m", "Array").event(BodyEvent::bind_view("j", "i"));
        assert!(resolve_with(&model, &m, &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn test_unknown_access_is_unique_synthetic() {
        let model = TypeModel::new("T").with_field("i");
        let m = MethodDecl::new("m", "T")
            .event(BodyEvent::read("ghost"))
            .event(BodyEvent::opaque("*(p + 4)"));
        let fields = resolve_with(&model, &m, &AnalysisConfig::default());
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().all(|f| f.starts_with("<opaque:m#")));
    }

    #[test]
    fn test_type_qualified_member() {
        let model = TypeModel::new("Complex<Number>").with_field("re");
        let m = MethodDecl::new("clear_real", "Complex<Number>")
            .event(BodyEvent::write("this->Complex<Number>::re"));
        assert_eq!(resolve_with(&model, &m, &AnalysisConfig::default()), vec!["re"]);
    }

    #[test]
    fn test_wrapped_fields_follow_unify_switch() {
        let model = TypeModel::new("Raising").with_field("DiskFailure");
        let m = MethodDecl::new("AllError", "Raising")
            .event(BodyEvent::wrap(vec![WrappedSource::Field("DiskFailure".into())]));
        assert_eq!(resolve_with(&model, &m, &AnalysisConfig::default()), vec!["DiskFailure"]);

        let off = AnalysisConfig {
            unify_wrapped_results: false,
            ..AnalysisConfig::default()
        };
        assert!(resolve_with(&model, &m, &off).is_empty());
    }
}
