// src/analysis/graph.rs
//! Method dependency graph and its connected components.

use super::scope::Scope;
use crate::model::FieldPath;
use crate::types::{EdgeReason, MethodEdge};
use std::collections::{BTreeMap, HashMap};

/// Undirected graph over the methods of one scope, nodes in name order.
/// Each method pair keeps the first reason found.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: Vec<String>,
    edges: BTreeMap<(usize, usize), EdgeReason>,
}

impl DependencyGraph {
    /// Builds the graph. With `include_calls` false only shared-field edges
    /// are added.
    #[must_use]
    pub fn build(scope: &Scope, include_calls: bool) -> Self {
        let nodes: Vec<String> = scope.methods().keys().cloned().collect();
        let index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut graph = Self {
            nodes: nodes.clone(),
            edges: BTreeMap::new(),
        };
        graph.add_field_edges(scope);
        if include_calls {
            graph.add_call_edges(scope, &index);
        }
        graph
    }

    fn add_field_edges(&mut self, scope: &Scope) {
        let mut by_field: BTreeMap<&FieldPath, Vec<usize>> = BTreeMap::new();
        for (idx, method) in scope.methods().values().enumerate() {
            for field in &method.field_access {
                by_field.entry(field).or_default().push(idx);
            }
        }
        for (field, users) in by_field {
            for (i, &a) in users.iter().enumerate() {
                for &b in &users[i + 1..] {
                    self.connect(a, b, EdgeReason::SharedField(field.clone()));
                }
            }
        }
    }

    fn add_call_edges(&mut self, scope: &Scope, index: &HashMap<&str, usize>) {
        for (caller, method) in scope.methods().values().enumerate() {
            for callee in &method.internal_calls {
                // Calls to methods outside the scope are ignored.
                if let Some(&target) = index.get(callee.as_str()) {
                    self.connect(caller, target, EdgeReason::Call);
                }
            }
        }
    }

    fn connect(&mut self, a: usize, b: usize, reason: EdgeReason) {
        if a == b {
            return;
        }
        let key = (a.min(b), a.max(b));
        self.edges.entry(key).or_insert(reason);
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges as `(method, method, reason)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeReason)> {
        self.edges
            .iter()
            .map(|(&(a, b), reason)| (self.nodes[a].as_str(), self.nodes[b].as_str(), reason))
    }

    /// Owned edge records for the report.
    #[must_use]
    pub fn method_edges(&self) -> Vec<MethodEdge> {
        self.edges()
            .map(|(from, to, reason)| MethodEdge {
                from: from.to_string(),
                to: to.to_string(),
                reason: reason.clone(),
            })
            .collect()
    }

    /// Maximal connected method groups. Members are sorted, and groups are
    /// ordered by their first member.
    #[must_use]
    pub fn components(&self) -> Vec<Vec<String>> {
        let mut uf = UnionFind::new(self.nodes.len());
        for (&(a, b), reason) in &self.edges {
            uf.union(a, b);
            tracing::trace!(a = %self.nodes[a], b = %self.nodes[b], ?reason, "Unioning");
        }

        let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for (idx, name) in self.nodes.iter().enumerate() {
            groups.entry(uf.find(idx)).or_default().push(name.clone());
        }
        let mut groups: Vec<Vec<String>> = groups.into_values().collect();
        groups.sort();
        groups
    }
}

/// Disjoint-set forest with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cursor = x;
        while self.parent[cursor] != root {
            let next = self.parent[cursor];
            self.parent[cursor] = root;
            cursor = next;
        }
        root
    }

    pub fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return;
        }
        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Less => self.parent[root_x] = root_y,
            std::cmp::Ordering::Greater => self.parent[root_y] = root_x,
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scope::Method;
    use std::collections::BTreeSet;

    fn method(name: &str, fields: &[&str], calls: &[&str]) -> Method {
        Method {
            field_access: fields
                .iter()
                .map(|f| FieldPath::canonicalize(f).unwrap())
                .collect(),
            internal_calls: calls.iter().map(|c| (*c).to_string()).collect::<BTreeSet<_>>(),
            ..Method::new(name)
        }
    }

    #[test]
    fn test_union_find_merges_sets() {
        let mut uf = UnionFind::new(5);
        uf.union(0, 1);
        uf.union(3, 4);
        uf.union(1, 0);
        let roots: BTreeSet<usize> = (0..5).map(|i| uf.find(i)).collect();
        assert_eq!(roots.len(), 3);
        assert_eq!(uf.find(0), uf.find(1));
        assert_ne!(uf.find(0), uf.find(3));
    }

    #[test]
    fn test_components_with_and_without_calls() {
        let mut scope = Scope::new("Methods");
        scope.insert_method(method("methodOne", &[], &[]));
        scope.insert_method(method("methodTwo", &[], &["methodOne"]));
        scope.insert_method(method("methodThree", &[], &[]));

        let full = DependencyGraph::build(&scope, true);
        assert_eq!(full.node_count(), 3);
        assert_eq!(
            full.components(),
            vec![
                vec!["methodOne".to_string(), "methodTwo".to_string()],
                vec!["methodThree".to_string()],
            ]
        );
        assert_eq!(DependencyGraph::build(&scope, false).components().len(), 3);
    }

    #[test]
    fn test_edges_record_first_reason() {
        let mut scope = Scope::new("T");
        scope.insert_method(method("a", &["x"], &["b"]));
        scope.insert_method(method("b", &["x"], &[]));
        let graph = DependencyGraph::build(&scope, true);
        assert_eq!(graph.edge_count(), 1);
        let edges = graph.method_edges();
        assert_eq!((edges[0].from.as_str(), edges[0].to.as_str()), ("a", "b"));
        assert_eq!(
            edges[0].reason,
            EdgeReason::SharedField(FieldPath::canonicalize("x").unwrap())
        );
    }

    #[test]
    fn test_calls_to_unknown_methods_are_ignored() {
        let mut scope = Scope::new("T");
        scope.insert_method(method("a", &[], &["ghost"]));
        let graph = DependencyGraph::build(&scope, true);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.components(), vec![vec!["a".to_string()]]);
    }
}
