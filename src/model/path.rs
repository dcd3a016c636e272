// src/model/path.rs
//! Canonical field paths and the per-type field tree.
//!
//! A [`FieldPath`] is a dotted key rooted at the receiver (`Record1.Field1`).
//! Index expressions and generic annotations never take part in identity:
//! `i[1]`, `i[0:4]` and `i` all name the same storage, and `items<T>` is
//! `items` for every instantiation of `T`.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const RECEIVER_MARKERS: &[&str] = &["self", "this"];
const SYNTHETIC_PREFIX: char = '<';

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// Canonicalizes a raw member chain. Returns `None` when the chain has an
    /// empty segment after erasure (e.g. `""`, `"a..b"`, `"[0]"`).
    #[must_use]
    pub fn canonicalize(raw: &str) -> Option<Self> {
        let segments = split_segments(raw)?;
        let start = usize::from(
            segments.len() > 1 && RECEIVER_MARKERS.contains(&segments[0].as_str()),
        );
        Some(Self(segments[start..].join(".")))
    }

    /// A key that can never collide with a declared field.
    #[must_use]
    pub fn synthetic(label: &str) -> Self {
        Self(format!("{SYNTHETIC_PREFIX}{label}>"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.0.starts_with(SYNTHETIC_PREFIX)
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Top-level field this path lives under.
    #[must_use]
    pub fn root(&self) -> FieldPath {
        if self.is_synthetic() {
            return self.clone();
        }
        match self.0.split_once('.') {
            Some((head, _)) => Self(head.to_string()),
            None => self.clone(),
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<FieldPath> {
        if self.is_synthetic() {
            return None;
        }
        self.0.rsplit_once('.').map(|(head, _)| Self(head.to_string()))
    }

    /// True when `self` is `other` or one of its ancestors.
    #[must_use]
    pub fn covers(&self, other: &FieldPath) -> bool {
        other.0 == self.0
            || (other.0.len() > self.0.len()
                && other.0.starts_with(&self.0)
                && other.0.as_bytes()[self.0.len()] == b'.')
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a raw chain starts at an explicit receiver (`self.x`, `this->x`).
/// Such a chain can never name a local view.
#[must_use]
pub fn is_receiver_qualified(raw: &str) -> bool {
    split_segments(raw)
        .is_some_and(|s| s.len() > 1 && RECEIVER_MARKERS.contains(&s[0].as_str()))
}

/// Strips every bracketed group (`[...]`, `<...>`, `(...)`) from a name.
/// `Generic[T]` and `Complex<Number>` both erase to their base name.
#[must_use]
pub fn erase_generics(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '[' | '<' | '(' => depth += 1,
            ']' | '>' | ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Splits a member chain on top-level dots, erasing bracketed groups from
/// each segment. `->` and `::` are treated as member separators.
fn split_segments(raw: &str) -> Option<Vec<String>> {
    let normalized = raw.trim().replace("->", ".").replace("::", ".");
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in normalized.chars() {
        match c {
            '[' | '<' | '(' => {
                depth += 1;
                current.push(c);
            }
            ']' | '>' | ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            '.' if depth == 0 => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);

    segments
        .into_iter()
        .map(|s| {
            let erased = erase_generics(&s);
            (!erased.is_empty()).then_some(erased)
        })
        .collect()
}

/// Declared fields of one type, keyed by canonical path.
#[derive(Debug, Clone, Default)]
pub struct FieldTree {
    children: BTreeMap<FieldPath, Vec<FieldPath>>,
}

impl FieldTree {
    /// Builds the tree from declared dotted paths. Declaration order is
    /// irrelevant, but every nested path needs its parent declared.
    ///
    /// # Errors
    /// Returns `ModelError` on empty segments, duplicates, or orphans.
    pub fn build<S: AsRef<str>>(declared: &[S]) -> Result<Self, ModelError> {
        let mut children: BTreeMap<FieldPath, Vec<FieldPath>> = BTreeMap::new();
        for raw in declared {
            let raw = raw.as_ref();
            let path = FieldPath::canonicalize(raw)
                .ok_or_else(|| ModelError::EmptySegment(raw.to_string()))?;
            if children.insert(path.clone(), Vec::new()).is_some() {
                return Err(ModelError::DuplicateField(path.0));
            }
        }

        let paths: Vec<FieldPath> = children.keys().cloned().collect();
        for path in paths {
            let Some(parent) = path.parent() else {
                continue;
            };
            let Some(siblings) = children.get_mut(&parent) else {
                return Err(ModelError::OrphanField {
                    path: path.0,
                    parent: parent.0,
                });
            };
            siblings.push(path);
        }
        Ok(Self { children })
    }

    #[must_use]
    pub fn contains(&self, path: &FieldPath) -> bool {
        self.children.contains_key(path)
    }

    /// Declared and without declared children.
    #[must_use]
    pub fn is_leaf(&self, path: &FieldPath) -> bool {
        self.children.get(path).is_some_and(Vec::is_empty)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Longest declared prefix of `path`, or `None` if its root is unknown.
    #[must_use]
    pub fn deepest_declared(&self, path: &FieldPath) -> Option<FieldPath> {
        let mut cursor = Some(path.clone());
        while let Some(candidate) = cursor {
            if self.contains(&candidate) {
                return Some(candidate);
            }
            cursor = candidate.parent();
        }
        None
    }

    /// Every leaf at or below `path`, in key order.
    #[must_use]
    pub fn leaves_under(&self, path: &FieldPath) -> Vec<FieldPath> {
        self.children
            .iter()
            .filter(|(candidate, kids)| kids.is_empty() && path.covers(candidate))
            .map(|(candidate, _)| candidate.clone())
            .collect()
    }
}
