// src/model/mod.rs
//! The symbol model consumed from the external parser.
//!
//! One [`TypeModel`] per analyzed type: declared field paths, methods with
//! their receiver, and every method body already flattened into a sequence of
//! [`BodyEvent`]s. The engine never sees source text.

pub mod path;

use crate::error::Result;
use serde::{Deserialize, Serialize};

pub use path::{erase_generics, is_receiver_qualified, FieldPath, FieldTree};

/// A batch of types as produced by the parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Batch {
    #[serde(default)]
    pub types: Vec<TypeModel>,
}

impl Batch {
    /// Parses a batch from its JSON form.
    ///
    /// # Errors
    /// Returns error if the JSON does not match the model.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeModel {
    pub name: String,
    /// Generic parameter names. Erased before any identity comparison.
    #[serde(default)]
    pub type_params: Vec<String>,
    /// Dotted field paths from the type root, e.g. `Record1.Field1`.
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl TypeModel {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_params: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type_param(mut self, param: &str) -> Self {
        self.type_params.push(param.to_string());
        self
    }

    #[must_use]
    pub fn with_field(mut self, path: &str) -> Self {
        self.fields.push(path.to_string());
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    /// The type name with generic arguments erased (`Generic[T]` -> `Generic`).
    #[must_use]
    pub fn base_name(&self) -> String {
        erase_generics(&self.name)
    }

    /// Whether a receiver or call-site type name refers to this type.
    #[must_use]
    pub fn is_same_type(&self, other: &str) -> bool {
        erase_generics(other.trim_start_matches(['*', '&'])) == self.base_name()
    }

    /// Methods whose receiver is this type. Only these become graph nodes.
    pub fn receiver_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(move |m| {
            m.receiver
                .as_deref()
                .is_some_and(|r| self.is_same_type(r))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    /// Declared receiver type. `None` for free and static functions.
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub body: Vec<BodyEvent>,
}

impl MethodDecl {
    #[must_use]
    pub fn new(name: &str, receiver: &str) -> Self {
        Self {
            name: name.to_string(),
            receiver: Some(receiver.to_string()),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn free(name: &str) -> Self {
        Self {
            name: name.to_string(),
            receiver: None,
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn event(mut self, event: BodyEvent) -> Self {
        self.body.push(event);
        self
    }
}

/// One "field touched" or "function called" fact from a method body.
/// Paths are member chains relative to the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyEvent {
    Read { path: String },
    Write { path: String },
    /// Whole-value assignment `dest = src`.
    Copy { dest: String, src: String },
    /// Local `view` references a sub-range or element of `of`.
    BindView { view: String, of: String },
    ViewRead { view: String },
    ViewWrite { view: String },
    Call { target: CallTarget },
    /// Several values merged into one returned result.
    Wrap { sources: Vec<WrappedSource> },
    /// A member access the parser could not resolve.
    Opaque { text: String },
}

impl BodyEvent {
    #[must_use]
    pub fn read(path: &str) -> Self {
        Self::Read { path: path.into() }
    }

    #[must_use]
    pub fn write(path: &str) -> Self {
        Self::Write { path: path.into() }
    }

    #[must_use]
    pub fn copy(dest: &str, src: &str) -> Self {
        Self::Copy {
            dest: dest.into(),
            src: src.into(),
        }
    }

    #[must_use]
    pub fn bind_view(view: &str, of: &str) -> Self {
        Self::BindView {
            view: view.into(),
            of: of.into(),
        }
    }

    #[must_use]
    pub fn view_write(view: &str) -> Self {
        Self::ViewWrite { view: view.into() }
    }

    #[must_use]
    pub fn view_read(view: &str) -> Self {
        Self::ViewRead { view: view.into() }
    }

    #[must_use]
    pub fn call(receiver: Option<&str>, method: &str) -> Self {
        Self::Call {
            target: CallTarget::new(receiver, method),
        }
    }

    #[must_use]
    pub fn wrap(sources: Vec<WrappedSource>) -> Self {
        Self::Wrap { sources }
    }

    #[must_use]
    pub fn opaque(text: &str) -> Self {
        Self::Opaque { text: text.into() }
    }
}

/// Statically resolved call site. `receiver` is `None` for free functions and
/// for targets the parser could not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallTarget {
    #[serde(default)]
    pub receiver: Option<String>,
    pub method: String,
}

impl CallTarget {
    #[must_use]
    pub fn new(receiver: Option<&str>, method: &str) -> Self {
        Self {
            receiver: receiver.map(str::to_string),
            method: method.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrappedSource {
    Field(String),
    Call(CallTarget),
}
