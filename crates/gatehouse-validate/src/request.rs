use std::fmt;

use http::request::Parts;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::failures::Failures;

/// Origin of the data a descriptor is populated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Request body decoded as JSON
    Json,
    /// Request body decoded as XML
    Xml,
    /// URL-encoded request body
    Form,
    /// Query-string parameters
    Query,
    /// Route parameters
    Params,
}

impl SourceKind {
    /// Whether population consumes the request body
    pub const fn reads_body(self) -> bool {
        matches!(self, Self::Json | Self::Xml | Self::Form)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Form => "form",
            Self::Query => "query",
            Self::Params => "params",
        };
        f.write_str(name)
    }
}

/// Field setter selected by the bound Rust type
///
/// Boolean coercion accepts `true` and `false` only, the standard
/// [`str::parse`] behavior.
pub(crate) enum Parse<T> {
    Text(fn(&mut T, String)),
    Integer(fn(&mut T, i64)),
    Boolean(fn(&mut T, bool)),
    /// No coercion from a string source exists for the field
    Opaque,
}

impl<T> Clone for Parse<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Parse<T> {}

/// One entry of a descriptor's binding table: how a single field is
/// looked up and coerced when populating from a keyed source, and which
/// wire name it carries in validation error output
pub struct FieldBinding<T> {
    pub(crate) field: &'static str,
    pub(crate) key: Option<&'static str>,
    pub(crate) parse: Parse<T>,
}

impl<T> FieldBinding<T> {
    /// Bind a string field
    pub const fn text(field: &'static str, set: fn(&mut T, String)) -> Self {
        Self {
            field,
            key: None,
            parse: Parse::Text(set),
        }
    }

    /// Bind an integer field, coerced with a base-10 parse
    pub const fn integer(field: &'static str, set: fn(&mut T, i64)) -> Self {
        Self {
            field,
            key: None,
            parse: Parse::Integer(set),
        }
    }

    /// Bind a boolean field
    pub const fn boolean(field: &'static str, set: fn(&mut T, bool)) -> Self {
        Self {
            field,
            key: None,
            parse: Parse::Boolean(set),
        }
    }

    /// Declare a field without a coercion; population from a keyed
    /// source rejects it as unsupported, but its key still renames the
    /// field in validation error output
    pub const fn opaque(field: &'static str) -> Self {
        Self {
            field,
            key: None,
            parse: Parse::Opaque,
        }
    }

    /// Look the field up under a different source key
    #[must_use]
    pub const fn keyed(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }
}

/// A typed request descriptor: where its data comes from, how its fields
/// are bound, and how it validates itself
///
/// Implementors are populated by
/// [`RequestValidator`](crate::RequestValidator) before
/// [`validate`](HttpRequest::validate) runs, so validation only ever sees
/// a fully decoded value. Body-decoded descriptors should carry a
/// container-level `#[serde(default)]` so missing fields decode to their
/// defaults and fail validation instead of failing population.
pub trait HttpRequest:
    DeserializeOwned + Serialize + Default + Clone + Send + Sync + 'static
{
    /// Where this descriptor's data is read from
    const SOURCE: SourceKind;

    /// Binding table for keyed sources (query and route parameters)
    ///
    /// Body-decoded descriptors may leave it empty and rely on serde,
    /// but entries with explicit keys still rename fields in validation
    /// error output.
    const BINDINGS: &'static [FieldBinding<Self>] = &[];

    /// Validate the populated descriptor
    fn validate(&self, parts: &Parts) -> Result<(), Failures>;

    /// Short type name, used in logs and failure scopes
    #[must_use]
    fn descriptor_name() -> &'static str {
        let name = std::any::type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name)
    }

    /// Wire name of a field: its binding key when one is declared, the
    /// field identifier otherwise
    #[must_use]
    fn source_key(field: &str) -> &str {
        Self::BINDINGS
            .iter()
            .find(|binding| binding.field == field)
            .and_then(|binding| binding.key)
            .unwrap_or(field)
    }
}
