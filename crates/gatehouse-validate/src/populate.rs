use std::fmt;

use axum::extract::{FromRequestParts, RawPathParams};
use http::request::Parts;

use crate::request::{HttpRequest, Parse, SourceKind};

/// Why population of a descriptor failed
#[derive(Debug)]
pub enum PopulateError {
    /// Body or parameter data could not be decoded at all
    Decode {
        source: SourceKind,
        detail: String,
    },

    /// A keyed value exists but does not parse as the bound type
    Coerce {
        source: SourceKind,
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    /// The field's type has no coercion from a string source
    Unsupported {
        source: SourceKind,
        field: &'static str,
    },
}

impl fmt::Display for PopulateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { source, detail } => {
                write!(f, "failed to decode {source} request: {detail}")
            }
            Self::Coerce {
                source,
                field,
                expected,
                value,
            } => {
                write!(
                    f,
                    "expected {expected} for {source} field {field}, but found '{value}' instead"
                )
            }
            Self::Unsupported { source, field } => {
                write!(
                    f,
                    "{source} field {field} has no supported coercion; bind it as text, integer or boolean"
                )
            }
        }
    }
}

impl std::error::Error for PopulateError {}

/// Decode request data into a fresh descriptor
///
/// Body sources decode the buffered bytes with their codec. Keyed sources
/// walk the descriptor's binding table and read missing values as empty
/// strings, the way HTML form handling expects.
pub(crate) async fn populate<T: HttpRequest>(
    parts: &mut Parts,
    body: &[u8],
) -> Result<T, PopulateError> {
    match T::SOURCE {
        SourceKind::Json => {
            serde_json::from_slice(body).map_err(|err| decode_error(SourceKind::Json, err))
        }
        SourceKind::Xml => {
            let text = std::str::from_utf8(body).map_err(|err| decode_error(SourceKind::Xml, err))?;
            quick_xml::de::from_str(text).map_err(|err| decode_error(SourceKind::Xml, err))
        }
        SourceKind::Form => {
            serde_urlencoded::from_bytes(body).map_err(|err| decode_error(SourceKind::Form, err))
        }
        SourceKind::Query => {
            let query = parts.uri.query().unwrap_or_default();
            let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect();
            from_bindings(SourceKind::Query, &pairs)
        }
        SourceKind::Params => {
            let params = RawPathParams::from_request_parts(parts, &())
                .await
                .map_err(|err| decode_error(SourceKind::Params, err))?;
            let pairs: Vec<(String, String)> = params
                .iter()
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .collect();
            from_bindings(SourceKind::Params, &pairs)
        }
    }
}

fn decode_error(source: SourceKind, err: impl std::fmt::Display) -> PopulateError {
    PopulateError::Decode {
        source,
        detail: err.to_string(),
    }
}

/// Populate through the binding table from key-value pairs
fn from_bindings<T: HttpRequest>(
    source: SourceKind,
    pairs: &[(String, String)],
) -> Result<T, PopulateError> {
    let mut descriptor = T::default();

    for binding in T::BINDINGS {
        let key = binding.key.unwrap_or(binding.field);
        let value = pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .unwrap_or_default();

        match binding.parse {
            Parse::Text(set) => set(&mut descriptor, value.to_owned()),
            Parse::Integer(set) => {
                let integer = value.parse::<i64>().map_err(|_| PopulateError::Coerce {
                    source,
                    field: binding.field,
                    expected: "integer",
                    value: value.to_owned(),
                })?;
                set(&mut descriptor, integer);
            }
            Parse::Boolean(set) => {
                let boolean = value.parse::<bool>().map_err(|_| PopulateError::Coerce {
                    source,
                    field: binding.field,
                    expected: "boolean",
                    value: value.to_owned(),
                })?;
                set(&mut descriptor, boolean);
            }
            Parse::Opaque => {
                return Err(PopulateError::Unsupported {
                    source,
                    field: binding.field,
                });
            }
        }
    }

    Ok(descriptor)
}
