//! Request parameters and their preparation for the query string or body.

use std::io;
use std::io::Write;

use percent_encoding::utf8_percent_encode;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::DUO_QUERY_ENCODE_SET;
use crate::{Error, Result};

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A string.
    String(String),
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v.into())
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Scalar::Null, Into::into)
    }
}

impl From<&Scalar> for Value {
    fn from(v: &Scalar) -> Self {
        match v {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Int(i) => Value::from(*i),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }
}

/// The value of a parameter.
///
/// Every shape can be sent in a JSON body. Only strings and lists of
/// strings, booleans and integers can be sent in the query string, see
/// [`normalize_parameters`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A single value.
    Scalar(Scalar),
    /// A sequence of values, sent as a repeated key in the query string.
    List(Vec<Scalar>),
    /// A nested object, only meaningful in a JSON body.
    Map(Map<String, Value>),
}

impl From<Scalar> for ParamValue {
    fn from(v: Scalar) -> Self {
        ParamValue::Scalar(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Scalar(v.into())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Scalar(v.into())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Scalar(v.into())
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Scalar(v.into())
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Scalar(v.into())
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<Map<String, Value>> for ParamValue {
    fn from(v: Map<String, Value>) -> Self {
        ParamValue::Map(v)
    }
}

impl From<&ParamValue> for Value {
    fn from(v: &ParamValue) -> Self {
        match v {
            ParamValue::Scalar(s) => s.into(),
            ParamValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            ParamValue::Map(m) => Value::Object(m.clone()),
        }
    }
}

/// Request parameters.
///
/// Keys are unique: inserting an existing key replaces its value in place.
/// Insertion order only shows up in the final URI; signing sorts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, ParamValue)>,
}

impl Parameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Get the value of `key`.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate over all parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Parameters normalized for the query string: every key maps to a list of
/// UTF-8 strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParameters {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key` with its values.
    pub fn push(&mut self, key: impl Into<String>, values: Vec<String>) -> &mut Self {
        self.entries.push((key.into(), values));
        self
    }

    /// Get the values of `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Iterate over all keys and their values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Check if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode as `application/x-www-form-urlencoded`, repeating keys with
    /// several values.
    ///
    /// Space becomes `+`; `-._~` and alphanumerics are kept; every other
    /// byte is percent encoded.
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .flat_map(|(k, values)| {
                let k = encode_query_component(k);
                values
                    .iter()
                    .map(move |v| format!("{k}={}", encode_query_component(v)))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for QueryParameters {
    fn from_iter<T: IntoIterator<Item = (K, Vec<String>)>>(iter: T) -> Self {
        let mut params = QueryParameters::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

/// Where the parameters of a request travel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParameterPlacement {
    /// URL query string.
    Query,
    /// JSON request body.
    Body,
}

impl ParameterPlacement {
    /// `POST`, `PUT` and `PATCH` carry parameters in the body, every other
    /// method in the query string. Case is ignored.
    pub fn for_method(method: &str) -> Self {
        let method = method.to_ascii_uppercase();
        match http::Method::from_bytes(method.as_bytes()) {
            Ok(m) if m == http::Method::POST || m == http::Method::PUT || m == http::Method::PATCH => {
                ParameterPlacement::Body
            }
            _ => ParameterPlacement::Query,
        }
    }
}

/// Prepare parameters for `placement`.
///
/// Returns the query parameters (empty for [`ParameterPlacement::Body`]) and
/// the body (`None` for [`ParameterPlacement::Query`]).
pub fn prepare_parameters(
    params: Option<&Parameters>,
    placement: ParameterPlacement,
) -> Result<(QueryParameters, Option<String>)> {
    match placement {
        ParameterPlacement::Body => Ok((QueryParameters::new(), Some(jsonize_parameters(params)?))),
        ParameterPlacement::Query => Ok((normalize_parameters(params)?, None)),
    }
}

/// Serialize parameters as a JSON body.
///
/// Keys are sorted, no whitespace is emitted and every character outside
/// printable ASCII is escaped as `\uXXXX`. Absent parameters serialize to
/// `{}`.
pub fn jsonize_parameters(params: Option<&Parameters>) -> Result<String> {
    let object: Map<String, Value> = params
        .into_iter()
        .flat_map(|p| p.iter())
        .map(|(k, v)| (k.to_string(), Value::from(v)))
        .collect();

    let mut ser = serde_json::Serializer::with_formatter(Vec::new(), AsciiFormatter);
    object.serialize(&mut ser)?;

    String::from_utf8(ser.into_inner())
        .map_err(|e| Error::unexpected("serialized body is not valid utf-8").with_source(e))
}

/// Normalize parameters for the query string.
///
/// - a string becomes a one element list
/// - a list has each element stringified: strings as is, booleans as
///   `true`/`false`, integers in decimal
///
/// A bare boolean or integer, a null anywhere and a nested object are
/// rejected with [`ErrorKind::ParameterUnsupported`](crate::ErrorKind::ParameterUnsupported),
/// even though the body path accepts all of them. Absent parameters yield
/// an empty set.
pub fn normalize_parameters(params: Option<&Parameters>) -> Result<QueryParameters> {
    let Some(params) = params else {
        return Ok(QueryParameters::new());
    };

    params
        .iter()
        .map(|(k, v)| {
            let values = match v {
                ParamValue::Scalar(Scalar::String(s)) => vec![s.clone()],
                ParamValue::Scalar(s) => {
                    return Err(Error::parameter_unsupported(format!(
                        "{} value of parameter {k} can't be sent in the query string, wrap it in a list",
                        scalar_type_name(s)
                    )))
                }
                ParamValue::List(items) => items
                    .iter()
                    .map(|item| stringify(k, item))
                    .collect::<Result<Vec<_>>>()?,
                ParamValue::Map(_) => {
                    return Err(Error::parameter_unsupported(format!(
                        "object value of parameter {k} can't be sent in the query string"
                    )))
                }
            };
            Ok((k.to_string(), values))
        })
        .collect()
}

fn encode_query_component(s: &str) -> String {
    utf8_percent_encode(s, &DUO_QUERY_ENCODE_SET)
        .to_string()
        .replace(' ', "+")
}

fn stringify(key: &str, v: &Scalar) -> Result<String> {
    match v {
        Scalar::String(s) => Ok(s.clone()),
        Scalar::Bool(true) => Ok("true".to_string()),
        Scalar::Bool(false) => Ok("false".to_string()),
        Scalar::Int(i) => Ok(i.to_string()),
        Scalar::Null => Err(Error::parameter_unsupported(format!(
            "null value of parameter {key} can't be sent in the query string"
        ))),
    }
}

fn scalar_type_name(v: &Scalar) -> &'static str {
    match v {
        Scalar::Null => "null",
        Scalar::Bool(_) => "boolean",
        Scalar::Int(_) => "integer",
        Scalar::String(_) => "string",
    }
}

/// Compact JSON formatter escaping DEL and every non-ASCII character as lowercase
/// `\uXXXX` UTF-16 units.
struct AsciiFormatter;

impl serde_json::ser::Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (idx, c) in fragment.char_indices() {
            if c.is_ascii() && c != '\x7f' {
                continue;
            }
            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut buf = [0u16; 2];
            for unit in c.encode_utf16(&mut buf) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = idx + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
