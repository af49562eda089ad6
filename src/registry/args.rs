//! Call arguments forwarded to versioned implementations.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while an implementation reads its arguments.
#[derive(Debug, Error, PartialEq)]
pub enum ArgError {
    #[error("missing required argument: '{0}'")]
    Missing(String),

    #[error("argument '{name}' must be {expected}, got {actual}")]
    WrongType {
        name: String,
        expected: &'static str,
        actual: String,
    },
}

/// Positional and keyword arguments of one call.
///
/// Accessors take the parameter's position and name: a positional value at
/// that index wins, otherwise the keyword of that name is used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub keyword: Map<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keyword: Map::new(),
        }
    }

    pub fn keywords(keyword: Map<String, Value>) -> Self {
        Self {
            positional: Vec::new(),
            keyword,
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    /// Total number of supplied arguments.
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, pos: usize, name: &str) -> Option<&Value> {
        self.positional.get(pos).or_else(|| self.keyword.get(name))
    }

    pub fn value(&self, pos: usize, name: &str) -> Result<&Value, ArgError> {
        self.get(pos, name)
            .ok_or_else(|| ArgError::Missing(name.to_string()))
    }

    pub fn str(&self, pos: usize, name: &str) -> Result<&str, ArgError> {
        let value = self.value(pos, name)?;
        value.as_str().ok_or_else(|| wrong_type(name, "a string", value))
    }

    pub fn i64(&self, pos: usize, name: &str) -> Result<i64, ArgError> {
        let value = self.value(pos, name)?;
        value.as_i64().ok_or_else(|| wrong_type(name, "an integer", value))
    }

    pub fn f64(&self, pos: usize, name: &str) -> Result<f64, ArgError> {
        let value = self.value(pos, name)?;
        value.as_f64().ok_or_else(|| wrong_type(name, "a number", value))
    }

    pub fn bool(&self, pos: usize, name: &str) -> Result<bool, ArgError> {
        let value = self.value(pos, name)?;
        value.as_bool().ok_or_else(|| wrong_type(name, "a bool", value))
    }

    pub fn list(&self, pos: usize, name: &str) -> Result<&[Value], ArgError> {
        let value = self.value(pos, name)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| wrong_type(name, "a list", value))
    }
}

fn wrong_type(name: &str, expected: &'static str, actual: &Value) -> ArgError {
    ArgError::WrongType {
        name: name.to_string(),
        expected,
        actual: actual.to_string(),
    }
}
