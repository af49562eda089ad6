//! Parameter type annotations and their translation into flag shapes.

use std::fmt;

use serde_json::Value;

use crate::error::VcError;

/// Scalar value types a flag can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Str,
    Int,
    Float,
    Bool,
    /// Filesystem path, passed through as a string.
    Path,
}

impl ScalarType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Path => "path",
        }
    }

    /// Convert one command line token into a value of this type.
    pub fn parse_value(self, raw: &str) -> Result<Value, String> {
        match self {
            Self::Str | Self::Path => Ok(Value::String(raw.to_string())),
            Self::Int => raw
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| format!("invalid int value: '{raw}'")),
            Self::Float => raw
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("invalid float value: '{raw}'")),
            Self::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Value::Bool(true)),
                "false" | "0" | "no" => Ok(Value::Bool(false)),
                _ => Err(format!("invalid bool value: '{raw}'")),
            },
        }
    }
}

/// Declared annotation of a parameter.
///
/// `Generic` models parameterised shapes such as `list[int]` or
/// `dict[str, int]`; only a `list` over a scalar is accepted on the command
/// line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Scalar(ScalarType),
    Generic { origin: String, args: Vec<Annotation> },
}

impl Annotation {
    pub fn list(element: ScalarType) -> Self {
        Self::Generic {
            origin: "list".to_string(),
            args: vec![Self::Scalar(element)],
        }
    }

    pub fn generic(origin: impl Into<String>, args: Vec<Annotation>) -> Self {
        Self::Generic {
            origin: origin.into(),
            args,
        }
    }
}

impl From<ScalarType> for Annotation {
    fn from(value: ScalarType) -> Self {
        Self::Scalar(value)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(t) => f.write_str(t.name()),
            Self::Generic { origin, args } => {
                write!(f, "{origin}[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// How a flag consumes command line values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagShape {
    pub value_type: ScalarType,
    /// Zero or more values instead of exactly one.
    pub multiple: bool,
}

impl FlagShape {
    pub fn single(value_type: ScalarType) -> Self {
        Self {
            value_type,
            multiple: false,
        }
    }
}

/// Work out a flag shape: explicit override, else annotation, else string.
pub fn flag_shape(
    tool: &str,
    param: &str,
    type_override: Option<ScalarType>,
    annotation: Option<&Annotation>,
) -> Result<FlagShape, VcError> {
    if let Some(t) = type_override {
        return Ok(FlagShape::single(t));
    }
    match annotation {
        None => Ok(FlagShape::single(ScalarType::Str)),
        Some(Annotation::Scalar(t)) => Ok(FlagShape::single(*t)),
        Some(shape @ Annotation::Generic { origin, args }) => match (origin.as_str(), args.as_slice()) {
            ("list", [Annotation::Scalar(element)]) => Ok(FlagShape {
                value_type: *element,
                multiple: true,
            }),
            _ => Err(VcError::UnsupportedAnnotationShape {
                tool: tool.to_string(),
                param: param.to_string(),
                shape: shape.to_string(),
            }),
        },
    }
}
