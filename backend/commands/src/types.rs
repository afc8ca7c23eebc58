//! Command metadata and the typed parameter model.

use std::time::Duration;

/// Declared type of a positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Int,
    Float,
    Bool,
    Duration,
}

/// A parsed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            ParamValue::Duration(d) => Some(*d),
            _ => None,
        }
    }
}

/// Pure check run against the raw token before type conversion.
pub type Validator = fn(&str) -> Result<(), String>;

/// Declaration of one positional parameter.
///
/// A required parameter never carries a default; `default` is only
/// consulted when `required` is false and the token is absent.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    pub required: bool,
    pub default: Option<ParamValue>,
    pub validator: Option<Validator>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: false,
            default: None,
            validator: None,
        }
    }

    pub fn required(mut self) -> Self {
        debug_assert!(self.default.is_none(), "a required parameter never carries a default");
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: ParamValue) -> Self {
        debug_assert!(!self.required, "a required parameter never carries a default");
        self.default = Some(value);
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// Immutable description of a registered command.
///
/// `name` and `aliases` are matched case-insensitively; `hidden` commands
/// are left out of the general help listing but still resolvable.
#[derive(Debug, Clone, Default)]
pub struct CommandMetadata {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub category: String,
    pub usage: String,
    pub examples: Vec<String>,
    pub require_owner: bool,
    pub hidden: bool,
    pub parameters: Vec<ParameterSpec>,
}

impl CommandMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}
