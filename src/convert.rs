//! Conversion capabilities between field text and typed values.
//!
//! A column carries one [`InputConversion`] (text → value) and one
//! [`OutputConversion`] (value → text). Conversions are plain functions or
//! closures supplied by the caller, or looked up by name in a
//! [`ConversionRegistry`] when a schema is built from text definitions.

use std::{collections::HashMap, fmt, sync::Arc};

use serde_json::Number;
use tracing::debug;

use crate::error::ConvertError;

/// Typed value held by records. `Value::Null` is the absent sentinel.
pub type Value = serde_json::Value;

type InputFn = dyn Fn(&str) -> Result<Value, ConvertError> + Send + Sync;
type OutputFn = dyn Fn(&Value) -> Result<String, ConvertError> + Send + Sync;

/// Named text → value conversion.
#[derive(Clone)]
pub struct InputConversion {
    label: Arc<str>,
    func: Arc<InputFn>,
}

impl InputConversion {
    pub fn new<F>(label: &str, func: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        Self {
            label: Arc::from(label),
            func: Arc::new(func),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn apply(&self, text: &str) -> Result<Value, ConvertError> {
        (self.func)(text)
    }
}

impl fmt::Debug for InputConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputConversion({})", self.label)
    }
}

/// Named value → text conversion.
#[derive(Clone)]
pub struct OutputConversion {
    label: Arc<str>,
    func: Arc<OutputFn>,
}

impl OutputConversion {
    pub fn new<F>(label: &str, func: F) -> Self
    where
        F: Fn(&Value) -> Result<String, ConvertError> + Send + Sync + 'static,
    {
        Self {
            label: Arc::from(label),
            func: Arc::new(func),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn apply(&self, value: &Value) -> Result<String, ConvertError> {
        (self.func)(value)
    }
}

impl fmt::Debug for OutputConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputConversion({})", self.label)
    }
}

// ─── built-in conversions ────────────────────────────────────────

/// Text passes through unchanged.
pub fn text() -> InputConversion {
    InputConversion::new("text", |s| Ok(Value::String(s.to_string())))
}

/// Empty text becomes `Null`, anything else stays text.
pub fn nullable_text() -> InputConversion {
    InputConversion::new("nullable_text", |s| {
        Ok(if s.is_empty() {
            Value::Null
        } else {
            Value::String(s.to_string())
        })
    })
}

pub fn integer() -> InputConversion {
    InputConversion::new("integer", |s| {
        if s.is_empty() {
            return Ok(Value::Null);
        }
        s.trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| ConvertError::malformed(s, e))
    })
}

pub fn float() -> InputConversion {
    InputConversion::new("float", |s| {
        if s.is_empty() {
            return Ok(Value::Null);
        }
        let v: f64 = s.trim().parse().map_err(|e| ConvertError::malformed(s, e))?;
        Number::from_f64(v)
            .map(Value::Number)
            .ok_or_else(|| ConvertError::failed(format!("non-finite number {:?}", s)))
    })
}

pub fn boolean() -> InputConversion {
    InputConversion::new("boolean", |s| {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(Value::Null),
            "true" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "0" => Ok(Value::Bool(false)),
            _ => Err(ConvertError::malformed(s, "expected a boolean")),
        }
    })
}

/// Empty text becomes `Null`, anything else is parsed as a JSON literal
/// such as `[1, 2]` or `{"a": 1}`.
pub fn literal() -> InputConversion {
    InputConversion::new("literal", |s| {
        if s.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(s).map_err(|e| ConvertError::malformed(s, e))
    })
}

/// `Null` becomes empty text, strings are written verbatim and other values
/// in their JSON text form.
pub fn to_text() -> OutputConversion {
    OutputConversion::new("text", |v| {
        Ok(match v {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    })
}

/// `Null` becomes empty text, everything else compact JSON.
pub fn to_literal() -> OutputConversion {
    OutputConversion::new("literal", |v| {
        Ok(match v {
            Value::Null => String::new(),
            other => serde_json::to_string(other).map_err(|e| ConvertError::failed(e.to_string()))?,
        })
    })
}

// ─── registry ────────────────────────────────────────────────────

/// Statically registered conversions, looked up by name when a schema is
/// built from text definitions.
#[derive(Debug, Clone)]
pub struct ConversionRegistry {
    inputs: HashMap<String, InputConversion>,
    outputs: HashMap<String, OutputConversion>,
}

impl ConversionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            inputs: HashMap::new(),
            outputs: HashMap::new(),
        }
    }

    /// Registry preloaded with the built-in conversions.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        for conv in [text(), nullable_text(), integer(), float(), boolean(), literal()] {
            reg.register_input(conv);
        }
        for conv in [to_text(), to_literal()] {
            reg.register_output(conv);
        }
        reg
    }

    /// Register under the conversion's label, replacing any earlier entry.
    pub fn register_input(&mut self, conv: InputConversion) {
        if self.inputs.contains_key(conv.label()) {
            debug!(name = conv.label(), "replacing input conversion");
        }
        self.inputs.insert(conv.label().to_string(), conv);
    }

    pub fn register_output(&mut self, conv: OutputConversion) {
        if self.outputs.contains_key(conv.label()) {
            debug!(name = conv.label(), "replacing output conversion");
        }
        self.outputs.insert(conv.label().to_string(), conv);
    }

    pub fn input(&self, name: &str) -> Option<&InputConversion> {
        self.inputs.get(name)
    }

    pub fn output(&self, name: &str) -> Option<&OutputConversion> {
        self.outputs.get(name)
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
