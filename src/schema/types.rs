// src/schema/types.rs

use crate::convert::{InputConversion, OutputConversion};

/// One column of a table: name, display heading and both conversions.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub heading: String,
    pub input: InputConversion,
    pub output: OutputConversion,
}

impl Column {
    pub fn new(
        heading: impl Into<String>,
        input: InputConversion,
        output: OutputConversion,
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            heading: heading.into(),
            input,
            output,
        }
    }

    /// Same column under a different heading.
    pub fn with_heading(&self, heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            ..self.clone()
        }
    }

    /// Same column under a different name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}
