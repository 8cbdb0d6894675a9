use std::fmt;

use crate::error::ExampleFormatError;

/// # Example
///
/// One input record to be scored by the prediction daemon.
///
/// Rendering may fail for a single record without affecting the rest of the
/// run; the processor skips it and reports the `ExampleFormatError`.
pub trait Example {
    /// Renders the example to the single line written on the wire, without
    /// the trailing line terminator.
    fn to_wire_string(&self) -> Result<String, ExampleFormatError>;
}

impl<E: Example + ?Sized> Example for Box<E> {
    fn to_wire_string(&self) -> Result<String, ExampleFormatError> {
        (**self).to_wire_string()
    }
}

/// An example whose wire form is the wrapped string itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringExample {
    text: String,
}

impl StringExample {
    /// Wraps an already formatted example line.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Example for StringExample {
    /// Embedded line terminators would split one example into several
    /// records, so such examples are rejected.
    fn to_wire_string(&self) -> Result<String, ExampleFormatError> {
        if self.text.contains(['\n', '\r']) {
            return Err(ExampleFormatError::new(format!(
                "example contains a line terminator: {:?}",
                self.text
            )));
        }
        Ok(self.text.clone())
    }
}

impl fmt::Display for StringExample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for StringExample {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for StringExample {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
