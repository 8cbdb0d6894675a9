use std::fmt;

/// # Prediction
///
/// One result record read back from the prediction daemon. Built from a
/// single line of the inbound stream with its terminator already removed.
pub trait Prediction: Send + 'static {
    /// Builds the prediction from one decoded line.
    fn from_wire_string(line: String) -> Self;

    /// The line this prediction was decoded from.
    fn wire_string(&self) -> &str;
}

/// A prediction kept exactly as the daemon sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringPrediction {
    text: String,
}

impl Prediction for StringPrediction {
    fn from_wire_string(line: String) -> Self {
        Self { text: line }
    }

    fn wire_string(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for StringPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
