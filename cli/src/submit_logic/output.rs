use std::fmt::Display;
use std::io::{self, Write};

/// Writes one prediction per line, flushing after each so a downstream pipe
/// sees every answer as soon as it arrives. Returns the number written.
pub fn write_predictions<W, I>(out: &mut W, predictions: I) -> io::Result<u64>
where
    W: Write,
    I: IntoIterator,
    I::Item: Display,
{
    let mut written = 0;
    for prediction in predictions {
        writeln!(out, "{}", prediction)?;
        out.flush()?;
        written += 1;
    }
    Ok(written)
}
