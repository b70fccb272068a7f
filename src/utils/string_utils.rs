
/// Shared formatting helpers for the listing printers
use crate::utils::errors::PascalResult;

/// Helper function for writing formatted strings to a buffer
pub fn write_line(buf: &mut String, args: std::fmt::Arguments) -> PascalResult<()> {
    use std::fmt::Write;
    buf.write_fmt(args)?;
    buf.push('\n');
    Ok(())
}

/// Indentation of `level` steps of `width` blanks.
pub fn indentation(level: usize, width: usize) -> String {
    " ".repeat(level * width)
}
