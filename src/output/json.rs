use crate::errors::Result;
use crate::rules::RuleResult;
use std::io::Write;

/// Write lint results as a pretty-printed JSON array.
pub fn write_results_json<W: Write>(writer: &mut W, results: &[RuleResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, results)?;
    writeln!(writer)?;
    Ok(())
}
