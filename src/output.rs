use crate::errors::AppError;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(usize),
    /// Nothing was collected; the output file is left untouched.
    Empty,
}

/// Writes one transaction id per line, newline-terminated, replacing any
/// previous content. An empty id list writes nothing at all.
pub fn write_tx_ids(path: &Path, tx_ids: &[String]) -> Result<WriteOutcome, AppError> {
    if tx_ids.is_empty() {
        return Ok(WriteOutcome::Empty);
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for tx_id in tx_ids {
        writeln!(writer, "{tx_id}")?;
    }

    writer.flush()?;
    info!(path = %path.display(), count = tx_ids.len(), "transaction ids written");

    Ok(WriteOutcome::Written(tx_ids.len()))
}
