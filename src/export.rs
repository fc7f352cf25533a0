//! JSON persistence for extracted records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;

use crate::models::VoterRecord;

/// Write all records as one flat JSON array.
///
/// Pretty-printed, with non-ASCII text kept verbatim so the Bangla
/// field values stay readable in the output file.
pub fn write_records(path: &Path, records: &[VoterRecord]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
