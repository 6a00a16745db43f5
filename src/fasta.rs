//! FASTA output for trimmed traces.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::Result;
use crate::trace::Trace;

pub const LINE_WIDTH: usize = 60;

/// Appends one record (`>name` + wrapped sequence) to `buffer`.
pub fn write_record(trace: &Trace, buffer: &mut Vec<u8>) {
    buffer.push(b'>');
    buffer.extend_from_slice(trace.name().as_bytes());
    buffer.push(b'\n');
    for line in trace.seq().chunks(LINE_WIDTH) {
        buffer.extend_from_slice(line);
        buffer.push(b'\n');
    }
}

/// Opens `path` for writing, gzip-compressing when it ends in `.gz`.
pub fn create_writer(path: &Path) -> Result<Box<dyn Write + Send>> {
    let file = File::create(path)?;

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let encoder = GzEncoder::new(file, Compression::new(1));
        Ok(Box::new(BufWriter::with_capacity(1 << 20, encoder)))
    } else {
        Ok(Box::new(BufWriter::with_capacity(1 << 20, file)))
    }
}

/// Writes a single-record FASTA file.
pub fn save_fasta(trace: &Trace, path: &Path) -> Result<()> {
    write_merged(std::slice::from_ref(trace), path)
}

/// Writes all traces, in order, into one FASTA file.
pub fn write_merged(traces: &[Trace], path: &Path) -> Result<()> {
    let mut writer = create_writer(path)?;
    let mut buffer = Vec::with_capacity(1 << 16);
    for trace in traces {
        buffer.clear();
        write_record(trace, &mut buffer);
        writer.write_all(&buffer)?;
    }
    writer.flush()?;
    Ok(())
}
