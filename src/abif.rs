//! Minimal ABIF (`.ab1`) reader: base calls and per-base quality values.
//!
//! Layout (all integers big-endian):
//! - bytes 0..4   magic `ABIF`
//! - bytes 4..6   version
//! - bytes 6..34  root directory entry, whose data points at the tag directory
//!
//! Each directory entry is 28 bytes:
//! `name[4] number:i32 elem_type:i16 elem_size:i16 num_elems:i32
//!  data_size:i32 data_offset:i32 data_handle:i32`.
//! Payloads of at most 4 bytes live inline in the `data_offset` field.

use std::fs;
use std::path::Path;

use crate::error::{Result, TrimError};
use crate::trace::Trace;

const MAGIC: &[u8; 4] = b"ABIF";
const ROOT_ENTRY_OFFSET: usize = 6;
const ENTRY_SIZE: usize = 28;

#[derive(Debug, Clone)]
struct DirEntry {
    name: [u8; 4],
    number: i32,
    data_size: usize,
    data_offset: usize,
    // 文件内偏移量所在位置，小数据直接存放在这里
    entry_pos: usize,
}

/// Reads an ABIF file and decodes it into a [`Trace`] named after the file stem.
pub fn read_trace(path: &Path) -> Result<Trace> {
    let data = fs::read(path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("trace")
        .to_string();
    parse_trace(&data, name, path)
}

/// Decodes an in-memory ABIF buffer.
pub fn parse_trace(data: &[u8], name: String, path: &Path) -> Result<Trace> {
    let invalid = |msg: &str| TrimError::InvalidAbif {
        path: path.to_path_buf(),
        msg: msg.to_string(),
    };

    if data.len() < ROOT_ENTRY_OFFSET + ENTRY_SIZE || &data[..4] != MAGIC {
        return Err(invalid("missing ABIF header"));
    }

    let root = read_entry(data, ROOT_ENTRY_OFFSET).ok_or_else(|| invalid("truncated root entry"))?;
    let num_entries = read_i32(data, ROOT_ENTRY_OFFSET + 12)
        .filter(|&n| n >= 0)
        .ok_or_else(|| invalid("bad directory size"))? as usize;
    // 条目数来自文件本身，先和剩余字节数核对再分配
    if num_entries > data.len().saturating_sub(root.data_offset) / ENTRY_SIZE {
        return Err(invalid("bad directory size"));
    }

    let mut entries = Vec::with_capacity(num_entries);
    for i in 0..num_entries {
        let pos = root.data_offset + i * ENTRY_SIZE;
        let entry = read_entry(data, pos).ok_or_else(|| invalid("truncated directory"))?;
        entries.push(entry);
    }

    let bases = tag_data(data, &entries, b"PBAS", &[2, 1], path)?;
    let quals = tag_data(data, &entries, b"PCON", &[2, 1], path)?;

    Trace::new(name, bases.to_vec(), quals.to_vec())
}

/// Payload of the first matching `(tag, number)` entry, trying numbers in order.
fn tag_data<'a>(
    data: &'a [u8],
    entries: &[DirEntry],
    tag: &[u8; 4],
    numbers: &[i32],
    path: &Path,
) -> Result<&'a [u8]> {
    let entry = numbers
        .iter()
        .find_map(|&n| entries.iter().find(|e| &e.name == tag && e.number == n))
        .ok_or_else(|| TrimError::MissingTag {
            path: path.to_path_buf(),
            tag: format!("{}{}", String::from_utf8_lossy(tag), numbers[0]),
        })?;

    let start = if entry.data_size <= 4 {
        entry.entry_pos + 20
    } else {
        entry.data_offset
    };
    data.get(start..start + entry.data_size)
        .ok_or_else(|| TrimError::InvalidAbif {
            path: path.to_path_buf(),
            msg: format!("{} data out of bounds", String::from_utf8_lossy(tag)),
        })
}

fn read_entry(data: &[u8], pos: usize) -> Option<DirEntry> {
    let raw = data.get(pos..pos + ENTRY_SIZE)?;
    let mut name = [0u8; 4];
    name.copy_from_slice(&raw[..4]);
    let data_size = read_i32(data, pos + 16)?;
    let data_offset = read_i32(data, pos + 20)?;
    if data_size < 0 || data_offset < 0 {
        return None;
    }
    Some(DirEntry {
        name,
        number: read_i32(data, pos + 4)?,
        data_size: data_size as usize,
        data_offset: data_offset as usize,
        entry_pos: pos,
    })
}

fn read_i32(data: &[u8], pos: usize) -> Option<i32> {
    let bytes = data.get(pos..pos + 4)?;
    Some(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
