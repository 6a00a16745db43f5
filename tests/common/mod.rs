// 测试用的合成 ab1 文件
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Builds a minimal big-endian ABIF buffer with the given tagged payloads.
pub fn abif_bytes(tags: &[(&[u8; 4], i32, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"ABIF");
    buf.extend_from_slice(&101u16.to_be_bytes());
    buf.extend_from_slice(&[0u8; 28]);

    let mut offsets = Vec::new();
    for (_, _, payload) in tags {
        offsets.push(buf.len());
        if payload.len() > 4 {
            buf.extend_from_slice(payload);
        }
    }

    let dir_offset = buf.len();
    for ((name, number, payload), offset) in tags.iter().zip(offsets) {
        buf.extend_from_slice(*name);
        buf.extend_from_slice(&number.to_be_bytes());
        buf.extend_from_slice(&2i16.to_be_bytes()); // char
        buf.extend_from_slice(&1i16.to_be_bytes());
        buf.extend_from_slice(&(payload.len() as i32).to_be_bytes());
        buf.extend_from_slice(&(payload.len() as i32).to_be_bytes());
        if payload.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..payload.len()].copy_from_slice(payload);
            buf.extend_from_slice(&inline);
        } else {
            buf.extend_from_slice(&(offset as i32).to_be_bytes());
        }
        buf.extend_from_slice(&0i32.to_be_bytes());
    }

    let dir_size = tags.len() * 28;
    let root = &mut buf[6..34];
    root[..4].copy_from_slice(b"tdir");
    root[4..8].copy_from_slice(&1i32.to_be_bytes());
    root[8..10].copy_from_slice(&1023i16.to_be_bytes());
    root[10..12].copy_from_slice(&28i16.to_be_bytes());
    root[12..16].copy_from_slice(&(tags.len() as i32).to_be_bytes());
    root[16..20].copy_from_slice(&(dir_size as i32).to_be_bytes());
    root[20..24].copy_from_slice(&(dir_offset as i32).to_be_bytes());
    buf
}

pub fn write_ab1(dir: &Path, stem: &str, seq: &[u8], qual: &[u8]) -> PathBuf {
    let path = dir.join(format!("{}.ab1", stem));
    let tags: [(&[u8; 4], i32, &[u8]); 3] = [(b"SMPL", 1, b"\x06sample"), (b"PBAS", 2, seq), (b"PCON", 2, qual)];
    let bytes = abif_bytes(&tags);
    fs::write(&path, bytes).unwrap();
    path
}

/// 30 clean bases at quality 40.
pub fn clean_read() -> (Vec<u8>, Vec<u8>) {
    (b"ACGTACGTACGTACGTACGTACGTACGTAC".to_vec(), vec![40; 30])
}

/// Clean read with an `NN` in the middle, outside the trimmable thirds.
pub fn nn_read() -> (Vec<u8>, Vec<u8>) {
    let (mut seq, qual) = clean_read();
    seq[14] = b'N';
    seq[15] = b'N';
    (seq, qual)
}

pub fn count_records(fasta: &str) -> usize {
    fasta.lines().filter(|l| l.starts_with('>')).count()
}
