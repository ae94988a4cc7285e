//! GDB hex codec and `-data-read-memory-bytes` chunk parsing, ported from
//! `fit/interfaces/gdb/gdb_injector.py`'s `get_int`/`to_gdb_hex` (spec.md §8
//! "Endianness round-trip", §8 scenario 6 "GDB hex parsing").

use serde_json::Value;

use crate::error::AdapterError;

/// Byte order used when interpreting or encoding a hex payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// Decode a GDB hex-digit string (e.g. `"abcdefab"`) into an integer under
/// `byteorder`, mirroring the original `get_int`.
#[must_use]
pub fn get_int(hex: &str, byteorder: Endianness) -> u64 {
    let mut bytes = hex_to_bytes(hex);
    if byteorder == Endianness::Little {
        bytes.reverse();
    }
    bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

/// Encode `value` as a GDB hex-digit string under `byteorder`, mirroring the
/// original `to_gdb_hex`: odd-length hex is left-padded with a zero nibble
/// before byte-swapping.
#[must_use]
pub fn to_gdb_hex(value: u64, byteorder: Endianness) -> String {
    let mut s = format!("{value:x}");
    if s.len() % 2 != 0 {
        s.insert(0, '0');
    }
    let mut bytes = hex_to_bytes(&s);
    if byteorder == Endianness::Little {
        bytes.reverse();
    }
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_to_bytes(hex: &str) -> Vec<u8> {
    hex.as_bytes()
        .chunks(2)
        .map(|pair| u8::from_str_radix(std::str::from_utf8(pair).unwrap_or("00"), 16).unwrap_or(0))
        .collect()
}

/// One contiguous chunk of a `-data-read-memory-bytes` response.
#[derive(Debug, Clone)]
pub struct MemoryChunk {
    pub begin: u64,
    pub end: u64,
    pub contents: String,
}

/// Parse the `memory` array of a `-data-read-memory-bytes` response (spec.md
/// §4.3 "Memory read"). `base` is the address the read was issued against.
/// Returns `ceil(count/word_bytes)` words; bytes not covered by any chunk are
/// zero-filled (the caller is expected to log a warning when `missing` is
/// non-empty).
pub fn parse_chunks(
    chunks: &[MemoryChunk],
    base: u64,
    count: u64,
    word_bytes: u32,
    endianness: Endianness,
) -> (Vec<u64>, Vec<(u64, u64)>) {
    let mut bytes = vec![0u8; count as usize];
    let mut covered = vec![false; count as usize];

    for chunk in chunks {
        let decoded = hex_to_bytes(&chunk.contents);
        let start = chunk.begin.saturating_sub(base) as usize;
        for (i, b) in decoded.iter().enumerate() {
            let idx = start + i;
            if idx < bytes.len() {
                bytes[idx] = *b;
                covered[idx] = true;
            }
        }
    }

    let mut missing = Vec::new();
    let mut i = 0usize;
    while i < covered.len() {
        if !covered[i] {
            let gap_start = i;
            while i < covered.len() && !covered[i] {
                i += 1;
            }
            missing.push((base + gap_start as u64, base + i as u64));
        } else {
            i += 1;
        }
    }

    let word_bytes = word_bytes.max(1) as usize;
    let words = bytes
        .chunks(word_bytes)
        .map(|word| {
            let mut padded = word.to_vec();
            padded.resize(word_bytes, 0);
            if endianness == Endianness::Big {
                padded.reverse();
            }
            padded.iter().rev().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
        })
        .collect();

    (words, missing)
}

/// Pull `MemoryChunk`s out of a parsed `memory=[...]` array.
pub fn chunks_from_payload(memory: &Value) -> Result<Vec<MemoryChunk>, AdapterError> {
    let array = memory
        .as_array()
        .ok_or_else(|| AdapterError::MalformedLine("expected memory array".to_string()))?;

    array
        .iter()
        .map(|chunk| {
            let begin = chunk["begin"].as_str().unwrap_or("0x0");
            let end = chunk["end"].as_str().unwrap_or("0x0");
            let contents = chunk["contents"].as_str().unwrap_or_default().to_string();
            Ok(MemoryChunk {
                begin: u64::from_str_radix(begin.trim_start_matches("0x"), 16).unwrap_or(0),
                end: u64::from_str_radix(end.trim_start_matches("0x"), 16).unwrap_or(0),
                contents,
            })
        })
        .collect()
}

/// Pack `words` (little-endian within each word) into one hex-digit payload
/// for `-data-write-memory-bytes`, in target endianness.
#[must_use]
pub fn pack_words(words: &[u64], word_bytes: u32, endianness: Endianness) -> String {
    let word_bytes = word_bytes.max(1) as usize;
    let mut out = String::new();
    for word in words {
        let mut bytes: Vec<u8> = (0..word_bytes).map(|i| ((word >> (8 * i)) & 0xFF) as u8).collect();
        if endianness == Endianness::Big {
            bytes.reverse();
        }
        for b in bytes {
            out.push_str(&format!("{b:02x}"));
        }
    }
    out
}
