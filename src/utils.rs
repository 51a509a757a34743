//! Utility functions

use crate::error::{Result, SegyError};
use num_traits::{FromBytes, ToBytes};

/// Reverse the byte order of any fixed-width number.
///
/// Applying it twice gives back the original value.
pub fn swap_endian<T>(value: T) -> T
where
    T: ToBytes + FromBytes<Bytes = <T as ToBytes>::Bytes>,
{
    let mut bytes = value.to_ne_bytes();
    bytes.as_mut().reverse();
    T::from_ne_bytes(&bytes)
}

/// Decode little-endian `f32` values from raw bytes
pub fn f32_from_le_bytes(bytes: &[u8], out: &mut [f32]) -> Result<()> {
    if bytes.len() != out.len() * 4 {
        return Err(SegyError::InvalidFormat(format!(
            "expected {} bytes of f32 data, got {}",
            out.len() * 4,
            bytes.len()
        )));
    }

    for (chunk, value) in bytes.chunks_exact(4).zip(out.iter_mut()) {
        *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(())
}

/// Encode `f32` values as little-endian bytes
pub fn f32_to_le_bytes(data: &[f32], out: &mut Vec<u8>) {
    out.reserve(data.len() * 4);
    for value in data {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

/// Format byte size in human-readable form
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}
