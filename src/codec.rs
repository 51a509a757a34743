//! Sample codecs: IBM System/360 and IEEE-754 single precision floats
//!
//! SEG-Y stores samples big-endian. Format code 1 is the base-16 IBM float
//! inherited from the mainframes the format was designed on; format code 5 is
//! plain IEEE-754. The IBM conversions here are bit-exact with the classic
//! shift-and-normalize routines used by seismic processing packages,
//! including their truncation and saturation behavior.

use crate::error::{Result, SegyError};
use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data sample format codes supported by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum SampleFormat {
    /// 4-byte IBM floating point
    IbmFloat = 1,
    /// 4-byte IEEE floating point
    #[default]
    IeeeFloat = 5,
}

impl SampleFormat {
    /// Get the format from a binary header data sample format code
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(SampleFormat::IbmFloat),
            5 => Ok(SampleFormat::IeeeFloat),
            other => Err(SegyError::UnsupportedFormatCode(other)),
        }
    }

    /// The binary header code for this format
    pub fn code(self) -> i16 {
        self as i16
    }

    /// Size of one sample on disk
    pub const fn sample_size(self) -> usize {
        4
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleFormat::IbmFloat => write!(f, "4-byte IBM float (1)"),
            SampleFormat::IeeeFloat => write!(f, "4-byte IEEE float (5)"),
        }
    }
}

/// Convert an IBM float bit pattern to an IEEE single.
///
/// Magnitudes beyond the IEEE range saturate to `±f32::MAX`.
pub fn ibm_bits_to_ieee(bits: u32) -> f32 {
    let sign = bits >> 31;
    let mut fraction = (bits & 0x00ff_ffff) as i32;

    if fraction == 0 {
        return if sign == 1 { -0.0 } else { 0.0 };
    }

    // Base-16 exponent expressed in base 2, IBM bias removed.
    let mut exponent = ((bits & 0x7f00_0000) >> 22) as i32 - 256;

    // IEEE only keeps 23 fraction bits.
    fraction >>= 1;

    while fraction != 0 && fraction & 0x0080_0000 == 0 {
        fraction <<= 1;
        exponent -= 1;
    }

    // Implicit leading bit.
    fraction &= 0x007f_ffff;

    exponent += 127;

    if exponent >= 255 {
        return if sign == 1 { -f32::MAX } else { f32::MAX };
    }

    let ieee = if exponent <= 0 {
        (sign << 31) | fraction as u32
    } else {
        (sign << 31) | ((exponent as u32) << 23) | fraction as u32
    };

    f32::from_bits(ieee)
}

/// Convert an IEEE single to an IBM float bit pattern.
///
/// Infinities and NaN have no IBM representation and come out as large
/// finite values, as in the classic shift-and-normalize routine.
pub fn ieee_to_ibm_bits(value: f32) -> u32 {
    let bits = value.to_bits();
    let sign = bits >> 31;

    if bits & 0x7fff_ffff == 0 {
        return sign << 31;
    }

    let mut exponent = ((bits & 0x7f80_0000) >> 23) as i32 - 127;
    let mut fraction = (bits & 0x007f_ffff) as i32;

    fraction <<= 1;
    fraction |= 0x0100_0000;

    // Base 2 to base 16: fold the low two exponent bits into the fraction.
    fraction <<= exponent & 3;
    exponent >>= 2;

    if fraction & 0x0f00_0000 != 0 {
        fraction >>= 4;
        exponent += 1;
    }

    exponent += 64;

    if exponent > 127 {
        (sign << 31) | 0x7fff_ffff
    } else if exponent <= 0 {
        (sign << 31) | fraction as u32
    } else {
        (sign << 31) | ((exponent as u32) << 24) | fraction as u32
    }
}

/// Decode four raw IBM float bytes.
///
/// `is_big_endian_input` tells whether `raw` is in file (big-endian) order.
pub fn ibm_to_ieee(raw: [u8; 4], is_big_endian_input: bool) -> f32 {
    let bits = if is_big_endian_input {
        u32::from_be_bytes(raw)
    } else {
        u32::from_le_bytes(raw)
    };
    ibm_bits_to_ieee(bits)
}

/// Encode an IEEE single as four IBM float bytes in the requested order.
pub fn ieee_to_ibm(value: f32, big_endian_output: bool) -> [u8; 4] {
    let bits = ieee_to_ibm_bits(value);
    if big_endian_output {
        bits.to_be_bytes()
    } else {
        bits.to_le_bytes()
    }
}

/// Trait for converting between on-disk sample bytes and `f32` samples
pub trait SampleCodec: Send + Sync {
    /// Decode big-endian on-disk samples. `raw` holds exactly
    /// `4 * out.len()` bytes.
    fn decode(&self, raw: &[u8], out: &mut [f32]);

    /// Append `samples` to `out` in on-disk representation
    fn encode(&self, samples: &[f32], out: &mut BytesMut);

    /// Get the sample format
    fn format(&self) -> SampleFormat;
}

/// IBM float samples (format code 1)
#[derive(Debug, Default)]
pub struct IbmCodec;

impl SampleCodec for IbmCodec {
    fn decode(&self, raw: &[u8], out: &mut [f32]) {
        for (chunk, value) in raw.chunks_exact(4).zip(out.iter_mut()) {
            *value = ibm_to_ieee([chunk[0], chunk[1], chunk[2], chunk[3]], true);
        }
    }

    fn encode(&self, samples: &[f32], out: &mut BytesMut) {
        out.reserve(samples.len() * 4);
        for &value in samples {
            out.put_u32(ieee_to_ibm_bits(value));
        }
    }

    fn format(&self) -> SampleFormat {
        SampleFormat::IbmFloat
    }
}

/// IEEE float samples (format code 5)
#[derive(Debug, Default)]
pub struct IeeeCodec;

impl SampleCodec for IeeeCodec {
    fn decode(&self, raw: &[u8], out: &mut [f32]) {
        for (chunk, value) in raw.chunks_exact(4).zip(out.iter_mut()) {
            *value = f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
    }

    fn encode(&self, samples: &[f32], out: &mut BytesMut) {
        out.reserve(samples.len() * 4);
        for &value in samples {
            out.put_f32(value);
        }
    }

    fn format(&self) -> SampleFormat {
        SampleFormat::IeeeFloat
    }
}

/// Get a codec for a given sample format
pub fn get_codec(format: SampleFormat) -> Box<dyn SampleCodec> {
    match format {
        SampleFormat::IbmFloat => Box::new(IbmCodec),
        SampleFormat::IeeeFloat => Box::new(IeeeCodec),
    }
}
