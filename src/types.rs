//! Core data types for SEG-Y volumes

use crate::error::{Result, SegyError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Logical shape of a volume: inline-major, samples fastest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    /// Number of inlines
    pub n_inline: usize,
    /// Number of crosslines
    pub n_crossline: usize,
    /// Samples per trace
    pub n_samples: usize,
}

impl Shape {
    /// Create a new shape; every axis must be non-empty and the sample
    /// count must be addressable
    pub fn new(n_inline: usize, n_crossline: usize, n_samples: usize) -> Result<Self> {
        if n_inline == 0 || n_crossline == 0 || n_samples == 0 {
            return Err(SegyError::InvalidDimensions(format!(
                "all dimensions must be non-zero, got {n_inline} x {n_crossline} x {n_samples}"
            )));
        }
        let shape = Self {
            n_inline,
            n_crossline,
            n_samples,
        };
        if shape.checked_len().is_none() {
            return Err(SegyError::InvalidDimensions(format!(
                "{shape} samples overflow the address space"
            )));
        }
        Ok(shape)
    }

    /// Number of traces in the volume, saturating
    pub fn traces(&self) -> usize {
        self.n_inline.saturating_mul(self.n_crossline)
    }

    /// Total number of samples in the volume, saturating
    pub fn len(&self) -> usize {
        self.traces().saturating_mul(self.n_samples)
    }

    /// Total number of samples, `None` when the volume cannot be held in
    /// one `f32` buffer
    pub fn checked_len(&self) -> Option<usize> {
        let len = self
            .n_inline
            .checked_mul(self.n_crossline)?
            .checked_mul(self.n_samples)?;
        let bytes = len.checked_mul(std::mem::size_of::<f32>())?;
        (bytes <= isize::MAX as usize).then_some(len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// As an `(inline, crossline, sample)` tuple, ndarray style
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.n_inline, self.n_crossline, self.n_samples)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} x {}",
            self.n_inline, self.n_crossline, self.n_samples
        )
    }
}

/// A box of the volume in logical (zero-based) indices, end exclusive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubVolume {
    pub inlines: Range<usize>,
    pub crosslines: Range<usize>,
    pub samples: Range<usize>,
}

impl SubVolume {
    pub fn new(inlines: Range<usize>, crosslines: Range<usize>, samples: Range<usize>) -> Self {
        Self {
            inlines,
            crosslines,
            samples,
        }
    }

    /// The whole volume
    pub fn full(shape: &Shape) -> Self {
        Self::new(0..shape.n_inline, 0..shape.n_crossline, 0..shape.n_samples)
    }

    /// Build from `(startZ, endZ, startY, endY, startX, endX)` bounds where
    /// Z is depth, Y is crossline and X is inline.
    pub fn from_zyx(
        start_z: usize,
        end_z: usize,
        start_y: usize,
        end_y: usize,
        start_x: usize,
        end_x: usize,
    ) -> Self {
        Self::new(start_x..end_x, start_y..end_y, start_z..end_z)
    }

    /// Shape of the box
    pub fn shape(&self) -> (usize, usize, usize) {
        (
            self.inlines.len(),
            self.crosslines.len(),
            self.samples.len(),
        )
    }

    /// Number of samples in the box, saturating
    pub fn len(&self) -> usize {
        self.inlines
            .len()
            .saturating_mul(self.crosslines.len())
            .saturating_mul(self.samples.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that every range is non-empty and inside `shape`
    pub fn validate(&self, shape: &Shape) -> Result<()> {
        let axes = [
            ("inline", &self.inlines, shape.n_inline),
            ("crossline", &self.crosslines, shape.n_crossline),
            ("sample", &self.samples, shape.n_samples),
        ];

        for (name, range, size) in axes {
            if range.start >= range.end {
                return Err(SegyError::OutOfRange(format!(
                    "{name} range {}..{} is empty or inverted",
                    range.start, range.end
                )));
            }
            if range.end > size {
                return Err(SegyError::OutOfRange(format!(
                    "{name} range {}..{} exceeds axis length {size}",
                    range.start, range.end
                )));
            }
        }
        Ok(())
    }
}

/// The (inline, crossline) numbers stored in a trace header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraceKey {
    pub inline: i32,
    pub crossline: i32,
}

impl TraceKey {
    pub fn new(inline: i32, crossline: i32) -> Self {
        Self { inline, crossline }
    }
}

/// Inclusive range of line numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub min: i32,
    pub max: i32,
}

impl LineRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// A range holding only `value`
    pub fn single(value: i32) -> Self {
        Self::new(value, value)
    }

    /// Widen the range to include `value`
    pub fn include(&mut self, value: i32) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Number of line numbers covered
    pub fn count(&self) -> usize {
        (i64::from(self.max) - i64::from(self.min) + 1) as usize
    }

    /// Zero-based position of `value`, if inside the range
    pub fn index_of(&self, value: i32) -> Option<usize> {
        if value < self.min || value > self.max {
            None
        } else {
            Some((i64::from(value) - i64::from(self.min)) as usize)
        }
    }

    /// Line number at zero-based position `index`
    pub fn value_at(&self, index: usize) -> i32 {
        (i64::from(self.min) + index as i64) as i32
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Character encoding of the textual header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    Ascii,
    Ebcdic,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Ascii => write!(f, "ASCII"),
            TextEncoding::Ebcdic => write!(f, "EBCDIC"),
        }
    }
}
