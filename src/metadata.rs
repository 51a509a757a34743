//! File summary structures

use crate::codec::SampleFormat;
use crate::config::HeaderLocations;
use crate::error::Result;
use crate::types::{LineRange, Shape, TextEncoding};
use crate::utils::format_bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary of an open SEG-Y file.
///
/// Geometry fields are `None` until the file has been scanned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaInfo {
    /// Logical shape (inline, crossline, sample)
    pub shape: Option<Shape>,

    /// Samples per trace
    pub n_samples: usize,

    /// Sample interval in microseconds
    pub sample_interval: u16,

    /// Data sample format
    pub format: SampleFormat,

    pub inline_range: Option<LineRange>,
    pub crossline_range: Option<LineRange>,

    /// Traces stored in the file
    pub trace_count: u64,

    /// Every position of the inline x crossline rectangle has a trace
    pub regular: Option<bool>,

    /// Positions of the rectangle without a trace
    pub missing_traces: usize,

    /// Trace header locations in use
    pub locations: HeaderLocations,

    /// Value returned for missing traces
    pub fill_value: f32,

    /// Detected textual header encoding
    pub textual_encoding: TextEncoding,

    /// File size in bytes
    pub file_size: u64,

    /// Named binary header fields and their values
    pub binary_header: Vec<(String, i64)>,
}

impl MetaInfo {
    /// Sample interval in milliseconds
    pub fn sample_interval_ms(&self) -> f64 {
        f64::from(self.sample_interval) / 1000.0
    }

    /// Value of a named binary header field
    pub fn binary_field(&self, name: &str) -> Option<i64> {
        self.binary_header
            .iter()
            .find(|(field, _)| field == name)
            .map(|&(_, value)| value)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for MetaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            Some(shape) => writeln!(f, "shape (inline x crossline x sample): {shape}")?,
            None => writeln!(f, "shape: not scanned")?,
        }
        writeln!(
            f,
            "samples per trace: {}, interval: {} us ({} ms)",
            self.n_samples,
            self.sample_interval,
            self.sample_interval_ms()
        )?;
        writeln!(f, "format: {}", self.format)?;

        if let (Some(inlines), Some(crosslines)) = (self.inline_range, self.crossline_range) {
            writeln!(f, "inlines: {inlines} (byte {})", self.locations.inline)?;
            writeln!(f, "crosslines: {crosslines} (byte {})", self.locations.crossline)?;
        }

        write!(f, "traces: {}", self.trace_count)?;
        match self.regular {
            Some(true) => writeln!(f, " (regular)")?,
            Some(false) => writeln!(
                f,
                " ({} missing, filled with {})",
                self.missing_traces, self.fill_value
            )?,
            None => writeln!(f)?,
        }

        writeln!(f, "coordinates: X byte {}, Y byte {}", self.locations.x, self.locations.y)?;
        writeln!(f, "textual header: {}", self.textual_encoding)?;
        write!(f, "file size: {}", format_bytes(self.file_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MetaInfo {
        MetaInfo {
            shape: Some(Shape::new(3, 2, 4).unwrap()),
            n_samples: 4,
            sample_interval: 2000,
            format: SampleFormat::IbmFloat,
            inline_range: Some(LineRange::new(1, 3)),
            crossline_range: Some(LineRange::new(10, 11)),
            trace_count: 5,
            regular: Some(false),
            missing_traces: 1,
            locations: HeaderLocations::default(),
            fill_value: -1.0,
            textual_encoding: TextEncoding::Ebcdic,
            file_size: 4096,
            binary_header: vec![("Sample interval (us)".to_string(), 2000)],
        }
    }

    #[test]
    fn test_display() {
        let text = sample().to_string();
        assert!(text.contains("3 x 2 x 4"));
        assert!(text.contains("inlines: 1 - 3 (byte 189)"));
        assert!(text.contains("1 missing"));
        assert!(text.contains("4.00 KB"));
    }

    #[test]
    fn test_binary_field_lookup() {
        let info = sample();
        assert_eq!(info.binary_field("Sample interval (us)"), Some(2000));
        assert_eq!(info.binary_field("Job identification number"), None);
        assert_eq!(info.sample_interval_ms(), 2.0);
    }

    #[test]
    fn test_json() {
        let info = sample();
        let json = info.to_json().unwrap();
        let back: MetaInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }
}
