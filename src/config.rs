//! Handle configuration: header locations, overrides and creation settings

use crate::codec::SampleFormat;
use crate::error::{Result, SegyError};
use crate::header::trace;
use crate::types::TextEncoding;
use crate::TRACE_HEADER_SIZE;
use serde::{Deserialize, Serialize};

/// Default sample interval for created files, in microseconds
pub const DEFAULT_SAMPLE_INTERVAL: u16 = 4000;

/// Byte locations (1-based) of the 4-byte trace header fields the engine
/// keys on. Producers disagree on where these live, so they are
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLocations {
    pub inline: usize,
    pub crossline: usize,
    pub x: usize,
    pub y: usize,
}

impl Default for HeaderLocations {
    fn default() -> Self {
        Self {
            inline: trace::INLINE,
            crossline: trace::CROSSLINE,
            x: trace::SOURCE_X,
            y: trace::SOURCE_Y,
        }
    }
}

impl HeaderLocations {
    /// Check a single location addresses a 4-byte field inside the header
    pub fn check(offset: usize) -> Result<()> {
        if offset == 0 || offset + 3 > TRACE_HEADER_SIZE {
            return Err(SegyError::InvalidHeaderLocation(offset));
        }
        Ok(())
    }

    /// Every location in range and the two line keys not overlapping.
    ///
    /// X and Y may share bytes with a line key when reading; files that
    /// store the inline number at byte 73 are common.
    pub fn validate(&self) -> Result<()> {
        for offset in [self.inline, self.crossline, self.x, self.y] {
            Self::check(offset)?;
        }
        Self::disjoint(&[("inline", self.inline), ("crossline", self.crossline)])
    }

    /// Every location in range and no two fields overlapping, as needed
    /// when all four are written into new trace headers
    pub fn validate_disjoint(&self) -> Result<()> {
        self.validate()?;
        Self::disjoint(&[
            ("inline", self.inline),
            ("crossline", self.crossline),
            ("X", self.x),
            ("Y", self.y),
        ])
    }

    fn disjoint(named: &[(&str, usize)]) -> Result<()> {
        for (i, &(a_name, a)) in named.iter().enumerate() {
            for &(b_name, b) in &named[i + 1..] {
                if a.abs_diff(b) < 4 {
                    return Err(SegyError::Configuration(format!(
                        "{a_name} location (byte {a}) overlaps {b_name} location (byte {b})"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Configuration carried by a handle.
///
/// Reading uses the locations, fill value, strictness and the optional
/// overrides. Creating files additionally uses the sample interval, format,
/// start time, coordinate grid, first line numbers and text encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegyConfig {
    /// Trace header locations of inline, crossline, X and Y
    pub locations: HeaderLocations,

    /// Value returned for positions with no trace in irregular geometry
    pub fill_value: f32,

    /// Samples per trace, overriding the binary header
    pub sample_count: Option<usize>,

    /// Sample interval, overriding the binary header
    pub sample_interval: Option<u16>,

    /// Data sample format, overriding the binary header
    pub format: Option<SampleFormat>,

    /// Delay recording time written to created traces
    pub start_time: i16,

    /// Coordinate of the first inline/crossline
    pub x_origin: f64,
    pub y_origin: f64,

    /// Coordinate step per inline (X) and per crossline (Y)
    pub x_interval: f32,
    pub y_interval: f32,

    /// Line numbers of the first inline/crossline
    pub min_inline: i32,
    pub min_crossline: i32,

    /// Encoding of created textual headers
    pub textual_encoding: TextEncoding,

    /// Reject traces whose header sample count disagrees with the file
    pub strict: bool,
}

impl Default for SegyConfig {
    fn default() -> Self {
        Self {
            locations: HeaderLocations::default(),
            fill_value: 0.0,
            sample_count: None,
            sample_interval: None,
            format: None,
            start_time: 0,
            x_origin: 0.0,
            y_origin: 0.0,
            x_interval: 25.0,
            y_interval: 25.0,
            min_inline: 1,
            min_crossline: 1,
            textual_encoding: TextEncoding::Ascii,
            strict: true,
        }
    }
}

impl SegyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inline and crossline locations
    pub fn with_line_locations(mut self, inline: usize, crossline: usize) -> Self {
        self.locations.inline = inline;
        self.locations.crossline = crossline;
        self
    }

    /// Set the X and Y coordinate locations
    pub fn with_coordinate_locations(mut self, x: usize, y: usize) -> Self {
        self.locations.x = x;
        self.locations.y = y;
        self
    }

    pub fn with_fill_value(mut self, fill_value: f32) -> Self {
        self.fill_value = fill_value;
        self
    }

    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = Some(sample_count);
        self
    }

    pub fn with_sample_interval(mut self, dt: u16) -> Self {
        self.sample_interval = Some(dt);
        self
    }

    pub fn with_format(mut self, format: SampleFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_start_time(mut self, start_time: i16) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.x_origin = x;
        self.y_origin = y;
        self
    }

    pub fn with_intervals(mut self, dx: f32, dy: f32) -> Self {
        self.x_interval = dx;
        self.y_interval = dy;
        self
    }

    pub fn with_min_lines(mut self, min_inline: i32, min_crossline: i32) -> Self {
        self.min_inline = min_inline;
        self.min_crossline = min_crossline;
        self
    }

    pub fn with_textual_encoding(mut self, encoding: TextEncoding) -> Self {
        self.textual_encoding = encoding;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Validate locations and overrides
    pub fn validate(&self) -> Result<()> {
        self.locations.validate()?;

        if self.sample_count == Some(0) {
            return Err(SegyError::Configuration(
                "sample count override must be non-zero".to_string(),
            ));
        }
        if let Some(ns) = self.sample_count {
            if ns > usize::from(u16::MAX) {
                return Err(SegyError::Configuration(format!(
                    "sample count {ns} does not fit the 2-byte header field"
                )));
            }
        }
        if !self.x_interval.is_finite() || !self.y_interval.is_finite() {
            return Err(SegyError::Configuration(
                "coordinate intervals must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Load a configuration from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SegyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
