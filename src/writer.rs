//! Creating SEG-Y files
//!
//! [`SegyWriter`] lays out a dense `(inline, crossline, sample)` volume as a
//! fresh file with generated headers. [`create_by_sharing_header`] instead
//! copies every header from an existing file and only replaces the samples.

use crate::access::SegyFile;
use crate::codec::{get_codec, SampleFormat};
use crate::config::{HeaderLocations, SegyConfig, DEFAULT_SAMPLE_INTERVAL};
use crate::error::{Result, SegyError};
use crate::header::{binary, trace, BinaryHeader, TraceHeader};
use crate::text::{encode_textual_header, CARD_COUNT};
use crate::types::{LineRange, Shape, TextEncoding, TraceKey};
use crate::utils::f32_from_le_bytes;
use crate::TRACE_HEADER_SIZE;
use bytes::BytesMut;
use chrono::Utc;
use ndarray::ArrayView3;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// SEG-Y revision 1.0 as written to the binary header
const REVISION_1: i64 = 0x0100;

/// Writes volumes of a fixed shape as SEG-Y files
#[derive(Debug, Clone)]
pub struct SegyWriter {
    shape: Shape,
    config: SegyConfig,
}

impl SegyWriter {
    /// Writer with the default configuration
    pub fn new(shape: Shape) -> Result<Self> {
        Self::with_config(shape, SegyConfig::default())
    }

    pub fn with_config(shape: Shape, config: SegyConfig) -> Result<Self> {
        let writer = Self { shape, config };
        writer.validate()?;
        Ok(writer)
    }

    fn validate(&self) -> Result<()> {
        self.config.validate()?;
        self.config.locations.validate_disjoint()?;

        if self.shape.n_samples > usize::from(u16::MAX) {
            return Err(SegyError::InvalidDimensions(format!(
                "{} samples per trace do not fit the 2-byte header field",
                self.shape.n_samples
            )));
        }
        self.line_range(self.config.min_inline, self.shape.n_inline)?;
        self.line_range(self.config.min_crossline, self.shape.n_crossline)?;
        Ok(())
    }

    fn line_range(&self, min: i32, n: usize) -> Result<LineRange> {
        let max = i64::from(min) + n as i64 - 1;
        let max = i32::try_from(max).map_err(|_| {
            SegyError::InvalidDimensions(format!("{n} lines starting at {min} overflow i32"))
        })?;
        Ok(LineRange::new(min, max))
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn config(&self) -> &SegyConfig {
        &self.config
    }

    fn update_locations<F>(&mut self, update: F) -> Result<()>
    where
        F: FnOnce(&mut HeaderLocations),
    {
        let mut locations = self.config.locations;
        update(&mut locations);
        locations.validate_disjoint()?;
        self.config.locations = locations;
        Ok(())
    }

    pub fn set_inline_location(&mut self, offset: usize) -> Result<()> {
        self.update_locations(|l| l.inline = offset)
    }

    pub fn set_crossline_location(&mut self, offset: usize) -> Result<()> {
        self.update_locations(|l| l.crossline = offset)
    }

    pub fn set_x_location(&mut self, offset: usize) -> Result<()> {
        self.update_locations(|l| l.x = offset)
    }

    pub fn set_y_location(&mut self, offset: usize) -> Result<()> {
        self.update_locations(|l| l.y = offset)
    }

    pub fn set_sample_interval(&mut self, dt: u16) {
        self.config.sample_interval = Some(dt);
    }

    pub fn set_data_format_code(&mut self, code: i64) -> Result<()> {
        self.config.format = Some(SampleFormat::from_code(code)?);
        Ok(())
    }

    pub fn set_start_time(&mut self, start_time: i16) {
        self.config.start_time = start_time;
    }

    pub fn set_x_interval(&mut self, dx: f32) -> Result<()> {
        if !dx.is_finite() {
            return Err(SegyError::Configuration(format!("X interval {dx} is not finite")));
        }
        self.config.x_interval = dx;
        Ok(())
    }

    pub fn set_y_interval(&mut self, dy: f32) -> Result<()> {
        if !dy.is_finite() {
            return Err(SegyError::Configuration(format!("Y interval {dy} is not finite")));
        }
        self.config.y_interval = dy;
        Ok(())
    }

    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.config.x_origin = x;
        self.config.y_origin = y;
    }

    pub fn set_min_inline(&mut self, min_inline: i32) -> Result<()> {
        self.line_range(min_inline, self.shape.n_inline)?;
        self.config.min_inline = min_inline;
        Ok(())
    }

    pub fn set_min_crossline(&mut self, min_crossline: i32) -> Result<()> {
        self.line_range(min_crossline, self.shape.n_crossline)?;
        self.config.min_crossline = min_crossline;
        Ok(())
    }

    pub fn set_textual_encoding(&mut self, encoding: TextEncoding) {
        self.config.textual_encoding = encoding;
    }

    /// Format samples are written in
    pub fn format(&self) -> SampleFormat {
        self.config.format.unwrap_or_default()
    }

    /// Sample interval written to the headers
    pub fn sample_interval(&self) -> u16 {
        self.config.sample_interval.unwrap_or(DEFAULT_SAMPLE_INTERVAL)
    }

    /// Lines of the generated textual header
    pub fn textual_header_lines(&self) -> Vec<String> {
        let inlines = LineRange::new(
            self.config.min_inline,
            self.config.min_inline + self.shape.n_inline as i32 - 1,
        );
        let crosslines = LineRange::new(
            self.config.min_crossline,
            self.config.min_crossline + self.shape.n_crossline as i32 - 1,
        );
        let locations = self.config.locations;

        let mut cards = vec![
            format!(
                "SEG-Y FILE CREATED BY SEGY-RS {} ON {}",
                crate::SEGY_VERSION,
                Utc::now().format("%Y-%m-%d")
            ),
            String::new(),
            format!("INLINES {inlines} ({})", self.shape.n_inline),
            format!("CROSSLINES {crosslines} ({})", self.shape.n_crossline),
            format!(
                "SAMPLES PER TRACE {} SAMPLE INTERVAL {} US START TIME {} MS",
                self.shape.n_samples,
                self.sample_interval(),
                self.config.start_time
            ),
            format!("DATA SAMPLE FORMAT {}", self.format()),
            String::new(),
            format!(
                "INLINE BYTE {} CROSSLINE BYTE {}",
                locations.inline, locations.crossline
            ),
            format!("X BYTE {} Y BYTE {}", locations.x, locations.y),
            format!(
                "ORIGIN X {} Y {} INTERVAL X {} Y {}",
                self.config.x_origin,
                self.config.y_origin,
                self.config.x_interval,
                self.config.y_interval
            ),
        ];
        cards.resize(CARD_COUNT, String::new());
        cards[CARD_COUNT - 2] = "SEG-Y REV1".to_string();
        cards[CARD_COUNT - 1] = "END TEXTUAL HEADER".to_string();

        cards
            .iter()
            .enumerate()
            .map(|(i, text)| format!("C{:2} {}", i + 1, text).trim_end().to_string())
            .collect()
    }

    /// The generated binary header
    pub fn binary_header(&self) -> Result<BinaryHeader> {
        let dt = i64::from(self.sample_interval());
        let ns = self.shape.n_samples as i64;
        let per_ensemble = self.shape.n_crossline.min(i16::MAX as usize) as i64;

        let mut header = BinaryHeader::new();
        header.set_field(binary::JOB_ID, 1)?;
        header.set_field(binary::LINE_NUMBER, i64::from(self.config.min_inline))?;
        header.set_field(binary::REEL_NUMBER, 1)?;
        header.set_field(binary::TRACES_PER_ENSEMBLE, per_ensemble)?;
        header.set_field(binary::SAMPLE_INTERVAL, dt)?;
        header.set_field(binary::SAMPLE_INTERVAL_ORIGINAL, dt)?;
        header.set_field(binary::SAMPLE_COUNT, ns)?;
        header.set_field(binary::SAMPLE_COUNT_ORIGINAL, ns)?;
        header.set_field(binary::FORMAT_CODE, i64::from(self.format().code()))?;
        header.set_field(binary::ENSEMBLE_FOLD, 1)?;
        header.set_field(binary::SORTING_CODE, 4)?;
        header.set_field(binary::MEASUREMENT_SYSTEM, 1)?;
        header.set_field(binary::REVISION, REVISION_1)?;
        header.set_field(binary::FIXED_LENGTH, 1)?;
        header.set_field(binary::EXTENDED_HEADERS, 0)?;
        Ok(header)
    }

    /// The generated header of the trace at logical position (`il`, `xl`)
    pub fn trace_header(&self, il: usize, xl: usize) -> Result<TraceHeader> {
        let ordinal = il * self.shape.n_crossline + xl;
        let key = TraceKey::new(
            self.config.min_inline + il as i32,
            self.config.min_crossline + xl as i32,
        );
        let x = self.config.x_origin + il as f64 * f64::from(self.config.x_interval);
        let y = self.config.y_origin + xl as f64 * f64::from(self.config.y_interval);

        let mut header = TraceHeader::new();
        header.set_field(trace::SEQUENCE_IN_LINE, xl as i64 + 1)?;
        header.set_field(trace::SEQUENCE_IN_FILE, ordinal as i64 + 1)?;
        header.set_field(trace::FIELD_RECORD, i64::from(key.inline))?;
        header.set_field(trace::TRACE_IN_RECORD, i64::from(key.crossline))?;
        header.set_field(trace::TRACE_ID, 1)?;
        header.set_field(trace::COORDINATE_SCALAR, 1)?;
        header.set_field(trace::COORDINATE_UNITS, 1)?;
        header.set_field(trace::DELAY_TIME, i64::from(self.config.start_time))?;
        header.set_field(trace::SAMPLE_COUNT, self.shape.n_samples as i64)?;
        header.set_field(trace::SAMPLE_INTERVAL, i64::from(self.sample_interval()))?;

        // Configured locations last so they win over any standard field
        // they share bytes with.
        let locations = self.config.locations;
        header.set_location(locations.x, x.round() as i32)?;
        header.set_location(locations.y, y.round() as i32)?;
        header.set_location(locations.inline, key.inline)?;
        header.set_location(locations.crossline, key.crossline)?;
        Ok(header)
    }

    /// Stream a file to `sink`, asking `next_trace` for the samples of
    /// every position in inline-major order
    pub fn write_to<W, F>(&self, sink: W, mut next_trace: F) -> Result<()>
    where
        W: Write,
        F: FnMut(usize, usize, &mut [f32]) -> Result<()>,
    {
        let shape = self.shape;
        let codec = get_codec(self.format());
        let mut sink = BufWriter::new(sink);

        let lines = self.textual_header_lines();
        sink.write_all(&encode_textual_header(&lines, self.config.textual_encoding))?;
        sink.write_all(self.binary_header()?.as_bytes())?;

        let mut samples = vec![0.0f32; shape.n_samples];
        let mut buf = BytesMut::with_capacity(TRACE_HEADER_SIZE + shape.n_samples * 4);

        for il in 0..shape.n_inline {
            for xl in 0..shape.n_crossline {
                next_trace(il, xl, &mut samples)?;

                buf.clear();
                buf.extend_from_slice(self.trace_header(il, xl)?.as_bytes());
                codec.encode(&samples, &mut buf);
                sink.write_all(&buf)?;
            }
        }

        sink.flush()?;
        Ok(())
    }

    /// Write a volume laid out `(inline, crossline, sample)`
    pub fn write(&self, path: impl AsRef<Path>, data: ArrayView3<f32>) -> Result<()> {
        if data.dim() != self.shape.dims() {
            return Err(SegyError::InvalidDimensions(format!(
                "array of shape {:?} does not match writer shape {}",
                data.dim(),
                self.shape
            )));
        }
        let data = data.as_standard_layout();
        let flat = data.as_slice().ok_or_else(|| {
            SegyError::InvalidDimensions("volume is not contiguous".to_string())
        })?;
        self.write_slice(path, flat)
    }

    /// Write an inline-major buffer with samples fastest
    pub fn write_slice(&self, path: impl AsRef<Path>, data: &[f32]) -> Result<()> {
        if data.len() != self.shape.len() {
            return Err(SegyError::InvalidDimensions(format!(
                "buffer holds {} values, shape {} needs {}",
                data.len(),
                self.shape,
                self.shape.len()
            )));
        }
        let ns = self.shape.n_samples;
        let nx = self.shape.n_crossline;
        self.write_file(path.as_ref(), |il, xl, out| {
            let start = (il * nx + xl) * ns;
            out.copy_from_slice(&data[start..start + ns]);
            Ok(())
        })
    }

    /// Write a volume holding the configured fill value everywhere
    pub fn write_filled(&self, path: impl AsRef<Path>) -> Result<()> {
        let fill = self.config.fill_value;
        self.write_file(path.as_ref(), |_, _, out| {
            out.fill(fill);
            Ok(())
        })
    }

    /// Convert a headerless little-endian `f32` file of this writer's shape
    pub fn write_from_raw(&self, path: impl AsRef<Path>, raw_path: impl AsRef<Path>) -> Result<()> {
        let raw = File::open(raw_path.as_ref())?;
        let expected = self.shape.len() as u64 * 4;
        let actual = raw.metadata()?.len();
        if actual != expected {
            return Err(SegyError::InvalidFormat(format!(
                "raw file holds {actual} bytes, shape {} needs {expected}",
                self.shape
            )));
        }

        let mut raw = BufReader::new(raw);
        let mut bytes = vec![0u8; self.shape.n_samples * 4];
        self.write_file(path.as_ref(), |_, _, out| {
            raw.read_exact(&mut bytes)?;
            f32_from_le_bytes(&bytes, out)
        })
    }

    fn write_file<F>(&self, path: &Path, next_trace: F) -> Result<()>
    where
        F: FnMut(usize, usize, &mut [f32]) -> Result<()>,
    {
        let file = File::create(path)?;
        self.write_to(file, next_trace)?;
        info!(
            path = %path.display(),
            shape = %self.shape,
            format = self.format().code(),
            dt = self.sample_interval(),
            "created SEG-Y file"
        );
        Ok(())
    }
}

/// Write `data` as a new file at `path` reusing every header of the file at
/// `template`.
///
/// The template is scanned with `iline`/`xline` as its line locations and
/// `data` must match its shape `(inline, crossline, sample)` exactly. Traces
/// keep the template's on-disk order; gaps in an irregular template are
/// skipped.
pub fn create_by_sharing_header(
    path: impl AsRef<Path>,
    template: impl AsRef<Path>,
    data: ArrayView3<f32>,
    iline: usize,
    xline: usize,
) -> Result<()> {
    let config = SegyConfig::default().with_line_locations(iline, xline);
    let mut template = SegyFile::open_with_config(template.as_ref(), config)?;
    template.scan()?;
    let geometry = template.shared_geometry().ok_or(SegyError::NotScanned)?;

    let shape = geometry.shape();
    if data.dim() != shape.dims() {
        return Err(SegyError::InvalidFormat(format!(
            "array of shape {:?} does not match template shape {shape}",
            data.dim()
        )));
    }
    let data = data.as_standard_layout();
    let flat = data
        .as_slice()
        .ok_or_else(|| SegyError::InvalidDimensions("volume is not contiguous".to_string()))?;

    let ns = shape.n_samples;
    let codec = get_codec(template.format());
    let mut sink = BufWriter::new(File::create(path.as_ref())?);

    sink.write_all(&template.textual_header_bytes()?)?;
    sink.write_all(template.binary_header().as_bytes())?;

    let mut buf = BytesMut::with_capacity(TRACE_HEADER_SIZE + ns * 4);
    for ordinal in 0..template.trace_count() {
        let header = template.trace_header_at(ordinal)?;
        let key = TraceKey::new(header.location(iline)?, header.location(xline)?);
        let (il, xl) = geometry.position_of(key).ok_or_else(|| {
            SegyError::InvalidFormat(format!(
                "trace {ordinal} key ({}, {}) outside the template geometry",
                key.inline, key.crossline
            ))
        })?;
        let start = (il * shape.n_crossline + xl) * ns;

        buf.clear();
        buf.extend_from_slice(header.as_bytes());
        codec.encode(&flat[start..start + ns], &mut buf);
        sink.write_all(&buf)?;
    }
    sink.flush()?;

    debug!(traces = template.trace_count(), "copied template headers");
    info!(
        path = %path.as_ref().display(),
        %shape,
        format = template.format().code(),
        "created SEG-Y file from template headers"
    );
    Ok(())
}
