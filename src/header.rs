//! Binary file header and trace header schema.
//!
//! Both headers are flat blocks of big-endian integers addressed by 1-based
//! byte offsets, the way the SEG-Y standard documents them. Fields are 2 bytes
//! wide unless listed in the 4- or 8-byte override sets below.

use crate::codec::SampleFormat;
use crate::error::{Result, SegyError};
use crate::{BINARY_HEADER_SIZE, TRACE_HEADER_SIZE};
use bytes::{Buf, BufMut};

/// A named field of a header block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderField {
    /// 1-based byte offset
    pub offset: usize,
    /// Width in bytes
    pub width: usize,
    pub name: &'static str,
}

/// Binary header byte offsets used by the engine.
pub mod binary {
    pub const JOB_ID: usize = 1;
    pub const LINE_NUMBER: usize = 5;
    pub const REEL_NUMBER: usize = 9;
    pub const TRACES_PER_ENSEMBLE: usize = 13;
    pub const SAMPLE_INTERVAL: usize = 17;
    pub const SAMPLE_INTERVAL_ORIGINAL: usize = 19;
    pub const SAMPLE_COUNT: usize = 21;
    pub const SAMPLE_COUNT_ORIGINAL: usize = 23;
    pub const FORMAT_CODE: usize = 25;
    pub const ENSEMBLE_FOLD: usize = 27;
    pub const SORTING_CODE: usize = 29;
    pub const MEASUREMENT_SYSTEM: usize = 55;
    pub const REVISION: usize = 301;
    pub const FIXED_LENGTH: usize = 303;
    pub const EXTENDED_HEADERS: usize = 305;
}

/// Trace header byte offsets used by the engine.
pub mod trace {
    pub const SEQUENCE_IN_LINE: usize = 1;
    pub const SEQUENCE_IN_FILE: usize = 5;
    pub const FIELD_RECORD: usize = 9;
    pub const TRACE_IN_RECORD: usize = 13;
    pub const ENSEMBLE_NUMBER: usize = 21;
    pub const TRACE_ID: usize = 29;
    pub const COORDINATE_SCALAR: usize = 71;
    pub const SOURCE_X: usize = 73;
    pub const SOURCE_Y: usize = 77;
    pub const COORDINATE_UNITS: usize = 89;
    pub const DELAY_TIME: usize = 109;
    pub const SAMPLE_COUNT: usize = 115;
    pub const SAMPLE_INTERVAL: usize = 117;
    pub const CDP_X: usize = 181;
    pub const CDP_Y: usize = 185;
    pub const INLINE: usize = 189;
    pub const CROSSLINE: usize = 193;
}

const BINARY_4_BYTE: &[usize] = &[1, 5, 9, 307, 329];
const BINARY_8_BYTE: &[usize] = &[313, 321];
const TRACE_4_BYTE: &[usize] = &[
    1, 5, 9, 13, 17, 21, 25, 37, 41, 45, 49, 53, 57, 61, 65, 73, 77, 81, 85, 181, 185, 189, 193,
    197,
];

#[rustfmt::skip]
const BINARY_FIELD_NAMES: &[(usize, &str)] = &[
    (1, "Job ID"),
    (5, "Line number"),
    (9, "Reel number"),
    (13, "Traces per ensemble"),
    (15, "Auxiliary traces per ensemble"),
    (17, "Sample interval (dt)"),
    (19, "Sample interval of original recording"),
    (21, "Samples per trace (ns)"),
    (23, "Samples per trace of original recording"),
    (25, "Data sample format code (1-IBM, 5-IEEE)"),
    (27, "Ensemble fold"),
    (29, "Trace sorting code"),
    (31, "Vertical sum code"),
    (33, "Sweep frequency at start (Hz)"),
    (35, "Sweep frequency at end (Hz)"),
    (37, "Sweep length (ms)"),
    (39, "Sweep type code"),
    (41, "Trace number of sweep channel"),
    (43, "Sweep trace taper length at start (ms)"),
    (45, "Sweep trace taper length at end (ms)"),
    (47, "Taper type"),
    (49, "Correlated data traces"),
    (51, "Binary gain recovered"),
    (53, "Amplitude recovery method"),
    (55, "Measurement system"),
    (57, "Impulse signal polarity"),
    (59, "Vibratory polarity code"),
    (301, "SEG-Y format revision number"),
    (303, "Fixed length trace flag"),
    (305, "Number of extended textual file headers"),
    (307, "Max number of additional trace headers"),
    (311, "Time basis code"),
    (313, "Number of traces in this file"),
    (321, "Byte offset of first trace"),
    (329, "Number of data trailer stanzas"),
];

#[rustfmt::skip]
const TRACE_FIELD_NAMES: &[(usize, &str)] = &[
    (1, "Trace sequence number within line"),
    (5, "Trace sequence number within file"),
    (9, "Original field record number"),
    (13, "Trace number within the original field record"),
    (17, "Energy source point number"),
    (21, "Ensemble number"),
    (25, "Trace number within the ensemble"),
    (29, "Trace identification code"),
    (31, "Number of vertically summed traces"),
    (33, "Number of horizontally stacked traces"),
    (35, "Data use"),
    (37, "Source to receiver group distance"),
    (41, "Elevation of receiver group"),
    (45, "Surface elevation at source"),
    (49, "Source depth below surface"),
    (53, "Datum elevation at receiver group"),
    (57, "Datum elevation at source"),
    (61, "Water column height at source"),
    (65, "Water column height at receiver group"),
    (69, "Scalar for elevations and depths"),
    (71, "Scalar for coordinates"),
    (73, "Source coordinate X"),
    (77, "Source coordinate Y"),
    (81, "Group coordinate X"),
    (85, "Group coordinate Y"),
    (89, "Coordinate units"),
    (91, "Weathering velocity"),
    (93, "Subweathering velocity"),
    (95, "Uphole time at source (ms)"),
    (97, "Uphole time at group (ms)"),
    (99, "Source static correction (ms)"),
    (101, "Group static correction (ms)"),
    (103, "Total static applied (ms)"),
    (105, "Lag time A"),
    (107, "Lag time B"),
    (109, "Delay recording time"),
    (111, "Mute time start (ms)"),
    (113, "Mute time end (ms)"),
    (115, "Number of samples in this trace"),
    (117, "Sample interval for this trace"),
    (119, "Gain type of field instruments"),
    (121, "Instrument gain constant"),
    (123, "Instrument early or initial gain"),
    (125, "Correlated"),
    (127, "Sweep frequency at start"),
    (129, "Sweep frequency at end"),
    (131, "Sweep length (ms)"),
    (133, "Sweep type"),
    (135, "Sweep trace taper length at start (ms)"),
    (137, "Sweep trace taper length at end (ms)"),
    (139, "Taper type"),
    (141, "Alias filter frequency (Hz)"),
    (143, "Alias filter slope (dB/octave)"),
    (145, "Notch filter frequency (Hz)"),
    (147, "Notch filter slope (dB/octave)"),
    (149, "Low-cut frequency (Hz)"),
    (151, "High-cut frequency (Hz)"),
    (153, "Low-cut slope (dB/octave)"),
    (155, "High-cut slope (dB/octave)"),
    (157, "Year data recorded"),
    (159, "Day of year"),
    (161, "Hour of day"),
    (163, "Minute of hour"),
    (165, "Second of minute"),
    (167, "Time basis code"),
    (169, "Trace weighting factor"),
    (171, "Geophone group number of roll switch position one"),
    (173, "Geophone group number of first trace"),
    (175, "Geophone group number of last trace"),
    (177, "Gap size"),
    (179, "Over travel associated with taper"),
    (181, "CDP X coordinate"),
    (185, "CDP Y coordinate"),
    (189, "In-line number"),
    (193, "Cross-line number"),
    (197, "Shotpoint number"),
    (201, "Scalar for shotpoint number"),
    (203, "Trace value measurement unit"),
    (211, "Transduction units"),
    (213, "Device/trace identifier"),
    (215, "Scalar for times"),
    (217, "Source type/orientation"),
    (231, "Source measurement unit"),
];

/// Width of the binary header field at `offset`
pub fn binary_field_width(offset: usize) -> usize {
    if BINARY_8_BYTE.contains(&offset) {
        8
    } else if BINARY_4_BYTE.contains(&offset) {
        4
    } else {
        2
    }
}

/// Width of the trace header field at `offset`
pub fn trace_field_width(offset: usize) -> usize {
    if TRACE_4_BYTE.contains(&offset) {
        4
    } else {
        2
    }
}

/// Named fields of the binary header
pub fn binary_fields() -> impl Iterator<Item = HeaderField> {
    BINARY_FIELD_NAMES.iter().map(|&(offset, name)| HeaderField {
        offset,
        width: binary_field_width(offset),
        name,
    })
}

/// Named fields of the trace header
pub fn trace_fields() -> impl Iterator<Item = HeaderField> {
    TRACE_FIELD_NAMES.iter().map(|&(offset, name)| HeaderField {
        offset,
        width: trace_field_width(offset),
        name,
    })
}

fn check_span(block_len: usize, offset: usize, width: usize) -> Result<()> {
    if offset == 0 || offset - 1 + width > block_len {
        return Err(SegyError::OutOfRange(format!(
            "field at byte {offset} ({width} bytes) lies outside a {block_len}-byte header"
        )));
    }
    Ok(())
}

/// Read a big-endian signed integer of `width` bytes at 1-based `offset`
pub fn read_field(block: &[u8], offset: usize, width: usize) -> Result<i64> {
    check_span(block.len(), offset, width)?;
    let mut buf = &block[offset - 1..offset - 1 + width];
    match width {
        2 => Ok(i64::from(buf.get_i16())),
        4 => Ok(i64::from(buf.get_i32())),
        8 => Ok(buf.get_i64()),
        other => Err(SegyError::Configuration(format!(
            "unsupported header field width {other}"
        ))),
    }
}

/// Write a big-endian signed integer of `width` bytes at 1-based `offset`.
/// Values are truncated to the field width.
pub fn write_field(block: &mut [u8], offset: usize, width: usize, value: i64) -> Result<()> {
    check_span(block.len(), offset, width)?;
    let mut buf = &mut block[offset - 1..offset - 1 + width];
    match width {
        2 => buf.put_i16(value as i16),
        4 => buf.put_i32(value as i32),
        8 => buf.put_i64(value),
        other => {
            return Err(SegyError::Configuration(format!(
                "unsupported header field width {other}"
            )))
        }
    }
    Ok(())
}

/// The 400-byte binary file header
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryHeader {
    raw: [u8; BINARY_HEADER_SIZE],
}

impl BinaryHeader {
    /// An all-zero header
    pub fn new() -> Self {
        Self {
            raw: [0; BINARY_HEADER_SIZE],
        }
    }

    pub fn from_bytes(raw: [u8; BINARY_HEADER_SIZE]) -> Self {
        Self { raw }
    }

    pub fn as_bytes(&self) -> &[u8; BINARY_HEADER_SIZE] {
        &self.raw
    }

    /// Read the field at `offset` using the schema width
    pub fn field(&self, offset: usize) -> Result<i64> {
        read_field(&self.raw, offset, binary_field_width(offset))
    }

    /// Write the field at `offset` using the schema width
    pub fn set_field(&mut self, offset: usize, value: i64) -> Result<()> {
        write_field(&mut self.raw, offset, binary_field_width(offset), value)
    }

    /// Sample interval in microseconds (or the depth unit)
    pub fn sample_interval(&self) -> u16 {
        self.unsigned(binary::SAMPLE_INTERVAL)
    }

    /// Samples per trace
    pub fn sample_count(&self) -> u16 {
        self.unsigned(binary::SAMPLE_COUNT)
    }

    /// Raw data sample format code
    pub fn format_code(&self) -> i16 {
        i16::from_be_bytes([
            self.raw[binary::FORMAT_CODE - 1],
            self.raw[binary::FORMAT_CODE],
        ])
    }

    /// Data sample format, if supported
    pub fn sample_format(&self) -> Result<SampleFormat> {
        SampleFormat::from_code(i64::from(self.format_code()))
    }

    /// Every named field with its current value
    pub fn named_fields(&self) -> Vec<(&'static str, i64)> {
        binary_fields()
            .filter_map(|f| {
                read_field(&self.raw, f.offset, f.width)
                    .ok()
                    .map(|v| (f.name, v))
            })
            .collect()
    }

    fn unsigned(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.raw[offset - 1], self.raw[offset]])
    }
}

impl Default for BinaryHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BinaryHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryHeader")
            .field("sample_interval", &self.sample_interval())
            .field("sample_count", &self.sample_count())
            .field("format_code", &self.format_code())
            .finish()
    }
}

/// A 240-byte trace header
#[derive(Clone, PartialEq, Eq)]
pub struct TraceHeader {
    raw: [u8; TRACE_HEADER_SIZE],
}

impl TraceHeader {
    pub fn new() -> Self {
        Self {
            raw: [0; TRACE_HEADER_SIZE],
        }
    }

    pub fn from_bytes(raw: [u8; TRACE_HEADER_SIZE]) -> Self {
        Self { raw }
    }

    pub fn as_bytes(&self) -> &[u8; TRACE_HEADER_SIZE] {
        &self.raw
    }

    /// Read the field at `offset` using the schema width
    pub fn field(&self, offset: usize) -> Result<i64> {
        read_field(&self.raw, offset, trace_field_width(offset))
    }

    /// Write the field at `offset` using the schema width
    pub fn set_field(&mut self, offset: usize, value: i64) -> Result<()> {
        write_field(&mut self.raw, offset, trace_field_width(offset), value)
    }

    /// Read a 4-byte integer at a configured location (inline, crossline, X, Y)
    pub fn location(&self, offset: usize) -> Result<i32> {
        read_field(&self.raw, offset, 4).map(|v| v as i32)
    }

    /// Write a 4-byte integer at a configured location
    pub fn set_location(&mut self, offset: usize, value: i32) -> Result<()> {
        write_field(&mut self.raw, offset, 4, i64::from(value))
    }

    /// Samples in this trace as recorded in its header
    pub fn sample_count(&self) -> u16 {
        u16::from_be_bytes([
            self.raw[trace::SAMPLE_COUNT - 1],
            self.raw[trace::SAMPLE_COUNT],
        ])
    }

    /// Every named field with its current value
    pub fn named_fields(&self) -> Vec<(&'static str, i64)> {
        trace_fields()
            .filter_map(|f| {
                read_field(&self.raw, f.offset, f.width)
                    .ok()
                    .map(|v| (f.name, v))
            })
            .collect()
    }
}

impl Default for TraceHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TraceHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceHeader")
            .field("inline", &self.location(trace::INLINE).unwrap_or_default())
            .field(
                "crossline",
                &self.location(trace::CROSSLINE).unwrap_or_default(),
            )
            .field("sample_count", &self.sample_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_widths() {
        assert_eq!(binary_field_width(binary::JOB_ID), 4);
        assert_eq!(binary_field_width(binary::SAMPLE_INTERVAL), 2);
        assert_eq!(binary_field_width(313), 8);
        assert_eq!(binary_field_width(321), 8);
        assert_eq!(trace_field_width(trace::INLINE), 4);
        assert_eq!(trace_field_width(trace::SOURCE_X), 4);
        assert_eq!(trace_field_width(trace::SAMPLE_COUNT), 2);
        assert_eq!(trace_field_width(trace::COORDINATE_SCALAR), 2);
    }

    #[test]
    fn test_schema_tables_fit_blocks() {
        for field in binary_fields() {
            assert!(field.offset - 1 + field.width <= BINARY_HEADER_SIZE, "{field:?}");
        }
        for field in trace_fields() {
            assert!(field.offset - 1 + field.width <= TRACE_HEADER_SIZE, "{field:?}");
        }
    }

    #[test]
    fn test_read_big_endian_fields() {
        let mut block = [0u8; 16];
        block[0..2].copy_from_slice(&(-2i16).to_be_bytes());
        block[2..6].copy_from_slice(&123_456i32.to_be_bytes());
        block[6..14].copy_from_slice(&(-9_000_000_000i64).to_be_bytes());

        assert_eq!(read_field(&block, 1, 2).unwrap(), -2);
        assert_eq!(read_field(&block, 3, 4).unwrap(), 123_456);
        assert_eq!(read_field(&block, 7, 8).unwrap(), -9_000_000_000);
        assert!(read_field(&block, 15, 4).is_err());
        assert!(read_field(&block, 0, 2).is_err());
        assert!(read_field(&block, 1, 3).is_err());
    }

    #[test]
    fn test_binary_header_accessors() {
        let mut header = BinaryHeader::new();
        header.set_field(binary::SAMPLE_INTERVAL, 4000).unwrap();
        header.set_field(binary::SAMPLE_COUNT, 1500).unwrap();
        header.set_field(binary::FORMAT_CODE, 1).unwrap();
        header.set_field(binary::JOB_ID, 77_000).unwrap();

        assert_eq!(header.sample_interval(), 4000);
        assert_eq!(header.sample_count(), 1500);
        assert_eq!(header.sample_format().unwrap(), SampleFormat::IbmFloat);
        assert_eq!(header.field(binary::JOB_ID).unwrap(), 77_000);
        assert_eq!(&header.as_bytes()[16..18], &4000u16.to_be_bytes());

        let fields = header.named_fields();
        assert!(fields.contains(&("Samples per trace (ns)", 1500)));

        header.set_field(binary::FORMAT_CODE, 8).unwrap();
        assert!(matches!(
            header.sample_format(),
            Err(SegyError::UnsupportedFormatCode(8))
        ));
    }

    #[test]
    fn test_unsigned_sample_count() {
        let mut header = BinaryHeader::new();
        header.set_field(binary::SAMPLE_COUNT, 40_000).unwrap();
        assert_eq!(header.sample_count(), 40_000);
    }

    #[test]
    fn test_trace_header_locations() {
        let mut header = TraceHeader::new();
        header.set_location(trace::INLINE, 1200).unwrap();
        header.set_location(trace::CROSSLINE, -5).unwrap();
        header.set_field(trace::SAMPLE_COUNT, 251).unwrap();

        assert_eq!(header.location(trace::INLINE).unwrap(), 1200);
        assert_eq!(header.location(trace::CROSSLINE).unwrap(), -5);
        assert_eq!(header.field(trace::INLINE).unwrap(), 1200);
        assert_eq!(header.sample_count(), 251);
        assert_eq!(&header.as_bytes()[188..192], &1200i32.to_be_bytes());
        assert!(header.location(238).is_err());
    }
}
