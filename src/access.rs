//! Volume access - main API for reading SEG-Y volumes

use crate::codec::{get_codec, SampleFormat};
use crate::config::{HeaderLocations, SegyConfig};
use crate::error::{Result, SegyError};
use crate::geometry::{Geometry, ScanOptions};
use crate::header::{BinaryHeader, TraceHeader};
use crate::io::{TraceLayout, TraceReader};
use crate::metadata::MetaInfo;
use crate::text::decode_textual_header;
use crate::types::{Shape, SubVolume};
use crate::utils::f32_to_le_bytes;
use crate::{DATA_OFFSET, TEXTUAL_HEADER_SIZE};
use ndarray::{Array1, Array2, Array3, Axis};
use std::fs::File;
use std::io::{BufWriter, Read, Seek, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Upper bound on the bytes fetched by one sequential multi-trace read
const RUN_BYTES: u64 = 8 << 20;

/// Every trace of a file in on-disk order
#[derive(Debug, Clone)]
pub struct Collected {
    /// `(trace_count, n_samples)` samples
    pub samples: Array2<f32>,
    /// `(trace_count, 4)` inline, crossline, X, Y per trace
    pub headers: Array2<i32>,
}

/// An open SEG-Y file.
///
/// The handle owns the stream; dropping it (or calling [`SegyFile::close`])
/// releases the file. Reads need `&mut self` because they move the stream
/// position, so one handle serves one thread. Parallel readers open their
/// own handles and can share a scanned [`Geometry`] through
/// [`SegyFile::attach_geometry`].
///
/// Creation settings (start time, X/Y interval, first inline and crossline
/// numbers) live on [`crate::SegyWriter`].
pub struct SegyFile<R = File> {
    reader: TraceReader<R>,
    config: SegyConfig,
    binary_header: BinaryHeader,
    layout: TraceLayout,
    sample_interval: u16,
    format: SampleFormat,
    trace_count: u64,
    geometry: Option<Arc<Geometry>>,
}

impl SegyFile<File> {
    /// Open an existing file with the default configuration
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, SegyConfig::default())
    }

    /// Open an existing file
    pub fn open_with_config(path: impl AsRef<Path>, config: SegyConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let segy = Self::from_reader(file, config)?;
        info!(
            path = %path.display(),
            samples = segy.layout.n_samples,
            dt = segy.sample_interval,
            format = segy.format.code(),
            traces = segy.trace_count,
            "opened SEG-Y file"
        );
        Ok(segy)
    }

    /// Open a file whose traces are known to be stored inline-major without
    /// gaps. Skips the geometry scan; line numbers start at the configured
    /// minimum inline/crossline.
    pub fn open_with_shape(
        path: impl AsRef<Path>,
        shape: Shape,
        config: SegyConfig,
    ) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader_with_shape(file, shape, config)
    }
}

impl<R: Read + Seek> SegyFile<R> {
    /// Wrap any seekable stream holding a SEG-Y file
    pub fn from_reader(inner: R, config: SegyConfig) -> Result<Self> {
        config.validate()?;

        let mut reader = TraceReader::new(inner)?;
        if reader.len() < DATA_OFFSET {
            return Err(SegyError::Truncated {
                expected: DATA_OFFSET,
                actual: reader.len(),
            });
        }

        let binary_header = reader.binary_header()?;

        let n_samples = match config.sample_count {
            Some(ns) => ns,
            None => usize::from(binary_header.sample_count()),
        };
        if n_samples == 0 {
            return Err(SegyError::InvalidFormat(
                "binary header declares zero samples per trace".to_string(),
            ));
        }

        let format = match config.format {
            Some(format) => format,
            None => binary_header.sample_format()?,
        };
        let sample_interval = config
            .sample_interval
            .unwrap_or_else(|| binary_header.sample_interval());

        let layout = TraceLayout::new(n_samples);
        let trace_count = layout.trace_count(reader.len())?;

        debug!(n_samples, trace_count, ?format, "parsed binary header");

        Ok(Self {
            reader,
            config,
            binary_header,
            layout,
            sample_interval,
            format,
            trace_count,
            geometry: None,
        })
    }

    /// Wrap a stream with a known inline-major shape, skipping the scan
    pub fn from_reader_with_shape(inner: R, shape: Shape, config: SegyConfig) -> Result<Self> {
        let config = config.with_sample_count(shape.n_samples);
        let mut segy = Self::from_reader(inner, config)?;
        let geometry = Geometry::from_shape(
            shape,
            segy.config.min_inline,
            segy.config.min_crossline,
            segy.trace_count,
            segy.config.locations,
        )?;
        segy.geometry = Some(Arc::new(geometry));
        Ok(segy)
    }

    pub fn config(&self) -> &SegyConfig {
        &self.config
    }

    pub fn get_ref(&self) -> &R {
        self.reader.get_ref()
    }

    /// Release the file
    pub fn close(self) {
        drop(self);
    }

    fn update_locations<F>(&mut self, update: F) -> Result<()>
    where
        F: FnOnce(&mut HeaderLocations),
    {
        let mut locations = self.config.locations;
        update(&mut locations);
        locations.validate()?;

        let keys_moved = locations.inline != self.config.locations.inline
            || locations.crossline != self.config.locations.crossline;
        self.config.locations = locations;

        if keys_moved && self.geometry.take().is_some() {
            debug!("line locations changed, geometry discarded");
        }
        Ok(())
    }

    /// Move the inline key. Discards any scanned geometry.
    pub fn set_inline_location(&mut self, offset: usize) -> Result<()> {
        self.update_locations(|l| l.inline = offset)
    }

    /// Move the crossline key. Discards any scanned geometry.
    pub fn set_crossline_location(&mut self, offset: usize) -> Result<()> {
        self.update_locations(|l| l.crossline = offset)
    }

    pub fn set_x_location(&mut self, offset: usize) -> Result<()> {
        self.update_locations(|l| l.x = offset)
    }

    pub fn set_y_location(&mut self, offset: usize) -> Result<()> {
        self.update_locations(|l| l.y = offset)
    }

    /// Value returned for positions with no trace
    pub fn set_fill_value(&mut self, fill_value: f32) {
        self.config.fill_value = fill_value;
    }

    /// Override the sample interval reported by the binary header
    pub fn set_sample_interval(&mut self, dt: u16) {
        self.config.sample_interval = Some(dt);
        self.sample_interval = dt;
    }

    /// Override the sample format declared by the binary header
    pub fn set_data_format_code(&mut self, code: i64) -> Result<()> {
        let format = SampleFormat::from_code(code)?;
        self.config.format = Some(format);
        self.format = format;
        Ok(())
    }

    pub fn binary_header(&self) -> &BinaryHeader {
        &self.binary_header
    }

    pub fn n_samples(&self) -> usize {
        self.layout.n_samples
    }

    pub fn sample_interval(&self) -> u16 {
        self.sample_interval
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Traces in the file
    pub fn trace_count(&self) -> u64 {
        self.trace_count
    }

    pub fn file_size(&self) -> u64 {
        self.reader.len()
    }

    /// The raw 3200-byte textual header
    pub fn textual_header_bytes(&mut self) -> Result<[u8; TEXTUAL_HEADER_SIZE]> {
        self.reader.textual_header()
    }

    /// The textual header decoded to 40 lines of 80 columns
    pub fn textual_header(&mut self) -> Result<String> {
        let raw = self.reader.textual_header()?;
        Ok(decode_textual_header(&raw).0)
    }

    /// Build the geometry index from the trace headers.
    ///
    /// Any previous geometry is dropped first, so a failed scan leaves the
    /// handle unscanned.
    pub fn scan(&mut self) -> Result<&Geometry> {
        self.geometry = None;
        let options = ScanOptions {
            locations: self.config.locations,
            strict: self.config.strict,
        };
        let geometry = Geometry::scan(&mut self.reader, &self.layout, &options)?;
        let geometry = self.geometry.insert(Arc::new(geometry));
        Ok(&**geometry)
    }

    pub fn is_scanned(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_deref()
    }

    /// The geometry, for sharing with other handles over the same file
    pub fn shared_geometry(&self) -> Option<Arc<Geometry>> {
        self.geometry.clone()
    }

    /// Use a geometry scanned by another handle (or loaded from disk)
    /// instead of scanning. Its header locations replace the configured
    /// inline/crossline locations.
    pub fn attach_geometry(&mut self, geometry: Arc<Geometry>) -> Result<()> {
        if geometry.trace_count() != self.trace_count
            || geometry.n_samples() != self.layout.n_samples
        {
            return Err(SegyError::Configuration(format!(
                "geometry describes {} traces of {} samples, file has {} traces of {} samples",
                geometry.trace_count(),
                geometry.n_samples(),
                self.trace_count,
                self.layout.n_samples
            )));
        }
        let locations = geometry.locations();
        self.config.locations.inline = locations.inline;
        self.config.locations.crossline = locations.crossline;
        self.geometry = Some(geometry);
        Ok(())
    }

    /// Logical shape (inline, crossline, sample)
    pub fn shape(&self) -> Result<Shape> {
        Ok(self.require_geometry()?.shape())
    }

    fn require_geometry(&self) -> Result<Arc<Geometry>> {
        self.geometry.clone().ok_or(SegyError::NotScanned)
    }

    /// Validate `sub` against the scanned shape before any I/O
    fn checked_box(&self, sub: &SubVolume) -> Result<Arc<Geometry>> {
        let geometry = self.require_geometry()?;
        sub.validate(&geometry.shape())?;
        Ok(geometry)
    }

    /// Read the whole volume as `(inline, crossline, sample)`
    pub fn read_volume(&mut self) -> Result<Array3<f32>> {
        let shape = self.shape()?;
        self.read_subvolume(&SubVolume::full(&shape))
    }

    /// Read a box of the volume
    pub fn read_subvolume(&mut self, sub: &SubVolume) -> Result<Array3<f32>> {
        let geometry = self.checked_box(sub)?;
        let mut data = zeroed(sub.len())?;
        self.fill_box(&geometry, sub, &mut data)?;
        Array3::from_shape_vec(sub.shape(), data)
            .map_err(|e| SegyError::InvalidDimensions(e.to_string()))
    }

    /// Read a box of the volume into `out`, inline-major with samples
    /// fastest. Nothing is read and `out` is untouched if the box or the
    /// buffer length is invalid.
    pub fn read_subvolume_into(&mut self, sub: &SubVolume, out: &mut [f32]) -> Result<()> {
        let geometry = self.checked_box(sub)?;
        if out.len() != sub.len() {
            return Err(SegyError::OutOfRange(format!(
                "output buffer holds {} values, box needs {}",
                out.len(),
                sub.len()
            )));
        }
        self.fill_box(&geometry, sub, out)
    }

    /// One inline as `(crossline, sample)`
    pub fn read_inline(&mut self, il: usize) -> Result<Array2<f32>> {
        let shape = self.shape()?;
        let sub = SubVolume::new(
            il..il.saturating_add(1),
            0..shape.n_crossline,
            0..shape.n_samples,
        );
        Ok(self.read_subvolume(&sub)?.index_axis_move(Axis(0), 0))
    }

    /// One crossline as `(inline, sample)`
    pub fn read_crossline(&mut self, xl: usize) -> Result<Array2<f32>> {
        let shape = self.shape()?;
        let sub = SubVolume::new(
            0..shape.n_inline,
            xl..xl.saturating_add(1),
            0..shape.n_samples,
        );
        Ok(self.read_subvolume(&sub)?.index_axis_move(Axis(1), 0))
    }

    /// One time (depth) slice as `(inline, crossline)`
    pub fn read_time_slice(&mut self, z: usize) -> Result<Array2<f32>> {
        let shape = self.shape()?;
        let sub = SubVolume::new(
            0..shape.n_inline,
            0..shape.n_crossline,
            z..z.saturating_add(1),
        );
        Ok(self.read_subvolume(&sub)?.index_axis_move(Axis(2), 0))
    }

    /// The samples of the trace at logical position (`il`, `xl`)
    pub fn read_trace(&mut self, il: usize, xl: usize) -> Result<Array1<f32>> {
        let ns = self.layout.n_samples;
        let sub = SubVolume::new(il..il.saturating_add(1), xl..xl.saturating_add(1), 0..ns);
        let mut data = vec![0.0f32; ns];
        self.read_subvolume_into(&sub, &mut data)?;
        Ok(Array1::from_vec(data))
    }

    /// Header of the trace at logical position (`il`, `xl`); `None` for a
    /// gap in irregular geometry
    pub fn trace_header(&mut self, il: usize, xl: usize) -> Result<Option<TraceHeader>> {
        let geometry = self.require_geometry()?;
        let shape = geometry.shape();
        if il >= shape.n_inline || xl >= shape.n_crossline {
            return Err(SegyError::OutOfRange(format!(
                "position ({il}, {xl}) outside {} x {} traces",
                shape.n_inline, shape.n_crossline
            )));
        }
        match geometry.ordinal(il, xl) {
            Some(ordinal) => Ok(Some(self.trace_header_at(ordinal)?)),
            None => Ok(None),
        }
    }

    /// Header of the trace stored at position `ordinal` in the file
    pub fn trace_header_at(&mut self, ordinal: u64) -> Result<TraceHeader> {
        if ordinal >= self.trace_count {
            return Err(SegyError::OutOfRange(format!(
                "trace {ordinal} beyond the {} traces in the file",
                self.trace_count
            )));
        }
        self.reader.trace_header(&self.layout, ordinal)
    }

    /// Decode `sub` into `out`. The box has been validated.
    fn fill_box(&mut self, geometry: &Geometry, sub: &SubVolume, out: &mut [f32]) -> Result<()> {
        let codec = get_codec(self.format);
        let fill = self.config.fill_value;
        let nz = sub.samples.len();
        let ny = sub.crosslines.len();

        // Whole traces stored back to back can be fetched in one read.
        let whole_traces = nz == self.layout.n_samples;
        let max_run = (RUN_BYTES / self.layout.stride()).max(1) as usize;
        let mut scratch = Vec::new();

        for (row, il) in out.chunks_exact_mut(ny * nz).zip(sub.inlines.clone()) {
            let mut xl = sub.crosslines.start;
            while xl < sub.crosslines.end {
                let at = (xl - sub.crosslines.start) * nz;

                let Some(first) = geometry.ordinal(il, xl) else {
                    row[at..at + nz].fill(fill);
                    xl += 1;
                    continue;
                };

                let mut run = 1;
                if whole_traces {
                    while run < max_run
                        && xl + run < sub.crosslines.end
                        && geometry.ordinal(il, xl + run) == Some(first + run as u64)
                    {
                        run += 1;
                    }
                }

                let dst = &mut row[at..at + run * nz];
                if run > 1 {
                    self.reader.read_trace_run(
                        &self.layout,
                        codec.as_ref(),
                        first,
                        run,
                        &mut scratch,
                        dst,
                    )?;
                } else {
                    self.reader.read_samples(
                        &self.layout,
                        codec.as_ref(),
                        first,
                        sub.samples.clone(),
                        &mut scratch,
                        dst,
                    )?;
                }
                xl += run;
            }
        }
        Ok(())
    }

    /// Every trace in file order with its inline, crossline, X and Y.
    /// Does not need a scanned geometry.
    pub fn collect(&mut self) -> Result<Collected> {
        let count = self.trace_count as usize;
        let ns = self.layout.n_samples;
        let locations = self.config.locations;
        let codec = get_codec(self.format);

        let mut samples = Vec::with_capacity(count * ns);
        let mut headers = Vec::with_capacity(count * 4);

        self.reader
            .for_each_trace(&self.layout, codec.as_ref(), |_, header, values| {
                samples.extend_from_slice(values);
                headers.extend_from_slice(&[
                    header.location(locations.inline)?,
                    header.location(locations.crossline)?,
                    header.location(locations.x)?,
                    header.location(locations.y)?,
                ]);
                Ok(())
            })?;

        Ok(Collected {
            samples: Array2::from_shape_vec((count, ns), samples)
                .map_err(|e| SegyError::InvalidDimensions(e.to_string()))?,
            headers: Array2::from_shape_vec((count, 4), headers)
                .map_err(|e| SegyError::InvalidDimensions(e.to_string()))?,
        })
    }

    /// Summary of the file and, once scanned, its geometry
    pub fn meta_info(&mut self) -> Result<MetaInfo> {
        let raw = self.reader.textual_header()?;
        let (_, textual_encoding) = decode_textual_header(&raw);
        let geometry = self.geometry.as_deref();

        Ok(MetaInfo {
            shape: geometry.map(Geometry::shape),
            n_samples: self.layout.n_samples,
            sample_interval: self.sample_interval,
            format: self.format,
            inline_range: geometry.map(Geometry::inline_range),
            crossline_range: geometry.map(Geometry::crossline_range),
            trace_count: self.trace_count,
            regular: geometry.map(Geometry::is_regular),
            missing_traces: geometry.map_or(0, Geometry::missing_count),
            locations: self.config.locations,
            fill_value: self.config.fill_value,
            textual_encoding,
            file_size: self.reader.len(),
            binary_header: self
                .binary_header
                .named_fields()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        })
    }

    /// Write the volume as headerless little-endian `f32`, inline-major,
    /// one inline at a time
    pub fn export_raw(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let shape = self.shape()?;
        let mut out = BufWriter::new(File::create(path.as_ref())?);
        let mut inline = vec![0.0f32; shape.n_crossline * shape.n_samples];
        let mut bytes = Vec::with_capacity(inline.len() * 4);

        for il in 0..shape.n_inline {
            let sub = SubVolume::new(il..il + 1, 0..shape.n_crossline, 0..shape.n_samples);
            self.read_subvolume_into(&sub, &mut inline)?;
            bytes.clear();
            f32_to_le_bytes(&inline, &mut bytes);
            out.write_all(&bytes)?;
        }
        out.flush()?;

        info!(path = %path.as_ref().display(), %shape, "exported raw volume");
        Ok(())
    }
}

/// Zero-filled sample buffer, failing instead of aborting when the
/// allocation cannot be made
fn zeroed(len: usize) -> Result<Vec<f32>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| {
        SegyError::InvalidDimensions(format!("cannot allocate {len} samples: {e}"))
    })?;
    data.resize(len, 0.0);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::SegyWriter;
    use std::io::Cursor;

    fn synthetic(shape: Shape) -> Vec<f32> {
        (0..shape.len()).map(|i| i as f32 * 0.5 - 3.0).collect()
    }

    fn in_memory(shape: Shape, config: SegyConfig) -> (SegyFile<Cursor<Vec<u8>>>, Vec<f32>) {
        let data = synthetic(shape);
        let writer = SegyWriter::with_config(shape, config.clone()).unwrap();
        let mut bytes = Vec::new();
        writer
            .write_to(&mut bytes, |il, xl, out| {
                let start = (il * shape.n_crossline + xl) * shape.n_samples;
                out.copy_from_slice(&data[start..start + shape.n_samples]);
                Ok(())
            })
            .unwrap();
        (SegyFile::from_reader(Cursor::new(bytes), config).unwrap(), data)
    }

    #[test]
    fn test_open_reads_binary_header() {
        let shape = Shape::new(3, 2, 4).unwrap();
        let (segy, _) = in_memory(shape, SegyConfig::new().with_sample_interval(2000));
        assert_eq!(segy.n_samples(), 4);
        assert_eq!(segy.sample_interval(), 2000);
        assert_eq!(segy.format(), SampleFormat::IeeeFloat);
        assert_eq!(segy.trace_count(), 6);
        assert!(!segy.is_scanned());
    }

    #[test]
    fn test_reads_require_scan() {
        let shape = Shape::new(2, 2, 3).unwrap();
        let (mut segy, _) = in_memory(shape, SegyConfig::new());
        assert!(matches!(segy.read_volume(), Err(SegyError::NotScanned)));
        segy.scan().unwrap();
        assert_eq!(segy.shape().unwrap(), shape);
    }

    #[test]
    fn test_slices_match_volume() {
        let shape = Shape::new(4, 3, 5).unwrap();
        let (mut segy, data) = in_memory(shape, SegyConfig::new());
        segy.scan().unwrap();

        let volume = segy.read_volume().unwrap();
        assert_eq!(volume.as_slice().unwrap(), &data[..]);

        let inline = segy.read_inline(2).unwrap();
        assert_eq!(inline, volume.index_axis(Axis(0), 2));

        let crossline = segy.read_crossline(1).unwrap();
        assert_eq!(crossline, volume.index_axis(Axis(1), 1));

        let time = segy.read_time_slice(4).unwrap();
        assert_eq!(time, volume.index_axis(Axis(2), 4));

        let trace = segy.read_trace(3, 2).unwrap();
        assert_eq!(trace, volume.index_axis(Axis(0), 3).index_axis(Axis(0), 2));
    }

    #[test]
    fn test_partial_samples_box() {
        let shape = Shape::new(3, 3, 6).unwrap();
        let (mut segy, _) = in_memory(shape, SegyConfig::new());
        segy.scan().unwrap();

        let volume = segy.read_volume().unwrap();
        let sub = SubVolume::new(1..3, 0..2, 2..5);
        let part = segy.read_subvolume(&sub).unwrap();
        assert_eq!(part.dim(), (2, 2, 3));
        assert_eq!(part, volume.slice(ndarray::s![1..3, 0..2, 2..5]));
    }

    #[test]
    fn test_out_of_range_reads() {
        let shape = Shape::new(3, 2, 4).unwrap();
        let (mut segy, _) = in_memory(shape, SegyConfig::new());
        segy.scan().unwrap();

        assert!(matches!(segy.read_inline(3), Err(SegyError::OutOfRange(_))));
        assert!(matches!(segy.read_crossline(2), Err(SegyError::OutOfRange(_))));
        assert!(matches!(segy.read_time_slice(4), Err(SegyError::OutOfRange(_))));
        assert!(matches!(segy.read_trace(0, 5), Err(SegyError::OutOfRange(_))));

        let mut short = vec![7.0f32; 3];
        let err = segy
            .read_subvolume_into(&SubVolume::full(&shape), &mut short)
            .unwrap_err();
        assert!(matches!(err, SegyError::OutOfRange(_)));
        assert_eq!(short, vec![7.0; 3]);
    }

    #[test]
    fn test_trace_headers() {
        let shape = Shape::new(2, 3, 2).unwrap();
        let config = SegyConfig::new().with_min_lines(50, 10);
        let (mut segy, _) = in_memory(shape, config);
        segy.scan().unwrap();

        let header = segy.trace_header(1, 2).unwrap().unwrap();
        assert_eq!(header.location(189).unwrap(), 51);
        assert_eq!(header.location(193).unwrap(), 12);
        assert!(segy.trace_header(2, 0).is_err());
        assert!(segy.trace_header_at(6).is_err());
    }

    #[test]
    fn test_changing_line_location_discards_geometry() {
        let shape = Shape::new(2, 2, 2).unwrap();
        let (mut segy, _) = in_memory(shape, SegyConfig::new());
        segy.scan().unwrap();

        segy.set_fill_value(1.0);
        segy.set_x_location(181).unwrap();
        assert!(segy.is_scanned());

        segy.set_inline_location(9).unwrap();
        assert!(!segy.is_scanned());
        assert!(segy.set_crossline_location(11).is_err());
        assert!(segy.set_crossline_location(238).is_err());
    }

    #[test]
    fn test_format_override() {
        let shape = Shape::new(1, 1, 2).unwrap();
        let (mut segy, _) = in_memory(shape, SegyConfig::new());
        assert!(segy.set_data_format_code(2).is_err());
        segy.set_data_format_code(1).unwrap();
        assert_eq!(segy.format(), SampleFormat::IbmFloat);
    }

    #[test]
    fn test_collect() {
        let shape = Shape::new(2, 2, 3).unwrap();
        let config = SegyConfig::new().with_intervals(10.0, 20.0).with_origin(1000.0, 2000.0);
        let (mut segy, data) = in_memory(shape, config);

        let collected = segy.collect().unwrap();
        assert_eq!(collected.samples.dim(), (4, 3));
        assert_eq!(collected.samples.as_slice().unwrap(), &data[..]);
        assert_eq!(collected.headers.dim(), (4, 4));
        assert_eq!(collected.headers.row(3).to_vec(), vec![2, 2, 1010, 2020]);
    }

    #[test]
    fn test_meta_info() {
        let shape = Shape::new(3, 2, 4).unwrap();
        let (mut segy, _) = in_memory(shape, SegyConfig::new());

        let before = segy.meta_info().unwrap();
        assert!(before.shape.is_none());

        segy.scan().unwrap();
        let info = segy.meta_info().unwrap();
        assert_eq!(info.shape, Some(shape));
        assert_eq!(info.trace_count, 6);
        assert_eq!(info.regular, Some(true));
        assert_eq!(info.sample_interval, 4000);
        assert!(info
            .binary_header
            .contains(&("Samples per trace (ns)".to_string(), 4)));
    }

    #[test]
    fn test_attach_geometry() {
        let shape = Shape::new(2, 3, 4).unwrap();
        let (mut first, data) = in_memory(shape, SegyConfig::new());
        first.scan().unwrap();
        let geometry = first.shared_geometry().unwrap();

        let (mut second, _) = in_memory(shape, SegyConfig::new());
        second.attach_geometry(Arc::clone(&geometry)).unwrap();
        assert_eq!(second.read_volume().unwrap().as_slice().unwrap(), &data[..]);

        let other = Shape::new(2, 3, 5).unwrap();
        let (mut mismatched, _) = in_memory(other, SegyConfig::new());
        assert!(mismatched.attach_geometry(geometry).is_err());
    }

    #[test]
    fn test_truncated_and_bad_format() {
        let err = SegyFile::from_reader(Cursor::new(vec![0u8; 100]), SegyConfig::new())
            .err()
            .unwrap();
        assert!(matches!(err, SegyError::Truncated { .. }));

        // Zeroed binary header: no sample count.
        let err = SegyFile::from_reader(Cursor::new(vec![0u8; 3600]), SegyConfig::new())
            .err()
            .unwrap();
        assert!(matches!(err, SegyError::InvalidFormat(_)));

        // Sample count given but format code 0.
        let err = SegyFile::from_reader(
            Cursor::new(vec![0u8; 3600]),
            SegyConfig::new().with_sample_count(4),
        )
        .err()
        .unwrap();
        assert!(matches!(err, SegyError::UnsupportedFormatCode(0)));
    }
}
