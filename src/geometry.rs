//! Survey geometry: the (inline, crossline) -> trace index.
//!
//! The scanner makes one header-only pass over the file, reading the 240-byte
//! trace headers and skipping every sample payload. The resulting
//! [`Geometry`] is immutable and can be shared between handles.

use crate::config::HeaderLocations;
use crate::error::{Result, SegyError};
use crate::io::{TraceLayout, TraceReader};
use crate::types::{LineRange, Shape, TraceKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek};
use std::path::Path;
use tracing::{debug, info};

/// How logical positions resolve to trace ordinals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TraceIndex {
    /// Traces are stored inline-major with every position present, so the
    /// ordinal is computed.
    Sequential,
    /// Explicit map; positions without an entry have no trace.
    Mapped(HashMap<TraceKey, u64>),
}

/// Options for a geometry scan
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    pub locations: HeaderLocations,
    /// Reject traces whose own sample count differs from the file's
    pub strict: bool,
}

/// Shape and trace index of a volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    inline_range: LineRange,
    crossline_range: LineRange,
    n_samples: usize,
    trace_count: u64,
    locations: HeaderLocations,
    index: TraceIndex,
}

impl Geometry {
    /// Scan every trace header of `reader`.
    ///
    /// Fails on duplicate (inline, crossline) keys, on trace sample counts
    /// that disagree with `layout` in strict mode, and on files with no
    /// traces. No geometry is returned on failure.
    pub fn scan<R: Read + Seek>(
        reader: &mut TraceReader<R>,
        layout: &TraceLayout,
        options: &ScanOptions,
    ) -> Result<Self> {
        let trace_count = layout.trace_count(reader.len())?;
        if trace_count == 0 {
            return Err(SegyError::InvalidFormat(
                "file contains no traces".to_string(),
            ));
        }

        let locations = options.locations;
        let mut map: HashMap<TraceKey, u64> = HashMap::with_capacity(trace_count as usize);
        let mut inline_range: Option<LineRange> = None;
        let mut crossline_range: Option<LineRange> = None;

        reader.for_each_header(layout, |ordinal, header| {
            if options.strict {
                let ns = usize::from(header.sample_count());
                if ns != layout.n_samples {
                    return Err(SegyError::InvalidFormat(format!(
                        "trace {ordinal} has {ns} samples, file has {}; \
                         use SegyConfig::with_strict(false) to ignore per-trace sample counts",
                        layout.n_samples
                    )));
                }
            }

            let key = TraceKey::new(
                header.location(locations.inline)?,
                header.location(locations.crossline)?,
            );

            inline_range
                .get_or_insert(LineRange::single(key.inline))
                .include(key.inline);
            crossline_range
                .get_or_insert(LineRange::single(key.crossline))
                .include(key.crossline);

            if map.insert(key, ordinal).is_some() {
                return Err(SegyError::DuplicateTrace {
                    inline: key.inline,
                    crossline: key.crossline,
                });
            }
            Ok(())
        })?;

        let (Some(inline_range), Some(crossline_range)) = (inline_range, crossline_range) else {
            return Err(SegyError::InvalidFormat(
                "file contains no traces".to_string(),
            ));
        };

        let positions = check_extent(inline_range, crossline_range, layout.n_samples)?.traces();
        let regular = map.len() == positions;

        let n_crossline = crossline_range.count() as u64;
        let sequential = regular
            && map.iter().all(|(key, &ordinal)| {
                let il = (i64::from(key.inline) - i64::from(inline_range.min)) as u64;
                let xl = (i64::from(key.crossline) - i64::from(crossline_range.min)) as u64;
                ordinal == il * n_crossline + xl
            });

        let index = if sequential {
            TraceIndex::Sequential
        } else {
            TraceIndex::Mapped(map)
        };

        let geometry = Self {
            inline_range,
            crossline_range,
            n_samples: layout.n_samples,
            trace_count,
            locations,
            index,
        };

        info!(
            traces = trace_count,
            inlines = %geometry.inline_range,
            crosslines = %geometry.crossline_range,
            regular = geometry.is_regular(),
            missing = geometry.missing_count(),
            sequential,
            "scanned geometry"
        );

        Ok(geometry)
    }

    /// Geometry of a file whose traces are known to be stored inline-major
    /// without gaps, numbered from `min_inline` / `min_crossline`.
    pub fn from_shape(
        shape: Shape,
        min_inline: i32,
        min_crossline: i32,
        trace_count: u64,
        locations: HeaderLocations,
    ) -> Result<Self> {
        if trace_count != shape.traces() as u64 {
            return Err(SegyError::InvalidFormat(format!(
                "file holds {trace_count} traces, shape {shape} needs {}",
                shape.traces()
            )));
        }

        check_extent_shape(&shape)?;

        let last = |min: i32, n: usize| -> Result<i32> {
            i32::try_from(i64::from(min) + n as i64 - 1).map_err(|_| {
                SegyError::InvalidDimensions(format!("{n} lines from {min} overflow i32"))
            })
        };

        debug!(%shape, min_inline, min_crossline, "geometry from known shape");

        Ok(Self {
            inline_range: LineRange::new(min_inline, last(min_inline, shape.n_inline)?),
            crossline_range: LineRange::new(
                min_crossline,
                last(min_crossline, shape.n_crossline)?,
            ),
            n_samples: shape.n_samples,
            trace_count,
            locations,
            index: TraceIndex::Sequential,
        })
    }

    /// Logical shape (inline, crossline, sample)
    pub fn shape(&self) -> Shape {
        Shape {
            n_inline: self.inline_range.count(),
            n_crossline: self.crossline_range.count(),
            n_samples: self.n_samples,
        }
    }

    pub fn inline_range(&self) -> LineRange {
        self.inline_range
    }

    pub fn crossline_range(&self) -> LineRange {
        self.crossline_range
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Traces in the file the geometry was built from
    pub fn trace_count(&self) -> u64 {
        self.trace_count
    }

    /// Header locations the geometry was built with
    pub fn locations(&self) -> HeaderLocations {
        self.locations
    }

    pub fn index(&self) -> &TraceIndex {
        &self.index
    }

    /// Number of indexed positions
    pub fn len(&self) -> usize {
        match &self.index {
            TraceIndex::Sequential => self.shape().traces(),
            TraceIndex::Mapped(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every position of the bounding rectangle has a trace
    pub fn is_regular(&self) -> bool {
        self.len() == self.shape().traces()
    }

    /// Positions of the bounding rectangle without a trace
    pub fn missing_count(&self) -> usize {
        self.shape().traces() - self.len()
    }

    /// Keys of the positions without a trace, inline-major
    pub fn missing_keys(&self) -> impl Iterator<Item = TraceKey> + '_ {
        let shape = self.shape();
        (0..shape.n_inline)
            .flat_map(move |il| (0..shape.n_crossline).map(move |xl| (il, xl)))
            .filter(|&(il, xl)| self.ordinal(il, xl).is_none())
            .map(|(il, xl)| self.key_at(il, xl))
    }

    /// Key at logical position (`il`, `xl`)
    pub fn key_at(&self, il: usize, xl: usize) -> TraceKey {
        TraceKey::new(
            self.inline_range.value_at(il),
            self.crossline_range.value_at(xl),
        )
    }

    /// Logical position of `key`, if inside the bounding rectangle
    pub fn position_of(&self, key: TraceKey) -> Option<(usize, usize)> {
        Some((
            self.inline_range.index_of(key.inline)?,
            self.crossline_range.index_of(key.crossline)?,
        ))
    }

    /// Trace ordinal at logical position (`il`, `xl`), `None` for a gap
    pub fn ordinal(&self, il: usize, xl: usize) -> Option<u64> {
        let shape = self.shape();
        if il >= shape.n_inline || xl >= shape.n_crossline {
            return None;
        }
        match &self.index {
            TraceIndex::Sequential => Some((il * shape.n_crossline + xl) as u64),
            TraceIndex::Mapped(map) => map.get(&self.key_at(il, xl)).copied(),
        }
    }

    /// Persist the geometry so later handles can skip the scan
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Load a geometry written by [`Geometry::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let geometry: Self = bincode::deserialize_from(reader)?;
        if geometry.inline_range.min > geometry.inline_range.max
            || geometry.crossline_range.min > geometry.crossline_range.max
        {
            return Err(SegyError::InvalidFormat(
                "geometry file has an inverted line range".to_string(),
            ));
        }
        check_extent(
            geometry.inline_range,
            geometry.crossline_range,
            geometry.n_samples,
        )?;
        Ok(geometry)
    }
}

/// Shape of the bounding box spanned by the line ranges, refusing boxes
/// whose samples cannot be addressed in memory
fn check_extent(inlines: LineRange, crosslines: LineRange, n_samples: usize) -> Result<Shape> {
    let shape = Shape {
        n_inline: inlines.count(),
        n_crossline: crosslines.count(),
        n_samples,
    };
    check_extent_shape(&shape).map_err(|_| {
        SegyError::InvalidFormat(format!(
            "inlines {inlines} and crosslines {crosslines} span a {shape} volume that \
             does not fit in memory; check the inline/crossline byte locations"
        ))
    })?;
    Ok(shape)
}

fn check_extent_shape(shape: &Shape) -> Result<()> {
    match shape.checked_len() {
        Some(_) => Ok(()),
        None => Err(SegyError::InvalidDimensions(format!(
            "{shape} samples overflow the address space"
        ))),
    }
}
