//! Positioned I/O over a SEG-Y byte stream

use crate::codec::SampleCodec;
use crate::error::{Result, SegyError};
use crate::header::{BinaryHeader, TraceHeader};
use crate::{BINARY_HEADER_SIZE, DATA_OFFSET, TEXTUAL_HEADER_SIZE, TRACE_HEADER_SIZE};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::Path;

/// Byte layout of the fixed-length traces in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceLayout {
    /// Samples per trace
    pub n_samples: usize,
}

impl TraceLayout {
    pub fn new(n_samples: usize) -> Self {
        Self { n_samples }
    }

    /// Bytes per trace, header included
    pub fn stride(&self) -> u64 {
        (TRACE_HEADER_SIZE + self.n_samples * 4) as u64
    }

    /// Byte offset of the trace header of trace `ordinal`
    pub fn trace_offset(&self, ordinal: u64) -> u64 {
        DATA_OFFSET + ordinal * self.stride()
    }

    /// Byte offset of sample `sample` of trace `ordinal`
    pub fn sample_offset(&self, ordinal: u64, sample: usize) -> u64 {
        self.trace_offset(ordinal) + (TRACE_HEADER_SIZE + sample * 4) as u64
    }

    /// Number of traces in a file of `file_len` bytes.
    ///
    /// Fails when the trace area is not a whole number of traces.
    pub fn trace_count(&self, file_len: u64) -> Result<u64> {
        if file_len < DATA_OFFSET {
            return Err(SegyError::Truncated {
                expected: DATA_OFFSET,
                actual: file_len,
            });
        }
        let data = file_len - DATA_OFFSET;
        let stride = self.stride();
        if data % stride != 0 {
            return Err(SegyError::InvalidFormat(format!(
                "trace area of {data} bytes is not a multiple of the {stride}-byte trace \
                 ({} samples); file truncated or wrong sample count",
                self.n_samples
            )));
        }
        Ok(data / stride)
    }
}

/// Random-access reader over a SEG-Y stream.
///
/// Every read seeks first, so the stream position carries no meaning
/// between calls.
pub struct TraceReader<R> {
    inner: R,
    len: u64,
}

impl TraceReader<File> {
    /// Open a file for reading
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(file)
    }
}

impl<R: Read + Seek> TraceReader<R> {
    /// Wrap a stream, measuring its length
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        Ok(Self { inner, len })
    }

    /// Total stream length in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fill `buf` from byte `offset`
    pub fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let end = offset + buf.len() as u64;
        if end > self.len {
            return Err(SegyError::Truncated {
                expected: end,
                actual: self.len,
            });
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(buf)?;
        Ok(())
    }

    /// The raw 3200-byte textual header
    pub fn textual_header(&mut self) -> Result<[u8; TEXTUAL_HEADER_SIZE]> {
        let mut raw = [0u8; TEXTUAL_HEADER_SIZE];
        self.read_at(0, &mut raw)?;
        Ok(raw)
    }

    /// The 400-byte binary header
    pub fn binary_header(&mut self) -> Result<BinaryHeader> {
        let mut raw = [0u8; BINARY_HEADER_SIZE];
        self.read_at(TEXTUAL_HEADER_SIZE as u64, &mut raw)?;
        Ok(BinaryHeader::from_bytes(raw))
    }

    /// The trace header of trace `ordinal`
    pub fn trace_header(&mut self, layout: &TraceLayout, ordinal: u64) -> Result<TraceHeader> {
        let mut raw = [0u8; TRACE_HEADER_SIZE];
        self.read_at(layout.trace_offset(ordinal), &mut raw)?;
        Ok(TraceHeader::from_bytes(raw))
    }

    /// Decode `samples` of trace `ordinal` into `out`.
    ///
    /// `scratch` is resized as needed and can be reused across calls.
    pub fn read_samples(
        &mut self,
        layout: &TraceLayout,
        codec: &dyn SampleCodec,
        ordinal: u64,
        samples: Range<usize>,
        scratch: &mut Vec<u8>,
        out: &mut [f32],
    ) -> Result<()> {
        scratch.resize(samples.len() * 4, 0);
        self.read_at(layout.sample_offset(ordinal, samples.start), scratch)?;
        codec.decode(scratch, out);
        Ok(())
    }

    /// Decode `count` consecutive whole traces starting at `first` with a
    /// single read. `out` holds `count * n_samples` values.
    pub fn read_trace_run(
        &mut self,
        layout: &TraceLayout,
        codec: &dyn SampleCodec,
        first: u64,
        count: usize,
        scratch: &mut Vec<u8>,
        out: &mut [f32],
    ) -> Result<()> {
        let stride = layout.stride() as usize;
        scratch.resize(count * stride, 0);
        self.read_at(layout.trace_offset(first), scratch)?;

        for (trace, values) in scratch
            .chunks_exact(stride)
            .zip(out.chunks_exact_mut(layout.n_samples))
        {
            codec.decode(&trace[TRACE_HEADER_SIZE..], values);
        }
        Ok(())
    }

    /// Visit every trace header in file order, skipping the sample payloads.
    ///
    /// Headers come through a buffer and payloads are skipped with relative
    /// seeks, which stay inside the buffer for short traces.
    pub fn for_each_header<F>(&mut self, layout: &TraceLayout, mut visit: F) -> Result<()>
    where
        F: FnMut(u64, &TraceHeader) -> Result<()>,
    {
        let count = layout.trace_count(self.len)?;
        let payload = (layout.n_samples * 4) as i64;
        self.inner.seek(SeekFrom::Start(DATA_OFFSET))?;
        let mut reader = BufReader::with_capacity(1 << 20, &mut self.inner);

        let mut header = [0u8; TRACE_HEADER_SIZE];
        for ordinal in 0..count {
            reader.read_exact(&mut header)?;
            visit(ordinal, &TraceHeader::from_bytes(header))?;
            reader.seek_relative(payload)?;
        }
        Ok(())
    }

    /// Visit every trace in file order with its header and decoded samples.
    ///
    /// Reads sequentially through a buffer rather than seeking per trace.
    pub fn for_each_trace<F>(
        &mut self,
        layout: &TraceLayout,
        codec: &dyn SampleCodec,
        mut visit: F,
    ) -> Result<()>
    where
        F: FnMut(u64, &TraceHeader, &[f32]) -> Result<()>,
    {
        let count = layout.trace_count(self.len)?;
        self.inner.seek(SeekFrom::Start(DATA_OFFSET))?;
        let mut reader = BufReader::with_capacity(1 << 20, &mut self.inner);

        let mut header = [0u8; TRACE_HEADER_SIZE];
        let mut raw = vec![0u8; layout.n_samples * 4];
        let mut samples = vec![0.0f32; layout.n_samples];

        for ordinal in 0..count {
            reader.read_exact(&mut header)?;
            reader.read_exact(&mut raw)?;
            codec.decode(&raw, &mut samples);
            visit(ordinal, &TraceHeader::from_bytes(header), &samples)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{get_codec, SampleFormat};
    use crate::header::trace;
    use std::io::Cursor;

    /// Three 2-sample IEEE traces whose samples are `ordinal * 10 + i`
    fn small_file() -> Vec<u8> {
        let mut bytes = vec![0u8; DATA_OFFSET as usize];
        for ordinal in 0..3i32 {
            let mut header = TraceHeader::new();
            header.set_location(trace::INLINE, 10 + ordinal).unwrap();
            bytes.extend_from_slice(header.as_bytes());
            for i in 0..2 {
                bytes.extend_from_slice(&((ordinal * 10 + i) as f32).to_be_bytes());
            }
        }
        bytes
    }

    #[test]
    fn test_layout_arithmetic() {
        let layout = TraceLayout::new(2);
        assert_eq!(layout.stride(), 248);
        assert_eq!(layout.trace_offset(0), 3600);
        assert_eq!(layout.trace_offset(2), 3600 + 2 * 248);
        assert_eq!(layout.sample_offset(1, 1), 3600 + 248 + 240 + 4);
        assert_eq!(layout.trace_count(3600 + 3 * 248).unwrap(), 3);
        assert_eq!(layout.trace_count(3600).unwrap(), 0);
        assert!(matches!(
            layout.trace_count(3600 + 3 * 248 - 1),
            Err(SegyError::InvalidFormat(_))
        ));
        assert!(matches!(
            layout.trace_count(100),
            Err(SegyError::Truncated { .. })
        ));
    }

    #[test]
    fn test_read_headers_and_samples() {
        let mut reader = TraceReader::new(Cursor::new(small_file())).unwrap();
        let layout = TraceLayout::new(2);
        let codec = get_codec(SampleFormat::IeeeFloat);

        assert_eq!(reader.len(), 3600 + 3 * 248);
        let header = reader.trace_header(&layout, 2).unwrap();
        assert_eq!(header.location(trace::INLINE).unwrap(), 12);

        let mut scratch = Vec::new();
        let mut out = [0.0f32; 1];
        reader
            .read_samples(&layout, codec.as_ref(), 1, 1..2, &mut scratch, &mut out)
            .unwrap();
        assert_eq!(out, [11.0]);

        let mut run = [0.0f32; 4];
        reader
            .read_trace_run(&layout, codec.as_ref(), 1, 2, &mut scratch, &mut run)
            .unwrap();
        assert_eq!(run, [10.0, 11.0, 20.0, 21.0]);
    }

    #[test]
    fn test_read_past_end() {
        let mut reader = TraceReader::new(Cursor::new(small_file())).unwrap();
        let layout = TraceLayout::new(2);
        assert!(matches!(
            reader.trace_header(&layout, 3),
            Err(SegyError::Truncated { .. })
        ));
    }

    #[test]
    fn test_for_each_trace() {
        let mut reader = TraceReader::new(Cursor::new(small_file())).unwrap();
        let layout = TraceLayout::new(2);
        let codec = get_codec(SampleFormat::IeeeFloat);

        let mut seen = Vec::new();
        reader
            .for_each_trace(&layout, codec.as_ref(), |ordinal, header, samples| {
                seen.push((ordinal, header.location(trace::INLINE)?, samples.to_vec()));
                Ok(())
            })
            .unwrap();

        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], (2, 12, vec![20.0, 21.0]));
    }

    #[test]
    fn test_for_each_header() {
        let mut reader = TraceReader::new(Cursor::new(small_file())).unwrap();
        let layout = TraceLayout::new(2);

        let mut inlines = Vec::new();
        reader
            .for_each_header(&layout, |ordinal, header| {
                inlines.push((ordinal, header.location(trace::INLINE)?));
                Ok(())
            })
            .unwrap();
        assert_eq!(inlines, vec![(0, 10), (1, 11), (2, 12)]);

        // Stops at the first error from the visitor.
        let mut visited = 0;
        let result = reader.for_each_header(&layout, |_, _| {
            visited += 1;
            Err(SegyError::NotScanned)
        });
        assert!(matches!(result, Err(SegyError::NotScanned)));
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_for_each_header_large_payload() {
        // Payloads larger than the read buffer are skipped by a real seek.
        let n_samples = 300_000;
        let layout = TraceLayout::new(n_samples);
        let mut bytes = vec![0u8; DATA_OFFSET as usize];
        for ordinal in 0..3i32 {
            let mut header = TraceHeader::new();
            header.set_location(trace::INLINE, 7 * ordinal).unwrap();
            bytes.extend_from_slice(header.as_bytes());
            bytes.resize(bytes.len() + n_samples * 4, 0xAB);
        }

        let mut reader = TraceReader::new(Cursor::new(bytes)).unwrap();
        let mut inlines = Vec::new();
        reader
            .for_each_header(&layout, |_, header| {
                inlines.push(header.location(trace::INLINE)?);
                Ok(())
            })
            .unwrap();
        assert_eq!(inlines, vec![0, 7, 14]);
    }
}
