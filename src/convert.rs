//! Whole-file helpers
//!
//! One-call conversions between SEG-Y files, in-memory volumes and
//! headerless little-endian `f32` files.

use crate::access::SegyFile;
use crate::codec::SampleFormat;
use crate::config::SegyConfig;
use crate::error::Result;
use crate::types::Shape;
use ndarray::Array3;
use std::path::Path;

/// Open, scan and read a whole volume using `iline` / `xline` as the line
/// locations
pub fn fromfile(path: impl AsRef<Path>, iline: usize, xline: usize) -> Result<Array3<f32>> {
    let config = SegyConfig::default().with_line_locations(iline, xline);
    let mut segy = SegyFile::open_with_config(path, config)?;
    segy.scan()?;
    segy.read_volume()
}

/// Export a SEG-Y volume to a headerless little-endian `f32` file
pub fn tofile(
    path: impl AsRef<Path>,
    out: impl AsRef<Path>,
    iline: usize,
    xline: usize,
) -> Result<()> {
    let config = SegyConfig::default().with_line_locations(iline, xline);
    let mut segy = SegyFile::open_with_config(path, config)?;
    segy.scan()?;
    segy.export_raw(out)
}

/// Read a file whose traces are stored inline-major without gaps,
/// trusting `shape` and `format` instead of the headers
pub fn fromfile_ignore_header(
    path: impl AsRef<Path>,
    shape: Shape,
    format: SampleFormat,
) -> Result<Array3<f32>> {
    let config = SegyConfig::default().with_format(format);
    let mut segy = SegyFile::open_with_shape(path, shape, config)?;
    segy.read_volume()
}

/// Export a file read as in [`fromfile_ignore_header`] to a headerless
/// little-endian `f32` file
pub fn tofile_ignore_header(
    path: impl AsRef<Path>,
    out: impl AsRef<Path>,
    shape: Shape,
    format: SampleFormat,
) -> Result<()> {
    let config = SegyConfig::default().with_format(format);
    let mut segy = SegyFile::open_with_shape(path, shape, config)?;
    segy.export_raw(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SegyError;
    use crate::utils::f32_from_le_bytes;
    use crate::writer::SegyWriter;
    use tempfile::TempDir;

    fn volume(shape: Shape) -> Vec<f32> {
        (0..shape.len()).map(|i| (i as f32).sin()).collect()
    }

    #[test]
    fn test_fromfile_and_tofile() {
        let dir = TempDir::new().unwrap();
        let segy_path = dir.path().join("cube.sgy");
        let raw_path = dir.path().join("cube.bin");

        let shape = Shape::new(3, 4, 5).unwrap();
        let data = volume(shape);
        SegyWriter::new(shape)
            .unwrap()
            .write_slice(&segy_path, &data)
            .unwrap();

        let read = fromfile(&segy_path, 189, 193).unwrap();
        assert_eq!(read.dim(), (3, 4, 5));
        assert_eq!(read.as_slice().unwrap(), &data[..]);

        tofile(&segy_path, &raw_path, 189, 193).unwrap();
        let bytes = std::fs::read(&raw_path).unwrap();
        let mut raw = vec![0.0f32; shape.len()];
        f32_from_le_bytes(&bytes, &mut raw).unwrap();
        assert_eq!(raw, data);
    }

    #[test]
    fn test_fromfile_inline_at_coordinate_bytes() {
        let dir = TempDir::new().unwrap();
        let segy_path = dir.path().join("cdp_x_inline.sgy");

        let shape = Shape::new(2, 3, 4).unwrap();
        let data = volume(shape);
        let config = SegyConfig::new()
            .with_line_locations(73, 193)
            .with_coordinate_locations(181, 185)
            .with_min_lines(500, 20);
        SegyWriter::with_config(shape, config)
            .unwrap()
            .write_slice(&segy_path, &data)
            .unwrap();

        let read = fromfile(&segy_path, 73, 193).unwrap();
        assert_eq!(read.dim(), (2, 3, 4));
        assert_eq!(read.as_slice().unwrap(), &data[..]);
    }

    #[test]
    fn test_ignore_header() {
        let dir = TempDir::new().unwrap();
        let segy_path = dir.path().join("ibm.sgy");
        let raw_path = dir.path().join("ibm.bin");

        let shape = Shape::new(2, 3, 4).unwrap();
        let data: Vec<f32> = (0..shape.len()).map(|i| i as f32 - 10.0).collect();
        let config = SegyConfig::new().with_format(SampleFormat::IbmFloat);
        SegyWriter::with_config(shape, config)
            .unwrap()
            .write_slice(&segy_path, &data)
            .unwrap();

        let read = fromfile_ignore_header(&segy_path, shape, SampleFormat::IbmFloat).unwrap();
        assert_eq!(read.as_slice().unwrap(), &data[..]);

        tofile_ignore_header(&segy_path, &raw_path, shape, SampleFormat::IbmFloat).unwrap();
        assert_eq!(std::fs::metadata(&raw_path).unwrap().len(), shape.len() as u64 * 4);

        // Trace count must match the given shape.
        let wrong = Shape::new(3, 3, 4).unwrap();
        assert!(matches!(
            fromfile_ignore_header(&segy_path, wrong, SampleFormat::IbmFloat),
            Err(SegyError::InvalidFormat(_))
        ));
    }
}
