//! SEG-Y - seismic trace files as random-access volumes
//!
//! A pure Rust reader and writer for classic SEG-Y files (3200-byte textual
//! header, 400-byte binary header, fixed-length traces) exposing them as a
//! dense `(inline, crossline, sample)` volume of `f32`.
//!
//! # Features
//!
//! - Bit-exact IBM System/360 float (format 1) and IEEE float (format 5) samples
//! - EBCDIC or ASCII textual headers, detected automatically
//! - Configurable inline/crossline/X/Y trace header locations
//! - Header-only geometry scan, regular and irregular surveys
//! - Volume, box, inline, crossline, time slice and single trace reads
//! - File creation from a dense buffer or by reusing another file's headers
//!
//! All I/O is synchronous. A [`SegyFile`] owns its stream and serves one
//! thread; a scanned [`Geometry`] is immutable and can be shared.
//!
//! # Example
//!
//! ```rust,no_run
//! use segy::{SegyConfig, SegyFile, SubVolume};
//!
//! # fn example() -> segy::Result<()> {
//! let config = SegyConfig::new().with_line_locations(189, 193);
//! let mut segy = SegyFile::open_with_config("survey.sgy", config)?;
//! segy.scan()?;
//!
//! let inline = segy.read_inline(10)?;
//! let window = segy.read_subvolume(&SubVolume::from_zyx(100, 200, 0, 50, 0, 50))?;
//! println!("{:?} {:?}", inline.dim(), window.dim());
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod codec;
pub mod config;
pub mod convert;
pub mod error;
pub mod geometry;
pub mod header;
pub mod io;
pub mod metadata;
pub mod text;
pub mod types;
pub mod utils;
pub mod writer;

// Re-exports
pub use access::{Collected, SegyFile};
pub use codec::{get_codec, ibm_to_ieee, ieee_to_ibm, SampleCodec, SampleFormat};
pub use config::{HeaderLocations, SegyConfig};
pub use convert::{fromfile, fromfile_ignore_header, tofile, tofile_ignore_header};
pub use error::{ErrorKind, Result, SegyError};
pub use geometry::{Geometry, TraceIndex};
pub use header::{BinaryHeader, TraceHeader};
pub use metadata::MetaInfo;
pub use text::{ascii_from_ebcdic, ebcdic_from_ascii, looks_like_ebcdic};
pub use types::{LineRange, Shape, SubVolume, TextEncoding, TraceKey};
pub use utils::swap_endian;
pub use writer::{create_by_sharing_header, SegyWriter};

/// Version of this crate
pub const SEGY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Size of the textual file header
pub const TEXTUAL_HEADER_SIZE: usize = 3200;

/// Size of the binary file header
pub const BINARY_HEADER_SIZE: usize = 400;

/// Size of each trace header
pub const TRACE_HEADER_SIZE: usize = 240;

/// Byte offset of the first trace
pub const DATA_OFFSET: u64 = (TEXTUAL_HEADER_SIZE + BINARY_HEADER_SIZE) as u64;
