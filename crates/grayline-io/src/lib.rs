//! grayline-io - Image I/O for the grayscale pipeline
//!
//! Decodes binary PPM/PGM files into [`Raster`]s and encodes rasters back.
//! File output is written to a temporary sibling and renamed into place,
//! so a failed write never leaves a truncated image behind.
//!
//! # Usage
//!
//! ```no_run
//! use grayline_io::{read_image, write_image};
//!
//! let rgb = read_image("photo.ppm").unwrap();
//! write_image(&rgb, "copy.ppm").unwrap();
//! ```

mod error;
pub mod pnm;

pub use error::{IoError, IoResult};
pub use pnm::{
    PnmHeader, PnmKind, decode_pgm, decode_ppm, encode_pgm, encode_ppm, read_header, read_pnm,
    write_pnm,
};

use grayline_core::Raster;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a `P5` or `P6` image from a file path.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let data = fs::read(path.as_ref())?;
    read_pnm(&data)
}

/// Write a raster to a file path.
///
/// Gray rasters are written as `P5`, RGB rasters as `P6`. The data goes
/// to a hidden temporary file next to `path`, which is renamed over
/// `path` only after every byte has been written and synced.
pub fn write_image<P: AsRef<Path>>(raster: &Raster, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let tmp = temp_sibling(path);

    let result = (|| -> IoResult<()> {
        let file = fs::File::create(&tmp)?;
        let mut writer = std::io::BufWriter::new(file);
        write_pnm(raster, &mut writer)?;
        let file = writer.into_inner().map_err(|e| IoError::Io(e.into_error()))?;
        file.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// `dir/name` -> `dir/.name.tmp`
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
