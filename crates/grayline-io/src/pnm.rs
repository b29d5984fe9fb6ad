//! PNM (Portable Any Map) format support
//!
//! Reads and writes the binary 8-bit variants: PGM (`P5`, one channel)
//! and PPM (`P6`, three interleaved channels). ASCII variants
//! (P1/P2/P3), PBM and PAM are not supported.
//!
//! # Header grammar
//!
//! ```text
//! magic  := "P5" | "P6"
//! header := magic ws width ws height ws maxval <single whitespace byte>
//! ```
//!
//! Wherever whitespace may appear, a `#` starts a comment that runs to the
//! end of the line and is skipped. Comment lines before the magic number
//! are skipped too. `maxval` must be in `1..=255`; samples are stored as
//! read, without rescaling.

use crate::{IoError, IoResult};
use grayline_core::{Channels, Raster};
use std::io::Write;

/// Largest sample value the pipeline supports.
pub const MAX_SAMPLE_VALUE: u32 = 255;

/// PNM variant identified by the magic number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnmKind {
    /// `P5`: binary graymap
    Graymap,
    /// `P6`: binary pixmap
    Pixmap,
}

impl PnmKind {
    /// The two-byte magic number.
    pub fn magic(self) -> &'static [u8; 2] {
        match self {
            PnmKind::Graymap => b"P5",
            PnmKind::Pixmap => b"P6",
        }
    }

    /// Channel count of rasters stored in this variant.
    pub fn channels(self) -> Channels {
        match self {
            PnmKind::Graymap => Channels::Gray,
            PnmKind::Pixmap => Channels::Rgb,
        }
    }
}

/// Parsed PNM header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PnmHeader {
    /// Variant from the magic number
    pub kind: PnmKind,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Declared maximum sample value
    pub max_value: u32,
    /// Byte offset of the first sample
    pub data_offset: usize,
}

impl PnmHeader {
    /// Number of sample bytes the header promises, or `None` if it does
    /// not fit in `usize`.
    pub fn data_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(self.kind.channels().count() as usize))
    }
}

/// Byte cursor over the header section.
struct HeaderReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HeaderReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Skip whitespace and `#` comments.
    fn skip_separators(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.data.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn read_magic(&mut self) -> IoResult<PnmKind> {
        self.skip_separators();
        let magic = self
            .data
            .get(self.pos..self.pos + 2)
            .ok_or_else(|| IoError::Truncated("missing magic number".into()))?;
        let kind = match magic {
            b"P5" => PnmKind::Graymap,
            b"P6" => PnmKind::Pixmap,
            other => {
                return Err(IoError::Format(format!(
                    "unsupported magic number {:?}",
                    String::from_utf8_lossy(other)
                )));
            }
        };
        self.pos += 2;
        // The magic must be a token on its own
        match self.data.get(self.pos) {
            Some(b) if b.is_ascii_whitespace() || *b == b'#' => Ok(kind),
            Some(_) => Err(IoError::Format(
                "magic number not followed by whitespace".into(),
            )),
            None => Err(IoError::Truncated("header ends after magic number".into())),
        }
    }

    /// Read one decimal header field.
    fn read_decimal(&mut self, field: &str) -> IoResult<u32> {
        self.skip_separators();
        let start = self.pos;
        while let Some(b) = self.data.get(self.pos) {
            if b.is_ascii_whitespace() || *b == b'#' {
                break;
            }
            self.pos += 1;
        }
        let token = &self.data[start..self.pos];
        if token.is_empty() {
            return Err(IoError::Truncated(format!("header ends before {field}")));
        }
        if !token.iter().all(u8::is_ascii_digit) {
            return Err(IoError::Format(format!(
                "invalid {field}: {:?}",
                String::from_utf8_lossy(token)
            )));
        }
        // All digits: the only possible parse failure is overflow
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(|| {
                IoError::Range(format!(
                    "{field} {} does not fit in 32 bits",
                    String::from_utf8_lossy(token)
                ))
            })
    }

    /// Consume the single whitespace byte that ends the header.
    fn end_header(&mut self) -> IoResult<usize> {
        match self.data.get(self.pos) {
            Some(b) if b.is_ascii_whitespace() => Ok(self.pos + 1),
            Some(_) => Err(IoError::Format(
                "max value not followed by whitespace".into(),
            )),
            None => Err(IoError::Truncated("header ends after max value".into())),
        }
    }
}

/// Parse a binary PNM header.
///
/// # Errors
///
/// - [`IoError::Format`] on a bad magic number or a non-numeric field
/// - [`IoError::Truncated`] if the data ends inside the header
/// - [`IoError::Range`] on a zero dimension, a sample count that overflows
///   `usize`, or a max value outside `1..=255`
pub fn read_header(data: &[u8]) -> IoResult<PnmHeader> {
    let mut reader = HeaderReader::new(data);
    let kind = reader.read_magic()?;
    let width = reader.read_decimal("width")?;
    let height = reader.read_decimal("height")?;
    if width == 0 || height == 0 {
        return Err(IoError::Range(format!(
            "invalid image dimensions {width}x{height}"
        )));
    }
    let max_value = reader.read_decimal("max value")?;
    if max_value == 0 || max_value > MAX_SAMPLE_VALUE {
        return Err(IoError::Range(format!(
            "unsupported max value {max_value} (must be 1..={MAX_SAMPLE_VALUE})"
        )));
    }
    let data_offset = reader.end_header()?;

    let header = PnmHeader {
        kind,
        width,
        height,
        max_value,
        data_offset,
    };
    if header.data_len().is_none() {
        return Err(IoError::Range(format!(
            "image dimensions {width}x{height} overflow the sample count"
        )));
    }
    Ok(header)
}

/// Decode a PNM image of the expected variant.
fn decode_kind(data: &[u8], expected: PnmKind) -> IoResult<Raster> {
    let header = read_header(data)?;
    if header.kind != expected {
        return Err(IoError::Format(format!(
            "expected {} image, found {}",
            String::from_utf8_lossy(expected.magic()),
            String::from_utf8_lossy(header.kind.magic())
        )));
    }
    decode_body(data, &header)
}

fn decode_body(data: &[u8], header: &PnmHeader) -> IoResult<Raster> {
    let needed = header.data_len().ok_or_else(|| {
        IoError::Range(format!(
            "image dimensions {}x{} overflow the sample count",
            header.width, header.height
        ))
    })?;
    let body = &data[header.data_offset..];
    if body.len() < needed {
        return Err(IoError::Truncated(format!(
            "read {} sample bytes, expected {}",
            body.len(),
            needed
        )));
    }

    let mut samples = Vec::new();
    samples
        .try_reserve_exact(needed)
        .map_err(|_| grayline_core::Error::AllocationFailed(needed))?;
    samples.extend_from_slice(&body[..needed]);

    tracing::debug!(
        width = header.width,
        height = header.height,
        max_value = header.max_value,
        kind = ?header.kind,
        "decoded PNM"
    );

    Ok(Raster::from_samples(
        header.width,
        header.height,
        header.kind.channels(),
        samples,
    )?)
}

/// Decode a binary PPM (`P6`) image into a 3-channel raster.
///
/// Bytes after the promised `width * height * 3` samples are ignored.
pub fn decode_ppm(data: &[u8]) -> IoResult<Raster> {
    decode_kind(data, PnmKind::Pixmap)
}

/// Decode a binary PGM (`P5`) image into a 1-channel raster.
pub fn decode_pgm(data: &[u8]) -> IoResult<Raster> {
    decode_kind(data, PnmKind::Graymap)
}

/// Decode a `P5` or `P6` image, choosing the variant from the magic number.
pub fn read_pnm(data: &[u8]) -> IoResult<Raster> {
    let header = read_header(data)?;
    decode_body(data, &header)
}

/// Write a raster as binary PNM to a writer.
///
/// Chooses `P5` for gray rasters and `P6` for RGB rasters. The max value
/// is always written as 255.
pub fn write_pnm<W: Write>(raster: &Raster, mut writer: W) -> IoResult<()> {
    let kind = match raster.channels() {
        Channels::Gray => PnmKind::Graymap,
        Channels::Rgb => PnmKind::Pixmap,
    };
    writer.write_all(kind.magic())?;
    write!(
        writer,
        "\n{} {}\n{}\n",
        raster.width(),
        raster.height(),
        MAX_SAMPLE_VALUE
    )?;
    writer.write_all(raster.samples())?;
    writer.flush()?;
    Ok(())
}

fn encode_kind(raster: &Raster, channels: Channels) -> IoResult<Vec<u8>> {
    raster.require_channels(channels)?;
    let mut out = Vec::with_capacity(raster.samples().len() + 32);
    write_pnm(raster, &mut out)?;
    Ok(out)
}

/// Encode a gray raster as binary PGM (`P5`).
pub fn encode_pgm(raster: &Raster) -> IoResult<Vec<u8>> {
    encode_kind(raster, Channels::Gray)
}

/// Encode an RGB raster as binary PPM (`P6`).
pub fn encode_ppm(raster: &Raster) -> IoResult<Vec<u8>> {
    encode_kind(raster, Channels::Rgb)
}
