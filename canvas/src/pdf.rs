//! Minimal PDF writer: one page, one embedded RGB image.
//!
//! The image is stored as a Flate-compressed `DeviceRGB` XObject and drawn
//! across the full page width at the top of the page, keeping its aspect
//! ratio (scaled down further if it would run off the bottom). Object
//! offsets for the cross-reference table are taken from the bytes actually
//! written.

#[cfg(test)]
#[path = "pdf_test.rs"]
mod pdf_test;

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

use crate::consts::{A4_HEIGHT_PT, A4_WIDTH_PT};

/// Error returned while assembling a document.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("image has no pixels")]
    EmptyImage,
    #[error("expected {expected} rgb bytes, got {actual}")]
    PixelLength { expected: usize, actual: usize },
    #[error("compress: {0}")]
    Io(#[from] std::io::Error),
}

/// Page dimensions in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_pt: f64,
    pub height_pt: f64,
}

impl PageSize {
    /// A4 portrait.
    pub const A4: Self = Self { width_pt: A4_WIDTH_PT, height_pt: A4_HEIGHT_PT };
}

/// Where the image lands on the page, in points from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Full-width, top-aligned placement for a `width` x `height` image.
#[must_use]
pub fn place_image(width: u32, height: u32, page: PageSize) -> Placement {
    let aspect = f64::from(height) / f64::from(width.max(1));
    let mut w = page.width_pt;
    let mut h = w * aspect;
    if h > page.height_pt {
        h = page.height_pt;
        w = h / aspect;
    }
    Placement { x: 0.0, y: page.height_pt - h, width: w, height: h }
}

/// Build a single-page document embedding `rgb` (row-major, 3 bytes per pixel).
///
/// # Errors
///
/// Returns [`PdfError`] if the image is empty, the buffer length does not
/// match the dimensions, or compression fails.
pub fn image_document(width: u32, height: u32, rgb: &[u8], page: PageSize) -> Result<Vec<u8>, PdfError> {
    if width == 0 || height == 0 {
        return Err(PdfError::EmptyImage);
    }
    let expected = width as usize * height as usize * 3;
    if rgb.len() != expected {
        return Err(PdfError::PixelLength { expected, actual: rgb.len() });
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(rgb)?;
    let pixels = encoder.finish()?;

    let at = place_image(width, height, page);
    let content =
        format!("q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/Im0 Do\nQ\n", at.width, at.height, at.x, at.y).into_bytes();

    let mut out = PdfBuffer::new();
    out.object(b"<< /Type /Catalog /Pages 2 0 R >>", None);
    out.object(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>", None);
    out.object(
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /XObject << /Im0 4 0 R >> >> /Contents 5 0 R >>",
            page.width_pt, page.height_pt
        )
        .as_bytes(),
        None,
    );
    out.object(
        format!(
            "<< /Type /XObject /Subtype /Image /Width {width} /Height {height} /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode /Length {} >>",
            pixels.len()
        )
        .as_bytes(),
        Some(&pixels),
    );
    out.object(format!("<< /Length {} >>", content.len()).as_bytes(), Some(&content));
    Ok(out.finish())
}

struct PdfBuffer {
    bytes: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfBuffer {
    fn new() -> Self {
        let mut bytes = b"%PDF-1.4\n".to_vec();
        bytes.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Self { bytes, offsets: Vec::new() }
    }

    /// Append the next numbered object, with an optional stream body.
    fn object(&mut self, dict: &[u8], stream: Option<&[u8]>) {
        self.offsets.push(self.bytes.len());
        let number = self.offsets.len();
        self.bytes.extend_from_slice(format!("{number} 0 obj\n").as_bytes());
        self.bytes.extend_from_slice(dict);
        if let Some(data) = stream {
            self.bytes.extend_from_slice(b"\nstream\n");
            self.bytes.extend_from_slice(data);
            self.bytes.extend_from_slice(b"\nendstream");
        }
        self.bytes.extend_from_slice(b"\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_at = self.bytes.len();
        let size = self.offsets.len() + 1;
        self.bytes.extend_from_slice(format!("xref\n0 {size}\n").as_bytes());
        self.bytes.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets {
            self.bytes.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        self.bytes
            .extend_from_slice(format!("trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n").as_bytes());
        self.bytes
    }
}
