//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::bitmap::MonoImage;
use crate::encoding::{TextEncoding, encode_text};
use crate::profile::PrinterProfile;

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers. Text is converted to
/// the builder's code page as it is written, so command parameters and
/// image data are never touched by the conversion.
#[derive(Debug, Clone)]
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
    encoding: TextEncoding,
}

impl EscPosBuilder {
    /// Create a new builder with the specified paper width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        Self::with_encoding(width, TextEncoding::default())
    }

    /// Create a builder that writes text in a specific code page
    pub fn with_encoding(width: usize, encoding: TextEncoding) -> Self {
        let mut b = Self {
            buf: Vec::with_capacity(4096),
            width,
            encoding,
        };
        b.reset();
        b
    }

    /// Create a builder matching a printer profile
    pub fn for_profile(profile: &PrinterProfile) -> Self {
        Self::with_encoding(profile.columns, profile.encoding)
    }

    /// Get the configured paper width
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    // === Text Output ===

    /// Write text in the builder's code page
    pub fn text(&mut self, s: &str) -> &mut Self {
        let bytes = encode_text(s, self.encoding);
        self.buf.extend_from_slice(&bytes);
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write empty line
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Print the buffer and feed n lines
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        // ESC d n
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    // === Line Spacing ===

    /// Set line spacing to n motion units
    pub fn line_spacing(&mut self, units: u8) -> &mut Self {
        // ESC 3 n
        self.buf.extend_from_slice(&[0x1B, 0x33, units]);
        self
    }

    /// Restore the printer's default line spacing
    pub fn default_line_spacing(&mut self) -> &mut Self {
        // ESC 2
        self.buf.extend_from_slice(&[0x1B, 0x32]);
        self
    }

    // === Paper Control ===

    /// Full cut at the current position
    pub fn cut(&mut self) -> &mut Self {
        // GS V 0
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    /// Partial cut (leave a small connection)
    pub fn cut_partial(&mut self) -> &mut Self {
        // GS V 1
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x01]);
        self
    }

    /// Feed n lines, then full cut
    ///
    /// The printer accounts for the cutter-to-head distance itself, which
    /// wastes less paper at the top of the next ticket than feed() + cut().
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        // GS V 65 n
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x41, lines]);
        self
    }

    /// Feed n lines, then partial cut
    pub fn cut_partial_feed(&mut self, lines: u8) -> &mut Self {
        // GS V 66 n
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    // === Images ===

    /// Print an image with `GS v 0` raster graphics
    pub fn raster_image(&mut self, image: &MonoImage) -> &mut Self {
        self.buf.extend_from_slice(&image.to_raster());
        self.buf.push(b'\n');
        self
    }

    /// Print an image with `ESC * 33` column bit images
    pub fn column_image(&mut self, image: &MonoImage) -> &mut Self {
        self.buf.extend_from_slice(&image.to_columns());
        self
    }

    // === Raw Commands ===

    /// Write raw bytes directly
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Reset printer to default state
    ///
    /// `ESC @` also resets the code page, so it is selected again.
    pub fn reset(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x40]);
        self.buf.extend_from_slice(self.encoding.select_command());
        self
    }

    // === Build ===

    /// Build the final byte buffer, leaving the code page mode if needed
    pub fn build(mut self) -> Vec<u8> {
        self.buf.extend_from_slice(self.encoding.release_command());
        self.buf
    }

    /// Build without the trailing code page release (for debugging)
    pub fn build_raw(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(48)
    }
}
