//! Monochrome images for thermal printing
//!
//! Thermal heads print black or nothing, so images are reduced to one bit
//! per dot before they are encoded. Two encodings are supported:
//! - `GS v 0` raster graphics (one command per block of up to 65535 rows)
//! - `ESC * 33` column bit images (24-dot stripes), understood by older
//!   firmware that lacks raster support

#[cfg(feature = "image")]
use crate::error::PrintResult;

/// Largest row count a single `GS v 0` block can carry
pub const MAX_RASTER_ROWS: u32 = u16::MAX as u32;

/// One bit per dot image, row-major, `true` = black
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoImage {
    width: u32,
    height: u32,
    dots: Vec<bool>,
}

impl MonoImage {
    /// Create an all-white image
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            dots: vec![false; (width as usize) * (height as usize)],
        }
    }

    /// Build an image from a per-dot predicate
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut img = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                img.set(x, y, f(x, y));
            }
        }
        img
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dot at (x, y); out-of-bounds reads are white
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.dots[(y as usize) * (self.width as usize) + x as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, black: bool) {
        if x < self.width && y < self.height {
            let idx = (y as usize) * (self.width as usize) + x as usize;
            self.dots[idx] = black;
        }
    }

    /// Open an image file, scale it to fit `max_width` dots and threshold it
    #[cfg(feature = "image")]
    pub fn open(path: impl AsRef<std::path::Path>, max_width: u32) -> PrintResult<Self> {
        use crate::error::PrintError;
        use ::image::GenericImageView;
        use tracing::info;

        let path = path.as_ref();
        let img = ::image::open(path)
            .map_err(|e| PrintError::Image(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), dimensions = ?img.dimensions(), "image opened");
        Ok(Self::from_dynamic(&img, max_width))
    }

    /// Threshold a decoded image
    ///
    /// Dots are black when opaque (alpha >= 128) and dark (luma < 128).
    /// Images wider than `max_width` are scaled down keeping the aspect ratio.
    #[cfg(feature = "image")]
    pub fn from_dynamic(img: &::image::DynamicImage, max_width: u32) -> Self {
        use ::image::GenericImageView;

        let (w, h) = img.dimensions();

        let (new_w, new_h) = if w > max_width && max_width > 0 {
            let ratio = max_width as f64 / w as f64;
            (max_width, ((h as f64 * ratio) as u32).max(1))
        } else {
            (w, h)
        };

        let resized = img.resize_exact(new_w, new_h, ::image::imageops::FilterType::Nearest);
        let rgba = resized.to_rgba8();

        Self::from_fn(new_w, new_h, |x, y| {
            let pixel = rgba.get_pixel(x, y);
            if pixel[3] < 128 {
                // Transparent = white
                return false;
            }
            let luma =
                0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32;
            luma < 128.0
        })
    }

    /// Pad the image with white columns so it sits centred in `width` dots
    pub fn centered(&self, width: u32) -> Self {
        if self.width >= width {
            return self.clone();
        }
        let offset = (width - self.width) / 2;
        Self::from_fn(width, self.height, |x, y| {
            x >= offset && self.get(x - offset, y)
        })
    }

    /// Encode as `GS v 0` raster graphics
    ///
    /// The row count field is 16 bits, so taller images are sent as several
    /// consecutive blocks of at most [`MAX_RASTER_ROWS`] rows.
    pub fn to_raster(&self) -> Vec<u8> {
        let x_bytes = self.width.div_ceil(8);
        let blocks = self.height.div_ceil(MAX_RASTER_ROWS).max(1);
        let mut data = Vec::with_capacity((8 * blocks + x_bytes * self.height) as usize);

        let mut top = 0;
        loop {
            let rows = (self.height - top).min(MAX_RASTER_ROWS);

            // GS v 0 m xL xH yL yH
            data.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
            data.push(x_bytes as u8);
            data.push((x_bytes >> 8) as u8);
            data.push(rows as u8);
            data.push((rows >> 8) as u8);

            for y in top..top + rows {
                for x_byte in 0..x_bytes {
                    let mut byte = 0u8;
                    for bit in 0..8 {
                        if self.get(x_byte * 8 + bit, y) {
                            byte |= 1 << (7 - bit);
                        }
                    }
                    data.push(byte);
                }
            }

            top += rows;
            if top >= self.height {
                break;
            }
        }

        data
    }

    /// Encode as `ESC * 33` column bit images
    ///
    /// Each stripe covers 24 rows; every column is three bytes, most
    /// significant bit on top. Line spacing is set to the stripe height for
    /// the duration of the image and restored to the default afterwards.
    pub fn to_columns(&self) -> Vec<u8> {
        let mut data = Vec::new();

        // ESC 3 24 - line spacing = stripe height
        data.extend_from_slice(&[0x1B, 0x33, 24]);

        let mut top = 0;
        while top < self.height {
            // ESC * m nL nH
            data.extend_from_slice(&[0x1B, 0x2A, 33]);
            data.push(self.width as u8);
            data.push((self.width >> 8) as u8);

            for x in 0..self.width {
                for slice in 0..3 {
                    let mut byte = 0u8;
                    for bit in 0..8 {
                        if self.get(x, top + slice * 8 + bit) {
                            byte |= 1 << (7 - bit);
                        }
                    }
                    data.push(byte);
                }
            }

            data.push(b'\n');
            top += 24;
        }

        // ESC 2 - default line spacing
        data.extend_from_slice(&[0x1B, 0x32]);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_header_and_bits() {
        // 10 dots wide -> 2 bytes per row
        let img = MonoImage::from_fn(10, 2, |x, y| y == 0 && (x == 0 || x == 9));
        let data = img.to_raster();

        assert_eq!(&data[..8], &[0x1D, 0x76, 0x30, 0x00, 2, 0, 2, 0]);
        assert_eq!(&data[8..], &[0b1000_0000, 0b0100_0000, 0, 0]);
    }

    #[test]
    fn test_tall_raster_split_into_blocks() {
        let img = MonoImage::from_fn(8, MAX_RASTER_ROWS + 2, |_, y| y >= MAX_RASTER_ROWS);
        let data = img.to_raster();

        assert_eq!(&data[..8], &[0x1D, 0x76, 0x30, 0x00, 1, 0, 0xFF, 0xFF]);
        let second = 8 + MAX_RASTER_ROWS as usize;
        assert!(data[8..second].iter().all(|&b| b == 0));
        assert_eq!(&data[second..second + 8], &[0x1D, 0x76, 0x30, 0x00, 1, 0, 2, 0]);
        assert_eq!(&data[second + 8..], &[0xFF, 0xFF]);
    }

    #[test]
    fn test_columns_stripes() {
        // 30 rows -> two stripes
        let img = MonoImage::from_fn(2, 30, |x, y| x == 1 && (y == 0 || y == 25));
        let data = img.to_columns();

        assert_eq!(&data[..3], &[0x1B, 0x33, 24]);
        // first stripe header + 2 columns * 3 bytes + newline
        assert_eq!(&data[3..8], &[0x1B, 0x2A, 33, 2, 0]);
        assert_eq!(&data[8..14], &[0, 0, 0, 0x80, 0, 0]);
        assert_eq!(data[14], b'\n');
        // second stripe: row 25 is bit 1 of the first byte
        assert_eq!(&data[15..20], &[0x1B, 0x2A, 33, 2, 0]);
        assert_eq!(&data[20..26], &[0, 0, 0, 0x40, 0, 0]);
        assert_eq!(data[26], b'\n');
        assert_eq!(&data[27..], &[0x1B, 0x32]);
    }

    #[test]
    fn test_centered() {
        let img = MonoImage::from_fn(2, 1, |_, _| true);
        let centered = img.centered(6);
        assert_eq!(centered.width(), 6);
        let row: Vec<bool> = (0..6).map(|x| centered.get(x, 0)).collect();
        assert_eq!(row, vec![false, false, true, true, false, false]);
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_from_dynamic_threshold_and_scale() {
        use ::image::{DynamicImage, Rgba, RgbaImage};

        let mut buf = RgbaImage::from_pixel(8, 4, Rgba([255, 255, 255, 255]));
        buf.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        // dark but transparent stays white
        buf.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        let img = MonoImage::from_dynamic(&DynamicImage::ImageRgba8(buf.clone()), 576);
        assert_eq!((img.width(), img.height()), (8, 4));
        assert!(img.get(0, 0));
        assert!(!img.get(1, 0));

        let scaled = MonoImage::from_dynamic(&DynamicImage::ImageRgba8(buf), 4);
        assert_eq!((scaled.width(), scaled.height()), (4, 2));
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_open_missing_file() {
        let err = MonoImage::open("/nonexistent/receipt.png", 576).unwrap_err();
        assert!(matches!(err, crate::PrintError::Image(_)));
    }
}
