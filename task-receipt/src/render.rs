//! Receipt renderers
//!
//! Turn receipts into ESC/POS bytes for a printer profile.

use std::path::Path;

use ticket_printer::{EscPosBuilder, MonoImage, PrintResult, PrinterProfile};
use tracing::instrument;

use crate::receipt::{Receipt, ReceiptLayout};

/// Line spacing for text receipts, in motion units (~3.4mm on 203 dpi heads)
const TEXT_LINE_SPACING: u8 = 24;
/// Lines fed before cutting an image receipt
const IMAGE_BOTTOM_FEED: u8 = 4;
/// Lines fed before cutting plain text
const TEXT_BOTTOM_FEED: u8 = 6;

/// Cut at the end of a job: partial when the cutter supports it
fn finish(b: &mut EscPosBuilder, profile: &PrinterProfile, feed: u8) {
    if profile.partial_cut {
        b.cut_partial_feed(feed);
    } else {
        b.cut_feed(feed);
    }
}

/// Text renderer for task receipts
///
/// Output: reset, zero top feed, tight line spacing, the receipt lines,
/// minimal bottom feed, cut.
#[derive(Debug, Clone)]
pub struct TextReceiptRenderer {
    profile: PrinterProfile,
    layout: ReceiptLayout,
}

impl TextReceiptRenderer {
    pub fn new(profile: PrinterProfile) -> Self {
        let layout = ReceiptLayout::with_width(profile.columns);
        Self { profile, layout }
    }

    pub fn layout(&self) -> &ReceiptLayout {
        &self.layout
    }

    #[instrument(skip(self, receipt), fields(title = receipt.title(), profile = self.profile.name))]
    pub fn render(&self, receipt: &Receipt) -> Vec<u8> {
        let mut b = EscPosBuilder::for_profile(&self.profile);

        // flush top feed, then the receipt's own spacing
        b.line_spacing(0);
        b.line_spacing(TEXT_LINE_SPACING);

        for line in receipt.lines_with(&self.layout) {
            b.line(&line);
        }

        b.feed(0);
        finish(&mut b, &self.profile, 0);
        b.build()
    }
}

/// Renderer for receipts already rendered to an image (e.g. a PNG export
/// of the HTML preview)
#[derive(Debug, Clone)]
pub struct ImageReceiptRenderer {
    profile: PrinterProfile,
}

impl ImageReceiptRenderer {
    pub fn new(profile: PrinterProfile) -> Self {
        Self { profile }
    }

    /// Image centred on the paper as column bit images, small feed, cut
    pub fn render(&self, image: &MonoImage) -> Vec<u8> {
        let mut b = EscPosBuilder::for_profile(&self.profile);
        b.line_spacing(0);
        b.column_image(&image.centered(self.profile.dots));
        b.feed(IMAGE_BOTTOM_FEED);
        finish(&mut b, &self.profile, 0);
        b.build()
    }

    /// Load, scale and render an image file
    #[instrument(skip(self), fields(profile = self.profile.name))]
    pub fn render_file(&self, path: &Path) -> PrintResult<Vec<u8>> {
        let image = MonoImage::open(path, self.profile.dots)?;
        Ok(self.render(&image))
    }
}

/// Plain text then a cut: the minimal print job
pub fn render_text(profile: &PrinterProfile, text: &str) -> Vec<u8> {
    let mut b = EscPosBuilder::for_profile(profile);
    for line in text.lines() {
        b.line(line);
    }
    b.feed(TEXT_BOTTOM_FEED);
    b.cut();
    b.build()
}
