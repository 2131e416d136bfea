//! Code 128 rasterization.
//!
//! Uses the barcoders crate for module encoding and the Spleen bitmap font
//! for the optional human-readable caption. Output is an 8-bit grayscale
//! image (0 = black bar, 255 = white) ready to embed in a document.

use barcoders::sym::code128::Code128;
use image::{GrayImage, Luma};
use spleen_font::{FONT_12X24, PSF2Font};

use crate::error::LanyardError;

/// Code 128 character set B: printable ASCII.
const CHARSET_B: char = '\u{0181}';
/// Code 128 character set C: digit pairs.
const CHARSET_C: char = '\u{0106}';

const GLYPH_WIDTH: u32 = 12;
const GLYPH_HEIGHT: u32 = 24;
const CAPTION_GAP: u32 = 4;

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

/// Raster parameters, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbologyOptions {
    /// Width of one narrow module.
    pub module_width: u32,
    /// Bar height, excluding caption.
    pub bar_height: u32,
    /// Blank modules on each side.
    pub quiet_zone: u32,
    /// Draw the encoded text beneath the bars.
    pub show_text: bool,
}

impl Default for SymbologyOptions {
    fn default() -> Self {
        Self {
            module_width: 2,
            bar_height: 80,
            quiet_zone: 10,
            show_text: true,
        }
    }
}

/// Encode `data` as Code 128 modules (`true` = bar).
///
/// Even-length digit strings use character set C, everything else set B.
pub fn encode_code128(data: &str) -> Result<Vec<bool>, LanyardError> {
    if data.is_empty() {
        return Err(LanyardError::BarcodeEncoding("empty barcode data".into()));
    }
    if let Some(bad) = data.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(LanyardError::BarcodeEncoding(format!(
            "{:?} contains {:?}, which Code 128 cannot encode",
            data, bad
        )));
    }

    let charset = if data.len() % 2 == 0 && data.chars().all(|c| c.is_ascii_digit()) {
        CHARSET_C
    } else {
        CHARSET_B
    };
    let prefixed = format!("{}{}", charset, data);
    let barcode = Code128::new(&prefixed)
        .map_err(|e| LanyardError::BarcodeEncoding(format!("{:?}: {:?}", data, e)))?;

    Ok(barcode.encode().into_iter().map(|m| m == 1).collect())
}

/// Render `data` as a Code 128 image.
///
/// Fails with [`LanyardError::BarcodeEncoding`] when the data cannot be
/// encoded; nothing is drawn in that case.
pub fn render_code128(data: &str, opts: &SymbologyOptions) -> Result<GrayImage, LanyardError> {
    let modules = encode_code128(data)?;
    let module_width = opts.module_width.max(1);
    let quiet = opts.quiet_zone * module_width;

    let bars_width = modules.len() as u32 * module_width + 2 * quiet;
    let caption_width = data.chars().count() as u32 * GLYPH_WIDTH + 2 * quiet;
    let width = if opts.show_text {
        bars_width.max(caption_width)
    } else {
        bars_width
    };
    let bar_height = opts.bar_height.max(1);
    let height = if opts.show_text {
        bar_height + CAPTION_GAP + GLYPH_HEIGHT
    } else {
        bar_height
    };

    let mut img = GrayImage::from_pixel(width, height, WHITE);

    // Center the bars when the caption is wider.
    let bars_left = (width - bars_width) / 2 + quiet;
    for (i, _) in modules.iter().enumerate().filter(|(_, bar)| **bar) {
        let x0 = bars_left + i as u32 * module_width;
        for x in x0..x0 + module_width {
            for y in 0..bar_height {
                img.put_pixel(x, y, BLACK);
            }
        }
    }

    if opts.show_text {
        let text_width = data.chars().count() as u32 * GLYPH_WIDTH;
        draw_caption(&mut img, data, (width - text_width) / 2, bar_height + CAPTION_GAP)?;
    }

    Ok(img)
}

/// Blit `text` with Spleen 12x24 at (`left`, `top`).
fn draw_caption(img: &mut GrayImage, text: &str, left: u32, top: u32) -> Result<(), LanyardError> {
    let mut font = PSF2Font::new(FONT_12X24)
        .map_err(|e| LanyardError::Render(format!("Failed to load caption font: {:?}", e)))?;

    for (i, ch) in text.chars().enumerate() {
        let utf8 = ch.to_string();
        let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) else {
            continue;
        };
        let glyph_left = left + i as u32 * GLYPH_WIDTH;
        for (row_y, row) in glyph.enumerate() {
            for (col_x, on) in row.enumerate() {
                let (x, y) = (glyph_left + col_x as u32, top + row_y as u32);
                if on && x < img.width() && y < img.height() {
                    img.put_pixel(x, y, BLACK);
                }
            }
        }
    }
    Ok(())
}
