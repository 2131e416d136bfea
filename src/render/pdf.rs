//! Paint a [`DrawList`] into a single-page PDF.
//!
//! Draw lists use millimeters with the origin at the top-left; PDF user
//! space uses points with the origin at the bottom-left. [`PageSpace`]
//! owns that conversion so the painters below can stay in draw-list terms.
//!
//! Text uses the non-embedded Helvetica base fonts (WinAnsi). Barcodes are
//! embedded as 8-bit DeviceGray image XObjects scaled to their box.
//! Content outside the page is clipped by the MediaBox.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

use super::font::{base_font, encode_win_ansi, text_width_pt};
use crate::compose::{BarcodeImage, DrawList, DrawOp, Gray, TextRun};
use crate::error::LanyardError;
use crate::layout::{Align, FontWeight, Position, Size};

/// Points per millimeter.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

/// Coordinate conversion for one page.
#[derive(Debug, Clone, Copy)]
struct PageSpace {
    height_mm: f32,
}

impl PageSpace {
    fn x(&self, mm: f32) -> f32 {
        mm * PT_PER_MM
    }

    /// Top-down millimeters to bottom-up points.
    fn y(&self, mm: f32) -> f32 {
        (self.height_mm - mm) * PT_PER_MM
    }

    fn len(&self, mm: f32) -> f32 {
        mm * PT_PER_MM
    }

    /// `[x, y, w, h]` operands for `re`, from a top-left box.
    fn rect(&self, position: Position, size: Size) -> Vec<Object> {
        vec![
            self.x(position.x).into(),
            self.y(position.y + size.height).into(),
            self.len(size.width).into(),
            self.len(size.height).into(),
        ]
    }
}

/// Render `list` to PDF bytes.
pub fn render_pdf(list: &DrawList) -> Result<Vec<u8>, LanyardError> {
    if !(list.width_mm > 0.0 && list.height_mm > 0.0) {
        return Err(LanyardError::Render(format!(
            "invalid page size {}x{}mm",
            list.width_mm, list.height_mm
        )));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let space = PageSpace {
        height_mm: list.height_mm,
    };

    let regular_id = add_font(&mut doc, FontWeight::Normal);
    let bold_id = add_font(&mut doc, FontWeight::Bold);

    let mut operations = Vec::new();
    let mut xobjects = Dictionary::new();
    let mut image_count = 0usize;
    for op in &list.ops {
        match op {
            DrawOp::Background { color } => {
                let page = Size::new(list.width_mm, list.height_mm);
                operations.extend([
                    Operation::new("q", vec![]),
                    Operation::new("g", vec![color.0.into()]),
                    Operation::new("re", space.rect(Position::default(), page)),
                    Operation::new("f", vec![]),
                    Operation::new("Q", vec![]),
                ]);
            }
            DrawOp::Rectangle {
                position,
                size,
                stroke_width,
                color,
            } => {
                operations.extend([
                    Operation::new("q", vec![]),
                    Operation::new("w", vec![space.len(*stroke_width).into()]),
                    Operation::new("G", vec![color.0.into()]),
                    Operation::new("re", space.rect(*position, *size)),
                    Operation::new("S", vec![]),
                    Operation::new("Q", vec![]),
                ]);
            }
            DrawOp::Text(run) => operations.extend(text_ops(run, &space)),
            DrawOp::Barcode(barcode) => {
                let name = format!("Im{}", image_count);
                image_count += 1;
                let image_id = doc.add_object(image_xobject(barcode));
                xobjects.set(name.as_bytes().to_vec(), image_id);
                operations.extend(image_ops(barcode, &name, &space));
            }
        }
    }

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
        },
        "XObject" => xobjects,
    });
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            space.len(list.width_mm).into(),
            space.len(list.height_mm).into(),
        ],
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn add_font(doc: &mut Document, weight: FontWeight) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font(weight),
        "Encoding" => "WinAnsiEncoding",
    })
}

fn text_ops(run: &TextRun, space: &PageSpace) -> Vec<Operation> {
    let font = match run.font_weight {
        FontWeight::Normal => FONT_REGULAR,
        FontWeight::Bold => FONT_BOLD,
    };
    let width = text_width_pt(&run.value, run.font_weight, run.font_size);
    let anchor = space.x(run.position.x);
    let left = match run.align {
        Align::Left => anchor,
        Align::Center => anchor - width / 2.0,
        Align::Right => anchor - width,
    };

    vec![
        Operation::new("BT", vec![]),
        Operation::new("g", vec![Gray::BLACK.0.into()]),
        Operation::new("Tf", vec![font.into(), run.font_size.into()]),
        Operation::new("Td", vec![left.into(), space.y(run.position.y).into()]),
        Operation::new(
            "Tj",
            vec![Object::String(
                encode_win_ansi(&run.value),
                StringFormat::Literal,
            )],
        ),
        Operation::new("ET", vec![]),
    ]
}

fn image_xobject(barcode: &BarcodeImage) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => barcode.image.width() as i64,
            "Height" => barcode.image.height() as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
            "Interpolate" => false,
        },
        barcode.image.as_raw().clone(),
    )
}

/// Scale the unit image square to the barcode box, then paint it.
fn image_ops(barcode: &BarcodeImage, name: &str, space: &PageSpace) -> Vec<Operation> {
    let Size { width, height } = barcode.size;
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                space.len(width).into(),
                0.into(),
                0.into(),
                space.len(height).into(),
                space.x(barcode.position.x).into(),
                space.y(barcode.position.y + height).into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}
