//! # Badge Compositor
//!
//! Resolves a [`BadgeLayoutConfig`] against one record's values and barcode,
//! producing a [`DrawList`]: a flat, inspectable list of paint operations
//! in millimeters, origin top-left, y down.
//!
//! ```text
//! BadgeGenerationRequest ──► compose() ──► DrawList ──► render::render_pdf()
//!   (layout + values +                     (Vec<DrawOp>)      (PDF bytes)
//!    barcode)
//! ```
//!
//! Composition is a pure function of its input: it never touches the
//! record, and composing the same request twice yields equal draw lists.
//!
//! ## Example
//!
//! ```
//! use lanyard::compose::{compose, BadgeGenerationRequest};
//! use lanyard::fields::ValueMap;
//!
//! let request = BadgeGenerationRequest {
//!     record_id: "p-1".into(),
//!     name: "Ada Lovelace".into(),
//!     role: "Speaker".into(),
//!     barcode: "121700000000".into(),
//!     values: ValueMap::new().with("firstName", "Ada").with("lastName", "Lovelace"),
//!     layout: None, // default A6 layout
//! };
//!
//! let draw_list = compose(&request)?;
//! assert_eq!(draw_list.text_runs().next().unwrap().value, "Ada Lovelace");
//! # Ok::<(), lanyard::LanyardError>(())
//! ```

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::barcode::{SymbologyOptions, render_code128};
use crate::error::LanyardError;
use crate::fields::ValueMap;
use crate::layout::{Align, BadgeLayoutConfig, BadgeTextElement, FontWeight, Position, Size};

/// Inset of the optional border from every page edge, in millimeters.
pub const BORDER_INSET_MM: f32 = 5.0;

/// Stroke width of the border, in millimeters.
pub const BORDER_STROKE_MM: f32 = 0.5;

/// Everything needed to draw one badge. Assembled at print time and
/// consumed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeGenerationRequest {
    pub record_id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub barcode: String,
    #[serde(default, rename = "valueMap", alias = "values")]
    pub values: ValueMap,
    /// Falls back to the default layout when absent.
    #[serde(default, rename = "layoutConfig", alias = "layout")]
    pub layout: Option<BadgeLayoutConfig>,
}

/// Grayscale color, 0.0 = black, 1.0 = white.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gray(pub f32);

impl Gray {
    pub const BLACK: Gray = Gray(0.0);
    pub const WHITE: Gray = Gray(1.0);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub value: String,
    /// Anchor point; `y` is the baseline.
    pub position: Position,
    /// Points.
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeImage {
    pub code: String,
    pub position: Position,
    pub size: Size,
    pub show_text: bool,
    /// Rendered symbology, stretched to `size` when painted.
    #[serde(skip)]
    pub image: GrayImage,
}

/// One paint operation. Later operations paint over earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    /// Fill the whole page.
    Background { color: Gray },
    /// Stroked, unfilled rectangle.
    Rectangle {
        position: Position,
        size: Size,
        stroke_width: f32,
        color: Gray,
    },
    Text(TextRun),
    Barcode(BarcodeImage),
}

/// Paint operations for one page of a given size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawList {
    pub width_mm: f32,
    pub height_mm: f32,
    pub ops: Vec<DrawOp>,
}

impl DrawList {
    pub fn new(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width_mm,
            height_mm,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn barcodes(&self) -> impl Iterator<Item = &BarcodeImage> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Barcode(barcode) => Some(barcode),
            _ => None,
        })
    }
}

/// Compose a badge.
///
/// Paint order: white background, one text run per element with a
/// non-empty value (in layout order), the border if enabled, then the
/// barcode.
///
/// # Errors
///
/// - [`LanyardError::InvalidBadgeRequest`] if the record id, name, or
///   barcode is blank; checked before anything is drawn.
/// - [`LanyardError::BarcodeEncoding`] if the barcode cannot be rendered.
pub fn compose(request: &BadgeGenerationRequest) -> Result<DrawList, LanyardError> {
    check_request(request)?;

    let default_layout;
    let layout = match &request.layout {
        Some(layout) => layout,
        None => {
            default_layout = BadgeLayoutConfig::default();
            &default_layout
        }
    };

    let (width, height) = layout.page_size_mm();
    let mut list = DrawList::new(width, height);
    list.push(DrawOp::Background { color: Gray::WHITE });

    for element in &layout.text_elements {
        let value = field_value(element, request);
        if value.is_empty() {
            continue;
        }
        list.push(DrawOp::Text(TextRun {
            value,
            position: element.position,
            font_size: element.font_size,
            font_weight: element.font_weight,
            align: element.align,
        }));
    }

    if layout.show_border {
        list.push(DrawOp::Rectangle {
            position: Position::new(BORDER_INSET_MM, BORDER_INSET_MM),
            size: Size::new(width - 2.0 * BORDER_INSET_MM, height - 2.0 * BORDER_INSET_MM),
            stroke_width: BORDER_STROKE_MM,
            color: Gray::BLACK,
        });
    }

    let barcode = &layout.barcode;
    let image = render_code128(
        &request.barcode,
        &SymbologyOptions {
            show_text: barcode.show_text,
            ..Default::default()
        },
    )?;
    list.push(DrawOp::Barcode(BarcodeImage {
        code: request.barcode.clone(),
        position: barcode.position,
        size: barcode.size,
        show_text: barcode.show_text,
        image,
    }));

    Ok(list)
}

fn check_request(request: &BadgeGenerationRequest) -> Result<(), LanyardError> {
    let missing: Vec<&str> = [
        ("id", &request.record_id),
        ("name", &request.name),
        ("barcode", &request.barcode),
    ]
    .into_iter()
    .filter(|(_, v)| v.trim().is_empty())
    .map(|(k, _)| k)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LanyardError::InvalidBadgeRequest(format!(
            "missing {}",
            missing.join(", ")
        )))
    }
}

/// Text for one element.
///
/// A comma-joined `field_name` concatenates its non-empty parts with a
/// space. A single field that resolves empty falls back to the request's
/// name (for `"name"` or any field containing `"Name"`) or role (for
/// `"role"`).
pub fn field_value(element: &BadgeTextElement, request: &BadgeGenerationRequest) -> String {
    if element.field_name.contains(',') {
        return element
            .field_names()
            .map(|name| request.values.text(name).trim().to_string())
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
    }

    let field = element.field_name.trim();
    let value = request.values.text(field);
    if !value.trim().is_empty() {
        return value;
    }
    if field == "name" || field.contains("Name") {
        request.name.clone()
    } else if field == "role" {
        request.role.clone()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BadgeBarcodeElement, PaperSize};
    use pretty_assertions::assert_eq;

    fn request() -> BadgeGenerationRequest {
        BadgeGenerationRequest {
            record_id: "p-1".into(),
            name: "Ada Lovelace".into(),
            role: "Speaker".into(),
            barcode: "121700000000".into(),
            values: ValueMap::new()
                .with("firstName", "Ada")
                .with("lastName", "Lovelace")
                .with("company", "Analytical Engines"),
            layout: None,
        }
    }

    fn element(field_name: &str) -> BadgeTextElement {
        BadgeTextElement {
            id: field_name.to_string(),
            field_name: field_name.to_string(),
            label: String::new(),
            position: Position::new(10.0, 20.0),
            font_size: 10.0,
            font_weight: FontWeight::Normal,
            align: Align::Left,
        }
    }

    fn layout(elements: Vec<BadgeTextElement>) -> BadgeLayoutConfig {
        BadgeLayoutConfig {
            paper_size: PaperSize::A6,
            show_border: false,
            text_elements: elements,
            barcode: BadgeBarcodeElement {
                position: Position::new(10.0, 100.0),
                size: Size::new(60.0, 20.0),
                show_text: true,
            },
        }
    }

    #[test]
    fn test_concatenated_fields() {
        let mut req = request();
        req.layout = Some(layout(vec![element("firstName,lastName")]));
        let list = compose(&req).unwrap();
        let runs: Vec<_> = list.text_runs().map(|r| r.value.as_str()).collect();
        assert_eq!(runs, ["Ada Lovelace"]);
    }

    #[test]
    fn test_concatenation_skips_empty_parts() {
        let mut req = request();
        req.values.remove("firstName");
        assert_eq!(field_value(&element("firstName, lastName"), &req), "Lovelace");
    }

    #[test]
    fn test_missing_concatenated_fields_omitted() {
        let mut req = request();
        req.values = ValueMap::new();
        req.layout = Some(layout(vec![element("firstName,lastName")]));
        let list = compose(&req).unwrap();
        assert_eq!(list.text_runs().count(), 0);
        assert_eq!(list.barcodes().count(), 1);
    }

    #[test]
    fn test_name_and_role_fallbacks() {
        let mut req = request();
        req.values = ValueMap::new();
        assert_eq!(field_value(&element("name"), &req), "Ada Lovelace");
        assert_eq!(field_value(&element("displayName"), &req), "Ada Lovelace");
        assert_eq!(field_value(&element("role"), &req), "Speaker");
        assert_eq!(field_value(&element("company"), &req), "");
    }

    #[test]
    fn test_stored_value_beats_fallback() {
        let mut req = request();
        req.values.insert("role", "Organizer");
        assert_eq!(field_value(&element("role"), &req), "Organizer");
    }

    #[test]
    fn test_empty_elements_skipped_order_kept() {
        let mut req = request();
        req.layout = Some(layout(vec![
            element("company"),
            element("missing"),
            element("role"),
        ]));
        let list = compose(&req).unwrap();
        let runs: Vec<_> = list.text_runs().map(|r| r.value.as_str()).collect();
        assert_eq!(runs, ["Analytical Engines", "Speaker"]);
    }

    #[test]
    fn test_paint_order() {
        let mut config = layout(vec![element("company")]);
        config.show_border = true;
        let mut req = request();
        req.layout = Some(config);
        let list = compose(&req).unwrap();
        let kinds: Vec<_> = list
            .ops
            .iter()
            .map(|op| match op {
                DrawOp::Background { .. } => "background",
                DrawOp::Rectangle { .. } => "rectangle",
                DrawOp::Text(_) => "text",
                DrawOp::Barcode(_) => "barcode",
            })
            .collect();
        assert_eq!(kinds, ["background", "text", "rectangle", "barcode"]);
    }

    #[test]
    fn test_border_inset() {
        let mut config = layout(vec![]);
        config.show_border = true;
        config.paper_size = PaperSize::A4;
        let mut req = request();
        req.layout = Some(config);
        let list = compose(&req).unwrap();
        let border = list
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Rectangle { position, size, .. } => Some((*position, *size)),
                _ => None,
            })
            .unwrap();
        assert_eq!(border, (Position::new(5.0, 5.0), Size::new(200.0, 287.0)));
    }

    #[test]
    fn test_default_layout_when_absent() {
        let list = compose(&request()).unwrap();
        assert_eq!((list.width_mm, list.height_mm), (105.0, 148.0));
        assert_eq!(list.text_runs().count(), 1);
        assert!(list.ops.iter().any(|op| matches!(op, DrawOp::Rectangle { .. })));
    }

    #[test]
    fn test_barcode_element() {
        let mut req = request();
        req.layout = Some(layout(vec![]));
        let list = compose(&req).unwrap();
        let barcode = list.barcodes().next().unwrap();
        assert_eq!(barcode.code, "121700000000");
        assert_eq!(barcode.size, Size::new(60.0, 20.0));
        assert!(barcode.image.width() > 0);
    }

    #[test]
    fn test_idempotent() {
        let req = request();
        assert_eq!(compose(&req).unwrap(), compose(&req).unwrap());
    }

    #[test]
    fn test_invalid_request() {
        let patches: [fn(&mut BadgeGenerationRequest); 3] = [
            |r| r.record_id.clear(),
            |r| r.name = "  ".into(),
            |r| r.barcode.clear(),
        ];
        for patch in patches {
            let mut req = request();
            patch(&mut req);
            assert!(matches!(
                compose(&req),
                Err(LanyardError::InvalidBadgeRequest(_))
            ));
        }
    }

    #[test]
    fn test_unencodable_barcode() {
        let mut req = request();
        req.barcode = "BADGE-€".into();
        assert!(matches!(
            compose(&req),
            Err(LanyardError::BarcodeEncoding(_))
        ));
    }

    #[test]
    fn test_request_wire_format() {
        let json = r#"{
            "recordId": "s-9", "name": "Grace Hopper", "role": "Staff",
            "barcode": "STAFF-s9-1700", "valueMap": {"firstName": "Grace"}
        }"#;
        let req: BadgeGenerationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.layout, None);
        assert_eq!(req.values.text("firstName"), "Grace");

        let out = serde_json::to_value(&req).unwrap();
        assert_eq!(out["valueMap"]["firstName"], "Grace");
        assert!(out.get("layoutConfig").is_some());
        assert!(out.get("values").is_none());
    }

    #[test]
    fn test_request_accepts_short_names() {
        let json = r#"{
            "recordId": "s-9", "name": "Grace Hopper", "barcode": "STAFF-s9-1700",
            "values": {"firstName": "Grace"}, "layout": null
        }"#;
        let req: BadgeGenerationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.values.text("firstName"), "Grace");
        assert_eq!(req.layout, None);
    }
}
