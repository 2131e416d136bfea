//! # Badge Layout Model
//!
//! A badge layout is a small declarative document: a paper size, an optional
//! border, text elements bound to record fields, and one barcode. All
//! positions and sizes are millimeters from the top-left corner of the page.
//!
//! The wire format is camelCase JSON:
//!
//! ```json
//! {
//!   "paperSize": "A6",
//!   "showBorder": true,
//!   "textElements": [
//!     {"id": "name", "fieldName": "firstName,lastName", "label": "Name",
//!      "position": {"x": 52.5, "y": 40}, "fontSize": 14,
//!      "fontWeight": "bold", "align": "center"}
//!   ],
//!   "barcode": {"position": {"x": 12.5, "y": 100},
//!               "size": {"width": 80, "height": 25}, "showText": true}
//! }
//! ```

pub mod store;

pub use store::{
    FileStore, KeyValueStore, LAYOUT_STORAGE_KEY, MemoryStore, load_layout_config,
    load_layout_config_or_default, save_layout_config,
};

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

/// Supported paper formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    /// 210 × 297 mm
    A4,
    /// 105 × 148 mm
    #[default]
    A6,
}

impl PaperSize {
    /// (width, height) in millimeters, portrait.
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A6 => (105.0, 148.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Horizontal anchoring of a text element relative to its `x` position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// A text element bound to one or more record fields.
///
/// `field_name` is either a single field name or a comma-joined list
/// (`"firstName,lastName"`), in which case the non-empty values are joined
/// with a space. `position.y` is the text baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeTextElement {
    pub id: String,
    pub field_name: String,
    #[serde(default)]
    pub label: String,
    pub position: Position,
    /// Points.
    pub font_size: f32,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub align: Align,
}

impl BadgeTextElement {
    /// New left-aligned, normal-weight 12pt element with a fresh id.
    pub fn new(field_name: impl Into<String>, label: impl Into<String>, position: Position) -> Self {
        Self {
            id: generate_element_id(),
            field_name: field_name.into(),
            label: label.into(),
            position,
            font_size: 12.0,
            font_weight: FontWeight::Normal,
            align: Align::Left,
        }
    }

    /// Field names this element reads, in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.field_name
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeBarcodeElement {
    pub position: Position,
    pub size: Size,
    #[serde(default = "default_true")]
    pub show_text: bool,
}

fn default_true() -> bool {
    true
}

/// Complete badge layout for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeLayoutConfig {
    #[serde(default)]
    pub paper_size: PaperSize,
    #[serde(default = "default_true")]
    pub show_border: bool,
    pub text_elements: Vec<BadgeTextElement>,
    pub barcode: BadgeBarcodeElement,
}

impl Default for BadgeLayoutConfig {
    /// A6 with border, the attendee's full name centered in bold 14pt, and
    /// a captioned barcode in the lower half.
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A6,
            show_border: true,
            text_elements: vec![BadgeTextElement {
                id: "name".to_string(),
                field_name: "firstName,lastName".to_string(),
                label: "Name".to_string(),
                position: Position::new(52.5, 40.0),
                font_size: 14.0,
                font_weight: FontWeight::Bold,
                align: Align::Center,
            }],
            barcode: BadgeBarcodeElement {
                position: Position::new(12.5, 100.0),
                size: Size::new(80.0, 25.0),
                show_text: true,
            },
        }
    }
}

impl BadgeLayoutConfig {
    pub fn page_size_mm(&self) -> (f32, f32) {
        self.paper_size.dimensions_mm()
    }

    pub fn element(&self, id: &str) -> Option<&BadgeTextElement> {
        self.text_elements.iter().find(|e| e.id == id)
    }

    /// Append a text element, returning its id.
    pub fn add_text_element(&mut self, element: BadgeTextElement) -> String {
        let id = element.id.clone();
        self.text_elements.push(element);
        id
    }

    pub fn remove_text_element(&mut self, id: &str) -> Option<BadgeTextElement> {
        let index = self.text_elements.iter().position(|e| e.id == id)?;
        Some(self.text_elements.remove(index))
    }

    /// Ids of text elements, plus `"barcode"`, whose anchor lies outside
    /// the page. Such layouts still render; the page boundary clips them.
    pub fn out_of_bounds(&self) -> Vec<&str> {
        let (w, h) = self.page_size_mm();
        let inside = |p: Position| (0.0..=w).contains(&p.x) && (0.0..=h).contains(&p.y);
        let mut ids: Vec<&str> = self
            .text_elements
            .iter()
            .filter(|e| !inside(e.position))
            .map(|e| e.id.as_str())
            .collect();
        if !inside(self.barcode.position) {
            ids.push("barcode");
        }
        ids
    }
}

/// Identifier for a newly added layout element: `element-<millis>-<random>`.
///
/// Unique within an editing session; no global uniqueness is attempted.
pub fn generate_element_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!(
        "element-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        suffix
    )
}
