//! # Rendering Module
//!
//! Turns a composed [`DrawList`](crate::compose::DrawList) into a printable
//! artifact.
//!
//! ## Modules
//!
//! - [`pdf`]: single-page PDF output in physical units
//! - [`font`]: Helvetica metrics and WinAnsi encoding for text runs
//!
//! ## Usage Example
//!
//! ```
//! use lanyard::compose::{compose, BadgeGenerationRequest};
//! use lanyard::fields::ValueMap;
//! use lanyard::render::render_pdf;
//!
//! let request = BadgeGenerationRequest {
//!     record_id: "s-1".into(),
//!     name: "Grace Hopper".into(),
//!     role: "Staff".into(),
//!     barcode: "STAFF-s1-1700000000".into(),
//!     values: ValueMap::new(),
//!     layout: None,
//! };
//!
//! let pdf = render_pdf(&compose(&request)?)?;
//! assert!(pdf.starts_with(b"%PDF"));
//! # Ok::<(), lanyard::LanyardError>(())
//! ```

pub mod font;
pub mod pdf;

pub use pdf::{PT_PER_MM, render_pdf};
