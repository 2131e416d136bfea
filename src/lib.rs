//! # Lanyard - Event Badge Library
//!
//! Lanyard designs and prints attendee badges for events. It provides:
//!
//! - **Custom fields**: per-event field schemas, validation, and display
//! - **Badge layouts**: paper size, positioned text elements, barcode box
//! - **Barcodes**: badge code generation and Code 128 rendering
//! - **Rendering**: compose a badge into a draw list and paint it as PDF
//! - **Printing**: the print flow with first-print badge ids and reprints
//!
//! ## Quick Start
//!
//! ```
//! use lanyard::{
//!     compose::{compose, BadgeGenerationRequest},
//!     fields::ValueMap,
//!     layout::BadgeLayoutConfig,
//!     render::render_pdf,
//! };
//!
//! let request = BadgeGenerationRequest {
//!     record_id: "p-42".into(),
//!     name: "Ada Lovelace".into(),
//!     role: "Speaker".into(),
//!     barcode: "421700000000".into(),
//!     values: ValueMap::new()
//!         .with("firstName", "Ada")
//!         .with("lastName", "Lovelace"),
//!     layout: Some(BadgeLayoutConfig::default()),
//! };
//!
//! // Lay out the badge, then paint it
//! let list = compose(&request)?;
//! let pdf = render_pdf(&list)?;
//! assert!(pdf.starts_with(b"%PDF"));
//!
//! # Ok::<(), lanyard::error::LanyardError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`fields`] | Field schemas, values, validation |
//! | [`layout`] | Badge layout model and persistence |
//! | [`barcode`] | Badge codes and Code 128 symbology |
//! | [`compose`] | Badge composition into a draw list |
//! | [`render`] | PDF output |
//! | [`print`] | Print flow and record repository |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod barcode;
pub mod compose;
pub mod error;
pub mod fields;
pub mod layout;
pub mod print;
pub mod render;
pub mod server;

// Re-exports for convenience
pub use error::LanyardError;
pub use layout::BadgeLayoutConfig;
pub use print::{PrintOutcome, PrintService};
