//! Core value types for the Trellis layout engine.
//!
//! This crate provides the plain data used by `trellis-layout`:
//! - Geometry (sizes, optional sizes, offsets, rects)
//! - Lengths with units and the scale factors that resolve them
//! - Box-model and item properties (padding, margin, border, aspect ratio, flex, grid)
//! - Safe-area insets and expansion options
//! - Error types for the parsing entry points

pub mod dimension;
pub mod errors;
pub mod geometry;
pub mod properties;
pub mod safe_area;

pub use dimension::*;
pub use errors::*;
pub use geometry::*;
pub use properties::*;
pub use safe_area::*;
