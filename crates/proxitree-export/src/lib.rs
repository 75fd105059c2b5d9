//! proxitree-export: Pure format serializers (sans-IO)
//!
//! Renders graphs into output formats. Currently supports SVG.

pub mod svg;

pub use svg::{SvgMetadata, SvgStyle, to_svg};
