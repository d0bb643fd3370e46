//! Foundation types shared by every postpress crate.
//!
//! All distances are in millimetres (the layout length unit) unless a name
//! says otherwise; font sizes are in points.

pub mod color;
pub mod geometry;
pub mod page;

pub use color::Color;
pub use geometry::Size;
pub use page::{Margins, PageSize};

/// Millimetres per PostScript point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Converts a length in points to millimetres.
pub fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_PT
}

/// Converts a length in millimetres to points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion_roundtrip_for_a4_width() {
        let pt = mm_to_pt(210.0);
        assert!((pt - 595.28).abs() < 0.01);
        assert!((pt_to_mm(pt) - 210.0).abs() < 0.001);
    }
}
