//! Page size and margin definitions.

use crate::Size;
use serde::{Deserialize, Serialize};

/// Physical page size. Named sizes map to their ISO/ANSI dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PageSize {
    #[default]
    #[serde(alias = "A4")]
    A4,
    #[serde(alias = "Letter")]
    Letter,
    #[serde(alias = "Legal")]
    Legal,
    Custom {
        width: f32,
        height: f32,
    },
}

impl PageSize {
    /// Portrait dimensions in millimetres.
    pub fn dimensions(&self) -> Size {
        match *self {
            PageSize::A4 => Size::new(210.0, 297.0),
            PageSize::Letter => Size::new(215.9, 279.4),
            PageSize::Legal => Size::new(215.9, 355.6),
            PageSize::Custom { width, height } => Size::new(width, height),
        }
    }
}

/// Page margins in millimetres. Missing fields take the 15mm default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::all(15.0)
    }
}
