use crate::fonts::FontFamily;
use postpress_types::{Margins, PageSize};
use serde::{Deserialize, Serialize};

/// Every tunable the layout engine reads. All lengths are in millimetres and
/// all font sizes in points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub page: PageConfig,
    pub fonts: FontConfig,
    pub lists: ListConfig,
    pub tables: TableConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    pub size: PageSize,
    pub margins: Margins,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontConfig {
    pub family: FontFamily,
    /// Body text size of the post.
    ///
    /// Defaults to `11.0`.
    pub base_size: f32,
    /// Line pitch as a multiple of the font size.
    ///
    /// Defaults to `1.3`.
    pub line_height: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: FontFamily::Helvetica,
            base_size: 11.0,
            line_height: 1.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListConfig {
    /// Indent of a top-level marker from the left margin.
    pub base_indent: f32,
    /// Extra indent added per nesting level.
    pub level_indent: f32,
    /// Bullet glyph per depth. Depths beyond the list reuse the first glyph.
    pub bullets: Vec<String>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            base_indent: 10.0,
            level_indent: 20.0,
            bullets: vec!["•".to_string(), "◦".to_string(), "▪".to_string()],
        }
    }
}

impl ListConfig {
    pub fn indent(&self, depth: usize) -> f32 {
        self.base_indent + depth as f32 * self.level_indent
    }

    pub fn bullet(&self, depth: usize) -> &str {
        self.bullets
            .get(depth)
            .or_else(|| self.bullets.first())
            .map(String::as_str)
            .unwrap_or("•")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    /// Placed between the cells of a row.
    ///
    /// Defaults to `" | "`.
    pub separator: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            separator: " | ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageConfig {
    /// Upper bound on the displayed width, further limited by the content
    /// width minus both side insets.
    pub max_width: f32,
    pub max_height: f32,
    pub side_inset: f32,
    /// Millimetres per source pixel. `0.264583` corresponds to 96 DPI.
    pub px_to_mm: f32,
    /// Minimum free height required below the cursor before an image is placed
    /// on the current page.
    ///
    /// Defaults to `100.0`.
    pub page_break_reserve: f32,
    /// Lets images smaller than the box grow to fill it.
    ///
    /// Defaults to `false`.
    pub allow_upscale: bool,
    /// Images with more pixels than this are refused before decoding.
    pub max_pixels: u64,
    /// Print the `Original src:` hint under an image placeholder.
    pub show_source_hint: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: 140.0,
            max_height: 90.0,
            side_inset: 20.0,
            px_to_mm: 0.264583,
            page_break_reserve: 100.0,
            allow_upscale: false,
            max_pixels: 40_000_000,
            show_source_hint: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_house_style() {
        let config = LayoutConfig::default();
        assert_eq!(config.page.size, PageSize::A4);
        assert_eq!(config.page.margins, Margins::all(15.0));
        assert_eq!(config.fonts.base_size, 11.0);
        assert_eq!(config.tables.separator, " | ");
        assert!(!config.images.allow_upscale);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: LayoutConfig = serde_json::from_str(
            r#"{"images": {"allowUpscale": true}, "lists": {"levelIndent": 8}}"#,
        )
        .unwrap();
        assert!(config.images.allow_upscale);
        assert_eq!(config.images.max_width, 140.0);
        assert_eq!(config.lists.level_indent, 8.0);
        assert_eq!(config.lists.base_indent, 10.0);
        assert_eq!(config.lists.bullets.len(), 3);
    }

    #[test]
    fn test_list_indent_and_bullet_fallback() {
        let lists = ListConfig::default();
        assert_eq!(lists.indent(0), 10.0);
        assert_eq!(lists.indent(2), 50.0);
        assert_eq!(lists.bullet(1), "◦");
        assert_eq!(lists.bullet(3), "•");

        let empty = ListConfig {
            bullets: Vec::new(),
            ..ListConfig::default()
        };
        assert_eq!(empty.bullet(0), "•");
    }
}
