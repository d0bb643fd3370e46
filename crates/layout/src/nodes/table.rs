use super::BlockContext;
use crate::flow::Flow;
use crate::text::{draw_line, lines_height, wrap, Line, Piece};

pub const TABLE_SPACING: f32 = 3.0;

/// Joins a row's cells with `separator`. No separator trails the last cell.
pub fn row_text(cells: &[String], separator: &str) -> String {
    cells.join(separator)
}

/// Tables render one text line per row. Rows are never split across pages,
/// and a table that fits on a page is moved whole when it does not fit the
/// space that is left.
pub fn layout_table(flow: &mut Flow, ctx: &BlockContext<'_>, rows: &[Vec<String>]) {
    let factor = ctx.line_factor();
    let fallback = ctx.body_line_height();
    let (x, width) = (flow.content_left(), flow.content_width());

    let rows: Vec<(Vec<Line>, f32)> = rows
        .iter()
        .map(|cells| {
            let text = row_text(cells, &ctx.config.tables.separator);
            let lines = wrap(&[Piece::new(text, ctx.body)], width);
            let height = lines_height(&lines, factor, fallback).max(fallback);
            (lines, height)
        })
        .collect();
    let total: f32 = rows.iter().map(|(_, h)| h).sum();

    flow.gap(TABLE_SPACING);
    flow.keep_together(total);

    for (lines, height) in &rows {
        flow.ensure_room(*height);
        for line in lines {
            let line_height = line.height(factor, fallback);
            draw_line(flow, line, x, line_height);
            flow.advance(line_height);
        }
    }
    flow.gap(TABLE_SPACING);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::fonts::FontFamily;
    use crate::style::TextStyle;
    use postpress_types::{Margins, Size};

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_row_text_has_no_trailing_separator() {
        assert_eq!(row_text(&cells(&["a", "b", "c"]), " | "), "a | b | c");
        assert_eq!(row_text(&cells(&["only"]), " | "), "only");
    }

    #[test]
    fn test_rows_render_in_order() {
        let config = LayoutConfig::default();
        let ctx = BlockContext::new(&config, TextStyle::new(FontFamily::Helvetica, 11.0));
        let mut flow = Flow::new(Size::new(210.0, 297.0), Margins::all(15.0));
        layout_table(
            &mut flow,
            &ctx,
            &[cells(&["Name", "Role"]), cells(&["Ada", "Engineer"])],
        );

        let pages = flow.finish(None);
        let lines: Vec<_> = pages[0].texts().map(|(_, t)| t.content.clone()).collect();
        assert_eq!(lines, vec!["Name | Role", "Ada | Engineer"]);
    }

    #[test]
    fn test_table_moves_whole_when_it_fits_a_page() {
        let config = LayoutConfig::default();
        let ctx = BlockContext::new(&config, TextStyle::new(FontFamily::Helvetica, 11.0));
        let mut flow = Flow::new(Size::new(210.0, 297.0), Margins::all(15.0));
        flow.advance(250.0);

        let rows: Vec<_> = (0..10).map(|i| cells(&[format!("r{}", i).as_str(), "x"])).collect();
        layout_table(&mut flow, &ctx, &rows);

        let pages = flow.finish(None);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].elements.is_empty());
        assert_eq!(pages[1].texts().count(), 10);
    }

    #[test]
    fn test_long_table_breaks_between_rows() {
        let config = LayoutConfig::default();
        let ctx = BlockContext::new(&config, TextStyle::new(FontFamily::Helvetica, 11.0));
        let mut flow = Flow::new(Size::new(210.0, 297.0), Margins::all(15.0));

        let long = "word ".repeat(60);
        let rows: Vec<_> = (0..40).map(|i| cells(&[format!("row{}", i).as_str(), long.trim()])).collect();
        layout_table(&mut flow, &ctx, &rows);

        let pages = flow.finish(None);
        assert!(pages.len() > 1);
        for page in &pages {
            // A split row would leave its continuation at the top of the next page.
            let (_, first) = page.texts().next().unwrap();
            assert!(first.content.starts_with("row"), "page starts with {:?}", first.content);
        }
    }
}
