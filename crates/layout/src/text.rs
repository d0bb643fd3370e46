//! Greedy line breaking over styled pieces, and placing the resulting lines.

use crate::elements::{LayoutElement, RectElement, TextElement};
use crate::flow::Flow;
use crate::style::TextStyle;
use postpress_markup::InlineRun;

/// Slack for accumulated rounding when comparing widths.
const WIDTH_TOLERANCE: f32 = 0.001;

/// Text sharing one style, as input to [`wrap`].
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub text: String,
    pub style: TextStyle,
    pub link: Option<String>,
}

impl Piece {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            link: None,
        }
    }
}

/// Turns inline runs into pieces styled on top of `base`.
pub fn pieces_from_runs(runs: &[InlineRun], base: &TextStyle) -> Vec<Piece> {
    runs.iter()
        .map(|run| Piece {
            text: run.text.clone(),
            style: base.with_run(run.style, run.is_link()),
            link: run.link.clone(),
        })
        .collect()
}

/// A styled fragment of a line, `x` relative to the line start.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub style: TextStyle,
    pub link: Option<String>,
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub fragments: Vec<Fragment>,
    pub width: f32,
}

impl Line {
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    /// Pitch of the tallest fragment, or `fallback` for an empty line.
    pub fn height(&self, factor: f32, fallback: f32) -> f32 {
        self.fragments
            .iter()
            .map(|f| f.style.line_height(factor))
            .fold(None, |acc: Option<f32>, h| Some(acc.map_or(h, |a| a.max(h))))
            .unwrap_or(fallback)
    }

    fn append(&mut self, text: &str, piece: &Piece) {
        if text.is_empty() {
            return;
        }
        let width = piece.style.text_width(text);
        match self.fragments.last_mut() {
            Some(last) if last.style == piece.style && last.link == piece.link => {
                last.text.push_str(text);
                last.width += width;
            }
            _ => self.fragments.push(Fragment {
                text: text.to_string(),
                style: piece.style,
                link: piece.link.clone(),
                x: self.width,
                width,
            }),
        }
        self.width += width;
    }
}

enum Token {
    /// Segments of one unbreakable word, tagged with their piece index.
    Word(Vec<(usize, String)>),
    Space(usize),
    Newline,
}

fn tokenize(pieces: &[Piece]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word: Vec<(usize, String)> = Vec::new();

    for (index, piece) in pieces.iter().enumerate() {
        for ch in piece.text.chars() {
            match ch {
                '\n' | ' ' => {
                    if !word.is_empty() {
                        tokens.push(Token::Word(std::mem::take(&mut word)));
                    }
                    tokens.push(if ch == '\n' {
                        Token::Newline
                    } else {
                        Token::Space(index)
                    });
                }
                _ => match word.last_mut() {
                    Some((last, text)) if *last == index => text.push(ch),
                    _ => word.push((index, ch.to_string())),
                },
            }
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    tokens
}

/// Breaks `pieces` into lines no wider than `max_width` millimetres.
///
/// Lines break at spaces; `'\n'` always starts a new line. A word wider than
/// a whole line is split between characters. Spaces at a break are dropped.
pub fn wrap(pieces: &[Piece], max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::default();
    let mut pending_space: Option<usize> = None;

    for token in tokenize(pieces) {
        match token {
            Token::Newline => {
                lines.push(std::mem::take(&mut line));
                pending_space = None;
            }
            Token::Space(index) => {
                if !line.fragments.is_empty() && pending_space.is_none() {
                    pending_space = Some(index);
                }
            }
            Token::Word(segments) => {
                let word_width: f32 = segments
                    .iter()
                    .map(|(i, text)| pieces[*i].style.text_width(text))
                    .sum();
                let space_width = pending_space
                    .map(|i| pieces[i].style.text_width(" "))
                    .unwrap_or(0.0);

                let needed = line.width + space_width + word_width;
                if !line.fragments.is_empty() && needed > max_width + WIDTH_TOLERANCE {
                    lines.push(std::mem::take(&mut line));
                    pending_space = None;
                }

                if let Some(i) = pending_space.take() {
                    if !line.fragments.is_empty() {
                        line.append(" ", &pieces[i]);
                    }
                }

                if line.fragments.is_empty() && word_width > max_width + WIDTH_TOLERANCE {
                    split_word(&segments, pieces, max_width, &mut line, &mut lines);
                } else {
                    for (i, text) in &segments {
                        line.append(text, &pieces[*i]);
                    }
                }
            }
        }
    }

    if !line.fragments.is_empty() {
        lines.push(line);
    }
    lines
}

fn split_word(
    segments: &[(usize, String)],
    pieces: &[Piece],
    max_width: f32,
    line: &mut Line,
    lines: &mut Vec<Line>,
) {
    for (i, text) in segments {
        let piece = &pieces[*i];
        for ch in text.chars() {
            let mut buf = [0u8; 4];
            let glyph: &str = ch.encode_utf8(&mut buf);
            let width = piece.style.text_width(glyph);
            if !line.fragments.is_empty() && line.width + width > max_width + WIDTH_TOLERANCE {
                lines.push(std::mem::take(line));
            }
            line.append(glyph, piece);
        }
    }
}

/// Places `lines` starting at the cursor, one line at a time. Each line
/// checks for room first, so a paragraph may continue on the next page.
pub fn draw_lines(flow: &mut Flow, lines: &[Line], x: f32, factor: f32, fallback_height: f32) {
    for line in lines {
        let height = line.height(factor, fallback_height);
        flow.ensure_room(height);
        draw_line(flow, line, x, height);
        flow.advance(height);
    }
}

/// Wraps a single-style string to the content width and places it at the
/// left margin.
pub fn draw_text(flow: &mut Flow, text: &str, style: &TextStyle, factor: f32) {
    let (x, width) = (flow.content_left(), flow.content_width());
    let lines = wrap(&[Piece::new(text, *style)], width);
    draw_lines(flow, &lines, x, factor, style.line_height(factor));
}

/// Places one line at the cursor without moving it.
pub fn draw_line(flow: &mut Flow, line: &Line, x: f32, height: f32) {
    let y = flow.y();
    for fragment in &line.fragments {
        if let Some(fill) = fragment.style.background {
            flow.push(
                x + fragment.x,
                y,
                fragment.width,
                height,
                LayoutElement::Rectangle(RectElement { fill }),
            );
        }
        flow.push(
            x + fragment.x,
            y,
            fragment.width,
            height,
            LayoutElement::Text(text_element(&fragment.text, &fragment.style, fragment.link.clone())),
        );
    }
}

pub fn text_element(content: &str, style: &TextStyle, link: Option<String>) -> TextElement {
    TextElement {
        content: content.to_string(),
        font: style.font(),
        size: style.size,
        color: style.color,
        underline: style.underline,
        background: style.background,
        link,
    }
}

/// Total height of `lines`.
pub fn lines_height(lines: &[Line], factor: f32, fallback: f32) -> f32 {
    lines.iter().map(|l| l.height(factor, fallback)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontFamily;

    fn courier(size: f32) -> TextStyle {
        TextStyle::new(FontFamily::Courier, size)
    }

    /// Width of `n` Courier glyphs at 10pt.
    fn mono_width(n: usize) -> f32 {
        courier(10.0).text_width(&"x".repeat(n))
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::text).collect()
    }

    #[test]
    fn test_wraps_at_spaces() {
        let pieces = vec![Piece::new("aaa bbb ccc", courier(10.0))];
        let lines = wrap(&pieces, mono_width(7));
        assert_eq!(texts(&lines), vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn test_newline_forces_break() {
        let pieces = vec![Piece::new("one\ntwo", courier(10.0))];
        let lines = wrap(&pieces, 1000.0);
        assert_eq!(texts(&lines), vec!["one", "two"]);
    }

    #[test]
    fn test_blank_line_between_breaks_is_kept() {
        let pieces = vec![Piece::new("a\n\nb", courier(10.0))];
        let lines = wrap(&pieces, 1000.0);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].fragments.is_empty());
        let fallback = 4.0;
        assert_eq!(lines[1].height(1.3, fallback), fallback);
    }

    #[test]
    fn test_long_word_is_split() {
        let pieces = vec![Piece::new("abcdefghij", courier(10.0))];
        let lines = wrap(&pieces, mono_width(4));
        assert_eq!(texts(&lines), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_word_spanning_styles_stays_together() {
        let plain = courier(10.0);
        let bold = courier(10.0).bold();
        let pieces = vec![Piece::new("xx ab", plain), Piece::new("cd", bold)];
        let lines = wrap(&pieces, mono_width(5));
        assert_eq!(texts(&lines), vec!["xx", "abcd"]);
        assert_eq!(lines[1].fragments.len(), 2);
        assert_eq!(lines[1].fragments[1].style, bold);
        assert!((lines[1].fragments[1].x - mono_width(2)).abs() < 0.001);
    }

    #[test]
    fn test_fragments_merge_and_measure() {
        let pieces = vec![Piece::new("Hello ", courier(10.0)), Piece::new("World", courier(10.0))];
        let lines = wrap(&pieces, 1000.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].fragments.len(), 1);
        assert!((lines[0].width - mono_width(11)).abs() < 0.001);
    }

    #[test]
    fn test_tallest_fragment_sets_line_height() {
        let pieces = vec![Piece::new("small ", courier(8.0)), Piece::new("big", courier(16.0))];
        let lines = wrap(&pieces, 1000.0);
        let expected = courier(16.0).line_height(1.3);
        assert!((lines[0].height(1.3, 0.0) - expected).abs() < 0.001);
    }

    #[test]
    fn test_draw_lines_flows_across_pages() {
        use postpress_types::{Margins, Size};
        let mut flow = Flow::new(Size::new(100.0, 40.0), Margins::all(10.0));
        let text = vec!["line"; 8].join("\n");
        let lines = wrap(&[Piece::new(text, courier(10.0))], 80.0);
        draw_lines(&mut flow, &lines, 10.0, 1.3, 4.6);
        // 20mm of usable height fits four 4.59mm lines per page.
        assert_eq!(flow.page_count(), 2);
    }
}
