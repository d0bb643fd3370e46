//! Vertical flow and page breaking.
//!
//! A [`Flow`] owns the cursor and every page produced so far. Layout code
//! measures a block, asks [`Flow::ensure_room`] for its height, then places
//! elements at the cursor and advances it. Page breaks only happen inside
//! `ensure_room` (or an explicit [`Flow::next_page`]), so a break always
//! precedes the placement that needed it.

use crate::elements::{LayoutElement, Page, PositionedElement, TextElement};
use postpress_types::{Margins, Size};

/// Tolerance for comparing cursor positions.
const EPSILON: f32 = 0.01;

/// The write position on the current page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    pub x: f32,
    pub y: f32,
    pub page_width: f32,
    pub page_height: f32,
    pub margins: Margins,
    /// Zero-based.
    pub page_index: usize,
}

impl PageCursor {
    pub fn content_left(&self) -> f32 {
        self.margins.left
    }

    pub fn content_width(&self) -> f32 {
        (self.page_width - self.margins.horizontal()).max(0.0)
    }

    pub fn top(&self) -> f32 {
        self.margins.top
    }

    /// The break threshold: nothing is placed below this line.
    pub fn bottom_limit(&self) -> f32 {
        self.page_height - self.margins.bottom
    }

    pub fn remaining(&self) -> f32 {
        self.bottom_limit() - self.y
    }

    pub fn at_page_top(&self) -> bool {
        self.y <= self.top() + EPSILON
    }

    /// Usable height of an empty page.
    pub fn page_capacity(&self) -> f32 {
        self.bottom_limit() - self.top()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Page1Active,
    /// Carries the one-based number of the active page.
    PageNActive(usize),
    Finalizing,
    Finished,
}

#[derive(Debug)]
pub struct Flow {
    cursor: PageCursor,
    state: FlowState,
    pages: Vec<Page>,
    current: Vec<PositionedElement>,
}

impl Flow {
    pub fn new(page: Size, margins: Margins) -> Self {
        Self {
            cursor: PageCursor {
                x: margins.left,
                y: margins.top,
                page_width: page.width,
                page_height: page.height,
                margins,
                page_index: 0,
            },
            state: FlowState::Idle,
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Opens the first page. Placing anything on an idle flow opens it too.
    pub fn begin(&mut self) {
        if self.state == FlowState::Idle {
            log::debug!("Starting page 1");
            self.state = FlowState::Page1Active;
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn y(&self) -> f32 {
        self.cursor.y
    }

    pub fn content_left(&self) -> f32 {
        self.cursor.content_left()
    }

    pub fn content_width(&self) -> f32 {
        self.cursor.content_width()
    }

    /// Pages started so far, the active one included.
    pub fn page_count(&self) -> usize {
        match self.state {
            FlowState::Idle => 0,
            _ => self.cursor.page_index + 1,
        }
    }

    /// Breaks to a new page when `height` does not fit below the cursor and
    /// the cursor is not already at the top of a page. Returns whether it broke.
    pub fn ensure_room(&mut self, height: f32) -> bool {
        self.begin();
        if self.cursor.y + height > self.cursor.bottom_limit() + EPSILON && !self.cursor.at_page_top()
        {
            log::debug!(
                "Block of {:.1}mm does not fit in {:.1}mm remaining on page {}",
                height,
                self.cursor.remaining(),
                self.cursor.page_index + 1
            );
            self.next_page();
            true
        } else {
            false
        }
    }

    /// Moves a block of `height` whole to the next page when it does not fit
    /// the remaining room but fits an empty page. Taller blocks are left to
    /// break between their lines.
    pub fn keep_together(&mut self, height: f32) -> bool {
        self.begin();
        if height <= self.cursor.page_capacity() + EPSILON {
            self.ensure_room(height)
        } else {
            false
        }
    }

    /// Vertical spacing that is dropped at the top of a page.
    pub fn gap(&mut self, height: f32) {
        if !self.cursor.at_page_top() {
            self.advance(height);
        }
    }

    /// Moves the cursor down, never past the bottom break threshold.
    pub fn advance(&mut self, height: f32) {
        self.begin();
        self.cursor.y = (self.cursor.y + height).min(self.cursor.bottom_limit());
    }

    pub fn next_page(&mut self) {
        self.begin();
        self.close_page();
        self.cursor.page_index += 1;
        self.cursor.y = self.cursor.top();
        self.cursor.x = self.cursor.content_left();
        self.state = FlowState::PageNActive(self.cursor.page_index + 1);
        log::debug!("Starting page {}", self.cursor.page_index + 1);
    }

    /// Adds an element to the active page. Positions are absolute.
    pub fn push(&mut self, x: f32, y: f32, width: f32, height: f32, element: LayoutElement) {
        self.begin();
        self.current.push(PositionedElement {
            x,
            y,
            width,
            height,
            element,
        });
    }

    /// Closes the flow. `footer` is centred inside the bottom margin of the
    /// final page only.
    pub fn finish(mut self, footer: Option<TextElement>) -> Vec<Page> {
        self.begin();
        self.state = FlowState::Finalizing;

        if let Some(text) = footer {
            let width = text.font.text_width(&text.content, text.size);
            let height = postpress_types::pt_to_mm(text.size * 1.3);
            let margin = self.cursor.margins.bottom;
            let x = self.cursor.content_left() + (self.cursor.content_width() - width).max(0.0) / 2.0;
            let y = self.cursor.bottom_limit() + ((margin - height) / 2.0).max(0.0);
            self.current.push(PositionedElement {
                x,
                y,
                width,
                height,
                element: LayoutElement::Text(text),
            });
        }

        self.close_page();
        self.state = FlowState::Finished;
        self.pages
    }

    fn close_page(&mut self) {
        self.pages.push(Page {
            index: self.cursor.page_index,
            size: Size::new(self.cursor.page_width, self.cursor.page_height),
            elements: std::mem::take(&mut self.current),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::RectElement;
    use crate::fonts::BuiltinFont;
    use postpress_types::Color;

    fn a4() -> Flow {
        Flow::new(Size::new(210.0, 297.0), Margins::all(15.0))
    }

    fn footer(text: &str) -> TextElement {
        TextElement {
            content: text.to_string(),
            font: BuiltinFont::HelveticaOblique,
            size: 8.0,
            color: Color::gray(150),
            underline: false,
            background: None,
            link: None,
        }
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut flow = a4();
        assert_eq!(flow.state(), FlowState::Idle);
        assert_eq!(flow.page_count(), 0);
        flow.begin();
        assert_eq!(flow.state(), FlowState::Page1Active);
        flow.next_page();
        assert_eq!(flow.state(), FlowState::PageNActive(2));
        flow.next_page();
        assert_eq!(flow.state(), FlowState::PageNActive(3));
        let pages = flow.finish(None);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2].index, 2);
    }

    #[test]
    fn test_ensure_room_breaks_once_before_block() {
        let mut flow = a4();
        flow.advance(250.0);
        assert!(flow.ensure_room(40.0));
        assert_eq!(flow.cursor().page_index, 1);
        assert!(flow.cursor().at_page_top());
        // Already at the top: a block taller than the page does not break again.
        assert!(!flow.ensure_room(500.0));
        assert_eq!(flow.cursor().page_index, 1);
    }

    #[test]
    fn test_ensure_room_keeps_fitting_blocks() {
        let mut flow = a4();
        flow.advance(100.0);
        assert!(!flow.ensure_room(30.0));
        assert_eq!(flow.page_count(), 1);
    }

    #[test]
    fn test_keep_together_moves_only_blocks_that_fit_a_page() {
        let mut flow = a4();
        flow.advance(250.0);
        assert!(!flow.keep_together(300.0));
        assert_eq!(flow.cursor().page_index, 0);
        assert!(flow.keep_together(60.0));
        assert_eq!(flow.cursor().page_index, 1);
        assert!(!flow.keep_together(60.0));
    }

    #[test]
    fn test_cursor_never_passes_bottom_threshold() {
        let mut flow = a4();
        flow.advance(1000.0);
        assert_eq!(flow.y(), 282.0);
        assert!(flow.y() >= flow.cursor().top());
        assert!(flow.y() <= flow.cursor().bottom_limit());
    }

    #[test]
    fn test_gap_is_suppressed_at_page_top() {
        let mut flow = a4();
        flow.gap(5.0);
        assert_eq!(flow.y(), 15.0);
        flow.advance(10.0);
        flow.gap(5.0);
        assert_eq!(flow.y(), 30.0);
    }

    #[test]
    fn test_footer_only_on_final_page() {
        let mut flow = a4();
        flow.push(15.0, 15.0, 10.0, 10.0, LayoutElement::Rectangle(RectElement { fill: Color::BLACK }));
        flow.next_page();
        let pages = flow.finish(Some(footer("Exported from KB")));
        assert_eq!(pages.len(), 2);
        assert!(!pages[0].plain_text().contains("Exported"));
        let (placed, _) = pages[1].texts().next().unwrap();
        assert!(placed.y >= 282.0);
        assert!(placed.y + placed.height <= 297.0);
    }
}
