use crate::node::{InlineRun, RunStyle};
use crate::normalize::Tag;

/// Collapses every run of ASCII whitespace to a single space and trims the ends.
///
/// U+00A0 is not ASCII whitespace and survives untouched.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

/// The style and link that were active before a tag was entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleScope {
    style: RunStyle,
    link: Option<String>,
}

/// Accumulates styled text into merged [`InlineRun`]s.
///
/// Whitespace is collapsed as text arrives: a space is only emitted after
/// visible content, and trailing spaces are removed when the runs are taken.
/// The active style survives [`take_runs`](Self::take_runs), so a paragraph
/// that is interrupted by an image continues in the same style.
#[derive(Debug, Default)]
pub struct InlineFormatter {
    runs: Vec<InlineRun>,
    style: RunStyle,
    link: Option<String>,
}

impl InlineFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self) -> RunStyle {
        self.style
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Opens the style scope of `tag`. Pass the returned scope to
    /// [`restore`](Self::restore) when the element closes.
    pub fn enter(&mut self, tag: Tag, href: Option<&str>) -> StyleScope {
        let saved = StyleScope {
            style: self.style,
            link: self.link.clone(),
        };
        match tag {
            Tag::Strong | Tag::Heading(_) => self.style.bold = true,
            Tag::Emphasis => self.style.italic = true,
            Tag::Underline => self.style.underline = true,
            Tag::Code => self.style.monospace = true,
            Tag::Anchor => {
                if let Some(target) = href.map(str::trim).filter(|h| !h.is_empty()) {
                    self.link = Some(target.to_string());
                }
            }
            _ => {}
        }
        saved
    }

    pub fn restore(&mut self, scope: StyleScope) {
        self.style = scope.style;
        self.link = scope.link;
    }

    pub fn push_text(&mut self, text: &str) {
        let mut collapsed = String::with_capacity(text.len());
        let mut after_break = self.at_break();
        for ch in text.chars() {
            if ch.is_ascii_whitespace() {
                if !after_break {
                    collapsed.push(' ');
                    after_break = true;
                }
            } else {
                collapsed.push(ch);
                after_break = false;
            }
        }
        self.emit(&collapsed);
    }

    /// Forces a line break inside the current block.
    pub fn line_break(&mut self) {
        self.trim_trailing(|c| c == ' ');
        self.emit("\n");
    }

    /// Breaks the line unless nothing visible precedes it or a break already ends it.
    pub fn soft_break(&mut self) {
        if self.has_content() && self.last_char() != Some('\n') {
            self.line_break();
        }
    }

    pub fn has_content(&self) -> bool {
        self.runs.iter().any(|r| !r.text.trim().is_empty())
    }

    /// Returns the finished runs with line-start and line-end whitespace
    /// removed, or an empty vector when nothing visible was collected.
    pub fn take_runs(&mut self) -> Vec<InlineRun> {
        self.trim_trailing(|c| c == ' ' || c == '\n');
        let mut runs = std::mem::take(&mut self.runs);

        while let Some(first) = runs.first_mut() {
            let cut = first.text.len() - first.text.trim_start_matches('\n').len();
            if cut == first.text.len() {
                runs.remove(0);
            } else {
                first.text.drain(..cut);
                break;
            }
        }

        if runs.iter().all(|r| r.text.trim().is_empty()) {
            return Vec::new();
        }
        runs
    }

    fn last_char(&self) -> Option<char> {
        self.runs.last().and_then(|r| r.text.chars().last())
    }

    fn at_break(&self) -> bool {
        matches!(self.last_char(), None | Some(' ') | Some('\n'))
    }

    fn emit(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == self.style && last.link == self.link => {
                last.text.push_str(text);
            }
            _ => self.runs.push(InlineRun {
                text: text.to_string(),
                style: self.style,
                link: self.link.clone(),
            }),
        }
    }

    fn trim_trailing(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(last) = self.runs.last_mut() {
            let kept = last.text.trim_end_matches(&pred).len();
            if kept == 0 {
                self.runs.pop();
            } else {
                last.text.truncate(kept);
                break;
            }
        }
    }
}
