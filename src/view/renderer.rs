//! Live viewport rendering with minimal-diff terminal updates
//!
//! The contract is "no stale characters, no redundant writes": a render
//! call with an unchanged view writes nothing, and a changed view fully
//! overwrites whatever the previous call left on screen. The escape
//! sequences used to get there are an implementation detail of this module.

use std::io::{self, Write};

use crate::config::PresentationMode;

const ELLIPSIS: char = '…';

/// Exact content last written to the terminal
#[derive(Debug, Default)]
struct RenderSnapshot {
    /// Rendered lines (a single element in tail mode)
    lines: Vec<String>,
    /// Character count of the rendered line in tail mode
    chars: usize,
}

/// Renders committed + interim text into a bounded terminal viewport.
///
/// Owns the last-rendered snapshot; every call computes the minimal
/// clear-and-rewrite sequence against it. Interim text is volatile and may
/// arrive many times per second, so skipping redundant writes matters as
/// much as leaving no leftovers when the view shrinks.
pub struct ViewportRenderer<W: Write> {
    out: W,
    mode: PresentationMode,
    live: bool,
    snapshot: RenderSnapshot,
}

impl<W: Write> ViewportRenderer<W> {
    pub fn new(out: W, mode: PresentationMode, live: bool) -> Self {
        Self {
            out,
            mode,
            live,
            snapshot: RenderSnapshot::default(),
        }
    }

    /// Present the committed text plus the current interim tail.
    ///
    /// Both inputs arrive already normalized; joining them with a single
    /// space preserves that. A no-op when the resulting view is unchanged
    /// or the renderer is not live.
    pub fn render(&mut self, committed: &str, interim: &str, width: usize) -> io::Result<()> {
        if !self.live {
            return Ok(());
        }

        let text = join_candidate(committed, interim);
        match self.mode {
            PresentationMode::MultiLineWrap => self.render_wrapped(&text, width),
            PresentationMode::SingleLineTail => self.render_tail(&text, width),
        }
    }

    fn render_wrapped(&mut self, text: &str, width: usize) -> io::Result<()> {
        let lines = wrap_words(text, width);
        if lines == self.snapshot.lines {
            return Ok(());
        }

        let mut buf = String::new();
        push_erase(&mut buf, self.snapshot.lines.len());
        buf.push_str(&lines.join("\n"));

        self.out.write_all(buf.as_bytes())?;
        self.out.flush()?;

        self.snapshot.chars = lines.last().map_or(0, |l| l.chars().count());
        self.snapshot.lines = lines;
        Ok(())
    }

    fn render_tail(&mut self, text: &str, width: usize) -> io::Result<()> {
        let view = tail_view(text, width.saturating_sub(2));
        if self.snapshot.lines.len() == 1 && self.snapshot.lines[0] == view {
            return Ok(());
        }

        let chars = view.chars().count();
        let mut buf = String::from("\r\x1b[K");
        buf.push_str(&view);
        // Overwrite leftovers by hand when the line shrank, for terminals
        // where erase-to-end is not honored.
        if chars < self.snapshot.chars {
            for _ in chars..self.snapshot.chars {
                buf.push(' ');
            }
            buf.push('\r');
        }

        self.out.write_all(buf.as_bytes())?;
        self.out.flush()?;

        self.snapshot.lines = vec![view];
        self.snapshot.chars = chars;
        Ok(())
    }

    /// Erase whatever the renderer last drew
    pub fn clear(&mut self) -> io::Result<()> {
        if !self.live || self.snapshot.lines.is_empty() {
            return Ok(());
        }

        let mut buf = String::new();
        push_erase(&mut buf, self.snapshot.lines.len());
        self.out.write_all(buf.as_bytes())?;
        self.out.flush()?;

        self.snapshot = RenderSnapshot::default();
        Ok(())
    }

    /// Borrow the underlying sink (used by tests to inspect writes)
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Move the cursor to the origin of the previously rendered block and erase
/// everything from there to the end of the screen.
fn push_erase(buf: &mut String, prev_lines: usize) {
    buf.push('\r');
    if prev_lines > 1 {
        buf.push_str(&format!("\x1b[{}A", prev_lines - 1));
    }
    buf.push_str("\x1b[J");
}

fn join_candidate(committed: &str, interim: &str) -> String {
    let committed = committed.trim();
    let interim = interim.trim();
    if interim.is_empty() {
        committed.to_string()
    } else if committed.is_empty() {
        interim.to_string()
    } else {
        format!("{} {}", committed, interim)
    }
}

/// Greedy word wrap: each line takes as many whitespace-separated words as
/// fit in `width` columns. A word that alone exceeds the width gets its own
/// line, unsplit.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_chars = word_chars;
        } else if current_chars + 1 + word_chars <= width {
            current.push(' ');
            current.push_str(word);
            current_chars += 1 + word_chars;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_chars = word_chars;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Collapse `text` to a single line of at most `max_chars` characters,
/// keeping the trailing words visible behind an ellipsis marker.
fn tail_view(text: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    let keep = max_chars - 1;
    let tail: String = text.chars().skip(count - keep).collect();
    format!("{}{}", ELLIPSIS, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(renderer: &ViewportRenderer<Vec<u8>>) -> String {
        String::from_utf8_lossy(renderer.get_ref()).into_owned()
    }

    #[test]
    fn test_wrap_greedy() {
        let lines = wrap_words("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_oversized_word_own_line() {
        let lines = wrap_words("a incomprehensibilities b", 8);
        assert_eq!(lines, vec!["a", "incomprehensibilities", "b"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert!(wrap_words("", 20).is_empty());
        assert!(wrap_words("   ", 20).is_empty());
    }

    #[test]
    fn test_tail_view_short_text_unchanged() {
        assert_eq!(tail_view("hello", 18), "hello");
    }

    #[test]
    fn test_tail_view_truncates_to_tail() {
        let text = "a".repeat(30) + " the very end";
        let view = tail_view(&text, 18);
        assert_eq!(view.chars().count(), 18);
        assert!(view.starts_with(ELLIPSIS));
        assert!(view.ends_with("the very end"));
    }

    #[test]
    fn test_render_idempotent() {
        let mut renderer =
            ViewportRenderer::new(Vec::new(), PresentationMode::MultiLineWrap, true);
        renderer.render("hello world", "more", 40).unwrap();
        let after_first = renderer.get_ref().len();
        assert!(after_first > 0);

        renderer.render("hello world", "more", 40).unwrap();
        assert_eq!(renderer.get_ref().len(), after_first);
    }

    #[test]
    fn test_render_tail_idempotent() {
        let mut renderer =
            ViewportRenderer::new(Vec::new(), PresentationMode::SingleLineTail, true);
        renderer.render("hello", "", 20).unwrap();
        let after_first = renderer.get_ref().len();
        renderer.render("hello", "", 20).unwrap();
        assert_eq!(renderer.get_ref().len(), after_first);
    }

    #[test]
    fn test_tail_truncation_bounds() {
        let mut renderer =
            ViewportRenderer::new(Vec::new(), PresentationMode::SingleLineTail, true);
        let committed: String = "abcde ".repeat(9).trim().to_string();
        assert_eq!(committed.chars().count(), 53);
        renderer.render(&committed, "", 20).unwrap();

        let line = &renderer.snapshot.lines[0];
        assert!(line.chars().count() <= 18);
        assert!(line.starts_with(ELLIPSIS));
        assert!(committed.ends_with(line.trim_start_matches(ELLIPSIS)));
    }

    #[test]
    fn test_tail_pads_when_view_shrinks() {
        let mut renderer =
            ViewportRenderer::new(Vec::new(), PresentationMode::SingleLineTail, true);
        renderer.render("a rather long interim line", "", 80).unwrap();
        let before = renderer.get_ref().len();
        renderer.render("short", "", 80).unwrap();

        let tail = &written(&renderer)[before..];
        // 26-char line replaced by a 5-char one: 21 covering spaces
        assert!(tail.contains(&" ".repeat(21)));
        assert!(tail.ends_with('\r'));
    }

    #[test]
    fn test_wrapped_redraw_erases_previous_block() {
        let mut renderer =
            ViewportRenderer::new(Vec::new(), PresentationMode::MultiLineWrap, true);
        renderer.render("one two three four five six", "", 10).unwrap();
        let before = renderer.get_ref().len();
        renderer.render("one two three four five six seven", "", 10).unwrap();

        let tail = &written(&renderer)[before..];
        // Previous render produced 3 lines: cursor up 2, erase down, rewrite.
        assert!(tail.starts_with("\r\x1b[2A\x1b[J"));
    }

    #[test]
    fn test_interim_joined_after_committed() {
        let mut renderer =
            ViewportRenderer::new(Vec::new(), PresentationMode::MultiLineWrap, true);
        renderer.render("hello world", "and more", 80).unwrap();
        assert_eq!(renderer.snapshot.lines, vec!["hello world and more"]);
    }

    #[test]
    fn test_disabled_renderer_writes_nothing() {
        let mut renderer =
            ViewportRenderer::new(Vec::new(), PresentationMode::MultiLineWrap, false);
        renderer.render("hello", "world", 80).unwrap();
        renderer.clear().unwrap();
        assert!(renderer.get_ref().is_empty());
    }

    #[test]
    fn test_clear_erases_block() {
        let mut renderer =
            ViewportRenderer::new(Vec::new(), PresentationMode::MultiLineWrap, true);
        renderer.render("one two three four", "", 9).unwrap();
        let before = renderer.get_ref().len();
        renderer.clear().unwrap();

        let tail = &written(&renderer)[before..];
        assert!(tail.contains("\x1b[J"));

        // Clearing again is a no-op.
        let after = renderer.get_ref().len();
        renderer.clear().unwrap();
        assert_eq!(renderer.get_ref().len(), after);
    }
}
