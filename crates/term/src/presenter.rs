//! TerminalPresenter: flushes a cell framebuffer to a real terminal.
//!
//! Frames are diffed against the previous one and only changed runs of cells
//! are re-emitted. The encoder tracks the terminal's cursor and colors, so a
//! scrolled half-block frame costs one color command per color change and
//! one cursor move per run.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor,
        SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, FrameBuffer, Rgb};

/// Unchanged cells between two changed ones that are reprinted rather than
/// skipped with a cursor move.
const BRIDGE_CELLS: u16 = 2;

pub struct TerminalPresenter {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next present to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Present a framebuffer, swapping it into internal state.
    ///
    /// Callers keep one `FrameBuffer` and pass it in every frame; after the
    /// call it holds the previous frame and can be overwritten without
    /// cloning.
    pub fn present_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let mut prev = match self.last.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                self.buf.clear();
                encode_diff_into(&prev, fb, &mut self.buf)?;
                prev
            }
            other => {
                self.buf.clear();
                encode_full_into(fb, &mut self.buf)?;
                let mut prev = other.unwrap_or_else(|| FrameBuffer::new(0, 0));
                prev.resize(fb.width(), fb.height());
                prev
            }
        };
        self.flush_buf()?;

        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Terminal state as the encoder last left it. `None` means unknown.
#[derive(Debug, Default)]
struct Pen {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    cursor: Option<(u16, u16)>,
}

impl Pen {
    fn move_to(&mut self, out: &mut Vec<u8>, x: u16, y: u16) -> Result<()> {
        if self.cursor != Some((x, y)) {
            out.queue(cursor::MoveTo(x, y))?;
            self.cursor = Some((x, y));
        }
        Ok(())
    }

    /// Print `cell` at the cursor, setting only the colors that differ.
    fn print(&mut self, out: &mut Vec<u8>, cell: Cell, width: u16) -> Result<()> {
        let style = cell.style;
        if self.fg != Some(style.fg) {
            out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
            self.fg = Some(style.fg);
        }
        if self.bg != Some(style.bg) {
            out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
            self.bg = Some(style.bg);
        }
        out.queue(Print(cell.ch))?;
        // Without line wrap the cursor position after the last column is
        // terminal dependent.
        self.cursor = self
            .cursor
            .and_then(|(x, y)| (x + 1 < width).then_some((x + 1, y)));
        Ok(())
    }

    fn colored(&self) -> bool {
        self.fg.is_some() || self.bg.is_some()
    }
}

/// Encode a full-frame redraw into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut pen = Pen::default();
    pen.move_to(out, 0, 0)?;

    for y in 0..fb.height() {
        for x in 0..fb.width() {
            pen.print(out, fb.get(x, y).unwrap_or_default(), fb.width())?;
        }
        if y + 1 < fb.height() {
            out.queue(Print("\r\n"))?;
            pen.cursor = Some((0, y + 1));
        }
    }

    out.queue(ResetColor)?;
    Ok(())
}

/// Encode only the changed runs between two equally sized frames.
///
/// Identical frames encode to nothing.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = Pen::default();
    for_each_changed_run(prev, next, |x, y, len| {
        pen.move_to(out, x, y)?;
        for dx in 0..len {
            pen.print(out, next.get(x + dx, y).unwrap_or_default(), next.width())?;
        }
        Ok(())
    })?;

    if pen.colored() {
        out.queue(ResetColor)?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        for y in 0..next.height() {
            f(0, y, next.width())?;
        }
        return Ok(());
    }

    let w = next.width();
    for y in 0..next.height() {
        let changed = |x: u16| prev.get(x, y) != next.get(x, y);
        let mut x = 0;
        while x < w {
            if !changed(x) {
                x += 1;
                continue;
            }
            let start = x;
            let mut end = x + 1;
            let mut scan = end;
            while scan < w {
                if changed(scan) {
                    end = scan + 1;
                    scan = end;
                } else if scan - end < BRIDGE_CELLS {
                    scan += 1;
                } else {
                    break;
                }
            }
            f(start, y, end - start)?;
            x = end;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::CellStyle;

    const INK: Rgb = Rgb::new(250, 250, 250);

    fn cell(ch: char, fg: Rgb, bg: Rgb) -> Cell {
        Cell {
            ch,
            style: CellStyle { fg, bg },
        }
    }

    fn runs(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<(u16, u16, u16)> {
        let mut runs = Vec::new();
        for_each_changed_run(prev, next, |x, y, len| {
            runs.push((x, y, len));
            Ok(())
        })
        .unwrap();
        runs
    }

    /// A row of `width` blank cells on one background, with `X` at `marks`.
    fn marked_row(width: u16, marks: &[u16]) -> (FrameBuffer, FrameBuffer) {
        let blank = cell(' ', INK, Rgb::new(0, 0, 80));
        let mut prev = FrameBuffer::new(width, 1);
        prev.clear(blank);
        let mut next = prev.clone();
        for &x in marks {
            next.set(x, 0, Cell { ch: 'X', ..blank });
        }
        (prev, next)
    }

    #[test]
    fn changed_run_iterator_coalesces_adjacent_cells() {
        let a = FrameBuffer::new(5, 1);
        let mut b = FrameBuffer::new(5, 1);
        for x in 1..=3 {
            b.set(x, 0, Cell { ch: 'X', style: CellStyle::default() });
        }
        assert_eq!(runs(&a, &b), vec![(1, 0, 3)]);
    }

    #[test]
    fn short_gaps_are_bridged_and_long_ones_split() {
        let (prev, next) = marked_row(12, &[0, 2, 5, 9]);
        assert_eq!(runs(&prev, &next), vec![(0, 0, 6), (9, 0, 1)]);
    }

    #[test]
    fn identical_frames_encode_nothing() {
        let a = FrameBuffer::new(4, 2);
        let mut out = Vec::new();
        encode_diff_into(&a, &a.clone(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn only_the_changed_color_is_set() {
        let (fg, bg1, bg2) = (Rgb::new(9, 9, 9), Rgb::new(1, 2, 3), Rgb::new(4, 5, 6));
        let prev = FrameBuffer::new(3, 1);
        let mut next = prev.clone();
        next.set(0, 0, cell('A', fg, bg1));
        next.set(1, 0, cell('B', fg, bg2));
        next.set(2, 0, cell('C', fg, bg2));

        let mut out = Vec::new();
        encode_diff_into(&prev, &next, &mut out).unwrap();

        let mut expected = Vec::new();
        expected.queue(cursor::MoveTo(0, 0)).unwrap();
        expected.queue(SetForegroundColor(rgb_to_color(fg))).unwrap();
        expected.queue(SetBackgroundColor(rgb_to_color(bg1))).unwrap();
        expected.queue(Print('A')).unwrap();
        expected.queue(SetBackgroundColor(rgb_to_color(bg2))).unwrap();
        expected.queue(Print('B')).unwrap();
        expected.queue(Print('C')).unwrap();
        expected.queue(ResetColor).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn bridged_gap_reprints_instead_of_moving() {
        let (prev, next) = marked_row(6, &[0, 2]);
        let mut out = Vec::new();
        encode_diff_into(&prev, &next, &mut out).unwrap();

        let style = next.get(0, 0).unwrap().style;
        let mut expected = Vec::new();
        expected.queue(cursor::MoveTo(0, 0)).unwrap();
        expected.queue(SetForegroundColor(rgb_to_color(style.fg))).unwrap();
        expected.queue(SetBackgroundColor(rgb_to_color(style.bg))).unwrap();
        expected.queue(Print('X')).unwrap();
        expected.queue(Print(' ')).unwrap();
        expected.queue(Print('X')).unwrap();
        expected.queue(ResetColor).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn wide_gap_moves_the_cursor_but_keeps_colors() {
        let (prev, next) = marked_row(8, &[0, 4]);
        let mut out = Vec::new();
        encode_diff_into(&prev, &next, &mut out).unwrap();

        let style = next.get(0, 0).unwrap().style;
        let mut expected = Vec::new();
        expected.queue(cursor::MoveTo(0, 0)).unwrap();
        expected.queue(SetForegroundColor(rgb_to_color(style.fg))).unwrap();
        expected.queue(SetBackgroundColor(rgb_to_color(style.bg))).unwrap();
        expected.queue(Print('X')).unwrap();
        expected.queue(cursor::MoveTo(4, 0)).unwrap();
        expected.queue(Print('X')).unwrap();
        expected.queue(ResetColor).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn full_encode_contains_every_glyph() {
        let mut fb = FrameBuffer::new(2, 2);
        let style = CellStyle::default();
        fb.set(0, 0, Cell { ch: 'A', style });
        fb.set(1, 1, Cell { ch: 'D', style });
        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('A'));
        assert!(text.contains('D'));
        assert!(text.contains("\r\n"));

        // One style for the whole frame: colors are set once.
        let mut fg = Vec::new();
        fg.queue(SetForegroundColor(rgb_to_color(style.fg))).unwrap();
        assert_eq!(out.windows(fg.len()).filter(|w| *w == &fg[..]).count(), 1);
    }
}
