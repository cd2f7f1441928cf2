//! Double-buffered terminal cells with diff-based presentation.
//!
//! The front buffer is rebuilt every frame. Presenting compares it with the
//! back buffer, which mirrors what the terminal currently shows, and queues
//! commands for changed cells only.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};

pub(crate) const BACKGROUND: Color = Color::Rgb {
    r: 22,
    g: 24,
    b: 32,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Cell {
    pub(crate) const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: BACKGROUND,
    };

    /// Differs from every drawable cell so the next diff repaints everything.
    const INVALID: Cell = Cell {
        ch: '\u{0}',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; usize::from(width) * usize::from(height)],
        }
    }

    pub(crate) const fn width(&self) -> u16 {
        self.width
    }

    pub(crate) const fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|index| self.cells[index])
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub(crate) fn invalidate(&mut self) {
        self.cells.fill(Cell::INVALID);
    }

    pub(crate) fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(index) = self.index(x, y) {
            self.cells[index] = cell;
        }
    }

    /// Fills a rectangle, clipped to the buffer.
    pub(crate) fn fill(&mut self, x: u16, y: u16, width: u16, height: u16, cell: Cell) {
        for row in y..y.saturating_add(height).min(self.height) {
            for column in x..x.saturating_add(width).min(self.width) {
                self.set(column, row, cell);
            }
        }
    }

    /// Writes `text` starting at `x`, stopping at `limit` columns or the buffer edge.
    pub(crate) fn text(&mut self, x: u16, y: u16, text: &str, limit: u16, fg: Color, bg: Color) {
        let end = x.saturating_add(limit).min(self.width);
        for (column, ch) in (x..end).zip(text.chars()) {
            self.set(column, y, Cell { ch, fg, bg });
        }
    }

    /// Writes `text` keeping the existing background of each cell.
    pub(crate) fn overlay_text(&mut self, x: u16, y: u16, text: &str, fg: Color) {
        for (column, ch) in (x..self.width).zip(text.chars()) {
            let bg = self.get(column, y).map_or(BACKGROUND, |cell| cell.bg);
            self.set(column, y, Cell { ch, fg, bg });
        }
    }

    #[cfg(test)]
    pub(crate) fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|cell| cell.ch)
            .collect()
    }
}

/// Queues the cells of `front` that differ from `back`, then mirrors `front`
/// into `back`. Returns the number of cells written.
pub(crate) fn present<W: Write>(
    out: &mut W,
    front: &CellBuffer,
    back: &mut CellBuffer,
) -> io::Result<usize> {
    if back.width != front.width || back.height != front.height {
        *back = CellBuffer::new(front.width, front.height);
        back.invalidate();
    }

    let mut written = 0;
    let mut last_fg = None;
    let mut last_bg = None;
    let mut cursor = None;

    for y in 0..front.height {
        for x in 0..front.width {
            let index = usize::from(y) * usize::from(front.width) + usize::from(x);
            let cell = front.cells[index];
            if cell == back.cells[index] {
                continue;
            }

            if cursor != Some((x, y)) {
                queue!(out, MoveTo(x, y))?;
            }
            if last_fg != Some(cell.fg) {
                queue!(out, SetForegroundColor(cell.fg))?;
                last_fg = Some(cell.fg);
            }
            if last_bg != Some(cell.bg) {
                queue!(out, SetBackgroundColor(cell.bg))?;
                last_bg = Some(cell.bg);
            }
            queue!(out, Print(cell.ch))?;
            cursor = Some((x.saturating_add(1), y));
            written += 1;
        }
    }

    if written > 0 {
        queue!(out, ResetColor)?;
    }
    out.flush()?;
    back.cells.copy_from_slice(&front.cells);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_clipped_to_the_limit_and_the_edge() {
        let mut buffer = CellBuffer::new(8, 1);
        buffer.text(2, 0, "campus", 3, Color::White, BACKGROUND);
        assert_eq!(buffer.row_text(0), "  cam   ");

        buffer.text(5, 0, "quest", 10, Color::White, BACKGROUND);
        assert_eq!(buffer.row_text(0), "  camque");
    }

    #[test]
    fn only_changed_cells_are_presented() {
        let mut front = CellBuffer::new(4, 2);
        let mut back = CellBuffer::new(4, 2);
        back.invalidate();
        let mut out = Vec::new();

        assert_eq!(present(&mut out, &front, &mut back).expect("write"), 8);
        assert_eq!(present(&mut out, &front, &mut back).expect("write"), 0);

        let avatar = Cell {
            ch: '@',
            fg: Color::Blue,
            bg: BACKGROUND,
        };
        front.set(1, 1, avatar);
        out.clear();
        assert_eq!(present(&mut out, &front, &mut back).expect("write"), 1);
        assert!(String::from_utf8_lossy(&out).contains('@'));
    }

    #[test]
    fn resizing_repaints_everything() {
        let front = CellBuffer::new(3, 3);
        let mut back = CellBuffer::new(2, 2);
        let mut out = Vec::new();
        assert_eq!(present(&mut out, &front, &mut back).expect("write"), 9);
    }

    #[test]
    fn overlay_text_keeps_backgrounds() {
        let mut buffer = CellBuffer::new(4, 1);
        let grass = Cell {
            ch: ' ',
            fg: Color::White,
            bg: Color::Green,
        };
        buffer.fill(0, 0, 4, 1, grass);
        buffer.overlay_text(1, 0, "ab", Color::Black);
        assert_eq!(buffer.get(1, 0).map(|cell| cell.bg), Some(Color::Green));
        assert_eq!(buffer.get(2, 0).map(|cell| cell.ch), Some('b'));
    }
}
