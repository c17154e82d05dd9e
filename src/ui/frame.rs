use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::{cursor, queue};
use std::io::{self, Write};

/// One styled character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bold: bool,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::Reset,
        bold: false,
    };
}

/// Full-screen character buffer the screens draw into, rendered to the
/// terminal in one pass per frame.
pub struct Frame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Frame {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::BLANK; width as usize * height as usize];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Writes one cell; coordinates outside the frame are clipped.
    pub fn put(&mut self, x: u16, y: u16, ch: char, fg: Color, bold: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.cells[y as usize * self.width as usize + x as usize] = Cell { ch, fg, bold };
    }

    pub fn put_str(&mut self, x: u16, y: u16, text: &str, fg: Color, bold: bool) {
        for (i, ch) in text.chars().enumerate() {
            let Some(cx) = x.checked_add(i as u16) else {
                break;
            };
            self.put(cx, y, ch, fg, bold);
        }
    }

    /// Centers `text` horizontally on row `y`.
    pub fn put_centered(&mut self, y: u16, text: &str, fg: Color, bold: bool) {
        let len = text.chars().count().min(u16::MAX as usize) as u16;
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, text, fg, bold);
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let mut fg = Color::Reset;
        let mut bold = false;
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(fg)
        )?;
        for y in 0..self.height {
            queue!(out, cursor::MoveTo(0, y))?;
            for x in 0..self.width {
                let cell = self.cells[y as usize * self.width as usize + x as usize];
                if cell.bold != bold {
                    bold = cell.bold;
                    if bold {
                        queue!(out, SetAttribute(Attribute::Bold))?;
                    } else {
                        // A full attribute reset also clears the color.
                        queue!(out, SetAttribute(Attribute::Reset))?;
                        fg = Color::Reset;
                    }
                }
                if cell.fg != fg {
                    fg = cell.fg;
                    queue!(out, SetForegroundColor(fg))?;
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        out.flush()
    }

    #[cfg(test)]
    pub(crate) fn cell(&self, x: u16, y: u16) -> Cell {
        self.cells[y as usize * self.width as usize + x as usize]
    }
}
