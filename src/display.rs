//! Display surfaces, the grid entities are drawn onto and read back from.
//!
//! `GridSurface` keeps the frame in memory.  `TerminalSurface` wraps one and
//! pushes it to a terminal through crossterm on `present`.  No game logic is
//! performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::error::Result;

const BLANK: char = ' ';

pub const GAME_OVER_TEXT: &str = "GAME OVER";

// ── Colour palette ────────────────────────────────────────────────────────────

const C_SHIP: Color = Color::White;
const C_BULLET: Color = Color::Magenta;
const C_EXPLOSION: Color = Color::Red;
const C_TEXT: Color = Color::Yellow;

fn colour_for(glyph: char) -> Color {
    match glyph {
        '*' => C_BULLET,
        '#' => C_EXPLOSION,
        '|' | 'O' => C_SHIP,
        _ => C_TEXT,
    }
}

// ── Surface interface ─────────────────────────────────────────────────────────

/// What a read of one surface cell yields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Blank,
    Glyph(char),
    OutOfBounds,
}

impl Cell {
    /// True when something has already been drawn here this frame.
    pub fn is_occupied(self) -> bool {
        matches!(self, Cell::Glyph(glyph) if glyph != BLANK)
    }
}

pub trait Surface {
    /// `(width, height)` in cells.
    fn size(&self) -> (u16, u16);

    /// Reset every cell to blank.
    fn clear(&mut self);

    fn read_cell(&self, row: i32, col: i32) -> Cell;

    /// Draw one glyph.  Cells outside the surface are silently dropped.
    fn write_cell(&mut self, row: i32, col: i32, glyph: char);

    /// Show the current contents to the player.
    fn present(&mut self) -> Result<()>;
}

/// Write `text` left to right starting at `(row, col)`.
pub fn write_text<S: Surface + ?Sized>(surface: &mut S, row: i32, col: i32, text: &str) {
    for (i, glyph) in text.chars().enumerate() {
        surface.write_cell(row, col + i as i32, glyph);
    }
}

/// Stamp the end-of-run message over whatever is on the surface and show it.
pub fn draw_game_over<S: Surface + ?Sized>(surface: &mut S) -> Result<()> {
    let (width, height) = surface.size();
    let row = i32::from(height / 2);
    let col = i32::from(width / 2) - (GAME_OVER_TEXT.len() / 2) as i32;
    write_text(surface, row, col, GAME_OVER_TEXT);
    surface.present()
}

// ── In-memory grid ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GridSurface {
    width: u16,
    height: u16,
    cells: Vec<char>,
}

impl GridSurface {
    pub fn new(width: u16, height: u16) -> Self {
        GridSurface {
            width,
            height,
            cells: vec![BLANK; usize::from(width) * usize::from(height)],
        }
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        if row >= usize::from(self.height) || col >= usize::from(self.width) {
            return None;
        }
        Some(row * usize::from(self.width) + col)
    }

    /// One row of the grid as a string, for rendering and assertions.
    pub fn row_text(&self, row: u16) -> String {
        let start = usize::from(row) * usize::from(self.width);
        self.cells
            .get(start..start + usize::from(self.width))
            .map(|cells| cells.iter().collect())
            .unwrap_or_default()
    }
}

impl Surface for GridSurface {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn read_cell(&self, row: i32, col: i32) -> Cell {
        match self.index(row, col) {
            None => Cell::OutOfBounds,
            Some(i) if self.cells[i] == BLANK => Cell::Blank,
            Some(i) => Cell::Glyph(self.cells[i]),
        }
    }

    fn write_cell(&mut self, row: i32, col: i32, glyph: char) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = glyph;
        }
    }

    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

// ── Terminal-backed surface ───────────────────────────────────────────────────

/// A grid flushed to a crossterm writer on every `present`.
pub struct TerminalSurface<W: Write> {
    out: W,
    grid: GridSurface,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        TerminalSurface {
            out,
            grid: GridSurface::new(width, height),
        }
    }

    pub fn grid(&self) -> &GridSurface {
        &self.grid
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn size(&self) -> (u16, u16) {
        self.grid.size()
    }

    fn clear(&mut self) {
        self.grid.clear();
    }

    fn read_cell(&self, row: i32, col: i32) -> Cell {
        self.grid.read_cell(row, col)
    }

    fn write_cell(&mut self, row: i32, col: i32, glyph: char) {
        self.grid.write_cell(row, col, glyph);
    }

    fn present(&mut self) -> Result<()> {
        let (width, height) = self.grid.size();
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        for row in 0..height {
            for col in 0..width {
                let Cell::Glyph(glyph) = self.grid.read_cell(i32::from(row), i32::from(col))
                else {
                    continue;
                };
                self.out.queue(cursor::MoveTo(col, row))?;
                self.out.queue(style::SetForegroundColor(colour_for(glyph)))?;
                self.out.queue(Print(glyph))?;
            }
        }

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
        self.out.flush()?;
        Ok(())
    }
}
