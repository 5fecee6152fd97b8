//! Game entity types: positioned bitmaps with a lifetime.
//!
//! Nothing in here touches a surface or a chain; rasterization lives in
//! `compute` and linkage in `chain`.

use crate::error::{ArcadeError, Result};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Ticks a bullet survives when it never hits anything.
pub const BULLET_LIFETIME: u32 = 50;

/// Ticks an entity keeps burning after a collision.
pub const EXPLOSION_TICKS: u32 = 5;

pub const SHIP_ROWS: usize = 4;
pub const SHIP_COLS: usize = 3;

//  |
//  O
//  O
// OOO
const SHIP_BODY: &str = " |  O  O OOO";

//  #
// ###
// ###
// ###
const SHIP_EXPLOSION: &str = " # #########";

const BULLET_BODY: &str = "*";
const BULLET_EXPLOSION: &str = "#";

/// Filler for explosion bitmaps of footprints without a hand-drawn one.
const EXPLOSION_GLYPH: char = '#';

// ── Loop state ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Paused,
    GameOver,
}

// ── Lifetime ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifetime {
    Infinite,
    Ticks(u32),
}

impl Lifetime {
    /// Age by one tick.  Returns `true` once a finite lifetime has run out.
    ///
    /// `Ticks(0)` counts as already expired rather than wrapping around.
    pub fn tick(&mut self) -> bool {
        match self {
            Lifetime::Infinite => false,
            Lifetime::Ticks(left) => {
                *left = left.saturating_sub(1);
                *left == 0
            }
        }
    }
}

// ── Bitmap ────────────────────────────────────────────────────────────────────

/// A `rows × cols` block of glyphs stored row-major.  The cell count always
/// equals `rows * cols`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    rows: usize,
    cols: usize,
    cells: Vec<char>,
}

impl Bitmap {
    pub fn new(rows: usize, cols: usize, body: &str) -> Result<Self> {
        let cells: Vec<char> = body.chars().collect();
        if cells.len() != rows * cols {
            return Err(ArcadeError::InvalidBitmap {
                rows,
                cols,
                len: cells.len(),
            });
        }
        Ok(Bitmap { rows, cols, cells })
    }

    /// Build from a body literal known to fit.  A mismatch is a bug in this
    /// file, not a runtime condition.
    fn from_static(rows: usize, cols: usize, body: &'static str) -> Self {
        let cells: Vec<char> = body.chars().collect();
        assert_eq!(cells.len(), rows * cols, "malformed built-in bitmap {body:?}");
        Bitmap { rows, cols, cells }
    }

    /// The explosion drawn in place of a bitmap with this footprint.
    pub fn explosion(rows: usize, cols: usize) -> Self {
        match (rows, cols) {
            (SHIP_ROWS, SHIP_COLS) => Bitmap::from_static(rows, cols, SHIP_EXPLOSION),
            (1, 1) => Bitmap::from_static(1, 1, BULLET_EXPLOSION),
            _ => Bitmap {
                rows,
                cols,
                cells: vec![EXPLOSION_GLYPH; rows * cols],
            },
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn glyph(&self, row: usize, col: usize) -> Option<char> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// `(row, col, glyph)` for every cell, bitmap-local.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &glyph)| (i / self.cols, i % self.cols, glyph))
    }
}

// ── Entity ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub row: i32,
    pub col: i32,
    pub row_vel: i32,
    pub col_vel: i32,
    pub bitmap: Bitmap,
    pub lifetime: Lifetime,
}

impl Entity {
    pub fn new(
        (row, col): (i32, i32),
        (row_vel, col_vel): (i32, i32),
        bitmap: Bitmap,
        lifetime: Lifetime,
    ) -> Self {
        Entity {
            row,
            col,
            row_vel,
            col_vel,
            bitmap,
            lifetime,
        }
    }

    /// The player's craft: stationary until steered, lives until hit.
    pub fn ship(row: i32, col: i32) -> Self {
        Entity::new(
            (row, col),
            (0, 0),
            Bitmap::from_static(SHIP_ROWS, SHIP_COLS, SHIP_BODY),
            Lifetime::Infinite,
        )
    }

    pub fn bullet(row: i32, col: i32, row_vel: i32, col_vel: i32) -> Self {
        Entity::new(
            (row, col),
            (row_vel, col_vel),
            Bitmap::from_static(1, 1, BULLET_BODY),
            Lifetime::Ticks(BULLET_LIFETIME),
        )
    }

    /// Apply one tick of velocity.
    pub fn step(&mut self) {
        self.row += self.row_vel;
        self.col += self.col_vel;
    }

    /// Swap in the explosion for this footprint and restart the countdown,
    /// whatever the previous lifetime was.
    pub fn explode(&mut self) {
        self.bitmap = Bitmap::explosion(self.bitmap.rows(), self.bitmap.cols());
        self.lifetime = Lifetime::Ticks(EXPLOSION_TICKS);
    }

    pub fn is_exploding(&self) -> bool {
        self.bitmap == Bitmap::explosion(self.bitmap.rows(), self.bitmap.cols())
    }

    /// Surface coordinates and glyph for every bitmap cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, char)> + '_ {
        self.bitmap
            .cells()
            .map(|(r, c, glyph)| (self.row + r as i32, self.col + c as i32, glyph))
    }
}
