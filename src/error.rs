use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError {
    /// Writing to or polling the terminal failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("bitmap of {rows}x{cols} cannot hold {len} cells")]
    InvalidBitmap { rows: usize, cols: usize, len: usize },

    #[error("terminal is {width}x{height}, too small to fit the ship")]
    TerminalTooSmall { width: u16, height: u16 },
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
