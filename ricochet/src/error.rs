use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("viewport must not be empty (got {width}x{height})")]
    EmptyViewport { width: u32, height: u32 },

    #[error("buffer `{buffer}` has {actual} items, but {expected} were expected")]
    BufferSizeMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("pixel {x}x{y} lies outside of the {width}x{height} viewport")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
