//! Error types for map data, configuration and rendering.

use thiserror::Error;

/// Malformed or misused map data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("invalid tile size {width}x{height}: both dimensions must be positive")]
    InvalidTileSize { width: u32, height: u32 },

    #[error("invalid map size {width}x{height} tiles: both dimensions must be positive")]
    InvalidMapSize { width: u32, height: u32 },

    #[error("map of {width}x{height} tiles of {tile_width}x{tile_height} pixels is too large")]
    MapTooLarge {
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    },

    #[error(
        "tile image is {actual_width}x{actual_height}, \
         map tiles are {expected_width}x{expected_height}"
    )]
    TileImageSize {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("layer {0} does not exist")]
    UnknownLayer(usize),

    #[error("tile id {0} is not in the tileset")]
    UnknownTile(u32),

    #[error("tile position ({x}, {y}) is outside the {width}x{height} map")]
    OutOfBounds { x: i32, y: i32, width: u32, height: u32 },
}

/// Invalid renderer configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("padding must be at least one tile, got {0}")]
    InvalidPadding(u32),

    #[error("update rate must be positive")]
    InvalidUpdateRate,

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Errors surfaced by the buffered renderer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("tile buffer of {width}x{height} pixels cannot be allocated")]
    BufferTooLarge { width: u32, height: u32 },
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
