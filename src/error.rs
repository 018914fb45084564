use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for map loading.
///
/// Loading is atomic: either a [`crate::Map`] is fully built or one of these
/// is returned. Routine per-frame outcomes (unresolved GIDs, unmatched layer
/// names, out-of-bounds coordinates) are `Option`/no-op results, never
/// errors.
#[derive(Debug)]
pub enum MapError {
    /// File I/O error while reading the map or an external tileset.
    Io {
        /// Path of the file that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// JSON parse error in the map file or an external tileset file.
    Json {
        /// Path of the file that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// JSON parse error for a map given as an in-memory string.
    Parse(serde_json::Error),
    /// Unsupported file format (non-JSON map or tileset).
    UnsupportedFormat(String),
    /// The map's orientation is not orthogonal or staggered.
    UnsupportedOrientation(String),
    /// Two tilesets claim overlapping GID ranges.
    OverlappingTilesets {
        /// Name of the lower-range tileset.
        first: String,
        /// Name of the tileset whose range starts inside the first.
        second: String,
    },
    /// A tileset still references an external source file that was never
    /// resolved (map built from a string without resolving references).
    UnresolvedTileset(String),
    /// A tile layer's data length does not match its width * height.
    InvalidLayerSize(String),
    /// A custom property uses a type the loader does not understand.
    UnsupportedPropertyType {
        /// Name of the offending property.
        name: String,
        /// The unrecognized type tag.
        kind: String,
    },
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::Parse(err)
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io { path, source } => {
                write!(f, "I/O error reading {}: {}", path.display(), source)
            }
            MapError::Json { path, source } => {
                write!(f, "JSON parse error in {}: {}", path.display(), source)
            }
            MapError::Parse(e) => write!(f, "JSON parse error: {}", e),
            MapError::UnsupportedFormat(path) => {
                write!(f, "Unsupported file format: {}", path)
            }
            MapError::UnsupportedOrientation(o) => {
                write!(f, "Unsupported map orientation: {}", o)
            }
            MapError::OverlappingTilesets { first, second } => write!(
                f,
                "Tilesets '{}' and '{}' have overlapping GID ranges",
                first, second
            ),
            MapError::UnresolvedTileset(source) => {
                write!(f, "External tileset '{}' was not resolved", source)
            }
            MapError::InvalidLayerSize(name) => write!(
                f,
                "Invalid layer size for layer '{}': data length does not match width * height",
                name
            ),
            MapError::UnsupportedPropertyType { name, kind } => {
                write!(f, "Property '{}' has unsupported type '{}'", name, kind)
            }
        }
    }
}

impl std::error::Error for MapError {}
