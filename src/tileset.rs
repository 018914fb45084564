use std::collections::HashMap;

use macroquad::prelude::*;

use crate::error::MapError;
use crate::gid::Gid;
use crate::properties::{Properties, PropertyValue};

/// One frame of a tile animation. Frame GIDs are resolved to global IDs at
/// load time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Global ID of the tile shown during this frame.
    pub gid: u32,
    /// How long the frame stays on screen, in milliseconds.
    pub duration_ms: f32,
}

/// Per-tile metadata: type string, custom properties, animation.
#[derive(Debug, Clone, Default)]
pub struct TileMeta {
    /// The tile's type/class string from the authoring tool, if any.
    pub kind: Option<String>,
    /// Custom properties of this tile.
    pub properties: Properties,
    /// Looping animation frames; empty when the tile is static.
    pub animation: Vec<Frame>,
}

/// A tileset: one atlas image with a contiguous GID range and per-tile
/// metadata. Immutable after load except for property writes through
/// [`TilesetRegistry::set_tile_property`].
#[derive(Debug, Clone)]
pub struct Tileset {
    /// Tileset name from the document.
    pub name: String,
    /// First global ID of the range this tileset owns.
    pub first_gid: u32,
    /// Number of tiles in the range.
    pub tile_count: u32,
    /// Atlas columns.
    pub columns: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Pixel gap between atlas cells.
    pub spacing: u32,
    /// Pixel border around the atlas.
    pub margin: u32,
    /// Path of the atlas image, relative to the map file.
    pub image: String,
    /// Loaded atlas texture; `None` when the map was built from a document
    /// without loading assets.
    pub texture: Option<Texture2D>,
    /// Metadata for tiles that carry any, keyed by local tile ID.
    pub tiles: HashMap<u32, TileMeta>,
}

impl Tileset {
    /// Whether the flag-free GID falls inside this tileset's range.
    ///
    /// The range end is computed in `u64` so a `first_gid`/`tile_count` pair
    /// summing past `u32::MAX` stays a well-defined range instead of
    /// overflowing.
    #[inline]
    pub fn contains(&self, clean_gid: u32) -> bool {
        clean_gid >= self.first_gid && u64::from(clean_gid) < self.range_end()
    }

    // One past the last GID of the range, overflow-free.
    #[inline]
    fn range_end(&self) -> u64 {
        u64::from(self.first_gid) + u64::from(self.tile_count)
    }

    /// Atlas source rectangle of a local tile ID, honoring margin and
    /// spacing.
    pub fn source_rect(&self, local_id: u32) -> Rect {
        let columns = self.columns.max(1);
        let col = local_id % columns;
        let row = local_id / columns;
        let x = self.margin + col * (self.tile_width + self.spacing);
        let y = self.margin + row * (self.tile_height + self.spacing);
        Rect::new(
            x as f32,
            y as f32,
            self.tile_width as f32,
            self.tile_height as f32,
        )
    }
}

/// A resolved view of one GID: owning tileset, local index, and the flip
/// flags carried by the queried GID. Recomputed per query, never stored.
#[derive(Debug, Clone, Copy)]
pub struct TileDefinition<'a> {
    /// The tileset owning the GID.
    pub tileset: &'a Tileset,
    /// Index of the tileset within the registry.
    pub tileset_index: usize,
    /// Tile index local to the tileset (`clean_gid - first_gid`).
    pub local_id: u32,
    /// Horizontal flip flag of the queried GID.
    pub flip_h: bool,
    /// Vertical flip flag of the queried GID.
    pub flip_v: bool,
    /// Diagonal flip flag of the queried GID.
    pub flip_d: bool,
    /// The tile's metadata, if it carries any.
    pub meta: Option<&'a TileMeta>,
}

/// Ordered collection of a map's tilesets, sorted ascending by `first_gid`
/// with non-overlapping GID ranges (enforced at construction).
#[derive(Debug, Clone)]
pub struct TilesetRegistry {
    tilesets: Vec<Tileset>,
}

impl TilesetRegistry {
    /// Builds a registry, sorting by `first_gid` and rejecting overlapping
    /// GID ranges with [`MapError::OverlappingTilesets`].
    pub fn new(mut tilesets: Vec<Tileset>) -> Result<Self, MapError> {
        tilesets.sort_by_key(|t| t.first_gid);
        for pair in tilesets.windows(2) {
            if pair[0].range_end() > u64::from(pair[1].first_gid) {
                return Err(MapError::OverlappingTilesets {
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                });
            }
        }
        Ok(TilesetRegistry { tilesets })
    }

    /// The tilesets in ascending `first_gid` order.
    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    pub(crate) fn tilesets_mut(&mut self) -> &mut [Tileset] {
        &mut self.tilesets
    }

    // (tileset index, local id) for a GID, flags ignored.
    fn locate(&self, gid: Gid) -> Option<(usize, u32)> {
        let clean = gid.clean();
        if clean == 0 {
            return None;
        }
        let idx = self
            .tilesets
            .partition_point(|t| t.first_gid <= clean)
            .checked_sub(1)?;
        let ts = &self.tilesets[idx];
        if !ts.contains(clean) {
            return None;
        }
        Some((idx, clean - ts.first_gid))
    }

    /// Resolves a GID to its owning tileset, local index, and flip flags.
    /// `None` for GID 0 or a GID above every range.
    pub fn resolve(&self, gid: Gid) -> Option<TileDefinition<'_>> {
        let (tileset_index, local_id) = self.locate(gid)?;
        let tileset = &self.tilesets[tileset_index];
        Some(TileDefinition {
            tileset,
            tileset_index,
            local_id,
            flip_h: gid.flip_h(),
            flip_v: gid.flip_v(),
            flip_d: gid.flip_d(),
            meta: tileset.tiles.get(&local_id),
        })
    }

    /// The tileset owning a GID, if any.
    pub fn tileset_for(&self, gid: Gid) -> Option<&Tileset> {
        self.locate(gid).map(|(idx, _)| &self.tilesets[idx])
    }

    /// The type/class string of a tile, if the GID resolves and the tile has
    /// one.
    pub fn tile_type(&self, gid: Gid) -> Option<&str> {
        self.resolve(gid)?.meta?.kind.as_deref()
    }

    /// A custom property of a tile, if the GID resolves and the property
    /// exists.
    pub fn tile_property(&self, gid: Gid, name: &str) -> Option<&PropertyValue> {
        self.resolve(gid)?.meta?.properties.get(name)
    }

    /// Sets a custom property on a tile. The write lands on the shared
    /// tileset metadata, so every placement of the tile sees it. No-op when
    /// the GID does not resolve.
    pub fn set_tile_property(&mut self, gid: Gid, name: &str, value: PropertyValue) {
        if let Some((idx, local_id)) = self.locate(gid) {
            self.tilesets[idx]
                .tiles
                .entry(local_id)
                .or_default()
                .properties
                .insert(name, value);
        }
    }
}
