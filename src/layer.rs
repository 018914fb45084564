use macroquad::prelude::*;

use crate::animation::{AnimationController, TileDefId};
use crate::gid::Gid;
use crate::grid::GridGeometry;
use crate::properties::Properties;
use crate::render::{RenderBackend, TileQuad};
use crate::store::{TileLayerStore, TilePlacement, Tiles};
use crate::tileset::TilesetRegistry;

/// Fields every layer variant carries: identity, compositing modifiers, and
/// the map's grid geometry for coordinate conversion.
#[derive(Debug, Clone)]
pub struct LayerMeta {
    /// Layer name, used by path lookup.
    pub name: String,
    /// Whether the layer (and its subtree) is drawn. Invisible layers still
    /// receive updates so animations keep advancing while hidden.
    pub visible: bool,
    /// Opacity 0..1; multiplied down the tree at draw time.
    pub opacity: f32,
    /// Pixel offset of this layer; summed down the tree at draw time.
    pub offset: Vec2,
    /// Custom properties of the layer.
    pub properties: Properties,
    /// Grid geometry of the owning map.
    pub geometry: GridGeometry,
}

/// An object on an object layer. The runtime treats these as opaque data
/// beyond name/class/property access.
#[derive(Debug, Clone)]
pub struct MapObject {
    /// Unique object ID from the document.
    pub id: u32,
    /// Object name.
    pub name: String,
    /// Object class (or legacy type) string.
    pub class_name: String,
    /// Pixel x.
    pub x: f32,
    /// Pixel y.
    pub y: f32,
    /// Pixel width.
    pub width: f32,
    /// Pixel height.
    pub height: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Visibility flag.
    pub visible: bool,
    /// GID for tile objects.
    pub gid: Option<Gid>,
    /// Custom properties.
    pub properties: Properties,
}

/// A grid of tiles with dense per-cell GID storage.
#[derive(Debug, Clone)]
pub struct TileLayer {
    pub(crate) meta: LayerMeta,
    pub(crate) store: TileLayerStore,
}

impl TileLayer {
    /// The GID at a grid cell, or `None` when the cell is empty or outside
    /// the layer bounds.
    pub fn tile_at_grid(&self, grid_x: i32, grid_y: i32) -> Option<Gid> {
        self.store.gid_at(grid_x, grid_y)
    }

    /// Writes a raw GID at a grid cell (0 clears it). Out-of-bounds writes
    /// are silently ignored.
    pub fn set_tile_at_grid(&mut self, grid_x: i32, grid_y: i32, gid: u32) {
        self.store.set_gid_at(grid_x, grid_y, gid);
    }

    /// The GID at a pixel position, via [`pixel_to_grid`](Self::pixel_to_grid).
    pub fn tile_at_pixel(&self, x: f32, y: f32) -> Option<Gid> {
        let (gx, gy) = self.pixel_to_grid(x, y);
        self.store.gid_at(gx, gy)
    }

    /// Writes a raw GID at a pixel position.
    pub fn set_tile_at_pixel(&mut self, x: f32, y: f32, gid: u32) {
        let (gx, gy) = self.pixel_to_grid(x, y);
        self.store.set_gid_at(gx, gy, gid);
    }

    /// Grid bounds as `(left, top, right, bottom)`, right/bottom exclusive.
    pub fn grid_bounds(&self) -> (i32, i32, i32, i32) {
        self.store.grid_bounds()
    }

    /// Pixel bounds as `(left, top, right, bottom)`, layer offset applied.
    pub fn pixel_bounds(&self) -> (f32, f32, f32, f32) {
        self.meta
            .geometry
            .pixel_bounds(self.store.grid_bounds(), self.meta.offset)
    }

    /// Iterates over the layer's non-empty tiles in row-major order.
    pub fn tiles(&self) -> Tiles<'_> {
        self.store.tiles(self.meta.geometry, self.meta.offset)
    }

    /// Pixel position of a grid cell, layer offset applied.
    pub fn grid_to_pixel(&self, grid_x: i32, grid_y: i32) -> Vec2 {
        self.meta
            .geometry
            .grid_to_pixel(grid_x, grid_y, self.meta.offset)
    }

    /// Grid cell containing a pixel position.
    pub fn pixel_to_grid(&self, x: f32, y: f32) -> (i32, i32) {
        self.meta.geometry.pixel_to_grid(vec2(x, y), self.meta.offset)
    }

    // Draw every tile as one quad, resolving the current (post-animation)
    // GID per cell. `offset`/`opacity` are accumulated from ancestors; the
    // placement position already includes this layer's own offset.
    fn draw_tiles(
        &self,
        backend: &mut dyn RenderBackend,
        tilesets: &TilesetRegistry,
        animations: &AnimationController,
        parent_offset: Vec2,
        opacity: f32,
    ) {
        for TilePlacement { gid, x, y, .. } in self.tiles() {
            let Some(def) = tilesets.resolve(gid) else {
                continue;
            };
            let id = TileDefId {
                tileset: def.tileset_index,
                local_id: def.local_id,
            };
            let current = animations.current_gid(id).unwrap_or(gid.clean());
            let Some(shown) = tilesets.resolve(Gid(current)) else {
                continue;
            };
            backend.draw_quad(TileQuad {
                texture: shown.tileset.texture.as_ref(),
                source: shown.tileset.source_rect(shown.local_id),
                dest: vec2(x, y) + parent_offset,
                dest_size: vec2(
                    shown.tileset.tile_width as f32,
                    shown.tileset.tile_height as f32,
                ),
                flip_h: def.flip_h,
                flip_v: def.flip_v,
                flip_diag: def.flip_d,
                opacity,
            });
        }
    }
}

/// A layer showing a single image.
#[derive(Debug, Clone)]
pub struct ImageLayer {
    pub(crate) meta: LayerMeta,
    /// Image path from the document, relative to the map file.
    pub image: String,
    /// Loaded texture; `None` until assets are loaded.
    pub texture: Option<Texture2D>,
}

/// A layer carrying objects instead of tiles.
#[derive(Debug, Clone)]
pub struct ObjectLayer {
    pub(crate) meta: LayerMeta,
    pub(crate) objects: Vec<MapObject>,
}

impl ObjectLayer {
    /// The layer's objects in document order.
    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }
}

/// A layer containing other layers. Child order is document order and
/// doubles as draw order (back to front).
#[derive(Debug, Clone)]
pub struct GroupLayer {
    pub(crate) meta: LayerMeta,
    pub(crate) children: Vec<Layer>,
}

impl GroupLayer {
    /// The child layers in draw order.
    pub fn children(&self) -> &[Layer] {
        &self.children
    }

    /// Mutable access to the child layers.
    pub fn children_mut(&mut self) -> &mut [Layer] {
        &mut self.children
    }

    /// Resolves a sequence of names by descending this group's children,
    /// one path segment per nesting level. `None` on the first miss.
    pub fn layer(&self, path: &[&str]) -> Option<&Layer> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.iter().find(|c| c.name() == *first)?;
        for segment in rest {
            let Layer::Group(group) = node else {
                return None;
            };
            node = group.children.iter().find(|c| c.name() == *segment)?;
        }
        Some(node)
    }

    /// Mutable variant of [`layer`](Self::layer).
    pub fn layer_mut(&mut self, path: &[&str]) -> Option<&mut Layer> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.iter_mut().find(|c| c.name() == *first)?;
        for segment in rest {
            let Layer::Group(group) = node else {
                return None;
            };
            node = group.children.iter_mut().find(|c| c.name() == *segment)?;
        }
        Some(node)
    }
}

/// One node of the layer tree.
#[derive(Debug, Clone)]
pub enum Layer {
    /// A tile layer.
    Tiles(TileLayer),
    /// An image layer.
    Image(ImageLayer),
    /// An object layer.
    Objects(ObjectLayer),
    /// A group of layers.
    Group(GroupLayer),
}

impl Layer {
    /// The metadata shared by every variant.
    pub fn meta(&self) -> &LayerMeta {
        match self {
            Layer::Tiles(l) => &l.meta,
            Layer::Image(l) => &l.meta,
            Layer::Objects(l) => &l.meta,
            Layer::Group(l) => &l.meta,
        }
    }

    /// Mutable access to the shared metadata.
    pub fn meta_mut(&mut self) -> &mut LayerMeta {
        match self {
            Layer::Tiles(l) => &mut l.meta,
            Layer::Image(l) => &mut l.meta,
            Layer::Objects(l) => &mut l.meta,
            Layer::Group(l) => &mut l.meta,
        }
    }

    /// The layer's name.
    pub fn name(&self) -> &str {
        &self.meta().name
    }

    /// The tile layer, when this node is one.
    pub fn as_tiles(&self) -> Option<&TileLayer> {
        match self {
            Layer::Tiles(l) => Some(l),
            _ => None,
        }
    }

    /// The tile layer, mutably.
    pub fn as_tiles_mut(&mut self) -> Option<&mut TileLayer> {
        match self {
            Layer::Tiles(l) => Some(l),
            _ => None,
        }
    }

    /// Pixel position of a grid cell under this layer's offset.
    pub fn grid_to_pixel(&self, grid_x: i32, grid_y: i32) -> Vec2 {
        let meta = self.meta();
        meta.geometry.grid_to_pixel(grid_x, grid_y, meta.offset)
    }

    /// Grid cell containing a pixel position under this layer's offset.
    pub fn pixel_to_grid(&self, x: f32, y: f32) -> (i32, i32) {
        let meta = self.meta();
        meta.geometry.pixel_to_grid(vec2(x, y), meta.offset)
    }

    /// Advances animations reachable from this layer. Runs regardless of
    /// visibility; the controller's frame stamp keeps shared definitions
    /// from advancing more than once per frame.
    pub fn update(&mut self, dt: f32, animations: &mut AnimationController) {
        match self {
            Layer::Group(group) => {
                for child in &mut group.children {
                    child.update(dt, animations);
                }
            }
            Layer::Tiles(_) | Layer::Objects(_) => animations.advance_all(dt),
            // Image layers hold no time-varying state.
            Layer::Image(_) => {}
        }
    }

    /// Draws this layer through `backend` with no inherited modifiers.
    pub fn draw(
        &self,
        backend: &mut dyn RenderBackend,
        tilesets: &TilesetRegistry,
        animations: &AnimationController,
    ) {
        self.draw_into(backend, tilesets, animations, Vec2::ZERO, 1.0);
    }

    // Recursive draw. Skips invisible subtrees entirely; accumulates
    // ancestor offsets additively and opacity multiplicatively.
    pub(crate) fn draw_into(
        &self,
        backend: &mut dyn RenderBackend,
        tilesets: &TilesetRegistry,
        animations: &AnimationController,
        parent_offset: Vec2,
        parent_opacity: f32,
    ) {
        let meta = self.meta();
        if !meta.visible {
            return;
        }
        let opacity = parent_opacity * meta.opacity;
        match self {
            Layer::Tiles(layer) => {
                layer.draw_tiles(backend, tilesets, animations, parent_offset, opacity);
            }
            Layer::Image(layer) => {
                backend.draw_image(
                    layer.texture.as_ref(),
                    parent_offset + meta.offset,
                    opacity,
                );
            }
            // Objects are opaque to the runtime; hosts draw them.
            Layer::Objects(_) => {}
            Layer::Group(group) => {
                let offset = parent_offset + meta.offset;
                for child in &group.children {
                    child.draw_into(backend, tilesets, animations, offset, opacity);
                }
            }
        }
    }
}
