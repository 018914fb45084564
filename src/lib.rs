#![warn(missing_docs)]

//! Layered Tiled JSON map runtime for Macroquad: tileset GID resolution,
//! grid/pixel coordinate math, tile animations, and draw-order-correct
//! layer rendering.
//!
//! Load a map, then drive it once per frame:
//!
//! ```no_run
//! use macroquad_tilescene::Map;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut map = Map::load("assets/map.json").await?;
//! loop {
//!     map.update(macroquad::time::get_frame_time());
//!     map.draw_background();
//!     map.draw();
//!     macroquad::window::next_frame().await;
//! }
//! # }
//! ```

mod animation;
mod document;
mod error;
mod gid;
mod grid;
mod layer;
mod map;
mod properties;
mod render;
mod store;
mod tileset;

pub use animation::{AnimationController, TileDefId};
pub use document::{
    FrameDocument, LayerDocument, MapDocument, ObjectDocument, PropertyDocument, TileDocument,
    TilesetDocument,
};
pub use error::MapError;
pub use gid::{Gid, FLIP_D, FLIP_H, FLIP_V, GID_MASK};
pub use grid::{GridGeometry, Orientation, StaggerAxis, StaggerIndex};
pub use layer::{GroupLayer, ImageLayer, Layer, LayerMeta, MapObject, ObjectLayer, TileLayer};
pub use map::Map;
pub use properties::{Properties, PropertyValue};
pub use render::{MacroquadBackend, RenderBackend, TileQuad};
pub use store::{TileLayerStore, TilePlacement, Tiles};
pub use tileset::{Frame, TileDefinition, TileMeta, Tileset, TilesetRegistry};
