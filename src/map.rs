use std::path::Path;

use anyhow::Context;
use macroquad::prelude::*;

use crate::animation::{AnimationController, TileDefId};
use crate::document::{self, LayerDocument, MapDocument};
use crate::error::MapError;
use crate::gid::Gid;
use crate::grid::{GridGeometry, Orientation, StaggerAxis, StaggerIndex};
use crate::layer::{
    GroupLayer, ImageLayer, Layer, LayerMeta, MapObject, ObjectLayer, TileLayer,
};
use crate::properties::{Properties, PropertyValue};
use crate::render::{MacroquadBackend, RenderBackend};
use crate::store::TileLayerStore;
use crate::tileset::{Frame, TileDefinition, TileMeta, Tileset, TilesetRegistry};

/// A loaded tile map: tilesets, the layer tree, and animation state, driven
/// by one `update(dt)` plus one `draw()` per frame on the host's frame
/// thread. Nothing here blocks or locks.
#[derive(Debug)]
pub struct Map {
    /// Grid projection of the map.
    pub orientation: Orientation,
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Background color, if the document configures one.
    pub background_color: Option<Color>,
    /// Map-level custom properties.
    pub properties: Properties,
    geometry: GridGeometry,
    tilesets: TilesetRegistry,
    root: GroupLayer,
    animations: AnimationController,
}

impl Map {
    /// Loads a map from a `.json` file, resolving external tilesets and
    /// loading tileset/image-layer textures with nearest filtering.
    pub async fn load(path: &str) -> anyhow::Result<Self> {
        let (doc, base_dir) = MapDocument::parse_file(path)?;
        let mut map = Self::from_document(doc)?;
        map.load_textures(&base_dir).await?;
        Ok(map)
    }

    /// Builds a map from an already-parsed document without touching the
    /// filesystem; textures stay unloaded (draws become no-ops).
    ///
    /// Construction is atomic: any validation failure returns a
    /// [`MapError`] and no map.
    pub fn from_document(doc: MapDocument) -> Result<Self, MapError> {
        let orientation = match doc.orientation.as_str() {
            "orthogonal" => Orientation::Orthogonal,
            "staggered" => Orientation::Staggered,
            other => return Err(MapError::UnsupportedOrientation(other.to_owned())),
        };
        let stagger_axis = match doc.staggeraxis.as_deref() {
            Some("x") => StaggerAxis::X,
            _ => StaggerAxis::Y,
        };
        let stagger_index = match doc.staggerindex.as_deref() {
            Some("even") => StaggerIndex::Even,
            _ => StaggerIndex::Odd,
        };
        let geometry = GridGeometry {
            orientation,
            tile_width: doc.tilewidth as f32,
            tile_height: doc.tileheight as f32,
            stagger_axis,
            stagger_index,
        };

        let mut tilesets = Vec::with_capacity(doc.tilesets.len());
        for ts in doc.tilesets {
            if let Some(source) = ts.source {
                return Err(MapError::UnresolvedTileset(source));
            }
            let mut tiles = std::collections::HashMap::new();
            for tile in ts.tiles {
                tiles.insert(
                    tile.id,
                    TileMeta {
                        kind: tile.kind,
                        properties: document::properties_from_document(tile.properties)?,
                        animation: tile
                            .animation
                            .iter()
                            .map(|f| Frame {
                                gid: ts.firstgid + f.tileid,
                                duration_ms: f.duration,
                            })
                            .collect(),
                    },
                );
            }
            tilesets.push(Tileset {
                name: ts.name,
                first_gid: ts.firstgid,
                tile_count: ts.tilecount,
                columns: ts.columns.max(1),
                tile_width: ts.tilewidth,
                tile_height: ts.tileheight,
                spacing: ts.spacing,
                margin: ts.margin,
                image: ts.image,
                texture: None,
                tiles,
            });
        }
        let tilesets = TilesetRegistry::new(tilesets)?;

        let mut animations = AnimationController::new();
        for (index, ts) in tilesets.tilesets().iter().enumerate() {
            for (&local_id, meta) in &ts.tiles {
                if !meta.animation.is_empty() {
                    animations.register(
                        TileDefId {
                            tileset: index,
                            local_id,
                        },
                        meta.animation.clone(),
                    );
                }
            }
        }

        let mut children = Vec::with_capacity(doc.layers.len());
        for layer in doc.layers {
            children.push(build_layer(layer, geometry)?);
        }
        let root = GroupLayer {
            meta: LayerMeta {
                name: String::new(),
                visible: true,
                opacity: 1.0,
                offset: Vec2::ZERO,
                properties: Properties::new(),
                geometry,
            },
            children,
        };

        Ok(Map {
            orientation,
            width: doc.width,
            height: doc.height,
            tile_width: doc.tilewidth,
            tile_height: doc.tileheight,
            background_color: doc.backgroundcolor.as_deref().and_then(parse_color),
            properties: document::properties_from_document(doc.properties)?,
            geometry,
            tilesets,
            root,
            animations,
        })
    }

    async fn load_textures(&mut self, base_dir: &Path) -> anyhow::Result<()> {
        for tileset in self.tilesets.tilesets_mut() {
            let img_path = base_dir.join(&tileset.image);
            let tex = load_texture(&img_path.to_string_lossy())
                .await
                .with_context(|| format!("Loading tileset image {}", tileset.image))?;
            tex.set_filter(FilterMode::Nearest);
            tileset.texture = Some(tex);
        }
        load_image_layer_textures(self.root.children_mut(), base_dir).await
    }

    /// Grid geometry shared by every layer.
    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    /// The map's tilesets.
    pub fn tilesets(&self) -> &TilesetRegistry {
        &self.tilesets
    }

    /// The top-level layers in draw order.
    pub fn layers(&self) -> &[Layer] {
        self.root.children()
    }

    /// Resolves a dot-free name path (one slice element per nesting level)
    /// to a layer; `None` on the first unmatched segment.
    pub fn layer(&self, path: &[&str]) -> Option<&Layer> {
        self.root.layer(path)
    }

    /// Mutable variant of [`layer`](Self::layer).
    pub fn layer_mut(&mut self, path: &[&str]) -> Option<&mut Layer> {
        self.root.layer_mut(path)
    }

    /// The tileset owning a GID.
    pub fn tileset(&self, gid: u32) -> Option<&Tileset> {
        self.tilesets.tileset_for(Gid(gid))
    }

    /// The resolved tile definition of a GID, flags decoded.
    pub fn tile(&self, gid: u32) -> Option<TileDefinition<'_>> {
        self.tilesets.resolve(Gid(gid))
    }

    /// The type/class string of a tile.
    pub fn tile_type(&self, gid: u32) -> Option<&str> {
        self.tilesets.tile_type(Gid(gid))
    }

    /// A custom property of a tile.
    pub fn tile_property(&self, gid: u32, name: &str) -> Option<&PropertyValue> {
        self.tilesets.tile_property(Gid(gid), name)
    }

    /// Sets a custom property on a tile definition; the write is shared by
    /// every placement of that tile. No-op for unresolved GIDs.
    pub fn set_tile_property(&mut self, gid: u32, name: &str, value: PropertyValue) {
        self.tilesets.set_tile_property(Gid(gid), name, value);
    }

    /// Animation playback state, for hosts that query current frames.
    pub fn animations(&self) -> &AnimationController {
        &self.animations
    }

    /// Advances all animations by `dt` seconds. Runs through the whole
    /// tree including invisible layers; the frame stamp guarantees each
    /// shared animation state moves exactly once per call.
    pub fn update(&mut self, dt: f32) {
        self.animations.begin_frame();
        for child in self.root.children_mut() {
            child.update(dt, &mut self.animations);
        }
        // Maps whose animated tiles are not placed on any layer yet still
        // tick; the stamp makes this a no-op otherwise.
        self.animations.advance_all(dt);
    }

    /// Draws the map through the macroquad backend.
    pub fn draw(&self) {
        self.draw_with(&mut MacroquadBackend);
    }

    /// Draws the map through an arbitrary backend, layers back to front in
    /// document order, honoring visibility, opacity, and offsets.
    pub fn draw_with(&self, backend: &mut dyn RenderBackend) {
        for child in self.root.children() {
            child.draw_into(backend, &self.tilesets, &self.animations, Vec2::ZERO, 1.0);
        }
    }

    /// Fills the map's pixel bounds with the configured background color.
    pub fn draw_background(&self) {
        self.draw_background_with(&mut MacroquadBackend);
    }

    /// [`draw_background`](Self::draw_background) through an arbitrary
    /// backend; a no-op when the document configures no color.
    pub fn draw_background_with(&self, backend: &mut dyn RenderBackend) {
        if let Some(color) = self.background_color {
            backend.fill_rect(
                Vec2::ZERO,
                vec2(
                    (self.width * self.tile_width) as f32,
                    (self.height * self.tile_height) as f32,
                ),
                color,
            );
        }
    }
}

fn build_layer(doc: LayerDocument, geometry: GridGeometry) -> Result<Layer, MapError> {
    let meta = LayerMeta {
        name: doc.name.clone(),
        visible: doc.visible,
        opacity: doc.opacity,
        offset: vec2(doc.offsetx, doc.offsety),
        properties: document::properties_from_document(doc.properties)?,
        geometry,
    };
    let layer = match doc.kind.as_deref().unwrap_or("tilelayer") {
        "tilelayer" => {
            if doc.data.len() != doc.width * doc.height {
                return Err(MapError::InvalidLayerSize(doc.name));
            }
            Layer::Tiles(TileLayer {
                meta,
                store: TileLayerStore::from_data(doc.x, doc.y, doc.width, doc.height, doc.data),
            })
        }
        "imagelayer" => Layer::Image(ImageLayer {
            meta,
            image: doc.image.unwrap_or_default(),
            texture: None,
        }),
        "objectgroup" => Layer::Objects(ObjectLayer {
            meta,
            objects: doc
                .objects
                .into_iter()
                .map(|obj| {
                    Ok(MapObject {
                        id: obj.id,
                        name: obj.name,
                        class_name: if obj.class.is_empty() {
                            obj.kind
                        } else {
                            obj.class
                        },
                        x: obj.x,
                        y: obj.y,
                        width: obj.width,
                        height: obj.height,
                        rotation: obj.rotation,
                        visible: obj.visible,
                        gid: obj.gid.map(Gid),
                        properties: document::properties_from_document(obj.properties)?,
                    })
                })
                .collect::<Result<Vec<_>, MapError>>()?,
        }),
        "group" => {
            let mut children = Vec::with_capacity(doc.layers.len());
            for child in doc.layers {
                children.push(build_layer(child, geometry)?);
            }
            Layer::Group(GroupLayer { meta, children })
        }
        // Unknown layer kinds draw nothing but keep their place in the
        // sibling order.
        _ => Layer::Group(GroupLayer {
            meta,
            children: Vec::new(),
        }),
    };
    Ok(layer)
}

// Walk the tree loading image-layer textures. Iterative with an explicit
// stack because the async recursion would need boxing.
async fn load_image_layer_textures(
    children: &mut [Layer],
    base_dir: &Path,
) -> anyhow::Result<()> {
    let mut stack: Vec<&mut Layer> = children.iter_mut().collect();
    while let Some(layer) = stack.pop() {
        match layer {
            Layer::Image(image) => {
                if image.image.is_empty() {
                    continue;
                }
                let img_path = base_dir.join(&image.image);
                let tex = load_texture(&img_path.to_string_lossy())
                    .await
                    .with_context(|| format!("Loading image layer {}", image.image))?;
                tex.set_filter(FilterMode::Nearest);
                image.texture = Some(tex);
            }
            Layer::Group(group) => stack.extend(group.children.iter_mut()),
            _ => {}
        }
    }
    Ok(())
}

/// Parses Tiled's `#RRGGBB` / `#AARRGGBB` background color strings.
fn parse_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(Color::from_rgba(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Color::from_rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
        _ => None,
    }
}
