//! Serde model of the authoring tool's JSON map export.
//!
//! This is the "already parsed" input document the runtime is built from:
//! [`MapDocument::parse_str`] for in-memory JSON, [`MapDocument::parse_file`]
//! for a map file on disk (which also resolves external tileset references
//! relative to the map's directory). Unknown fields are ignored and absent
//! ones default, so exports from different tool versions keep loading.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

use crate::error::MapError;
use crate::properties::{Properties, PropertyValue};

fn default_true() -> bool {
    true
}
fn one() -> f32 {
    1.0
}
fn orthogonal() -> String {
    "orthogonal".to_owned()
}

/// One custom property as exported: name, optional type tag, raw value.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDocument {
    /// Property name.
    pub name: String,
    /// Type tag (`bool`, `int`, `float`, `string`, `file`, `color`,
    /// `class`, `object`); untagged values are inferred.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Raw JSON value.
    pub value: JsonValue,
}

/// One animation frame: local tile ID plus duration in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FrameDocument {
    /// Local tile ID shown during this frame.
    pub tileid: u32,
    /// Frame duration in milliseconds.
    pub duration: f32,
}

/// Per-tile metadata inside a tileset.
#[derive(Debug, Clone, Deserialize)]
pub struct TileDocument {
    /// Local tile ID.
    pub id: u32,
    /// The tile's type/class string.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Custom properties.
    #[serde(default)]
    pub properties: Vec<PropertyDocument>,
    /// Animation frames; empty for static tiles.
    #[serde(default)]
    pub animation: Vec<FrameDocument>,
}

/// A tileset entry in the map: either embedded fields or an external
/// `source` reference (resolved by [`MapDocument::parse_file`]).
#[derive(Debug, Clone, Deserialize)]
pub struct TilesetDocument {
    /// First global ID of the tileset's range.
    pub firstgid: u32,
    /// External tileset file, when not embedded.
    #[serde(default)]
    pub source: Option<String>,
    /// Tileset name.
    #[serde(default)]
    pub name: String,
    /// Tile width in pixels.
    #[serde(default)]
    pub tilewidth: u32,
    /// Tile height in pixels.
    #[serde(default)]
    pub tileheight: u32,
    /// Number of tiles.
    #[serde(default)]
    pub tilecount: u32,
    /// Atlas columns.
    #[serde(default)]
    pub columns: u32,
    /// Atlas image path.
    #[serde(default)]
    pub image: String,
    /// Pixel gap between atlas cells.
    #[serde(default)]
    pub spacing: u32,
    /// Pixel border around the atlas.
    #[serde(default)]
    pub margin: u32,
    /// Tiles carrying metadata.
    #[serde(default)]
    pub tiles: Vec<TileDocument>,
}

#[derive(Deserialize)]
struct ExternalTileset {
    #[serde(default)]
    name: String,
    tilewidth: u32,
    tileheight: u32,
    tilecount: u32,
    columns: u32,
    image: String,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    tiles: Vec<TileDocument>,
}

/// One object on an object layer. Opaque to the runtime beyond property
/// access.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectDocument {
    /// Unique object ID.
    #[serde(default)]
    pub id: u32,
    /// Object name.
    #[serde(default)]
    pub name: String,
    /// Legacy `type` field (pre-1.9 exports).
    #[serde(default, rename = "type")]
    pub kind: String,
    /// `class` field (1.9+ exports).
    #[serde(default)]
    pub class: String,
    /// Pixel x.
    #[serde(default)]
    pub x: f32,
    /// Pixel y.
    #[serde(default)]
    pub y: f32,
    /// Pixel width.
    #[serde(default)]
    pub width: f32,
    /// Pixel height.
    #[serde(default)]
    pub height: f32,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f32,
    /// Object visibility flag.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// GID for tile objects.
    #[serde(default)]
    pub gid: Option<u32>,
    /// Custom properties.
    #[serde(default)]
    pub properties: Vec<PropertyDocument>,
}

/// One layer entry, possibly a group with nested `layers`.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerDocument {
    /// Layer kind: `tilelayer`, `imagelayer`, `objectgroup`, or `group`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Layer name.
    #[serde(default)]
    pub name: String,
    /// Visibility flag.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Opacity, 0..1.
    #[serde(default = "one")]
    pub opacity: f32,
    /// Horizontal pixel offset.
    #[serde(default)]
    pub offsetx: f32,
    /// Vertical pixel offset.
    #[serde(default)]
    pub offsety: f32,
    /// Left grid bound of the layer.
    #[serde(default)]
    pub x: i32,
    /// Top grid bound of the layer.
    #[serde(default)]
    pub y: i32,
    /// Width in tiles (tile layers).
    #[serde(default)]
    pub width: usize,
    /// Height in tiles (tile layers).
    #[serde(default)]
    pub height: usize,
    /// Row-major GID data (tile layers).
    #[serde(default)]
    pub data: Vec<u32>,
    /// Image path (image layers).
    #[serde(default)]
    pub image: Option<String>,
    /// Objects (object layers).
    #[serde(default)]
    pub objects: Vec<ObjectDocument>,
    /// Child layers (groups).
    #[serde(default)]
    pub layers: Vec<LayerDocument>,
    /// Custom properties.
    #[serde(default)]
    pub properties: Vec<PropertyDocument>,
}

/// The parsed map export: metadata, tilesets, and the ordered layer list.
#[derive(Debug, Clone, Deserialize)]
pub struct MapDocument {
    /// Grid projection name (`orthogonal`, `staggered`, ...).
    #[serde(default = "orthogonal")]
    pub orientation: String,
    /// Stagger axis (`x` or `y`) for staggered maps.
    #[serde(default)]
    pub staggeraxis: Option<String>,
    /// Stagger parity (`odd` or `even`) for staggered maps.
    #[serde(default)]
    pub staggerindex: Option<String>,
    /// Map width in tiles.
    #[serde(default)]
    pub width: u32,
    /// Map height in tiles.
    #[serde(default)]
    pub height: u32,
    /// Tile width in pixels.
    pub tilewidth: u32,
    /// Tile height in pixels.
    pub tileheight: u32,
    /// Background color as `#RRGGBB` or `#AARRGGBB`.
    #[serde(default)]
    pub backgroundcolor: Option<String>,
    /// Map-level custom properties.
    #[serde(default)]
    pub properties: Vec<PropertyDocument>,
    /// Tilesets, in export order.
    #[serde(default)]
    pub tilesets: Vec<TilesetDocument>,
    /// Layers, in export (draw) order.
    #[serde(default)]
    pub layers: Vec<LayerDocument>,
}

impl MapDocument {
    /// Parses a map export from a JSON string. External tileset references
    /// are left unresolved and will fail map construction.
    pub fn parse_str(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a map export from a `.json` file, resolving external tileset
    /// references relative to the file's directory. Returns the document
    /// and that directory (needed later to locate images).
    pub fn parse_file(path: impl AsRef<Path>) -> Result<(Self, PathBuf), MapError> {
        let path = path.as_ref();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            return Err(MapError::UnsupportedFormat(path.display().to_string()));
        }
        let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut doc: MapDocument = serde_json::from_str(&txt).map_err(|source| MapError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let map_dir = path
            .parent()
            .map(|d| d.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./"));

        for tileset in &mut doc.tilesets {
            if let Some(source) = tileset.source.take() {
                if !source.ends_with(".json") {
                    return Err(MapError::UnsupportedFormat(source));
                }
                let ts_path = map_dir.join(&source);
                let ext_txt = std::fs::read_to_string(&ts_path).map_err(|source| MapError::Io {
                    path: ts_path.clone(),
                    source,
                })?;
                let ext: ExternalTileset =
                    serde_json::from_str(&ext_txt).map_err(|source| MapError::Json {
                        path: ts_path,
                        source,
                    })?;
                tileset.name = ext.name;
                tileset.tilewidth = ext.tilewidth;
                tileset.tileheight = ext.tileheight;
                tileset.tilecount = ext.tilecount;
                tileset.columns = ext.columns;
                tileset.image = ext.image;
                tileset.spacing = ext.spacing;
                tileset.margin = ext.margin;
                tileset.tiles = ext.tiles;
            }
        }

        Ok((doc, map_dir))
    }
}

fn property_to_value(prop: PropertyDocument) -> Result<Option<(String, PropertyValue)>, MapError> {
    let PropertyDocument { name, kind, value } = prop;

    let parsed = match kind.as_deref() {
        Some("bool") => value.as_bool().map(PropertyValue::Bool),
        Some("int") | Some("object") => value.as_i64().map(PropertyValue::Int),
        Some("float") => value.as_f64().map(|n| PropertyValue::Float(n as f32)),
        Some("string") | Some("file") | Some("color") | Some("class") => {
            value.as_str().map(|s| PropertyValue::String(s.to_owned()))
        }
        Some(other) => {
            return Err(MapError::UnsupportedPropertyType {
                name,
                kind: other.to_owned(),
            });
        }
        None => {
            if let Some(v) = value.as_bool() {
                Some(PropertyValue::Bool(v))
            } else if let Some(v) = value.as_i64() {
                Some(PropertyValue::Int(v))
            } else if let Some(v) = value.as_f64() {
                Some(PropertyValue::Float(v as f32))
            } else {
                value.as_str().map(|s| PropertyValue::String(s.to_owned()))
            }
        }
    };

    Ok(parsed.map(|value| (name, value)))
}

/// Converts an exported property list into a typed [`Properties`] bag.
pub(crate) fn properties_from_document(
    props: Vec<PropertyDocument>,
) -> Result<Properties, MapError> {
    let mut out = Properties::new();
    for p in props {
        if let Some((name, value)) = property_to_value(p)? {
            out.insert(name, value);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untyped_properties_are_inferred_from_the_json_value() {
        let props = vec![
            PropertyDocument {
                name: "a".into(),
                kind: None,
                value: serde_json::json!(true),
            },
            PropertyDocument {
                name: "b".into(),
                kind: None,
                value: serde_json::json!(3),
            },
            PropertyDocument {
                name: "c".into(),
                kind: None,
                value: serde_json::json!("hi"),
            },
        ];
        let out = properties_from_document(props).expect("convert");
        assert_eq!(out.get_bool("a"), Some(true));
        assert_eq!(out.get_i64("b"), Some(3));
        assert_eq!(out.get_str("c"), Some("hi"));
    }

    #[test]
    fn unknown_property_types_are_rejected() {
        let props = vec![PropertyDocument {
            name: "mystery".into(),
            kind: Some("not_supported".into()),
            value: serde_json::json!("x"),
        }];
        let err = properties_from_document(props).expect_err("must fail");
        assert!(matches!(err, MapError::UnsupportedPropertyType { .. }));
    }

    #[test]
    fn large_int_properties_survive() {
        let props = vec![PropertyDocument {
            name: "big_id".into(),
            kind: Some("object".into()),
            value: serde_json::json!(5_000_000_000i64),
        }];
        let out = properties_from_document(props).expect("convert");
        assert_eq!(out.get_i64("big_id"), Some(5_000_000_000));
    }
}
