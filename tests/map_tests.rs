// tests/map_tests.rs

use macroquad_tilescene::{
    Gid, Layer, Map, MapDocument, Orientation, PropertyValue, StaggerAxis, StaggerIndex, FLIP_D,
    FLIP_H, FLIP_V,
};

fn map_from(json: &str) -> Map {
    let doc = MapDocument::parse_str(json).expect("parse");
    Map::from_document(doc).expect("build")
}

fn two_tileset_map() -> Map {
    map_from(
        r#"{
      "tilewidth": 16, "tileheight": 16, "width": 4, "height": 4,
      "tilesets": [
        {"firstgid": 1, "name": "a", "tilecount": 8, "columns": 4, "tilewidth": 16, "tileheight": 16, "image": "a.png"},
        {"firstgid": 9, "name": "b", "tilecount": 8, "columns": 4, "tilewidth": 16, "tileheight": 16, "image": "b.png"}
      ],
      "layers": [
        {"type": "tilelayer", "name": "Ground", "width": 4, "height": 4,
         "data": [1, 2, 0, 0,  0, 0, 0, 0,  0, 0, 10, 0,  0, 0, 0, 0]}
      ]
    }"#,
    )
}

#[test]
fn gids_resolve_to_their_owning_tileset() {
    let map = two_tileset_map();
    assert_eq!(map.tileset(1).expect("gid 1").name, "a");
    assert_eq!(map.tileset(8).expect("gid 8").name, "a");
    assert_eq!(map.tileset(9).expect("gid 9").name, "b");
    assert!(map.tileset(0).is_none());
    assert!(map.tileset(17).is_none());

    let tile = map.tile(10).expect("resolves");
    assert_eq!(tile.local_id, 1);
    assert_eq!(tile.tileset.name, "b");
}

#[test]
fn flag_bits_never_change_what_a_gid_resolves_to() {
    let map = two_tileset_map();
    for flags in [FLIP_H, FLIP_V, FLIP_D, FLIP_H | FLIP_V | FLIP_D] {
        let flagged = map.tile(5 | flags).expect("resolves");
        let plain = map.tile(5).expect("resolves");
        assert_eq!(flagged.local_id, plain.local_id);
        assert_eq!(flagged.tileset_index, plain.tileset_index);
    }
    let tile = map.tile(5 | FLIP_H | FLIP_D).expect("resolves");
    assert!(tile.flip_h && tile.flip_d && !tile.flip_v);
}

#[test]
fn tile_property_writes_are_visible_to_every_placement() {
    let mut map = two_tileset_map();
    assert!(map.tile_property(2, "burning").is_none());
    map.set_tile_property(2, "burning", PropertyValue::Bool(true));
    // Same definition queried through a flagged GID.
    assert_eq!(
        map.tile_property(2 | FLIP_V, "burning"),
        Some(&PropertyValue::Bool(true))
    );
    // Unresolvable GID: the write is silently dropped.
    map.set_tile_property(999, "burning", PropertyValue::Bool(true));
    assert!(map.tile_property(999, "burning").is_none());
}

#[test]
fn layer_lookup_descends_groups_and_misses_cleanly() {
    let map = map_from(
        r#"{
      "tilewidth": 16, "tileheight": 16,
      "tilesets": [],
      "layers": [
        {"type": "group", "name": "World", "layers": [
          {"type": "tilelayer", "name": "Ground", "width": 1, "height": 1, "data": [0]},
          {"type": "group", "name": "Detail", "layers": [
            {"type": "imagelayer", "name": "Backdrop", "image": "sky.png"}
          ]}
        ]},
        {"type": "objectgroup", "name": "Actors", "objects": []}
      ]
    }"#,
    );

    assert!(matches!(map.layer(&["World"]), Some(Layer::Group(_))));
    assert!(matches!(
        map.layer(&["World", "Ground"]),
        Some(Layer::Tiles(_))
    ));
    assert!(matches!(
        map.layer(&["World", "Detail", "Backdrop"]),
        Some(Layer::Image(_))
    ));
    assert!(matches!(map.layer(&["Actors"]), Some(Layer::Objects(_))));

    assert!(map.layer(&["Missing"]).is_none());
    assert!(map.layer(&["World", "Missing"]).is_none());
    // A non-group cannot be descended into.
    assert!(map.layer(&["Actors", "Anything"]).is_none());
    assert!(map.layer(&[]).is_none());
}

#[test]
fn sibling_order_matches_the_document_regardless_of_type() {
    let map = map_from(
        r#"{
      "tilewidth": 16, "tileheight": 16,
      "tilesets": [],
      "layers": [
        {"type": "objectgroup", "name": "first", "objects": []},
        {"type": "tilelayer", "name": "second", "width": 1, "height": 1, "data": [0]},
        {"type": "imagelayer", "name": "third", "image": "x.png"}
      ]
    }"#,
    );
    let names: Vec<_> = map.layers().iter().map(|l| l.name()).collect();
    assert_eq!(names, ["first", "second", "third"]);
}

#[test]
fn tile_queries_and_writes_round_trip_on_grid_and_pixel_coordinates() {
    let mut map = two_tileset_map();
    let ground = map
        .layer_mut(&["Ground"])
        .and_then(|l| l.as_tiles_mut())
        .expect("tile layer");

    assert_eq!(ground.tile_at_grid(0, 0), Some(Gid(1)));
    assert_eq!(ground.tile_at_grid(2, 0), None); // empty cell
    assert_eq!(ground.tile_at_grid(-1, -1), None); // out of bounds
    assert_eq!(ground.tile_at_grid(4, 0), None);

    ground.set_tile_at_grid(3, 3, 9);
    assert_eq!(ground.tile_at_grid(3, 3), Some(Gid(9)));
    ground.set_tile_at_grid(3, 3, 9);
    assert_eq!(ground.tile_at_grid(3, 3), Some(Gid(9)));

    // Out-of-bounds writes are ignored, not errors.
    ground.set_tile_at_grid(-1, 0, 9);
    ground.set_tile_at_grid(0, 4, 9);
    assert_eq!(ground.tile_at_grid(-1, 0), None);

    // Pixel access composes pixel_to_grid with the grid accessors.
    assert_eq!(ground.tile_at_pixel(20.0, 5.0), Some(Gid(2)));
    ground.set_tile_at_pixel(50.0, 50.0, 12);
    assert_eq!(ground.tile_at_grid(3, 3), Some(Gid(12)));
}

#[test]
fn bounds_and_conversions_honor_the_layer_offset() {
    let map = map_from(
        r#"{
      "tilewidth": 16, "tileheight": 8,
      "tilesets": [],
      "layers": [
        {"type": "tilelayer", "name": "L", "width": 3, "height": 2,
         "offsetx": 8.0, "offsety": 4.0, "data": [0, 0, 0, 0, 0, 0]}
      ]
    }"#,
    );
    let layer = map.layer(&["L"]).expect("layer");
    let tiles = layer.as_tiles().expect("tile layer");

    assert_eq!(tiles.grid_bounds(), (0, 0, 3, 2));
    assert_eq!(tiles.pixel_bounds(), (8.0, 4.0, 56.0, 20.0));

    let p = layer.grid_to_pixel(1, 1);
    assert_eq!((p.x, p.y), (24.0, 12.0));
    assert_eq!(layer.pixel_to_grid(24.0, 12.0), (1, 1));
    assert_eq!(layer.pixel_to_grid(7.0, 3.0), (-1, -1));
}

#[test]
fn tiles_iterator_yields_stable_indices_and_pixel_positions() {
    let map = two_tileset_map();
    let tiles = map
        .layer(&["Ground"])
        .and_then(|l| l.as_tiles())
        .expect("tile layer");

    let got: Vec<_> = tiles.tiles().collect();
    assert_eq!(got.len(), 3);
    assert_eq!(
        got.iter().map(|t| t.index).collect::<Vec<_>>(),
        vec![0, 1, 10]
    );
    assert_eq!(got[1].gid, Gid(2));
    assert_eq!((got[1].grid_x, got[1].grid_y), (1, 0));
    assert_eq!((got[1].x, got[1].y), (16.0, 0.0));
    assert_eq!((got[2].grid_x, got[2].grid_y), (2, 2));

    // Restartable: a second pass sees the same tiles.
    assert_eq!(tiles.tiles().count(), 3);
}

#[test]
fn staggered_maps_parse_their_stagger_configuration() {
    let map = map_from(
        r#"{
      "orientation": "staggered", "staggeraxis": "y", "staggerindex": "odd",
      "tilewidth": 16, "tileheight": 8, "width": 4, "height": 4,
      "tilesets": [],
      "layers": [{"type": "tilelayer", "name": "L", "width": 4, "height": 4,
                  "data": [0,0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0]}]
    }"#,
    );
    let geometry = map.geometry();
    assert_eq!(geometry.orientation, Orientation::Staggered);
    assert_eq!(geometry.stagger_axis, StaggerAxis::Y);
    assert_eq!(geometry.stagger_index, StaggerIndex::Odd);

    let layer = map.layer(&["L"]).expect("layer");
    // Odd rows shift right by half a tile.
    assert_eq!(layer.grid_to_pixel(0, 1).x, 8.0);
    assert_eq!(layer.grid_to_pixel(0, 2).x, 0.0);
    // Round trip through the shifted row.
    for gx in 0..4 {
        for gy in 0..4 {
            let p = layer.grid_to_pixel(gx, gy);
            assert_eq!(layer.pixel_to_grid(p.x, p.y), (gx, gy));
        }
    }
}
