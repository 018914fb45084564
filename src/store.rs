use macroquad::prelude::*;

use crate::gid::Gid;
use crate::grid::GridGeometry;

/// Dense row-major GID storage for one tile layer.
///
/// The grid bounds `[left, right) x [top, bottom)` are fixed at
/// construction. Every cell inside them is addressable; a stored value of 0
/// is the empty tile. Queries outside the bounds return `None` and writes
/// outside the bounds are silently ignored — world-edge probing is routine
/// in per-frame game code and must never take down the frame loop.
#[derive(Debug, Clone)]
pub struct TileLayerStore {
    left: i32,
    top: i32,
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl TileLayerStore {
    /// Creates an all-empty store with the given origin and size.
    pub fn new(left: i32, top: i32, width: usize, height: usize) -> Self {
        TileLayerStore {
            left,
            top,
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Creates a store from row-major cell data. The caller guarantees
    /// `data.len() == width * height`; the loader validates this before
    /// construction.
    pub fn from_data(left: i32, top: i32, width: usize, height: usize, data: Vec<u32>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        TileLayerStore {
            left,
            top,
            width,
            height,
            cells: data,
        }
    }

    /// Grid bounds as `(left, top, right, bottom)`, right/bottom exclusive.
    pub fn grid_bounds(&self) -> (i32, i32, i32, i32) {
        (
            self.left,
            self.top,
            self.left + self.width as i32,
            self.top + self.height as i32,
        )
    }

    /// Whether `(grid_x, grid_y)` lies inside the bounds.
    #[inline]
    pub fn contains(&self, grid_x: i32, grid_y: i32) -> bool {
        grid_x >= self.left
            && grid_y >= self.top
            && grid_x < self.left + self.width as i32
            && grid_y < self.top + self.height as i32
    }

    #[inline]
    fn cell_index(&self, grid_x: i32, grid_y: i32) -> usize {
        (grid_y - self.top) as usize * self.width + (grid_x - self.left) as usize
    }

    /// The GID at `(grid_x, grid_y)`, or `None` when the cell is empty or
    /// the coordinates are outside the bounds.
    #[inline]
    pub fn gid_at(&self, grid_x: i32, grid_y: i32) -> Option<Gid> {
        if !self.contains(grid_x, grid_y) {
            return None;
        }
        match self.cells[self.cell_index(grid_x, grid_y)] {
            0 => None,
            raw => Some(Gid(raw)),
        }
    }

    /// Writes a raw GID (0 clears the cell). Out-of-bounds writes are
    /// ignored.
    #[inline]
    pub fn set_gid_at(&mut self, grid_x: i32, grid_y: i32, gid: u32) {
        if self.contains(grid_x, grid_y) {
            let idx = self.cell_index(grid_x, grid_y);
            self.cells[idx] = gid;
        }
    }

    /// Iterates over the non-empty cells in row-major order.
    pub fn tiles(&self, geometry: GridGeometry, offset: Vec2) -> Tiles<'_> {
        Tiles {
            store: self,
            geometry,
            offset,
            cursor: 0,
        }
    }
}

/// One non-empty cell yielded by [`TileLayerStore::tiles`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    /// Row-major linear offset within the layer bounds; stable per-tile
    /// identity for one frame.
    pub index: usize,
    /// The stored GID, flip flags included.
    pub gid: Gid,
    /// Grid column.
    pub grid_x: i32,
    /// Grid row.
    pub grid_y: i32,
    /// Pixel x of the cell's top-left corner (layer offset applied).
    pub x: f32,
    /// Pixel y of the cell's top-left corner (layer offset applied).
    pub y: f32,
}

/// Restartable iterator over a layer's non-empty tiles.
pub struct Tiles<'a> {
    store: &'a TileLayerStore,
    geometry: GridGeometry,
    offset: Vec2,
    cursor: usize,
}

impl Iterator for Tiles<'_> {
    type Item = TilePlacement;

    fn next(&mut self) -> Option<TilePlacement> {
        while self.cursor < self.store.cells.len() {
            let index = self.cursor;
            self.cursor += 1;
            let raw = self.store.cells[index];
            if raw == 0 {
                continue;
            }
            let grid_x = self.store.left + (index % self.store.width) as i32;
            let grid_y = self.store.top + (index / self.store.width) as i32;
            let p = self.geometry.grid_to_pixel(grid_x, grid_y, self.offset);
            return Some(TilePlacement {
                index,
                gid: Gid(raw),
                grid_x,
                grid_y,
                x: p.x,
                y: p.y,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridGeometry;

    #[test]
    fn get_set_round_trip_and_idempotence() {
        let mut store = TileLayerStore::new(0, 0, 4, 4);
        assert_eq!(store.gid_at(1, 2), None);
        store.set_gid_at(1, 2, 7);
        assert_eq!(store.gid_at(1, 2), Some(Gid(7)));
        store.set_gid_at(1, 2, 7);
        assert_eq!(store.gid_at(1, 2), Some(Gid(7)));
        store.set_gid_at(1, 2, 0);
        assert_eq!(store.gid_at(1, 2), None);
    }

    #[test]
    fn out_of_bounds_reads_are_none_and_writes_are_ignored() {
        let mut store = TileLayerStore::new(0, 0, 2, 2);
        assert_eq!(store.gid_at(-1, -1), None);
        assert_eq!(store.gid_at(2, 0), None);
        store.set_gid_at(-1, -1, 9);
        store.set_gid_at(0, 2, 9);
        assert!(store.tiles(GridGeometry::orthogonal(8.0, 8.0), Vec2::ZERO).count() == 0);
    }

    #[test]
    fn nonzero_origin_addresses_by_world_grid() {
        let mut store = TileLayerStore::new(2, 3, 2, 2);
        store.set_gid_at(3, 4, 5);
        assert_eq!(store.gid_at(3, 4), Some(Gid(5)));
        assert_eq!(store.gid_at(0, 0), None);
        assert_eq!(store.grid_bounds(), (2, 3, 4, 5));
    }

    #[test]
    fn tiles_iterator_skips_empty_cells_and_reports_positions() {
        let store = TileLayerStore::from_data(0, 0, 3, 2, vec![0, 4, 0, 0, 0, 9]);
        let g = GridGeometry::orthogonal(16.0, 16.0);
        let got: Vec<_> = store.tiles(g, vec2(10.0, 0.0)).collect();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].index, 1);
        assert_eq!(got[0].gid, Gid(4));
        assert_eq!((got[0].grid_x, got[0].grid_y), (1, 0));
        assert_eq!((got[0].x, got[0].y), (26.0, 0.0));
        assert_eq!(got[1].index, 5);
        assert_eq!((got[1].grid_x, got[1].grid_y), (2, 1));

        // restartable
        assert_eq!(store.tiles(g, Vec2::ZERO).count(), 2);
    }
}
