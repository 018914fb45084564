use macroquad::prelude::*;

/// Grid projection scheme of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Plain rectangular grid.
    Orthogonal,
    /// Rectangular grid with every other row (or column) shifted by half a
    /// tile along the cross axis.
    Staggered,
}

/// Which axis of a staggered map is shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaggerAxis {
    /// Odd/even columns are shifted vertically.
    X,
    /// Odd/even rows are shifted horizontally.
    Y,
}

/// Whether the odd or the even rows/columns of a staggered map are shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaggerIndex {
    /// Rows/columns 1, 3, 5… are shifted (Tiled's default).
    Odd,
    /// Rows/columns 0, 2, 4… are shifted.
    Even,
}

/// The immutable grid parameters shared by every layer of one map.
///
/// Both conversions are pure functions of these parameters; layers pass in
/// their own pixel offset.
#[derive(Debug, Clone, Copy)]
pub struct GridGeometry {
    /// Grid projection scheme.
    pub orientation: Orientation,
    /// Tile width in pixels.
    pub tile_width: f32,
    /// Tile height in pixels.
    pub tile_height: f32,
    /// Stagger axis; ignored for orthogonal maps.
    pub stagger_axis: StaggerAxis,
    /// Stagger parity; ignored for orthogonal maps.
    pub stagger_index: StaggerIndex,
}

impl GridGeometry {
    /// An orthogonal geometry with the given tile size.
    pub fn orthogonal(tile_width: f32, tile_height: f32) -> Self {
        GridGeometry {
            orientation: Orientation::Orthogonal,
            tile_width,
            tile_height,
            stagger_axis: StaggerAxis::Y,
            stagger_index: StaggerIndex::Odd,
        }
    }

    // Whether the row/column at `line` is the shifted one.
    fn shifted(&self, line: i32) -> bool {
        match self.stagger_index {
            StaggerIndex::Odd => line.rem_euclid(2) == 1,
            StaggerIndex::Even => line.rem_euclid(2) == 0,
        }
    }

    /// Converts grid coordinates to the pixel position of the cell's
    /// top-left corner, including the layer's pixel offset.
    pub fn grid_to_pixel(&self, grid_x: i32, grid_y: i32, offset: Vec2) -> Vec2 {
        let mut p = vec2(
            grid_x as f32 * self.tile_width,
            grid_y as f32 * self.tile_height,
        );
        if self.orientation == Orientation::Staggered {
            match self.stagger_axis {
                StaggerAxis::Y if self.shifted(grid_y) => p.x += self.tile_width * 0.5,
                StaggerAxis::X if self.shifted(grid_x) => p.y += self.tile_height * 0.5,
                _ => {}
            }
        }
        p + offset
    }

    /// Converts a pixel position back to grid coordinates, the exact inverse
    /// of [`grid_to_pixel`](Self::grid_to_pixel).
    ///
    /// For staggered maps the line along the stagger axis is computed first
    /// from the unaffected coordinate, then the half-tile parity shift is
    /// removed before dividing the other coordinate, so shifted rows resolve
    /// to the nearest cell instead of drifting by naive division.
    pub fn pixel_to_grid(&self, point: Vec2, offset: Vec2) -> (i32, i32) {
        let p = point - offset;
        match self.orientation {
            Orientation::Orthogonal => (
                (p.x / self.tile_width).floor() as i32,
                (p.y / self.tile_height).floor() as i32,
            ),
            Orientation::Staggered => match self.stagger_axis {
                StaggerAxis::Y => {
                    let grid_y = (p.y / self.tile_height).floor() as i32;
                    let x = if self.shifted(grid_y) {
                        p.x - self.tile_width * 0.5
                    } else {
                        p.x
                    };
                    ((x / self.tile_width).floor() as i32, grid_y)
                }
                StaggerAxis::X => {
                    let grid_x = (p.x / self.tile_width).floor() as i32;
                    let y = if self.shifted(grid_x) {
                        p.y - self.tile_height * 0.5
                    } else {
                        p.y
                    };
                    (grid_x, (y / self.tile_height).floor() as i32)
                }
            },
        }
    }

    /// Pixel bounds `(left, top, right, bottom)` of a grid-bounds rectangle,
    /// widened by half a tile on the shifted axis of staggered maps.
    pub fn pixel_bounds(
        &self,
        (left, top, right, bottom): (i32, i32, i32, i32),
        offset: Vec2,
    ) -> (f32, f32, f32, f32) {
        let mut r = right as f32 * self.tile_width + offset.x;
        let mut b = bottom as f32 * self.tile_height + offset.y;
        if self.orientation == Orientation::Staggered {
            match self.stagger_axis {
                StaggerAxis::Y => r += self.tile_width * 0.5,
                StaggerAxis::X => b += self.tile_height * 0.5,
            }
        }
        (
            left as f32 * self.tile_width + offset.x,
            top as f32 * self.tile_height + offset.y,
            r,
            b,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staggered(axis: StaggerAxis, index: StaggerIndex) -> GridGeometry {
        GridGeometry {
            orientation: Orientation::Staggered,
            tile_width: 16.0,
            tile_height: 8.0,
            stagger_axis: axis,
            stagger_index: index,
        }
    }

    #[test]
    fn orthogonal_round_trip_is_exact() {
        let g = GridGeometry::orthogonal(16.0, 16.0);
        let offset = vec2(3.0, -5.0);
        for gx in -4..4 {
            for gy in -4..4 {
                let p = g.grid_to_pixel(gx, gy, offset);
                assert_eq!(g.pixel_to_grid(p, offset), (gx, gy));
            }
        }
    }

    #[test]
    fn orthogonal_grid_to_pixel_scales_by_tile_size() {
        let g = GridGeometry::orthogonal(16.0, 8.0);
        assert_eq!(g.grid_to_pixel(2, 3, vec2(1.0, 2.0)), vec2(33.0, 26.0));
    }

    #[test]
    fn staggered_rows_shift_odd_rows_by_half_a_tile() {
        let g = staggered(StaggerAxis::Y, StaggerIndex::Odd);
        assert_eq!(g.grid_to_pixel(0, 0, Vec2::ZERO), vec2(0.0, 0.0));
        assert_eq!(g.grid_to_pixel(0, 1, Vec2::ZERO), vec2(8.0, 8.0));
        assert_eq!(g.grid_to_pixel(0, 2, Vec2::ZERO), vec2(0.0, 16.0));

        let even = staggered(StaggerAxis::Y, StaggerIndex::Even);
        assert_eq!(even.grid_to_pixel(0, 0, Vec2::ZERO), vec2(8.0, 0.0));
        assert_eq!(even.grid_to_pixel(0, 1, Vec2::ZERO), vec2(0.0, 8.0));
    }

    #[test]
    fn staggered_round_trip_is_exact_for_both_axes() {
        for axis in [StaggerAxis::X, StaggerAxis::Y] {
            for index in [StaggerIndex::Odd, StaggerIndex::Even] {
                let g = staggered(axis, index);
                let offset = vec2(7.0, 11.0);
                for gx in -3..6 {
                    for gy in -3..6 {
                        let p = g.grid_to_pixel(gx, gy, offset);
                        assert_eq!(
                            g.pixel_to_grid(p, offset),
                            (gx, gy),
                            "axis {:?} index {:?} cell ({}, {})",
                            axis,
                            index,
                            gx,
                            gy
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn negative_pixels_floor_toward_negative_cells() {
        let g = GridGeometry::orthogonal(16.0, 16.0);
        assert_eq!(g.pixel_to_grid(vec2(-1.0, -1.0), Vec2::ZERO), (-1, -1));
    }

    #[test]
    fn staggered_pixel_bounds_widen_by_half_a_tile() {
        let g = staggered(StaggerAxis::Y, StaggerIndex::Odd);
        let (l, t, r, b) = g.pixel_bounds((0, 0, 4, 4), Vec2::ZERO);
        assert_eq!((l, t), (0.0, 0.0));
        assert_eq!(r, 4.0 * 16.0 + 8.0);
        assert_eq!(b, 4.0 * 8.0);
    }
}
