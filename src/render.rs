use std::f32::consts::FRAC_PI_2;

use macroquad::prelude::*;

/// One textured-quad draw request: atlas region, destination, flip flags,
/// opacity. The core issues one of these per visible non-empty tile per
/// frame; batching for the GPU is the backend's business.
#[derive(Debug, Clone, Copy)]
pub struct TileQuad<'a> {
    /// Atlas texture; `None` when assets were never loaded (backends skip).
    pub texture: Option<&'a Texture2D>,
    /// Source region inside the atlas, in pixels.
    pub source: Rect,
    /// Destination top-left corner, in pixels.
    pub dest: Vec2,
    /// Destination size, in pixels.
    pub dest_size: Vec2,
    /// Horizontal flip flag.
    pub flip_h: bool,
    /// Vertical flip flag.
    pub flip_v: bool,
    /// Diagonal flip flag (applied before the axis flips).
    pub flip_diag: bool,
    /// Accumulated opacity, 0..1.
    pub opacity: f32,
}

/// The single drawing capability consumed by the map's draw paths.
///
/// [`MacroquadBackend`] is the production implementation; tests substitute a
/// recording one.
pub trait RenderBackend {
    /// Draws one textured quad.
    fn draw_quad(&mut self, quad: TileQuad<'_>);

    /// Draws a full image (image layers) at `dest` with the given opacity.
    fn draw_image(&mut self, texture: Option<&Texture2D>, dest: Vec2, opacity: f32);

    /// Fills a rectangle with a solid color (map background).
    fn fill_rect(&mut self, dest: Vec2, size: Vec2, color: Color);
}

/// Renders through macroquad's immediate-mode sprite batcher.
#[derive(Debug, Default)]
pub struct MacroquadBackend;

impl RenderBackend for MacroquadBackend {
    fn draw_quad(&mut self, quad: TileQuad<'_>) {
        let Some(texture) = quad.texture else {
            return;
        };
        // A diagonal flip is a transpose: quarter-turn clockwise plus a
        // vertical flip, with the axis flips swapping roles under the
        // rotation.
        let (rotation, flip_x, flip_y) = if quad.flip_diag {
            (FRAC_PI_2, !quad.flip_v, quad.flip_h)
        } else {
            (0.0, quad.flip_h, quad.flip_v)
        };
        let tint = Color::new(1.0, 1.0, 1.0, quad.opacity);
        draw_texture_ex(
            texture,
            quad.dest.x,
            quad.dest.y,
            tint,
            DrawTextureParams {
                dest_size: Some(quad.dest_size),
                source: Some(quad.source),
                rotation,
                flip_x,
                flip_y,
                ..Default::default()
            },
        );
    }

    fn draw_image(&mut self, texture: Option<&Texture2D>, dest: Vec2, opacity: f32) {
        let Some(texture) = texture else {
            return;
        };
        let tint = Color::new(1.0, 1.0, 1.0, opacity);
        draw_texture(texture, dest.x, dest.y, tint);
    }

    fn fill_rect(&mut self, dest: Vec2, size: Vec2, color: Color) {
        draw_rectangle(dest.x, dest.y, size.x, size.y, color);
    }
}
