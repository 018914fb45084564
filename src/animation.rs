use std::collections::HashMap;

use crate::tileset::Frame;

/// Identity of one tile definition: tileset index plus local tile ID.
///
/// Animation state is keyed by this value, not by placement, so every cell
/// showing the same animated tile shares one playback state and stays in
/// frame sync. That aliasing is deliberate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileDefId {
    /// Index of the tileset within the registry.
    pub tileset: usize,
    /// Tile index local to the tileset.
    pub local_id: u32,
}

#[derive(Debug, Clone)]
struct AnimationState {
    frames: Vec<Frame>,
    total_ms: f32,
    elapsed_ms: f32,
    frame: usize,
}

impl AnimationState {
    fn advance(&mut self, dt_ms: f32) {
        // All-zero durations would spin the catch-up loop forever.
        if self.total_ms <= 0.0 {
            self.elapsed_ms = 0.0;
            return;
        }
        self.elapsed_ms += dt_ms;
        // Catch up frame by frame so a dt spanning several frames (dropped
        // frames) still lands on the right one.
        while self.elapsed_ms >= self.frames[self.frame].duration_ms {
            self.elapsed_ms -= self.frames[self.frame].duration_ms;
            self.frame = (self.frame + 1) % self.frames.len();
        }
    }
}

/// Advances the playback state of every animated tile definition in a map.
///
/// A `u32` frame stamp deduplicates advancement: [`Map::update`] bumps the
/// stamp once per frame, and however many layers then request an advance,
/// the states move only once. The stamp skips 0 on wrap-around so a fresh
/// controller is never mistaken for an already-advanced one.
///
/// [`Map::update`]: crate::Map::update
#[derive(Debug, Clone, Default)]
pub struct AnimationController {
    states: HashMap<TileDefId, AnimationState>,
    frame_stamp: u32,
    advanced_stamp: u32,
}

impl AnimationController {
    /// Creates an empty controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an animated tile definition. Empty frame lists are ignored.
    pub fn register(&mut self, id: TileDefId, frames: Vec<Frame>) {
        if frames.is_empty() {
            return;
        }
        let total_ms = frames.iter().map(|f| f.duration_ms).sum();
        self.states.entry(id).or_insert(AnimationState {
            frames,
            total_ms,
            elapsed_ms: 0.0,
            frame: 0,
        });
    }

    /// Whether a tile definition has a registered animation.
    pub fn is_animated(&self, id: TileDefId) -> bool {
        self.states.contains_key(&id)
    }

    /// Opens a new frame: subsequent [`advance_all`](Self::advance_all)
    /// calls advance states at most once until the next `begin_frame`.
    pub fn begin_frame(&mut self) {
        self.frame_stamp = self.frame_stamp.wrapping_add(1);
        if self.frame_stamp == 0 {
            self.frame_stamp = 1;
        }
    }

    /// Advances every state by `dt` seconds, once per opened frame.
    /// Non-positive `dt` marks the frame consumed without moving any state.
    pub fn advance_all(&mut self, dt: f32) {
        if self.advanced_stamp == self.frame_stamp {
            return;
        }
        self.advanced_stamp = self.frame_stamp;
        if dt <= 0.0 {
            return;
        }
        let dt_ms = dt * 1000.0;
        for state in self.states.values_mut() {
            state.advance(dt_ms);
        }
    }

    /// Convenience for hosts driving the controller directly: one
    /// `begin_frame` plus one `advance_all`.
    pub fn update(&mut self, dt: f32) {
        self.begin_frame();
        self.advance_all(dt);
    }

    /// The GID currently shown for an animated tile definition, or `None`
    /// when the definition has no animation.
    pub fn current_gid(&self, id: TileDefId) -> Option<u32> {
        let state = self.states.get(&id)?;
        Some(state.frames[state.frame].gid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_frame_controller() -> (AnimationController, TileDefId) {
        let id = TileDefId {
            tileset: 0,
            local_id: 4,
        };
        let mut ctrl = AnimationController::new();
        ctrl.register(
            id,
            vec![
                Frame {
                    gid: 10,
                    duration_ms: 100.0,
                },
                Frame {
                    gid: 11,
                    duration_ms: 150.0,
                },
            ],
        );
        (ctrl, id)
    }

    #[test]
    fn frames_advance_and_wrap_deterministically() {
        let (mut ctrl, id) = two_frame_controller();
        assert_eq!(ctrl.current_gid(id), Some(10));
        ctrl.update(0.100);
        assert_eq!(ctrl.current_gid(id), Some(11));
        ctrl.update(0.150);
        assert_eq!(ctrl.current_gid(id), Some(10));
    }

    #[test]
    fn large_dt_catches_up_across_multiple_frames() {
        let (mut ctrl, id) = two_frame_controller();
        // One full cycle (250ms) plus 100ms lands on frame 1.
        ctrl.update(0.350);
        assert_eq!(ctrl.current_gid(id), Some(11));
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let (mut ctrl, id) = two_frame_controller();
        ctrl.update(0.0);
        ctrl.update(-5.0);
        assert_eq!(ctrl.current_gid(id), Some(10));
    }

    #[test]
    fn advance_all_runs_once_per_frame_stamp() {
        let (mut ctrl, id) = two_frame_controller();
        ctrl.begin_frame();
        ctrl.advance_all(0.100);
        ctrl.advance_all(0.100);
        ctrl.advance_all(0.100);
        assert_eq!(ctrl.current_gid(id), Some(11));
    }

    #[test]
    fn frame_stamp_skips_zero_on_wrap() {
        let (mut ctrl, id) = two_frame_controller();
        ctrl.frame_stamp = u32::MAX - 1;
        ctrl.advanced_stamp = u32::MAX - 1;
        ctrl.update(0.100);
        assert_eq!(ctrl.frame_stamp, u32::MAX);
        ctrl.update(0.150);
        assert_eq!(ctrl.frame_stamp, 1);
        // Both updates actually advanced: back to the first frame.
        assert_eq!(ctrl.current_gid(id), Some(10));
    }

    #[test]
    fn zero_duration_animations_do_not_hang() {
        let id = TileDefId {
            tileset: 0,
            local_id: 0,
        };
        let mut ctrl = AnimationController::new();
        ctrl.register(
            id,
            vec![Frame {
                gid: 3,
                duration_ms: 0.0,
            }],
        );
        ctrl.update(1.0);
        assert_eq!(ctrl.current_gid(id), Some(3));
    }

    #[test]
    fn unregistered_definitions_report_no_gid() {
        let ctrl = AnimationController::new();
        assert_eq!(
            ctrl.current_gid(TileDefId {
                tileset: 0,
                local_id: 1
            }),
            None
        );
    }
}
