//! Avatar position controller for the dodge phase.

use crate::geometry::{Arena, Rect, Vec2};
use crate::input::{Key, KeySet};

/// The player's token inside the arena.
///
/// Each held direction contributes a constant per-axis velocity. Diagonals
/// are not normalized, so diagonal movement is faster than axial movement.
#[derive(Clone, Debug, PartialEq)]
pub struct Avatar {
    position: Vec2,
    size: f32,
    speed: f32,
    hitbox_inset: f32,
}

impl Avatar {
    pub fn new(size: f32, speed: f32, hitbox_inset: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            size,
            speed,
            hitbox_inset,
        }
    }

    /// Places the sprite in the middle of `arena`.
    pub fn center_in(&mut self, arena: &Arena) {
        let center = arena.center();
        self.position = Vec2::new(center.x - self.size / 2.0, center.y - self.size / 2.0);
        self.clamp_to(arena);
    }

    /// Applies one tick of held-direction movement, then clamps.
    pub fn step(&mut self, held: KeySet, arena: &Arena) {
        let mut velocity = Vec2::ZERO;
        if held.holds(Key::Up) {
            velocity.y -= self.speed;
        }
        if held.holds(Key::Down) {
            velocity.y += self.speed;
        }
        if held.holds(Key::Left) {
            velocity.x -= self.speed;
        }
        if held.holds(Key::Right) {
            velocity.x += self.speed;
        }
        self.position += velocity;
        self.clamp_to(arena);
    }

    fn clamp_to(&mut self, arena: &Arena) {
        let max_x = (arena.width - self.size).max(0.0);
        let max_y = (arena.height - self.size).max(0.0);
        self.position.x = self.position.x.clamp(0.0, max_x);
        self.position.y = self.position.y.clamp(0.0, max_y);
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Visual sprite bounds.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size, self.size)
    }

    /// Collision rectangle: the sprite shrunk by the inset on every side.
    pub fn hitbox(&self) -> Rect {
        self.bounds().shrink(self.hitbox_inset)
    }
}
