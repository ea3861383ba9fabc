//! Hit detection between the avatar hitbox and live projectiles.

use crate::field::{Projectile, ProjectileId};
use crate::geometry::Rect;

/// Result of a registered hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitReport {
    pub projectile: ProjectileId,
    /// Player hp after the hit, floored at zero.
    pub new_hp: u32,
}

/// Applies contact damage and owns the post-hit invulnerability window.
///
/// At most one hit registers per tick. While the window is open every
/// overlap is ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollisionResolver {
    invulnerable: u32,
    window: u32,
    damage: u32,
}

impl CollisionResolver {
    pub fn new(damage: u32, window: u32) -> Self {
        Self {
            invulnerable: 0,
            window,
            damage,
        }
    }

    pub fn reset(&mut self) {
        self.invulnerable = 0;
    }

    /// Counts the window down by one tick.
    pub fn tick_invulnerability(&mut self) {
        self.invulnerable = self.invulnerable.saturating_sub(1);
    }

    pub fn resolve(
        &mut self,
        hitbox: &Rect,
        projectiles: &[Projectile],
        current_hp: u32,
    ) -> Option<HitReport> {
        if self.invulnerable > 0 {
            return None;
        }
        let hit = projectiles
            .iter()
            .find(|projectile| hitbox.overlaps(&projectile.bounds()))?;

        self.invulnerable = self.window;
        Some(HitReport {
            projectile: hit.id,
            new_hp: current_hp.saturating_sub(self.damage),
        })
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0
    }

    pub fn invulnerable_ticks(&self) -> u32 {
        self.invulnerable
    }

    /// Whether the avatar is drawn dimmed this tick. Alternates every five
    /// ticks while the window is open.
    pub fn blink_dimmed(&self) -> bool {
        self.is_invulnerable() && (self.invulnerable / 5) % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;

    fn bullet(id: u32, x: f32, y: f32) -> Projectile {
        Projectile {
            id: ProjectileId(id),
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            size: Vec2::new(6.0, 6.0),
        }
    }

    fn hitbox() -> Rect {
        Rect::new(117.0, 117.0, 6.0, 6.0)
    }

    #[test]
    fn overlap_deals_damage_and_opens_window() {
        let mut resolver = CollisionResolver::new(3, 60);
        let report = resolver
            .resolve(&hitbox(), &[bullet(7, 115.0, 115.0)], 20)
            .unwrap();
        assert_eq!(report.projectile, ProjectileId(7));
        assert_eq!(report.new_hp, 17);
        assert_eq!(resolver.invulnerable_ticks(), 60);
    }

    #[test]
    fn touching_edges_count_as_contact() {
        let mut resolver = CollisionResolver::new(3, 60);
        assert!(resolver
            .resolve(&hitbox(), &[bullet(0, 123.0, 117.0)], 20)
            .is_some());
    }

    #[test]
    fn window_suppresses_hits_until_elapsed() {
        let mut resolver = CollisionResolver::new(3, 60);
        let field = [bullet(0, 118.0, 118.0)];
        assert!(resolver.resolve(&hitbox(), &field, 20).is_some());
        for _ in 0..59 {
            resolver.tick_invulnerability();
            assert!(resolver.resolve(&hitbox(), &field, 17).is_none());
        }
        resolver.tick_invulnerability();
        assert!(!resolver.is_invulnerable());
        assert_eq!(resolver.resolve(&hitbox(), &field, 17).unwrap().new_hp, 14);
    }

    #[test]
    fn one_hit_per_tick() {
        let mut resolver = CollisionResolver::new(3, 60);
        let field = [bullet(0, 118.0, 118.0), bullet(1, 119.0, 119.0)];
        let report = resolver.resolve(&hitbox(), &field, 20).unwrap();
        assert_eq!(report.new_hp, 17);
    }

    #[test]
    fn blink_alternates_while_invulnerable() {
        let mut resolver = CollisionResolver::new(3, 60);
        assert!(!resolver.blink_dimmed());
        resolver.resolve(&hitbox(), &[bullet(0, 118.0, 118.0)], 20);
        assert!(resolver.blink_dimmed());
        for _ in 0..5 {
            resolver.tick_invulnerability();
        }
        assert!(!resolver.blink_dimmed());
    }

    #[test]
    fn hp_floors_at_zero() {
        let mut resolver = CollisionResolver::new(3, 60);
        let report = resolver
            .resolve(&hitbox(), &[bullet(0, 118.0, 118.0)], 2)
            .unwrap();
        assert_eq!(report.new_hp, 0);
    }
}
