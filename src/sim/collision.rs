//! Collision detection and response for circles
//!
//! Used by the headless world: dynamic circles against static circles and
//! against the inside of the edge loop.

use glam::Vec2;

use super::stage::Bounds;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at collision (pointing toward the moving circle, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a moving circle against a static circle
///
/// The normal points from the static circle toward the moving one. Coincident
/// centers push straight up.
pub fn circle_circle_collision(
    pos: Vec2,
    radius: f32,
    other_pos: Vec2,
    other_radius: f32,
) -> CollisionResult {
    let delta = pos - other_pos;
    let reach = radius + other_radius;
    let dist_sq = delta.length_squared();

    if dist_sq >= reach * reach {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 0.0001 { delta / dist } else { Vec2::Y };
    CollisionResult {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// Check a circle against the inside of an edge loop
///
/// Returns the deepest wall contact; the normal points back into the loop.
pub fn circle_edge_loop_collision(pos: Vec2, radius: f32, edges: &Bounds) -> CollisionResult {
    let walls = [
        (pos.x - radius - edges.min.x, Vec2::X),
        (edges.max.x - (pos.x + radius), -Vec2::X),
        (pos.y - radius - edges.min.y, Vec2::Y),
        (edges.max.y - (pos.y + radius), -Vec2::Y),
    ];

    walls
        .into_iter()
        .filter(|(gap, _)| *gap < 0.0)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(gap, normal)| CollisionResult {
            hit: true,
            normal,
            penetration: -gap,
        })
        .unwrap_or_else(CollisionResult::miss)
}

/// Bounce off a surface, scaling the normal component by `restitution`
///
/// Only approaching velocities are changed; a circle already separating keeps
/// its velocity.
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let approach = velocity.dot(normal);
    if approach >= 0.0 {
        return velocity;
    }
    velocity - (1.0 + restitution) * approach * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_circle_overlap() {
        let result = circle_circle_collision(Vec2::new(40.0, 0.0), 16.0, Vec2::ZERO, 32.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
        assert!((result.penetration - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_circle_touching_is_miss() {
        let result = circle_circle_collision(Vec2::new(48.0, 0.0), 16.0, Vec2::ZERO, 32.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_circle_coincident_centers() {
        let result = circle_circle_collision(Vec2::ZERO, 16.0, Vec2::ZERO, 32.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 48.0).abs() < 0.001);
    }

    #[test]
    fn test_edge_loop_left_wall() {
        let edges = Bounds::new(Vec2::new(-100.0, -100.0), Vec2::new(100.0, 100.0));

        let inside = circle_edge_loop_collision(Vec2::ZERO, 10.0, &edges);
        assert!(!inside.hit);

        let result = circle_edge_loop_collision(Vec2::new(-95.0, 0.0), 10.0, &edges);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
        assert!((result.penetration - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_edge_loop_corner_picks_deepest() {
        let edges = Bounds::new(Vec2::new(-100.0, -100.0), Vec2::new(100.0, 100.0));
        let result = circle_edge_loop_collision(Vec2::new(95.0, 98.0), 10.0, &edges);
        assert!(result.hit);
        assert_eq!(result.normal, -Vec2::Y);
        assert!((result.penetration - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_bounce_velocity_restitution() {
        // Falling onto a floor
        let bounced = bounce_velocity(Vec2::new(10.0, -100.0), Vec2::Y, 0.75);
        assert!((bounced.x - 10.0).abs() < 0.001);
        assert!((bounced.y - 75.0).abs() < 0.001);

        // Full restitution off a wall (normal pointing left) mirrors the velocity
        let mirrored = bounce_velocity(Vec2::new(100.0, 30.0), -Vec2::X, 1.0);
        assert!((mirrored.x - (-100.0)).abs() < 0.001);
        assert!((mirrored.y - 30.0).abs() < 0.001);

        // Separating velocity is left alone
        let leaving = Vec2::new(0.0, 50.0);
        assert_eq!(bounce_velocity(leaving, Vec2::Y, 0.75), leaving);
    }
}
