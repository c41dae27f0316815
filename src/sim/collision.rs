//! Collision detection and response against the spinning polygon
//!
//! The tricky part of the simulation: the walls move. Every response is
//! computed in the frame of the wall material at the contact point, so a
//! spinning boundary can push energy into the ball (or drain it) correctly.
//!
//! Two backends share one contract through [`CollisionBackend`]:
//! - [`SequentialResolver`] sweeps the edges in order and responds to each
//!   contact on its own. This is the default.
//! - [`AveragedResolver`] folds all simultaneous contacts of a sweep into one
//!   combined response.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use super::geometry::Edge;
use super::state::Ball;
use crate::consts::NORMAL_EPSILON;

/// Material and solver settings for contact resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactParams {
    /// Fraction of normal relative speed kept after a bounce, in [0, 1]
    pub restitution: f32,
    /// Tangential damping factor applied on contact, in [0, 1]
    pub friction: f32,
    /// Maximum full sweeps over the edges per resolve
    pub iteration_cap: u32,
    /// Penetration considered resolved
    pub penetration_epsilon: f32,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self {
            restitution: 0.9,
            friction: 0.1,
            iteration_cap: 5,
            penetration_epsilon: 1.0e-3,
        }
    }
}

/// Overlap between the ball and a single edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Closest point on the edge
    pub point: Vec2,
    /// Unit normal pointing from the wall toward the ball center
    pub normal: Vec2,
    /// Overlap depth (> 0)
    pub penetration: f32,
}

/// Outcome of one resolver pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolveReport {
    /// Full sweeps performed
    pub sweeps: u32,
    /// Velocity/position responses applied
    pub responses: u32,
    /// Worst edge penetration left after the pass
    pub residual_penetration: f32,
}

impl ResolveReport {
    #[inline]
    pub fn collided(&self) -> bool {
        self.responses > 0
    }
}

/// A strategy for pushing the ball back inside the boundary
pub trait CollisionBackend {
    fn resolve(
        &self,
        ball: &mut Ball,
        boundary: &Boundary,
        params: &ContactParams,
    ) -> ResolveReport;
}

#[inline]
fn unit_or_none(v: Vec2) -> Option<Vec2> {
    let len = v.length();
    (len > NORMAL_EPSILON && len.is_finite()).then(|| v / len)
}

/// Check the ball against one edge
///
/// `center` is the boundary center, used only when the ball center sits
/// exactly on the edge midpoint and no other direction is defined.
pub fn detect_contact(
    ball_pos: Vec2,
    ball_radius: f32,
    edge: &Edge,
    center: Vec2,
) -> Option<Contact> {
    let closest = edge.closest_point(ball_pos);
    let diff = ball_pos - closest;
    let dist = diff.length();

    if dist >= ball_radius {
        return None;
    }

    let normal = unit_or_none(diff)
        .or_else(|| unit_or_none(ball_pos - edge.midpoint()))
        .or_else(|| unit_or_none(center - edge.midpoint()))
        .unwrap_or(Vec2::NEG_Y);

    Some(Contact {
        point: closest,
        normal,
        penetration: ball_radius - dist,
    })
}

/// Bounce the ball off a (possibly moving) wall contact
///
/// Returns false and leaves the ball untouched when it is already separating
/// from the wall.
pub fn respond(
    ball: &mut Ball,
    contact: &Contact,
    boundary: &Boundary,
    params: &ContactParams,
) -> bool {
    let n = contact.normal;
    let wall_vel = boundary.point_velocity(contact.point);
    let rel = ball.vel - wall_vel;

    let approach = rel.dot(n);
    if approach >= 0.0 {
        return false;
    }

    let vn = n * approach;
    let vt = rel - vn;
    ball.vel = wall_vel - vn * params.restitution + vt * (1.0 - params.friction);
    ball.pos += n * contact.penetration;
    true
}

/// Deepest overlap of the ball with any of `edges`
pub fn penetration_into(ball: &Ball, edges: &[Edge]) -> f32 {
    edges
        .iter()
        .map(|e| ball.radius - (ball.pos - e.closest_point(ball.pos)).length())
        .fold(0.0_f32, f32::max)
}

fn finish(
    mut report: ResolveReport,
    ball: &Ball,
    edges: &[Edge],
    params: &ContactParams,
) -> ResolveReport {
    report.residual_penetration = penetration_into(ball, edges);
    if report.residual_penetration > params.penetration_epsilon {
        log::debug!(
            "residual penetration {:.4} after {} sweeps ({} responses)",
            report.residual_penetration,
            report.sweeps,
            report.responses
        );
    }
    report
}

/// Edge-by-edge resolution, repeated until a sweep finds nothing to do
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialResolver;

impl CollisionBackend for SequentialResolver {
    fn resolve(
        &self,
        ball: &mut Ball,
        boundary: &Boundary,
        params: &ContactParams,
    ) -> ResolveReport {
        let edges = boundary.edges();
        let mut report = ResolveReport::default();

        for _ in 0..params.iteration_cap.max(1) {
            report.sweeps += 1;
            let mut hits = 0;
            for edge in &edges {
                let hit = detect_contact(ball.pos, ball.radius, edge, boundary.center)
                    .is_some_and(|contact| respond(ball, &contact, boundary, params));
                if hit {
                    hits += 1;
                }
            }
            report.responses += hits;
            if hits == 0 {
                break;
            }
        }

        finish(report, ball, &edges, params)
    }
}

/// One combined response per sweep for all approaching contacts
///
/// The normal and contact point are penetration-weighted averages; the
/// correction depth is the deepest single overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct AveragedResolver;

impl AveragedResolver {
    fn combine(contacts: &[Contact]) -> Option<Contact> {
        let deepest = contacts
            .iter()
            .copied()
            .max_by(|a, b| a.penetration.total_cmp(&b.penetration))?;

        let total: f32 = contacts.iter().map(|c| c.penetration).sum();
        let weighted_normal: Vec2 = contacts.iter().map(|c| c.normal * c.penetration).sum();
        let normal = unit_or_none(weighted_normal).unwrap_or(deepest.normal);
        let point = if total > NORMAL_EPSILON {
            contacts.iter().map(|c| c.point * c.penetration).sum::<Vec2>() / total
        } else {
            deepest.point
        };

        Some(Contact {
            point,
            normal,
            penetration: deepest.penetration,
        })
    }
}

impl CollisionBackend for AveragedResolver {
    fn resolve(
        &self,
        ball: &mut Ball,
        boundary: &Boundary,
        params: &ContactParams,
    ) -> ResolveReport {
        let edges = boundary.edges();
        let mut report = ResolveReport::default();

        for _ in 0..params.iteration_cap.max(1) {
            report.sweeps += 1;
            let approaching: Vec<Contact> = edges
                .iter()
                .filter_map(|e| detect_contact(ball.pos, ball.radius, e, boundary.center))
                .filter(|c| (ball.vel - boundary.point_velocity(c.point)).dot(c.normal) < 0.0)
                .collect();

            let Some(combined) = Self::combine(&approaching) else {
                break;
            };
            if !respond(ball, &combined, boundary, params) {
                break;
            }
            report.responses += 1;
        }

        finish(report, ball, &edges, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elastic() -> ContactParams {
        ContactParams {
            restitution: 1.0,
            friction: 0.0,
            ..Default::default()
        }
    }

    /// Hexagon at the origin; edge 1 runs horizontally at y = inradius
    fn hexagon(angular_velocity: f32) -> Boundary {
        Boundary::new(Vec2::ZERO, 250.0, 6, angular_velocity)
    }

    fn top_edge_y() -> f32 {
        hexagon(0.0).inradius()
    }

    #[test]
    fn test_detect_contact_normal_points_inward() {
        let edge = Edge::new(Vec2::new(10.0, 0.0), Vec2::new(-10.0, 0.0));
        let contact =
            detect_contact(Vec2::new(2.0, -3.0), 5.0, &edge, Vec2::new(0.0, -20.0)).unwrap();
        assert!((contact.point - Vec2::new(2.0, 0.0)).length() < 1e-6);
        assert!((contact.normal - Vec2::NEG_Y).length() < 1e-6);
        assert!((contact.penetration - 2.0).abs() < 1e-6);

        assert!(detect_contact(Vec2::new(2.0, -5.0), 5.0, &edge, Vec2::ZERO).is_none());
    }

    #[test]
    fn test_detect_contact_vertex_normal_is_radial() {
        let edge = Edge::new(Vec2::ZERO, Vec2::new(10.0, 0.0));
        let contact =
            detect_contact(Vec2::new(-3.0, -4.0), 6.0, &edge, Vec2::new(5.0, -5.0)).unwrap();
        assert_eq!(contact.point, Vec2::ZERO);
        assert!((contact.normal - Vec2::new(-0.6, -0.8)).length() < 1e-6);
        assert!((contact.penetration - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_detect_contact_center_on_edge_uses_fallbacks() {
        let edge = Edge::new(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0));

        // On the edge line but off the midpoint: midpoint-to-ball direction
        let c = detect_contact(Vec2::new(4.0, 0.0), 2.0, &edge, Vec2::new(0.0, -50.0)).unwrap();
        assert!((c.normal - Vec2::X).length() < 1e-6);
        assert!((c.penetration - 2.0).abs() < 1e-6);

        // Exactly on the midpoint: toward the boundary center
        let c = detect_contact(Vec2::ZERO, 2.0, &edge, Vec2::new(0.0, -50.0)).unwrap();
        assert!((c.normal - Vec2::NEG_Y).length() < 1e-6);

        // Fully degenerate: fixed default axis, never NaN
        let point_edge = Edge::new(Vec2::ZERO, Vec2::ZERO);
        let c = detect_contact(Vec2::ZERO, 2.0, &point_edge, Vec2::ZERO).unwrap();
        assert_eq!(c.normal, Vec2::NEG_Y);
        assert!(c.normal.is_finite());
    }

    #[test]
    fn test_respond_stationary_wall_restitution_and_friction() {
        let boundary = hexagon(0.0);
        let params = ContactParams {
            restitution: 0.5,
            friction: 0.25,
            ..Default::default()
        };
        let contact = Contact {
            point: Vec2::new(0.0, 10.0),
            normal: Vec2::NEG_Y,
            penetration: 1.5,
        };
        let mut ball = Ball::new(Vec2::new(0.0, 10.0 - 13.5), Vec2::new(8.0, 20.0), 15.0);

        assert!(respond(&mut ball, &contact, &boundary, &params));
        assert!((ball.vel - Vec2::new(6.0, -10.0)).length() < 1e-5);
        assert!((ball.pos.y - (10.0 - 15.0)).abs() < 1e-5);
    }

    #[test]
    fn test_respond_ignores_separating_ball() {
        let boundary = hexagon(0.0);
        let contact = Contact {
            point: Vec2::ZERO,
            normal: Vec2::NEG_Y,
            penetration: 2.0,
        };
        let before = Ball::new(Vec2::new(0.0, -3.0), Vec2::new(1.0, -4.0), 5.0);
        let mut ball = before;

        assert!(!respond(&mut ball, &contact, &boundary, &ContactParams::default()));
        assert_eq!(ball, before);
    }

    #[test]
    fn test_stationary_elastic_bounce_keeps_speed() {
        let boundary = hexagon(0.0);
        let y = top_edge_y();
        let mut ball = Ball::new(Vec2::new(30.0, y - 14.0), Vec2::new(-120.0, 90.0), 15.0);
        let speed = ball.vel.length();

        let report = SequentialResolver.resolve(&mut ball, &boundary, &elastic());
        assert_eq!(report.responses, 1);
        assert!((ball.vel.length() - speed).abs() < 1e-3);
        assert!((ball.vel - Vec2::new(-120.0, -90.0)).length() < 1e-3);
    }

    fn spinning_wall_case(backend: &dyn CollisionBackend) {
        // ω = 1 rad/s; ball at rest touching the horizontal edge, left of its midpoint
        let boundary = hexagon(1.0);
        let y = top_edge_y();
        let mut ball = Ball::new(Vec2::new(-50.0, y - 14.0), Vec2::ZERO, 15.0);

        let contact_point = Vec2::new(-50.0, y);
        let wall_vel = boundary.point_velocity(contact_point);
        let normal = Vec2::NEG_Y;
        let wall_normal_speed = wall_vel.dot(normal);
        assert!(wall_normal_speed > 0.0, "wall must be moving into the ball");

        let report = backend.resolve(&mut ball, &boundary, &elastic());
        assert!(report.collided());

        // new = wall + reflect(rel), with rel = -wall
        let rel = -wall_vel;
        let reflected = rel - 2.0 * rel.dot(normal) * normal;
        assert!((ball.vel - (wall_vel + reflected)).length() < 1e-3);
        assert!((ball.vel - normal * 2.0 * wall_normal_speed).length() < 1e-3);
        assert!(report.residual_penetration < 1e-3);
    }

    #[test]
    fn test_spinning_wall_injects_energy_sequential() {
        spinning_wall_case(&SequentialResolver);
    }

    #[test]
    fn test_spinning_wall_injects_energy_averaged() {
        spinning_wall_case(&AveragedResolver);
    }

    /// Ball tucked into a 60° triangle corner, penetrating only the later edge
    fn corner_case(iteration_cap: u32) -> (Ball, ResolveReport, Boundary) {
        let boundary = Boundary::new(Vec2::ZERO, 100.0, 3, 0.0);
        let v1 = boundary.vertices()[1];
        let mut ball = Ball::new(v1 + Vec2::new(8.0, -16.5), Vec2::new(-50.0, 0.0), 10.0);
        let params = ContactParams {
            restitution: 0.9,
            friction: 0.0,
            iteration_cap,
            penetration_epsilon: 1.0e-3,
        };

        let edges = boundary.edges();
        assert!(detect_contact(ball.pos, ball.radius, &edges[0], boundary.center).is_none());
        assert!(detect_contact(ball.pos, ball.radius, &edges[1], boundary.center).is_some());

        let report = SequentialResolver.resolve(&mut ball, &boundary, &params);
        (ball, report, boundary)
    }

    #[test]
    fn test_single_pass_under_resolves_corner() {
        let (_, single, _) = corner_case(1);
        assert_eq!(single.sweeps, 1);
        assert_eq!(single.responses, 1);
        assert!(single.residual_penetration > 0.5);
    }

    #[test]
    fn test_iterations_improve_corner_resolution() {
        let (_, single, _) = corner_case(1);
        let (ball, many, boundary) = corner_case(5);

        assert!(many.sweeps > 1);
        assert!(many.responses > single.responses);
        assert!(many.residual_penetration < single.residual_penetration);
        let residual = penetration_into(&ball, &boundary.edges());
        assert!((residual - many.residual_penetration).abs() < 1e-6);
        assert!(ball.is_finite());
    }

    #[test]
    fn test_averaged_combines_corner_contacts() {
        // Axis-aligned square, ball pushed diagonally into the (10, 10) corner
        let boundary = Boundary::new(Vec2::ZERO, 10.0 * std::f32::consts::SQRT_2, 4, 0.0)
            .with_phase(std::f32::consts::FRAC_PI_4);
        let mut ball = Ball::new(Vec2::new(8.0, 8.0), Vec2::new(5.0, 5.0), 3.0);

        let report = AveragedResolver.resolve(&mut ball, &boundary, &elastic());
        assert_eq!(report.responses, 1);
        // Symmetric contacts give a diagonal normal and a straight reflection
        assert!((ball.vel - Vec2::new(-5.0, -5.0)).length() < 1e-3);
        assert!(ball.pos.x < 8.0 && (ball.pos.x - ball.pos.y).abs() < 1e-4);
    }

    #[test]
    fn test_no_contact_resolves_in_one_sweep() {
        let boundary = hexagon(0.7);
        let mut ball = Ball::new(Vec2::new(10.0, -5.0), Vec2::new(3.0, 4.0), 15.0);
        let before = ball;
        let backends: [&dyn CollisionBackend; 2] = [&SequentialResolver, &AveragedResolver];
        for backend in backends {
            let report = backend.resolve(&mut ball, &boundary, &ContactParams::default());
            assert_eq!(report.sweeps, 1);
            assert!(!report.collided());
            assert_eq!(report.residual_penetration, 0.0);
            assert_eq!(ball, before);
        }
    }
}
