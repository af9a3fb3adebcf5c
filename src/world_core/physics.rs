use glam::Vec2;

/// Overlaps thinner than this are treated as touching, not intersecting.
const CONTACT_EPSILON: f32 = 1e-3;

/// How far above a surface the previous bottom edge may have been for a
/// downward overlap to count as a landing.
const LANDING_TOLERANCE: f32 = 0.5;

/// Screen-space box: +y points down, so a surface's top edge is `min.y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_top_left(top_left: Vec2, size: Vec2) -> Self {
        Self {
            min: top_left,
            max: top_left + size,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x - CONTACT_EPSILON && self.max.x > other.min.x + CONTACT_EPSILON
    }

    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        self.min.y < other.max.y - CONTACT_EPSILON && self.max.y > other.min.y + CONTACT_EPSILON
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }
}

/// A moving rectangle integrated with semi-implicit Euler.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub position: Vec2,
    pub previous_position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(top_left: Vec2, size: Vec2) -> Self {
        Self {
            position: top_left,
            previous_position: top_left,
            velocity: Vec2::ZERO,
            size,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.previous_position = self.position;
        self.velocity.y += gravity * dt;
        self.position += self.velocity * dt;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    pub landed: bool,
    pub blocked_horizontally: bool,
}

/// Pushes `body` out of every solid it intersects.
///
/// Landing comes first: while moving down, an exposed top edge that the body's
/// bottom crossed this step stops the fall, zeroes vertical velocity and snaps
/// the bottom edge onto it. Remaining intersections are separated along the
/// axis of least penetration. Faces buried against a neighbouring solid, such
/// as the seams inside a stacked wall, never push vertically.
pub fn resolve_collisions(body: &mut Body, solids: &[Aabb]) -> Contact {
    let mut contact = Contact::default();

    if body.velocity.y > 0.0 {
        let bounds = body.bounds();
        let previous_bottom = body.previous_position.y + body.size.y;
        let landing_top = solids
            .iter()
            .filter(|solid| bounds.overlaps_x(solid))
            .filter(|solid| previous_bottom <= solid.min.y + LANDING_TOLERANCE)
            .filter(|solid| bounds.max.y > solid.min.y)
            .filter(|solid| !top_covered(solid, solids))
            .map(|solid| solid.min.y)
            .fold(None, |best: Option<f32>, top| {
                Some(best.map_or(top, |b| b.min(top)))
            });

        if let Some(top) = landing_top {
            body.position.y = top - body.size.y;
            body.velocity.y = 0.0;
            contact.landed = true;
        }
    }

    for solid in solids {
        let bounds = body.bounds();
        if !bounds.overlaps(solid) {
            continue;
        }

        let overlap_x = (bounds.max.x - solid.min.x).min(solid.max.x - bounds.min.x);
        let overlap_y = (bounds.max.y - solid.min.y).min(solid.max.y - bounds.min.y);
        let from_above = bounds.center().y < solid.center().y;
        let face_open = if from_above {
            !top_covered(solid, solids)
        } else {
            !bottom_covered(solid, solids)
        };

        if overlap_y < overlap_x && face_open {
            if from_above {
                body.position.y = solid.min.y - body.size.y;
                if body.velocity.y > 0.0 {
                    body.velocity.y = 0.0;
                    contact.landed = true;
                }
            } else {
                body.position.y = solid.max.y;
                if body.velocity.y < 0.0 {
                    body.velocity.y = 0.0;
                }
            }
        } else {
            if bounds.center().x < solid.center().x {
                body.position.x = solid.min.x - body.size.x;
            } else {
                body.position.x = solid.max.x;
            }
            body.velocity.x = 0.0;
            contact.blocked_horizontally = true;
        }
    }

    contact
}

fn top_covered(solid: &Aabb, solids: &[Aabb]) -> bool {
    solids.iter().any(|other| {
        other != solid
            && other.overlaps_x(solid)
            && (other.max.y - solid.min.y).abs() <= CONTACT_EPSILON
    })
}

fn bottom_covered(solid: &Aabb, solids: &[Aabb]) -> bool {
    solids.iter().any(|other| {
        other != solid
            && other.overlaps_x(solid)
            && (other.min.y - solid.max.y).abs() <= CONTACT_EPSILON
    })
}

#[cfg(test)]
mod tests {
    use super::{resolve_collisions, Aabb, Body};
    use glam::Vec2;

    fn block(x: f32, y: f32) -> Aabb {
        Aabb::from_top_left(Vec2::new(x, y), Vec2::splat(30.0))
    }

    #[test]
    fn falling_body_snaps_onto_block_top() {
        let mut body = Body::new(Vec2::new(0.0, 340.0), Vec2::splat(50.0));
        body.velocity.y = 300.0;
        body.integrate(1.0 / 30.0, 600.0);
        assert!(body.bounds().max.y > 390.0);

        let solids = [block(0.0, 390.0), block(30.0, 390.0), block(0.0, 420.0)];
        let contact = resolve_collisions(&mut body, &solids);

        assert!(contact.landed);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.bounds().max.y, 390.0);
    }

    #[test]
    fn resting_body_stays_on_ground_after_gravity_step() {
        let mut body = Body::new(Vec2::new(10.0, 340.0), Vec2::splat(50.0));
        let solids = [block(0.0, 390.0), block(30.0, 390.0), block(60.0, 390.0)];
        for _ in 0..120 {
            body.integrate(1.0 / 60.0, 600.0);
            let contact = resolve_collisions(&mut body, &solids);
            assert!(contact.landed);
            assert_eq!(body.velocity.y, 0.0);
            assert_eq!(body.position.y, 340.0);
        }
    }

    #[test]
    fn rising_body_does_not_land() {
        let mut body = Body::new(Vec2::new(0.0, 345.0), Vec2::splat(50.0));
        body.velocity.y = -650.0;
        body.integrate(1.0 / 60.0, 600.0);
        let contact = resolve_collisions(&mut body, &[block(0.0, 390.0)]);
        assert!(!contact.landed);
        assert!(body.velocity.y < 0.0);
    }

    #[test]
    fn running_into_a_step_blocks_horizontal_motion() {
        let mut body = Body::new(Vec2::new(10.0, 340.0), Vec2::splat(50.0));
        body.velocity.x = 400.0;
        body.integrate(1.0 / 60.0, 600.0);
        // Floor under the body plus a wall one block higher to the right.
        let solids = [
            block(0.0, 390.0),
            block(30.0, 390.0),
            block(60.0, 360.0),
            block(60.0, 390.0),
        ];
        let contact = resolve_collisions(&mut body, &solids);
        assert!(contact.blocked_horizontally);
        assert!(contact.landed);
        assert_eq!(body.velocity.x, 0.0);
        assert!(body.bounds().max.x <= 60.0 + 1e-3);
    }

    #[test]
    fn falling_against_a_tall_wall_only_lands_on_the_floor() {
        // Ten-block wall at x 60..90 from y 300 down to the floor at 600.
        let mut solids: Vec<Aabb> = (0..10)
            .map(|i| block(60.0, 300.0 + i as f32 * 30.0))
            .collect();
        solids.extend([block(0.0, 600.0), block(30.0, 600.0), block(60.0, 600.0)]);

        let mut body = Body::new(Vec2::new(10.0, 330.0), Vec2::splat(50.0));
        for _ in 0..240 {
            body.velocity.x = 400.0;
            body.integrate(1.0 / 60.0, 600.0);
            let contact = resolve_collisions(&mut body, &solids);
            if body.bounds().max.y < 600.0 - 1e-3 {
                assert!(!contact.landed, "landed mid-air at {}", body.bounds().max.y);
                assert!(body.velocity.y > 0.0);
            }
            assert!(body.bounds().max.x <= 60.0 + 1e-3);
        }
        assert_eq!(body.bounds().max.y, 600.0);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = block(0.0, 0.0);
        let b = block(30.0, 0.0);
        let c = block(0.0, 30.0);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&block(29.0, 29.0)));
    }
}
