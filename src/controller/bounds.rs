use glam::Vec3;

/// Distance from the room center to each wall's center plane
pub const ROOM_HALF_EXTENT: f32 = 48.0;
/// Distance the camera keeps from the walls
pub const WALL_MARGIN: f32 = 2.0;
pub const FLOOR_HEIGHT: f32 = 2.0;
pub const CEILING_LIMIT: f32 = 23.0;

/// Axis-aligned room envelope. Clamping against it is the whole collision
/// model: walls, floor and ceiling are implicit planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for RoomBounds {
    fn default() -> Self {
        let wall = ROOM_HALF_EXTENT - WALL_MARGIN;
        Self {
            min: Vec3::new(-wall, FLOOR_HEIGHT, -wall),
            max: Vec3::new(wall, CEILING_LIMIT, wall),
        }
    }
}

impl RoomBounds {
    /// Per-axis min/max clamp; pure and idempotent
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        position.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inside(bounds: &RoomBounds, p: Vec3) -> bool {
        (bounds.min.x..=bounds.max.x).contains(&p.x)
            && (bounds.min.y..=bounds.max.y).contains(&p.y)
            && (bounds.min.z..=bounds.max.z).contains(&p.z)
    }

    #[test]
    fn clamp_always_lands_inside() {
        let bounds = RoomBounds::default();
        let probes = [
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(100.0, 10.0, 0.0),
            Vec3::new(-100.0, -50.0, 300.0),
            Vec3::new(46.0, 23.0, -46.0),
            Vec3::new(f32::MAX, f32::MAX, f32::MAX),
        ];
        for p in probes {
            assert!(inside(&bounds, bounds.clamp(p)), "clamp({p:?}) escaped the room");
        }
    }

    #[test]
    fn clamp_is_idempotent() {
        let bounds = RoomBounds::default();
        let probes = [
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(99.0, -4.0, 47.0),
            Vec3::new(-46.0, 2.0, 46.0),
        ];
        for p in probes {
            let once = bounds.clamp(p);
            assert_eq!(bounds.clamp(once), once);
        }
    }

    #[test]
    fn in_range_positions_pass_through() {
        let bounds = RoomBounds::default();
        let p = Vec3::new(12.5, 7.0, -30.0);
        assert_eq!(bounds.clamp(p), p);
    }

    #[test]
    fn forced_out_of_bounds_snaps_to_the_wall() {
        let bounds = RoomBounds::default();
        assert_eq!(
            bounds.clamp(Vec3::new(100.0, 10.0, 0.0)),
            Vec3::new(46.0, 10.0, 0.0)
        );
    }
}
