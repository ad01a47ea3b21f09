use glam::Vec3;

use crate::utils::Mesh;

/// Wall span along each horizontal axis
pub const ROOM_SIZE: f32 = 100.0;
pub const WALL_HEIGHT: f32 = 25.0;
pub const WALL_THICKNESS: f32 = 2.0;
pub const CEILING_HEIGHT: f32 = 25.0;

const WALL_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 0.95];
const WALL_ACCENT: [f32; 4] = [1.0, 0.0, 0.0, 0.95];
const CEILING_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
const SIGN_COLOR: [f32; 4] = [0.1, 0.1, 0.12, 0.9];

/// Placeholder canvases stand in for the real artwork textures
const ARTWORK_COLORS: [[f32; 4]; 8] = [
    [0.76, 0.60, 0.42, 1.0],
    [0.35, 0.43, 0.55, 1.0],
    [0.33, 0.55, 0.52, 1.0],
    [0.52, 0.62, 0.44, 1.0],
    [0.56, 0.44, 0.56, 1.0],
    [0.25, 0.28, 0.38, 1.0],
    [0.80, 0.66, 0.36, 1.0],
    [0.62, 0.68, 0.74, 1.0],
];

/// Axis-aligned wall segment
pub struct Wall {
    pub center: Vec3,
    pub size: Vec3,
    pub color: [f32; 4],
}

/// A piece hung on one of the four walls, with its exhibit metadata
pub struct Artwork {
    pub title: &'static str,
    pub artist: &'static str,
    pub year: &'static str,
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
}

impl Artwork {
    /// Normal pointing from the wall into the room
    pub fn inward_normal(&self) -> Vec3 {
        if self.position.z < -30.0 {
            Vec3::Z
        } else if self.position.z > 30.0 {
            Vec3::NEG_Z
        } else if self.position.x < 0.0 {
            Vec3::X
        } else {
            Vec3::NEG_X
        }
    }

    /// World-space point the floating label tracks: just above the top edge
    pub fn label_anchor(&self) -> Vec3 {
        self.position + Vec3::Y * (self.height * 0.5 + 1.0)
    }

    pub fn label_text(&self) -> String {
        format!("{}\n{}, {}", self.title, self.artist, self.year)
    }
}

/// Fixed world-space point paired with a screen-space label slot.
/// The slot index doubles as the handle into the overlay's placements.
#[derive(Debug, Clone, Copy)]
pub struct LabelAnchor {
    pub position: Vec3,
}

pub struct WelcomeSign {
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
}

/// The static exhibition: declarative geometry only, built once at startup
pub struct Gallery {
    pub walls: Vec<Wall>,
    pub artworks: Vec<Artwork>,
    pub welcome_sign: WelcomeSign,
    pub ceiling_height: f32,
}

impl Gallery {
    pub fn new() -> Self {
        let half = ROOM_SIZE / 2.0;
        let wall_y = WALL_HEIGHT / 2.0;

        let walls = vec![
            Wall {
                center: Vec3::new(0.0, wall_y, -half),
                size: Vec3::new(ROOM_SIZE, WALL_HEIGHT, WALL_THICKNESS),
                color: WALL_ACCENT,
            },
            Wall {
                center: Vec3::new(0.0, wall_y, half),
                size: Vec3::new(ROOM_SIZE, WALL_HEIGHT, WALL_THICKNESS),
                color: WALL_WHITE,
            },
            Wall {
                center: Vec3::new(-half, wall_y, 0.0),
                size: Vec3::new(WALL_THICKNESS, WALL_HEIGHT, ROOM_SIZE),
                color: WALL_WHITE,
            },
            Wall {
                center: Vec3::new(half, wall_y, 0.0),
                size: Vec3::new(WALL_THICKNESS, WALL_HEIGHT, ROOM_SIZE),
                color: WALL_WHITE,
            },
        ];

        let artworks = vec![
            Artwork {
                title: "Abstract Harmony",
                artist: "Emma Johnson",
                year: "2022",
                position: Vec3::new(-30.0, 15.0, -48.0),
                width: 12.0,
                height: 16.0,
            },
            Artwork {
                title: "Urban Dreams",
                artist: "Carlos Mendez",
                year: "2021",
                position: Vec3::new(30.0, 15.0, -48.0),
                width: 12.0,
                height: 16.0,
            },
            Artwork {
                title: "Ocean Memories",
                artist: "Sophie Chen",
                year: "2020",
                position: Vec3::new(-48.0, 15.0, -10.0),
                width: 16.0,
                height: 12.0,
            },
            Artwork {
                title: "Mountain Stream",
                artist: "Alex Rivera",
                year: "2023",
                position: Vec3::new(-48.0, 15.0, 10.0),
                width: 16.0,
                height: 12.0,
            },
            Artwork {
                title: "Mountain Echo",
                artist: "James Wilson",
                year: "2019",
                position: Vec3::new(48.0, 15.0, -10.0),
                width: 16.0,
                height: 12.0,
            },
            Artwork {
                title: "Urban Night",
                artist: "Maria Garcia",
                year: "2022",
                position: Vec3::new(48.0, 15.0, 10.0),
                width: 16.0,
                height: 12.0,
            },
            Artwork {
                title: "Golden Sunset",
                artist: "Aisha Patel",
                year: "2023",
                position: Vec3::new(-30.0, 15.0, 48.0),
                width: 14.0,
                height: 18.0,
            },
            Artwork {
                title: "Winter Solitude",
                artist: "David Kim",
                year: "2018",
                position: Vec3::new(30.0, 15.0, 48.0),
                width: 14.0,
                height: 18.0,
            },
        ];

        let welcome_sign = WelcomeSign {
            position: Vec3::new(0.0, 20.0, -45.0),
            width: 30.0,
            height: 7.5,
        };

        Self {
            walls,
            artworks,
            welcome_sign,
            ceiling_height: CEILING_HEIGHT,
        }
    }

    /// One anchor per artwork, in artwork order. The overlay keeps its
    /// placement slots in the same order, which is what ties the two together.
    pub fn label_anchors(&self) -> Vec<LabelAnchor> {
        self.artworks
            .iter()
            .map(|a| LabelAnchor {
                position: a.label_anchor(),
            })
            .collect()
    }

    /// Flatten the declarative scene into one static mesh
    pub fn build_mesh(&self) -> Mesh {
        let mut mesh = Mesh::empty();

        for wall in &self.walls {
            mesh.push_box(wall.center, wall.size, wall.color);
        }

        // Ceiling plane, facing down into the room
        mesh.push_quad(
            Vec3::new(0.0, self.ceiling_height, 0.0),
            Vec3::X * ROOM_SIZE,
            Vec3::Z * ROOM_SIZE,
            CEILING_COLOR,
        );

        for (i, art) in self.artworks.iter().enumerate() {
            let normal = art.inward_normal();
            let up = Vec3::Y * (art.height / 2.0);
            // winding: right x up must equal the inward normal
            let half_right = up.cross(normal).normalize() * (art.width / 2.0);
            mesh.push_quad(
                art.position + normal * 0.6,
                half_right,
                up,
                ARTWORK_COLORS[i % ARTWORK_COLORS.len()],
            );
        }

        let sign = &self.welcome_sign;
        mesh.push_quad(
            sign.position,
            Vec3::X * (sign.width / 2.0),
            Vec3::Y * (sign.height / 2.0),
            SIGN_COLOR,
        );

        mesh
    }
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gallery_has_eight_artworks_and_four_walls() {
        let gallery = Gallery::new();
        assert_eq!(gallery.artworks.len(), 8);
        assert_eq!(gallery.walls.len(), 4);
    }

    #[test]
    fn anchors_sit_above_their_artworks() {
        let gallery = Gallery::new();
        for (anchor, art) in gallery.label_anchors().iter().zip(&gallery.artworks) {
            assert!(anchor.position.y > art.position.y);
            assert_eq!(anchor.position.x, art.position.x);
            assert_eq!(anchor.position.z, art.position.z);
        }
    }

    #[test]
    fn artworks_stay_inside_the_wall_envelope() {
        let gallery = Gallery::new();
        let half = ROOM_SIZE / 2.0;
        for art in &gallery.artworks {
            assert!(art.position.x.abs() <= half);
            assert!(art.position.z.abs() <= half);
        }
    }

    #[test]
    fn inward_normals_point_toward_the_center() {
        let gallery = Gallery::new();
        for art in &gallery.artworks {
            // moving along the normal must reduce distance to the room center
            let moved = art.position + art.inward_normal();
            assert!(
                moved.length() < art.position.length(),
                "{} normal points outward",
                art.title
            );
        }
    }

    #[test]
    fn mesh_is_built_from_all_pieces() {
        let gallery = Gallery::new();
        let mesh = gallery.build_mesh();
        assert!(!mesh.is_empty());
        // 4 walls x 6 quads + ceiling + 8 artworks + sign
        assert_eq!(mesh.vertices.len() / 4, 4 * 6 + 1 + 8 + 1);
    }
}
