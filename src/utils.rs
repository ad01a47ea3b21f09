use bytemuck::NoUninit;
use glam::Vec3;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Append a quad centered at `center`, spanned by half-extent vectors
    /// `half_right` and `half_up`. The normal is derived from the winding.
    pub fn push_quad(&mut self, center: Vec3, half_right: Vec3, half_up: Vec3, color: [f32; 4]) {
        let normal = half_right.cross(half_up).normalize_or_zero();
        let n = [normal.x, normal.y, normal.z];
        let base = self.vertices.len() as u32;

        let corners = [
            (center - half_right - half_up, [0.0, 1.0]),
            (center + half_right - half_up, [1.0, 1.0]),
            (center + half_right + half_up, [1.0, 0.0]),
            (center - half_right + half_up, [0.0, 0.0]),
        ];
        for (pos, uv) in corners {
            self.vertices.push(Vertex {
                pos: [pos.x, pos.y, pos.z],
                normal: n,
                color,
                uv,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Append all six faces of an axis-aligned box
    pub fn push_box(&mut self, center: Vec3, size: Vec3, color: [f32; 4]) {
        let h = size * 0.5;
        // +x / -x
        self.push_quad(center + Vec3::X * h.x, Vec3::new(0.0, 0.0, -h.z), Vec3::Y * h.y, color);
        self.push_quad(center - Vec3::X * h.x, Vec3::new(0.0, 0.0, h.z), Vec3::Y * h.y, color);
        // +y / -y
        self.push_quad(center + Vec3::Y * h.y, Vec3::X * h.x, Vec3::new(0.0, 0.0, -h.z), color);
        self.push_quad(center - Vec3::Y * h.y, Vec3::X * h.x, Vec3::new(0.0, 0.0, h.z), color);
        // +z / -z
        self.push_quad(center + Vec3::Z * h.z, Vec3::X * h.x, Vec3::Y * h.y, color);
        self.push_quad(center - Vec3::Z * h.z, Vec3::new(-h.x, 0.0, 0.0), Vec3::Y * h.y, color);
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertices = bytemuck::cast_slice(&self.vertices);
        let indices = bytemuck::cast_slice(&self.indices);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: vertices,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: indices,
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_winding_produces_expected_normal() {
        let mut mesh = Mesh::empty();
        mesh.push_quad(Vec3::ZERO, Vec3::X, Vec3::Y, [1.0; 4]);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        // right x up = +z
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn box_has_six_faces() {
        let mut mesh = Mesh::empty();
        mesh.push_box(Vec3::ZERO, Vec3::splat(2.0), [1.0; 4]);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
    }
}
