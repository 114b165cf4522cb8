use bytemuck::{Pod, Zeroable};

/// Vertex format for the lit world meshes.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Vertex format for the textured HUD quad.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct HudVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// Vertex format for the debug-ray line.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// CPU-side mesh: positions/normals plus a triangle-list index buffer.
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    /// Largest index referenced, used to validate index/vertex consistency.
    pub fn max_index(&self) -> u16 {
        self.indices.iter().copied().max().unwrap_or(0)
    }
}

/// Unit plane in the XZ axes (spans -1..1), facing +Y.
pub fn plane_mesh() -> MeshData {
    let n = [0.0, 1.0, 0.0];
    let vertices = vec![
        Vertex { position: [1.0, 0.0, -1.0], normal: n },
        Vertex { position: [1.0, 0.0, 1.0], normal: n },
        Vertex { position: [-1.0, 0.0, -1.0], normal: n },
        Vertex { position: [-1.0, 0.0, 1.0], normal: n },
    ];
    let indices = vec![0, 1, 2, 2, 1, 3];
    MeshData { vertices, indices }
}

/// Cube spanning -1..1 on every axis, one normal per face.
pub fn cube_mesh() -> MeshData {
    let p = 1.0_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex { position: [-p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [-p,  p,  p], normal: [0.0, 0.0, 1.0] },
        // -Z face
        Vertex { position: [ p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 0.0, -1.0] },
        // +X face
        Vertex { position: [ p, -p,  p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [1.0, 0.0, 0.0] },
        // -X face
        Vertex { position: [-p, -p, -p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        Vertex { position: [-p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 1.0, 0.0] },
        // -Y face
        Vertex { position: [-p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    MeshData { vertices, indices }
}

/// Unit UV sphere. `sectors` around the equator, `stacks` pole to pole.
/// Normals equal positions on a unit sphere.
pub fn sphere_mesh(sectors: u16, stacks: u16) -> MeshData {
    let mut vertices = Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize);
    for stack in 0..=stacks {
        let phi = std::f32::consts::PI * stack as f32 / stacks as f32;
        for sector in 0..=sectors {
            let theta = std::f32::consts::TAU * sector as f32 / sectors as f32;
            let position = [
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            ];
            vertices.push(Vertex {
                position,
                normal: position,
            });
        }
    }

    let stride = sectors + 1;
    let mut indices = Vec::with_capacity((stacks * sectors * 6) as usize);
    for stack in 0..stacks {
        for sector in 0..sectors {
            let p0 = stack * stride + sector;
            let p1 = p0 + 1;
            let p2 = p0 + stride;
            let p3 = p2 + 1;
            indices.extend_from_slice(&[p0, p1, p2, p2, p1, p3]);
        }
    }

    MeshData { vertices, indices }
}

/// HUD quad spanning -1..1 in X/Y with top-left texture origin, matching the
/// y-down orthographic HUD projection.
pub fn hud_quad() -> (Vec<HudVertex>, Vec<u16>) {
    let vertices = vec![
        HudVertex { position: [-1.0, 1.0, 0.0], tex_coords: [0.0, 0.0] },
        HudVertex { position: [1.0, 1.0, 0.0], tex_coords: [1.0, 0.0] },
        HudVertex { position: [-1.0, -1.0, 0.0], tex_coords: [0.0, 1.0] },
        HudVertex { position: [1.0, -1.0, 0.0], tex_coords: [1.0, 1.0] },
    ];
    let indices = vec![0, 1, 2, 2, 1, 3];
    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_bounds(mesh: &MeshData) {
        assert!(!mesh.indices.is_empty());
        assert!(
            (mesh.max_index() as usize) < mesh.vertices.len(),
            "index {} out of bounds for {} vertices",
            mesh.max_index(),
            mesh.vertices.len()
        );
    }

    #[test]
    fn plane_indices_in_bounds() {
        assert_indices_in_bounds(&plane_mesh());
    }

    #[test]
    fn cube_indices_in_bounds() {
        let cube = cube_mesh();
        assert_indices_in_bounds(&cube);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
    }

    #[test]
    fn sphere_indices_in_bounds() {
        let sphere = sphere_mesh(32, 16);
        assert_indices_in_bounds(&sphere);
        assert_eq!(sphere.vertices.len(), 33 * 17);
        assert_eq!(sphere.indices.len(), 32 * 16 * 6);
    }

    #[test]
    fn sphere_vertices_sit_on_unit_radius() {
        let sphere = sphere_mesh(16, 8);
        for v in &sphere.vertices {
            let r = (v.position[0].powi(2) + v.position[1].powi(2) + v.position[2].powi(2)).sqrt();
            assert!((r - 1.0).abs() < 1.0e-4);
        }
    }

    #[test]
    fn cube_normals_are_axis_aligned_unit() {
        for v in &cube_mesh().vertices {
            let sum: f32 = v.normal.iter().map(|c| c.abs()).sum();
            assert_eq!(sum, 1.0);
        }
    }

    #[test]
    fn hud_quad_uvs_cover_unit_square() {
        let (vertices, indices) = hud_quad();
        assert_eq!(indices.len(), 6);
        for v in &vertices {
            assert!((0.0..=1.0).contains(&v.tex_coords[0]));
            assert!((0.0..=1.0).contains(&v.tex_coords[1]));
        }
    }
}
