//! 基础几何体生成
//!
//! 演示服装和测试用的简单网格。

use glam::Vec3;

use super::geometry::{Mesh, SubMesh};
use super::vertex::SkinnedVertex;

/// 每个面的 (法线, U 方向, V 方向)，满足 U × V = 法线
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

/// 生成长方体，六个面轮流分配到 `sections` 个子网格（1..=6），全部顶点绑定到 `bone`
pub fn cuboid(name: impl Into<String>, center: Vec3, size: Vec3, sections: usize, bone: u32) -> Mesh {
    let sections = sections.clamp(1, 6);
    let half = size * 0.5;
    let mut vertices = Vec::with_capacity(24);
    let mut submeshes = vec![SubMesh::default(); sections];

    for (face, (n, u, v)) in FACES.iter().enumerate() {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = center + *n * half + *u * half * su + *v * half * sv;
            let uv = [(su + 1.0) * 0.5, (sv + 1.0) * 0.5];
            let mut vertex = SkinnedVertex::rigid(position.into(), (*n).into(), uv, bone);
            vertex.tangent = [u.x, u.y, u.z, 1.0];
            vertices.push(vertex);
        }
        submeshes[face % sections]
            .indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh::new(name, vertices, submeshes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_layout() {
        let mesh = cuboid("box", Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0), 3, 5);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.submesh_count(), 3);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.bounds.size, Vec3::new(2.0, 4.0, 6.0));
        assert!(mesh.vertices.iter().all(|v| v.bone_indices[0] == 5));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_cuboid_normals_match_winding() {
        let mut mesh = cuboid("box", Vec3::ZERO, Vec3::ONE, 1, 0);
        let authored: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.normal).collect();
        mesh.recalculate_normals();
        for (a, b) in authored.iter().zip(&mesh.vertices) {
            assert!((Vec3::from(*a) - Vec3::from(b.normal)).length() < 1e-5);
        }
    }

    #[test]
    fn test_section_count_is_clamped() {
        assert_eq!(cuboid("a", Vec3::ZERO, Vec3::ONE, 0, 0).submesh_count(), 1);
        assert_eq!(cuboid("b", Vec3::ZERO, Vec3::ONE, 9, 0).submesh_count(), 6);
    }
}
