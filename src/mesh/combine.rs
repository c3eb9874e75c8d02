//! 多网格合并
//!
//! 把若干 (网格, 子网格, 变换) 合并成一个网格。每个实例输出一个独立分段，
//! 不做顶点焊接，只合并绘制提交。

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Mat3, Mat4, Vec3};

use crate::core::{MeshError, MeshResult};

use super::geometry::{Mesh, SubMesh};
use super::vertex::SkinnedVertex;

/// 合并实例：一个子网格 + 它在合并空间中的变换
#[derive(Clone, Debug)]
pub struct CombineInstance {
    pub mesh: Arc<Mesh>,
    pub submesh_index: usize,
    /// 子网格局部空间 -> 合并网格局部空间
    pub transform: Mat4,
}

/// 合并选项
#[derive(Clone, Copy, Debug, Default)]
pub struct CombineOptions {
    pub recalculate_normals: bool,
    pub recalculate_tangents: bool,
}

/// 单个实例的顶点变换
struct VertexTransform {
    point: Mat4,
    linear: Mat3,
    normal: Mat3,
    handedness: f32,
}

impl VertexTransform {
    fn new(matrix: Mat4) -> Self {
        let linear = Mat3::from_mat4(matrix);
        let det = linear.determinant();
        let normal = if det.abs() > f32::EPSILON {
            linear.inverse().transpose()
        } else {
            linear
        };
        Self {
            point: matrix,
            linear,
            normal,
            handedness: if det < 0.0 { -1.0 } else { 1.0 },
        }
    }

    fn apply(&self, v: &SkinnedVertex) -> SkinnedVertex {
        let position = self.point.transform_point3(Vec3::from(v.position));
        let normal = (self.normal * Vec3::from(v.normal)).normalize_or_zero();
        let tangent = (self.linear * Vec3::new(v.tangent[0], v.tangent[1], v.tangent[2]))
            .normalize_or_zero();
        SkinnedVertex {
            position: position.into(),
            normal: normal.into(),
            tangent: [tangent.x, tangent.y, tangent.z, v.tangent[3] * self.handedness],
            ..*v
        }
    }
}

/// 下一个输出顶点的索引，超出 u32 范围时报错
fn next_vertex_index(mesh: &str, count: usize) -> MeshResult<u32> {
    u32::try_from(count).map_err(|_| MeshError::TooManyVertices {
        mesh: mesh.to_string(),
        count: count + 1,
    })
}

impl Mesh {
    /// 合并多个子网格
    ///
    /// 所有实例先校验再合并，任何一个实例无效都不会产出半成品网格。
    /// 输出网格没有绑定姿态，由调用方从共享骨架赋值。
    pub fn combine(
        name: impl Into<String>,
        instances: &[CombineInstance],
        options: CombineOptions,
    ) -> MeshResult<Mesh> {
        let name = name.into();
        for instance in instances {
            instance.mesh.validate_submesh(instance.submesh_index)?;
        }

        let mut vertices = Vec::new();
        let mut submeshes = Vec::with_capacity(instances.len());

        for instance in instances {
            let source = &instance.mesh;
            let xform = VertexTransform::new(instance.transform);
            let mut remap: HashMap<u32, u32> = HashMap::new();
            let mut indices = Vec::with_capacity(source.submeshes[instance.submesh_index].indices.len());

            for &index in &source.submeshes[instance.submesh_index].indices {
                let mapped = match remap.get(&index) {
                    Some(&mapped) => mapped,
                    None => {
                        let mapped = next_vertex_index(&name, vertices.len())?;
                        vertices.push(xform.apply(&source.vertices[index as usize]));
                        remap.insert(index, mapped);
                        mapped
                    }
                };
                indices.push(mapped);
            }
            submeshes.push(SubMesh::new(indices));
        }

        let mut combined = Mesh::new(name, vertices, submeshes);
        if options.recalculate_normals {
            combined.recalculate_normals();
        }
        if options.recalculate_tangents {
            combined.recalculate_tangents();
        }
        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives::cuboid;
    use glam::Quat;

    #[test]
    fn test_one_section_per_instance() {
        let mesh = Arc::new(cuboid("box", Vec3::ZERO, Vec3::ONE, 2, 0));
        let instances = vec![
            CombineInstance {
                mesh: mesh.clone(),
                submesh_index: 0,
                transform: Mat4::IDENTITY,
            },
            CombineInstance {
                mesh: mesh.clone(),
                submesh_index: 1,
                transform: Mat4::IDENTITY,
            },
            CombineInstance {
                mesh,
                submesh_index: 0,
                transform: Mat4::from_translation(Vec3::X * 5.0),
            },
        ];

        let combined = Mesh::combine("combined", &instances, CombineOptions::default()).unwrap();

        assert_eq!(combined.submesh_count(), 3);
        // 每个分段 3 个面 * 4 顶点，不焊接
        assert_eq!(combined.vertex_count(), 36);
        assert!(combined.bind_poses.is_empty());
        assert!(combined.validate().is_ok());
    }

    #[test]
    fn test_positions_and_bounds_follow_transform() {
        let mesh = Arc::new(cuboid("box", Vec3::ZERO, Vec3::splat(2.0), 1, 0));
        let instances = vec![
            CombineInstance {
                mesh: mesh.clone(),
                submesh_index: 0,
                transform: Mat4::IDENTITY,
            },
            CombineInstance {
                mesh,
                submesh_index: 0,
                transform: Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)),
            },
        ];

        let combined = Mesh::combine("combined", &instances, CombineOptions::default()).unwrap();

        assert_eq!(combined.bounds.min(), Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(combined.bounds.max(), Vec3::new(11.0, 1.0, 1.0));
        assert_eq!(combined.bounds.center, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_normals_rotate_with_instance() {
        let mesh = Arc::new(cuboid("box", Vec3::ZERO, Vec3::ONE, 1, 0));
        let rotation = Mat4::from_quat(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let instances = vec![CombineInstance {
            mesh: mesh.clone(),
            submesh_index: 0,
            transform: rotation,
        }];

        let combined = Mesh::combine("combined", &instances, CombineOptions::default()).unwrap();

        for (src, dst) in mesh.vertices.iter().zip(&combined.vertices) {
            let expected = rotation.transform_vector3(Vec3::from(src.normal));
            assert!((Vec3::from(dst.normal) - expected).length() < 1e-5);
            assert_eq!(dst.bone_indices, src.bone_indices);
        }
    }

    #[test]
    fn test_invalid_instance_aborts() {
        let mesh = Arc::new(cuboid("box", Vec3::ZERO, Vec3::ONE, 1, 0));
        let instances = vec![CombineInstance {
            mesh,
            submesh_index: 3,
            transform: Mat4::IDENTITY,
        }];

        let result = Mesh::combine("combined", &instances, CombineOptions::default());
        assert!(matches!(
            result,
            Err(MeshError::MissingSubMesh { index: 3, .. })
        ));
    }

    #[test]
    fn test_mirrored_instance_flips_tangent_handedness() {
        let mesh = Arc::new(cuboid("box", Vec3::ZERO, Vec3::ONE, 1, 0));
        let instances = vec![CombineInstance {
            mesh: mesh.clone(),
            submesh_index: 0,
            transform: Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0)),
        }];

        let combined = Mesh::combine("mirrored", &instances, CombineOptions::default()).unwrap();

        assert_eq!(combined.vertex_count(), mesh.vertex_count());
        for (src, dst) in mesh.vertices.iter().zip(&combined.vertices) {
            assert_ne!(src.tangent[3], 0.0);
            assert_eq!(dst.tangent[3], -src.tangent[3]);
            assert_eq!(dst.position[0], -src.position[0]);
        }
    }

    #[test]
    fn test_vertex_index_range() {
        assert_eq!(next_vertex_index("m", 0).unwrap(), 0);
        assert_eq!(next_vertex_index("m", u32::MAX as usize).unwrap(), u32::MAX);
        assert_eq!(
            next_vertex_index("m", u32::MAX as usize + 1),
            Err(MeshError::TooManyVertices {
                mesh: "m".to_string(),
                count: u32::MAX as usize + 2,
            })
        );
    }
}
