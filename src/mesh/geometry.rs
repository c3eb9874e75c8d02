//! 网格几何数据
//!
//! 一个网格由共享的顶点数组和若干子网格（分段）组成，每个子网格对应一个材质槽。

use glam::{Mat4, Vec2, Vec3};

use crate::core::{MeshError, MeshResult};

use super::vertex::SkinnedVertex;

/// 轴对齐包围盒
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    /// 中心（最小值与最大值的中点）
    pub center: Vec3,
    /// 尺寸（最大值 - 最小值）
    pub size: Vec3,
}

impl Aabb {
    /// 由逐分量最小/最大值计算包围盒，空集合返回 None
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self {
            center: (min + max) * 0.5,
            size: max - min,
        })
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.size * 0.5
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.size * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.cmpge(min - Vec3::splat(1e-4)).all() && point.cmple(max + Vec3::splat(1e-4)).all()
    }
}

/// 子网格：指向所属网格顶点数组的三角形索引
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubMesh {
    pub indices: Vec<u32>,
}

impl SubMesh {
    pub fn new(indices: Vec<u32>) -> Self {
        Self { indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// 蒙皮网格
#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<SkinnedVertex>,
    pub submeshes: Vec<SubMesh>,
    /// 绑定姿态矩阵（与骨骼数组一一对应）
    pub bind_poses: Vec<Mat4>,
    pub bounds: Aabb,
}

impl Mesh {
    /// 创建网格并计算包围盒
    pub fn new(name: impl Into<String>, vertices: Vec<SkinnedVertex>, submeshes: Vec<SubMesh>) -> Self {
        let mut mesh = Self {
            name: name.into(),
            vertices,
            submeshes,
            bind_poses: Vec::new(),
            bounds: Aabb::default(),
        };
        mesh.recalculate_bounds();
        mesh
    }

    pub fn with_bind_poses(mut self, bind_poses: Vec<Mat4>) -> Self {
        self.bind_poses = bind_poses;
        self
    }

    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(SubMesh::triangle_count).sum()
    }

    /// 获取子网格
    pub fn submesh(&self, index: usize) -> MeshResult<&SubMesh> {
        self.submeshes.get(index).ok_or_else(|| MeshError::MissingSubMesh {
            mesh: self.name.clone(),
            index,
            count: self.submeshes.len(),
        })
    }

    /// 检查单个子网格的索引
    pub fn validate_submesh(&self, index: usize) -> MeshResult<()> {
        let submesh = self.submesh(index)?;
        if submesh.indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle {
                mesh: self.name.clone(),
                submesh: index,
                count: submesh.indices.len(),
            });
        }
        if let Some(&bad) = submesh
            .indices
            .iter()
            .find(|&&i| i as usize >= self.vertices.len())
        {
            return Err(MeshError::IndexOutOfRange {
                mesh: self.name.clone(),
                submesh: index,
                index: bad,
                vertex_count: self.vertices.len(),
            });
        }
        Ok(())
    }

    /// 检查全部子网格
    pub fn validate(&self) -> MeshResult<()> {
        (0..self.submeshes.len()).try_for_each(|i| self.validate_submesh(i))
    }

    /// 由顶点位置重新计算包围盒
    pub fn recalculate_bounds(&mut self) {
        self.bounds = Aabb::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
            .unwrap_or_default();
    }

    /// 按面积加权的面法线重新计算顶点法线
    pub fn recalculate_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.submeshes.iter().flat_map(|s| s.indices.chunks_exact(3)) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from(self.vertices[a].position);
            let pb = Vec3::from(self.vertices[b].position);
            let pc = Vec3::from(self.vertices[c].position);
            let face = (pb - pa).cross(pc - pa);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }
        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            let n = n.normalize_or_zero();
            if n != Vec3::ZERO {
                vertex.normal = n.into();
            }
        }
    }

    /// 由 UV 重新计算切线（Gram-Schmidt 正交化）
    pub fn recalculate_tangents(&mut self) {
        let count = self.vertices.len();
        let mut tangents = vec![Vec3::ZERO; count];
        let mut bitangents = vec![Vec3::ZERO; count];

        for tri in self.submeshes.iter().flat_map(|s| s.indices.chunks_exact(3)) {
            let idx = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let p = idx.map(|i| Vec3::from(self.vertices[i].position));
            let uv = idx.map(|i| Vec2::from(self.vertices[i].uv));

            let (e1, e2) = (p[1] - p[0], p[2] - p[0]);
            let (d1, d2) = (uv[1] - uv[0], uv[2] - uv[0]);
            let r = d1.x * d2.y - d2.x * d1.y;
            if r.abs() < 1e-8 {
                continue;
            }
            let f = 1.0 / r;
            let t = (e1 * d2.y - e2 * d1.y) * f;
            let b = (e2 * d1.x - e1 * d2.x) * f;
            for i in idx {
                tangents[i] += t;
                bitangents[i] += b;
            }
        }

        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            let n = Vec3::from(vertex.normal);
            let mut t = (tangents[i] - n * n.dot(tangents[i])).normalize_or_zero();
            if t == Vec3::ZERO {
                t = n.any_orthonormal_vector();
            }
            let w = if n.cross(t).dot(bitangents[i]) < 0.0 {
                -1.0
            } else {
                1.0
            };
            vertex.tangent = [t.x, t.y, t.z, w];
        }
    }
}
