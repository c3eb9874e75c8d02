//! 蒙皮顶点数据

// ============================================================================
// 蒙皮顶点
// ============================================================================

/// 蒙皮顶点（包含骨骼权重）
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkinnedVertex {
    /// 位置
    pub position: [f32; 3],
    /// 法线
    pub normal: [f32; 3],
    /// 切线（w 为副切线方向）
    pub tangent: [f32; 4],
    /// 纹理坐标
    pub uv: [f32; 2],
    /// 骨骼索引（最多 4 个，指向基础身体的骨骼数组）
    pub bone_indices: [u32; 4],
    /// 骨骼权重（最多 4 个，总和为 1.0）
    pub bone_weights: [f32; 4],
}

impl SkinnedVertex {
    /// 创建新的蒙皮顶点，切线默认沿 +X
    pub fn new(
        position: [f32; 3],
        normal: [f32; 3],
        uv: [f32; 2],
        bone_indices: [u32; 4],
        bone_weights: [f32; 4],
    ) -> Self {
        Self {
            position,
            normal,
            tangent: [1.0, 0.0, 0.0, 1.0],
            uv,
            bone_indices,
            bone_weights,
        }
    }

    /// 完全绑定到单根骨骼的顶点
    pub fn rigid(position: [f32; 3], normal: [f32; 3], uv: [f32; 2], bone: u32) -> Self {
        Self::new(position, normal, uv, [bone, 0, 0, 0], [1.0, 0.0, 0.0, 0.0])
    }

    /// 归一化骨骼权重
    pub fn normalize_weights(&mut self) {
        let sum: f32 = self.bone_weights.iter().sum();
        if sum > 0.0001 {
            let inv_sum = 1.0 / sum;
            for w in &mut self.bone_weights {
                *w *= inv_sum;
            }
        }
    }
}
