/// Poses and transform spaces for scene nodes.

use glam::{Mat4, Quat, Vec3};

/// Position, orientation and scale of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
}

impl Pose {
    /// Zero position, identity orientation, unit scale
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Compose a child's local pose onto this (parent-derived) pose.
    ///
    /// Orientation composes by quaternion product and position is rotated
    /// into the parent frame. The child inherits the parent's scale; its own
    /// scale does not multiply through.
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.orientation * local.position + self.position,
            orientation: self.orientation * local.orientation,
            scale: self.scale,
        }
    }

    /// 4x4 matrix of this pose (scale, then rotation, then translation)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.position)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Reference frame for `translate` and `rotate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformSpace {
    /// Relative to the node's own axes
    Local,
    /// Relative to the parent's axes
    Parent,
    /// Relative to the root's axes
    World,
}
