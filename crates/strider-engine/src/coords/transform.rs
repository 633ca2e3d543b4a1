use super::Vec3;

/// Local placement of a scene node relative to its parent.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Rotation about the vertical axis, radians.
    pub yaw: f32,
}

/// Anything a teleporter can move.
///
/// Positions are world-space.
pub trait Positioned {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
}

impl Positioned for Vec3 {
    fn position(&self) -> Vec3 {
        *self
    }

    fn set_position(&mut self, position: Vec3) {
        *self = position;
    }
}
