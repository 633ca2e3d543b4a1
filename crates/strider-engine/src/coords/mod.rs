//! Geometry shared by the scene tree and mechanics.
//!
//! World space: +Y up, yaw measured counter-clockwise about +Y, radians.

mod transform;
mod vec3;

pub use transform::{Positioned, Transform};
pub use vec3::Vec3;
