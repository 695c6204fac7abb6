//! Per-object render output.

use glam::{Quat, Vec3};
use schema::ObjectId;

/// Authority tag for objects driven by the remote authority.
pub const AUTHORITY_REMOTE: u16 = 0;

/// Pose of one object for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectUpdate {
    pub id: ObjectId,
    pub position: Vec3,
    pub orientation: Quat,
    /// Visual scale of the object's role.
    pub scale: f32,
    /// [`AUTHORITY_REMOTE`] when the object was interacting at the start of
    /// the window, otherwise the registry's authority sentinel.
    pub authority: u16,
    pub visible: bool,
}

impl Default for ObjectUpdate {
    fn default() -> Self {
        Self {
            id: ObjectId::FIRST,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: 1.0,
            authority: AUTHORITY_REMOTE,
            visible: false,
        }
    }
}
