use glam::{Mat4, Quat, Vec3};

/// Length of one physics step in seconds. The simulation always advances by
/// exactly this amount, regardless of wall-clock frame time.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Spatial transform: position and rotation.
///
/// Scale is intentionally absent; collision shapes are unscaled and any
/// visual scale is a per-object rendering concern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Model matrix for rendering, with a visual scale applied innermost.
    pub fn matrix_with_scale(&self, scale: Vec3) -> Mat4 {
        Mat4::from_scale_rotation_translation(scale, self.rotation, self.position)
    }
}

/// Wrap a yaw angle into the (-360, 360) degree band.
pub fn wrap_yaw_degrees(yaw: f32) -> f32 {
    if yaw <= -360.0 {
        yaw + 360.0
    } else if yaw >= 360.0 {
        yaw - 360.0
    } else {
        yaw
    }
}

/// Clamp a pitch angle to straight up / straight down.
pub fn clamp_pitch_degrees(pitch: f32) -> f32 {
    pitch.clamp(-90.0, 90.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn matrix_applies_scale_then_pose() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let m = t.matrix_with_scale(Vec3::splat(2.0));
        let p = m.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p, Vec3::new(3.0, 2.0, 3.0));
    }

    #[test]
    fn yaw_wraps_at_full_turn() {
        assert_eq!(wrap_yaw_degrees(360.0), 0.0);
        assert_eq!(wrap_yaw_degrees(-365.0), -5.0);
        assert_eq!(wrap_yaw_degrees(45.0), 45.0);
    }

    #[test]
    fn pitch_clamps_to_vertical() {
        assert_eq!(clamp_pitch_degrees(120.0), 90.0);
        assert_eq!(clamp_pitch_degrees(-91.0), -90.0);
        assert_eq!(clamp_pitch_degrees(30.0), 30.0);
    }
}
