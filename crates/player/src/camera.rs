use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use impulse_common::{FIXED_TIMESTEP, Transform, clamp_pitch_degrees, wrap_yaw_degrees};
use impulse_input::{InputState, Key, MouseButton};
use impulse_physics::{
    BodyHandle, BodyOptions, CollisionGroup, PhysicsError, PhysicsWorld, RayHit, ShapeDesc,
};

/// How the next left-mouse release acts on the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    RayPush,
    RayPull,
    AreaPush,
    AreaPull,
    Grab,
}

impl std::fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::RayPush => "ray push",
            Self::RayPull => "ray pull",
            Self::AreaPush => "area push",
            Self::AreaPull => "area pull",
            Self::Grab => "grab",
        };
        f.write_str(name)
    }
}

/// The most recent cast segment, kept for the debug visualizer only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugRay {
    pub from: Vec3,
    pub to: Vec3,
}

/// Degrees of look rotation per pixel-second of mouse motion.
const LOOK_SPEED: f32 = 64.0;
/// Horizontal speed, expressed like the rest of the impulse constants as
/// units per fixed step.
const WALK_SPEED: f32 = 512.0 * FIXED_TIMESTEP;
const RUN_MULTIPLIER: f32 = 3.0;
const JUMP_SPEED: f32 = 512.0 * FIXED_TIMESTEP;
/// Velocity magnitude applied by ray and area interactions.
const IMPULSE_SPEED: f32 = 64.0;
/// Velocity magnitude applied when throwing a grabbed body.
const THROW_SPEED: f32 = 128.0;
/// Half-extents of the area-interaction query box around the player.
const AREA_HALF_EXTENTS: Vec3 = Vec3::splat(32.0);
/// Head position relative to the capsule center.
const EYE_OFFSET: Vec3 = Vec3::new(0.0, 1.0, 0.0);

const CAPSULE_RADIUS: f32 = 1.0;
const CAPSULE_HEIGHT: f32 = 2.0;
const BODY_MASS: f32 = 1.0;
const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 2.0, 0.0);

const FOV_DEGREES: f32 = 60.0;
const Z_NEAR: f32 = 1.0;
const Z_FAR: f32 = 1024.0;

/// Where a grabbed body is held, relative to the eye in view space.
fn grab_hold_offset() -> Vec3 {
    Vec3::ONE.normalize() - Vec3::new(0.5, 0.5, 5.0)
}

/// First-person viewer backed by a dynamic capsule body.
///
/// Yaw and pitch are stored in degrees and applied to the view matrix only;
/// the body's rotations are locked and it never sleeps.
pub struct PlayerCamera {
    body: BodyHandle,
    yaw: f32,
    pitch: f32,
    surface: Vec2,
    mode: InteractionMode,
    grabbed: Option<BodyHandle>,
    debug_ray: Option<DebugRay>,
}

impl PlayerCamera {
    pub fn new(world: &mut PhysicsWorld, surface_width: f32, surface_height: f32) -> Self {
        let shape = ShapeDesc::CapsuleY {
            radius: CAPSULE_RADIUS,
            height: CAPSULE_HEIGHT,
        };
        let body = world.create_body_with(
            BODY_MASS,
            Transform::from_position(SPAWN_POSITION),
            &shape,
            CollisionGroup::CAMERA,
            CollisionGroup::ALL,
            BodyOptions {
                lock_rotations: true,
                can_sleep: false,
            },
        );

        Self {
            body,
            yaw: 0.0,
            pitch: 0.0,
            surface: Vec2::new(surface_width, surface_height),
            mode: InteractionMode::RayPush,
            grabbed: None,
            debug_ray: None,
        }
    }

    pub fn set_surface_size(&mut self, width: f32, height: f32) {
        self.surface = Vec2::new(width.max(1.0), height.max(1.0));
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn grabbed(&self) -> Option<BodyHandle> {
        self.grabbed
    }

    pub fn debug_ray(&self) -> Option<DebugRay> {
        self.debug_ray
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Capsule center. The camera owns its body, so the lookup only fails
    /// after `release`, at which point the camera must not be used.
    pub fn position(&self, world: &PhysicsWorld) -> Vec3 {
        world.body_position(self.body).unwrap_or(SPAWN_POSITION)
    }

    /// Head position: capsule center raised by the eye offset. Rays start
    /// here and the view matrix is built around it.
    pub fn eye(&self, world: &PhysicsWorld) -> Vec3 {
        self.position(world) + EYE_OFFSET
    }

    /// Variable-rate tick: mouse look and velocity-driven movement.
    pub fn update(&mut self, input: &mut InputState, dt: f32, world: &mut PhysicsWorld) {
        let dt = dt.max(0.001);
        let delta = input.take_mouse_delta();
        self.pitch = clamp_pitch_degrees(self.pitch + LOOK_SPEED * delta.y * dt);
        self.yaw = wrap_yaw_degrees(self.yaw + LOOK_SPEED * delta.x * dt);

        world.wake(self.body);

        let yaw = self.yaw.to_radians();
        let mut speed = WALK_SPEED;
        if input.held(Key::E) {
            speed *= RUN_MULTIPLIER;
        }

        // Horizontal velocity is rebuilt from scratch every update; the
        // vertical component carries over so gravity and jumps integrate.
        let mut velocity = world.linear_velocity(self.body).unwrap_or(Vec3::ZERO);
        velocity.x = 0.0;
        velocity.z = 0.0;

        if input.held(Key::Space) {
            velocity.y = JUMP_SPEED;
        }
        if input.held(Key::W) {
            velocity.x += speed * yaw.sin();
            velocity.z -= speed * yaw.cos();
        }
        if input.held(Key::S) {
            velocity.x -= speed * yaw.sin();
            velocity.z += speed * yaw.cos();
        }
        if input.held(Key::A) {
            velocity.x -= speed * yaw.cos();
            velocity.z -= speed * yaw.sin();
        }
        if input.held(Key::D) {
            velocity.x += speed * yaw.cos();
            velocity.z += speed * yaw.sin();
        }

        world.set_linear_velocity(self.body, velocity);
    }

    /// Consume this frame's release edges: mode keys, fire, and throw.
    pub fn handle_interactions(&mut self, input: &InputState, world: &mut PhysicsWorld) {
        for (key, mode) in [
            (Key::Digit1, InteractionMode::RayPush),
            (Key::Digit2, InteractionMode::RayPull),
            (Key::Digit3, InteractionMode::AreaPush),
            (Key::Digit4, InteractionMode::AreaPull),
            (Key::Digit5, InteractionMode::Grab),
        ] {
            if input.released(key) {
                self.set_mode(mode);
            }
        }

        if input.button_released(MouseButton::Left) {
            if self.grabbed.is_some() {
                self.grabbed = None;
                tracing::debug!("grab released");
            } else {
                match self.mode {
                    InteractionMode::RayPush => self.ray_impulse(world, Direction::Away),
                    InteractionMode::RayPull => self.ray_impulse(world, Direction::Toward),
                    InteractionMode::AreaPush => self.area_impulse(world, Direction::Away),
                    InteractionMode::AreaPull => self.area_impulse(world, Direction::Toward),
                    InteractionMode::Grab => self.begin_grab(world),
                }
            }
        }

        if input.button_released(MouseButton::Right) {
            self.throw_grabbed(world);
        }
    }

    /// Fixed-rate tick: while grabbing, the held body is teleported to track
    /// a point in front of the camera, overriding any physics response.
    pub fn fixed_update(&mut self, world: &mut PhysicsWorld) {
        if self.mode != InteractionMode::Grab {
            return;
        }
        let Some(grabbed) = self.grabbed else {
            return;
        };

        let position = self.eye(world) + self.view_rotation_inverse() * grab_hold_offset();
        let rotation = self.view_rotation_inverse();
        world.set_body_pose(
            grabbed,
            Transform { position, rotation },
        );
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        if mode != InteractionMode::Grab {
            self.grabbed = None;
        }
        self.mode = mode;
        tracing::info!("interaction mode: {mode}");
    }

    /// Cast from the head toward the screen-center aim point, remembering
    /// the segment for the debug visualizer.
    fn cast_aim_ray(&mut self, world: &PhysicsWorld) -> Option<RayHit> {
        let origin = self.eye(world);
        let aim = origin + self.pick_direction(self.surface * 0.5);

        let hit = world.ray_cast(
            origin,
            aim,
            CollisionGroup::OBJECT,
            CollisionGroup::OBJECT,
        );
        let to = hit.map(|h| h.point).unwrap_or(aim);
        self.debug_ray = Some(DebugRay { from: origin, to });
        hit
    }

    fn ray_impulse(&mut self, world: &mut PhysicsWorld, direction: Direction) {
        let origin = self.eye(world);
        let Some(hit) = self.cast_aim_ray(world) else {
            return;
        };
        let Some(center) = world.body_position(hit.body) else {
            return;
        };
        let Some(dir) = direction.orient(center - origin) else {
            return;
        };
        world.set_linear_velocity(hit.body, dir * IMPULSE_SPEED);
        tracing::debug!(?direction, "ray impulse applied");
    }

    fn area_impulse(&mut self, world: &mut PhysicsWorld, direction: Direction) {
        let center = self.position(world);
        let bodies = world.bodies_in_box(
            center - AREA_HALF_EXTENTS,
            center + AREA_HALF_EXTENTS,
            CollisionGroup::OBJECT,
        );
        tracing::debug!(count = bodies.len(), ?direction, "area impulse");

        for body in bodies {
            let Some(other) = world.body_position(body) else {
                continue;
            };
            let Some(dir) = direction.orient(other - center) else {
                continue;
            };
            world.set_linear_velocity(body, dir * IMPULSE_SPEED);
        }
    }

    fn begin_grab(&mut self, world: &mut PhysicsWorld) {
        let origin = self.eye(world);
        let aim = origin + self.pick_direction(self.surface * 0.5);
        if let Some(hit) = world.ray_cast(
            origin,
            aim,
            CollisionGroup::OBJECT,
            CollisionGroup::OBJECT,
        ) {
            self.grabbed = Some(hit.body);
            tracing::debug!("body grabbed");
        }
        self.debug_ray = Some(DebugRay { from: origin, to: aim });
    }

    fn throw_grabbed(&mut self, world: &mut PhysicsWorld) {
        if self.mode != InteractionMode::Grab {
            return;
        }
        let Some(grabbed) = self.grabbed.take() else {
            return;
        };

        let aim = self.eye(world) + self.pick_direction(self.surface * 0.5);
        let Some(dir) = (aim - self.position(world)).try_normalize() else {
            return;
        };
        world.set_linear_velocity(grabbed, dir * THROW_SPEED);
        tracing::debug!("grabbed body thrown");
    }

    /// Un-project a screen pixel into a world-space aim direction scaled to
    /// the far plane: NDC, undo the projection's perspective scaling via its
    /// diagonal, then rotate by the view rotation inverse. The translation
    /// part is discarded; callers add the eye position.
    pub fn pick_direction(&self, pixel: Vec2) -> Vec3 {
        let ndc_x = 2.0 * pixel.x / self.surface.x - 1.0;
        let ndc_y = -(2.0 * pixel.y / self.surface.y - 1.0);

        let proj = self.projection_matrix();
        let view_dir = Vec3::new(ndc_x / proj.x_axis.x, ndc_y / proj.y_axis.y, -1.0) * Z_FAR;

        self.view_rotation_inverse() * view_dir
    }

    /// Inverse of the view rotation: world orientation of the camera. Also
    /// the orientation a grabbed body is locked to.
    fn view_rotation_inverse(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            -self.yaw.to_radians(),
            -self.pitch.to_radians(),
            0.0,
        )
    }

    pub fn view_matrix(&self, world: &PhysicsWorld) -> Mat4 {
        Mat4::from_rotation_x(self.pitch.to_radians())
            * Mat4::from_rotation_y(self.yaw.to_radians())
            * Mat4::from_translation(-self.eye(world))
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            FOV_DEGREES.to_radians(),
            self.surface.x / self.surface.y,
            Z_NEAR,
            Z_FAR,
        )
    }

    pub fn view_projection(&self, world: &PhysicsWorld) -> Mat4 {
        self.projection_matrix() * self.view_matrix(world)
    }

    /// Remove the capsule body from the world. The camera must not be used
    /// afterwards; the owned shape drops with it.
    pub fn release(&mut self, world: &mut PhysicsWorld) -> Result<(), PhysicsError> {
        self.grabbed = None;
        world.remove_body(self.body)
    }
}

/// Orientation of an interaction impulse relative to the player.
#[derive(Debug, Clone, Copy)]
enum Direction {
    Away,
    Toward,
}

impl Direction {
    /// Unit vector along (or against) `delta`; `None` when degenerate.
    fn orient(self, delta: Vec3) -> Option<Vec3> {
        let dir = delta.try_normalize()?;
        Some(match self {
            Self::Away => dir,
            Self::Toward => -dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impulse_input::InputEvent;

    const WIDTH: f32 = 1280.0;
    const HEIGHT: f32 = 720.0;

    fn world_with_camera() -> (PhysicsWorld, PlayerCamera) {
        let mut world = PhysicsWorld::new();
        let camera = PlayerCamera::new(&mut world, WIDTH, HEIGHT);
        (world, camera)
    }

    fn spawn_object(world: &mut PhysicsWorld, position: Vec3) -> BodyHandle {
        let shape = ShapeDesc::Cuboid {
            half_extents: Vec3::ONE,
        };
        world.create_body(
            1.0,
            Transform::from_position(position),
            &shape,
            CollisionGroup::OBJECT,
            CollisionGroup::ALL,
        )
    }

    fn release_left(camera: &mut PlayerCamera, world: &mut PhysicsWorld) {
        let mut input = InputState::new();
        input.apply(InputEvent::ButtonReleased(MouseButton::Left));
        camera.handle_interactions(&input, world);
    }

    #[test]
    fn center_pick_direction_matches_yaw() {
        let (_world, mut camera) = world_with_camera();
        for yaw in [0.0_f32, 37.0, -120.0, 245.0] {
            camera.yaw = yaw;
            camera.pitch = 15.0;
            let dir = camera.pick_direction(Vec2::new(WIDTH, HEIGHT) * 0.5);
            let horizontal = dir.x.atan2(-dir.z).to_degrees();
            let expected = wrap_yaw_degrees(if yaw > 180.0 { yaw - 360.0 } else { yaw });
            assert!(
                (horizontal - expected).abs() < 1.0e-3,
                "yaw {yaw}: got horizontal angle {horizontal}"
            );
        }
    }

    #[test]
    fn center_pick_direction_reaches_far_plane() {
        let (_world, camera) = world_with_camera();
        let dir = camera.pick_direction(Vec2::new(WIDTH, HEIGHT) * 0.5);
        assert!((dir.length() - Z_FAR).abs() < 1.0e-2);
    }

    #[test]
    fn look_wraps_yaw_and_clamps_pitch() {
        let (mut world, mut camera) = world_with_camera();
        let mut input = InputState::new();

        // A full-turn rightward sweep: yaw wraps back into (-360, 360).
        input.apply(InputEvent::MouseMotion { dx: 6.0, dy: 10.0 });
        camera.update(&mut input, 1.0, &mut world);
        assert!((camera.yaw() - 24.0).abs() < 1.0e-3, "yaw {}", camera.yaw());
        assert_eq!(camera.pitch(), 90.0);
    }

    #[test]
    fn movement_sets_horizontal_velocity_from_yaw() {
        let (mut world, mut camera) = world_with_camera();
        let mut input = InputState::new();
        input.apply(InputEvent::KeyPressed(Key::W));

        camera.update(&mut input, FIXED_TIMESTEP, &mut world);
        let velocity = world.linear_velocity(camera_body(&camera)).unwrap();
        // Facing -Z at yaw 0.
        assert!((velocity.x).abs() < 1.0e-4);
        assert!((velocity.z + WALK_SPEED).abs() < 1.0e-4);

        input.apply(InputEvent::KeyPressed(Key::E));
        camera.update(&mut input, FIXED_TIMESTEP, &mut world);
        let velocity = world.linear_velocity(camera_body(&camera)).unwrap();
        assert!((velocity.z + WALK_SPEED * RUN_MULTIPLIER).abs() < 1.0e-4);
    }

    fn camera_body(camera: &PlayerCamera) -> BodyHandle {
        camera.body
    }

    #[test]
    fn jump_overrides_vertical_velocity() {
        let (mut world, mut camera) = world_with_camera();
        let mut input = InputState::new();
        input.apply(InputEvent::KeyPressed(Key::Space));
        camera.update(&mut input, FIXED_TIMESTEP, &mut world);
        let velocity = world.linear_velocity(camera.body).unwrap();
        assert!((velocity.y - JUMP_SPEED).abs() < 1.0e-4);
    }

    #[test]
    fn ray_push_sends_target_away_from_player() {
        let (mut world, mut camera) = world_with_camera();
        // Directly ahead of the spawn eye at (0, 3, 0), facing -Z.
        let target = spawn_object(&mut world, Vec3::new(0.0, 3.0, -10.0));
        world.step();

        release_left(&mut camera, &mut world);

        let velocity = world.linear_velocity(target).unwrap();
        assert!(
            (velocity.length() - IMPULSE_SPEED).abs() < 1.0e-3,
            "impulse magnitude, got {}",
            velocity.length()
        );
        let away = world.body_position(target).unwrap() - camera.position(&world);
        assert!(velocity.dot(away) > 0.0, "velocity must point away");
        assert!(camera.debug_ray().is_some());
    }

    #[test]
    fn ray_pull_sends_target_toward_player() {
        let (mut world, mut camera) = world_with_camera();
        let target = spawn_object(&mut world, Vec3::new(0.0, 3.0, -10.0));
        world.step();

        camera.set_mode(InteractionMode::RayPull);
        release_left(&mut camera, &mut world);

        let velocity = world.linear_velocity(target).unwrap();
        let toward = camera.position(&world) - world.body_position(target).unwrap();
        assert!(velocity.dot(toward) > 0.0, "velocity must point toward");
    }

    #[test]
    fn area_push_hits_object_group_in_range_only() {
        let (mut world, mut camera) = world_with_camera();
        let near = spawn_object(&mut world, Vec3::new(5.0, 10.0, 5.0));
        let far = spawn_object(&mut world, Vec3::new(100.0, 10.0, 0.0));
        // Ground-group body inside range must be ignored by the equality
        // filter even though its mask overlaps.
        let ground_shape = ShapeDesc::Cuboid {
            half_extents: Vec3::ONE,
        };
        let ground = world.create_body(
            1.0,
            Transform::from_position(Vec3::new(-5.0, 10.0, 0.0)),
            &ground_shape,
            CollisionGroup::GROUND,
            CollisionGroup::ALL,
        );

        camera.set_mode(InteractionMode::AreaPush);
        release_left(&mut camera, &mut world);

        let near_velocity = world.linear_velocity(near).unwrap();
        assert!((near_velocity.length() - IMPULSE_SPEED).abs() < 1.0e-3);
        let away = world.body_position(near).unwrap() - camera.position(&world);
        assert!(near_velocity.dot(away) > 0.0);

        assert_eq!(world.linear_velocity(far).unwrap(), Vec3::ZERO);
        assert_eq!(world.linear_velocity(ground).unwrap(), Vec3::ZERO);
    }

    #[test]
    fn grab_records_body_without_touching_velocity() {
        let (mut world, mut camera) = world_with_camera();
        let target = spawn_object(&mut world, Vec3::new(0.0, 3.0, -10.0));
        world.step();
        let velocity_before = world.linear_velocity(target).unwrap();

        camera.set_mode(InteractionMode::Grab);
        release_left(&mut camera, &mut world);

        assert_eq!(camera.grabbed(), Some(target));
        assert_eq!(world.linear_velocity(target).unwrap(), velocity_before);
    }

    #[test]
    fn left_release_while_grabbing_only_drops_the_grab() {
        let (mut world, mut camera) = world_with_camera();
        let target = spawn_object(&mut world, Vec3::new(0.0, 3.0, -10.0));
        world.step();

        camera.set_mode(InteractionMode::Grab);
        release_left(&mut camera, &mut world);
        assert_eq!(camera.grabbed(), Some(target));

        let velocity_before = world.linear_velocity(target).unwrap();
        release_left(&mut camera, &mut world);
        assert_eq!(camera.grabbed(), None);
        assert_eq!(world.linear_velocity(target).unwrap(), velocity_before);
    }

    #[test]
    fn switching_mode_clears_grab() {
        let (mut world, mut camera) = world_with_camera();
        let target = spawn_object(&mut world, Vec3::new(0.0, 3.0, -10.0));
        world.step();

        camera.set_mode(InteractionMode::Grab);
        release_left(&mut camera, &mut world);
        assert_eq!(camera.grabbed(), Some(target));

        let mut input = InputState::new();
        input.apply(InputEvent::KeyPressed(Key::Digit1));
        input.apply(InputEvent::KeyReleased(Key::Digit1));
        camera.handle_interactions(&input, &mut world);
        assert_eq!(camera.grabbed(), None);
        assert_eq!(camera.mode(), InteractionMode::RayPush);
    }

    #[test]
    fn grab_hold_pins_pose_each_fixed_tick() {
        let (mut world, mut camera) = world_with_camera();
        let target = spawn_object(&mut world, Vec3::new(0.0, 3.0, -10.0));
        world.step();

        camera.set_mode(InteractionMode::Grab);
        release_left(&mut camera, &mut world);
        assert_eq!(camera.grabbed(), Some(target));

        let expected_rotation = Quat::from_euler(
            EulerRot::YXZ,
            -camera.yaw().to_radians(),
            -camera.pitch().to_radians(),
            0.0,
        );

        // The fixed tick steps the world, then re-pins the grabbed body, so
        // the held pose always ends the tick on the hold point regardless of
        // the gravity the body accumulated while falling.
        for _ in 0..60 {
            world.step();
            camera.fixed_update(&mut world);

            let expected_position =
                camera.eye(&world) + expected_rotation * grab_hold_offset();
            let transform = world.body_transform(target).unwrap();
            assert!(
                transform.position.distance(expected_position) < 1.0e-3,
                "held body strayed to {:?}",
                transform.position
            );
            assert!(transform.rotation.abs_diff_eq(expected_rotation, 1.0e-3));
        }
    }

    #[test]
    fn throw_launches_grabbed_body_and_clears_grab() {
        let (mut world, mut camera) = world_with_camera();
        let target = spawn_object(&mut world, Vec3::new(0.0, 3.0, -10.0));
        world.step();

        camera.set_mode(InteractionMode::Grab);
        release_left(&mut camera, &mut world);
        assert_eq!(camera.grabbed(), Some(target));

        let mut input = InputState::new();
        input.apply(InputEvent::ButtonReleased(MouseButton::Right));
        camera.handle_interactions(&input, &mut world);

        assert_eq!(camera.grabbed(), None);
        let velocity = world.linear_velocity(target).unwrap();
        assert!((velocity.length() - THROW_SPEED).abs() < 1.0e-3);
        // Facing -Z with a level pitch: the throw goes forward.
        assert!(velocity.z < 0.0);
    }

    #[test]
    fn release_removes_the_capsule_body() {
        let (mut world, mut camera) = world_with_camera();
        let count = world.body_count();
        camera.release(&mut world).unwrap();
        assert_eq!(world.body_count(), count - 1);
        assert!(camera.release(&mut world).is_err());
    }

    #[test]
    fn throw_outside_grab_mode_does_nothing() {
        let (mut world, mut camera) = world_with_camera();
        let target = spawn_object(&mut world, Vec3::new(0.0, 3.0, -10.0));
        world.step();

        let mut input = InputState::new();
        input.apply(InputEvent::ButtonReleased(MouseButton::Right));
        camera.handle_interactions(&input, &mut world);
        assert_eq!(camera.grabbed(), None);
        let velocity = world.linear_velocity(target).unwrap();
        assert!(velocity.length() < 1.0, "no throw impulse expected");
    }
}
