//! Free-flying perspective camera.
//!
//! WASD moves in the view plane, Space / left Ctrl move along world up,
//! left Shift goes fast. Holding the right mouse button turns the view,
//! the scroll wheel narrows or widens the field of view.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

pub const MIN_FOV_DEG: f32 = 1.0;
pub const MAX_FOV_DEG: f32 = 80.0;

/// Keep the view this far away from straight up / straight down
const PITCH_LIMIT: f32 = 85.0 * std::f32::consts::PI / 180.0;

#[derive(Component, Debug, Clone)]
pub struct FlyCamera {
    pub speed: f32, // units per second
    pub fast_speed: f32, // with shift held
    pub sensitivity: f32, // radians per pixel of mouse motion
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            speed: 40.0,
            fast_speed: 320.0,
            sensitivity: 0.003,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl FlyCamera {
    /// Start out looking at `target` from `eye`
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let dir = (target - eye).normalize_or_zero();
        let yaw = (-dir.x).atan2(-dir.z);
        let pitch = dir.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        Self {
            yaw,
            pitch,
            ..Default::default()
        }
    }

    pub fn rotation(&self) -> Quat {
        look_rotation(self.yaw, self.pitch)
    }
}

pub fn look_rotation(yaw: f32, pitch: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

/// Field of view after one scroll step, in degrees
pub fn zoom_fov(fov_deg: f32, scroll: f32) -> f32 {
    (fov_deg - scroll).clamp(MIN_FOV_DEG, MAX_FOV_DEG)
}

pub fn fly_camera_movement(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&FlyCamera, &mut Transform)>,
) {
    let dt = time.delta_seconds();

    for (cam, mut transform) in &mut query {
        let forward = *transform.forward();
        let right = *transform.right();
        let mut dir = Vec3::ZERO;

        if keys.pressed(KeyCode::KeyW) {
            dir += forward;
        }
        if keys.pressed(KeyCode::KeyS) {
            dir -= forward;
        }
        if keys.pressed(KeyCode::KeyD) {
            dir += right;
        }
        if keys.pressed(KeyCode::KeyA) {
            dir -= right;
        }
        if keys.pressed(KeyCode::Space) {
            dir += Vec3::Y;
        }
        if keys.pressed(KeyCode::ControlLeft) {
            dir -= Vec3::Y;
        }

        let speed = if keys.pressed(KeyCode::ShiftLeft) { cam.fast_speed } else { cam.speed };
        transform.translation += dir.normalize_or_zero() * speed * dt;
    }
}

pub fn fly_camera_look(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut query: Query<(&mut FlyCamera, &mut Transform)>,
) {
    let looking = buttons.pressed(MouseButton::Right);

    if let Ok(mut window) = windows.get_single_mut() {
        window.cursor.visible = !looking;
        window.cursor.grab_mode = if looking { CursorGrabMode::Locked } else { CursorGrabMode::None };
    }

    if !looking {
        motion.clear();
        return;
    }

    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    for (mut cam, mut transform) in &mut query {
        cam.yaw -= delta.x * cam.sensitivity;
        cam.pitch = (cam.pitch - delta.y * cam.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        transform.rotation = cam.rotation();
    }
}

pub fn fly_camera_zoom(
    mut scroll: EventReader<MouseWheel>,
    mut query: Query<&mut Projection, With<FlyCamera>>,
) {
    let amount: f32 = scroll.read().map(|e| e.y).sum();
    if amount == 0.0 {
        return;
    }

    for mut projection in &mut query {
        if let Projection::Perspective(p) = &mut *projection {
            p.fov = zoom_fov(p.fov.to_degrees(), amount).to_radians();
        }
    }
}
