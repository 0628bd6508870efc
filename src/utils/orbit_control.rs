use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use winit::event::MouseButton;

use crate::app::input::Input;
use crate::scene::transform::Transform;
use crate::settings::OrbitSettings;

/// Orbit camera controller: left drag rotates around `center`, right drag
/// pans, the wheel zooms.
///
/// With damping enabled, rotation and pan keep easing out after the pointer
/// stops, losing `damping_factor` of the remaining motion each 60 Hz frame.
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub enable_zoom: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    pub center: Vec3,
    pub radius: f32,
    /// Azimuth around +Y, zero looking down -Z.
    pub theta: f32,
    /// Polar angle from +Y.
    pub phi: f32,

    rotate_delta: Vec2,
    pan_delta: Vec3,
}

impl OrbitControls {
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self::with_settings(center, radius, &OrbitSettings::default())
    }

    #[must_use]
    pub fn with_settings(center: Vec3, radius: f32, settings: &OrbitSettings) -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            damping_factor: settings.damping_factor,
            enable_damping: settings.enable_damping,
            enable_zoom: settings.enable_zoom,
            min_distance: 0.1,
            max_distance: 1000.0,

            center,
            radius,
            theta: 0.0,
            phi: std::f32::consts::FRAC_PI_2,

            rotate_delta: Vec2::ZERO,
            pan_delta: Vec3::ZERO,
        }
    }

    /// Position on the orbit sphere for the current angles and radius.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.center + Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * self.radius
    }

    pub fn update(&mut self, transform: &mut Transform, input: &Input, fov_degrees: f32, dt: f32) {
        let screen_height = input.screen_size.y.max(1.0);

        if input.is_button_pressed(MouseButton::Left) {
            let rotate_per_pixel = 2.0 * PI / screen_height;
            self.rotate_delta -= input.cursor_delta * rotate_per_pixel * self.rotate_speed;
        }

        if input.is_button_pressed(MouseButton::Right) {
            let target_world_height = 2.0 * self.radius * (fov_degrees.to_radians() / 2.0).tan();
            let pixels_to_world = target_world_height / screen_height;

            let forward = (self.center - self.eye()).normalize_or_zero();
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();

            self.pan_delta +=
                (right * -input.cursor_delta.x + up * input.cursor_delta.y) * pixels_to_world * self.pan_speed;
        }

        if self.enable_zoom && input.scroll_delta.y != 0.0 {
            let scale = (1.0 - self.zoom_speed).powf(input.scroll_delta.y.abs());
            if input.scroll_delta.y > 0.0 {
                self.radius *= scale;
            } else {
                self.radius /= scale;
            }
            self.radius = self.radius.clamp(self.min_distance, self.max_distance);
        }

        if self.enable_damping {
            let retention = (1.0 - self.damping_factor).powf(dt * 60.0);
            let applied = 1.0 - retention;

            self.theta += self.rotate_delta.x * applied;
            self.phi += self.rotate_delta.y * applied;
            self.center += self.pan_delta * applied;

            self.rotate_delta *= retention;
            self.pan_delta *= retention;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.center += self.pan_delta;
            self.rotate_delta = Vec2::ZERO;
            self.pan_delta = Vec3::ZERO;
        }

        const EPS: f32 = 0.0001;
        self.phi = self.phi.clamp(EPS, PI - EPS);

        transform.position = self.eye();
        transform.look_at(self.center, Vec3::Y);
    }
}
