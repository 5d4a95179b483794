//! Orbit-Kamera für die 3D-Ansicht.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Perspektivische Kamera, die um einen Zielpunkt kreist (Yaw/Pitch/Distanz).
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Zielpunkt in Weltkoordinaten
    pub target: Vec3,
    /// Azimut um die Y-Achse (Radiant)
    pub yaw: f32,
    /// Elevation (Radiant, positiv = von oben)
    pub pitch: f32,
    /// Abstand zum Zielpunkt
    pub distance: f32,
    /// Vertikales Sichtfeld (Radiant)
    pub fov_y: f32,
    /// Near-Plane
    pub near: f32,
    /// Far-Plane
    pub far: f32,
}

impl OrbitCamera {
    /// Minimaler Abstand zum Zielpunkt.
    pub const DISTANCE_MIN: f32 = 0.5;
    /// Maximaler Abstand zum Zielpunkt.
    pub const DISTANCE_MAX: f32 = 500.0;
    /// Pitch-Grenze knapp unter ±90°, verhindert Gimbal-Flip.
    pub const PITCH_LIMIT: f32 = 1.55;

    /// Kamera aus Position und Zielpunkt.
    pub fn from_position(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(Self::DISTANCE_MIN);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).asin(),
            distance,
            fov_y: 45f32.to_radians(),
            near: 0.1,
            far: 10_000.0,
        }
    }

    /// Aktuelle Kamera-Position in Weltkoordinaten.
    pub fn position(&self) -> Vec3 {
        let horizontal = self.distance * self.pitch.cos();
        self.target
            + Vec3::new(
                horizontal * self.yaw.sin(),
                self.distance * self.pitch.sin(),
                horizontal * self.yaw.cos(),
            )
    }

    /// View-Matrix (rechtshändig, Y hoch).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Projektions-Matrix für das gegebene Seitenverhältnis.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(1e-4), self.near, self.far)
    }

    /// View-Projection-Matrix für die Viewport-Größe in Pixeln.
    pub fn view_projection(&self, viewport_size: [f32; 2]) -> Mat4 {
        let aspect = viewport_size[0].max(1.0) / viewport_size[1].max(1.0);
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Dreht die Kamera um den Zielpunkt (Deltas in Radiant).
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Verschiebt den Zielpunkt in der Bildebene (Deltas in Weltmaßstab).
    pub fn pan(&mut self, delta: Vec2) {
        let view = self.view_matrix();
        let right = Vec3::new(view.x_axis.x, view.y_axis.x, view.z_axis.x);
        let up = Vec3::new(view.x_axis.y, view.y_axis.y, view.z_axis.y);
        self.target += right * delta.x + up * delta.y;
    }

    /// Skaliert den Abstand zum Zielpunkt (factor > 1 = herauszoomen).
    pub fn zoom_by(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(Self::DISTANCE_MIN, Self::DISTANCE_MAX);
    }

    /// Welt-Strahl durch einen Bildschirmpunkt (Pixel, Ursprung oben links).
    ///
    /// Liefert (Ursprung, normierte Richtung).
    pub fn screen_ray(&self, screen_pos: Vec2, viewport_size: Vec2) -> (Vec3, Vec3) {
        let ndc = Vec2::new(
            (screen_pos.x / viewport_size.x.max(1.0)) * 2.0 - 1.0,
            1.0 - (screen_pos.y / viewport_size.y.max(1.0)) * 2.0,
        );
        let inv = self
            .view_projection([viewport_size.x, viewport_size.y])
            .inverse();

        let near = inv * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        (near, (far - near).normalize_or_zero())
    }
}

impl Default for OrbitCamera {
    /// Start-Ansicht der Demo-Szene (leicht erhöht, schräg von vorn).
    fn default() -> Self {
        Self::from_position(Vec3::new(3.5, 5.0, 7.5), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_position_roundtrip() {
        let pos = Vec3::new(3.5, 5.0, 7.5);
        let camera = OrbitCamera::from_position(pos, Vec3::ZERO);
        let back = camera.position();
        assert_relative_eq!(back.x, pos.x, epsilon = 1e-4);
        assert_relative_eq!(back.y, pos.y, epsilon = 1e-4);
        assert_relative_eq!(back.z, pos.z, epsilon = 1e-4);
    }

    #[test]
    fn test_view_matrix_centers_target() {
        let camera = OrbitCamera::from_position(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let p = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, -10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut camera = OrbitCamera::default();
        camera.zoom_by(1e6);
        assert_relative_eq!(camera.distance, OrbitCamera::DISTANCE_MAX);
        camera.zoom_by(1e-9);
        assert_relative_eq!(camera.distance, OrbitCamera::DISTANCE_MIN);
    }

    #[test]
    fn test_pitch_clamps() {
        let mut camera = OrbitCamera::default();
        camera.orbit(0.0, 10.0);
        assert!(camera.pitch <= OrbitCamera::PITCH_LIMIT);
        camera.orbit(0.0, -20.0);
        assert!(camera.pitch >= -OrbitCamera::PITCH_LIMIT);
    }

    #[test]
    fn test_center_ray_hits_target() {
        let camera = OrbitCamera::from_position(Vec3::new(3.5, 5.0, 7.5), Vec3::ZERO);
        let viewport = Vec2::new(800.0, 600.0);
        let (origin, dir) = camera.screen_ray(viewport * 0.5, viewport);

        // Strahl durch die Bildmitte muss durch den Zielpunkt laufen
        let to_target = (camera.target - origin).normalize();
        assert_relative_eq!(dir.x, to_target.x, epsilon = 1e-3);
        assert_relative_eq!(dir.y, to_target.y, epsilon = 1e-3);
        assert_relative_eq!(dir.z, to_target.z, epsilon = 1e-3);
    }
}
