use cgmath::{perspective, Deg, EuclideanSpace, Matrix4, Point3, Vector3};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const FOVY_DEGREES: f32 = 45.0;
const Z_NEAR: f32 = 0.05;
const Z_FAR: f32 = 200.0;
/// Degrees of yaw/pitch per pixel of drag.
const DRAG_DEGREES_PER_PIXEL: f32 = 0.25;
const ZOOM_PER_LINE: f32 = 0.5;
/// Blend factors below are expressed per frame at this rate.
const REFERENCE_FPS: f32 = 60.0;

/// Orbits a fixed center. Angles are in degrees; drag input moves the targets and
/// `update` eases the current angles toward them.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub center: Point3<f32>,
    distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub invert_y: bool,
    pub smoothing: bool,
    /// Fraction of the remaining angle covered per reference frame.
    pub damping: f32,
    yaw: f32,
    pitch: f32,
    target_yaw: f32,
    target_pitch: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        OrbitCamera {
            center: Point3::origin(),
            distance: 4.0,
            min_distance: 2.0,
            max_distance: 50.0,
            min_pitch: -30.0,
            max_pitch: 60.0,
            invert_y: false,
            smoothing: true,
            damping: 0.1,
            yaw: 0.0,
            pitch: 20.0,
            target_yaw: 0.0,
            target_pitch: 20.0,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }

    /// Sets the target orientation; jumps there immediately when smoothing is off.
    pub fn set_rotation(&mut self, yaw: f32, pitch: f32) {
        self.target_yaw = yaw;
        self.target_pitch = pitch.clamp(self.min_pitch, self.max_pitch);
        if !self.smoothing {
            self.snap();
        }
    }

    pub fn snap(&mut self) {
        self.yaw = self.target_yaw;
        self.pitch = self.target_pitch;
    }

    /// Drag in window pixels; +y is down.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let dy = if self.invert_y { -dy } else { dy };
        self.target_yaw += dx * DRAG_DEGREES_PER_PIXEL;
        self.target_pitch =
            (self.target_pitch + dy * DRAG_DEGREES_PER_PIXEL).clamp(self.min_pitch, self.max_pitch);
    }

    /// Scroll in lines; positive zooms in.
    pub fn zoom(&mut self, lines: f32) {
        self.set_distance(self.distance - lines * ZOOM_PER_LINE);
    }

    pub fn update(&mut self, dt: f32) {
        if !self.smoothing {
            self.snap();
            return;
        }
        let blend = 1.0 - (1.0 - self.damping.clamp(0.0, 1.0)).powf(dt.max(0.0) * REFERENCE_FPS);
        self.yaw += (self.target_yaw - self.yaw) * blend;
        self.pitch += (self.target_pitch - self.pitch) * blend;
    }

    pub fn eye_position(&self) -> Point3<f32> {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        let horizontal = self.distance * pitch.cos();
        let offset = Vector3::new(horizontal * yaw.sin(), self.distance * pitch.sin(), horizontal * yaw.cos());
        self.center + offset
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye_position(), self.center, Vector3::unit_y())
    }

    pub fn view_proj(&self, aspect: f32) -> Matrix4<f32> {
        let projection = perspective(Deg(FOVY_DEGREES), aspect.max(1e-3), Z_NEAR, Z_FAR);
        OPENGL_TO_WGPU_MATRIX * projection * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};

    fn assert_close(a: f32, b: f32, what: &str) {
        assert!((a - b).abs() < 1e-4, "{what}: expected {b}, got {a}");
    }

    #[test]
    fn level_camera_sits_on_positive_z() {
        let mut cam = OrbitCamera::new();
        cam.set_rotation(0.0, 0.0);
        cam.snap();
        let eye = cam.eye_position();
        assert_close(eye.x, 0.0, "x");
        assert_close(eye.y, 0.0, "y");
        assert_close(eye.z, cam.distance(), "z");
    }

    #[test]
    fn eye_stays_at_orbit_distance() {
        let mut cam = OrbitCamera::new();
        cam.center = Point3::new(1.0, -2.0, 0.5);
        cam.set_rotation(123.0, 47.0);
        cam.snap();
        let offset = cam.eye_position() - cam.center;
        assert_close(offset.magnitude(), cam.distance(), "orbit radius");
    }

    #[test]
    fn pitch_and_distance_are_clamped() {
        let mut cam = OrbitCamera::new();
        cam.rotate(0.0, 10_000.0);
        cam.snap();
        assert_eq!(cam.pitch(), 60.0);
        cam.rotate(0.0, -10_000.0);
        cam.snap();
        assert_eq!(cam.pitch(), -30.0);

        cam.zoom(1000.0);
        assert_eq!(cam.distance(), 2.0);
        cam.zoom(-1000.0);
        assert_eq!(cam.distance(), 50.0);
    }

    #[test]
    fn smoothing_converges_regardless_of_frame_rate() {
        let mut coarse = OrbitCamera::new();
        let mut fine = OrbitCamera::new();
        coarse.rotate(400.0, 0.0);
        fine.rotate(400.0, 0.0);

        coarse.update(0.5);
        for _ in 0..10 {
            fine.update(0.05);
        }
        assert_close(coarse.yaw(), fine.yaw(), "yaw after 0.5s");
        assert!(coarse.yaw() > 0.0 && coarse.yaw() < 100.0);

        for _ in 0..600 {
            coarse.update(1.0 / 60.0);
        }
        assert_close(coarse.yaw(), 100.0, "settled yaw");
    }

    #[test]
    fn center_projects_to_screen_middle() {
        let mut cam = OrbitCamera::new();
        cam.set_rotation(30.0, 15.0);
        cam.snap();
        let clip = cam.view_proj(16.0 / 9.0) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_close(clip.x / clip.w, 0.0, "ndc x");
        assert_close(clip.y / clip.w, 0.0, "ndc y");
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth), "depth {depth} outside wgpu range");
    }
}
