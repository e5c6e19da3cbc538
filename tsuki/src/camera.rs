use crate::math::{transforms::look_at, Point2, Point3, Ray, Transform, Vec2, Vec3};

/// Placement of a pinhole camera.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraParameters {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vec3<f32>,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
}

impl Default for CameraParameters {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 1.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov_y: 60.0,
        }
    }
}

/// A simple pinhole camera
#[derive(Clone)]
pub struct Camera {
    camera_to_world: Transform<f32>,
    res: Vec2<u16>,
    // Half extents of the view plane at distance 1
    half_extent: Vec2<f32>,
}

impl Camera {
    /// Creates a new `Camera` for an image of `res` pixels.
    ///
    /// Panics if `params` don't define a view, [crate::scene::Scene::set_camera] rejects those.
    pub fn new(params: CameraParameters, res: Vec2<u16>) -> Self {
        let camera_to_world = match look_at(params.position, params.target, params.up) {
            Some(t) => t,
            None => panic!("Camera: Degenerate view {:?}", params),
        };

        let half_height = (params.fov_y.to_radians() / 2.0).tan();
        let aspect = (res.x as f32) / (res.y as f32);

        Self {
            camera_to_world,
            res,
            half_extent: Vec2::new(half_height * aspect, half_height),
        }
    }

    /// Returns the image resolution this `Camera` was set up for.
    pub fn res(&self) -> Vec2<u16> {
        self.res
    }

    /// Creates a new world space [Ray] through `p` on the image plane.
    ///
    /// `p` is in `[0, 1]^2` with `(0, 0)` at the top left corner of the image.
    pub fn ray(&self, p: Point2<f32>) -> Ray<f32> {
        let d = Vec3::new(
            (2.0 * p.x - 1.0) * self.half_extent.x,
            (1.0 - 2.0 * p.y) * self.half_extent.y,
            -1.0,
        );
        let r = Ray::unbounded(Point3::zeros(), d.normalized());
        &self.camera_to_world * r
    }
}
