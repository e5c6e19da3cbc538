#[macro_use]
mod ops;

mod bounds;
mod common;
mod matrix;
mod normal;
mod point;
mod ray;
mod spectrum;
mod transform;
pub mod transforms;
mod vector;

pub use bounds::{Bounds2, Bounds2IntoIter, Bounds3};
pub use common::{half, two, FloatValueType, Maxi, Mini, ValueType};
pub use matrix::Matrix4x4;
pub use normal::{normal, Normal};
pub use point::{point2, point3, Point2, Point3};
pub use ray::Ray;
pub use spectrum::{spectrum, Spectrum};
pub use transform::Transform;
pub use vector::{vec2, vec3, Vec2, Vec3};
