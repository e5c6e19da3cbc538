mod checker;
mod constant;

pub use checker::CheckerTexture;
pub use constant::ConstantTexture;

use crate::math::Point2;

pub trait Texture<T>: Send + Sync {
    /// Evaluates this `Texture` at surface coordinates `uv`.
    fn evaluate(&self, uv: Point2<f32>) -> T;
}
