use super::Texture;
use crate::math::Point2;

/// The same value everywhere.
pub struct ConstantTexture<T>
where
    T: Copy + Send + Sync,
{
    value: T,
}

impl<T> ConstantTexture<T>
where
    T: Copy + Send + Sync,
{
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T> Texture<T> for ConstantTexture<T>
where
    T: Copy + Send + Sync,
{
    fn evaluate(&self, _uv: Point2<f32>) -> T {
        self.value
    }
}

impl<T> From<T> for ConstantTexture<T>
where
    T: Copy + Send + Sync,
{
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
