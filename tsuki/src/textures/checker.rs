use super::Texture;
use crate::math::Point2;

/// A procedural checkerboard in surface coordinates.
pub struct CheckerTexture<T>
where
    T: Copy + Send + Sync,
{
    even: T,
    odd: T,
    /// Number of checks per unit of `uv`.
    frequency: f32,
}

impl<T> CheckerTexture<T>
where
    T: Copy + Send + Sync,
{
    pub fn new(even: T, odd: T, frequency: f32) -> Self {
        Self {
            even,
            odd,
            frequency,
        }
    }
}

impl<T> Texture<T> for CheckerTexture<T>
where
    T: Copy + Send + Sync,
{
    fn evaluate(&self, uv: Point2<f32>) -> T {
        let u = (uv.x * self.frequency).floor() as i64;
        let v = (uv.y * self.frequency).floor() as i64;
        if (u + v).rem_euclid(2) == 0 {
            self.even
        } else {
            self.odd
        }
    }
}
