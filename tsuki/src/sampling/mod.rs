mod stratified;

pub use stratified::StratifiedSampler;

use crate::math::Point2;

pub trait Sampler: Send + Sync {
    /// Clones a `Sampler` that draws from the independent random stream `stream`.
    fn clone(&self, stream: u64) -> Box<dyn Sampler>;
    /// Returns the number of samples per pixel this `Sampler` generates.
    fn samples_per_pixel(&self) -> u32;
    /// Readies the sampler for a new pixel.
    fn start_pixel(&mut self);
    /// Returns the next sample position inside the current pixel, in `[0, 1)^2`.
    fn get_2d(&mut self) -> Point2<f32>;
}
