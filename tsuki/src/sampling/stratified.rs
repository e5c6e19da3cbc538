use rand::{distributions::Standard, Rng};
use rand_pcg::Pcg32;

use super::Sampler;
use crate::math::Point2;

/// Splits the pixel into a `grid x grid` set of cells with one sample in each.
///
/// Samples are at the cell centers unless jittered.
pub struct StratifiedSampler {
    grid: u16,
    jitter_samples: bool,
    samples: Vec<Point2<f32>>,
    current_sample: usize,
    rng: Pcg32,
    // Stored to clone the sampler with a different stream
    seed: u64,
}

impl StratifiedSampler {
    /// Creates a new `StratifiedSampler`. Panics if `grid` is zero.
    pub fn new(grid: u16, jitter_samples: bool, seed: u64) -> Self {
        assert!(grid > 0, "Zero sample grid");

        let sample_count = (grid as usize) * (grid as usize);
        Self {
            grid,
            jitter_samples,
            samples: vec![Point2::from(0.5); sample_count],
            current_sample: 0,
            rng: Pcg32::new(seed, 0),
            seed,
        }
    }
}

impl Sampler for StratifiedSampler {
    fn clone(&self, stream: u64) -> Box<dyn Sampler> {
        Box::new(Self {
            // Pcg has uncorrelated streams so let's leverage that
            rng: Pcg32::new(self.seed, stream),
            ..Self::new(self.grid, self.jitter_samples, self.seed)
        })
    }

    fn samples_per_pixel(&self) -> u32 {
        (self.grid as u32) * (self.grid as u32)
    }

    fn start_pixel(&mut self) {
        self.current_sample = 0;
        stratified_sample_2d(
            &mut self.samples,
            self.grid,
            self.jitter_samples,
            &mut self.rng,
        );
    }

    fn get_2d(&mut self) -> Point2<f32> {
        match self.samples.get(self.current_sample) {
            Some(&p) => {
                self.current_sample += 1;
                p
            }
            // Past the grid, fall back to uniform samples
            None => Point2::new(self.rng.sample(Standard), self.rng.sample(Standard)),
        }
    }
}

const ONE_MINUS_EPSILON: f32 = 1.0_f32 - f32::EPSILON;

fn stratified_sample_2d(samples: &mut [Point2<f32>], grid: u16, jitter: bool, rng: &mut Pcg32) {
    let d = 1.0 / (grid as f32);
    for (i, sample) in samples.iter_mut().enumerate() {
        let x = (i % (grid as usize)) as f32;
        let y = (i / (grid as usize)) as f32;
        let (jx, jy) = if jitter {
            (rng.sample(Standard), rng.sample(Standard))
        } else {
            (0.5, 0.5)
        };
        *sample = Point2::new(
            ((x + jx) * d).min(ONE_MINUS_EPSILON),
            ((y + jy) * d).min(ONE_MINUS_EPSILON),
        );
    }
}
