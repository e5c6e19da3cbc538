use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    math::{point2, Bounds2, Spectrum, Vec2},
    tsuki_debug, tsuki_error,
};

/// The settings for a `Film`.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilmSettings {
    /// The total film resolution.
    pub res: Vec2<u16>,
    /// The tile size to be used.
    pub tile_dim: u16,
}

impl Default for FilmSettings {
    fn default() -> Self {
        Self {
            res: Vec2::new(640, 480),
            tile_dim: 16,
        }
    }
}

/// A film tile used for rendering.
#[derive(Debug, Clone)]
pub struct FilmTile {
    /// The [Film] pixel bounds for this tile.
    pub bb: Bounds2<u16>,
    // Generation of the film this tile was cut from
    generation: u64,
}

impl FilmTile {
    pub fn new(bb: Bounds2<u16>, generation: u64) -> Self {
        Self { bb, generation }
    }

    pub fn width(&self) -> usize {
        (self.bb.p_max.x - self.bb.p_min.x) as usize
    }

    pub fn height(&self) -> usize {
        (self.bb.p_max.y - self.bb.p_min.y) as usize
    }
}

/// 8-bit RGB pixel buffer written through [FilmTile]s.
#[derive(Clone)]
pub struct Film {
    res: Vec2<u16>,
    // Row-major RGB
    pixels: Vec<u8>,
    dirty: bool,
    // Bumped on resize so that tiles of a previous render are rejected
    generation: u64,
}

impl Film {
    /// Creates a black `Film` of `res` pixels.
    pub fn new(res: Vec2<u16>) -> Self {
        Self {
            res,
            pixels: vec![0; (res.x as usize) * (res.y as usize) * 3],
            dirty: true,
            generation: 0,
        }
    }

    pub fn res(&self) -> Vec2<u16> {
        self.res
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the row-major RGB bytes of this `Film`.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the RGB bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u16, y: u16) -> [u8; 3] {
        let i = ((y as usize) * (self.res.x as usize) + (x as usize)) * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Returns `true` if pixels have been written since the last [Film::clear_dirty].
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Returns `true` if `tile` was cut from the current pixel buffer.
    pub fn matches(&self, tile: &FilmTile) -> bool {
        tile.generation == self.generation
    }

    // Invalidates tiles in flight and clears the pixels to black
    fn resize(&mut self, res: Vec2<u16>) {
        self.generation += 1;
        self.res = res;
        self.pixels = vec![0; (res.x as usize) * (res.y as usize) * 3];
        self.dirty = true;
    }

    /// Writes the row-major `colors` of `tile`, clamped to `[0, 1]`.
    pub fn update_tile(&mut self, tile: &FilmTile, colors: &[Spectrum<f32>]) {
        if !self.matches(tile) {
            tsuki_error!(
                "Tile generation {} doesn't match film generation {}",
                tile.generation,
                self.generation
            );
            return;
        }
        if tile.bb.p_max.x > self.res.x || tile.bb.p_max.y > self.res.y {
            tsuki_error!("Tile doesn't fit film ({:?} {:?})", self.res, tile.bb);
            return;
        }
        assert!(colors.len() >= tile.width() * tile.height());

        let tile_width = tile.width();
        for (tile_row, film_row) in ((tile.bb.p_min.y as usize)..(tile.bb.p_max.y as usize))
            .enumerate()
        {
            let row_start = (film_row * (self.res.x as usize) + (tile.bb.p_min.x as usize)) * 3;
            let film_slice = &mut self.pixels[row_start..row_start + tile_width * 3];
            let tile_slice = &colors[tile_row * tile_width..(tile_row + 1) * tile_width];

            for (rgb, c) in film_slice.chunks_exact_mut(3).zip(tile_slice) {
                let c = c.clamped(0.0, 1.0);
                rgb[0] = (255.0 * c.r) as u8;
                rgb[1] = (255.0 * c.g) as u8;
                rgb[2] = (255.0 * c.b) as u8;
            }
        }
        self.dirty = true;
    }
}

/// Resizes `film` to `settings` and cuts it into [FilmTile]s.
///
/// Tiles come out starting from the center of the image, ring by ring. Tiles from previous calls
/// no longer match the film.
pub fn film_tiles(film: &Arc<Mutex<Film>>, settings: &FilmSettings) -> VecDeque<FilmTile> {
    assert!(settings.tile_dim > 0, "Zero tile dimension");

    let generation = {
        tsuki_debug!("Resizing film");
        let mut film = film.lock().unwrap_or_else(PoisonError::into_inner);
        film.resize(settings.res);
        film.generation()
    };

    let dim = settings.tile_dim as u32;
    let tiles_x = (settings.res.x as u32 + dim - 1) / dim;
    let tiles_y = (settings.res.y as u32 + dim - 1) / dim;

    // Interesting things tend to be in the middle of the frame
    let center_x = (tiles_x as f32 - 1.0) / 2.0;
    let center_y = (tiles_y as f32 - 1.0) / 2.0;
    let mut coords: Vec<(u32, u32)> = iproduct!(0..tiles_y, 0..tiles_x)
        .map(|(y, x)| (x, y))
        .collect();
    coords.sort_by(|&(ax, ay), &(bx, by)| {
        let key = |x: u32, y: u32| {
            let dx = x as f32 - center_x;
            let dy = y as f32 - center_y;
            (dx.abs().max(dy.abs()), dy.atan2(dx))
        };
        let (a_ring, a_angle) = key(ax, ay);
        let (b_ring, b_angle) = key(bx, by);
        a_ring
            .total_cmp(&b_ring)
            .then_with(|| a_angle.total_cmp(&b_angle))
    });

    tsuki_debug!("Cut {} tiles", coords.len());

    coords
        .into_iter()
        .map(|(x, y)| {
            let min_x = x * dim;
            let min_y = y * dim;
            // Limit tiles to film dimensions
            let max_x = (min_x + dim).min(settings.res.x as u32);
            let max_y = (min_y + dim).min(settings.res.y as u32);
            FilmTile::new(
                Bounds2::new(
                    point2(min_x as u16, min_y as u16),
                    point2(max_x as u16, max_y as u16),
                ),
                generation,
            )
        })
        .collect()
}
