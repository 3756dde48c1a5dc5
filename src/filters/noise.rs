//! Glass filter.
//!
//! Scatters pixels by copying each one from a random nearby source, which
//! looks like the image is seen through frosted glass.

use log::debug;

use crate::raster::Raster;

// ============================================================================
// Random source
// ============================================================================

/// Seeded Lehmer generator with the MINSTD constants.
pub(crate) struct Minstd {
    state: u64,
}

impl Minstd {
    const MULTIPLIER: u64 = 48_271;
    const MODULUS: u64 = (1 << 31) - 1;

    pub(crate) fn new(seed: u64) -> Self {
        // state must stay in 1..MODULUS
        let state = seed % Self::MODULUS;
        Minstd {
            state: state.max(1),
        }
    }

    fn step(&mut self) -> u64 {
        self.state = self.state * Self::MULTIPLIER % Self::MODULUS;
        self.state
    }

    /// Uniform integer in `lo..=hi`.
    ///
    /// Bounds are `i128` so that `position ± distance` cannot overflow for
    /// any `usize` distance.
    pub(crate) fn in_range(&mut self, lo: i128, hi: i128) -> i128 {
        let span = (hi - lo + 1) as u128;
        lo + (self.step() as u128 % span) as i128
    }
}

// ============================================================================
// Glass
// ============================================================================

/// Displace every pixel by a random offset of up to `distance` on each axis.
///
/// Pixel `(i, j)` is replaced by the original pixel at `(i + dx, j + dy)`,
/// with `dx` and `dy` drawn independently from `-distance..=distance`. When
/// that source lies outside the raster the pixel keeps its value. The same
/// `seed` always produces the same output.
pub fn glass(raster: &mut Raster, distance: usize, seed: u64) {
    let (width, height) = (raster.width(), raster.height());
    debug!(
        "glass distance={} seed={} on {}x{}",
        distance, seed, width, height
    );

    let backup = raster.snapshot();
    let mut rng = Minstd::new(seed);
    let d = distance as i128;

    for i in 0..width {
        for j in 0..height {
            let si = rng.in_range(i as i128 - d, i as i128 + d);
            let sj = rng.in_range(j as i128 - d, j as i128 + d);

            let source = isize::try_from(si).ok().zip(isize::try_from(sj).ok());
            if let Some(px) = source.and_then(|(x, y)| backup.get(x, y)) {
                raster.put(i, j, px);
            }
        }
    }
}
