//! Blur filters for RGBA images.
//!
//! Motion blur is a 1D sliding-window average along one axis. Box blur is
//! the separable 2D version (vertical pass, then horizontal pass) and tent
//! blur runs the box blur twice, which approximates a triangular kernel.
//!
//! All four channels are averaged, alpha included.

use log::debug;

use super::Orientation;
use crate::raster::{Raster, Snapshot};

/// Which blur to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurMode {
    Motion(Orientation),
    Box,
    Tent,
}

/// Blur `raster` with the given mode and window radius.
pub fn blur(raster: &mut Raster, distance: usize, mode: BlurMode) {
    match mode {
        BlurMode::Motion(orientation) => motion_blur(raster, distance, orientation),
        BlurMode::Box => box_blur(raster, distance),
        BlurMode::Tent => tent_blur(raster, distance),
    }
}

/// Average each pixel with up to `distance` neighbors on either side along
/// one axis.
///
/// Uses a running sum over the window `[j - distance, j + distance]`: the
/// sample leaving the window is subtracted and the one entering is added,
/// so the cost per pixel does not depend on `distance`. Near the edges only
/// in-bounds samples are counted and the divisor shrinks accordingly.
pub fn motion_blur(raster: &mut Raster, distance: usize, orientation: Orientation) {
    let (width, height) = (raster.width(), raster.height());
    debug!(
        "motion blur {:?} distance={} on {}x{}",
        orientation, distance, width, height
    );

    let backup = raster.snapshot();
    let (lines, length) = match orientation {
        Orientation::Vertical => (width, height),
        Orientation::Horizontal => (height, width),
    };
    // a window wider than the line sees the same samples
    let d = distance.min(length) as isize;

    for line in 0..lines {
        let sample = |pos: isize| line_sample(&backup, orientation, line as isize, pos);

        let mut accum = [0u64; 4];
        let mut count = 0u64;
        for p in 0..=d {
            if let Some(px) = sample(p) {
                add(&mut accum, px);
                count += 1;
            }
        }

        for j in 0..length as isize {
            if j > 0 {
                if let Some(px) = sample(j - d - 1) {
                    subtract(&mut accum, px);
                    count -= 1;
                }
                if let Some(px) = sample(j + d) {
                    add(&mut accum, px);
                    count += 1;
                }
            }

            // count >= 1: the window always contains position j itself
            let current = accum.map(|sum| (sum / count) as u8);
            let (x, y) = line_position(orientation, line, j as usize);
            raster.put(x, y, current);
        }
    }
}

/// Separable box blur: vertical motion blur followed by horizontal.
pub fn box_blur(raster: &mut Raster, distance: usize) {
    motion_blur(raster, distance, Orientation::Vertical);
    motion_blur(raster, distance, Orientation::Horizontal);
}

/// Box blur applied twice with the same distance.
pub fn tent_blur(raster: &mut Raster, distance: usize) {
    box_blur(raster, distance);
    box_blur(raster, distance);
}

/// Sample at position `pos` along `line` (a column for vertical, a row for
/// horizontal).
#[inline]
pub(crate) fn line_sample(
    snapshot: &Snapshot,
    orientation: Orientation,
    line: isize,
    pos: isize,
) -> Option<[u8; 4]> {
    match orientation {
        Orientation::Vertical => snapshot.get(line, pos),
        Orientation::Horizontal => snapshot.get(pos, line),
    }
}

#[inline]
pub(crate) fn line_position(orientation: Orientation, line: usize, pos: usize) -> (usize, usize) {
    match orientation {
        Orientation::Vertical => (line, pos),
        Orientation::Horizontal => (pos, line),
    }
}

#[inline]
fn add(accum: &mut [u64; 4], px: [u8; 4]) {
    for (a, v) in accum.iter_mut().zip(px) {
        *a += v as u64;
    }
}

#[inline]
fn subtract(accum: &mut [u64; 4], px: [u8; 4]) {
    for (a, v) in accum.iter_mut().zip(px) {
        *a -= v as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: usize, height: usize, values: &[u8]) -> Raster {
        let data = values.iter().flat_map(|&v| [v, v, v, 255]).collect();
        Raster::new(width, height, data).unwrap()
    }

    fn reds(raster: &Raster) -> Vec<u8> {
        raster.as_bytes().chunks(4).map(|px| px[0]).collect()
    }

    #[test]
    fn test_motion_blur_horizontal_row() {
        let mut raster = gray(3, 1, &[0, 30, 90]);
        motion_blur(&mut raster, 1, Orientation::Horizontal);
        assert_eq!(reds(&raster), vec![15, 40, 60]);
        assert!(raster.as_bytes().chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_motion_blur_vertical_column() {
        let mut raster = gray(1, 4, &[100, 0, 0, 40]);
        motion_blur(&mut raster, 1, Orientation::Vertical);
        // windows: {0,1} {0,1,2} {1,2,3} {2,3}
        assert_eq!(reds(&raster), vec![50, 33, 13, 20]);
    }

    #[test]
    fn test_motion_blur_vertical_leaves_rows_independent() {
        let mut raster = gray(3, 1, &[0, 30, 90]);
        motion_blur(&mut raster, 2, Orientation::Vertical);
        assert_eq!(reds(&raster), vec![0, 30, 90]);
    }

    #[test]
    fn test_motion_blur_zero_distance_is_identity() {
        let values: Vec<u8> = (0..9).map(|v| v * 20).collect();
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            let mut raster = gray(3, 3, &values);
            let original = raster.clone();
            motion_blur(&mut raster, 0, orientation);
            assert_eq!(raster, original);
        }
    }

    #[test]
    fn test_motion_blur_constant_raster() {
        let mut raster = Raster::filled(3, 3, [12, 34, 56, 78]).unwrap();
        let original = raster.clone();
        motion_blur(&mut raster, 1, Orientation::Horizontal);
        assert_eq!(raster, original);
        motion_blur(&mut raster, 0, Orientation::Vertical);
        assert_eq!(raster, original);
    }

    #[test]
    fn test_motion_blur_distance_exceeding_raster() {
        let mut raster = gray(3, 1, &[0, 30, 90]);
        motion_blur(&mut raster, 10, Orientation::Horizontal);
        assert_eq!(reds(&raster), vec![40, 40, 40]);
    }

    #[test]
    fn test_motion_blur_averages_alpha() {
        let mut raster = Raster::new(2, 1, vec![0, 0, 0, 0, 0, 0, 0, 255]).unwrap();
        motion_blur(&mut raster, 1, Orientation::Horizontal);
        assert_eq!(raster.as_bytes(), &[0, 0, 0, 127, 0, 0, 0, 127]);
    }

    #[test]
    fn test_box_blur_zero_distance_is_identity() {
        let values: Vec<u8> = (0..12).map(|v| v * 7).collect();
        let mut raster = gray(4, 3, &values);
        let original = raster.clone();
        box_blur(&mut raster, 0);
        assert_eq!(raster, original);
    }

    #[test]
    fn test_box_blur_center_impulse() {
        let mut raster = gray(3, 3, &[0, 0, 0, 0, 255, 0, 0, 0, 0]);
        box_blur(&mut raster, 1);
        assert_eq!(reds(&raster), vec![63, 42, 63, 42, 28, 42, 63, 42, 63]);
    }

    #[test]
    fn test_tent_blur_is_box_twice() {
        let values: Vec<u8> = (0..25).map(|v| (v * 37 % 256) as u8).collect();
        let mut tent = gray(5, 5, &values);
        let mut boxed = tent.clone();

        tent_blur(&mut tent, 1);
        box_blur(&mut boxed, 1);
        box_blur(&mut boxed, 1);

        assert_eq!(tent, boxed);
    }

    #[test]
    fn test_blur_dispatch() {
        let values: Vec<u8> = (0..16).map(|v| v * 9).collect();
        let mut via_dispatch = gray(4, 4, &values);
        let mut direct = via_dispatch.clone();

        blur(&mut via_dispatch, 2, BlurMode::Motion(Orientation::Horizontal));
        motion_blur(&mut direct, 2, Orientation::Horizontal);

        assert_eq!(via_dispatch, direct);
    }

    #[test]
    fn test_motion_blur_distance_past_line() {
        let values = [0, 30, 90, 120];
        let mut wide = gray(4, 1, &values);
        let mut exact = gray(4, 1, &values);
        motion_blur(&mut wide, usize::MAX, Orientation::Horizontal);
        motion_blur(&mut exact, 4, Orientation::Horizontal);

        assert_eq!(wide, exact);
        assert_eq!(wide, gray(4, 1, &[60, 60, 60, 60]));
    }

    #[test]
    fn test_tent_blur_huge_distance() {
        let mut raster = Raster::filled(2, 2, [40, 80, 120, 255]).unwrap();
        tent_blur(&mut raster, usize::MAX);
        assert_eq!(raster, Raster::filled(2, 2, [40, 80, 120, 255]).unwrap());
    }
}
