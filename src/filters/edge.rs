//! Edge detection filters: Sobel.
//!
//! The linear Sobel responds to intensity changes across one axis and runs
//! per color channel (no luminance conversion). The combined Sobel merges a
//! vertical and a horizontal pass by gradient magnitude.
//!
//! Samples outside the raster count as zero, so borders of a flat image
//! still produce a response. Negative responses clamp to 0.

use std::str::FromStr;

use log::debug;
use ndarray::Zip;

use super::blur::{line_position, line_sample};
use super::Orientation;
use crate::error::Error;
use crate::raster::Raster;

/// Which Sobel variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SobelMode {
    /// A single linear pass.
    Linear(Orientation),
    /// Magnitude of the vertical and horizontal passes.
    Both,
}

impl FromStr for SobelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "both" => Ok(SobelMode::Both),
            other => other
                .parse()
                .map(SobelMode::Linear)
                .map_err(|_| Error::invalid_parameter("sobel mode", other)),
        }
    }
}

/// Run the Sobel operator selected by `mode`.
pub fn sobel(raster: &mut Raster, mode: SobelMode) {
    match mode {
        SobelMode::Linear(orientation) => linear_sobel(raster, orientation),
        SobelMode::Both => combined_sobel(raster),
    }
}

/// Apply a 3x3 Sobel kernel along one axis.
///
/// For `Vertical`, pixel `(x, y)` receives
/// `P(x+1, y-1) + 2 P(x+1, y) + P(x+1, y+1) - (same for x-1)`, i.e. the
/// kernel that highlights vertical edges; `Horizontal` is the transpose.
///
/// The three-row window is kept as a running sum while sliding along the
/// column (or row): the row leaving is subtracted, the row entering is
/// added, and the center row is added once more for its weight of 2.
///
/// Output is clamped to 0-255 and alpha is set to 255.
pub fn linear_sobel(raster: &mut Raster, orientation: Orientation) {
    let (width, height) = (raster.width(), raster.height());
    debug!("sobel {:?} on {}x{}", orientation, width, height);

    let backup = raster.snapshot();
    let (lines, length) = match orientation {
        Orientation::Vertical => (width, height),
        Orientation::Horizontal => (height, width),
    };

    for line in 0..lines {
        let line = line as isize;
        // Weighted sample pair at one position: right/below minus left/above.
        let across = |pos: isize, accum: &mut [i32; 3], sign: i32| {
            for r in [-1isize, 1] {
                if let Some(px) = line_sample(&backup, orientation, line + r, pos) {
                    for k in 0..3 {
                        accum[k] += sign * r as i32 * px[k] as i32;
                    }
                }
            }
        };

        let mut accum = [0i32; 3];
        across(0, &mut accum, 1);
        across(1, &mut accum, 1);

        for j in 0..length as isize {
            if j > 0 {
                across(j - 2, &mut accum, -1);
                across(j + 1, &mut accum, 1);
            }

            let mut current = accum;
            across(j, &mut current, 1);

            let rgba = [
                current[0].clamp(0, 255) as u8,
                current[1].clamp(0, 255) as u8,
                current[2].clamp(0, 255) as u8,
                255,
            ];
            let (x, y) = line_position(orientation, line as usize, j as usize);
            raster.put(x, y, rgba);
        }
    }
}

/// Gradient magnitude of independent vertical and horizontal Sobel passes.
///
/// Each byte becomes `round(sqrt(gx^2 + gy^2))` clamped to 255. Both passes
/// force alpha to 255, so the merged alpha saturates to 255 as well.
pub fn combined_sobel(raster: &mut Raster) {
    debug!("sobel both on {}x{}", raster.width(), raster.height());

    let mut gx = raster.clone();
    let mut gy = raster.clone();
    linear_sobel(&mut gx, Orientation::Vertical);
    linear_sobel(&mut gy, Orientation::Horizontal);

    Zip::from(raster.view_mut())
        .and(gx.view())
        .and(gy.view())
        .for_each(|out, &a, &b| {
            let (a, b) = (a as f32, b as f32);
            *out = (a * a + b * b).sqrt().round().min(255.0) as u8;
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn gray(width: usize, height: usize, values: &[u8]) -> Raster {
        let data = values.iter().flat_map(|&v| [v, v, v, 255]).collect();
        Raster::new(width, height, data).unwrap()
    }

    fn reds(raster: &Raster) -> Vec<u8> {
        raster.as_bytes().chunks(4).map(|px| px[0]).collect()
    }

    fn transpose(raster: &Raster) -> Raster {
        let array: Array3<u8> = raster.view().permuted_axes([1, 0, 2]).to_owned();
        Raster::from_array(array).unwrap()
    }

    #[test]
    fn test_linear_sobel_step_edge() {
        let mut raster = gray(4, 1, &[0, 0, 100, 100]);
        linear_sobel(&mut raster, Orientation::Vertical);
        // Single row: only the center weight of 2 applies.
        assert_eq!(reds(&raster), vec![0, 200, 200, 0]);
    }

    #[test]
    fn test_linear_sobel_clamps_and_sets_alpha() {
        let mut raster = Raster::new(
            3,
            1,
            vec![
                0, 0, 0, 10, //
                200, 0, 0, 20, //
                0, 0, 0, 30,
            ],
        )
        .unwrap();
        linear_sobel(&mut raster, Orientation::Vertical);
        assert_eq!(
            raster.as_bytes(),
            &[
                255, 0, 0, 255, // 2 * 200 clamps
                0, 0, 0, 255, //
                0, 0, 0, 255, // -400 clamps
            ]
        );
    }

    #[test]
    fn test_linear_sobel_uniform_zero_padding() {
        let mut raster = Raster::filled(3, 3, [10, 10, 10, 255]).unwrap();
        linear_sobel(&mut raster, Orientation::Vertical);
        assert_eq!(reds(&raster), vec![30, 0, 0, 40, 0, 0, 30, 0, 0]);

        let mut raster = Raster::filled(3, 3, [10, 10, 10, 255]).unwrap();
        linear_sobel(&mut raster, Orientation::Horizontal);
        assert_eq!(reds(&raster), vec![30, 40, 30, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_linear_sobel_matches_direct_kernel() {
        let values: Vec<u8> = (0..30).map(|v| (v * 53 % 97) as u8).collect();
        let (width, height) = (6, 5);
        let original = gray(width, height, &values);
        let mut raster = original.clone();
        linear_sobel(&mut raster, Orientation::Vertical);

        let at = |x: isize, y: isize| original.pixel(x, y).map(|px| px[0] as i32).unwrap_or(0);
        for y in 0..height as isize {
            for x in 0..width as isize {
                let g = (at(x + 1, y - 1) + 2 * at(x + 1, y) + at(x + 1, y + 1))
                    - (at(x - 1, y - 1) + 2 * at(x - 1, y) + at(x - 1, y + 1));
                assert_eq!(
                    raster.pixel(x, y).unwrap()[0] as i32,
                    g.clamp(0, 255),
                    "pixel ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_linear_sobel_horizontal_is_transpose_of_vertical() {
        let values: Vec<u8> = (0..20).map(|v| (v * 29 % 113) as u8).collect();
        let original = gray(5, 4, &values);

        let mut horizontal = original.clone();
        linear_sobel(&mut horizontal, Orientation::Horizontal);

        let mut vertical = transpose(&original);
        linear_sobel(&mut vertical, Orientation::Vertical);

        assert_eq!(horizontal, transpose(&vertical));
    }

    #[test]
    fn test_combined_sobel_uniform_raster() {
        let mut raster = Raster::filled(3, 3, [10, 10, 10, 255]).unwrap();
        sobel(&mut raster, SobelMode::Both);

        // Interior is flat; borders see the zero padding.
        assert_eq!(reds(&raster), vec![42, 40, 30, 40, 0, 0, 30, 0, 0]);
        assert!(raster.as_bytes().chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_combined_sobel_black_is_zero() {
        let mut raster = Raster::filled(4, 4, [0, 0, 0, 0]).unwrap();
        sobel(&mut raster, SobelMode::Both);
        for px in raster.as_bytes().chunks(4) {
            assert_eq!(px, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_combined_sobel_single_pixel() {
        let mut raster = Raster::filled(1, 1, [200, 100, 50, 7]).unwrap();
        sobel(&mut raster, SobelMode::Both);
        assert_eq!(raster.as_bytes(), &[0, 0, 0, 255]);
    }

    #[test]
    fn test_parse_sobel_mode() {
        assert_eq!("both".parse::<SobelMode>().unwrap(), SobelMode::Both);
        assert_eq!(
            "horizontal".parse::<SobelMode>().unwrap(),
            SobelMode::Linear(Orientation::Horizontal)
        );
        assert!("diagonal".parse::<SobelMode>().is_err());
    }
}
