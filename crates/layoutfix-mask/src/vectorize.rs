//! Mask to polygon conversion
//!
//! A detection mask is usually noisy: several fragments, ragged edges,
//! single-pixel bridges. [`vectorize_mask`] grows the mask until its
//! fragments join, drops what is left of the noise and simplifies the
//! outline until it is a valid simple polygon. Outlines too small to
//! survive simplification are kept as traced.

use crate::contour::external_contours;
use crate::error::{MaskError, MaskResult};
use crate::mask::Mask;
use crate::morph::dilate;
use crate::sel::Sel;
use layoutfix_core::Polygon;
use log::debug;
use serde::{Deserialize, Serialize};

/// Options for [`vectorize_mask`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizeOptions {
    /// Contours below this share of the total contour area are noise
    pub min_fragment_area_fraction: f64,
    /// Maximum number of dilation rounds
    pub max_dilation_rounds: u32,
    /// Smallest structuring element size (odd, at least 3)
    pub min_kernel_size: u32,
    /// First simplification tolerance tried
    pub initial_tolerance: f64,
    /// Tolerance increment between simplification attempts
    pub tolerance_step: f64,
}

impl Default for VectorizeOptions {
    fn default() -> Self {
        Self {
            min_fragment_area_fraction: 0.1,
            max_dilation_rounds: 10,
            min_kernel_size: 3,
            initial_tolerance: 2.0,
            tolerance_step: 1.0,
        }
    }
}

impl VectorizeOptions {
    /// Set the minimum fragment area fraction
    pub fn with_min_fragment_area_fraction(mut self, fraction: f64) -> Self {
        self.min_fragment_area_fraction = fraction;
        self
    }

    /// Set the maximum number of dilation rounds
    pub fn with_max_dilation_rounds(mut self, rounds: u32) -> Self {
        self.max_dilation_rounds = rounds;
        self
    }

    /// Set the minimum structuring element size
    pub fn with_min_kernel_size(mut self, size: u32) -> Self {
        self.min_kernel_size = size;
        self
    }

    /// Check the option values
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidParameters`] for a fraction outside
    /// [0, 1), zero dilation rounds or non-positive tolerances.
    pub fn validate(&self) -> MaskResult<()> {
        if !(0.0..1.0).contains(&self.min_fragment_area_fraction) {
            return Err(MaskError::InvalidParameters(format!(
                "min_fragment_area_fraction must be in [0, 1), got {}",
                self.min_fragment_area_fraction
            )));
        }
        if self.max_dilation_rounds == 0 {
            return Err(MaskError::InvalidParameters(
                "max_dilation_rounds must be at least 1".to_string(),
            ));
        }
        if self.initial_tolerance <= 0.0 || self.tolerance_step <= 0.0 {
            return Err(MaskError::InvalidParameters(format!(
                "tolerances must be positive: initial {}, step {}",
                self.initial_tolerance, self.tolerance_step
            )));
        }
        Ok(())
    }
}

/// A vectorized mask
#[derive(Debug, Clone, PartialEq)]
pub struct Vectorized {
    /// The valid, simplified outline (open ring)
    pub polygon: Polygon,
    /// Structuring element size used for dilation
    pub scale: u32,
    /// Number of dilation rounds applied
    pub rounds: u32,
    /// Simplification tolerance that produced the valid outline, or 0 if
    /// the traced outline was kept because simplifying collapsed it
    pub tolerance: f64,
}

/// Structuring element size for a mask of `area` foreground pixels.
///
/// One tenth of the square root of the area, rounded down and then up to
/// the next odd number, and never below `min_size`.
pub fn structuring_scale(area: u64, min_size: u32) -> u32 {
    let scale = ((area as f64).sqrt() / 10.0).floor() as u32;
    let scale = scale + (scale + 1) % 2;
    let min_odd = min_size.max(1) | 1;
    scale.max(min_odd)
}

/// Convert a binary mask into one valid simplified polygon.
///
/// # Errors
///
/// - [`MaskError::EmptyMask`] if the mask has no foreground area
/// - [`MaskError::NonContiguousMask`] if more than one significant fragment
///   remains after dilation and noise removal
/// - [`MaskError::InvalidGeometry`] if neither the traced outline nor any
///   simplification of it is a valid polygon
pub fn vectorize_mask(mask: &Mask, options: &VectorizeOptions) -> MaskResult<Vectorized> {
    options.validate()?;

    let area = mask.count_pixels();
    if area == 0 {
        return Err(MaskError::EmptyMask);
    }
    let scale = structuring_scale(area, options.min_kernel_size);
    let sel = Sel::create_square(scale)?;

    let mut grown = mask.clone();
    let mut contours = Vec::new();
    let mut rounds = 0;
    while rounds < options.max_dilation_rounds {
        grown = dilate(&grown, &sel);
        rounds += 1;
        contours = external_contours(&grown);
        debug!(
            "dilation round {} (scale {}): {} contours",
            rounds,
            scale,
            contours.len()
        );
        if contours.len() == 1 {
            break;
        }
    }

    let areas: Vec<f64> = contours.iter().map(|c| c.area()).collect();
    let total: f64 = areas.iter().sum();
    if total <= 0.0 {
        return Err(MaskError::EmptyMask);
    }
    let mut kept = contours
        .iter()
        .zip(areas.iter())
        .filter(|(_, a)| **a / total >= options.min_fragment_area_fraction)
        .map(|(c, _)| c);
    let contour = kept.next().ok_or(MaskError::EmptyMask)?;
    let extra = kept.count();
    if extra > 0 {
        return Err(MaskError::NonContiguousMask {
            fragments: extra + 1,
        });
    }

    let traced = contour.to_polygon()?;
    // Thin or tiny outlines may collapse under simplification; the traced
    // ring is the fallback as long as it is valid itself
    let fallback = traced.is_valid().then(|| traced.clone());
    let mut polygon = traced;
    let max_tolerance = (area as f64).max(options.initial_tolerance);
    let mut tolerance = options.initial_tolerance;
    while tolerance <= max_tolerance {
        let Ok(simplified) = polygon.simplify(tolerance) else {
            debug!("outline collapses at tolerance {}", tolerance);
            break;
        };
        polygon = simplified;
        if polygon.is_valid() {
            debug!(
                "vectorized mask of {} pixels: {} vertices at tolerance {}",
                area,
                polygon.len(),
                tolerance
            );
            return Ok(Vectorized {
                polygon,
                scale,
                rounds,
                tolerance,
            });
        }
        tolerance += options.tolerance_step;
    }
    match fallback {
        Some(polygon) => {
            debug!(
                "keeping unsimplified outline of {} vertices for mask of {} pixels",
                polygon.len(),
                area
            );
            Ok(Vectorized {
                polygon,
                scale,
                rounds,
                tolerance: 0.0,
            })
        }
        None => Err(MaskError::InvalidGeometry {
            max_tolerance: tolerance.min(max_tolerance),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutfix_core::BoundingBox;

    fn mask_with(width: u32, height: u32, rects: &[(i32, i32, i32, i32)]) -> Mask {
        let mut m = Mask::new(width, height).unwrap();
        for &(x, y, w, h) in rects {
            m.fill_rect(&BoundingBox::new_unchecked(x, y, w, h));
        }
        m
    }

    #[test]
    fn test_structuring_scale() {
        assert_eq!(structuring_scale(1, 1), 1);
        assert_eq!(structuring_scale(200, 1), 1);
        assert_eq!(structuring_scale(200, 3), 3);
        assert_eq!(structuring_scale(400, 1), 3);
        assert_eq!(structuring_scale(10_000, 3), 11);
        assert_eq!(structuring_scale(8_100, 4), 9);
        assert_eq!(structuring_scale(100, 4), 5);
    }

    #[test]
    fn test_single_block() {
        let m = mask_with(60, 60, &[(10, 10, 30, 20)]);
        let v = vectorize_mask(&m, &VectorizeOptions::default()).unwrap();
        assert_eq!(v.rounds, 1);
        assert_eq!(v.scale, 3);
        assert_eq!(v.polygon.len(), 4);
        assert!(v.polygon.is_valid());
        // Grown by one pixel on every side
        assert_eq!(v.polygon.bounds(), (9.0, 9.0, 40.0, 30.0));
    }

    #[test]
    fn test_empty_mask() {
        let m = Mask::new(10, 10).unwrap();
        let err = vectorize_mask(&m, &VectorizeOptions::default()).unwrap_err();
        assert!(matches!(err, MaskError::EmptyMask));
    }

    #[test]
    fn test_noise_fragment_dropped() {
        // A big block plus a speck far away that never joins it
        let m = mask_with(120, 60, &[(5, 5, 40, 40), (110, 50, 2, 2)]);
        let opts = VectorizeOptions::default().with_max_dilation_rounds(2);
        let v = vectorize_mask(&m, &opts).unwrap();
        assert_eq!(v.rounds, 2);
        let (x0, _, x1, _) = v.polygon.bounds();
        assert!(x0 < 10.0 && x1 < 60.0);
    }

    #[test]
    fn test_single_pixel_keeps_traced_outline() {
        // The 3x3 dilated pixel has a ring of side 2 that collapses at
        // tolerance 2
        let m = mask_with(20, 20, &[(5, 5, 1, 1)]);
        let v = vectorize_mask(&m, &VectorizeOptions::default()).unwrap();
        assert_eq!(v.tolerance, 0.0);
        assert_eq!(v.polygon.len(), 4);
        assert_eq!(v.polygon.bounds(), (4.0, 4.0, 6.0, 6.0));
        assert!(v.polygon.is_valid());
    }

    #[test]
    fn test_invalid_options() {
        let m = mask_with(10, 10, &[(2, 2, 3, 3)]);
        let opts = VectorizeOptions::default().with_max_dilation_rounds(0);
        assert!(matches!(
            vectorize_mask(&m, &opts),
            Err(MaskError::InvalidParameters(_))
        ));
    }
}
