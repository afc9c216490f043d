// src/salience.rs
//! Thumbnail visual-salience estimate from a decoded RGB grid with channels in [0,1].
//!
//! Pipeline: luma → contrast (std·100) → Sobel magnitude with replicated borders →
//! adaptive edge threshold → white/black ratios → mean-channel color dominance →
//! HSV skin mask → composite 0..=5 score.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

const SKIN_HUE_LOW: (f64, f64) = (0.0, 0.14);
const SKIN_HUE_HIGH: (f64, f64) = (0.9, 1.0);
const SKIN_SAT: (f64, f64) = (0.1, 0.7);
const SKIN_VAL: (f64, f64) = (0.2, 0.95);

const MAX_SCORE: u8 = 5;

/// Numeric cut-offs of the estimator. Defaults are the calibrated values; the
/// `[salience]` table of the heuristics config may override any of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalienceThresholds {
    /// Longer side after downscaling, in pixels.
    pub max_side: u32,
    pub edge_floor: f64,
    pub edge_sigma: f64,
    /// Edge density above this adds one point.
    pub edge_bonus: f64,
    /// `contrast_std` at or above this counts as a contrast cue.
    pub contrast_cue: f64,
    pub white_luma: f64,
    pub black_luma: f64,
    pub big_text_ratio: f64,
    pub face_skin_ratio: f64,
    pub channel_floor: f64,
    pub channel_margin: f64,
    pub yellow_margin: f64,
}

impl Default for SalienceThresholds {
    fn default() -> Self {
        Self {
            max_side: 512,
            edge_floor: 0.2,
            edge_sigma: 1.5,
            edge_bonus: 0.08,
            contrast_cue: 12.0,
            white_luma: 0.85,
            black_luma: 0.15,
            big_text_ratio: 0.12,
            face_skin_ratio: 0.12,
            channel_floor: 0.4,
            channel_margin: 0.05,
            yellow_margin: 0.1,
        }
    }
}

/// Row-major RGB grid. Construction validates the shape and clamps channels to [0,1].
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 3]>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize, pixels: Vec<[f32; 3]>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidGrid(format!(
                "empty dimensions {width}x{height}"
            )));
        }
        if pixels.len() != width * height {
            return Err(EngineError::InvalidGrid(format!(
                "{} pixels for {width}x{height}",
                pixels.len()
            )));
        }
        let pixels = pixels
            .into_iter()
            .map(|p| p.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) }))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Interleaved 8-bit RGB, as produced by most decoders.
    pub fn from_rgb8(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != width * height * 3 {
            return Err(EngineError::InvalidGrid(format!(
                "{} bytes for {width}x{height} RGB",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]].map(|v| v as f32 / 255.0))
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn filled(width: usize, height: usize, rgb: [f32; 3]) -> Result<Self> {
        Self::new(width, height, vec![rgb; width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[[f32; 3]] {
        &self.pixels
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SalienceMetrics {
    pub contrast_std: f64,
    pub edge_density: f64,
    pub white_ratio: f64,
    pub black_ratio: f64,
    pub skin_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalienceCues {
    pub face_proxy: bool,
    pub contrast: bool,
    pub big_text_proxy: bool,
    pub red_pop: bool,
    pub yellow_pop: bool,
    pub blue_pop: bool,
    pub color_pop: bool,
    pub edge_bonus: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelSalienceResult {
    pub metrics: SalienceMetrics,
    pub cues: SalienceCues,
    /// 0..=5
    pub salience_score: u8,
}

pub fn luma(rgb: [f32; 3]) -> f64 {
    0.2126 * rgb[0] as f64 + 0.7152 * rgb[1] as f64 + 0.0722 * rgb[2] as f64
}

/// Population mean and standard deviation; (0, 0) for an empty slice.
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.max(0.0).sqrt())
}

fn fraction(values: &[f64], pred: impl Fn(f64) -> bool) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| pred(**v)).count() as f64 / values.len() as f64
}

/// Sobel gradient magnitude with edge-replicated padding.
pub fn sobel_magnitude(luma: &[f64], width: usize, height: usize) -> Vec<f64> {
    let at = |x: isize, y: isize| -> f64 {
        let xc = x.clamp(0, width as isize - 1) as usize;
        let yc = y.clamp(0, height as isize - 1) as usize;
        luma[yc * width + xc]
    };
    // Weighted 1-2-1 sums taken in the same order on both sides, so flat input cancels to 0.
    let weighted = |a: f64, b: f64, c: f64| a + 2.0 * b + c;

    let mut out = Vec::with_capacity(width * height);
    for y in 0..height as isize {
        for x in 0..width as isize {
            let left = weighted(at(x - 1, y - 1), at(x - 1, y), at(x - 1, y + 1));
            let right = weighted(at(x + 1, y - 1), at(x + 1, y), at(x + 1, y + 1));
            let top = weighted(at(x - 1, y - 1), at(x, y - 1), at(x + 1, y - 1));
            let bottom = weighted(at(x - 1, y + 1), at(x, y + 1), at(x + 1, y + 1));
            let (gx, gy) = (left - right, top - bottom);
            out.push((gx * gx + gy * gy).sqrt());
        }
    }
    out
}

/// HSV with all components in [0,1]; hue wraps.
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let v = maxc;
    if maxc == minc {
        return (0.0, 0.0, v);
    }
    let span = maxc - minc;
    let s = span / maxc;
    let rc = (maxc - r) / span;
    let gc = (maxc - g) / span;
    let bc = (maxc - b) / span;
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), s, v)
}

fn in_range(x: f64, (lo, hi): (f64, f64)) -> bool {
    (lo..=hi).contains(&x)
}

fn is_skin(rgb: [f32; 3]) -> bool {
    let (h, s, v) = rgb_to_hsv(rgb[0] as f64, rgb[1] as f64, rgb[2] as f64);
    (in_range(h, SKIN_HUE_LOW) || in_range(h, SKIN_HUE_HIGH))
        && in_range(s, SKIN_SAT)
        && in_range(v, SKIN_VAL)
}

fn channel_means(pixels: &[[f32; 3]]) -> [f64; 3] {
    let n = pixels.len().max(1) as f64;
    let mut acc = [0.0f64; 3];
    for p in pixels {
        for (a, c) in acc.iter_mut().zip(p) {
            *a += *c as f64;
        }
    }
    acc.map(|a| a / n)
}

pub fn estimate_salience(grid: &PixelGrid, t: &SalienceThresholds) -> PixelSalienceResult {
    let lumas: Vec<f64> = grid.pixels.iter().map(|p| luma(*p)).collect();

    let (_, luma_std) = mean_std(&lumas);
    let contrast_std = luma_std * 100.0;

    let grad = sobel_magnitude(&lumas, grid.width, grid.height);
    let (g_mean, g_std) = mean_std(&grad);
    let edge_threshold = t.edge_floor.max(g_mean + t.edge_sigma * g_std);
    let edge_density = fraction(&grad, |g| g > edge_threshold);

    let white_ratio = fraction(&lumas, |l| l > t.white_luma);
    let black_ratio = fraction(&lumas, |l| l < t.black_luma);

    let [r, g, b] = channel_means(&grid.pixels);
    let red_pop = r > t.channel_floor && r - g > t.channel_margin && r - b > t.channel_margin;
    let blue_pop = b > t.channel_floor && b - r > t.channel_margin && b - g > t.channel_margin;
    let yellow_pop = r > t.channel_floor
        && g > t.channel_floor
        && r - b > t.yellow_margin
        && g - b > t.yellow_margin;
    let color_pop = red_pop || yellow_pop || blue_pop;

    let skin = grid.pixels.iter().filter(|p| is_skin(**p)).count();
    let skin_ratio = skin as f64 / grid.pixels.len().max(1) as f64;

    let cues = SalienceCues {
        face_proxy: skin_ratio >= t.face_skin_ratio,
        contrast: contrast_std >= t.contrast_cue,
        big_text_proxy: white_ratio > t.big_text_ratio || black_ratio > t.big_text_ratio,
        red_pop,
        yellow_pop,
        blue_pop,
        color_pop,
        edge_bonus: edge_density > t.edge_bonus,
    };
    let score = [
        cues.face_proxy,
        cues.contrast,
        cues.big_text_proxy,
        cues.color_pop,
        cues.edge_bonus,
    ]
    .iter()
    .filter(|c| **c)
    .count() as u8;

    PixelSalienceResult {
        metrics: SalienceMetrics {
            contrast_std,
            edge_density,
            white_ratio,
            black_ratio,
            skin_ratio,
        },
        cues,
        salience_score: score.min(MAX_SCORE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> SalienceThresholds {
        SalienceThresholds::default()
    }

    #[test]
    fn grid_rejects_bad_shapes_and_clamps() {
        assert!(PixelGrid::new(0, 3, vec![]).is_err());
        assert!(PixelGrid::new(2, 2, vec![[0.0; 3]; 3]).is_err());
        assert!(PixelGrid::from_rgb8(1, 1, &[1, 2]).is_err());

        let g = PixelGrid::new(1, 1, vec![[1.5, -0.2, f32::NAN]]).unwrap();
        assert_eq!(g.pixels()[0], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn hsv_matches_reference_points() {
        assert_eq!(rgb_to_hsv(0.0, 0.0, 0.0), (0.0, 0.0, 0.0));
        let (h, s, v) = rgb_to_hsv(1.0, 0.0, 0.0);
        assert_eq!((h, s, v), (0.0, 1.0, 1.0));
        let (h, _, _) = rgb_to_hsv(0.0, 0.0, 1.0);
        assert!((h - 2.0 / 3.0).abs() < 1e-12);
        let (h, _, _) = rgb_to_hsv(1.0, 0.0, 0.5);
        assert!(h > 0.9 && h < 1.0);
    }

    #[test]
    fn sobel_is_flat_on_uniform_and_single_pixel() {
        assert_eq!(sobel_magnitude(&[0.7], 1, 1), vec![0.0]);
        assert!(sobel_magnitude(&[0.3; 12], 4, 3).iter().all(|g| *g == 0.0));
        let odd = [0.1 + 0.2; 25];
        assert!(sobel_magnitude(&odd, 5, 5).iter().all(|g| *g == 0.0));
    }

    #[test]
    fn sobel_responds_to_a_vertical_step() {
        // Columns 0..2 dark, 2..4 bright: the seam columns see |gx| = 4.
        let luma: Vec<f64> = (0..16).map(|i| if i % 4 < 2 { 0.0 } else { 1.0 }).collect();
        let g = sobel_magnitude(&luma, 4, 4);
        for row in g.chunks(4) {
            assert_eq!(row, [0.0, 4.0, 4.0, 0.0]);
        }
    }

    #[test]
    fn all_black_scores_only_big_text() {
        let r = estimate_salience(&PixelGrid::filled(16, 9, [0.0; 3]).unwrap(), &t());
        assert_eq!(r.metrics.black_ratio, 1.0);
        assert_eq!(r.metrics.contrast_std, 0.0);
        assert_eq!(r.metrics.edge_density, 0.0);
        assert_eq!(r.metrics.skin_ratio, 0.0);
        assert!(r.cues.big_text_proxy);
        assert_eq!(r.salience_score, 1);
    }

    #[test]
    fn all_white_scores_only_big_text() {
        let r = estimate_salience(&PixelGrid::filled(8, 8, [1.0; 3]).unwrap(), &t());
        assert_eq!(r.metrics.white_ratio, 1.0);
        assert_eq!(r.salience_score, 1);
    }

    #[test]
    fn mid_gray_single_pixel_scores_zero() {
        let r = estimate_salience(&PixelGrid::filled(1, 1, [0.5; 3]).unwrap(), &t());
        assert_eq!(r.salience_score, 0);
    }

    #[test]
    fn saturated_red_pops_but_is_not_skin() {
        let r = estimate_salience(&PixelGrid::filled(4, 4, [0.9, 0.1, 0.1]).unwrap(), &t());
        assert!(r.cues.red_pop);
        assert!(!r.cues.blue_pop);
        assert!(r.cues.color_pop);
        assert_eq!(r.metrics.skin_ratio, 0.0);
        assert_eq!(r.salience_score, 1);
    }

    #[test]
    fn skin_tone_triggers_face_proxy() {
        let r = estimate_salience(&PixelGrid::filled(6, 6, [0.8, 0.6, 0.5]).unwrap(), &t());
        assert_eq!(r.metrics.skin_ratio, 1.0);
        assert!(r.cues.face_proxy);
        assert!(r.cues.red_pop);
        assert_eq!(r.salience_score, 2);
    }

    #[test]
    fn hard_split_has_contrast_big_text_and_edges() {
        let (w, h) = (8usize, 8usize);
        let pixels = (0..w * h)
            .map(|i| if i % w < w / 2 { [0.0; 3] } else { [1.0; 3] })
            .collect();
        let r = estimate_salience(&PixelGrid::new(w, h, pixels).unwrap(), &t());
        assert!((r.metrics.contrast_std - 50.0).abs() < 1e-9);
        assert!((r.metrics.edge_density - 0.25).abs() < 1e-12);
        assert!(r.cues.contrast);
        assert!(r.cues.big_text_proxy);
        assert!(r.cues.edge_bonus);
        assert!(!r.cues.color_pop);
        assert_eq!(r.salience_score, 3);
    }

    #[test]
    fn contrast_cut_off_is_configurable() {
        let pixels = (0..16)
            .map(|i| if i % 2 == 0 { [0.45; 3] } else { [0.55; 3] })
            .collect();
        let grid = PixelGrid::new(4, 4, pixels).unwrap();
        let strict = estimate_salience(&grid, &t());
        assert!(!strict.cues.contrast);

        let lax = SalienceThresholds {
            contrast_cue: 4.0,
            ..t()
        };
        assert!(estimate_salience(&grid, &lax).cues.contrast);
    }
}
