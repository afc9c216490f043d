// tests/salience_bounds.rs
//
// The composite salience score stays within [0,5] for any valid grid.

use longform_script_builder::{estimate_salience, salience::SalienceThresholds, PixelGrid};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn score(grid: &PixelGrid) -> u8 {
    estimate_salience(grid, &SalienceThresholds::default()).salience_score
}

#[test]
fn degenerate_grids_stay_in_range() {
    for rgb in [[0.0; 3], [1.0; 3], [0.5; 3], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]] {
        let one = PixelGrid::filled(1, 1, rgb).unwrap();
        assert!(score(&one) <= 5);
        let line = PixelGrid::filled(7, 1, rgb).unwrap();
        assert!(score(&line) <= 5);
    }
}

#[test]
fn random_grids_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(0x5a11_e9ce);
    for _ in 0..64 {
        let w = rng.random_range(1..=24usize);
        let h = rng.random_range(1..=24usize);
        let pixels = (0..w * h)
            .map(|_| [rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>()])
            .collect();
        let grid = PixelGrid::new(w, h, pixels).unwrap();
        let r = estimate_salience(&grid, &SalienceThresholds::default());
        assert!(r.salience_score <= 5);
        for m in [
            r.metrics.edge_density,
            r.metrics.white_ratio,
            r.metrics.black_ratio,
            r.metrics.skin_ratio,
        ] {
            assert!((0.0..=1.0).contains(&m));
        }
        assert!(r.metrics.contrast_std >= 0.0 && r.metrics.contrast_std <= 100.0);
    }
}

#[test]
fn busy_high_contrast_poster_maxes_out() {
    // Skin-toned left half, bright yellow text blocks on black on the right.
    let (w, h) = (32usize, 32usize);
    let pixels = (0..w * h)
        .map(|i| {
            let (x, y) = (i % w, i / w);
            if x < 10 {
                [0.8, 0.6, 0.5]
            } else if (y / 4) % 2 == 0 && x % 6 < 3 {
                [1.0, 0.95, 0.1]
            } else {
                [0.0, 0.0, 0.0]
            }
        })
        .collect();
    let grid = PixelGrid::new(w, h, pixels).unwrap();
    let r = estimate_salience(&grid, &SalienceThresholds::default());
    assert!(r.cues.face_proxy);
    assert!(r.cues.contrast);
    assert!(r.cues.big_text_proxy);
    assert!(r.salience_score >= 3);
    assert!(r.salience_score <= 5);
}
