//! Utilities for generating example, benchmark, and test inputs.

use rand::Rng;

use crate::Point;

/// Generates `n` sites uniformly distributed in the closed disk of radius
/// `radius` around the origin, sorted and de-duplicated under `eps`.
///
/// Points are drawn until `n` distinct ones survive de-duplication, so `eps`
/// must be small compared to the typical spacing `radius / sqrt(n)` or this
/// will spin for a long time.
pub fn disk_sites<R: Rng + ?Sized>(rng: &mut R, n: usize, radius: f64, eps: f64) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(n);
    while out.len() < n {
        for _ in 0..(n - out.len()) {
            let theta = rng.gen_range(0.0..std::f64::consts::TAU);
            // The square root makes the radius distribution uniform in area.
            let r = radius * rng.gen::<f64>().sqrt();
            out.push(Point::new(r * theta.cos(), r * theta.sin()));
        }
        crate::sort_sites(&mut out, eps);
    }
    out
}

/// Generates a `k` by `k` grid of sites with spacing `1`, each perturbed by
/// at most `jitter` in both coordinates, sorted and de-duplicated under
/// `eps`.
///
/// Grids exercise the degenerate paths (shared coordinates, co-circular
/// quadruples); the jitter dial moves the input smoothly between the fully
/// degenerate and the generic case.
pub fn jittered_grid<R: Rng + ?Sized>(rng: &mut R, k: usize, jitter: f64, eps: f64) -> Vec<Point> {
    let mut out = Vec::with_capacity(k * k);
    for i in 0..k {
        for j in 0..k {
            let dx = if jitter > 0.0 {
                rng.gen_range(-jitter..=jitter)
            } else {
                0.0
            };
            let dy = if jitter > 0.0 {
                rng.gen_range(-jitter..=jitter)
            } else {
                0.0
            };
            out.push(Point::new(i as f64 + dx, j as f64 + dy));
        }
    }
    crate::sort_sites(&mut out, eps);
    out
}
