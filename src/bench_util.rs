#![cfg(test)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rulinalg::matrix::{BaseMatrix, Matrix};
use rulinalg::vector::Vector;

use crate::problem::StandardForm;

// Generate a random dense LP problem with the specified size and seed.
// b = A x0 for a strictly positive x0, so the problem is feasible, and
// c = A^T y0 + s0 for a strictly positive s0, so it is bounded.
pub fn dense_seeded(rows: usize, cols: usize, seed: u64) -> StandardForm {
    assert!(rows <= cols);
    let mut rng = StdRng::seed_from_u64(seed);

    // Random matrices have full rank with probability 1.
    let a_data: Vec<f64> = (0..rows * cols)
        .map(|_| rng.gen_range(-1.0..1.0))
        .collect();
    let a = Matrix::new(rows, cols, a_data);

    let x0 = Vector::new((0..cols).map(|_| rng.gen_range(0.01..1.0)).collect::<Vec<f64>>());
    let b = &a * &x0;

    let y0 = Vector::new((0..rows).map(|_| rng.gen_range(-1.0..1.0)).collect::<Vec<f64>>());
    let s0 = Vector::new((0..cols).map(|_| rng.gen_range(0.01..1.0)).collect::<Vec<f64>>());
    let c = a.transpose() * &y0 + s0;

    StandardForm { a, b, c }
}
