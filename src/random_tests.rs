#![cfg(test)]

use crate::bench_util::dense_seeded;
use crate::problem::{LPResult, SolverOptions, StandardForm};
use crate::{interior, simplex};

fn objective(problem: &StandardForm, result: &LPResult) -> f64 {
    match result {
        LPResult::Optimum(x) => problem.c.dot(x),
        LPResult::Infeasible => panic!("Got Infeasible on problem generated to be feasible"),
        LPResult::Unbounded => panic!("Got Unbounded on problem generated to be bounded"),
    }
}

fn assert_primal_feasible(problem: &StandardForm, result: &LPResult) {
    if let LPResult::Optimum(x) = result {
        let ax = &problem.a * x;
        for (i, v) in ax.iter().enumerate() {
            assert!((v - problem.b[i]).abs() < 1e-6);
        }
        for &v in x.iter() {
            assert!(v >= 0.0);
        }
    }
}

// Simplex and interior methods reach the same optimal value. The optimal
// point itself need not be unique.
fn same_optimum(rows: usize, cols: usize, seed: u64) {
    let problem = dense_seeded(rows, cols, seed);
    let options = SolverOptions::default();
    let simplex_solution = simplex::solve(problem.clone(), &options)
        .expect("Simplex test failed");
    let interior_solution = interior::solve(problem.clone(), &options)
        .expect("Interior test failed");

    assert_primal_feasible(&problem, &simplex_solution.result);
    assert_primal_feasible(&problem, &interior_solution.result);

    let simplex_value = objective(&problem, &simplex_solution.result);
    let interior_value = objective(&problem, &interior_solution.result);
    assert!((simplex_value - interior_value).abs() < 1e-6 * (1.0 + simplex_value.abs()),
            "simplex {} vs interior {}", simplex_value, interior_value);
}

#[test]
fn dense_5x10() {
    same_optimum(5, 10, 7);
}

#[test]
fn dense_20x40() {
    same_optimum(20, 40, 13_37_58_23);
}

#[test]
fn dense_20x100() {
    same_optimum(20, 100, 1234);
}
