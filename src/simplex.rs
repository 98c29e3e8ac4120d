use std::collections::HashSet;

use log::{debug, trace};
use rulinalg::matrix::{BaseMatrix, Matrix};
use rulinalg::vector::Vector;

use crate::error::Error;
use crate::problem::*;

#[derive(Debug, Clone)]
struct SimplexState {
    basis: Vec<usize>,
    x_b: Vector<f64>,
    problem: StandardForm,
}

fn column(a: &Matrix<f64>, j: usize) -> Vector<f64> {
    Vector::new((0..a.rows()).map(|i| a[[i, j]]).collect::<Vec<f64>>())
}

impl SimplexState {
    // Implementation following https://en.wikipedia.org/wiki/Revised_simplex_method
    fn from_basis(problem: StandardForm, basis: &[usize])
        -> Result<SimplexState, Error> {
        let mat_b = problem.a.select_cols(basis.iter());

        let x_b = mat_b.solve(problem.b.clone())?;

        Ok(
            SimplexState {
                basis: basis.to_vec(),
                x_b,
                problem,
            }
        )
    }

    fn nonbasis(&self) -> Vec<usize> {
        let basis_indices: HashSet<usize> = self.basis.iter().cloned().collect();
        (0..self.problem.a.cols())
            .filter(|i| !basis_indices.contains(i))
            .collect()
    }

    fn objective(&self) -> f64 {
        self.problem.c.select(&self.basis).dot(&self.x_b)
    }

    fn point(&self) -> Vector<f64> {
        let mut x = vec![0.0; self.problem.a.cols()];
        for (i, &idx) in self.basis.iter().enumerate() {
            // Round-off can leave basic values a hair below zero.
            x[idx] = self.x_b[i].max(0.0);
        }
        Vector::new(x)
    }

    // Column to bring into the basis, or None at an optimal vertex.
    // Bland's rule: the lowest index with a negative reduced cost enters.
    fn entering(&self, tol: f64) -> Result<Option<usize>, Error> {
        let nonbasis_indices = self.nonbasis();
        if nonbasis_indices.is_empty() {
            return Ok(None);
        }

        let c_b = self.problem.c.select(&self.basis);
        let c_n = self.problem.c.select(&nonbasis_indices);
        let mat_b = self.problem.a.select_cols(self.basis.iter());
        let mat_n = self.problem.a.select_cols(nonbasis_indices.iter());
        let lambda = mat_b.transpose().solve(c_b)?;
        let s_n = c_n - mat_n.transpose() * lambda;

        Ok(nonbasis_indices.iter()
            .zip(s_n.iter())
            .find(|&(_, &s)| s < -tol)
            .map(|(&idx, _)| idx))
    }

    // Pivots column q into the basis in place. Returns Unbounded when no
    // row limits the entering column.
    fn pivot(&mut self, q: usize, tol: f64) -> Result<Option<LPResult>, Error> {
        let mat_b = self.problem.a.select_cols(self.basis.iter());
        let d = mat_b.solve(column(&self.problem.a, q))?;

        // Ratio test, ties go to the lowest basic index.
        let mut leaving: Option<(usize, f64)> = None;
        for (i, &var) in self.basis.iter().enumerate() {
            if d[i] > tol {
                let ratio = self.x_b[i] / d[i];
                let better = match leaving {
                    None => true,
                    Some((j, r)) => {
                        ratio < r - tol
                            || ((ratio - r).abs() <= tol && var < self.basis[j])
                    },
                };
                if better {
                    leaving = Some((i, ratio));
                }
            }
        }

        let (i_p, x_q) = match leaving {
            None => return Ok(Some(LPResult::Unbounded)),
            Some((i, ratio)) => (i, ratio.max(0.0)),
        };
        trace!("column {} enters, column {} leaves, step {:e}", q, self.basis[i_p], x_q);

        self.x_b -= d * x_q;
        self.x_b[i_p] = x_q;
        self.basis[i_p] = q;

        Ok(None)
    }

    fn optimize(&mut self, options: &SolverOptions, iterations: &mut usize)
        -> Result<LPResult, Error> {
        loop {
            let q = match self.entering(options.tol)? {
                Some(q) => q,
                None => return Ok(LPResult::Optimum(self.point())),
            };
            if *iterations >= options.max_iter {
                return Err(Error::IterationLimit(*iterations));
            }
            if let Some(result) = self.pivot(q, options.tol)? {
                return Ok(result);
            }
            *iterations += 1;
        }
    }

    // Replaces artificial columns still in the basis (at zero level) by
    // original columns. Returns the rows for which no replacement exists;
    // those rows are linear combinations of the others.
    fn drive_out_artificials(&mut self, num_original: usize, tol: f64)
        -> Result<Vec<usize>, Error> {
        let rows = self.problem.a.rows();
        let mut redundant = Vec::new();
        for i in 0..rows {
            let artificial = self.basis[i];
            if artificial < num_original {
                continue;
            }

            // Row i of B^-1, applied to each candidate column.
            let mut e_i = vec![0.0; rows];
            e_i[i] = 1.0;
            let mat_b = self.problem.a.select_cols(self.basis.iter());
            let r = mat_b.transpose().solve(Vector::new(e_i))?;

            let replacement = self.nonbasis()
                .into_iter()
                .filter(|&j| j < num_original)
                .find(|&j| column(&self.problem.a, j).dot(&r).abs() > tol);

            match replacement {
                Some(j) => {
                    trace!("artificial column {} replaced by {}", artificial, j);
                    self.basis[i] = j;
                },
                None => redundant.push(artificial - num_original),
            }
        }
        Ok(redundant)
    }
}

fn phase1_start(problem: &StandardForm) -> Result<SimplexState, Error> {
    let num_rows = problem.a.rows();
    let num_cols = problem.a.cols();

    // One artificial column per row, signed so that the artificial basis
    // starts at |b|.
    let mut phase1_a_data = Vec::with_capacity(num_rows * (num_cols + num_rows));
    for i in 0..num_rows {
        for j in 0..num_cols {
            phase1_a_data.push(problem.a[[i, j]]);
        }
        let mut z_coeffs = vec![0.0; num_rows];
        z_coeffs[i] = if problem.b[i] < 0.0 { -1.0 } else { 1.0 };
        phase1_a_data.extend(z_coeffs);
    }

    let mut phase1_c_data = vec![0.0; num_cols];
    phase1_c_data.resize(num_cols + num_rows, 1.0);

    let phase1_problem = StandardForm {
        a: Matrix::new(num_rows, num_cols + num_rows, phase1_a_data),
        b: problem.b.clone(),
        c: Vector::new(phase1_c_data),
    };

    let phase1_basis: Vec<usize> = (num_cols..num_cols + num_rows).collect();

    SimplexState::from_basis(phase1_problem, &phase1_basis)
}

// Without rows every x >= 0 is feasible.
fn unconstrained(problem: &StandardForm, tol: f64) -> SolveReport {
    let result = if problem.c.iter().any(|&c| c < -tol) {
        LPResult::Unbounded
    } else {
        LPResult::Optimum(Vector::zeros(problem.c.size()))
    };
    SolveReport { result, iterations: 0 }
}

// Runs phase 2 from a basis known to be primal feasible.
pub(crate) fn solve_from_basis(problem: StandardForm, basis: &[usize],
                               options: &SolverOptions, mut iterations: usize)
    -> Result<SolveReport, Error> {
    let mut state = SimplexState::from_basis(problem, basis)?;
    let result = state.optimize(options, &mut iterations)?;
    debug!("simplex finished after {} pivots", iterations);
    Ok(SolveReport { result, iterations })
}

pub fn solve(problem: StandardForm, options: &SolverOptions) -> Result<SolveReport, Error> {
    if problem.a.rows() == 0 {
        return Ok(unconstrained(&problem, options.tol));
    }

    let num_cols = problem.a.cols();
    let mut iterations = 0;
    let mut phase1 = phase1_start(&problem)?;
    phase1.optimize(options, &mut iterations)?;

    let infeasibility = phase1.objective();
    debug!("phase 1 finished after {} pivots, infeasibility {:e}", iterations, infeasibility);
    if infeasibility > options.feasibility_tol {
        return Ok(SolveReport { result: LPResult::Infeasible, iterations });
    }

    let redundant = phase1.drive_out_artificials(num_cols, options.feasibility_tol)?;
    if redundant.is_empty() {
        return solve_from_basis(problem, &phase1.basis, options, iterations);
    }

    debug!("dropping redundant rows {:?}", redundant);
    let keep: Vec<usize> = (0..problem.a.rows())
        .filter(|i| !redundant.contains(i))
        .collect();
    let basis: Vec<usize> = phase1.basis.iter()
        .cloned()
        .filter(|&j| j < num_cols)
        .collect();
    let reduced = StandardForm {
        a: problem.a.select_rows(keep.iter()),
        b: problem.b.select(&keep),
        c: problem.c,
    };
    if keep.is_empty() {
        let mut report = unconstrained(&reduced, options.tol);
        report.iterations = iterations;
        return Ok(report);
    }
    solve_from_basis(reduced, &basis, options, iterations)
}

#[cfg(test)]
fn example_problem() -> StandardForm {
    StandardForm {
        a: Matrix::new(2, 5, vec![
            3.0, 2.0, 1.0, 1.0, 0.0,
            2.0, 5.0, 3.0, 0.0, 1.0,
        ]),
        b: Vector::new(vec![10.0, 15.0]),
        c: Vector::new(vec![-2.0, -3.0, -4.0, 0.0, 0.0]),
    }
}

#[cfg(test)]
fn assert_optimum(result: &LPResult, expected_result: &[f64]) {
    match result {
        LPResult::Unbounded => panic!("Expected optimum, got unbounded"),
        LPResult::Infeasible => panic!("Expected optimum, got infeasible"),
        LPResult::Optimum(x) => {
            assert_eq!(x.size(), expected_result.len());
            for (i, v) in x.iter().enumerate() {
                assert!((v - expected_result[i]).abs() < 1.0e-6,
                        "x[{}] = {}, expected {}", i, v, expected_result[i]);
            }
        }
    }
}

#[test]
fn test_simplex() {
    let state = SimplexState::from_basis(example_problem(), &[3, 4]);
    let mut state = state.expect("This basis is valid");
    assert_eq!(state.x_b.data(), &vec![10.0, 15.0]);

    let mut iterations = 0;
    let simplex_result = state.optimize(&SolverOptions::default(), &mut iterations)
        .expect("Optimize should not fail");
    assert_optimum(&simplex_result, &[0.0, 0.0, 5.0, 5.0, 0.0]);
    assert!(iterations > 0);
}

#[test]
fn test_feasible_phase1() {
    let problem = example_problem();
    let mut phase1 = phase1_start(&problem)
        .expect("Phase 1 basis should always be valid");
    let mut iterations = 0;
    phase1.optimize(&SolverOptions::default(), &mut iterations)
        .expect("Optimizing phase 1 should not fail");
    // Test example is feasible
    assert!(phase1.objective().abs() < 1e-9);
}

#[test]
fn test_solve() {
    let report = solve(example_problem(), &SolverOptions::default())
        .expect("Solve should not fail");
    assert_optimum(&report.result, &[0.0, 0.0, 5.0, 5.0, 0.0]);
}

#[test]
fn test_solve_infeasible() {
    let problem = StandardForm {
        a: Matrix::new(3, 3, vec![
            1.0, 1.0, 0.0,
            0.0, -1.0, 1.0,
            1.0, 0.0, 1.0,
        ]),
        b: Vector::new(vec![5.0, 10.0, 12.0]),
        c: Vector::new(vec![-1.0, -1.0, -1.0]),
    };
    let report = solve(problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(report.result, LPResult::Infeasible);
}

#[test]
fn test_solve_unbounded() {
    let problem = StandardForm {
        a: Matrix::new(1, 2, vec![
            1.0, -2.0,
        ]),
        b: Vector::new(vec![5.0]),
        c: Vector::new(vec![-1.0, -1.0]),
    };
    let report = solve(problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(report.result, LPResult::Unbounded);
}

#[test]
fn test_solve_redundant_rows() {
    // The second row is twice the first.
    let problem = StandardForm {
        a: Matrix::new(2, 2, vec![
            1.0, 1.0,
            2.0, 2.0,
        ]),
        b: Vector::new(vec![2.0, 4.0]),
        c: Vector::new(vec![1.0, 2.0]),
    };
    let report = solve(problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_optimum(&report.result, &[2.0, 0.0]);
}

#[test]
fn test_solve_zero_rhs() {
    let problem = StandardForm {
        a: Matrix::new(2, 3, vec![
            1.0, -1.0, 0.0,
            1.0, 1.0, 1.0,
        ]),
        b: Vector::new(vec![0.0, 4.0]),
        c: Vector::new(vec![-1.0, -1.0, 0.0]),
    };
    let report = solve(problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_optimum(&report.result, &[2.0, 2.0, 0.0]);
}

#[test]
fn test_solve_without_rows() {
    let problem = StandardForm {
        a: Matrix::new(0, 2, Vec::<f64>::new()),
        b: Vector::new(Vec::<f64>::new()),
        c: Vector::new(vec![1.0, 3.0]),
    };
    let report = solve(problem.clone(), &SolverOptions::default())
        .expect("Solve should not fail");
    assert_optimum(&report.result, &[0.0, 0.0]);

    let problem = StandardForm { c: Vector::new(vec![1.0, -3.0]), ..problem };
    let report = solve(problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(report.result, LPResult::Unbounded);
}

#[test]
fn test_iteration_limit() {
    let options = SolverOptions { max_iter: 1, ..SolverOptions::default() };
    match solve(example_problem(), &options) {
        Err(Error::IterationLimit(1)) => {},
        other => panic!("Expected iteration limit, got {:?}", other),
    }
}

#[test]
fn test_budget_spent_exactly() {
    // x1 + x2 = 1 takes a single phase 1 pivot and no phase 2 pivot.
    let problem = StandardForm {
        a: Matrix::new(1, 2, vec![1.0, 1.0]),
        b: Vector::new(vec![1.0]),
        c: Vector::new(vec![0.0, 0.0]),
    };
    let report = solve(problem.clone(), &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(report.iterations, 1);

    let options = SolverOptions { max_iter: 1, ..SolverOptions::default() };
    let report = solve(problem, &options)
        .expect("A budget equal to the pivot count is enough");
    assert_eq!(report.iterations, 1);
    assert_optimum(&report.result, &[1.0, 0.0]);
}
