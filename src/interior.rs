// Primal-dual barrier method following section 4.4.1 of
// http://www.ams.org/journals/bull/2005-42-01/S0273-0979-04-01040-7/S0273-0979-04-01040-7.pdf
//
// The barrier iterates are rounded to a vertex and handed to the simplex
// method (crossover) once that vertex is a feasible basis.

use std::collections::HashSet;

use log::{debug, trace, warn};
use rulinalg::matrix::BaseMatrix;
use rulinalg::vector::Vector;

use crate::error::Error;
use crate::problem::{LPResult, SolveReport, SolverOptions, StandardForm};
use crate::simplex;

// Below this barrier parameter a primal feasible rounding is close enough
// to the optimal face for the simplex method to finish.
const CROSSOVER_MU: f64 = 1e-6;

#[derive(Debug, Clone)]
struct InteriorState {
    x: Vector<f64>,
    y: Vector<f64>,
    z: Vector<f64>,
    mu: f64,
    problem: StandardForm,
}

#[derive(Debug, Clone, PartialEq)]
enum Rounding {
    // Basis that is both primal and dual feasible.
    Optimal(Vec<usize>),
    // Basis that is only primal feasible.
    Feasible(Vec<usize>),
    Rejected,
}

impl InteriorState {
    fn new(problem: StandardForm, mu: f64) -> InteriorState {
        let num_vars = problem.a.cols();
        let num_duals = problem.a.rows();
        InteriorState {
            x: Vector::ones(num_vars),
            y: Vector::zeros(num_duals),
            z: Vector::ones(num_vars),
            mu,
            problem,
        }
    }

    // Returns a measure of how big the step attempted was,
    // and the actual step size as a ratio of that.
    // For each component, considers the smaller of the
    // absolute and relative changes, returns the largest
    // of those.

    // If the second returned value is 1.0, the entire Newton
    // step was feasible, and as a result the primal and
    // dual are both strictly feasible.
    fn newton_step(&mut self) -> Result<(f64, f64), Error> {
        // azx is the matrix AZ^-1X
        let mut azx = self.problem.a.clone();
        for i in 0..azx.rows() {
            for j in 0..azx.cols() {
                azx[[i, j]] *= self.x[j] / self.z[j];
            }
        }

        // Compute AZ^-1XA^T
        let m = &azx * self.problem.a.transpose();

        // Compute RHS: AZ^-1X(c - muX^-1e - A^Ty) + b - Ax
        // Compute v1 = c - A^Ty - muX^-1e
        let mut v1 = &self.problem.c - self.problem.a.transpose() * &self.y;
        for (i, entry) in v1.iter_mut().enumerate() {
            *entry -= self.mu / self.x[i];
        }

        let rhs = azx * v1 + &self.problem.b - &self.problem.a * &self.x;

        // Compute newton step for y
        let p_y = m.solve(rhs)?;

        // Compute newton step for z
        // A^Tp_y + p_z = c - A^Ty - z
        // => p_z = c - A^Ty - z - A^Tp_y
        // = c - A^T(y+p_y) - z
        let p_z = &self.problem.c
            - self.problem.a.transpose() * (&self.y + &p_y)
            - &self.z;

        // Compute newton step for x
        // Zp_x + Xp_z = mu*e - XZe
        // p_x = Z^-1(mu*e - XZe - Xp_z)
        // (p_x)_i = mu/z_i - x_i - x_i/z_i * (p_z)_i
        let p_x_data: Vec<f64> = (0..self.x.size())
            .map(|i| self.mu / self.z[i] - self.x[i] - self.x[i] * p_z[i] / self.z[i])
            .collect();
        let p_x = Vector::new(p_x_data);

        // Find largest step in (p_x, p_y, p_z) direction that keeps x and z positive
        let mut alpha: f64 = 1.0;
        for (i, x_i) in self.x.iter().enumerate() {
            // Constant of 0.9 is to ensure that we stay strictly positive.
            let max_step = -0.9 * x_i / p_x[i];
            if max_step > 0.0 && max_step < alpha {
                alpha = max_step;
            }
        }
        for (i, z_i) in self.z.iter().enumerate() {
            let max_step = -0.9 * z_i / p_z[i];
            if max_step > 0.0 && max_step < alpha {
                alpha = max_step;
            }
        }

        let step_size = change_size(&self.x, &p_x)
            .max(change_size(&self.y, &p_y))
            .max(change_size(&self.z, &p_z));

        self.x += &p_x * alpha;
        self.y += &p_y * alpha;
        self.z += &p_z * alpha;

        Ok((step_size, alpha))
    }

    fn is_finite(&self) -> bool {
        self.x.iter().chain(self.y.iter()).chain(self.z.iter()).all(|v| v.is_finite())
    }

    // If A^Ty <= 0, but b^T y > 0, then the original problem
    // is infeasible. Proof:
    // Suppose x is such that Ax = b, x >= 0.
    // Then
    // (A^Ty)^Tx <= 0 (because A^Ty <= 0, x >= 0),
    // but (A^Ty)^Tx = y^TAx = y^Tb = b^Ty > 0.
    // Thus we have a contradiction.
    fn is_infeasibility_certificate(&self, tol: f64) -> bool {
        if self.problem.b.dot(&self.y) <= tol {
            return false;
        }
        let aty = self.problem.a.transpose() * &self.y;
        aty.iter().all(|&v| v <= 0.0)
    }

    // Round the current interior point to a vertex by picking the largest
    // components of x as the basis.
    fn check_rounded(&self, tol: f64) -> Rounding {
        let mut dimensions: Vec<usize> = (0..self.x.size()).collect();
        dimensions.sort_by(|&i, &j| self.x[j].total_cmp(&self.x[i]));

        let basis: Vec<usize> = dimensions.into_iter()
            .take(self.problem.a.rows())
            .collect();

        let basis_index_set: HashSet<usize> = basis.iter().cloned().collect();
        let nonbasis_indices: Vec<usize> = (0..self.problem.a.cols())
            .filter(|i| !basis_index_set.contains(i))
            .collect();

        let mat_b = self.problem.a.select_cols(basis.iter());
        let x_b = match mat_b.solve(self.problem.b.clone()) {
            Ok(x_b) => x_b,
            Err(_) => return Rounding::Rejected,
        };

        // If any coordinates in x_b are negative, then this is not a feasible
        // basis.
        if x_b.iter().any(|&v| !v.is_finite() || v < -tol) {
            return Rounding::Rejected;
        }
        if nonbasis_indices.is_empty() {
            return Rounding::Optimal(basis);
        }

        let c_b = self.problem.c.select(&basis);
        let c_n = self.problem.c.select(&nonbasis_indices);
        let mat_b = self.problem.a.select_cols(basis.iter());
        let lambda = match mat_b.transpose().solve(c_b) {
            Ok(lambda) => lambda,
            Err(_) => return Rounding::Feasible(basis),
        };
        let mat_n = self.problem.a.select_cols(nonbasis_indices.iter());
        let s_n = c_n - mat_n.transpose() * lambda;

        if s_n.iter().all(|&s| s >= -tol) {
            Rounding::Optimal(basis)
        } else {
            Rounding::Feasible(basis)
        }
    }
}

// Largest per-component change, relative for components of magnitude
// above one and absolute otherwise.
fn change_size(current: &Vector<f64>, step: &Vector<f64>) -> f64 {
    current.iter()
        .zip(step.iter())
        .map(|(v, p)| if v.abs() < 1.0 { p.abs() } else { (p / v).abs() })
        .fold(0.0, f64::max)
}

fn fall_back(problem: StandardForm, options: &SolverOptions, iterations: usize)
    -> Result<SolveReport, Error> {
    let mut report = simplex::solve(problem, options)?;
    report.iterations += iterations;
    Ok(report)
}

pub fn solve(problem: StandardForm, options: &SolverOptions) -> Result<SolveReport, Error> {
    if problem.a.rows() == 0 {
        return simplex::solve(problem, options);
    }

    let initial_mu = problem.c.iter().fold(1.0, |mu: f64, c_i| mu.max(c_i.abs()));
    let mut state = InteriorState::new(problem, initial_mu);
    let mut known_feasible = false;

    for iteration in 1..=options.max_iter {
        // Run Newton's method to almost convergence
        let (step_size, alpha) = match state.newton_step() {
            Ok(step) => step,
            Err(e) => {
                warn!("barrier step failed ({}), falling back to simplex", e);
                return fall_back(state.problem, options, iteration);
            },
        };
        if !state.is_finite() {
            warn!("barrier iterates diverged, falling back to simplex");
            return fall_back(state.problem, options, iteration);
        }
        trace!("iteration {}: step {:e}, alpha {:e}, mu {:e}", iteration, step_size, alpha, state.mu);

        if alpha == 1.0 {
            // If we ever take a full newton step, we have
            // strictly feasible primal and dual points.
            known_feasible = true;
        }
        if !known_feasible && state.is_infeasibility_certificate(options.feasibility_tol) {
            debug!("infeasibility certificate found at iteration {}", iteration);
            return Ok(SolveReport { result: LPResult::Infeasible, iterations: iteration });
        }

        if step_size < 1e-2 {
            state.mu *= 0.5;
        }

        let basis = match state.check_rounded(options.tol) {
            Rounding::Optimal(basis) => basis,
            Rounding::Feasible(basis) if state.mu < CROSSOVER_MU => basis,
            _ => continue,
        };
        debug!("crossover to simplex at iteration {}", iteration);
        return simplex::solve_from_basis(state.problem, &basis, options, iteration);
    }

    warn!("barrier method reached {} iterations, falling back to simplex", options.max_iter);
    fall_back(state.problem, options, options.max_iter)
}

#[cfg(test)]
use rulinalg::matrix::Matrix;

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

#[test]
fn test_newton() {
    let mut state = InteriorState::new(example_problem(), 5.0);

    for _ in 0..20 {
        match state.newton_step() {
            Ok(_) => {},
            Err(e) => panic!("Newton step returned an error: {:?}", e),
        }
    }

    // Verify that the desired equations approximately hold:
    // Ax = b
    let ax = &state.problem.a * &state.x;
    for (i, entry) in ax.iter().enumerate() {
        assert!((entry - state.problem.b[i]).abs() < 1e-4);
    }

    // A^Ty + z = c
    let aty = state.problem.a.transpose() * &state.y;
    for (i, entry) in state.problem.c.iter().enumerate() {
        assert!((entry - (aty[i] + state.z[i])).abs() < 1e-4);
    }

    // Xz = mu*1
    for (i, entry) in state.x.iter().enumerate() {
        assert!((entry * state.z[i] - state.mu).abs() < 1e-4);
    }
}

#[test]
fn test_mu_decreasing() {
    let mut state = InteriorState::new(example_problem(), 5.0);

    for _ in 0..10 {
        for _ in 0..5 {
            match state.newton_step() {
                Ok(_) => {},
                Err(e) => panic!("Newton step returned an error: {:?}", e),
            }
        }
        state.mu *= 0.5;
    }
    assert!(state.is_finite());
    for (&x_i, &z_i) in state.x.iter().zip(state.z.iter()) {
        assert!(x_i > 0.0);
        assert!(z_i > 0.0);
    }
}

#[test]
fn test_solve_simple() {
    let report = solve(example_problem(), &SolverOptions::default())
        .expect("Solve should not fail");

    match report.result {
        LPResult::Infeasible => panic!("Expected optimum, got infeasible"),
        LPResult::Unbounded => panic!("Expected optimum, got unbounded"),
        LPResult::Optimum(x) => {
            let expected_result = [0.0, 0.0, 5.0, 5.0, 0.0];
            for (i, v) in x.iter().enumerate() {
                assert!((v - expected_result[i]).abs() < 1e-6);
            }
        },
    }
}

#[test]
fn test_solve_unbounded() {
    let problem = StandardForm {
        a: Matrix::new(1, 2, vec![
            1.0, -2.0,
        ]),
        b: Vector::new(vec![10.0]),
        c: Vector::new(vec![-1.0, 1.9]),
    };
    let report = solve(problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(report.result, LPResult::Unbounded);
}

#[test]
fn test_solve_infeasible() {
    let problem = StandardForm {
        a: Matrix::new(3, 4, vec![
            1.0, 0.0, -1.0, 0.0,
            0.0, 1.0, 0.0, -1.0,
            1.0, 1.0, 0.0, 0.0,
        ]),
        b: Vector::new(vec![6.0, 7.0, 11.0]),
        c: Vector::new(vec![-1.0, -1.0, -1.0, -1.0]),
    };
    let report = solve(problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(report.result, LPResult::Infeasible);
}

#[test]
fn test_singular_step_falls_back() {
    // The zero row makes A Z^-1 X A^T singular. The simplex method drops it
    // as redundant.
    let problem = StandardForm {
        a: Matrix::new(2, 2, vec![
            1.0, 1.0,
            0.0, 0.0,
        ]),
        b: Vector::new(vec![1.0, 0.0]),
        c: Vector::new(vec![1.0, 2.0]),
    };
    let mut state = InteriorState::new(problem.clone(), 2.0);
    assert!(state.newton_step().is_err());

    let report = solve(problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(report.result, LPResult::Optimum(Vector::new(vec![1.0, 0.0])));
    assert!(report.iterations >= 1);
}

#[test]
fn test_iteration_limit_falls_back() {
    // An unbounded problem never rounds to an optimal basis, and mu stays
    // far above the crossover threshold after two iterations.
    let problem = StandardForm {
        a: Matrix::new(1, 2, vec![
            1.0, -2.0,
        ]),
        b: Vector::new(vec![10.0]),
        c: Vector::new(vec![-1.0, 1.9]),
    };
    let options = SolverOptions { max_iter: 2, ..SolverOptions::default() };
    let report = solve(problem, &options)
        .expect("Solve should not fail");
    assert_eq!(report.result, LPResult::Unbounded);
    // Barrier iterations plus the simplex pivots after them.
    assert!(report.iterations > options.max_iter);
}
