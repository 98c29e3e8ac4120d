use rulinalg::matrix::Matrix;
use rulinalg::vector::Vector;

use crate::error::Error;
use crate::{interior, simplex};

#[derive(Debug, Clone)]
pub struct StandardForm {
    // Standard form linear program:
    // Minimize c^Tx
    // subject to Ax = b
    // and x >= 0
    pub a: Matrix<f64>,
    pub b: Vector<f64>,
    pub c: Vector<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LPResult {
    Unbounded,
    Infeasible,
    Optimum(Vector<f64>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub result: LPResult,
    // Simplex pivots plus barrier iterations spent on the problem.
    pub iterations: usize,
}

/// Limits and tolerances shared by both solution methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub max_iter: usize,
    /// Threshold below which reduced costs and pivot entries count as zero.
    pub tol: f64,
    /// Largest total artificial value still accepted as feasible.
    pub feasibility_tol: f64,
}

impl Default for SolverOptions {
    fn default() -> SolverOptions {
        SolverOptions {
            max_iter: 5000,
            tol: 1e-9,
            feasibility_tol: 1e-7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Simplex,
    Interior,
}

impl Method {
    pub fn solve(self, problem: StandardForm, options: &SolverOptions)
        -> Result<SolveReport, Error> {
        match self {
            Method::Simplex => simplex::solve(problem, options),
            Method::Interior => interior::solve(problem, options),
        }
    }
}
