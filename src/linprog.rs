//! Array interface: minimize `c·x` subject to `A_ub x <= b_ub`,
//! `A_eq x = b_eq` and per-variable bounds.
//!
//! Only minimization is supported. A maximization problem is stated by
//! negating `c`, and a `>=` row by negating both sides into a `<=` row.

use std::cmp::Ordering;
use std::fmt;

use log::{info, warn};

use crate::builder::{Bounds, Constraint, Objective, ObjectiveDirection, Outcome, Problem};
use crate::error::Error;
use crate::problem::{Method, SolverOptions};

/// Constraint data. Every part is optional; omitted bounds mean `x >= 0`.
#[derive(Debug, Clone, Default)]
pub struct LinearConstraints {
    pub a_ub: Option<Vec<Vec<f64>>>,
    pub b_ub: Option<Vec<f64>>,
    pub a_eq: Option<Vec<Vec<f64>>>,
    pub b_eq: Option<Vec<f64>>,
    /// `(lower, upper)` per variable, or a single pair applied to all.
    /// Infinite values leave that side unbounded.
    pub bounds: Option<Vec<(f64, f64)>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinprogOptions {
    pub method: Method,
    pub solver: SolverOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinprogStatus {
    Success,
    IterationLimit,
    Infeasible,
    Unbounded,
    NumericalDifficulties,
}

impl LinprogStatus {
    pub fn code(self) -> u8 {
        match self {
            LinprogStatus::Success => 0,
            LinprogStatus::IterationLimit => 1,
            LinprogStatus::Infeasible => 2,
            LinprogStatus::Unbounded => 3,
            LinprogStatus::NumericalDifficulties => 4,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            LinprogStatus::Success => "Optimization terminated successfully.",
            LinprogStatus::IterationLimit => "Iteration limit reached.",
            LinprogStatus::Infeasible => "Problem appears to be infeasible.",
            LinprogStatus::Unbounded => "Problem appears to be unbounded.",
            LinprogStatus::NumericalDifficulties => "Numerical difficulties encountered.",
        }
    }
}

/// Outcome of [`linprog`]. The solution fields are only present on success.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeResult {
    /// Decision variables at the optimum.
    pub x: Option<Vec<f64>>,
    /// Objective value at the optimum.
    pub fun: Option<f64>,
    /// `b_ub - A_ub x`, one entry per inequality row.
    pub slack: Option<Vec<f64>>,
    /// `b_eq - A_eq x`, one entry per equality row.
    pub con: Option<Vec<f64>>,
    pub status: LinprogStatus,
    pub success: bool,
    pub message: String,
    /// Iterations spent. Zero when the solver hit a linear algebra failure.
    pub nit: usize,
}

impl OptimizeResult {
    fn failed(status: LinprogStatus, nit: usize) -> OptimizeResult {
        OptimizeResult {
            x: None,
            fun: None,
            slack: None,
            con: None,
            status,
            success: false,
            message: status.message().to_string(),
            nit,
        }
    }
}

fn write_array(f: &mut fmt::Formatter, values: &Option<Vec<f64>>) -> fmt::Result {
    match values {
        None => write!(f, "None"),
        Some(values) => {
            write!(f, "[")?;
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", v)?;
            }
            write!(f, "]")
        },
    }
}

impl fmt::Display for OptimizeResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:>8}: ", "con")?;
        write_array(f, &self.con)?;
        writeln!(f)?;
        match self.fun {
            Some(fun) => writeln!(f, "{:>8}: {}", "fun", fun)?,
            None => writeln!(f, "{:>8}: None", "fun")?,
        }
        writeln!(f, "{:>8}: {}", "message", self.message)?;
        writeln!(f, "{:>8}: {}", "nit", self.nit)?;
        write!(f, "{:>8}: ", "slack")?;
        write_array(f, &self.slack)?;
        writeln!(f)?;
        writeln!(f, "{:>8}: {}", "status", self.status.code())?;
        writeln!(f, "{:>8}: {}", "success", self.success)?;
        write!(f, "{:>8}: ", "x")?;
        write_array(f, &self.x)
    }
}

// Pairs each row of a matrix with its right-hand side.
fn rows<'a>(n: usize, a_name: &str, b_name: &str,
            a: &'a Option<Vec<Vec<f64>>>, b: &'a Option<Vec<f64>>)
    -> Result<Vec<(&'a [f64], f64)>, Error> {
    match (a, b) {
        (None, None) => Ok(Vec::new()),
        (Some(a), Some(b)) => {
            if a.len() != b.len() {
                return Err(Error::InvalidProblem(format!(
                    "{} has {} rows but {} has {} entries", a_name, a.len(), b_name, b.len())));
            }
            for (i, row) in a.iter().enumerate() {
                if row.len() != n {
                    return Err(Error::InvalidProblem(format!(
                        "row {} of {} has {} entries, expected {}", i, a_name, row.len(), n)));
                }
            }
            Ok(a.iter().map(|row| row.as_slice()).zip(b.iter().cloned()).collect())
        },
        (Some(_), None) => Err(Error::InvalidProblem(format!("{} given without {}", a_name, b_name))),
        (None, Some(_)) => Err(Error::InvalidProblem(format!("{} given without {}", b_name, a_name))),
    }
}

fn expand_bounds(n: usize, bounds: Option<&[(f64, f64)]>) -> Result<Vec<Bounds>, Error> {
    match bounds {
        None => Ok(vec![Bounds::POSITIVE; n]),
        Some([(lower, upper)]) => Ok(vec![Bounds::new(*lower, *upper); n]),
        Some(bounds) if bounds.len() == n => {
            Ok(bounds.iter().map(|&(lower, upper)| Bounds::new(lower, upper)).collect())
        },
        Some(bounds) => Err(Error::InvalidProblem(format!(
            "{} bounds given for {} variables", bounds.len(), n))),
    }
}

// b - A x for each row.
fn residuals(rows: &[(&[f64], f64)], x: &[f64]) -> Vec<f64> {
    rows.iter()
        .map(|(row, rhs)| rhs - row.iter().zip(x).map(|(a, x)| a * x).sum::<f64>())
        .collect()
}

// Solver errors that are reported as a status rather than an error. A
// linear algebra failure does not carry the iterations spent before it, so
// `nit` is zero in that case.
fn solver_failure(error: Error) -> Result<OptimizeResult, Error> {
    match error {
        Error::IterationLimit(nit) => Ok(OptimizeResult::failed(LinprogStatus::IterationLimit, nit)),
        Error::Linalg(e) => {
            warn!("linear algebra failure: {}", e);
            Ok(OptimizeResult::failed(LinprogStatus::NumericalDifficulties, 0))
        },
        e => Err(e),
    }
}

pub fn linprog(c: &[f64], constraints: &LinearConstraints, options: &LinprogOptions)
    -> Result<OptimizeResult, Error> {
    let n = c.len();
    let ub_rows = rows(n, "A_ub", "b_ub", &constraints.a_ub, &constraints.b_ub)?;
    let eq_rows = rows(n, "A_eq", "b_eq", &constraints.a_eq, &constraints.b_eq)?;
    let bounds = expand_bounds(n, constraints.bounds.as_deref())?;

    let mut problem = Problem::new();
    for bounds in bounds {
        problem.new_variable(bounds);
    }
    let row_constraints = ub_rows.iter().map(|row| (row, Ordering::Less))
        .chain(eq_rows.iter().map(|row| (row, Ordering::Equal)));
    for (&(row, rhs), direction) in row_constraints {
        let constraint = row.iter()
            .enumerate()
            .fold(Constraint::new(), |constraint, (j, &a)| constraint.add(j, a));
        problem.add_constraint(constraint.value(direction, rhs));
    }
    let objective = c.iter()
        .enumerate()
        .fold(Objective::new(), |objective, (j, &c_j)| objective.add(j, c_j));
    problem.set_objective(objective.direction(ObjectiveDirection::Minimize));

    let resolution = match problem.solve(options.method, &options.solver) {
        Ok(resolution) => resolution,
        Err(e) => return solver_failure(e),
    };

    let nit = resolution.iterations;
    let (x, fun) = match resolution.outcome {
        Outcome::Optimal { values, objective } => (values, objective),
        Outcome::Infeasible => return Ok(OptimizeResult::failed(LinprogStatus::Infeasible, nit)),
        Outcome::Unbounded => return Ok(OptimizeResult::failed(LinprogStatus::Unbounded, nit)),
    };
    info!("linprog: optimum {} after {} iterations", fun, nit);

    let status = LinprogStatus::Success;
    Ok(OptimizeResult {
        slack: Some(residuals(&ub_rows, &x)),
        con: Some(residuals(&eq_rows, &x)),
        x: Some(x),
        fun: Some(fun),
        status,
        success: true,
        message: status.message().to_string(),
        nit,
    })
}

#[cfg(test)]
fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-6, "{:?} != {:?}", actual, expected);
    }
}

#[test]
fn minimize_with_bounds() {
    // Minimize -x - 2y subject to x + y <= 4, x <= 2, y <= 3
    let constraints = LinearConstraints {
        a_ub: Some(vec![vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]]),
        b_ub: Some(vec![4.0, 2.0, 3.0]),
        ..LinearConstraints::default()
    };
    for &method in &[Method::Simplex, Method::Interior] {
        let options = LinprogOptions { method, ..LinprogOptions::default() };
        let result = linprog(&[-1.0, -2.0], &constraints, &options)
            .expect("linprog should not fail");
        assert_eq!(result.status, LinprogStatus::Success);
        assert!(result.success);
        assert_close(result.x.as_ref().unwrap(), &[1.0, 3.0]);
        assert!((result.fun.unwrap() + 7.0).abs() < 1e-6);
        assert_close(result.slack.as_ref().unwrap(), &[0.0, 1.0, 0.0]);
        assert_eq!(result.con, Some(vec![]));
    }
}

#[test]
fn broadcast_bounds() {
    // Minimize x + y with both variables in [-1, 1].
    let constraints = LinearConstraints {
        bounds: Some(vec![(-1.0, 1.0)]),
        ..LinearConstraints::default()
    };
    let result = linprog(&[1.0, 1.0], &constraints, &LinprogOptions::default())
        .expect("linprog should not fail");
    assert_close(result.x.as_ref().unwrap(), &[-1.0, -1.0]);
    assert!((result.fun.unwrap() + 2.0).abs() < 1e-9);
}

#[test]
fn infeasible_status() {
    let constraints = LinearConstraints {
        a_ub: Some(vec![vec![1.0]]),
        b_ub: Some(vec![-1.0]),
        ..LinearConstraints::default()
    };
    let result = linprog(&[1.0], &constraints, &LinprogOptions::default())
        .expect("linprog should not fail");
    assert_eq!(result.status, LinprogStatus::Infeasible);
    assert_eq!(result.status.code(), 2);
    assert!(!result.success);
    assert_eq!(result.x, None);
    assert_eq!(result.message, "Problem appears to be infeasible.");
}

#[test]
fn unbounded_status() {
    let constraints = LinearConstraints {
        a_ub: Some(vec![vec![1.0, -1.0]]),
        b_ub: Some(vec![1.0]),
        ..LinearConstraints::default()
    };
    let result = linprog(&[-1.0, 0.0], &constraints, &LinprogOptions::default())
        .expect("linprog should not fail");
    assert_eq!(result.status, LinprogStatus::Unbounded);
    assert_eq!(result.status.code(), 3);
}

#[test]
fn iteration_limit_status() {
    let constraints = LinearConstraints {
        a_ub: Some(vec![vec![1.0, 1.0]]),
        b_ub: Some(vec![4.0]),
        a_eq: Some(vec![vec![1.0, -1.0]]),
        b_eq: Some(vec![1.0]),
        ..LinearConstraints::default()
    };
    let options = LinprogOptions {
        solver: SolverOptions { max_iter: 1, ..SolverOptions::default() },
        ..LinprogOptions::default()
    };
    let result = linprog(&[-1.0, -1.0], &constraints, &options)
        .expect("linprog should not fail");
    assert_eq!(result.status, LinprogStatus::IterationLimit);
    assert_eq!(result.status.code(), 1);
}

#[test]
fn dimension_mismatch() {
    let constraints = LinearConstraints {
        a_ub: Some(vec![vec![1.0, 1.0, 1.0]]),
        b_ub: Some(vec![4.0]),
        ..LinearConstraints::default()
    };
    match linprog(&[1.0, 1.0], &constraints, &LinprogOptions::default()) {
        Err(Error::InvalidProblem(_)) => {},
        other => panic!("Expected invalid problem, got {:?}", other),
    }

    let constraints = LinearConstraints {
        a_eq: Some(vec![vec![1.0, 1.0]]),
        ..LinearConstraints::default()
    };
    match linprog(&[1.0, 1.0], &constraints, &LinprogOptions::default()) {
        Err(Error::InvalidProblem(_)) => {},
        other => panic!("Expected invalid problem, got {:?}", other),
    }

    let constraints = LinearConstraints {
        bounds: Some(vec![(0.0, 1.0), (0.0, 1.0), (0.0, 1.0)]),
        ..LinearConstraints::default()
    };
    match linprog(&[1.0, 1.0], &constraints, &LinprogOptions::default()) {
        Err(Error::InvalidProblem(_)) => {},
        other => panic!("Expected invalid problem, got {:?}", other),
    }
}

#[test]
fn display_lists_fields() {
    let result = OptimizeResult::failed(LinprogStatus::Unbounded, 4);
    let text = result.to_string();
    assert!(text.contains("     fun: None"));
    assert!(text.contains(" message: Problem appears to be unbounded."));
    assert!(text.contains("     nit: 4"));
    assert!(text.contains("  status: 3"));
    assert!(text.contains(" success: false"));
}

#[test]
fn numerical_difficulties_status() {
    use rulinalg::error::{Error as LinalgError, ErrorKind};

    let singular = LinalgError::new(ErrorKind::AlgebraFailure, "matrix is singular");
    let result = solver_failure(Error::Linalg(singular))
        .expect("Linear algebra failures are reported as a status");
    assert_eq!(result.status, LinprogStatus::NumericalDifficulties);
    assert_eq!(result.status.code(), 4);
    assert!(!result.success);
    assert_eq!(result.x, None);
    assert_eq!(result.nit, 0);
    assert_eq!(result.message, LinprogStatus::NumericalDifficulties.message());

    let result = solver_failure(Error::IterationLimit(7))
        .expect("Iteration limits are reported as a status");
    assert_eq!(result.status, LinprogStatus::IterationLimit);
    assert_eq!(result.nit, 7);

    match solver_failure(Error::InvalidProblem("bad".to_string())) {
        Err(Error::InvalidProblem(_)) => {},
        other => panic!("Expected invalid problem, got {:?}", other),
    }
}

#[test]
fn budget_spent_exactly() {
    let constraints = LinearConstraints {
        a_eq: Some(vec![vec![1.0, 1.0]]),
        b_eq: Some(vec![1.0]),
        ..LinearConstraints::default()
    };
    let result = linprog(&[0.0, 0.0], &constraints, &LinprogOptions::default())
        .expect("linprog should not fail");
    assert_eq!(result.status, LinprogStatus::Success);
    assert_eq!(result.nit, 1);

    let options = LinprogOptions {
        solver: SolverOptions { max_iter: result.nit, ..SolverOptions::default() },
        ..LinprogOptions::default()
    };
    let result = linprog(&[0.0, 0.0], &constraints, &options)
        .expect("linprog should not fail");
    assert_eq!(result.status, LinprogStatus::Success);
    assert_eq!(result.nit, 1);
}
