//! Mixed-integer backends for the modeling layer.

use log::{debug, info};

use crate::builder::{Bounds, Outcome, Problem};
use crate::error::Error;
use crate::problem::{Method, SolverOptions};

/// Result of a mixed-integer solve.
#[derive(Debug, Clone, PartialEq)]
pub struct MipReport {
    pub outcome: Outcome,
    /// Relaxations solved.
    pub nodes: usize,
    /// Iterations summed over all relaxations.
    pub iterations: usize,
}

/// A solver able to handle integrality restrictions on top of a linear
/// program.
pub trait MipSolver {
    fn name(&self) -> &str;

    /// Solves `problem` with the variables in `integers` restricted to
    /// integer values.
    fn solve(&self, problem: &Problem, integers: &[usize]) -> Result<MipReport, Error>;
}

/// Depth-first branch-and-bound over LP relaxations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchAndBound {
    pub method: Method,
    pub options: SolverOptions,
    pub max_nodes: usize,
    /// Distance from the nearest integer still accepted as integral.
    pub int_tol: f64,
}

impl Default for BranchAndBound {
    fn default() -> BranchAndBound {
        BranchAndBound {
            method: Method::Simplex,
            options: SolverOptions::default(),
            max_nodes: 10000,
            int_tol: 1e-6,
        }
    }
}

impl BranchAndBound {
    pub fn new(method: Method) -> BranchAndBound {
        BranchAndBound {
            method,
            ..BranchAndBound::default()
        }
    }

    // Most fractional integer variable, if any.
    fn branching_variable(&self, values: &[f64], integers: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &var in integers {
            let fraction = values[var] - values[var].floor();
            let distance = fraction.min(1.0 - fraction);
            if distance <= self.int_tol {
                continue;
            }
            if best.map_or(true, |(_, best_distance)| distance > best_distance) {
                best = Some((var, distance));
            }
        }
        best.map(|(var, _)| var)
    }
}

struct Node {
    bounds: Vec<Bounds>,
    depth: usize,
}

impl MipSolver for BranchAndBound {
    fn name(&self) -> &str {
        match self.method {
            Method::Simplex => "branch-and-bound (simplex)",
            Method::Interior => "branch-and-bound (interior point)",
        }
    }

    fn solve(&self, problem: &Problem, integers: &[usize]) -> Result<MipReport, Error> {
        problem.validate()?;
        let sign = problem.direction().sign();

        let mut root = problem.bounds().to_vec();
        for &var in integers {
            let bounds = &mut root[var];
            bounds.lower = bounds.lower.ceil();
            bounds.upper = bounds.upper.floor();
        }

        let mut stack = vec![Node { bounds: root, depth: 0 }];
        let mut incumbent: Option<(Vec<f64>, f64)> = None;
        let mut nodes = 0;
        let mut iterations = 0;

        while let Some(node) = stack.pop() {
            if nodes >= self.max_nodes {
                return Err(Error::NodeLimit(self.max_nodes));
            }
            nodes += 1;

            if node.bounds.iter().any(|bounds| bounds.is_empty()) {
                debug!("node {} pruned: empty domain", nodes);
                continue;
            }

            let mut relaxation = problem.clone();
            for (var, &bounds) in node.bounds.iter().enumerate() {
                relaxation.set_bounds(var, bounds);
            }
            let resolution = relaxation.solve(self.method, &self.options)?;
            iterations += resolution.iterations;

            let (values, objective) = match resolution.outcome {
                Outcome::Optimal { values, objective } => (values, objective),
                Outcome::Infeasible => {
                    debug!("node {} pruned: infeasible", nodes);
                    continue;
                },
                Outcome::Unbounded => {
                    info!("relaxation at node {} is unbounded", nodes);
                    return Ok(MipReport { outcome: Outcome::Unbounded, nodes, iterations });
                },
            };

            if let Some((_, best)) = &incumbent {
                if sign * objective >= sign * best - self.options.tol {
                    debug!("node {} pruned: bound {} no better than {}", nodes, objective, best);
                    continue;
                }
            }

            match self.branching_variable(&values, integers) {
                None => {
                    let mut values = values;
                    for &var in integers {
                        values[var] = values[var].round();
                    }
                    let objective = problem.objective_value(&values);
                    info!("new incumbent {} at node {} (depth {})", objective, nodes, node.depth);
                    incumbent = Some((values, objective));
                },
                Some(var) => {
                    let value = values[var];
                    debug!("node {}: branching on variable {} = {}", nodes, var, value);
                    let mut down = node.bounds.clone();
                    down[var].upper = value.floor();
                    let mut up = node.bounds;
                    up[var].lower = value.ceil();
                    // The down branch is explored first.
                    stack.push(Node { bounds: up, depth: node.depth + 1 });
                    stack.push(Node { bounds: down, depth: node.depth + 1 });
                },
            }
        }

        let outcome = match incumbent {
            Some((values, objective)) => Outcome::Optimal { values, objective },
            None => Outcome::Infeasible,
        };
        Ok(MipReport { outcome, nodes, iterations })
    }
}

#[cfg(test)]
use std::cmp::Ordering;
#[cfg(test)]
use crate::builder::{Constraint, Objective, ObjectiveDirection};

#[cfg(test)]
fn knapsack() -> Problem {
    // Maximize 5a + 4b + 3c subject to 2a + 3b + c <= 5, 4a + b + 2c <= 11,
    // 3a + 4b + 2c <= 8 with a, b, c in {0, 1, 2, ...}.
    let mut problem = Problem::new();
    let a = problem.new_variable(Bounds::POSITIVE);
    let b = problem.new_variable(Bounds::POSITIVE);
    let c = problem.new_variable(Bounds::POSITIVE);
    let rows = [([2.0, 3.0, 1.0], 5.0), ([4.0, 1.0, 2.0], 11.0), ([3.0, 4.0, 2.0], 8.0)];
    for &(row, rhs) in rows.iter() {
        problem.add_constraint(Constraint::new()
            .add(a, row[0])
            .add(b, row[1])
            .add(c, row[2])
            .value(Ordering::Less, rhs));
    }
    problem.set_objective(Objective::new()
        .add(a, 5.0)
        .add(b, 4.0)
        .add(c, 3.0)
        .direction(ObjectiveDirection::Maximize));
    problem
}

#[test]
fn continuous_problem_needs_one_node() {
    let report = BranchAndBound::default().solve(&knapsack(), &[])
        .expect("Solve should not fail");
    assert_eq!(report.nodes, 1);
    match report.outcome {
        Outcome::Optimal { values, objective } => {
            assert!((objective - 13.0).abs() < 1e-9);
            assert!((values[0] - 2.0).abs() < 1e-9);
            assert!((values[2] - 1.0).abs() < 1e-9);
        },
        other => panic!("Expected optimum, got {:?}", other),
    }
}

#[test]
fn integer_solution() {
    let mut problem = knapsack();
    // Cut off the integral relaxation optimum so branching is needed.
    problem.add_constraint(Constraint::new()
        .add(0, 2.0)
        .add(2, 2.0)
        .value(Ordering::Less, 5.0));
    for solver in &[BranchAndBound::default(), BranchAndBound::new(Method::Interior)] {
        let report = solver.solve(&problem, &[0, 1, 2])
            .expect("Solve should not fail");
        assert!(report.nodes > 1);
        match report.outcome {
            Outcome::Optimal { values, objective } => {
                for v in values.iter() {
                    assert_eq!(v.fract(), 0.0);
                }
                assert!((objective - 10.0).abs() < 1e-9, "objective {}", objective);
            },
            other => panic!("Expected optimum, got {:?}", other),
        }
    }
}

#[test]
fn integer_infeasible() {
    // 2x = 3 has no integer solution.
    let mut problem = Problem::new();
    let x = problem.new_variable(Bounds::POSITIVE);
    problem.add_constraint(Constraint::new().add(x, 2.0).value(Ordering::Equal, 3.0));
    problem.set_objective(Objective::new().add(x, 1.0));
    let report = BranchAndBound::default().solve(&problem, &[x])
        .expect("Solve should not fail");
    assert_eq!(report.outcome, Outcome::Infeasible);
}

#[test]
fn unbounded_relaxation() {
    let mut problem = Problem::new();
    let x = problem.new_variable(Bounds::POSITIVE);
    problem.set_objective(Objective::new()
        .add(x, 1.0)
        .direction(ObjectiveDirection::Maximize));
    let report = BranchAndBound::default().solve(&problem, &[x])
        .expect("Solve should not fail");
    assert_eq!(report.outcome, Outcome::Unbounded);
}

#[test]
fn node_limit() {
    let mut problem = knapsack();
    problem.add_constraint(Constraint::new()
        .add(0, 2.0)
        .add(2, 2.0)
        .value(Ordering::Less, 5.0));
    let solver = BranchAndBound { max_nodes: 1, ..BranchAndBound::default() };
    match solver.solve(&problem, &[0, 1, 2]) {
        Err(Error::NodeLimit(1)) => {},
        other => panic!("Expected node limit, got {:?}", other),
    }
}
