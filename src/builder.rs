use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use rulinalg::matrix::Matrix;
#[cfg(test)]
use rulinalg::matrix::BaseMatrix;
use rulinalg::vector::Vector;

use crate::error::Error;
use crate::problem::*;

fn accumulate(coefficients: &mut HashMap<usize, f64>, var_index: usize, coeff: f64) {
    match coefficients.entry(var_index) {
        Entry::Occupied(ent) => {
            *ent.into_mut() += coeff;
        },
        Entry::Vacant(ent) => {
            ent.insert(coeff);
        },
    }
}

#[derive(Debug, Clone)]
pub struct Constraint {
    coefficients: HashMap<usize, f64>,
    direction: Ordering,
    value: f64,
}

impl Default for Constraint {
    fn default() -> Constraint {
        Constraint::new()
    }
}

impl Constraint {
    pub fn new() -> Constraint {
        Constraint {
            coefficients: HashMap::new(),
            direction: Ordering::Equal,
            value: 0.0,
        }
    }

    pub fn add(mut self, var_index: usize, coeff: f64) -> Constraint {
        accumulate(&mut self.coefficients, var_index, coeff);
        self
    }

    pub fn value(mut self, dir: Ordering, val: f64) -> Constraint {
        self.direction = dir;
        self.value = val;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveDirection {
    Maximize,
    Minimize,
}

impl ObjectiveDirection {
    // Multiplier turning the objective into one that is minimized.
    pub fn sign(self) -> f64 {
        match self {
            ObjectiveDirection::Maximize => -1.0,
            ObjectiveDirection::Minimize => 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Objective {
    coefficients: HashMap<usize, f64>,
    direction: ObjectiveDirection,
    constant: f64,
}

impl Default for Objective {
    fn default() -> Objective {
        Objective::new()
    }
}

impl Objective {
    pub fn new() -> Objective {
        Objective {
            coefficients: HashMap::new(),
            direction: ObjectiveDirection::Maximize,
            constant: 0.0,
        }
    }

    pub fn add(mut self, var_index: usize, coeff: f64) -> Objective {
        accumulate(&mut self.coefficients, var_index, coeff);
        self
    }

    pub fn direction(mut self, dir: ObjectiveDirection) -> Objective {
        self.direction = dir;
        self
    }

    pub fn constant(mut self, constant: f64) -> Objective {
        self.constant = constant;
        self
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients.iter()
            .fold(self.constant, |acc, (&var, &coeff)| acc + coeff * values[var])
    }
}

/// Range a variable may take; either end may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub const POSITIVE: Bounds = Bounds { lower: 0.0, upper: f64::INFINITY };
    pub const FREE: Bounds = Bounds { lower: f64::NEG_INFINITY, upper: f64::INFINITY };

    pub fn new(lower: f64, upper: f64) -> Bounds {
        Bounds { lower, upper }
    }

    pub fn is_empty(&self) -> bool {
        self.lower > self.upper
    }

    pub(crate) fn validate(&self, var: usize) -> Result<(), Error> {
        if self.lower.is_nan() || self.upper.is_nan()
            || self.lower == f64::INFINITY || self.upper == f64::NEG_INFINITY
            || self.is_empty() {
            return Err(Error::InvalidProblem(
                format!("variable {} has invalid bounds [{}, {}]", var, self.lower, self.upper)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Problem {
    variables: Vec<Bounds>,
    constraints: Vec<Constraint>,
    objective: Objective,
}

impl Default for Problem {
    fn default() -> Problem {
        Problem::new()
    }
}

// Mapping from specified problem to standard form problem
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariableMapping {
    // x = offset + s
    Shifted(usize, f64),
    // x = offset - s
    Mirrored(usize, f64),
    // x = s_pos - s_neg
    Difference(usize, usize),
}

impl VariableMapping {
    fn recover(self, x: &Vector<f64>) -> f64 {
        match self {
            VariableMapping::Shifted(idx, offset) => offset + x[idx],
            VariableMapping::Mirrored(idx, offset) => offset - x[idx],
            VariableMapping::Difference(pos_var, neg_var) => x[pos_var] - x[neg_var],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Optimal { values: Vec<f64>, objective: f64 },
    Infeasible,
    Unbounded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub iterations: usize,
}

impl Problem {
    pub fn new() -> Problem {
        Problem {
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Objective::new(),
        }
    }

    pub fn new_variable(&mut self, bounds: Bounds) -> usize {
        let result = self.variables.len();
        self.variables.push(bounds);
        result
    }

    pub fn bounds(&self) -> &[Bounds] {
        &self.variables
    }

    pub fn set_bounds(&mut self, var_index: usize, bounds: Bounds) {
        self.variables[var_index] = bounds;
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = objective;
    }

    pub fn direction(&self) -> ObjectiveDirection {
        self.objective.direction
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }

    pub fn validate(&self) -> Result<(), Error> {
        for (var, bounds) in self.variables.iter().enumerate() {
            bounds.validate(var)?;
        }
        let coefficients = self.constraints.iter()
            .map(|constraint| (&constraint.coefficients, constraint.value))
            .chain(Some((&self.objective.coefficients, self.objective.constant)));
        for (coefficients, value) in coefficients {
            if !value.is_finite() {
                return Err(Error::InvalidProblem(format!("non-finite right-hand side {}", value)));
            }
            for (&var, &coeff) in coefficients {
                if var >= self.variables.len() {
                    return Err(Error::InvalidProblem(format!("unknown variable {}", var)));
                }
                if !coeff.is_finite() {
                    return Err(Error::InvalidProblem(
                        format!("non-finite coefficient {} on variable {}", coeff, var)));
                }
            }
        }
        Ok(())
    }

    pub fn standard_form(&self) -> Result<(StandardForm, Vec<VariableMapping>), Error> {
        self.validate()?;

        let mut var_count: usize = 0;
        let mut var_mapping: Vec<VariableMapping> = Vec::new();
        // Variables bounded on both sides get an extra row s <= upper - lower.
        let mut range_rows: Vec<(usize, f64)> = Vec::new();

        for bounds in self.variables.iter() {
            let lower_finite = bounds.lower.is_finite();
            let upper_finite = bounds.upper.is_finite();
            let var_index = var_count;
            if lower_finite {
                var_count += 1;
                var_mapping.push(VariableMapping::Shifted(var_index, bounds.lower));
                if upper_finite {
                    range_rows.push((var_index, bounds.upper - bounds.lower));
                }
            } else if upper_finite {
                var_count += 1;
                var_mapping.push(VariableMapping::Mirrored(var_index, bounds.upper));
            } else {
                let pos_var = var_count;
                var_count += 1;
                let neg_var = var_count;
                var_count += 1;
                var_mapping.push(VariableMapping::Difference(pos_var, neg_var));
            }
        }

        let mut slack_variables: Vec<Option<usize>> = Vec::new();
        for constraint in self.constraints.iter() {
            match constraint.direction {
                Ordering::Less | Ordering::Greater => {
                    slack_variables.push(Some(var_count));
                    var_count += 1;
                },
                Ordering::Equal => {
                    slack_variables.push(None);
                },
            }
        }
        let range_slack_start = var_count;
        var_count += range_rows.len();

        let num_rows = self.constraints.len() + range_rows.len();
        let mut a_data = Vec::with_capacity(num_rows * var_count);
        let mut b_data = Vec::with_capacity(num_rows);

        for (i, constraint) in self.constraints.iter().enumerate() {
            let mut constraint_row = vec![0.0; var_count];
            let mut value = constraint.value;
            for (&var, &coeff) in &constraint.coefficients {
                match var_mapping[var] {
                    VariableMapping::Shifted(std_var, offset) => {
                        constraint_row[std_var] += coeff;
                        value -= coeff * offset;
                    },
                    VariableMapping::Mirrored(std_var, offset) => {
                        constraint_row[std_var] -= coeff;
                        value -= coeff * offset;
                    },
                    VariableMapping::Difference(pos_var, neg_var) => {
                        constraint_row[pos_var] += coeff;
                        constraint_row[neg_var] -= coeff;
                    },
                }
            }
            if let Some(slack_var) = slack_variables[i] {
                constraint_row[slack_var] = match constraint.direction {
                    Ordering::Greater => -1.0,
                    _ => 1.0,
                };
            }

            a_data.extend(constraint_row);
            b_data.push(value);
        }

        for (k, &(std_var, width)) in range_rows.iter().enumerate() {
            let mut range_row = vec![0.0; var_count];
            range_row[std_var] = 1.0;
            range_row[range_slack_start + k] = 1.0;
            a_data.extend(range_row);
            b_data.push(width);
        }

        let sign = self.objective.direction.sign();
        let mut c_data = vec![0.0; var_count];
        for (&var, &coeff) in &self.objective.coefficients {
            match var_mapping[var] {
                VariableMapping::Shifted(std_var, _) => {
                    c_data[std_var] += sign * coeff;
                },
                VariableMapping::Mirrored(std_var, _) => {
                    c_data[std_var] -= sign * coeff;
                },
                VariableMapping::Difference(pos_var, neg_var) => {
                    c_data[pos_var] += sign * coeff;
                    c_data[neg_var] -= sign * coeff;
                },
            }
        }

        let standard_form = StandardForm {
            a: Matrix::new(num_rows, var_count, a_data),
            b: Vector::new(b_data),
            c: Vector::new(c_data),
        };

        Ok((standard_form, var_mapping))
    }

    pub fn solve(&self, method: Method, options: &SolverOptions) -> Result<Resolution, Error> {
        let (standard_form, var_mapping) = self.standard_form()?;
        let report = method.solve(standard_form, options)?;
        let outcome = match report.result {
            LPResult::Optimum(x) => {
                let values: Vec<f64> = var_mapping.iter()
                    .map(|mapping| mapping.recover(&x))
                    .collect();
                let objective = self.objective_value(&values);
                Outcome::Optimal { values, objective }
            },
            LPResult::Infeasible => Outcome::Infeasible,
            LPResult::Unbounded => Outcome::Unbounded,
        };
        Ok(Resolution { outcome, iterations: report.iterations })
    }
}

#[cfg(test)]
fn example_problem() -> Problem {
    let mut problem = Problem::new();
    let var1 = problem.new_variable(Bounds::POSITIVE);
    let var2 = problem.new_variable(Bounds::FREE);
    let constraint1 = Constraint::new()
        .add(var1, 1.0)
        .add(var2, 2.0)
        .value(Ordering::Less, 5.0);
    problem.add_constraint(constraint1);
    let constraint2 = Constraint::new()
        .add(var1, 5.0)
        .add(var2, 3.0)
        .value(Ordering::Less, 10.0);
    problem.add_constraint(constraint2);
    let constraint3 = Constraint::new()
        .add(var2, 1.0)
        .value(Ordering::Greater, 2.0);
    problem.add_constraint(constraint3);
    let objective = Objective::new()
        .add(var1, 1.0)
        .add(var2, 1.0)
        .direction(ObjectiveDirection::Maximize);
    problem.set_objective(objective);
    problem
}

#[test]
fn build_constraint() {
    let constraint = Constraint::new()
        .add(0, 1.0)
        .add(1, 2.0)
        .add(0, -3.0)
        .value(Ordering::Less, 5.0);
    assert_eq!(constraint.coefficients.len(), 2);
    assert_eq!(constraint.coefficients[&0], -2.0);
    assert_eq!(constraint.coefficients[&1], 2.0);
    assert_eq!(constraint.direction, Ordering::Less);
    assert_eq!(constraint.value, 5.0);
}

#[test]
fn build_problem() {
    let problem = example_problem();
    assert_eq!(problem.variables.len(), 2);
    assert_eq!(problem.constraints.len(), 3);
    assert_eq!(problem.direction(), ObjectiveDirection::Maximize);
}

#[test]
fn standard_form() {
    let (standard_form, mapping) = example_problem().standard_form()
        .expect("Problem is valid");
    assert_eq!(standard_form.a.data(),
               &vec![1.0, 2.0, -2.0, 1.0, 0.0, 0.0,
                     5.0, 3.0, -3.0, 0.0, 1.0, 0.0,
                     0.0, 1.0, -1.0, 0.0, 0.0, -1.0]);
    assert_eq!(standard_form.a.rows(), 3);
    assert_eq!(standard_form.a.cols(), 6);
    assert_eq!(standard_form.b.data(),
               &vec![5.0, 10.0, 2.0]);
    // Maximization is negated into minimization.
    assert_eq!(standard_form.c.data(),
               &vec![-1.0, -1.0, 1.0, 0.0, 0.0, 0.0]);
    assert_eq!(mapping[0], VariableMapping::Shifted(0, 0.0));
    assert_eq!(mapping[1], VariableMapping::Difference(1, 2));
}

#[test]
fn standard_form_bounded() {
    let mut problem = Problem::new();
    let x = problem.new_variable(Bounds::new(1.0, 3.0));
    let y = problem.new_variable(Bounds::new(f64::NEG_INFINITY, 4.0));
    problem.add_constraint(Constraint::new()
        .add(x, 1.0)
        .add(y, 1.0)
        .value(Ordering::Less, 10.0));
    problem.set_objective(Objective::new()
        .add(x, 1.0)
        .add(y, 1.0)
        .direction(ObjectiveDirection::Maximize));

    let (standard_form, mapping) = problem.standard_form()
        .expect("Problem is valid");
    assert_eq!(mapping, vec![VariableMapping::Shifted(0, 1.0),
                             VariableMapping::Mirrored(1, 4.0)]);
    assert_eq!(standard_form.a.data(),
               &vec![1.0, -1.0, 1.0, 0.0,
                     1.0, 0.0, 0.0, 1.0]);
    assert_eq!(standard_form.b.data(), &vec![5.0, 2.0]);
    assert_eq!(standard_form.c.data(), &vec![-1.0, 1.0, 0.0, 0.0]);

    let resolution = problem.solve(Method::Simplex, &SolverOptions::default())
        .expect("Solve should not fail");
    match resolution.outcome {
        Outcome::Optimal { values, objective } => {
            assert!((values[0] - 3.0).abs() < 1e-9);
            assert!((values[1] - 4.0).abs() < 1e-9);
            assert!((objective - 7.0).abs() < 1e-9);
        },
        other => panic!("Expected optimum, got {:?}", other),
    }
}

#[test]
fn solve_negative_lower_bound() {
    let mut problem = Problem::new();
    let x = problem.new_variable(Bounds::new(-5.0, f64::INFINITY));
    problem.set_objective(Objective::new()
        .add(x, 1.0)
        .constant(2.0)
        .direction(ObjectiveDirection::Minimize));
    let resolution = problem.solve(Method::Simplex, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(resolution.outcome,
               Outcome::Optimal { values: vec![-5.0], objective: -3.0 });
}

#[test]
fn solve_example() {
    // The free variable is pushed up until both <= rows are tight.
    let resolution = example_problem().solve(Method::Simplex, &SolverOptions::default())
        .expect("Solve should not fail");
    match resolution.outcome {
        Outcome::Optimal { values, objective } => {
            assert!((values[0] - 5.0 / 7.0).abs() < 1e-9);
            assert!((values[1] - 15.0 / 7.0).abs() < 1e-9);
            assert!((objective - 20.0 / 7.0).abs() < 1e-9);
        },
        other => panic!("Expected optimum, got {:?}", other),
    }
}

#[test]
fn invalid_bounds() {
    let mut problem = Problem::new();
    problem.new_variable(Bounds::new(2.0, 1.0));
    match problem.standard_form() {
        Err(Error::InvalidProblem(_)) => {},
        other => panic!("Expected invalid problem, got {:?}", other),
    }
}

#[test]
fn unknown_variable() {
    let mut problem = Problem::new();
    problem.new_variable(Bounds::POSITIVE);
    problem.add_constraint(Constraint::new().add(3, 1.0).value(Ordering::Less, 1.0));
    match problem.standard_form() {
        Err(Error::InvalidProblem(_)) => {},
        other => panic!("Expected invalid problem, got {:?}", other),
    }
}
