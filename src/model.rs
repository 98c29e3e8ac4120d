//! Symbolic modeling layer.
//!
//! Variables are created on a [`Model`] and combined into linear
//! [`Expression`]s with the usual arithmetic operators. Comparison operators
//! cannot build constraints in Rust, so [`leq`], [`geq`] and [`eq`] do.
//!
//! ```
//! use tutorial_lp::builder::ObjectiveDirection;
//! use tutorial_lp::model::{leq, Model, Status, VariableDefinition};
//!
//! let mut model = Model::new("small", ObjectiveDirection::Maximize);
//! let x = model.add_variable(VariableDefinition::new("x").min(0.0))?;
//! let y = model.add_variable(VariableDefinition::new("y").min(0.0).integer())?;
//! model.add_constraint("capacity", leq(x + 2.0 * y, 3.5))?;
//! model.set_objective(x + y)?;
//! assert_eq!(model.solve()?, Status::Optimal);
//! # Ok::<(), tutorial_lp::error::Error>(())
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};

use log::info;

use crate::builder::{Bounds, Constraint, Objective, ObjectiveDirection, Outcome, Problem};
use crate::error::Error;
use crate::mip::{BranchAndBound, MipSolver};

/// Handle to a variable owned by a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(usize);

impl Variable {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Linear combination of variables plus a constant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    coefficients: BTreeMap<usize, f64>,
    constant: f64,
}

impl Expression {
    pub fn new() -> Expression {
        Expression::default()
    }

    pub fn add_term(mut self, var: Variable, coeff: f64) -> Expression {
        match self.coefficients.entry(var.0) {
            Entry::Occupied(ent) => {
                *ent.into_mut() += coeff;
            },
            Entry::Vacant(ent) => {
                ent.insert(coeff);
            },
        }
        self
    }

    pub fn coefficient(&self, var: Variable) -> f64 {
        self.coefficients.get(&var.0).cloned().unwrap_or(0.0)
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn terms(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.coefficients.iter().map(|(&var, &coeff)| (Variable(var), coeff))
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms().fold(self.constant, |acc, (var, coeff)| acc + coeff * values[var.0])
    }

    fn scale(mut self, factor: f64) -> Expression {
        for coeff in self.coefficients.values_mut() {
            *coeff *= factor;
        }
        self.constant *= factor;
        self
    }

    fn combine(mut self, other: Expression, factor: f64) -> Expression {
        for (var, coeff) in other.terms() {
            self = self.add_term(var, factor * coeff);
        }
        self.constant += factor * other.constant;
        self
    }
}

impl From<Variable> for Expression {
    fn from(var: Variable) -> Expression {
        Expression::new().add_term(var, 1.0)
    }
}

impl From<f64> for Expression {
    fn from(constant: f64) -> Expression {
        Expression { constant, ..Expression::default() }
    }
}

impl<R: Into<Expression>> Add<R> for Expression {
    type Output = Expression;

    fn add(self, rhs: R) -> Expression {
        self.combine(rhs.into(), 1.0)
    }
}

impl<R: Into<Expression>> Sub<R> for Expression {
    type Output = Expression;

    fn sub(self, rhs: R) -> Expression {
        self.combine(rhs.into(), -1.0)
    }
}

impl<R: Into<Expression>> Add<R> for Variable {
    type Output = Expression;

    fn add(self, rhs: R) -> Expression {
        Expression::from(self) + rhs
    }
}

impl<R: Into<Expression>> Sub<R> for Variable {
    type Output = Expression;

    fn sub(self, rhs: R) -> Expression {
        Expression::from(self) - rhs
    }
}

impl Sum<Expression> for Expression {
    fn sum<I: Iterator<Item = Expression>>(iter: I) -> Expression {
        iter.fold(Expression::new(), |total, expression| total.combine(expression, 1.0))
    }
}

impl Sum<Variable> for Expression {
    fn sum<I: Iterator<Item = Variable>>(iter: I) -> Expression {
        iter.fold(Expression::new(), |total, var| total.add_term(var, 1.0))
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        self.scale(-1.0)
    }
}

impl Neg for Variable {
    type Output = Expression;

    fn neg(self) -> Expression {
        -Expression::from(self)
    }
}

impl Mul<f64> for Expression {
    type Output = Expression;

    fn mul(self, factor: f64) -> Expression {
        self.scale(factor)
    }
}

impl Mul<Expression> for f64 {
    type Output = Expression;

    fn mul(self, expression: Expression) -> Expression {
        expression.scale(self)
    }
}

impl Mul<f64> for Variable {
    type Output = Expression;

    fn mul(self, factor: f64) -> Expression {
        Expression::from(self).scale(factor)
    }
}

impl Mul<Variable> for f64 {
    type Output = Expression;

    fn mul(self, var: Variable) -> Expression {
        Expression::from(var).scale(self)
    }
}

/// `expression (direction) 0`, kept as `lhs - rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    expression: Expression,
    direction: Ordering,
}

impl LinearConstraint {
    fn new(lhs: Expression, rhs: Expression, direction: Ordering) -> LinearConstraint {
        LinearConstraint { expression: lhs - rhs, direction }
    }

    pub fn direction(&self) -> Ordering {
        self.direction
    }

    /// `lhs - rhs` at the given point.
    pub fn residual(&self, values: &[f64]) -> f64 {
        self.expression.evaluate(values)
    }

    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let residual = self.residual(values);
        match self.direction {
            Ordering::Less => residual <= tol,
            Ordering::Greater => residual >= -tol,
            Ordering::Equal => residual.abs() <= tol,
        }
    }
}

pub fn leq(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> LinearConstraint {
    LinearConstraint::new(lhs.into(), rhs.into(), Ordering::Less)
}

pub fn geq(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> LinearConstraint {
    LinearConstraint::new(lhs.into(), rhs.into(), Ordering::Greater)
}

pub fn eq(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> LinearConstraint {
    LinearConstraint::new(lhs.into(), rhs.into(), Ordering::Equal)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Continuous,
    Integer,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Category::Continuous => write!(f, "Continuous"),
            Category::Integer => write!(f, "Integer"),
        }
    }
}

/// Name, bounds and category of a variable to add. Bounds default to free.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    name: String,
    lower: f64,
    upper: f64,
    category: Category,
}

impl VariableDefinition {
    pub fn new(name: impl Into<String>) -> VariableDefinition {
        VariableDefinition {
            name: name.into(),
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            category: Category::Continuous,
        }
    }

    pub fn min(mut self, lower: f64) -> VariableDefinition {
        self.lower = lower;
        self
    }

    pub fn max(mut self, upper: f64) -> VariableDefinition {
        self.upper = upper;
        self
    }

    pub fn category(mut self, category: Category) -> VariableDefinition {
        self.category = category;
        self
    }

    pub fn integer(self) -> VariableDefinition {
        self.category(Category::Integer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NotSolved,
    Optimal,
    Infeasible,
    Unbounded,
    Undefined,
}

impl Status {
    pub fn code(self) -> i8 {
        match self {
            Status::NotSolved => 0,
            Status::Optimal => 1,
            Status::Infeasible => -1,
            Status::Unbounded => -2,
            Status::Undefined => -3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Status::NotSolved => "Not Solved",
            Status::Optimal => "Optimal",
            Status::Infeasible => "Infeasible",
            Status::Unbounded => "Unbounded",
            Status::Undefined => "Undefined",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    sense: ObjectiveDirection,
    variables: Vec<VariableDefinition>,
    constraints: Vec<(String, LinearConstraint)>,
    objective: Expression,
    status: Status,
    solution: Option<Vec<f64>>,
    objective_value: Option<f64>,
}

impl Model {
    pub fn new(name: impl Into<String>, sense: ObjectiveDirection) -> Model {
        Model {
            name: name.into(),
            sense,
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Expression::new(),
            status: Status::NotSolved,
            solution: None,
            objective_value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sense(&self) -> ObjectiveDirection {
        self.sense
    }

    fn invalidate(&mut self) {
        self.status = Status::NotSolved;
        self.solution = None;
        self.objective_value = None;
    }

    pub fn add_variable(&mut self, definition: VariableDefinition) -> Result<Variable, Error> {
        if self.variable(&definition.name).is_some() {
            return Err(Error::DuplicateName(definition.name));
        }
        Bounds::new(definition.lower, definition.upper)
            .validate(self.variables.len())
            .map_err(|_| Error::InvalidProblem(format!(
                "variable {} has invalid bounds [{}, {}]",
                definition.name, definition.lower, definition.upper)))?;
        self.invalidate();
        self.variables.push(definition);
        Ok(Variable(self.variables.len() - 1))
    }

    pub fn variable(&self, name: &str) -> Option<Variable> {
        self.variables.iter()
            .position(|definition| definition.name == name)
            .map(Variable)
    }

    fn check_expression(&self, expression: &Expression) -> Result<(), Error> {
        match expression.terms().find(|(var, _)| var.0 >= self.variables.len()) {
            Some((var, _)) => Err(Error::UnknownVariable(var.0)),
            None => Ok(()),
        }
    }

    /// Adds a named constraint. An empty name is replaced by `_C<n>`.
    pub fn add_constraint(&mut self, name: impl Into<String>, constraint: LinearConstraint)
        -> Result<(), Error> {
        let mut name = name.into();
        if name.is_empty() {
            name = format!("_C{}", self.constraints.len() + 1);
        }
        if self.constraints.iter().any(|(existing, _)| *existing == name) {
            return Err(Error::DuplicateName(name));
        }
        self.check_expression(&constraint.expression)?;
        self.invalidate();
        self.constraints.push((name, constraint));
        Ok(())
    }

    pub fn set_objective(&mut self, objective: impl Into<Expression>) -> Result<(), Error> {
        let objective = objective.into();
        self.check_expression(&objective)?;
        self.invalidate();
        self.objective = objective;
        Ok(())
    }

    fn to_problem(&self) -> Problem {
        let mut problem = Problem::new();
        for definition in self.variables.iter() {
            problem.new_variable(Bounds::new(definition.lower, definition.upper));
        }
        for (_, constraint) in self.constraints.iter() {
            let expression = &constraint.expression;
            let row = expression.terms()
                .fold(Constraint::new(), |row, (var, coeff)| row.add(var.0, coeff));
            problem.add_constraint(row.value(constraint.direction, -expression.constant));
        }
        let objective = self.objective.terms()
            .fold(Objective::new(), |objective, (var, coeff)| objective.add(var.0, coeff));
        problem.set_objective(objective
            .constant(self.objective.constant)
            .direction(self.sense));
        problem
    }

    /// Solves with the default backend, branch-and-bound over simplex.
    pub fn solve(&mut self) -> Result<Status, Error> {
        self.solve_with(&BranchAndBound::default())
    }

    pub fn solve_with(&mut self, solver: &dyn MipSolver) -> Result<Status, Error> {
        let problem = self.to_problem();
        let integers: Vec<usize> = self.variables.iter()
            .enumerate()
            .filter(|(_, definition)| definition.category == Category::Integer)
            .map(|(var, _)| var)
            .collect();

        info!("solving {} with {}: {} variables ({} integer), {} constraints",
              self.name, solver.name(), self.variables.len(), integers.len(),
              self.constraints.len());
        let report = solver.solve(&problem, &integers)?;
        info!("{}: {} nodes, {} iterations", self.name, report.nodes, report.iterations);

        self.invalidate();
        self.status = match report.outcome {
            Outcome::Optimal { values, objective } => {
                self.solution = Some(values);
                self.objective_value = Some(objective);
                Status::Optimal
            },
            Outcome::Infeasible => Status::Infeasible,
            Outcome::Unbounded => Status::Unbounded,
        };
        Ok(self.status)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    pub fn value(&self, var: Variable) -> Option<f64> {
        self.solution.as_ref().and_then(|values| values.get(var.0).cloned())
    }

    /// Variable names with their values, in creation order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.variables.iter()
            .enumerate()
            .map(move |(var, definition)| (definition.name.as_str(), self.value(Variable(var))))
    }

    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, constraint)| constraint)
    }

    /// Constraint names with `lhs - rhs` at the solution, in insertion order.
    pub fn constraint_values(&self) -> Option<Vec<(&str, f64)>> {
        let values = self.solution.as_ref()?;
        Some(self.constraints.iter()
            .map(|(name, constraint)| (name.as_str(), constraint.residual(values)))
            .collect())
    }

    fn write_expression(&self, f: &mut fmt::Formatter, expression: &Expression) -> fmt::Result {
        let mut first = true;
        for (var, coeff) in expression.terms() {
            if coeff == 0.0 {
                continue;
            }
            let magnitude = coeff.abs();
            match (first, coeff < 0.0) {
                (true, true) => write!(f, "-")?,
                (true, false) => {},
                (false, true) => write!(f, " - ")?,
                (false, false) => write!(f, " + ")?,
            }
            if magnitude != 1.0 {
                write!(f, "{} ", magnitude)?;
            }
            write!(f, "{}", self.variables[var.0].name)?;
            first = false;
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        match self.sense {
            ObjectiveDirection::Maximize => writeln!(f, "MAXIMIZE")?,
            ObjectiveDirection::Minimize => writeln!(f, "MINIMIZE")?,
        }
        self.write_expression(f, &self.objective)?;
        let constant = self.objective.constant;
        if constant < 0.0 {
            write!(f, " - {}", -constant)?;
        } else if constant > 0.0 {
            write!(f, " + {}", constant)?;
        }
        writeln!(f)?;
        writeln!(f, "SUBJECT TO")?;
        for (name, constraint) in self.constraints.iter() {
            write!(f, "{}: ", name)?;
            self.write_expression(f, &constraint.expression)?;
            let operator = match constraint.direction {
                Ordering::Less => "<=",
                Ordering::Greater => ">=",
                Ordering::Equal => "=",
            };
            writeln!(f, " {} {}", operator, -constraint.expression.constant)?;
        }
        writeln!(f)?;
        writeln!(f, "VARIABLES")?;
        for definition in self.variables.iter() {
            if definition.lower.is_finite() {
                write!(f, "{} <= ", definition.lower)?;
            }
            write!(f, "{}", definition.name)?;
            if definition.upper.is_finite() {
                write!(f, " <= {}", definition.upper)?;
            }
            writeln!(f, " {}", definition.category)?;
        }
        Ok(())
    }
}

#[test]
fn expression_arithmetic() {
    let x = Variable(0);
    let y = Variable(1);
    let expression = 2.0 * x + y - 3.0 * (x - 4.0) + 1.0;
    assert_eq!(expression.coefficient(x), -1.0);
    assert_eq!(expression.coefficient(y), 1.0);
    assert_eq!(expression.constant(), 13.0);
    assert_eq!(expression.evaluate(&[2.0, 5.0]), 16.0);

    let negated = -x + y * 5.0;
    assert_eq!(negated.coefficient(x), -1.0);
    assert_eq!(negated.coefficient(y), 5.0);

    // Terms on the same variable collapse.
    let cancelled = x - x;
    assert_eq!(cancelled.terms().count(), 1);
    assert_eq!(cancelled.coefficient(x), 0.0);
}

#[test]
fn constraint_residuals() {
    let x = Variable(0);
    let y = Variable(1);
    let constraint = geq(-x + 2.0 * y, -2.0);
    assert_eq!(constraint.direction(), Ordering::Greater);
    assert_eq!(constraint.residual(&[1.0, 1.0]), 3.0);
    assert!(constraint.is_satisfied(&[1.0, 1.0], 0.0));
    assert!(!constraint.is_satisfied(&[5.0, 1.0], 0.0));
    assert!(eq(x, 1.0).is_satisfied(&[1.0, 0.0], 0.0));
    assert!(leq(x + y, 1.0).is_satisfied(&[0.5, 0.5], 0.0));
}

#[test]
fn duplicate_names() {
    let mut model = Model::new("duplicates", ObjectiveDirection::Minimize);
    let x = model.add_variable(VariableDefinition::new("x").min(0.0))
        .expect("First variable is fine");
    match model.add_variable(VariableDefinition::new("x")) {
        Err(Error::DuplicateName(name)) => assert_eq!(name, "x"),
        other => panic!("Expected duplicate name, got {:?}", other),
    }
    model.add_constraint("limit", leq(x, 4.0)).expect("First constraint is fine");
    match model.add_constraint("limit", geq(x, 1.0)) {
        Err(Error::DuplicateName(name)) => assert_eq!(name, "limit"),
        other => panic!("Expected duplicate name, got {:?}", other),
    }
    model.add_constraint("", geq(x, 1.0)).expect("Unnamed constraint is fine");
    assert!(model.constraint("_C2").is_some());
}

#[test]
fn foreign_variable() {
    let mut other = Model::new("other", ObjectiveDirection::Minimize);
    other.add_variable(VariableDefinition::new("a")).expect("Valid variable");
    let b = other.add_variable(VariableDefinition::new("b")).expect("Valid variable");

    let mut model = Model::new("model", ObjectiveDirection::Minimize);
    model.add_variable(VariableDefinition::new("x")).expect("Valid variable");
    match model.set_objective(b) {
        Err(Error::UnknownVariable(1)) => {},
        other => panic!("Expected unknown variable, got {:?}", other),
    }
}

#[test]
fn invalid_variable_bounds() {
    let mut model = Model::new("bounds", ObjectiveDirection::Minimize);
    let definitions = [
        VariableDefinition::new("x").min(2.0).max(1.0),
        VariableDefinition::new("x").min(f64::INFINITY),
        VariableDefinition::new("x").max(f64::NEG_INFINITY),
        VariableDefinition::new("x").min(f64::NAN),
    ];
    for definition in definitions.iter() {
        match model.add_variable(definition.clone()) {
            Err(Error::InvalidProblem(_)) => {},
            other => panic!("Expected invalid problem, got {:?}", other),
        }
    }
    assert_eq!(model.variables().count(), 0);
}

#[test]
fn fractional_integer_bounds() {
    // No integer lies in [0.5, 0.7].
    let mut model = Model::new("narrow", ObjectiveDirection::Minimize);
    let x = model.add_variable(VariableDefinition::new("x").min(0.5).max(0.7).integer())
        .expect("Valid variable");
    model.set_objective(x).expect("Valid objective");
    assert_eq!(model.solve().expect("Solve should not fail"), Status::Infeasible);
    assert_eq!(model.value(x), None);

    // The same bounds admit a continuous solution.
    let mut model = Model::new("narrow", ObjectiveDirection::Minimize);
    let x = model.add_variable(VariableDefinition::new("x").min(0.5).max(0.7))
        .expect("Valid variable");
    model.set_objective(x).expect("Valid objective");
    assert_eq!(model.solve().expect("Solve should not fail"), Status::Optimal);
    assert!((model.value(x).unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn summed_expressions() {
    let vars = [Variable(0), Variable(1), Variable(2)];
    let total: Expression = vars.iter().cloned().sum();
    for &var in vars.iter() {
        assert_eq!(total.coefficient(var), 1.0);
    }

    let weighted: Expression = vars.iter()
        .enumerate()
        .map(|(i, &var)| (i as f64 + 1.0) * var)
        .sum();
    assert_eq!(weighted.evaluate(&[1.0, 1.0, 1.0]), 6.0);

    let empty: Expression = Vec::<Variable>::new().into_iter().sum();
    assert_eq!(empty, Expression::new());
}

#[test]
fn solve_and_reset() {
    let mut model = Model::new("small", ObjectiveDirection::Minimize);
    let x = model.add_variable(VariableDefinition::new("x").min(0.0))
        .expect("Valid variable");
    let y = model.add_variable(VariableDefinition::new("y").min(0.0).max(3.0))
        .expect("Valid variable");
    model.add_constraint("cover", geq(x + y, 4.0)).expect("Valid constraint");
    model.set_objective(2.0 * x + y + 1.0).expect("Valid objective");
    assert_eq!(model.status(), Status::NotSolved);

    assert_eq!(model.solve().expect("Solve should not fail"), Status::Optimal);
    assert_eq!(model.status().code(), 1);
    assert!((model.value(x).unwrap() - 1.0).abs() < 1e-9);
    assert!((model.value(y).unwrap() - 3.0).abs() < 1e-9);
    assert!((model.objective_value().unwrap() - 6.0).abs() < 1e-9);
    let values = model.constraint_values().expect("Model is solved");
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].0, "cover");
    assert!(values[0].1.abs() < 1e-9);
    let names: Vec<&str> = model.variables().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["x", "y"]);

    model.add_constraint("tight", leq(x, 0.5)).expect("Valid constraint");
    assert_eq!(model.status(), Status::NotSolved);
    assert_eq!(model.value(x), None);
    assert_eq!(model.solve().expect("Solve should not fail"), Status::Infeasible);
    assert_eq!(model.status().to_string(), "Infeasible");
    assert_eq!(model.objective_value(), None);
}

#[test]
fn unbounded_model() {
    let mut model = Model::new("open", ObjectiveDirection::Maximize);
    let x = model.add_variable(VariableDefinition::new("x").min(0.0).integer())
        .expect("Valid variable");
    model.set_objective(x).expect("Valid objective");
    assert_eq!(model.solve().expect("Solve should not fail"), Status::Unbounded);
    assert_eq!(model.status().code(), -2);
}

#[test]
fn display_listing() {
    let mut model = Model::new("listing", ObjectiveDirection::Maximize);
    let x = model.add_variable(VariableDefinition::new("x").min(0.0))
        .expect("Valid variable");
    let y = model.add_variable(VariableDefinition::new("y").min(0.0).integer())
        .expect("Valid variable");
    model.add_constraint("blue", leq(-4.0 * x + 5.0 * y, 10.0)).expect("Valid constraint");
    model.set_objective(x + 2.0 * y).expect("Valid objective");
    let text = model.to_string();
    assert_eq!(text, "listing:\n\
                      MAXIMIZE\n\
                      x + 2 y\n\
                      SUBJECT TO\n\
                      blue: -4 x + 5 y <= 10\n\
                      \n\
                      VARIABLES\n\
                      0 <= x Continuous\n\
                      0 <= y Integer\n");
}

#[test]
fn display_negative_constant() {
    let mut model = Model::new("shifted", ObjectiveDirection::Minimize);
    let x = model.add_variable(VariableDefinition::new("x").min(0.0).max(5.0))
        .expect("Valid variable");
    model.set_objective(-x - 3.0).expect("Valid objective");
    let text = model.to_string();
    assert!(text.contains("MINIMIZE\n-x - 3\n"), "{}", text);
    assert!(text.contains("0 <= x <= 5 Continuous\n"), "{}", text);
}
