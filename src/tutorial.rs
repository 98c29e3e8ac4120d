//! The resource allocation example, stated both ways:
//!
//! ```text
//! maximize    z = x + 2y
//! subject to  2x +  y <= 20     (red)
//!            -4x + 5y <= 10     (blue)
//!            - x + 2y >= -2     (yellow)
//!            - x + 5y  = 15     (green)
//!             x, y >= 0
//! ```

use crate::builder::ObjectiveDirection;
use crate::error::Error;
use crate::linprog::{linprog, LinearConstraints, LinprogOptions, OptimizeResult};
use crate::model::{eq, geq, leq, Category, Model, VariableDefinition};

/// Objective and constraint arrays for [`linprog`]. The objective is negated
/// to turn maximization into minimization, and the yellow row is negated
/// into a `<=` row.
pub fn arrays() -> (Vec<f64>, LinearConstraints) {
    let obj = vec![-1.0, -2.0];
    let constraints = LinearConstraints {
        a_ub: Some(vec![vec![2.0, 1.0], vec![-4.0, 5.0], vec![1.0, -2.0]]),
        b_ub: Some(vec![20.0, 10.0, 2.0]),
        a_eq: Some(vec![vec![-1.0, 5.0]]),
        b_eq: Some(vec![15.0]),
        bounds: Some(vec![(0.0, f64::INFINITY), (0.0, f64::INFINITY)]),
    };
    (obj, constraints)
}

pub fn solve_arrays(options: &LinprogOptions) -> Result<OptimizeResult, Error> {
    let (obj, constraints) = arrays();
    linprog(&obj, &constraints, options)
}

/// The same problem as a named model. `x_category` decides whether `x`
/// must take integer values.
pub fn model(x_category: Category) -> Result<Model, Error> {
    let mut model = Model::new("resource_allocation", ObjectiveDirection::Maximize);

    let x = model.add_variable(VariableDefinition::new("x").min(0.0).category(x_category))?;
    let y = model.add_variable(VariableDefinition::new("y").min(0.0))?;

    model.add_constraint("red_constraint", leq(2.0 * x + y, 20.0))?;
    model.add_constraint("blue_constraint", leq(-4.0 * x + 5.0 * y, 10.0))?;
    model.add_constraint("yellow_constraint", geq(-x + 2.0 * y, -2.0))?;
    model.add_constraint("green_constraint", eq(-x + 5.0 * y, 15.0))?;

    model.set_objective(x + 2.0 * y)?;
    Ok(model)
}

#[cfg(test)]
use crate::linprog::LinprogStatus;
#[cfg(test)]
use crate::mip::BranchAndBound;
#[cfg(test)]
use crate::model::Status;
#[cfg(test)]
use crate::problem::Method;

#[cfg(test)]
fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "{} != {}", actual, expected);
}

#[test]
fn arrays_optimum() {
    for &method in &[Method::Simplex, Method::Interior] {
        let options = LinprogOptions { method, ..LinprogOptions::default() };
        let result = solve_arrays(&options).expect("linprog should not fail");
        assert_eq!(result.status, LinprogStatus::Success);
        assert!(result.success);
        assert_eq!(result.message, "Optimization terminated successfully.");

        let x = result.x.as_ref().expect("Solved problem has x");
        assert_close(x[0], 85.0 / 11.0);
        assert_close(x[1], 50.0 / 11.0);
        assert_close(result.fun.expect("Solved problem has fun"), -185.0 / 11.0);

        let slack = result.slack.as_ref().expect("Solved problem has slack");
        assert_close(slack[0], 0.0);
        assert_close(slack[1], 200.0 / 11.0);
        assert_close(slack[2], 37.0 / 11.0);
        let con = result.con.as_ref().expect("Solved problem has con");
        assert_close(con[0], 0.0);
    }
}

#[test]
fn continuous_model() {
    for &method in &[Method::Simplex, Method::Interior] {
        let mut model = model(Category::Continuous).expect("Model is valid");
        let status = model.solve_with(&BranchAndBound::new(method))
            .expect("Solve should not fail");
        assert_eq!(status, Status::Optimal);

        let x = model.variable("x").expect("x exists");
        let y = model.variable("y").expect("y exists");
        assert_close(model.value(x).unwrap(), 85.0 / 11.0);
        assert_close(model.value(y).unwrap(), 50.0 / 11.0);
        assert_close(model.objective_value().unwrap(), 185.0 / 11.0);
    }
}

#[test]
fn integer_model() {
    for &method in &[Method::Simplex, Method::Interior] {
        let mut model = model(Category::Integer).expect("Model is valid");
        let status = model.solve_with(&BranchAndBound::new(method))
            .expect("Solve should not fail");
        assert_eq!(status, Status::Optimal);
        assert_eq!(status.to_string(), "Optimal");

        let x = model.variable("x").expect("x exists");
        let y = model.variable("y").expect("y exists");
        assert_eq!(model.value(x), Some(7.0));
        assert_close(model.value(y).unwrap(), 4.4);
        assert_close(model.objective_value().unwrap(), 15.8);

        let values: Vec<f64> = model.variables().map(|(_, value)| value.unwrap()).collect();
        for name in &["red_constraint", "blue_constraint", "yellow_constraint", "green_constraint"] {
            let constraint = model.constraint(name).expect("Constraint exists");
            assert!(constraint.is_satisfied(&values, 1e-9), "{} violated", name);
        }
        let residuals = model.constraint_values().expect("Model is solved");
        assert_eq!(residuals[0].0, "red_constraint");
        assert_close(residuals[0].1, -1.6);
        assert_close(residuals[3].1, 0.0);
    }
}

#[test]
fn default_backend() {
    let mut model = model(Category::Integer).expect("Model is valid");
    assert_eq!(model.solve().expect("Solve should not fail"), Status::Optimal);
    assert_close(model.objective_value().unwrap(), 15.8);
}
