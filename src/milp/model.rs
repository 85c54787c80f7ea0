//! MILP model definition.

use super::variables::{VarId, VarKind, Variable};
use serde::{Deserialize, Serialize};

/// A linear combination of variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    /// (variable, coefficient) pairs. A variable may appear more than once;
    /// its coefficients are summed.
    pub terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    /// Creates an empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables with coefficient 1.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }

    /// Appends `coefficient * var`.
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    /// Appends all terms of `other` multiplied by `factor`.
    pub fn add_expr(&mut self, other: &LinearExpr, factor: f64) {
        self.terms
            .extend(other.terms.iter().map(|&(v, c)| (v, c * factor)));
    }

    /// Returns a copy with every coefficient multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            terms: self.terms.iter().map(|&(v, c)| (v, c * factor)).collect(),
        }
    }

    /// Whether the expression has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression at the given variable values.
    ///
    /// Variables outside `values` contribute zero.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(v, c)| c * values.get(v.index()).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Relation between the left-hand expression and the right-hand constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    /// `expr <= rhs`
    Le,
    /// `expr >= rhs`
    Ge,
    /// `expr == rhs`
    Eq,
}

/// A linear constraint `expr (<=|>=|==) rhs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Constraint name (diagnostics only).
    pub name: String,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Relation to the right-hand side.
    pub relation: Relation,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl LinearConstraint {
    /// `expr <= rhs`
    pub fn le(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            relation: Relation::Le,
            rhs,
        }
    }

    /// `expr >= rhs`
    pub fn ge(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            relation: Relation::Ge,
            rhs,
        }
    }

    /// `expr == rhs`
    pub fn eq(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            relation: Relation::Eq,
            rhs,
        }
    }

    /// Whether the constraint holds at `values` within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.relation {
            Relation::Le => lhs <= self.rhs + tolerance,
            Relation::Ge => lhs >= self.rhs - tolerance,
            Relation::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// Objective function for the MILP model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Objective {
    /// Minimize a linear combination of variables.
    Minimize {
        /// (variable, coefficient) pairs.
        terms: Vec<(VarId, f64)>,
    },

    /// Maximize a linear combination of variables.
    Maximize {
        /// (variable, coefficient) pairs.
        terms: Vec<(VarId, f64)>,
    },
}

impl Objective {
    /// The objective's terms regardless of sense.
    pub fn terms(&self) -> &[(VarId, f64)] {
        match self {
            Objective::Minimize { terms } | Objective::Maximize { terms } => terms,
        }
    }

    /// Whether this objective is maximized.
    pub fn is_maximize(&self) -> bool {
        matches!(self, Objective::Maximize { .. })
    }

    /// Value of the objective at `values`.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms()
            .iter()
            .map(|&(v, c)| c * values.get(v.index()).copied().unwrap_or(0.0))
            .sum()
    }
}

/// A mixed-integer linear program.
///
/// Contains variables, linear constraints and an optional objective.
/// The model is a plain value: building it has no side effects and it can
/// be handed to any [`MilpSolver`](super::MilpSolver).
///
/// # Examples
///
/// ```
/// use u_allot::milp::{LinearConstraint, LinearExpr, MilpModel, Objective, Variable};
///
/// let mut model = MilpModel::new("example");
/// let x = model.add_variable(Variable::binary("x"));
/// let y = model.add_variable(Variable::binary("y"));
/// model.add_constraint(LinearConstraint::eq("pick_one", LinearExpr::sum([x, y]), 1.0));
/// model.set_objective(Objective::Maximize { terms: vec![(x, 2.0), (y, 1.0)] });
/// assert!(model.validate().is_ok());
/// assert_eq!(model.binary_count(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilpModel {
    /// Model name.
    pub name: String,
    /// Variables, indexed by [`VarId`].
    pub variables: Vec<Variable>,
    /// Constraints.
    pub constraints: Vec<LinearConstraint>,
    /// Objective function.
    pub objective: Option<Objective>,
}

impl MilpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    /// Adds a variable and returns its id.
    pub fn add_variable(&mut self, var: Variable) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(var);
        id
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Looks up a variable.
    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    /// Validates the model for consistency.
    ///
    /// Checks that all referenced variables exist, that bounds are ordered
    /// and that all coefficients and right-hand sides are finite.
    pub fn validate(&self) -> Result<(), String> {
        for var in &self.variables {
            var.validate()?;
        }
        let check_terms = |owner: &str, terms: &[(VarId, f64)]| -> Result<(), String> {
            for &(id, coefficient) in terms {
                if id.index() >= self.variables.len() {
                    return Err(format!("{owner}: undefined variable #{}", id.index()));
                }
                if !coefficient.is_finite() {
                    return Err(format!("{owner}: non-finite coefficient {coefficient}"));
                }
            }
            Ok(())
        };
        for constraint in &self.constraints {
            check_terms(&constraint.name, &constraint.expr.terms)?;
            if !constraint.rhs.is_finite() {
                return Err(format!("{}: non-finite right-hand side", constraint.name));
            }
        }
        if let Some(objective) = &self.objective {
            check_terms("objective", objective.terms())?;
        }
        Ok(())
    }

    /// Whether every constraint holds at `values`.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.variables.len()
            && self.variables.iter().zip(values).all(|(var, &value)| {
                value >= var.lower - tolerance
                    && var.upper.map_or(true, |upper| value <= upper + tolerance)
            })
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied(values, tolerance))
    }

    /// Objective value at `values`, `None` without an objective.
    pub fn evaluate(&self, values: &[f64]) -> Option<f64> {
        self.objective.as_ref().map(|o| o.evaluate(values))
    }

    /// Returns the number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Returns the number of binary variables.
    pub fn binary_count(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.kind == VarKind::Binary)
            .count()
    }

    /// Returns the number of continuous variables.
    pub fn continuous_count(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.kind == VarKind::Continuous)
            .count()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
