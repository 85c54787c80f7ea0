//! MILP variable types.

use serde::{Deserialize, Serialize};

/// Index of a variable within a [`MilpModel`](super::MilpModel).
///
/// Ids are handed out by [`MilpModel::add_variable`](super::MilpModel::add_variable)
/// in declaration order and are only meaningful for the model that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl VarId {
    /// Position of the variable in the model's variable list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Domain class of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    /// Takes the value 0 or 1.
    Binary,
    /// Real-valued within its bounds.
    Continuous,
}

/// A decision variable with bounds.
///
/// # Examples
///
/// ```
/// use u_allot::milp::{Variable, VarKind};
///
/// let x = Variable::binary("assign[0,Igel]");
/// assert_eq!(x.kind, VarKind::Binary);
/// assert_eq!(x.upper, Some(1.0));
///
/// let gap = Variable::non_negative("age_gap[Igel]");
/// assert_eq!(gap.lower, 0.0);
/// assert!(gap.upper.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name (diagnostics only, not required to be unique).
    pub name: String,
    /// Domain class.
    pub kind: VarKind,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound, `None` for unbounded above.
    pub upper: Option<f64>,
}

impl Variable {
    /// Creates a binary variable.
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Binary,
            lower: 0.0,
            upper: Some(1.0),
        }
    }

    /// Creates a continuous variable with the given bounds.
    pub fn continuous(name: impl Into<String>, lower: f64, upper: Option<f64>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Continuous,
            lower,
            upper,
        }
    }

    /// Creates a continuous variable bounded below by zero.
    pub fn non_negative(name: impl Into<String>) -> Self {
        Self::continuous(name, 0.0, None)
    }

    /// Whether this variable is integral.
    pub fn is_binary(&self) -> bool {
        self.kind == VarKind::Binary
    }

    /// Checks the bounds are finite where set and ordered.
    pub fn validate(&self) -> Result<(), String> {
        if !self.lower.is_finite() {
            return Err(format!("variable {}: lower bound must be finite", self.name));
        }
        if let Some(upper) = self.upper {
            if !upper.is_finite() {
                return Err(format!("variable {}: upper bound must be finite", self.name));
            }
            if upper < self.lower {
                return Err(format!(
                    "variable {}: upper bound {upper} below lower bound {}",
                    self.name, self.lower
                ));
            }
        }
        Ok(())
    }
}
