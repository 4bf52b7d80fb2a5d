//! Camera placement as a set-cover optimization problem.
//!
//! [`CoverageProblem`] is plain data for an external optimizer: one decision
//! variable per camera candidate (deploy or not), one objective (total
//! deployment cost, minimized) and one coverage constraint per target voxel.

use serde::{Deserialize, Serialize};

use crate::camera::CameraCandidates;
use crate::error::ProblemError;
use crate::visibility::{BinaryMatrix, VisibilityMatrix};

/// Optimization direction of one objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Domain of one decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarType {
    Continuous,
    Discrete,
}

/// Decision space: types, bounds and border closedness per variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSpace {
    pub senses: Vec<Sense>,
    pub var_types: Vec<VarType>,
    pub lower_bounds: Vec<f64>,
    pub upper_bounds: Vec<f64>,
    /// `true` = the lower bound itself is allowed
    pub lower_closed: Vec<bool>,
    pub upper_closed: Vec<bool>,
}

impl ProblemSpace {
    pub fn num_vars(&self) -> usize {
        self.var_types.len()
    }

    /// Check that every per-variable array has one entry per variable.
    pub fn validate(&self) -> Result<(), ProblemError> {
        let expected = self.num_vars();
        for (field, actual) in [
            ("lower_bounds", self.lower_bounds.len()),
            ("upper_bounds", self.upper_bounds.len()),
            ("lower_closed", self.lower_closed.len()),
            ("upper_closed", self.upper_closed.len()),
        ] {
            if actual != expected {
                return Err(ProblemError::DimensionMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Whether `value` is admissible for variable `index`.
    pub fn admits(&self, index: usize, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        if self.var_types[index] == VarType::Discrete && value.fract() != 0.0 {
            return false;
        }

        let (lb, ub) = (self.lower_bounds[index], self.upper_bounds[index]);
        let above = if self.lower_closed[index] { value >= lb } else { value > lb };
        let below = if self.upper_closed[index] { value <= ub } else { value < ub };
        above && below
    }
}

/// Objective values and constraint violations of one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub objectives: Vec<f64>,
    /// One entry per target voxel; `<= 0` means satisfied.
    pub violations: Vec<f64>,
}

impl Evaluation {
    pub fn is_feasible(&self) -> bool {
        self.violations.iter().all(|&v| v <= 0.0)
    }
}

/// Fully-cover problem: minimize the cost of the deployed cameras so that
/// every target voxel is seen by at least one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageProblem {
    space: ProblemSpace,
    costs: Vec<f64>,
    visibility: BinaryMatrix,
    /// Target voxel indices, one constraint each.
    targets: Vec<usize>,
}

impl CoverageProblem {
    /// Build the problem from the camera set and its visibility matrix.
    ///
    /// Unavailable cameras get an upper bound of 0 and can never be
    /// deployed.
    pub fn new(cameras: &CameraCandidates, visibility: &VisibilityMatrix) -> Result<Self, ProblemError> {
        let n = cameras.len();
        let upper_bounds = cameras
            .iter()
            .map(|c| if c.is_available() { 1.0 } else { 0.0 })
            .collect();

        let space = ProblemSpace {
            senses: vec![Sense::Minimize],
            var_types: vec![VarType::Discrete; n],
            lower_bounds: vec![0.0; n],
            upper_bounds,
            lower_closed: vec![true; n],
            upper_closed: vec![true; n],
        };

        Self::from_parts(space, cameras.costs(), visibility)
    }

    /// Build from an explicit decision space.
    pub fn from_parts(
        space: ProblemSpace,
        costs: Vec<f64>,
        visibility: &VisibilityMatrix,
    ) -> Result<Self, ProblemError> {
        space.validate()?;

        let expected = space.num_vars();
        if costs.len() != expected {
            return Err(ProblemError::DimensionMismatch {
                field: "costs",
                expected,
                actual: costs.len(),
            });
        }
        if visibility.num_voxels() != expected {
            return Err(ProblemError::DimensionMismatch {
                field: "visibility",
                expected,
                actual: visibility.num_voxels(),
            });
        }

        let targets = visibility
            .target_mask()
            .iter()
            .enumerate()
            .filter(|&(_, &flag)| flag == 1)
            .map(|(index, _)| index)
            .collect();

        Ok(Self {
            space,
            costs,
            visibility: visibility.masked_value(),
            targets,
        })
    }

    pub fn space(&self) -> &ProblemSpace {
        &self.space
    }

    pub fn num_vars(&self) -> usize {
        self.space.num_vars()
    }

    pub fn num_objectives(&self) -> usize {
        self.space.senses.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.targets.len()
    }

    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Visibility restricted to target rows.
    pub fn visibility(&self) -> &BinaryMatrix {
        &self.visibility
    }

    fn check(&self, selection: &[f64]) -> Result<(), ProblemError> {
        if selection.len() != self.num_vars() {
            return Err(ProblemError::DimensionMismatch {
                field: "selection",
                expected: self.num_vars(),
                actual: selection.len(),
            });
        }
        for (index, &value) in selection.iter().enumerate() {
            if !self.space.admits(index, value) {
                return Err(ProblemError::OutOfBounds { index, value });
            }
        }
        Ok(())
    }

    fn is_covered(&self, target: usize, selection: &[f64]) -> bool {
        self.visibility
            .row(target)
            .iter()
            .zip(selection)
            .any(|(&seen, &x)| seen == 1 && x > 0.0)
    }

    /// Total cost and per-target coverage violations of `selection`.
    pub fn evaluate(&self, selection: &[f64]) -> Result<Evaluation, ProblemError> {
        self.check(selection)?;

        let cost: f64 = self
            .costs
            .iter()
            .zip(selection)
            .map(|(c, x)| c * x)
            .sum();
        let violations = self
            .targets
            .iter()
            .map(|&t| if self.is_covered(t, selection) { 0.0 } else { 1.0 })
            .collect();

        Ok(Evaluation {
            objectives: vec![cost],
            violations,
        })
    }

    /// Evaluate every selection of a population.
    pub fn evaluate_population(&self, population: &[Vec<f64>]) -> Result<Vec<Evaluation>, ProblemError> {
        population.iter().map(|x| self.evaluate(x)).collect()
    }

    /// Fraction of target voxels seen by at least one selected camera.
    ///
    /// A problem without targets is fully covered.
    pub fn coverage(&self, selection: &[f64]) -> Result<f64, ProblemError> {
        self.check(selection)?;
        if self.targets.is_empty() {
            return Ok(1.0);
        }
        let covered = self
            .targets
            .iter()
            .filter(|&&t| self.is_covered(t, selection))
            .count();
        Ok(covered as f64 / self.targets.len() as f64)
    }
}
