//! # Balancer Module
//!
//! ## Aim
//! Entry point of the library: parse the equation, build the balance matrix, solve it and write
//! the coefficients back into the equation.
//!
//! ## Usage
//! - `balance_equation("H2 + O2 = H2O")` returns `"2H2 + O2 = 2H2O"`
//! - `balance(source)` returns a `BalanceReport` with the coefficients and the rendered equation
//! - `EquationBalancer` keeps the source between calls for interactive front ends:
//!   `set_source` then `execute`
//!
//! ## Errors
//! `BalancerError` collects all errors of the pipeline. Only syntax errors and balance errors are
//! meant to be shown to the user, everything else is an internal failure.

use log::{debug, info, warn};
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::equation_model::{ArgumentError, Equation, Role};
use super::equation_parser::{SyntaxError, parse_equation};
use crate::Algebra::balance_matrix::{BalanceError, BalanceMatrix, SolveError};
use crate::Algebra::matrix::MatrixError;
use crate::Algebra::rational::RationalError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BalancerError {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
    #[error("{0}")]
    Balance(#[from] BalanceError),
    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),
    #[error("invalid coefficients: {0}")]
    Argument(#[from] ArgumentError),
}

impl From<SolveError> for BalancerError {
    fn from(e: SolveError) -> Self {
        match e {
            SolveError::Balance(e) => BalancerError::Balance(e),
            SolveError::Matrix(e) => BalancerError::Matrix(e),
        }
    }
}

impl From<RationalError> for BalancerError {
    fn from(e: RationalError) -> Self {
        BalancerError::Matrix(MatrixError::Arithmetic(e))
    }
}

impl BalancerError {
    /// syntax and balance errors are caused by the input, the rest are internal failures
    pub fn is_user_facing(&self) -> bool {
        matches!(self, BalancerError::Syntax(_) | BalancerError::Balance(_))
    }
}

/// one substance of the balanced equation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoleculeEntry {
    pub role: Role,
    pub formula: String,
    pub coefficient: i64,
}

/// Result of balancing, serializable for JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub input: String,
    pub balanced: String,
    pub coefficients: Vec<i64>,
    pub molecules: Vec<MoleculeEntry>,
    pub atoms: Vec<String>,
}

impl BalanceReport {
    fn from_equation(equation: &Equation) -> Self {
        let coefficients = equation.coefficients();
        let molecules = equation
            .agents()
            .zip(&coefficients)
            .map(|(agent, &k)| MoleculeEntry {
                role: agent.role,
                formula: agent.molecule.source().to_string(),
                coefficient: k,
            })
            .collect();
        Self {
            input: equation.source().to_string(),
            balanced: equation.render(),
            coefficients,
            molecules,
            atoms: equation.all_atom_symbols(),
        }
    }

    /// table of substances and their coefficients
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["Role", "Substance", "Coefficient"]);
        for entry in &self.molecules {
            let role = match entry.role {
                Role::Reagent => "reagent",
                Role::Product => "product",
            };
            table.add_row(row![role, entry.formula, entry.coefficient]);
        }
        table
    }
}

/// Parses and balances the equation
pub fn balance(source: &str) -> Result<BalanceReport, BalancerError> {
    info!("balancing '{}'", source);
    let mut equation = parse_equation(source)?;
    let mut matrix = equation.build_balance_matrix()?;
    let coefficients = matrix.get_solution()?;
    debug!("coefficients: {:?}", coefficients);
    if let Some((symbol, _)) = equation
        .atom_balance(&coefficients)
        .into_iter()
        .find(|(_, sum)| *sum != 0)
    {
        warn!("coefficients {:?} do not conserve atoms of '{}'", coefficients, source);
        return Err(BalanceError::AtomsNotConserved(symbol).into());
    }
    equation.assign_coefficients(&coefficients)?;
    let report = BalanceReport::from_equation(&equation);
    info!("balanced: '{}'", report.balanced);
    Ok(report)
}

/// Balances the equation and returns it as a string, e.g. "2H2 + O2 = 2H2O"
pub fn balance_equation(source: &str) -> Result<String, BalancerError> {
    Ok(balance(source)?.balanced)
}

/// Raw (unsolved) balance matrix of the equation
pub fn balance_matrix_of(source: &str) -> Result<BalanceMatrix, BalancerError> {
    let equation = parse_equation(source)?;
    Ok(equation.build_balance_matrix()?)
}

/// Holds the equation text for front ends which set the source and run the balancing separately
#[derive(Debug, Clone, Default)]
pub struct EquationBalancer {
    source: String,
}

impl EquationBalancer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_source(&mut self, source: &str) -> &mut Self {
        self.source = source.to_string();
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn execute(&self) -> Result<String, BalancerError> {
        balance_equation(&self.source)
    }

    pub fn report(&self) -> Result<BalanceReport, BalancerError> {
        balance(&self.source)
    }
}
