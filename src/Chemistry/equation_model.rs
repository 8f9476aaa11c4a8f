//! # Equation Model Module
//!
//! ## Purpose
//! Structures produced by the equation parser and consumed by the balancer:
//! `Atom` -> `AtomGroup` -> `Molecule` -> `Agent` -> `Equation`.
//!
//! ## Key Features
//! - **Brutto formula**: `AtomGroup` keeps atoms sorted by symbol and merges duplicates, so
//!   `C2H5OH` is stored as `{C: 2, H: 6, O: 1}`
//! - **Balance matrix**: `Equation::build_balance_matrix` writes one atom balance equation per
//!   element, reagents with `+`, products with `-`, plus the zero right-hand side
//! - **Atom counts** never exceed `MAX_COUNT` (`i64::MAX`), so every count fits a signed
//!   matrix entry. Operations that would go beyond it return `None` and leave the group as it was
//! - **Rendering**: coefficients are written in front of the original molecule text, coefficient 1
//!   is omitted

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::Algebra::balance_matrix::BalanceMatrix;
use crate::Algebra::matrix::{Matrix, MatrixError};
use crate::Algebra::rational::Rational;

/// largest atom count of a molecule, the largest value of a balance matrix entry
pub const MAX_COUNT: u64 = i64::MAX as u64;

/// invalid vector of coefficients passed to the equation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("number of coefficients {found} does not match number of reagents and products {expected}")]
    CoefficientCount { expected: usize, found: usize },
    #[error("coefficient {value} at position {index} is less than or equal to zero")]
    NonPositiveCoefficient { index: usize, value: i64 },
}

/// single atom with its index, e.g. O2 -> {symbol: "O", count: 2}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    pub symbol: String,
    pub count: u64,
}

impl Atom {
    /// count 0 means "no index" and is replaced by 1
    pub fn new(symbol: &str, count: u64) -> Self {
        Self {
            symbol: symbol.to_string(),
            count: count.max(1),
        }
    }
}

/// Multiset of atoms keyed by symbol
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomGroup {
    atoms: BTreeMap<String, u64>,
}

impl AtomGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// None if a summed count goes beyond `MAX_COUNT`
    pub fn from_atoms(atoms: Vec<Atom>) -> Option<Self> {
        let mut group = Self::new();
        for atom in atoms {
            group.add_atom(atom)?;
        }
        Some(group)
    }

    /// Adds an atom, summing counts of atoms with the same symbol.
    /// None if the count goes beyond `MAX_COUNT`, the group is left untouched
    pub fn add_atom(&mut self, atom: Atom) -> Option<&mut Self> {
        let count = checked_count(self.count_of(&atom.symbol), atom.count)?;
        self.atoms.insert(atom.symbol, count);
        Some(self)
    }

    /// Merge-union with another group. None on overflow, the group is left untouched
    pub fn add_group(&mut self, other: &AtomGroup) -> Option<&mut Self> {
        let mut merged = self.atoms.clone();
        for (symbol, &count) in &other.atoms {
            let sum = checked_count(self.count_of(symbol), count)?;
            merged.insert(symbol.clone(), sum);
        }
        self.atoms = merged;
        Some(self)
    }

    /// Group index: multiplies counts of all atoms. None on overflow, the group is left untouched
    pub fn multiply(&mut self, index: u64) -> Option<&mut Self> {
        let mut scaled = BTreeMap::new();
        for (symbol, count) in &self.atoms {
            let product = count.checked_mul(index).filter(|&c| c <= MAX_COUNT)?;
            scaled.insert(symbol.clone(), product);
        }
        self.atoms = scaled;
        Some(self)
    }

    pub fn count_of(&self, symbol: &str) -> u64 {
        self.atoms.get(symbol).copied().unwrap_or(0)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.atoms.keys().map(|s| s.as_str())
    }

    pub fn atoms(&self) -> Vec<Atom> {
        self.atoms
            .iter()
            .map(|(symbol, &count)| Atom {
                symbol: symbol.clone(),
                count,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

fn checked_count(current: u64, added: u64) -> Option<u64> {
    current.checked_add(added).filter(|&c| c <= MAX_COUNT)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Molecule {
    formula: AtomGroup,
    source: String,
    coefficient: String,
}

impl Molecule {
    pub fn new(formula: AtomGroup, source: &str) -> Self {
        Self {
            formula,
            source: source.to_string(),
            coefficient: String::new(),
        }
    }

    pub fn formula(&self) -> &AtomGroup {
        &self.formula
    }

    /// molecule exactly as the user typed it (trimmed)
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn coefficient(&self) -> &str {
        &self.coefficient
    }
}

/// molecules are the same if they were written the same way
impl PartialEq for Molecule {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Reagent,
    Product,
}

/// participant of the reaction: reagent or product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub role: Role,
    pub molecule: Molecule,
}

impl Agent {
    pub fn new(role: Role, molecule: Molecule) -> Self {
        Self { role, molecule }
    }

    pub fn formula(&self) -> &AtomGroup {
        self.molecule.formula()
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.molecule.coefficient, self.molecule.source)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equation {
    reagents: Vec<Agent>,
    products: Vec<Agent>,
    source: String,
}

impl Equation {
    pub fn new(source: &str) -> Self {
        Self {
            reagents: Vec::new(),
            products: Vec::new(),
            source: source.to_string(),
        }
    }

    pub fn add_reagent(&mut self, molecule: Molecule) -> &mut Self {
        self.reagents.push(Agent::new(Role::Reagent, molecule));
        self
    }

    pub fn add_product(&mut self, molecule: Molecule) -> &mut Self {
        self.products.push(Agent::new(Role::Product, molecule));
        self
    }

    pub fn reagents(&self) -> &[Agent] {
        &self.reagents
    }

    pub fn products(&self) -> &[Agent] {
        &self.products
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// reagents then products, the order of columns in the balance matrix
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.reagents.iter().chain(self.products.iter())
    }

    /// all atom symbols of the reaction without duplicates, in order of appearance
    pub fn all_atom_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = Vec::new();
        for agent in self.agents() {
            for symbol in agent.formula().symbols() {
                if !symbols.iter().any(|s| s == symbol) {
                    symbols.push(symbol.to_string());
                }
            }
        }
        symbols
    }

    /// Integer rows of the atom balance system:
    /// sum(reagent count * coefficient) - sum(product count * coefficient) = 0
    /// Counts are at most `MAX_COUNT`, so the casts and the negation are exact.
    pub fn balance_rows(&self) -> Vec<Vec<i64>> {
        self.all_atom_symbols()
            .iter()
            .map(|symbol| {
                let mut row: Vec<i64> = self
                    .reagents
                    .iter()
                    .map(|agent| agent.formula().count_of(symbol) as i64)
                    .collect();
                row.extend(
                    self.products
                        .iter()
                        .map(|agent| -(agent.formula().count_of(symbol) as i64)),
                );
                row.push(0);
                row
            })
            .collect()
    }

    pub fn build_balance_matrix(&self) -> Result<BalanceMatrix, MatrixError> {
        let mut matrix = Matrix::new();
        for row in self.balance_rows() {
            matrix.append_row(row.into_iter().map(Rational::from).collect())?;
        }
        Ok(BalanceMatrix::new(matrix))
    }

    /// Writes coefficients in front of reagents and products. Coefficient 1 is not written
    pub fn assign_coefficients(&mut self, coefficients: &[i64]) -> Result<(), ArgumentError> {
        let expected = self.reagents.len() + self.products.len();
        if coefficients.len() != expected {
            return Err(ArgumentError::CoefficientCount {
                expected,
                found: coefficients.len(),
            });
        }
        if let Some((index, &value)) = coefficients.iter().enumerate().find(|(_, k)| **k <= 0) {
            return Err(ArgumentError::NonPositiveCoefficient { index, value });
        }
        let agents = self.reagents.iter_mut().chain(self.products.iter_mut());
        for (agent, &k) in agents.zip(coefficients) {
            agent.molecule.coefficient = if k == 1 { String::new() } else { k.to_string() };
        }
        Ok(())
    }

    /// numeric coefficients currently written in the equation (1 where nothing is written)
    pub fn coefficients(&self) -> Vec<i64> {
        self.agents()
            .map(|agent| agent.molecule.coefficient.parse::<i64>().unwrap_or(1))
            .collect()
    }

    /// For every atom symbol: atoms on the left minus atoms on the right for the given
    /// coefficients. All zeros means the equation is balanced.
    pub fn atom_balance(&self, coefficients: &[i64]) -> Vec<(String, i128)> {
        self.all_atom_symbols()
            .into_iter()
            .zip(self.balance_rows())
            .map(|(symbol, row)| {
                let sum: i128 = row
                    .iter()
                    .zip(coefficients)
                    .map(|(&a, &k)| a as i128 * k as i128)
                    .sum();
                (symbol, sum)
            })
            .collect()
    }

    pub fn is_balanced(&self, coefficients: &[i64]) -> bool {
        coefficients.len() == self.reagents.len() + self.products.len()
            && self.atom_balance(coefficients).iter().all(|(_, s)| *s == 0)
    }

    /// equation with coefficients, e.g. "2H2 + O2 = 2H2O"
    pub fn render(&self) -> String {
        let join = |agents: &[Agent]| {
            agents
                .iter()
                .map(|agent| agent.to_string())
                .collect::<Vec<_>>()
                .join(" + ")
        };
        format!("{} = {}", join(&self.reagents), join(&self.products))
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
