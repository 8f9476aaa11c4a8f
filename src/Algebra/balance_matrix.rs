//! # Balance Matrix Module
//!
//! ## Aim
//! Solves the homogeneous system of atom balance equations of a chemical reaction and returns
//! the minimal positive integer stoichiometric coefficients.
//!
//! ## Main Data Structures and Logic
//! - `BalanceMatrix`: augmented matrix of fractions, one row per chemical element, one column per
//!   reagent and product plus the zero right-hand side
//! - `SolveStage`: Raw -> Triangular -> Diagonal -> UnitForm -> IntegerSolution. Each stage is
//!   computed once; asking for a later stage runs the missing ones in order
//! - Triangular view: fraction-free (Bareiss) elimination, every step divides by the pivot of the
//!   previous step
//! - Diagonal view: backward pass of Gauss method from the last non-zero row
//! - Unit view: every row divided by its leading element
//! - Solution: with the free variable (last substance) set to 1, every basic variable equals the
//!   negated entry of its row in the column of the last substance. All of them must be positive,
//!   otherwise the only solution mixes signs and no reaction is possible. The vector is multiplied
//!   by the lcm of the denominators
//!
//! ## Limitations
//! Only systems with exactly one free variable are balanced. Two or more free variables mean
//! that the reaction is a combination of independent reactions and there is no unique answer.

use log::{debug, info};
use prettytable::{Cell, Row, Table};
use thiserror::Error;

use super::matrix::{Matrix, MatrixError};
use super::rational::{Rational, RationalError, lcm};

/// errors of the balancing itself, i.e. the system has no unique positive solution
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error(
        "Unable to balance the equation: the system has more than one free variable. Check the input data"
    )]
    AmbiguousSystem,
    #[error("All coefficients are equal to zero")]
    AllCoefficientsZero,
    #[error("One or more coefficients are less than or equal to zero")]
    NonPositiveCoefficient,
    #[error("Coefficients do not conserve atom {0}")]
    AtomsNotConserved(String),
}

/// error of the solve pipeline: either the system has no answer or an internal matrix failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error(transparent)]
    Balance(#[from] BalanceError),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

impl From<RationalError> for SolveError {
    fn from(e: RationalError) -> Self {
        SolveError::Matrix(MatrixError::Arithmetic(e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SolveStage {
    Raw,
    Triangular,
    Diagonal,
    UnitForm,
    IntegerSolution,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceMatrix {
    matrix: Matrix<Rational>,
    stage: SolveStage,
}

impl BalanceMatrix {
    pub fn new(matrix: Matrix<Rational>) -> Self {
        Self {
            matrix,
            stage: SolveStage::Raw,
        }
    }

    /// Creates the matrix from rows of integers (element counts)
    pub fn from_integer_rows(rows: Vec<Vec<i64>>) -> Result<Self, MatrixError> {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Rational::from).collect())
            .collect();
        Ok(Self::new(Matrix::from_rows(rows)?))
    }

    pub fn stage(&self) -> SolveStage {
        self.stage
    }

    pub fn matrix(&self) -> &Matrix<Rational> {
        &self.matrix
    }

    pub fn rows_count(&self) -> usize {
        self.matrix.rows_count()
    }

    pub fn cols_count(&self) -> usize {
        self.matrix.cols_count()
    }

    /// index of the first non-zero element of the row, None for a zero row
    pub fn first_non_zero_in_row(&self, row: usize) -> Result<Option<usize>, MatrixError> {
        let values = self.matrix.clone_row(row)?;
        Ok(values.iter().position(|x| !x.is_zero()))
    }

    fn is_zero_row(&self, row: usize) -> Result<bool, MatrixError> {
        Ok(self.first_non_zero_in_row(row)?.is_none())
    }

    /// index of the last row with at least one non-zero element, searching from the bottom
    fn last_non_zero_row(&self) -> Result<Option<usize>, MatrixError> {
        for i in (0..self.rows_count()).rev() {
            if !self.is_zero_row(i)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    /// Swaps `start_row` with the first row below it whose first non-zero element is in column
    /// `col`. If there is no such row the matrix stays as it is.
    pub fn swap_row_below_if_needed(
        &mut self,
        start_row: usize,
        col: usize,
    ) -> Result<&mut Self, MatrixError> {
        if !self.matrix.is_valid_row_index(start_row) {
            return Err(MatrixError::InvalidIndex {
                index: start_row,
                len: self.rows_count(),
            });
        }
        self.matrix.check_col(col)?;
        for row in start_row + 1..self.rows_count() {
            if self.first_non_zero_in_row(row)? == Some(col) {
                debug!("swapping rows {} and {} to get pivot in column {}", start_row, row, col);
                self.matrix.swap_rows(start_row, row)?;
                break;
            }
        }
        Ok(self)
    }

    /// row[target] += factor * row[source]
    pub fn linear_combination(
        &mut self,
        target: usize,
        source: usize,
        factor: Rational,
    ) -> Result<&mut Self, MatrixError> {
        let source_row = self.matrix.clone_row(source)?;
        self.matrix.clone_row(target)?;
        for (j, value) in source_row.into_iter().enumerate() {
            let mut term = value;
            term.mul(factor)?;
            self.matrix[(target, j)].add(term)?;
        }
        Ok(self)
    }

    /// Triangular view by Bareiss algorithm:
    /// a[i][j] = (a[r][c]*a[i][j] - a[i][c]*a[r][j]) / p
    /// where r, c are the pivot row and column and p is the pivot of the previous step
    pub fn triangularize(&mut self) -> Result<&mut Self, SolveError> {
        if self.stage >= SolveStage::Triangular {
            return Ok(self);
        }
        let rows = self.rows_count();
        let cols = self.cols_count();
        let mut p = Rational::one();
        for r in 0..rows {
            if cols == 0 {
                break;
            }
            let mut c = r;
            if c >= cols || self.matrix[(r, c)].is_zero() {
                if c < cols {
                    self.swap_row_below_if_needed(r, c)?;
                }
                match self.first_non_zero_in_row(r)? {
                    Some(col) => c = col,
                    None => break,
                }
            }
            let pivot = self.matrix[(r, c)];
            for i in 0..rows {
                if i == r {
                    continue;
                }
                let current = self.matrix.clone_row(i)?;
                for j in 0..cols {
                    let mut subtrahend = self.matrix[(r, j)];
                    subtrahend.mul(current[c])?;
                    self.matrix[(i, j)].mul(pivot)?.sub(subtrahend)?.div(p)?;
                }
            }
            p = pivot;
        }
        debug!("triangular view:\n{}", self.to_table());
        self.stage = SolveStage::Triangular;
        Ok(self)
    }

    /// Diagonal view: backward pass from the last non-zero row up to the second row
    pub fn diagonalize(&mut self) -> Result<&mut Self, SolveError> {
        if self.stage >= SolveStage::Diagonal {
            return Ok(self);
        }
        self.triangularize()?;
        if self.rows_count() > 1 {
            if let Some(last) = self.last_non_zero_row()? {
                for i in (1..=last).rev() {
                    let Some(reference) = self.first_non_zero_in_row(i)? else {
                        continue;
                    };
                    for j in (0..i).rev() {
                        // k = -a[j][ref] / a[i][ref]
                        let mut k = self.matrix[(i, reference)];
                        k.reciprocal()?.mul(self.matrix[(j, reference)])?.mul(-1i64)?;
                        self.linear_combination(j, i, k)?;
                    }
                }
            }
        }
        debug!("diagonal view:\n{}", self.to_table());
        self.stage = SolveStage::Diagonal;
        Ok(self)
    }

    /// Unit view: each row is divided by its first non-zero element
    pub fn normalize(&mut self) -> Result<&mut Self, SolveError> {
        if self.stage >= SolveStage::UnitForm {
            return Ok(self);
        }
        self.diagonalize()?;
        for i in 0..self.rows_count() {
            let Some(lead) = self.first_non_zero_in_row(i)? else {
                break;
            };
            let k = self.matrix[(i, lead)];
            for j in 0..self.cols_count() {
                self.matrix[(i, j)].div(k)?;
            }
        }
        debug!("unit view:\n{}", self.to_table());
        self.stage = SolveStage::UnitForm;
        Ok(self)
    }

    /// number of basic variables: length of the non-zero run on the main diagonal
    pub fn basic_variables_count(&self) -> usize {
        let mut cnt = 0;
        while cnt < self.rows_count() && cnt < self.cols_count() {
            if self.matrix[(cnt, cnt)].is_zero() {
                break;
            }
            cnt += 1;
        }
        cnt
    }

    /// Minimal positive integer solution of the system: one coefficient per substance
    pub fn get_solution(&mut self) -> Result<Vec<i64>, SolveError> {
        self.normalize()?;
        let cols = self.cols_count();
        let cnt = self.basic_variables_count();
        info!(
            "balance matrix {}x{}: {} basic variables",
            self.rows_count(),
            cols,
            cnt
        );
        if cols >= cnt + 3 {
            return Err(BalanceError::AmbiguousSystem.into());
        }
        if cols <= cnt + 1 {
            return Err(BalanceError::AllCoefficientsZero.into());
        }
        let mut solution = Vec::with_capacity(cnt + 1);
        for j in 0..cnt {
            let value = self.matrix[(j, cols - 2)];
            if !value.is_negative() {
                debug!("basic variable {} = {} is not positive", j, value);
                return Err(BalanceError::NonPositiveCoefficient.into());
            }
            solution.push(value.abs()?);
        }
        // free variable
        solution.push(Rational::one());

        let integers = to_integer(&mut solution)?;
        if integers.iter().any(|&k| k <= 0) {
            return Err(BalanceError::NonPositiveCoefficient.into());
        }
        self.stage = SolveStage::IntegerSolution;
        Ok(integers)
    }

    /// current state of the matrix as a pretty table
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        for row in self.matrix.to_string_rows() {
            table.add_row(Row::new(row.iter().map(|cell| Cell::new(cell)).collect()));
        }
        table
    }
}

/// Multiplies every fraction by the lcm of all denominators and returns the numerators
fn to_integer(values: &mut [Rational]) -> Result<Vec<i64>, RationalError> {
    let mut common = 1;
    for value in values.iter() {
        common = lcm(value.denominator(), common)?;
    }
    let mut result = Vec::with_capacity(values.len());
    for value in values.iter_mut() {
        result.push(value.mul(common)?.numerator());
    }
    Ok(result)
}
