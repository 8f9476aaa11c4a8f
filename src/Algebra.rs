/// Exact fraction arithmetic
///
///  # Examples
/// ```
/// use KiStoich::Algebra::rational::Rational;
/// let mut a = Rational::new(2, 4).unwrap();
/// a.mul(Rational::new(2, 1).unwrap()).unwrap();
/// assert!(a.equals(Rational::one()));
/// ```
pub mod rational;
/// Generic resizable matrix (nalgebra storage) with row operations
pub mod matrix;
/// eng
/// Augmented matrix of atom balance equations and its solution by fraction-free
/// Gauss (Bareiss) elimination. The matrix has one row per element and one column per substance,
/// reagents first, then products, and a zero column at the end.
/// The answer is a vector of minimal positive integer coefficients.
/// ru
/// Расширенная матрица уравнений материального баланса и ее решение методом Бареиса.
/// Одна строка на каждый химический элемент, один столбец на каждое вещество (сначала реагенты,
/// затем продукты) и нулевой столбец в конце.
/// # Examples
/// ```
/// use KiStoich::Algebra::balance_matrix::BalanceMatrix;
/// // H2 + O2 = H2O
/// let mut m = BalanceMatrix::from_integer_rows(vec![vec![2, 0, -2, 0], vec![0, 2, -1, 0]]).unwrap();
/// assert_eq!(m.get_solution().unwrap(), vec![2, 1, 2]);
/// ```
pub mod balance_matrix;
mod balance_matrix_tests;
