/// Structures of a chemical equation: atoms, atom groups, molecules, reagents and products.
/// Builds the atom balance matrix and writes the coefficients back
pub mod equation_model;
/// eng
/// Recursive descent parser of chemical equations with groups `(...)` and complexes `[...]`,
/// e.g. `K4[Fe(CN)6] + H2SO4 = ...`
/// ru
/// Парсер химических уравнений методом рекурсивного спуска
/// # Examples
/// ```
/// use KiStoich::Chemistry::equation_parser::parse_equation;
/// let eq = parse_equation("Ca(OH)2 + HCl = CaCl2 + H2O").unwrap();
/// assert_eq!(eq.reagents()[0].formula().count_of("H"), 2);
/// let err = parse_equation("H2 + = H2O").unwrap_err();
/// assert_eq!(err.position, 5);
/// ```
pub mod equation_parser;
/// Balancing pipeline: parse -> balance matrix -> Bareiss elimination -> integer coefficients
/// # Examples
/// ```
/// use KiStoich::Chemistry::balancer::balance_equation;
/// assert_eq!(balance_equation("H2 + O2 = H2O").unwrap(), "2H2 + O2 = 2H2O");
/// ```
pub mod balancer;
