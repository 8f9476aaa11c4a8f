/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Algebra::balance_matrix::{BalanceError, BalanceMatrix, SolveError, SolveStage};
    use crate::Algebra::matrix::MatrixError;
    use crate::Algebra::rational::Rational;

    fn frac(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn test_hydrogen_combustion() {
        // H2 + O2 = H2O
        let mut m = BalanceMatrix::from_integer_rows(vec![vec![2, 0, -2, 0], vec![0, 2, -1, 0]])
            .unwrap();
        assert_eq!(m.stage(), SolveStage::Raw);
        assert_eq!(m.get_solution().unwrap(), vec![2, 1, 2]);
        assert_eq!(m.stage(), SolveStage::IntegerSolution);
    }

    #[test]
    fn test_iron_oxidation() {
        // Fe + O2 = Fe2O3
        let mut m = BalanceMatrix::from_integer_rows(vec![vec![1, 0, -2, 0], vec![0, 2, -3, 0]])
            .unwrap();
        assert_eq!(m.get_solution().unwrap(), vec![4, 3, 2]);
    }

    #[test]
    fn test_stages_are_sequential() {
        let mut m = BalanceMatrix::from_integer_rows(vec![vec![2, 0, -2, 0], vec![0, 2, -1, 0]])
            .unwrap();
        m.triangularize().unwrap();
        assert_eq!(m.stage(), SolveStage::Triangular);
        // fraction-free elimination keeps integers
        let rows = m.matrix().rows();
        assert_eq!(rows[0], vec![4i64, 0, -4, 0].into_iter().map(Rational::from).collect::<Vec<_>>());
        assert_eq!(rows[1], vec![0i64, 4, -2, 0].into_iter().map(Rational::from).collect::<Vec<_>>());

        m.normalize().unwrap();
        assert_eq!(m.stage(), SolveStage::UnitForm);
        assert_eq!(m.matrix()[(0, 0)], Rational::one());
        assert_eq!(m.matrix()[(1, 1)], Rational::one());
        assert_eq!(m.matrix()[(1, 2)], frac(-1, 2));
        assert_eq!(m.basic_variables_count(), 2);
    }

    #[test]
    fn test_zero_row_after_elimination() {
        // Ca(OH)2 + HCl = CaCl2 + H2O, rows Ca, H, O, Cl
        let mut m = BalanceMatrix::from_integer_rows(vec![
            vec![1, 0, -1, 0, 0],
            vec![2, 1, 0, -2, 0],
            vec![2, 0, 0, -1, 0],
            vec![0, 1, -2, 0, 0],
        ])
        .unwrap();
        assert_eq!(m.get_solution().unwrap(), vec![1, 2, 1, 2]);
        assert_eq!(m.first_non_zero_in_row(3).unwrap(), None);
    }

    #[test]
    fn test_pivot_swap() {
        // KMnO4 + HCl = KCl + MnCl2 + H2O + Cl2, rows K, Mn, O, Cl, H
        let mut m = BalanceMatrix::from_integer_rows(vec![
            vec![1, 0, -1, 0, 0, 0, 0],
            vec![1, 0, 0, -1, 0, 0, 0],
            vec![4, 0, 0, 0, -1, 0, 0],
            vec![0, 1, -1, -2, 0, -2, 0],
            vec![0, 1, 0, 0, -2, 0, 0],
        ])
        .unwrap();
        assert_eq!(m.get_solution().unwrap(), vec![2, 16, 2, 2, 8, 5]);
    }

    #[test]
    fn test_swap_row_below_if_needed() {
        let mut m = BalanceMatrix::from_integer_rows(vec![
            vec![0, 0, 1],
            vec![0, 0, 2],
            vec![0, 3, 0],
        ])
        .unwrap();
        m.swap_row_below_if_needed(0, 1).unwrap();
        assert_eq!(m.first_non_zero_in_row(0).unwrap(), Some(1));
        assert_eq!(m.first_non_zero_in_row(2).unwrap(), Some(2));

        // nothing to swap with
        m.swap_row_below_if_needed(2, 0).unwrap();
        assert_eq!(m.first_non_zero_in_row(2).unwrap(), Some(2));

        assert!(matches!(
            m.swap_row_below_if_needed(7, 0),
            Err(MatrixError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn test_linear_combination() {
        let mut m = BalanceMatrix::from_integer_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        m.linear_combination(1, 0, Rational::from(-3i64)).unwrap();
        assert_eq!(m.matrix()[(1, 0)], Rational::zero());
        assert_eq!(m.matrix()[(1, 1)], Rational::from(-2i64));
    }

    #[test]
    fn test_two_free_variables_is_ambiguous() {
        // H2 + O2 = H2O + H2O2
        let mut m = BalanceMatrix::from_integer_rows(vec![
            vec![2, 0, -2, -2, 0],
            vec![0, 2, -1, -2, 0],
        ])
        .unwrap();
        assert_eq!(
            m.get_solution().unwrap_err(),
            SolveError::Balance(BalanceError::AmbiguousSystem)
        );
    }

    #[test]
    fn test_only_zero_solution() {
        // H2 = O2
        let mut m =
            BalanceMatrix::from_integer_rows(vec![vec![2, 0, 0], vec![0, -2, 0]]).unwrap();
        assert_eq!(
            m.get_solution().unwrap_err(),
            SolveError::Balance(BalanceError::AllCoefficientsZero)
        );
    }

    #[test]
    fn test_mixed_sign_solution_is_rejected() {
        // H2O2 = H2O + H2, the null space is (1, 2, -1)
        let mut m = BalanceMatrix::from_integer_rows(vec![vec![2, -2, -2, 0], vec![2, -1, 0, 0]])
            .unwrap();
        assert_eq!(
            m.get_solution().unwrap_err(),
            SolveError::Balance(BalanceError::NonPositiveCoefficient)
        );
        assert_eq!(m.stage(), SolveStage::UnitForm);
    }

    #[test]
    fn test_single_row() {
        // Fe = Fe
        let mut m = BalanceMatrix::from_integer_rows(vec![vec![1, -1, 0]]).unwrap();
        assert_eq!(m.get_solution().unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_table_rendering() {
        let m = BalanceMatrix::from_integer_rows(vec![vec![1, -1, 0]]).unwrap();
        let rendered = m.to_table().to_string();
        assert!(rendered.contains("-1/1"));
    }
}
