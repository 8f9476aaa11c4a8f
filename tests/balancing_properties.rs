//! Property-based tests for the balancer
//!
//! - fractions are always kept in reduced form with a positive denominator
//! - every balanced equation conserves atoms exactly
//! - coefficients are minimal (gcd 1)
//! - re-balancing the rendered answer gives the same coefficients
//! - equations without a positive solution, or with counts beyond i64, are errors, not answers

use KiStoich::Algebra::balance_matrix::BalanceError;
use KiStoich::Algebra::rational::{Rational, gcd};
use KiStoich::Chemistry::balancer::{BalanceReport, BalancerError, balance, balance_equation};
use KiStoich::Chemistry::equation_model::MAX_COUNT;
use KiStoich::Chemistry::equation_parser::parse_equation;
use proptest::prelude::*;

const EQUATIONS: &[&str] = &[
    "H2 + O2 = H2O",
    "Fe + O2 = Fe2O3",
    "Ca(OH)2 + HCl = CaCl2 + H2O",
    "KMnO4 + HCl = KCl + MnCl2 + H2O + Cl2",
    "C3H8 + O2 = CO2 + H2O",
    "Al + O2 = Al2O3",
    "CH4 + O2 = CO2 + H2O",
    "K4[Fe(CN)6] = K + Fe + C + N",
    "NaOH + H2SO4 = Na2SO4 + H2O",
    "Fe2(SO4)3 + KOH = K2SO4 + Fe(OH)3",
];

fn non_zero() -> impl Strategy<Value = i64> {
    prop_oneof![-100_000i64..0, 1i64..100_000]
}

fn common_divisor(values: &[i64]) -> u64 {
    values.iter().fold(0u64, |acc, &k| gcd(acc as i64, k))
}

/// the answer conserves every atom with positive, minimal coefficients
fn assert_valid_answer(source: &str, report: &BalanceReport) -> Result<(), TestCaseError> {
    let equation = parse_equation(source).unwrap();
    prop_assert!(
        equation.is_balanced(&report.coefficients),
        "{} -> {:?}",
        source,
        report.coefficients
    );
    prop_assert!(report.coefficients.iter().all(|&k| k > 0));
    prop_assert_eq!(common_divisor(&report.coefficients), 1);
    Ok(())
}

/// coefficient written in front of a molecule is removed to get back a parsable equation
fn strip_coefficients(rendered: &str) -> String {
    let side = |s: &str| {
        s.split('+')
            .map(|term| term.trim().trim_start_matches(|c: char| c.is_ascii_digit()))
            .collect::<Vec<_>>()
            .join(" + ")
    };
    let (left, right) = rendered.split_once('=').unwrap();
    format!("{} = {}", side(left), side(right))
}

proptest! {
    #[test]
    fn rational_is_reduced(n in -100_000i64..100_000, d in non_zero()) {
        let r = Rational::new(n, d).unwrap();
        prop_assert!(r.denominator() > 0);
        prop_assert_eq!(gcd(r.numerator(), r.denominator()), 1);
        if n == 0 {
            prop_assert_eq!(r.denominator(), 1);
        }
    }

    #[test]
    fn rational_times_reciprocal_is_one(n in non_zero(), d in non_zero()) {
        let mut a = Rational::new(n, d).unwrap();
        let b = Rational::new(d, n).unwrap();
        a.mul(b).unwrap();
        prop_assert_eq!(a.numerator(), 1);
        prop_assert_eq!(a.denominator(), 1);
    }

    #[test]
    fn synthesis_is_balanced_and_minimal(a in 1u64..10, b in 1u64..10, c in 1u64..10, d in 1u64..10) {
        let source = format!("Fe{} + O{} = Fe{}O{}", a, b, c, d);
        let report = balance(&source).unwrap();
        assert_valid_answer(&source, &report)?;
    }

    #[test]
    fn decomposition_is_balanced_or_rejected(
        a in 1u64..5, b in 1u64..5, c in 1u64..5, d in 1u64..5, with_hydrogen in any::<bool>()
    ) {
        // some of these only have solutions with a negative coefficient, e.g. H2O2 = H2O + H2
        let source = if with_hydrogen {
            format!("H{}O{} = H{}O{} + H", a, b, c, d)
        } else {
            format!("H{}O{} = H{} + O{}", a, b, c, d)
        };
        match balance(&source) {
            Ok(report) => assert_valid_answer(&source, &report)?,
            Err(BalancerError::Balance(_)) => {}
            Err(other) => prop_assert!(false, "{}: unexpected error {:?}", source, other),
        }
    }

    #[test]
    fn huge_indices_never_give_wrong_answers(
        n in (MAX_COUNT - 1_000)..=u64::MAX,
        m in prop_oneof![1u64..1_000, (MAX_COUNT - 1_000)..=u64::MAX],
    ) {
        let source = format!("H{} + O = H{}O", n, m);
        match balance(&source) {
            Ok(report) => assert_valid_answer(&source, &report)?,
            Err(BalancerError::Syntax(e)) => {
                prop_assert!(n > MAX_COUNT || m > MAX_COUNT);
                prop_assert!(e.message.contains("too large"));
            }
            // no positive solution, or an intermediate value beyond i64
            Err(BalancerError::Balance(_)) | Err(BalancerError::Matrix(_)) => {
                prop_assert!(n <= MAX_COUNT && m <= MAX_COUNT);
            }
            Err(other) => prop_assert!(false, "{}: unexpected error {:?}", source, other),
        }
    }

    #[test]
    fn known_equations_conserve_atoms(source in prop::sample::select(EQUATIONS)) {
        let report = balance(source).unwrap();
        let equation = parse_equation(source).unwrap();
        prop_assert!(equation.atom_balance(&report.coefficients).iter().all(|(_, s)| *s == 0));
        prop_assert_eq!(common_divisor(&report.coefficients), 1);
    }

    #[test]
    fn rebalancing_is_idempotent(source in prop::sample::select(EQUATIONS)) {
        let first = balance(source).unwrap();
        let second = balance(&strip_coefficients(&first.balanced)).unwrap();
        prop_assert_eq!(first.coefficients, second.coefficients);
        prop_assert_eq!(first.balanced, second.balanced);
    }

    #[test]
    fn whitespace_does_not_change_result(spaces in "[ \t]{0,3}") {
        let source = format!("{s}C3H8{s}+{s}O2{s}={s}CO2{s}+{s}H2O{s}", s = spaces);
        prop_assert_eq!(
            balance(&source).unwrap().coefficients,
            vec![1, 5, 3, 4]
        );
    }
}

#[test]
fn test_scenarios() {
    assert_eq!(balance_equation("H2 + O2 = H2O").unwrap(), "2H2 + O2 = 2H2O");
    assert_eq!(
        balance_equation("Ca(OH)2 + HCl = CaCl2 + H2O").unwrap(),
        "Ca(OH)2 + 2HCl = CaCl2 + 2H2O"
    );
    assert_eq!(
        balance_equation("Fe2(SO4)3 + KOH = K2SO4 + Fe(OH)3").unwrap(),
        "Fe2(SO4)3 + 6KOH = 3K2SO4 + 2Fe(OH)3"
    );
}

#[test]
fn test_already_balanced_is_fixed_point() {
    assert_eq!(balance_equation("HCl + NaOH = NaCl + H2O").unwrap(), "HCl + NaOH = NaCl + H2O");
}

#[test]
fn test_syntax_error_offset() {
    match balance_equation("H2 + = H2O") {
        Err(BalancerError::Syntax(e)) => assert_eq!(e.position, 5),
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_ambiguous_system_is_an_error() {
    assert_eq!(
        balance_equation("H2 + O2 = H2O + H2O2").unwrap_err(),
        BalancerError::Balance(BalanceError::AmbiguousSystem)
    );
}

#[test]
fn test_negative_solution_is_rejected() {
    // H2O2 = 2H2O - H2 is the only way to conserve atoms
    assert_eq!(
        balance_equation("H2O2 = H2O + H2").unwrap_err(),
        BalancerError::Balance(BalanceError::NonPositiveCoefficient)
    );
}

#[test]
fn test_counts_beyond_i64_are_syntax_errors() {
    match balance_equation("H = H9223372036854775808") {
        Err(BalancerError::Syntax(e)) => assert_eq!(e.position, 5),
        other => panic!("expected syntax error, got {:?}", other),
    }
    match balance_equation("H18446744073709551615 = H") {
        Err(BalancerError::Syntax(e)) => assert_eq!(e.position, 1),
        other => panic!("expected syntax error, got {:?}", other),
    }
    assert_eq!(
        balance("H = H9223372036854775807").unwrap().coefficients,
        vec![i64::MAX, 1]
    );
}
