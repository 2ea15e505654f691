use tally_types::{CalculationError, CalculationResult, Operator};
use tracing::debug;

use crate::arithmetic;

/// Apply `op` to `a` and `b`.
pub fn evaluate(op: Operator, a: f64, b: f64) -> CalculationResult {
    match op {
        Operator::Add => Ok(arithmetic::add(a, b)),
        Operator::Subtract => Ok(arithmetic::subtract(a, b)),
        Operator::Multiply => Ok(arithmetic::multiply(a, b)),
        Operator::Divide => arithmetic::divide(a, b),
    }
}

/// Look up the operator for an external token and apply it.
///
/// Only the exact tokens `"1"`..`"4"` are recognised. Anything else yields
/// [`CalculationError::InvalidOperator`] carrying the offending token.
pub fn dispatch(token: &str, a: f64, b: f64) -> CalculationResult {
    dispatch_operator(token, a, b).map(|(_, value)| value)
}

/// Same as [`dispatch`], also returning the operator the token resolved to.
pub fn dispatch_operator(
    token: &str,
    a: f64,
    b: f64,
) -> Result<(Operator, f64), CalculationError> {
    let Some(op) = Operator::from_token(token) else {
        debug!(token, "unrecognised operator token");
        return Err(CalculationError::InvalidOperator(token.to_string()));
    };
    evaluate(op, a, b).map(|value| (op, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn finite() -> impl Strategy<Value = f64> {
        proptest::num::f64::NORMAL | proptest::num::f64::SUBNORMAL | proptest::num::f64::ZERO
    }

    #[test]
    fn dispatch_each_token() {
        assert_eq!(dispatch("1", 2.0, 3.0), Ok(5.0));
        assert_eq!(dispatch("2", 2.0, 3.0), Ok(-1.0));
        assert_eq!(dispatch("3", 6.0, 3.0), Ok(18.0));
        assert_eq!(dispatch("4", 10.0, 4.0), Ok(2.5));
    }

    #[test]
    fn division_by_zero_is_distinct_from_invalid_operator() {
        let div = dispatch("4", 10.0, 0.0).unwrap_err();
        let bad = dispatch("5", 10.0, 0.0).unwrap_err();
        assert_eq!(div, CalculationError::DivisionByZero);
        assert!(matches!(bad, CalculationError::InvalidOperator(ref t) if t == "5"));
    }

    #[test]
    fn aliases_are_not_tokens() {
        for token in ["+", "add", "", " 1", "0"] {
            assert!(matches!(
                dispatch(token, 1.0, 1.0),
                Err(CalculationError::InvalidOperator(_))
            ));
        }
    }

    #[test]
    fn dispatch_operator_reports_resolved_operator() {
        assert_eq!(dispatch_operator("3", 6.0, 3.0), Ok((Operator::Multiply, 18.0)));
        assert_eq!(
            dispatch_operator("4", 1.0, 0.0),
            Err(CalculationError::DivisionByZero)
        );
        assert!(matches!(
            dispatch_operator("x", 1.0, 1.0),
            Err(CalculationError::InvalidOperator(ref t)) if t == "x"
        ));
    }

    #[test]
    fn evaluate_typed() {
        assert_eq!(evaluate(Operator::Multiply, 1.5, 2.0), Ok(3.0));
        assert_eq!(
            evaluate(Operator::Divide, 1.0, 0.0),
            Err(CalculationError::DivisionByZero)
        );
    }

    proptest! {
        #[test]
        fn total_ops_match_ieee(a in finite(), b in finite()) {
            prop_assert_eq!(dispatch("1", a, b).unwrap().to_bits(), (a + b).to_bits());
            prop_assert_eq!(dispatch("2", a, b).unwrap().to_bits(), (a - b).to_bits());
            prop_assert_eq!(dispatch("3", a, b).unwrap().to_bits(), (a * b).to_bits());
        }

        #[test]
        fn unknown_tokens_never_yield_numbers(token in "[^1-4]|[0-9]{2,4}", a in finite(), b in finite()) {
            prop_assert!(matches!(
                dispatch(&token, a, b),
                Err(CalculationError::InvalidOperator(_))
            ));
        }
    }
}
