use tally_types::{Field, Operands, ValidationError};

/// Check both raw inputs and parse them into finite operands.
///
/// Rules are applied in order and the first violation is returned:
///
/// 1. a blank or whitespace-only field is [`ValidationError::EmptyField`];
/// 2. a field that does not parse to a finite number (including `inf`,
///    `NaN`, and literals that overflow) is [`ValidationError::NotFiniteNumber`].
///
/// Both emptiness checks run before any parsing, so `("abc", "")` reports the
/// empty second field.
pub fn validate(raw_a: &str, raw_b: &str) -> Result<Operands, ValidationError> {
    let a = raw_a.trim();
    let b = raw_b.trim();

    if a.is_empty() {
        return Err(ValidationError::EmptyField(Field::First));
    }
    if b.is_empty() {
        return Err(ValidationError::EmptyField(Field::Second));
    }

    let a = parse_finite(a).ok_or(ValidationError::NotFiniteNumber(Field::First))?;
    let b = parse_finite(b).ok_or(ValidationError::NotFiniteNumber(Field::Second))?;

    Ok(Operands::new(a, b))
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_first() {
        assert_eq!(
            validate("", "5"),
            Err(ValidationError::EmptyField(Field::First))
        );
    }

    #[test]
    fn whitespace_second() {
        assert_eq!(
            validate("5", " \t "),
            Err(ValidationError::EmptyField(Field::Second))
        );
    }

    #[test]
    fn not_a_number_first() {
        assert_eq!(
            validate("abc", "5"),
            Err(ValidationError::NotFiniteNumber(Field::First))
        );
    }

    #[test]
    fn emptiness_checked_before_parsing() {
        assert_eq!(
            validate("abc", ""),
            Err(ValidationError::EmptyField(Field::Second))
        );
    }

    #[test]
    fn first_violation_wins() {
        assert_eq!(
            validate("x", "y"),
            Err(ValidationError::NotFiniteNumber(Field::First))
        );
    }

    #[test]
    fn non_finite_literals_rejected() {
        for raw in ["inf", "-infinity", "NaN", "1e400"] {
            assert_eq!(
                validate("1", raw),
                Err(ValidationError::NotFiniteNumber(Field::Second)),
                "{raw}"
            );
        }
    }

    #[test]
    fn valid_pair() {
        assert_eq!(validate("3", "4"), Ok(Operands::new(3.0, 4.0)));
        assert_eq!(validate(" -2.5 ", "1e3"), Ok(Operands::new(-2.5, 1000.0)));
    }
}
