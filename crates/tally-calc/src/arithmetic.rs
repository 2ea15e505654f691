use tally_types::{CalculationError, CalculationResult};

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Divide `a` by `b`.
///
/// A zero divisor of either sign is rejected. Any other divisor yields the
/// IEEE quotient, including infinities from overflow.
pub fn divide(a: f64, b: f64) -> CalculationResult {
    if b == 0.0 {
        return Err(CalculationError::DivisionByZero);
    }
    Ok(a / b)
}
