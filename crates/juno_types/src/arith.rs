//! Shared safe divide/modulo facility.
//!
//! Division-by-zero is raised here, once, rather than per primitive
//! kind: the type tables only decide *that* division applies, never how
//! a zero divisor is reported. Integral division truncates toward zero
//! and wraps on `i64::MIN / -1`, matching the language's wrapping
//! integer semantics; the float path reports a zero divisor instead of
//! producing an infinity (a teaching language wants one loud signal).

use crate::error::EvalError;

pub fn safe_div_i64(a: i64, b: i64) -> Result<i64, EvalError> {
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(a.wrapping_div(b))
}

pub fn safe_rem_i64(a: i64, b: i64) -> Result<i64, EvalError> {
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(a.wrapping_rem(b))
}

pub fn safe_div_f64(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(a / b)
}

pub fn safe_rem_f64(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(a % b)
}
