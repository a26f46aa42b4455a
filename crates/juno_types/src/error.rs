//! Errors surfaced by the type/operator engine.

use crate::ops::OpKind;
use crate::ty::PrimitiveKind;

/// A hard type-resolution failure. Looking up an operator/kind
/// combination with no table entry never falls back to a silent default;
/// the caller decides how to report it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("operator `{op}` is not defined for `{left}`{}", right_part(.right))]
    NoResultType {
        op: OpKind,
        left: PrimitiveKind,
        right: Option<PrimitiveKind>,
    },

    #[error("`{from}` cannot be cast to `{to}`")]
    NoCast {
        from: PrimitiveKind,
        to: PrimitiveKind,
    },

    /// `var` must be replaced by an inferred type before operator
    /// resolution; reaching this error indicates an upstream
    /// semantic-analysis defect.
    #[error("`var` reached operator resolution before type inference")]
    UnresolvedVar,
}

fn right_part(right: &Option<PrimitiveKind>) -> String {
    match right {
        Some(kind) => format!(" and `{kind}`"),
        None => String::new(),
    }
}

/// An evaluation failure from the direct-computation path.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("division by zero")]
    DivisionByZero,

    /// An operand value whose runtime kind does not match the kind the
    /// caller declared for it.
    #[error("operand value does not match its declared kind")]
    OperandMismatch,
}
