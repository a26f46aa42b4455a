//! Operator resolution: result types, expression templates, and direct
//! value computation.
//!
//! Every (operator, left kind, right kind) triple resolves through one
//! table function, [`PrimitiveKind::entry`], so the three public views —
//! `result_type`, `operator_template`, `compute` — can never drift apart:
//! a template exists exactly where a computation is defined, and vice
//! versa. Dispatch is mutually exclusive per operator; no arm falls
//! through to another.

use std::fmt;

use juno_lexer::TokenKind;

use crate::arith;
use crate::error::{EvalError, TypeError};
use crate::template::OpTemplate;
use crate::ty::PrimitiveKind;
use crate::value::Value;

/// Every operator the resolver knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    // Binary
    Plus,   // +
    Minus,  // -
    Times,  // *
    Div,    // /
    Mod,    // %
    Lt,     // <
    Gt,     // >
    Le,     // <=
    Ge,     // >=
    Eq,     // ==
    NotEq,  // !=
    And,    // &&
    Or,     // ||
    BitAnd, // &
    BitOr,  // |
    BitXor, // ^
    Shl,    // <<
    Shr,    // >>
    UShr,   // >>>

    // Unary
    Not,    // !
    Neg,    // unary -
    BitNot, // ~
    Inc,    // ++
    Dec,    // --
}

/// All operators, for table sweeps.
pub const ALL_OPS: [OpKind; 24] = [
    OpKind::Plus,
    OpKind::Minus,
    OpKind::Times,
    OpKind::Div,
    OpKind::Mod,
    OpKind::Lt,
    OpKind::Gt,
    OpKind::Le,
    OpKind::Ge,
    OpKind::Eq,
    OpKind::NotEq,
    OpKind::And,
    OpKind::Or,
    OpKind::BitAnd,
    OpKind::BitOr,
    OpKind::BitXor,
    OpKind::Shl,
    OpKind::Shr,
    OpKind::UShr,
    OpKind::Not,
    OpKind::Neg,
    OpKind::BitNot,
    OpKind::Inc,
    OpKind::Dec,
];

impl OpKind {
    pub fn symbol(self) -> &'static str {
        match self {
            OpKind::Plus => "+",
            OpKind::Minus => "-",
            OpKind::Times => "*",
            OpKind::Div => "/",
            OpKind::Mod => "%",
            OpKind::Lt => "<",
            OpKind::Gt => ">",
            OpKind::Le => "<=",
            OpKind::Ge => ">=",
            OpKind::Eq => "==",
            OpKind::NotEq => "!=",
            OpKind::And => "&&",
            OpKind::Or => "||",
            OpKind::BitAnd => "&",
            OpKind::BitOr => "|",
            OpKind::BitXor => "^",
            OpKind::Shl => "<<",
            OpKind::Shr => ">>",
            OpKind::UShr => ">>>",
            OpKind::Not => "!",
            OpKind::Neg => "-",
            OpKind::BitNot => "~",
            OpKind::Inc => "++",
            OpKind::Dec => "--",
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(
            self,
            OpKind::Not | OpKind::Neg | OpKind::BitNot | OpKind::Inc | OpKind::Dec
        )
    }

    /// Map a lexer token category to an operator. `-` maps to the binary
    /// operator; the parser decides when it is a unary negation and uses
    /// [`OpKind::Neg`] directly.
    pub fn from_token(token: &TokenKind) -> Option<OpKind> {
        let op = match token {
            TokenKind::Plus => OpKind::Plus,
            TokenKind::Minus => OpKind::Minus,
            TokenKind::Star => OpKind::Times,
            TokenKind::Slash => OpKind::Div,
            TokenKind::Percent => OpKind::Mod,
            TokenKind::Lt => OpKind::Lt,
            TokenKind::Gt => OpKind::Gt,
            TokenKind::LtEq => OpKind::Le,
            TokenKind::GtEq => OpKind::Ge,
            TokenKind::Eq => OpKind::Eq,
            TokenKind::NotEq => OpKind::NotEq,
            TokenKind::AndAnd => OpKind::And,
            TokenKind::OrOr => OpKind::Or,
            TokenKind::Ampersand => OpKind::BitAnd,
            TokenKind::Pipe => OpKind::BitOr,
            TokenKind::Caret => OpKind::BitXor,
            TokenKind::Shl => OpKind::Shl,
            TokenKind::Shr => OpKind::Shr,
            TokenKind::UShr => OpKind::UShr,
            TokenKind::Not => OpKind::Not,
            TokenKind::Tilde => OpKind::BitNot,
            TokenKind::PlusPlus => OpKind::Inc,
            TokenKind::MinusMinus => OpKind::Dec,
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl PrimitiveKind {
    /// The result kind of applying `op` to this kind and `other`.
    /// Unary operators pass `other = None`.
    pub fn result_type(
        self,
        op: OpKind,
        other: Option<PrimitiveKind>,
    ) -> Result<PrimitiveKind, TypeError> {
        self.entry(op, other).map(|(kind, _)| kind)
    }

    /// The expression template a code generator substitutes for the
    /// operator application. Defined for exactly the same inputs as
    /// [`compute`](Self::compute).
    pub fn operator_template(
        self,
        op: OpKind,
        other: Option<PrimitiveKind>,
    ) -> Result<OpTemplate, TypeError> {
        self.entry(op, other).map(|(_, template)| template)
    }

    /// The single operator-result table. Both public views and the
    /// computation path go through here.
    fn entry(
        self,
        op: OpKind,
        other: Option<PrimitiveKind>,
    ) -> Result<(PrimitiveKind, OpTemplate), TypeError> {
        match self {
            PrimitiveKind::Int | PrimitiveKind::Long => integral_entry(self, op, other),
            PrimitiveKind::Float | PrimitiveKind::Double => floating_entry(self, op, other),
            PrimitiveKind::Boolean => boolean_entry(op, other),
            PrimitiveKind::Char => char_entry(op, other),
            PrimitiveKind::Str => str_entry(op, other),
            // null accepts any operator and returns itself: the universal
            // "no value" sentinel during type-checking of literal null.
            PrimitiveKind::Null => Ok((PrimitiveKind::Null, OpTemplate::Identity)),
            // void has no table entries but stays queryable, so call
            // sites can uniformly ask every expression for its type.
            PrimitiveKind::Void => Err(TypeError::NoResultType {
                op,
                left: self,
                right: other,
            }),
            PrimitiveKind::Var => Err(TypeError::UnresolvedVar),
        }
    }

    /// Compute the operator application directly. Must remain observably
    /// consistent with the template path for every defined triple.
    pub fn compute(
        self,
        op: OpKind,
        other: Option<PrimitiveKind>,
        v1: &Value,
        v2: Option<&Value>,
    ) -> Result<Value, EvalError> {
        let (result, _) = self.entry(op, other)?;

        if self == PrimitiveKind::Null {
            return Ok(Value::Null);
        }
        if v1.kind() != self {
            return Err(EvalError::OperandMismatch);
        }

        if op.is_unary() {
            return compute_unary(op, v1);
        }

        let other = other.ok_or(EvalError::OperandMismatch)?;
        let v2 = v2.ok_or(EvalError::OperandMismatch)?;
        if v2.kind() != other {
            return Err(EvalError::OperandMismatch);
        }

        compute_binary(op, result, v1, v2)
    }
}

// === Per-kind result tables ===

fn integral_entry(
    kind: PrimitiveKind,
    op: OpKind,
    other: Option<PrimitiveKind>,
) -> Result<(PrimitiveKind, OpTemplate), TypeError> {
    use OpKind::*;
    use OpTemplate::*;
    use PrimitiveKind::{Boolean, Str};

    match (op, other) {
        (Inc, None) => Ok((kind, Postfix("++"))),
        (Dec, None) => Ok((kind, Postfix("--"))),
        (Neg, None) => Ok((kind, Prefix("-"))),
        (BitNot, None) => Ok((kind, Prefix("~"))),

        (Plus, Some(Str)) => Ok((Str, Infix("+"))),
        (Plus | Minus | Times, Some(o)) if o.is_numeric() => {
            Ok((kind.widen(o), Infix(op.symbol())))
        }
        // Integral division truncates toward zero; the raw division is
        // delegated to the shared safe-divide facility.
        (Div, Some(o)) if o.is_integral() => Ok((kind.widen(o), Call2("__idiv"))),
        (Div, Some(o)) if o.is_floating() => Ok((kind.widen(o), Call2("__fdiv"))),
        (Mod, Some(o)) if o.is_integral() => Ok((kind.widen(o), Call2("__imod"))),
        (Mod, Some(o)) if o.is_floating() => Ok((kind.widen(o), Call2("__fmod"))),

        (Lt | Gt | Le | Ge | Eq | NotEq, Some(o)) if o.is_numeric() => {
            Ok((Boolean, Infix(op.symbol())))
        }

        (BitAnd | BitOr | BitXor | Shl | Shr | UShr, Some(o)) if o.is_integral() => {
            Ok((kind.widen(o), Infix(op.symbol())))
        }

        _ => Err(TypeError::NoResultType {
            op,
            left: kind,
            right: other,
        }),
    }
}

fn floating_entry(
    kind: PrimitiveKind,
    op: OpKind,
    other: Option<PrimitiveKind>,
) -> Result<(PrimitiveKind, OpTemplate), TypeError> {
    use OpKind::*;
    use OpTemplate::*;
    use PrimitiveKind::{Boolean, Str};

    match (op, other) {
        (Inc, None) => Ok((kind, Postfix("++"))),
        (Dec, None) => Ok((kind, Postfix("--"))),
        (Neg, None) => Ok((kind, Prefix("-"))),

        (Plus, Some(Str)) => Ok((Str, Infix("+"))),
        (Plus | Minus | Times, Some(o)) if o.is_numeric() => {
            Ok((kind.widen(o), Infix(op.symbol())))
        }
        // Floating division does not truncate but still reports a zero
        // divisor through the shared facility.
        (Div, Some(o)) if o.is_numeric() => Ok((kind.widen(o), Call2("__fdiv"))),
        (Mod, Some(o)) if o.is_numeric() => Ok((kind.widen(o), Call2("__fmod"))),

        (Lt | Gt | Le | Ge | Eq | NotEq, Some(o)) if o.is_numeric() => {
            Ok((Boolean, Infix(op.symbol())))
        }

        _ => Err(TypeError::NoResultType {
            op,
            left: kind,
            right: other,
        }),
    }
}

fn boolean_entry(
    op: OpKind,
    other: Option<PrimitiveKind>,
) -> Result<(PrimitiveKind, OpTemplate), TypeError> {
    use OpKind::*;
    use OpTemplate::*;
    use PrimitiveKind::{Boolean, Str};

    match (op, other) {
        (Not, None) => Ok((Boolean, Prefix("!"))),
        (And, Some(Boolean)) => Ok((Boolean, Infix("&&"))),
        (Or, Some(Boolean)) => Ok((Boolean, Infix("||"))),
        (Eq | NotEq, Some(Boolean)) => Ok((Boolean, Infix(op.symbol()))),
        // A boolean renders as the literal text true/false before
        // concatenation.
        (Plus, Some(Str)) => Ok((Str, Infix("+"))),
        _ => Err(TypeError::NoResultType {
            op,
            left: Boolean,
            right: other,
        }),
    }
}

fn char_entry(
    op: OpKind,
    other: Option<PrimitiveKind>,
) -> Result<(PrimitiveKind, OpTemplate), TypeError> {
    use OpKind::*;
    use OpTemplate::*;
    use PrimitiveKind::{Boolean, Char, Str};

    match (op, other) {
        (Lt | Gt | Le | Ge | Eq | NotEq, Some(Char)) => Ok((Boolean, Infix(op.symbol()))),
        // char + char is concatenation, never code-point arithmetic.
        (Plus, Some(Char | Str)) => Ok((Str, Infix("+"))),
        _ => Err(TypeError::NoResultType {
            op,
            left: Char,
            right: other,
        }),
    }
}

fn str_entry(
    op: OpKind,
    other: Option<PrimitiveKind>,
) -> Result<(PrimitiveKind, OpTemplate), TypeError> {
    use OpKind::*;
    use OpTemplate::*;
    use PrimitiveKind::{Boolean, Str, Var, Void};

    match (op, other) {
        (Plus, Some(o)) if o != Void && o != Var => Ok((Str, Infix("+"))),
        (Lt | Gt | Le | Ge | Eq | NotEq, Some(Str)) => Ok((Boolean, Infix(op.symbol()))),
        _ => Err(TypeError::NoResultType {
            op,
            left: Str,
            right: other,
        }),
    }
}

// === Direct computation ===

fn compute_unary(op: OpKind, v1: &Value) -> Result<Value, EvalError> {
    use OpKind::*;

    let value = match (op, v1) {
        (Inc, Value::Int(v)) => Value::Int(v.wrapping_add(1)),
        (Inc, Value::Long(v)) => Value::Long(v.wrapping_add(1)),
        (Inc, Value::Float(v)) => Value::Float(v + 1.0),
        (Inc, Value::Double(v)) => Value::Double(v + 1.0),

        (Dec, Value::Int(v)) => Value::Int(v.wrapping_sub(1)),
        (Dec, Value::Long(v)) => Value::Long(v.wrapping_sub(1)),
        (Dec, Value::Float(v)) => Value::Float(v - 1.0),
        (Dec, Value::Double(v)) => Value::Double(v - 1.0),

        (Neg, Value::Int(v)) => Value::Int(v.wrapping_neg()),
        (Neg, Value::Long(v)) => Value::Long(v.wrapping_neg()),
        (Neg, Value::Float(v)) => Value::Float(-v),
        (Neg, Value::Double(v)) => Value::Double(-v),

        (BitNot, Value::Int(v)) => Value::Int(!v),
        (BitNot, Value::Long(v)) => Value::Long(!v),

        (Not, Value::Boolean(b)) => Value::Boolean(!b),

        _ => return Err(EvalError::OperandMismatch),
    };
    Ok(value)
}

fn compute_binary(
    op: OpKind,
    result: PrimitiveKind,
    v1: &Value,
    v2: &Value,
) -> Result<Value, EvalError> {
    use OpKind::*;

    match op {
        Plus if result == PrimitiveKind::Str => {
            Ok(Value::Str(format!("{}{}", v1.render(), v2.render())))
        }
        Plus | Minus | Times => arithmetic(op, result, v1, v2),
        Div | Mod => divide(op, result, v1, v2),
        Lt | Gt | Le | Ge => Ok(Value::Boolean(compare(op, v1, v2)?)),
        Eq => Ok(Value::Boolean(equals(v1, v2)?)),
        NotEq => Ok(Value::Boolean(!equals(v1, v2)?)),
        And | Or => {
            let a = v1.as_bool().ok_or(EvalError::OperandMismatch)?;
            let b = v2.as_bool().ok_or(EvalError::OperandMismatch)?;
            Ok(Value::Boolean(if op == And { a && b } else { a || b }))
        }
        BitAnd | BitOr | BitXor => bitwise(op, result, v1, v2),
        Shl | Shr | UShr => shift(op, result, v1, v2),
        Not | Neg | BitNot | Inc | Dec => unreachable!("unary operator in binary computation"),
    }
}

fn arithmetic(
    op: OpKind,
    result: PrimitiveKind,
    v1: &Value,
    v2: &Value,
) -> Result<Value, EvalError> {
    use OpKind::*;

    let value = match result {
        PrimitiveKind::Int => {
            let a = v1.as_i64().ok_or(EvalError::OperandMismatch)? as i32;
            let b = v2.as_i64().ok_or(EvalError::OperandMismatch)? as i32;
            Value::Int(match op {
                Plus => a.wrapping_add(b),
                Minus => a.wrapping_sub(b),
                _ => a.wrapping_mul(b),
            })
        }
        PrimitiveKind::Long => {
            let a = v1.as_i64().ok_or(EvalError::OperandMismatch)?;
            let b = v2.as_i64().ok_or(EvalError::OperandMismatch)?;
            Value::Long(match op {
                Plus => a.wrapping_add(b),
                Minus => a.wrapping_sub(b),
                _ => a.wrapping_mul(b),
            })
        }
        PrimitiveKind::Float | PrimitiveKind::Double => {
            let a = v1.as_f64().ok_or(EvalError::OperandMismatch)?;
            let b = v2.as_f64().ok_or(EvalError::OperandMismatch)?;
            let r = match op {
                Plus => a + b,
                Minus => a - b,
                _ => a * b,
            };
            if result == PrimitiveKind::Float {
                Value::Float(r as f32)
            } else {
                Value::Double(r)
            }
        }
        _ => unreachable!("non-numeric arithmetic result `{result}`"),
    };
    Ok(value)
}

fn divide(op: OpKind, result: PrimitiveKind, v1: &Value, v2: &Value) -> Result<Value, EvalError> {
    if result.is_integral() {
        let a = v1.as_i64().ok_or(EvalError::OperandMismatch)?;
        let b = v2.as_i64().ok_or(EvalError::OperandMismatch)?;
        let r = if op == OpKind::Div {
            arith::safe_div_i64(a, b)?
        } else {
            arith::safe_rem_i64(a, b)?
        };
        Ok(match result {
            PrimitiveKind::Int => Value::Int(r as i32),
            _ => Value::Long(r),
        })
    } else {
        let a = v1.as_f64().ok_or(EvalError::OperandMismatch)?;
        let b = v2.as_f64().ok_or(EvalError::OperandMismatch)?;
        let r = if op == OpKind::Div {
            arith::safe_div_f64(a, b)?
        } else {
            arith::safe_rem_f64(a, b)?
        };
        Ok(match result {
            PrimitiveKind::Float => Value::Float(r as f32),
            _ => Value::Double(r),
        })
    }
}

fn compare(op: OpKind, v1: &Value, v2: &Value) -> Result<bool, EvalError> {
    use OpKind::*;
    use std::cmp::Ordering;

    // Same-domain comparisons are exact; mixed numeric comparisons go
    // through f64.
    let ordering: Option<Ordering> = match (v1, v2) {
        (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => match (v1.as_i64(), v2.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => {
                let a = v1.as_f64().ok_or(EvalError::OperandMismatch)?;
                let b = v2.as_f64().ok_or(EvalError::OperandMismatch)?;
                a.partial_cmp(&b)
            }
        },
    };

    // NaN compares false under every ordering operator.
    let Some(ordering) = ordering else {
        return Ok(false);
    };

    Ok(match op {
        Lt => ordering == Ordering::Less,
        Gt => ordering == Ordering::Greater,
        Le => ordering != Ordering::Greater,
        Ge => ordering != Ordering::Less,
        _ => unreachable!("not an ordering operator: {op}"),
    })
}

fn equals(v1: &Value, v2: &Value) -> Result<bool, EvalError> {
    match (v1, v2) {
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a == b),
        (Value::Char(a), Value::Char(b)) => Ok(a == b),
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        _ => match (v1.as_i64(), v2.as_i64()) {
            (Some(a), Some(b)) => Ok(a == b),
            _ => {
                let a = v1.as_f64().ok_or(EvalError::OperandMismatch)?;
                let b = v2.as_f64().ok_or(EvalError::OperandMismatch)?;
                Ok(a == b)
            }
        },
    }
}

fn bitwise(op: OpKind, result: PrimitiveKind, v1: &Value, v2: &Value) -> Result<Value, EvalError> {
    use OpKind::*;

    let a = v1.as_i64().ok_or(EvalError::OperandMismatch)?;
    let b = v2.as_i64().ok_or(EvalError::OperandMismatch)?;
    let r = match op {
        BitAnd => a & b,
        BitOr => a | b,
        _ => a ^ b,
    };
    Ok(match result {
        PrimitiveKind::Int => Value::Int(r as i32),
        _ => Value::Long(r),
    })
}

fn shift(op: OpKind, result: PrimitiveKind, v1: &Value, v2: &Value) -> Result<Value, EvalError> {
    use OpKind::*;

    let a = v1.as_i64().ok_or(EvalError::OperandMismatch)?;
    let count = v2.as_i64().ok_or(EvalError::OperandMismatch)?;

    // Shift counts are masked to the width of the result kind.
    Ok(match result {
        PrimitiveKind::Int => {
            let a = a as i32;
            let s = (count & 31) as u32;
            Value::Int(match op {
                Shl => a.wrapping_shl(s),
                Shr => a.wrapping_shr(s),
                _ => ((a as u32) >> s) as i32,
            })
        }
        _ => {
            let s = (count & 63) as u32;
            Value::Long(match op {
                Shl => a.wrapping_shl(s),
                Shr => a.wrapping_shr(s),
                _ => ((a as u64) >> s) as i64,
            })
        }
    })
}
