use crate::error::{EvalError, TypeError};
use crate::ops::{OpKind, ALL_OPS};
use crate::template::OpTemplate;
use crate::ty::{PrimitiveKind, ALL_KINDS};
use crate::value::Value;

use OpKind::*;
use PrimitiveKind::*;

/// A nonzero stand-in value for each kind, so the full-table sweep never
/// trips over division by zero. Void and var have no values; the sweep
/// substitutes `Null`, which the table rejects before looking at it.
fn representative(kind: PrimitiveKind) -> Value {
    match kind {
        Int => Value::Int(6),
        Long => Value::Long(7),
        Float => Value::Float(2.5),
        Double => Value::Double(3.5),
        Boolean => Value::Boolean(true),
        Char => Value::Char('a'),
        Str => Value::Str("s".to_string()),
        Null | Void | Var => Value::Null,
    }
}

// === Dual-contract sweep ===

/// For every (kind, operator, other-kind) triple, the three views must
/// agree: a result type exists exactly when a template exists exactly
/// when a computation succeeds, and the computed value has the promised
/// kind.
#[test]
fn table_views_never_diverge() {
    let others: Vec<Option<PrimitiveKind>> = std::iter::once(None)
        .chain(ALL_KINDS.iter().copied().map(Some))
        .collect();

    for &left in &ALL_KINDS {
        for &op in &ALL_OPS {
            for &other in &others {
                let ty = left.result_type(op, other);
                let template = left.operator_template(op, other);
                assert_eq!(
                    ty.is_ok(),
                    template.is_ok(),
                    "type/template split for {left} {op} {other:?}"
                );

                let v1 = representative(left);
                let v2 = other.map(representative);
                let computed = left.compute(op, other, &v1, v2.as_ref());
                assert_eq!(
                    ty.is_ok(),
                    computed.is_ok(),
                    "type/compute split for {left} {op} {other:?}"
                );

                if let (Ok(result), Ok(value)) = (ty, computed) {
                    assert_eq!(
                        value.kind(),
                        result,
                        "computed kind differs for {left} {op} {other:?}"
                    );
                }
            }
        }
    }
}

/// A defined binary entry always carries a two-operand template and a
/// defined unary entry a one-operand template. `null` is the lone
/// exception: it swallows every operator through `Identity`.
#[test]
fn template_arity_matches_operator_arity() {
    let others: Vec<Option<PrimitiveKind>> = std::iter::once(None)
        .chain(ALL_KINDS.iter().copied().map(Some))
        .collect();

    for &left in &ALL_KINDS {
        if left == Null {
            continue;
        }
        for &op in &ALL_OPS {
            for &other in &others {
                if let Ok(template) = left.operator_template(op, other) {
                    assert_eq!(template.is_binary(), !op.is_unary());
                    assert_eq!(other.is_some(), !op.is_unary());
                }
            }
        }
    }
}

// === Result types ===

#[test]
fn numeric_results_take_the_wider_kind() {
    assert_eq!(Int.result_type(Plus, Some(Int)), Ok(Int));
    assert_eq!(Int.result_type(Plus, Some(Long)), Ok(Long));
    assert_eq!(Long.result_type(Times, Some(Int)), Ok(Long));
    assert_eq!(Int.result_type(Minus, Some(Float)), Ok(Float));
    assert_eq!(Long.result_type(Plus, Some(Float)), Ok(Float));
    assert_eq!(Float.result_type(Times, Some(Double)), Ok(Double));
    assert_eq!(Int.result_type(Plus, Some(Double)), Ok(Double));
}

#[test]
fn comparisons_yield_boolean() {
    assert_eq!(Int.result_type(Lt, Some(Double)), Ok(Boolean));
    assert_eq!(Char.result_type(Ge, Some(Char)), Ok(Boolean));
    assert_eq!(Str.result_type(Eq, Some(Str)), Ok(Boolean));
    assert_eq!(Boolean.result_type(NotEq, Some(Boolean)), Ok(Boolean));
}

#[test]
fn string_concatenation_accepts_every_value_kind() {
    for kind in [Int, Long, Float, Double, Boolean, Char, Str, Null] {
        assert_eq!(Str.result_type(Plus, Some(kind)), Ok(Str));
    }
    assert!(Str.result_type(Plus, Some(Void)).is_err());
    assert!(Str.result_type(Plus, Some(Var)).is_err());

    // The mirrored direction: value + String is also a concatenation.
    assert_eq!(Int.result_type(Plus, Some(Str)), Ok(Str));
    assert_eq!(Boolean.result_type(Plus, Some(Str)), Ok(Str));
    assert_eq!(Char.result_type(Plus, Some(Str)), Ok(Str));
}

#[test]
fn bitwise_and_shift_stay_integral() {
    assert_eq!(Int.result_type(BitAnd, Some(Int)), Ok(Int));
    assert_eq!(Int.result_type(BitOr, Some(Long)), Ok(Long));
    assert_eq!(Long.result_type(Shl, Some(Int)), Ok(Long));
    assert_eq!(Int.result_type(UShr, Some(Int)), Ok(Int));

    assert!(Int.result_type(BitAnd, Some(Float)).is_err());
    assert!(Float.result_type(Shl, Some(Int)).is_err());
    assert!(Double.result_type(BitNot, None).is_err());
}

/// Each kind's table is a closed, mutually exclusive dispatch: an
/// operator another kind defines never leaks in through a missing guard.
#[test]
fn no_operator_leaks_across_kinds() {
    assert!(Boolean.result_type(Minus, Some(Boolean)).is_err());
    assert!(Boolean.result_type(Lt, Some(Boolean)).is_err());
    assert!(Boolean.result_type(Plus, Some(Boolean)).is_err());
    assert!(Char.result_type(Minus, Some(Char)).is_err());
    assert!(Char.result_type(Plus, Some(Int)).is_err());
    assert!(Str.result_type(Minus, Some(Str)).is_err());
    assert!(Str.result_type(Times, Some(Int)).is_err());
    assert!(Int.result_type(And, Some(Int)).is_err());
    assert!(Int.result_type(Not, None).is_err());
    assert!(Boolean.result_type(Neg, None).is_err());
}

#[test]
fn degenerate_kinds() {
    // null absorbs everything.
    for &op in &ALL_OPS {
        assert_eq!(Null.result_type(op, Some(Int)), Ok(Null));
        assert_eq!(Null.operator_template(op, None), Ok(OpTemplate::Identity));
    }

    // void stays queryable but defines nothing.
    assert_eq!(
        Void.result_type(Plus, Some(Int)),
        Err(TypeError::NoResultType {
            op: Plus,
            left: Void,
            right: Some(Int),
        })
    );

    // var reaching the tables is an upstream defect, with its own error.
    assert_eq!(Var.result_type(Plus, Some(Int)), Err(TypeError::UnresolvedVar));
    assert_eq!(Var.result_type(Neg, None), Err(TypeError::UnresolvedVar));
}

// === Templates ===

#[test]
fn division_routes_through_helper_calls() {
    assert_eq!(
        Int.operator_template(Div, Some(Int)),
        Ok(OpTemplate::Call2("__idiv"))
    );
    assert_eq!(
        Int.operator_template(Mod, Some(Long)),
        Ok(OpTemplate::Call2("__imod"))
    );
    assert_eq!(
        Int.operator_template(Div, Some(Double)),
        Ok(OpTemplate::Call2("__fdiv"))
    );
    assert_eq!(
        Double.operator_template(Mod, Some(Int)),
        Ok(OpTemplate::Call2("__fmod"))
    );
    assert_eq!(
        Int.operator_template(Plus, Some(Int)),
        Ok(OpTemplate::Infix("+"))
    );
    assert_eq!(Int.operator_template(Inc, None), Ok(OpTemplate::Postfix("++")));
    assert_eq!(Int.operator_template(Neg, None), Ok(OpTemplate::Prefix("-")));
}

// === Direct computation ===

#[test]
fn integer_arithmetic_wraps() {
    assert_eq!(
        Int.compute(Plus, Some(Int), &Value::Int(i32::MAX), Some(&Value::Int(1))),
        Ok(Value::Int(i32::MIN))
    );
    assert_eq!(
        Int.compute(Times, Some(Int), &Value::Int(i32::MIN), Some(&Value::Int(-1))),
        Ok(Value::Int(i32::MIN))
    );
    assert_eq!(
        Long.compute(Minus, Some(Long), &Value::Long(i64::MIN), Some(&Value::Long(1))),
        Ok(Value::Long(i64::MAX))
    );
    assert_eq!(Int.compute(Neg, None, &Value::Int(i32::MIN), None), Ok(Value::Int(i32::MIN)));
}

#[test]
fn division_truncates_and_reports_zero() {
    assert_eq!(
        Int.compute(Div, Some(Int), &Value::Int(7), Some(&Value::Int(2))),
        Ok(Value::Int(3))
    );
    assert_eq!(
        Int.compute(Div, Some(Int), &Value::Int(-7), Some(&Value::Int(2))),
        Ok(Value::Int(-3))
    );
    assert_eq!(
        Int.compute(Mod, Some(Int), &Value::Int(-7), Some(&Value::Int(2))),
        Ok(Value::Int(-1))
    );
    assert_eq!(
        Int.compute(Div, Some(Int), &Value::Int(1), Some(&Value::Int(0))),
        Err(EvalError::DivisionByZero)
    );
    assert_eq!(
        Double.compute(Div, Some(Double), &Value::Double(1.0), Some(&Value::Double(0.0))),
        Err(EvalError::DivisionByZero)
    );
    // Mixed integral/floating division widens to the floating side.
    assert_eq!(
        Int.compute(Div, Some(Double), &Value::Int(7), Some(&Value::Double(2.0))),
        Ok(Value::Double(3.5))
    );
}

#[test]
fn shift_counts_are_masked_to_the_result_width() {
    assert_eq!(
        Int.compute(Shl, Some(Int), &Value::Int(1), Some(&Value::Int(33))),
        Ok(Value::Int(2))
    );
    assert_eq!(
        Int.compute(Shr, Some(Int), &Value::Int(-8), Some(&Value::Int(1))),
        Ok(Value::Int(-4))
    );
    assert_eq!(
        Int.compute(UShr, Some(Int), &Value::Int(-1), Some(&Value::Int(28))),
        Ok(Value::Int(15))
    );
    // An int shifted against a long widens to long and masks at 63.
    assert_eq!(
        Int.compute(Shl, Some(Long), &Value::Int(1), Some(&Value::Long(40))),
        Ok(Value::Long(1 << 40))
    );
    assert_eq!(
        Long.compute(UShr, Some(Long), &Value::Long(-1), Some(&Value::Long(60))),
        Ok(Value::Long(15))
    );
}

#[test]
fn concatenation_renders_operands() {
    assert_eq!(
        Str.compute(
            Plus,
            Some(Int),
            &Value::Str("n = ".to_string()),
            Some(&Value::Int(42)),
        ),
        Ok(Value::Str("n = 42".to_string()))
    );
    // Booleans concatenate as their literal spelling.
    assert_eq!(
        Boolean.compute(
            Plus,
            Some(Str),
            &Value::Boolean(true),
            Some(&Value::Str("!".to_string())),
        ),
        Ok(Value::Str("true!".to_string()))
    );
    // char + char is concatenation, never code-point addition.
    assert_eq!(
        Char.compute(Plus, Some(Char), &Value::Char('a'), Some(&Value::Char('b'))),
        Ok(Value::Str("ab".to_string()))
    );
    assert_eq!(
        Str.compute(
            Plus,
            Some(Null),
            &Value::Str("x=".to_string()),
            Some(&Value::Null),
        ),
        Ok(Value::Str("x=null".to_string()))
    );
}

#[test]
fn mixed_width_comparisons() {
    assert_eq!(
        Int.compute(Lt, Some(Long), &Value::Int(1), Some(&Value::Long(2))),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        Long.compute(Eq, Some(Int), &Value::Long(5), Some(&Value::Int(5))),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        Double.compute(Ge, Some(Int), &Value::Double(2.5), Some(&Value::Int(2))),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        Char.compute(Lt, Some(Char), &Value::Char('a'), Some(&Value::Char('b'))),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        Str.compute(
            Gt,
            Some(Str),
            &Value::Str("b".to_string()),
            Some(&Value::Str("a".to_string())),
        ),
        Ok(Value::Boolean(true))
    );
}

#[test]
fn nan_compares_false_under_every_ordering() {
    let nan = Value::Double(f64::NAN);
    let one = Value::Double(1.0);
    for op in [Lt, Gt, Le, Ge, Eq] {
        assert_eq!(
            Double.compute(op, Some(Double), &nan, Some(&one)),
            Ok(Value::Boolean(false)),
            "NaN {op} 1.0"
        );
    }
    assert_eq!(
        Double.compute(NotEq, Some(Double), &nan, Some(&one)),
        Ok(Value::Boolean(true))
    );
}

#[test]
fn increment_and_decrement() {
    assert_eq!(Int.compute(Inc, None, &Value::Int(41), None), Ok(Value::Int(42)));
    assert_eq!(Long.compute(Dec, None, &Value::Long(0), None), Ok(Value::Long(-1)));
    assert_eq!(
        Double.compute(Inc, None, &Value::Double(0.5), None),
        Ok(Value::Double(1.5))
    );
    assert_eq!(Int.compute(BitNot, None, &Value::Int(0), None), Ok(Value::Int(-1)));
    assert_eq!(
        Boolean.compute(Not, None, &Value::Boolean(false), None),
        Ok(Value::Boolean(true))
    );
}

#[test]
fn operand_values_must_match_declared_kinds() {
    assert_eq!(
        Int.compute(Plus, Some(Int), &Value::Long(1), Some(&Value::Int(1))),
        Err(EvalError::OperandMismatch)
    );
    assert_eq!(
        Int.compute(Plus, Some(Int), &Value::Int(1), Some(&Value::Long(1))),
        Err(EvalError::OperandMismatch)
    );
    assert_eq!(
        Int.compute(Plus, Some(Int), &Value::Int(1), None),
        Err(EvalError::OperandMismatch)
    );
}

// === Casts ===

/// The cast template table and the eager conversion must cover the exact
/// same (from, to) pairs.
#[test]
fn cast_views_never_diverge() {
    for &from in &ALL_KINDS {
        for &to in &ALL_KINDS {
            let template = from.cast_template(to);
            let value = from.cast_value(to, &representative(from));
            assert_eq!(
                template.is_ok(),
                value.is_ok(),
                "template/value split for cast {from} -> {to}"
            );
            assert_eq!(from.can_cast_to(to), template.is_ok());
        }
    }
}

#[test]
fn widening_casts_are_identity() {
    assert_eq!(Int.cast_template(Long), Ok(OpTemplate::Identity));
    assert_eq!(Int.cast_template(Double), Ok(OpTemplate::Identity));
    assert_eq!(Long.cast_template(Float), Ok(OpTemplate::Identity));
    assert_eq!(Float.cast_template(Double), Ok(OpTemplate::Identity));
    assert_eq!(Char.cast_template(Str), Ok(OpTemplate::Identity));
}

#[test]
fn narrowing_casts_truncate_toward_zero() {
    assert_eq!(Long.cast_template(Int), Ok(OpTemplate::Call1("__trunc32")));
    assert_eq!(Double.cast_template(Int), Ok(OpTemplate::Call1("__trunc")));

    assert_eq!(Double.cast_value(Int, &Value::Double(3.9)), Ok(Value::Int(3)));
    assert_eq!(Double.cast_value(Int, &Value::Double(-3.9)), Ok(Value::Int(-3)));
    assert_eq!(
        Long.cast_value(Int, &Value::Long(i64::from(u32::MAX) + 2)),
        Ok(Value::Int(1))
    );
}

#[test]
fn char_casts_go_through_code_points() {
    assert_eq!(Char.cast_template(Int), Ok(OpTemplate::Call1("__ord")));
    assert_eq!(Int.cast_template(Char), Ok(OpTemplate::Call1("__chr")));

    assert_eq!(Char.cast_value(Int, &Value::Char('A')), Ok(Value::Int(65)));
    assert_eq!(Int.cast_value(Char, &Value::Int(66)), Ok(Value::Char('B')));
    assert_eq!(
        Char.cast_value(Str, &Value::Char('x')),
        Ok(Value::Str("x".to_string()))
    );
}

#[test]
fn null_is_assignable_everywhere_but_void_and_var() {
    for to in [Int, Long, Float, Double, Boolean, Char, Str] {
        assert_eq!(Null.cast_template(to), Ok(OpTemplate::Identity));
        assert_eq!(Null.cast_value(to, &Value::Null), Ok(Value::Null));
    }
    assert_eq!(
        Null.cast_template(Void),
        Err(TypeError::NoCast { from: Null, to: Void })
    );
    assert_eq!(
        Boolean.cast_template(Int),
        Err(TypeError::NoCast { from: Boolean, to: Int })
    );
    assert_eq!(
        Str.cast_template(Int),
        Err(TypeError::NoCast { from: Str, to: Int })
    );
}

// === Token mapping ===

#[test]
fn operator_tokens_map_to_op_kinds() {
    use juno_lexer::TokenKind;

    assert_eq!(OpKind::from_token(&TokenKind::Plus), Some(Plus));
    assert_eq!(OpKind::from_token(&TokenKind::Star), Some(Times));
    assert_eq!(OpKind::from_token(&TokenKind::UShr), Some(UShr));
    assert_eq!(OpKind::from_token(&TokenKind::AndAnd), Some(And));
    assert_eq!(OpKind::from_token(&TokenKind::Tilde), Some(BitNot));
    assert_eq!(OpKind::from_token(&TokenKind::PlusPlus), Some(Inc));
    assert_eq!(OpKind::from_token(&TokenKind::Assign), None);
    assert_eq!(OpKind::from_token(&TokenKind::Semicolon), None);
}

// === Error display ===

#[test]
fn errors_name_the_offending_kinds() {
    let err = TypeError::NoResultType {
        op: Minus,
        left: Str,
        right: Some(Str),
    };
    assert_eq!(
        err.to_string(),
        "operator `-` is not defined for `String` and `String`"
    );

    let err = TypeError::NoResultType {
        op: Not,
        left: Int,
        right: None,
    };
    assert_eq!(err.to_string(), "operator `!` is not defined for `int`");

    let err = TypeError::NoCast { from: Boolean, to: Int };
    assert_eq!(err.to_string(), "`boolean` cannot be cast to `int`");
}
