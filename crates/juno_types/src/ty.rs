//! Primitive kinds and their cast tables.
//!
//! One `PrimitiveKind` exists per built-in value domain. Kinds are plain
//! `Copy` values and every table is an immutable match-based constant, so
//! the whole engine is freely shareable across concurrent analyses.

use std::fmt;

use crate::error::TypeError;
use crate::template::OpTemplate;
use crate::value::Value;

/// A built-in value domain of the Juno language, plus the degenerate
/// null/void/var kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Char,
    Str,
    /// Type of the literal `null` — the universal "no value" sentinel.
    Null,
    /// Type of statements and value-less calls.
    Void,
    /// Placeholder for not-yet-inferred declarations. Must never reach
    /// operator resolution.
    Var,
}

/// All kinds, in a fixed order, for table sweeps.
pub const ALL_KINDS: [PrimitiveKind; 10] = [
    PrimitiveKind::Int,
    PrimitiveKind::Long,
    PrimitiveKind::Float,
    PrimitiveKind::Double,
    PrimitiveKind::Boolean,
    PrimitiveKind::Char,
    PrimitiveKind::Str,
    PrimitiveKind::Null,
    PrimitiveKind::Void,
    PrimitiveKind::Var,
];

impl PrimitiveKind {
    /// The source-level spelling of the kind.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Str => "String",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Void => "void",
            PrimitiveKind::Var => "var",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int | PrimitiveKind::Long | PrimitiveKind::Float | PrimitiveKind::Double
        )
    }

    pub fn is_integral(self) -> bool {
        matches!(self, PrimitiveKind::Int | PrimitiveKind::Long)
    }

    pub fn is_floating(self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }

    /// The wider of two numeric kinds: double > float > long > int.
    /// Callers guarantee both sides are numeric.
    pub fn widen(self, other: PrimitiveKind) -> PrimitiveKind {
        debug_assert!(self.is_numeric() && other.is_numeric());
        for kind in [
            PrimitiveKind::Double,
            PrimitiveKind::Float,
            PrimitiveKind::Long,
        ] {
            if self == kind || other == kind {
                return kind;
            }
        }
        PrimitiveKind::Int
    }

    // === Cast table ===

    /// Whether a value of this kind can be cast to `to`.
    pub fn can_cast_to(self, to: PrimitiveKind) -> bool {
        self.cast_template(to).is_ok()
    }

    /// The expression template a code generator substitutes for the cast.
    /// `Identity` means the value is representable without conversion at
    /// codegen time.
    pub fn cast_template(self, to: PrimitiveKind) -> Result<OpTemplate, TypeError> {
        use OpTemplate::*;
        use PrimitiveKind::*;

        if self == to {
            return Ok(Identity);
        }

        let template = match (self, to) {
            // Widening numeric casts need no generated conversion.
            (Int, Long) | (Int, Float) | (Int, Double) => Identity,
            (Long, Float) | (Long, Double) => Identity,
            (Float, Double) => Identity,

            // Narrowing numeric casts truncate toward zero.
            (Long, Int) => Call1("__trunc32"),
            (Float, Int) | (Float, Long) | (Double, Int) | (Double, Long) => Call1("__trunc"),
            (Double, Float) => Identity,

            // char <-> numeric via its code point.
            (Int, Char) | (Long, Char) => Call1("__chr"),
            (Char, Int) | (Char, Long) | (Char, Float) | (Char, Double) => Call1("__ord"),

            // A char is a one-character string at runtime.
            (Char, Str) => Identity,

            // null is assignable to any value-bearing kind.
            (Null, to) if to != Void && to != Var => Identity,

            _ => {
                return Err(TypeError::NoCast { from: self, to });
            }
        };
        Ok(template)
    }

    /// Perform the conversion described by [`cast_template`] eagerly.
    /// The two paths must agree on every destination kind in the table.
    pub fn cast_value(self, to: PrimitiveKind, value: &Value) -> Result<Value, TypeError> {
        use PrimitiveKind::*;

        // Validate against the cast table first so both paths cover the
        // exact same destination kinds.
        self.cast_template(to)?;

        if self == Null {
            return Ok(Value::Null);
        }

        let converted = match to {
            Int => Value::Int(narrow_to_i32(value)),
            Long => Value::Long(narrow_to_i64(value)),
            Float => Value::Float(to_f64(value) as f32),
            Double => Value::Double(to_f64(value)),
            Char => {
                let code = match value {
                    Value::Int(v) => *v as u32,
                    Value::Long(v) => *v as u32,
                    Value::Char(c) => *c as u32,
                    _ => 0,
                };
                Value::Char(char::from_u32(code).unwrap_or('\u{FFFD}'))
            }
            Str => Value::Str(value.render()),
            Boolean => value.clone(),
            Null | Void | Var => value.clone(),
        };
        Ok(converted)
    }
}

fn to_f64(value: &Value) -> f64 {
    match value {
        Value::Char(c) => *c as u32 as f64,
        other => other.as_f64().unwrap_or(0.0),
    }
}

fn narrow_to_i64(value: &Value) -> i64 {
    match value {
        Value::Int(v) => *v as i64,
        Value::Long(v) => *v,
        Value::Float(v) => v.trunc() as i64,
        Value::Double(v) => v.trunc() as i64,
        Value::Char(c) => *c as u32 as i64,
        _ => 0,
    }
}

fn narrow_to_i32(value: &Value) -> i32 {
    narrow_to_i64(value) as i32
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
