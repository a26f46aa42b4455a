//! Primitive type and operator resolution engine for the Juno language.
//!
//! The engine answers three questions about primitive operator
//! applications and casts, and guarantees the answers agree:
//!
//! - what type does `left op right` produce? ([`PrimitiveKind::result_type`])
//! - how would a code generator render it? ([`PrimitiveKind::operator_template`])
//! - what value does it produce right now? ([`PrimitiveKind::compute`])
//!
//! All tables are immutable match-based constants over `Copy` kinds, so
//! everything here is freely shareable across threads.

pub mod arith;
pub mod error;
pub mod ops;
pub mod template;
pub mod ty;
pub mod value;

pub use error::{EvalError, TypeError};
pub use ops::{OpKind, ALL_OPS};
pub use template::OpTemplate;
pub use ty::{PrimitiveKind, ALL_KINDS};
pub use value::Value;

#[cfg(test)]
mod tests;
