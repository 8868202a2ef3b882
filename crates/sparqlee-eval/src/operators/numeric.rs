//! Numeric Functions
//!
//! Implements: ABS, ROUND, CEIL, FLOOR, RAND

use crate::builder::OverloadBuilder;
use crate::error::EvalError;
use crate::overload::OverloadTable;
use rust_decimal::Decimal;
use sparqlee_types::{Literal, Numeric, Term};

pub fn abs() -> OverloadTable {
    OverloadBuilder::new("abs")
        .numeric_converter(|value| match value {
            Numeric::Integer(v) => v
                .checked_abs()
                .map(Numeric::Integer)
                .ok_or_else(|| EvalError::overflow("abs")),
            Numeric::Decimal(v) => Ok(Numeric::Decimal(v.abs())),
            Numeric::Float(v) => Ok(Numeric::Float(v.abs())),
            Numeric::Double(v) => Ok(Numeric::Double(v.abs())),
        })
        .collect()
}

/// Rounds half towards positive infinity
pub fn round() -> OverloadTable {
    OverloadBuilder::new("round")
        .numeric_converter(|value| {
            Ok(match value {
                Numeric::Integer(v) => Numeric::Integer(v),
                Numeric::Decimal(v) if v.fract().is_zero() => Numeric::Decimal(v),
                Numeric::Decimal(v) => Numeric::Decimal(v.checked_add(Decimal::new(5, 1)).map_or(v, |s| s.floor())),
                Numeric::Float(v) => Numeric::Float((v + 0.5).floor()),
                Numeric::Double(v) => Numeric::Double((v + 0.5).floor()),
            })
        })
        .collect()
}

pub fn ceil() -> OverloadTable {
    OverloadBuilder::new("ceil")
        .numeric_converter(|value| {
            Ok(match value {
                Numeric::Integer(v) => Numeric::Integer(v),
                Numeric::Decimal(v) => Numeric::Decimal(v.ceil()),
                Numeric::Float(v) => Numeric::Float(v.ceil()),
                Numeric::Double(v) => Numeric::Double(v.ceil()),
            })
        })
        .collect()
}

pub fn floor() -> OverloadTable {
    OverloadBuilder::new("floor")
        .numeric_converter(|value| {
            Ok(match value {
                Numeric::Integer(v) => Numeric::Integer(v),
                Numeric::Decimal(v) => Numeric::Decimal(v.floor()),
                Numeric::Float(v) => Numeric::Float(v.floor()),
                Numeric::Double(v) => Numeric::Double(v.floor()),
            })
        })
        .collect()
}

/// Uniform `xsd:double` in `[0, 1)`
pub fn rand() -> OverloadTable {
    OverloadBuilder::new("rand")
        .set([], |_, _| Ok(Term::Literal(Literal::double(rand::random::<f64>()))))
        .collect()
}
