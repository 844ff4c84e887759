use crate::numeric::{self, Number};
use crate::{EvalError, EvalResult, Value};

// Extracts a number from a Value or returns a TypeMismatch error
macro_rules! expect_number {
    ($value:expr, $name:literal) => {
        match $value {
            Value::Number(n) => *n,
            other => {
                return Err(EvalError::TypeMismatch {
                    expected: concat!("a number for '", $name, "'"),
                    found: other.type_name(),
                });
            }
        }
    };
}

pub fn prim_add(left: &Value, right: &Value) -> EvalResult {
    let a: Number = expect_number!(left, "+");
    let b: Number = expect_number!(right, "+");
    Ok(Value::Number(numeric::add(a, b)))
}

pub fn prim_multiply(left: &Value, right: &Value) -> EvalResult {
    let a: Number = expect_number!(left, "*");
    let b: Number = expect_number!(right, "*");
    Ok(Value::Number(numeric::multiply(a, b)))
}

pub fn prim_abs(value: &Value) -> EvalResult {
    let n: Number = expect_number!(value, "abs");
    Ok(Value::Number(numeric::abs(n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float(f: f32) -> Value {
        Value::Number(Number::Float(f))
    }

    #[test]
    fn test_add_and_multiply() {
        assert_eq!(prim_add(&Value::int(1), &Value::int(2)), Ok(Value::int(3)));
        assert_eq!(prim_add(&float(1.0), &Value::int(2)), Ok(float(3.0)));
        assert_eq!(
            prim_multiply(&Value::int(5), &Value::int(5)),
            Ok(Value::int(25))
        );
    }

    #[test]
    fn test_abs() {
        assert_eq!(prim_abs(&Value::int(-9)), Ok(Value::int(9)));
        assert_eq!(prim_abs(&float(-0.5)), Ok(float(0.5)));
    }

    #[test]
    fn test_type_errors() {
        assert_eq!(
            prim_add(&Value::int(1), &Value::symbol("x")),
            Err(EvalError::TypeMismatch {
                expected: "a number for '+'",
                found: "symbol",
            })
        );
        assert!(matches!(
            prim_multiply(&Value::Nil, &Value::int(1)),
            Err(EvalError::TypeMismatch { found: "nil", .. })
        ));
        assert!(matches!(
            prim_abs(&Value::List(vec![])),
            Err(EvalError::TypeMismatch { found: "list", .. })
        ));
    }
}
