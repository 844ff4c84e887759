use crate::environment::Environment;
use crate::evaluator::EvalResult;
use crate::numeric::Number;
use std::cell::RefCell;
use std::fmt; // For custom display formatting
use std::rc::Rc;

/// The universal runtime datum. Parsed code and evaluated results share this
/// representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(Number),
    Symbol(String), // e.g., +, sq, set!
    List(Vec<Value>),
    Procedure(Procedure),
    Nil, // The absent value: unbound lookups, `repeat`, unmatched applications
}

impl Value {
    pub fn symbol(name: &str) -> Self {
        Value::Symbol(name.to_string())
    }

    pub fn int(n: i32) -> Self {
        Value::Number(Number::Int(n))
    }

    /// Only the 32-bit integer zero is false. `0.0`, `nil` and the empty
    /// list are all true.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Number(Number::Int(0)))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(n) => n.type_name(),
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Procedure(_) => "procedure",
            Value::Nil => "nil",
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::List(list) => {
                write!(f, "(")?;
                let mut first = true;
                for expr in list {
                    if !first {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", expr)?;
                    first = false;
                }
                write!(f, ")")
            }
            Value::Procedure(procedure) => write!(f, "{}", procedure),
            Value::Nil => write!(f, "nil"),
        }
    }
}

pub type UnaryFunc = fn(&Value) -> EvalResult;
pub type BinaryFunc = fn(&Value, &Value) -> EvalResult;

#[derive(Clone)] // Need Clone for Value::Procedure
pub enum Procedure {
    Unary(UnaryFunc, &'static str), // The function pointer and its name (for display/debug)
    Binary(BinaryFunc, &'static str),
    Lambda(Rc<Lambda>),
}

/// A user-defined closure.
pub struct Lambda {
    pub params: Vec<String>,
    pub body: Value,
    /// The scope the `lambda` form was evaluated in, not the caller's.
    pub env: Rc<RefCell<Environment>>,
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Procedure::Unary(_, name) => write!(f, "Unary({})", name),
            Procedure::Binary(_, name) => write!(f, "Binary({})", name),
            // The captured environment may contain this very closure.
            Procedure::Lambda(lambda) => write!(f, "Lambda({:?})", lambda.params),
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Procedure::Unary(_, name) | Procedure::Binary(_, name) => {
                write!(f, "#<primitive:{}>", name)
            }
            Procedure::Lambda(lambda) => write!(f, "#<lambda ({})>", lambda.params.join(" ")),
        }
    }
}

// Function pointers don't compare reliably, so primitives compare by name and
// closures by identity.
impl PartialEq for Procedure {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Procedure::Unary(_, n1), Procedure::Unary(_, n2)) => n1 == n2,
            (Procedure::Binary(_, n1), Procedure::Binary(_, n2)) => n1 == n2,
            (Procedure::Lambda(l1), Procedure::Lambda(l2)) => Rc::ptr_eq(l1, l2),
            _ => false,
        }
    }
}
