//! Number representations and the widening rules used by the arithmetic
//! built-ins.
//!
//! The widening table is not a numeric tower: `Double` beats `Float`, which
//! beats `Int`, and any `Int` operand pulls the whole operation down to 32
//! bits, even when the other side is a `Long`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Number {
    /// Classifies a numeric literal: 32-bit integer first, then single, then
    /// double precision. Returns `None` when the token is not a number.
    pub fn parse(token: &str) -> Option<Number> {
        if let Ok(n) = token.parse::<i32>() {
            return Some(Number::Int(n));
        }
        // Keeps `inf`, `nan` and friends as symbols.
        if !token.bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }
        // Out-of-range literals still parse as single precision, saturating
        // to infinity.
        match token.parse::<f32>() {
            Ok(f) => Some(Number::Float(f)),
            Err(_) => token.parse::<f64>().ok().map(Number::Double),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Number::Byte(_) => "byte",
            Number::Short(_) => "short",
            Number::Int(_) => "int",
            Number::Long(_) => "long",
            Number::Float(_) => "float",
            Number::Double(_) => "double",
        }
    }

    /// The value as a whole number, for integral representations only.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Number::Byte(n) => Some(i64::from(n)),
            Number::Short(n) => Some(i64::from(n)),
            Number::Int(n) => Some(i64::from(n)),
            Number::Long(n) => Some(n),
            Number::Float(_) | Number::Double(_) => None,
        }
    }

    fn as_f64(&self) -> f64 {
        match *self {
            Number::Byte(n) => f64::from(n),
            Number::Short(n) => f64::from(n),
            Number::Int(n) => f64::from(n),
            Number::Long(n) => n as f64,
            Number::Float(n) => f64::from(n),
            Number::Double(n) => n,
        }
    }

    fn as_f32(&self) -> f32 {
        match *self {
            Number::Byte(n) => f32::from(n),
            Number::Short(n) => f32::from(n),
            Number::Int(n) => n as f32,
            Number::Long(n) => n as f32,
            Number::Float(n) => n,
            Number::Double(n) => n as f32,
        }
    }

    fn as_i64(&self) -> i64 {
        match *self {
            Number::Byte(n) => i64::from(n),
            Number::Short(n) => i64::from(n),
            Number::Int(n) => i64::from(n),
            Number::Long(n) => n,
            Number::Float(n) => n as i64,
            Number::Double(n) => n as i64,
        }
    }

    // Narrowing conversions truncate to the low bits, like a cast.
    fn as_i32(&self) -> i32 {
        self.as_i64() as i32
    }

    fn as_i16(&self) -> i16 {
        self.as_i64() as i16
    }

    fn as_i8(&self) -> i8 {
        self.as_i64() as i8
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Byte(n) => write!(f, "{}", n),
            Number::Short(n) => write!(f, "{}", n),
            Number::Int(n) => write!(f, "{}", n),
            Number::Long(n) => write!(f, "{}", n),
            Number::Float(n) => write_float(f, f64::from(*n), format_args!("{:?}", n)),
            Number::Double(n) => write_float(f, *n, format_args!("{:?}", n)),
        }
    }
}

// Debug keeps the trailing `.0` on whole floats; non-finite values use the
// `Infinity`/`NaN` spelling.
fn write_float(f: &mut fmt::Formatter<'_>, value: f64, debug: fmt::Arguments<'_>) -> fmt::Result {
    if value.is_nan() {
        write!(f, "NaN")
    } else if value.is_infinite() {
        write!(f, "{}Infinity", if value < 0.0 { "-" } else { "" })
    } else {
        f.write_fmt(debug)
    }
}

/// Which representation a binary operation is carried out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Width {
    Double,
    Float,
    Int,
    Long,
    Short,
    Byte,
}

impl Width {
    fn of(n: &Number) -> Width {
        match n {
            Number::Double(_) => Width::Double,
            Number::Float(_) => Width::Float,
            Number::Int(_) => Width::Int,
            Number::Long(_) => Width::Long,
            Number::Short(_) => Width::Short,
            Number::Byte(_) => Width::Byte,
        }
    }

    // Precedence, highest first: double, float, int, long, short, byte.
    fn rank(self) -> u8 {
        match self {
            Width::Double => 5,
            Width::Float => 4,
            Width::Int => 3,
            Width::Long => 2,
            Width::Short => 1,
            Width::Byte => 0,
        }
    }
}

fn widen(a: &Number, b: &Number) -> Width {
    let (left, right) = (Width::of(a), Width::of(b));
    if left.rank() >= right.rank() { left } else { right }
}

pub fn add(a: Number, b: Number) -> Number {
    match widen(&a, &b) {
        Width::Double => Number::Double(a.as_f64() + b.as_f64()),
        Width::Float => Number::Float(a.as_f32() + b.as_f32()),
        Width::Int => Number::Int(a.as_i32().wrapping_add(b.as_i32())),
        Width::Long => Number::Long(a.as_i64().wrapping_add(b.as_i64())),
        // Short and byte operands are read at their own width but the
        // arithmetic itself happens in 32 bits.
        Width::Short => Number::Int(i32::from(a.as_i16()) + i32::from(b.as_i16())),
        Width::Byte => Number::Int(i32::from(a.as_i8()) + i32::from(b.as_i8())),
    }
}

pub fn multiply(a: Number, b: Number) -> Number {
    match widen(&a, &b) {
        Width::Double => Number::Double(a.as_f64() * b.as_f64()),
        Width::Float => Number::Float(a.as_f32() * b.as_f32()),
        Width::Int => Number::Int(a.as_i32().wrapping_mul(b.as_i32())),
        Width::Long => Number::Long(a.as_i64().wrapping_mul(b.as_i64())),
        Width::Short => Number::Int(i32::from(a.as_i16()) * i32::from(b.as_i16())),
        Width::Byte => Number::Int(i32::from(a.as_i8()) * i32::from(b.as_i8())),
    }
}

pub fn abs(n: Number) -> Number {
    match n {
        Number::Double(d) => Number::Double(d.abs()),
        Number::Float(f) => Number::Float(f.abs()),
        Number::Long(l) => Number::Long(l.saturating_abs()),
        other => {
            let i = other.as_i32();
            match i.checked_abs() {
                Some(magnitude) => Number::Int(magnitude),
                None => Number::Long(i64::from(i).abs()),
            }
        }
    }
}
