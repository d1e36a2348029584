use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Sub};

use crate::error::{Error, Result};
use crate::na::{element_equal, NaNAware};

/// Element type tag shared by cells, arrays and series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DType {
    Bool,
    Int32,
    Int64,
    UInt64,
    Float64,
    Str,
    Unicode,
    /// Heterogeneous storage holding one `Value` per element.
    Value,
}

impl DType {
    pub fn name(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt64 => "uint64",
            DType::Float64 => "float64",
            DType::Str => "str",
            DType::Unicode => "unicode",
            DType::Value => "value",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DType::Int32 | DType::Int64 | DType::UInt64 | DType::Float64
        )
    }

    /// Size in bytes of one element, used by memory usage reports.
    pub(crate) fn item_size(&self) -> usize {
        match self {
            DType::Bool => 1,
            DType::Int32 => 4,
            DType::Int64 | DType::UInt64 | DType::Float64 => 8,
            DType::Str => std::mem::size_of::<String>(),
            DType::Unicode => std::mem::size_of::<WideString>(),
            DType::Value => std::mem::size_of::<Value>(),
        }
    }
}

impl Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wide (code point per element) string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WideString(Vec<char>);

impl WideString {
    pub fn new() -> Self {
        WideString(Vec::new())
    }

    pub fn chars(&self) -> &[char] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts back to a narrow UTF-8 string.
    pub fn to_narrow(&self) -> String {
        self.0.iter().collect()
    }
}

impl From<&str> for WideString {
    fn from(s: &str) -> Self {
        WideString(s.chars().collect())
    }
}

impl From<String> for WideString {
    fn from(s: String) -> Self {
        WideString::from(s.as_str())
    }
}

impl FromIterator<char> for WideString {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        WideString(iter.into_iter().collect())
    }
}

impl Display for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Binary arithmetic operator applied to cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        };
        f.write_str(symbol)
    }
}

/// A single polymorphic cell.
///
/// Numeric kinds compare and hash by numeric value across kinds, so
/// `Value::Int64(1) == Value::UInt64(1)`; bools count as 0 and 1. Strings
/// compare only with strings of the same width and order after numbers.
///
/// Float equality allows a small tolerance but hashing uses the exact bits of
/// the number, so hash-based label lookups (`Index`, `HashMap`) match float
/// labels exactly: `Float64(0.0) == Float64(1e-17)` holds, yet a map keyed by
/// `1e-17` does not find `0.0`.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Empty,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Str(String),
    Unicode(WideString),
}

/// Numeric view of a cell, ordered by widening rank.
#[derive(Debug, Clone, Copy)]
enum Num {
    I32(i32),
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Num {
    fn rank(&self) -> u8 {
        match self {
            Num::I32(_) => 0,
            Num::I64(_) => 1,
            Num::U64(_) => 2,
            Num::F64(_) => 3,
        }
    }

    fn as_i128(&self) -> Option<i128> {
        match *self {
            Num::I32(v) => Some(v as i128),
            Num::I64(v) => Some(v as i128),
            Num::U64(v) => Some(v as i128),
            Num::F64(_) => None,
        }
    }

    fn as_f64(&self) -> f64 {
        match *self {
            Num::I32(v) => v as f64,
            Num::I64(v) => v as f64,
            Num::U64(v) => v as f64,
            Num::F64(v) => v,
        }
    }

    fn as_i32(&self) -> i32 {
        match *self {
            Num::I32(v) => v,
            Num::I64(v) => v as i32,
            Num::U64(v) => v as i32,
            Num::F64(v) => v as i32,
        }
    }

    fn as_i64(&self) -> i64 {
        match *self {
            Num::I32(v) => v as i64,
            Num::I64(v) => v,
            Num::U64(v) => v as i64,
            Num::F64(v) => v as i64,
        }
    }

    fn as_u64(&self) -> u64 {
        match *self {
            Num::I32(v) => v as u64,
            Num::I64(v) => v as u64,
            Num::U64(v) => v,
            Num::F64(v) => v as u64,
        }
    }

    fn equals(&self, other: &Num) -> bool {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => a == b,
            _ => element_equal(self.as_f64(), other.as_f64()),
        }
    }

    fn compare(&self, other: &Num) -> Ordering {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => {
                let (a, b) = (self.as_f64(), other.as_f64());
                if element_equal(a, b) {
                    Ordering::Equal
                } else {
                    a.total_cmp(&b)
                }
            }
        }
    }
}

macro_rules! int_arith {
    ($a:expr, $b:expr, $op:expr, $ctor:path) => {{
        let (a, b) = ($a, $b);
        match $op {
            ArithOp::Add => Ok($ctor(a.wrapping_add(b))),
            ArithOp::Sub => Ok($ctor(a.wrapping_sub(b))),
            ArithOp::Mul => Ok($ctor(a.wrapping_mul(b))),
            ArithOp::Div => {
                if b == 0 {
                    Err(Error::InvalidOperation("integer division by zero".into()))
                } else {
                    Ok($ctor(a.wrapping_div(b)))
                }
            }
        }
    }};
}

impl Value {
    /// Wide string cell from narrow text.
    pub fn unicode(s: &str) -> Value {
        Value::Unicode(WideString::from(s))
    }

    /// Element type of the active kind; `None` for `Empty`.
    pub fn dtype(&self) -> Option<DType> {
        match self {
            Value::Empty => None,
            Value::Bool(_) => Some(DType::Bool),
            Value::Int32(_) => Some(DType::Int32),
            Value::Int64(_) => Some(DType::Int64),
            Value::UInt64(_) => Some(DType::UInt64),
            Value::Float64(_) => Some(DType::Float64),
            Value::Str(_) => Some(DType::Str),
            Value::Unicode(_) => Some(DType::Unicode),
        }
    }

    /// Kind name for messages.
    pub fn kind_name(&self) -> &'static str {
        self.dtype().map_or("empty", |d| d.name())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// True for the signed integer kinds.
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int32(_) | Value::Int64(_))
    }

    pub fn is_size(&self) -> bool {
        matches!(self, Value::UInt64(_))
    }

    pub fn is_integer(&self) -> bool {
        self.is_int() || self.is_size()
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float64(_))
    }

    pub fn is_number(&self) -> bool {
        self.numeric().is_some()
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn is_unicode(&self) -> bool {
        matches!(self, Value::Unicode(_))
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Float64(v) if v.is_nan())
    }

    fn numeric(&self) -> Option<Num> {
        match *self {
            Value::Int32(v) => Some(Num::I32(v)),
            Value::Int64(v) => Some(Num::I64(v)),
            Value::UInt64(v) => Some(Num::U64(v)),
            Value::Float64(v) => Some(Num::F64(v)),
            _ => None,
        }
    }

    /// Arithmetic view; bools count as int32 here.
    fn arithmetic_operand(&self) -> Option<Num> {
        match *self {
            Value::Bool(b) => Some(Num::I32(b as i32)),
            _ => self.numeric(),
        }
    }

    /// Non-negative integer cell as a position.
    pub fn as_position(&self) -> Option<usize> {
        match *self {
            Value::Int32(v) if v >= 0 => Some(v as usize),
            Value::Int64(v) if v >= 0 => usize::try_from(v).ok(),
            Value::UInt64(v) => usize::try_from(v).ok(),
            _ => None,
        }
    }

    fn invalid_type(&self, target: &str) -> Error {
        Error::Type(format!(
            "Invalid type: cannot read a {} value as {}",
            self.kind_name(),
            target
        ))
    }

    pub fn as_bool(&self) -> Result<bool> {
        match *self {
            Value::Bool(b) => Ok(b),
            _ => Err(self.invalid_type("bool")),
        }
    }

    pub fn as_i32(&self) -> Result<i32> {
        match *self {
            Value::Bool(b) => Ok(b as i32),
            Value::Int32(v) => Ok(v),
            _ => Err(self.invalid_type("int32")),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        match *self {
            Value::Bool(b) => Ok(b as i64),
            Value::Int32(v) => Ok(v as i64),
            Value::Int64(v) => Ok(v),
            _ => Err(self.invalid_type("int64")),
        }
    }

    pub fn as_u64(&self) -> Result<u64> {
        match *self {
            Value::Bool(b) => Ok(b as u64),
            Value::Int32(v) => u64::try_from(v)
                .map_err(|_| Error::InvalidValue(format!("Invalid value: {} is negative", v))),
            Value::Int64(v) => u64::try_from(v)
                .map_err(|_| Error::InvalidValue(format!("Invalid value: {} is negative", v))),
            Value::UInt64(v) => Ok(v),
            _ => Err(self.invalid_type("uint64")),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match *self {
            Value::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
            Value::Int32(v) => Ok(v as f64),
            Value::Int64(v) => Ok(v as f64),
            Value::UInt64(v) => Ok(v as f64),
            Value::Float64(v) => Ok(v),
            _ => Err(self.invalid_type("float64")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::Str(s) => Ok(s),
            _ => Err(self.invalid_type("str")),
        }
    }

    pub fn as_unicode(&self) -> Result<&WideString> {
        match self {
            Value::Unicode(s) => Ok(s),
            _ => Err(self.invalid_type("unicode")),
        }
    }

    /// Strict conversion following the widening chain
    /// bool → int32 → int64 → uint64 → float64.
    pub fn to<T: FromValue>(&self) -> Result<T> {
        T::from_value(self)
    }

    /// Lenient conversion to another element type.
    ///
    /// Numbers are truncated or wrapped like an `as` cast, rendered as text for
    /// string targets, and text is parsed for numeric targets.
    pub fn astype(&self, dtype: DType) -> Result<Value> {
        if self.is_empty() {
            return Err(Error::UnsupportedType(format!(
                "cannot convert an empty value to {}",
                dtype
            )));
        }
        if self.dtype() == Some(dtype) || dtype == DType::Value {
            return Ok(self.clone());
        }
        let text = match self {
            Value::Str(s) => Some(s.trim().to_string()),
            Value::Unicode(w) => Some(w.to_narrow().trim().to_string()),
            _ => None,
        };
        let parse_error = |t: &str| {
            Error::InvalidValue(format!("Invalid value: cannot parse '{}' as {}", t, dtype))
        };
        match dtype {
            DType::Str => Ok(Value::Str(self.to_string())),
            DType::Unicode => Ok(Value::unicode(&self.to_string())),
            DType::Value => Ok(self.clone()),
            DType::Bool => match (self, text) {
                (Value::Bool(b), _) => Ok(Value::Bool(*b)),
                (_, Some(t)) => match t.as_str() {
                    "true" | "True" | "1" => Ok(Value::Bool(true)),
                    "false" | "False" | "0" => Ok(Value::Bool(false)),
                    _ => Err(parse_error(&t)),
                },
                _ => Ok(Value::Bool(self.as_f64()? != 0.0)),
            },
            DType::Float64 => match text {
                Some(t) => t.parse::<f64>().map(Value::Float64).map_err(|_| parse_error(&t)),
                None => Ok(Value::Float64(self.as_f64()?)),
            },
            DType::Int32 | DType::Int64 | DType::UInt64 => {
                let num = match text {
                    Some(t) => match t.parse::<i64>() {
                        Ok(v) => Num::I64(v),
                        Err(_) => match t.parse::<u64>() {
                            Ok(v) => Num::U64(v),
                            Err(_) => return Err(parse_error(&t)),
                        },
                    },
                    None => self.arithmetic_operand().ok_or_else(|| self.invalid_type(dtype.name()))?,
                };
                if let Num::F64(v) = num {
                    if !v.is_finite() {
                        return Err(Error::InvalidValue(format!(
                            "Invalid value: cannot convert {} to {}",
                            v, dtype
                        )));
                    }
                }
                Ok(match dtype {
                    DType::Int32 => Value::Int32(num.as_i32()),
                    DType::Int64 => Value::Int64(num.as_i64()),
                    _ => Value::UInt64(num.as_u64()),
                })
            }
        }
    }

    /// Applies `op` after promoting both operands to the wider numeric kind.
    pub fn arithmetic(&self, other: &Value, op: ArithOp) -> Result<Value> {
        let (a, b) = match (self.arithmetic_operand(), other.arithmetic_operand()) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(Error::Type(format!(
                    "Invalid type: cannot apply '{}' to {} and {}",
                    op,
                    self.kind_name(),
                    other.kind_name()
                )))
            }
        };
        match a.rank().max(b.rank()) {
            0 => int_arith!(a.as_i32(), b.as_i32(), op, Value::Int32),
            1 => int_arith!(a.as_i64(), b.as_i64(), op, Value::Int64),
            2 => int_arith!(a.as_u64(), b.as_u64(), op, Value::UInt64),
            _ => {
                let (x, y) = (a.as_f64(), b.as_f64());
                Ok(Value::Float64(match op {
                    ArithOp::Add => x + y,
                    ArithOp::Sub => x - y,
                    ArithOp::Mul => x * y,
                    ArithOp::Div => x / y,
                }))
            }
        }
    }

    pub fn checked_add(&self, other: &Value) -> Result<Value> {
        self.arithmetic(other, ArithOp::Add)
    }

    pub fn checked_sub(&self, other: &Value) -> Result<Value> {
        self.arithmetic(other, ArithOp::Sub)
    }

    pub fn checked_mul(&self, other: &Value) -> Result<Value> {
        self.arithmetic(other, ArithOp::Mul)
    }

    pub fn checked_div(&self, other: &Value) -> Result<Value> {
        self.arithmetic(other, ArithOp::Div)
    }

    /// Compound form of `checked_add`; leaves `self` untouched on error.
    pub fn try_add_assign(&mut self, other: &Value) -> Result<()> {
        *self = self.checked_add(other)?;
        Ok(())
    }

    pub fn try_sub_assign(&mut self, other: &Value) -> Result<()> {
        *self = self.checked_sub(other)?;
        Ok(())
    }

    pub fn try_mul_assign(&mut self, other: &Value) -> Result<()> {
        *self = self.checked_mul(other)?;
        Ok(())
    }

    pub fn try_div_assign(&mut self, other: &Value) -> Result<()> {
        *self = self.checked_div(other)?;
        Ok(())
    }

    /// Sort group: empty, then numbers and bools, then narrow and wide strings.
    fn group(&self) -> u8 {
        match self {
            Value::Empty => 0,
            Value::Bool(_)
            | Value::Int32(_)
            | Value::Int64(_)
            | Value::UInt64(_)
            | Value::Float64(_) => 1,
            Value::Str(_) => 2,
            Value::Unicode(_) => 3,
        }
    }
}

/// Strict extraction of a concrete element from a cell.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_bool()
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_i32()
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_i64()
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_u64()
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_f64()
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for WideString {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_unicode().cloned()
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Empty, Value::Empty) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Unicode(a), Value::Unicode(b)) => a == b,
            _ => match (self.arithmetic_operand(), other.arithmetic_operand()) {
                (Some(a), Some(b)) => a.equals(&b),
                _ => false,
            },
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Unicode(a), Value::Unicode(b)) => a.cmp(b),
            _ => match (self.arithmetic_operand(), other.arithmetic_operand()) {
                (Some(a), Some(b)) => a.compare(&b),
                _ => self.group().cmp(&other.group()),
            },
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Empty => 0u8.hash(state),
            Value::Str(s) => {
                2u8.hash(state);
                s.hash(state);
            }
            Value::Unicode(w) => {
                3u8.hash(state);
                w.hash(state);
            }
            _ => {
                // 整数値と等しい浮動小数点は整数として扱う
                let integral = match self.arithmetic_operand() {
                    Some(Num::F64(v)) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e38 => {
                        Some(v as i128)
                    }
                    Some(n) => n.as_i128(),
                    None => None,
                };
                match (integral, self) {
                    (Some(i), _) => {
                        4u8.hash(state);
                        i.hash(state);
                    }
                    (None, Value::Float64(v)) => {
                        5u8.hash(state);
                        let bits = if v.is_nan() { f64::NAN.to_bits() } else { v.to_bits() };
                        bits.hash(state);
                    }
                    _ => 6u8.hash(state),
                }
            }
        }
    }
}

impl NaNAware for Value {
    fn is_nan_value(&self) -> bool {
        self.is_nan()
    }
}

impl NaNAware for WideString {
    fn is_nan_value(&self) -> bool {
        false
    }
}

/// Formats a float with up to 8 significant digits.
pub(crate) fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    let magnitude = v.abs().log10().floor() as i32;
    let decimals = (7 - magnitude).clamp(0, 16) as usize;
    let text = format!("{:.*}", decimals, v);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Float64(v) => f.write_str(&format_float(*v)),
            Value::Str(s) => f.write_str(s),
            Value::Unicode(w) => write!(f, "{}", w),
        }
    }
}

macro_rules! impl_value_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_value_from!(
    bool => Bool,
    i32 => Int32,
    i64 => Int64,
    u64 => UInt64,
    f64 => Float64,
    String => Str,
    WideString => Unicode,
);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt64(v as u64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

macro_rules! impl_value_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<&Value> for &Value {
            type Output = Result<Value>;

            fn $method(self, rhs: &Value) -> Self::Output {
                self.arithmetic(rhs, $op)
            }
        }

        impl $trait for Value {
            type Output = Result<Value>;

            fn $method(self, rhs: Value) -> Self::Output {
                self.arithmetic(&rhs, $op)
            }
        }
    };
}

impl_value_op!(Add, add, ArithOp::Add);
impl_value_op!(Sub, sub, ArithOp::Sub);
impl_value_op!(Mul, mul, ArithOp::Mul);
impl_value_op!(Div, div, ArithOp::Div);
