//! Values written into cells
//!
//! The store holds text only, so every value is stringified before a write.

use std::fmt;

use crate::error::{Error, Result};

/// A value to be written into a cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank cell
    Empty,
    /// Text, written as-is
    Text(String),
    /// Integer
    Integer(i64),
    /// Floating point number
    Number(f64),
    /// Boolean, written as `TRUE`/`FALSE`
    Bool(bool),
}

impl CellValue {
    /// Text representation stored in the cell.
    ///
    /// Fails for NaN and infinities, which have no cell representation.
    pub fn to_cell_string(&self) -> Result<String> {
        Ok(match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Number(n) => {
                if !n.is_finite() {
                    return Err(Error::Coercion {
                        value: n.to_string(),
                    });
                }
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        })
    }

    /// Check if the value is blank
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_cell_string() {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<&String> for CellValue {
    fn from(s: &String) -> Self {
        CellValue::Text(s.clone())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<f32> for CellValue {
    fn from(n: f32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Integer(n as i64)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Integer(n as i64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// Stringify a row of values, failing on the first one that cannot be coerced.
pub fn coerce_row<I, V>(values: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = V>,
    V: Into<CellValue>,
{
    values
        .into_iter()
        .map(|v| v.into().to_cell_string())
        .collect()
}
