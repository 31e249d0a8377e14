//! Column-letter codec
//!
//! Spreadsheet columns are written as a bijective base-26 numeral: the digits
//! `A`..`Z` stand for 1..26 and there is no zero digit, so `Z` is 26 and `AA` is 27.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Convert column letters to a 1-based column number (`A` = 1, `Z` = 26, `AA` = 27).
///
/// Letters are case-insensitive.
///
/// # Examples
/// ```
/// use fleetsheet_core::column::letters_to_number;
///
/// assert_eq!(letters_to_number("A").unwrap(), 1);
/// assert_eq!(letters_to_number("az").unwrap(), 52);
/// assert!(letters_to_number("A1").is_err());
/// ```
pub fn letters_to_number(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidColumnFormat(letters.to_string()));
    }

    let mut number: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidColumnFormat(letters.to_string()));
        }
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        number = number
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(|| Error::InvalidColumnFormat(letters.to_string()))?;
    }

    Ok(number)
}

/// Convert a 1-based column number to its letters (1 = `A`, 27 = `AA`).
pub fn number_to_letters(number: u32) -> Result<String> {
    if number == 0 {
        return Err(Error::InvalidColumnInput(0));
    }

    let mut letters = Vec::new();
    let mut n = number;
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }

    Ok(letters.into_iter().rev().collect())
}

/// A validated 1-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Column(u32);

impl Column {
    /// Column from a 1-based number.
    pub fn new(number: u32) -> Result<Self> {
        if number == 0 {
            return Err(Error::InvalidColumnInput(0));
        }
        Ok(Self(number))
    }

    /// Column from letters (case-insensitive).
    pub fn parse(letters: &str) -> Result<Self> {
        letters_to_number(letters).map(Self)
    }

    /// 1-based column number.
    pub fn number(self) -> u32 {
        self.0
    }

    /// Upper-case column letters.
    pub fn letters(self) -> String {
        // self.0 is never zero
        number_to_letters(self.0).unwrap_or_default()
    }

    /// Column `offset` places to the right.
    pub fn offset(self, offset: u32) -> Self {
        Self(self.0 + offset)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters())
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
