use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

///
/// A residue position expressed in one numbering system (PDB or UniProt).
///
/// `Missing` marks a residue with no counterpart in that numbering, e.g. a
/// residue unresolved in the structure or outside the mapped segment. It
/// renders as `"null"`, the marker used by SIFTS-style mapping tables.
///
/// `Empty` is produced when digit extraction from a raw annotation value
/// finds no digits at all. It is kept distinct from `Missing` so that the
/// bad value stays observable: it passes through null stripping untouched
/// and fails basis lookups instead of being folded into a gap.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PosToken {
    Residue(u32),
    Missing,
    Empty,
}

impl PosToken {
    ///
    /// Normalize one raw scalar from an upstream mapping table into a token.
    ///
    /// Integral and float values keep their truncated integer part; text is
    /// parsed numerically first and falls back to keeping only its ASCII
    /// digits. `null`, `NaN` and explicit missing values become [PosToken::Missing].
    ///
    pub fn from_raw(raw: &RawPos) -> PosToken {
        match raw {
            RawPos::Null => PosToken::Missing,
            RawPos::Int(value) => PosToken::Residue(value.unsigned_abs() as u32),
            RawPos::Float(value) => Self::from_float(*value),
            RawPos::Text(text) => Self::from_text(text),
        }
    }

    fn from_float(value: f64) -> PosToken {
        if value.is_nan() {
            PosToken::Missing
        } else if !value.is_finite() {
            PosToken::Empty
        } else {
            // Positions are unsigned; truncation drops any fractional part
            // and the sign, matching the digit-only reading of text input.
            PosToken::Residue(value.trunc().abs() as u32)
        }
    }

    fn from_text(text: &str) -> PosToken {
        if text == "null" {
            return PosToken::Missing;
        }
        if let Ok(value) = text.trim().parse::<f64>() {
            if value.is_finite() {
                return PosToken::Residue(value.trunc().abs() as u32);
            }
        }
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.parse::<u32>() {
            Ok(value) => PosToken::Residue(value),
            Err(_) => PosToken::Empty,
        }
    }

    /// Whether this token marks a residue absent from its numbering system.
    pub fn is_missing(&self) -> bool {
        matches!(self, PosToken::Missing)
    }

    /// The concrete residue index, if there is one.
    pub fn residue(&self) -> Option<u32> {
        match self {
            PosToken::Residue(pos) => Some(*pos),
            _ => None,
        }
    }
}

impl From<u32> for PosToken {
    fn from(pos: u32) -> Self {
        PosToken::Residue(pos)
    }
}

impl Display for PosToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PosToken::Residue(pos) => write!(f, "{}", pos),
            PosToken::Missing => write!(f, "null"),
            PosToken::Empty => Ok(()),
        }
    }
}

///
/// A raw residue-position value as it appears in an upstream mapping or
/// annotation table: numeric, stringly numeric, or an explicit missing
/// marker. Input type of the token normalizer.
///
#[derive(Debug, Clone, PartialEq)]
pub enum RawPos {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl From<i64> for RawPos {
    fn from(value: i64) -> Self {
        RawPos::Int(value)
    }
}

impl From<u32> for RawPos {
    fn from(value: u32) -> Self {
        RawPos::Int(value as i64)
    }
}

impl From<f64> for RawPos {
    fn from(value: f64) -> Self {
        RawPos::Float(value)
    }
}

impl From<&str> for RawPos {
    fn from(value: &str) -> Self {
        RawPos::Text(value.to_string())
    }
}

impl From<String> for RawPos {
    fn from(value: String) -> Self {
        RawPos::Text(value)
    }
}
