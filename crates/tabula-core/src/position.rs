//! Grid coordinates

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Longest column name that can address [`MAX_COLS`] ("XFD")
const MAX_COLUMN_LETTERS: usize = 3;

/// A cell position (zero-based row and column)
///
/// Positions are plain values: constructing one never fails, and an
/// out-of-range position (such as [`Position::NONE`]) is simply not
/// [valid](Position::is_valid). Ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Row index (0-based internally, 1-based in display)
    pub row: i32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: i32,
}

impl Position {
    /// Sentinel for a reference that does not point into the grid
    pub const NONE: Position = Position { row: -1, col: -1 };

    /// Create a new position
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Whether the position lies inside the addressable grid
    pub fn is_valid(&self) -> bool {
        (0..MAX_ROWS).contains(&self.row) && (0..MAX_COLS).contains(&self.col)
    }

    /// Parse A1 notation, returning [`Position::NONE`] for anything malformed
    /// or out of range
    ///
    /// # Examples
    /// ```
    /// use tabula_core::Position;
    ///
    /// assert_eq!(Position::from_a1("A1"), Position::new(0, 0));
    /// assert_eq!(Position::from_a1("AB12"), Position::new(11, 27));
    /// assert_eq!(Position::from_a1("A0"), Position::NONE);
    /// assert_eq!(Position::from_a1("XFE1"), Position::NONE);
    /// ```
    pub fn from_a1(s: &str) -> Self {
        let letters_end = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(letters_end);

        if letters.is_empty() || letters.len() > MAX_COLUMN_LETTERS {
            return Self::NONE;
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Self::NONE;
        }

        let col = match Self::letters_to_column(letters) {
            Some(col) => col,
            None => return Self::NONE,
        };
        let row = match digits.parse::<i32>() {
            Ok(row) if row >= 1 => row - 1,
            _ => return Self::NONE,
        };

        let pos = Self::new(row, col);
        if pos.is_valid() {
            pos
        } else {
            Self::NONE
        }
    }

    /// Parse A1 notation, reporting malformed addresses as an error
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let pos = Self::from_a1(s);
        if pos.is_valid() {
            Ok(pos)
        } else {
            Err(Error::InvalidAddress(s.to_string()))
        }
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: i32) -> String {
        let mut result = String::new();
        let mut n = col as i64 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    ///
    /// Letters are case-insensitive. Returns `None` for empty input,
    /// non-letters, or a column beyond [`MAX_COLS`].
    pub fn letters_to_column(letters: &str) -> Option<i32> {
        if letters.is_empty() || letters.len() > MAX_COLUMN_LETTERS {
            return None;
        }

        let mut col: i32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return None;
            }
            col = col * 26 + (c.to_ascii_uppercase() as i32 - 'A' as i32 + 1);
        }

        let col = col - 1; // Convert to 0-based
        (col < MAX_COLS).then_some(col)
    }

    /// Format as A1-style string, or `#REF!` for an invalid position
    pub fn to_a1_string(&self) -> String {
        if !self.is_valid() {
            return crate::FormulaError::Ref.as_str().to_string();
        }
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Dimensions of the printable area of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Size {
    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }

    /// Whether `pos` falls inside a rectangle of this size anchored at A1
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.col >= 0 && pos.row < self.rows && pos.col < self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(Position::column_to_letters(0), "A");
        assert_eq!(Position::column_to_letters(25), "Z");
        assert_eq!(Position::column_to_letters(26), "AA");
        assert_eq!(Position::column_to_letters(701), "ZZ");
        assert_eq!(Position::column_to_letters(702), "AAA");
        assert_eq!(Position::column_to_letters(16383), "XFD"); // Last column
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(Position::letters_to_column("A"), Some(0));
        assert_eq!(Position::letters_to_column("Z"), Some(25));
        assert_eq!(Position::letters_to_column("AA"), Some(26));
        assert_eq!(Position::letters_to_column("XFD"), Some(16383));
        assert_eq!(Position::letters_to_column("aa"), Some(26));

        assert_eq!(Position::letters_to_column(""), None);
        assert_eq!(Position::letters_to_column("XFE"), None);
        assert_eq!(Position::letters_to_column("AAAA"), None);
        assert_eq!(Position::letters_to_column("A1"), None);
    }

    #[test]
    fn test_from_a1() {
        assert_eq!(Position::from_a1("A1"), Position::new(0, 0));
        assert_eq!(Position::from_a1("B2"), Position::new(1, 1));
        assert_eq!(Position::from_a1("XFD16384"), Position::new(16383, 16383));

        assert_eq!(Position::from_a1(""), Position::NONE);
        assert_eq!(Position::from_a1("A"), Position::NONE);
        assert_eq!(Position::from_a1("1"), Position::NONE);
        assert_eq!(Position::from_a1("A0"), Position::NONE);
        assert_eq!(Position::from_a1("A16385"), Position::NONE);
        assert_eq!(Position::from_a1("A1B"), Position::NONE);
        assert_eq!(Position::from_a1("A99999999999"), Position::NONE);
    }

    #[test]
    fn test_parse_errors() {
        assert!("A1".parse::<Position>().is_ok());
        assert!(" C7 ".parse::<Position>().is_ok());
        assert!(matches!(
            "A0".parse::<Position>(),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_validity() {
        assert!(Position::new(0, 0).is_valid());
        assert!(Position::new(MAX_ROWS - 1, MAX_COLS - 1).is_valid());
        assert!(!Position::new(MAX_ROWS, 0).is_valid());
        assert!(!Position::new(0, -1).is_valid());
        assert!(!Position::NONE.is_valid());
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(0, 0).to_string(), "A1");
        assert_eq!(Position::new(99, 2).to_string(), "C100");
        assert_eq!(Position::NONE.to_string(), "#REF!");
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut positions = vec![
            Position::new(1, 0),
            Position::new(0, 5),
            Position::new(0, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(0, 5), Position::new(1, 0)]
        );
    }

    #[test]
    fn test_size_contains() {
        let size = Size::new(2, 3);
        assert!(size.contains(Position::new(1, 2)));
        assert!(!size.contains(Position::new(2, 0)));
        assert!(!size.contains(Position::new(0, 3)));
        assert!(Size::default().is_empty());
    }
}
