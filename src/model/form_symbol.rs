use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one fixture from the point of view of a single team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormSymbol {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "U")]
    Unknown,
}

impl FormSymbol {
    /// Single-letter code drawn inside form cells and used in text summaries.
    pub fn letter(self) -> char {
        match self {
            FormSymbol::Win => 'W',
            FormSymbol::Loss => 'L',
            FormSymbol::Draw => 'D',
            FormSymbol::Unknown => 'U',
        }
    }

    /// Fill colour of the form cell.
    pub fn colour(self) -> [u8; 4] {
        match self {
            FormSymbol::Win => [85, 172, 238, 255],
            FormSymbol::Draw => [253, 203, 88, 255],
            FormSymbol::Loss => [221, 46, 68, 255],
            FormSymbol::Unknown => [49, 55, 61, 255],
        }
    }
}

impl fmt::Display for FormSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Concatenate a form sequence into its letter string, e.g. `WWDLU`.
pub fn form_string(form: &[FormSymbol]) -> String {
    form.iter().map(|s| s.letter()).collect()
}
