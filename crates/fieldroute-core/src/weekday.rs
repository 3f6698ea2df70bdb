use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A working day on which a store visit can be planned.
///
/// Declaration order is the presentation order, so the derived `Ord` sorts
/// Monday first. Sunday is not a visit day.
///
/// Serialized as the uppercase English name; deserialized with the same
/// rules as [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Storage number: Monday = 1 through Saturday = 6.
    #[must_use]
    pub fn number(self) -> i16 {
        match self {
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
        }
    }

    /// Inverse of [`Weekday::number`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWeekday`] for anything outside `1..=6`.
    pub fn from_number(n: i16) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Weekday::Monday),
            2 => Ok(Weekday::Tuesday),
            3 => Ok(Weekday::Wednesday),
            4 => Ok(Weekday::Thursday),
            5 => Ok(Weekday::Friday),
            6 => Ok(Weekday::Saturday),
            other => Err(CoreError::InvalidWeekday {
                value: other.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "MONDAY",
            Weekday::Tuesday => "TUESDAY",
            Weekday::Wednesday => "WEDNESDAY",
            Weekday::Thursday => "THURSDAY",
            Weekday::Friday => "FRIDAY",
            Weekday::Saturday => "SATURDAY",
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = CoreError;

    /// Accepts English names, three-letter abbreviations, and Spanish names,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MONDAY" | "MON" | "LUNES" => Ok(Weekday::Monday),
            "TUESDAY" | "TUE" | "MARTES" => Ok(Weekday::Tuesday),
            "WEDNESDAY" | "WED" | "MIERCOLES" | "MIÉRCOLES" => Ok(Weekday::Wednesday),
            "THURSDAY" | "THU" | "JUEVES" => Ok(Weekday::Thursday),
            "FRIDAY" | "FRI" | "VIERNES" => Ok(Weekday::Friday),
            "SATURDAY" | "SAT" | "SABADO" | "SÁBADO" => Ok(Weekday::Saturday),
            _ => Err(CoreError::InvalidWeekday {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Weekday {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
