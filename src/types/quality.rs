// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::ErrorKind;
use crate::error::Fallible;
use crate::error::invalid;

/// A self-assessed recall rating, from 1 (total failure) to 5 (perfect
/// recall). A value of this type is always in range.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Fallible<Self> {
        if !(Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            return invalid(format!(
                "quality must be an integer between {} and {}, got {value}.",
                Self::MIN,
                Self::MAX
            ));
        }
        Ok(Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// A rating of 3 or above counts as a successful recall.
    pub fn is_success(self) -> bool {
        self.0 >= 3
    }

    pub fn is_perfect(self) -> bool {
        self.0 == Self::MAX
    }
}

impl TryFrom<u8> for Quality {
    type Error = ErrorReport;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quality::new(value as i64)
    }
}

impl FromStr for Quality {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value: i64 = s.parse().map_err(|_| {
            ErrorReport::with_kind(
                ErrorKind::Validation,
                format!("quality must be an integer between 1 and 5, got '{s}'."),
            )
        })?;
        Quality::new(value)
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for Quality {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0 as i64))
    }
}

impl FromSql for Quality {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let value: i64 = FromSql::column_result(value)?;
        Quality::new(value).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() -> Fallible<()> {
        for value in 1..=5 {
            assert_eq!(Quality::new(value)?.value() as i64, value);
        }
        assert!(Quality::new(0).is_err());
        assert!(Quality::new(6).is_err());
        assert!(Quality::new(-3).is_err());
        Ok(())
    }

    #[test]
    fn test_parse_rejects_non_integers() {
        let err = "3.5".parse::<Quality>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!("good".parse::<Quality>().is_err());
        assert!("".parse::<Quality>().is_err());
    }

    #[test]
    fn test_parse() -> Fallible<()> {
        assert_eq!(" 4 ".parse::<Quality>()?, Quality::try_from(4)?);
        Ok(())
    }

    #[test]
    fn test_success_threshold() -> Fallible<()> {
        assert!(!Quality::new(2)?.is_success());
        assert!(Quality::new(3)?.is_success());
        assert!(Quality::new(5)?.is_perfect());
        Ok(())
    }
}
