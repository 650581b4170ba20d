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

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::Fallible;
use crate::types::date::Date;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// An instant in time, in UTC.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(ts: DateTime<Utc>) -> Self {
        Self(ts)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn parse(s: &str) -> Fallible<Self> {
        let ts = DateTime::parse_from_rfc3339(s)?;
        Ok(Self(ts.with_timezone(&Utc)))
    }

    /// The calendar day this instant falls on. This is the "truncate to
    /// midnight" operation used for all due-date comparisons.
    pub fn date(self) -> Date {
        Date::new(self.0.date_naive())
    }

    pub fn plus_days(self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    pub fn plus_seconds(self, seconds: i64) -> Self {
        Self(self.0 + Duration::seconds(seconds))
    }

    /// Whole seconds elapsed from `earlier` to `self`. Negative if `earlier`
    /// is in the future.
    pub fn seconds_since(self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0).num_seconds()
    }

    /// Fractional days elapsed from `earlier` to `self`.
    pub fn days_since(self, earlier: Timestamp) -> f64 {
        let millis = (self.0 - earlier.0).num_milliseconds() as f64;
        millis / 1000.0 / SECONDS_PER_DAY
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let str = self.0.to_rfc3339();
        Ok(ToSqlOutput::from(str))
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        Timestamp::parse(&string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_truncates_to_midnight() -> Fallible<()> {
        let ts = Timestamp::parse("2025-03-10T23:59:59Z")?;
        assert_eq!(ts.date(), Date::parse("2025-03-10")?);
        let ts = ts.plus_seconds(1);
        assert_eq!(ts.date(), Date::parse("2025-03-11")?);
        Ok(())
    }

    #[test]
    fn test_days_since() -> Fallible<()> {
        let a = Timestamp::parse("2025-03-10T00:00:00Z")?;
        let b = Timestamp::parse("2025-03-11T12:00:00Z")?;
        assert_eq!(b.days_since(a), 1.5);
        assert_eq!(a.days_since(b), -1.5);
        assert_eq!(b.seconds_since(a), 129_600);
        Ok(())
    }

    #[test]
    fn test_round_trip_string() -> Fallible<()> {
        let ts = Timestamp::parse("2025-03-10T08:30:00+00:00")?;
        assert_eq!(Timestamp::parse(&ts.to_string())?, ts);
        Ok(())
    }
}
