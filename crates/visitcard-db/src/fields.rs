//! Column encodings shared by every model.
//!
//! sqlite has no native date types: timestamps are stored as RFC 3339 text
//! in UTC and dates as `YYYY-MM-DD` text.

use crate::error::{DbError, DbResult};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use visitcard_db::fields::{decode_datetime, encode_datetime};
///
/// let at = Utc.with_ymd_and_hms(2015, 3, 1, 12, 30, 5).unwrap();
/// let text = encode_datetime(&at);
/// assert_eq!(text, "2015-03-01T12:30:05.000000Z");
/// assert_eq!(decode_datetime("created", &text).unwrap(), at);
/// ```
pub fn encode_datetime(value: &DateTime<Utc>) -> String {
	value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_datetime(column: &'static str, text: &str) -> DbResult<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(text)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::decode(column, e))
}

pub fn encode_date(value: &NaiveDate) -> String {
	value.format(DATE_FORMAT).to_string()
}

pub fn decode_date(column: &'static str, text: &str) -> DbResult<NaiveDate> {
	NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| DbError::decode(column, e))
}

/// Read a timestamp column
pub fn get_datetime(row: &SqliteRow, column: &'static str) -> DbResult<DateTime<Utc>> {
	let text: String = row.try_get(column)?;
	decode_datetime(column, &text)
}

/// Read a nullable timestamp column
pub fn get_optional_datetime(
	row: &SqliteRow,
	column: &'static str,
) -> DbResult<Option<DateTime<Utc>>> {
	let text: Option<String> = row.try_get(column)?;
	text.map(|text| decode_datetime(column, &text)).transpose()
}

/// Read a nullable date column
pub fn get_optional_date(row: &SqliteRow, column: &'static str) -> DbResult<Option<NaiveDate>> {
	let text: Option<String> = row.try_get(column)?;
	text.filter(|text| !text.is_empty())
		.map(|text| decode_date(column, &text))
		.transpose()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("2015-03-01")]
	#[case("1999-12-31")]
	fn test_date_encoding(#[case] text: &str) {
		let date = decode_date("birth_date", text).unwrap();

		assert_eq!(encode_date(&date), text);
	}

	#[rstest]
	fn test_decode_error_names_column() {
		// Act
		let error = decode_datetime("date", "yesterday").unwrap_err();

		// Assert
		assert!(error.to_string().contains("column date"));
	}

	#[rstest]
	fn test_offsets_normalise_to_utc() {
		let decoded = decode_datetime("date", "2015-03-01T14:00:00+02:00").unwrap();

		assert_eq!(encode_datetime(&decoded), "2015-03-01T12:00:00.000000Z");
	}
}
