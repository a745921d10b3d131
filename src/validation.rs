use axum::{extract::rejection::JsonRejection, Json};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};
use uuid::Uuid;

use crate::error::{AppError, FieldErrors};

/// Largest magnitude accepted for an epoch-millisecond date (±100,000,000 days).
const MAX_EPOCH_MS: i64 = 8_640_000_000_000_000;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Parses a path segment as a UUID.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::invalid("id", "expected a UUID"))
}

/// Reads typed fields out of a JSON object body, collecting every problem
/// before failing so the client sees all field errors at once.
pub struct Fields {
    obj: Map<String, Value>,
    issues: FieldErrors,
}

impl Fields {
    pub fn from_body(body: Result<Json<Value>, JsonRejection>) -> Result<Self, AppError> {
        let Json(value) = body.map_err(|e| AppError::invalid("body", e.body_text()))?;
        match value {
            Value::Object(obj) => Ok(Self {
                obj,
                issues: FieldErrors::new(),
            }),
            _ => Err(AppError::invalid("body", "expected a JSON object")),
        }
    }

    fn reject(&mut self, key: &'static str, message: &str) {
        self.issues.entry(key).or_insert_with(|| message.to_string());
    }

    pub fn string(&mut self, key: &'static str) -> String {
        match self.obj.remove(key) {
            Some(Value::String(s)) => s,
            Some(_) => {
                self.reject(key, "expected a string");
                String::new()
            }
            None => {
                self.reject(key, "required");
                String::new()
            }
        }
    }

    pub fn non_empty_string(&mut self, key: &'static str) -> String {
        let s = self.string(key);
        if s.is_empty() && !self.issues.contains_key(key) {
            self.reject(key, "must not be empty");
        }
        s
    }

    /// Trimmed, lower-cased email address.
    pub fn email(&mut self, key: &'static str) -> String {
        let email = self.string(key).trim().to_lowercase();
        if !self.issues.contains_key(key) && !is_valid_email(&email) {
            self.reject(key, "invalid email");
        }
        email
    }

    pub fn boolean(&mut self, key: &'static str) -> bool {
        match self.obj.remove(key) {
            Some(Value::Bool(b)) => b,
            Some(_) => {
                self.reject(key, "expected a boolean");
                false
            }
            None => {
                self.reject(key, "required");
                false
            }
        }
    }

    /// Coerces a value to epoch milliseconds: numbers are taken as epoch ms,
    /// `null` as 0, booleans as 0 or 1, strings as ISO 8601 dates or date-times
    /// (UTC when no offset is given).
    pub fn timestamp_ms(&mut self, key: &'static str) -> i64 {
        let coerced = match self.obj.remove(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            Some(Value::String(s)) => parse_date_str(s.trim()),
            Some(Value::Null) => Some(0),
            Some(Value::Bool(b)) => Some(i64::from(b)),
            Some(Value::Array(_) | Value::Object(_)) => None,
            None => {
                self.reject(key, "required");
                return 0;
            }
        };
        match coerced.filter(|ms| ms.abs() <= MAX_EPOCH_MS) {
            Some(ms) => ms,
            None => {
                self.reject(key, "invalid date");
                0
            }
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidInput(self.issues))
        }
    }
}

fn parse_date_str(s: &str) -> Option<i64> {
    let local = format_description!(
        "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
    );
    let dt = OffsetDateTime::parse(s, &Rfc3339)
        .ok()
        .or_else(|| PrimitiveDateTime::parse(s, local).ok().map(|dt| dt.assume_utc()))
        .or_else(|| {
            Date::parse(s, format_description!("[year]-[month]-[day]"))
                .ok()
                .map(|d| d.midnight().assume_utc())
        })?;
    i64::try_from(dt.unix_timestamp_nanos() / 1_000_000).ok()
}
