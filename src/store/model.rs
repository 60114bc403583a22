// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Access-code record and partial-update types
//!
//! The serialized shape is the deployed on-wire format shared by every
//! backend: `id`, `name`, `code`, `expiryDate`, `createdAt`, with timestamps
//! as millisecond-precision RFC 3339 UTC strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::codegen::generate_code;
use crate::error::{AccessError, Result};

/// A short-lived authorization code granting use of the chat feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCode {
    /// Unique, immutable record id
    pub id: String,
    /// Display name of the code holder
    #[serde(alias = "displayName")]
    pub name: String,
    /// The code itself (8 symbols, uppercase)
    pub code: String,
    /// None means the code never expires
    #[serde(alias = "expiry", default, with = "timestamp::option")]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Creation time, immutable
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl AccessCode {
    /// Create a new record with a fresh id, code and creation time.
    ///
    /// The name is trimmed and must not be empty. Timestamps are truncated
    /// to milliseconds.
    pub fn new(name: &str, expiry_date: Option<DateTime<Utc>>) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: normalize_name(name)?,
            code: generate_code(),
            expiry_date: expiry_date.map(truncate_millis),
            created_at: truncate_millis(Utc::now()),
        })
    }

    /// Whether the code has expired as of `now`.
    ///
    /// Expiry is strict: a code whose expiry equals `now` is still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry < now)
    }
}

/// Fields an update may change. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessCodeUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the expiry
    pub expiry_date: Option<Option<DateTime<Utc>>>,
}

impl AccessCodeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn expiry_date(mut self, expiry: Option<DateTime<Utc>>) -> Self {
        self.expiry_date = Some(expiry);
        self
    }

    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.expiry_date.is_none()
    }

    /// Check and normalize the supplied fields.
    pub(crate) fn normalized(self) -> Result<Self> {
        let name = self.name.as_deref().map(normalize_name).transpose()?;
        Ok(Self {
            name,
            expiry_date: self.expiry_date.map(|expiry| expiry.map(truncate_millis)),
        })
    }

    /// Merge the supplied fields into `record`. `id`, `code` and `created_at`
    /// are never touched.
    pub(crate) fn apply(self, record: &mut AccessCode) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(expiry) = self.expiry_date {
            record.expiry_date = expiry;
        }
    }
}

pub(crate) fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AccessError::InvalidInput("name is required".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Drop sub-millisecond precision so a record survives the wire format unchanged.
pub(crate) fn truncate_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

/// Parse a timestamp as accepted on the wire and on the command line:
/// RFC 3339, or a bare `YYYY-MM-DD` date read as UTC midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    timestamp::parse(raw)
}

pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            ts: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => serializer.serialize_some(&format(ts)),
                None => serializer.serialize_none(),
            }
        }

        // An empty string is stored by older writers for "no expiry".
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::codegen::is_well_formed;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_new_trims_name_and_generates_fields() {
        let record = AccessCode::new("  Kevin  ", None).unwrap();
        assert_eq!(record.name, "Kevin");
        assert!(is_well_formed(&record.code));
        assert!(!record.id.is_empty());
        assert!(record.expiry_date.is_none());
    }

    #[test]
    fn test_new_rejects_blank_name() {
        let err = AccessCode::new("   ", None).unwrap_err();
        assert!(matches!(err, AccessError::InvalidInput(_)));
    }

    #[test]
    fn test_new_ids_differ() {
        let a = AccessCode::new("a", None).unwrap();
        let b = AccessCode::new("b", None).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_expiry_is_strict() {
        let expiry = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let record = AccessCode::new("x", Some(expiry)).unwrap();

        assert!(!record.is_expired_at(expiry));
        assert!(!record.is_expired_at(expiry - Duration::milliseconds(1)));
        assert!(record.is_expired_at(expiry + Duration::milliseconds(1)));
    }

    #[test]
    fn test_no_expiry_never_expires() {
        let record = AccessCode::new("x", None).unwrap();
        let far_future = Utc::now() + Duration::days(365 * 100);
        assert!(!record.is_expired_at(far_future));
    }

    #[test]
    fn test_serialized_field_names() {
        let record = AccessCode {
            id: "abc".to_string(),
            name: "Kevin".to_string(),
            code: "AB3XQ9ZK".to_string(),
            expiry_date: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "Kevin");
        assert_eq!(value["code"], "AB3XQ9ZK");
        assert!(value["expiryDate"].is_null());
        assert_eq!(value["createdAt"], "2025-01-02T03:04:05.000Z");
    }

    #[test]
    fn test_deserialize_deployed_format() {
        let json = r#"{
            "id": "lq2x8k1n3",
            "name": "Kevin",
            "code": "AB3XQ9ZK",
            "expiryDate": "2025-12-31T23:59:59.000Z",
            "createdAt": "2025-01-01T10:00:00.123Z"
        }"#;

        let record: AccessCode = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.expiry_date,
            Some(Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap())
        );
        assert_eq!(record.created_at.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_deserialize_aliases_and_date_only_expiry() {
        let json = r#"{
            "id": "1",
            "displayName": "Ana",
            "code": "AB3XQ9ZK",
            "expiry": "2026-03-01",
            "createdAt": "2025-01-01T00:00:00Z"
        }"#;

        let record: AccessCode = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Ana");
        assert_eq!(
            record.expiry_date,
            Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_deserialize_missing_or_empty_expiry() {
        let missing = r#"{"id":"1","name":"a","code":"AB3XQ9ZK","createdAt":"2025-01-01T00:00:00Z"}"#;
        let empty = r#"{"id":"1","name":"a","code":"AB3XQ9ZK","expiryDate":"","createdAt":"2025-01-01T00:00:00Z"}"#;

        assert!(serde_json::from_str::<AccessCode>(missing)
            .unwrap()
            .expiry_date
            .is_none());
        assert!(serde_json::from_str::<AccessCode>(empty)
            .unwrap()
            .expiry_date
            .is_none());
    }

    #[test]
    fn test_deserialize_bad_timestamp_fails() {
        let json = r#"{"id":"1","name":"a","code":"AB3XQ9ZK","expiryDate":"soon","createdAt":"2025-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<AccessCode>(json).is_err());
    }

    #[test]
    fn test_wire_roundtrip_preserves_new_record() {
        let record = AccessCode::new("Kevin", Some(Utc::now())).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: AccessCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_update_apply_merges_only_supplied_fields() {
        let mut record = AccessCode::new("Old", None).unwrap();
        let original = record.clone();
        let expiry = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();

        AccessCodeUpdate::new()
            .expiry_date(Some(expiry))
            .apply(&mut record);

        assert_eq!(record.name, "Old");
        assert_eq!(record.expiry_date, Some(expiry));
        assert_eq!(record.id, original.id);
        assert_eq!(record.code, original.code);
        assert_eq!(record.created_at, original.created_at);
    }

    #[test]
    fn test_update_normalized_truncates_expiry_to_millis() {
        let expiry = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
            + Duration::nanoseconds(1_234_567);

        let update = AccessCodeUpdate::new()
            .expiry_date(Some(expiry))
            .normalized()
            .unwrap();

        assert_eq!(
            update.expiry_date,
            Some(Some(
                Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
                    + Duration::milliseconds(1)
            ))
        );
    }

    #[test]
    fn test_update_can_clear_expiry() {
        let expiry = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let mut record = AccessCode::new("x", Some(expiry)).unwrap();

        AccessCodeUpdate::new().expiry_date(None).apply(&mut record);
        assert!(record.expiry_date.is_none());
    }

    #[test]
    fn test_update_normalized_trims_and_rejects_blank() {
        let update = AccessCodeUpdate::new().name("  New  ").normalized().unwrap();
        assert_eq!(update.name.as_deref(), Some("New"));

        assert!(AccessCodeUpdate::new().name(" ").normalized().is_err());
        assert!(AccessCodeUpdate::new().is_empty());
    }

    #[test]
    fn test_parse_timestamp_forms() {
        assert!(parse_timestamp("2025-01-01T00:00:00+02:00").is_some());
        assert!(parse_timestamp("2025-01-01").is_some());
        assert!(parse_timestamp("01/01/2025").is_none());
    }
}
