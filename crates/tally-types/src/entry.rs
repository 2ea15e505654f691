use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::operator::{Operands, Operator};

/// Identifier of a log entry, unique for the lifetime of the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` at `u64::MAX`.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EntryId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Immutable record of one successful calculation.
///
/// The serialized form is the persisted layout:
/// `{id, time, a, b, op, symbol, result}`. `op` is the operator token as it
/// was dispatched; it is kept as text so that replaying an entry goes through
/// the same token lookup as a fresh request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    id: EntryId,
    time: String,
    a: f64,
    b: f64,
    op: String,
    symbol: String,
    #[serde(with = "json_number")]
    result: f64,
}

impl LogEntry {
    /// Build the record for a calculation that just succeeded.
    pub fn new(
        id: EntryId,
        at: DateTime<Utc>,
        operands: Operands,
        operator: Operator,
        result: f64,
    ) -> Self {
        Self {
            id,
            time: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            a: operands.a,
            b: operands.b,
            op: operator.token().to_string(),
            symbol: operator.symbol().to_string(),
            result,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Creation time, RFC 3339.
    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn operands(&self) -> Operands {
        Operands::new(self.a, self.b)
    }

    pub fn token(&self) -> &str {
        &self.op
    }

    /// The operator named by the stored token, if it is a known one.
    pub fn operator(&self) -> Option<Operator> {
        Operator::from_token(&self.op)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn result(&self) -> f64 {
        self.result
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            self.a, self.symbol, self.b, self.result
        )
    }
}

/// JSON has no literal for infinities or NaN; an overflowing result is
/// written as the string `"Infinity"`, `"-Infinity"` or `"NaN"` instead.
mod json_number {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const POS_INF: &str = "Infinity";
    const NEG_INF: &str = "-Infinity";
    const NAN: &str = "NaN";

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str(NAN)
        } else if value.is_sign_positive() {
            serializer.serialize_str(POS_INF)
        } else {
            serializer.serialize_str(NEG_INF)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(text) => match text.as_str() {
                POS_INF => Ok(f64::INFINITY),
                NEG_INF => Ok(f64::NEG_INFINITY),
                NAN => Ok(f64::NAN),
                other => Err(D::Error::custom(format!("invalid number {other:?}"))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn new_records_token_and_symbol() {
        let entry = LogEntry::new(
            EntryId::new(7),
            at(),
            Operands::new(6.0, 3.0),
            Operator::Multiply,
            18.0,
        );
        assert_eq!(entry.id(), EntryId::new(7));
        assert_eq!(entry.token(), "3");
        assert_eq!(entry.symbol(), "×");
        assert_eq!(entry.operator(), Some(Operator::Multiply));
        assert_eq!(entry.time(), "2024-05-01T12:30:00.000Z");
        assert_eq!(entry.to_string(), "6 × 3 = 18");
    }

    #[test]
    fn serialized_layout() {
        let entry = LogEntry::new(
            EntryId::new(1),
            at(),
            Operands::new(2.0, 3.0),
            Operator::Add,
            5.0,
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["a"], 2.0);
        assert_eq!(value["op"], "1");
        assert_eq!(value["symbol"], "+");
        assert_eq!(value["result"], 5.0);
        assert!(value["time"].is_string());
    }

    #[test]
    fn infinite_result_survives_json() {
        let entry = LogEntry::new(
            EntryId::new(2),
            at(),
            Operands::new(f64::MAX, 0.5),
            Operator::Divide,
            f64::INFINITY,
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"Infinity\""));
        let parsed: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.result(), f64::INFINITY);
    }

    #[test]
    fn integer_numbers_accepted() {
        let json = r#"{"id":3,"time":"t","a":1,"b":2,"op":"2","symbol":"-","result":-1}"#;
        let parsed: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.result(), -1.0);
        assert_eq!(parsed.operands(), Operands::new(1.0, 2.0));
    }

    #[test]
    fn missing_field_rejected() {
        let json = r#"{"id":3,"time":"t","a":1,"b":2,"op":"2","symbol":"-"}"#;
        assert!(serde_json::from_str::<LogEntry>(json).is_err());
    }

    #[test]
    fn unknown_number_text_rejected() {
        let json = r#"{"id":3,"time":"t","a":1,"b":2,"op":"2","symbol":"-","result":"lots"}"#;
        assert!(serde_json::from_str::<LogEntry>(json).is_err());
    }

    #[test]
    fn entry_id_next() {
        assert_eq!(EntryId::new(41).next(), Some(EntryId::new(42)));
        assert_eq!(EntryId::new(u64::MAX).next(), None);
        assert_eq!(EntryId::from(5).to_string(), "#5");
    }
}
