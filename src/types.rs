use std::backtrace::Backtrace;
use std::backtrace::BacktraceStatus;
use std::error::Error as StdError;
use std::fmt::Write;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;
use garde::Validate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::DbErr;
use sea_orm::DeriveValueType;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

pub type Result<T, E = FulfillmentError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum FulfillmentError {
    /// The request can't be served as-is. Nothing has been changed in the database.
    #[error("{0}")]
    Validation(String),

    /// The selected order was fulfilled by a concurrent request between the lookup and the update.
    #[error("order {0} has been fulfilled by another request")]
    Conflict(i32),

    #[error("an error occurred: {0}")]
    Db(#[from] DbErr),

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to initialize tracing: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),
}

impl FulfillmentError {
    pub fn validation<S: ToString>(msg: S) -> Self {
        Self::Validation(msg.to_string())
    }

    /// True if the error was produced before any mutation could have taken place.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// `msg` followed by the chain of underlying errors and, when enabled by `RUST_BACKTRACE`, a backtrace of the
    /// reporting site.
    pub fn to_string_with_backtrace<S: std::fmt::Display>(&self, msg: S) -> String {
        let mut out = msg.to_string();

        let mut source = StdError::source(self);
        while let Some(err) = source {
            let _ = write!(out, "\n  caused by: {err}");
            source = err.source();
        }

        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            let _ = write!(out, "\n{backtrace}");
        }

        out
    }

    pub fn report_with_backtrace<S: std::fmt::Display>(&self, msg: S) {
        eprintln!("{}", self.to_string_with_backtrace(msg));
    }
}

/// A money amount kept as a whole number of hundredths.
///
/// Prices are stored in that form, so every backend keeps them exact and the arithmetic on them is integer arithmetic.
/// Externally they are [`Decimal`]s with two fractional digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveValueType, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(i64);

impl Price {
    pub const SCALE: u32 = 2;

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, Self::SCALE)
    }

    /// Price of `amount` units. `None` if the result doesn't fit.
    pub fn checked_mul(self, amount: i32) -> Option<Self> {
        self.0.checked_mul(i64::from(amount)).map(Self)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = FulfillmentError;

    fn try_from(value: Decimal) -> Result<Self> {
        value
            .checked_mul(Decimal::ONE_HUNDRED)
            .filter(|cents| cents.fract().is_zero())
            .and_then(|cents| cents.to_i64())
            .map(Self)
            .ok_or_else(|| FulfillmentError::validation(format!("{value} is not a valid price")))
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.to_decimal()
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

/// Body of `POST /AddProductToWarehouse`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct FulfillmentRequest {
    #[garde(skip)]
    pub id_product:         i32,
    #[garde(skip)]
    pub id_warehouse:       i32,
    #[garde(range(min = 1))]
    pub amount:             i32,
    /// Only orders created at or before this moment are eligible.
    #[garde(skip)]
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub request_created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FulfillmentReceipt {
    pub id_product_warehouse: i32,
}

/// Accepts RFC 3339 timestamps as well as offset-less ISO 8601 date-times and plain dates. The latter two are taken
/// as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(ts) => Ok(ts.and_utc()),
        Err(err) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|ts| ts.and_utc())
            .ok_or(err),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(|err| serde::de::Error::custom(format!("invalid timestamp '{raw}': {err}")))
}
