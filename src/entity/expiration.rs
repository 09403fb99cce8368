//! Expiration time calculation.
//!
//! Entities carry an absolute expiration instant. Callers describe retention
//! relative to "now"; the instant is fixed when [`ExpiresIn::resolve`] runs,
//! not when the write reaches the network.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::types::{EntityError, EntityResult};

/// Unit of a relative retention period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl TimeUnit {
    pub fn seconds(self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3_600.0,
            TimeUnit::Days => 86_400.0,
            TimeUnit::Weeks => 604_800.0,
        }
    }
}

/// Relative retention period, e.g. "30 days".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpiresIn {
    pub amount: f64,
    pub unit: TimeUnit,
}

impl ExpiresIn {
    /// Create a validated retention period.
    pub fn new(amount: f64, unit: TimeUnit) -> EntityResult<Self> {
        let expires_in = Self { amount, unit };
        expires_in.delta()?;
        Ok(expires_in)
    }

    pub fn days(amount: f64) -> EntityResult<Self> {
        Self::new(amount, TimeUnit::Days)
    }

    pub fn hours(amount: f64) -> EntityResult<Self> {
        Self::new(amount, TimeUnit::Hours)
    }

    /// Absolute expiration instant, reading the clock once.
    pub fn resolve(&self) -> EntityResult<DateTime<Utc>> {
        self.resolve_at(Utc::now())
    }

    /// Absolute expiration instant relative to a given `now`.
    pub fn resolve_at(&self, now: DateTime<Utc>) -> EntityResult<DateTime<Utc>> {
        let delta = self.delta()?;
        now.checked_add_signed(delta).ok_or_else(|| {
            EntityError::InvalidDuration(format!(
                "{} {:?} from {} is past the representable range",
                self.amount, self.unit, now
            ))
        })
    }

    fn delta(&self) -> EntityResult<TimeDelta> {
        if !self.amount.is_finite() {
            return Err(EntityError::InvalidDuration(format!(
                "amount must be finite, got {}",
                self.amount
            )));
        }
        if self.amount <= 0.0 {
            return Err(EntityError::InvalidDuration(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }

        // Microsecond resolution; i64 micros covers roughly 292,000 years.
        let micros = (self.amount * self.unit.seconds() * 1_000_000.0).ceil();
        if micros >= i64::MAX as f64 {
            return Err(EntityError::InvalidDuration(format!(
                "{} {:?} is too long",
                self.amount, self.unit
            )));
        }

        Ok(TimeDelta::microseconds(micros as i64))
    }
}

/// Round an instant up to the next whole millisecond, the resolution stored on the ledger.
pub fn ceil_to_millis(instant: DateTime<Utc>) -> EntityResult<DateTime<Utc>> {
    let sub_milli = instant.timestamp_subsec_nanos() % 1_000_000;
    if sub_milli == 0 {
        return Ok(instant);
    }
    instant
        .checked_add_signed(TimeDelta::nanoseconds(i64::from(1_000_000 - sub_milli)))
        .ok_or_else(|| {
            EntityError::InvalidDuration(format!(
                "{} cannot be rounded to milliseconds within the representable range",
                instant
            ))
        })
}

/// Compute `now + amount * unit`.
pub fn from_duration(amount: f64, unit: TimeUnit) -> EntityResult<DateTime<Utc>> {
    ExpiresIn { amount, unit }.resolve()
}
