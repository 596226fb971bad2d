use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Auto-refresh period in whole seconds. Zero disables polling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshInterval(u64);

pub const REFRESH_PRESETS: [RefreshInterval; 9] = [
    RefreshInterval(0),
    RefreshInterval(5),
    RefreshInterval(10),
    RefreshInterval(30),
    RefreshInterval(60),
    RefreshInterval(300),
    RefreshInterval(900),
    RefreshInterval(1800),
    RefreshInterval(3600),
];

/// Longest accepted period: one day.
pub const MAX_REFRESH_SECS: u64 = 86_400;

impl RefreshInterval {
    pub const OFF: RefreshInterval = RefreshInterval(0);

    /// Values above [`MAX_REFRESH_SECS`] are clamped to it.
    pub fn from_secs(secs: u64) -> Self {
        Self(secs.min(MAX_REFRESH_SECS))
    }

    pub fn secs(&self) -> u64 {
        self.0
    }

    pub fn is_enabled(&self) -> bool {
        self.0 > 0
    }

    pub fn period(&self) -> Option<Duration> {
        self.is_enabled().then(|| Duration::from_secs(self.0))
    }

    /// Accepts `off`, bare seconds, or a `s`/`m`/`h` suffixed amount.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let s = input.trim().to_ascii_lowercase();
        if s == "off" {
            return Ok(Self::OFF);
        }
        let invalid = || DomainError::InvalidRefreshInterval(input.to_string());
        let (digits, unit) = match s.char_indices().last() {
            Some((i, 's')) => (&s[..i], 1),
            Some((i, 'm')) => (&s[..i], 60),
            Some((i, 'h')) => (&s[..i], 3600),
            Some(_) => (s.as_str(), 1),
            None => return Err(invalid()),
        };
        let amount: u64 = digits.trim().parse().map_err(|_| invalid())?;
        amount
            .checked_mul(unit)
            .filter(|secs| *secs <= MAX_REFRESH_SECS)
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "Off"),
            s if s % 3600 == 0 => write!(f, "{}h", s / 3600),
            s if s % 60 == 0 => write!(f, "{}m", s / 60),
            s => write!(f, "{s}s"),
        }
    }
}
