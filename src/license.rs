use std::{fmt, str::FromStr};

use chrono::{Months, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Characters used in license keys. Ambiguous glyphs (0/O, 1/I/L) are
/// left out so keys survive being read over the phone.
const KEY_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const KEY_GROUPS: usize = 4;
const KEY_GROUP_LEN: usize = 4;

/// Generates a license key in the form `XXXX-XXXX-XXXX-XXXX`.
///
/// Keys are random, not sequential; callers must check the generated
/// key against the current collection and regenerate on collision.
pub fn generate_key() -> String {
    let mut rng = rand::thread_rng();
    (0..KEY_GROUPS)
        .map(|_| {
            (0..KEY_GROUP_LEN)
                .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Adds `months` calendar months to `date`, clamping the day of month
/// to the target month's range (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(NaiveDate::MAX)
}

/// Error returned when operator input is not a valid CPF or CNPJ.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("CPF/CNPJ must have 11 or 14 digits, got {0}")]
pub struct InvalidCpfCnpj(pub usize);

/// A customer tax id (CPF or CNPJ), stored as bare digits.
///
/// This is the lookup key for renew/cancel/status. Comparisons ignore
/// punctuation: `111.111.111-11` and `11111111111` are the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CpfCnpj(String);

impl CpfCnpj {
    /// Strips everything but digits, without validating the length.
    /// Used when decoding records that may have been edited by hand.
    pub fn normalized(raw: &str) -> Self {
        Self(raw.chars().filter(char::is_ascii_digit).collect())
    }

    /// The bare digit string.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// A masked form for lists, e.g. `...1111`.
    pub fn masked(&self) -> String {
        if self.0.len() > 4 { format!("...{}", &self.0[self.0.len() - 4..]) } else { self.0.clone() }
    }
}

impl FromStr for CpfCnpj {
    type Err = InvalidCpfCnpj;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = Self::normalized(s);
        match normalized.0.len() {
            11 | 14 => Ok(normalized),
            len => Err(InvalidCpfCnpj(len)),
        }
    }
}

impl fmt::Display for CpfCnpj {
    /// Formats with the standard punctuation: `xxx.xxx.xxx-xx` for a
    /// CPF, `xx.xxx.xxx/xxxx-xx` for a CNPJ, bare digits otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.0;
        match d.len() {
            11 => write!(f, "{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]),
            14 => write!(f, "{}.{}.{}/{}-{}", &d[..2], &d[2..5], &d[5..8], &d[8..12], &d[12..]),
            _ => f.write_str(d),
        }
    }
}

impl Serialize for CpfCnpj {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CpfCnpj {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::normalized(&raw))
    }
}

/// Lifecycle state of a license as stored in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    /// Issued and not cancelled.
    Active,
    /// Cancelled by the operator.
    Cancelled,
    /// Past its expiry date.
    Expired,
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LicenseStatus::Active => "active",
            LicenseStatus::Cancelled => "cancelled",
            LicenseStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// One issued license, as persisted in the remote document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// The license key handed to the customer.
    pub key: String,
    /// The customer tax id the license is registered to.
    pub cpf_cnpj: CpfCnpj,
    /// Stored lifecycle state. Only renew/cancel rewrite it; an active
    /// record past its expiry is displayed as expired without a write.
    pub status: LicenseStatus,
    /// Expiry date (inclusive of the last valid day).
    pub expires_at: NaiveDate,
    /// Activation date. Set once, never modified.
    pub created_at: NaiveDate,
    /// Billing plan label, informational only.
    pub plan: String,
}

impl License {
    /// Whether the license has run out as of `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_at < today
    }

    /// The state to display, deriving `Expired` from the date for
    /// records still stored as active.
    pub fn effective_status(&self, today: NaiveDate) -> LicenseStatus {
        match self.status {
            LicenseStatus::Active if self.is_expired(today) => LicenseStatus::Expired,
            status => status,
        }
    }
}
