//! Station identifier types.

use std::fmt;

use super::DomainError;

/// Highest code representable in the 5-digit ENEE scheme.
const MAX_ENEE_CODE: u32 = 99_999;

/// Prefix used by the 8-character upstream spelling (`830` + 5 digits).
const LONG_PREFIX: &str = "830";

/// Digits after the `S` or `830` prefix.
const CODE_DIGITS: usize = 5;

/// A valid ENEE station code.
///
/// Upstream spells the same station as `S01700`, `83001700` or plain
/// `1700`. All of these parse to the same canonical code, and the
/// canonical textual form is always `S` followed by five digits. The
/// `S` form must carry exactly five digits; only the bare form may drop
/// leading zeros.
///
/// # Examples
///
/// ```
/// use treni::domain::EneeCode;
///
/// let milano = EneeCode::parse("S01700").unwrap();
/// assert_eq!(milano.value(), 1700);
/// assert_eq!(milano.to_prefixed_id(), "S01700");
///
/// assert_eq!(EneeCode::parse("83001700").unwrap(), milano);
/// assert_eq!(EneeCode::parse("1700").unwrap(), milano);
///
/// assert!(EneeCode::parse("S1A700").is_err());
/// assert!(EneeCode::parse("123456").is_err());
/// assert!(EneeCode::parse("S1700").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EneeCode(u32);

impl EneeCode {
    /// Create a code from its numeric value.
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value > MAX_ENEE_CODE {
            return Err(DomainError::InvalidStationId(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parse any of the upstream spellings of a station id.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidStationId(raw.to_string());
        let trimmed = raw.trim();

        let digits = if let Some(rest) = trimmed.strip_prefix('S') {
            if rest.len() != CODE_DIGITS {
                return Err(invalid());
            }
            rest
        } else if trimmed.len() == 8 && trimmed.starts_with(LONG_PREFIX) {
            &trimmed[LONG_PREFIX.len()..]
        } else {
            trimmed
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let value: u32 = digits.parse().map_err(|_| invalid())?;
        Self::new(value).map_err(|_| invalid())
    }

    /// Returns the numeric code.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the `S`-prefixed, zero-padded form used in upstream paths.
    pub fn to_prefixed_id(&self) -> String {
        format!("S{:05}", self.0)
    }
}

impl fmt::Debug for EneeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EneeCode({})", self.0)
    }
}

impl fmt::Display for EneeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:05}", self.0)
    }
}

/// Resolve a raw upstream station id into its canonical code.
pub fn resolve_enee_code(raw: &str) -> Result<EneeCode, DomainError> {
    EneeCode::parse(raw)
}

/// Format a code as the prefixed id upstream expects.
pub fn format_prefixed_id(code: EneeCode) -> String {
    code.to_prefixed_id()
}

/// A station as it appears in a train's journey.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationRef {
    pub enee_code: EneeCode,
    pub name: String,
}

impl StationRef {
    pub fn new(enee_code: EneeCode, name: impl Into<String>) -> Self {
        Self {
            enee_code,
            name: name.into(),
        }
    }
}

impl fmt::Display for StationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An entry of the national station list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationRecord {
    pub enee_code: EneeCode,
    /// Full name, e.g. `MILANO CENTRALE`.
    pub long_name: String,
    /// Abbreviated name, e.g. `Milano C.le`.
    pub short_name: String,
}

impl StationRecord {
    pub fn station_ref(&self) -> StationRef {
        StationRef::new(self.enee_code, self.long_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_prefixed() {
        assert_eq!(EneeCode::parse("S01700").unwrap().value(), 1700);
        assert_eq!(EneeCode::parse("S00219").unwrap().value(), 219);
        assert_eq!(EneeCode::parse("S99999").unwrap().value(), 99_999);
        assert_eq!(EneeCode::parse("S00000").unwrap().value(), 0);
    }

    #[test]
    fn parse_long_prefix() {
        assert_eq!(EneeCode::parse("83001700").unwrap().value(), 1700);
        assert_eq!(EneeCode::parse("83000219").unwrap().value(), 219);
    }

    #[test]
    fn parse_bare_digits() {
        assert_eq!(EneeCode::parse("1700").unwrap().value(), 1700);
        assert_eq!(EneeCode::parse("01700").unwrap().value(), 1700);
        assert_eq!(EneeCode::parse(" 219 ").unwrap().value(), 219);
    }

    #[test]
    fn reject_non_numeric() {
        assert!(EneeCode::parse("").is_err());
        assert!(EneeCode::parse("S").is_err());
        assert!(EneeCode::parse("S0170A").is_err());
        assert!(EneeCode::parse("MILANO").is_err());
        assert!(EneeCode::parse("-1700").is_err());
    }

    #[test]
    fn prefixed_form_needs_five_digits() {
        assert!(EneeCode::parse("S1").is_err());
        assert!(EneeCode::parse("S017").is_err());
        assert!(EneeCode::parse("S1700").is_err());
        assert!(EneeCode::parse("S001700").is_err());
        assert_eq!(EneeCode::parse("S01700").unwrap().value(), 1700);
    }

    #[test]
    fn reject_out_of_range() {
        assert!(EneeCode::parse("100000").is_err());
        assert!(EneeCode::parse("S100000").is_err());
        assert!(EneeCode::parse("99999999999999999999").is_err());
        assert!(EneeCode::new(100_000).is_err());
    }

    #[test]
    fn error_carries_raw_input() {
        let err = EneeCode::parse("S0170A").unwrap_err();
        assert_eq!(err, DomainError::InvalidStationId("S0170A".into()));
    }

    #[test]
    fn display_and_debug() {
        let code = EneeCode::new(219).unwrap();
        assert_eq!(code.to_string(), "S00219");
        assert_eq!(format!("{:?}", code), "EneeCode(219)");
    }

    #[test]
    fn free_functions_agree_with_methods() {
        let code = resolve_enee_code("S01700").unwrap();
        assert_eq!(format_prefixed_id(code), "S01700");
    }

    #[test]
    fn station_ref_displays_name() {
        let station = StationRef::new(EneeCode::new(1700).unwrap(), "MILANO CENTRALE");
        assert_eq!(station.to_string(), "MILANO CENTRALE");
    }
}
