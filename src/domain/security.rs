//! Exchange-qualified security codes.
//!
//! Bare numeric codes are zero-padded to six digits and suffixed with the
//! exchange they belong to: prefixes 60/68/9 list on Shanghai, everything
//! else on Shenzhen.

use crate::domain::error::HolderscanError;
use std::fmt;

/// A normalized, exchange-qualified security code such as `600519.SH`.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TsCode(String);

impl TsCode {
    /// Normalize a raw code. Accepts a bare numeric code (at most six
    /// digits) or an already-qualified `NNNNNN.SH` / `NNNNNN.SZ` code.
    pub fn new(raw: &str) -> Result<Self, HolderscanError> {
        let raw = raw.trim();
        if let Some((digits, exchange)) = raw.split_once('.') {
            if (exchange == "SH" || exchange == "SZ")
                && digits.len() == 6
                && digits.bytes().all(|b| b.is_ascii_digit())
            {
                return Ok(Self(raw.to_string()));
            }
            return Err(HolderscanError::InvalidCode {
                code: raw.to_string(),
                reason: "expected six digits followed by .SH or .SZ".into(),
            });
        }

        if raw.is_empty() || raw.len() > 6 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HolderscanError::InvalidCode {
                code: raw.to_string(),
                reason: "expected a numeric code of at most six digits".into(),
            });
        }

        // Prefix is judged on the raw input, before padding.
        let exchange = if raw.starts_with("60") || raw.starts_with("68") || raw.starts_with('9') {
            "SH"
        } else {
            "SZ"
        };
        Ok(Self(format!("{:0>6}.{}", raw, exchange)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shanghai_prefixes_map_to_sh() {
        assert_eq!(TsCode::new("600519").unwrap().as_str(), "600519.SH");
        assert_eq!(TsCode::new("688001").unwrap().as_str(), "688001.SH");
        assert_eq!(TsCode::new("900901").unwrap().as_str(), "900901.SH");
    }

    #[test]
    fn other_prefixes_map_to_sz() {
        assert_eq!(TsCode::new("000001").unwrap().as_str(), "000001.SZ");
        assert_eq!(TsCode::new("300750").unwrap().as_str(), "300750.SZ");
        assert_eq!(TsCode::new("002594").unwrap().as_str(), "002594.SZ");
    }

    #[test]
    fn short_codes_are_zero_padded() {
        assert_eq!(TsCode::new("1").unwrap().as_str(), "000001.SZ");
        // Prefix rule applies to the unpadded input: bare "9" goes to SH.
        assert_eq!(TsCode::new("9").unwrap().as_str(), "000009.SH");
    }

    #[test]
    fn qualified_codes_pass_through() {
        assert_eq!(TsCode::new("600519.SH").unwrap().as_str(), "600519.SH");
        assert_eq!(TsCode::new(" 000001.SZ ").unwrap().as_str(), "000001.SZ");
    }

    #[test]
    fn rejects_garbage() {
        assert!(TsCode::new("").is_err());
        assert!(TsCode::new("60051A").is_err());
        assert!(TsCode::new("6005199").is_err());
        assert!(TsCode::new("600519.XX").is_err());
        assert!(TsCode::new("60051.SH").is_err());
    }
}
