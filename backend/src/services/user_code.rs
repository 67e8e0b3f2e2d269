//! Shareable user codes.
//!
//! Every profile carries a short code that a coach hands to athletes so they
//! can link their accounts. Codes are 6 to 8 ASCII letters or digits and are
//! compared upper-cased.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ServiceError;

pub const MIN_CODE_LEN: usize = 6;
pub const MAX_CODE_LEN: usize = 8;
/// Length of freshly generated codes.
pub const GENERATED_CODE_LEN: usize = 8;

/// A normalized user code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserCode(String);

impl UserCode {
    /// Trim and upper-case `input`, then check length and alphabet.
    pub fn parse(input: &str) -> Result<Self, ServiceError> {
        let code = input.trim().to_ascii_uppercase();
        let len = code.chars().count();
        if !(MIN_CODE_LEN..=MAX_CODE_LEN).contains(&len) {
            return Err(ServiceError::validation(format!(
                "user code must be {} to {} characters, got {}",
                MIN_CODE_LEN, MAX_CODE_LEN, len
            )));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ServiceError::validation(
                "user code may only contain letters and digits",
            ));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserCode {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).map_err(|e| e.to_string())
    }
}

impl From<UserCode> for String {
    fn from(code: UserCode) -> Self {
        code.0
    }
}

/// A fresh random code of [`GENERATED_CODE_LEN`] upper-case characters.
pub fn generate_user_code() -> UserCode {
    let code: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(GENERATED_CODE_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    UserCode(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(UserCode::parse("  ab12cd ").unwrap().as_str(), "AB12CD");
        assert_eq!(UserCode::parse("abcd1234").unwrap().as_str(), "ABCD1234");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        for bad in ["", "abc12", "abcd12345", "ab-12cd", "ab 12cd", "ÄBCDEF"] {
            assert!(
                matches!(UserCode::parse(bad), Err(ServiceError::Validation(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_generated_codes_are_valid() {
        for _ in 0..50 {
            let code = generate_user_code();
            assert_eq!(code.as_str().len(), GENERATED_CODE_LEN);
            assert_eq!(UserCode::parse(code.as_str()).unwrap(), code);
        }
    }

    #[test]
    fn test_serde_goes_through_parse() {
        let code: UserCode = serde_json::from_str("\"xy98zz\"").unwrap();
        assert_eq!(code.as_str(), "XY98ZZ");
        assert!(serde_json::from_str::<UserCode>("\"bad\"").is_err());
    }
}
