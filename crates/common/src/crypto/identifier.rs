use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::keys::PublicKey;

/// Length of an identifier: 43 base64 characters plus one `=`
pub const IDENTIFIER_LEN: usize = 44;

const BASE64_BODY_LEN: usize = IDENTIFIER_LEN - 1;

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[A-Za-z0-9/+]{43}=$").expect("identifier pattern is valid")
});

static NON_BASE64_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^A-Za-z0-9/+]").expect("base64 filter pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed identifier {0:?}: expected 43 base64 characters followed by '='")]
pub struct IdentifierError(pub String);

/// An addressable identity on the network
///
/// Both minds (public keys) and ideals share this shape: 43 characters of
/// standard base64 followed by a single `=`. The identifier is kept exactly as
/// written, since considerations hash the textual form. An ideal need not
/// decode to a valid curve point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `value` has the 44-character identifier shape
    pub fn is_well_formed(value: &str) -> bool {
        IDENTIFIER_REGEX.is_match(value)
    }

    /// Turn free-form search text into an identifier
    ///
    /// Only input that is exactly one identifier is kept as-is; text that
    /// merely contains one goes through the rebuild like anything else.
    /// Rebuilding strips non-base64 characters (the `=` included), keeps at
    /// most the first 43 characters and right-pads with `0` before the
    /// trailing `=` is added. The result is always well-formed, so overlong
    /// queries lose their tail rather than passing through unchanged.
    pub fn from_query(query: &str) -> Self {
        if Self::is_well_formed(query) {
            return Identifier(query.to_string());
        }

        let stripped = NON_BASE64_REGEX.replace_all(query, "");
        let mut body: String = stripped.chars().take(BASE64_BODY_LEN).collect();
        while body.len() < BASE64_BODY_LEN {
            body.push('0');
        }
        body.push('=');
        Identifier(body)
    }

    /// Observer keys are real minds; ideals are padded and end in `00=`
    pub fn is_observer(&self) -> bool {
        !self.0.ends_with("00=")
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_well_formed(s) {
            Ok(Identifier(s.to_string()))
        } else {
            Err(IdentifierError(s.to_string()))
        }
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_well_formed(&value) {
            Ok(Identifier(value))
        } else {
            Err(IdentifierError(value))
        }
    }
}

impl From<PublicKey> for Identifier {
    fn from(key: PublicKey) -> Self {
        Identifier(key.to_base64())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Identifier::try_from(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const IDEAL: &str = "ideaL00000000000000000000000000000000000000=";

    #[test]
    fn test_well_formed() {
        assert_eq!(IDEAL.len(), IDENTIFIER_LEN);
        assert!(Identifier::from_str(IDEAL).is_ok());
        assert!(Identifier::from_str("short=").is_err());
        assert!(Identifier::from_str(&IDEAL.replace('=', "0")).is_err());
        assert!(Identifier::from_str(&IDEAL.replace('L', "!")).is_err());
    }

    #[test]
    fn test_from_query_pads_and_strips() {
        let id = Identifier::from_query("hello world!");
        assert_eq!(id.as_str(), "helloworld000000000000000000000000000000000=");
        assert!(Identifier::is_well_formed(id.as_str()));
        assert!(!id.is_observer());
    }

    #[test]
    fn test_from_query_keeps_well_formed_input() {
        assert_eq!(Identifier::from_query(IDEAL).as_str(), IDEAL);
    }

    #[test]
    fn test_from_query_truncates_long_input() {
        let long = "a".repeat(60);
        let id = Identifier::from_query(&long);
        assert_eq!(id.as_str().len(), IDENTIFIER_LEN);
        assert!(id.as_str().ends_with("a="));
    }

    #[test]
    fn test_from_query_rebuilds_text_around_identifier() {
        let id = Identifier::from_query(&format!("x{}", IDEAL));
        assert_eq!(id.as_str(), format!("x{}=", &IDEAL[..42]));

        let id = Identifier::from_query(&format!("{} ", IDEAL));
        assert_eq!(id.as_str(), format!("{}=", &IDEAL[..43]));
        assert!(Identifier::is_well_formed(id.as_str()));

        assert_eq!(
            Identifier::from_query("ideaL=").as_str(),
            "ideaL00000000000000000000000000000000000000="
        );
    }

    #[test]
    fn test_public_key_identifier_is_observer() {
        let key = PublicKey::from([0x5a; 32]);
        let id = key.to_identifier();
        assert!(Identifier::is_well_formed(id.as_str()));
        assert!(id.is_observer());
        assert_eq!(PublicKey::try_from(&id).unwrap(), key);
    }

    #[test]
    fn test_serde_rejects_malformed() {
        let parsed: Result<Identifier, _> = serde_json::from_str("\"nope\"");
        assert!(parsed.is_err());

        let id: Identifier = serde_json::from_str(&format!("\"{}\"", IDEAL)).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{}\"", IDEAL));
    }
}
