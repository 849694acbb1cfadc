//! Advisor identifier value object

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Advisors that can sit on the council (Value Object)
///
/// A closed set: every identifier maps to exactly one static
/// [`Persona`](super::Persona). Unknown identifiers are rejected when parsed,
/// so a debate can never reach a turn for an advisor without a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Advisor {
    Strategist,
    Analyst,
    Skeptic,
    Innovator,
    Pragmatist,
}

impl Advisor {
    /// Every advisor, in registry order.
    pub const ALL: [Advisor; 5] = [
        Advisor::Strategist,
        Advisor::Analyst,
        Advisor::Skeptic,
        Advisor::Innovator,
        Advisor::Pragmatist,
    ];

    /// Get the string identifier for this advisor
    pub fn as_str(&self) -> &'static str {
        match self {
            Advisor::Strategist => "strategist",
            Advisor::Analyst => "analyst",
            Advisor::Skeptic => "skeptic",
            Advisor::Innovator => "innovator",
            Advisor::Pragmatist => "pragmatist",
        }
    }

    /// Default council used when the caller does not choose advisors.
    pub fn default_council() -> Vec<Advisor> {
        vec![Advisor::Strategist, Advisor::Analyst, Advisor::Skeptic]
    }
}

impl std::fmt::Display for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Advisor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strategist" => Ok(Advisor::Strategist),
            "analyst" => Ok(Advisor::Analyst),
            "skeptic" => Ok(Advisor::Skeptic),
            "innovator" => Ok(Advisor::Innovator),
            "pragmatist" => Ok(Advisor::Pragmatist),
            other => Err(DomainError::UnknownAdvisor(other.to_string())),
        }
    }
}

impl Serialize for Advisor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Advisor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisor_roundtrip() {
        for advisor in Advisor::ALL {
            let parsed: Advisor = advisor.to_string().parse().unwrap();
            assert_eq!(advisor, parsed);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("  Skeptic ".parse::<Advisor>().unwrap(), Advisor::Skeptic);
    }

    #[test]
    fn test_unknown_advisor_rejected() {
        let err = "oracle".parse::<Advisor>().unwrap_err();
        assert_eq!(err, DomainError::UnknownAdvisor("oracle".to_string()));
    }

    #[test]
    fn test_deserialize_unknown_fails() {
        let result: Result<Advisor, _> = serde_json::from_str("\"oracle\"");
        assert!(result.is_err());
        let ok: Advisor = serde_json::from_str("\"analyst\"").unwrap();
        assert_eq!(ok, Advisor::Analyst);
    }
}
