//! Travel mode for route planning

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// How the user intends to travel along a route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// On foot
    #[default]
    Walking,
    /// By car
    Driving,
    /// By bicycle
    Cycling,
}

impl TravelMode {
    /// Routing profile name as used in routing service URLs
    #[must_use]
    pub const fn profile(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Driving => "driving",
            Self::Cycling => "cycling",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.profile())
    }
}

impl FromStr for TravelMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "walking" | "walk" | "foot" => Ok(Self::Walking),
            "driving" | "drive" | "car" => Ok(Self::Driving),
            "cycling" | "bike" | "bicycle" => Ok(Self::Cycling),
            other => Err(DomainError::ValidationError(format!(
                "Unknown travel mode: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Walking".parse::<TravelMode>().unwrap(), TravelMode::Walking);
        assert_eq!("DRIVING".parse::<TravelMode>().unwrap(), TravelMode::Driving);
        assert_eq!("bike".parse::<TravelMode>().unwrap(), TravelMode::Cycling);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!("teleport".parse::<TravelMode>().is_err());
    }

    #[test]
    fn profile_matches_display() {
        for mode in [TravelMode::Walking, TravelMode::Driving, TravelMode::Cycling] {
            assert_eq!(mode.to_string(), mode.profile());
        }
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&TravelMode::Cycling).unwrap();
        assert_eq!(json, "\"cycling\"");
    }
}
