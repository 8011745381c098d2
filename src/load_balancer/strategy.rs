//! Selection strategy.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The fixed set of selection algorithms a dispatcher can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    RoundRobin,
    Random,
}

/// Returned when a strategy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown load balancing strategy {0:?}")]
pub struct UnknownStrategy(pub String);

impl Strategy {
    /// Canonical configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::RoundRobin => "round_robin",
            Strategy::Random => "random",
        }
    }

    /// Parse `name`, falling back to round-robin with a warning when unknown.
    pub fn resolve(name: &str) -> Self {
        match name.parse::<Strategy>() {
            Ok(strategy) => strategy,
            Err(UnknownStrategy(name)) => {
                tracing::warn!(
                    strategy = %name,
                    fallback = Strategy::RoundRobin.as_str(),
                    "Unknown load balancing strategy, defaulting to round_robin"
                );
                Strategy::RoundRobin
            }
        }
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "round_robin" => Ok(Strategy::RoundRobin),
            "random" => Ok(Strategy::Random),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!("round_robin".parse::<Strategy>(), Ok(Strategy::RoundRobin));
        assert_eq!("Round-Robin".parse::<Strategy>(), Ok(Strategy::RoundRobin));
        assert_eq!("random".parse::<Strategy>(), Ok(Strategy::Random));
    }

    #[test]
    fn test_parse_unknown_name() {
        assert_eq!(
            "least_conn".parse::<Strategy>(),
            Err(UnknownStrategy("least_conn".into()))
        );
    }

    #[test]
    fn test_resolve_falls_back_to_round_robin() {
        assert_eq!(Strategy::resolve("weighted"), Strategy::RoundRobin);
        assert_eq!(Strategy::resolve(""), Strategy::RoundRobin);
        assert_eq!(Strategy::resolve("random"), Strategy::Random);
    }

    #[test]
    fn test_display_round_trips() {
        for s in [Strategy::RoundRobin, Strategy::Random] {
            assert_eq!(s.to_string().parse::<Strategy>(), Ok(s));
        }
    }
}
