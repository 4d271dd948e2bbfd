/// Errors surfaced at the host boundary. The simulation itself is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A selection named a fighter that is not on the roster.
    UnknownArchetype(String),
    InvalidConfig(String),
    /// The session task has exited and no longer accepts commands.
    SessionClosed,
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownArchetype(name) => write!(f, "unknown fighter: {name}"),
            Self::InvalidConfig(m) => write!(f, "invalid configuration: {m}"),
            Self::SessionClosed => write!(f, "session closed"),
        }
    }
}

impl std::error::Error for HostError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            HostError::UnknownArchetype("Grover".into()).to_string(),
            "unknown fighter: Grover"
        );
        assert_eq!(
            HostError::InvalidConfig("tick_rate_hz must be > 0".into()).to_string(),
            "invalid configuration: tick_rate_hz must be > 0"
        );
        assert_eq!(HostError::SessionClosed.to_string(), "session closed");
    }
}
