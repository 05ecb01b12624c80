use std::fmt::{Display, Formatter};
use std::net::IpAddr;

/// State of a BGP session as reported by the speaker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PeerState {
    Up,
    Down,
    /// Intermediate FSM states (`connected`, ...) the speaker may also report.
    Other(String),
}

impl From<&str> for PeerState {
    fn from(value: &str) -> Self {
        match value {
            "up" => PeerState::Up,
            "down" => PeerState::Down,
            other => PeerState::Other(other.to_string()),
        }
    }
}

impl Display for PeerState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerState::Up => write!(f, "up"),
            PeerState::Down => write!(f, "down"),
            PeerState::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A session state transition. Transient, never stored in the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Peer address of the session, when the speaker reported one.
    pub peer: Option<IpAddr>,
    pub state: PeerState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_state() {
        assert_eq!(PeerState::from("up"), PeerState::Up);
        assert_eq!(PeerState::from("down"), PeerState::Down);
        assert_eq!(
            PeerState::from("connected"),
            PeerState::Other("connected".to_string())
        );
        assert_eq!(PeerState::Other("idle".to_string()).to_string(), "idle");
    }
}
