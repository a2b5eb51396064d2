//! Join-session identifiers.
//!
//! The session id is embedded in the join URL shown as a QR code. It gates
//! new registrations only: refreshing the session invalidates the old code
//! for newcomers while every already-registered token keeps working.

use super::AppState;
use crate::protocol::HostEvent;
use crate::types::SessionId;
use rand::Rng;

/// Safe character set for short codes (excludes 0/O, 1/I/L to avoid confusion)
const CODE_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const SESSION_CODE_LENGTH: usize = 8;

fn generate_session_code() -> String {
    let mut rng = rand::rng();
    (0..SESSION_CODE_LENGTH)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

pub struct SessionRegistry {
    current: SessionId,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            current: generate_session_code(),
        }
    }

    /// Issue a new session id, superseding the previous one for new joins.
    pub fn issue(&mut self) -> SessionId {
        self.current = generate_session_code();
        self.current.clone()
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn validate(&self, id: &str) -> bool {
        self.current == id
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub async fn current_session(&self) -> SessionId {
        self.game.read().await.session.current().to_string()
    }

    /// Issue a fresh session id and announce it to the host.
    pub async fn refresh_session(&self) -> SessionId {
        let mut game = self.game.write().await;
        let session_id = game.session.issue();
        tracing::info!(%session_id, "session refreshed");
        self.broadcaster.host(HostEvent::SessionRefreshed {
            session_id: session_id.clone(),
        });
        session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_supersedes_previous_id() {
        let mut registry = SessionRegistry::new();
        let first = registry.current().to_string();
        assert!(registry.validate(&first));

        let second = registry.issue();
        assert_ne!(first, second);
        assert!(!registry.validate(&first));
        assert!(registry.validate(&second));
    }

    #[test]
    fn codes_use_the_safe_alphabet() {
        let registry = SessionRegistry::new();
        let code = registry.current();
        assert_eq!(code.len(), SESSION_CODE_LENGTH);
        assert!(code.bytes().all(|b| CODE_CHARS.contains(&b)));
    }
}
