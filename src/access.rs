//! Password gate in front of the projection surfaces
//!
//! The gate holds the configured secret; each caller carries its own
//! `GateSession`, so no login state is shared between users.

use log::{info, warn};

/// Environment variable holding the shared secret
pub const SECRET_ENV_VAR: &str = "PROJECTOR_SECRET";

/// Outcome of the most recent attempt in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateStatus {
    #[default]
    Unchecked,
    Denied,
    Granted,
}

/// Per-user login state
#[derive(Debug, Clone, Default)]
pub struct GateSession {
    status: GateStatus,
    failed_attempts: u32,
}

impl GateSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> GateStatus {
        self.status
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Forget any previous login
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Shared-secret check; with no secret configured the gate is always open
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    secret: Option<String>,
}

impl AccessGate {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Read the secret from `PROJECTOR_SECRET`
    pub fn from_env() -> Self {
        let gate = Self::new(std::env::var(SECRET_ENV_VAR).ok());
        if !gate.is_configured() {
            info!("{} not set; access gate is open", SECRET_ENV_VAR);
        }
        gate
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Whether the session may use the projector
    pub fn is_open(&self, session: &GateSession) -> bool {
        !self.is_configured() || session.status == GateStatus::Granted
    }

    /// Check a password and record the outcome in the session
    pub fn attempt(&self, session: &mut GateSession, password: &str) -> bool {
        let Some(secret) = &self.secret else {
            session.status = GateStatus::Granted;
            return true;
        };

        if constant_time_eq(secret.as_bytes(), password.as_bytes()) {
            session.status = GateStatus::Granted;
            true
        } else {
            session.status = GateStatus::Denied;
            session.failed_attempts += 1;
            warn!("Rejected password attempt ({} so far this session)", session.failed_attempts);
            false
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_secret_is_open() {
        let gate = AccessGate::new(None);
        let mut session = GateSession::new();
        assert!(gate.is_open(&session));
        assert!(gate.attempt(&mut session, "anything"));

        // An empty secret counts as unset
        assert!(!AccessGate::new(Some(String::new())).is_configured());
    }

    #[test]
    fn test_wrong_then_right() {
        let gate = AccessGate::new(Some("hunter2".to_string()));
        let mut session = GateSession::new();
        assert!(!gate.is_open(&session));
        assert_eq!(session.status(), GateStatus::Unchecked);

        assert!(!gate.attempt(&mut session, "hunter3"));
        assert_eq!(session.status(), GateStatus::Denied);
        assert!(!gate.is_open(&session));

        assert!(gate.attempt(&mut session, "hunter2"));
        assert!(gate.is_open(&session));
        assert_eq!(session.failed_attempts(), 1);
    }

    #[test]
    fn test_reset_closes_session() {
        let gate = AccessGate::new(Some("secret".to_string()));
        let mut session = GateSession::new();
        gate.attempt(&mut session, "secret");
        session.reset();
        assert!(!gate.is_open(&session));
        assert_eq!(session.status(), GateStatus::Unchecked);
    }

    #[test]
    fn test_sessions_are_independent() {
        let gate = AccessGate::new(Some("secret".to_string()));
        let mut alice = GateSession::new();
        let bob = GateSession::new();
        gate.attempt(&mut alice, "secret");
        assert!(gate.is_open(&alice));
        assert!(!gate.is_open(&bob));
    }
}
