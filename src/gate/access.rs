//! # Access Control
//!
//! Decides whether a sender may use a handler:
//!
//! | Sender | Admin handler | Other handler |
//! |--------|---------------|---------------|
//! | admin | allow | allow |
//! | registered | deny (not admin) | allow |
//! | unknown | deny (not admin) | deny (unregistered) |

use std::sync::Arc;

use tracing::info;

use super::{Audience, Denial, Guard, Verdict};
use crate::message::Inbound;
use crate::registry::{AuthorizedRegistry, UserId};

/// Result of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Allow,
    DenyAdmin,
    DenyUnregistered,
}

/// Checks senders against the authorized registry.
#[derive(Clone)]
pub struct AccessGate {
    registry: Arc<AuthorizedRegistry>,
}

impl AccessGate {
    pub fn new(registry: Arc<AuthorizedRegistry>) -> Self {
        Self { registry }
    }

    pub fn authorize(&self, identity: UserId, requires_admin: bool) -> Authorization {
        if requires_admin && !self.registry.is_admin(identity) {
            return Authorization::DenyAdmin;
        }
        if !self.registry.contains(identity) {
            return Authorization::DenyUnregistered;
        }
        Authorization::Allow
    }
}

impl Guard for AccessGate {
    fn name(&self) -> &'static str {
        "access"
    }

    fn check(&self, inbound: &Inbound, audience: Audience) -> Verdict {
        let sender = inbound.sender.id;
        match self.authorize(sender, audience == Audience::Admin) {
            Authorization::Allow => Verdict::Continue,
            Authorization::DenyAdmin => {
                info!(sender, "admin handler refused");
                Verdict::Deny(Denial::NotAdmin)
            }
            Authorization::DenyUnregistered => {
                info!(sender, "unregistered sender refused");
                Verdict::Deny(Denial::Unregistered)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Content, Sender};
    use crate::registry::MemoryStore;
    use chrono::Utc;

    const ADMIN: UserId = 100;
    const FRIEND: UserId = 200;
    const STRANGER: UserId = 300;

    fn gate() -> AccessGate {
        let registry = AuthorizedRegistry::open(ADMIN, MemoryStore::with_ids([FRIEND])).unwrap();
        AccessGate::new(Arc::new(registry))
    }

    fn from(id: UserId) -> Inbound {
        Inbound {
            update_id: 1,
            chat_id: id,
            sender: Sender {
                id,
                first_name: "Ana".into(),
                last_name: None,
                username: None,
            },
            date: Utc::now(),
            content: Content::Text { text: "hola".into() },
        }
    }

    #[test]
    fn test_admin_is_allowed_everywhere() {
        let gate = gate();
        assert_eq!(gate.authorize(ADMIN, true), Authorization::Allow);
        assert_eq!(gate.authorize(ADMIN, false), Authorization::Allow);
    }

    #[test]
    fn test_registered_user() {
        let gate = gate();
        assert_eq!(gate.authorize(FRIEND, false), Authorization::Allow);
        assert_eq!(gate.authorize(FRIEND, true), Authorization::DenyAdmin);
    }

    #[test]
    fn test_stranger() {
        let gate = gate();
        assert_eq!(gate.authorize(STRANGER, false), Authorization::DenyUnregistered);
        assert_eq!(gate.authorize(STRANGER, true), Authorization::DenyAdmin);
    }

    #[test]
    fn test_sees_registry_changes() {
        let registry = Arc::new(AuthorizedRegistry::open(ADMIN, MemoryStore::default()).unwrap());
        let gate = AccessGate::new(registry.clone());
        assert_eq!(gate.authorize(STRANGER, false), Authorization::DenyUnregistered);

        registry.add(&[STRANGER]).unwrap();
        assert_eq!(gate.authorize(STRANGER, false), Authorization::Allow);
    }

    #[test]
    fn test_guard_verdicts() {
        let gate = gate();
        assert_eq!(gate.check(&from(FRIEND), Audience::Authorized), Verdict::Continue);
        assert_eq!(
            gate.check(&from(FRIEND), Audience::Admin),
            Verdict::Deny(Denial::NotAdmin)
        );
        assert_eq!(
            gate.check(&from(STRANGER), Audience::Authorized),
            Verdict::Deny(Denial::Unregistered)
        );
    }
}
