//! # Request Gating
//!
//! Every inbound request passes through an ordered [`Pipeline`] of
//! [`Guard`]s before a handler runs. Each guard either lets the request
//! continue or short-circuits it:
//!
//! | Verdict | Meaning |
//! |---------|---------|
//! | [`Verdict::Continue`] | Ask the next guard |
//! | [`Verdict::Drop`] | Ignore the request without a reply |
//! | [`Verdict::Deny`] | Refuse the request; the sender is told why |
//!
//! ## Default Order
//!
//! ```text
//! request ──► freshness ──► access ──► handler
//! ```
//!
//! Freshness runs first so stale messages stay silent, even for senders who
//! are not authorized.

pub mod access;
pub mod freshness;

pub use access::{AccessGate, Authorization};
pub use freshness::{FreshnessFilter, is_stale};

use std::sync::Arc;

use tracing::debug;

use crate::message::Inbound;
use crate::registry::AuthorizedRegistry;

/// Who may use a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Any authorized user
    Authorized,
    /// Only the admin
    Admin,
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The handler is admin-only and the sender is not the admin
    NotAdmin,
    /// The sender is not in the authorized registry
    Unregistered,
}

/// Outcome of one guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Drop,
    Deny(Denial),
}

/// One stage of the request pipeline.
pub trait Guard: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn check(&self, inbound: &Inbound, audience: Audience) -> Verdict;
}

/// Guards applied in order; the first verdict other than `Continue` wins.
pub struct Pipeline {
    guards: Vec<Box<dyn Guard>>,
}

impl Pipeline {
    pub fn new(guards: Vec<Box<dyn Guard>>) -> Self {
        Self { guards }
    }

    /// Freshness, then access.
    pub fn standard(registry: Arc<AuthorizedRegistry>) -> Self {
        Self::new(vec![
            Box::new(FreshnessFilter::default()),
            Box::new(AccessGate::new(registry)),
        ])
    }

    /// Guard names, in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }

    pub fn evaluate(&self, inbound: &Inbound, audience: Audience) -> Verdict {
        for guard in &self.guards {
            let verdict = guard.check(inbound, audience);
            if verdict != Verdict::Continue {
                debug!(
                    guard = guard.name(),
                    update_id = inbound.update_id,
                    ?verdict,
                    "request stopped"
                );
                return verdict;
            }
        }
        Verdict::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Content, Sender};
    use crate::registry::MemoryStore;
    use chrono::Utc;
    use std::sync::Mutex;

    struct Fixed {
        name: &'static str,
        verdict: Verdict,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Guard for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn check(&self, _: &Inbound, _: Audience) -> Verdict {
            self.seen.lock().unwrap().push(self.name);
            self.verdict
        }
    }

    fn inbound() -> Inbound {
        Inbound {
            update_id: 1,
            chat_id: 1,
            sender: Sender {
                id: 1,
                first_name: "Ana".into(),
                last_name: None,
                username: None,
            },
            date: Utc::now(),
            content: Content::Text { text: "hola".into() },
        }
    }

    fn pipeline(verdicts: &[(&'static str, Verdict)]) -> (Pipeline, Arc<Mutex<Vec<&'static str>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let guards = verdicts
            .iter()
            .map(|&(name, verdict)| {
                Box::new(Fixed {
                    name,
                    verdict,
                    seen: seen.clone(),
                }) as Box<dyn Guard>
            })
            .collect();
        (Pipeline::new(guards), seen)
    }

    #[test]
    fn test_all_continue() {
        let (p, seen) = pipeline(&[("a", Verdict::Continue), ("b", Verdict::Continue)]);
        assert_eq!(p.evaluate(&inbound(), Audience::Authorized), Verdict::Continue);
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_first_stop_wins() {
        let (p, seen) = pipeline(&[
            ("a", Verdict::Drop),
            ("b", Verdict::Deny(Denial::Unregistered)),
        ]);
        assert_eq!(p.evaluate(&inbound(), Audience::Authorized), Verdict::Drop);
        assert_eq!(*seen.lock().unwrap(), vec!["a"]);
    }

    #[test]
    fn test_empty_pipeline_continues() {
        let p = Pipeline::new(vec![]);
        assert_eq!(p.evaluate(&inbound(), Audience::Admin), Verdict::Continue);
    }

    #[test]
    fn test_standard_order() {
        let registry = AuthorizedRegistry::open(1, MemoryStore::default()).unwrap();
        let p = Pipeline::standard(Arc::new(registry));
        assert_eq!(p.names(), vec!["freshness", "access"]);
    }
}
