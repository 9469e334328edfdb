//! # Polling Loop
//!
//! Long-polls the Bot API and hands each message to the bot, one at a time,
//! until the process is asked to stop.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{Bot, ChatTransport};
use crate::error::LudivinaError;
use crate::printer::Connector;
use crate::telegram::{Client, Update};

/// Pause after a failed poll before trying again
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Incoming side of the chat service.
#[async_trait]
pub trait UpdateSource: ChatTransport {
    /// Wait up to `timeout` for updates at or after `offset`.
    async fn poll_updates(&self, offset: Option<i64>, timeout: Duration) -> Result<Vec<Update>, LudivinaError>;
}

#[async_trait]
impl UpdateSource for Client {
    async fn poll_updates(&self, offset: Option<i64>, timeout: Duration) -> Result<Vec<Update>, LudivinaError> {
        self.get_updates(offset, timeout).await
    }
}

/// Offset that acknowledges every update up to and including `updates`.
///
/// ```
/// use ludivina::bot::polling::next_offset;
///
/// assert_eq!(next_offset(None, &[]), None);
/// assert_eq!(next_offset(Some(5), &[]), Some(5));
/// ```
pub fn next_offset(current: Option<i64>, updates: &[Update]) -> Option<i64> {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .map_or(current, |next| Some(current.map_or(next, |c| c.max(next))))
}

/// Resolves on the first Ctrl-C.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

impl<T: UpdateSource, C: Connector + 'static> Bot<T, C> {
    /// Poll for messages until Ctrl-C.
    ///
    /// `poll_timeout` is how long each long poll waits for new messages.
    pub async fn run(&self, poll_timeout: Duration) -> Result<(), LudivinaError> {
        self.run_until(poll_timeout, ctrl_c()).await
    }

    /// Poll for messages until `shutdown` resolves.
    ///
    /// `shutdown` is polled for the whole run, so a signal that fires while a
    /// message is being handled stops the loop once that message is done.
    pub async fn run_until<F>(&self, poll_timeout: Duration, shutdown: F) -> Result<(), LudivinaError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut offset = None;
        info!(?poll_timeout, "polling for messages");

        loop {
            let updates = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                result = self.transport.poll_updates(offset, poll_timeout) => result,
            };

            let updates = match updates {
                Ok(updates) => updates,
                Err(e) => {
                    warn!(error = %e, "polling failed, retrying");
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(RETRY_DELAY) => continue,
                    }
                }
            };

            offset = next_offset(offset, &updates);
            for update in updates {
                let update_id = update.update_id;
                match update.into_inbound() {
                    Some(inbound) => self.handle(&inbound).await,
                    None => debug!(update_id, "skipping update"),
                }
            }
        }

        info!("shutting down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn updates(ids: &[i64]) -> Vec<Update> {
        ids.iter()
            .map(|&update_id| Update {
                update_id,
                message: None,
            })
            .collect()
    }

    #[test]
    fn test_offset_is_past_the_last_update() {
        assert_eq!(next_offset(None, &updates(&[10, 12, 11])), Some(13));
    }

    #[test]
    fn test_offset_never_goes_back() {
        assert_eq!(next_offset(Some(20), &updates(&[3])), Some(20));
    }
}
