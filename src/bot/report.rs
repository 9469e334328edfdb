//! # Failure Dispatch
//!
//! Every error a handler returns ends up here, once.
//!
//! | Kind | Requester gets | Admin gets |
//! |------|----------------|------------|
//! | `NoPaperLeft` | "No queda papel" | nothing |
//! | `NoPrinterFound` | "No encuentro la impresora" | nothing |
//! | `ExternalCommandFailure` | "Error: ..." | nothing |
//! | `Unhandled` | "Algo no ha ido bien" | request and error chain, as HTML |
//!
//! The admin report must fit in one chat message, so both blocks are cut
//! before escaping rather than after; an entity like `&amp;` is never split.

use tracing::{error, info, warn};

use super::commands::MAX_MESSAGE_CHARS;
use super::{Bot, ChatTransport};
use crate::error::{ErrorKind, LudivinaError};
use crate::message::Inbound;
use crate::printer::Connector;

pub const NO_PAPER: &str = "No queda papel";
pub const NO_PRINTER: &str = "No encuentro la impresora";
pub const SOMETHING_WENT_WRONG: &str = "Algo no ha ido bien";

const ELLIPSIS: char = '…';

impl<T: ChatTransport, C: Connector + 'static> Bot<T, C> {
    pub(super) async fn dispatch_failure(&self, inbound: &Inbound, failure: LudivinaError) {
        let reply = match failure.kind() {
            ErrorKind::NoPaperLeft => {
                info!(update_id = inbound.update_id, "out of paper");
                NO_PAPER.to_string()
            }
            ErrorKind::NoPrinterFound => {
                info!(update_id = inbound.update_id, error = %failure, "printer missing");
                NO_PRINTER.to_string()
            }
            ErrorKind::ExternalCommandFailure => {
                info!(update_id = inbound.update_id, error = %failure, "command failed");
                format!("Error: {}", failure)
            }
            ErrorKind::Unhandled => {
                error!(
                    update_id = inbound.update_id,
                    sender = inbound.sender.id,
                    error = %failure.chain(),
                    "failed to handle update"
                );
                SOMETHING_WENT_WRONG.to_string()
            }
        };

        if let Err(e) = self.reply(inbound, &reply).await {
            warn!(error = %e, "failed to tell the requester about a failure");
        }

        if failure.kind() == ErrorKind::Unhandled {
            let report = admin_report(inbound, &failure);
            if let Err(e) = self.transport.send_html(self.registry.admin(), &report).await {
                warn!(error = %e, "failed to report a failure to the admin");
            }
        }
    }
}

/// HTML message describing a failure, at most [`MAX_MESSAGE_CHARS`] long.
pub fn admin_report(inbound: &Inbound, failure: &LudivinaError) -> String {
    let request = serde_json::to_string_pretty(inbound)
        .unwrap_or_else(|e| format!("unserializable request: {}", e));
    render_report(&request, &failure.chain(), MAX_MESSAGE_CHARS)
}

fn render_report(request: &str, chain: &str, limit: usize) -> String {
    const HEAD: &str = "Exception\n<pre>";
    const MIDDLE: &str = "</pre>\n\n<pre>";
    const TAIL: &str = "</pre>";

    let budget = limit.saturating_sub(HEAD.chars().count() + MIDDLE.chars().count() + TAIL.chars().count());

    // The error chain is the more useful half; give it first pick
    let chain_len = escaped_len(chain);
    let request_len = escaped_len(request);
    let (request_budget, chain_budget) = if request_len + chain_len <= budget {
        (request_len, chain_len)
    } else {
        let chain_budget = chain_len.min(budget - budget / 4);
        let request_budget = request_len.min(budget - chain_budget);
        (request_budget, budget - request_budget)
    };

    format!(
        "{}{}{}{}{}",
        HEAD,
        escape_within(request, request_budget),
        MIDDLE,
        escape_within(chain, chain_budget),
        TAIL
    )
}

fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#x27;"),
        _ => None,
    }
}

/// Escape text for an HTML message body.
///
/// ```
/// use ludivina::bot::report::escape_html;
///
/// assert_eq!(escape_html("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#x27;b&#x27;&lt;/b&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    escape_within(text, usize::MAX)
}

fn escaped_len(text: &str) -> usize {
    text.chars()
        .map(|c| escape_char(c).map_or(1, str::len))
        .sum()
}

/// Escape `text`, stopping with an ellipsis before the result would exceed
/// `limit` characters.
fn escape_within(text: &str, limit: usize) -> String {
    let full = escaped_len(text) <= limit;
    let limit = if full { limit } else { limit.saturating_sub(1) };

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let piece_len = escape_char(c).map_or(1, str::len);
        if used + piece_len > limit {
            break;
        }
        match escape_char(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
        used += piece_len;
    }

    if !full {
        out.push(ELLIPSIS);
    }
    out
}
