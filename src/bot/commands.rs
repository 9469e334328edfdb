//! Command handlers: `/start`, `/exec`, `/add` and `/remove`.

use std::collections::BTreeSet;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::{info, warn};

use super::{Bot, ChatTransport};
use crate::error::LudivinaError;
use crate::message::Inbound;
use crate::printer::Connector;
use crate::registry::{Removal, UserId};

/// Longest message the chat service accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Captured result of an `/exec` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl<T: ChatTransport, C: Connector + 'static> Bot<T, C> {
    pub(super) async fn start(&self, inbound: &Inbound) -> Result<(), LudivinaError> {
        let text = format!(
            "Hola {}. Mándame fotos y se las imprimo a la abuela",
            inbound.sender.first_name
        );
        self.reply(inbound, &text).await
    }

    /// Run a command and reply with its return code and output.
    ///
    /// The reply is sent even when the command fails; a non-zero exit is
    /// then reported as an error.
    pub(super) async fn exec(&self, inbound: &Inbound, args: &[String]) -> Result<(), LudivinaError> {
        let output = run_command(args, self.settings.exec_timeout).await?;

        self.reply(inbound, &format!("return code {}", output.code)).await?;
        if !output.stdout.is_empty() {
            let text = truncate_chars(&format!("stdout\n{}", output.stdout), MAX_MESSAGE_CHARS);
            self.reply(inbound, &text).await?;
        }
        if !output.stderr.is_empty() {
            let text = truncate_chars(&format!("stderr\n{}", output.stderr), MAX_MESSAGE_CHARS);
            self.reply(inbound, &text).await?;
        }

        if output.code != 0 {
            return Err(LudivinaError::ExternalCommand(format!(
                "{} exited with code {}",
                args.join(" "),
                output.code
            )));
        }
        Ok(())
    }

    pub(super) async fn add(&self, inbound: &Inbound, args: &[String]) -> Result<(), LudivinaError> {
        let ids = parse_ids(args)?;
        let authorized = self.registry.add(&ids)?;
        self.reply(inbound, &authorized_users(&authorized)).await
    }

    pub(super) async fn remove(&self, inbound: &Inbound, args: &[String]) -> Result<(), LudivinaError> {
        let ids = parse_ids(args)?;
        match self.registry.remove(&ids)? {
            Removal::Removed(authorized) => self.reply(inbound, &authorized_users(&authorized)).await,
            Removal::AdminProtected => {
                let text = format!("Not able to deauthorize admin user {}", self.registry.admin());
                self.reply(inbound, &text).await
            }
        }
    }
}

/// Run `args[0]` with the remaining arguments, killing it after `timeout`.
///
/// ## Errors
///
/// [`LudivinaError::ExternalCommand`] if there is no command, it cannot be
/// started, or it runs out of time.
pub async fn run_command(args: &[String], timeout: Duration) -> Result<CommandOutput, LudivinaError> {
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| LudivinaError::ExternalCommand("No command given".to_string()))?;

    info!(command = %args.join(" "), "running command");
    let mut command = Command::new(program);
    command.args(rest).stdin(Stdio::null()).kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(LudivinaError::ExternalCommand(format!(
                "Failed to run {}: {}",
                program, e
            )));
        }
        Err(_) => {
            warn!(command = %program, ?timeout, "command timed out");
            return Err(LudivinaError::ExternalCommand(format!(
                "{} timed out after {}s",
                program,
                timeout.as_secs_f32()
            )));
        }
    };

    Ok(CommandOutput {
        code: exit_code(output.status),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Exit code, or the negated signal number if the process was killed.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

fn parse_ids(args: &[String]) -> Result<Vec<UserId>, LudivinaError> {
    args.iter()
        .map(|arg| {
            arg.parse()
                .map_err(|_| LudivinaError::InvalidArgument(format!("{} is not a user id", arg)))
        })
        .collect()
}

/// `Authorized users {1, 2, 3}`
fn authorized_users(ids: &BTreeSet<UserId>) -> String {
    let list: Vec<String> = ids.iter().map(ToString::to_string).collect();
    format!("Authorized users {{{}}}", list.join(", "))
}

/// Keep at most `limit` characters of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
