//! Command execution and output formatting

use std::fmt;

use anyhow::Context;
use serde::Serialize;

use rpcsx_users_app::AppState;
use rpcsx_users_core::types::{Account, OperationOutcome};
use rpcsx_users_core::utils::validator;

use crate::config::Command;

/// Result of a command, printed as text or JSON
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Accounts {
        #[serde(rename = "activeUser")]
        active_user: String,
        accounts: Vec<Account>,
    },
    ActiveUser {
        #[serde(rename = "activeUser")]
        active_user: String,
        username: Option<String>,
    },
    Done {
        #[serde(skip)]
        action: &'static str,
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accounts {
                active_user,
                accounts,
            } => {
                if accounts.is_empty() {
                    return writeln!(f, "No accounts");
                }
                for account in accounts {
                    let marker = if account.user_id == *active_user { '*' } else { ' ' };
                    writeln!(f, "{marker} {}  {}", account.user_id, account.username)?;
                }
                Ok(())
            }
            Self::ActiveUser {
                active_user,
                username: Some(name),
            } => writeln!(f, "{active_user} ({name})"),
            Self::ActiveUser {
                active_user,
                username: None,
            } => writeln!(f, "{active_user}"),
            Self::Done {
                action,
                user_id,
                warnings,
            } => {
                writeln!(f, "{action} {user_id}")?;
                for warning in warnings {
                    writeln!(f, "  warning: {warning}")?;
                }
                Ok(())
            }
        }
    }
}

/// Turn an outcome into warnings, or an error when it was rejected
fn settle(outcome: OperationOutcome, subject: &str) -> anyhow::Result<Vec<String>> {
    match outcome {
        OperationOutcome::Applied => Ok(Vec::new()),
        OperationOutcome::Degraded { warnings } => {
            for warning in &warnings {
                tracing::warn!("{subject}: {warning}");
            }
            Ok(warnings)
        }
        OperationOutcome::Rejected { reason } => Err(reason.into_error(subject).into()),
    }
}

/// Run one command against a loaded `AppState`
pub async fn execute(state: &AppState, command: Command) -> anyhow::Result<Report> {
    let repo = &state.account_repository;

    match command {
        Command::List => Ok(Report::Accounts {
            active_user: repo.active_user(),
            accounts: repo.sorted_accounts(),
        }),
        Command::Whoami => {
            let active_user = repo.active_user();
            Ok(Report::ActiveUser {
                username: repo.get_username(&active_user),
                active_user,
            })
        }
        Command::Create { username } => {
            validator::ensure_username(&username)?;
            let result = repo.create_account(&username).await?;
            let warnings = settle(result.outcome, &username)?;
            let user_id = result
                .user_id
                .context("account created without an id")?;
            Ok(Report::Done {
                action: "Created",
                user_id,
                warnings,
            })
        }
        Command::Rename { user_id, username } => {
            validator::ensure_user_id(&user_id)?;
            validator::ensure_username(&username)?;
            let outcome = repo.rename_account(&user_id, &username).await?;
            let warnings = settle(outcome, &user_id)?;
            Ok(Report::Done {
                action: "Renamed",
                user_id,
                warnings,
            })
        }
        Command::Remove { user_id } => {
            let outcome = repo
                .remove_account(&user_id)
                .await
                .with_context(|| format!("failed to remove {user_id}"))?;
            let warnings = settle(outcome, &user_id)?;
            Ok(Report::Done {
                action: "Removed",
                user_id,
                warnings,
            })
        }
        Command::Login {
            user_id,
            stop_emulator,
        } => {
            let outcome = repo.switch_account(&user_id, stop_emulator).await?;
            let warnings = settle(outcome, &user_id)?;
            Ok(Report::Done {
                action: "Signed in as",
                user_id,
                warnings,
            })
        }
    }
}
