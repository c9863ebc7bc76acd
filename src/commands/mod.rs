pub mod consult;
pub mod delete;
pub mod executable;
pub mod new_customer;
pub mod withdrawal;

use thiserror::Error as ThisError;
use tracing::debug;

use crate::commands::executable::Executable;
use crate::pool::ConnectionProvider;
use crate::response::ServerResponse;

use consult::Consult;
use delete::Delete;
use new_customer::NewCustomer;
use withdrawal::Withdrawal;

/// A fully decoded request, ready to execute against the database.
#[derive(Debug, PartialEq)]
pub enum Command {
    Consult(Consult),
    NewCustomer(NewCustomer),
    Withdrawal(Withdrawal),
    Delete(Delete),
}

impl Command {
    /// Split the command prefix from its payload at the first space, then
    /// decode the payload into the matching query shape.
    pub fn parse(message: &str) -> Result<Command, ParseError> {
        let (prefix, payload) = message
            .split_once(' ')
            .ok_or(ParseError::MissingSeparator)?;

        match prefix {
            "CONSULT" => Ok(Command::Consult(serde_json::from_str(payload)?)),
            "NEWCUSTOMER" => Ok(Command::NewCustomer(serde_json::from_str(payload)?)),
            "WITHDRAWAL" => Ok(Command::Withdrawal(serde_json::from_str(payload)?)),
            "DELETE" => Ok(Command::Delete(serde_json::from_str(payload)?)),
            _ => Err(ParseError::UnknownPrefix {
                prefix: prefix.to_string(),
            }),
        }
    }
}

impl Executable for Command {
    async fn exec(self, provider: &impl ConnectionProvider) -> ServerResponse {
        match self {
            Command::Consult(cmd) => cmd.exec(provider).await,
            Command::NewCustomer(cmd) => cmd.exec(provider).await,
            Command::Withdrawal(cmd) => cmd.exec(provider).await,
            Command::Delete(cmd) => cmd.exec(provider).await,
        }
    }
}

/// Handle one message: `None` only for `"BYE"`, which terminates the
/// session without a reply. Every other message, however broken, produces
/// exactly one response; no failure propagates past this boundary.
pub async fn dispatch(message: &str, provider: &impl ConnectionProvider) -> Option<ServerResponse> {
    if message == "BYE" {
        return None;
    }

    let response = match Command::parse(message) {
        Ok(command) => command.exec(provider).await,
        Err(err) => {
            debug!(%err, "rejected message: {:?}", message);
            err.into_response()
        }
    };

    Some(response)
}

#[derive(Debug, ThisError)]
pub enum ParseError {
    #[error("message carries no separator")]
    MissingSeparator,
    #[error("unknown command prefix {prefix}")]
    UnknownPrefix { prefix: String },
    #[error("payload does not decode into the expected shape: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl ParseError {
    /// Every protocol-level rejection maps onto one of three fixed
    /// messages.
    fn into_response(self) -> ServerResponse {
        let message = match self {
            ParseError::MissingSeparator => "Invalid prefix",
            ParseError::UnknownPrefix { .. } => "Unknown prefix",
            ParseError::MalformedPayload(_) => "Unknown format error",
        };

        ServerResponse::error(message)
    }
}
