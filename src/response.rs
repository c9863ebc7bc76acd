use serde::Serialize;

/// Inner domain status for the operations that report application rather
/// than a payload: `OK` when the mutation applied, `KO` when the statement
/// ran without applying anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "KO")]
    Ko,
}

/// The one response produced per non-terminating request.
///
/// Responses are two-tiered: the outer `OK`/`ERR` envelope tells whether the
/// request could be carried out at all, and the inner JSON payload carries
/// the operation's own result. `Error` is the only variant rendered under
/// `ERR`; a domain-level `KO` still travels under `OK` because the
/// operation itself executed cleanly.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServerResponse {
    Error { message: String },
    Consult { balance: f64 },
    NewCustomer { status: Status },
    Withdrawal { balance: f64 },
    Delete { status: Status },
}

impl ServerResponse {
    pub fn error(message: impl Into<String>) -> ServerResponse {
        ServerResponse::Error {
            message: message.into(),
        }
    }

    /// Render the full wire line: the envelope followed by the JSON payload
    /// of the inner variant.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        let envelope = match self {
            ServerResponse::Error { .. } => "ERR",
            _ => "OK",
        };

        Ok(format!("{} {}", envelope, serde_json::to_string(self)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_renders_under_err() {
        let response = ServerResponse::error("Account not found");

        assert_eq!(
            response.render().unwrap(),
            "ERR {\"message\":\"Account not found\"}"
        );
    }

    #[test]
    fn balance_renders_under_ok() {
        let response = ServerResponse::Consult { balance: 75.0 };

        assert_eq!(response.render().unwrap(), "OK {\"balance\":75.0}");
    }

    #[test]
    fn domain_ko_still_renders_under_ok() {
        let response = ServerResponse::Delete { status: Status::Ko };

        assert_eq!(response.render().unwrap(), "OK {\"status\":\"KO\"}");
    }

    #[test]
    fn status_serializes_uppercase() {
        let response = ServerResponse::NewCustomer { status: Status::Ok };

        assert_eq!(response.render().unwrap(), "OK {\"status\":\"OK\"}");
    }
}
