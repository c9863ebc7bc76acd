use serde::Deserialize;
use tracing::{error, warn};

use crate::commands::executable::Executable;
use crate::pool::ConnectionProvider;
use crate::response::ServerResponse;

/// Read the stored balance of one account.
///
/// Wire form: `CONSULT {"account_id":42}`
#[derive(Debug, PartialEq, Deserialize)]
pub struct Consult {
    pub account_id: i64,
}

impl Executable for Consult {
    async fn exec(self, provider: &impl ConnectionProvider) -> ServerResponse {
        let mut conn = match provider.acquire().await {
            Ok(conn) => conn,
            Err(err) => {
                warn!(%err, "cannot acquire a connection from the pool");
                return ServerResponse::error("Server-side error. Please retry later.");
            }
        };

        let balance = sqlx::query_scalar::<_, f64>(
            "SELECT balance FROM accounts WHERE account_id = ?",
        )
        .bind(self.account_id)
        .fetch_optional(&mut *conn)
        .await;

        match balance {
            Ok(Some(balance)) => ServerResponse::Consult { balance },
            // An id with no row is a domain miss, not an infrastructure failure.
            Ok(None) => ServerResponse::error("Account not found"),
            Err(err) => {
                error!(%err, "balance lookup failed");
                ServerResponse::error("Database error")
            }
        }
    }
}
