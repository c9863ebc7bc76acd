use serde::Deserialize;
use tracing::{error, warn};

use crate::commands::executable::Executable;
use crate::pool::ConnectionProvider;
use crate::response::ServerResponse;

/// Apply a signed delta to an account balance, then report the balance as
/// re-read from the database, never a locally computed value.
///
/// Wire form: `WITHDRAWAL {"account_id":42,"value":-125.5}`
#[derive(Debug, PartialEq, Deserialize)]
pub struct Withdrawal {
    pub account_id: i64,
    pub value: f64,
}

impl Executable for Withdrawal {
    async fn exec(self, provider: &impl ConnectionProvider) -> ServerResponse {
        let mut conn = match provider.acquire().await {
            Ok(conn) => conn,
            Err(err) => {
                warn!(%err, "cannot acquire a connection from the pool");
                return ServerResponse::error("Server-side error. Please retry later.");
            }
        };

        // The update and the read below are two independent statements, not
        // one transaction; a concurrent writer in between shows up in the
        // returned balance.
        let update = sqlx::query("UPDATE accounts SET balance = balance + ? WHERE account_id = ?")
            .bind(self.value)
            .bind(self.account_id)
            .execute(&mut *conn)
            .await;

        if let Err(err) = update {
            // Non-fatal: the read below is the sole basis of truth handed
            // back to the caller.
            warn!(%err, "balance update failed");
        }

        let balance = sqlx::query_scalar::<_, f64>(
            "SELECT balance FROM accounts WHERE account_id = ?",
        )
        .bind(self.account_id)
        .fetch_optional(&mut *conn)
        .await;

        match balance {
            Ok(Some(balance)) => ServerResponse::Withdrawal { balance },
            Ok(None) => ServerResponse::error("Database error"),
            Err(err) => {
                error!(%err, "balance re-read failed");
                ServerResponse::error("Database error")
            }
        }
    }
}
