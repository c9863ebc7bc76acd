use serde::Deserialize;
use tracing::{error, warn};

use crate::commands::executable::Executable;
use crate::pool::ConnectionProvider;
use crate::response::{ServerResponse, Status};

/// Remove one account row.
///
/// `KO` means the statement ran cleanly and matched nothing; a statement
/// that could not run at all is an `Error` instead.
///
/// Wire form: `DELETE {"account_id":42}`
#[derive(Debug, PartialEq, Deserialize)]
pub struct Delete {
    pub account_id: i64,
}

impl Executable for Delete {
    async fn exec(self, provider: &impl ConnectionProvider) -> ServerResponse {
        let mut conn = match provider.acquire().await {
            Ok(conn) => conn,
            Err(err) => {
                warn!(%err, "cannot acquire a connection from the pool");
                return ServerResponse::error("Server-side error. Please retry later.");
            }
        };

        let result = sqlx::query("DELETE FROM accounts WHERE account_id = ?")
            .bind(self.account_id)
            .execute(&mut *conn)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 1 => ServerResponse::Delete { status: Status::Ok },
            Ok(_) => ServerResponse::Delete { status: Status::Ko },
            Err(err) => {
                error!(%err, "account deletion failed");
                ServerResponse::error("Database error")
            }
        }
    }
}
