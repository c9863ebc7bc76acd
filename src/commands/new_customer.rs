use serde::Deserialize;
use tracing::{error, warn};

use crate::commands::executable::Executable;
use crate::pool::ConnectionProvider;
use crate::response::{ServerResponse, Status};

/// Insert a customer row, assigning its id as max(existing id) + 1 inside
/// the statement itself. Concurrent inserts can race on that subselect.
///
/// Wire form: `NEWCUSTOMER {"first_name":"Ada","last_name":"Lovelace",
/// "age":36,"sex":"F","activity":"mathematician","address":"London"}`
#[derive(Debug, PartialEq, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub sex: String,
    pub activity: String,
    pub address: String,
}

impl Executable for NewCustomer {
    async fn exec(self, provider: &impl ConnectionProvider) -> ServerResponse {
        let mut conn = match provider.acquire().await {
            Ok(conn) => conn,
            Err(err) => {
                warn!(%err, "cannot acquire a connection from the pool");
                return ServerResponse::error("Server-side error. Please retry later.");
            }
        };

        let result = sqlx::query(
            "INSERT INTO customers (customer_id, first_name, last_name, age, sex, activity, address)
             VALUES ((SELECT MAX(customer_id) FROM customers) + 1, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(self.age)
        .bind(&self.sex)
        .bind(&self.activity)
        .bind(&self.address)
        .execute(&mut *conn)
        .await;

        // Both KO causes answer the same status on the wire; the logs keep
        // them apart.
        let status = match result {
            Ok(done) if done.rows_affected() == 1 => Status::Ok,
            Ok(done) => {
                warn!(rows = done.rows_affected(), "customer insert applied no row");
                Status::Ko
            }
            Err(err) => {
                error!(%err, "customer insert failed");
                Status::Ko
            }
        };

        ServerResponse::NewCustomer { status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::pool::testing::ExhaustedPool;
    use crate::pool::AccountPool;

    fn ada() -> NewCustomer {
        NewCustomer {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            age: 36,
            sex: "F".to_string(),
            activity: "mathematician".to_string(),
            address: "London".to_string(),
        }
    }

    async fn seeded_pool() -> AccountPool {
        let pool = AccountPool::with_max_connections("sqlite::memory:", 1)
            .await
            .unwrap();
        pool.ensure_schema().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        sqlx::query(
            "INSERT INTO customers (customer_id, first_name, last_name, age, sex, activity, address)
             VALUES (41, 'Charles', 'Babbage', 44, 'M', 'engineer', 'London')",
        )
        .execute(&mut *conn)
        .await
        .unwrap();

        pool
    }

    #[test]
    fn parse() {
        let cmd = Command::parse(
            "NEWCUSTOMER {\"first_name\":\"Ada\",\"last_name\":\"Lovelace\",\"age\":36,\
             \"sex\":\"F\",\"activity\":\"mathematician\",\"address\":\"London\"}",
        )
        .unwrap();

        assert_eq!(cmd, Command::NewCustomer(ada()));
    }

    #[tokio::test]
    async fn assigns_the_next_id() {
        let pool = seeded_pool().await;

        let response = ada().exec(&pool).await;

        assert_eq!(response, ServerResponse::NewCustomer { status: Status::Ok });

        let mut conn = pool.acquire().await.unwrap();
        let first_name = sqlx::query_scalar::<_, String>(
            "SELECT first_name FROM customers WHERE customer_id = ?",
        )
        .bind(42)
        .fetch_one(&mut *conn)
        .await
        .unwrap();

        assert_eq!(first_name, "Ada");
    }

    #[tokio::test]
    async fn fields_with_quotes_stay_data() {
        let pool = seeded_pool().await;

        let mut customer = ada();
        customer.address = "O'Connell Street 1); DROP TABLE customers;--".to_string();

        let response = customer.exec(&pool).await;

        assert_eq!(response, ServerResponse::NewCustomer { status: Status::Ok });

        let mut conn = pool.acquire().await.unwrap();
        let address = sqlx::query_scalar::<_, String>(
            "SELECT address FROM customers WHERE customer_id = ?",
        )
        .bind(42)
        .fetch_one(&mut *conn)
        .await
        .unwrap();

        assert_eq!(address, "O'Connell Street 1); DROP TABLE customers;--");
    }

    #[tokio::test]
    async fn pool_exhausted() {
        let response = ada().exec(&ExhaustedPool).await;

        assert_eq!(
            response,
            ServerResponse::error("Server-side error. Please retry later.")
        );
    }
}
