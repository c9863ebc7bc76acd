use std::future::Future;

use crate::pool::ConnectionProvider;
use crate::response::ServerResponse;

/// An operation executed against a connection checked out from the
/// provider. Handlers classify every outcome themselves; the response is
/// the only thing that leaves.
pub trait Executable {
    fn exec(
        self,
        provider: &impl ConnectionProvider,
    ) -> impl Future<Output = ServerResponse> + Send;
}
