//! [`Handler`] abstractions.

use std::future::Future;

/// Something executing an operation described by `Args`.
///
/// Queries of a service, as well as storage operations of a database, are all
/// expressed as [`Handler`]s parametrized by the operation they accept.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
