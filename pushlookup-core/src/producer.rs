//! Push producer handle.

use crate::Identifier;

/// Handle to a producer that is about to push a resource.
///
/// The handle is owned exclusively by the lookup that checks its resource.
/// Dropping it without calling [`cancel`](PushProducer::cancel) lets the push
/// proceed.
///
/// # Example
///
/// ```
/// use pushlookup_core::{Identifier, PushProducer};
///
/// struct Stream {
///     url: Identifier,
///     reset: bool,
/// }
///
/// impl PushProducer for Stream {
///     fn identifier(&self) -> &Identifier {
///         &self.url
///     }
///
///     fn cancel(&mut self) {
///         self.reset = true;
///     }
/// }
/// ```
pub trait PushProducer: Send + Sync {
    /// Identifier of the resource this producer is going to push.
    fn identifier(&self) -> &Identifier;

    /// Cancels the push. Called at most once, and only when the resource is
    /// already cached.
    fn cancel(&mut self);
}

impl<P> PushProducer for Box<P>
where
    P: PushProducer + ?Sized,
{
    fn identifier(&self) -> &Identifier {
        (**self).identifier()
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }
}
