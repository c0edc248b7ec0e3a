//! Handler registry for dispatching frames by command code.
//!
//! # Example
//!
//! ```
//! use maxpb::dispatch::HandlerRegistry;
//! use maxpb::protocol::CommandCode;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register(CommandCode::Position, |frame, _ctx| async move {
//!     assert_eq!(frame.message_type(), 0x0001);
//!     Ok(())
//! });
//!
//! assert!(registry.contains(CommandCode::Position));
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use super::ReplyContext;
use crate::error::{MaxPbError, Result};
use crate::protocol::{CommandCode, Frame};

/// Result type for handler functions.
pub type HandlerResult = Result<()>;

/// Boxed future for handler results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for frame handlers.
///
/// Payload deserialization happens inside the handler; the registry only
/// routes on `message_type`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, frame: Frame, ctx: ReplyContext) -> BoxFuture<'static, HandlerResult>;
}

/// Adapter from an async closure to [`Handler`].
pub struct FnHandler<F> {
    handler: F,
}

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Frame, ReplyContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, frame: Frame, ctx: ReplyContext) -> BoxFuture<'static, HandlerResult> {
        Box::pin((self.handler)(frame, ctx))
    }
}

/// Registry mapping command codes to handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<CommandCode, Box<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an async closure for a command. Replaces any previous handler.
    pub fn register<F, Fut>(&mut self, command: CommandCode, handler: F)
    where
        F: Fn(Frame, ReplyContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register_handler(command, FnHandler { handler });
    }

    /// Register any [`Handler`] implementation.
    pub fn register_handler<H: Handler>(&mut self, command: CommandCode, handler: H) {
        if self.handlers.insert(command, Box::new(handler)).is_some() {
            tracing::debug!("Replaced handler for {}", command);
        }
    }

    pub fn get_handler(&self, command: CommandCode) -> Option<&dyn Handler> {
        self.handlers.get(&command).map(|h| h.as_ref())
    }

    pub fn contains(&self, command: CommandCode) -> bool {
        self.handlers.contains_key(&command)
    }

    /// Registered commands in wire-value order.
    pub fn commands(&self) -> Vec<CommandCode> {
        let mut commands: Vec<_> = self.handlers.keys().copied().collect();
        commands.sort();
        commands
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Route a frame to its handler.
    ///
    /// Fails with `UnknownCommand` when the message type is outside the
    /// command table and `HandlerNotFound` when nothing is registered for it.
    pub async fn dispatch(&self, frame: Frame, ctx: ReplyContext) -> Result<()> {
        let command = frame.command()?;
        let handler = self
            .get_handler(command)
            .ok_or(MaxPbError::HandlerNotFound(command))?;

        handler.call(frame, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PackageFormat;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn frame(message_type: u16) -> Frame {
        Frame::new(message_type, PackageFormat::PLAIN, &b"p"[..]).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = HandlerRegistry::new();
        registry.register(CommandCode::Status, |_, _| async { Ok(()) });

        assert!(registry.get_handler(CommandCode::Status).is_some());
        assert!(registry.get_handler(CommandCode::Position).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_commands_sorted() {
        let mut registry = HandlerRegistry::new();
        registry.register(CommandCode::Disconnect, |_, _| async { Ok(()) });
        registry.register(CommandCode::KeepAlive, |_, _| async { Ok(()) });
        registry.register(CommandCode::Ack, |_, _| async { Ok(()) });

        assert_eq!(
            registry.commands(),
            vec![CommandCode::KeepAlive, CommandCode::Ack, CommandCode::Disconnect]
        );
    }

    #[tokio::test]
    async fn test_dispatch_calls_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = HandlerRegistry::new();
        let counter = calls.clone();
        registry.register(CommandCode::Position, move |frame, _| {
            let counter = counter.clone();
            async move {
                assert_eq!(frame.payload(), b"p");
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        registry
            .dispatch(frame(0x0001), ReplyContext::detached())
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let registry = HandlerRegistry::new();
        let err = registry
            .dispatch(frame(0x0040), ReplyContext::detached())
            .await
            .unwrap_err();

        assert!(matches!(err, MaxPbError::UnknownCommand(0x0040)));
    }

    #[tokio::test]
    async fn test_dispatch_handler_not_found() {
        let registry = HandlerRegistry::new();
        let err = registry
            .dispatch(frame(0x0011), ReplyContext::detached())
            .await
            .unwrap_err();

        assert!(matches!(err, MaxPbError::HandlerNotFound(CommandCode::Status)));
    }

    #[tokio::test]
    async fn test_register_replaces() {
        let mut registry = HandlerRegistry::new();
        registry.register(CommandCode::Ack, |_, _| async {
            Err(MaxPbError::ConnectionClosed)
        });
        registry.register(CommandCode::Ack, |_, _| async { Ok(()) });

        assert_eq!(registry.len(), 1);
        assert!(registry
            .dispatch(frame(0x0002), ReplyContext::detached())
            .await
            .is_ok());
    }
}
