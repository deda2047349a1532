//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::resolver::{Reply, ReplyResolver, ResolverError};

/// A no-op resolver for tests that don't need real replies.
pub struct NoopResolver;

#[async_trait]
impl ReplyResolver for NoopResolver {
    fn name(&self) -> &str {
        "noop"
    }

    async fn resolve(
        &self,
        _text: &str,
        _sender: Sender<Reply>,
    ) -> Result<(), ResolverError> {
        Ok(())
    }
}

/// Creates a test App for a named user ("Ada").
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(NoopResolver), Some("Ada".to_string()))
}

/// Creates a test App with no user name (guest session).
pub fn guest_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(NoopResolver), None)
}
