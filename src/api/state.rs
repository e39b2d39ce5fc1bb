//! Application state for the API server

use crate::{Config, DocumentConverter};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the conversion service and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The document conversion service
    pub converter: Arc<DocumentConverter>,

    /// Configuration (read access only; the service owns its own copy)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(converter: Arc<DocumentConverter>, config: Arc<Config>) -> Self {
        Self { converter, config }
    }
}
