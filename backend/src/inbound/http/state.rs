//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{StockCommand, StockQuery};
use crate::domain::{Error, ErrorCode};

/// Default cap on request bodies (50 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// How validation failures are reported to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Validation failures answer 400.
    #[default]
    Standard,
    /// Every non-404 failure answers 500, as older clients expect.
    Legacy,
}

impl ErrorPolicy {
    /// Pick the policy for the `legacy_status_codes` setting.
    pub fn from_legacy_flag(legacy: bool) -> Self {
        if legacy { Self::Legacy } else { Self::Standard }
    }

    /// Adjust `error` before it leaves the adapter.
    ///
    /// # Examples
    /// ```
    /// use homestock::domain::{Error, ErrorCode};
    /// use homestock::inbound::http::state::ErrorPolicy;
    ///
    /// let err = ErrorPolicy::Legacy.apply(Error::invalid_request("bad"));
    /// assert_eq!(err.code(), ErrorCode::InternalError);
    /// ```
    pub fn apply(self, error: Error) -> Error {
        match (self, error.code()) {
            (Self::Legacy, ErrorCode::InvalidRequest) => error.with_code(ErrorCode::InternalError),
            _ => error,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub stock_commands: Arc<dyn StockCommand>,
    pub stock_query: Arc<dyn StockQuery>,
    pub error_policy: ErrorPolicy,
    pub max_body_bytes: usize,
}

impl HttpState {
    /// Construct state with the standard error policy and body limit.
    pub fn new(stock_commands: Arc<dyn StockCommand>, stock_query: Arc<dyn StockQuery>) -> Self {
        Self {
            stock_commands,
            stock_query,
            error_policy: ErrorPolicy::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Override the error policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Override the request body limit.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}
