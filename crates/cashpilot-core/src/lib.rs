//! cashpilot-core
//!
//! The forecast generation and alerting engine: projection of future cash
//! movements, weekly bucketing with running balances, risk alert derivation,
//! and the versioned-commit contract the pipeline persists through.
//! Depends on cashpilot-domain. No CLI, no HTTP, no direct storage backends.

pub mod alerting;
pub mod bucketing;
pub mod clock;
pub mod engine;
pub mod error;
pub mod projection;
pub mod store;
pub mod telemetry;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::ForecastEngine;
pub use error::{EngineError, StoreError};
pub use store::{AlertStore, ForecastStore, TransactionStore, UserContextStore};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        telemetry::init_tracing();
        tracing::info!("cashpilot core tracing initialized");
    });
}
