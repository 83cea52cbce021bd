//! Alerting System
//!
//! Provides per-kind alert deduplication and an asynchronous delivery
//! worker so transport latency never stalls frame processing.

mod coordinator;
mod delivery;
mod kind;

pub use coordinator::{AlertConfig, AlertCoordinator, AlertState, MAX_DELIVERY_ATTEMPTS};
pub use delivery::{channel, AlertSink, DeliveryError, DeliveryWorker, LogSink};
pub use kind::{AlertKind, AlertMessage};
