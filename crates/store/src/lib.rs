//! Process-wide job state: the in-memory job store and the admission
//! controller that bounds concurrently running pipelines.
//!
//! Both are constructed once at startup and injected as `Arc` handles.
//! All state lives for exactly the process lifetime; there is no
//! persistence and no recovery after restart.

pub mod admission;
pub mod store;

pub use admission::{AdmissionController, AdmissionSlot};
pub use store::{JobStore, StoreStats};
