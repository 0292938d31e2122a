//! Application layer containing the checkout orchestration.
//!
//! This module defines the `PurchaseSubmitter`, the entry point a checkout
//! view uses to submit its purchase. Requests run on spawned `tokio` tasks and
//! report back through a `PurchaseHandle`.

pub mod submitter;
