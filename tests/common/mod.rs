#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use shop_checkout::domain::ports::PurchaseTransport;
use shop_checkout::domain::response::PurchaseResponse;
use shop_checkout::error::Result;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

/// Hands out queued bodies, one per request, and holds each request until
/// the test opens the gate.
pub struct GatedTransport {
    bodies: Mutex<VecDeque<Value>>,
    endpoints: Mutex<Vec<String>>,
    gate: Semaphore,
}

impl GatedTransport {
    pub fn new(bodies: impl IntoIterator<Item = Value>) -> Self {
        Self {
            bodies: Mutex::new(bodies.into_iter().collect()),
            endpoints: Mutex::new(Vec::new()),
            gate: Semaphore::new(0),
        }
    }

    /// Same as `new`, but requests answer straight away.
    pub fn open(bodies: impl IntoIterator<Item = Value>) -> Self {
        let transport = Self::new(bodies);
        transport.gate.add_permits(1024);
        transport
    }

    pub fn release(&self, requests: usize) {
        self.gate.add_permits(requests);
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.endpoints.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.endpoints.lock().unwrap().len()
    }
}

#[async_trait]
impl PurchaseTransport for GatedTransport {
    async fn post(&self, endpoint: &str) -> Result<PurchaseResponse> {
        self.endpoints.lock().unwrap().push(endpoint.to_string());
        let permit = self.gate.acquire().await.expect("gate closed");
        permit.forget();
        let body = self
            .bodies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no response queued");
        Ok(PurchaseResponse::new(200, body))
    }
}

/// Never answers.
#[derive(Default)]
pub struct StalledTransport {
    pub requests: AtomicUsize,
}

#[async_trait]
impl PurchaseTransport for StalledTransport {
    async fn post(&self, _endpoint: &str) -> Result<PurchaseResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

/// Polls until `condition` holds, giving spawned tasks a chance to run.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}
