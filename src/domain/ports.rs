use super::instruction::Instruction;
use super::response::PurchaseResponse;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Sends the purchase request to the shop.
#[async_trait]
pub trait PurchaseTransport: Send + Sync {
    /// POSTs to `endpoint` without a body and returns the decoded answer.
    async fn post(&self, endpoint: &str) -> Result<PurchaseResponse>;
}

/// The page a purchase instruction is applied to.
#[async_trait]
pub trait ExecutionContext: Send + Sync {
    async fn execute(&self, instruction: &Instruction) -> Result<()>;
}

pub type SharedTransport = Arc<dyn PurchaseTransport>;
pub type SharedContext = Arc<dyn ExecutionContext>;
