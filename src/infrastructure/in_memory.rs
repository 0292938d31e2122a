use crate::domain::instruction::Instruction;
use crate::domain::ports::ExecutionContext;
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// What the page looks like after purchase instructions have been applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageSnapshot {
    /// Address the page was sent to, if any.
    pub location: Option<String>,
    /// Messages shown to the customer, oldest first.
    pub notifications: Vec<String>,
    pub reloads: u32,
    /// Named values set on the page's global state.
    pub globals: BTreeMap<String, Value>,
}

/// A thread-safe in-memory page.
///
/// Uses `Arc<RwLock<PageSnapshot>>` so clones share the same state; hand one
/// clone to the submitter and keep another to inspect the result.
#[derive(Default, Clone)]
pub struct InMemoryPage {
    state: Arc<RwLock<PageSnapshot>>,
}

impl InMemoryPage {
    /// Creates a blank page.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> PageSnapshot {
        self.state.read().await.clone()
    }

    pub async fn global(&self, name: &str) -> Option<Value> {
        self.state.read().await.globals.get(name).cloned()
    }
}

#[async_trait]
impl ExecutionContext for InMemoryPage {
    async fn execute(&self, instruction: &Instruction) -> Result<()> {
        let mut page = self.state.write().await;
        match instruction {
            Instruction::Redirect { url } => page.location = Some(url.clone()),
            Instruction::Notify { message } => page.notifications.push(message.clone()),
            Instruction::Assign { name, value } => {
                page.globals.insert(name.clone(), value.clone());
            }
            Instruction::Reload => page.reloads += 1,
            Instruction::Noop => {}
        }
        Ok(())
    }
}
