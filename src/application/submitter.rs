use crate::domain::cart::CartEmptyFlag;
use crate::domain::lock::{ReentryPolicy, SubmissionLock};
use crate::domain::ports::{SharedContext, SharedTransport};
use crate::domain::response::PurchaseResponse;
use crate::error::{CheckoutError, Result};
use crate::interfaces::script;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

/// Submits the purchase of a checkout and applies what the shop answers.
///
/// A submitter belongs to one checkout view. The first call to
/// [`purchase_now`](Self::purchase_now) locks it for good, which makes
/// [`is_disabled`](Self::is_disabled) report `true` from then on.
pub struct PurchaseSubmitter {
    transport: SharedTransport,
    context: SharedContext,
    lock: SubmissionLock,
    policy: ReentryPolicy,
}

impl PurchaseSubmitter {
    /// Creates a new `PurchaseSubmitter` instance.
    ///
    /// # Arguments
    ///
    /// * `transport` - Sends the purchase request.
    /// * `context` - The page the returned instructions are applied to.
    pub fn new(transport: SharedTransport, context: SharedContext) -> Self {
        Self {
            transport,
            context,
            lock: SubmissionLock::new(),
            policy: ReentryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReentryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether the purchase trigger should be disabled.
    ///
    /// True when the cart is empty or a purchase has already been submitted.
    pub fn is_disabled(&self, is_empty: impl Into<CartEmptyFlag>) -> bool {
        is_empty.into().is_truthy() || self.lock.is_locked()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Submits the purchase to `endpoint`.
    ///
    /// The lock is engaged before anything else happens, then the request
    /// runs on a spawned task and this method returns at once. The returned
    /// handle resolves with the original response after its instructions
    /// have been applied, or with the first error on the way.
    ///
    /// Outside a tokio runtime nothing is sent and the handle resolves with
    /// `CheckoutError::Aborted`; the lock stays engaged either way.
    pub fn purchase_now(&self, endpoint: impl Into<String>) -> PurchaseHandle {
        let endpoint = endpoint.into();
        let already_locked = self.lock.engage();

        if already_locked && self.policy == ReentryPolicy::Reject {
            tracing::warn!(%endpoint, "purchase already submitted, refusing to resubmit");
            return PurchaseHandle::settled(Err(CheckoutError::AlreadySubmitted));
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!(%endpoint, error = %e, "no async runtime to submit the purchase on");
                return PurchaseHandle::settled(Err(CheckoutError::Aborted(e.to_string())));
            }
        };

        tracing::info!(%endpoint, resubmission = already_locked, "submitting purchase");
        let transport = Arc::clone(&self.transport);
        let context = Arc::clone(&self.context);
        let task = runtime.spawn(async move {
            let outcome = complete_purchase(transport, context, &endpoint).await;
            if let Err(e) = &outcome {
                tracing::error!(%endpoint, error = %e, "purchase failed");
            }
            outcome
        });
        PurchaseHandle::pending(task)
    }
}

async fn complete_purchase(
    transport: SharedTransport,
    context: SharedContext,
    endpoint: &str,
) -> Result<PurchaseResponse> {
    let response = transport.post(endpoint).await?;
    let instructions = script::instructions(response.expression()?)?;

    for instruction in &instructions {
        tracing::debug!(?instruction, "applying purchase instruction");
        context.execute(instruction).await?;
    }

    tracing::info!(
        status = response.status,
        instructions = instructions.len(),
        "purchase completed"
    );
    Ok(response)
}

/// Resolves once with the outcome of a purchase submission.
///
/// Dropping the handle does not cancel the request; the submission carries
/// on in the background.
pub struct PurchaseHandle {
    state: HandleState,
}

enum HandleState {
    Settled(Option<Result<PurchaseResponse>>),
    Pending(JoinHandle<Result<PurchaseResponse>>),
}

impl PurchaseHandle {
    fn settled(outcome: Result<PurchaseResponse>) -> Self {
        Self {
            state: HandleState::Settled(Some(outcome)),
        }
    }

    fn pending(task: JoinHandle<Result<PurchaseResponse>>) -> Self {
        Self {
            state: HandleState::Pending(task),
        }
    }

    pub fn is_finished(&self) -> bool {
        match &self.state {
            HandleState::Settled(_) => true,
            HandleState::Pending(task) => task.is_finished(),
        }
    }
}

impl Future for PurchaseHandle {
    type Output = Result<PurchaseResponse>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            HandleState::Settled(outcome) => Poll::Ready(outcome.take().unwrap_or_else(|| {
                Err(CheckoutError::Aborted(
                    "completion handle polled after it resolved".to_string(),
                ))
            })),
            HandleState::Pending(task) => Pin::new(task)
                .poll(cx)
                .map(|joined| joined.unwrap_or_else(|e| Err(CheckoutError::Aborted(e.to_string())))),
        }
    }
}
