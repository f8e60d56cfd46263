//! PlanStore - actor that owns the plan slot
//!
//! Processes commands via channels so concurrent generation tasks settle
//! the slot one at a time.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use super::messages::{StoreCommand, StoreError, StoreResponse};
use super::state::{Applied, PlanSnapshot, PlanState, PlanStatus, RequestToken};
use crate::domain::TripPlanResponse;
use crate::form::PlanForm;

/// Event broadcast when the slot changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Status moved (including success -> success with a new plan)
    StatusChanged { status: PlanStatus },
    /// An outcome arrived for a superseded request and was dropped
    StaleDiscarded { token: RequestToken },
}

/// Handle to send commands to the PlanStore
#[derive(Clone)]
pub struct PlanStore {
    tx: mpsc::Sender<StoreCommand>,
    /// Broadcast sender for change notifications
    event_tx: broadcast::Sender<StoreEvent>,
}

impl PlanStore {
    /// Spawn a new PlanStore actor on the current tokio runtime
    pub fn spawn() -> Self {
        debug!("spawn: called");
        let (tx, rx) = mpsc::channel(64);
        let (event_tx, _) = broadcast::channel(64);

        tokio::spawn(actor_loop(PlanState::new(), rx, event_tx.clone()));

        info!("PlanStore spawned");
        Self { tx, event_tx }
    }

    /// Subscribe to change events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> StoreCommand) -> StoreResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| StoreError::ChannelError)?;
        reply_rx.await.map_err(|_| StoreError::ChannelError)
    }

    /// Start a generation attempt (`-> loading`) and get its token
    pub async fn begin(&self) -> StoreResponse<RequestToken> {
        debug!("begin: called");
        self.request(|reply| StoreCommand::Begin { reply }).await
    }

    /// Settle `token` with a generated plan
    pub async fn resolve(&self, token: RequestToken, plan: TripPlanResponse) -> StoreResponse<Applied> {
        debug!(token = token.value(), "resolve: called");
        self.request(|reply| StoreCommand::Resolve {
            token,
            plan: Box::new(plan),
            reply,
        })
        .await
    }

    /// Settle `token` with an error message
    pub async fn reject(&self, token: RequestToken, message: impl Into<String>) -> StoreResponse<Applied> {
        debug!(token = token.value(), "reject: called");
        let message = message.into();
        self.request(|reply| StoreCommand::Reject { token, message, reply })
            .await
    }

    /// Show a plan that came from a share link
    pub async fn show(&self, plan: TripPlanResponse) -> StoreResponse<()> {
        debug!("show: called");
        self.request(|reply| StoreCommand::Show {
            plan: Box::new(plan),
            reply,
        })
        .await
    }

    /// Back to idle with no plan
    pub async fn reset(&self) -> StoreResponse<()> {
        debug!("reset: called");
        self.request(|reply| StoreCommand::Reset { reply }).await
    }

    /// Remember the submitted form values
    pub async fn set_condition(&self, condition: PlanForm) -> StoreResponse<()> {
        debug!("set_condition: called");
        self.request(|reply| StoreCommand::SetCondition {
            condition: Box::new(condition),
            reply,
        })
        .await
    }

    pub async fn clear_condition(&self) -> StoreResponse<()> {
        debug!("clear_condition: called");
        self.request(|reply| StoreCommand::ClearCondition { reply }).await
    }

    /// Copy of the current slot
    pub async fn snapshot(&self) -> StoreResponse<PlanSnapshot> {
        self.request(|reply| StoreCommand::Snapshot { reply }).await
    }

    pub async fn status(&self) -> StoreResponse<PlanStatus> {
        Ok(self.snapshot().await?.status)
    }

    /// Stop the actor; later calls fail with `ChannelError`
    pub async fn shutdown(&self) -> StoreResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(StoreCommand::Shutdown)
            .await
            .map_err(|_| StoreError::ChannelError)
    }
}

async fn actor_loop(
    mut state: PlanState,
    mut rx: mpsc::Receiver<StoreCommand>,
    event_tx: broadcast::Sender<StoreEvent>,
) {
    debug!("PlanStore actor started");

    let notify = |event: StoreEvent| {
        // No subscribers is fine
        let _ = event_tx.send(event);
    };

    while let Some(cmd) = rx.recv().await {
        let before = state.status();
        match cmd {
            StoreCommand::Begin { reply } => {
                let token = state.begin();
                debug!(token = token.value(), "actor_loop: Begin command");
                let _ = reply.send(token);
            }

            StoreCommand::Resolve { token, plan, reply } => {
                debug!(token = token.value(), "actor_loop: Resolve command");
                let applied = state.resolve(token, *plan);
                match applied {
                    Applied::Current => notify(StoreEvent::StatusChanged { status: state.status() }),
                    Applied::Stale => notify(StoreEvent::StaleDiscarded { token }),
                }
                let _ = reply.send(applied);
                continue;
            }

            StoreCommand::Reject { token, message, reply } => {
                debug!(token = token.value(), %message, "actor_loop: Reject command");
                let applied = state.reject(token, message);
                match applied {
                    Applied::Current => notify(StoreEvent::StatusChanged { status: state.status() }),
                    Applied::Stale => notify(StoreEvent::StaleDiscarded { token }),
                }
                let _ = reply.send(applied);
                continue;
            }

            StoreCommand::Show { plan, reply } => {
                debug!("actor_loop: Show command");
                state.show(*plan);
                notify(StoreEvent::StatusChanged { status: state.status() });
                let _ = reply.send(());
                continue;
            }

            StoreCommand::Reset { reply } => {
                debug!("actor_loop: Reset command");
                state.reset();
                let _ = reply.send(());
            }

            StoreCommand::SetCondition { condition, reply } => {
                debug!("actor_loop: SetCondition command");
                state.set_condition(*condition);
                let _ = reply.send(());
            }

            StoreCommand::ClearCondition { reply } => {
                debug!("actor_loop: ClearCondition command");
                state.clear_condition();
                let _ = reply.send(());
            }

            StoreCommand::Snapshot { reply } => {
                let _ = reply.send(state.snapshot());
            }

            StoreCommand::Shutdown => {
                info!("PlanStore shutting down");
                break;
            }
        }

        if state.status() != before {
            notify(StoreEvent::StatusChanged { status: state.status() });
        }
    }

    debug!("PlanStore actor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::naha_response;

    #[tokio::test]
    async fn test_store_lifecycle() {
        let store = PlanStore::spawn();
        assert_eq!(store.status().await.unwrap(), PlanStatus::Idle);

        let token = store.begin().await.unwrap();
        assert_eq!(store.status().await.unwrap(), PlanStatus::Loading);

        let applied = store.resolve(token, naha_response()).await.unwrap();
        assert_eq!(applied, Applied::Current);

        let snap = store.snapshot().await.unwrap();
        assert_eq!(snap.status, PlanStatus::Success);
        assert_eq!(snap.plan, Some(naha_response()));

        store.reset().await.unwrap();
        assert!(store.snapshot().await.unwrap().plan.is_none());
    }

    #[tokio::test]
    async fn test_store_discards_stale_outcome() {
        let store = PlanStore::spawn();
        let first = store.begin().await.unwrap();
        let second = store.begin().await.unwrap();

        assert_eq!(store.reject(second, "second failed").await.unwrap(), Applied::Current);
        assert_eq!(store.resolve(first, naha_response()).await.unwrap(), Applied::Stale);

        let snap = store.snapshot().await.unwrap();
        assert_eq!(snap.status, PlanStatus::Error);
        assert_eq!(snap.error.as_deref(), Some("second failed"));
        assert!(snap.plan.is_none());
    }

    #[tokio::test]
    async fn test_store_events() {
        let store = PlanStore::spawn();
        let mut events = store.subscribe();

        let stale = store.begin().await.unwrap();
        let token = store.begin().await.unwrap();
        store.resolve(token, naha_response()).await.unwrap();
        store.resolve(stale, naha_response()).await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            StoreEvent::StatusChanged {
                status: PlanStatus::Loading
            }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            StoreEvent::StatusChanged {
                status: PlanStatus::Success
            }
        );
        assert_eq!(events.recv().await.unwrap(), StoreEvent::StaleDiscarded { token: stale });
    }

    #[tokio::test]
    async fn test_condition_round_trip() {
        let store = PlanStore::spawn();
        let mut form = PlanForm::default();
        form.departure = "那覇空港".to_string();

        store.set_condition(form.clone()).await.unwrap();
        assert_eq!(store.snapshot().await.unwrap().condition, Some(form));

        store.clear_condition().await.unwrap();
        assert_eq!(store.snapshot().await.unwrap().condition, None);
    }

    #[tokio::test]
    async fn test_shutdown_closes_store() {
        let store = PlanStore::spawn();
        store.shutdown().await.unwrap();
        tokio::task::yield_now().await;

        assert!(matches!(store.snapshot().await, Err(StoreError::ChannelError)));
    }
}
