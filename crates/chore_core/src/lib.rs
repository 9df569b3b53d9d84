use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use shared::domain::Chore;
use store::ChoreStore;

/// Minimum trimmed length a chore name must have before it is sent upstream.
pub const MIN_NAME_LEN: usize = 4;

pub const VALIDATION_MESSAGE: &str = "chore name must be at least 4 characters";
const SAVE_FALLBACK_MESSAGE: &str = "could not save chore";
const LOAD_FALLBACK_MESSAGE: &str = "could not load chores";

/// Progress of the most recent upload or download operation. The two flags in
/// `UiState` are independent; neither blocks the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpStatus {
    #[default]
    Idle,
    InProgress,
    Success,
    Failure,
}

/// Latest snapshot published to observers. Created once at controller start
/// and thereafter mutated only through the controller operations; never
/// persisted locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub input: String,
    pub last_submitted: Option<Chore>,
    pub error_message: String,
    pub upload_status: OpStatus,
    pub download_status: OpStatus,
    pub chores: Vec<Chore>,
}

/// UI events the controller consumes, one per user action.
#[derive(Debug, Clone)]
pub enum ChoreEvent {
    NameEdited(String),
    SaveClicked,
    RefreshClicked,
    ItemDeleted(Chore),
}

/// Owns the chore-list state and sequences the three remote operations
/// (create, read, delete) against the document store.
///
/// Each operation runs to completion on its own; a refresh chained after a
/// create or delete starts only once the store acknowledged. Independently
/// triggered operations may overlap, and the final snapshot reflects
/// whichever completion wrote last.
pub struct ChoreController {
    store: Arc<dyn ChoreStore>,
    state: watch::Sender<UiState>,
}

impl ChoreController {
    /// Constructs the controller and performs the implicit initial refresh
    /// before returning.
    pub async fn start(store: Arc<dyn ChoreStore>) -> Arc<Self> {
        let (state, _) = watch::channel(UiState::default());
        let controller = Arc::new(Self { store, state });
        controller.refresh().await;
        controller
    }

    /// Hands out a receiver that always observes the most recent snapshot.
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub async fn handle_event(&self, event: ChoreEvent) {
        match event {
            ChoreEvent::NameEdited(name) => self.edit_name(name),
            ChoreEvent::SaveClicked => self.submit().await,
            ChoreEvent::RefreshClicked => self.refresh().await,
            ChoreEvent::ItemDeleted(chore) => self.delete_by_name(&chore.name).await,
        }
    }

    /// Replaces the pending input text. Local only, no store round trip.
    pub fn edit_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.state.send_modify(|state| state.input = name);
    }

    /// Validates and uploads the pending input, then refreshes the list.
    pub async fn submit(&self) {
        let name = self.state.borrow().input.trim().to_string();
        // character count, not byte length: non-ASCII names must not slip past
        if name.chars().count() < MIN_NAME_LEN {
            self.state.send_modify(|state| {
                state.upload_status = OpStatus::Failure;
                state.error_message = VALIDATION_MESSAGE.to_string();
            });
            return;
        }

        self.state
            .send_modify(|state| state.upload_status = OpStatus::InProgress);

        let chore = Chore::new(name);
        match self.store.insert(&chore).await {
            Ok(document_id) => {
                info!(document_id = %document_id, name = %chore.name, "chores: saved");
                self.state.send_modify(|state| {
                    state.upload_status = OpStatus::Success;
                    state.error_message.clear();
                    state.input.clear();
                    state.last_submitted = Some(chore);
                });
                self.refresh().await;
            }
            Err(err) => {
                warn!(name = %chore.name, "chores: save failed: {err}");
                self.state.send_modify(|state| {
                    state.upload_status = OpStatus::Failure;
                    state.error_message = fallback_if_empty(err.to_string(), SAVE_FALLBACK_MESSAGE);
                });
            }
        }
    }

    /// Fetches the full collection and replaces the list wholesale. An empty
    /// result set is a success, not a failure.
    pub async fn refresh(&self) {
        self.state
            .send_modify(|state| state.download_status = OpStatus::InProgress);

        match self.store.fetch_all().await {
            Ok(chores) => {
                debug!(count = chores.len(), "chores: list refreshed");
                self.state.send_modify(|state| {
                    state.chores = chores;
                    state.download_status = OpStatus::Success;
                    state.error_message.clear();
                });
            }
            Err(err) => {
                warn!("chores: refresh failed: {err}");
                self.state.send_modify(|state| {
                    state.download_status = OpStatus::Failure;
                    state.error_message = fallback_if_empty(err.to_string(), LOAD_FALLBACK_MESSAGE);
                });
            }
        }
    }

    /// Deletes the first record matching `name`, then refreshes. A name with
    /// no match completes silently with no state change.
    pub async fn delete_by_name(&self, name: &str) {
        let document_id = match self.store.find_first_by_name(name).await {
            Ok(Some(document_id)) => document_id,
            Ok(None) => {
                debug!(name = %name, "chores: delete skipped, no matching record");
                return;
            }
            Err(err) => {
                warn!(name = %name, "chores: delete lookup failed: {err}");
                self.state.send_modify(|state| {
                    state.error_message = fallback_if_empty(err.to_string(), SAVE_FALLBACK_MESSAGE);
                });
                return;
            }
        };

        match self.store.delete(&document_id).await {
            Ok(()) => {
                info!(document_id = %document_id, name = %name, "chores: deleted");
                self.refresh().await;
            }
            Err(err) => {
                warn!(document_id = %document_id, "chores: delete failed: {err}");
                self.state.send_modify(|state| {
                    state.error_message = fallback_if_empty(err.to_string(), SAVE_FALLBACK_MESSAGE);
                });
            }
        }
    }
}

fn fallback_if_empty(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
