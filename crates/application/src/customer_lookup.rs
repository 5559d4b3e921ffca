use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hvacdesk_core::AppResult;
use hvacdesk_domain::{Customer, CustomerResource, Resource};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::CollectionGateway;
use crate::list_fetcher::{collection_items, decode_record};

/// Quiet period after the last contact-number edit before the lookup runs.
pub const CUSTOMER_LOOKUP_DEBOUNCE: Duration = Duration::from_millis(500);

/// Outcome of the latest customer lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupState {
    /// No lookup requested, or the number was cleared.
    Idle,
    /// Waiting for the quiet period or the response.
    Pending,
    /// An existing customer has this number.
    Found(Box<Customer>),
    /// No customer matched, or the lookup failed.
    NotFound,
}

/// Searches customers by phone and returns the first match.
pub async fn find_customer_by_phone(
    gateway: &dyn CollectionGateway,
    phone: &str,
) -> AppResult<Option<Customer>> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(None);
    }

    let query = vec![("search".to_owned(), phone.to_owned())];
    let body = gateway.list(CustomerResource::COLLECTION_PATH, &query).await?;
    collection_items(body)
        .into_iter()
        .next()
        .map(decode_record::<CustomerResource>)
        .transpose()
}

/// Debounced customer lookup behind an interactive lead form's contact field.
///
/// Each edit aborts the pending lookup before scheduling a new one. Every
/// lookup carries a generation, and only the latest generation publishes, so
/// a task that outlives its abort never overwrites a newer state.
pub struct CustomerLookup {
    gateway: Arc<dyn CollectionGateway>,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<LookupState>>,
}

impl CustomerLookup {
    /// Creates an idle lookup.
    #[must_use]
    pub fn new(gateway: Arc<dyn CollectionGateway>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(LookupState::Idle);
        Self {
            gateway,
            debounce,
            pending: None,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
        }
    }

    /// Schedules a lookup for `contact`, cancelling the previous one.
    ///
    /// Must be called inside a tokio runtime.
    pub fn contact_changed(&mut self, contact: &str) {
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let contact = contact.trim().to_owned();
        if contact.is_empty() {
            self.state.send_replace(LookupState::Idle);
            return;
        }

        self.state.send_replace(LookupState::Pending);
        let gateway = Arc::clone(&self.gateway);
        let state = Arc::clone(&self.state);
        let generation = Arc::clone(&self.generation);
        let debounce = self.debounce;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            debug!(contact = %contact, "looking up customer by phone");
            let outcome = match find_customer_by_phone(gateway.as_ref(), &contact).await {
                Ok(Some(customer)) => LookupState::Found(Box::new(customer)),
                Ok(None) => LookupState::NotFound,
                Err(error) => {
                    warn!(error = %error, "customer lookup failed");
                    LookupState::NotFound
                }
            };
            if !publish_if_current(&state, &generation, ticket, outcome) {
                debug!(contact = %contact, "ignoring superseded customer lookup");
            }
        }));
    }

    /// Returns the latest state.
    #[must_use]
    pub fn state(&self) -> LookupState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.state.subscribe()
    }
}

/// Publishes `outcome` when `ticket` is still the latest generation.
///
/// The check runs under the channel's write lock, which `contact_changed`
/// also takes after bumping the generation.
fn publish_if_current(
    state: &watch::Sender<LookupState>,
    generation: &AtomicU64,
    ticket: u64,
    outcome: LookupState,
) -> bool {
    state.send_if_modified(|current| {
        if generation.load(Ordering::SeqCst) != ticket {
            return false;
        }
        *current = outcome;
        true
    })
}

impl Drop for CustomerLookup {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
