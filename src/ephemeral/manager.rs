use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant},
};

use crate::events::{DashboardEvent, SharedBus};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

pub const NOTIFICATION_LIFETIME_MS: u64 = 4_000;
pub const TRANSMISSION_LIFETIME_MS: u64 = 3_000;

pub trait EphemeralItem: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn is_temporary(&self) -> bool;
    /// Event emitted whenever the active set of this item type changes.
    fn changed_event() -> DashboardEvent;
}

#[derive(Debug, Clone, Copy)]
pub struct EphemeralConfig {
    /// How long a temporary item stays in the active set.
    pub lifetime: Duration,
}

impl EphemeralConfig {
    pub fn notifications() -> Self {
        Self {
            lifetime: Duration::from_millis(NOTIFICATION_LIFETIME_MS),
        }
    }

    pub fn transmissions() -> Self {
        Self {
            lifetime: Duration::from_millis(TRANSMISSION_LIFETIME_MS),
        }
    }
}

struct ExpiryTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

struct ActiveSet<T> {
    items: Vec<T>,
    /// Bumped on every schedule; an expiry only acts if its generation is
    /// still the one registered for its id.
    generation: u64,
    timers: HashMap<String, ExpiryTimer>,
}

impl<T> ActiveSet<T> {
    fn cancel_all(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
    }

    fn cancel(&mut self, id: &str) {
        if let Some(timer) = self.timers.remove(id) {
            timer.handle.abort();
        }
    }
}

/// Active set of transient items (toasts, floorplan transmissions) where
/// temporary items drop out after a fixed lifetime. Enumeration order is
/// insertion order and removals never reorder the survivors.
pub struct EphemeralItemManager<T: EphemeralItem> {
    state: Arc<Mutex<ActiveSet<T>>>,
    config: EphemeralConfig,
    bus: SharedBus,
}

impl<T: EphemeralItem> Clone for EphemeralItemManager<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            config: self.config,
            bus: Arc::clone(&self.bus),
        }
    }
}

impl<T: EphemeralItem> EphemeralItemManager<T> {
    pub fn new(config: EphemeralConfig, bus: SharedBus) -> Self {
        Self {
            state: Arc::new(Mutex::new(ActiveSet {
                items: Vec::new(),
                generation: 0,
                timers: HashMap::new(),
            })),
            config,
            bus,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.config.lifetime
    }

    pub async fn items(&self) -> Vec<T> {
        self.state.lock().await.items.clone()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.state.lock().await.items.iter().any(|item| item.id() == id)
    }

    /// Swaps the whole active set. Every pending expiry from the previous
    /// set is cancelled; temporary items in `items` get a fresh lifetime.
    /// Duplicate ids keep their first occurrence.
    pub async fn set_active_set(&self, items: Vec<T>) {
        {
            let mut state = self.state.lock().await;
            self.swap(&mut state, items);
        }
        self.bus.emit(T::changed_event());
    }

    /// Appends one item to the current list and swaps the result in, so
    /// every temporary item already active gets a fresh lifetime too. An
    /// item with an id already in the set replaces it in place.
    pub async fn push(&self, item: T) {
        {
            let mut state = self.state.lock().await;
            let mut items = state.items.clone();
            match items.iter().position(|existing| existing.id() == item.id()) {
                Some(index) => items[index] = item,
                None => items.push(item),
            }
            self.swap(&mut state, items);
        }
        self.bus.emit(T::changed_event());
    }

    /// Early removal. Returns false (and changes nothing) if the id is not
    /// in the active set, so a second dismiss is harmless.
    pub async fn dismiss(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.state.lock().await;
            state.cancel(id);
            remove_item(&mut state.items, id)
        };
        if removed {
            self.bus.emit(T::changed_event());
        }
        removed
    }

    /// Drops every item and cancels every pending expiry.
    pub async fn clear(&self) {
        let had_items = {
            let mut state = self.state.lock().await;
            state.cancel_all();
            !std::mem::take(&mut state.items).is_empty()
        };
        if had_items {
            self.bus.emit(T::changed_event());
        }
    }

    pub async fn pending_expiries(&self) -> usize {
        self.state.lock().await.timers.len()
    }

    fn swap(&self, state: &mut ActiveSet<T>, items: Vec<T>) {
        state.cancel_all();

        let mut unique: Vec<T> = Vec::with_capacity(items.len());
        for item in items {
            if unique.iter().any(|kept| kept.id() == item.id()) {
                log_warn!("duplicate ephemeral item id {} dropped", item.id());
                continue;
            }
            unique.push(item);
        }

        let deadline = Instant::now() + self.config.lifetime;
        for item in unique.iter().filter(|item| item.is_temporary()) {
            self.schedule(state, item.id().to_string(), deadline);
        }
        state.items = unique;
    }

    fn schedule(&self, state: &mut ActiveSet<T>, id: String, deadline: Instant) {
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;

        let shared = Arc::clone(&self.state);
        let bus = Arc::clone(&self.bus);
        let timer_id = id.clone();
        let handle = tokio::spawn(async move {
            time::sleep_until(deadline).await;
            expire(&shared, &bus, &timer_id, generation).await;
        });

        if let Some(previous) = state.timers.insert(id, ExpiryTimer { generation, handle }) {
            previous.handle.abort();
        }
    }
}

async fn expire<T: EphemeralItem>(
    state: &Mutex<ActiveSet<T>>,
    bus: &SharedBus,
    id: &str,
    generation: u64,
) {
    let removed = {
        let mut state = state.lock().await;
        let current = state.timers.get(id).map(|timer| timer.generation);
        if current != Some(generation) {
            log_debug!("stale expiry for {id} dropped");
            return;
        }
        state.timers.remove(id);
        remove_item(&mut state.items, id)
    };
    if removed {
        log_debug!("ephemeral item {id} expired");
        bus.emit(T::changed_event());
    }
}

fn remove_item<T: EphemeralItem>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
