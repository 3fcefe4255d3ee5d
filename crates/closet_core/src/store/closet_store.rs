//! Closet store: sole owner of the item and wear collections.
//!
//! # Responsibility
//! - Hydrate both collections from the key-value repository at open.
//! - Apply every mutation and persist the affected collection(s) before
//!   returning.
//!
//! # Invariants
//! - Every wear event references an item present in `items`.
//! - Deleting an item removes its wear events in the same durable write.
//! - Mutations are optimistic: when persistence fails the in-memory change
//!   stays and the error is returned to the caller.
//! - Missing or unparseable persisted blobs hydrate as empty collections.

use crate::model::item::{ClothingItem, ItemId, ItemInput};
use crate::model::wear::{WearEvent, WearId};
use crate::repo::kv_repo::{KvError, KvRepository};
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Repository key holding the JSON array of items.
pub const ITEMS_STORAGE_KEY: &str = "closet-cost-tracker-items";
/// Repository key holding the JSON array of wear events.
pub const WEARS_STORAGE_KEY: &str = "closet-cost-tracker-wears";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store mutation failure.
#[derive(Debug)]
pub enum StoreError {
    /// Wear logged against an item the store does not hold.
    ItemNotFound(ItemId),
    /// A collection could not be encoded as JSON.
    Serialize(serde_json::Error),
    /// The repository rejected the write; in-memory state already changed.
    Persist(KvError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::Serialize(err) => write!(f, "failed to encode closet data: {err}"),
            Self::Persist(err) => write!(f, "failed to persist closet data: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ItemNotFound(_) => None,
            Self::Serialize(err) => Some(err),
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Persist(value)
    }
}

/// Read-only view of both collections, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClosetSnapshot {
    pub items: Vec<ClothingItem>,
    pub wear_events: Vec<WearEvent>,
}

impl ClosetSnapshot {
    /// Looks up one item by ID.
    pub fn item(&self, id: ItemId) -> Option<&ClothingItem> {
        self.items.iter().find(|item| item.id() == id)
    }
}

/// Which collections a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dirty {
    Items,
    Wears,
    Both,
}

/// In-memory closet state synchronized to a key-value repository.
pub struct ClosetStore<R: KvRepository> {
    repo: R,
    state: ClosetSnapshot,
}

impl<R: KvRepository> ClosetStore<R> {
    /// Opens a store and hydrates it from `repo`.
    ///
    /// Never fails: an absent, unreadable or corrupt blob yields an empty
    /// collection, and wear events whose item is missing are dropped. A blob
    /// holding any non-UUID id counts as corrupt.
    pub fn open(repo: R) -> Self {
        let items: Vec<ClothingItem> = load_collection(&repo, ITEMS_STORAGE_KEY);
        let mut wear_events: Vec<WearEvent> = load_collection(&repo, WEARS_STORAGE_KEY);

        let known: HashSet<ItemId> = items.iter().map(ClothingItem::id).collect();
        let before = wear_events.len();
        wear_events.retain(|wear| known.contains(&wear.item_id()));
        let dropped = before - wear_events.len();
        if dropped > 0 {
            warn!("event=store_hydrate module=store status=pruned dangling_wears={dropped}");
        }

        info!(
            "event=store_hydrate module=store status=ok items={} wears={}",
            items.len(),
            wear_events.len()
        );

        Self {
            repo,
            state: ClosetSnapshot { items, wear_events },
        }
    }

    /// Current state of both collections.
    pub fn snapshot(&self) -> &ClosetSnapshot {
        &self.state
    }

    pub fn items(&self) -> &[ClothingItem] {
        &self.state.items
    }

    pub fn wear_events(&self) -> &[WearEvent] {
        &self.state.wear_events
    }

    /// Releases the underlying repository.
    pub fn into_repo(self) -> R {
        self.repo
    }

    /// Appends a new item built from already-validated input.
    ///
    /// # Errors
    /// - `Serialize`/`Persist` when the write fails; the item stays in memory.
    pub fn add_item(&mut self, input: ItemInput) -> StoreResult<ClothingItem> {
        let item = ClothingItem::new(input);
        self.state.items.push(item.clone());
        info!(
            "event=item_add module=store status=ok item_id={} items={}",
            item.id(),
            self.state.items.len()
        );
        self.persist(Dirty::Items)?;
        Ok(item)
    }

    /// Replaces the item carrying the same ID.
    ///
    /// Returns `Ok(false)` without writing when no such item exists.
    pub fn update_item(&mut self, item: ClothingItem) -> StoreResult<bool> {
        let Some(slot) = self
            .state
            .items
            .iter_mut()
            .find(|existing| existing.id() == item.id())
        else {
            info!(
                "event=item_update module=store status=noop item_id={}",
                item.id()
            );
            return Ok(false);
        };

        let item_id = item.id();
        *slot = item;
        info!("event=item_update module=store status=ok item_id={item_id}");
        self.persist(Dirty::Items)?;
        Ok(true)
    }

    /// Removes an item and every wear event referencing it.
    ///
    /// Both collections are written in one atomic repository call. Returns
    /// `Ok(false)` without writing when no such item exists.
    pub fn delete_item(&mut self, id: ItemId) -> StoreResult<bool> {
        let before = self.state.items.len();
        self.state.items.retain(|item| item.id() != id);
        if self.state.items.len() == before {
            info!("event=item_delete module=store status=noop item_id={id}");
            return Ok(false);
        }

        let wears_before = self.state.wear_events.len();
        self.state.wear_events.retain(|wear| wear.item_id() != id);
        info!(
            "event=item_delete module=store status=ok item_id={id} cascaded_wears={}",
            wears_before - self.state.wear_events.len()
        );
        self.persist(Dirty::Both)?;
        Ok(true)
    }

    /// Records a wear of an existing item.
    ///
    /// # Errors
    /// - `ItemNotFound` when `item_id` is not in the store; nothing changes.
    /// - `Serialize`/`Persist` when the write fails; the event stays in memory.
    pub fn log_wear(
        &mut self,
        item_id: ItemId,
        date: impl Into<String>,
        notes: Option<String>,
    ) -> StoreResult<WearEvent> {
        if self.state.item(item_id).is_none() {
            warn!("event=wear_log module=store status=rejected reason=item_not_found item_id={item_id}");
            return Err(StoreError::ItemNotFound(item_id));
        }

        let wear = WearEvent::new(item_id, date, notes);
        self.state.wear_events.push(wear.clone());
        info!(
            "event=wear_log module=store status=ok item_id={item_id} wear_id={}",
            wear.id()
        );
        self.persist(Dirty::Wears)?;
        Ok(wear)
    }

    /// Removes one wear event.
    ///
    /// Returns `Ok(false)` without writing when no such event exists.
    pub fn delete_wear(&mut self, wear_id: WearId) -> StoreResult<bool> {
        let before = self.state.wear_events.len();
        self.state.wear_events.retain(|wear| wear.id() != wear_id);
        if self.state.wear_events.len() == before {
            info!("event=wear_delete module=store status=noop wear_id={wear_id}");
            return Ok(false);
        }

        info!("event=wear_delete module=store status=ok wear_id={wear_id}");
        self.persist(Dirty::Wears)?;
        Ok(true)
    }

    /// Empties both collections and removes both repository keys.
    pub fn clear(&mut self) -> StoreResult<()> {
        let items = self.state.items.len();
        let wears = self.state.wear_events.len();
        self.state = ClosetSnapshot::default();

        if let Err(err) = self
            .repo
            .remove_many(&[ITEMS_STORAGE_KEY, WEARS_STORAGE_KEY])
        {
            error!("event=closet_clear module=store status=error error={err}");
            return Err(err.into());
        }
        info!("event=closet_clear module=store status=ok items={items} wears={wears}");
        Ok(())
    }

    fn persist(&mut self, dirty: Dirty) -> StoreResult<()> {
        let result = self.write_collections(dirty);
        if let Err(err) = &result {
            error!(
                "event=store_persist module=store status=error scope={dirty:?} error={err}"
            );
        }
        result
    }

    fn write_collections(&mut self, dirty: Dirty) -> StoreResult<()> {
        match dirty {
            Dirty::Items => {
                let items = serde_json::to_string(&self.state.items)?;
                self.repo.set(ITEMS_STORAGE_KEY, &items)?;
            }
            Dirty::Wears => {
                let wears = serde_json::to_string(&self.state.wear_events)?;
                self.repo.set(WEARS_STORAGE_KEY, &wears)?;
            }
            Dirty::Both => {
                let items = serde_json::to_string(&self.state.items)?;
                let wears = serde_json::to_string(&self.state.wear_events)?;
                self.repo.set_many(&[
                    (ITEMS_STORAGE_KEY, items.as_str()),
                    (WEARS_STORAGE_KEY, wears.as_str()),
                ])?;
            }
        }
        Ok(())
    }
}

fn load_collection<T: DeserializeOwned>(
    repo: &impl KvRepository,
    key: &'static str,
) -> Vec<T> {
    let raw = match repo.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!("event=store_hydrate module=store status=unreadable key={key} error={err}");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(values) => values,
        Err(err) => {
            warn!("event=store_hydrate module=store status=corrupt key={key} error={err}");
            Vec::new()
        }
    }
}
