//! # Storage Mutations
//!
//! Owns the shared [`InventorySnapshot`] and applies add/edit/delete requests
//! with a two-phase protocol:
//!
//! ```text
//! propose ──validate──► pending mutation
//!    │
//!    ▼
//! send to inventory service ──success──► patch snapshot (confirm)
//!                           └─failure──► discard pending, snapshot untouched
//! ```
//!
//! Mutations of the same location queue on a per-location async lock held from
//! request issuance until the patch is applied, so an edit or delete never
//! targets an index that a concurrent add or delete is about to shift. Different
//! locations proceed independently.

use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, Instrument};

use crate::errors::{error_logging, AppError, AppResult};
use crate::inventory::{FoodItem, InventorySnapshot, StorageLocation};
use crate::observability::{inventory_span, record_storage_mutation, update_inventory_size};
use crate::services::InventoryService;
use crate::session::Session;
use crate::validation::{validate_food_name, validation_message};

/// A proposed change to one storage location, not yet confirmed by the backend
#[derive(Debug, Clone, PartialEq)]
pub enum PendingMutation {
    Add {
        location: StorageLocation,
        item: FoodItem,
    },
    Edit {
        location: StorageLocation,
        index: usize,
        item: FoodItem,
    },
    Delete {
        location: StorageLocation,
        index: usize,
    },
}

impl PendingMutation {
    /// Propose adding `item`; the name is validated and trimmed
    pub fn add(location: StorageLocation, item: FoodItem) -> AppResult<Self> {
        Ok(PendingMutation::Add {
            location,
            item: checked_item(item)?,
        })
    }

    /// Propose replacing the item at `index`; the name is validated and trimmed
    pub fn edit(location: StorageLocation, index: usize, item: FoodItem) -> AppResult<Self> {
        Ok(PendingMutation::Edit {
            location,
            index,
            item: checked_item(item)?,
        })
    }

    /// Propose removing the item at `index`
    pub fn delete(location: StorageLocation, index: usize) -> Self {
        PendingMutation::Delete { location, index }
    }

    pub fn location(&self) -> StorageLocation {
        match self {
            PendingMutation::Add { location, .. }
            | PendingMutation::Edit { location, .. }
            | PendingMutation::Delete { location, .. } => *location,
        }
    }

    /// Short operation name for logs and metrics
    pub fn operation(&self) -> &'static str {
        match self {
            PendingMutation::Add { .. } => "add",
            PendingMutation::Edit { .. } => "edit",
            PendingMutation::Delete { .. } => "delete",
        }
    }

    fn index(&self) -> Option<usize> {
        match self {
            PendingMutation::Add { .. } => None,
            PendingMutation::Edit { index, .. } | PendingMutation::Delete { index, .. } => {
                Some(*index)
            }
        }
    }

    /// Apply the confirmed mutation to `snapshot`
    fn apply(self, snapshot: &mut InventorySnapshot) -> AppResult<()> {
        match self {
            PendingMutation::Add { location, item } => {
                snapshot.apply_add(location, item);
                Ok(())
            }
            PendingMutation::Edit {
                location,
                index,
                item,
            } => snapshot.apply_edit(location, index, item),
            PendingMutation::Delete { location, index } => {
                snapshot.apply_delete(location, index).map(|_| ())
            }
        }
    }
}

fn checked_item(mut item: FoodItem) -> AppResult<FoodItem> {
    let name = match validate_food_name(&item.name) {
        Ok(name) => name.to_string(),
        Err(code) => {
            error_logging::log_validation_error(&code, "propose_mutation", "food_name", Some(&item.name));
            return Err(AppError::Validation(validation_message(code).to_string()));
        }
    };
    item.name = name;
    Ok(item)
}

/// Shared inventory plus the per-location mutation queues
pub struct InventoryStore<S> {
    service: Arc<S>,
    snapshot: RwLock<InventorySnapshot>,
    shelf_lock: AsyncMutex<()>,
    fridge_lock: AsyncMutex<()>,
    freezer_lock: AsyncMutex<()>,
}

impl<S: InventoryService> InventoryStore<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self::with_snapshot(service, InventorySnapshot::default())
    }

    /// Start from an already loaded snapshot
    pub fn with_snapshot(service: Arc<S>, snapshot: InventorySnapshot) -> Self {
        Self {
            service,
            snapshot: RwLock::new(snapshot),
            shelf_lock: AsyncMutex::new(()),
            fridge_lock: AsyncMutex::new(()),
            freezer_lock: AsyncMutex::new(()),
        }
    }

    fn location_lock(&self, location: StorageLocation) -> &AsyncMutex<()> {
        match location {
            StorageLocation::Shelf => &self.shelf_lock,
            StorageLocation::Fridge => &self.fridge_lock,
            StorageLocation::Freezer => &self.freezer_lock,
        }
    }

    /// Read access to the current snapshot. Do not hold across an await.
    pub fn snapshot(&self) -> RwLockReadGuard<'_, InventorySnapshot> {
        self.snapshot.read()
    }

    /// Owned copy of the items at `location`
    pub fn items(&self, location: StorageLocation) -> Vec<FoodItem> {
        self.snapshot.read().items(location).to_vec()
    }

    /// Replace the snapshot with a fresh one from the inventory service.
    ///
    /// On failure the current snapshot is kept.
    pub async fn load(&self) -> AppResult<()> {
        let snapshot = self
            .service
            .fetch_inventory()
            .instrument(inventory_span("load", None))
            .await
            .map_err(|e| {
                error_logging::log_network_error(&e, "load_inventory", None);
                e
            })?;

        info!(
            items = snapshot.item_count(),
            vocabulary = snapshot.vocabulary.len(),
            "Inventory loaded"
        );
        update_inventory_size(snapshot.item_count());
        *self.snapshot.write() = snapshot;
        Ok(())
    }

    /// Send a proposed mutation and, once the backend confirms it, patch the snapshot
    pub async fn submit(&self, session: &Session, mutation: PendingMutation) -> AppResult<()> {
        session.require_authorized()?;

        let location = mutation.location();
        let operation = mutation.operation();
        let _queue = self.location_lock(location).lock().await;

        if let Some(index) = mutation.index() {
            let len = self.snapshot.read().items(location).len();
            if index >= len {
                return Err(AppError::IndexOutOfRange { index, len });
            }
        }

        let span = inventory_span(operation, Some(location));
        let result = match &mutation {
            PendingMutation::Add { location, item } => {
                self.service
                    .add_food(*location, item.clone())
                    .instrument(span)
                    .await
            }
            PendingMutation::Edit {
                location,
                index,
                item,
            } => {
                self.service
                    .edit_food(*location, *index, item.clone())
                    .instrument(span)
                    .await
            }
            PendingMutation::Delete { location, index } => {
                self.service
                    .delete_food(*location, *index)
                    .instrument(span)
                    .await
            }
        };

        if let Err(err) = result {
            error_logging::log_storage_error(&err, operation, location, mutation.index());
            record_storage_mutation(operation, location, false);
            return Err(err);
        }

        let mut snapshot = self.snapshot.write();
        mutation.apply(&mut snapshot)?;
        update_inventory_size(snapshot.item_count());
        record_storage_mutation(operation, location, true);
        info!(operation, %location, items = snapshot.items(location).len(), "Storage mutation confirmed");
        Ok(())
    }

    /// Validate and submit an add
    pub async fn add(
        &self,
        session: &Session,
        location: StorageLocation,
        item: FoodItem,
    ) -> AppResult<()> {
        session.require_authorized()?;
        let mutation = PendingMutation::add(location, item)?;
        self.submit(session, mutation).await
    }

    /// Validate and submit an edit
    pub async fn edit(
        &self,
        session: &Session,
        location: StorageLocation,
        index: usize,
        item: FoodItem,
    ) -> AppResult<()> {
        session.require_authorized()?;
        let mutation = PendingMutation::edit(location, index, item)?;
        self.submit(session, mutation).await
    }

    /// Submit a delete
    pub async fn delete(
        &self,
        session: &Session,
        location: StorageLocation,
        index: usize,
    ) -> AppResult<()> {
        self.submit(session, PendingMutation::delete(location, index))
            .await
    }
}
