//! Shared state stores for UI polling.
//!
//! The store is written by the ECS every frame and read from anywhere; the
//! version counter only moves on discrete changes, so pollers can skip work
//! while nothing but time and view have moved.

use std::sync::Arc;

use bevy::prelude::Resource;
use parking_lot::RwLock;

use crate::status::CoreStatus;

/// Latest core status plus a change counter.
#[derive(Debug, Default)]
pub struct SkyStatusStore {
    status: RwLock<CoreStatus>,
    version: RwLock<u64>,
}

impl SkyStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_status(&self) -> CoreStatus {
        self.status.read().clone()
    }

    pub fn get_version(&self) -> u64 {
        *self.version.read()
    }

    pub fn update(&self, status: CoreStatus) {
        let mut current = self.status.write();
        let changed = current.differs_discretely(&status);
        *current = status;
        if changed {
            *self.version.write() += 1;
        }
    }
}

/// All stores combined for easy sharing.
#[derive(Debug, Clone, Resource)]
pub struct SkyStores {
    pub status: Arc<SkyStatusStore>,
}

impl SkyStores {
    pub fn new() -> Self {
        Self {
            status: Arc::new(SkyStatusStore::new()),
        }
    }
}

impl Default for SkyStores {
    fn default() -> Self {
        Self::new()
    }
}
