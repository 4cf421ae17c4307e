//! Bounded combat history
//!
//! One record per resolved target, appended by the batch reconciler, newest
//! first. The log is an explicitly owned store the host injects; records are
//! never mutated and only an explicit clear empties the log.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::damage::{DamageResolution, DamageType};
use crate::types::EntityId;

/// Default number of retained records
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// One applied damage resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,

    pub target_id: EntityId,
    pub target_name: String,

    pub raw_amount: u32,
    pub damage_type: DamageType,

    pub final_damage: u32,
    pub overkill: u32,

    pub hp_before: u32,
    pub hp_after: u32,
}

impl HistoryRecord {
    pub fn from_resolution(resolution: &DamageResolution) -> Self {
        HistoryRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            target_id: resolution.entity_id.clone(),
            target_name: resolution.name.clone(),
            raw_amount: resolution.raw_amount,
            damage_type: resolution.damage_type,
            final_damage: resolution.final_damage,
            overkill: resolution.overkill,
            hp_before: resolution.hp_before,
            hp_after: resolution.hp_after,
        }
    }
}

/// Append-only log bounded to the most recent records, oldest evicted first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryLog {
    capacity: usize,
    records: VecDeque<HistoryRecord>,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        HistoryLog { capacity: capacity.max(1), records: VecDeque::new() }
    }

    pub fn push(&mut self, record: HistoryRecord) {
        self.records.push_front(record);
        self.records.truncate(self.capacity);
    }

    /// Records newest first
    pub fn records(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.front()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
