//! Scene State Provider - the single external collaborator seam
//!
//! The engine never talks to the host rendering SDK directly; everything it
//! needs from the shared scene goes through [`SceneStateProvider`]. Reads are
//! snapshot fetches, writes apply a transform to each named entity's mutable
//! attribute bag, and change notifications arrive as broadcast events the
//! consumer uses to re-run detection. The core does no polling.

pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::types::{AttributeBag, EntityId};

/// The kinds of scene items the engine distinguishes.
///
/// Tokens carry attribute bags; shapes and text are the cosmetic attachments
/// the health-bar sync may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Token,
    Shape,
    Text,
}

/// Snapshot of one scene item as the engine sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    /// Item this one is attached to, for indicator attachments
    pub attached_to: Option<EntityId>,
    /// The schema-less extension data
    pub attributes: AttributeBag,
    /// Drawn width, when the item kind has one
    pub width: Option<f64>,
    /// Rendered text, when the item kind has one
    pub label: Option<String>,
}

impl SceneEntity {
    /// A plain token with attribute data
    pub fn token(id: impl Into<EntityId>, name: &str, attributes: AttributeBag) -> Self {
        SceneEntity {
            id: id.into(),
            name: name.to_string(),
            kind: EntityKind::Token,
            attached_to: None,
            attributes,
            width: None,
            label: None,
        }
    }

    /// An attachment (bar shape or text) hanging off another entity
    pub fn attachment(
        id: impl Into<EntityId>,
        name: &str,
        kind: EntityKind,
        attached_to: impl Into<EntityId>,
    ) -> Self {
        SceneEntity {
            id: id.into(),
            name: name.to_string(),
            kind,
            attached_to: Some(attached_to.into()),
            attributes: AttributeBag::new(),
            width: None,
            label: None,
        }
    }
}

/// Errors from the external scene store
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("scene backend error: {0}")]
    Backend(String),

    /// The store rejected the whole update call. The engine cannot know
    /// which targets, if any, a non-atomic store partially applied.
    #[error("scene update rejected: {0}")]
    WriteRejected(String),
}

/// Push notifications about the shared scene
#[derive(Debug, Clone)]
pub enum SceneEvent {
    SelectionChanged(Vec<EntityId>),
    EntitiesChanged(Vec<EntityId>),
}

/// Contract the engine consumes the host scene through.
///
/// All calls may suspend; callers await reads to completion before choosing a
/// locator strategy, and await strategy choice before issuing writes. Issued
/// writes always run to completion or failure; nothing here is cancellable.
#[async_trait]
pub trait SceneStateProvider: Send + Sync {
    /// Snapshot fetch of the named entities. Ids that no longer resolve are
    /// silently absent from the result, not an error.
    async fn get_entities(&self, ids: &[EntityId]) -> Result<Vec<SceneEntity>, ProviderError>;

    /// Snapshot of every entity in the scene, for attachment scans
    async fn get_all_entities(&self) -> Result<Vec<SceneEntity>, ProviderError>;

    /// Apply a transform to each named entity's mutable state. A failure
    /// rejects the whole call.
    async fn update_entities(
        &self,
        ids: &[EntityId],
        mutate: &(dyn for<'a> Fn(&'a mut SceneEntity) + Send + Sync),
    ) -> Result<(), ProviderError>;

    /// Subscribe to scene change notifications
    fn subscribe(&self) -> broadcast::Receiver<SceneEvent>;
}
