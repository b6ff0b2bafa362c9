//! Dedup batch walker
//!
//! Flattens a refresh batch into [`ServiceIdentity`] values, first-seen order,
//! each cluster+service at most once. The processed set lives only as long as
//! the walker, so dedup never crosses invocations.

use std::collections::HashSet;

use ecsrefresh_models::{MalformedEntity, ServiceIdentity};
use serde_json::Value;
use tracing::debug;

use crate::types::RefreshServicesInput;

/// One raw descriptor together with the region of the event carrying it
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntity {
    pub entity_value: Value,
    pub region: String,
}

impl BatchEntity {
    /// The descriptor as text: the string itself, or the JSON of anything else
    pub fn descriptor(&self) -> String {
        match &self.entity_value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }

    fn identity(&self) -> Result<ServiceIdentity, MalformedEntity> {
        match &self.entity_value {
            Value::String(text) => ServiceIdentity::parse(text, self.region.clone()),
            _ => Err(MalformedEntity {
                entity_value: self.descriptor(),
            }),
        }
    }
}

/// Outcome of walking one descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum Walked {
    /// First occurrence of this cluster+service, with the descriptor that named it
    Unique {
        identity: ServiceIdentity,
        entity_value: String,
    },
    /// Descriptor did not split into cluster and service
    Malformed {
        entity: BatchEntity,
        error: MalformedEntity,
    },
}

/// Single-pass iterator over the unique identities of a batch.
///
/// Duplicates are dropped silently; malformed descriptors are yielded so the
/// caller can report them, and never stop the walk.
pub struct DedupWalker<I> {
    entities: I,
    processed: HashSet<String>,
}

impl<I> DedupWalker<I>
where
    I: Iterator<Item = BatchEntity>,
{
    pub fn new(entities: I) -> Self {
        Self {
            entities,
            processed: HashSet::new(),
        }
    }
}

impl<I> Iterator for DedupWalker<I>
where
    I: Iterator<Item = BatchEntity>,
{
    type Item = Walked;

    fn next(&mut self) -> Option<Walked> {
        loop {
            let entity = self.entities.next()?;
            match entity.identity() {
                Ok(identity) => {
                    if self.processed.insert(identity.key()) {
                        return Some(Walked::Unique {
                            identity,
                            entity_value: entity.descriptor(),
                        });
                    }
                    debug!(service = %identity.key(), "Skipping already processed service");
                }
                Err(error) => return Some(Walked::Malformed { entity, error }),
            }
        }
    }
}

/// Flatten every event's entities, keeping payload order
pub fn batch_entities(input: &RefreshServicesInput) -> impl Iterator<Item = BatchEntity> + '_ {
    input.events.iter().flat_map(|event| {
        event.entities.iter().map(move |entity| BatchEntity {
            entity_value: entity.entity_value.clone(),
            region: event.region.clone(),
        })
    })
}

/// Walk a normalized refresh batch
pub fn walk(input: &RefreshServicesInput) -> DedupWalker<impl Iterator<Item = BatchEntity> + '_> {
    DedupWalker::new(batch_entities(input))
}
