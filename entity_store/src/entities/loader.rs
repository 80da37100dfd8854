//! Bulk component loading from a JSON payload.
//!
//! Payloads have the shape
//!
//! ```json
//! { "components": { "Position": { "x": 1, "y": 2 }, "Name": { "value": "scout" } } }
//! ```
//!
//! Each named kind is added if the entity lacks it, then the listed fields
//! are overwritten. Fields not mentioned keep their current values.

use serde_json::Value;

use super::Entity;
use crate::components::ComponentCatalog;
use crate::error::{EcsError, EcsResult, LoadError};

impl Entity {
    /// Parse `payload` as JSON and apply it with [`load_json`](Self::load_json).
    pub fn load_str(&mut self, catalog: &ComponentCatalog, payload: &str) -> EcsResult<()> {
        let value: Value = serde_json::from_str(payload).map_err(LoadError::Parse)?;
        self.load_json(catalog, &value)
    }

    /// Add and populate every component named in `payload`.
    ///
    /// All or nothing: if any kind or field is rejected the entity is left
    /// exactly as it was.
    pub fn load_json(&mut self, catalog: &ComponentCatalog, payload: &Value) -> EcsResult<()> {
        let components = payload
            .get("components")
            .and_then(Value::as_object)
            .ok_or(LoadError::MissingComponents)?;

        let mut staged = self.duplicate();
        for (name, fields) in components {
            let entry = catalog
                .entry(name)
                .ok_or_else(|| LoadError::UnknownKind(name.clone()))?;
            let load = entry.load.ok_or(LoadError::NotLoadable(entry.kind.name()))?;
            let fields = fields
                .as_object()
                .ok_or_else(|| LoadError::NotAnObject { kind: name.clone() })?;

            let index = match staged.registry().find(entry.kind) {
                Some(index) if staged.slots[index.0].component.is_some() => index,
                _ => staged.insert_with(entry.kind, entry.make_default)?,
            };
            let component = staged.slots[index.0]
                .component
                .as_deref_mut()
                .ok_or(EcsError::NotFound {
                    kind: entry.kind.name(),
                })?;
            load(component, fields)?;
        }

        tracing::debug!(entity = %self.id(), kinds = components.len(), "components loaded");
        *self = staged;
        Ok(())
    }
}
