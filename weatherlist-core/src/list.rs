//! The city list controller.
//!
//! [`WeatherList`] exclusively owns the entries. Every mutation goes through
//! it, and every successful mutation writes the whole list back to the store
//! under [`STORAGE_KEY`].

use std::collections::HashSet;

use crate::{
    error::ListError,
    model::WeatherEntry,
    provider::WeatherLookup,
    storage::KeyValueStore,
};

/// Key the serialized list is stored under.
pub const STORAGE_KEY: &str = "weatherItems";

#[derive(Debug)]
pub struct WeatherList<L, S> {
    lookup: L,
    store: S,
    entries: Vec<WeatherEntry>,
    next_id: u64,
}

impl<L: WeatherLookup, S: KeyValueStore> WeatherList<L, S> {
    /// Build a controller and restore whatever list `store` holds.
    ///
    /// A missing or unreadable list starts out empty. Duplicate stored ids are
    /// renumbered and the repaired list is written back.
    pub fn new(lookup: L, store: S) -> Self {
        let (entries, next_id, renumbered) = match assign_ids(load_entries(&store)) {
            Some(restored) => restored,
            None => {
                tracing::warn!("stored weather list has no free ids left, starting empty");
                (Vec::new(), 1, false)
            }
        };

        tracing::debug!(count = entries.len(), next_id, "loaded weather list");
        let mut list = Self { lookup, store, entries, next_id };
        if renumbered {
            list.persist();
        }
        list
    }

    pub fn entries(&self) -> &[WeatherEntry] {
        &self.entries
    }

    pub fn get(&self, id: u64) -> Option<&WeatherEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Look up `query` and append it to the list.
    ///
    /// Returns `Ok(None)` for a blank query. A city already in the list
    /// (compared case-insensitively, both as typed and as canonicalized by the
    /// provider) is rejected.
    pub async fn add(&mut self, query: &str) -> Result<Option<&WeatherEntry>, ListError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        self.ensure_absent(query)?;
        let following = self.next_id.checked_add(1).ok_or(ListError::IdsExhausted)?;

        let weather = self
            .lookup
            .lookup(query)
            .await
            .map_err(|source| ListError::Lookup { query: query.to_string(), source })?;

        self.ensure_absent(&weather.name)?;

        let entry =
            WeatherEntry { id: self.next_id, city: weather.name, temperature: weather.temperature_c };
        self.next_id = following;

        tracing::info!(id = entry.id, city = %entry.city, temperature = entry.temperature, "added city");
        self.entries.push(entry);
        self.persist();

        Ok(self.entries.last())
    }

    /// Same as [`WeatherList::add`]; the search box adds what it finds.
    pub async fn search(&mut self, query: &str) -> Result<Option<&WeatherEntry>, ListError> {
        self.add(query).await
    }

    /// Remove the entry with `id`. Unknown ids are ignored.
    pub fn delete(&mut self, id: u64) -> Option<WeatherEntry> {
        let index = self.position(id)?;
        let removed = self.entries.remove(index);

        tracing::info!(id, city = %removed.city, "deleted city");
        self.persist();

        Some(removed)
    }

    /// Re-fetch the entry with `id` using `query`, keeping its id and position.
    ///
    /// An unknown id or blank query leaves the list untouched and returns `Ok(None)`.
    pub async fn edit(
        &mut self,
        id: u64,
        query: &str,
    ) -> Result<Option<&WeatherEntry>, ListError> {
        let Some(index) = self.position(id) else {
            tracing::warn!(id, "edit target not found");
            return Ok(None);
        };

        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let weather = self
            .lookup
            .lookup(query)
            .await
            .map_err(|source| ListError::Lookup { query: query.to_string(), source })?;

        let entry = &mut self.entries[index];
        tracing::info!(id, from = %entry.city, to = %weather.name, "edited city");
        entry.city = weather.name;
        entry.temperature = weather.temperature_c;

        self.persist();
        Ok(self.entries.get(index))
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn ensure_absent(&self, city: &str) -> Result<(), ListError> {
        match self.entries.iter().find(|e| e.matches_city(city)) {
            Some(existing) => Err(ListError::Duplicate { city: existing.city.clone() }),
            None => Ok(()),
        }
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize weather list");
                return;
            }
        };

        if let Err(err) = self.store.set(STORAGE_KEY, json) {
            tracing::error!(error = %err, "failed to persist weather list");
        }
    }
}

/// Give every entry a distinct id and compute the next free one.
///
/// Later entries that reuse an id get a fresh one. `None` when the id space is used up.
fn assign_ids(mut entries: Vec<WeatherEntry>) -> Option<(Vec<WeatherEntry>, u64, bool)> {
    let mut next_id = match entries.iter().map(|e| e.id).max() {
        Some(max) => max.checked_add(1)?,
        None => 1,
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut renumbered = false;
    for entry in &mut entries {
        if seen.insert(entry.id) {
            continue;
        }

        tracing::warn!(old = entry.id, new = next_id, city = %entry.city, "renumbered duplicate id");
        entry.id = next_id;
        seen.insert(next_id);
        next_id = next_id.checked_add(1)?;
        renumbered = true;
    }

    Some((entries, next_id, renumbered))
}

fn load_entries<S: KeyValueStore>(store: &S) -> Vec<WeatherEntry> {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(error = %err, "could not read stored weather list, starting empty");
            return Vec::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "stored weather list is malformed, starting empty");
        Vec::new()
    })
}
