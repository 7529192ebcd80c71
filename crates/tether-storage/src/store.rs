use crate::error::{Result, StoreError};
use jiff::Timestamp;
use std::collections::{BTreeSet, HashMap};
use tether_core::mapping::validate_original_url;
use tether_core::{AliasValidator, KeySpace, Mapping, ALIAS_TTL};
use tether_generator::{allocate, Generator, DEFAULT_MAX_ATTEMPTS};
use tracing::debug;

/// The authoritative short-code table.
///
/// Generated codes and aliases live in a single table keyed by short code,
/// so one lookup answers for both. Aliases are additionally tracked in an
/// index, which is also the set of mappings that can expire.
///
/// Mappings are never removed; deletion and expiration only clear
/// `is_active`, and a key once used is never handed out again.
#[derive(Debug, Clone)]
pub struct MappingStore {
    entries: HashMap<String, Mapping>,
    aliases: BTreeSet<String>,
    max_attempts: usize,
}

impl MappingStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            aliases: BTreeSet::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Rebuilds a store from persisted mappings, checking the invariants
    /// that the rest of the store relies on.
    pub fn from_mappings(mappings: impl IntoIterator<Item = Mapping>) -> Result<Self> {
        let mut store = Self::new();

        for mapping in mappings {
            if store.entries.contains_key(&mapping.short_code) {
                return Err(StoreError::InvalidData(format!(
                    "duplicate short code '{}'",
                    mapping.short_code
                )));
            }

            let inconsistent = || {
                StoreError::InvalidData(format!(
                    "inconsistent alias or expiration for '{}'",
                    mapping.short_code
                ))
            };

            match (&mapping.custom_alias, mapping.expires_at) {
                (None, None) => {}
                (Some(alias), Some(expires_at)) => {
                    let expected = mapping.created_at.checked_add(ALIAS_TTL).map_err(|_| {
                        StoreError::InvalidData(format!(
                            "creation time out of range for '{}'",
                            mapping.short_code
                        ))
                    })?;
                    if *alias != mapping.short_code || expires_at != expected {
                        return Err(inconsistent());
                    }
                    store.aliases.insert(alias.clone());
                }
                _ => return Err(inconsistent()),
            }

            store.entries.insert(mapping.short_code.clone(), mapping);
        }

        Ok(store)
    }

    /// Caps the number of generate-and-check rounds per allocation.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Allocates a fresh generated code and binds it to `original_url`.
    /// The mapping never expires.
    pub fn insert_generated<G: Generator + ?Sized>(
        &mut self,
        original_url: &str,
        generator: &G,
        now: Timestamp,
    ) -> Result<Mapping> {
        validate_original_url(original_url)?;
        let code = allocate(generator, &*self, self.max_attempts)?;
        let mapping = Mapping::new(new_id(), original_url, code, now);
        self.insert(mapping)
    }

    /// Validates `alias` and binds it to `original_url` for [`ALIAS_TTL`].
    pub fn insert_alias(
        &mut self,
        original_url: &str,
        alias: &str,
        now: Timestamp,
    ) -> Result<Mapping> {
        validate_original_url(original_url)?;
        let code = AliasValidator::validate(alias, &*self)?;
        let mapping = Mapping::new(new_id(), original_url, code, now);
        self.insert(mapping)
    }

    fn insert(&mut self, mapping: Mapping) -> Result<Mapping> {
        // re-check right before insertion; callers may have validated earlier
        if self.entries.contains_key(&mapping.short_code) {
            return Err(tether_core::ValidationError::AliasTaken(mapping.short_code).into());
        }

        if let Some(alias) = &mapping.custom_alias {
            self.aliases.insert(alias.clone());
        }
        self.entries
            .insert(mapping.short_code.clone(), mapping.clone());

        debug!(
            code = %mapping.short_code,
            alias = mapping.is_alias(),
            "inserted mapping"
        );
        Ok(mapping)
    }

    /// Returns the mapping bound to `code`, active or not.
    pub fn get(&self, code: &str) -> Option<&Mapping> {
        self.entries.get(code)
    }

    /// Read-only resolution: like [`resolve`](Self::resolve) but reports an
    /// expired mapping without deactivating it.
    pub fn lookup(&self, code: &str, now: Timestamp) -> Result<&Mapping> {
        let mapping = self
            .entries
            .get(code)
            .filter(|m| m.is_active)
            .ok_or_else(|| StoreError::NotFound(code.to_string()))?;

        if mapping.is_expired_at(now) {
            return Err(StoreError::Expired(code.to_string()));
        }

        Ok(mapping)
    }

    /// Resolves `code` against both generated codes and aliases.
    ///
    /// * missing or inactive → [`StoreError::NotFound`]
    /// * active but past `expires_at` → deactivated here, then
    ///   [`StoreError::Expired`]
    pub fn resolve(&mut self, code: &str, now: Timestamp) -> Result<&Mapping> {
        let mapping = self
            .entries
            .get_mut(code)
            .filter(|m| m.is_active)
            .ok_or_else(|| StoreError::NotFound(code.to_string()))?;

        if mapping.is_expired_at(now) {
            mapping.is_active = false;
            debug!(code = %code, "deactivated expired mapping on lookup");
            return Err(StoreError::Expired(code.to_string()));
        }

        Ok(mapping)
    }

    /// Adds one credited click to an active mapping and returns the new count.
    pub fn credit_click(&mut self, code: &str) -> Option<u64> {
        let mapping = self.entries.get_mut(code).filter(|m| m.is_active)?;
        mapping.click_count += 1;
        Some(mapping.click_count)
    }

    /// Soft-deletes a mapping. Returns `true` if it was active.
    pub fn deactivate(&mut self, code: &str) -> bool {
        match self.entries.get_mut(code) {
            Some(mapping) if mapping.is_active => {
                mapping.is_active = false;
                true
            }
            _ => false,
        }
    }

    /// Deactivates every active mapping whose expiration has passed and
    /// returns how many were deactivated. Running it again with the same
    /// `now` deactivates nothing.
    pub fn sweep_expired(&mut self, now: Timestamp) -> usize {
        let mut swept = 0;
        for alias in &self.aliases {
            if let Some(mapping) = self.entries.get_mut(alias) {
                if mapping.is_active && mapping.is_expired_at(now) {
                    mapping.is_active = false;
                    swept += 1;
                }
            }
        }
        swept
    }

    /// Number of mappings whose sweep would do something at `now`.
    pub fn expired_count(&self, now: Timestamp) -> usize {
        self.aliases
            .iter()
            .filter_map(|alias| self.entries.get(alias))
            .filter(|m| m.is_active && m.is_expired_at(now))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.entries.values().filter(|m| m.is_active).count()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }

    /// All mappings ordered by creation time, then short code.
    pub fn to_vec(&self) -> Vec<Mapping> {
        let mut mappings: Vec<Mapping> = self.entries.values().cloned().collect();
        mappings.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.short_code.cmp(&b.short_code))
        });
        mappings
    }
}

impl Default for MappingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySpace for MappingStore {
    fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
