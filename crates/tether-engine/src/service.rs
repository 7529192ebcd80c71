use crate::error::{EngineError, Result};
use tether_analytics::ClickAnalytics;
use tether_core::{AnalyticsReport, Clock, Mapping, Persistence, Snapshot, SystemClock};
use tether_generator::{Generator, DEFAULT_MAX_ATTEMPTS};
use tether_storage::{MappingStore, StoreError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

/// Tunables for [`ResolutionService`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct EngineSettings {
    /// Generate-and-check rounds before a create fails with
    /// [`EngineError::CapacityExhausted`].
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_code_attempts: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Everything guarded by the engine lock.
#[derive(Debug, Clone)]
struct EngineState {
    store: MappingStore,
    analytics: ClickAnalytics,
}

impl EngineState {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            mappings: self.store.to_vec(),
            clicks: self.analytics.events().to_vec(),
        }
    }
}

/// Composes code generation, alias validation, the mapping store and click
/// analytics into the three public operations.
///
/// A single lock serializes every operation, so check-then-act sequences
/// (alias availability then insert, dedup check then credit) never
/// interleave. Every mutation is persisted before it becomes visible in
/// memory; a failed save leaves memory unchanged and is returned to the
/// caller.
pub struct ResolutionService<P, G, C = SystemClock> {
    state: Mutex<EngineState>,
    persistence: P,
    generator: G,
    clock: C,
}

impl<P: Persistence, G: Generator> ResolutionService<P, G, SystemClock> {
    /// Loads the persisted state and starts an engine on the system clock.
    pub async fn open(persistence: P, generator: G) -> Result<Self> {
        Self::open_with(persistence, generator, SystemClock, EngineSettings::default()).await
    }
}

impl<P: Persistence, G: Generator, C: Clock> ResolutionService<P, G, C> {
    /// Loads the persisted state with an explicit clock and settings.
    pub async fn open_with(
        persistence: P,
        generator: G,
        clock: C,
        settings: EngineSettings,
    ) -> Result<Self> {
        let snapshot = persistence.load().await?;
        let store = MappingStore::from_mappings(snapshot.mappings)?
            .with_max_attempts(settings.max_code_attempts);
        let analytics = ClickAnalytics::from_events(snapshot.clicks);

        info!(
            mappings = store.len(),
            active = store.active_count(),
            clicks = analytics.len(),
            "engine state loaded"
        );

        Ok(Self {
            state: Mutex::new(EngineState { store, analytics }),
            persistence,
            generator,
            clock,
        })
    }

    /// Creates a mapping for `original_url`.
    ///
    /// With an alias the mapping is keyed by the alias and expires after 30
    /// days; without one a random code is allocated and never expires.
    pub async fn create(&self, original_url: &str, custom_alias: Option<&str>) -> Result<Mapping> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let mapping = self
            .commit(&mut state, |s| {
                let mapping = match custom_alias {
                    Some(alias) => s.store.insert_alias(original_url, alias, now)?,
                    None => s.store.insert_generated(original_url, &self.generator, now)?,
                };
                Ok(mapping)
            })
            .await
            .inspect_err(|err| debug!(error = %err, "create rejected"))?;

        info!(
            code = %mapping.short_code,
            alias = mapping.is_alias(),
            "created mapping"
        );
        Ok(mapping)
    }

    /// Resolves `code` for a redirect and records the click.
    ///
    /// Missing, deactivated and expired codes all yield
    /// [`EngineError::NotFound`]. An expired alias found here is deactivated
    /// and that change is persisted.
    pub async fn resolve(&self, code: &str, client_ip: &str, user_agent: &str) -> Result<Mapping> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let lookup = state.store.lookup(code, now).map(|_| ());
        match lookup {
            Ok(()) => {}
            Err(StoreError::Expired(_)) => {
                self.commit(&mut state, |s| match s.store.resolve(code, now) {
                    Err(StoreError::Expired(_)) => Ok(()),
                    other => other.map(|_| ()).map_err(EngineError::from),
                })
                .await?;
                debug!(code = %code, "alias expired");
                return Err(EngineError::NotFound(code.to_string()));
            }
            Err(err) => {
                debug!(code = %code, "short code not found");
                return Err(err.into());
            }
        }

        // Clicks are the hot path: persist the snapshot with this click
        // folded in, then apply it to the live state, instead of staging a
        // copy of the whole state.
        let event = ClickAnalytics::click(code, client_ip, user_agent, now);
        let credited = state.analytics.would_credit(&event);

        let mut snapshot = state.snapshot();
        snapshot.clicks.push(event.clone());
        if credited {
            if let Some(mapping) = snapshot.mappings.iter_mut().find(|m| m.short_code == code) {
                mapping.click_count += 1;
            }
        }
        self.persist(&snapshot).await?;

        if state.analytics.record(event) {
            state.store.credit_click(code);
        }
        let mapping = state
            .store
            .get(code)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(code.to_string()))?;

        debug!(
            code = %code,
            url = %mapping.original_url,
            clicks = mapping.click_count,
            "resolved short code"
        );
        Ok(mapping)
    }

    /// Click analytics for `code`.
    ///
    /// Reports are available for any mapping that exists, including ones
    /// that have expired or been deactivated.
    pub async fn report(&self, code: &str) -> Result<AnalyticsReport> {
        let state = self.state.lock().await;
        let mapping = state
            .store
            .get(code)
            .ok_or_else(|| EngineError::NotFound(code.to_string()))?;
        Ok(state.analytics.report(mapping))
    }

    /// Deactivates every alias whose expiration has passed. Returns how many
    /// were deactivated; nothing is written when there is nothing to do.
    pub async fn sweep_expired(&self) -> Result<usize> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        if state.store.expired_count(now) == 0 {
            return Ok(0);
        }

        let swept = self
            .commit(&mut state, |s| Ok(s.store.sweep_expired(now)))
            .await?;
        info!(swept, "deactivated expired aliases");
        Ok(swept)
    }

    /// Soft-deletes `code`. Returns `false` if it was missing or already
    /// inactive. Click history is kept.
    pub async fn deactivate(&self, code: &str) -> Result<bool> {
        let mut state = self.state.lock().await;

        if !state.store.get(code).is_some_and(|m| m.is_active) {
            return Ok(false);
        }

        self.commit(&mut state, |s| Ok(s.store.deactivate(code)))
            .await?;
        info!(code = %code, "deactivated mapping");
        Ok(true)
    }

    /// The mapping bound to `code`, active or not.
    pub async fn mapping(&self, code: &str) -> Option<Mapping> {
        self.state.lock().await.store.get(code).cloned()
    }

    /// A copy of the full current state, as it would be persisted.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.snapshot()
    }

    /// Applies `op` to a staged copy of `state`, persists the result, and
    /// swaps it in. If `op` or the save fails, `state` is untouched.
    async fn commit<T>(
        &self,
        state: &mut EngineState,
        op: impl FnOnce(&mut EngineState) -> Result<T> + Send,
    ) -> Result<T> {
        let mut staged = state.clone();
        let out = op(&mut staged)?;

        self.persist(&staged.snapshot()).await?;
        *state = staged;
        Ok(out)
    }

    async fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        self.persistence.save(snapshot).await.map_err(|err| {
            warn!(error = %err, "failed to persist state, change discarded");
            err.into()
        })
    }
}
