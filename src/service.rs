//! The shared stats service.
//!
//! One service instance owns the HTTP client and the aggregate store for a
//! session. Starting it launches every provider concurrently; each source
//! runs fetch → normalize → fallback-on-failure → store update on its own,
//! so a slow or dead platform never holds up the others. Consumers are
//! handed the store (or a subscription) rather than re-running fetches
//! themselves.

use crate::config::Config;
use crate::fallback::fallback_stat;
use crate::models::{NormalizedStat, SourceId, SourceState};
use crate::providers::{
    CodechefProvider, CodeforcesProvider, ContributionsProvider, GithubProvider,
    LeetcodeProvider, ProviderError, StatProvider,
};
use crate::store::{AggregateState, AggregateStore};
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Aggregates all sources for one session.
pub struct StatsService {
    store: Arc<AggregateStore>,
    tasks: Vec<JoinHandle<()>>,
}

impl StatsService {
    /// Build the HTTP client and launch one fetch task per source.
    pub fn start(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch.timeout_seconds))
            .user_agent(config.fetch.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        let store = Arc::new(AggregateStore::new());
        let mut tasks = Vec::with_capacity(SourceId::ALL.len());

        let profiles = &config.profiles;
        let fetch = &config.fetch;

        let github = GithubProvider::new(fetch, profiles.handle_for(SourceId::GithubProfile));
        tasks.push(spawn_source(&store, github.id(), {
            let client = client.clone();
            async move { github.fetch(&client).await }
        }));

        let contributions =
            ContributionsProvider::new(fetch, profiles.handle_for(SourceId::GithubContributions));
        tasks.push(spawn_source(&store, contributions.id(), {
            let client = client.clone();
            async move { contributions.fetch(&client).await }
        }));

        let leetcode = LeetcodeProvider::new(fetch, profiles.handle_for(SourceId::Leetcode));
        tasks.push(spawn_source(&store, leetcode.id(), {
            let client = client.clone();
            async move { leetcode.fetch(&client).await }
        }));

        let codechef = CodechefProvider::new(fetch, profiles.handle_for(SourceId::Codechef));
        tasks.push(spawn_source(&store, codechef.id(), {
            let client = client.clone();
            async move { codechef.fetch(&client).await }
        }));

        let codeforces = CodeforcesProvider::new(fetch, profiles.handle_for(SourceId::Codeforces));
        tasks.push(spawn_source(&store, codeforces.id(), {
            let client = client.clone();
            async move { codeforces.fetch(&client).await }
        }));

        info!(sources = tasks.len(), "stat fetches started");

        Ok(Self { store, tasks })
    }

    /// Settle every source from its fallback literal without touching the
    /// network.
    pub fn offline() -> Self {
        let store = Arc::new(AggregateStore::new());

        for id in SourceId::ALL {
            let _ = store.update(id, SourceState::Fallback(fallback_stat(id)));
        }

        Self {
            store,
            tasks: Vec::new(),
        }
    }

    /// Subscribe to incremental snapshots.
    pub fn subscribe(&self) -> watch::Receiver<AggregateState> {
        self.store.subscribe()
    }

    /// Shared handle to the store.
    pub fn store(&self) -> Arc<AggregateStore> {
        Arc::clone(&self.store)
    }

    /// Wait for every source to settle and return the store.
    pub async fn wait_settled(self) -> Arc<AggregateStore> {
        for result in futures::future::join_all(self.tasks).await {
            if let Err(e) = result {
                warn!("fetch task aborted: {}", e);
            }
        }

        self.store
    }
}

/// Spawn one source's fetch task.
fn spawn_source<F>(store: &Arc<AggregateStore>, id: SourceId, fetch: F) -> JoinHandle<()>
where
    F: Future<Output = Result<NormalizedStat, ProviderError>> + Send + 'static,
{
    let store = Arc::clone(store);

    tokio::spawn(async move {
        run_source(&store, id, fetch).await;
    })
}

/// Drive one source to its terminal state.
///
/// Fetch and normalization failures of any kind collapse into the fallback
/// literal; nothing escalates past the owning source.
async fn run_source<F>(store: &AggregateStore, id: SourceId, fetch: F)
where
    F: Future<Output = Result<NormalizedStat, ProviderError>>,
{
    let state = match fetch.await {
        Ok(stat) => {
            info!(source = %id, stat = %stat.summary(), "source resolved");
            SourceState::Resolved(stat)
        }
        Err(err) => {
            warn!(
                source = %id,
                kind = err.kind(),
                error = %err,
                "source unavailable, using fallback literal"
            );
            SourceState::Fallback(fallback_stat(id))
        }
    };

    let _ = store.update(id, state);
}
