//! Staged fallback search for partial or misspelled titles.
//!
//! Phases run strictly in order and stop at the first one producing results:
//! the query as typed, then with a trailing wildcard (queries of at least
//! `min_wildcard_len` characters), then with each common article prefix.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use cinefind_core::MovieRecord;
use cinefind_core::config::SearchConfig;
use futures::FutureExt;

use crate::errors::MovieSearchError;
use crate::matcher::PartialTitleMatcher;
use crate::types::{SearchReport, SearchStrategy};

/// When a phase is eligible to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTrigger {
    /// Runs for every query
    Always,
    /// Only for queries of at least this many characters
    MinQueryLen(usize),
}

impl PhaseTrigger {
    /// True when a phase with this trigger may run for the trimmed `query`.
    pub fn allows(&self, query: &str) -> bool {
        match self {
            PhaseTrigger::Always => true,
            PhaseTrigger::MinQueryLen(min) => query.chars().count() >= *min,
        }
    }
}

/// One step of the fallback plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPhase {
    /// How the query is rewritten
    pub strategy: SearchStrategy,
    /// When the phase applies
    pub trigger: PhaseTrigger,
}

/// Progress of one fallback invocation. Never outlives the call.
#[derive(Debug, Clone)]
pub struct FallbackState {
    /// Trimmed user query
    pub query: String,
    /// Strategies already tried, in order
    pub attempted: Vec<SearchStrategy>,
    /// Results of the last phase that ran
    pub results: Vec<MovieRecord>,
}

impl FallbackState {
    fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            attempted: Vec::new(),
            results: Vec::new(),
        }
    }
}

/// Walks the fallback plan on top of a [`PartialTitleMatcher`].
#[derive(Debug, Clone)]
pub struct FallbackSearch {
    matcher: PartialTitleMatcher,
    phases: Vec<FallbackPhase>,
}

impl FallbackSearch {
    /// Creates an orchestrator running the phases planned from `config`.
    pub fn new(matcher: PartialTitleMatcher, config: &SearchConfig) -> Self {
        Self {
            matcher,
            phases: Self::plan(config),
        }
    }

    /// Builds the ordered phase list from configuration.
    pub fn plan(config: &SearchConfig) -> Vec<FallbackPhase> {
        let mut phases = vec![
            FallbackPhase {
                strategy: SearchStrategy::Direct,
                trigger: PhaseTrigger::Always,
            },
            FallbackPhase {
                strategy: SearchStrategy::Wildcard,
                trigger: PhaseTrigger::MinQueryLen(config.min_wildcard_len),
            },
        ];
        phases.extend(config.fallback_prefixes.iter().map(|&prefix| FallbackPhase {
            strategy: SearchStrategy::Prefix(prefix),
            trigger: PhaseTrigger::Always,
        }));
        phases
    }

    /// Phases in execution order.
    pub fn phases(&self) -> &[FallbackPhase] {
        &self.phases
    }

    /// Searches with progressively broader queries until something matches.
    ///
    /// Always returns a report with either results or an error message. Blank
    /// queries are rejected without any network call. A panic in a lower layer
    /// is caught and reported as a generic failure.
    pub async fn search_with_fallback(&self, query: &str) -> SearchReport {
        let query = query.trim();
        if query.is_empty() {
            return SearchReport::failure(MovieSearchError::EmptyQuery.to_string(), Vec::new());
        }

        let mut state = FallbackState::new(query);
        let run = AssertUnwindSafe(self.run_phases(&mut state))
            .catch_unwind()
            .await;

        match run {
            Ok(()) if !state.results.is_empty() => {
                SearchReport::success(state.results, state.attempted)
            }
            Ok(()) => {
                tracing::info!(
                    "No matches for '{}' after {} phases",
                    query,
                    state.attempted.len()
                );
                SearchReport::failure(format!("No movies found matching: {query}"), state.attempted)
            }
            Err(panic) => {
                let description = panic_description(panic.as_ref());
                tracing::error!("Fallback search for '{}' failed: {}", query, description);
                SearchReport::failure(format!("Search failed: {description}"), state.attempted)
            }
        }
    }

    async fn run_phases(&self, state: &mut FallbackState) {
        for phase in &self.phases {
            if !phase.trigger.allows(&state.query) {
                tracing::debug!("Skipping {} phase for '{}'", phase.strategy, state.query);
                continue;
            }

            let term = phase.strategy.apply(&state.query);
            state.attempted.push(phase.strategy);
            tracing::debug!("Trying {} phase with '{}'", phase.strategy, term);

            let results = self.matcher.match_partial_title(&term, &state.query).await;
            if !results.is_empty() {
                tracing::info!(
                    "{} phase found {} movies for '{}'",
                    phase.strategy,
                    results.len(),
                    state.query
                );
                state.results = results;
                return;
            }
        }
    }
}

fn panic_description(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected internal error".to_string()
    }
}
