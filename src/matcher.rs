//! The matcher facade: query resolution and administrative operations.
//!
//! Many concurrent lookups proceed in parallel against one generation;
//! reload and runtime adds are exclusive writers that build a complete
//! replacement generation and publish it with a single pointer swap.
//! A lookup that is already running keeps its `Arc` snapshot, so it
//! finishes against fully-old or fully-new state, never a mix.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::MatcherConfig;
use crate::error::{TanyaError, TanyaResult};
use crate::event::{self, EventBus, EventStream, MatchEvent};
use crate::generation::Generation;
use crate::loader;
use crate::score::{MatchMethod, Score};
use crate::similarity;
use crate::template::{Template, TemplateId};
use crate::variation;

/// The fuzzy strategy keeps this many times `max_matches` top-scored
/// candidates before applying the similarity threshold.
const FUZZY_POOL_FACTOR: usize = 2;

/// The keyword strategy's floor is this fraction of the similarity
/// threshold.
const KEYWORD_FLOOR_RATIO: f32 = 0.7;

/// Default hit bound for [`Matcher::search`].
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Read-only status snapshot, serialized in camelCase for the consuming
/// application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    /// Templates in the live generation.
    pub template_count: usize,

    /// Sorted distinct category labels.
    pub categories: Vec<String>,

    /// Answers cached in the live generation.
    pub cache_size: usize,

    /// When sources were last scanned; `None` before any scan found files.
    pub last_reload: Option<DateTime<Utc>>,

    /// Configured similarity threshold.
    pub threshold: f32,

    /// Whether any template is loaded.
    pub has_templates: bool,
}

/// One ranked hit from [`Matcher::search`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Canonical question text.
    pub question: String,

    /// Answer text.
    pub answer: String,

    /// Category label.
    pub category: String,

    /// Strategy score after merging.
    pub score: Score,

    /// Which strategy produced the surviving candidate.
    pub method: MatchMethod,
}

/// A merged candidate, keyed by template id during strategy merging.
#[derive(Debug, Clone)]
struct Candidate {
    template: Arc<Template>,
    score: Score,
    method: MatchMethod,
}

/// Template matching engine over CSV-loaded question/answer pairs.
///
/// # Examples
///
/// ```no_run
/// use tanya::{Matcher, MatcherConfig};
///
/// let matcher = Matcher::new(MatcherConfig::new("data/templates"))?;
/// if let Some(answer) = matcher.find_match("jam berapa buka") {
///     println!("{answer}");
/// }
/// # Ok::<(), tanya::TanyaError>(())
/// ```
#[derive(Debug)]
pub struct Matcher {
    config: MatcherConfig,
    current: RwLock<Arc<Generation>>,
    // Serializes reload/add and carries the last published version.
    writer: Mutex<u64>,
    events: Arc<EventBus>,
}

impl Matcher {
    /// Creates a matcher and performs the initial source scan.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range config, or a load
    /// error when the templates directory cannot be created or listed.
    /// Per-file and per-row source problems are not errors; they are
    /// logged and skipped.
    pub fn new(config: MatcherConfig) -> TanyaResult<Self> {
        config.validate()?;
        let events = Arc::new(EventBus::new(config.event_capacity));
        let matcher = Self {
            config,
            current: RwLock::new(Arc::new(Generation::empty(0))),
            writer: Mutex::new(0),
            events,
        };
        matcher.reload()?;
        Ok(matcher)
    }

    /// The configuration this matcher runs with.
    #[must_use]
    pub const fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Resolves a query to an answer using the configured candidate bound.
    ///
    /// Absence of a match is a normal `None`, never an error: empty
    /// queries, an empty collection, and below-threshold candidates all
    /// resolve the same way.
    #[must_use]
    pub fn find_match(&self, query: &str) -> Option<String> {
        self.find_match_limit(query, self.config.max_matches)
    }

    /// Resolves a query with an explicit bound on ranked candidates.
    #[must_use]
    pub fn find_match_limit(&self, query: &str, max_matches: usize) -> Option<String> {
        let generation = self.snapshot();
        if !generation.has_templates() {
            return None;
        }
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }

        let folded = variation::fold(trimmed);
        if let Some(answer) = generation.cache().get(&folded) {
            debug!(query = %event::preview(trimmed), "Cache hit");
            return Some(answer);
        }

        let mut candidates = self.rank(&generation, trimmed, &folded, max_matches);
        if candidates.is_empty() {
            return None;
        }
        let best = candidates.remove(0);
        let answer = best.template.answer.clone();
        generation.cache().insert(folded, answer.clone());

        info!(
            query = %event::preview(trimmed),
            answer = %event::preview(&answer),
            score = %best.score,
            method = %best.method,
            "Template matched"
        );
        self.events.publish(&MatchEvent::Resolved {
            template_id: best.template.id,
            category: best.template.category.clone(),
            method: best.method,
            score: best.score,
            query_preview: event::preview(trimmed),
            answer_preview: event::preview(&answer),
        });
        Some(answer)
    }

    /// Ranked inspection search: the same three strategies and ranking as
    /// [`Matcher::find_match`], but returning up to `limit` hits and
    /// never touching the result cache.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let generation = self.snapshot();
        let trimmed = query.trim();
        if trimmed.is_empty() || !generation.has_templates() {
            return Vec::new();
        }
        let folded = variation::fold(trimmed);
        self.rank(&generation, trimmed, &folded, limit)
            .into_iter()
            .map(|candidate| SearchHit {
                question: candidate.template.question.clone(),
                answer: candidate.template.answer.clone(),
                category: candidate.template.category.clone(),
                score: candidate.score,
                method: candidate.method,
            })
            .collect()
    }

    /// Re-scans the source directory and publishes a fresh generation
    /// with an empty result cache. Idempotent; safe with no sources.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or listed,
    /// or when a lock is poisoned. Individual file and row failures are
    /// collected, logged, and skipped.
    pub fn reload(&self) -> TanyaResult<()> {
        let mut writer = self.writer.lock().map_err(|_| lock_err("writer"))?;

        let report = loader::load_directory(&self.config.templates_dir)?;
        // The reload stamp only advances when the scan saw source files,
        // so an emptied directory keeps the previous stamp.
        let last_reload = if report.files_scanned > 0 {
            Some(Utc::now())
        } else {
            self.snapshot().last_reload()
        };

        *writer += 1;
        let version = *writer;
        let templates: Vec<Arc<Template>> =
            report.templates.into_iter().map(Arc::new).collect();
        let generation = Arc::new(Generation::new(version, templates, last_reload));
        self.publish(&generation)?;
        drop(writer);

        info!(
            version,
            templates = generation.template_count(),
            "Published generation"
        );
        self.events.publish(&MatchEvent::Reloaded {
            version,
            template_count: generation.template_count(),
        });
        Ok(())
    }

    /// Appends one template at runtime: builds and publishes a new
    /// generation containing it, which also clears the result cache so a
    /// cached miss can never shadow the new entry.
    ///
    /// A blank `category` falls back to "General".
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank question/answer, or an
    /// internal error for a poisoned lock. On error the live generation
    /// is unchanged.
    pub fn try_add_template(
        &self,
        question: &str,
        answer: &str,
        category: &str,
        priority: i32,
    ) -> TanyaResult<TemplateId> {
        let mut writer = self.writer.lock().map_err(|_| lock_err("writer"))?;

        let current = self.snapshot();
        let id = current.next_template_id();
        let template = Template::new(id, question, answer)?
            .with_category(category)
            .with_priority(priority);

        let mut templates = current.templates().to_vec();
        templates.push(Arc::new(template));

        *writer += 1;
        let version = *writer;
        let generation = Arc::new(Generation::new(version, templates, current.last_reload()));
        self.publish(&generation)?;
        drop(writer);

        info!(template_id = %id, question = %event::preview(question), "Added template");
        self.events.publish(&MatchEvent::TemplateAdded { template_id: id });
        Ok(id)
    }

    /// Boolean contract wrapper over [`Matcher::try_add_template`]:
    /// false only on failure, with the failure logged.
    pub fn add_template(
        &self,
        question: &str,
        answer: &str,
        category: &str,
        priority: i32,
    ) -> bool {
        match self.try_add_template(question, answer, category, priority) {
            Ok(_) => true,
            Err(err) => {
                warn!(%err, "add_template rejected");
                false
            }
        }
    }

    /// Read-only status snapshot of the live generation.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        let generation = self.snapshot();
        EngineStatus {
            template_count: generation.template_count(),
            categories: generation.categories(),
            cache_size: generation.cache().len(),
            last_reload: generation.last_reload(),
            threshold: self.config.similarity_threshold,
            has_templates: generation.has_templates(),
        }
    }

    /// All templates in the live generation, in id order.
    #[must_use]
    pub fn all_templates(&self) -> Vec<Arc<Template>> {
        self.snapshot().templates().to_vec()
    }

    /// Templates in a category, matched case-insensitively.
    #[must_use]
    pub fn templates_in_category(&self, category: &str) -> Vec<Arc<Template>> {
        self.snapshot().templates_in_category(category)
    }

    /// Sorted distinct category labels.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.snapshot().categories()
    }

    /// Returns true when at least one template is loaded.
    #[must_use]
    pub fn has_templates(&self) -> bool {
        self.snapshot().has_templates()
    }

    /// Number of templates in the live generation.
    #[must_use]
    pub fn template_count(&self) -> usize {
        self.snapshot().template_count()
    }

    /// Version of the live generation.
    #[must_use]
    pub fn generation_version(&self) -> u64 {
        self.snapshot().version()
    }

    /// Subscribes to match events.
    #[must_use]
    pub fn subscribe(&self) -> EventStream {
        self.events.subscribe()
    }

    /// Events dropped because a subscriber was full or gone.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.events.dropped_events()
    }

    /// Clones the live generation pointer. A poisoned lock still holds a
    /// whole `Arc`; the swap in [`Matcher::publish`] is the only write.
    fn snapshot(&self) -> Arc<Generation> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn publish(&self, generation: &Arc<Generation>) -> TanyaResult<()> {
        let mut current = self
            .current
            .write()
            .map_err(|_| lock_err("generation slot"))?;
        *current = Arc::clone(generation);
        Ok(())
    }

    /// Runs the three strategies, merges per template, ranks by
    /// (priority desc, score desc, id asc), and truncates to
    /// `max_matches`.
    fn rank(
        &self,
        generation: &Generation,
        raw: &str,
        folded: &str,
        max_matches: usize,
    ) -> Vec<Candidate> {
        let mut merged: HashMap<TemplateId, Candidate> = HashMap::new();

        for template in generation.templates() {
            if template.matches_exactly(folded) {
                merged.insert(
                    template.id,
                    Candidate {
                        template: Arc::clone(template),
                        score: Score::exact(),
                        method: MatchMethod::Exact,
                    },
                );
            }
        }

        let mut fuzzy: Vec<(Arc<Template>, Score)> = generation
            .templates()
            .iter()
            .map(|template| {
                let score = Score::from_ratio(similarity::partial_ratio(raw, &template.question));
                (Arc::clone(template), score)
            })
            .collect();
        fuzzy.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)));
        fuzzy.truncate(max_matches.saturating_mul(FUZZY_POOL_FACTOR));
        for (template, score) in fuzzy {
            if score.meets(self.config.similarity_threshold) {
                merge_candidate(
                    &mut merged,
                    Candidate {
                        template,
                        score,
                        method: MatchMethod::Fuzzy,
                    },
                );
            }
        }

        let keyword_floor = self.config.similarity_threshold * KEYWORD_FLOOR_RATIO;
        for template in generation.templates() {
            let score = Score::from_ratio(similarity::keyword_overlap(folded, &template.question));
            if score.meets(keyword_floor) {
                merge_candidate(
                    &mut merged,
                    Candidate {
                        template: Arc::clone(template),
                        score,
                        method: MatchMethod::Keyword,
                    },
                );
            }
        }

        debug!(
            candidates = merged.len(),
            max_matches,
            "Merged strategy candidates"
        );

        let mut candidates: Vec<Candidate> = merged.into_values().collect();
        candidates.sort_by(|a, b| {
            b.template
                .priority
                .cmp(&a.template.priority)
                .then_with(|| b.score.total_cmp(&a.score))
                .then_with(|| a.template.id.cmp(&b.template.id))
        });
        candidates.truncate(max_matches);
        candidates
    }
}

/// A later strategy's strictly higher score replaces the entry for the
/// same template; lower or equal keeps the existing one.
fn merge_candidate(merged: &mut HashMap<TemplateId, Candidate>, candidate: Candidate) {
    match merged.entry(candidate.template.id) {
        Entry::Occupied(mut entry) => {
            if candidate.score.total_cmp(&entry.get().score) == std::cmp::Ordering::Greater {
                entry.insert(candidate);
            }
        }
        Entry::Vacant(entry) => {
            entry.insert(candidate);
        }
    }
}

fn lock_err(context: &'static str) -> TanyaError {
    TanyaError::internal(format!("lock poisoned: {context}"))
}
