//! Document fan-out coordinator.
//!
//! Runs one Normalizer → Tokenizer → phrase counter pipeline per document,
//! concurrently, and hands each finished [`FrequencyTable`] back in
//! completion order.
//!
//! ## Ownership
//!
//! Every pipeline task owns its document bytes, its [`PhraseCounter`] and the
//! table it produces. Nothing mutable is shared between tasks; the only
//! shared object is the optional concurrency [`Semaphore`].
//!
//! ## Delivery
//!
//! [`Completions::next`] yields each submitted document exactly once, success
//! or failure, and returns `None` once all of them have been delivered (or
//! immediately when nothing was submitted). Dropping [`Completions`] aborts
//! the tasks still running; their partial tables are never reported.
//!
//! ```text
//! Pending → Reading → Counting → Ranked → Delivered
//!              │          │
//!              └──────────┴────→ Failed
//! ```
//!
//! The coordinator drives `Pending` through `Counting`; the output stage
//! records `Ranked` and `Delivered` with [`trace_transition`].

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tracing::{debug, info, warn};
use triphrase_types::{CountError, CounterConfig, DocId, WordPolicy};

use crate::table::{FrequencyTable, PhraseCounter};

/// Lifecycle of one document pipeline. No state is revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Submitted, task not started yet
    Pending,
    /// Waiting for a permit or reading bytes
    Reading,
    /// Normalizing, tokenizing and counting
    Counting,
    /// Table ranked by the output stage
    Ranked,
    /// Report written
    Delivered,
    /// Absorbing failure state
    Failed,
}

impl PipelineState {
    /// Returns `true` for `Delivered` and `Failed`.
    #[inline(always)]
    pub const fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Delivered | PipelineState::Failed)
    }

    /// Returns `true` if `self → next` is a legal transition.
    pub const fn can_advance_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Pending, Reading)
                | (Reading, Counting)
                | (Counting, Ranked)
                | (Ranked, Delivered)
                | (Reading, Failed)
                | (Counting, Failed)
        )
    }

    /// Lowercase name used in log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            PipelineState::Pending => "pending",
            PipelineState::Reading => "reading",
            PipelineState::Counting => "counting",
            PipelineState::Ranked => "ranked",
            PipelineState::Delivered => "delivered",
            PipelineState::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logs a pipeline state change for document `name`.
#[inline]
pub fn trace_transition(name: &str, from: PipelineState, to: PipelineState) {
    debug_assert!(
        from.can_advance_to(to),
        "illegal pipeline transition {from} -> {to}"
    );
    debug!(doc = %name, from = %from, to = %to, "pipeline state");
}

/// Where a document's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Read from the filesystem inside the pipeline task.
    Path(PathBuf),
    /// Already in memory (standard input, tests).
    Bytes(Vec<u8>),
}

impl DocumentSource {
    async fn read(self) -> io::Result<Vec<u8>> {
        match self {
            DocumentSource::Path(path) => tokio::fs::read(path).await,
            DocumentSource::Bytes(bytes) => Ok(bytes),
        }
    }
}

/// One input submitted to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Caller-assigned identifier
    pub id: DocId,
    /// Display name used in reports and diagnostics
    pub name: String,
    /// Byte source
    pub source: DocumentSource,
}

impl Document {
    /// A document read from `path`, named after it.
    pub fn from_path(id: DocId, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id,
            name: path.display().to_string(),
            source: DocumentSource::Path(path),
        }
    }

    /// A document whose bytes are already in memory.
    pub fn from_bytes(id: DocId, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            name: name.into(),
            source: DocumentSource::Bytes(bytes.into()),
        }
    }
}

/// Failure of one document's pipeline. Never affects sibling documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document could not be read.
    #[error("{name}: {source}")]
    Read {
        /// Document name
        name: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The counter rejected the document.
    #[error("{name}: {source}")]
    Count {
        /// Document name
        name: String,
        /// Counter error
        #[source]
        source: CountError,
    },
    /// The pipeline task could not finish (permit unavailable, counting panicked).
    #[error("{name}: pipeline task failed while {stage}: {reason}")]
    Task {
        /// Document name
        name: String,
        /// State the task was in
        stage: PipelineState,
        /// Runtime-provided description
        reason: String,
    },
}

impl DocumentError {
    /// Name of the failed document.
    pub fn name(&self) -> &str {
        match self {
            DocumentError::Read { name, .. }
            | DocumentError::Count { name, .. }
            | DocumentError::Task { name, .. } => name,
        }
    }

    /// State the pipeline failed from (`Reading` or `Counting`).
    pub fn stage(&self) -> PipelineState {
        match self {
            DocumentError::Read { .. } => PipelineState::Reading,
            DocumentError::Count { .. } => PipelineState::Counting,
            DocumentError::Task { stage, .. } => *stage,
        }
    }
}

/// Result of one document's pipeline, delivered exactly once.
#[derive(Debug)]
pub struct DocumentOutcome {
    /// Identifier from the submitted [`Document`]
    pub id: DocId,
    /// Display name from the submitted [`Document`]
    pub name: String,
    /// The finished table, or why there is none
    pub result: Result<FrequencyTable, DocumentError>,
}

/// Fan-out configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutConfig {
    /// Maximum pipelines in flight. `None` runs every document at once.
    pub max_concurrency: Option<usize>,
    /// Configuration for each document's counter.
    pub counter: CounterConfig,
}

impl FanOutConfig {
    /// Bounds in-flight pipelines to `max(limit, 1)`.
    pub const fn bounded(limit: usize) -> Self {
        Self {
            max_concurrency: Some(limit),
            counter: CounterConfig {
                word_policy: WordPolicy::AlnumApostropheHyphen,
                max_document_bytes: None,
            },
        }
    }
}

/// Dispatches one pipeline task per document.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanOut {
    config: FanOutConfig,
}

impl FanOut {
    /// Creates a coordinator with the given configuration.
    pub const fn new(config: FanOutConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    pub const fn config(&self) -> &FanOutConfig {
        &self.config
    }

    /// Starts a pipeline for every document and returns the completion stream.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<I>(&self, documents: I) -> Completions
    where
        I: IntoIterator<Item = Document>,
    {
        let permits = self
            .config
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        let mut tasks = JoinSet::new();
        let mut pending = FxHashMap::default();
        for document in documents {
            let label = (document.id, document.name.clone());
            let handle = tasks.spawn(run_pipeline(
                document,
                self.config.counter,
                permits.clone(),
            ));
            pending.insert(handle.id(), label);
        }

        let submitted = tasks.len();
        debug!(
            documents = submitted,
            max_concurrency = ?self.config.max_concurrency,
            "fan-out started"
        );

        Completions {
            tasks,
            pending,
            submitted,
            delivered: 0,
        }
    }
}

/// Completion-ordered stream of [`DocumentOutcome`]s.
#[derive(Debug)]
pub struct Completions {
    tasks: JoinSet<DocumentOutcome>,
    /// Documents not yet delivered, keyed by their pipeline task
    pending: FxHashMap<task::Id, (DocId, String)>,
    submitted: usize,
    delivered: usize,
}

impl Completions {
    /// Waits for the next document to finish.
    ///
    /// Returns `None` once every submitted document has been delivered.
    pub async fn next(&mut self) -> Option<DocumentOutcome> {
        while let Some(joined) = self.tasks.join_next_with_id().await {
            let (task_id, outcome) = match joined {
                Ok((task_id, outcome)) => (task_id, outcome),
                Err(err) => {
                    let task_id = err.id();
                    let Some((id, name)) = self.pending.remove(&task_id) else {
                        continue;
                    };
                    // The pipeline body panicked past its last state change.
                    warn!(doc = %name, error = %err, "pipeline task panicked");
                    let outcome = DocumentOutcome {
                        id,
                        result: Err(DocumentError::Task {
                            name: name.clone(),
                            stage: PipelineState::Counting,
                            reason: err.to_string(),
                        }),
                        name,
                    };
                    (task_id, outcome)
                }
            };
            self.pending.remove(&task_id);
            self.delivered += 1;
            return Some(outcome);
        }
        None
    }

    /// Number of documents submitted.
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Number of outcomes delivered so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Number of pipelines not yet delivered.
    pub fn remaining(&self) -> usize {
        self.tasks.len()
    }

    /// Drains the stream into a vector in completion order.
    pub async fn collect(mut self) -> Vec<DocumentOutcome> {
        let mut out = Vec::with_capacity(self.submitted);
        while let Some(outcome) = self.next().await {
            out.push(outcome);
        }
        out
    }
}

async fn run_pipeline(
    document: Document,
    config: CounterConfig,
    permits: Option<Arc<Semaphore>>,
) -> DocumentOutcome {
    let Document { id, name, source } = document;
    let result = pipeline(&name, source, config, permits).await;

    match &result {
        Ok(table) => info!(doc = %name, stats = %table.stats(), "document counted"),
        Err(err) => {
            trace_transition(&name, err.stage(), PipelineState::Failed);
            warn!(doc = %name, stage = %err.stage(), error = %err, "document failed");
        }
    }

    DocumentOutcome { id, name, result }
}

async fn pipeline(
    name: &str,
    source: DocumentSource,
    config: CounterConfig,
    permits: Option<Arc<Semaphore>>,
) -> Result<FrequencyTable, DocumentError> {
    trace_transition(name, PipelineState::Pending, PipelineState::Reading);

    // Held until counting finishes so the bound covers CPU work too.
    let _permit = match permits {
        Some(semaphore) => Some(semaphore.acquire_owned().await.map_err(|err| {
            DocumentError::Task {
                name: name.to_owned(),
                stage: PipelineState::Reading,
                reason: err.to_string(),
            }
        })?),
        None => None,
    };

    let bytes = source.read().await.map_err(|source| DocumentError::Read {
        name: name.to_owned(),
        source,
    })?;

    trace_transition(name, PipelineState::Reading, PipelineState::Counting);

    let counted =
        tokio::task::spawn_blocking(move || PhraseCounter::with_config(config).count(&bytes))
            .await;

    match counted {
        Ok(Ok(table)) => Ok(table),
        Ok(Err(source)) => Err(DocumentError::Count {
            name: name.to_owned(),
            source,
        }),
        Err(err) => Err(DocumentError::Task {
            name: name.to_owned(),
            stage: PipelineState::Counting,
            reason: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::count_trigrams;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use tracing::{span, Event, Level, Metadata, Subscriber};

    fn as_map(table: &FrequencyTable) -> BTreeMap<String, u32> {
        table.iter().map(|(p, c)| (p.to_string(), c)).collect()
    }

    #[tokio::test]
    async fn zero_documents_complete_immediately() {
        let mut completions = FanOut::default().spawn(Vec::new());
        assert_eq!(completions.submitted(), 0);
        assert!(completions.next().await.is_none());
        assert_eq!(completions.delivered(), 0);
    }

    #[tokio::test]
    async fn concurrent_tables_match_sequential_counting() {
        let d1 = b"The cat sat. The cat sat. The dog ran.".to_vec();
        let d2 = b"one two three four one two three".to_vec();

        let outcomes = FanOut::default()
            .spawn([
                Document::from_bytes(0, "d1", d1.clone()),
                Document::from_bytes(1, "d2", d2.clone()),
            ])
            .collect()
            .await;

        assert_eq!(outcomes.len(), 2);
        for outcome in outcomes {
            let table = outcome.result.expect("should count");
            let expected = match outcome.id {
                0 => count_trigrams(&d1).expect("should count"),
                1 => count_trigrams(&d2).expect("should count"),
                other => panic!("unexpected id {other}"),
            };
            assert_eq!(as_map(&table), as_map(&expected));
        }
    }

    #[tokio::test]
    async fn read_failure_is_isolated() {
        let missing = std::env::temp_dir().join("triphrase-definitely-missing.txt");
        let outcomes = FanOut::default()
            .spawn([
                Document::from_path(0, &missing),
                Document::from_bytes(1, "ok", "a b c a b c"),
            ])
            .collect()
            .await;

        assert_eq!(outcomes.len(), 2);
        for outcome in outcomes {
            match outcome.id {
                0 => {
                    let err = outcome.result.expect_err("missing file must fail");
                    assert!(matches!(err, DocumentError::Read { .. }));
                    assert_eq!(err.stage(), PipelineState::Reading);
                    assert_eq!(err.name(), missing.display().to_string());
                    assert!(err.to_string().starts_with(&missing.display().to_string()));
                }
                1 => {
                    let table = outcome.result.expect("sibling must succeed");
                    assert_eq!(table.get("a b c"), Some(2));
                }
                other => panic!("unexpected id {other}"),
            }
        }
    }

    #[tokio::test]
    async fn count_failure_is_isolated() {
        let config = FanOutConfig {
            max_concurrency: None,
            counter: CounterConfig::with_max_bytes(8),
        };
        let outcomes = FanOut::new(config)
            .spawn([
                Document::from_bytes(0, "big", "this one is far too long"),
                Document::from_bytes(1, "small", "a b c"),
            ])
            .collect()
            .await;

        for outcome in outcomes {
            match outcome.id {
                0 => {
                    let err = outcome.result.expect_err("oversized must fail");
                    assert_eq!(err.stage(), PipelineState::Counting);
                    assert!(matches!(
                        err,
                        DocumentError::Count {
                            source: CountError::TooLarge { .. },
                            ..
                        }
                    ));
                }
                1 => assert_eq!(outcome.result.expect("should count").len(), 1),
                other => panic!("unexpected id {other}"),
            }
        }
    }

    #[tokio::test]
    async fn reads_documents_from_files() {
        let path = std::env::temp_dir().join(format!(
            "triphrase-fanout-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "Red fish blue fish. Red fish blue fish.").expect("write temp file");

        let outcomes = FanOut::default()
            .spawn([Document::from_path(7, &path)])
            .collect()
            .await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].id, 7);
        let table = outcomes[0].result.as_ref().expect("should count");
        assert_eq!(table.get("red fish blue"), Some(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn bounded_fan_out_delivers_each_document_once() {
        let documents = (0..50u32).map(|i| {
            Document::from_bytes(i, format!("doc{i}"), format!("word{i} shared phrase here"))
        });

        let mut completions = FanOut::new(FanOutConfig::bounded(3)).spawn(documents);
        assert_eq!(completions.submitted(), 50);

        let mut seen = Vec::new();
        while let Some(outcome) = completions.next().await {
            let table = outcome.result.expect("should count");
            assert_eq!(table.get("shared phrase here"), Some(1));
            seen.push(outcome.id);
        }

        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
        assert_eq!(completions.delivered(), 50);
        assert_eq!(completions.remaining(), 0);
    }

    #[tokio::test]
    async fn zero_limit_is_treated_as_one() {
        let outcomes = FanOut::new(FanOutConfig::bounded(0))
            .spawn((0..4u32).map(|i| Document::from_bytes(i, "d", "x y z")))
            .collect()
            .await;
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
    }

    /// Counts `info` events on the current thread; optionally panics on them.
    struct InfoEvents {
        seen: Arc<AtomicUsize>,
        panic_on_info: bool,
    }

    impl Subscriber for InfoEvents {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
            span::Id::from_u64(1)
        }

        fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

        fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

        fn event(&self, event: &Event<'_>) {
            if *event.metadata().level() == Level::INFO {
                self.seen.fetch_add(1, AtomicOrdering::SeqCst);
                if self.panic_on_info {
                    panic!("info event rejected");
                }
            }
        }

        fn enter(&self, _: &span::Id) {}

        fn exit(&self, _: &span::Id) {}
    }

    fn current_thread_runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime")
    }

    #[test]
    fn panicked_pipeline_is_still_delivered() {
        let subscriber = InfoEvents {
            seen: Arc::new(AtomicUsize::new(0)),
            panic_on_info: true,
        };

        let outcomes = tracing::subscriber::with_default(subscriber, || {
            current_thread_runtime().block_on(async {
                FanOut::default()
                    .spawn([Document::from_bytes(0, "d", "a b c d")])
                    .collect()
                    .await
            })
        });

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].id, 0);
        assert_eq!(outcomes[0].name, "d");
        match &outcomes[0].result {
            Err(err @ DocumentError::Task { .. }) => {
                assert_eq!(err.stage(), PipelineState::Counting);
                assert_eq!(err.name(), "d");
            }
            other => panic!("expected a task failure, got {other:?}"),
        }
    }

    #[test]
    fn dropping_completions_aborts_pending_pipelines() {
        let dir = std::env::temp_dir().join(format!("triphrase-drop-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let documents: Vec<_> = (0..8u32)
            .map(|i| {
                let path = dir.join(format!("doc{i}.txt"));
                std::fs::write(&path, "one two three four").expect("write temp file");
                Document::from_path(i, path)
            })
            .collect();

        let counted = Arc::new(AtomicUsize::new(0));
        let subscriber = InfoEvents {
            seen: Arc::clone(&counted),
            panic_on_info: false,
        };

        let (at_drop, after_drop) = tracing::subscriber::with_default(subscriber, || {
            current_thread_runtime().block_on(async {
                let mut completions =
                    FanOut::new(FanOutConfig::bounded(1)).spawn(documents);

                let first = completions.next().await.expect("one outcome");
                assert!(first.result.is_ok());
                assert!(completions.remaining() > 0);

                let at_drop = counted.load(AtomicOrdering::SeqCst);
                drop(completions);

                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                (at_drop, counted.load(AtomicOrdering::SeqCst))
            })
        });
        let _ = std::fs::remove_dir_all(&dir);

        assert!(at_drop < 8, "every pipeline finished before the drop");
        assert_eq!(after_drop, at_drop, "an aborted pipeline kept counting");
    }

    #[test]
    fn pipeline_transitions() {
        use PipelineState::*;

        assert!(Pending.can_advance_to(Reading));
        assert!(Reading.can_advance_to(Counting));
        assert!(Counting.can_advance_to(Ranked));
        assert!(Ranked.can_advance_to(Delivered));
        assert!(Reading.can_advance_to(Failed));
        assert!(Counting.can_advance_to(Failed));

        assert!(!Pending.can_advance_to(Counting));
        assert!(!Ranked.can_advance_to(Failed));
        assert!(!Delivered.can_advance_to(Reading));
        assert!(!Failed.can_advance_to(Reading));
        assert!(!Counting.can_advance_to(Reading));

        assert!(Delivered.is_terminal());
        assert!(Failed.is_terminal());
        assert!(!Counting.is_terminal());
        assert_eq!(Counting.to_string(), "counting");
    }
}
