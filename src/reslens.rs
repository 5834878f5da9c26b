use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::config::{get_config_path, load_config, save_config, ResLensConfig, SourceConfig};
use crate::errors::Result;
use crate::resolution::{join_path, PathResolver};
use crate::scanner::{ReferenceScanner, TokenGrammar};
use crate::sources::{self, ResourceSource};
use crate::store::{RefreshOutcome, ResourceStore, Snapshot};
use crate::tree::{build_forest, Forest};
use crate::types::*;

/// Session context tying together configuration, the record source and the
/// live resource store.
///
/// Every host-facing operation goes through a `ResLens`. Derived structures
/// (forest, paths, matches) are recomputed from the current snapshot on each
/// call.
pub struct ResLens {
    config: ResLensConfig,
    project_root: PathBuf,
    grammar: TokenGrammar,
    store: ResourceStore,
    source: Box<dyn ResourceSource>,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl ResLens {
    /// Initializes a project at `project_root`, writing a configuration that
    /// points at `source` (or the default source).
    pub fn init(project_root: &Path, source: Option<SourceConfig>) -> Result<Self> {
        let config = ResLensConfig {
            source: source.unwrap_or_default(),
            ..ResLensConfig::default()
        };
        save_config(project_root, &config)?;
        info!(root = %project_root.display(), "initialized reslens project");
        Ok(Self::with_config(config, project_root))
    }

    /// Opens the project at `project_root`. A missing config file means
    /// default settings.
    pub fn open(project_root: &Path) -> Result<Self> {
        let config = load_config(project_root)?;
        Ok(Self::with_config(config, project_root))
    }

    /// Builds a context from an in-memory configuration, using the source it
    /// describes.
    pub fn with_config(config: ResLensConfig, project_root: &Path) -> Self {
        let source = sources::from_config(&config.source, project_root);
        Self::with_source(config, project_root, source)
    }

    /// Builds a context around an explicit source.
    pub fn with_source(
        config: ResLensConfig,
        project_root: &Path,
        source: Box<dyn ResourceSource>,
    ) -> Self {
        let grammar = TokenGrammar::new(&config.token_ident);
        Self {
            config,
            project_root: project_root.to_path_buf(),
            grammar,
            store: ResourceStore::new(),
            source,
        }
    }

    /// Returns `true` if a config file exists under `project_root`.
    pub fn is_initialized(project_root: &Path) -> bool {
        get_config_path(project_root).exists()
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

impl ResLens {
    /// Fetches records from the configured source and publishes them.
    /// On failure the previous snapshot stays live.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        self.store.refresh(self.source.as_ref()).await
    }

    /// The live snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    /// Looks up a resource by id key in the live snapshot.
    pub fn lookup(&self, id: &str) -> Option<Resource> {
        self.store.lookup_by_id(id)
    }

    /// Builds the forest for the live snapshot.
    pub fn forest(&self) -> Forest {
        build_forest(self.snapshot().records())
    }

    /// Path segments for the resource with the given id key.
    pub fn resolve(&self, id: &str) -> Option<Vec<String>> {
        let snapshot = self.snapshot();
        PathResolver::new(&snapshot).resolve_id(id)
    }

    /// Delimited path for the resource with the given id key.
    pub fn resolve_joined(&self, id: &str) -> Option<String> {
        self.resolve(id)
            .map(|segments| join_path(&segments, &self.config.path_delimiter))
    }
}

// ---------------------------------------------------------------------------
// Host projections
// ---------------------------------------------------------------------------

impl ResLens {
    /// Annotations and status for a whole buffer.
    pub fn scan(&self, text: &str, cursor: Option<Position>) -> ScanResult {
        let snapshot = self.snapshot();
        self.scanner(&snapshot).scan(text, cursor)
    }

    /// Hover content for the token at `position`.
    pub fn hover(&self, text: &str, position: Position) -> Option<HoverPayload> {
        let snapshot = self.snapshot();
        self.scanner(&snapshot)
            .hover(text, position, &self.config.code_language)
    }

    /// Completion items for a line prefix ending at the cursor.
    pub fn completions(&self, prefix: &str) -> Vec<CompletionItem> {
        let snapshot = self.snapshot();
        self.scanner(&snapshot).completions(prefix)
    }

    /// Completion items for a cursor position inside a buffer.
    pub fn completions_at(&self, text: &str, position: Position) -> Vec<CompletionItem> {
        let snapshot = self.snapshot();
        self.scanner(&snapshot).completions_at(text, position)
    }

    fn scanner<'s>(&'s self, snapshot: &'s Snapshot) -> ReferenceScanner<'s> {
        ReferenceScanner::new(snapshot, &self.grammar, &self.config.path_delimiter)
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl ResLens {
    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &ResLensConfig {
        &self.config
    }

    /// Returns the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Describes the configured source.
    pub fn source_description(&self) -> String {
        self.source.describe()
    }
}
