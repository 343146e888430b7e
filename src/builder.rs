//! Hierarchy builder: folds parsed records into a classification forest.
//!
//! Ancestry is resolved with a level-aware stack plus code-shape heuristics.
//! No anomaly is fatal here; unresolvable lines degrade to a deterministic
//! fallback and a warning on the injected sink.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use generational_arena::Index;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::arena::{Forest, NodeData};
use crate::errors::{PipelineError, PipelineResult};
use crate::parser::{LineParser, ParseOutcome, Record};

/// Receives non-fatal anomalies discovered while parsing and building.
///
/// The builder stays a pure function of (records, sink) -> forest, so tests
/// can assert on recoveries without capturing log output.
pub trait DiagnosticSink {
    fn warning(&mut self, message: String);
}

/// Routes warnings to the tracing subscriber. Production default.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warning(&mut self, message: String) {
        tracing::warn!("{}", message);
    }
}

/// Buffers warnings in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub warnings: Vec<String>,
}

impl DiagnosticSink for CollectingSink {
    fn warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Incremental state machine assembling the forest.
pub struct HierarchyBuilder {
    forest: Forest,
    /// code -> node, last writer wins
    registry: HashMap<String, Index>,
    /// current path of explicit-level ancestors, indexed by level
    ancestor_stack: Vec<Index>,
    /// most recent section heading; anchor for level-0 and orphan recovery
    last_section: Option<Index>,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self {
            forest: Forest::new(),
            registry: HashMap::new(),
            ancestor_stack: Vec::new(),
            last_section: None,
        }
    }

    /// Scan `data_dir` for title list files and build the full forest.
    ///
    /// Files are consumed in lexicographic filename order; file boundaries
    /// carry no meaning for the hierarchy.
    #[instrument(level = "debug", skip(self, sink))]
    pub fn build_from_directory(
        mut self,
        data_dir: &Path,
        prefix: &str,
        suffix: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> PipelineResult<Forest> {
        let files = discover_files(data_dir, prefix, suffix)?;
        debug!("found {} title list files", files.len());

        let parser = LineParser::new();
        for path in &files {
            let file = File::open(path)?;
            for line in BufReader::new(file).lines() {
                let line = line?;
                match parser.parse(&line) {
                    ParseOutcome::Record(record) => self.fold(record, sink),
                    ParseOutcome::Blank => {}
                    ParseOutcome::Unrecognized => {
                        sink.warning(format!("Could not parse line: '{}'", line.trim()));
                    }
                }
            }
        }

        Ok(self.finish())
    }

    /// Fold one record into the forest.
    pub fn fold(&mut self, record: Record, sink: &mut dyn DiagnosticSink) {
        match record {
            Record::Section { code, title } => self.fold_section(code, title, sink),
            Record::Entry { code, level, title } => self.fold_entry(code, level, title, sink),
        }
    }

    /// Consume the builder; stack and section anchor are discarded.
    pub fn finish(self) -> Forest {
        self.forest
    }

    fn fold_section(&mut self, code: String, title: String, sink: &mut dyn DiagnosticSink) {
        // A section starts over: explicit levels are relative to it alone.
        self.ancestor_stack.clear();

        let parent = self.section_parent(&code);
        let idx = self
            .forest
            .insert_node(NodeData { code: code.clone(), title }, parent);
        self.last_section = Some(idx);
        self.register(code, idx, sink);
    }

    /// Candidate parent for a section heading, by code shape.
    ///
    /// Three-character codes hang off their one-letter section. Longer codes
    /// first try dropping the final character (a registered subclass), then
    /// the three-character class prefix. One- and two-character codes are
    /// roots. Unresolvable candidates are the defined root case, not an
    /// anomaly.
    fn section_parent(&self, code: &str) -> Option<Index> {
        let candidate: Option<&str> = if code.len() == 3 {
            Some(&code[..1])
        } else if code.len() > 3 {
            let trimmed = &code[..code.len() - 1];
            if self.registry.contains_key(trimmed) {
                Some(trimmed)
            } else {
                Some(&code[..3])
            }
        } else {
            None
        };

        candidate.and_then(|c| self.registry.get(c).copied())
    }

    fn fold_entry(&mut self, code: String, level: usize, title: String, sink: &mut dyn DiagnosticSink) {
        // The nearest previously-seen node with a smaller level becomes the
        // stack top.
        self.ancestor_stack.truncate(level);

        let data = NodeData { code: code.clone(), title };
        let idx = if level == 0 {
            match self.last_section {
                Some(section) => self.forest.insert_node(data, Some(section)),
                None => {
                    sink.warning(format!(
                        "Found level 0 node '{}' without a section heading; adding to root",
                        code
                    ));
                    self.forest.insert_node(data, None)
                }
            }
        } else if let Some(&top) = self.ancestor_stack.last() {
            self.forest.insert_node(data, Some(top))
        } else {
            self.attach_orphan(data, level, sink)
        };

        self.ancestor_stack.push(idx);
        self.register(code, idx, sink);
    }

    /// Recovery for an explicit level with no valid ancestor path: the last
    /// section heading, then the last root, then a new root.
    fn attach_orphan(&mut self, data: NodeData, level: usize, sink: &mut dyn DiagnosticSink) -> Index {
        if let Some(section) = self.last_section {
            sink.warning(format!(
                "Found orphaned level {} node '{}'; attaching to section '{}'",
                level,
                data.code,
                self.forest.code_of(section)
            ));
            self.forest.insert_node(data, Some(section))
        } else if let Some(&root) = self.forest.roots().last() {
            sink.warning(format!(
                "Found orphaned level {} node '{}'; attaching to last root '{}'",
                level,
                data.code,
                self.forest.code_of(root)
            ));
            self.forest.insert_node(data, Some(root))
        } else {
            sink.warning(format!(
                "Found orphaned level {} node '{}' with no available parent; adding to root",
                level, data.code
            ));
            self.forest.insert_node(data, None)
        }
    }

    /// Register a code. Last writer wins: the earlier node stays in the tree
    /// but later parent lookups resolve to the newest one.
    fn register(&mut self, code: String, idx: Index, sink: &mut dyn DiagnosticSink) {
        if self.registry.insert(code.clone(), idx).is_some() {
            sink.warning(format!(
                "Duplicate code '{}'; later entry replaces the earlier one in the registry",
                code
            ));
        }
    }
}

/// Title list files under `data_dir`, lexicographically sorted by name.
/// The scan is flat: section files sit directly in the data directory.
#[instrument(level = "debug")]
pub fn discover_files(data_dir: &Path, prefix: &str, suffix: &str) -> PipelineResult<Vec<PathBuf>> {
    if !data_dir.is_dir() {
        return Err(PipelineError::SourceNotFound(data_dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(data_dir).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| PipelineError::Scan {
            path: data_dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with(prefix) && name.ends_with(suffix) {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(PipelineError::NoInputFiles {
            dir: data_dir.to_path_buf(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        });
    }

    Ok(files)
}
