//! Export artifacts: the nested hierarchy JSON and the flattened path table.

use std::fs;
use std::path::Path;

use tracing::{info, instrument};

use crate::arena::Forest;
use crate::errors::{PipelineError, PipelineResult};
use crate::table::PathTable;

/// Nested hierarchy artifact filename.
pub const HIERARCHY_FILE: &str = "cpc_hierarchy.json";
/// Flattened leaf-path table artifact filename.
pub const PATHS_FILE: &str = "cpc_paths.tsv";

/// Serialize the forest as an indented UTF-8 JSON array of nested nodes.
#[instrument(level = "debug", skip(forest))]
pub fn write_hierarchy_json(forest: &Forest, path: &Path) -> PipelineResult<()> {
    let json = serde_json::to_string_pretty(&forest.to_nested())?;
    fs::write(path, json).map_err(|source| PipelineError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote hierarchy to {}", path.display());
    Ok(())
}

/// Write the flattened table as tab-separated text.
#[instrument(level = "debug", skip(table))]
pub fn write_paths_table(table: &PathTable, path: &Path) -> PipelineResult<()> {
    fs::write(path, table.to_tsv()).map_err(|source| PipelineError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote {} leaf paths to {}", table.rows.len(), path.display());
    Ok(())
}

/// Write both artifacts into `output_dir`, creating it if needed.
///
/// A write failure halts the run; the in-memory forest is untouched and the
/// caller may retry.
#[instrument(level = "debug", skip(forest))]
pub fn export_all(forest: &Forest, output_dir: &Path) -> PipelineResult<()> {
    fs::create_dir_all(output_dir).map_err(|source| PipelineError::OutputWrite {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let table = PathTable::from_forest(forest);
    info!(
        depth = forest.depth(),
        leaf_paths = table.rows.len(),
        "flattened hierarchy"
    );

    write_hierarchy_json(forest, &output_dir.join(HIERARCHY_FILE))?;
    write_paths_table(&table, &output_dir.join(PATHS_FILE))?;
    Ok(())
}
