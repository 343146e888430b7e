pub mod arena;
pub mod builder;
pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod parser;
pub mod table;
pub mod util;

pub use arena::{Forest, NestedNode, NodeData};
pub use builder::{CollectingSink, DiagnosticSink, HierarchyBuilder, LogSink};
pub use config::Settings;
pub use errors::{PipelineError, PipelineResult};
pub use parser::{LineParser, ParseOutcome, Record};
pub use table::PathTable;

/// Build the classification forest from the configured data directory.
pub fn build_forest(settings: &Settings, sink: &mut dyn DiagnosticSink) -> PipelineResult<Forest> {
    HierarchyBuilder::new().build_from_directory(
        &settings.data_dir,
        &settings.file_prefix,
        &settings.file_suffix,
        sink,
    )
}

/// Run the full pipeline: parse title lists, build the hierarchy, and write
/// both export artifacts into the output directory.
pub fn run(settings: &Settings) -> PipelineResult<()> {
    let mut sink = LogSink;
    let forest = build_forest(settings, &mut sink)?;
    export::export_all(&forest, &settings.output_dir)
}
