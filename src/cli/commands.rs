use std::fs;
use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::arena::Forest;
use crate::builder::{discover_files, CollectingSink, LogSink};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::config::{self, Settings};
use crate::errors::{PipelineError, PipelineResult};
use crate::{build_forest, export};

pub fn execute_command(cli: &Cli) -> PipelineResult<()> {
    let settings = load_settings(cli)?;

    match &cli.command {
        // `cpctree` with no subcommand is the primary operation.
        None | Some(Commands::Run) => _run(&settings),
        Some(Commands::Tree) => _tree(&settings),
        Some(Commands::Paths) => _paths(&settings),
        Some(Commands::Info) => _info(&settings),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => _config_show(&settings),
            ConfigCommands::Init { global } => _config_init(&settings, *global),
            ConfigCommands::Path => _config_path(),
        },
        Some(Commands::Completion { shell }) => _completion(*shell),
    }
}

fn load_settings(cli: &Cli) -> PipelineResult<Settings> {
    let mut settings = Settings::load()?;
    if let Some(data_dir) = &cli.data_dir {
        settings.data_dir = data_dir.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        settings.output_dir = output_dir.clone();
    }
    Ok(settings)
}

#[instrument(skip(settings))]
fn _run(settings: &Settings) -> PipelineResult<()> {
    let mut sink = LogSink;
    let forest = build_forest(settings, &mut sink)?;
    export::export_all(&forest, &settings.output_dir)?;
    output::action(
        "Wrote",
        &settings.output_dir.join(export::HIERARCHY_FILE).display(),
    );
    output::action(
        "Wrote",
        &settings.output_dir.join(export::PATHS_FILE).display(),
    );
    Ok(())
}

#[instrument(skip(settings))]
fn _tree(settings: &Settings) -> PipelineResult<()> {
    let mut sink = LogSink;
    let forest = build_forest(settings, &mut sink)?;
    for &root in forest.roots() {
        output::info(&to_termtree(&forest, root));
    }
    Ok(())
}

fn to_termtree(forest: &Forest, idx: Index) -> Tree<String> {
    let Some(node) = forest.get_node(idx) else {
        return Tree::new(String::new());
    };
    let label = if node.data.title.is_empty() {
        node.data.code.clone()
    } else {
        format!("{}  {}", node.data.code, node.data.title)
    };
    let leaves: Vec<_> = node
        .children
        .iter()
        .map(|&child| to_termtree(forest, child))
        .collect();
    Tree::new(label).with_leaves(leaves)
}

#[instrument(skip(settings))]
fn _paths(settings: &Settings) -> PipelineResult<()> {
    let mut sink = LogSink;
    let forest = build_forest(settings, &mut sink)?;
    for path in forest.leaf_paths() {
        let line = path.iter().map(|&idx| forest.code_of(idx)).join(" > ");
        output::info(&line);
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _info(settings: &Settings) -> PipelineResult<()> {
    let files = discover_files(
        &settings.data_dir,
        &settings.file_prefix,
        &settings.file_suffix,
    )?;
    let mut sink = CollectingSink::default();
    let forest = build_forest(settings, &mut sink)?;

    output::header("Source");
    output::detail(&format!("data dir: {}", settings.data_dir.display()));
    output::detail(&format!("title list files: {}", files.len()));

    output::header("Hierarchy");
    output::detail(&format!("nodes: {}", forest.node_count()));
    output::detail(&format!("roots: {}", forest.roots().len()));
    output::detail(&format!("max depth: {}", forest.depth()));
    output::detail(&format!("leaf paths: {}", forest.leaf_paths().len()));
    output::detail(&format!("warnings: {}", sink.warnings.len()));
    Ok(())
}

fn _config_show(settings: &Settings) -> PipelineResult<()> {
    output::info(&settings.to_template()?);
    Ok(())
}

fn _config_init(settings: &Settings, global: bool) -> PipelineResult<()> {
    let path = if global {
        config::global_config_path().ok_or_else(|| {
            PipelineError::Config("Cannot determine global config directory".to_string())
        })?
    } else {
        config::local_config_path()
    };

    if path.exists() {
        return Err(PipelineError::Config(format!(
            "Config already exists: {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| PipelineError::OutputWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(&path, settings.to_template()?).map_err(|source| PipelineError::OutputWrite {
        path: path.clone(),
        source,
    })?;
    output::action("Created", &path.display());
    Ok(())
}

fn _config_path() -> PipelineResult<()> {
    if let Some(global) = config::global_config_path() {
        let marker = if global.exists() { "(exists)" } else { "(absent)" };
        output::detail(&format!("global: {} {}", global.display(), marker));
    }
    let local = config::local_config_path();
    let marker = if local.exists() { "(exists)" } else { "(absent)" };
    output::detail(&format!("local:  {} {}", local.display(), marker));
    Ok(())
}

fn _completion(shell: clap_complete::Shell) -> PipelineResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
