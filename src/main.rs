use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use feelscope::config::{self, WorkspaceConfig};
use feelscope::dmn_model::DmnDefinitions;
use feelscope::variables::{apply_batch, DocumentCommand, FeelVariables, VariablesRepository};

/// Feelscope - FEEL variable tracking for DMN documents
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workspace manifest naming the model and the models it imports
    #[arg(long, global = true, conflicts_with = "model")]
    manifest: Option<PathBuf>,

    /// Model file to load without external imports
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the scope tree with the variables declared in each scope
    Variables,

    /// Scan a FEEL expression in a scope and print the resolved references
    Scan {
        /// Scope id to resolve in; the model root when absent
        #[arg(long)]
        scope: Option<String>,

        /// FEEL text to scan
        text: String,
    },

    /// Rename DRG elements and write the updated document
    Rename {
        /// Renames as `elementId=New Name` pairs, applied in order
        #[arg(required = true)]
        renames: Vec<String>,

        /// Output path; stdout when absent
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Change a DRG element variable's type and write the updated document
    SetType {
        /// Element id whose variable changes
        element_id: String,

        /// New type; omit to clear the type
        #[arg(long)]
        type_ref: Option<String>,

        /// Output path; stdout when absent
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    // Load .env file if present, for FEELSCOPE_MODEL and friends.
    dotenvy::dotenv().ok();

    // Defaults to INFO level, can be overridden with RUST_LOG env var.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (mut definitions, externals) = load_inputs(&cli)?;

    match cli.command {
        Command::Variables => {
            let variables = FeelVariables::new(&definitions, &externals)?;
            let repository = variables.repository();
            print_scope(repository, repository.root_scope(), 0);
        }
        Command::Scan { scope, text } => {
            let mut variables = FeelVariables::new(&definitions, &externals)?;
            let scope = scope.unwrap_or_else(|| definitions.id.clone());
            let expression = variables.parse(&scope, &text);
            let occurrences = expression.variables();
            println!("{} reference(s) in {:?}:", occurrences.len(), text);
            for occurrence in occurrences {
                let span = format!(
                    "{}..{}",
                    occurrence.start_index,
                    occurrence.start_index + occurrence.length
                );
                let source = occurrence.source.as_deref().unwrap_or("<unresolved>");
                println!("  {:>9}  {:<28} -> {}", span, occurrence.text, source);
            }
        }
        Command::Rename { renames, out } => {
            let mut variables = FeelVariables::new(&definitions, &externals)?;
            let mut commands = Vec::with_capacity(renames.len());
            for pair in &renames {
                let Some((element_id, new_name)) = pair.split_once('=') else {
                    bail!("rename {:?} is not an elementId=NewName pair", pair);
                };
                commands.push(DocumentCommand::RenameDrgElement {
                    element_id: element_id.to_string(),
                    new_name: new_name.to_string(),
                });
            }
            apply_batch(&mut variables, &mut definitions, commands)
                .context("rename batch failed")?;
            write_document(&definitions, out.as_deref())?;
        }
        Command::SetType {
            element_id,
            type_ref,
            out,
        } => {
            let mut variables = FeelVariables::new(&definitions, &externals)?;
            let commands = vec![DocumentCommand::UpdateVariableType {
                element_id,
                type_ref,
            }];
            apply_batch(&mut variables, &mut definitions, commands)
                .context("type update failed")?;
            write_document(&definitions, out.as_deref())?;
        }
    }
    Ok(())
}

fn load_inputs(cli: &Cli) -> anyhow::Result<(DmnDefinitions, Vec<DmnDefinitions>)> {
    if let Some(manifest) = &cli.manifest {
        let config = WorkspaceConfig::from_yaml_file(manifest)?;
        let base = manifest.parent().unwrap_or_else(|| Path::new("."));
        return Ok(config.load_models(base)?);
    }
    if let Some(model) = &cli.model {
        return Ok((config::load_model(model)?, Vec::new()));
    }
    let config = WorkspaceConfig::from_env()
        .context("pass --manifest or --model, or set FEELSCOPE_MODEL")?;
    Ok(config.load_models(Path::new("."))?)
}

fn print_scope(repository: &VariablesRepository, scope: &str, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{indent}{scope}");
    for variable in repository.declared_variables(scope) {
        println!(
            "{indent}  {} : {} [{}]",
            variable.name(),
            variable.type_ref().unwrap_or("<Undefined>"),
            variable.uuid()
        );
    }
    for child in repository.child_scopes(scope) {
        print_scope(repository, child, depth + 1);
    }
}

fn write_document(definitions: &DmnDefinitions, out: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(definitions).context("serializing the document")?;
    match out {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
