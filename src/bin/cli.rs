use clap::{Parser, Subcommand, ValueEnum};
use octofhir_terminology::*;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fhir-terminology")]
#[command(about = "Validate codes against FHIR value sets")]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a code against a value set
    ValidateCode {
        /// FHIR JSON files or directories holding CodeSystem/ValueSet resources
        #[arg(short, long, required = true, num_args = 1..)]
        resources: Vec<PathBuf>,
        /// Canonical URL of the value set
        #[arg(long)]
        value_set: String,
        /// Code to validate
        #[arg(short, long)]
        code: String,
        /// Code system URL
        #[arg(short, long)]
        system: Option<String>,
        /// Display text supplied with the code
        #[arg(short, long)]
        display: Option<String>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Expand a value set and print its codes
    Expand {
        /// FHIR JSON files or directories holding CodeSystem/ValueSet resources
        #[arg(short, long, required = true, num_args = 1..)]
        resources: Vec<PathBuf>,
        /// Canonical URL of the value set
        #[arg(long)]
        value_set: String,
        /// ExpansionProfile URL recorded on the expansion
        #[arg(long)]
        profile: Option<String>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the known resource type names
    ResourceNames,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> std::result::Result<ExitCode, Box<dyn std::error::Error>> {
    match command {
        Commands::ValidateCode {
            resources,
            value_set,
            code,
            system,
            display,
            format,
        } => {
            let context = load_context(&resources, None)?;
            let vs = find_value_set(&context, &value_set)?;
            let result = context.validate_code_in_value_set(
                system.as_deref(),
                &code,
                display.as_deref(),
                &vs,
            )?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Text => {
                    if result.is_ok() {
                        println!(
                            "✅ {} is valid in {} ({})",
                            code,
                            value_set,
                            result.display().unwrap_or("no display")
                        );
                    } else {
                        println!(
                            "❌ {}",
                            result.message.as_deref().unwrap_or("code is not valid")
                        );
                    }
                }
            }

            Ok(if result.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Commands::Expand {
            resources,
            value_set,
            profile,
            format,
        } => {
            let context = load_context(&resources, profile.map(ExpansionProfile::new))?;
            let vs = find_value_set(&context, &value_set)?;
            let outcome = context.expand(&vs, context.expansion_profile())?;

            match format {
                OutputFormat::Json => {
                    let expanded = outcome.value_set().and_then(|v| v.expansion.as_ref());
                    println!("{}", serde_json::to_string_pretty(&expanded)?);
                }
                OutputFormat::Text => {
                    println!("{} ({} codes)", value_set, outcome.contains().len());
                    for entry in outcome.contains() {
                        println!(
                            "  {} | {} | {}",
                            entry.system.as_deref().unwrap_or("-"),
                            entry.code.as_deref().unwrap_or("-"),
                            entry.display.as_deref().unwrap_or("")
                        );
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::ResourceNames => {
            let context = TerminologyContext::new(Arc::new(InMemoryResolver::new()));
            for name in context.resource_names() {
                println!("{name}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_context(
    paths: &[PathBuf],
    profile: Option<ExpansionProfile>,
) -> Result<TerminologyContext> {
    let mut resolver = InMemoryResolver::new();
    for path in paths {
        resolver.load_path(path)?;
    }
    let mut builder = TerminologyContextBuilder::new(Arc::new(resolver));
    if let Some(profile) = profile {
        builder = builder.with_expansion_profile(profile);
    }
    builder.build()
}

fn find_value_set(context: &TerminologyContext, url: &str) -> Result<ValueSet> {
    context
        .fetch_value_set(url)
        .ok_or_else(|| TerminologyError::invalid_request(format!("ValueSet {url} not found")))
}
