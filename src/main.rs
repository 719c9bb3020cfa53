// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! mcp-to-tools main entry point - CLI and the generate pipeline.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use mcp_to_tools::config::{self, ServerConfig};
use mcp_to_tools::error::GenerateError;
use mcp_to_tools::generate::{
    generate_demo_module, generate_docs, generate_tools_module, ProviderKind,
};
use mcp_to_tools::introspect::{self, IntrospectOptions};
use mcp_to_tools::{Result, VERSION};

/// mcp-to-tools - Generate provider-ready tool catalogs from MCP servers.
#[derive(Parser)]
#[command(name = "mcp-to-tools")]
#[command(author, version, about = "Generate tool modules from MCP servers", long_about = None)]
struct Cli {
    /// Show verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for mcp-to-tools.
#[derive(Subcommand)]
enum Commands {
    /// Introspect MCP server(s) and generate tool modules
    #[command(group(ArgGroup::new("source").required(true).args(["config", "configs"])))]
    Generate {
        /// Path to an MCP server config JSON file
        #[arg(long, env = "MCP_TO_TOOLS_CONFIG")]
        config: Option<PathBuf>,

        /// Comma-separated paths to multiple MCP server configs
        #[arg(long, value_delimiter = ',')]
        configs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, env = "MCP_TO_TOOLS_OUTPUT")]
        output: PathBuf,

        /// Provider format for the generated modules
        #[arg(long = "type", value_enum, default_value = "anthropic")]
        provider: Provider,

        /// Generate TypeScript instead of JavaScript
        #[arg(long)]
        typescript: bool,

        /// Skip README.md generation
        #[arg(long)]
        no_docs: bool,

        /// Comma-separated list of tool names to export
        #[arg(long, value_delimiter = ',')]
        tools: Vec<String>,

        /// Override the server name from the config (single server only)
        #[arg(long)]
        name: Option<String>,

        /// Overwrite existing output files
        #[arg(long)]
        force: bool,

        /// Preview without writing files
        #[arg(long)]
        dry_run: bool,

        /// Skip the introspection cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Show version information
    Version,
}

/// Supported provider formats.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum Provider {
    /// Anthropic - Claude tool format
    Anthropic,
    /// OpenAI - function calling format
    Openai,
}

impl From<Provider> for ProviderKind {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Anthropic => ProviderKind::Anthropic,
            Provider::Openai => ProviderKind::OpenAi,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            config,
            configs,
            output,
            provider,
            typescript,
            no_docs,
            tools,
            name,
            force,
            dry_run,
            no_cache,
        } => {
            let opts = GenerateArgs {
                config,
                configs,
                output,
                provider,
                typescript,
                no_docs,
                tools,
                name,
                force,
                dry_run,
                no_cache,
            };
            if let Err(e) = run_generate(opts).await {
                eprintln!("{} {}", "Error:".bright_red().bold(), e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("mcp-to-tools {VERSION}");
        }
    }
    Ok(())
}

struct GenerateArgs {
    config: Option<PathBuf>,
    configs: Vec<PathBuf>,
    output: PathBuf,
    provider: Provider,
    typescript: bool,
    no_docs: bool,
    tools: Vec<String>,
    name: Option<String>,
    force: bool,
    dry_run: bool,
    no_cache: bool,
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    println!("{}", "Generating MCP tools...".bright_blue().bold());

    let multi_server = !args.configs.is_empty();
    let server_configs = if multi_server {
        let configs = config::load_server_configs(&args.configs)?;
        let names: Vec<&str> = configs.iter().map(|c| c.name.as_str()).collect();
        println!("MCP Servers: {}", names.join(", "));
        configs
    } else {
        // The source arg group guarantees one of the two is present.
        let path = args
            .config
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("--config or --configs is required"))?;
        let mut config = config::load_server_config(path)?;
        if let Some(name) = &args.name {
            config.name = name.clone();
        }
        println!("MCP Server: {} ({})", config.name, config.kind);
        vec![config]
    };

    println!("Introspecting MCP server(s)...");
    let options = IntrospectOptions {
        no_cache: args.no_cache,
        ..Default::default()
    };

    let mut mcp_tools = if multi_server {
        let report = introspect::introspect_servers(&server_configs, &options).await;
        for failure in &report.failures {
            eprintln!(
                "{} server '{}' failed: {}",
                "Warning:".yellow().bold(),
                failure.server,
                failure.message
            );
        }
        report.tools
    } else {
        introspect::introspect_server(&server_configs[0], &options).await?
    };

    if !args.tools.is_empty() {
        mcp_tools.retain(|t| args.tools.iter().any(|name| name == &t.name));
        println!("Filtered to {} tool(s)", mcp_tools.len());
    }
    println!("Found {} tool(s)", mcp_tools.len());

    // In multi-server mode the individual configs go into config.json and a
    // synthetic primary config labels the generated modules.
    let primary = if multi_server {
        let mut primary = ServerConfig::stdio("multi-server", "");
        primary.description = Some(format!(
            "Merged catalog from: {}",
            server_configs
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        primary
    } else {
        server_configs[0].clone()
    };

    let kind = ProviderKind::from(args.provider);
    let ext = if args.typescript { "ts" } else { "js" };
    let code = generate_tools_module(&mcp_tools, &primary, kind, args.typescript)?;
    let demo = generate_demo_module(&mcp_tools, &primary, kind, args.typescript)?;

    let config_json = if multi_server {
        serde_json::to_string_pretty(&serde_json::json!({
            "isMultiServer": true,
            "servers": server_configs,
        }))?
    } else {
        serde_json::to_string_pretty(&server_configs[0])?
    };

    let mut files: Vec<(PathBuf, String)> = vec![
        (args.output.join(format!("tools.{ext}")), code),
        (args.output.join(format!("demo.{ext}")), demo),
        (args.output.join("config.json"), config_json),
    ];
    if !args.no_docs {
        files.push((
            args.output.join("README.md"),
            generate_docs(&mcp_tools, &primary),
        ));
    }

    if args.dry_run {
        println!("\n{}", "--- DRY RUN ---".bright_yellow());
        println!("Would write {} file(s):", files.len());
        for (path, _) in &files {
            println!("  - {}", path.display());
        }
        return Ok(());
    }

    if !args.force {
        check_output_clear(&files)?;
    }

    println!("\nWriting {} file(s) to {}...", files.len(), args.output.display());
    std::fs::create_dir_all(&args.output).map_err(GenerateError::from)?;
    for (path, content) in &files {
        std::fs::write(path, content).map_err(GenerateError::from)?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote output file");
    }

    println!("\n{}", "Done!".bright_green().bold());
    Ok(())
}

fn check_output_clear(files: &[(PathBuf, String)]) -> std::result::Result<(), GenerateError> {
    for (path, _) in files {
        if path.exists() {
            return Err(GenerateError::OutputExists(path.display().to_string()));
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(env) => EnvFilter::new(env),
        Err(_) if verbose => EnvFilter::new("mcp_to_tools=debug"),
        Err(_) => EnvFilter::new("warn"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
