//! vmdetails CLI - Show the details of a vCenter VM from an inventory dump.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vmdetails_core::{DeploymentService, GuestIpResolver, VirtualMachine, VmDetails, VmDetailsBuilder};

/// Display-ready details of vCenter VMs.
#[derive(Parser)]
#[command(name = "vmdetails")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the details of a VM.
    Describe {
        /// Path to the VM inventory dump (JSON).
        vm_file: PathBuf,

        /// Path to the deployment service descriptor (JSON).
        #[arg(short, long)]
        deployment: PathBuf,

        /// Application name. Defaults to the VM name.
        #[arg(short, long)]
        name: Option<String>,

        /// vCenter resource attribute, e.g. "Reserved Networks=Mgmt;Storage".
        #[arg(short, long = "attribute", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        attributes: Vec<(String, String)>,

        /// Custom deployment parameter, e.g. "ip_regex=10\..*".
        #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Output format.
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable listing.
    Text,
    /// JSON payload for the orchestration layer.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Describe {
            vm_file,
            deployment,
            name,
            attributes,
            params,
            format,
        } => {
            let attributes: HashMap<String, String> = attributes.into_iter().collect();
            let params: HashMap<String, String> = params.into_iter().collect();
            run_describe(&vm_file, &deployment, name, &attributes, &params, format)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    // Logs go to stderr so JSON output on stdout stays clean
    let directive = if verbose { "vmdetails=debug" } else { "vmdetails=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}

fn run_describe(
    vm_file: &Path,
    deployment_file: &Path,
    name: Option<String>,
    attributes: &HashMap<String, String>,
    params: &HashMap<String, String>,
    format: OutputFormat,
) -> Result<()> {
    let vm = VirtualMachine::load(vm_file)
        .with_context(|| format!("Failed to load VM from {}", vm_file.display()))?;
    let deployment = DeploymentService::load(deployment_file).with_context(|| {
        format!("Failed to load deployment from {}", deployment_file.display())
    })?;
    let app_name = name.unwrap_or_else(|| vm.name.clone());

    tracing::info!(vm = %vm.name, model = %deployment.model, "Describing VM");

    let builder = VmDetailsBuilder::new(GuestIpResolver);
    let result = builder.create(&vm, &app_name, attributes, params, &deployment);

    match format {
        OutputFormat::Json => {
            // Failures are reported in-band for the orchestration layer
            let details = result.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build VM details");
                VmDetails::failed(&app_name, e)
            });
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        OutputFormat::Text => {
            let details = result.context("Failed to build VM details")?;
            print_details(&details);
        }
    }

    Ok(())
}

fn print_details(details: &VmDetails) {
    println!("VM Details: {}", details.app_name);
    println!("{}", "=".repeat(12 + details.app_name.len()));
    println!();

    for field in details.vm_instance_data.iter().filter(|f| !f.hidden) {
        println!("{:<18} {}", format!("{}:", field.key), field.value);
    }

    if details.vm_network_data.is_empty() {
        println!();
        println!("Networks:          None");
        return;
    }

    println!();
    println!("Networks:");
    for (i, network) in details.vm_network_data.iter().enumerate() {
        let primary = if network.is_primary { " (primary)" } else { "" };
        println!(
            "  {}. {} - VLAN {}{}",
            i + 1,
            network.interface_id,
            network.network_id,
            primary
        );
        for field in network.network_data.iter().filter(|f| !f.hidden) {
            println!("     {:<14} {}", format!("{}:", field.key), field.value);
        }
    }
}

/// Parse a `KEY=VALUE` argument. Only the first `=` separates.
fn parse_key_value(arg: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", arg))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", arg));
    }
    Ok((key.to_string(), value.to_string()))
}
