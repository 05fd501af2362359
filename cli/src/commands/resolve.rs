//! `packstone resolve` command.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use packstone_core::stack::StackSpec;
use packstone_stack::registry::RegistryAuth;
use packstone_stack::remote::{RemoteClientConfig, RemoteRegistryClient};
use packstone_stack::resolver::StackResolver;

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct ResolveArgs {
    /// Stack identifier both images must declare
    #[arg(long, required_unless_present = "file", conflicts_with = "file")]
    pub id: Option<String>,

    /// Build image reference
    #[arg(long, required_unless_present = "file", conflicts_with = "file")]
    pub build_image: Option<String>,

    /// Run image reference
    #[arg(long, required_unless_present = "file", conflicts_with = "file")]
    pub run_image: Option<String>,

    /// Read the stack spec from a JSON or YAML file instead of flags
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Registry username (falls back to REGISTRY_USERNAME)
    #[arg(long)]
    pub username: Option<String>,

    /// Registry password (falls back to REGISTRY_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// Set target platform (e.g., "linux/amd64", "linux/arm64")
    #[arg(long, value_parser = RemoteClientConfig::parse)]
    pub platform: Option<RemoteClientConfig>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

pub async fn execute(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let spec = load_spec(&args)?;

    let auth = match (&args.username, &args.password) {
        (Some(u), Some(p)) => RegistryAuth::basic(u.as_str(), p.as_str()),
        _ => RegistryAuth::from_env(),
    };

    let client = match &args.platform {
        Some(platform) => RemoteRegistryClient::with_config(platform.clone()),
        None => RemoteRegistryClient::new(),
    };

    let resolver = StackResolver::with_auth(Arc::new(client), auth);
    let resolved = resolver.resolve(&spec).await?;

    println!("{}", output::render_resolved_stack(&resolved, args.output)?);
    Ok(())
}

/// Build the stack spec from `--file` or from the individual flags.
fn load_spec(args: &ResolveArgs) -> Result<StackSpec, Box<dyn std::error::Error>> {
    if let Some(path) = &args.file {
        let content = std::fs::read_to_string(path)?;
        let spec: StackSpec = if path.extension().map_or(false, |e| e == "json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        tracing::debug!(
            path = %path.display(),
            stack = %spec.id,
            "Loaded stack spec from file"
        );
        return Ok(spec);
    }

    Ok(StackSpec {
        id: args.id.clone().ok_or("missing --id")?,
        build_image: args.build_image.clone().ok_or("missing --build-image")?,
        run_image: args.run_image.clone().ok_or("missing --run-image")?,
    })
}
