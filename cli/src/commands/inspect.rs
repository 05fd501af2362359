//! `packstone inspect` command — display an image's stack metadata as JSON.

use clap::Args;
use packstone_stack::metadata::{
    read_builder_metadata, BUILDER_METADATA_LABEL, CNB_GROUP_ID, CNB_USER_ID, STACK_ID_LABEL,
};
use packstone_stack::registry::{RegistryAuth, RegistryClient};
use packstone_stack::remote::{RemoteClientConfig, RemoteRegistryClient};
use packstone_stack::resolver::read_mixins;

#[derive(Args)]
pub struct InspectArgs {
    /// Image reference to inspect
    pub image: String,

    /// Registry username (falls back to REGISTRY_USERNAME)
    #[arg(long)]
    pub username: Option<String>,

    /// Registry password (falls back to REGISTRY_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// Set target platform (e.g., "linux/amd64", "linux/arm64")
    #[arg(long, value_parser = RemoteClientConfig::parse)]
    pub platform: Option<RemoteClientConfig>,
}

pub async fn execute(args: InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let auth = match (&args.username, &args.password) {
        (Some(u), Some(p)) => RegistryAuth::basic(u.as_str(), p.as_str()),
        _ => RegistryAuth::from_env(),
    };

    let client = match &args.platform {
        Some(platform) => RemoteRegistryClient::with_config(platform.clone()),
        None => RemoteRegistryClient::new(),
    };

    let image = client.fetch(&auth, &args.image).await?;

    let mixins = read_mixins(&image)?;
    let builder_metadata = if image.has_label(BUILDER_METADATA_LABEL) {
        Some(read_builder_metadata(&image)?)
    } else {
        None
    };

    let output = serde_json::json!({
        "Reference": image.reference(),
        "Identifier": image.identifier(),
        "StackId": image.string_label(STACK_ID_LABEL),
        "Mixins": mixins,
        "UserID": image.env(CNB_USER_ID),
        "GroupID": image.env(CNB_GROUP_ID),
        "BuilderMetadata": builder_metadata,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
