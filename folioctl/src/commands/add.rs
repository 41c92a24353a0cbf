use anyhow::{Context, Result, bail};
use clap::Args;
use folio_config::FolioConfig;
use folio_core::{AccessGate, AuthHub};
use folio_model::ProjectDraft;
use tracing::info;

use super::open_page;

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    name: String,
    /// Cover image URL
    #[arg(long)]
    image: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    details: String,
    /// Comma separated technologies
    #[arg(long, default_value = "")]
    tech: String,
    /// Comma separated screenshot image URLs
    #[arg(long, default_value = "")]
    screenshots: String,
    /// Live deployment link
    #[arg(long, default_value = "")]
    url: String,
    /// Source repository link
    #[arg(long, default_value = "")]
    github: String,
}

impl From<AddArgs> for ProjectDraft {
    fn from(args: AddArgs) -> Self {
        ProjectDraft {
            name: args.name,
            description: args.description,
            details: args.details,
            image: args.image,
            tech: args.tech,
            screenshots: args.screenshots,
            url: args.url,
            github: args.github,
        }
    }
}

pub async fn add(config: &FolioConfig, args: AddArgs) -> Result<()> {
    let hub = match config.auth.user() {
        Some(user) => AuthHub::signed_in(user),
        None => AuthHub::new(),
    };
    let gate = AccessGate::new(&hub);
    if !gate.is_authenticated() {
        bail!("sign in required to add projects: set auth.uid or FOLIO_AUTH_UID");
    }

    let mut page = open_page(config)?;
    page.toggle_form();
    let item = page
        .submit(args.into())
        .await
        .context("failed to add project")?;
    info!(total = page.items().len(), "portfolio refreshed");
    println!("{}", item.id);
    Ok(())
}
