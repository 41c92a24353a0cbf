mod add;
mod check;
mod list;
mod play;

pub use add::{AddArgs, add};
pub use check::check;
pub use list::list;
pub use play::{PlayArgs, play};

use anyhow::{Context, Result};
use folio_config::FolioConfig;
use folio_contracts::store::DocumentStore;
use folio_core::PortfolioPage;
use std::sync::Arc;

type DynStore = Arc<dyn DocumentStore>;

fn open_page(config: &FolioConfig) -> Result<PortfolioPage<DynStore>> {
    let store = config
        .store
        .open()
        .with_context(|| format!("failed to open {} store", config.store.kind()))?;
    Ok(PortfolioPage::new(store))
}
