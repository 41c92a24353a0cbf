//! Page-level controller: owns the fetched list and the add-project form.

use chrono::Utc;
use folio_contracts::store::DocumentStore;
use folio_model::{PortfolioItem, ProjectDraft};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::carousel::{CarouselEngine, Scheduler};
use crate::error::Result;
use crate::view::{CarouselView, FormToggle};

/// Holds `submitting` high until dropped, including when the append
/// future is abandoned mid-await.
struct SubmitFlag<'a>(&'a mut bool);

impl<'a> SubmitFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for SubmitFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[derive(Debug)]
pub struct PortfolioPage<D> {
    store: D,
    items: Arc<[PortfolioItem]>,
    form: FormToggle,
    submitting: bool,
}

impl<D: DocumentStore> PortfolioPage<D> {
    pub fn new(store: D) -> Self {
        Self {
            store,
            items: Arc::from(Vec::new()),
            form: FormToggle::default(),
            submitting: false,
        }
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    /// Current list. A new `Arc` is produced by every completed fetch.
    pub fn items(&self) -> &Arc<[PortfolioItem]> {
        &self.items
    }

    pub fn form(&self) -> FormToggle {
        self.form
    }

    pub fn toggle_form(&mut self) {
        self.form.toggle();
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Fetch every record. A failed fetch is logged and yields an empty list.
    pub async fn load(&mut self) -> Arc<[PortfolioItem]> {
        let items = match self.store.list_all().await {
            Ok(items) => {
                info!(count = items.len(), "portfolio loaded");
                items
            }
            Err(err) => {
                error!("failed to load portfolio: {err}");
                Vec::new()
            }
        };
        self.items = Arc::from(items);
        self.items.clone()
    }

    /// Validate and append a project, then refetch the list.
    pub async fn submit(&mut self, draft: ProjectDraft) -> Result<PortfolioItem> {
        let record = draft.into_record(Utc::now()).inspect_err(|err| {
            warn!("rejected project draft: {err}");
        })?;

        let appended = {
            let _busy = SubmitFlag::raise(&mut self.submitting);
            self.store.append(record).await
        };

        let item = appended.inspect_err(|err| {
            error!("error adding project: {err}");
        })?;
        info!(id = %item.id, name = %item.name, "project added");
        self.load().await;
        Ok(item)
    }

    pub fn view<S: Scheduler>(&self, engine: &CarouselEngine<S>) -> CarouselView {
        CarouselView::build(engine, self.form)
    }
}
