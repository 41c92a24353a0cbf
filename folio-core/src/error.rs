use folio_contracts::store::StoreError;
use folio_model::DraftError;
use thiserror::Error;

use crate::carousel::RuntimeError;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Invalid project: {0}")]
    Draft(#[from] DraftError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Carousel error: {0}")]
    Runtime(#[from] RuntimeError),
}

pub type Result<T> = std::result::Result<T, FolioError>;
