pub mod service;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::patrons::dto::PatronStatusDto;

#[async_trait]
pub trait PatronService: Sync + Send {
    // read-only snapshot of the loans and fees of a patron
    async fn status_report(&self, patron_id: &str) -> LibraryResult<PatronStatusDto>;
}
