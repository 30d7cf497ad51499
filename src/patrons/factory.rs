use std::sync::Arc;
use crate::catalog::factory::create_catalog_service;
use crate::core::domain::{Configuration, SystemClock};
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::lending::factory::create_borrow_repository;
use crate::patrons::domain::PatronService;
use crate::patrons::domain::service::PatronServiceImpl;

pub async fn create_patron_service(config: &Configuration, store: RepositoryStore) -> LibraryResult<Box<dyn PatronService>> {
    let borrow_repo = create_borrow_repository(store).await?;
    let catalog_svc = create_catalog_service(config, store).await?;
    Ok(Box::new(PatronServiceImpl::new(config, borrow_repo, catalog_svc, Arc::new(SystemClock))))
}
