use std::sync::Arc;
use crate::books::factory::BOOKS_TABLE;
use crate::catalog::factory::create_catalog_service;
use crate::core::domain::{Configuration, SystemClock};
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::lending::domain::LendingService;
use crate::lending::domain::service::LendingServiceImpl;
use crate::lending::repository::BorrowRepository;
use crate::lending::repository::ddb_borrow_repository::DDBBorrowRepository;
use crate::lending::repository::memory_borrow_repository::MemoryBorrowRepository;
use crate::utils::ddb::{build_db_client, create_table};
use crate::utils::memory::MemoryDatabase;

pub const BORROW_RECORDS_TABLE: &str = "borrow_records";
pub const BORROW_RECORDS_INDEX: &str = "borrow_records_ndx";

pub async fn create_borrow_repository(store: RepositoryStore) -> LibraryResult<Box<dyn BorrowRepository>> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await?;
            Ok(Box::new(DDBBorrowRepository::new(client, BORROW_RECORDS_TABLE, BORROW_RECORDS_INDEX, BOOKS_TABLE)))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await?;
            let _ = create_table(&client, BORROW_RECORDS_TABLE, "borrow_id", "patron_id", "borrowed_at").await;
            Ok(Box::new(DDBBorrowRepository::new(client, BORROW_RECORDS_TABLE, BORROW_RECORDS_INDEX, BOOKS_TABLE)))
        }
        RepositoryStore::InMemory => {
            Ok(Box::new(MemoryBorrowRepository::new(MemoryDatabase::shared())))
        }
    }
}

pub async fn create_lending_service(config: &Configuration, store: RepositoryStore) -> LibraryResult<Box<dyn LendingService>> {
    let borrow_repo = create_borrow_repository(store).await?;
    let catalog_svc = create_catalog_service(config, store).await?;
    Ok(Box::new(LendingServiceImpl::new(config, borrow_repo, catalog_svc, Arc::new(SystemClock))))
}
