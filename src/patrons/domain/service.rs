use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tracing::warn;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::domain::{Clock, Configuration};
use crate::core::library::{LibraryError, LibraryResult};
use crate::fees::calculator::{calculate_late_fee, round_cents};
use crate::lending::dto::BorrowRecordDto;
use crate::lending::repository::BorrowRepository;
use crate::patrons::domain::PatronService;
use crate::patrons::dto::{LoanDto, PatronStatusDto};
use crate::utils::validation::validate_patron_id;

pub struct PatronServiceImpl {
    config: Configuration,
    borrow_repository: Box<dyn BorrowRepository>,
    catalog_service: Box<dyn CatalogService>,
    clock: Arc<dyn Clock>,
}

impl PatronServiceImpl {
    pub fn new(config: &Configuration, borrow_repository: Box<dyn BorrowRepository>,
               catalog_service: Box<dyn CatalogService>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: config.clone(),
            borrow_repository,
            catalog_service,
            clock,
        }
    }
}

#[async_trait]
impl PatronService for PatronServiceImpl {
    async fn status_report(&self, patron_id: &str) -> LibraryResult<PatronStatusDto> {
        validate_patron_id(patron_id)?;
        let now = self.clock.now();
        let history = self.borrow_repository.find_history(patron_id).await?;

        // loans of books missing from the catalog are left out of the report
        let mut books: HashMap<String, Option<BookDto>> = HashMap::new();
        let mut borrow_history = vec![];
        for entity in history.iter() {
            if !books.contains_key(&entity.book_id) {
                let book = match self.catalog_service.find_book_by_id(entity.book_id.as_str()).await {
                    Ok(book) => Some(book),
                    Err(LibraryError::NotFound { .. }) => {
                        warn!(patron_id, book_id = %entity.book_id, "borrowed book missing from catalog");
                        None
                    }
                    Err(err) => return Err(err),
                };
                books.insert(entity.book_id.to_string(), book);
            }
            if let Some(Some(book)) = books.get(&entity.book_id) {
                let record = BorrowRecordDto::from(entity);
                let fee = calculate_late_fee(Some(&record), now, &self.config);
                borrow_history.push(LoanDto::new(record, book, fee));
            }
        }

        let total_late_fees = round_cents(borrow_history.iter().map(|l| l.fee.fee_amount).sum());
        let currently_borrowed: Vec<LoanDto> = borrow_history.iter()
            .filter(|l| l.record.is_open()).cloned().collect();
        Ok(PatronStatusDto {
            patron_id: patron_id.to_string(),
            borrow_count: currently_borrowed.len(),
            currently_borrowed,
            total_late_fees,
            borrow_history,
        })
    }
}
