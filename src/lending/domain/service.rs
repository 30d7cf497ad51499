use std::sync::Arc;
use async_trait::async_trait;
use tracing::info;
use crate::books::domain::Book;
use crate::catalog::domain::CatalogService;
use crate::core::domain::{Clock, Configuration};
use crate::core::library::{reason, BorrowStatus, LibraryError, LibraryResult};
use crate::fees::calculator::calculate_late_fee;
use crate::fees::dto::FeeResult;
use crate::lending::domain::LendingService;
use crate::lending::domain::model::BorrowRecordEntity;
use crate::lending::dto::{BorrowReceipt, BorrowRecordDto, ReturnReceipt};
use crate::lending::repository::{BorrowRepository, LendingWrite};
use crate::utils::date::DAY_FMT;
use crate::utils::validation::validate_patron_id;

pub struct LendingServiceImpl {
    config: Configuration,
    borrow_repository: Box<dyn BorrowRepository>,
    catalog_service: Box<dyn CatalogService>,
    clock: Arc<dyn Clock>,
}

impl LendingServiceImpl {
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
impl LendingService for LendingServiceImpl {
    async fn borrow(&self, patron_id: &str, book_id: &str) -> LibraryResult<BorrowReceipt> {
        validate_patron_id(patron_id)?;
        let book = self.catalog_service.find_book_by_id(book_id).await?;
        let open = self.borrow_repository.count_open(patron_id).await?;
        if open >= self.config.max_borrowed_books {
            return Err(LibraryError::policy(
                format!("You have reached the maximum borrowing limit of {} books.",
                        self.config.max_borrowed_books).as_str(),
                Some(reason::LIMIT_EXCEEDED.to_string())));
        }
        if !book.is_available() {
            return Err(LibraryError::policy("This book is currently not available.",
                                            Some(reason::UNAVAILABLE.to_string())));
        }
        let record = BorrowRecordEntity::new(self.config.branch_id.as_str(), patron_id, book_id,
                                             self.clock.now(), self.config.book_loan_days);
        self.borrow_repository.transact(&[
            LendingWrite::InsertRecord(record.clone()),
            LendingWrite::AdjustCopies { book_id: book_id.to_string(), delta: -1 },
        ]).await?;
        info!(patron_id, book_id, borrow_id = %record.borrow_id, "book borrowed");
        Ok(BorrowReceipt {
            message: format!("Successfully borrowed \"{}\". Due date: {}.",
                             book.title(), record.due_at.format(DAY_FMT)),
            record: BorrowRecordDto::from(&record),
        })
    }

    async fn return_book(&self, patron_id: &str, book_id: &str) -> LibraryResult<ReturnReceipt> {
        validate_patron_id(patron_id)?;
        let book = self.catalog_service.find_book_by_id(book_id).await?;
        let mut record = self.borrow_repository.find_open(patron_id, book_id).await?
            .ok_or_else(|| LibraryError::not_found("No active borrow record found for this patron and book.",
                                                   Some(reason::NO_ACTIVE_RECORD.to_string())))?;
        let returned_at = self.clock.now();
        self.borrow_repository.transact(&[
            LendingWrite::CloseRecord {
                borrow_id: record.borrow_id.to_string(),
                version: record.version,
                returned_at,
            },
            LendingWrite::AdjustCopies { book_id: book_id.to_string(), delta: 1 },
        ]).await?;
        record.returned_at = Some(returned_at);
        record.borrow_status = BorrowStatus::Returned;
        record.version += 1;
        record.updated_at = returned_at;

        let record = BorrowRecordDto::from(&record);
        let fee = calculate_late_fee(Some(&record), returned_at, &self.config);
        info!(patron_id, book_id, borrow_id = %record.borrow_id, fee = fee.fee_amount, "book returned");
        let message = if fee.has_fee() {
            format!("Book \"{}\" returned. Late fee: ${:.2}", book.title(), fee.fee_amount)
        } else {
            format!("Book \"{}\" returned successfully. No late fees.", book.title())
        };
        Ok(ReturnReceipt { message, record, fee })
    }

    async fn late_fee(&self, patron_id: &str, book_id: &str) -> LibraryResult<FeeResult> {
        validate_patron_id(patron_id)?;
        let latest = self.borrow_repository.find_latest(patron_id, book_id).await?;
        let latest = latest.as_ref().map(BorrowRecordDto::from);
        Ok(calculate_late_fee(latest.as_ref(), self.clock.now(), &self.config))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use chrono::{NaiveDate, NaiveDateTime};
    use crate::books::domain::model::BookEntity;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::catalog::domain::service::CatalogServiceImpl;
    use crate::core::domain::{Configuration, FixedClock};
    use crate::core::library::{reason, BorrowStatus, LibraryError};
    use crate::core::repository::Repository;
    use crate::fees::dto::FeeStatus;
    use crate::lending::domain::LendingService;
    use crate::lending::domain::service::LendingServiceImpl;
    use crate::lending::repository::BorrowRepository;
    use crate::lending::repository::memory_borrow_repository::MemoryBorrowRepository;
    use crate::utils::memory::MemoryDatabase;

    struct Fixture {
        books: MemoryBookRepository,
        records: MemoryBorrowRepository,
        clock: Arc<FixedClock>,
        svc: LendingServiceImpl,
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(9, 0, 0)).expect("valid date")
    }

    fn fixture() -> Fixture {
        let db = MemoryDatabase::new();
        let config = Configuration::new("test");
        let clock = Arc::new(FixedClock::new(at(2025, 9, 1)));
        let catalog = CatalogServiceImpl::new(&config, Box::new(MemoryBookRepository::new(db.clone())));
        let svc = LendingServiceImpl::new(&config, Box::new(MemoryBorrowRepository::new(db.clone())),
                                          Box::new(catalog), clock.clone());
        Fixture {
            books: MemoryBookRepository::new(db.clone()),
            records: MemoryBorrowRepository::new(db),
            clock,
            svc,
        }
    }

    async fn add_book(fixture: &Fixture, isbn: &str, copies: i64) -> BookEntity {
        let book = BookEntity::new("The Hobbit", "J.R.R. Tolkien", isbn, copies);
        fixture.books.create(&book).await.expect("should create book");
        book
    }

    async fn available(fixture: &Fixture, book: &BookEntity) -> i64 {
        fixture.books.get(book.book_id.as_str()).await.expect("should get book").available_copies
    }

    #[tokio::test]
    async fn test_should_borrow_and_return() {
        let fixture = fixture();
        let book = add_book(&fixture, "9780547928227", 2).await;

        let receipt = fixture.svc.borrow("123456", book.book_id.as_str()).await.expect("should borrow");
        assert_eq!("Successfully borrowed \"The Hobbit\". Due date: 2025-09-15.", receipt.message.as_str());
        assert_eq!(BorrowStatus::Borrowed, receipt.record.borrow_status);
        assert_eq!(1, available(&fixture, &book).await);
        assert_eq!(1, fixture.records.count_open("123456").await.expect("count"));

        fixture.clock.advance_days(3);
        let receipt = fixture.svc.return_book("123456", book.book_id.as_str()).await.expect("should return");
        assert_eq!("Book \"The Hobbit\" returned successfully. No late fees.", receipt.message.as_str());
        assert_eq!(FeeStatus::OnTime, receipt.fee.status);
        assert_eq!(Some(at(2025, 9, 4)), receipt.record.returned_at);
        assert_eq!(2, available(&fixture, &book).await);
        assert_eq!(0, fixture.records.count_open("123456").await.expect("count"));
    }

    #[tokio::test]
    async fn test_should_charge_late_return() {
        let fixture = fixture();
        let book = add_book(&fixture, "9780547928227", 1).await;
        fixture.svc.borrow("123456", book.book_id.as_str()).await.expect("should borrow");

        // due 2025-09-15, returned ten days later
        fixture.clock.set(at(2025, 9, 25));
        let receipt = fixture.svc.return_book("123456", book.book_id.as_str()).await.expect("should return");
        assert_eq!("Book \"The Hobbit\" returned. Late fee: $6.50", receipt.message.as_str());
        assert_eq!(6.5, receipt.fee.fee_amount);
        assert_eq!(10, receipt.fee.days_overdue);

        // the fee of a returned loan does not grow afterwards
        fixture.clock.advance_days(100);
        let fee = fixture.svc.late_fee("123456", book.book_id.as_str()).await.expect("should compute");
        assert_eq!(6.5, fee.fee_amount);
    }

    #[tokio::test]
    async fn test_should_check_borrow_in_order() {
        let fixture = fixture();
        let book = add_book(&fixture, "9780547928227", 1).await;

        let err = fixture.svc.borrow("12345", "missing").await.expect_err("invalid patron first");
        assert_eq!(Some(reason::INVALID_PATRON), err.reason_code());
        assert_eq!("Invalid patron ID. Must be exactly 6 digits.", err.message());

        let err = fixture.svc.borrow("123456", "missing").await.expect_err("missing book");
        assert_eq!(Some(reason::BOOK_NOT_FOUND), err.reason_code());
        assert_eq!("Book not found.", err.message());

        fixture.svc.borrow("123456", book.book_id.as_str()).await.expect("should borrow");
        let err = fixture.svc.borrow("654321", book.book_id.as_str()).await.expect_err("no copies left");
        assert_eq!(Some(reason::UNAVAILABLE), err.reason_code());
        assert_eq!("This book is currently not available.", err.message());
        assert_eq!(0, available(&fixture, &book).await);
    }

    #[tokio::test]
    async fn test_should_enforce_borrow_limit_before_availability() {
        let fixture = fixture();
        for i in 0..5 {
            let book = add_book(&fixture, format!("978000000000{}", i).as_str(), 1).await;
            fixture.svc.borrow("123456", book.book_id.as_str()).await.expect("should borrow");
        }
        let stocked = add_book(&fixture, "9780000000009", 3).await;
        let err = fixture.svc.borrow("123456", stocked.book_id.as_str()).await.expect_err("limit reached");
        assert!(matches!(err, LibraryError::PolicyViolation { .. }));
        assert_eq!(Some(reason::LIMIT_EXCEEDED), err.reason_code());
        assert_eq!("You have reached the maximum borrowing limit of 5 books.", err.message());
        assert_eq!(3, available(&fixture, &stocked).await);
        assert_eq!(5, fixture.records.count_open("123456").await.expect("count"));
    }

    #[tokio::test]
    async fn test_should_reject_return_without_open_record() {
        let fixture = fixture();
        let book = add_book(&fixture, "9780547928227", 1).await;
        let err = fixture.svc.return_book("123456", book.book_id.as_str()).await.expect_err("nothing borrowed");
        assert_eq!(Some(reason::NO_ACTIVE_RECORD), err.reason_code());
        assert_eq!("No active borrow record found for this patron and book.", err.message());

        let err = fixture.svc.return_book("abcdef", book.book_id.as_str()).await.expect_err("invalid patron");
        assert_eq!(Some(reason::INVALID_PATRON), err.reason_code());
        let err = fixture.svc.return_book("123456", "missing").await.expect_err("missing book");
        assert_eq!(Some(reason::BOOK_NOT_FOUND), err.reason_code());

        fixture.svc.borrow("123456", book.book_id.as_str()).await.expect("should borrow");
        fixture.svc.return_book("123456", book.book_id.as_str()).await.expect("should return");
        assert!(fixture.svc.return_book("123456", book.book_id.as_str()).await.is_err());
        assert_eq!(1, available(&fixture, &book).await);
    }

    #[tokio::test]
    async fn test_should_return_most_recent_open_record() {
        let fixture = fixture();
        let book = add_book(&fixture, "9780547928227", 2).await;
        let first = fixture.svc.borrow("123456", book.book_id.as_str()).await.expect("should borrow");
        fixture.clock.advance_days(1);
        let second = fixture.svc.borrow("123456", book.book_id.as_str()).await.expect("should borrow again");
        let receipt = fixture.svc.return_book("123456", book.book_id.as_str()).await.expect("should return");
        assert_eq!(second.record.borrow_id, receipt.record.borrow_id);
        let open = fixture.records.find_open_by_patron("123456").await.expect("open");
        assert_eq!(vec![first.record.borrow_id], open.into_iter().map(|r| r.borrow_id).collect::<Vec<String>>());
    }

    #[tokio::test]
    async fn test_should_compute_late_fee_of_latest_record() {
        let fixture = fixture();
        let book = add_book(&fixture, "9780547928227", 1).await;
        let fee = fixture.svc.late_fee("123456", book.book_id.as_str()).await.expect("should compute");
        assert_eq!(FeeStatus::NoRecord, fee.status);

        fixture.svc.borrow("123456", book.book_id.as_str()).await.expect("should borrow");
        let fee = fixture.svc.late_fee("123456", book.book_id.as_str()).await.expect("should compute");
        assert_eq!(FeeStatus::OnTime, fee.status);

        fixture.clock.advance_days(14 + 50);
        let fee = fixture.svc.late_fee("123456", book.book_id.as_str()).await.expect("should compute");
        assert_eq!(15.0, fee.fee_amount);
        assert_eq!(50, fee.days_overdue);
        assert!(fixture.svc.late_fee("1", book.book_id.as_str()).await.is_err());
    }

    #[tokio::test]
    async fn test_should_restore_availability_after_round_trip() {
        let fixture = fixture();
        let book = add_book(&fixture, "9780547928227", 3).await;
        for patron in ["100001", "100002", "100003"] {
            fixture.svc.borrow(patron, book.book_id.as_str()).await.expect("should borrow");
        }
        assert_eq!(0, available(&fixture, &book).await);
        for patron in ["100002", "100001", "100003"] {
            fixture.svc.return_book(patron, book.book_id.as_str()).await.expect("should return");
        }
        assert_eq!(3, available(&fixture, &book).await);
        let catalog_book = fixture.books.get(book.book_id.as_str()).await.expect("book");
        assert_eq!(catalog_book.total_copies, catalog_book.available_copies);
    }
}
