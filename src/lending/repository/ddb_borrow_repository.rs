use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, Put, TransactWriteItem, Update};
use chrono::Utc;
use tracing::warn;

use crate::core::library::{BorrowStatus, LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::lending::domain::model::BorrowRecordEntity;
use crate::lending::repository::{sort_by_borrowed_at, BorrowRepository, LendingWrite};
use crate::utils::ddb::{add_filter_expr, from_ddb, opt_string_date, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

#[derive(Debug)]
pub(crate) struct DDBBorrowRepository {
    client: Client,
    table_name: String,
    index_name: String,
    books_table_name: String,
}

impl DDBBorrowRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str, books_table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
            books_table_name: books_table_name.to_string(),
        }
    }

    // reads every page of a patron query
    async fn query_all(&self, predicate: &HashMap<String, String>) -> LibraryResult<Vec<BorrowRecordEntity>> {
        let mut records = vec![];
        let mut next_page: Option<String> = None;
        loop {
            let res = self.query(predicate, next_page.as_deref(), 500).await?;
            records.extend(res.records);
            next_page = res.next_page;
            if next_page.is_none() {
                break;
            }
        }
        sort_by_borrowed_at(&mut records);
        Ok(records)
    }

    async fn find_latest_by(&self, predicate: HashMap<String, String>) -> LibraryResult<Option<BorrowRecordEntity>> {
        let records = self.query_all(&predicate).await?;
        Ok(records.into_iter().max_by(|a, b| a.created_at.cmp(&b.created_at)
            .then_with(|| a.borrowed_at.cmp(&b.borrowed_at))))
    }

    fn to_transact_item(&self, write: &LendingWrite) -> LibraryResult<TransactWriteItem> {
        let table_name: &str = self.table_name.as_ref();
        let books_table_name: &str = self.books_table_name.as_ref();
        let now = Utc::now().naive_utc();
        match write {
            LendingWrite::InsertRecord(record) => {
                let val = serde_json::to_value(record)?;
                let put = Put::builder()
                    .table_name(table_name)
                    .set_item(Some(parse_item(val)?))
                    .condition_expression("attribute_not_exists(borrow_id)")
                    .build();
                Ok(TransactWriteItem::builder().put(put).build())
            }
            LendingWrite::CloseRecord { borrow_id, version, returned_at } => {
                let update = Update::builder()
                    .table_name(table_name)
                    .key("borrow_id", AttributeValue::S(borrow_id.to_string()))
                    .update_expression("SET version = :version, borrow_status = :returned, returned_at = :returned_at, updated_at = :updated_at")
                    .expression_attribute_values(":old_version", AttributeValue::N(version.to_string()))
                    .expression_attribute_values(":version", AttributeValue::N((version + 1).to_string()))
                    .expression_attribute_values(":borrowed", AttributeValue::S(BorrowStatus::Borrowed.to_string()))
                    .expression_attribute_values(":returned", AttributeValue::S(BorrowStatus::Returned.to_string()))
                    .expression_attribute_values(":returned_at", opt_string_date(Some(*returned_at)))
                    .expression_attribute_values(":updated_at", string_date(*returned_at))
                    .condition_expression("version = :old_version AND borrow_status = :borrowed")
                    .build();
                Ok(TransactWriteItem::builder().update(update).build())
            }
            LendingWrite::AdjustCopies { book_id, delta } => {
                let mut update = Update::builder()
                    .table_name(books_table_name)
                    .key("book_id", AttributeValue::S(book_id.to_string()))
                    .update_expression("SET available_copies = available_copies + :delta, version = version + :one, updated_at = :updated_at")
                    .expression_attribute_values(":delta", AttributeValue::N(delta.to_string()))
                    .expression_attribute_values(":one", AttributeValue::N("1".to_string()))
                    .expression_attribute_values(":updated_at", string_date(now));
                update = if *delta < 0 {
                    update.condition_expression("available_copies >= :floor")
                        .expression_attribute_values(":floor", AttributeValue::N((-delta).to_string()))
                } else {
                    // increments come one copy at a time, so staying below total_copies is enough
                    update.condition_expression("available_copies < total_copies")
                };
                Ok(TransactWriteItem::builder().update(update.build()).build())
            }
        }
    }
}

#[async_trait]
impl Repository<BorrowRecordEntity> for DDBBorrowRepository {
    async fn create(&self, entity: &BorrowRecordEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(borrow_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn update(&self, entity: &BorrowRecordEntity) -> LibraryResult<usize> {
        let now = Utc::now().naive_utc();
        let table_name: &str = self.table_name.as_ref();

        self.client
            .update_item()
            .table_name(table_name)
            .key("borrow_id", AttributeValue::S(entity.borrow_id.clone()))
            .update_expression("SET version = :version, borrow_status = :borrow_status, due_at = :due_at, returned_at = :returned_at, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":borrow_status", AttributeValue::S(entity.borrow_status.to_string()))
            .expression_attribute_values(":due_at", string_date(entity.due_at))
            .expression_attribute_values(":returned_at", opt_string_date(entity.returned_at))
            .expression_attribute_values(":updated_at", string_date(now))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<BorrowRecordEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression(
                "borrow_id = :borrow_id",
            )
            .expression_attribute_values(
                ":borrow_id",
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            if let Some(items) = req.items {
                if items.len() > 1 {
                    return Err(LibraryError::database(format!("too many borrow records for {}", id).as_str(), None, false));
                } else if let Some(map) = items.first() {
                    return Ok(BorrowRecordEntity::from(map));
                }
            }
            Err(LibraryError::not_found(format!("borrow record not found for {}", id).as_str(), None))
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("borrow_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // patron_id is the partition key of the index and is required
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BorrowRecordEntity>> {
        let patron_id = predicate.get("patron_id")
            .ok_or_else(|| LibraryError::validation("patron_id is required to query borrow records", None))?;
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let exclusive_start_key = to_ddb_page(page);
        let mut request = self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .scan_index_forward(true)
            .set_exclusive_start_key(exclusive_start_key)
            .key_condition_expression("patron_id = :patron_id")
            .expression_attribute_values(":patron_id", AttributeValue::S(patron_id.to_string()));
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != "patron_id" {
                let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                request = request.expression_attribute_values(format!(":{}", ks).as_str(), AttributeValue::S(v.to_string()));
            }
        }
        if !filter_expr.is_empty() {
            request = request.filter_expression(filter_expr);
        }
        request
            .send()
            .await.map_err(LibraryError::from).map(|req| {
            let records = req.items.as_ref().unwrap_or(&vec![]).iter()
                .map(BorrowRecordEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl BorrowRepository for DDBBorrowRepository {
    async fn find_latest(&self, patron_id: &str, book_id: &str) -> LibraryResult<Option<BorrowRecordEntity>> {
        self.find_latest_by(HashMap::from([
            ("patron_id".to_string(), patron_id.to_string()),
            ("book_id".to_string(), book_id.to_string()),
        ])).await
    }

    async fn find_open(&self, patron_id: &str, book_id: &str) -> LibraryResult<Option<BorrowRecordEntity>> {
        self.find_latest_by(HashMap::from([
            ("patron_id".to_string(), patron_id.to_string()),
            ("book_id".to_string(), book_id.to_string()),
            ("borrow_status".to_string(), BorrowStatus::Borrowed.to_string()),
        ])).await
    }

    async fn find_open_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<BorrowRecordEntity>> {
        self.query_all(&HashMap::from([
            ("patron_id".to_string(), patron_id.to_string()),
            ("borrow_status".to_string(), BorrowStatus::Borrowed.to_string()),
        ])).await
    }

    async fn count_open(&self, patron_id: &str) -> LibraryResult<usize> {
        self.find_open_by_patron(patron_id).await.map(|records| records.len())
    }

    async fn find_history(&self, patron_id: &str) -> LibraryResult<Vec<BorrowRecordEntity>> {
        self.query_all(&HashMap::from([
            ("patron_id".to_string(), patron_id.to_string()),
        ])).await
    }

    async fn transact(&self, writes: &[LendingWrite]) -> LibraryResult<usize> {
        let mut request = self.client.transact_write_items();
        for write in writes {
            request = request.transact_items(self.to_transact_item(write)?);
        }
        request.send().await.map(|_| writes.len()).map_err(|err| {
            let err = LibraryError::from(err);
            warn!(error = %err, writes = writes.len(), "rejected lending write batch");
            err
        })
    }
}

impl From<&HashMap<String, AttributeValue>> for BorrowRecordEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        BorrowRecordEntity {
            borrow_id: parse_string_attribute("borrow_id", map).unwrap_or_default(),
            version: parse_number_attribute("version", map),
            branch_id: parse_string_attribute("branch_id", map).unwrap_or_default(),
            patron_id: parse_string_attribute("patron_id", map).unwrap_or_default(),
            book_id: parse_string_attribute("book_id", map).unwrap_or_default(),
            borrow_status: BorrowStatus::from(parse_string_attribute("borrow_status", map).unwrap_or_else(|| BorrowStatus::Borrowed.to_string())),
            borrowed_at: parse_date_attribute("borrowed_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            due_at: parse_date_attribute("due_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            returned_at: parse_date_attribute("returned_at", map),
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}
