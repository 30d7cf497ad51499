use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{reason, LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{add_filter_expr, from_ddb, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }

    async fn scan(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let exclusive_start_key = to_ddb_page(page);
        self.client
            .scan()
            .table_name(table_name)
            .consistent_read(false)
            .set_exclusive_start_key(exclusive_start_key)
            .limit(cmp::min(page_size, 500) as i32)
            .send()
            .await.map_err(LibraryError::from).map(|req| {
            let def_items = vec![];
            let items = req.items.as_ref().unwrap_or(&def_items);
            let records = items.iter().map(BookEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(book_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let now = Utc::now().naive_utc();
        let table_name: &str = self.table_name.as_ref();

        self.client
            .update_item()
            .table_name(table_name)
            .key("book_id", AttributeValue::S(entity.book_id.clone()))
            .update_expression("SET version = :version, title = :title, author = :author, total_copies = :total_copies, available_copies = :available_copies, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":title", AttributeValue::S(entity.title.to_string()))
            .expression_attribute_values(":author", AttributeValue::S(entity.author.to_string()))
            .expression_attribute_values(":total_copies", AttributeValue::N(entity.total_copies.to_string()))
            .expression_attribute_values(":available_copies", AttributeValue::N(entity.available_copies.to_string()))
            .expression_attribute_values(":updated_at", string_date(now))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression(
                "book_id = :book_id",
            )
            .expression_attribute_values(
                ":book_id",
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            if let Some(items) = req.items {
                if items.len() > 1 {
                    return Err(LibraryError::database(format!("too many books for {}", id).as_str(), None, false));
                } else if let Some(map) = items.first() {
                    return Ok(BookEntity::from(map));
                }
            }
            Err(LibraryError::not_found("Book not found.", Some(reason::BOOK_NOT_FOUND.to_string())))
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("book_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // Note you cannot use certain reserved words per https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let isbn = match predicate.get("isbn") {
            Some(isbn) => isbn,
            // without the index key only a filtered scan is possible
            None => {
                let res = self.scan(page, page_size).await?;
                let records = res.records.into_iter()
                    .filter(|b| predicate.iter().all(|(k, v)| match k.as_str() {
                        "title" => &b.title == v,
                        "author" => &b.author == v,
                        "book_id" => &b.book_id == v,
                        _ => true,
                    }))
                    .collect();
                return Ok(PaginatedResult::new(page, page_size, res.next_page, records));
            }
        };
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let exclusive_start_key = to_ddb_page(page);
        let mut request = self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .set_exclusive_start_key(exclusive_start_key)
            .key_condition_expression("isbn = :isbn")
            .expression_attribute_values(":isbn", AttributeValue::S(isbn.to_string()));
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != "isbn" {
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
                .map(BookEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookEntity>> {
        let predicate = HashMap::from([
            ("isbn".to_string(), isbn.to_string()),
        ]);
        let res = self.query(&predicate, None, 10).await?;
        Ok(res.records.into_iter().next())
    }

    async fn list_all(&self) -> LibraryResult<Vec<BookEntity>> {
        let mut books = vec![];
        let mut next_page: Option<String> = None;
        loop {
            let res = self.scan(next_page.as_deref(), 500).await?;
            books.extend(res.records);
            next_page = res.next_page;
            if next_page.is_none() {
                break;
            }
        }
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }
}

impl From<&HashMap<String, AttributeValue>> for BookEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        BookEntity {
            book_id: parse_string_attribute("book_id", map).unwrap_or_default(),
            version: parse_number_attribute("version", map),
            title: parse_string_attribute("title", map).unwrap_or_default(),
            author: parse_string_attribute("author", map).unwrap_or_default(),
            isbn: parse_string_attribute("isbn", map).unwrap_or_default(),
            total_copies: parse_number_attribute("total_copies", map),
            available_copies: parse_number_attribute("available_copies", map),
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use lazy_static::lazy_static;

    use crate::books::domain::model::BookEntity;
    use crate::books::repository::BookRepository;
    use crate::books::repository::ddb_book_repository::DDBBookRepository;
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::utils::ddb::{build_db_client, create_table, delete_table};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(RepositoryStore::LocalDynamoDB).await.expect("local client");
                let _ = delete_table(&client, "books").await;
                let _ = create_table(&client, "books", "book_id", "isbn", "title").await;
                client
            });
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB local on localhost:8000"]
    async fn test_should_create_get_books() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books", "books_ndx");
        let book = BookEntity::new("test book", "author", "9780000000001", 2);
        let size = books_repo.create(&book).await.expect("should create book");
        assert_eq!(1, size);

        let loaded = books_repo.get(book.book_id.as_str()).await.expect("should return book");
        assert_eq!(book.book_id, loaded.book_id);
        assert_eq!(2, loaded.available_copies);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB local on localhost:8000"]
    async fn test_should_create_update_books() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books", "books_ndx");
        let mut book = BookEntity::new("test book", "author", "9780000000002", 2);
        books_repo.create(&book).await.expect("should create book");

        book.title = "new title".to_string();
        book.available_copies = 1;
        let size = books_repo.update(&book).await.expect("should update book");
        assert_eq!(1, size);

        let loaded = books_repo.get(book.book_id.as_str()).await.expect("should return book");
        assert_eq!(book.title, loaded.title);
        assert_eq!(1, loaded.available_copies);
        assert_eq!(1, loaded.version);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB local on localhost:8000"]
    async fn test_should_find_by_isbn_and_list() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books", "books_ndx");
        for i in 0..20 {
            let book = BookEntity::new(format!("title_{}", i).as_str(), "author",
                                       format!("97811111111{:02}", i).as_str(), 1);
            books_repo.create(&book).await.expect("should create book");
        }
        let found = books_repo.find_by_isbn("9781111111105").await.expect("should query");
        assert_eq!(Some("title_5".to_string()), found.map(|b| b.title));
        let all = books_repo.list_all().await.expect("should list");
        assert!(all.len() >= 20);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB local on localhost:8000"]
    async fn test_should_create_delete_books() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books", "books_ndx");
        let book = BookEntity::new("test book", "author", "9780000000003", 1);
        books_repo.create(&book).await.expect("should create book");

        let deleted = books_repo.delete(book.book_id.as_str()).await.expect("should delete book");
        assert_eq!(1, deleted);

        let loaded = books_repo.get(book.book_id.as_str()).await;
        assert!(loaded.is_err());
    }
}
