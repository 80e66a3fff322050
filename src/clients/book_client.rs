use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::book_actor::{BookAction, BookActionResult, Reservation};
use crate::domain::{clamp_limit, Book, BookCreate, BookId, BookPatch, BookQuery, OrderId};
use crate::error::{BookstoreError, Result};

/// Client for the book collection. Every stock change goes through a [`BookAction`].
#[derive(Clone)]
pub struct BookClient {
    inner: ResourceClient<Book>,
}

impl_basic_client!(BookClient, Book, book);

impl BookClient {
    #[instrument(skip(self))]
    pub async fn add_book(&self, book: BookCreate) -> Result<BookId> {
        debug!("Sending request");
        self.inner.create(book).await
    }

    #[instrument(skip(self))]
    pub async fn list_books(&self, limit: usize) -> Result<Vec<Book>> {
        debug!("Sending request");
        self.inner.find(BookQuery::All, clamp_limit(limit)).await
    }

    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: String) -> Result<Option<Book>> {
        debug!("Sending request");
        Ok(self.inner.find(BookQuery::Name(name), 1).await?.pop())
    }

    #[instrument(skip(self))]
    pub async fn update_book(&self, id: BookId, patch: BookPatch) -> Result<Book> {
        debug!("Sending request");
        self.inner.update(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: BookId) -> Result<u32> {
        debug!("Sending request");
        match self.inner.perform_action(id, BookAction::CheckStock).await? {
            BookActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Adds units to stock and returns the new level.
    #[instrument(skip(self))]
    pub async fn increment_stock(&self, id: BookId, amount: u32) -> Result<u32> {
        debug!("Sending request");
        match self.inner.perform_action(id, BookAction::Restock(amount)).await? {
            BookActionResult::Restock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Removes units from stock, refusing to go below zero. Returns the new level.
    #[instrument(skip(self))]
    pub async fn decrement_stock(&self, id: BookId, amount: u32) -> Result<u32> {
        debug!("Sending request");
        match self.inner.perform_action(id, BookAction::Withdraw(amount)).await? {
            BookActionResult::Withdraw(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: BookId, order_id: OrderId, quantity: u32) -> Result<Reservation> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, BookAction::Reserve { order_id, quantity })
            .await?
        {
            BookActionResult::Reserve(reservation) => Ok(reservation),
            other => Err(unexpected(other)),
        }
    }

    /// Units given back to stock, `None` when the order held nothing.
    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: BookId, order_id: OrderId) -> Result<Option<u32>> {
        debug!("Sending request");
        match self.inner.perform_action(id, BookAction::Release { order_id }).await? {
            BookActionResult::Release(units) => Ok(units),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn settle_stock(&self, id: BookId, order_id: OrderId) -> Result<Option<u32>> {
        debug!("Sending request");
        match self.inner.perform_action(id, BookAction::Settle { order_id }).await? {
            BookActionResult::Settle(units) => Ok(units),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: BookActionResult) -> BookstoreError {
    BookstoreError::Internal(format!("unexpected book action result: {result:?}"))
}
