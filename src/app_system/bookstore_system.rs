use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::actor_framework::ResourceActor;
use crate::clients::{BookClient, OrderClient, PaymentClient, UserClient};
use crate::clock::{Clock, SystemClock};
use crate::domain::{new_id, Book, BookCreate, Order, Payment, User};
use crate::error::{BookstoreError, Result};
use crate::reclaimer::Reclaimer;

/// The running bookstore: one store actor per collection plus the clients wired to them.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct BookstoreSystem {
    pub book_client: BookClient,
    pub user_client: UserClient,
    pub order_client: OrderClient,
    pub payment_client: PaymentClient,
    clock: Arc<dyn Clock>,
    handles: Vec<JoinHandle<()>>,
}

impl BookstoreSystem {
    pub fn new(buffer_size: usize) -> Self {
        Self::with_clock(buffer_size, Arc::new(SystemClock))
    }

    pub fn with_clock(buffer_size: usize, clock: Arc<dyn Clock>) -> Self {
        // 1. Leaf stores
        let (book_actor, book_store) = ResourceActor::<Book>::new(buffer_size, new_id);
        let book_client = BookClient::new(book_store);
        let book_handle = tokio::spawn(book_actor.run());

        let (user_actor, user_store) = ResourceActor::<User>::new(buffer_size, new_id);
        let user_client = UserClient::new(user_store);
        let user_handle = tokio::spawn(user_actor.run());

        // 2. Orders reserve stock and check users
        let (order_actor, order_store) = ResourceActor::<Order>::new(buffer_size, new_id);
        let order_client = OrderClient::new(
            order_store,
            user_client.clone(),
            book_client.clone(),
            Arc::clone(&clock),
        );
        let order_handle = tokio::spawn(order_actor.run());

        // 3. Payments settle orders
        let (payment_actor, payment_store) = ResourceActor::<Payment>::new(buffer_size, new_id);
        let payment_client = PaymentClient::new(payment_store, order_client.clone(), user_client.clone());
        let payment_handle = tokio::spawn(payment_actor.run());

        info!("Bookstore system started");
        Self {
            book_client,
            user_client,
            order_client,
            payment_client,
            clock,
            handles: vec![book_handle, user_handle, order_handle, payment_handle],
        }
    }

    /// A reclaimer wired to this system's orders and clock, with default settings.
    pub fn reclaimer(&self) -> Reclaimer {
        Reclaimer::new(self.order_client.clone(), Arc::clone(&self.clock))
    }

    /// Loads a JSON array of books into the catalogue. Books whose name is
    /// already taken are left alone. Returns how many were added.
    pub async fn seed_books(&self, path: &Path) -> Result<usize> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BookstoreError::Config(format!("cannot read seed file {}: {e}", path.display())))?;
        let books: Vec<BookCreate> = serde_json::from_str(&raw)
            .map_err(|e| BookstoreError::Config(format!("invalid seed file {}: {e}", path.display())))?;

        let mut added = 0;
        for book in books {
            let name = book.name.clone();
            match self.book_client.add_book(book).await {
                Ok(_) => added += 1,
                Err(BookstoreError::AlreadyExists { .. }) => warn!(%name, "Book already in catalogue"),
                Err(e) => return Err(e),
            }
        }
        info!(added, "Catalogue seeded");
        Ok(added)
    }

    /// Stops every store, dependents first, and waits for the actor tasks.
    pub async fn shutdown(self) -> Result<()> {
        info!("Shutting down system...");
        self.payment_client.shutdown().await?;
        self.order_client.shutdown().await?;
        self.user_client.shutdown().await?;
        self.book_client.shutdown().await?;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(BookstoreError::Internal(format!("actor task failed: {e}")));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
