use super::actions::{BookAction, BookActionResult, Reservation};
use crate::actor_framework::Entity;
use crate::domain::{Book, BookCreate, BookId, BookPatch, BookQuery};
use crate::error::BookstoreError;

impl Entity for Book {
    type Id = BookId;
    type CreateParams = BookCreate;
    type Patch = BookPatch;
    type Query = BookQuery;
    type Action = BookAction;
    type ActionResult = BookActionResult;
    type Error = BookstoreError;

    const KIND: &'static str = "book";

    fn id(&self) -> &BookId {
        &self.id
    }

    /// Creates a new Book from creation parameters.
    ///
    /// # Errors
    /// `InvalidArgument` for an empty name, a zero price or a zero quantity.
    fn from_create_params(id: BookId, params: BookCreate) -> Result<Self, BookstoreError> {
        if params.name.trim().is_empty() {
            return Err(BookstoreError::invalid("name is required"));
        }
        if params.price == 0 {
            return Err(BookstoreError::invalid("price minimum is 1"));
        }
        if params.quantity == 0 {
            return Err(BookstoreError::invalid("quantity minimum is 1"));
        }
        Ok(Self {
            id,
            name: params.name,
            author: params.author,
            publisher: params.publisher,
            category: params.category,
            language: params.language,
            description: params.description,
            image: params.image,
            price: params.price,
            quantity: params.quantity,
            holds: Default::default(),
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn matches(&self, query: &BookQuery) -> bool {
        match query {
            BookQuery::All => true,
            BookQuery::Name(name) => &self.name == name,
        }
    }

    /// Applies the fields present in the patch.
    ///
    /// A quantity override replaces the available stock; held units are not affected.
    fn on_update(&mut self, patch: BookPatch) -> Result<(), BookstoreError> {
        if patch.price == Some(0) {
            return Err(BookstoreError::invalid("price minimum is 1"));
        }
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(BookstoreError::invalid("name is required"));
            }
            self.name = name;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(publisher) = patch.publisher {
            self.publisher = publisher;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        Ok(())
    }

    /// Handles stock movements.
    ///
    /// # Errors
    /// - `InsufficientStock` when a reservation or withdrawal asks for more than is available.
    /// - `InvalidArgument` for zero-unit reservations or a total price that overflows.
    fn handle_action(&mut self, action: BookAction) -> Result<BookActionResult, BookstoreError> {
        match action {
            BookAction::CheckStock => Ok(BookActionResult::CheckStock(self.quantity)),
            BookAction::Reserve { order_id, quantity } => {
                self.reserve(order_id, quantity).map(BookActionResult::Reserve)
            }
            BookAction::Release { order_id } => {
                let Some(&units) = self.holds.get(&order_id) else {
                    return Ok(BookActionResult::Release(None));
                };
                self.quantity = self
                    .quantity
                    .checked_add(units)
                    .ok_or_else(|| BookstoreError::invalid("stock counter overflow"))?;
                self.holds.remove(&order_id);
                Ok(BookActionResult::Release(Some(units)))
            }
            BookAction::Settle { order_id } => {
                Ok(BookActionResult::Settle(self.holds.remove(&order_id)))
            }
            BookAction::Restock(units) => {
                self.quantity = self
                    .quantity
                    .checked_add(units)
                    .ok_or_else(|| BookstoreError::invalid("stock counter overflow"))?;
                Ok(BookActionResult::Restock(self.quantity))
            }
            BookAction::Withdraw(units) => {
                self.take(units)?;
                Ok(BookActionResult::Withdraw(self.quantity))
            }
        }
    }
}

impl Book {
    fn reserve(&mut self, order_id: String, quantity: u32) -> Result<Reservation, BookstoreError> {
        if let Some(&held) = self.holds.get(&order_id) {
            return self.reservation(held);
        }
        if quantity == 0 {
            return Err(BookstoreError::invalid("quantity minimum is 1"));
        }
        let reservation = self.reservation(quantity)?;
        self.take(quantity)?;
        self.holds.insert(order_id, quantity);
        Ok(Reservation {
            remaining: self.quantity,
            ..reservation
        })
    }

    fn reservation(&self, quantity: u32) -> Result<Reservation, BookstoreError> {
        let total_price = self
            .price
            .checked_mul(u64::from(quantity))
            .ok_or_else(|| BookstoreError::invalid("total price overflow"))?;
        Ok(Reservation {
            quantity,
            unit_price: self.price,
            total_price,
            remaining: self.quantity,
        })
    }

    fn take(&mut self, units: u32) -> Result<(), BookstoreError> {
        match self.quantity.checked_sub(units) {
            Some(left) => {
                self.quantity = left;
                Ok(())
            }
            None => Err(BookstoreError::InsufficientStock {
                book_id: self.id.clone(),
                requested: units,
                available: self.quantity,
            }),
        }
    }
}
