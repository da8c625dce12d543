//! Port for stock item persistence.
//!
//! Adapters own identifier assignment and the `added_date` default, and
//! resolve the owning user on every read.

use async_trait::async_trait;

use crate::domain::{NewStock, StockId, StockItem, StockPatch};

use super::define_port_error;

define_port_error! {
    /// Errors raised by stock repository adapters.
    pub enum StockRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "stock repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "stock repository query failed: {message}",
        /// The referenced owner does not exist.
        UnknownUser { message: String } => "stock item owner does not exist: {message}",
        /// The store rejected the row against a schema constraint.
        Constraint { message: String } => "stock item violates a store constraint: {message}",
    }
}

/// Port for reading and writing stock items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockRepository: Send + Sync {
    /// Insert a new item and return it as stored.
    async fn create(&self, stock: &NewStock) -> Result<StockItem, StockRepositoryError>;

    /// Every stored item, oldest first.
    async fn list_all(&self) -> Result<Vec<StockItem>, StockRepositoryError>;

    /// Fetch one item; `None` when absent.
    async fn find_by_id(&self, id: &StockId) -> Result<Option<StockItem>, StockRepositoryError>;

    /// Merge the supplied fields and return the updated item; `None` when
    /// absent.
    async fn update(
        &self,
        id: &StockId,
        patch: &StockPatch,
    ) -> Result<Option<StockItem>, StockRepositoryError>;

    /// Remove an item permanently. Returns `false` when absent.
    async fn delete(&self, id: &StockId) -> Result<bool, StockRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(StockRepositoryError::connection("refused"), "stock repository connection failed: refused")]
    #[case(StockRepositoryError::query("syntax"), "stock repository query failed: syntax")]
    #[case(
        StockRepositoryError::unknown_user("3fa85f64"),
        "stock item owner does not exist: 3fa85f64"
    )]
    #[case(
        StockRepositoryError::constraint("stock_items_quantity_check"),
        "stock item violates a store constraint: stock_items_quantity_check"
    )]
    fn errors_render_context(#[case] error: StockRepositoryError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }
}
