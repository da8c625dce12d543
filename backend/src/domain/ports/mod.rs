//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod image_store;
mod stock_command;
mod stock_query;
mod stock_repository;

#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use stock_command::MockStockCommand;
pub use stock_command::{
    CreateStockRequest, DeleteStockRequest, StockCommand, UpdateStockRequest,
};
#[cfg(test)]
pub use stock_query::MockStockQuery;
pub use stock_query::{GetStockRequest, StockQuery};
#[cfg(test)]
pub use stock_repository::MockStockRepository;
pub use stock_repository::{StockRepository, StockRepositoryError};
