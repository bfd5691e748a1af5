//! Read side of the customer accounts service.
//!
//! Views are not stored separately; each query reloads the customer's event
//! stream and folds it on demand:
//! - [`CustomerView`] read model folded from a customer event stream
//! - [`CustomerQueryHandler`] answering `customer_view_by_id`

pub mod query;
pub mod views;

pub use query::CustomerQueryHandler;
pub use views::CustomerView;
