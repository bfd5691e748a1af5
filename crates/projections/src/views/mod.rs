//! Read model views.

mod customer;

pub use customer::CustomerView;
