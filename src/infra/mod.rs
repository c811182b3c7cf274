//! Backing-store access.

pub mod store;

pub use store::{
    BookingPage, BookingQuery, BookingSort, SortField, StoreClient, StoreConfig, StoreError, Table,
    PAGE_SIZE,
};
