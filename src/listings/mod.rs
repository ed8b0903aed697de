pub mod filter;
pub mod paginate;

pub use filter::{ListingFilter, PROPERTY_TYPES};
pub use paginate::{paginate, Page, PAGE_SIZE};
