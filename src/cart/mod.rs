//! Cart
//!
//! The cart holds one line per `(product, variant)` pair. Adding an existing pair
//! merges into its line, and every mutation is written through to local storage
//! before it becomes visible.

mod errors;
mod handle;
mod line;
mod records;
mod store;

pub use errors::CartError;
pub use handle::CartHandle;
pub use line::{CartLine, NewCartLine};
pub use records::CartLineRecord;
pub use store::{CART_STORAGE_KEY, CartStore};
