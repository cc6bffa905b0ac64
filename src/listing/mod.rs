pub mod filter;
pub mod pagination;
pub mod price;
pub mod view;

pub use filter::{Choice, ListingFilter, RangeFilter, RoomFilter};
pub use pagination::Pagination;
pub use price::PriceChange;
pub use view::{FetchTicket, ListingView};
