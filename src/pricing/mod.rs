pub mod allocator;

pub use allocator::{AllocationError, PriceAllocator};
