pub mod booking;
pub mod cleanup;

pub use booking::BookingService;
pub use cleanup::CleanupService;
