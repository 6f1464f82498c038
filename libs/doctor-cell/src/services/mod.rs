pub mod cloudinary;
pub mod directory;
pub mod leave;
pub mod roster;

pub use cloudinary::CloudinaryClient;
pub use directory::DoctorDirectoryService;
pub use leave::LeaveService;
pub use roster::DoctorRosterService;
