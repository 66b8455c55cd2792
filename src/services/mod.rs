pub mod analytics;
pub mod creator_directory;
pub mod insightiq;
pub mod mock_creators;
pub mod session_registry;

pub use creator_directory::{CreatorDirectory, build_creator_directory};
pub use session_registry::SearchSessionRegistry;
