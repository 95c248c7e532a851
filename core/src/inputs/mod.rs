pub mod avatar;
pub mod metadata;

pub use avatar::prepare_avatar;
pub use metadata::{write_metadata, VideoMetadata};
