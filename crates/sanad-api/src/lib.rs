pub mod handlers;
pub mod matcher;
pub mod rate_limit;
pub mod segment;
pub mod video;

pub use handlers::{AppState, router};
pub use matcher::{TranslateError, Translation, Translator};
pub use segment::{CommandSegmenter, Segmenter, SegmenterError, WhitespaceSegmenter};
pub use video::VideoLibrary;
