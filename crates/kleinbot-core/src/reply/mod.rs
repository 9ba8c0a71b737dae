//! Reply synthesis and post-processing.

pub mod post_process;
pub mod prompt;
pub mod synthesizer;
pub mod texts;

pub use post_process::{PostProcessor, should_append_footer};
pub use prompt::build_request;
pub use synthesizer::{Synthesizer, truncate_reply};
