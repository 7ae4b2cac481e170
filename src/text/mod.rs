//! Text preparation: cleanup, sentence splitting, and sectioning.

pub mod chunk;
pub mod normalize;
pub mod segment;

pub use chunk::{chunk, plan_sections, split_into_sections, Section, DEFAULT_MAX_SECTION_LEN};
pub use normalize::{extract_main_content, normalize};
pub use segment::{segment, segment_with, SentenceTokenizer, UnicodeTokenizer};
