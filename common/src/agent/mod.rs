pub mod parser;
pub mod prompt;
pub mod synthesizer;

pub use parser::strip_code_fences;
pub use prompt::{build_query_prompt, QUERY_RULES};
pub use synthesizer::{CandidateQuery, QuerySynthesizer};
