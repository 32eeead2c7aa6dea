pub mod question;

pub use question::{Batch, GenerationRequest, Question, OPTION_COUNT};
