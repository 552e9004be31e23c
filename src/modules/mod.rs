pub mod ai;
pub mod session;
pub mod summarizer;
