pub mod extractor;
pub mod llm;
