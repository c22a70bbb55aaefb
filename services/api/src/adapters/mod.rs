pub mod fixtures;
pub mod memory;
pub mod study_llm;

pub use memory::InMemoryStore;
pub use study_llm::OpenAiStudyAdapter;
