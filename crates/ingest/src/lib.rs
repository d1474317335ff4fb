pub mod document;
pub mod fetcher;
pub mod reader;
pub mod source;
pub mod unified;

pub use document::{KnowledgeDocument, SourceTag, sanitize};
pub use fetcher::{FetchOutcome, KnowledgeBaseFetcher};
pub use reader::{FileReader, StaticHttpReader};
pub use source::{DocumentSource, FetchError};
pub use unified::{UnifiedConfig, UnifiedStorageClient};
