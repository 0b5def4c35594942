use crate::types::FileSignals;

/// Trait that each language/framework extractor must implement.
pub trait SignalExtractor: Send + Sync {
    /// Language name (e.g., "python")
    fn language(&self) -> &'static str;

    /// Framework whose usage is detected (e.g., "FastAPI")
    fn framework(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., &["py"])
    fn file_extensions(&self) -> &[&str];

    /// Extract structural signals from one decoded source file.
    ///
    /// `rel_path` is relative to the submission root and uses `/` separators.
    fn extract(&self, rel_path: &str, content: &str) -> FileSignals;
}
