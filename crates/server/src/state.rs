use llm::CompletionClient;
use retrieval::Retriever;

/// Shared application state passed to every handler.
///
/// Holds the retriever (embedder + loaded index) and the completion client.
/// Both are cheap to share and read-only after startup.
pub struct AppState {
    pub retriever: Retriever,
    pub completion: CompletionClient,
}
