mod error;
mod http;
mod response;

pub use error::GatewayError;
pub use http::HttpGateway;
pub use response::{AnalysisConfiguration, ContextSnippet, PromptSettings, QaResponse, SourceDocument};

use async_trait::async_trait;

/// Trait for literature question-answering engines.
///
/// An engine takes a natural-language question plus per-call settings,
/// searches the papers in `settings.paper_directory`, and answers with the
/// evidence snippets it used.
///
/// # Example
///
/// ```ignore
/// use ecmo_core::gateway::{HttpGateway, QaGateway};
///
/// let gateway = HttpGateway::new("http://localhost:8000");
/// let response = gateway.ask("What is the LogP of meropenem?", &settings).await?;
/// println!("{}", response.answer);
/// ```
#[async_trait]
pub trait QaGateway: Send + Sync {
    /// Ask one question and return the engine's full response.
    async fn ask(
        &self,
        question: &str,
        settings: &AnalysisConfiguration,
    ) -> Result<QaResponse, GatewayError>;
}

/// Blanket implementation for boxed trait objects.
#[async_trait]
impl QaGateway for Box<dyn QaGateway> {
    async fn ask(
        &self,
        question: &str,
        settings: &AnalysisConfiguration,
    ) -> Result<QaResponse, GatewayError> {
        (**self).ask(question, settings).await
    }
}
