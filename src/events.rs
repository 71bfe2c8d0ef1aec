use tracing::{debug, warn};

/// Diagnostic events emitted by the core while it works.
///
/// The core never logs directly; it reports through an injected sink so the
/// functions stay pure and tests can assert on what was reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// Rotation store was unreachable; the default zero state was used.
    StoreUnavailable { operation: String, detail: String },
    /// The weakest extraction heuristic fired for a decomposed field.
    WeakestHeuristic { field: String, extractor: String },
    /// A guide-prompt field could not be recovered at all.
    ExtractionMiss { field: String },
    /// Configured outfit rotation step disagrees with the template.
    StepMismatch {
        configured: usize,
        placeholders: usize,
    },
    /// A generation attempt failed validation and is being retried.
    RetryingGeneration { attempt: usize, critical: Vec<String> },
    /// Final result still carries critical issues after the bounded retry.
    ReturningInvalid { critical: Vec<String> },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: CoreEvent);
}

/// Production sink: forwards events to `tracing`.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: CoreEvent) {
        match &event {
            CoreEvent::StoreUnavailable { operation, detail } => {
                warn!("Rotation store unavailable during {operation}, using zero state: {detail}");
            }
            CoreEvent::WeakestHeuristic { field, extractor } => {
                debug!("Guide decomposition fell through to '{extractor}' for field '{field}'");
            }
            CoreEvent::ExtractionMiss { field } => {
                debug!("Guide decomposition recovered no '{field}' field");
            }
            CoreEvent::StepMismatch {
                configured,
                placeholders,
            } => {
                warn!(
                    "Configured outfit rotation step {configured} does not match {placeholders} outfit placeholder(s) in template"
                );
            }
            CoreEvent::RetryingGeneration { attempt, critical } => {
                warn!(
                    "Generation attempt {attempt} failed validation ({}), retrying",
                    critical.join("; ")
                );
            }
            CoreEvent::ReturningInvalid { critical } => {
                warn!(
                    "Returning generation with unresolved critical issues: {}",
                    critical.join("; ")
                );
            }
        }
    }
}
