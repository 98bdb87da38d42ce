use crate::render::render_event;
use async_trait::async_trait;
use kawase_core::analysis::error::SinkError;
use kawase_core::analysis::port::{AnalysisEvent, DecisionSink};

/// # Summary
/// A sink implementation that prints analysis events to standard output.
///
/// # Invariants
/// * Printing never fails; `publish` always returns `Ok(())`.
#[derive(Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// # Summary
    /// Creates a new `ConsoleSink`.
    ///
    /// # Returns
    /// * A new instance of `ConsoleSink`.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DecisionSink for ConsoleSink {
    /// # Summary
    /// Prints the event as a subject line followed by the rendered body.
    ///
    /// # Arguments
    /// * `event` - The analysis event to print.
    ///
    /// # Returns
    /// * Always `Ok(())`.
    async fn publish(&self, event: &AnalysisEvent) -> Result<(), SinkError> {
        let (subject, body) = render_event(event);
        println!("=== {} ===\n{}", subject, body);
        Ok(())
    }
}
