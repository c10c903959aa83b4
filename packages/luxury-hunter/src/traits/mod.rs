//! Seams to the outside world.

pub mod analyzer;
pub mod diagnostics;

pub use analyzer::ImageAnalyzer;
pub use diagnostics::{DiagnosticSink, TracingSink};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn traits_are_object_safe() {
        let _sink: Arc<dyn DiagnosticSink> = Arc::new(TracingSink);
        fn _takes_analyzer(_: Arc<dyn ImageAnalyzer>) {}
    }
}
