//! Logger backed by the `tracing` facade

use super::traits::Logger;

/// Forwards every message to `tracing` under a fixed component field
///
/// Install a subscriber (e.g. `tracing-subscriber`) in the host binary to
/// see the output.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: String,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::with_component("temporal-config")
    }

    /// Tag events with a custom component name
    pub fn with_component(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(component = %self.component, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(component = %self.component, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(component = %self.component, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(component = %self.component, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_name() {
        assert_eq!(TracingLogger::new().component(), "temporal-config");
        assert_eq!(TracingLogger::with_component("worker").component(), "worker");
    }

    #[test]
    fn test_logs_without_subscriber() {
        let logger = TracingLogger::new();
        logger.debug("debug message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");
    }
}
