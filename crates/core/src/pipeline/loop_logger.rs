use crate::classify::domain::classifier::Label;

/// Cross-cutting observer for loop events.
///
/// Decouples the loop from specific output mechanisms so embedders can route
/// the change-log wherever they observe pipeline behavior.
pub trait LoopLogger: Send {
    /// Record that the rendered label set changed. Fires once per distinct
    /// consecutive label set, never per tick.
    fn labels_changed(&mut self, labels: &[Label]);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);
}

/// Silent logger that discards all events. For tests and embedders with
/// their own signals.
pub struct NullLoopLogger;

impl LoopLogger for NullLoopLogger {
    fn labels_changed(&mut self, _labels: &[Label]) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger that records history and emits through the `log` facade.
#[derive(Default)]
pub struct StdoutLoopLogger {
    changes: Vec<Vec<Label>>,
    messages: Vec<String>,
}

impl StdoutLoopLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every label set the change-log has fired for, in order.
    pub fn changes(&self) -> &[Vec<Label>] {
        &self.changes
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl LoopLogger for StdoutLoopLogger {
    fn labels_changed(&mut self, labels: &[Label]) {
        log::info!("Predicted labels: [{}]", labels.join(", "));
        self.changes.push(labels.to_vec());
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
        self.messages.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_is_noop() {
        let mut logger = NullLoopLogger;
        logger.labels_changed(&["happy".to_string()]);
        logger.info("hello");
        // No panics = success
    }

    #[test]
    fn test_stdout_logger_records_changes() {
        let mut logger = StdoutLoopLogger::new();
        logger.labels_changed(&["happy".to_string()]);
        logger.labels_changed(&["sad".to_string(), "happy".to_string()]);

        assert_eq!(logger.changes().len(), 2);
        assert_eq!(logger.changes()[0], vec!["happy"]);
        assert_eq!(logger.changes()[1], vec!["sad", "happy"]);
    }

    #[test]
    fn test_stdout_logger_records_messages() {
        let mut logger = StdoutLoopLogger::new();
        logger.info("camera opened");
        assert_eq!(logger.messages().len(), 1);
        assert_eq!(logger.messages()[0], "camera opened");
    }
}
