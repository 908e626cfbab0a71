use crate::domain::progress::ProgressSink;

/// Forwards progress lines to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn notify(&self, message: &str) {
        tracing::info!(target: "cenvars::progress", "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usable_as_dyn_sink() {
        let sink: &dyn ProgressSink = &TracingProgress;
        sink.notify("generating key");
    }
}
