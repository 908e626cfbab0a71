/// Receives human-readable status lines during slow operations.
///
/// Sinks never influence results.
pub trait ProgressSink {
    fn notify(&self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn notify(&self, _message: &str) {}
}

impl<F> ProgressSink for F
where
    F: Fn(&str),
{
    fn notify(&self, message: &str) {
        self(message)
    }
}
