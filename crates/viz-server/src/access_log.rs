use poem::middleware::Tracing;
use poem::Endpoint;
use poem::EndpointExt;
use poem::Response;

/// Applies the route's logging policy. Logged routes go through poem's
/// `Tracing` middleware (a `request` span carrying remote address, method and
/// URI, plus one `response` or `error` event). Routes polled by the frontend
/// register with `log_requests = false` to keep the log readable.
pub fn with_logging<E>(ep: E, log_requests: bool) -> impl Endpoint<Output = Response>
where
    E: Endpoint + 'static,
{
    ep.with_if(log_requests, Tracing).map_to_response()
}

#[cfg(test)]
pub(crate) mod capture {
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::Mutex;

    use tracing::subscriber::DefaultGuard;

    /// Log output collected by a thread-local fmt subscriber.
    #[derive(Clone, Default)]
    pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        /// Installs the capturing subscriber for the current thread until the
        /// guard drops. `#[tokio::test]` runs on a single thread, so handlers
        /// log into it too.
        pub(crate) fn install() -> (Self, DefaultGuard) {
            let logs = CapturedLogs::default();
            let writer = logs.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .finish();
            let guard = tracing::subscriber::set_default(subscriber);
            (logs, guard)
        }

        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
