use std::sync::{Arc, Mutex};

use flashmap::flashing::{FlashProgress, ProgressEvent};
use tracing_subscriber::EnvFilter;

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
/// A progress handler collecting every event.
pub fn recorder() -> (FlashProgress, Arc<Mutex<Vec<ProgressEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let progress = FlashProgress::new(move |event| sink.lock().unwrap().push(event));
    (progress, events)
}
