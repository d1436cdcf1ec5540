use std::io;
use std::sync::{Arc, Mutex};

use car_seeder::{
    cars,
    firestore::test_helpers::MemoryStore,
    seeder::{self, SeederOptions},
};
use firestore_grpc::tonic::Code;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

/// Routes this thread's `tracing` output into a buffer. `#[tokio::test]`
/// runs on a current-thread runtime, so the whole test is captured.
fn capture_logs() -> (SharedBuffer, DefaultGuard) {
    let sink = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();

    (sink, tracing::subscriber::set_default(subscriber))
}

#[tokio::test]
async fn successful_seed_logs_banner_each_car_and_completion() {
    let (logs, _guard) = capture_logs();
    let mut store = MemoryStore::new();

    let report = seeder::seed_and_log(&mut store, &cars::fleet()).await;

    assert_eq!(report.map(|r| r.documents.len()), Some(5));

    let text = logs.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 7, "{text}");
    assert!(lines[0].ends_with("Adding cars to Firestore..."));
    for (line, car) in lines[1..6].iter().zip(cars::fleet()) {
        assert!(line.ends_with(&format!("Added car: {}", car.model)), "{line}");
    }
    assert!(lines[6].ends_with("All cars added successfully!"));
    assert!(!text.contains("Error adding cars"));
}

#[tokio::test]
async fn rejected_commit_logs_error_line() {
    let (logs, _guard) = capture_logs();
    let mut store = MemoryStore::new().fail_commits_with(Code::Unavailable, "connection reset");

    let report = seeder::seed_and_log(&mut store, &cars::fleet()).await;

    assert_eq!(report, None);
    assert!(store.is_empty());

    let text = logs.text();
    assert!(text.contains("Adding cars to Firestore..."));
    let error_line = text
        .lines()
        .find(|line| line.contains("Error adding cars to Firestore: "))
        .unwrap_or_else(|| panic!("no error line in {text}"));
    assert!(error_line.contains("ERROR"));
    assert!(error_line.ends_with("commit rejected (Unavailable): connection reset"));
    assert!(!text.contains("All cars added successfully!"));
}

#[tokio::test]
async fn missing_credential_logs_error_line() {
    let (logs, _guard) = capture_logs();
    let path = std::env::temp_dir().join(format!("missing-key-{}.json", ulid::Ulid::new()));

    let report = seeder::run(SeederOptions::default().credential_path(&path)).await;

    assert_eq!(report, None);

    let text = logs.text();
    assert!(text.contains("Adding cars to Firestore..."));
    assert!(
        text.contains(
            "Error adding cars to Firestore: invalid service account: \
             Failed to read service account file"
        ),
        "{text}"
    );
    assert!(!text.contains("Added car:"));
    assert!(!text.contains("All cars added successfully!"));
}
