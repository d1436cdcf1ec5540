use car_seeder::seeder::{self, SeederOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut options = SeederOptions::default();
    if let Some(credential_path) = std::env::args_os().nth(1) {
        options = options.credential_path(credential_path);
    }

    // Failures are already logged by the seeder; the exit code stays 0.
    seeder::run(options).await;
}
