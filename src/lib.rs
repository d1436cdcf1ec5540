//! # Car seeder
//!
//! Populates the Firestore `cars` collection with a fixed fleet of rental
//! cars. All records are written in a single atomic batch: either every car
//! lands in the collection or none of them do.
//!
//! The crate is split in two layers:
//!
//! - **Firestore**: a small gRPC client that authenticates with a service
//!   account and commits [`WriteBatch`]es. See the [`firestore`] module.
//! - **Seeding**: the [`cars`] data and the linear [`seeder`] flow that
//!   stages and commits them.
//!
//! [`WriteBatch`]: firestore::batch::WriteBatch
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() {
//! use car_seeder::seeder::{self, SeederOptions};
//!
//! let options = SeederOptions::default().credential_path("./serviceAccountKey.json");
//!
//! // Failures are logged, never returned.
//! if let Some(report) = seeder::run(options).await {
//!     println!("wrote {} cars", report.documents.len());
//! }
//! # }
//! ```

pub mod cars;
pub mod error;
pub mod firestore;
pub mod seeder;
mod service_account;

pub use service_account::ServiceAccount;
