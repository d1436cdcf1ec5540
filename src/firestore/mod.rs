//! # Firestore
//!
//! - [Initializing the client](#initializing-the-client)
//! - [Batch writes](#batch-writes)
//!
//! ## Initializing the client
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() {
//! use car_seeder::{
//!     ServiceAccount,
//!     firestore::client::{FirestoreClient, FirestoreClientOptions}
//! };
//!
//! // Load the service account, which specifies which project we will connect
//! // to and the private key used to sign access tokens.
//! let service_account = ServiceAccount::from_file("./serviceAccountKey.json").unwrap();
//!
//! // Configure the client - we just want the default.
//! let client_options = FirestoreClientOptions::default();
//!
//! let mut client = FirestoreClient::initialise(service_account, client_options)
//!     .await
//!     .unwrap();
//! # }
//! ```
//!
//! ## Batch writes
//!
//! Writes are staged on a [`WriteBatch`] and sent together with
//! [`DocumentStore::commit`]. Firestore applies the whole batch or nothing.
//! Any [`DocumentStore`] works, including the in-memory one used in tests:
//!
//! [`WriteBatch`]: batch::WriteBatch
//! [`DocumentStore`]: batch::DocumentStore
//! [`DocumentStore::commit`]: batch::DocumentStore::commit
//!
//! ```
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # use car_seeder::firestore::test_helpers::MemoryStore;
//! # let mut store = MemoryStore::new();
//! use car_seeder::firestore::{batch::DocumentStore, collection};
//!
//! let cars = collection("cars");
//! let mut batch = store.batch();
//!
//! for model in ["Honda Civic", "BMW X5"] {
//!     // `new_doc` allocates a random ID locally; nothing exists remotely yet.
//!     batch.set(&cars.new_doc(), &serde_json::json!({ "model": model }))?;
//! }
//!
//! let receipt = store.commit(batch).await?;
//!
//! assert_eq!(receipt.write_count, 2);
//! assert_eq!(store.documents_in("cars").len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod client;
pub mod reference;
pub mod serde;
mod token_provider;

/// This module isn't really supposed to be exposed, but we are lacking
/// `#[cfg(doctest)]`, and we can't make it private either since doctests are
/// full-blown integration tests.
///
/// Relevant rust-lang issue: <https://github.com/rust-lang/rust/issues/67295>
pub mod test_helpers;

pub use reference::collection;
