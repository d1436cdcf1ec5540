//! The seeding flow: load the credential, connect, stage one write per car
//! and commit them as a single batch.
//!
//! Every run allocates fresh document IDs, so running the seeder twice
//! stores the fleet twice.

use std::path::PathBuf;

use crate::{
    cars::{self, CarRecord, CARS_COLLECTION},
    error::FirebaseError,
    firestore::{
        batch::DocumentStore,
        client::{FirestoreClient, FirestoreClientOptions},
        collection,
        reference::DocumentReference,
    },
    ServiceAccount,
};

pub const DEFAULT_CREDENTIAL_PATH: &str = "./serviceAccountKey.json";

#[derive(Clone, Debug)]
pub struct SeederOptions {
    pub credential_path: PathBuf,
    pub client: FirestoreClientOptions,
}

impl Default for SeederOptions {
    fn default() -> Self {
        Self {
            credential_path: PathBuf::from(DEFAULT_CREDENTIAL_PATH),
            client: FirestoreClientOptions::default(),
        }
    }
}

impl SeederOptions {
    pub fn credential_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credential_path = path.into();
        self
    }

    pub fn client_options(mut self, options: FirestoreClientOptions) -> Self {
        self.client = options;
        self
    }
}

/// What a successful seed wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// One reference per car, in fleet order.
    pub documents: Vec<DocumentReference>,
    /// The time at which the batch was applied, in seconds of UTC time since
    /// Unix epoch.
    pub commit_time: Option<i64>,
}

/// Writes `cars` into the `cars` collection of `store` as one atomic batch,
/// each under a newly allocated document ID.
///
/// An empty slice is a no-op that never reaches the store.
///
/// # Examples
///
/// ```
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use car_seeder::{cars, firestore::test_helpers::MemoryStore, seeder};
///
/// let mut store = MemoryStore::new();
/// let report = seeder::seed(&mut store, &cars::fleet()).await?;
///
/// assert_eq!(report.documents.len(), 5);
/// assert_eq!(store.documents_in("cars").len(), 5);
/// # Ok(())
/// # }
/// ```
pub async fn seed<S: DocumentStore>(
    store: &mut S,
    cars: &[CarRecord],
) -> Result<SeedReport, FirebaseError> {
    if cars.is_empty() {
        return Ok(SeedReport {
            documents: Vec::new(),
            commit_time: None,
        });
    }

    let collection_ref = collection(CARS_COLLECTION);
    let mut batch = store.batch();

    for car in cars {
        batch.set(&collection_ref.new_doc(), car)?;
        tracing::info!("Added car: {}", car.model);
    }

    let documents = batch.document_references().to_vec();
    let receipt = store.commit(batch).await?;

    Ok(SeedReport {
        documents,
        commit_time: receipt.commit_time,
    })
}

/// Runs the whole seeder against Firestore with the fixed fleet.
///
/// Any failure (unreadable credential, unreachable service, rejected commit)
/// is logged and swallowed; `None` is returned in that case.
pub async fn run(options: SeederOptions) -> Option<SeedReport> {
    tracing::info!("Adding cars to Firestore...");

    let outcome = match connect(&options).await {
        Ok(mut client) => seed(&mut client, &cars::fleet()).await,
        Err(err) => Err(err),
    };

    log_outcome(outcome)
}

/// Seeds `cars` into an already connected `store`, logging progress and the
/// outcome the same way [`run`] does. Errors are logged and swallowed.
///
/// # Examples
///
/// ```
/// # #[tokio::main]
/// # async fn main() {
/// use car_seeder::{cars, firestore::test_helpers::MemoryStore, seeder};
///
/// let mut store = MemoryStore::new();
/// let report = seeder::seed_and_log(&mut store, &cars::fleet()).await;
///
/// assert_eq!(report.map(|r| r.documents.len()), Some(5));
/// # }
/// ```
pub async fn seed_and_log<S: DocumentStore>(
    store: &mut S,
    cars: &[CarRecord],
) -> Option<SeedReport> {
    tracing::info!("Adding cars to Firestore...");

    log_outcome(seed(store, cars).await)
}

async fn connect(options: &SeederOptions) -> Result<FirestoreClient, FirebaseError> {
    let service_account = ServiceAccount::from_file(&options.credential_path)?;
    FirestoreClient::initialise(service_account, options.client.clone()).await
}

fn log_outcome(outcome: Result<SeedReport, FirebaseError>) -> Option<SeedReport> {
    match outcome {
        Ok(report) => {
            tracing::info!("All cars added successfully!");
            Some(report)
        }
        Err(err) => {
            tracing::error!("Error adding cars to Firestore: {err:?}");
            None
        }
    }
}
