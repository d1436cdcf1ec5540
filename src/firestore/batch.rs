//! Atomic multi-document writes.
//!
//! A [`WriteBatch`] collects writes locally. Nothing is sent until the batch
//! is handed to [`DocumentStore::commit`], which applies every staged write
//! or none of them.

use std::future::Future;

use firestore_grpc::v1::{write::Operation, Write};
use serde::Serialize;

use crate::error::FirebaseError;

use super::reference::DocumentReference;
use super::serde::serialize_to_document;

/// The most writes Firestore accepts in a single commit.
pub const MAX_BATCH_WRITES: usize = 500;

#[derive(Debug, Clone)]
pub struct WriteBatch {
    root_resource_path: String,
    writes: Vec<Write>,
    document_references: Vec<DocumentReference>,
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    /// The time at which the batch was applied, in seconds of UTC time since
    /// Unix epoch.
    pub commit_time: Option<i64>,
    /// Number of writes that were applied.
    pub write_count: usize,
}

/// Something that can apply a [`WriteBatch`] atomically.
pub trait DocumentStore {
    /// Opens an empty batch whose document names resolve against this store.
    fn batch(&self) -> WriteBatch;

    /// Applies all writes in `batch` together. On error none of them are
    /// applied.
    fn commit(
        &mut self,
        batch: WriteBatch,
    ) -> impl Future<Output = Result<CommitReceipt, FirebaseError>>;
}

impl WriteBatch {
    pub(crate) fn new(root_resource_path: impl Into<String>) -> Self {
        Self {
            root_resource_path: root_resource_path.into(),
            writes: Vec::new(),
            document_references: Vec::new(),
        }
    }

    /// Stages a write that sets the document at `doc_ref` to `document`,
    /// creating it or overwriting all of its fields.
    ///
    /// # Examples
    ///
    /// ```
    /// # use car_seeder::firestore::{batch::DocumentStore, collection, test_helpers::MemoryStore};
    /// let store = MemoryStore::new();
    /// let mut batch = store.batch();
    ///
    /// batch
    ///     .set(&collection("cars").doc("civic"), &serde_json::json!({ "model": "Honda Civic" }))?
    ///     .set(&collection("cars").new_doc(), &serde_json::json!({ "model": "BMW X5" }))?;
    ///
    /// assert_eq!(batch.len(), 2);
    /// # Ok::<(), car_seeder::error::FirebaseError>(())
    /// ```
    pub fn set<T: ?Sized + Serialize>(
        &mut self,
        doc_ref: &DocumentReference,
        document: &T,
    ) -> Result<&mut Self, FirebaseError> {
        if self.writes.len() >= MAX_BATCH_WRITES {
            return Err(FirebaseError::BatchTooLarge {
                max: MAX_BATCH_WRITES,
            });
        }

        let name = format!("{}/{}", self.root_resource_path, doc_ref);
        let doc = serialize_to_document(document, name)
            .map_err(|e| FirebaseError::serde_in_document(e, doc_ref))?;

        self.writes.push(Write {
            operation: Some(Operation::Update(doc)),
            ..Default::default()
        });
        self.document_references.push(doc_ref.clone());

        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    /// References of the staged documents, in staging order.
    pub fn document_references(&self) -> &[DocumentReference] {
        &self.document_references
    }

    pub(crate) fn root_resource_path(&self) -> &str {
        &self.root_resource_path
    }

    pub(crate) fn into_writes(self) -> Vec<Write> {
        self.writes
    }
}
