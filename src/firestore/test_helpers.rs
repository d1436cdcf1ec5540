use std::{
    collections::BTreeMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context;
use firestore_grpc::tonic::{Code, Status};
use firestore_grpc::v1::{value::ValueType, write::Operation, Value};

use crate::{
    error::FirebaseError,
    firestore::{
        batch::{CommitReceipt, DocumentStore, WriteBatch},
        client::{FirestoreClient, FirestoreClientOptions},
    },
    ServiceAccount,
};

const MEMORY_ROOT: &str = "projects/memory/databases/(default)/documents";

/// Connects to the project described by the `FIREBASE_*` environment
/// variables. `FIRESTORE_HOST_URL` overrides the endpoint, e.g. to reach an
/// emulator.
pub async fn initialise() -> Result<FirestoreClient, anyhow::Error> {
    let service_account = ServiceAccount {
        project_id: env::var("FIREBASE_PROJECT_ID")?,
        client_id: env::var("FIREBASE_CLIENT_ID")?,
        client_email: env::var("FIREBASE_CLIENT_EMAIL")?,
        private_key_id: env::var("FIREBASE_PRIVATE_KEY_ID")?,
        private_key: env::var("FIREBASE_PRIVATE_KEY")?.replace(r"\n", "\n"),
    };

    let mut client_options = FirestoreClientOptions::default();
    if let Ok(host_url) = env::var("FIRESTORE_HOST_URL") {
        client_options = client_options.host_url(host_url);
    }

    let client = FirestoreClient::initialise(service_account, client_options).await?;

    Ok(client)
}

/// A [`DocumentStore`] kept in memory. Commits are all-or-nothing, and can be
/// made to fail to simulate a rejected request.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Document path relative to the database root, mapped to its fields.
    documents: BTreeMap<String, serde_json::Value>,
    failure: Option<(Code, String)>,
    commits: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every following commit fails with the given status and leaves the
    /// store untouched.
    pub fn fail_commits_with(mut self, code: Code, message: impl Into<String>) -> Self {
        self.failure = Some((code, message.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of commits that reached the store, including failed ones.
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn get(&self, path: &str) -> Option<&serde_json::Value> {
        self.documents.get(path)
    }

    /// Fields of the documents stored directly in the collection at `path`.
    pub fn documents_in(&self, path: &str) -> Vec<&serde_json::Value> {
        let prefix = format!("{path}/");
        self.documents
            .iter()
            .filter(|(name, _)| {
                name.strip_prefix(&prefix)
                    .is_some_and(|id| !id.contains('/'))
            })
            .map(|(_, fields)| fields)
            .collect()
    }
}

impl DocumentStore for MemoryStore {
    fn batch(&self) -> WriteBatch {
        WriteBatch::new(MEMORY_ROOT)
    }

    async fn commit(&mut self, batch: WriteBatch) -> Result<CommitReceipt, FirebaseError> {
        self.commits += 1;

        if let Some((code, message)) = &self.failure {
            return Err(FirebaseError::Commit(Status::new(*code, message.clone())));
        }

        let commit_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("Failed to get system time")?
            .as_secs();

        let prefix = format!("{}/", batch.root_resource_path());
        let writes = batch.into_writes();
        let write_count = writes.len();

        // Apply to a copy so that a bad write leaves the store unchanged.
        let mut documents = self.documents.clone();
        for write in writes {
            let Some(Operation::Update(doc)) = write.operation else {
                return Err(anyhow::anyhow!("MemoryStore only supports update writes").into());
            };
            let path = doc
                .name
                .strip_prefix(&prefix)
                .ok_or_else(|| anyhow::anyhow!("document {} is outside the database", doc.name))?
                .to_string();
            let fields = doc
                .fields
                .iter()
                .map(|(key, value)| (key.clone(), value_to_json(value)))
                .collect();
            documents.insert(path, serde_json::Value::Object(fields));
        }
        self.documents = documents;

        Ok(CommitReceipt {
            commit_time: i64::try_from(commit_time).ok(),
            write_count,
        })
    }
}

/// Converts a Firestore value into the equivalent JSON. Value types without
/// a JSON counterpart become `null`.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match &value.value_type {
        Some(ValueType::BooleanValue(b)) => Json::Bool(*b),
        Some(ValueType::IntegerValue(i)) => Json::from(*i),
        Some(ValueType::DoubleValue(f)) => {
            serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number)
        }
        Some(ValueType::StringValue(s)) => Json::String(s.clone()),
        Some(ValueType::ArrayValue(array)) => {
            Json::Array(array.values.iter().map(value_to_json).collect())
        }
        Some(ValueType::MapValue(map)) => Json::Object(
            map.fields
                .iter()
                .map(|(key, value)| (key.clone(), value_to_json(value)))
                .collect(),
        ),
        _ => Json::Null,
    }
}
