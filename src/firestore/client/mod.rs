use anyhow::Context;
use firestore_grpc::tonic::{
    codegen::InterceptedService, metadata::MetadataValue, transport::Channel, Request, Status,
};
use firestore_grpc::v1::firestore_client::FirestoreClient as GrpcFirestoreClient;
use firestore_grpc::v1::CommitRequest;

use crate::error::FirebaseError;
use crate::ServiceAccount;

use super::batch::{CommitReceipt, DocumentStore, WriteBatch};
use super::token_provider::FirestoreTokenProvider;

mod options;

pub use options::FirestoreClientOptions;

type InterceptorFunction = Box<dyn FnMut(Request<()>) -> Result<Request<()>, Status> + Send>;

pub struct FirestoreClient {
    client: GrpcFirestoreClient<InterceptedService<Channel, InterceptorFunction>>,
    /// `projects/{project_id}/databases/{database_id}`
    database_path: String,
    /// `{database_path}/documents`
    root_resource_path: String,
}

fn create_auth_interceptor(mut token_provider: FirestoreTokenProvider) -> InterceptorFunction {
    Box::new(move |mut req: Request<()>| {
        let token = token_provider
            .get_token()
            .map_err(|_| Status::unauthenticated("Could not get token from token provider"))?;

        let bearer_token = format!("Bearer {token}");
        let mut header_value = MetadataValue::from_str(bearer_token.as_str()).map_err(|_| {
            Status::unauthenticated("Failed to construct metadata value for authorization token")
        })?;
        header_value.set_sensitive(true);

        req.metadata_mut().insert("authorization", header_value);

        Ok(req)
    })
}

impl FirestoreClient {
    /// Initialise a new client that can be used to write to a Firestore
    /// database.
    ///
    /// A first access token is signed up front, so a service account with an
    /// unusable private key fails here rather than on the first write.
    pub async fn initialise(
        service_account: ServiceAccount,
        options: FirestoreClientOptions,
    ) -> Result<Self, FirebaseError> {
        let mut token_provider = FirestoreTokenProvider::new(service_account);
        token_provider.get_token()?;

        let channel = Channel::from_shared(options.host_url.clone())
            .context("Failed to create gRPC channel")?
            .connect()
            .await?;

        tracing::debug!(host = %options.host_url, "Connected to Firestore");

        Ok(Self::from_channel(channel, token_provider, &options))
    }

    fn from_channel(
        channel: Channel,
        token_provider: FirestoreTokenProvider,
        options: &FirestoreClientOptions,
    ) -> Self {
        let database_path = format!(
            "projects/{}/databases/{}",
            token_provider.project_id(),
            options.database_id
        );
        let root_resource_path = format!("{database_path}/documents");

        let service =
            GrpcFirestoreClient::with_interceptor(channel, create_auth_interceptor(token_provider));

        Self {
            client: service,
            database_path,
            root_resource_path,
        }
    }
}

impl DocumentStore for FirestoreClient {
    fn batch(&self) -> WriteBatch {
        WriteBatch::new(self.root_resource_path.clone())
    }

    /// Sends every staged write in one `Commit` call. Firestore applies them
    /// atomically.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let mut client = car_seeder::firestore::test_helpers::initialise().await?;
    /// use car_seeder::firestore::{batch::DocumentStore, collection};
    ///
    /// let mut batch = client.batch();
    /// batch.set(
    ///     &collection("cars").new_doc(),
    ///     &serde_json::json!({ "model": "Toyota Camry" }),
    /// )?;
    ///
    /// let receipt = client.commit(batch).await?;
    /// assert_eq!(receipt.write_count, 1);
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(name = "Commit write batch", skip_all, fields(writes = batch.len()))]
    async fn commit(&mut self, batch: WriteBatch) -> Result<CommitReceipt, FirebaseError> {
        let write_count = batch.len();
        let request = CommitRequest {
            database: self.database_path.clone(),
            writes: batch.into_writes(),
            ..Default::default()
        };

        let response = self
            .client
            .commit(request)
            .await
            .map_err(FirebaseError::Commit)?
            .into_inner();

        let commit_time = response.commit_time.map(|t| t.seconds);
        tracing::debug!(?commit_time, "Write batch committed");

        Ok(CommitReceipt {
            commit_time,
            write_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firestore::collection;

    #[test]
    fn implements_send() {
        fn assert_send<T: Send>() {}
        assert_send::<FirestoreClient>();
    }

    #[tokio::test]
    async fn batches_resolve_against_project_database() {
        let service_account =
            ServiceAccount::from_json(include_str!("../../../tests/fixtures/service-account.json"))
                .unwrap();
        let channel = Channel::from_static("http://127.0.0.1:8081").connect_lazy();
        let options = FirestoreClientOptions::default().database_id("fleet");

        let client = FirestoreClient::from_channel(
            channel,
            FirestoreTokenProvider::new(service_account),
            &options,
        );

        let mut batch = client.batch();
        batch
            .set(
                &collection("cars").doc("civic"),
                &serde_json::json!({ "model": "Honda Civic" }),
            )
            .unwrap();

        assert_eq!(
            client.database_path,
            "projects/car-rental-test/databases/fleet"
        );
        let Some(firestore_grpc::v1::write::Operation::Update(doc)) = &batch.writes()[0].operation
        else {
            panic!("expected an update write");
        };
        assert_eq!(
            doc.name,
            "projects/car-rental-test/databases/fleet/documents/cars/civic"
        );
    }
}
