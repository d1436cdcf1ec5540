#[derive(Clone, Debug)]
pub struct FirestoreClientOptions {
    pub host_url: String,
    pub database_id: String,
}

impl Default for FirestoreClientOptions {
    fn default() -> Self {
        Self {
            host_url: "https://firestore.googleapis.com".to_string(),
            database_id: "(default)".to_string(),
        }
    }
}

impl FirestoreClientOptions {
    /// Points the client at another endpoint, typically a local emulator
    /// such as `http://127.0.0.1:8080`.
    pub fn host_url(mut self, host_url: impl Into<String>) -> Self {
        self.host_url = host_url.into();
        self
    }

    pub fn database_id(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }
}
