use firestore_grpc::tonic;

use crate::firestore::reference::DocumentReference;

#[derive(thiserror::Error)]
pub enum FirebaseError {
    #[error("invalid service account: {0:#}")]
    ServiceAccount(anyhow::Error),

    #[error("failed to sign access token: {0:#}")]
    Token(anyhow::Error),

    #[error(
        "serde: {source}{}",
        document.as_ref().map(|d| format!(" in document '{d}'")).unwrap_or_default())
    ]
    FirestoreSerdeError {
        source: crate::firestore::serde::Error,
        document: Option<String>,
    },

    #[error("a write batch holds at most {max} writes")]
    BatchTooLarge { max: usize },

    #[error("commit rejected ({:?}): {}", .0.code(), .0.message())]
    Commit(#[source] tonic::Status),

    #[error("grpc: {0}")]
    GrpcError(#[from] tonic::transport::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FirebaseError {
    pub(crate) fn serde_in_document(
        err: crate::firestore::serde::Error,
        doc_ref: &DocumentReference,
    ) -> Self {
        FirebaseError::FirestoreSerdeError {
            source: err,
            document: Some(doc_ref.to_string()),
        }
    }
}

impl From<crate::firestore::serde::Error> for FirebaseError {
    fn from(e: crate::firestore::serde::Error) -> Self {
        FirebaseError::FirestoreSerdeError {
            source: e,
            document: None,
        }
    }
}

impl std::fmt::Debug for FirebaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

// Taken from https://www.lpalmieri.com/posts/error-handling-rust/#internal-errors
fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
