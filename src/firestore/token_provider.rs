use anyhow::Context;
use jsonwebtoken::{get_current_timestamp, Algorithm, EncodingKey, Header};
use serde::Serialize;

use crate::{error::FirebaseError, ServiceAccount};

/// The token is accepted by Firestore for an hour.
const TOKEN_LIFETIME_SECS: u64 = 60 * 60;
/// Tokens are replaced this long before they actually expire.
const EXPIRY_BUFFER_SECS: u64 = 5 * 60;

/// Signs self-issued JWT bearer tokens for Firestore with the service
/// account's private key and reuses them until shortly before they expire.
#[derive(Clone)]
pub struct FirestoreTokenProvider {
    service_account: ServiceAccount,
    current_token: Option<Token>,
}

#[derive(Clone)]
struct Token {
    jwt: String,
    /// Seconds since the UNIX epoch after which a fresh token is signed.
    refresh_at: u64,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
    uid: &'a str,
}

impl FirestoreTokenProvider {
    pub fn new(service_account: ServiceAccount) -> Self {
        Self {
            service_account,
            current_token: None,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.service_account.project_id
    }

    pub fn get_token(&mut self) -> Result<String, FirebaseError> {
        if let Some(token) = &self.current_token {
            if token.refresh_at > get_current_timestamp() {
                return Ok(token.jwt.clone());
            }
        }

        tracing::debug!(
            client_email = %self.service_account.client_email,
            "Signing new Firestore access token"
        );

        let token = sign_token(&self.service_account).map_err(FirebaseError::Token)?;
        let jwt = token.jwt.clone();
        self.current_token = Some(token);
        Ok(jwt)
    }
}

fn sign_token(service_account: &ServiceAccount) -> Result<Token, anyhow::Error> {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(service_account.private_key_id.clone());

    let issued_at = get_current_timestamp();
    let claims = JwtClaims {
        iss: &service_account.client_email,
        sub: &service_account.client_email,
        aud: "https://firestore.googleapis.com/",
        iat: issued_at,
        exp: issued_at + TOKEN_LIFETIME_SECS,
        uid: &service_account.client_id,
    };

    let encoding_key = EncodingKey::from_rsa_pem(service_account.private_key.as_bytes())
        .context("Failed to create JWT encoding key from the service account private key")?;

    let jwt = jsonwebtoken::encode(&header, &claims, &encoding_key).context("Failed to sign JWT")?;

    Ok(Token {
        jwt,
        refresh_at: claims.exp - EXPIRY_BUFFER_SECS,
    })
}
