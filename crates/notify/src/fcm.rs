//! Firebase Cloud Messaging client.
//!
//! Sends one notification per call to a single device registration token through the
//! FCM HTTP v1 API. Failures are returned as [`SendOutcome::Failed`] and logged; they
//! never reach the booking operation that triggered the push.
//!
//! With a service account key, the bearer token is requested per send from a
//! `yup-oauth2` authenticator, which caches it and refreshes it before it expires.

use async_trait::async_trait;
use pairslot_core::notify::{NotificationSender, PushMessage, SendOutcome};
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::{ServiceAccountAuthenticator, read_service_account_key};

use crate::config::{FcmConfig, FcmCredentials};

/// OAuth2 scope required by the `messages:send` method.
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

#[derive(Error, Debug)]
pub enum FcmError {
    /// The HTTP request itself failed
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// FCM answered with a non-success status
    #[error("FCM API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The service account key could not be loaded
    #[error("Failed to load service account key {path}: {source}")]
    Credentials {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Google refused to issue an access token
    #[error("OAuth2 token error: {0}")]
    Token(#[from] yup_oauth2::Error),

    #[error("OAuth2 response carried no access token")]
    MissingToken,
}

enum TokenSource {
    Static(String),
    ServiceAccount(DefaultAuthenticator),
}

impl TokenSource {
    async fn from_credentials(credentials: &FcmCredentials) -> Result<Self, FcmError> {
        match credentials {
            FcmCredentials::AccessToken(token) => Ok(TokenSource::Static(token.clone())),
            FcmCredentials::ServiceAccountKey(path) => {
                let key_error = |source| FcmError::Credentials {
                    path: path.display().to_string(),
                    source,
                };
                let key = read_service_account_key(path)
                    .await
                    .map_err(key_error)?;
                let authenticator = ServiceAccountAuthenticator::builder(key)
                    .build()
                    .await
                    .map_err(key_error)?;

                Ok(TokenSource::ServiceAccount(authenticator))
            }
        }
    }

    async fn access_token(&self) -> Result<String, FcmError> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::ServiceAccount(authenticator) => {
                let token = authenticator.token(&[FCM_SCOPE]).await?;
                token
                    .token()
                    .map(str::to_string)
                    .ok_or(FcmError::MissingToken)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    notification: FcmNotification<'a>,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    /// `projects/{project_id}/messages/{message_id}`
    name: String,
}

pub struct FcmSender {
    client: Client,
    send_url: String,
    tokens: TokenSource,
}

impl FcmSender {
    /// Loads the credentials once; a service account key is read and its
    /// authenticator built here.
    pub async fn connect(config: FcmConfig) -> Result<Self, FcmError> {
        let tokens = TokenSource::from_credentials(&config.credentials).await?;

        Ok(Self {
            client: Client::new(),
            send_url: config.send_url(),
            tokens,
        })
    }

    /// Posts the message and returns the id FCM assigned to it.
    pub async fn send_message(
        &self,
        device_token: &str,
        message: &PushMessage,
    ) -> Result<String, FcmError> {
        let payload = FcmRequest {
            message: FcmMessage {
                token: device_token,
                notification: FcmNotification {
                    title: &message.title,
                    body: &message.body,
                },
            },
        };

        let access_token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(&self.send_url)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FcmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let sent: FcmResponse = response.json().await?;
        Ok(sent.name)
    }
}

#[async_trait]
impl NotificationSender for FcmSender {
    async fn send(&self, device_token: &str, message: &PushMessage) -> SendOutcome {
        match self.send_message(device_token, message).await {
            Ok(name) => {
                debug!("FCM accepted '{}' as {}", message.title, name);
                SendOutcome::Delivered(name)
            }
            Err(e) => {
                warn!("FCM delivery of '{}' failed: {}", message.title, e);
                SendOutcome::Failed(Box::new(e))
            }
        }
    }
}
