use std::env;
use std::path::PathBuf;

pub const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com";

/// How the sender authenticates against FCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FcmCredentials {
    /// Service account key file; access tokens are minted and refreshed from it.
    ServiceAccountKey(PathBuf),
    /// A fixed bearer token. Google tokens expire after about an hour, so this
    /// only suits local runs and tests.
    AccessToken(String),
}

/// Settings for the Firebase Cloud Messaging HTTP v1 API.
#[derive(Debug, Clone)]
pub struct FcmConfig {
    /// Firebase project that owns the device registrations
    pub project_id: String,
    pub credentials: FcmCredentials,
    /// Base URL of the API (overridable for tests and proxies)
    pub endpoint: String,
}

impl FcmConfig {
    pub fn new(project_id: impl Into<String>, credentials: FcmCredentials) -> Self {
        Self {
            project_id: project_id.into(),
            credentials,
            endpoint: DEFAULT_FCM_ENDPOINT.to_string(),
        }
    }

    /// Loads `FCM_PROJECT_ID`, then `FCM_SERVICE_ACCOUNT_KEY` (preferred) or
    /// `FCM_ACCESS_TOKEN`, and optionally `FCM_ENDPOINT`.
    ///
    /// Returns `None` unless a project id and one kind of credential are set, in
    /// which case push delivery is disabled.
    pub fn from_env() -> Option<Self> {
        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());

        let project_id = non_empty("FCM_PROJECT_ID")?;
        let credentials = match non_empty("FCM_SERVICE_ACCOUNT_KEY") {
            Some(path) => FcmCredentials::ServiceAccountKey(PathBuf::from(path)),
            None => FcmCredentials::AccessToken(non_empty("FCM_ACCESS_TOKEN")?),
        };
        let endpoint = non_empty("FCM_ENDPOINT").unwrap_or_else(|| DEFAULT_FCM_ENDPOINT.to_string());

        Some(Self {
            project_id,
            credentials,
            endpoint,
        })
    }

    /// URL of the `messages:send` method for the configured project.
    pub fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoint.trim_end_matches('/'),
            self.project_id
        )
    }
}
