//! Enrollment and progress lookups.

use crate::api::ApiClient;
use crate::error::CatalogError;
use async_trait::async_trait;
use learnchat_protocol::{Enrollment, ProgressRecord};
use learnchat_store::AuthSession;
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;

const ENROLLMENTS_PATH: &str = "/enrollments/my";
const PROGRESS_PATH: &str = "/progress";

/// Read access to the current user's enrollments and course progress.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Enrollments of the signed-in user.
    async fn fetch_my_enrollments(&self) -> Result<Vec<Enrollment>, CatalogError>;

    /// Progress of the signed-in user in one course.
    async fn fetch_progress_by_course(&self, course_id: &str)
    -> Result<ProgressRecord, CatalogError>;
}

/// The enrollment endpoint returns a bare array on newer deployments and a
/// wrapped object on older ones.
#[derive(Deserialize)]
#[serde(untagged)]
enum EnrollmentList {
    Bare(Vec<Enrollment>),
    Wrapped { enrollments: Vec<Enrollment> },
}

/// reqwest-backed catalog client authenticated with the stored bearer token.
#[derive(Clone)]
pub struct HttpCatalogClient {
    api: ApiClient,
    session: AuthSession,
}

impl HttpCatalogClient {
    /// Create a client that reads its token from `session` on every call.
    pub fn new(api: ApiClient, session: AuthSession) -> Self {
        Self { api, session }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let mut builder = self
            .api
            .http()
            .get(self.api.url(path))
            .timeout(self.api.request_timeout());
        if let Some(token) = self.session.token()? {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_my_enrollments(&self) -> Result<Vec<Enrollment>, CatalogError> {
        let enrollments = match self.get_json::<EnrollmentList>(ENROLLMENTS_PATH).await? {
            EnrollmentList::Bare(enrollments) => enrollments,
            EnrollmentList::Wrapped { enrollments } => enrollments,
        };
        debug!("fetched enrollments (count={})", enrollments.len());
        Ok(enrollments)
    }

    async fn fetch_progress_by_course(
        &self,
        course_id: &str,
    ) -> Result<ProgressRecord, CatalogError> {
        debug!("fetching course progress (course_id={course_id})");
        self.get_json(&format!("{PROGRESS_PATH}/{course_id}")).await
    }
}
