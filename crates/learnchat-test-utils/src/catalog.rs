use async_trait::async_trait;
use learnchat_client::{CatalogClient, CatalogError};
use learnchat_protocol::{Enrollment, ProgressRecord};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Catalog with fixed enrollments and per-course progress.
///
/// Courses without a configured percentage fail their progress lookup.
#[derive(Clone, Default)]
pub struct StubCatalog {
    enrollments: Vec<Enrollment>,
    progress: HashMap<String, f64>,
    delay: Option<Duration>,
    progress_calls: Arc<Mutex<Vec<String>>>,
    enrollment_calls: Arc<Mutex<usize>>,
}

impl StubCatalog {
    pub fn new(enrollments: Vec<Enrollment>) -> Self {
        Self {
            enrollments,
            ..Self::default()
        }
    }

    pub fn with_progress(mut self, course_id: impl Into<String>, percentage: f64) -> Self {
        self.progress.insert(course_id.into(), percentage);
        self
    }

    /// Delay every enrollment lookup.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Course ids whose progress was requested, in call order.
    pub fn progress_calls(&self) -> Vec<String> {
        self.progress_calls.lock().clone()
    }

    pub fn enrollment_calls(&self) -> usize {
        *self.enrollment_calls.lock()
    }
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn fetch_my_enrollments(&self) -> Result<Vec<Enrollment>, CatalogError> {
        *self.enrollment_calls.lock() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.enrollments.clone())
    }

    async fn fetch_progress_by_course(
        &self,
        course_id: &str,
    ) -> Result<ProgressRecord, CatalogError> {
        self.progress_calls.lock().push(course_id.to_string());
        self.progress
            .get(course_id)
            .map(|pct| ProgressRecord::new(*pct))
            .ok_or_else(|| CatalogError::Other(format!("no progress for {course_id}")))
    }
}

/// Catalog whose every call fails.
#[derive(Clone, Copy, Default)]
pub struct FailingCatalog;

#[async_trait]
impl CatalogClient for FailingCatalog {
    async fn fetch_my_enrollments(&self) -> Result<Vec<Enrollment>, CatalogError> {
        Err(CatalogError::Other("enrollment service down".to_string()))
    }

    async fn fetch_progress_by_course(
        &self,
        _course_id: &str,
    ) -> Result<ProgressRecord, CatalogError> {
        Err(CatalogError::Other("progress service down".to_string()))
    }
}

/// Catalog that panics when asked for enrollments.
#[derive(Clone, Copy, Default)]
pub struct PanickingCatalog;

#[async_trait]
impl CatalogClient for PanickingCatalog {
    async fn fetch_my_enrollments(&self) -> Result<Vec<Enrollment>, CatalogError> {
        panic!("catalog exploded");
    }

    async fn fetch_progress_by_course(
        &self,
        _course_id: &str,
    ) -> Result<ProgressRecord, CatalogError> {
        panic!("catalog exploded");
    }
}
