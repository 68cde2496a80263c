//! Personalization context sent along with every chat message.

use futures_util::future::join_all;
use learnchat_client::CatalogClient;
use learnchat_protocol::{Enrollment, UserProfile};
use log::{debug, error, warn};
use std::sync::Arc;

/// Context used when nobody is signed in.
pub const GUEST_CONTEXT: &str = "\
User Type: Guest (Not logged in)
Access Level: Limited
Available Actions: Browse courses, view general information
Instruction: Provide general course information. For personalized help, suggest logging in.
";

const NO_PROGRESS_LINE: &str =
    "- No enrollments yet. Encourage user to explore available courses.";
const NO_COURSES_LINE: &str = "- No courses enrolled yet";
const AI_INSTRUCTIONS: &str = "\
Instructions for AI:
- Provide personalized recommendations based on enrolled courses and progress
- If user has high completion rates, suggest advanced courses
- If user has low completion rates, provide motivation and study tips
- Suggest complementary courses based on what they're currently learning
- Be encouraging and supportive of their learning journey
- Answer questions about platform features and course navigation
- Help with course selection and learning path planning
";

/// Builds the natural-language profile of the active user.
#[derive(Clone)]
pub struct ContextBuilder {
    catalog: Arc<dyn CatalogClient>,
    max_progress_courses: usize,
}

impl ContextBuilder {
    /// Create a builder that looks up progress for at most
    /// `max_progress_courses` enrollments.
    pub fn new(catalog: Arc<dyn CatalogClient>, max_progress_courses: usize) -> Self {
        Self {
            catalog,
            max_progress_courses,
        }
    }

    /// Build the context for `user`.
    ///
    /// Guests get [`GUEST_CONTEXT`] without touching the catalog. Lookup
    /// failures degrade individual lines; a failure of the whole composition
    /// degrades to an identity-only context. Never fails.
    pub async fn build(&self, user: Option<&UserProfile>) -> String {
        let Some(user) = user.filter(|user| user.is_authenticated()) else {
            debug!("building guest context");
            return GUEST_CONTEXT.to_string();
        };

        let catalog = self.catalog.clone();
        let limit = self.max_progress_courses;
        let profile = user.clone();
        let task = tokio::spawn(async move { compose(catalog.as_ref(), &profile, limit).await });
        match task.await {
            Ok(context) => context,
            Err(err) => {
                error!("context build failed (user_id={}): {err}", user.id);
                minimal_context(user)
            }
        }
    }
}

async fn compose(catalog: &dyn CatalogClient, user: &UserProfile, limit: usize) -> String {
    let enrollments = match catalog.fetch_my_enrollments().await {
        Ok(enrollments) => enrollments,
        Err(err) => {
            warn!("enrollment fetch failed, continuing without enrollments: {err}");
            Vec::new()
        }
    };
    let progress = join_all(
        enrollments
            .iter()
            .take(limit)
            .map(|enrollment| progress_line(catalog, enrollment)),
    )
    .await;
    debug!(
        "composed user context (user_id={}, enrollments={}, progress_lines={})",
        user.id,
        enrollments.len(),
        progress.len()
    );

    let status = if enrollments.is_empty() {
        "New User - Ready to start learning!"
    } else {
        "Active Learner"
    };
    let progress_section = if progress.is_empty() {
        NO_PROGRESS_LINE.to_string()
    } else {
        progress.join("\n")
    };
    let details_section = if enrollments.is_empty() {
        NO_COURSES_LINE.to_string()
    } else {
        enrollments
            .iter()
            .map(detail_line)
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "User Profile:\n\
         - Name: {name}\n\
         - Email: {email}\n\
         - Role: {role}\n\
         - User ID: {id}\n\
         \n\
         Learning Journey:\n\
         - Total Enrolled Courses: {total}\n\
         - Active Learning Status: {status}\n\
         \n\
         Current Course Progress:\n\
         {progress_section}\n\
         \n\
         Enrolled Courses Details:\n\
         {details_section}\n\
         \n\
         {AI_INSTRUCTIONS}",
        name = user.name,
        email = user.email,
        role = role(user),
        id = user.id,
        total = enrollments.len(),
    )
}

async fn progress_line(catalog: &dyn CatalogClient, enrollment: &Enrollment) -> String {
    let title = enrollment.course_title().unwrap_or("Unknown Course");
    let Some(course_id) = enrollment.course_id() else {
        return format!("- {title}: Progress unavailable");
    };
    match catalog.fetch_progress_by_course(course_id).await {
        Ok(progress) => format!("- {title}: {}% completed", progress.percentage()),
        Err(err) => {
            warn!("progress fetch failed (course_id={course_id}): {err}");
            format!("- {title}: Progress unavailable")
        }
    }
}

fn detail_line(enrollment: &Enrollment) -> String {
    format!(
        "- {} ({})",
        enrollment.course_title().unwrap_or("Unknown"),
        enrollment.category().unwrap_or("General")
    )
}

fn role(user: &UserProfile) -> &str {
    user.role
        .as_deref()
        .filter(|role| !role.is_empty())
        .unwrap_or("Student")
}

/// Identity-only context used when the full one cannot be composed.
pub fn minimal_context(user: &UserProfile) -> String {
    format!(
        "User Profile:\n\
         - Name: {}\n\
         - Email: {}\n\
         - Role: {}\n\
         - Status: Active platform user\n\
         \n\
         Note: Some enrollment/progress data temporarily unavailable.\n\
         Instruction: Provide general learning guidance and encourage exploration.\n",
        user.name,
        user.email,
        role(user)
    )
}
