// src/core/course_url.rs
use url::Url;

use crate::error::FlowError;

/// The two fields the extract endpoint wants in place of `course_url`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseTarget {
    /// `scheme://host`, no port, no path.
    pub base_url: String,
    /// Last non-empty path segment, as written in the URL.
    pub course_id: String,
}

/// Split a course URL like `https://canvas.example.edu/courses/12345`.
///
/// Anything that is not an absolute URL with a host and at least one
/// non-empty path segment is rejected.
pub fn derive(course_url: &str) -> Result<CourseTarget, FlowError> {
    let url = Url::parse(course_url.trim()).map_err(|_| FlowError::InvalidCourseUrl)?;

    let host = url.host_str().filter(|h| !h.is_empty()).ok_or(FlowError::InvalidCourseUrl)?;

    let course_id = url
        .path_segments()
        .and_then(|segs| segs.filter(|s| !s.is_empty()).last())
        .ok_or(FlowError::InvalidCourseUrl)?;

    Ok(CourseTarget {
        base_url: join!(url.scheme(), "://", host),
        course_id: s!(course_id),
    })
}
