// src/core/mod.rs

pub mod course_url;
pub mod net;
pub mod sanitize;

pub use course_url::CourseTarget;
pub use net::{HttpResponse, HttpTransport, Transport};
