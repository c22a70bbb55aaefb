pub mod documents;
pub mod notes;
pub mod quizzes;
pub mod rest;
pub mod state;
pub mod study_tools;
pub mod timetable;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the profile and course handlers so the binary can build its router from one place.
pub use rest::{get_course_handler, get_profile_handler, list_courses_handler, ApiDoc};
