//! Input validation for request payloads
//!
//! Validators produce typed field-level errors and run before any
//! persistence attempt.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use crate::error::{ApiError, FieldError};
use crate::models::video::{NewVideo, UpdateVideo};

const TITLE_MAX_CHARS: usize = 255;
const PASSWORD_MIN_CHARS: usize = 8;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    })
}

/// Validate a registration payload
pub fn validate_register(email: &str, password: &str) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    if email.is_empty() || email.len() > 254 || !email_regex().is_match(email) {
        errors.push(FieldError::new("email", "Invalid email format"));
    }

    if password.chars().count() < PASSWORD_MIN_CHARS {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters long",
        ));
    }

    finish(errors)
}

/// Validate a video creation payload
pub fn validate_new_video(video: &NewVideo) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    check_title(&video.title, &mut errors);
    check_duration(video.duration, &mut errors);
    check_genre(&video.genre, &mut errors);
    if let Some(thumbnail_url) = &video.thumbnail_url {
        check_url("thumbnailUrl", thumbnail_url, &mut errors);
    }
    if let Some(video_url) = &video.video_url {
        check_url("videoUrl", video_url, &mut errors);
    }

    finish(errors)
}

/// Validate a partial video update; only supplied fields are checked
pub fn validate_update_video(video: &UpdateVideo) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    if let Some(title) = &video.title {
        check_title(title, &mut errors);
    }
    if let Some(duration) = video.duration {
        check_duration(duration, &mut errors);
    }
    if let Some(genre) = &video.genre {
        check_genre(genre, &mut errors);
    }
    if let Some(thumbnail_url) = &video.thumbnail_url {
        check_url("thumbnailUrl", thumbnail_url, &mut errors);
    }
    if let Some(video_url) = &video.video_url {
        check_url("videoUrl", video_url, &mut errors);
    }

    finish(errors)
}

fn check_title(title: &str, errors: &mut Vec<FieldError>) {
    let chars = title.chars().count();
    if chars == 0 {
        errors.push(FieldError::new("title", "Title must not be empty"));
    } else if chars > TITLE_MAX_CHARS {
        errors.push(FieldError::new(
            "title",
            "Title must be at most 255 characters long",
        ));
    }
}

fn check_duration(duration: f64, errors: &mut Vec<FieldError>) {
    if !duration.is_finite() || duration <= 0.0 {
        errors.push(FieldError::new("duration", "Duration must be positive"));
    }
}

fn check_genre(genre: &str, errors: &mut Vec<FieldError>) {
    if genre.is_empty() {
        errors.push(FieldError::new("genre", "Genre must not be empty"));
    }
}

fn check_url(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if Url::parse(value).is_err() {
        errors.push(FieldError::new(field, "Must be a valid URL"));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_video() -> NewVideo {
        NewVideo {
            title: "Intro to Rust".to_string(),
            description: Some("Getting started".to_string()),
            duration: 360.0,
            genre: "Tutorial".to_string(),
            tags: vec!["rust".to_string()],
            thumbnail_url: Some("https://example.com/thumb.jpg".to_string()),
            video_url: None,
        }
    }

    fn fields(err: ApiError) -> Vec<String> {
        match err {
            ApiError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_register_valid() {
        assert!(validate_register("a@x.com", "password123").is_ok());
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let err = validate_register("not-an-email", "password123").unwrap_err();
        assert_eq!(fields(err), vec!["email"]);
    }

    #[test]
    fn test_register_rejects_short_password() {
        let err = validate_register("a@x.com", "short").unwrap_err();
        assert_eq!(fields(err), vec!["password"]);
    }

    #[test]
    fn test_register_collects_all_errors() {
        let err = validate_register("", "pw").unwrap_err();
        assert_eq!(fields(err), vec!["email", "password"]);
    }

    #[test]
    fn test_new_video_valid() {
        assert!(validate_new_video(&new_video()).is_ok());
    }

    #[test]
    fn test_new_video_rejects_empty_title() {
        let mut video = new_video();
        video.title = String::new();
        assert_eq!(fields(validate_new_video(&video).unwrap_err()), vec!["title"]);
    }

    #[test]
    fn test_new_video_rejects_long_title() {
        let mut video = new_video();
        video.title = "x".repeat(256);
        assert_eq!(fields(validate_new_video(&video).unwrap_err()), vec!["title"]);
    }

    #[test]
    fn test_new_video_rejects_nonpositive_duration() {
        for duration in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut video = new_video();
            video.duration = duration;
            assert_eq!(
                fields(validate_new_video(&video).unwrap_err()),
                vec!["duration"]
            );
        }
    }

    #[test]
    fn test_new_video_rejects_bad_url() {
        let mut video = new_video();
        video.thumbnail_url = Some("not a url".to_string());
        assert_eq!(
            fields(validate_new_video(&video).unwrap_err()),
            vec!["thumbnailUrl"]
        );
    }

    #[test]
    fn test_update_checks_supplied_fields_only() {
        let update = UpdateVideo {
            genre: Some(String::new()),
            ..UpdateVideo::default()
        };
        assert_eq!(
            fields(validate_update_video(&update).unwrap_err()),
            vec!["genre"]
        );
    }

    #[test]
    fn test_empty_update_is_valid() {
        assert!(validate_update_video(&UpdateVideo::default()).is_ok());
    }
}
