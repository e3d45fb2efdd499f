//! Client-side form validation
//!
//! Everything here runs before a request is built; a failure never reaches
//! the network layer.

use homepanel_types::{NewJob, Task, Trigger};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::Ipv4Addr;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 4;
pub const MIN_AC_TEMPERATURE: f32 = 16.0;
pub const MAX_AC_TEMPERATURE: f32 = 30.0;

static MAC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$").expect("valid MAC regex"));

/// A field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub type ValidationResult = std::result::Result<(), ValidationError>;

pub fn required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "This field is required"));
    }
    Ok(())
}

pub fn validate_login(username: &str, password: &str) -> ValidationResult {
    required("username", username)?;
    required("password", password)
}

pub fn validate_registration(username: &str, password: &str, confirm: &str) -> ValidationResult {
    validate_login(username, password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    if password != confirm {
        return Err(ValidationError::new("confirm_password", "Passwords do not match"));
    }
    Ok(())
}

/// Device addresses must be dotted-quad IPv4
pub fn validate_ipv4(field: &'static str, value: &str) -> ValidationResult {
    required(field, value)?;
    value
        .trim()
        .parse::<Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| ValidationError::new(field, "Enter a valid IPv4 address"))
}

pub fn validate_mac(field: &'static str, value: &str) -> ValidationResult {
    required(field, value)?;
    if !MAC_RE.is_match(value.trim()) {
        return Err(ValidationError::new(field, "Enter a valid MAC address"));
    }
    Ok(())
}

pub fn validate_temperature(value: f32) -> ValidationResult {
    if !(MIN_AC_TEMPERATURE..=MAX_AC_TEMPERATURE).contains(&value) {
        return Err(ValidationError::new(
            "temperature",
            format!(
                "Temperature must be between {} and {} °C",
                MIN_AC_TEMPERATURE, MAX_AC_TEMPERATURE
            ),
        ));
    }
    Ok(())
}

/// Shape check only; the scheduler owns the real cron semantics
pub fn validate_cron(expression: &str) -> ValidationResult {
    required("cron", expression)?;
    let fields = expression.split_whitespace().count();
    if fields != 5 {
        return Err(ValidationError::new(
            "cron",
            format!("Expected 5 fields (minute hour day month weekday), got {}", fields),
        ));
    }
    Ok(())
}

pub fn validate_new_job(job: &NewJob) -> ValidationResult {
    required("name", &job.name)?;

    match &job.task {
        Task::AcPower { .. } => {}
        Task::AcTemperature { temperature, .. } => validate_temperature(*temperature)?,
        Task::BroadlinkCommand { command, .. } => required("command", command)?,
        Task::HueScene { group_id, .. } => required("group_id", group_id)?,
    }

    match &job.trigger {
        Trigger::Cron { expression } => validate_cron(expression),
        Trigger::Interval { seconds } if *seconds == 0 => Err(ValidationError::new(
            "interval",
            "Interval must be at least one second",
        )),
        Trigger::Interval { .. } | Trigger::Date { .. } => Ok(()),
    }
}
