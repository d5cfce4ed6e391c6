//! Volunteer records and the certificate data derived from them.
//!
//! [`VolunteerRecord`] mirrors the roster entries the rest of EventIQ stores, [`CertificateRequest`]
//! carries the event-level text printed on every certificate, and [`CertificateDetails`] is the
//! fully resolved view used by the layout: all defaults applied, booth assignments joined and the
//! certificate identifier computed for a given issue date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a volunteer in the roster.
pub type VolunteerId = u32;

/// Role printed when the record does not carry one.
pub const DEFAULT_ROLE: &str = "General Volunteer";
/// Assignment printed when the record carries no booth information.
pub const DEFAULT_BOOTH_ASSIGNMENT: &str = "Multiple Locations";
/// Name printed when the record carries a blank name.
pub const DEFAULT_RECIPIENT_NAME: &str = "Volunteer Name";
/// Default event name.
pub const DEFAULT_EVENT_NAME: &str = "Campus Event 2025";
/// Default issuing organization.
pub const DEFAULT_ORGANIZATION: &str = "EventIQ Organization";
/// Default service period label.
pub const DEFAULT_SERVICE_PERIOD: &str = "Event Duration 2025";
/// Default performance rating.
pub const DEFAULT_PERFORMANCE_RATING: &str = "Excellent";

const CERTIFICATE_ID_PREFIX: &str = "CERT";

/// A booth a volunteer has been assigned to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoothAssignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booth_id: Option<u32>,
    pub booth_name: String,
}

impl BoothAssignment {
    /// Creates an assignment that only carries a display name.
    pub fn named(booth_name: impl Into<String>) -> Self {
        Self {
            booth_id: None,
            booth_name: booth_name.into(),
        }
    }
}

/// One volunteer's service contribution as kept in the roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolunteerRecord {
    pub id: VolunteerId,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "volunteer_role")]
    pub role: Option<String>,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub booth_assignment: Option<String>,
    #[serde(default)]
    pub booth_assignments: Vec<BoothAssignment>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub skills: Vec<String>,
}

fn default_active() -> bool {
    true
}

impl VolunteerRecord {
    /// Creates an active record with the given identity and hours and no optional fields.
    pub fn new(id: VolunteerId, full_name: impl Into<String>, total_hours: f64) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: String::new(),
            role: None,
            total_hours,
            booth_assignment: None,
            booth_assignments: Vec::new(),
            is_active: true,
            skills: Vec::new(),
        }
    }

    /// Sets the role and returns the updated record.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Sets the email and returns the updated record.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the single booth assignment and returns the updated record.
    pub fn with_booth_assignment(mut self, booth: impl Into<String>) -> Self {
        self.booth_assignment = Some(booth.into());
        self
    }

    /// Replaces the booth assignment collection and returns the updated record.
    pub fn with_booth_assignments<I>(mut self, booths: I) -> Self
    where
        I: IntoIterator<Item = BoothAssignment>,
    {
        self.booth_assignments = booths.into_iter().collect();
        self
    }

    /// Sets the active flag and returns the updated record.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Sets the skills and returns the updated record.
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a certificate may be rendered for this volunteer.
    pub fn has_logged_hours(&self) -> bool {
        self.total_hours > 0.0
    }

    /// Eligibility used by bulk generation: logged hours and an active status.
    pub fn is_bulk_eligible(&self) -> bool {
        self.has_logged_hours() && self.is_active
    }

    /// The assignment text shown on the certificate.
    ///
    /// A non-empty assignment collection wins over the single assignment string.
    pub fn assignment_display(&self) -> String {
        if !self.booth_assignments.is_empty() {
            return self
                .booth_assignments
                .iter()
                .map(|booth| booth.booth_name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
        }
        non_blank(self.booth_assignment.as_deref())
            .unwrap_or(DEFAULT_BOOTH_ASSIGNMENT)
            .to_owned()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Event-level text printed on a certificate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateRequest {
    pub event_name: String,
    pub organization: String,
    pub service_period: String,
    pub performance_rating: String,
}

impl Default for CertificateRequest {
    fn default() -> Self {
        Self {
            event_name: DEFAULT_EVENT_NAME.to_owned(),
            organization: DEFAULT_ORGANIZATION.to_owned(),
            service_period: DEFAULT_SERVICE_PERIOD.to_owned(),
            performance_rating: DEFAULT_PERFORMANCE_RATING.to_owned(),
        }
    }
}

impl CertificateRequest {
    /// Creates a request populated with the default texts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the event name and returns the updated request.
    pub fn with_event_name(mut self, event_name: impl Into<String>) -> Self {
        self.event_name = event_name.into();
        self
    }

    /// Sets the issuing organization and returns the updated request.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    /// Sets the service period label and returns the updated request.
    pub fn with_service_period(mut self, service_period: impl Into<String>) -> Self {
        self.service_period = service_period.into();
        self
    }

    /// Sets the performance rating and returns the updated request.
    pub fn with_performance_rating(mut self, rating: impl Into<String>) -> Self {
        self.performance_rating = rating.into();
        self
    }
}

/// Formats the certificate identifier `CERT-<id>-<YYYYMM>`.
pub fn certificate_id(volunteer_id: VolunteerId, issued_on: NaiveDate) -> String {
    format!(
        "{}-{}-{}",
        CERTIFICATE_ID_PREFIX,
        volunteer_id,
        issued_on.format("%Y%m")
    )
}

/// Extracts the volunteer id from an identifier of the form `CERT-<id>-<...>`.
///
/// The trailing part is not validated; only the prefix and the numeric id matter.
pub fn parse_certificate_id(certificate_id: &str) -> Option<VolunteerId> {
    let mut parts = certificate_id.split('-');
    if parts.next()? != CERTIFICATE_ID_PREFIX {
        return None;
    }
    parts.next()?.parse().ok()
}

/// Formats service hours, dropping the fractional part for whole numbers.
pub fn format_hours(hours: f64) -> String {
    format!("{} hours", hours)
}

/// Formats the issue date the way it is printed next to the signature.
pub fn format_issue_date(issued_on: NaiveDate) -> String {
    issued_on.format("%B %d, %Y").to_string()
}

/// The resolved content of one certificate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CertificateDetails {
    pub volunteer_id: VolunteerId,
    pub recipient_name: String,
    pub role: String,
    pub total_hours: f64,
    pub booth_assignment: String,
    pub service_period: String,
    pub performance_rating: String,
    pub event_name: String,
    pub organization: String,
    pub issued_on: NaiveDate,
    pub certificate_id: String,
}

impl CertificateDetails {
    /// Applies defaults and derived fields to `record` for a certificate issued on `issued_on`.
    pub fn resolve(
        record: &VolunteerRecord,
        request: &CertificateRequest,
        issued_on: NaiveDate,
    ) -> Self {
        Self {
            volunteer_id: record.id,
            recipient_name: non_blank(Some(&record.full_name))
                .unwrap_or(DEFAULT_RECIPIENT_NAME)
                .to_owned(),
            role: non_blank(record.role.as_deref())
                .unwrap_or(DEFAULT_ROLE)
                .to_owned(),
            total_hours: record.total_hours,
            booth_assignment: record.assignment_display(),
            service_period: request.service_period.clone(),
            performance_rating: request.performance_rating.clone(),
            event_name: request.event_name.clone(),
            organization: request.organization.clone(),
            issued_on,
            certificate_id: certificate_id(record.id, issued_on),
        }
    }

    /// The hours value as printed in the detail table.
    pub fn hours_display(&self) -> String {
        format_hours(self.total_hours)
    }

    /// The issue date as printed next to the signature.
    pub fn issue_date_display(&self) -> String {
        format_issue_date(self.issued_on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let record = VolunteerRecord::new(4, "Ada Lovelace", 12.0);
        let details = CertificateDetails::resolve(&record, &CertificateRequest::new(), march_2025());

        assert_eq!(details.role, "General Volunteer");
        assert_eq!(details.booth_assignment, "Multiple Locations");
        assert_eq!(details.performance_rating, "Excellent");
        assert_eq!(details.service_period, "Event Duration 2025");
        assert_eq!(details.event_name, "Campus Event 2025");
        assert_eq!(details.organization, "EventIQ Organization");
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let record = VolunteerRecord::new(4, "  ", 3.0)
            .with_role("")
            .with_booth_assignment(" ");
        let details = CertificateDetails::resolve(&record, &CertificateRequest::new(), march_2025());

        assert_eq!(details.recipient_name, "Volunteer Name");
        assert_eq!(details.role, "General Volunteer");
        assert_eq!(details.booth_assignment, "Multiple Locations");
    }

    #[test]
    fn booth_collection_is_joined() {
        let record = VolunteerRecord::new(2, "Grace Hopper", 8.0)
            .with_booth_assignment("Ignored Desk")
            .with_booth_assignments([
                BoothAssignment::named("Booth A"),
                BoothAssignment::named("Booth B"),
            ]);

        assert_eq!(record.assignment_display(), "Booth A, Booth B");
    }

    #[test]
    fn single_assignment_is_kept() {
        let record = VolunteerRecord::new(1, "John Smith", 25.0)
            .with_booth_assignment("Registration Desk");
        assert_eq!(record.assignment_display(), "Registration Desk");
    }

    #[test]
    fn certificate_id_uses_year_and_padded_month() {
        assert_eq!(certificate_id(7, march_2025()), "CERT-7-202503");
    }

    #[test]
    fn certificate_id_parsing() {
        assert_eq!(parse_certificate_id("CERT-7-202503"), Some(7));
        assert_eq!(parse_certificate_id("CERT-12"), Some(12));
        assert_eq!(parse_certificate_id("CERT-12-anything-else"), Some(12));
        assert_eq!(parse_certificate_id("CERT"), None);
        assert_eq!(parse_certificate_id("CERT-x-202503"), None);
        assert_eq!(parse_certificate_id("CRT-7-202503"), None);
        assert_eq!(parse_certificate_id(""), None);
    }

    #[test]
    fn hours_formatting() {
        assert_eq!(format_hours(25.0), "25 hours");
        assert_eq!(format_hours(12.5), "12.5 hours");
        assert_eq!(format_hours(0.0), "0 hours");
    }

    #[test]
    fn issue_date_is_long_form() {
        assert_eq!(format_issue_date(march_2025()), "March 14, 2025");
    }

    #[test]
    fn eligibility_predicates() {
        assert!(!VolunteerRecord::new(1, "Zero", 0.0).has_logged_hours());
        assert!(VolunteerRecord::new(1, "One", 1.0).has_logged_hours());
        assert!(!VolunteerRecord::new(1, "Idle", 10.0)
            .with_active(false)
            .is_bulk_eligible());
    }

    #[test]
    fn records_deserialize_with_legacy_field_names() {
        let record: VolunteerRecord = serde_json::from_str(
            r#"{
                "id": 3,
                "full_name": "Mike Wilson",
                "email": "mike.wilson@example.com",
                "volunteer_role": "Information Desk Volunteer",
                "total_hours": 22,
                "booth_assignment": "Information Booth"
            }"#,
        )
        .expect("record parses");

        assert_eq!(record.role.as_deref(), Some("Information Desk Volunteer"));
        assert_eq!(record.total_hours, 22.0);
        assert!(record.is_active);
        assert!(record.booth_assignments.is_empty());
    }
}
