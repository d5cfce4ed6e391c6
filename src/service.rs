//! The calling layer around the renderer.
//!
//! [`CertificateService`] resolves volunteer and certificate ids through a
//! [`VolunteerRepository`], applies the eligibility rules, and hands resolved
//! [`CertificateDetails`] to a [`RenderCertificate`] implementation.  Lookup and eligibility
//! failures are reported before the renderer is ever invoked.

use chrono::{Local, NaiveDate};
use log::{debug, info};
use serde::Serialize;

use crate::builder::{RenderCertificate, PDF_MEDIA_TYPE};
use crate::error::CertificateError;
use crate::record::{
    certificate_id, parse_certificate_id, CertificateDetails, CertificateRequest, VolunteerId,
    VolunteerRecord,
};
use crate::repository::VolunteerRepository;

/// Hours a volunteer needs for the "minimum hours" requirement shown in eligibility reports.
pub const MINIMUM_HOURS: f64 = 5.0;

/// Source of the issue date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Reads the local system date.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// A rendered document ready to be handed to a client.
#[derive(Clone, Debug)]
pub struct RenderedCertificate {
    pub certificate_id: String,
    pub volunteer_id: VolunteerId,
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// One entry of the certificate registry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CertificateSummary {
    pub certificate_id: String,
    pub volunteer_id: VolunteerId,
    pub volunteer_name: String,
    pub volunteer_role: Option<String>,
    pub total_hours: f64,
    pub eligible: bool,
    pub generated_on: NaiveDate,
}

/// Requirement checks shown alongside a volunteer's eligibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Requirements {
    pub minimum_hours: bool,
    pub active_status: bool,
}

/// Certificate eligibility of a single volunteer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EligibilityInfo {
    pub volunteer_id: VolunteerId,
    pub volunteer_name: String,
    pub volunteer_role: Option<String>,
    pub total_hours: f64,
    pub booth_assignment: String,
    pub eligible_for_certificate: bool,
    pub certificate_id: Option<String>,
    pub requirements_met: Requirements,
}

/// Whether bulk generation renders documents or only reports who qualifies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BulkMode {
    #[default]
    StatsOnly,
    Render,
}

/// A volunteer that qualified for bulk generation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BulkEntry {
    pub volunteer_id: VolunteerId,
    pub volunteer_name: String,
    pub total_hours: f64,
    pub certificate_id: String,
}

/// Outcome of a bulk run.
#[derive(Clone, Debug, Serialize)]
pub struct BulkReport {
    pub message: String,
    pub eligible_volunteers: Vec<BulkEntry>,
    pub generated_on: NaiveDate,
    #[serde(skip)]
    pub documents: Vec<RenderedCertificate>,
}

/// Aggregate figures over the whole roster.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CertificateStats {
    pub total_volunteers: usize,
    pub eligible_for_certificates: usize,
    pub certificates_generated: usize,
    pub total_volunteer_hours: f64,
    pub average_hours_per_volunteer: f64,
    pub certificate_types: Vec<String>,
    pub last_updated: NaiveDate,
}

/// Suggested download name for a volunteer's certificate, e.g. `John_Smith_Certificate.pdf`.
pub fn certificate_file_name(full_name: &str) -> String {
    let stem: String = full_name
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                Some(c)
            } else {
                None
            }
        })
        .collect();
    if stem.is_empty() {
        "Certificate.pdf".to_owned()
    } else {
        format!("{}_Certificate.pdf", stem)
    }
}

/// Certificate operations over a volunteer repository.
pub struct CertificateService<R, G, C = SystemClock> {
    repository: R,
    renderer: G,
    clock: C,
    request: CertificateRequest,
}

impl<R, G> CertificateService<R, G, SystemClock>
where
    R: VolunteerRepository,
    G: RenderCertificate,
{
    /// Creates a service using the system clock and the default request texts.
    pub fn new(repository: R, renderer: G) -> Self {
        Self {
            repository,
            renderer,
            clock: SystemClock,
            request: CertificateRequest::default(),
        }
    }
}

impl<R, G, C> CertificateService<R, G, C>
where
    R: VolunteerRepository,
    G: RenderCertificate,
    C: Clock,
{
    /// Replaces the clock and returns the updated service.
    pub fn with_clock<K: Clock>(self, clock: K) -> CertificateService<R, G, K> {
        CertificateService {
            repository: self.repository,
            renderer: self.renderer,
            clock,
            request: self.request,
        }
    }

    /// Sets the request texts used when a call does not supply its own.
    pub fn with_request(mut self, request: CertificateRequest) -> Self {
        self.request = request;
        self
    }

    /// Registry of every volunteer with logged hours.
    pub fn certificates(&self) -> Vec<CertificateSummary> {
        let today = self.clock.today();
        self.repository
            .list()
            .into_iter()
            .filter(VolunteerRecord::has_logged_hours)
            .map(|record| CertificateSummary {
                certificate_id: certificate_id(record.id, today),
                volunteer_id: record.id,
                volunteer_name: record.full_name,
                volunteer_role: record.role,
                total_hours: record.total_hours,
                eligible: true,
                generated_on: today,
            })
            .collect()
    }

    /// Eligibility view for one volunteer.
    pub fn volunteer_info(&self, id: VolunteerId) -> Result<EligibilityInfo, CertificateError> {
        let record = self.lookup(id)?;
        let eligible = record.has_logged_hours();
        let booth_assignment = record.assignment_display();

        Ok(EligibilityInfo {
            volunteer_id: record.id,
            certificate_id: eligible.then(|| certificate_id(record.id, self.clock.today())),
            requirements_met: Requirements {
                minimum_hours: record.total_hours >= MINIMUM_HOURS,
                active_status: record.is_active,
            },
            eligible_for_certificate: eligible,
            volunteer_name: record.full_name,
            volunteer_role: record.role,
            total_hours: record.total_hours,
            booth_assignment,
        })
    }

    /// Renders the certificate of volunteer `id` with the service's request texts.
    pub fn generate(&self, id: VolunteerId) -> Result<RenderedCertificate, CertificateError> {
        self.generate_with(id, &self.request)
    }

    /// Renders the certificate of volunteer `id` with `request`.
    pub fn generate_with(
        &self,
        id: VolunteerId,
        request: &CertificateRequest,
    ) -> Result<RenderedCertificate, CertificateError> {
        let record = self.lookup(id)?;
        let certificate = self.render_record(&record, request)?;
        Ok(RenderedCertificate {
            file_name: certificate_file_name(&record.full_name),
            ..certificate
        })
    }

    /// Renders the certificate named by an identifier of the form `CERT-<id>-<...>`.
    ///
    /// Malformed identifiers and unknown volunteers are both reported as not found.
    pub fn download(&self, certificate_id: &str) -> Result<RenderedCertificate, CertificateError> {
        let not_found = || CertificateError::CertificateNotFound(certificate_id.to_owned());
        let id = parse_certificate_id(certificate_id).ok_or_else(not_found)?;
        let record = self.repository.get(id).ok_or_else(not_found)?;

        let certificate = self.render_record(&record, &self.request)?;
        Ok(RenderedCertificate {
            file_name: format!("{}.pdf", certificate_id),
            ..certificate
        })
    }

    /// Collects every active volunteer with logged hours and, in [`BulkMode::Render`], renders
    /// one certificate for each of them.
    pub fn bulk_generate(&self, mode: BulkMode) -> Result<BulkReport, CertificateError> {
        let today = self.clock.today();
        let eligible: Vec<VolunteerRecord> = self
            .repository
            .list()
            .into_iter()
            .filter(VolunteerRecord::is_bulk_eligible)
            .collect();

        let mut documents = Vec::new();
        if mode == BulkMode::Render {
            for record in &eligible {
                let certificate = self.render_record(record, &self.request)?;
                documents.push(RenderedCertificate {
                    file_name: certificate_file_name(&record.full_name),
                    ..certificate
                });
            }
        }

        let message = match mode {
            BulkMode::StatsOnly => format!(
                "Bulk certificate generation initiated for {} volunteers",
                eligible.len()
            ),
            BulkMode::Render => format!("Generated {} certificates", documents.len()),
        };
        info!("{}", message);

        Ok(BulkReport {
            message,
            eligible_volunteers: eligible
                .into_iter()
                .map(|record| BulkEntry {
                    certificate_id: certificate_id(record.id, today),
                    volunteer_id: record.id,
                    volunteer_name: record.full_name,
                    total_hours: record.total_hours,
                })
                .collect(),
            generated_on: today,
            documents,
        })
    }

    /// Aggregate figures over the roster.
    pub fn stats(&self) -> CertificateStats {
        let records = self.repository.list();
        let total_volunteers = records.len();
        let eligible = records.iter().filter(|r| r.has_logged_hours()).count();
        let total_hours: f64 = records.iter().map(|r| r.total_hours).sum();
        let average = if total_volunteers > 0 {
            total_hours / total_volunteers as f64
        } else {
            0.0
        };

        CertificateStats {
            total_volunteers,
            eligible_for_certificates: eligible,
            certificates_generated: eligible,
            total_volunteer_hours: total_hours,
            average_hours_per_volunteer: average,
            certificate_types: vec!["Volunteer Service Certificate".to_owned()],
            last_updated: self.clock.today(),
        }
    }

    fn lookup(&self, id: VolunteerId) -> Result<VolunteerRecord, CertificateError> {
        self.repository
            .get(id)
            .ok_or(CertificateError::VolunteerNotFound(id))
    }

    fn render_record(
        &self,
        record: &VolunteerRecord,
        request: &CertificateRequest,
    ) -> Result<RenderedCertificate, CertificateError> {
        if !record.has_logged_hours() {
            debug!("Refusing certificate for volunteer {} without hours", record.id);
            return Err(CertificateError::Ineligible {
                id: record.id,
                reason: "volunteer must have logged hours to receive a certificate".to_owned(),
            });
        }

        let details = CertificateDetails::resolve(record, request, self.clock.today());
        let bytes = self.renderer.render_details(&details)?;

        Ok(RenderedCertificate {
            certificate_id: details.certificate_id,
            volunteer_id: record.id,
            file_name: String::new(),
            media_type: PDF_MEDIA_TYPE,
            bytes,
        })
    }
}
