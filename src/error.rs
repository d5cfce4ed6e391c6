//! Error types for rendering and for the certificate service.

use thiserror::Error;

use crate::record::VolunteerId;

/// Failure to produce a certificate document.
///
/// No partial document is returned when any of these occur.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No usable font family could be loaded.
    #[error("certificate fonts unavailable")]
    Fonts(#[source] genpdf::error::Error),

    /// `genpdf` failed while laying out or writing the document.
    #[error("failed to assemble certificate document")]
    Document(#[from] genpdf::error::Error),

    /// The content did not fit on a single page.
    #[error("certificate content spilled onto {pages} pages")]
    Overflow { pages: usize },
}

/// Errors surfaced by [`crate::service::CertificateService`].
#[derive(Error, Debug)]
pub enum CertificateError {
    /// The requested volunteer id does not resolve to a record.
    #[error("volunteer {0} not found")]
    VolunteerNotFound(VolunteerId),

    /// The certificate id is malformed or names an unknown volunteer.
    #[error("certificate {0} not found")]
    CertificateNotFound(String),

    /// The volunteer exists but fails the eligibility predicate.
    #[error("volunteer {id} is not eligible for a certificate: {reason}")]
    Ineligible { id: VolunteerId, reason: String },

    /// Rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl CertificateError {
    /// Whether the error means "nothing to show" rather than a bad request or a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CertificateError::VolunteerNotFound(_) | CertificateError::CertificateNotFound(_)
        )
    }
}

/// Failure to load a volunteer roster.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid roster JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;

    use super::*;

    fn missing_fonts() -> genpdf::error::Error {
        genpdf::error::Error::new(
            "no Roboto files in /srv/fonts",
            io::Error::new(io::ErrorKind::NotFound, "fonts not found"),
        )
    }

    #[test]
    fn font_failure_names_its_cause_once() {
        let err = CertificateError::from(RenderError::Fonts(missing_fonts()));

        assert_eq!(err.to_string(), "certificate fonts unavailable");
        let cause = err.source().expect("font error is the source");
        assert!(cause.to_string().contains("/srv/fonts"));
    }

    #[test]
    fn document_failure_keeps_the_cause_out_of_the_message() {
        let err = RenderError::from(missing_fonts());

        assert!(matches!(err, RenderError::Document(_)));
        assert!(!err.to_string().contains("/srv/fonts"));
        assert!(err.source().is_some());
    }
}
