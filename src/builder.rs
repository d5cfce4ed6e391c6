//! Certificate document construction.
//!
//! [`CertificateRenderer`] owns the loaded font family and the page geometry and turns a
//! [`CertificateLayout`] into PDF bytes.  It is configured through [`RendererBuilder`] and never
//! mutated afterwards, so one renderer can serve any number of render calls.

use std::cell::{Cell, OnceCell};
use std::path::PathBuf;
use std::rc::Rc;

use chrono::{Local, NaiveDate};
use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style;
use genpdf::{self, Margins, PageDecorator, PaperSize};
use log::debug;

use crate::decoration::certificate_border;
use crate::elements::{self, mm_from_f64, mm_to_f64, FixedTable, Spacer};
use crate::error::RenderError;
use crate::fonts;
use crate::layout::CertificateLayout;
use crate::model::{inches, Block};
use crate::record::{CertificateDetails, CertificateRequest, VolunteerRecord};

/// Media type of the rendered documents.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Page margin applied on every side, in inches.
pub const DEFAULT_MARGIN_IN: f64 = 0.75;

/// Anything that can turn resolved certificate details into a document.
pub trait RenderCertificate {
    /// Renders the certificate described by `details`.
    fn render_details(&self, details: &CertificateDetails) -> Result<Vec<u8>, RenderError>;
}

impl<T: RenderCertificate + ?Sized> RenderCertificate for &T {
    fn render_details(&self, details: &CertificateDetails) -> Result<Vec<u8>, RenderError> {
        (**self).render_details(details)
    }
}

/// Builder for [`CertificateRenderer`] instances.
#[derive(Clone, Debug, Default)]
pub struct RendererBuilder {
    margin_mm: Option<f64>,
    fonts_dir: Option<PathBuf>,
}

impl RendererBuilder {
    /// Creates a new builder with 0.75 in margins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the margin applied on every side, in millimetres.
    pub fn with_margin_mm(mut self, margin_mm: f64) -> Self {
        self.margin_mm = Some(margin_mm);
        self
    }

    /// Searches `fonts_dir` for the font files before the default locations.
    pub fn with_fonts_dir(mut self, fonts_dir: impl Into<PathBuf>) -> Self {
        self.fonts_dir = Some(fonts_dir.into());
        self
    }

    /// Loads the fonts and builds the renderer.
    pub fn build(self) -> Result<CertificateRenderer, RenderError> {
        let font_family =
            fonts::load_font_family(self.fonts_dir.as_deref()).map_err(RenderError::Fonts)?;

        Ok(CertificateRenderer {
            font_family,
            margin_mm: self.margin_mm.unwrap_or_else(|| inches(DEFAULT_MARGIN_IN)),
        })
    }
}

/// Renders single-page A4 certificates.
pub struct CertificateRenderer {
    font_family: FontFamily<FontData>,
    margin_mm: f64,
}

impl CertificateRenderer {
    /// Returns a builder with the default page setup.
    pub fn builder() -> RendererBuilder {
        RendererBuilder::new()
    }

    /// Renders the certificate for `record`, dated today.
    pub fn render(
        &self,
        record: &VolunteerRecord,
        request: &CertificateRequest,
    ) -> Result<Vec<u8>, RenderError> {
        self.render_on(record, request, Local::now().date_naive())
    }

    /// Renders the certificate for `record` as issued on `issued_on`.
    pub fn render_on(
        &self,
        record: &VolunteerRecord,
        request: &CertificateRequest,
        issued_on: NaiveDate,
    ) -> Result<Vec<u8>, RenderError> {
        self.render_details(&CertificateDetails::resolve(record, request, issued_on))
    }

    /// Renders an already built layout.
    pub fn render_layout(&self, layout: &CertificateLayout) -> Result<Vec<u8>, RenderError> {
        let mut document = genpdf::Document::new(self.font_family.clone());
        document.set_paper_size(PaperSize::A4);
        document.set_title(format!("Certificate {}", layout.certificate_id()));

        let pages = Rc::new(Cell::new(0));
        document.set_page_decorator(CertificatePageDecorator::new(
            Margins::all(mm_from_f64(self.margin_mm)),
            Rc::clone(&pages),
        ));

        for block in layout.blocks() {
            match block {
                Block::Paragraph(paragraph) => document.push(elements::paragraph(paragraph)),
                Block::Spacer(height) => document.push(Spacer::new(*height)),
                Block::Table(table) => document.push(FixedTable::new(table.clone())),
            }
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;

        let pages = pages.get();
        if pages != 1 {
            return Err(RenderError::Overflow { pages });
        }

        debug!(
            "Rendered certificate {} ({} bytes)",
            layout.certificate_id(),
            bytes.len()
        );
        Ok(bytes)
    }
}

impl RenderCertificate for CertificateRenderer {
    fn render_details(&self, details: &CertificateDetails) -> Result<Vec<u8>, RenderError> {
        self.render_layout(&CertificateLayout::build(details))
    }
}

/// Defers font loading until the first certificate is rendered.
///
/// Listing, eligibility and statistics never touch the renderer, so a service built on a
/// `LazyRenderer` answers them even where no fonts are installed.  A failed load is not cached;
/// the next render tries again.
pub struct LazyRenderer {
    builder: RendererBuilder,
    renderer: OnceCell<CertificateRenderer>,
}

impl LazyRenderer {
    pub fn new(builder: RendererBuilder) -> Self {
        Self {
            builder,
            renderer: OnceCell::new(),
        }
    }

    /// Whether the fonts have been loaded.
    pub fn is_loaded(&self) -> bool {
        self.renderer.get().is_some()
    }

    fn get(&self) -> Result<&CertificateRenderer, RenderError> {
        if let Some(renderer) = self.renderer.get() {
            return Ok(renderer);
        }
        let renderer = self.builder.clone().build()?;
        Ok(self.renderer.get_or_init(|| renderer))
    }
}

impl RenderCertificate for LazyRenderer {
    fn render_details(&self, details: &CertificateDetails) -> Result<Vec<u8>, RenderError> {
        self.get()?.render_details(details)
    }
}

/// Draws the border decoration on every page, counts pages and applies the margins.
struct CertificatePageDecorator {
    margins: Margins,
    pages: Rc<Cell<usize>>,
}

impl CertificatePageDecorator {
    fn new(margins: Margins, pages: Rc<Cell<usize>>) -> Self {
        Self { margins, pages }
    }
}

impl PageDecorator for CertificatePageDecorator {
    fn decorate_page<'a>(
        &mut self,
        _context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        _style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.pages.set(self.pages.get() + 1);

        let size = area.size();
        for command in certificate_border(mm_to_f64(size.width), mm_to_f64(size.height)) {
            elements::stroke_command(&area, &command);
        }

        area.add_margins(self.margins);
        Ok(area)
    }
}
