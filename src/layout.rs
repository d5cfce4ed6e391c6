//! The certificate page layout.
//!
//! [`CertificateLayout::build`] turns resolved [`CertificateDetails`] into the ordered list of
//! [`Block`]s printed inside the page margins: the title block, the recipient block, the detail
//! table, the recognition paragraph, the signature table and the identifier footer.

use genpdf::style::Color;

use crate::model::{
    inches, points, Block, HorizontalAlignment, RichParagraph, TableBlock, TableColumn,
};
use crate::record::CertificateDetails;
use crate::richtext::Span;

/// Heading printed at the top of every certificate.
pub const TITLE: &str = "Certificate of Appreciation";

/// Sentence printed below the detail table.
pub const RECOGNITION: &str = "We recognize your valuable contribution and commitment to making \
     this event successful. Your efforts have made a significant impact on our community.";

// Detail table labels, in row order.
pub const ROLE_LABEL: &str = "Volunteer Role:";
pub const HOURS_LABEL: &str = "Total Hours Served:";
pub const BOOTH_LABEL: &str = "Booth Assignment:";
pub const SERVICE_PERIOD_LABEL: &str = "Service Period:";
pub const RATING_LABEL: &str = "Performance Rating:";

/// Accent used for the title and the recipient name.
pub const TITLE_COLOR: Color = Color::Rgb(0, 0, 255);
/// Muted tone of the identifier footer.
pub const FOOTER_COLOR: Color = Color::Rgb(128, 128, 128);
/// Background of the shaded detail rows.
pub const ROW_SHADING: Color = Color::Rgb(242, 242, 242);

const TITLE_SIZE: u8 = 28;
const SUBTITLE_SIZE: u8 = 18;
const NAME_SIZE: u8 = 24;
const BODY_SIZE: u8 = 12;
const DETAIL_SIZE: u8 = 11;
const SIGNATURE_SIZE: u8 = 10;
const FOOTER_SIZE: u8 = 8;

/// The full content of one certificate page.
#[derive(Clone, Debug, PartialEq)]
pub struct CertificateLayout {
    blocks: Vec<Block>,
    certificate_id: String,
}

impl CertificateLayout {
    /// Lays out the certificate for `details`.
    pub fn build(details: &CertificateDetails) -> Self {
        let mut blocks = Vec::new();

        blocks.push(Block::spacer(inches(0.5)));
        blocks.push(centered(
            vec![Span::new(TITLE).bold().colored(TITLE_COLOR)],
            TITLE_SIZE,
        ));
        blocks.push(Block::spacer(points(30.0)));
        blocks.push(centered(
            vec![Span::new(details.organization.as_str()).italic()],
            SUBTITLE_SIZE,
        ));
        blocks.push(Block::spacer(points(20.0)));
        blocks.push(Block::spacer(inches(0.3)));

        blocks.push(centered(vec![Span::new("This is to certify that")], BODY_SIZE));
        blocks.push(Block::spacer(points(15.0)));
        blocks.push(centered(
            vec![Span::new(details.recipient_name.as_str())
                .bold()
                .colored(TITLE_COLOR)],
            NAME_SIZE,
        ));
        blocks.push(Block::spacer(points(20.0)));
        blocks.push(centered(
            vec![
                Span::new("has successfully completed volunteer service for "),
                Span::new(details.event_name.as_str()).bold(),
                Span::new(" with dedication and excellence."),
            ],
            BODY_SIZE,
        ));
        blocks.push(Block::spacer(points(15.0)));

        blocks.push(Block::spacer(inches(0.3)));
        blocks.push(Block::Table(detail_table(details)));
        blocks.push(Block::spacer(inches(0.4)));

        blocks.push(centered(vec![Span::new(RECOGNITION)], BODY_SIZE));
        blocks.push(Block::spacer(points(15.0)));

        blocks.push(Block::spacer(inches(0.5)));
        blocks.push(Block::Table(signature_table(details)));

        blocks.push(Block::spacer(inches(0.3)));
        blocks.push(centered(
            vec![Span::new(format!("Certificate ID: {}", details.certificate_id))
                .colored(FOOTER_COLOR)],
            FOOTER_SIZE,
        ));

        Self {
            blocks,
            certificate_id: details.certificate_id.clone(),
        }
    }

    /// Returns the blocks in page order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the certificate identifier printed in the footer.
    pub fn certificate_id(&self) -> &str {
        &self.certificate_id
    }

    /// Returns the detail table.
    pub fn details(&self) -> Option<&TableBlock> {
        self.tables().next()
    }

    /// Returns the signature table.
    pub fn signature(&self) -> Option<&TableBlock> {
        self.tables().nth(1)
    }

    /// Returns the plain text of every paragraph, in page order.
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(paragraph) => Some(paragraph.text()),
                _ => None,
            })
            .collect()
    }

    fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }
}

fn centered(spans: Vec<Span>, font_size: u8) -> Block {
    Block::Paragraph(
        RichParagraph::new(spans)
            .with_alignment(HorizontalAlignment::Center)
            .with_font_size(font_size),
    )
}

fn detail_table(details: &CertificateDetails) -> TableBlock {
    TableBlock::new(vec![
        TableColumn::new(inches(2.5)).bold(),
        TableColumn::new(inches(3.0)),
    ])
    .with_font_size(DETAIL_SIZE)
    .with_padding_mm(points(8.0), points(8.0))
    .with_shading(ROW_SHADING)
    .with_row([ROLE_LABEL, details.role.as_str()])
    .with_row([HOURS_LABEL.to_owned(), details.hours_display()])
    .with_row([BOOTH_LABEL, details.booth_assignment.as_str()])
    .with_row([SERVICE_PERIOD_LABEL, details.service_period.as_str()])
    .with_row([RATING_LABEL, details.performance_rating.as_str()])
}

fn signature_table(details: &CertificateDetails) -> TableBlock {
    TableBlock::new(vec![
        TableColumn::new(inches(2.0)),
        TableColumn::new(inches(1.0)),
        TableColumn::new(inches(2.0)).with_alignment(HorizontalAlignment::Right),
    ])
    .with_font_size(SIGNATURE_SIZE)
    .with_padding_mm(points(5.0), 0.0)
    .with_row([
        format!("Date: {}", details.issue_date_display()),
        String::new(),
        "Authorized Signature".to_owned(),
    ])
    .with_row([String::new(), String::new(), "Event Organizer".to_owned()])
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::record::{BoothAssignment, CertificateRequest, VolunteerRecord};

    fn layout_for(record: &VolunteerRecord) -> CertificateLayout {
        let issued_on = NaiveDate::from_ymd_opt(2025, 3, 5).expect("valid date");
        let details = CertificateDetails::resolve(record, &CertificateRequest::new(), issued_on);
        CertificateLayout::build(&details)
    }

    #[test]
    fn detail_table_lists_five_labelled_rows() {
        let record = VolunteerRecord::new(1, "John Smith", 25.0)
            .with_role("Registration Coordinator")
            .with_booth_assignment("Registration Desk");
        let layout = layout_for(&record);
        let table = layout.details().expect("detail table present");

        let labels: Vec<_> = table.rows().iter().map(|row| row[0].as_str()).collect();
        assert_eq!(
            labels,
            [ROLE_LABEL, HOURS_LABEL, BOOTH_LABEL, SERVICE_PERIOD_LABEL, RATING_LABEL]
        );
        assert_eq!(table.value_for(ROLE_LABEL), Some("Registration Coordinator"));
        assert_eq!(table.value_for(HOURS_LABEL), Some("25 hours"));
        assert_eq!(table.value_for(BOOTH_LABEL), Some("Registration Desk"));
        assert!(table.columns()[0].is_bold());
        assert!(!table.columns()[1].is_bold());
    }

    #[test]
    fn defaults_reach_the_detail_table() {
        let layout = layout_for(&VolunteerRecord::new(9, "Ada Lovelace", 4.0));
        let table = layout.details().expect("detail table present");

        assert_eq!(table.value_for(ROLE_LABEL), Some("General Volunteer"));
        assert_eq!(table.value_for(BOOTH_LABEL), Some("Multiple Locations"));
        assert_eq!(table.value_for(RATING_LABEL), Some("Excellent"));
    }

    #[test]
    fn joined_assignments_reach_the_detail_table() {
        let record = VolunteerRecord::new(2, "Grace Hopper", 6.0).with_booth_assignments([
            BoothAssignment::named("Booth A"),
            BoothAssignment::named("Booth B"),
        ]);
        let layout = layout_for(&record);

        assert_eq!(
            layout.details().and_then(|table| table.value_for(BOOTH_LABEL)),
            Some("Booth A, Booth B")
        );
    }

    #[test]
    fn footer_and_signature_carry_the_issue_date() {
        let layout = layout_for(&VolunteerRecord::new(7, "Alan Turing", 3.0));

        assert_eq!(layout.certificate_id(), "CERT-7-202503");
        let texts = layout.paragraph_texts();
        assert_eq!(texts.last().map(String::as_str), Some("Certificate ID: CERT-7-202503"));

        let signature = layout.signature().expect("signature table present");
        assert_eq!(signature.cell(0, 0), Some("Date: March 05, 2025"));
        assert_eq!(signature.cell(0, 2), Some("Authorized Signature"));
        assert_eq!(signature.cell(1, 0), Some(""));
        assert_eq!(signature.cell(1, 2), Some("Event Organizer"));
        assert_eq!(
            signature.columns()[2].alignment(),
            HorizontalAlignment::Right
        );
    }

    #[test]
    fn body_names_recipient_event_and_organization() {
        let record = VolunteerRecord::new(3, "Mike Wilson", 22.0);
        let issued_on = NaiveDate::from_ymd_opt(2025, 3, 5).expect("valid date");
        let request = CertificateRequest::new()
            .with_event_name("Spring Expo")
            .with_organization("Campus Events Office");
        let layout =
            CertificateLayout::build(&CertificateDetails::resolve(&record, &request, issued_on));

        let texts = layout.paragraph_texts();
        assert_eq!(texts[0], TITLE);
        assert_eq!(texts[1], "Campus Events Office");
        assert_eq!(texts[2], "This is to certify that");
        assert_eq!(texts[3], "Mike Wilson");
        assert_eq!(
            texts[4],
            "has successfully completed volunteer service for Spring Expo with dedication and excellence."
        );
        assert_eq!(texts[5], RECOGNITION);
    }

    #[test]
    fn same_details_give_identical_layouts() {
        let record = VolunteerRecord::new(5, "Katherine Johnson", 11.0);
        assert_eq!(layout_for(&record), layout_for(&record));
    }
}
