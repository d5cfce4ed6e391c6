//! Inline text styling for certificate paragraphs.
//!
//! The title, recipient name and footer each need a different mix of weight, slant and color
//! inside an otherwise plain sentence.  [`Span`] captures exactly that; `genpdf` styles are only
//! produced when a paragraph is pushed into the document.

use genpdf::style::{Color, Style, StyledString};

/// A run of text printed with one inline style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    color: Option<Color>,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The unstyled text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Prints the span in `color` instead of the document's text color.
    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    fn style(&self) -> Style {
        let mut style = Style::new();
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        StyledString::new(span.text.clone(), span.style())
    }
}

/// Concatenates the text of all spans, ignoring styles.
pub fn plain_text<'a, I>(spans: I) -> String
where
    I: IntoIterator<Item = &'a Span>,
{
    spans.into_iter().map(Span::text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_name_style() {
        let name = Span::new("Sarah Johnson")
            .bold()
            .colored(Color::Rgb(0, 0, 255));
        let styled = StyledString::from(&name);

        assert_eq!(styled.s, "Sarah Johnson");
        assert!(styled.style.is_bold());
        assert!(!styled.style.is_italic());
        assert_eq!(styled.style.color(), Some(Color::Rgb(0, 0, 255)));
    }

    #[test]
    fn organization_subtitle_is_italic_only() {
        let styled = StyledString::from(&Span::new("EventIQ Organization").italic());
        assert!(styled.style.is_italic());
        assert!(!styled.style.is_bold());
        assert_eq!(styled.style.color(), None);
    }

    #[test]
    fn plain_text_joins_spans() {
        let spans = vec![Span::new("for "), Span::new("Expo").bold(), Span::new(".")];
        assert_eq!(plain_text(&spans), "for Expo.");
    }
}
