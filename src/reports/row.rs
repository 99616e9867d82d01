use core::fmt::Display;
use std::borrow::Cow;

/// Escape a value for RFC compliant CSV output.
///
/// Wraps the value in double quotes if it contains commas, newlines, or double quotes.
/// Internal double quotes are doubled per the RFC.
#[must_use]
pub fn escape_csv(s: &str) -> Cow<'_, str> {
    if s.contains('"') {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else if s.contains(',') || s.contains('\n') || s.contains('\r') {
        Cow::Owned(format!("\"{s}\""))
    } else {
        Cow::Borrowed(s)
    }
}

/// Builds one CSV line, escaping every field and separating fields with commas.
#[derive(Debug, Default)]
pub struct Row {
    line: String,
    fields: usize,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, value: impl Display) -> Self {
        if self.fields > 0 {
            self.line.push(',');
        }

        self.line.push_str(&escape_csv(&value.to_string()));
        self.fields += 1;
        self
    }

    /// Append a field that renders as empty when absent.
    #[must_use]
    pub fn opt(self, value: Option<impl Display>) -> Self {
        match value {
            Some(v) => self.field(v),
            None => self.field(""),
        }
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.line
    }
}
