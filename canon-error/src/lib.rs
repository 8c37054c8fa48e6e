//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! Canonicalization has no source file to point into. Instead, every [`Error`] carries the
//! rendered form of the expression it originated from, and its spans index into that text.

extern crate self as canon_error;

pub use ariadne;

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::{self, Debug, Display, Formatter}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns `self` as [`Any`], so that callers can recover the concrete error kind.
    fn as_any(&self) -> &dyn Any;

    /// The one-line message describing the error.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of a rendered expression that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The rendered expression that this error originated from.
    pub src: String,

    /// The regions of [`Error::src`] that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given source text, spans and kind.
    pub fn new(
        src: impl Into<String>,
        spans: Vec<Range<usize>>,
        kind: impl ErrorKind + 'static,
    ) -> Self {
        Self { src: src.into(), spans, kind: Box::new(kind) }
    }

    /// Returns the error kind as `K`, if it is one.
    pub fn kind_as<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Returns true if the error kind is `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.kind_as::<K>().is_some()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Renders the report for this error into a string.
    pub fn report_to_string(&self, src_id: &str) -> String {
        let mut buf = Vec::new();

        // writing into a `Vec` cannot fail
        let _ = self.build_report(src_id).write((src_id, Source::from(&self.src)), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Prints the report for this error to stderr.
    pub fn report_to_stderr(&self, src_id: &str) {
        let _ = self.build_report(src_id).eprint((src_id, Source::from(&self.src)));
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in `{}`)", self.kind.message(), self.src)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use canon_attrs::ErrorKind;
    use super::*;

    /// A factor could not be multiplied.
    #[derive(Debug, ErrorKind)]
    #[error(
        message = format!("cannot multiply by `{}`", self.factor),
        labels = ["this factor"],
        help = "remove the factor from the product",
    )]
    struct CannotMultiply {
        factor: String,
    }

    /// Something was undefined.
    #[derive(Debug, ErrorKind)]
    #[error(message = "undefined", labels = ["", "this one"])]
    struct Undefined;

    fn strip(report: String) -> String {
        String::from_utf8(strip_ansi_escapes::strip(report.as_bytes())).unwrap()
    }

    #[test]
    fn report_contains_message_and_label() {
        let err = Error::new("a*(x<y)", vec![2..7], CannotMultiply { factor: "x<y".to_string() });
        let report = strip(err.report_to_string("expr"));

        assert!(report.contains("cannot multiply by `x<y`"));
        assert!(report.contains("this factor"));
        assert!(report.contains("remove the factor from the product"));
        assert!(report.contains("a*(x<y)"));
    }

    #[test]
    fn empty_labels_are_skipped() {
        let err = Error::new("0^-1", vec![0..1, 2..4], Undefined);
        let report = strip(err.report_to_string("expr"));

        assert!(report.contains("undefined"));
        assert!(report.contains("this one"));
    }

    #[test]
    fn downcast_kind() {
        let err = Error::new("x", vec![], Undefined);
        assert!(err.is::<Undefined>());
        assert!(err.kind_as::<CannotMultiply>().is_none());
        assert_eq!(err.to_string(), "undefined (in `x`)");
    }
}
