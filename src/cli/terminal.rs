//! Styling for human-readable output

use std::fmt::Display;

use owo_colors::OwoColorize;
use supports_color::Stream;

/// Styles used by the table and summary output.
///
/// Colour is only applied when the target stream supports it.
pub trait Paint: Display {
    /// A section heading on stdout.
    fn heading(&self) -> String {
        paint(self, Stream::Stdout, |s| s.bold().to_string())
    }

    /// Secondary text on stdout.
    fn muted(&self) -> String {
        paint(self, Stream::Stdout, |s| s.dimmed().to_string())
    }

    /// A warning on stderr.
    fn warning(&self) -> String {
        paint(self, Stream::Stderr, |s| s.yellow().to_string())
    }
}

impl<T: Display + ?Sized> Paint for T {}

fn paint<T: Display + ?Sized>(text: &T, stream: Stream, style: impl Fn(&str) -> String) -> String {
    let text = text.to_string();
    if supports_color::on(stream).is_some() {
        style(&text)
    } else {
        text
    }
}
