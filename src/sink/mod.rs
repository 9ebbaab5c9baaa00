//! Consumers of extracted prefixes: stdout, files and kernel ipsets.

mod ipset;
mod save;
mod show;

use once_cell::unsync::OnceCell;
use std::fmt::Display;

use crate::classify::{Classified, Classifier};

pub use ipset::{load_ipsets, Family, IpSetBackend, IpsetCommand};
pub use save::save;
pub use show::show;

/// Extracted CIDR text plus its lazily computed classification.
///
/// Sinks that only echo the raw text never pay for classification.
pub struct Extracted<'a> {
    text: &'a [u8],
    classifier: &'a Classifier,
    classified: OnceCell<Classified>,
}

impl<'a> Extracted<'a> {
    pub fn new(text: &'a [u8], classifier: &'a Classifier) -> Self {
        Self {
            text,
            classifier,
            classified: OnceCell::new(),
        }
    }

    /// Raw newline-delimited text, without a trailing newline.
    pub fn text(&self) -> &'a [u8] {
        self.text
    }

    /// Prefixes split by family, classified on first use.
    pub fn classified(&self) -> &Classified {
        self.classified
            .get_or_init(|| self.classifier.classify(self.text))
    }

    /// Whether classification has run.
    pub fn is_classified(&self) -> bool {
        self.classified.get().is_some()
    }
}

/// Render prefixes one per line.
///
/// With `keep_trailing_newline == false` the last newline is dropped, which
/// is how the final block of an output file is written.
pub fn render_prefixes<I, T>(prefixes: I, keep_trailing_newline: bool) -> Vec<u8>
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    let mut out = Vec::new();
    for prefix in prefixes {
        out.extend_from_slice(prefix.to_string().as_bytes());
        out.push(b'\n');
    }
    if !keep_trailing_newline && out.last() == Some(&b'\n') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipnet::Ipv4Net;

    fn nets(items: &[&str]) -> Vec<Ipv4Net> {
        items.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_render_keeps_or_drops_final_newline() {
        let list = nets(&["1.0.0.0/8", "2.0.0.0/8"]);
        assert_eq!(render_prefixes(&list, true), b"1.0.0.0/8\n2.0.0.0/8\n");
        assert_eq!(render_prefixes(&list, false), b"1.0.0.0/8\n2.0.0.0/8");
    }

    #[test]
    fn test_render_empty() {
        let empty: Vec<Ipv4Net> = Vec::new();
        assert!(render_prefixes(&empty, true).is_empty());
        assert!(render_prefixes(&empty, false).is_empty());
    }

    #[test]
    fn test_extracted_classifies_lazily() {
        let classifier = Classifier::new().with_workers(2);
        let extracted = Extracted::new(b"1.2.3.0/24\n::/0", &classifier);
        assert!(!extracted.is_classified());
        assert_eq!(extracted.classified().v4.len(), 1);
        assert!(extracted.is_classified());
        assert_eq!(extracted.classified().v6.len(), 1);
    }
}
