//! Comment markers such as `// TODO: fix this`.

use regex::Regex;
use tracing::error;

use crate::xml::document::XmlElement;

/// Marker terms scanned for when none are configured.
pub const DEFAULT_MARKERS: [&str; 2] = ["TODO", "FIXME"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub term: String,
    pub content: String,
    /// 1-based line number.
    pub line: u32,
}

impl Marker {
    /// `<todo line="7">fix this</todo>`
    pub fn to_xml(&self) -> XmlElement {
        let mut marker = XmlElement::with_text(self.term.to_lowercase(), self.content.as_str());
        marker.set_attribute("line", self.line.to_string());
        marker
    }
}

/// Builds `//\s*(TERM|TERM...):?\s*`.
fn marker_prefix(terms: &[String]) -> Option<Regex> {
    if terms.is_empty() {
        return None;
    }

    let alternatives = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");

    match Regex::new(&format!(r"//\s*({}):?\s*", alternatives)) {
        Ok(regex) => Some(regex),
        Err(err) => {
            error!("unable to build marker pattern: {}", err);
            None
        }
    }
}

/// Scans every line of `contents` for `// TERM[:] text` comments.
///
/// A line may carry several markers; each one's text runs up to the next
/// marker on the same line or the end of the line.
pub fn scan_markers(contents: &str, terms: &[String]) -> Vec<Marker> {
    let Some(prefix) = marker_prefix(terms) else {
        return vec![];
    };

    let mut markers = vec![];

    for (index, line) in contents.split('\n').enumerate() {
        let found: Vec<(usize, usize, &str)> = prefix
            .captures_iter(line)
            .filter_map(|captures| {
                let whole = captures.get(0)?;
                let term = captures.get(1)?;
                Some((whole.start(), whole.end(), term.as_str()))
            })
            .collect();

        for (i, (_, end, term)) in found.iter().enumerate() {
            let stop = found.get(i + 1).map_or(line.len(), |next| next.0);
            markers.push(Marker {
                term: term.to_string(),
                content: line[*end..stop].trim().to_string(),
                line: index as u32 + 1,
            });
        }
    }

    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn terms(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|term| term.to_string()).collect()
    }

    #[test]
    fn test_marker_on_seventh_line() {
        let contents = "<?php\n\n\n\n\n\n// TODO: fix this\n";
        let markers = scan_markers(contents, &terms(&DEFAULT_MARKERS));

        assert_eq!(
            markers,
            vec![Marker {
                term: "TODO".to_string(),
                content: "fix this".to_string(),
                line: 7,
            }]
        );
        assert_eq!(markers[0].to_xml().to_string(), "<todo line=\"7\">fix this</todo>");
    }

    #[test]
    fn test_two_markers_on_one_line() {
        let markers = scan_markers("$a = 1; // TODO: one // FIXME two", &terms(&DEFAULT_MARKERS));

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].term, "TODO");
        assert_eq!(markers[0].content, "one");
        assert_eq!(markers[1].term, "FIXME");
        assert_eq!(markers[1].content, "two");
        assert!(markers.iter().all(|marker| marker.line == 1));
    }

    #[test]
    fn test_unconfigured_term_is_ignored() {
        let markers = scan_markers("// NOTE: not scanned\n// TODO scanned", &terms(&["TODO"]));

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].content, "scanned");
        assert_eq!(markers[0].line, 2);
    }

    #[test]
    fn test_terms_are_matched_literally() {
        let markers = scan_markers("// C++ later\n// CXX never", &terms(&["C++"]));

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].content, "later");
    }

    #[test]
    fn test_no_terms_no_markers() {
        assert!(scan_markers("// TODO: fix this", &[]).is_empty());
    }
}
