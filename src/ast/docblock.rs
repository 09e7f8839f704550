//! Structured documentation comments (`/** ... */`).

use crate::{
    errors::errors::{Error, ErrorImpl},
    xml::document::XmlElement,
    Position,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub description: String,
}

/// A parsed docblock: short and long description plus its `@tags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    short_description: String,
    long_description: String,
    tags: Vec<Tag>,
    line: u32,
}

impl DocBlock {
    /// Parses the raw text of a documentation comment token.
    ///
    /// Fails when the text is not delimited by `/**` and `*/` or when a
    /// line starts a tag without a valid name.
    pub fn parse(raw: &str, position: Position) -> Result<DocBlock, Error> {
        let line = position.0;
        let failure = |message: &str| {
            Error::new(
                ErrorImpl::DocBlockParse {
                    message: message.to_string(),
                },
                position.clone(),
            )
        };

        let inner = raw
            .trim()
            .strip_prefix("/**")
            .ok_or_else(|| failure("a docblock must start with `/**`"))?
            .strip_suffix("*/")
            .ok_or_else(|| failure("a docblock must be closed with `*/`"))?;

        let mut description: Vec<&str> = vec![];
        let mut tags: Vec<Tag> = vec![];

        for line in inner.lines().map(strip_gutter) {
            if let Some(tag) = line.strip_prefix('@') {
                let name: String = tag.chars().take_while(|c| !c.is_whitespace()).collect();
                if name.is_empty() || !name.chars().all(is_tag_name_char) {
                    return Err(failure(&format!("invalid tag name `@{}`", name)));
                }
                tags.push(Tag {
                    description: tag[name.len()..].trim().to_string(),
                    name,
                });
            } else if let Some(tag) = tags.last_mut() {
                // continuation of the previous tag
                if !line.trim().is_empty() {
                    if !tag.description.is_empty() {
                        tag.description.push('\n');
                    }
                    tag.description.push_str(line.trim());
                }
            } else {
                description.push(line);
            }
        }

        let description = description.join("\n");
        let description = description.trim();
        let (short_description, long_description) = match description.find("\n\n") {
            Some(split) => (&description[..split], &description[split..]),
            None => (description, ""),
        };

        Ok(DocBlock {
            short_description: short_description.trim().to_string(),
            long_description: long_description.trim().to_string(),
            tags,
            line,
        })
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |tag| tag.name == name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn to_xml(&self) -> XmlElement {
        let mut docblock = XmlElement::new("docblock");
        docblock.set_attribute("line", self.line.to_string());
        docblock.add_child(XmlElement::with_text("description", self.short_description.as_str()));
        docblock.add_child(XmlElement::with_text(
            "long-description",
            self.long_description.as_str(),
        ));

        for tag in &self.tags {
            let element = docblock.add_child(XmlElement::with_text("tag", tag.description.as_str()));
            element.set_attribute("name", tag.name.as_str());
            element.set_attribute("description", tag.description.as_str());
        }

        docblock
    }
}

/// Removes leading whitespace and the ` * ` gutter from one comment line.
fn strip_gutter(line: &str) -> &str {
    let line = line.trim_start();
    let line = line.strip_prefix('*').unwrap_or(line);
    line.strip_prefix(' ').unwrap_or(line).trim_end()
}

fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '\\' | ':')
}
