use crate::utils::error::{Result, SweepError};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::path::{Path, PathBuf};

/// An XML document held as raw bytes. Queries and edits run as event
/// scans over the bytes; edits splice byte spans so that everything
/// outside the touched span stays exactly as it was on disk.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    pub path: PathBuf,
    bytes: Vec<u8>,
}

/// Matches an element by one attribute value.
#[derive(Debug, Clone)]
pub struct AttrMatch {
    name: String,
    value: String,
    ignore_case: bool,
}

impl AttrMatch {
    pub fn exact(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            ignore_case: false,
        }
    }

    pub fn ignore_case(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            ignore_case: true,
        }
    }

    fn matches(&self, element: &BytesStart) -> Result<bool> {
        match attr_value(element, &self.name)? {
            Some(actual) if self.ignore_case => Ok(actual.eq_ignore_ascii_case(&self.value)),
            Some(actual) => Ok(actual == self.value),
            None => Ok(false),
        }
    }
}

/// Attribute names and unescaped values of one element occurrence.
#[derive(Debug, Clone)]
pub struct ElementSnapshot {
    attrs: Vec<(String, String)>,
}

impl ElementSnapshot {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl XmlDocument {
    /// Wraps raw bytes after checking they parse as well-formed XML.
    pub fn parse(path: PathBuf, bytes: Vec<u8>) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes.as_slice());
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(SweepError::DocumentParseError {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })
                }
            }
        }
        Ok(Self { path, bytes })
    }

    fn reader(&self) -> Reader<&[u8]> {
        Reader::from_reader(self.bytes.as_slice())
    }

    /// Collects the unescaped values of `attr` across every occurrence
    /// of `element` (matched by local name).
    pub fn attribute_values(&self, element: &str, attr: &str) -> Result<Vec<String>> {
        let mut reader = self.reader();
        let mut values = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == element.as_bytes() => {
                    if let Some(value) = attr_value(&e, attr)? {
                        values.push(value);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(values)
    }

    /// Snapshots every occurrence of `element` (matched by local name)
    /// with all of its attributes.
    pub fn elements(&self, element: &str) -> Result<Vec<ElementSnapshot>> {
        let mut reader = self.reader();
        let mut found = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == element.as_bytes() => {
                    let mut attrs = Vec::new();
                    for attr in e.attributes() {
                        let attr = attr?;
                        attrs.push((
                            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                            attr.unescape_value()?.into_owned(),
                        ));
                    }
                    found.push(ElementSnapshot { attrs });
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(found)
    }

    pub fn count_elements(&self, element: &str) -> Result<usize> {
        let mut reader = self.reader();
        let mut count = 0;
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == element.as_bytes() => {
                    count += 1
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(count)
    }

    /// Looks inside the first `ancestor` element matched by `matcher`
    /// for a `target` descendant and returns its `target_attr` value.
    pub fn nested_attribute(
        &self,
        ancestor: &str,
        matcher: &AttrMatch,
        target: &str,
        target_attr: &str,
    ) -> Result<Option<String>> {
        let mut reader = self.reader();
        loop {
            match reader.read_event()? {
                Event::Start(e)
                    if e.local_name().as_ref() == ancestor.as_bytes() && matcher.matches(&e)? =>
                {
                    let mut depth = 0usize;
                    loop {
                        match reader.read_event()? {
                            Event::Start(inner) => {
                                if inner.local_name().as_ref() == target.as_bytes() {
                                    if let Some(value) = attr_value(&inner, target_attr)? {
                                        return Ok(Some(value));
                                    }
                                }
                                depth += 1;
                            }
                            Event::Empty(inner)
                                if inner.local_name().as_ref() == target.as_bytes() =>
                            {
                                if let Some(value) = attr_value(&inner, target_attr)? {
                                    return Ok(Some(value));
                                }
                            }
                            Event::End(_) => {
                                if depth == 0 {
                                    return Ok(None);
                                }
                                depth -= 1;
                            }
                            Event::Eof => {
                                return Err(SweepError::ProcessingError {
                                    message: format!(
                                        "unclosed <{}> element in {}",
                                        ancestor,
                                        self.path.display()
                                    ),
                                })
                            }
                            _ => {}
                        }
                    }
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    /// Reports whether `prefix` is still used anywhere in the document:
    /// as an element name prefix, an attribute name prefix (its own
    /// xmlns declaration does not count), or a `prefix:` qualified
    /// attribute value.
    pub fn uses_prefix(&self, prefix: &str) -> Result<bool> {
        let declaration = format!("xmlns:{}", prefix);
        let qualified = format!("{}:", prefix);
        let mut reader = self.reader();
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => {
                    if let Some(p) = e.name().prefix() {
                        if p.as_ref() == prefix.as_bytes() {
                            return Ok(true);
                        }
                    }
                    for attr in e.attributes() {
                        let attr = attr?;
                        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                        if key != declaration {
                            if let Some(p) = attr.key.prefix() {
                                if p.as_ref() == prefix.as_bytes() {
                                    return Ok(true);
                                }
                            }
                        }
                        if attr.unescape_value()?.starts_with(&qualified) {
                            return Ok(true);
                        }
                    }
                }
                Event::Eof => return Ok(false),
                _ => {}
            }
        }
    }

    /// Removes the first occurrence of `element` (matched by local
    /// name, optionally by one attribute) together with its whole
    /// subtree. Returns whether anything was removed.
    pub fn remove_element(&mut self, element: &str, matcher: Option<&AttrMatch>) -> Result<bool> {
        let span = self.find_element_span(element, matcher)?;
        if let Some((start, end)) = span {
            let (start, end) = self.widen_to_line(start, end);
            self.bytes.drain(start..end);
            return Ok(true);
        }
        Ok(false)
    }

    fn find_element_span(
        &self,
        element: &str,
        matcher: Option<&AttrMatch>,
    ) -> Result<Option<(usize, usize)>> {
        let mut reader = self.reader();
        loop {
            let before = reader.buffer_position();
            match reader.read_event()? {
                Event::Start(e) if e.local_name().as_ref() == element.as_bytes() => {
                    let hit = match matcher {
                        Some(m) => m.matches(&e)?,
                        None => true,
                    };
                    if !hit {
                        continue;
                    }
                    let mut depth = 0usize;
                    loop {
                        match reader.read_event()? {
                            Event::Start(_) => depth += 1,
                            Event::End(_) => {
                                if depth == 0 {
                                    return Ok(Some((before, reader.buffer_position())));
                                }
                                depth -= 1;
                            }
                            Event::Eof => {
                                return Err(SweepError::ProcessingError {
                                    message: format!(
                                        "unclosed <{}> element in {}",
                                        element,
                                        self.path.display()
                                    ),
                                })
                            }
                            _ => {}
                        }
                    }
                }
                Event::Empty(e) if e.local_name().as_ref() == element.as_bytes() => {
                    let hit = match matcher {
                        Some(m) => m.matches(&e)?,
                        None => true,
                    };
                    if hit {
                        return Ok(Some((before, reader.buffer_position())));
                    }
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    /// Widens a removal span to swallow the whole line when the element
    /// sits alone on it, so no blank line is left behind.
    fn widen_to_line(&self, start: usize, end: usize) -> (usize, usize) {
        let bytes = &self.bytes;
        let mut line_start = start;
        while line_start > 0 && matches!(bytes[line_start - 1], b' ' | b'\t') {
            line_start -= 1;
        }
        let at_line_head = line_start == 0 || bytes[line_start - 1] == b'\n';
        if !at_line_head {
            return (start, end);
        }
        let mut line_end = end;
        if line_end < bytes.len() && bytes[line_end] == b'\r' {
            line_end += 1;
        }
        if line_end < bytes.len() && bytes[line_end] == b'\n' {
            line_end += 1;
        } else {
            return (start, end);
        }
        (line_start, line_end)
    }

    /// Drops one attribute from the root element's start tag. Returns
    /// whether the attribute was present.
    pub fn remove_root_attribute(&mut self, attr: &str) -> Result<bool> {
        let mut reader = self.reader();
        loop {
            let before = reader.buffer_position();
            match reader.read_event()? {
                Event::Start(e) => {
                    if attr_value(&e, attr)?.is_none() {
                        return Ok(false);
                    }
                    let rebuilt = rebuild_start_without(&e, attr)?;
                    let tag = render_event(Event::Start(rebuilt))?;
                    let after = reader.buffer_position();
                    self.bytes.splice(before..after, tag);
                    return Ok(true);
                }
                Event::Empty(e) => {
                    if attr_value(&e, attr)?.is_none() {
                        return Ok(false);
                    }
                    let rebuilt = rebuild_start_without(&e, attr)?;
                    let tag = render_event(Event::Empty(rebuilt))?;
                    let after = reader.buffer_position();
                    self.bytes.splice(before..after, tag);
                    return Ok(true);
                }
                Event::Eof => return Ok(false),
                _ => {}
            }
        }
    }

    /// Serializes the document with the XML declaration rewritten to
    /// carry standalone="yes". Version and encoding are taken from the
    /// existing declaration, or 1.0/UTF-8 when the document had none.
    /// All bytes after the declaration are emitted untouched.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut reader = self.reader();
        let before = reader.buffer_position();
        match reader.read_event()? {
            Event::Decl(decl) => {
                let version = match decl.version() {
                    Ok(v) => String::from_utf8_lossy(&v).into_owned(),
                    Err(_) => "1.0".to_string(),
                };
                let encoding = match decl.encoding() {
                    Some(Ok(e)) => String::from_utf8_lossy(&e).into_owned(),
                    _ => "UTF-8".to_string(),
                };
                let rewritten =
                    render_event(Event::Decl(BytesDecl::new(&version, Some(&encoding), Some("yes"))))?;
                let after = reader.buffer_position();
                let mut out = Vec::with_capacity(self.bytes.len() + 16);
                out.extend_from_slice(&self.bytes[..before]);
                out.extend_from_slice(&rewritten);
                out.extend_from_slice(&self.bytes[after..]);
                Ok(out)
            }
            _ => {
                let decl =
                    render_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
                let mut out = Vec::with_capacity(self.bytes.len() + decl.len() + 1);
                out.extend_from_slice(&decl);
                out.push(b'\n');
                out.extend_from_slice(&self.bytes);
                Ok(out)
            }
        }
    }
}

fn attr_value(element: &BytesStart, name: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn rebuild_start_without<'a>(element: &'a BytesStart<'a>, drop: &str) -> Result<BytesStart<'a>> {
    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let mut rebuilt = BytesStart::new(name);
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == drop.as_bytes() {
            continue;
        }
        rebuilt.push_attribute(Attribute {
            key: attr.key,
            value: attr.value.clone(),
        });
    }
    Ok(rebuilt)
}

fn render_event(event: Event) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(event)?;
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(xml: &str) -> XmlDocument {
        XmlDocument::parse(PathBuf::from("test.xml"), xml.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn parse_rejects_malformed_input() {
        let result = XmlDocument::parse(
            PathBuf::from("broken.xml"),
            b"<root><child></root>".to_vec(),
        );
        assert!(matches!(
            result,
            Err(SweepError::DocumentParseError { .. })
        ));
    }

    #[test]
    fn attribute_values_collects_across_occurrences() {
        let d = doc(
            r#"<root>
  <invoke partnerLink="Billing"/>
  <invoke partnerLink="Audit"/>
  <invoke name="noLink"/>
</root>"#,
        );
        let values = d.attribute_values("invoke", "partnerLink").unwrap();
        assert_eq!(values, vec!["Billing", "Audit"]);
    }

    #[test]
    fn remove_element_takes_subtree_and_line() {
        let mut d = doc(
            "<root>\n  <keep/>\n  <drop name=\"a\">\n    <child/>\n  </drop>\n  <tail/>\n</root>",
        );
        let removed = d
            .remove_element("drop", Some(&AttrMatch::exact("name", "a")))
            .unwrap();
        assert!(removed);
        let text = String::from_utf8(d.to_bytes().unwrap()).unwrap();
        assert!(!text.contains("drop"));
        assert!(!text.contains("child"));
        assert!(text.contains("<keep/>"));
        assert!(text.contains("<tail/>"));
        assert!(!text.contains("\n\n"));
    }

    #[test]
    fn remove_element_matches_local_name_only() {
        let mut d = doc("<root><ns1:item name=\"x\"/><item name=\"y\"/></root>");
        assert!(d
            .remove_element("item", Some(&AttrMatch::exact("name", "x")))
            .unwrap());
        let text = String::from_utf8(d.to_bytes().unwrap()).unwrap();
        assert!(!text.contains("ns1:item"));
        assert!(text.contains("name=\"y\""));
    }

    #[test]
    fn remove_element_reports_absent_match() {
        let mut d = doc("<root><item name=\"x\"/></root>");
        assert!(!d
            .remove_element("item", Some(&AttrMatch::exact("name", "missing")))
            .unwrap());
    }

    #[test]
    fn ignore_case_match_finds_differently_cased_value() {
        let mut d = doc("<root><reference name=\"BillingService\"/></root>");
        assert!(d
            .remove_element("reference", Some(&AttrMatch::ignore_case("name", "billingservice")))
            .unwrap());
    }

    #[test]
    fn remove_root_attribute_keeps_others() {
        let mut d = doc(r#"<defs xmlns:a="urn:a" xmlns:b="urn:b"><x a:k="1"/></defs>"#);
        assert!(d.remove_root_attribute("xmlns:b").unwrap());
        let text = String::from_utf8(d.to_bytes().unwrap()).unwrap();
        assert!(!text.contains("xmlns:b"));
        assert!(text.contains("xmlns:a=\"urn:a\""));
        assert!(text.contains("a:k=\"1\""));
    }

    #[test]
    fn uses_prefix_sees_names_and_values() {
        let d = doc(r#"<defs xmlns:p="urn:p"><role portType="p:Port"/></defs>"#);
        assert!(d.uses_prefix("p").unwrap());

        let unused = doc(r#"<defs xmlns:p="urn:p"><role portType="q:Port"/></defs>"#);
        assert!(!unused.uses_prefix("p").unwrap());
    }

    #[test]
    fn uses_prefix_ignores_own_declaration() {
        let d = doc(r#"<defs xmlns:p="urn:p"><child/></defs>"#);
        assert!(!d.uses_prefix("p").unwrap());
    }

    #[test]
    fn nested_attribute_scopes_to_matched_ancestor() {
        let d = doc(
            r#"<component>
  <reference name="First"><interface portType="a:One"/></reference>
  <reference name="Second"><interface portType="b:Two"/></reference>
</component>"#,
        );
        let value = d
            .nested_attribute(
                "reference",
                &AttrMatch::exact("name", "Second"),
                "interface",
                "portType",
            )
            .unwrap();
        assert_eq!(value, Some("b:Two".to_string()));
    }

    #[test]
    fn to_bytes_forces_standalone_and_keeps_encoding() {
        let d = doc("<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<root/>");
        let text = String::from_utf8(d.to_bytes().unwrap()).unwrap();
        assert!(text.contains("standalone=\"yes\""));
        assert!(text.contains("encoding=\"ISO-8859-1\""));
    }

    #[test]
    fn to_bytes_adds_declaration_when_missing() {
        let d = doc("<root/>");
        let text = String::from_utf8(d.to_bytes().unwrap()).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(text.contains("<root/>"));
    }
}
