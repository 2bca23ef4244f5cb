//! Pull-parser pass over a Burp XML export.
//!
//! Collects the text of every direct child of each `<item>` without
//! interpreting it. Unknown tags are kept out of the way, missing tags stay
//! empty.

use capview_domain::{IngestError, IngestResult};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

/// A `<request>` or `<response>` payload.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BurpBlob {
    /// Tag text, possibly base64.
    pub text: String,
    /// Whether the tag carried `base64="true"`.
    pub base64: bool,
}

/// Raw fields of one `<item>`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BurpItem {
    pub(crate) time: String,
    pub(crate) url: String,
    pub(crate) host: String,
    pub(crate) ip: String,
    pub(crate) port: String,
    pub(crate) protocol: String,
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) extension: String,
    pub(crate) request: BurpBlob,
    pub(crate) status: String,
    pub(crate) response_length: String,
    pub(crate) content_length: String,
    pub(crate) mime_type: String,
    pub(crate) response: BurpBlob,
    pub(crate) comment: String,
    /// Why the item text could not be read, if it could not.
    pub(crate) unreadable: Option<String>,
}

impl BurpItem {
    fn set(&mut self, tag: &[u8], text: String) {
        match tag {
            b"time" => self.time = text,
            b"url" => self.url = text,
            b"host" => self.host = text,
            b"port" => self.port = text,
            b"protocol" => self.protocol = text,
            b"method" => self.method = text,
            b"path" => self.path = text,
            b"extension" => self.extension = text,
            b"request" => self.request.text = text,
            b"status" => self.status = text,
            b"responselength" => self.response_length = text,
            b"contentlength" => self.content_length = text,
            b"mimetype" => self.mime_type = text,
            b"response" => self.response.text = text,
            b"comment" => self.comment = text,
            _ => {}
        }
    }

    fn set_attributes(&mut self, tag: &BytesStart<'_>) {
        match tag.local_name().as_ref() {
            b"request" => self.request.base64 = is_true(attribute(tag, "base64")),
            b"response" => self.response.base64 = is_true(attribute(tag, "base64")),
            b"host" => self.ip = attribute(tag, "ip").unwrap_or_default(),
            _ => {}
        }
    }

    fn mark_unreadable(&mut self, reason: String) {
        if self.unreadable.is_none() {
            self.unreadable = Some(reason);
        }
    }
}

/// All items of an export plus the root `exportTime` attribute.
#[derive(Debug, Default)]
pub struct BurpDocument {
    /// Raw `exportTime` of `<items>`.
    pub export_time: Option<String>,
    /// Items in document order.
    pub items: Vec<BurpItem>,
}

fn attribute(tag: &BytesStart<'_>, name: &str) -> Option<String> {
    tag.try_get_attribute(name)
        .ok()
        .flatten()
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

fn is_true(value: Option<String>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, String> {
    if reference.is_char_ref() {
        return match reference.resolve_char_ref() {
            Ok(Some(ch)) => Ok(ch.to_string()),
            Ok(None) => Err("empty character reference".to_string()),
            Err(e) => Err(e.to_string()),
        };
    }
    let name = reference.decode().map_err(|e| e.to_string())?;
    resolve_predefined_entity(&name)
        .map(ToString::to_string)
        .ok_or_else(|| format!("unknown entity &{name};"))
}

/// Field currently being collected.
struct OpenField {
    tag: Vec<u8>,
    text: String,
}

/// Reads every `<item>` of a Burp export.
///
/// # Errors
///
/// Returns `InvalidBurpStructure` when the XML is not well formed.
pub fn read_document(bytes: &[u8]) -> IngestResult<BurpDocument> {
    let mut reader = Reader::from_reader(bytes);
    let mut document = BurpDocument::default();

    let mut depth = 0usize;
    let mut item: Option<(usize, BurpItem)> = None;
    let mut field: Option<OpenField> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            IngestError::InvalidBurpStructure(format!(
                "malformed XML at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(tag) => {
                let name = tag.local_name().as_ref().to_vec();
                match item.as_mut() {
                    Some((item_depth, current)) => {
                        if field.is_none() && depth == *item_depth + 1 {
                            current.set_attributes(&tag);
                            field = Some(OpenField {
                                tag: name,
                                text: String::new(),
                            });
                        }
                    }
                    None => {
                        if name == b"item" {
                            item = Some((depth, BurpItem::default()));
                        } else if name == b"items" {
                            document.export_time = attribute(&tag, "exportTime");
                        }
                    }
                }
                depth += 1;
            }
            Event::Empty(tag) => match item.as_mut() {
                Some((item_depth, current)) => {
                    if field.is_none() && depth == *item_depth + 1 {
                        current.set_attributes(&tag);
                    }
                }
                None => {
                    if tag.local_name().as_ref() == b"item" {
                        document.items.push(BurpItem::default());
                    }
                }
            },
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match item.as_ref().map(|(item_depth, _)| *item_depth) {
                    Some(item_depth) if depth == item_depth + 1 => {
                        if let (Some(open), Some((_, current))) = (field.take(), item.as_mut()) {
                            current.set(&open.tag, open.text);
                        }
                    }
                    Some(item_depth) if depth == item_depth => {
                        if let Some((_, finished)) = item.take() {
                            document.items.push(finished);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(text) => {
                if let (Some(open), Some((_, current))) = (&mut field, &mut item) {
                    match text.decode() {
                        Ok(decoded) => open.text.push_str(&decoded),
                        Err(e) => current.mark_unreadable(e.to_string()),
                    }
                }
            }
            Event::CData(data) => {
                if let (Some(open), Some((_, current))) = (&mut field, &mut item) {
                    match data.decode() {
                        Ok(decoded) => open.text.push_str(&decoded),
                        Err(e) => current.mark_unreadable(e.to_string()),
                    }
                }
            }
            Event::GeneralRef(reference) => {
                if let (Some(open), Some((_, current))) = (&mut field, &mut item) {
                    match resolve_reference(&reference) {
                        Ok(resolved) => open.text.push_str(&resolved),
                        Err(reason) => current.mark_unreadable(reason),
                    }
                }
            }
            Event::Eof if depth > 0 || item.is_some() => {
                return Err(IngestError::InvalidBurpStructure(format!(
                    "unexpected end of input with {depth} unclosed element(s)"
                )));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reads_fields_and_attributes() {
        let xml = r#"<?xml version="1.0"?>
<items burpVersion="2023.1" exportTime="Thu Mar 05 16:23:39 CET 2020">
  <item>
    <time>Thu Mar 05 16:20:00 CET 2020</time>
    <url><![CDATA[https://example.com/a?b=1]]></url>
    <host ip="93.184.216.34">example.com</host>
    <port>443</port>
    <method><![CDATA[GET]]></method>
    <request base64="true"><![CDATA[R0VUIC8gSFRUUC8xLjE=]]></request>
    <status>200</status>
    <response base64="false">HTTP/1.1 200 OK &amp; fine</response>
    <comment></comment>
  </item>
</items>"#;

        let document = read_document(xml.as_bytes()).expect("Should read");
        assert_eq!(document.export_time.as_deref(), Some("Thu Mar 05 16:23:39 CET 2020"));
        assert_eq!(document.items.len(), 1);

        let item = &document.items[0];
        assert_eq!(item.url, "https://example.com/a?b=1");
        assert_eq!(item.host, "example.com");
        assert_eq!(item.ip, "93.184.216.34");
        assert_eq!(item.method, "GET");
        assert!(item.request.base64);
        assert_eq!(item.request.text, "R0VUIC8gSFRUUC8xLjE=");
        assert!(!item.response.base64);
        assert_eq!(item.response.text, "HTTP/1.1 200 OK & fine");
        assert_eq!(item.unreadable, None);
    }

    #[test]
    fn test_empty_items_are_kept() {
        let xml = "<items><item/><item></item><item><url/><status></status></item></items>";
        let document = read_document(xml.as_bytes()).expect("Should read");
        assert_eq!(document.items.len(), 3);
        assert!(document.items.iter().all(|i| i.url.is_empty() && i.status.is_empty()));
    }

    #[test]
    fn test_unknown_entity_marks_item_unreadable() {
        let xml = "<items><item><url>https://a.test/&bogus;</url></item><item><url>https://b.test/</url></item></items>";
        let document = read_document(xml.as_bytes()).expect("Should read");
        assert!(document.items[0].unreadable.is_some());
        assert_eq!(document.items[1].unreadable, None);
    }

    #[test]
    fn test_truncated_item_is_rejected() {
        let xml = "<items><item><url>https://a.test/</url></item><item><url>https://b.test/</url><method>GET</method>";
        let result = read_document(xml.as_bytes());
        assert!(matches!(result, Err(IngestError::InvalidBurpStructure(_))));
    }

    #[test]
    fn test_missing_root_close_is_rejected() {
        let result = read_document(b"<items><item><url>https://a.test/</url></item>");
        assert!(matches!(result, Err(IngestError::InvalidBurpStructure(_))));
    }

    #[test]
    fn test_malformed_xml() {
        let result = read_document(b"<items><item><url></item></items>");
        assert!(matches!(result, Err(IngestError::InvalidBurpStructure(_))));
    }
}
