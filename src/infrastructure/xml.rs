use crate::domain::response::GatewayResponse;
use crate::error::{GatewayError, Result};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

impl From<AttrError> for GatewayError {
    fn from(err: AttrError) -> Self {
        Self::ResponseParse(err.to_string())
    }
}

const ATTRIBUTES_KEY: &str = "@attributes";
const TEXT_KEY: &str = "0";

/// An element whose end tag has not been seen yet.
struct Frame {
    name: String,
    attributes: Vec<(String, GatewayResponse)>,
    children: Vec<(String, GatewayResponse)>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = utf8(start.local_name().as_ref())?;
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = utf8(attr.key.local_name().as_ref())?;
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, GatewayResponse::Scalar(value)));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn add_child(&mut self, name: String, value: GatewayResponse) {
        match self.children.iter_mut().find(|(k, _)| *k == name) {
            // Element values are never lists themselves, so a list here can
            // only come from earlier siblings with the same name.
            Some((_, GatewayResponse::List(items))) => items.push(value),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, GatewayResponse::List(Vec::new()));
                *existing = GatewayResponse::List(vec![first, value]);
            }
            None => self.children.push((name, value)),
        }
    }

    fn has_structure(&self) -> bool {
        !self.children.is_empty() || !self.attributes.is_empty()
    }

    fn into_value(self) -> GatewayResponse {
        if !self.has_structure() {
            return if self.text.is_empty() {
                GatewayResponse::empty_map()
            } else {
                GatewayResponse::Scalar(self.text)
            };
        }

        let mut entries = Vec::with_capacity(self.children.len() + 2);
        if !self.attributes.is_empty() {
            entries.push((ATTRIBUTES_KEY.to_string(), GatewayResponse::Map(self.attributes)));
        }
        if self.children.is_empty() && !self.text.trim().is_empty() {
            entries.push((TEXT_KEY.to_string(), GatewayResponse::Scalar(self.text)));
        }
        entries.extend(self.children);
        GatewayResponse::Map(entries)
    }

    /// The document element is unwrapped: its content is the result.
    fn into_root_value(self) -> GatewayResponse {
        if !self.has_structure() && !self.text.is_empty() {
            GatewayResponse::List(vec![GatewayResponse::Scalar(self.text)])
        } else {
            self.into_value()
        }
    }
}

fn utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| GatewayError::ResponseParse(e.to_string()))
}

/// Parses an XML document into a [`GatewayResponse`].
///
/// Child element names become map keys (namespace prefixes dropped), repeated
/// siblings become lists, attributes go under `@attributes`. Any well-formed
/// document is accepted; anything else is a [`GatewayError::ResponseParse`].
pub fn parse_document(xml: &str) -> Result<GatewayResponse> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<GatewayResponse> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(parse_error("multiple root elements"));
                }
                stack.push(Frame::open(&start)?);
            }
            Event::Empty(start) => {
                let frame = Frame::open(&start)?;
                close(frame, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| parse_error("unexpected closing tag"))?;
                close(frame, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(parse_error("text outside of the root element")),
                }
            }
            Event::CData(data) => {
                let text = utf8(&data.into_inner())?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    None => return Err(parse_error("CDATA outside of the root element")),
                }
            }
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(parse_error(&format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| parse_error("document has no root element"))
}

fn close(
    frame: Frame,
    stack: &mut Vec<Frame>,
    root: &mut Option<GatewayResponse>,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            let name = frame.name.clone();
            parent.add_child(name, frame.into_value());
        }
        None => {
            if root.is_some() {
                return Err(parse_error("multiple root elements"));
            }
            *root = Some(frame.into_root_value());
        }
    }
    Ok(())
}

fn parse_error(message: &str) -> GatewayError {
    GatewayError::ResponseParse(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const INITIALIZE_RESULT: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<payex>
  <header name="Payex Header v1.0">
    <id>5f3c1a</id>
    <date>2024-01-02 10:11:12</date>
  </header>
  <status>
    <code>OK</code>
    <description>OK</description>
    <errorCode>OK</errorCode>
    <paramName />
  </status>
  <orderRef>b1f8a7d3c2</orderRef>
  <sessionRef>e0c4</sessionRef>
  <redirectUrl>https://test-confined.payex.com/PxOrderCC.aspx?orderRef=b1f8a7d3c2&amp;s=1</redirectUrl>
</payex>"#;

    #[test]
    fn test_parse_initialize_result() {
        let tree = parse_document(INITIALIZE_RESULT).unwrap();

        assert_eq!(
            tree.to_json(),
            json!({
                "header": {
                    "@attributes": {"name": "Payex Header v1.0"},
                    "id": "5f3c1a",
                    "date": "2024-01-02 10:11:12"
                },
                "status": {
                    "code": "OK",
                    "description": "OK",
                    "errorCode": "OK",
                    "paramName": {}
                },
                "orderRef": "b1f8a7d3c2",
                "sessionRef": "e0c4",
                "redirectUrl": "https://test-confined.payex.com/PxOrderCC.aspx?orderRef=b1f8a7d3c2&s=1"
            })
        );
    }

    #[test]
    fn test_repeated_siblings_become_lists() {
        let tree = parse_document("<r><item>a</item><other/><item>b</item><item>c</item></r>").unwrap();
        assert_eq!(tree.to_json(), json!({"item": ["a", "b", "c"], "other": {}}));

        let nested = parse_document("<r><row><v>1</v></row><row><v>2</v></row></r>").unwrap();
        assert_eq!(nested.to_json(), json!({"row": [{"v": "1"}, {"v": "2"}]}));
    }

    #[test]
    fn test_attributes_text_and_namespaces() {
        let tree = parse_document(
            r#"<p:root xmlns:p="urn:x"><p:amount currency="NOK">100</p:amount><note><![CDATA[a<b]]></note></p:root>"#,
        )
        .unwrap();
        assert_eq!(
            tree.to_json(),
            json!({
                "amount": {"@attributes": {"currency": "NOK"}, "0": "100"},
                "note": "a<b"
            })
        );
    }

    #[test]
    fn test_root_edge_cases() {
        assert_eq!(parse_document("<r/>").unwrap(), GatewayResponse::empty_map());
        assert_eq!(parse_document("<r>hi</r>").unwrap().to_json(), json!(["hi"]));
        assert_eq!(
            parse_document("<r>text<c>1</c>more</r>").unwrap().to_json(),
            json!({"c": "1"})
        );
    }

    #[test]
    fn test_malformed_documents_fail() {
        for xml in [
            "",
            "   ",
            "not xml",
            "<payex><status></payex>",
            "<payex>",
            "<a/><b/>",
            "<a></a><b></b>",
            "</a>",
            "<a>&bogus;</a>",
        ] {
            assert!(
                matches!(parse_document(xml), Err(GatewayError::ResponseParse(_))),
                "expected parse failure for {xml:?}"
            );
        }
    }
}
