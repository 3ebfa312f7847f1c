use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::WechatError;

/// Element-at-a-time writer for the flat XML documents WeChat exchanges.
pub(crate) struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    /// Starts a document with an open `<xml>` root.
    pub(crate) fn new() -> Result<Self, WechatError> {
        let mut builder = Self {
            writer: Writer::new(Vec::new()),
        };
        builder.start("xml")?;
        Ok(builder)
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), WechatError> {
        self.writer
            .write_event(event)
            .map_err(|e| WechatError::Xml(e.to_string()))
    }

    pub(crate) fn start(&mut self, name: &str) -> Result<(), WechatError> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<(), WechatError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// `<name><![CDATA[value]]></name>`. A `]]>` inside `value` closes the
    /// section after `]]` and reopens it before `>`.
    pub(crate) fn cdata(&mut self, name: &str, value: &str) -> Result<(), WechatError> {
        self.start(name)?;
        let mut rest = value;
        while let Some(pos) = rest.find("]]>") {
            let (head, tail) = rest.split_at(pos + 2);
            self.write(Event::CData(BytesCData::new(head)))?;
            rest = tail;
        }
        self.write(Event::CData(BytesCData::new(rest)))?;
        self.end(name)
    }

    /// `<name>value</name>` with the value escaped, for numbers.
    pub(crate) fn text(&mut self, name: &str, value: impl ToString) -> Result<(), WechatError> {
        self.start(name)?;
        self.write(Event::Text(BytesText::new(&value.to_string())))?;
        self.end(name)
    }

    /// Closes the root and returns the document.
    pub(crate) fn finish(mut self) -> Result<String, WechatError> {
        self.end("xml")?;
        String::from_utf8(self.writer.into_inner()).map_err(|e| WechatError::Xml(e.to_string()))
    }
}
