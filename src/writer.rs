//! Minimal docx output.
//!
//! Builds a WordprocessingML package from a paragraph sequence: one `w:p`
//! per paragraph, each carrying its style name in `w:pStyle`. Style names are
//! written verbatim; a name the opening word processor does not know falls
//! back to its default style there. Embedded newlines and tabs become `w:br`
//! and `w:tab` elements so they survive the trip into Word.

use std::io::{Cursor, Write};
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::models::Paragraph;

const WORDPROCESSINGML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Write a docx file containing the given paragraphs.
pub fn write_docx(path: &Path, paragraphs: &[Paragraph]) -> Result<()> {
    let bytes = build_docx_bytes(paragraphs)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    Ok(())
}

/// Assemble the docx ZIP package in memory.
pub fn build_docx_bytes(paragraphs: &[Paragraph]) -> Result<Vec<u8>> {
    let document_xml = build_document_xml(paragraphs)?;

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;
    zip.start_file("_rels/.rels", options)?;
    zip.write_all(RELS_XML.as_bytes())?;
    zip.start_file("word/document.xml", options)?;
    zip.write_all(&document_xml)?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn build_document_xml(paragraphs: &[Paragraph]) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut document = BytesStart::new("w:document");
    document.push_attribute(("xmlns:w", WORDPROCESSINGML_NS));
    writer.write_event(Event::Start(document))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    for paragraph in paragraphs {
        write_paragraph(&mut writer, paragraph)?;
    }

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;
    Ok(writer.into_inner().into_inner())
}

fn write_paragraph(writer: &mut Writer<Cursor<Vec<u8>>>, paragraph: &Paragraph) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;

    writer.write_event(Event::Start(BytesStart::new("w:pPr")))?;
    let mut style = BytesStart::new("w:pStyle");
    style.push_attribute(("w:val", paragraph.style.as_str()));
    writer.write_event(Event::Empty(style))?;
    writer.write_event(Event::End(BytesEnd::new("w:pPr")))?;

    write_run(writer, &paragraph.text)?;

    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

/// One run holding the paragraph text, with `w:br` for newlines and `w:tab`
/// for tabs.
fn write_run(writer: &mut Writer<Cursor<Vec<u8>>>, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:r")))?;

    let mut rest = text;
    loop {
        match rest.find(&['\n', '\t'][..]) {
            Some(pos) => {
                let (head, tail) = rest.split_at(pos);
                if !head.is_empty() {
                    write_text(writer, head)?;
                }
                let mut chars = tail.chars();
                match chars.next() {
                    Some('\t') => writer.write_event(Event::Empty(BytesStart::new("w:tab")))?,
                    _ => writer.write_event(Event::Empty(BytesStart::new("w:br")))?,
                }
                rest = chars.as_str();
            }
            None => {
                if !rest.is_empty() {
                    write_text(writer, rest)?;
                }
                break;
            }
        }
    }

    writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    Ok(())
}

fn write_text(writer: &mut Writer<Cursor<Vec<u8>>>, text: &str) -> Result<()> {
    let mut t = BytesStart::new("w:t");
    t.push_attribute(("xml:space", "preserve"));
    writer.write_event(Event::Start(t))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("w:t")))?;
    Ok(())
}
