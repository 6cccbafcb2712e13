//! Shared helpers: build minimal DOCX/DOTX archives on the fly

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml"/>"#,
    "</Types>"
);

pub const STYLES: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;

/// Escape text for inclusion in `w:t`
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Body XML with one paragraph per text; each text is split over two runs
/// so run merging is exercised
pub fn document_xml(paragraphs: &[&str]) -> String {
    let mut body = String::new();
    for text in paragraphs {
        if text.is_empty() {
            body.push_str("<w:p/>");
            continue;
        }
        let split = text
            .char_indices()
            .nth(text.chars().count() / 2)
            .map_or(text.len(), |(i, _)| i);
        let (head, tail) = text.split_at(split);
        body.push_str(&format!(
            concat!(
                r#"<w:p><w:pPr><w:jc w:val="left"/></w:pPr>"#,
                r#"<w:r><w:rPr><w:rFonts w:eastAsia="宋体"/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
                r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#
            ),
            escape(head),
            escape(tail)
        ));
    }
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            "<w:body>{}<w:sectPr/></w:body></w:document>"
        ),
        body
    )
}

/// Complete archive bytes for the given paragraphs
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", stored).unwrap();
    zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document_xml(paragraphs).as_bytes()).unwrap();
    zip.start_file("word/styles.xml", options).unwrap();
    zip.write_all(STYLES.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Write an archive for the given paragraphs to `path`
pub fn write_docx(path: &Path, paragraphs: &[&str]) {
    std::fs::write(path, docx_bytes(paragraphs)).unwrap();
}

/// The sample memo used across tests
pub fn sample_memo() -> Vec<&'static str> {
    vec![
        "致：中翼航空投资有限公司",
        "关于旅客投诉餐食异物相关事宜之法律备忘录",
        "",
        "我们，国浩律师（北京）事务所，接受中翼航空投资有限公司的委托，就旅客投诉餐食异物相关事宜，出具本备忘录。",
        "一、基本事实",
        "2026年1月8日，香港籍旅客林大荣在航班上用餐时发现异物。",
        "旅客随后前往顺义区医院就诊。",
        "旅客于2026年1月19日提出投诉。",
        "二、法律分析",
        "依据《民法典》，承运人负有安全保障义务。",
        "贵司应当核实餐食供应链。",
        "三、后续建议",
        "建议贵司保留相关证据。",
        "建议贵司与旅客积极沟通。",
        "国浩律师（北京）事务所",
        "2026年1月19日",
    ]
}
