//! Positioned text-run extraction from PDF content streams.
//!
//! Emirates NBD statements are PDFs without any native table structure, so the
//! extractor needs every text fragment together with its page coordinates.
//! This module walks the content stream text operators and emits one
//! [`TextRun`] per show operation; [`crate::layout`] turns runs into rows.

use lopdf::content::Content;
use lopdf::{Document, Object};

use crate::error::Result;

/// One positioned text fragment. Coordinates are in PDF user space, with the
/// y axis growing upward from the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// 1-based page number.
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Extract all text runs from a PDF document, in content-stream order.
///
/// # Arguments
///
/// * `bytes` - The raw PDF file content
///
/// # Examples
///
/// ```no_run
/// let bytes = std::fs::read("statement.pdf")?;
/// let runs = uae2ynab::pdf_text::extract_runs(&bytes)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn extract_runs(bytes: &[u8]) -> Result<Vec<TextRun>> {
    let doc = Document::load_mem(bytes)?;
    runs_from_document(&doc)
}

pub(crate) fn runs_from_document(doc: &Document) -> Result<Vec<TextRun>> {
    let mut runs = Vec::new();

    for (page_no, page_id) in doc.get_pages() {
        let data = doc.get_page_content(page_id)?;
        let content = Content::decode(&data)?;

        // Text cursor state. Only the translation components of the text
        // matrix are tracked; statement tables position every cell with
        // Td/Tm, so glyph-level advances inside a single show operation are
        // not modeled.
        let mut line_x = 0.0;
        let mut line_y = 0.0;
        let mut leading = 12.0;

        for op in &content.operations {
            match op.operator.as_str() {
                "BT" => {
                    line_x = 0.0;
                    line_y = 0.0;
                }
                "Tm" => {
                    if let (Some(e), Some(f)) =
                        (number(op.operands.get(4)), number(op.operands.get(5)))
                    {
                        line_x = e;
                        line_y = f;
                    }
                }
                "Td" => {
                    if let (Some(tx), Some(ty)) =
                        (number(op.operands.get(0)), number(op.operands.get(1)))
                    {
                        line_x += tx;
                        line_y += ty;
                    }
                }
                "TD" => {
                    if let (Some(tx), Some(ty)) =
                        (number(op.operands.get(0)), number(op.operands.get(1)))
                    {
                        line_x += tx;
                        line_y += ty;
                        leading = -ty;
                    }
                }
                "TL" => {
                    if let Some(l) = number(op.operands.get(0)) {
                        leading = l;
                    }
                }
                "T*" => {
                    line_y -= leading;
                }
                "Tj" => {
                    push_run(&mut runs, page_no, line_x, line_y, op.operands.first());
                }
                "'" => {
                    line_y -= leading;
                    push_run(&mut runs, page_no, line_x, line_y, op.operands.first());
                }
                "\"" => {
                    line_y -= leading;
                    push_run(&mut runs, page_no, line_x, line_y, op.operands.get(2));
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = op.operands.first() {
                        let mut text = String::new();
                        for item in items {
                            if let Object::String(bytes, _) = item {
                                text.push_str(&decode_text(bytes));
                            }
                        }
                        if !text.trim().is_empty() {
                            runs.push(TextRun { page: page_no, x: line_x, y: line_y, text });
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Ok(runs)
}

fn push_run(runs: &mut Vec<TextRun>, page: u32, x: f64, y: f64, operand: Option<&Object>) {
    if let Some(Object::String(bytes, _)) = operand {
        let text = decode_text(bytes);
        if !text.trim().is_empty() {
            runs.push(TextRun { page, x, y, text });
        }
    }
}

fn number(operand: Option<&Object>) -> Option<f64> {
    match operand {
        Some(Object::Integer(i)) => Some(*i as f64),
        Some(Object::Real(r)) => Some(*r as f64),
        _ => None,
    }
}

// Statement PDFs from UAE retail banks use ASCII-compatible single-byte
// encodings; anything that is not valid UTF-8 falls back to Latin-1.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Fixture builders shared by the PDF-facing test modules.
#[cfg(test)]
pub(crate) mod testutil {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build an in-memory document with one page per operation list.
    pub(crate) fn doc_with_pages(pages: Vec<Vec<Operation>>) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for operations in pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    pub(crate) fn single_page_doc(operations: Vec<Operation>) -> Document {
        doc_with_pages(vec![operations])
    }

    /// Serialized bytes of a single-page document, for byte-level entry points.
    pub(crate) fn doc_bytes(pages: Vec<Vec<Operation>>) -> Vec<u8> {
        let mut doc = doc_with_pages(pages);
        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("serialize test pdf");
        buf
    }

    /// A text cell positioned at `(x, y)`.
    pub(crate) fn text_at(x: i64, y: i64, text: &str) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::single_page_doc;
    use super::*;
    use lopdf::content::Operation;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_td_positions_runs() {
        let doc = single_page_doc(vec![
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal("01 Mar 2024")]),
            Operation::new("Td", vec![100.into(), 0.into()]),
            Operation::new("Tj", vec![Object::string_literal("SALARY")]),
            Operation::new("ET", vec![]),
        ]);

        let runs = runs_from_document(&doc).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "01 Mar 2024");
        assert_eq!(runs[0].x, 72.0);
        assert_eq!(runs[0].y, 720.0);
        assert_eq!(runs[1].text, "SALARY");
        assert_eq!(runs[1].x, 172.0);
        assert_eq!(runs[1].y, 720.0);
    }

    #[test]
    fn test_tstar_moves_down_by_leading() {
        let doc = single_page_doc(vec![
            Operation::new("BT", vec![]),
            Operation::new("TL", vec![14.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal("first")]),
            Operation::new("T*", vec![]),
            Operation::new("Tj", vec![Object::string_literal("second")]),
            Operation::new("ET", vec![]),
        ]);

        let runs = runs_from_document(&doc).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].y, 686.0);
        assert_eq!(runs[1].x, 72.0);
    }

    #[test]
    fn test_tj_array_concatenates_strings() {
        let doc = single_page_doc(vec![
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![72.into(), 500.into()]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("CAR"),
                    Object::Integer(-20),
                    Object::string_literal("REFOUR"),
                ])],
            ),
            Operation::new("ET", vec![]),
        ]);

        let runs = runs_from_document(&doc).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "CARREFOUR");
    }
}
