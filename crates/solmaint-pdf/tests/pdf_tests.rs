//! Integration tests for solmaint-pdf against real files on disk

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use solmaint_domain::traits::TextSource;
use solmaint_pdf::{PdfError, PdfProcessor};
use std::fs;
use std::path::Path;

/// Write a PDF with one page per entry in `lines`
fn write_pdf(path: &Path, lines: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for line in lines {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
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
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let processor = PdfProcessor::new();

    let err = processor
        .extract_text(&dir.path().join("missing.pdf"))
        .unwrap_err();
    assert!(matches!(err, PdfError::NotFound(_)));
    assert!(!processor.is_readable(&dir.path().join("missing.pdf")));
}

#[test]
fn test_corrupt_file_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.pdf");
    fs::write(&path, b"not a pdf").unwrap();

    let processor = PdfProcessor::new();
    let err = processor.extract_text(&path).unwrap_err();
    assert!(matches!(err, PdfError::UnreadableDocument { .. }));
    assert!(matches!(
        processor.pdf_info(&path),
        Err(PdfError::UnreadableDocument { .. })
    ));
    assert!(!processor.is_readable(&path));
}

#[test]
fn test_extract_text_from_generated_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inverter.pdf");
    write_pdf(&path, &["SolarTech Inverter Datasheet"]);

    let processor = PdfProcessor::new();
    let text = TextSource::extract_text(&processor, &path).unwrap();
    assert!(text.contains("SolarTech"));
    assert!(processor.is_readable(&path));
}

#[test]
fn test_pdf_info_reports_pages_and_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two-pages.pdf");
    write_pdf(&path, &["First page text", "Second page text"]);

    let info = PdfProcessor::new().pdf_info(&path).unwrap();
    assert_eq!(info.pages, 2);
    assert_eq!(info.filename, "two-pages.pdf");
    assert_eq!(info.file_size, fs::metadata(&path).unwrap().len());
}
