//! Shared helpers for the integration tests.
//!
//! PDFs are generated in memory so the suite needs no fixture files.

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};
use std::path::{Path, PathBuf};

use pdfdrop::Operation;
use pdfdrop::config::{Config, WorkspaceOptions};

/// Build a PDF whose pages show `"{label}-Page-{n}"`.
///
/// Every page carries its own MediaBox, `width` points wide.
pub fn labelled_pdf(label: &str, pages: u32, width: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|n| {
            let content = format!("BT /F1 18 Tf 72 720 Td ({label}-Page-{n}) Tj ET");
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), 792.into()],
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            });
            Object::Reference(page_id)
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("Failed to serialize test PDF");
    buffer
}

/// Write a labelled PDF into `dir`.
pub fn write_pdf(dir: &Path, name: &str, label: &str, pages: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, labelled_pdf(label, pages, 612)).expect("Failed to write test PDF");
    path
}

/// Write a PDF whose Standard security handler rejects the empty password.
pub fn write_locked_pdf(dir: &Path, name: &str, label: &str, pages: u32) -> PathBuf {
    let mut doc = Document::load_mem(&labelled_pdf(label, pages, 612))
        .expect("Failed to reload test PDF");
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "O" => Object::String(vec![0x4f; 32], StringFormat::Hexadecimal),
        "U" => Object::String(vec![0x55; 32], StringFormat::Hexadecimal),
        "P" => -44,
    });
    let file_id = Object::String(vec![0x11; 16], StringFormat::Hexadecimal);
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set("ID", vec![file_id.clone(), file_id]);

    let path = dir.join(name);
    doc.save(&path).expect("Failed to write locked test PDF");
    path
}

/// The `(...)` label of every page, in page order.
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("Output is not a readable PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).expect("Page has no content");
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').expect("No label") + 1;
            let end = text.find(')').expect("No label");
            text[start..end].to_string()
        })
        .collect()
}

/// Width of every page's MediaBox, in page order.
pub fn page_widths(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).expect("Output is not a readable PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).expect("Page is not a dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("Page has no MediaBox");
            media_box[2].as_i64().expect("MediaBox width is not an integer")
        })
        .collect()
}

/// A quiet run configuration writing into `output_dir`.
pub fn config(inputs: Vec<PathBuf>, output_dir: &Path, operation: Option<Operation>) -> Config {
    Config {
        inputs,
        output_dir: output_dir.to_path_buf(),
        operation,
        options: WorkspaceOptions::default(),
        verbose: false,
        quiet: true,
        json: false,
    }
}

/// Names of the files in `dir`, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to list directory")
        .map(|entry| {
            entry
                .expect("Failed to read directory entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
