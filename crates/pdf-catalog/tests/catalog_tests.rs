use lopdf::Document;
use pdf_catalog::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_names_from_paths_strips_extension() {
    let paths = vec![
        PathBuf::from("/in/Ivanov_report.pdf"),
        PathBuf::from("scan 2.PDF"),
        PathBuf::from("notes"),
    ];
    assert_eq!(
        names_from_paths(&paths),
        vec!["Ivanov_report", "scan 2", "notes"]
    );
}

#[tokio::test]
async fn test_load_names_from_csv_uses_first_column() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("names.csv");
    tokio::fs::write(&path, "name,comment\nAlpha,first\n  ,skipped\nBeta,second\n")
        .await
        .unwrap();

    let names = load_names_from_csv(&path).await.unwrap();
    assert_eq!(names, vec!["Alpha", "Beta"]);
}

#[tokio::test]
async fn test_load_names_from_missing_csv() {
    let temp = TempDir::new().unwrap();
    match load_names_from_csv(temp.path().join("missing.csv")).await {
        Err(CatalogError::Io(_)) => {}
        other => panic!("Expected Io error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_single_page_catalog() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("file_list.pdf");
    let names: Vec<String> = (1..=30).map(|i| format!("Document {}", i)).collect();

    let layout = generate_pdf(&names, &CatalogOptions::default(), &output)
        .await
        .unwrap();

    assert!(layout.fits_one_page);
    let doc = Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[tokio::test]
async fn test_generate_paginated_catalog() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("file_list.pdf");
    let names: Vec<String> = (0..1500).map(|i| format!("doc-{:05}", i)).collect();

    let layout = generate_pdf(&names, &CatalogOptions::default(), &output)
        .await
        .unwrap();

    assert!(!layout.fits_one_page);
    let doc = Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), layout.pages);
}

#[test]
fn test_empty_catalog_has_one_page() {
    let (bytes, layout) = generate_catalog_pdf_bytes(&[], &CatalogOptions::default()).unwrap();
    assert_eq!(layout.pages, 1);

    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_invalid_options_are_rejected() {
    let options = CatalogOptions {
        margin_left_mm: 150.0,
        margin_right_mm: 150.0,
        ..Default::default()
    };
    match fit_layout(&["a".to_string()], &options) {
        Err(CatalogError::Config(_)) => {}
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_letter_paper_changes_dimensions() {
    let options = CatalogOptions::default().with_paper(PaperType::Letter);
    assert_eq!(options.page_width_mm, 215.9);
    assert_eq!(options.page_height_mm, 279.4);
    assert_eq!(PaperType::Letter.name(), "Letter");
}

const SYSTEM_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

// Embedded-font tests need a TrueType font from the host
fn system_font() -> Option<PathBuf> {
    let path = PathBuf::from(SYSTEM_FONT);
    if path.exists() {
        Some(path)
    } else {
        eprintln!("{} not found, skipping", SYSTEM_FONT);
        None
    }
}

#[tokio::test]
async fn test_catalog_with_embedded_font_keeps_cyrillic_names() {
    let Some(font_file) = system_font() else {
        return;
    };
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("file_list.pdf");
    let names = vec!["Иванов".to_string(), "Петрова".to_string(), "Smith".to_string()];
    let options = CatalogOptions {
        font_file: Some(font_file),
        ..Default::default()
    };

    let layout = generate_pdf(&names, &options, &output).await.unwrap();
    assert!(layout.fits_one_page);

    let doc = Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
    let has_descriptor = doc.objects.values().any(|obj| {
        obj.as_dict()
            .ok()
            .and_then(|dict| dict.get(b"Type").ok())
            .and_then(|t| t.as_name().ok())
            == Some(b"FontDescriptor".as_slice())
    });
    assert!(has_descriptor);
}

#[test]
fn test_font_widths_come_from_glyph_advances() {
    let Some(font_file) = system_font() else {
        return;
    };
    let bytes = std::fs::read(font_file).unwrap();
    let face = pdf_catalog::font::parse_face(&bytes).unwrap();

    let a = pdf_catalog::font::text_width_em(&face, "И");
    let b = pdf_catalog::font::text_width_em(&face, "в");
    assert!(a > 0.0 && b > 0.0);
    assert!((pdf_catalog::font::text_width_em(&face, "Ив") - (a + b)).abs() < 1e-5);
}

#[tokio::test]
async fn test_unparseable_font_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let font_file = temp.path().join("broken.ttf");
    tokio::fs::write(&font_file, b"not a font").await.unwrap();
    let options = CatalogOptions {
        font_file: Some(font_file),
        ..Default::default()
    };

    let result = generate_pdf(&["a".to_string()], &options, temp.path().join("out.pdf")).await;
    match result {
        Err(CatalogError::Font(_)) => {}
        other => panic!("Expected Font error, got {:?}", other),
    }
    assert!(!temp.path().join("out.pdf").exists());
}
