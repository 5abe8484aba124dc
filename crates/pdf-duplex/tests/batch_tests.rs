use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pdf_duplex::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build a document whose pages carry a `% <label> p<index>` comment
fn create_test_pdf(label: &str, num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content = format!("% {} p{}\nq Q", label, i);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

fn write_test_pdf(dir: &Path, name: &str, num_pages: usize) -> PathBuf {
    let label = name.trim_end_matches(".pdf");
    let mut doc = create_test_pdf(label, num_pages);
    let path = dir.join(name);
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(&path, writer).unwrap();
    path
}

/// Labels of the pages drawn on a sheet, left half first
fn drawn_labels(doc: &Document, page_id: ObjectId) -> Vec<String> {
    let page = doc.get_dictionary(page_id).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();

    let mut labels = Vec::new();
    for name in [b"P0".as_slice(), b"P1".as_slice()] {
        if let Ok(reference) = xobjects.get(name) {
            let stream = doc
                .get_object(reference.as_reference().unwrap())
                .unwrap()
                .as_stream()
                .unwrap();
            let content = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            let text = String::from_utf8_lossy(&content);
            let label = text
                .lines()
                .next()
                .unwrap()
                .trim_start_matches("% ")
                .to_string();
            labels.push(label);
        }
    }
    labels
}

fn sheets(path: &Path) -> Vec<Vec<String>> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| drawn_labels(&doc, id))
        .collect()
}

fn options_with_capacity(batch_capacity: usize) -> DuplexOptions {
    DuplexOptions {
        batch_capacity,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_scenario_short_document_padding() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let d1 = write_test_pdf(input.path(), "d1.pdf", 5);
    let d2 = write_test_pdf(input.path(), "d2.pdf", 1);

    let imposer = BatchImposer::new(options_with_capacity(2)).unwrap();
    let report = imposer.run(&[d1, d2], output.path()).await.unwrap();

    assert_eq!(report.batches.len(), 1);
    let batch = &report.batches[0];
    assert_eq!(batch.ordinal, 1);
    assert_eq!(batch.front_sheets, 2);
    assert_eq!(batch.back_sheets, 2);
    assert_eq!(batch.blank_substitutions, 3);

    let front = sheets(&output.path().join("first_pages_group_1.pdf"));
    assert_eq!(front, vec![vec!["d1 p0", "d1 p1"], vec!["d2 p0"]]);

    let back = sheets(&output.path().join("last_pages_group_1.pdf"));
    assert_eq!(back, vec![Vec::<String>::new(), vec!["d1 p2".into(), "d1 p3".into()]]);
}

#[tokio::test]
async fn test_empty_input_produces_nothing() {
    let output = TempDir::new().unwrap();
    let imposer = BatchImposer::new(DuplexOptions::default()).unwrap();

    let report = imposer.run(&[], output.path()).await.unwrap();

    assert!(report.batches.is_empty());
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_empty_directory_scans_to_zero_documents() {
    let input = TempDir::new().unwrap();
    let missing = input.path().join("does-not-exist");

    assert!(scan_input_dir(input.path(), "pdf").await.unwrap().is_empty());
    assert!(scan_input_dir(&missing, "pdf").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_document_aborts_its_batch_only() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let a = write_test_pdf(input.path(), "a.pdf", 4);
    let b = write_test_pdf(input.path(), "b.pdf", 4);
    let broken = input.path().join("c.pdf");
    std::fs::write(&broken, b"").unwrap();

    let imposer = BatchImposer::new(options_with_capacity(2)).unwrap();
    let result = imposer.run(&[a, b, broken.clone()], output.path()).await;

    match result {
        Err(DuplexError::DocumentOpen { batch, path, .. }) => {
            assert_eq!(batch, 2);
            assert_eq!(path, broken);
        }
        other => panic!("Expected DocumentOpen error, got {:?}", other),
    }

    // The first batch was written completely before the failure
    assert!(output.path().join("first_pages_group_1.pdf").exists());
    assert!(output.path().join("last_pages_group_1.pdf").exists());
    assert!(!output.path().join("first_pages_group_2.pdf").exists());
    assert!(!output.path().join("last_pages_group_2.pdf").exists());
}

#[tokio::test]
async fn test_batches_are_numbered_from_one() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let paths: Vec<PathBuf> = (0..7)
        .map(|i| write_test_pdf(input.path(), &format!("doc{}.pdf", i), 4))
        .collect();

    let imposer = BatchImposer::new(options_with_capacity(3)).unwrap();
    let report = imposer.run(&paths, output.path()).await.unwrap();

    let ordinals: Vec<usize> = report.batches.iter().map(|b| b.ordinal).collect();
    assert_eq!(ordinals, vec![1, 2, 3]);
    let sizes: Vec<usize> = report.batches.iter().map(|b| b.documents).collect();
    assert_eq!(sizes, vec![3, 3, 1]);

    for batch in &report.batches {
        assert_eq!(batch.front_sheets, batch.documents);
        assert_eq!(batch.back_sheets, batch.documents);
    }

    assert_eq!(report.written_files().len(), 6);
    for name in ["first_pages_group_3.pdf", "last_pages_group_3.pdf"] {
        assert!(output.path().join(name).exists(), "missing {}", name);
    }
}

#[tokio::test]
async fn test_back_pairs_are_reversed_by_document() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let paths = vec![
        write_test_pdf(input.path(), "a.pdf", 4),
        write_test_pdf(input.path(), "b.pdf", 4),
        write_test_pdf(input.path(), "c.pdf", 3),
    ];

    let imposer = BatchImposer::new(DuplexOptions::default()).unwrap();
    imposer.run(&paths, output.path()).await.unwrap();

    let front = sheets(&output.path().join("first_pages_group_1.pdf"));
    assert_eq!(
        front,
        vec![
            vec!["a p0", "a p1"],
            vec!["b p0", "b p1"],
            vec!["c p0", "c p1"],
        ]
    );

    let back = sheets(&output.path().join("last_pages_group_1.pdf"));
    assert_eq!(
        back,
        vec![
            vec!["c p2".to_string()],
            vec!["b p2".to_string(), "b p3".to_string()],
            vec!["a p2".to_string(), "a p3".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_output_directory_is_created_and_no_temp_files_remain() {
    let input = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let output = root.path().join("nested").join("out");
    let paths = vec![write_test_pdf(input.path(), "a.pdf", 2)];

    let imposer = BatchImposer::new(DuplexOptions::default()).unwrap();
    imposer.run(&paths, &output).await.unwrap();

    let mut names: Vec<String> = std::fs::read_dir(&output)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["first_pages_group_1.pdf", "last_pages_group_1.pdf"]);
}

#[tokio::test]
async fn test_rerun_reproduces_sheet_geometry() {
    let input = TempDir::new().unwrap();
    let paths = vec![
        write_test_pdf(input.path(), "a.pdf", 5),
        write_test_pdf(input.path(), "b.pdf", 1),
    ];
    let options = DuplexOptions::default();

    let first = impose_batch(1, &paths, &options).unwrap();
    let second = impose_batch(1, &paths, &options).unwrap();

    assert_eq!(first.front_sheets, second.front_sheets);
    assert_eq!(first.back_sheets, second.back_sheets);

    for (a, b) in [(&first.front, &second.front), (&first.back, &second.back)] {
        let a = Document::load_mem(a.as_ref().unwrap()).unwrap();
        let b = Document::load_mem(b.as_ref().unwrap()).unwrap();
        let contents_a: Vec<Vec<u8>> = a
            .get_pages()
            .values()
            .map(|&id| a.get_page_content(id).unwrap())
            .collect();
        let contents_b: Vec<Vec<u8>> = b
            .get_pages()
            .values()
            .map(|&id| b.get_page_content(id).unwrap())
            .collect();
        assert_eq!(contents_a, contents_b);
    }
}

#[tokio::test]
async fn test_sheets_have_fixed_landscape_size() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let paths = vec![write_test_pdf(input.path(), "a.pdf", 4)];

    let imposer = BatchImposer::new(DuplexOptions::default()).unwrap();
    let report = imposer.run(&paths, output.path()).await.unwrap();

    for path in report.written_files() {
        let doc = Document::load(&path).unwrap();
        for (_, page_id) in doc.get_pages() {
            let page = doc.get_dictionary(page_id).unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            assert!((media_box[2].as_float().unwrap() - 841.89).abs() < 0.01);
            assert!((media_box[3].as_float().unwrap() - 595.28).abs() < 0.01);
        }
    }
}

#[test]
fn test_invalid_options_are_rejected() {
    let result = BatchImposer::new(options_with_capacity(0));
    assert!(matches!(result, Err(DuplexError::Config(_))));
}
