//! Source documents and the per-batch document pool
//!
//! A [`DocumentPool`] owns every document opened for one batch plus the
//! batch's single blank page. Dropping the pool releases all of them, so
//! every exit path out of a batch (success, `?`, unwinding) frees its
//! handles.

use crate::render::get_page_box;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use log::debug;
use std::path::{Path, PathBuf};

/// An opened, read-only source document with its page geometry
#[derive(Debug)]
pub struct SourceDocument {
    path: PathBuf,
    document: Document,
    page_ids: Vec<ObjectId>,
    page_boxes: Vec<Option<PageBox>>,
}

impl SourceDocument {
    /// Wrap an already-parsed document
    pub fn from_document(path: impl Into<PathBuf>, document: Document) -> Self {
        let page_ids: Vec<ObjectId> = document.get_pages().values().copied().collect();
        let page_boxes = page_ids
            .iter()
            .map(|&id| get_page_box(&document, id))
            .collect();
        Self {
            path: path.into(),
            document,
            page_ids,
            page_boxes,
        }
    }

    /// Parse a document from disk
    pub fn load(path: impl AsRef<Path>) -> lopdf::Result<Self> {
        let path = path.as_ref();
        let document = Document::load(path)?;
        Ok(Self::from_document(path, document))
    }

    /// A single empty page of the given size
    pub fn blank(size: PageSize) -> Self {
        Self::from_document(PathBuf::new(), blank_document(size))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn page_id(&self, index: usize) -> Option<ObjectId> {
        self.page_ids.get(index).copied()
    }

    /// Visible box and rotation of a page, `None` if the index is out of
    /// range or the MediaBox is missing or malformed
    pub fn page_box(&self, index: usize) -> Option<PageBox> {
        self.page_boxes.get(index).copied().flatten()
    }
}

/// Build a one-page document with an empty content stream
fn blank_document(size: PageSize) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let content_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(size.width_pt),
                Object::Real(size.height_pt),
            ]),
        ),
        ("Resources", Object::Dictionary(Dictionary::new())),
        ("Contents", Object::Reference(content_id)),
    ]));

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

/// All documents of one batch, plus the shared blank page
#[derive(Debug)]
pub struct DocumentPool {
    batch: usize,
    documents: Vec<SourceDocument>,
    blank: SourceDocument,
}

impl DocumentPool {
    /// Open every path of a batch, in order.
    ///
    /// Stops at the first document that cannot be parsed; documents opened
    /// before it are released before the error is returned.
    pub fn open(batch: usize, paths: &[PathBuf], blank_size: PageSize) -> Result<Self> {
        let mut documents = Vec::with_capacity(paths.len());

        for path in paths {
            match SourceDocument::load(path) {
                Ok(doc) => {
                    debug!(
                        "batch {}: opened {} ({} pages)",
                        batch,
                        path.display(),
                        doc.page_count()
                    );
                    documents.push(doc);
                }
                Err(source) => {
                    debug!(
                        "batch {}: releasing {} documents opened before {}",
                        batch,
                        documents.len(),
                        path.display()
                    );
                    drop(documents);
                    return Err(DuplexError::DocumentOpen {
                        batch,
                        path: path.clone(),
                        source,
                    });
                }
            }
        }

        Ok(Self::from_documents(batch, documents, blank_size))
    }

    /// Build a pool from documents that are already in memory
    pub fn from_documents(
        batch: usize,
        documents: Vec<SourceDocument>,
        blank_size: PageSize,
    ) -> Self {
        Self {
            batch,
            documents,
            blank: SourceDocument::blank(blank_size),
        }
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn documents(&self) -> &[SourceDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn blank(&self) -> &SourceDocument {
        &self.blank
    }

    /// Look up the document behind a source handle
    pub fn resolve(&self, source: SourceId) -> Option<&SourceDocument> {
        match source {
            SourceId::Document(index) => self.documents.get(index),
            SourceId::Blank => Some(&self.blank),
        }
    }

    /// Page box for a reference, `None` when it cannot be resolved
    pub fn page_box(&self, page: PageRef) -> Option<PageBox> {
        self.resolve(page.source)?.page_box(page.page_index)
    }
}

impl Drop for DocumentPool {
    fn drop(&mut self) {
        debug!(
            "batch {}: released {} documents and blank page",
            self.batch,
            self.documents.len()
        );
    }
}
