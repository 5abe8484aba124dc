use std::path::Path;

/// Stamp text for a document: its file stem up to the first underscore
pub fn label_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.split_once('_') {
        Some((head, _)) => head.to_string(),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_stops_at_first_underscore() {
        assert_eq!(label_for(Path::new("in/Smith_J_2024.pdf")), "Smith");
        assert_eq!(label_for(Path::new("Report.pdf")), "Report");
        assert_eq!(label_for(Path::new("_draft.pdf")), "");
    }
}
