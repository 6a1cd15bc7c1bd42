use snap_label::{Catalog, ErrorKind, Label, NavigationSession, NavigationView, Stats};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"fake image data").expect("failed to write test file");
}

fn current_entry(view: &NavigationView) -> (i64, String, usize, usize) {
    match view {
        NavigationView::Current { entry, index, total, .. } => {
            (entry.id, entry.filename.clone(), *index, *total)
        }
        NavigationView::Empty { .. } => panic!("expected an image, got {view:?}"),
    }
}

#[test]
fn scan_label_and_finish() {
    let images = tempdir().unwrap();
    touch(images.path(), "a.jpg");
    touch(images.path(), "b.png");
    touch(images.path(), "c.txt");

    let db = tempdir().unwrap();
    let catalog = Catalog::open(db.path().join("labels.db")).unwrap();
    let mut session = NavigationSession::new();

    assert_eq!(catalog.ingest(images.path()).unwrap(), 2);
    session.reset();

    assert_eq!(
        catalog.stats().unwrap(),
        Stats { total: 2, ok: 0, ng: 0, unlabeled: 2, labeled: 0 }
    );

    let (a_id, name, index, total) = current_entry(&session.current(&catalog).unwrap());
    assert_eq!((name.as_str(), index, total), ("a.jpg", 0, 2));

    assert!(catalog.set_label(a_id, "OK").unwrap());

    let (b_id, name, index, total) = current_entry(&session.current(&catalog).unwrap());
    assert_eq!((name.as_str(), index, total), ("b.png", 0, 1));

    assert!(catalog.set_label(b_id, "NG").unwrap());

    let view = session.current(&catalog).unwrap();
    assert_eq!(
        view,
        NavigationView::Empty {
            stats: Stats { total: 2, ok: 1, ng: 1, unlabeled: 0, labeled: 2 },
            all_done: true,
        }
    );

    for entry in catalog.list_all().unwrap() {
        assert_eq!(entry.label().is_some(), entry.labeled_at().is_some());
    }
}

#[test]
fn rescanning_keeps_ids_and_labels() {
    let images = tempdir().unwrap();
    touch(images.path(), "a.jpg");
    touch(images.path(), "b.jpeg");

    let catalog = Catalog::open_in_memory().unwrap();
    assert_eq!(catalog.ingest(images.path()).unwrap(), 2);
    let first = catalog.list_all().unwrap();
    catalog.assign_label(first[0].id, Label::Ng).unwrap();
    let labeled = catalog.list_all().unwrap();

    assert_eq!(catalog.ingest(images.path()).unwrap(), 2);
    assert_eq!(catalog.list_all().unwrap(), labeled);
}

#[test]
fn invalid_input_is_reported() {
    let catalog = Catalog::open_in_memory().unwrap();
    let missing = tempdir().unwrap().path().join("gone");

    assert_eq!(catalog.ingest(&missing).unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(catalog.set_label(1, "MAYBE").unwrap_err().kind(), ErrorKind::InvalidInput);
    assert!(!catalog.set_label(1, "OK").unwrap());
}

#[test]
fn clearing_returns_to_nothing_scanned() {
    let images = tempdir().unwrap();
    touch(images.path(), "a.jpg");

    let catalog = Catalog::open_in_memory().unwrap();
    let mut session = NavigationSession::new();
    catalog.ingest(images.path()).unwrap();
    session.label_current(&catalog, Label::Ok).unwrap();

    catalog.clear_all().unwrap();
    session.reset();

    assert_eq!(catalog.stats().unwrap(), Stats::default());
    assert_eq!(
        session.current(&catalog).unwrap(),
        NavigationView::Empty { stats: Stats::default(), all_done: false }
    );
}

#[test]
fn entry_file_can_be_opened_for_serving() {
    use std::io::Read;

    let images = tempdir().unwrap();
    touch(images.path(), "part.PNG");

    let catalog = Catalog::open_in_memory().unwrap();
    catalog.ingest(images.path()).unwrap();
    let entry = catalog.list_all().unwrap().remove(0);

    assert_eq!(entry.media_type(), "image/png");
    assert_eq!(catalog.image_path(entry.id).unwrap().unwrap(), Path::new(&entry.path));

    let mut bytes = Vec::new();
    entry.open().unwrap().read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, b"fake image data");
}
