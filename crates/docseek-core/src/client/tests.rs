use std::fs;

use tempfile::tempdir;

use crate::config::{AppConfig, ProviderKind};

use super::DocSeek;

fn offline_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.provider.kind = ProviderKind::Offline;
    config
}

#[test]
fn end_to_end_index_and_search() {
    let temp = tempdir().expect("tempdir");
    let corpus = temp.path().join("corpus");
    fs::create_dir_all(&corpus).expect("mkdir");
    fs::write(
        corpus.join("Q1 Report.md"),
        "# Q1 Report\n\nRevenue grew 10% while costs fell.",
    )
    .expect("write report");
    fs::write(corpus.join("groceries.txt"), "milk eggs bread").expect("write groceries");

    let app = DocSeek::open(&temp.path().join("state"), offline_config()).expect("open");
    let report = app.index_folder(&corpus).expect("index");
    assert_eq!(report.indexed, 2);

    let results = app.search("Q1 report", 5).expect("search");
    assert_eq!(results.len(), 1);
    assert!(results[0].document.path.ends_with("Q1 Report.md"));
    assert!(results[0].snippet.contains("Q1 Report"));
    assert!((0.0..=1.0).contains(&results[0].score));
}

#[test]
fn reindex_after_edit_keeps_id_and_single_record() {
    let temp = tempdir().expect("tempdir");
    let corpus = temp.path().join("corpus");
    fs::create_dir_all(&corpus).expect("mkdir");
    let file = corpus.join("notes.txt");
    fs::write(&file, "first draft").expect("write");

    let app = DocSeek::open(&temp.path().join("state"), offline_config()).expect("open");
    app.index_folder(&corpus).expect("first");
    let before = app.documents(10).expect("docs");
    assert_eq!(before.len(), 1);

    fs::write(&file, "second draft with budget").expect("rewrite");
    let later = std::time::SystemTime::now() + std::time::Duration::from_secs(5);
    fs::File::options()
        .write(true)
        .open(&file)
        .expect("open file")
        .set_modified(later)
        .expect("touch");

    let report = app.index_folder(&corpus).expect("second");
    assert_eq!(report.indexed, 1);
    let after = app.documents(10).expect("docs");
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, before[0].id);
    assert_eq!(after[0].extracted_text, "second draft with budget");
}

#[test]
fn state_survives_reopen() {
    let temp = tempdir().expect("tempdir");
    let corpus = temp.path().join("corpus");
    fs::create_dir_all(&corpus).expect("mkdir");
    fs::write(corpus.join("budget.txt"), "annual budget").expect("write");
    let state = temp.path().join("state");

    {
        let app = DocSeek::open(&state, offline_config()).expect("open");
        app.index_folder(&corpus).expect("index");
    }

    let reopened = DocSeek::open(&state, offline_config()).expect("reopen");
    assert_eq!(reopened.status().expect("status").documents, 1);
    assert_eq!(reopened.search("budget", 3).expect("search").len(), 1);
    assert_eq!(reopened.index_folder(&corpus).expect("reindex").indexed, 0);
}

#[test]
fn prune_removes_records_for_deleted_files() {
    let temp = tempdir().expect("tempdir");
    let corpus = temp.path().join("corpus");
    fs::create_dir_all(&corpus).expect("mkdir");
    fs::write(corpus.join("keep.txt"), "keep").expect("write");
    fs::write(corpus.join("gone.txt"), "gone").expect("write");

    let app = DocSeek::open(&temp.path().join("state"), offline_config()).expect("open");
    app.index_folder(&corpus).expect("index");
    fs::remove_file(corpus.join("gone.txt")).expect("remove");

    let removed = app.prune_missing().expect("prune");
    assert_eq!(removed.len(), 1);
    assert!(removed[0].ends_with("gone.txt"));
    assert_eq!(app.status().expect("status").documents, 1);
    assert!(app.prune_missing().expect("prune again").is_empty());
}

#[test]
fn remove_and_status_report_store_state() {
    let temp = tempdir().expect("tempdir");
    let corpus = temp.path().join("corpus");
    fs::create_dir_all(&corpus).expect("mkdir");
    fs::write(corpus.join("a.txt"), "alpha").expect("write");

    let app = DocSeek::open(&temp.path().join("state"), offline_config()).expect("open");
    app.index_folder(&corpus).expect("index");
    let path = app.documents(1).expect("docs")[0].path.clone();

    let status = app.status().expect("status");
    assert_eq!(status.backend, "sqlite");
    assert_eq!(status.provider, "offline");
    assert_eq!(status.documents, 1);

    assert!(app.remove(&path).expect("remove"));
    assert!(!app.remove(&path).expect("remove twice"));
    assert!(app.document(&path).expect("get").is_none());
}

#[test]
fn empty_store_search_is_empty_not_an_error() {
    let temp = tempdir().expect("tempdir");
    let app = DocSeek::open(temp.path(), offline_config()).expect("open");
    assert!(app.search("anything at all", 10).expect("search").is_empty());
    assert!(app.search("", 10).expect("blank").is_empty());
}

#[cfg(target_os = "linux")]
#[test]
fn prune_keeps_live_files_next_to_non_utf8_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = tempdir().expect("tempdir");
    let corpus = temp.path().join("corpus");
    fs::create_dir_all(&corpus).expect("mkdir");
    fs::write(corpus.join(OsStr::from_bytes(b"budget-\xff.txt")), "first").expect("write");
    fs::write(corpus.join(OsStr::from_bytes(b"budget-\xfe.txt")), "second").expect("write");
    fs::write(corpus.join("budget.txt"), "annual budget").expect("write");

    let app = DocSeek::open(&temp.path().join("state"), offline_config()).expect("open");
    let report = app.index_folder(&corpus).expect("index");
    assert_eq!(report.indexed, 1);
    assert_eq!(report.failed, 2);

    assert!(app.prune_missing().expect("prune").is_empty());
    assert_eq!(app.status().expect("status").documents, 1);
}
