//! Integration tests for error handling and edge cases.

use pdfdrop::Operation;
use pdfdrop::PdfDropError;
use pdfdrop::download::MemorySink;
use pdfdrop::intake::RawFile;
use pdfdrop::workspace::Workspace;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

use pdfdrop::merge::MergeError;

use crate::common::{config, dir_entries, labelled_pdf, write_locked_pdf, write_pdf};

fn pdf_batch(count: usize) -> Vec<RawFile> {
    (0..count)
        .map(|i| RawFile::pdf(format!("file{i}.pdf"), labelled_pdf("F", 1, 612)))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_eleven_files_rejected_then_error_clears() {
    let mut workspace = Workspace::default();

    let err = workspace.drop_files(pdf_batch(11)).unwrap_err();

    assert!(matches!(err, PdfDropError::TooManyFiles { limit: 10 }));
    assert!(workspace.files().is_empty());
    assert_eq!(
        workspace.view().error.as_deref(),
        Some("You can only add up to 10 files")
    );

    tokio::time::sleep(Duration::from_millis(2999)).await;
    assert!(workspace.error().is_some());

    tokio::time::sleep(Duration::from_millis(1)).await;
    tokio::task::yield_now().await;
    assert!(workspace.error().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_second_error_restarts_the_timer() {
    let mut workspace = Workspace::default();
    workspace.pick_files(pdf_batch(9)).unwrap();

    let _ = workspace.pick_files(pdf_batch(2));
    tokio::time::sleep(Duration::from_millis(2000)).await;

    workspace.set_selected_operation(Some(Operation::Split));
    let mut sink = MemorySink::new();
    let _ = workspace.continue_with(&mut sink).await;
    assert_eq!(
        workspace.error().as_deref(),
        Some("Split operation only accepts one PDF file")
    );

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(
        workspace.error().as_deref(),
        Some("Split operation only accepts one PDF file")
    );

    tokio::time::sleep(Duration::from_millis(1500)).await;
    tokio::task::yield_now().await;
    assert!(workspace.error().is_none());
}

#[tokio::test]
async fn test_limit_reached_across_batches() {
    let mut workspace = Workspace::default();
    workspace.pick_files(pdf_batch(8)).unwrap();

    assert!(workspace.drop_files(pdf_batch(3)).is_err());
    assert_eq!(workspace.files().len(), 8);

    workspace.drop_files(pdf_batch(2)).unwrap();
    assert_eq!(workspace.files().len(), 10);
}

#[tokio::test]
async fn test_non_pdf_files_are_dropped_silently() {
    let mut workspace = Workspace::default();

    let ids = workspace
        .drop_files(vec![
            RawFile::from_name("notes.txt", b"hello".to_vec()),
            RawFile::from_name("scan.pdf", labelled_pdf("S", 1, 612)),
            RawFile::new("photo.pdf", "image/png", Vec::new()),
        ])
        .unwrap();

    assert_eq!(ids.len(), 1);
    assert_eq!(workspace.files()[0].name, "scan.pdf");
    assert!(workspace.error().is_none());
}

#[tokio::test]
async fn test_split_with_two_files() {
    let inputs = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let a = write_pdf(inputs.path(), "a.pdf", "A", 1);
    let b = write_pdf(inputs.path(), "b.pdf", "B", 1);

    let err = pdfdrop::run(&config(vec![a, b], output.path(), Some(Operation::Split)))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Split operation only accepts one PDF file");
    assert!(err.is_validation());
    assert!(dir_entries(output.path()).is_empty());
}

#[tokio::test]
async fn test_no_operation_selected() {
    let inputs = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let a = write_pdf(inputs.path(), "a.pdf", "A", 1);
    let b = write_pdf(inputs.path(), "b.pdf", "B", 1);

    let err = pdfdrop::run(&config(vec![a, b], output.path(), None))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfDropError::NoOperationSelected));
    assert!(dir_entries(output.path()).is_empty());
}

#[tokio::test]
async fn test_merge_with_one_file() {
    let inputs = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let a = write_pdf(inputs.path(), "a.pdf", "A", 3);

    let err = pdfdrop::run(&config(vec![a], output.path(), Some(Operation::Merge)))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Please add at least 2 PDFs to merge");
}

#[tokio::test]
async fn test_too_many_files_from_disk() {
    let inputs = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let paths: Vec<PathBuf> = (0..11)
        .map(|i| write_pdf(inputs.path(), &format!("f{i:02}.pdf"), "F", 1))
        .collect();

    let err = pdfdrop::run(&config(paths, output.path(), Some(Operation::Merge)))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfDropError::TooManyFiles { limit: 10 }));
    assert_eq!(err.exit_code(), 1);
    assert!(dir_entries(output.path()).is_empty());
}

#[tokio::test]
async fn test_corrupt_pdf_fails_generically() {
    let inputs = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let good = write_pdf(inputs.path(), "good.pdf", "G", 1);
    let bad = inputs.path().join("bad.pdf");
    std::fs::write(&bad, b"%PDF-1.7\nthis is not a pdf body").unwrap();

    let err = pdfdrop::run(&config(vec![good, bad], output.path(), Some(Operation::Merge)))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Error merging PDFs. Please try again.");
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(err.exit_code(), 6);
    assert!(dir_entries(output.path()).is_empty());
}

#[tokio::test]
async fn test_locked_pdf_is_not_merged() {
    let inputs = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let open = write_pdf(inputs.path(), "open.pdf", "O", 1);
    let locked = write_locked_pdf(inputs.path(), "locked.pdf", "L", 2);

    let err = pdfdrop::run(&config(vec![open, locked], output.path(), Some(Operation::Merge)))
        .await
        .unwrap_err();

    let PdfDropError::MergeFailed(MergeError::Encrypted { name }) = &err else {
        panic!("expected an encrypted-input failure, got {err:?}");
    };
    assert_eq!(name, "locked.pdf");
    assert_eq!(err.to_string(), "Error merging PDFs. Please try again.");
    assert_eq!(err.exit_code(), 6);
    assert!(dir_entries(output.path()).is_empty());
}

#[tokio::test]
async fn test_eleven_paths_rejected_before_reading() {
    let inputs = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut paths: Vec<PathBuf> = (0..10)
        .map(|i| write_pdf(inputs.path(), &format!("f{i:02}.pdf"), "F", 1))
        .collect();
    paths.push(inputs.path().join("never-written.pdf"));

    let err = pdfdrop::run(&config(paths, output.path(), Some(Operation::Merge)))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfDropError::TooManyFiles { limit: 10 }));
    assert!(dir_entries(output.path()).is_empty());
}

#[tokio::test]
async fn test_missing_input_file() {
    let output = TempDir::new().unwrap();

    let err = pdfdrop::run(&config(
        vec![PathBuf::from("/nonexistent/input.pdf")],
        output.path(),
        Some(Operation::Merge),
    ))
    .await
    .unwrap_err();

    assert!(matches!(err, PdfDropError::FailedToReadInput { .. }));
}

#[tokio::test]
async fn test_failed_trigger_releases_url() {
    let mut workspace = Workspace::default();
    workspace.set_selected_operation(Some(Operation::Merge));
    workspace.pick_files(pdf_batch(2)).unwrap();

    let mut sink = MemorySink::failing_trigger();
    let err = workspace.continue_with(&mut sink).await.unwrap_err();

    assert!(matches!(err, PdfDropError::MergeFailed(_)));
    assert_eq!(sink.live_urls(), 0);
    assert_eq!(sink.revoked(), 1);
    assert!(!workspace.is_processing());
}
