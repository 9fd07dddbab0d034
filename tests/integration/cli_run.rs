//! Integration tests driving runs through the command-line surface.

use clap::Parser;
use pdfdrop::PdfDropError;
use pdfdrop::cli::Cli;
use serial_test::serial;
use tempfile::TempDir;

use crate::common::{dir_entries, page_labels, write_pdf};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("pdfdrop").chain(args.iter().copied()))
        .expect("Failed to parse arguments")
}

#[tokio::test]
#[serial]
async fn test_cli_merge_with_short_operation_name() {
    let inputs = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let a = write_pdf(inputs.path(), "a.pdf", "A", 1);
    let b = write_pdf(inputs.path(), "b.pdf", "B", 2);

    let cli = parse(&[
        "-q",
        "-p",
        "merge",
        "-o",
        &output.path().to_string_lossy(),
        &a.to_string_lossy(),
        &b.to_string_lossy(),
    ]);
    cli.validate().unwrap();
    let config = cli.to_config().await.unwrap();
    pdfdrop::run(&config).await.unwrap();

    let bytes = std::fs::read(output.path().join("merged.pdf")).unwrap();
    assert_eq!(page_labels(&bytes), ["A-Page-1", "B-Page-1", "B-Page-2"]);
}

#[tokio::test]
#[serial]
async fn test_cli_options_file_lowers_limit() {
    let inputs = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let options = inputs.path().join("options.json");
    std::fs::write(&options, r#"{ "max_files": 2 }"#).unwrap();
    let files: Vec<String> = (0..3)
        .map(|i| {
            write_pdf(inputs.path(), &format!("f{i}.pdf"), "F", 1)
                .to_string_lossy()
                .into_owned()
        })
        .collect();

    let mut args = vec![
        "-q".to_string(),
        "-p".to_string(),
        "merge-pdf".to_string(),
        "-c".to_string(),
        options.to_string_lossy().into_owned(),
        "-o".to_string(),
        output.path().to_string_lossy().into_owned(),
    ];
    args.extend(files);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let config = parse(&args).to_config().await.unwrap();
    let err = pdfdrop::run(&config).await.unwrap_err();

    assert!(matches!(err, PdfDropError::TooManyFiles { limit: 2 }));
    assert_eq!(err.to_string(), "You can only add up to 2 files");
    assert!(dir_entries(output.path()).is_empty());
}

#[tokio::test]
#[serial]
async fn test_cli_json_report() {
    let inputs = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let a = write_pdf(inputs.path(), "a.pdf", "A", 1);

    let cli = parse(&[
        "--json",
        "-p",
        "convert-pdf",
        "-o",
        &output.path().to_string_lossy(),
        &a.to_string_lossy(),
    ]);
    let config = cli.to_config().await.unwrap();
    let report = pdfdrop::run(&config).await.unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcome"]["status"], "not_implemented");
    assert_eq!(json["outcome"]["operation"], "convert-pdf");
    assert_eq!(json["workspace"]["files"][0]["name"], "a.pdf");
    assert_eq!(json["workspace"]["show_file_list"], true);
}

#[tokio::test]
#[serial]
async fn test_cli_missing_options_file() {
    let cli = parse(&["-c", "/nonexistent/options.json", "a.pdf"]);

    let err = cli.to_config().await.unwrap_err();
    assert!(matches!(err, PdfDropError::InvalidConfig { .. }));
    assert_eq!(err.exit_code(), 1);
}
