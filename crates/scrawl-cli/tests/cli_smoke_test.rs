//! End-to-end runs of the CLI logic against temporary files.

use std::fs;

use scrawl_cli::{Args, CliError, Format, run};

fn args(input: &str, output: &str) -> Args {
    Args {
        input: input.to_string(),
        output: output.to_string(),
        format: None,
        notation: None,
        sketch: false,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn test_graph_source_to_svg() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("flow.graph");
    let output = dir.path().join("flow.svg");
    fs::write(&input, "A-->B; A-->C").unwrap();

    run(&args(
        input.to_str().unwrap(),
        output.to_str().unwrap(),
    ))
    .unwrap();

    let markup = fs::read_to_string(&output).unwrap();
    assert!(markup.contains("<svg"));
    assert!(markup.contains("<rect"));
}

#[test]
fn test_process_source_to_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("order.process");
    let output = dir.path().join("order.png");
    fs::write(&input, "task Checkout\nevent Start\nflow Start -> Checkout").unwrap();

    run(&args(
        input.to_str().unwrap(),
        output.to_str().unwrap(),
    ))
    .unwrap();

    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_sketch_flag_changes_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("flow.graph");
    fs::write(&input, "A-->B").unwrap();

    let plain_out = dir.path().join("plain.svg");
    run(&args(input.to_str().unwrap(), plain_out.to_str().unwrap())).unwrap();

    let sketched_out = dir.path().join("sketched.svg");
    let mut sketched_args = args(input.to_str().unwrap(), sketched_out.to_str().unwrap());
    sketched_args.sketch = true;

    run(&sketched_args).unwrap();

    let plain = fs::read_to_string(&plain_out).unwrap();
    let sketched = fs::read_to_string(&sketched_out).unwrap();
    assert!(plain.contains("<rect"));
    assert!(!sketched.contains("<rect"));
}

#[test]
fn test_rejected_source_reports_render_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.graph");
    let output = dir.path().join("broken.svg");
    fs::write(&input, "A->B").unwrap();

    let result = run(&args(
        input.to_str().unwrap(),
        output.to_str().unwrap(),
    ));
    assert!(matches!(result, Err(CliError::Render(_))));
    assert!(!output.exists());
}

#[test]
fn test_unknown_extension_without_notation_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("flow.txt");
    fs::write(&input, "A-->B").unwrap();

    let result = run(&args(input.to_str().unwrap(), "out.svg"));
    assert!(matches!(result, Err(CliError::UnknownNotation(_))));
}

#[test]
fn test_explicit_format_overrides_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("flow.graph");
    let output = dir.path().join("image.dat");
    fs::write(&input, "A-->B").unwrap();

    let mut cli_args = args(input.to_str().unwrap(), output.to_str().unwrap());
    cli_args.format = Some(Format::Png);

    run(&cli_args).unwrap();

    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
