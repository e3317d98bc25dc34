use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_matisse"))
        .args(args)
        .env_remove("MATISSE_MARKDOWN_ENGINE")
        .env_remove("MATISSE_IMPRESS_JS")
        .env_remove("MATISSE_EMBED_RESOURCES")
        .env_remove("MATISSE_TOC_DEPTH")
        .env_remove("MATISSE_MATHJAX_JS")
        .env_remove("MATISSE_HIGHLIGHT_STYLE")
        .output()
        .expect("Failed to execute command")
}

const DECK: &str = "---metadata\ntitle: Integration Deck\n---endmetadata\n---theme_slide_header_1\n- height: 10%\n- content: $slidetitle\n---endtheme_slide_header_1\n# First chapter\n#### Opening\n$box\n$caption{Remember}\n$content{Boxes work}\n$endbox\n#### Second\nPlain *text*\n# Second chapter\n#### Closing\nBye\n";

#[test]
fn test_build_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path();

    let markdown_path = temp_path.join("deck.md");
    fs::write(&markdown_path, DECK).expect("Failed to write markdown file");
    let css_path = temp_path.join("extra.css");
    fs::write(&css_path, "body { font-family: Arial; }").expect("Failed to write CSS file");
    let output_dir = temp_path.join("site");

    let output = run_command(&[
        "build",
        "-i",
        markdown_path.to_str().unwrap(),
        "-o",
        output_dir.to_str().unwrap(),
        "--css",
        css_path.to_str().unwrap(),
        "--toc-at-chap-beginning",
        "1",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let index = output_dir.join("index.html");
    assert!(index.exists(), "Output file was not created");
    let html = fs::read_to_string(&index).expect("Failed to read output file");

    assert!(html.contains("<title>Integration Deck</title>"));
    assert!(html.contains("<style>body { font-family: Arial; }</style>"));
    assert!(html.contains("<div class=\"slide-header_1\">Opening</div>"));
    assert!(html.contains("<div class=\"box-caption\">Remember</div>"));
    assert!(html.contains("<p>Plain <em>text</em></p>"));
    // two TOC slides push the content slides to 2, 3 and 5
    assert!(html.contains("<div id=\"slide-5\" title=\"Closing\""));
    assert!(html.contains("<a href=\"#/slide-4\">2 Second chapter</a>"));
}

#[test]
fn test_build_link_mode_and_default_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path();
    let markdown_path = temp_path.join("talk.md");
    fs::write(&markdown_path, DECK).expect("Failed to write markdown file");
    let js_path = temp_path.join("extra.js");
    fs::write(&js_path, "console.log(1);").expect("Failed to write JS file");

    let output = run_command(&[
        "build",
        "-i",
        markdown_path.to_str().unwrap(),
        "--js",
        js_path.to_str().unwrap(),
        "--mode",
        "link",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let html = fs::read_to_string(temp_path.join("talk").join("index.html"))
        .expect("Failed to read output file");
    assert!(html.contains(&format!(
        r#"<script src="{}"></script>"#,
        js_path.to_str().unwrap()
    )));
    assert!(html.contains("impress.js"));
}

#[test]
fn test_build_math_and_highlight_options() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = temp_dir.path().join("math.md");
    fs::write(
        &markdown_path,
        "#### Matrix\n$$\n\\begin{matrix} a \\\\ b \\end{matrix}\n$$\n",
    )
    .expect("Failed to write markdown file");
    let output_dir = temp_dir.path().join("out");

    let output = run_command(&[
        "build",
        "-i",
        markdown_path.to_str().unwrap(),
        "-o",
        output_dir.to_str().unwrap(),
        "--highlight-style",
        "monokai.css",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let html = fs::read_to_string(output_dir.join("index.html")).expect("Failed to read output file");
    assert!(html.contains("$$\n\\begin{matrix} a \\\\ b \\end{matrix}\n$$"));
    assert!(html.contains("MathJax-script"));
    assert!(html.contains("styles/monokai.min.css"));

    let output = run_command(&[
        "build",
        "-i",
        markdown_path.to_str().unwrap(),
        "-o",
        output_dir.to_str().unwrap(),
        "--highlight-style",
        "disable",
        "--no-mathjax",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let html = fs::read_to_string(output_dir.join("index.html")).expect("Failed to read output file");
    assert!(!html.contains("MathJax-script"));
    assert!(!html.contains("highlight.min.js"));
}

#[test]
fn test_missing_input_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing.md");

    let output = run_command(&["build", "-i", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "Unexpected stderr: {}", stderr);
}

#[test]
fn test_invalid_mode_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = temp_dir.path().join("deck.md");
    fs::write(&markdown_path, DECK).expect("Failed to write markdown file");

    let output = run_command(&[
        "build",
        "-i",
        markdown_path.to_str().unwrap(),
        "--mode",
        "inline",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_sample_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let sample_path = temp_dir.path().join("sample.md");

    let output = run_command(&["sample", "-o", sample_path.to_str().unwrap()]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(sample_path.exists());

    let html = fs::read_to_string(temp_dir.path().join("sample").join("index.html"))
        .expect("Failed to read output file");
    assert!(html.contains("<title>Sample Presentation</title>"));
    assert!(html.contains("class=\"step overview\""));
    assert!(html.contains("<div class=\"columns\" style=\"display: flex;\">"));
}
