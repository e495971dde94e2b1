use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use anyhow::Context;
use anyhow::Result;
use markslide::RenderOptions;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const SEPARATOR: &str = "==================";

/// Golden master test configuration
struct GoldenTest {
    name: &'static str,
    input_file: &'static str,
    delimiter: &'static str,
}

/// Struct contains fixtures, golden and debug paths
struct TestPaths {
    fixtures_dir: PathBuf,
    golden_dir: PathBuf,
    debug_dir: PathBuf,
}

fn get_test_paths() -> TestPaths {
    let root_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let fixtures_dir = root_dir.join("tests/fixtures");
    let golden_dir = root_dir.join("tests/golden");
    let debug_dir = root_dir.join("tests/debug");

    fs::create_dir_all(&golden_dir).unwrap();
    fs::create_dir_all(&debug_dir).unwrap();

    TestPaths {
        fixtures_dir,
        golden_dir,
        debug_dir,
    }
}

/// Join slides the way the command line prints them.
fn join_slides(fragments: &[Vec<u8>]) -> String {
    let mut out = String::new();
    for html in fragments {
        out.push_str(&String::from_utf8_lossy(html));
        out.push('\n');
        out.push_str(SEPARATOR);
        out.push('\n');
    }
    out
}

/// One entry per slide, with indentation and blank lines between tags removed.
///
/// Empty slides are kept; only the text after the last separator is dropped.
fn normalize(printed: &str) -> Vec<String> {
    let mut slides: Vec<String> = printed
        .split(SEPARATOR)
        .map(|slide| {
            slide
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<String>()
        })
        .collect();

    let tail = slides.pop().unwrap_or_default();
    assert!(tail.is_empty(), "text after the last separator: {tail:?}");
    slides
}

fn run_golden_test(test: &GoldenTest) -> Result<()> {
    let paths = get_test_paths();

    let input_path = paths.fixtures_dir.join(test.input_file);
    let fragments = markslide::convert_file(
        &input_path,
        test.delimiter.as_bytes(),
        &RenderOptions::default(),
    )
    .with_context(|| format!("Failed to render: {}", input_path.display()))?;

    let actual = join_slides(&fragments);

    {
        let debug_path = paths.debug_dir.join(format!("{}.actual.html", test.name));
        fs::write(&debug_path, &actual)?;
        println!("Debug output saved: {}", debug_path.display());
    }

    let golden_path = paths.golden_dir.join(format!("{}.html", test.name));

    if !golden_path.exists() {
        fs::write(&golden_path, &actual)?;
        println!("Created golden file: {}", golden_path.display());
        println!("   Re-run the test to perform comparison.");
        return Ok(());
    }

    let expected = fs::read_to_string(&golden_path)?;
    assert_eq!(fragments.len(), expected.matches(SEPARATOR).count());
    assert_eq!(normalize(&actual), normalize(&expected));

    println!("Golden test '{}' passed", test.name);
    Ok(())
}

#[test]
fn test_deck_rendering() {
    let test = GoldenTest {
        name: "deck",
        input_file: "deck.md",
        delimiter: "[end page]",
    };

    run_golden_test(&test).unwrap();
}

#[test]
fn test_crlf_without_trailing_newline() {
    let test = GoldenTest {
        name: "crlf",
        input_file: "crlf.md",
        delimiter: "[end page]",
    };

    run_golden_test(&test).unwrap();
}

#[test]
fn test_leading_delimiter_keeps_empty_slide() {
    let test = GoldenTest {
        name: "leading",
        input_file: "leading.md",
        delimiter: "[end page]",
    };

    run_golden_test(&test).unwrap();
}

#[test]
fn test_normalize_keeps_empty_slides() {
    let printed = join_slides(&[Vec::new(), b"<p>x</p>\n".to_vec()]);
    assert_eq!(normalize(&printed), vec!["".to_string(), "<p>x</p>".to_string()]);
}

#[test]
fn test_cli_render_prints_slides() {
    let paths = get_test_paths();

    let output = Command::new(env!("CARGO_BIN_EXE_markslide"))
        .arg("render")
        .arg("--input")
        .arg(paths.fixtures_dir.join("deck.md"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let expected = fs::read_to_string(paths.golden_dir.join("deck.html")).unwrap();
    assert_eq!(normalize(&stdout), normalize(&expected));
}

#[test]
fn test_cli_writes_slide_files() {
    let paths = get_test_paths();
    let out_dir = TempDir::new().unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_markslide"))
        .arg("render")
        .arg("--input")
        .arg(paths.fixtures_dir.join("deck.md"))
        .arg("--output")
        .arg(out_dir.path())
        .status()
        .unwrap();

    assert!(status.success());
    let third = fs::read_to_string(out_dir.path().join("slide-003.html")).unwrap();
    assert_eq!(third.trim(), "<p>Slide three</p>");
    assert!(!out_dir.path().join("slide-004.html").exists());
}

#[test]
fn test_cli_split_custom_delimiter() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("deck.md");
    fs::write(&input, "a\n%%\nb\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_markslide"))
        .args(["split", "--delimiter", "%%", "--input"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        format!("a\n\n{SEPARATOR}\n\nb\n\n{SEPARATOR}\n")
    );
}

#[test]
fn test_cli_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_markslide"))
        .arg("render")
        .arg("--input")
        .arg(dir.path().join("missing.md"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.md"), "{stderr}");
}
