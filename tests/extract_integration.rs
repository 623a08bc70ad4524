//! Filesystem-level extraction tests
//!
//! Each test writes a source file into a temporary directory and runs the
//! extractor against a layout rooted there, then inspects the files on disk.

use fsplit::fsplit::extract::{Banner, ExtractError, Extractor, OutputLayout};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TWO_ROUTINES: &str = "\
subroutine foo(x)
a = 1
end
function bar(y)
b = 2
end
";

const DECAY0_SAMPLE: &str = "\
c decay0.for: concatenated sources
c
      program decay0
      character chfile*40
      call GENBBdia(chfile)
      end
c
      block data
      common/const/pi,emass
      data pi,emass/3.1415927,0.51099906/
      end
c
      subroutine GENBBdia(chfile)
      character chfile*40
      if(chfile.eq.' ') then
         chfile='generated.dat'
      end if
      return
      end
c
      function fe1_mods(e)
      common/const/pi,emass
      fe1_mods=e+emass
      return
      END
";

fn workspace(source: &str) -> (TempDir, OutputLayout) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("decay0.for"), source).unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    let layout = OutputLayout {
        directory: dir.path().join("src"),
        manifest: dir.path().join("routines.lis"),
        create_directory: false,
    };
    (dir, layout)
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

fn without_banners(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .filter(|line| *line != "c" && !line.starts_with("c "))
        .collect()
}

#[test]
fn test_two_routine_example() {
    let (dir, layout) = workspace(TWO_ROUTINES);

    let report = Extractor::default()
        .extract_to(dir.path().join("decay0.for"), &layout)
        .unwrap();

    assert_eq!(report.count(), 2);
    assert_eq!(read(dir.path().join("routines.lis")), "foo\nbar\n");
    assert_eq!(
        without_banners(&read(dir.path().join("src/foo.f"))),
        ["subroutine foo(x)", "a = 1", "end"]
    );
    assert_eq!(
        without_banners(&read(dir.path().join("src/bar.f"))),
        ["function bar(y)", "b = 2", "end"]
    );
}

#[test]
fn test_file_layout_matches_banner_generator() {
    let (dir, layout) = workspace(TWO_ROUTINES);
    Extractor::default()
        .extract_to(dir.path().join("decay0.for"), &layout)
        .unwrap();

    let banner = Banner::default();
    let mut expected = banner.header("foo.f").join("\n");
    expected.push_str("\nsubroutine foo(x)\na = 1\nend\n");
    expected.push_str(&banner.footer("foo.f").join("\n"));
    expected.push('\n');

    assert_eq!(read(dir.path().join("src/foo.f")), expected);
}

#[test]
fn test_decay0_style_source() {
    let (dir, layout) = workspace(DECAY0_SAMPLE);

    let report = Extractor::default()
        .extract_to(dir.path().join("decay0.for"), &layout)
        .unwrap();

    let mut written: Vec<_> = fs::read_dir(dir.path().join("src"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    written.sort();
    assert_eq!(
        written,
        ["GENBBdia.f", "block_data.f", "fe1_mods.f", "prog_decay0.F"]
    );
    assert_eq!(report.count(), 4);
    assert_eq!(read(dir.path().join("routines.lis")), "GENBBdia\nfe1_mods\n");

    // `end if` is ordinary and must not close the subroutine early.
    let genbb = read(dir.path().join("src/GENBBdia.f"));
    assert!(genbb.contains("      end if\n      return\n      end\n"));

    // Upper-case terminator closes the function.
    let fe1 = read(dir.path().join("src/fe1_mods.f"));
    assert!(fe1.contains("      END\nc\nc end of fe1_mods.f\n"));

    // Comments between units never land anywhere.
    for name in &written {
        let contents = read(dir.path().join("src").join(name));
        assert!(!contents.contains("concatenated sources"));
    }
}

#[test]
fn test_rerun_is_idempotent() {
    let (dir, layout) = workspace(DECAY0_SAMPLE);
    let source = dir.path().join("decay0.for");

    Extractor::default().extract_to(&source, &layout).unwrap();
    let first = read(dir.path().join("src/GENBBdia.f"));
    let first_manifest = read(dir.path().join("routines.lis"));

    Extractor::default().extract_to(&source, &layout).unwrap();
    assert_eq!(read(dir.path().join("src/GENBBdia.f")), first);
    assert_eq!(read(dir.path().join("routines.lis")), first_manifest);
}

#[test]
fn test_missing_source_is_an_io_error() {
    let (dir, layout) = workspace("");
    let err = Extractor::default()
        .extract_to(dir.path().join("nope.for"), &layout)
        .unwrap_err();

    match err {
        ExtractError::Io { path, .. } => assert!(path.ends_with("nope.for")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("routines.lis").exists());
}

#[test]
fn test_missing_output_directory_is_an_io_error() {
    let (dir, mut layout) = workspace(TWO_ROUTINES);
    layout.directory = dir.path().join("generated");

    let err = Extractor::default()
        .extract_to(dir.path().join("decay0.for"), &layout)
        .unwrap_err();
    assert!(matches!(err, ExtractError::Io { .. }));
}

#[test]
fn test_output_directory_created_on_request() {
    let (dir, mut layout) = workspace(TWO_ROUTINES);
    layout.directory = dir.path().join("generated").join("fortran");
    layout.create_directory = true;

    Extractor::default()
        .extract_to(dir.path().join("decay0.for"), &layout)
        .unwrap();
    assert!(dir.path().join("generated/fortran/foo.f").exists());
}

#[test]
fn test_fatal_error_keeps_earlier_files() {
    let source = "subroutine foo\nend\nsubroutine bar\nsubroutine baz\nend\n";
    let (dir, layout) = workspace(source);

    let err = Extractor::default()
        .extract_to(dir.path().join("decay0.for"), &layout)
        .unwrap_err();

    assert!(matches!(
        err,
        ExtractError::NestedDeclarator { line_number: 4, .. }
    ));
    assert!(dir.path().join("src/foo.f").exists());
    assert!(dir.path().join("src/bar.f").exists());
    assert!(!dir.path().join("routines.lis").exists());
}

#[test]
fn test_latin1_comment_is_copied_unchanged() {
    let (dir, layout) = workspace("");
    fs::write(
        dir.path().join("decay0.for"),
        b"subroutine foo(x)\nc auteur: Fran\xE7ois\na = 1\nend\nsubroutine bar\nend\n",
    )
    .unwrap();

    let report = Extractor::default()
        .extract_to(dir.path().join("decay0.for"), &layout)
        .unwrap();

    assert_eq!(report.count(), 2);
    assert_eq!(report.manifest.names(), ["foo", "bar"]);
    let foo = fs::read(dir.path().join("src/foo.f")).unwrap();
    let body: &[u8] = b"subroutine foo(x)\nc auteur: Fran\xE7ois\na = 1\nend\n";
    assert!(foo.windows(body.len()).any(|window| window == body));
    assert!(dir.path().join("src/bar.f").exists());
}

#[test]
fn test_crlf_line_endings_are_normalized() {
    let (dir, layout) = workspace("subroutine foo\r\na = 1\r\nend\r\n");

    let report = Extractor::default()
        .extract_to(dir.path().join("decay0.for"), &layout)
        .unwrap();

    assert_eq!(report.count(), 1);
    let foo = read(dir.path().join("src/foo.f"));
    assert!(!foo.contains('\r'));
    assert_eq!(without_banners(&foo), ["subroutine foo", "a = 1", "end"]);
}

#[test]
fn test_path_like_name_never_leaves_output_directory() {
    let (dir, layout) = workspace("subroutine ../escape\nend\n");

    let err = Extractor::default()
        .extract_to(dir.path().join("decay0.for"), &layout)
        .unwrap_err();

    assert!(matches!(
        err,
        ExtractError::MalformedDeclarator { line_number: 1, .. }
    ));
    assert!(!dir.path().join("escape.f").exists());
    assert_eq!(fs::read_dir(dir.path().join("src")).unwrap().count(), 0);
}
