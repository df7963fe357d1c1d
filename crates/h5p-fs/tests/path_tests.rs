use h5p_fs::NormalizedPath;
use rstest::rstest;

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("libraries\\Vendor.Widget-1.8\\js\\widget.js");
    assert_eq!(path.as_str(), "libraries/Vendor.Widget-1.8/js/widget.js");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("libraries");
    let joined = base.join("Vendor.Widget-1.8").join("js/widget.js");
    assert_eq!(joined.as_str(), "libraries/Vendor.Widget-1.8/js/widget.js");
}

#[test]
fn test_join_onto_empty_base() {
    let joined = NormalizedPath::new("").join("styles/a.css");
    assert_eq!(joined.as_str(), "styles/a.css");
}

#[rstest]
#[case("/a/b", "c", "/a/b/c")]
#[case("/a/b", "./c", "/a/b/c")]
#[case("/a/b", "../c", "/a/c")]
#[case("/a/b", "../../../c", "/c")]
#[case("a/b", "../../../c", "../c")]
#[case("a//b", "c", "a/b/c")]
fn test_join_resolves_dots(#[case] base: &str, #[case] segment: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(base).join(segment).as_str(), expected);
}

#[rstest]
#[case("js/widget.js", true)]
#[case("./js/widget.js", true)]
#[case("js/../widget.js", true)]
#[case("../widget.js", false)]
#[case("js/../../widget.js", false)]
#[case("/etc/passwd", false)]
#[case("", false)]
fn test_is_safe_relative(#[case] raw: &str, #[case] safe: bool) {
    assert_eq!(NormalizedPath::new(raw).is_safe_relative(), safe, "{raw}");
}
