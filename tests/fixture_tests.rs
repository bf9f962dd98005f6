use datatest_stable::Utf8Path;
use facet_svg::{Svg, SvgNode, facet_xml};
use isoextrude::Options;
use isoextrude::path::Path;
use regex_lite::Regex;

/// Face counts a fixture declares in its `<desc>`, e.g. `floors=1 walls=4`
fn expectations(source: &str) -> Vec<(String, usize)> {
    let desc = Regex::new(r"<desc>([^<]*)</desc>").unwrap();
    let pair = Regex::new(r"(\w+)=(\d+)").unwrap();
    let Some(caps) = desc.captures(source) else {
        return Vec::new();
    };
    pair.captures_iter(&caps[1])
        .map(|c| (c[1].to_string(), c[2].parse().unwrap()))
        .collect()
}

/// The `class` of every face in document order
fn face_classes(svg: &str) -> Vec<String> {
    let class = Regex::new(r#"<path[^>]*class="(floor|wall|ceiling)""#).unwrap();
    class
        .captures_iter(svg)
        .map(|c| c[1].to_string())
        .collect()
}

/// Format a colored inline diff using dissimilar
fn format_inline_diff(first: &str, second: &str) -> String {
    use dissimilar::Chunk;

    let mut output = String::new();
    output.push_str("\n=== Inline Diff (first run vs second run) ===\n");
    for chunk in dissimilar::diff(first, second) {
        match chunk {
            Chunk::Equal(s) => output.push_str(s),
            Chunk::Delete(s) => {
                output.push_str("\x1b[31m[-");
                output.push_str(s);
                output.push_str("-]\x1b[0m");
            }
            Chunk::Insert(s) => {
                output.push_str("\x1b[32m[+");
                output.push_str(s);
                output.push_str("+]\x1b[0m");
            }
        }
    }
    output
}

fn test_fixture(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let options = Options::default().with_debug(true);

    let first = isoextrude::transform(&source, &options)
        .unwrap_or_else(|e| panic!("transform failed for {path}: {e:?}"));
    let second = isoextrude::transform(&source, &options)
        .unwrap_or_else(|e| panic!("second transform failed for {path}: {e:?}"));
    if first.svg != second.svg {
        panic!(
            "output of {path} is not deterministic:\n{}",
            format_inline_diff(&first.svg, &second.svg)
        );
    }

    // the output is markup we can read back, and every face is valid path data
    let doc: Svg = facet_xml::from_str(&first.svg)
        .unwrap_or_else(|e| panic!("output of {path} does not re-parse: {e}"));
    for node in &doc.children {
        if let SvgNode::Path(p) = node {
            let d = p.d.as_deref().unwrap_or_default();
            let parsed = Path::parse(d).unwrap_or_else(|e| panic!("bad face `{d}`: {e}"));
            if p.class.as_deref() == Some("wall") {
                assert!(parsed.is_closed(), "open wall side `{d}` in {path}");
            }
        }
    }
    let debug = first
        .svg_debug
        .as_deref()
        .unwrap_or_else(|| panic!("no debug output for {path}"));
    facet_xml::from_str::<Svg>(debug)
        .unwrap_or_else(|e| panic!("debug output of {path} does not re-parse: {e}"));

    // floors, then walls, then ceilings
    let classes = face_classes(&first.svg);
    let rank = |c: &str| match c {
        "floor" => 0,
        "wall" => 1,
        _ => 2,
    };
    assert!(
        classes.windows(2).all(|w| rank(&w[0]) <= rank(&w[1])),
        "faces of {path} out of order: {classes:?}"
    );

    for (kind, expected) in expectations(&source) {
        let class = kind.trim_end_matches('s');
        let found = classes.iter().filter(|c| *c == class).count();
        assert_eq!(found, expected, "{kind} in {path}");
    }

    Ok(())
}

datatest_stable::harness! {
    { test = test_fixture, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"), pattern = r"\.svg$" },
}
