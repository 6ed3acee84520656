//! Property-based tests for the tag parser and the merge engines
//!
//! Documents are generated as plain text lines interleaved with uniquely named regions, some
//! nested, each with an optional `sync` directive.

use proptest::prelude::*;
use regen_core::regen::merging::sync;
use regen_core::regen::tags::{SyncMode, TagParser};

#[derive(Debug, Clone)]
enum Block {
    Text(String),
    Region {
        directive: Option<&'static str>,
        body: Vec<String>,
        nested: Option<(Option<&'static str>, Vec<String>)>,
    },
}

fn sync_mode_strategy() -> impl Strategy<Value = SyncMode> {
    prop_oneof![
        Just(SyncMode::Full),
        Just(SyncMode::Demand),
        Just(SyncMode::Skip),
        Just(SyncMode::Force),
    ]
}

fn directive_strategy() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![
        Just(None),
        Just(Some("Reserve")),
        Just(Some("Replace")),
        Just(Some("Unknown")),
    ]
}

/// Lines that can never be mistaken for markers, including markup in ordinary comments
fn text_line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9 ;=(){}]{0,30}",
        "    [a-z][a-z0-9 ,;]{0,20}",
        "// [a-z ]{0,20}",
        "// ?</?(p|b|li|code)>",
        "// <b>[a-z ]{0,10}</b>",
        Just(String::new()),
    ]
}

fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(text_line_strategy(), 0..4)
}

fn block_strategy() -> impl Strategy<Value = Block> {
    prop_oneof![
        text_line_strategy().prop_map(Block::Text),
        (
            directive_strategy(),
            lines_strategy(),
            prop::option::of((directive_strategy(), lines_strategy())),
        )
            .prop_map(|(directive, body, nested)| Block::Region {
                directive,
                body,
                nested,
            }),
    ]
}

fn open_marker(name: &str, directive: Option<&str>) -> String {
    match directive {
        Some(value) => format!("//<{name} sync=\"{value}\">\n"),
        None => format!("//<{name} kind=\"region\">\n"),
    }
}

fn render(header: Option<SyncMode>, blocks: &[Block]) -> String {
    let mut out = String::new();
    if let Some(mode) = header {
        out.push_str(&format!("//<file sync=\"{mode}\"/>\n"));
    }
    for (index, block) in blocks.iter().enumerate() {
        match block {
            Block::Text(line) => {
                out.push_str(line);
                out.push('\n');
            }
            Block::Region {
                directive,
                body,
                nested,
            } => {
                let name = format!("gen:region{index}");
                out.push_str(&open_marker(&name, *directive));
                for line in body {
                    out.push_str(line);
                    out.push('\n');
                }
                if let Some((inner_directive, inner_body)) = nested {
                    let inner = format!("gen:inner{index}");
                    out.push_str(&open_marker(&inner, *inner_directive));
                    for line in inner_body {
                        out.push_str(line);
                        out.push('\n');
                    }
                    out.push_str(&format!("//</{inner}>\n"));
                }
                out.push_str(&format!("//</{name}>\n"));
            }
        }
    }
    out
}

fn document_strategy() -> impl Strategy<Value = String> {
    (
        prop::option::of(sync_mode_strategy()),
        prop::collection::vec(block_strategy(), 0..8),
    )
        .prop_map(|(header, blocks)| render(header, &blocks))
}

/// The same regions with different bodies, all marked `Reserve`
fn reserved_pair_strategy() -> impl Strategy<Value = (String, String, usize)> {
    (1usize..5, lines_strategy(), lines_strategy()).prop_map(|(count, fresh_body, old_body)| {
        let build = |tag: &str, body: &[String]| {
            let mut out = format!("{tag} head\n");
            for index in 0..count {
                out.push_str(&format!("//<r{index} sync=\"Reserve\">\n"));
                for line in body {
                    out.push_str(line);
                    out.push('\n');
                }
                out.push_str(&format!("//</r{index}>\n"));
            }
            out
        };
        (build("fresh", &fresh_body), build("existing", &old_body), count)
    })
}

proptest! {
    #[test]
    fn test_render_is_lossless(document in document_strategy()) {
        let tree = TagParser::new("//").parse(&document).expect("parse");
        prop_assert_eq!(tree.render(), document);
    }

    #[test]
    fn test_text_without_markers_is_one_node(text in "[^<]{0,200}") {
        let tree = TagParser::new("//").parse(&text).expect("parse");
        prop_assert!(tree.children.len() <= 1);
        prop_assert_eq!(tree.render(), text);
    }

    #[test]
    fn test_sync_with_itself_is_identity(document in document_strategy(), mode in sync_mode_strategy()) {
        prop_assert_eq!(sync(&document, &document, mode).expect("sync"), document);
    }

    #[test]
    fn test_force_returns_fresh(fresh in document_strategy(), existing in ".{0,200}") {
        prop_assert_eq!(sync(&fresh, &existing, SyncMode::Force).expect("sync"), fresh);
    }

    #[test]
    fn test_skip_returns_existing(fresh in ".{0,200}", existing in document_strategy()) {
        prop_assert_eq!(sync(&fresh, &existing, SyncMode::Skip).expect("sync"), existing);
    }

    #[test]
    fn test_reserved_regions_keep_existing_content(
        (fresh, existing, count) in reserved_pair_strategy(),
        mode in prop_oneof![Just(SyncMode::Full), Just(SyncMode::Demand)],
    ) {
        let merged = sync(&fresh, &existing, mode).expect("sync");
        let parser = TagParser::new("//");
        let merged_tree = parser.parse(&merged).expect("merged parses");
        let existing_tree = parser.parse(&existing).expect("existing parses");
        for index in 0..count {
            let name = format!("r{index}");
            prop_assert_eq!(
                merged_tree.find(&name).map(|e| e.inner_text()),
                existing_tree.find(&name).map(|e| e.inner_text())
            );
        }
    }

    #[test]
    fn test_replaced_regions_take_fresh_content(
        fresh_body in lines_strategy(),
        old_body in lines_strategy(),
        mode in prop_oneof![Just(SyncMode::Full), Just(SyncMode::Demand)],
    ) {
        let build = |head: &str, body: &[String]| {
            let mut out = format!("{head}\n//<gen sync=\"Replace\">\n");
            for line in body {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str("//</gen>\n");
            out
        };
        let fresh = build("fresh", &fresh_body);
        let existing = build("existing", &old_body);
        let merged = sync(&fresh, &existing, mode).expect("sync");
        let parser = TagParser::new("//");
        prop_assert_eq!(
            parser.parse(&merged).expect("merged").find("gen").map(|e| e.inner_text()),
            parser.parse(&fresh).expect("fresh").find("gen").map(|e| e.inner_text())
        );
    }
}

#[test]
fn test_comment_markup_survives_sync() {
    let document = "// Renders a <p> block:\n// <p>\n// hello\n// </p>\nint main() {}\n";
    for mode in [SyncMode::Full, SyncMode::Demand] {
        assert_eq!(sync(document, document, mode).expect("sync"), document);
    }
}

#[test]
fn test_duplicate_names_first_match_wins() {
    let existing = "\
//<dup sync=\"Reserve\">
first
//</dup>
//<dup sync=\"Reserve\">
second
//</dup>
";
    let fresh = "//<dup sync=\"Reserve\">\nfresh\n//</dup>\n";

    let tree = TagParser::new("//").parse(existing).expect("parse");
    assert_eq!(tree.find("dup").map(|e| e.inner_text()), Some("first\n".to_string()));

    let merged = sync(fresh, existing, SyncMode::Full).expect("sync");
    assert_eq!(merged, "//<dup sync=\"Reserve\">\nfirst\n//</dup>\n");
}
