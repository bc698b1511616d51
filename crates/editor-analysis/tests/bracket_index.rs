use editor_analysis::{BracketIndex, BracketPair, LanguageConfig};
use pretty_assertions::assert_eq;

fn index_for(text: &str) -> BracketIndex {
    let mut index = BracketIndex::new(LanguageConfig::default());
    index.rebuild(text);
    index
}

fn summary(index: &BracketIndex) -> Vec<(usize, Option<usize>, usize)> {
    index
        .iter()
        .map(|pair| (pair.open_pos, pair.close_pos, pair.level))
        .collect()
}

#[test]
fn test_nested_pairs_match_from_either_side() {
    let index = index_for("a(b[c]d)e");

    let paren = index.find_match(1).unwrap();
    assert_eq!(paren.close_pos, Some(7));
    assert_eq!(paren.level, 0);
    assert_eq!(index.find_match(7), Some(paren));

    let square = index.find_match(3).unwrap();
    assert_eq!(square.close_pos, Some(5));
    assert_eq!(square.level, 1);
    assert_eq!(index.find_match(5).unwrap().open_pos, 3);

    assert!(index.find_match(0).is_none());
    assert!(index.find_match(4).is_none());
}

#[test]
fn test_unclosed_outer_bracket() {
    let index = index_for("(a(b)");

    let outer = index.pair_at(0).unwrap();
    assert!(!outer.valid);
    assert_eq!(outer.close_pos, None);
    assert!(index.find_match(0).is_none());

    let inner = index.find_match(2).unwrap();
    assert_eq!(inner.close_pos, Some(4));
    assert_eq!(inner.level, 1);
}

#[test]
fn test_brackets_inside_strings_and_comments_are_ignored() {
    let index = index_for("f(\"(\") // )\n[x]");
    assert_eq!(summary(&index), vec![(1, Some(5), 0), (12, Some(14), 0)]);
}

#[test]
fn test_escaped_quote_keeps_string_open() {
    let index = index_for(r#"("a\")")"#);
    // The `)` inside the string is skipped, the last one closes.
    assert_eq!(summary(&index), vec![(0, Some(7), 0)]);
}

#[test]
fn test_mismatched_closer_leaves_inner_open() {
    let index = index_for("{ ( }");

    let brace = index.find_match(0).unwrap();
    assert_eq!(brace.close_pos, Some(4));

    let paren = index.pair_at(2).unwrap();
    assert!(!paren.valid);
    assert_eq!(index.unmatched().count(), 1);
}

#[test]
fn test_stray_closer_is_ignored() {
    let index = index_for(") ()");
    assert_eq!(summary(&index), vec![(2, Some(3), 0)]);
    assert!(index.pair_at(0).is_none());
}

#[test]
fn test_level_restored_after_close() {
    let index = index_for("(()) ()");
    assert_eq!(
        summary(&index),
        vec![(0, Some(3), 0), (1, Some(2), 1), (5, Some(6), 0)]
    );
}

#[test]
fn test_multibyte_text_uses_char_offsets() {
    let index = index_for("é(ü)");
    assert_eq!(index.find_match(1).unwrap().close_pos, Some(3));
}

#[test]
fn test_match_near_cursor_prefers_after() {
    let index = index_for("()()");
    // Between `)` and `(`: the opener after the cursor wins.
    assert_eq!(index.match_near_cursor(2).unwrap().open_pos, 2);
    assert_eq!(index.match_near_cursor(4).unwrap().open_pos, 2);
    assert!(index_for("ab").match_near_cursor(1).is_none());
}

#[test]
fn test_enclosing_and_range_queries() {
    let index = index_for("{ [ ( ) ] } ( )");

    assert_eq!(index.enclosing(5).unwrap().open_pos, 4);
    assert_eq!(index.enclosing(3).unwrap().open_pos, 2);
    assert!(index.enclosing(11).is_none());

    let opens: Vec<usize> = index
        .pairs_in_range(6, 13)
        .into_iter()
        .map(|pair| pair.open_pos)
        .collect();
    assert_eq!(opens, vec![0, 2, 4, 12]);
}

#[test]
fn test_quote_pairs_are_indexed_on_request() {
    let config = LanguageConfig {
        index_quote_pairs: true,
        ..LanguageConfig::default()
    };
    let mut index = BracketIndex::new(config);
    index.rebuild("('a', \"b)");

    let single = index.find_match(1).unwrap();
    assert_eq!(single.open_char, '\'');
    assert_eq!(single.close_pos, Some(3));

    let double = index.pair_at(6).unwrap();
    assert!(!double.valid);
    // The paren is never closed: its closer sits inside the unterminated string.
    assert!(!index.pair_at(0).unwrap().valid);
}

#[test]
fn test_rebuild_is_idempotent() {
    let text = "fn main() { let v = vec![1, (2 + 3)]; }";
    let mut index = index_for(text);
    let first: Vec<BracketPair> = index.iter().cloned().collect();
    index.rebuild(text);
    let second: Vec<BracketPair> = index.iter().cloned().collect();
    assert_eq!(first, second);
}

#[test]
fn test_rebuild_replaces_previous_content() {
    let mut index = index_for("((()))");
    assert_eq!(index.len(), 3);
    index.rebuild("x");
    assert!(index.is_empty());
    assert_eq!(index.height(), 0);
}

#[test]
fn test_long_flat_sequence_stays_balanced() {
    let text = "()".repeat(1024);
    let index = index_for(&text);
    assert_eq!(index.len(), 1024);
    assert_eq!(index.matched_count(), 1024);
    assert!(index.height() <= 14, "height {}", index.height());
}

#[test]
fn test_rainbow_colors_cycle() {
    let index = index_for("((((((()))))))");
    let colors: Vec<String> = index
        .iter()
        .map(|pair| BracketIndex::color_for_level(pair.level).to_hex())
        .collect();
    assert_eq!(colors[0], "#ffd700");
    assert_eq!(colors[6], colors[0]);
    assert_eq!(colors[1], "#da70d6");
}
