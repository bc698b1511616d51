use editor_analysis::{
    AnalysisChangeKind, AnalysisError, AnalyzerOptions, BracketAction, DocumentAnalyzer,
    LanguageConfig, QuoteAction, TypedCharAction,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

const SOURCE: &str = "\
struct Point {
    x: i32,
}

fn main() {
    let p = Point { x: 1 };
    println!(\"{}\", p.x);
}
";

#[test]
fn test_typing_session_keeps_brackets_current() {
    let mut analyzer = DocumentAnalyzer::new("", LanguageConfig::rust());

    // Typing `f(` asks for a pair; the host inserts it.
    analyzer.apply_edit(0, 0, "f").unwrap();
    let action = analyzer.type_char(1, '(', None).unwrap();
    assert_eq!(
        action,
        TypedCharAction::Bracket(BracketAction::InsertPair {
            open: '(',
            close: ')'
        })
    );
    let edit = action.insertion('(', "").unwrap();
    analyzer.apply_edit(1, 0, &edit.text).unwrap();
    assert_eq!(analyzer.text(), "f()");

    // Typing `)` right before the inserted closer steps over it.
    assert_eq!(
        analyzer.type_char(2, ')', None),
        Ok(TypedCharAction::Bracket(
            BracketAction::SkipOverExistingClose
        ))
    );
    assert_eq!(analyzer.match_at_cursor(2).unwrap().open_pos, 1);
}

#[test]
fn test_quotes_in_document_context() {
    let analyzer = DocumentAnalyzer::new(SOURCE, LanguageConfig::rust());
    let column = analyzer.buffer().line_len(6) - 1;
    let offset = analyzer.offset_at(6, column).unwrap();

    // Cursor after `p.x)`, before `;`: a fresh string may open here.
    assert_eq!(
        analyzer.type_char(offset, '"', None),
        Ok(TypedCharAction::Quote(QuoteAction::InsertPair))
    );
    // Rust does not treat `'` as a quote.
    assert_eq!(
        analyzer.type_char(offset, '\'', None),
        Ok(TypedCharAction::Plain)
    );
}

#[test]
fn test_folds_survive_edits_above_and_inside() {
    let mut analyzer = DocumentAnalyzer::new(SOURCE, LanguageConfig::rust());
    assert_eq!(analyzer.toggle_fold(4), Ok(Some(4)));
    assert_eq!(analyzer.visible_lines(), vec![0, 1, 2, 3, 4, 7, 8]);

    // Two lines inserted above the function.
    analyzer.apply_edit(0, 0, "use std::fmt;\n\n").unwrap();
    assert!(analyzer.folding().is_folded(6));
    assert_eq!(analyzer.visible_lines(), vec![0, 1, 2, 3, 4, 5, 6, 9, 10]);

    // A line added inside the body extends the fold.
    let inside = analyzer.buffer().position_to_char_offset(7, 0);
    analyzer.apply_edit(inside, 0, "    let q = 2;\n").unwrap();
    let region = analyzer.fold_regions()[0].clone();
    assert_eq!((region.start_line, region.end_line), (6, 9));
    assert!(analyzer.is_line_visible(10));
}

#[test]
fn test_deleting_lines_above_fold() {
    let mut analyzer = DocumentAnalyzer::new(SOURCE, LanguageConfig::rust());
    analyzer.toggle_fold(4).unwrap();

    // Remove `struct Point { ... }` and the blank line after it.
    let end = analyzer.buffer().position_to_char_offset(4, 0);
    analyzer.apply_edit(0, end, "").unwrap();
    assert!(analyzer.folding().is_folded(0));
    assert_eq!(analyzer.visible_lines(), vec![0, 3, 4]);
}

#[test]
fn test_deleting_fold_header_drops_fold() {
    let text = "p {\n  a\n  b {\n    c\n  }\n}";
    let mut analyzer = DocumentAnalyzer::new(text, LanguageConfig::default());
    analyzer.toggle_fold(2).unwrap();

    // Join `p {` with `    c`, removing `  a` and the folded `  b {` header.
    analyzer.apply_edit(3, 10, "").unwrap();
    assert_eq!(analyzer.text(), "p {\n    c\n  }\n}");
    assert!(!analyzer.folding().is_folded(0));
    assert_eq!(analyzer.visible_lines(), vec![0, 1, 2, 3]);
}

#[test]
fn test_visual_mapping_through_facade() {
    let mut analyzer = DocumentAnalyzer::new(SOURCE, LanguageConfig::rust());
    analyzer.toggle_fold(0).unwrap();
    analyzer.toggle_fold(4).unwrap();

    assert_eq!(analyzer.logical_to_visual(4), Some(3));
    assert_eq!(analyzer.logical_to_visual(5), None);
    assert_eq!(analyzer.visual_to_logical(4), Some(7));
    assert_eq!(analyzer.visual_to_logical(99), None);
    assert_eq!(analyzer.logical_to_visual(99), None);
}

#[test]
fn test_fold_all_then_unfold_all() {
    let mut analyzer = DocumentAnalyzer::new(SOURCE, LanguageConfig::rust());
    analyzer.fold_all();
    assert_eq!(analyzer.visible_lines(), vec![0, 2, 3, 4, 7, 8]);
    analyzer.unfold_all();
    assert_eq!(analyzer.visible_lines().len(), analyzer.line_count());
}

#[test]
fn test_bracket_colors_follow_levels() {
    let analyzer = DocumentAnalyzer::new("((x))", LanguageConfig::default());
    let outer = analyzer.match_at_cursor(0).unwrap();
    let inner = analyzer.match_at_cursor(1).unwrap();
    assert_eq!(analyzer.bracket_color(outer).to_hex(), "#ffd700");
    assert_eq!(analyzer.bracket_color(inner).to_hex(), "#da70d6");
}

#[test]
fn test_deferred_rebuild_notifies() {
    let kinds = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&kinds);

    let options = AnalyzerOptions {
        rebuild_on_change: false,
    };
    let mut analyzer = DocumentAnalyzer::with_options("x", LanguageConfig::default(), options);
    analyzer.subscribe(move |change| sink.lock().unwrap().push(change.kind));

    analyzer.apply_edit(1, 0, "\n[]").unwrap();
    assert!(analyzer.brackets().is_empty());
    analyzer.rebuild_brackets();
    assert_eq!(analyzer.brackets().matched_count(), 1);

    assert_eq!(
        *kinds.lock().unwrap(),
        vec![
            AnalysisChangeKind::TextEdited {
                line: 0,
                line_delta: 1
            },
            AnalysisChangeKind::BracketsRebuilt,
        ]
    );
}

#[test]
fn test_invalid_positions() {
    let mut analyzer = DocumentAnalyzer::new("ab\ncd", LanguageConfig::default());
    assert_eq!(
        analyzer.apply_edit(6, 0, "x"),
        Err(AnalysisError::InvalidRange { start: 6, end: 6 })
    );
    assert_eq!(
        analyzer.type_char(0, '(', Some(1..9)),
        Err(AnalysisError::InvalidRange { start: 1, end: 9 })
    );
    assert_eq!(
        analyzer.set_folded(2, true),
        Err(AnalysisError::InvalidLine(2))
    );
    assert_eq!(
        analyzer.offset_at(0, 3),
        Err(AnalysisError::InvalidPosition { line: 0, column: 3 })
    );
    assert_eq!(analyzer.offset_at(1, 2), Ok(5));
    assert_eq!(analyzer.position_at(5), Ok((1, 2)));
    assert_eq!(
        analyzer.position_at(6),
        Err(AnalysisError::InvalidOffset(6))
    );
    assert!(!analyzer.has_changed_since(0));
}
