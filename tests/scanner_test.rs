use reslens::scanner::*;
use reslens::store::Snapshot;
use reslens::types::*;

fn snapshot() -> Snapshot {
    Snapshot::new(
        vec![
            Resource::new(1, None, "A").with_code("loadA()"),
            Resource::new(2, Some(ResourceId::Int(1)), "B").with_code("loadB()"),
            Resource::new(7, Some(ResourceId::Int(2)), "c"),
        ],
        1,
    )
}

#[test]
fn test_annotation_when_cursor_elsewhere() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");

    let result = scanner.scan("x = getRes(2)", Some(Position::new(0, 0)));
    assert_eq!(result.matches.len(), 1);
    assert!(!result.matches[0].cursor_overlap);
    assert_eq!(result.annotations.len(), 1);
    assert_eq!(result.annotations[0].position, Position::new(0, 12));
    assert_eq!(result.annotations[0].text, "A-B");
    assert_eq!(result.annotations[0].style, AnnotationStyle::Muted);
    assert!(result.status.is_none());
}

#[test]
fn test_status_when_cursor_on_id() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");

    for character in [11, 12] {
        let result = scanner.scan("x = getRes(2)", Some(Position::new(0, character)));
        assert!(result.matches[0].cursor_overlap, "character {}", character);
        assert!(result.annotations.is_empty());
        assert_eq!(result.status.unwrap().text, "2:A-B");
    }
}

#[test]
fn test_cursor_outside_id_span_does_not_overlap() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");

    // On the opening parenthesis and just past the closing one.
    for character in [10, 13] {
        let result = scanner.scan("x = getRes(2)", Some(Position::new(0, character)));
        assert!(result.status.is_none(), "character {}", character);
        assert_eq!(result.annotations.len(), 1);
    }
    // Right column, wrong line.
    let result = scanner.scan("x = getRes(2)\ny", Some(Position::new(1, 11)));
    assert!(result.status.is_none());
}

#[test]
fn test_unknown_id_is_skipped() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");

    let result = scanner.scan("getRes(404)", Some(Position::new(0, 8)));
    assert!(result.annotations.is_empty());
    assert!(result.status.is_none());
    assert!(result.matches.is_empty());
    assert!(scanner.hover("getRes(404)", Position::new(0, 8), "js").is_none());

    let all = scanner.find_matches(&["getRes(404)"], None);
    assert_eq!(all.len(), 1);
    assert!(all[0].resource.is_none());
    assert!(all[0].path.is_none());
}

#[test]
fn test_whole_buffer_every_line() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");

    let text = "a = getRes(1);\r\nb = [getRes(2), getRes(7)];\n// getRes( 2 )\nc = getRes(3)";
    let result = scanner.scan(text, None);
    let got: Vec<(u32, u32, &str)> = result
        .annotations
        .iter()
        .map(|a| (a.position.line, a.position.character, a.text.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![(0, 12, "A"), (1, 13, "A-B"), (1, 24, "A-B-c")]
    );
}

#[test]
fn test_leading_zeros_resolve() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");

    let result = scanner.scan("getRes(007)", None);
    assert_eq!(result.annotations.len(), 1);
    assert_eq!(result.annotations[0].text, "A-B-c");
    assert_eq!(result.matches[0].id_text, "007");
}

#[test]
fn test_character_offsets_count_utf16_units() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");

    let result = scanner.scan("ünïcode = getRes(1)", None);
    assert_eq!(result.annotations[0].position, Position::new(0, 18));

    // The emoji takes two UTF-16 units.
    let line = "s = \"😀\"; getRes(1)";
    let result = scanner.scan(line, None);
    assert_eq!(result.annotations[0].position, Position::new(0, 18));
    assert_eq!(result.matches[0].id_start, 17);

    let result = scanner.scan(line, Some(Position::new(0, 17)));
    assert_eq!(result.status.unwrap().text, "1:A");
    let result = scanner.scan(line, Some(Position::new(0, 16)));
    assert!(result.status.is_none());
}

#[test]
fn test_custom_delimiter() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, " / ");
    let result = scanner.scan("getRes(7)", None);
    assert_eq!(result.annotations[0].text, "A / B / c");
}

#[test]
fn test_hover_payload() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");

    let hover = scanner
        .hover("x = getRes(2)", Position::new(0, 6), "javascript")
        .unwrap();
    assert_eq!(hover.range.start, Position::new(0, 4));
    assert_eq!(hover.range.end, Position::new(0, 13));
    assert_eq!(hover.blocks.len(), 2);
    assert_eq!(hover.blocks[0].language, PATH_BLOCK_LANGUAGE);
    assert_eq!(hover.blocks[0].value, "A-B");
    assert_eq!(hover.blocks[1].language, "javascript");
    assert_eq!(hover.blocks[1].value, "loadB()");

    assert!(scanner.hover("x = getRes(2)", Position::new(0, 2), "js").is_none());
    assert!(scanner.hover("x = getRes(2)", Position::new(5, 6), "js").is_none());
}

#[test]
fn test_hover_on_shared_boundary_prefers_resolved_token() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");

    // `getRes(9)` ends where `getRes(2)` starts; 9 is unknown.
    let hover = scanner
        .hover("getRes(9)getRes(2)", Position::new(0, 9), "js")
        .unwrap();
    assert_eq!(hover.range.start, Position::new(0, 9));
    assert_eq!(hover.range.end, Position::new(0, 18));
    assert_eq!(hover.blocks[0].value, "A-B");

    // When both resolve, the earlier token wins.
    let hover = scanner
        .hover("getRes(1)getRes(2)", Position::new(0, 9), "js")
        .unwrap();
    assert_eq!(hover.blocks[0].value, "A");
}

#[test]
fn test_status_uses_resource_id_not_typed_digits() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");

    let result = scanner.scan("getRes(007)", Some(Position::new(0, 8)));
    assert_eq!(result.status.unwrap().text, "7:A-B-c");
}

#[test]
fn test_completion_items() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");

    let items = scanner.completions("let x = getRes(");
    assert_eq!(items.len(), 3);
    assert_eq!(items[1].label, "2: A-B");
    assert_eq!(items[1].detail, "A-B");
    assert_eq!(items[1].insert_text, "2");
    assert_eq!(items[1].sort_text, "b");

    assert!(scanner.completions("let x = getRes").is_empty());
    assert!(scanner.completions("let x = getRes(1").is_empty());
}

#[test]
fn test_completion_at_position() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");

    let text = "first\nlet x = getRes()";
    assert_eq!(scanner.completions_at(text, Position::new(1, 15)).len(), 3);
    assert!(scanner.completions_at(text, Position::new(1, 14)).is_empty());
    assert!(scanner.completions_at(text, Position::new(9, 0)).is_empty());
}

#[test]
fn test_completion_on_empty_snapshot() {
    let snap = Snapshot::empty();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");
    assert!(scanner.completions("getRes(").is_empty());
}

#[test]
fn test_scan_is_repeatable() {
    let snap = snapshot();
    let grammar = TokenGrammar::default();
    let scanner = ReferenceScanner::new(&snap, &grammar, "-");
    let text = "getRes(1) getRes(2)\ngetRes(7)";
    let cursor = Some(Position::new(0, 17));
    assert_eq!(scanner.scan(text, cursor), scanner.scan(text, cursor));
}

#[test]
fn test_split_lines_strips_carriage_returns() {
    assert_eq!(split_lines("a\r\nb\nc"), vec!["a", "b", "c"]);
    assert_eq!(split_lines(""), vec![""]);
}
