use document_core::{
    CellShaper, Document, PanelParagraph, Paragraph, TextParagraph, TextRange,
};

fn nested_document() -> Document {
    let mut doc = Document::new(Box::new(CellShaper::default()));
    doc.set_available_width(80.0);
    doc.remove_paragraph(0);
    doc.append_paragraph(Box::new(TextParagraph::new("hello")));
    doc.append_paragraph(Box::new(PanelParagraph::with_children(vec![
        Box::new(TextParagraph::new("ab")),
        Box::new(TextParagraph::new("cd")),
    ])));
    doc.append_paragraph(Box::new(TextParagraph::new("tail")));
    doc.layout();
    doc
}

#[test]
fn test_leaf_partial_sub_run() {
    let para = TextParagraph::new("123456789"); // length 10 with the terminator
    let runs = para.interacting_runs(TextRange::new(3, 7));
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].offset, 3);
    assert_eq!(runs[0].length, 4);
    assert!(runs[0].partial);
}

#[test]
fn test_leaf_full_sub_run() {
    let para = TextParagraph::new("123456789");
    let runs = para.interacting_runs(TextRange::new(0, 10));
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].offset, 0);
    assert_eq!(runs[0].length, 10);
    assert!(!runs[0].partial);
}

#[test]
fn test_recursive_runs_cover_selection_without_gaps_or_overlaps() {
    let doc = nested_document();
    let total = doc.code_point_length();
    // Document spans: "hello"¶ [0,6), panel [6,12), "tail"¶ [12,17).
    for (start, end) in [(0, total), (2, 9), (6, 12), (5, 13), (7, 8), (11, 17)] {
        let info = doc.selection_info(TextRange::new(start, end));
        let mut cursor = start;
        for run in &info.recursive_interacting_runs {
            let range = run.global_range();
            assert_eq!(
                range.minimum(),
                cursor,
                "gap or overlap before {:?} in [{start},{end})",
                range
            );
            cursor = range.maximum();
        }
        assert_eq!(cursor, end, "selection [{start},{end}) not fully covered");
    }
}

#[test]
fn test_recursive_runs_are_all_leaves() {
    let doc = nested_document();
    let info = doc.selection_info(TextRange::new(0, doc.code_point_length()));
    for run in &info.recursive_interacting_runs {
        assert!(!run.paragraph.is_container());
    }
    assert_eq!(info.recursive_interacting_runs.len(), 4);
}

#[test]
fn test_bfs_keeps_fully_covered_composite_grouped() {
    let doc = nested_document();
    // Selection covering the nested panel entirely.
    let info = doc.selection_info(TextRange::new(0, 13));
    let nodes = &info.bfs_interacting_runs;
    assert_eq!(nodes.len(), 3);
    assert!(nodes[1].sub_run.paragraph.is_container());
    assert!(!nodes[1].sub_run.partial);

    // Its children are produced lazily and the sequence is restartable.
    let first_pass = nodes[1].children();
    let second_pass = nodes[1].children();
    assert_eq!(first_pass.len(), 2);
    assert_eq!(second_pass.len(), 2);
    assert!(!first_pass[0].sub_run.paragraph.is_container());
}

#[test]
fn test_bfs_flattens_partially_covered_composite() {
    let doc = nested_document();
    // Selection ends inside the nested panel's first leaf.
    let info = doc.selection_info(TextRange::new(0, 8));
    let nodes = &info.bfs_interacting_runs;
    assert_eq!(nodes.len(), 2);
    // The second node is the panel's leaf, not the panel.
    assert!(!nodes[1].sub_run.paragraph.is_container());
    assert_eq!(nodes[1].sub_run.offset, 0);
    assert_eq!(nodes[1].sub_run.length, 2);
    assert!(nodes[1].children().is_empty());
}

#[test]
fn test_selection_info_resolves_endpoint_carets() {
    let doc = nested_document();
    let info = doc.selection_info(TextRange::new(2, 7));
    let start = info.start_caret.expect("start caret");
    let end = info.end_caret.expect("end caret");
    assert_eq!(start.code_point_index, 2);
    assert_eq!(start.line_index, 0);
    assert_eq!(end.code_point_index, 7);
    assert_eq!(end.line_index, 1);
}

#[test]
fn test_reversed_selection_decomposes_like_forward() {
    let doc = nested_document();
    let fwd = doc.selection_info(TextRange::new(2, 9));
    let rev = doc.selection_info(TextRange::new(9, 2));
    assert_eq!(
        fwd.recursive_interacting_runs.len(),
        rev.recursive_interacting_runs.len()
    );
    for (a, b) in fwd
        .recursive_interacting_runs
        .iter()
        .zip(&rev.recursive_interacting_runs)
    {
        assert_eq!(a.global_range().normalized(), b.global_range().normalized());
        assert_eq!(a.partial, b.partial);
    }
}
