use document_core::{
    CaretPosition, CellShaper, Document, LayoutContext, PanelParagraph, Paragraph, Point,
    TextParagraph, TextRange, Thickness,
};

fn doc_with(texts: &[&str], width: f32) -> Document {
    let mut doc = Document::new(Box::new(CellShaper::default()));
    doc.set_available_width(width);
    doc.remove_paragraph(0);
    for text in texts {
        doc.append_paragraph(Box::new(TextParagraph::new(text)));
    }
    doc.layout();
    doc
}

#[test]
fn test_margins_shrink_the_available_width() {
    // 50 ideographs, two cells each. At width 100 they fit 50 to a line, but
    // a 2+2 horizontal margin leaves 96 cells, so only 48 fit.
    let shaper = CellShaper::default();
    let text: String = std::iter::repeat('\u{4e00}').take(50).collect();
    let margin = Thickness::new(2.0, 0.0, 2.0, 0.0);

    let mut with_margin = TextParagraph::with_margin(&text, margin);
    with_margin.layout(&LayoutContext::new(100.0, &shaper));
    assert_eq!(with_margin.line_count(), 2);
    assert_eq!(with_margin.line_info(0).end.code_point_index, 48);
    assert_eq!(with_margin.content_width_override(), 96.0);
    assert_eq!(with_margin.content_width(), 100.0);

    let mut without = TextParagraph::new(&text);
    without.layout(&LayoutContext::new(100.0, &shaper));
    assert_eq!(without.line_count(), 1);
}

#[test]
fn test_document_caret_and_hit_test_agree() {
    let doc = doc_with(&["hello world", "second"], 6.0);
    // "hello world" wraps into "hello " / "world"; lines 0..3 overall.
    for cp in [0, 3, 7, 13] {
        let caret = doc.caret_info(CaretPosition::new(cp)).expect("caret");
        let hit = doc.hit_test(Point::new(caret.caret_x + 0.1, caret.caret_rect.y + 0.5));
        assert_eq!(hit.closest_line, Some(caret.line_index));
        assert_eq!(hit.closest_code_point_index, Some(cp));
    }
}

#[test]
fn test_alt_caret_resolves_to_previous_line_end() {
    let doc = doc_with(&["hello world"], 6.0);
    let plain = doc.caret_info(CaretPosition::new(6)).expect("caret");
    let alt = doc
        .caret_info(CaretPosition::with_alt_position(6, true))
        .expect("caret");
    assert_eq!(plain.line_index, 1);
    assert_eq!(plain.caret_x, 0.0);
    assert_eq!(alt.line_index, 0);
    assert_eq!(alt.caret_x, 5.0);
}

#[test]
fn test_line_info_walks_the_whole_document() {
    let doc = doc_with(&["hello world", "a", "bb"], 6.0);
    let count = doc.line_count();
    assert_eq!(count, 4);

    // Forward walk via next_line visits every line once.
    let mut line = 0usize;
    let mut visited = vec![doc.line_info(0).line];
    while let Some(next) = doc.line_info(line).next_line {
        visited.push(next);
        line = next;
    }
    assert_eq!(visited, vec![0, 1, 2, 3]);
    assert_eq!(doc.line_info(3).prev_line, Some(2));
    assert_eq!(doc.line_info(0).prev_line, None);
}

#[test]
fn test_from_end_line_indexing() {
    let doc = doc_with(&["one", "two", "three"], 80.0);
    assert_eq!(doc.line_info_from_end(1).line, 2);
    assert_eq!(doc.line_info_from_end(3).line, 0);
    assert_eq!(
        doc.line_info_from_end(1).start.code_point_index,
        doc.line_info(2).start.code_point_index
    );
}

#[test]
fn test_hit_test_outside_content_clamps_closest_and_clears_over() {
    let doc = doc_with(&["ab", "cd"], 80.0);
    let above = doc.hit_test(Point::new(1.0, -5.0));
    assert_eq!(above.closest_line, Some(0));
    assert_eq!(above.over_line, None);
    assert_eq!(above.over_code_point_index, None);

    let below = doc.hit_test(Point::new(1.0, 99.0));
    assert_eq!(below.closest_line, Some(1));
    assert_eq!(below.over_line, None);

    let right = doc.hit_test(Point::new(50.0, 0.5));
    assert_eq!(right.over_line, None);
    assert_eq!(right.closest_line, Some(0));
    // Clamped to the measured end of the line.
    assert_eq!(right.closest_code_point_index, Some(2));
}

#[test]
fn test_nested_panel_layout_accumulates_offsets() {
    let mut doc = Document::new(Box::new(CellShaper::default()));
    doc.set_available_width(80.0);
    doc.remove_paragraph(0);
    doc.append_paragraph(Box::new(TextParagraph::new("ab")));
    doc.append_paragraph(Box::new(PanelParagraph::with_children(vec![
        Box::new(TextParagraph::new("cd")),
        Box::new(TextParagraph::new("ef")),
    ])));
    doc.layout();

    let panel = &doc.root().children()[1];
    let mut expected_base = 0usize;
    let mut bases = Vec::new();
    for child in panel.children() {
        bases.push(child.state().local_info.code_point_index);
        expected_base += child.code_point_length();
    }
    assert_eq!(bases, vec![0, 3]);
    assert_eq!(panel.code_point_length(), expected_base);
    assert_eq!(
        panel.line_count(),
        panel.children().iter().map(|c| c.line_count()).sum::<usize>()
    );

    // A caret inside the nested second leaf carries the composed offsets.
    let caret = doc.caret_info(CaretPosition::new(7)).expect("caret");
    assert_eq!(caret.line_index, 2);
    assert_eq!(caret.caret_x, 1.0);
    assert_eq!(caret.caret_rect.y, 2.0);
}

#[test]
fn test_layout_is_idempotent_at_document_level() {
    let mut doc = doc_with(&["hello brave world"], 10.0);
    let lines = doc.line_count();
    let first = doc.line_info(1);
    doc.layout();
    assert_eq!(doc.line_count(), lines);
    assert_eq!(doc.line_info(1).start, first.start);
    assert_eq!(doc.line_info(1).end, first.end);
}

#[test]
fn test_selection_highlight_paint_is_read_only() {
    use document_core::{PaintOptions, Rect, RenderSurface, StyleId};

    #[derive(Default)]
    struct RecordingSurface {
        runs: Vec<(Point, String)>,
        fills: Vec<Rect>,
    }
    impl RenderSurface for RecordingSurface {
        fn draw_text_run(&mut self, origin: Point, text: &str, _style: StyleId) {
            self.runs.push((origin, text.to_string()));
        }
        fn fill_rect(&mut self, rect: Rect) {
            self.fills.push(rect);
        }
    }

    let doc = doc_with(&["ab", "cd"], 80.0);
    let mut surface = RecordingSurface::default();
    let options = PaintOptions {
        view_bounds: Rect::new(0.0, 0.0, 80.0, 80.0),
        selection: Some(TextRange::new(0, 4)),
    };
    doc.paint(&mut surface, &options);

    assert_eq!(surface.runs.len(), 2);
    assert_eq!(surface.runs[0].1, "ab");
    assert_eq!(surface.runs[1].1, "cd");
    assert_eq!(surface.runs[1].0, Point::new(0.0, 1.0));
    // Both paragraphs intersect the selection, so both highlight.
    assert_eq!(surface.fills.len(), 2);
}
