//! Property tests for undo/redo symmetry over random editing sessions

use pipeline_canvas::geometry::global_origin;
use pipeline_canvas::{Editor, GraphDocument, NodeId, NodeKind, Point, Rect, Size};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add { kind: usize, x: f64, y: f64, nested: bool },
    Connect { from: usize, to: usize },
    Remove { index: usize },
    Move { index: usize, x: f64, y: f64 },
    Expand { index: usize, kind: usize },
    Toggle { index: usize },
    Resize { index: usize, width: f64, height: f64 },
    Merge { from: usize, to: usize },
}

const KINDS: [NodeKind; 9] = [
    NodeKind::Placeholder,
    NodeKind::Source,
    NodeKind::Filter,
    NodeKind::Transform,
    NodeKind::Constant,
    NodeKind::Aggregate,
    NodeKind::Sink,
    NodeKind::Group,
    NodeKind::Branch,
];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..KINDS.len(), -500.0f64..500.0, -500.0f64..500.0, any::<bool>())
            .prop_map(|(kind, x, y, nested)| Op::Add { kind, x, y, nested }),
        2 => (0usize..32, 0usize..32).prop_map(|(from, to)| Op::Connect { from, to }),
        1 => (0usize..32).prop_map(|index| Op::Remove { index }),
        2 => (0usize..32, -500.0f64..500.0, -500.0f64..500.0)
            .prop_map(|(index, x, y)| Op::Move { index, x, y }),
        2 => (0usize..32, 0..KINDS.len()).prop_map(|(index, kind)| Op::Expand { index, kind }),
        1 => (0usize..32).prop_map(|index| Op::Toggle { index }),
        1 => (0usize..32, 100.0f64..900.0, 100.0f64..900.0)
            .prop_map(|(index, width, height)| Op::Resize { index, width, height }),
        1 => (0usize..32, 0usize..32).prop_map(|(from, to)| Op::Merge { from, to }),
    ]
}

fn pick(editor: &Editor, index: usize) -> Option<NodeId> {
    let nodes = editor.store().nodes();
    (!nodes.is_empty()).then(|| nodes[index % nodes.len()].id.clone())
}

fn pick_where(editor: &Editor, index: usize, keep: impl Fn(NodeKind) -> bool) -> Option<NodeId> {
    let ids: Vec<NodeId> = editor
        .store()
        .nodes()
        .iter()
        .filter(|n| keep(n.kind))
        .map(|n| n.id.clone())
        .collect();
    (!ids.is_empty()).then(|| ids[index % ids.len()].clone())
}

/// Run `op`, ignoring rejected intents.
fn run(editor: &mut Editor, op: &Op) {
    match *op {
        Op::Add { kind, x, y, nested } => {
            let parent = if nested {
                pick_where(editor, kind, NodeKind::is_container)
            } else {
                None
            };
            let _ = editor.add_node(KINDS[kind], Point::new(x, y), parent.as_ref());
        }
        Op::Connect { from, to } => {
            if let (Some(a), Some(b)) = (pick(editor, from), pick(editor, to)) {
                let _ = editor.connect(&a, &b);
            }
        }
        Op::Remove { index } => {
            if let Some(id) = pick(editor, index) {
                let _ = editor.remove_node(&id);
            }
        }
        Op::Move { index, x, y } => {
            if let Some(id) = pick(editor, index) {
                let _ = editor.move_node(&id, Point::new(x, y));
            }
        }
        Op::Expand { index, kind } => {
            if let Some(id) = pick_where(editor, index, NodeKind::is_placeholder) {
                let _ = editor.expand(&id, KINDS[kind]);
            }
        }
        Op::Toggle { index } => {
            if let Some(id) = pick_where(editor, index, NodeKind::is_container) {
                let _ = editor.toggle_container(&id);
            }
        }
        Op::Resize { index, width, height } => {
            if let Some(id) = pick_where(editor, index, NodeKind::is_container) {
                if editor.resize_container(&id, Size::new(width, height)).is_ok() {
                    let _ = editor.end_resize(&id);
                }
            }
        }
        Op::Merge { from, to } => {
            if let (Some(a), Some(b)) = (pick(editor, from), pick(editor, to)) {
                if let Some(target) = editor.node(&b).map(|n| n.local_rect()) {
                    let origin = global_origin(editor.store(), &b).unwrap_or(target.origin);
                    let size = editor.node(&a).map(|n| n.size).unwrap_or(target.size);
                    editor.drag_tick(&a, Rect::new(origin, size));
                    let _ = editor.end_drag(&a);
                }
            }
        }
    }
}

fn graph(editor: &Editor) -> GraphDocument {
    editor.export_document()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_undo_all_restores_initial_graph(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut editor = Editor::default();
        let initial = graph(&editor);

        for op in &ops {
            run(&mut editor, op);
        }
        let last = graph(&editor);
        let depth = editor.history().undo_len();

        while editor.can_undo() {
            editor.undo().unwrap();
        }
        prop_assert_eq!(graph(&editor), initial);

        for _ in 0..depth {
            editor.redo().unwrap();
        }
        prop_assert!(!editor.can_redo());
        prop_assert_eq!(graph(&editor), last);
    }

    #[test]
    fn prop_each_undo_reverts_exactly_one_step(ops in prop::collection::vec(op_strategy(), 1..25)) {
        let mut editor = Editor::default();
        let mut states = vec![graph(&editor)];

        for op in &ops {
            let before = editor.history().undo_len();
            run(&mut editor, op);
            if editor.history().undo_len() > before {
                states.push(graph(&editor));
            }
        }

        while let Some(expected) = states.pop() {
            prop_assert_eq!(graph(&editor), expected);
            if editor.can_undo() {
                editor.undo().unwrap();
            }
        }
    }
}

#[test]
fn test_undo_on_fresh_editor_is_rejected() {
    let mut editor = Editor::default();
    let err = editor.undo().unwrap_err();
    assert!(err.is_rejected_intent());
    let err = editor.redo().unwrap_err();
    assert!(err.is_rejected_intent());
}

#[test]
fn test_new_edit_discards_redo() {
    let mut editor = Editor::default();
    editor.add_node(NodeKind::Source, Point::ZERO, None).unwrap();
    editor.undo().unwrap();
    assert!(editor.can_redo());

    editor.add_node(NodeKind::Sink, Point::ZERO, None).unwrap();
    assert!(!editor.can_redo());
}
