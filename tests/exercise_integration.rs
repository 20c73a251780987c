//! Integration tests for the exercise shell

use std::rc::Rc;

use pretty_assertions::assert_eq;
use serde_json::json;

use exercise_widgets::compositor::Compositor;
use exercise_widgets::disclosure::{DISPLAYED_MAX_SCORE_KEY, DISPLAYED_SCORE_KEY, SCORE_KEY};
use exercise_widgets::dom::{Element, Node};
use exercise_widgets::host::HostRecord;
use exercise_widgets::exercise::{SubmitAction, SubmitState};
use exercise_widgets::render::{AllowListSanitizer, MarkdownRenderer};
use exercise_widgets::spatial::{ControlKind, Coord, Surface, SurfaceEvent, VALUE_KEY};
use exercise_widgets::{
    ControlHandle, Exercise, ExerciseContent, FieldRegistry, InputControl, MemoryRecord,
    MimeBundle, SpatialConfig, SpatialControl, SpatialWidget,
};

fn widget(values: serde_json::Value) -> Rc<SpatialWidget> {
    widget_with_record(Rc::new(MemoryRecord::with_values([(VALUE_KEY, values)])))
}

fn widget_with_record(record: Rc<MemoryRecord>) -> Rc<SpatialWidget> {
    let control = SpatialControl::with_spots(
        "spots",
        ControlKind::Hotspot,
        Surface::new(100, 60),
        &[Coord::new(10, 20), Coord::new(30, 40)],
        SpatialConfig::default(),
    );
    Rc::new(SpatialWidget::new(control, record))
}

fn exercise(content: ExerciseContent, widget: &Rc<SpatialWidget>) -> Exercise {
    let fields = FieldRegistry::rebuild(
        vec![("n".to_string(), MimeBundle::plain("2"))],
        Vec::new(),
    );
    Exercise::new(
        content,
        fields,
        vec![("spots".to_string(), widget.clone() as ControlHandle)],
    )
}

fn render(exercise: &Exercise) -> Element {
    let (sanitizer, renderer) = (AllowListSanitizer::new(), MarkdownRenderer::new());
    let compositor = Compositor::new(&sanitizer, &renderer);
    pollster::block_on(exercise.render(&compositor)).expect("render")
}

fn section<'a>(root: &'a Element, class: &str) -> &'a Element {
    root.find(&|e| e.has_class(class))
        .unwrap_or_else(|| panic!("no {class} section"))
}

#[test]
fn test_submit_with_empty_input_warns_first() {
    let spots = widget(json!([]));
    let mut exercise = exercise(ExerciseContent::default(), &spots);

    assert_eq!(
        exercise.submit(),
        SubmitAction::Warn("There are empty input fields.")
    );
    assert_eq!(exercise.submit_button().state(), SubmitState::Unfinished);
    assert_eq!(exercise.submit_button().label(), "Submit anyway?");
    assert_eq!(exercise.warning(), "There are empty input fields.");
    assert!(!spots.status().disabled);

    assert_eq!(exercise.submit(), SubmitAction::Submit);
    assert!(exercise.is_submitted());
    assert!(spots.status().disabled);
}

#[test]
fn test_input_change_rearms_submit() {
    let spots = widget(json!([]));
    let mut exercise = exercise(ExerciseContent::default(), &spots);
    exercise.submit();

    assert_eq!(exercise.submit_button().label(), "Submit anyway?");

    spots.dispatch(&SurfaceEvent::Click(Coord::new(10, 20)));
    assert_eq!(exercise.submit_button().state(), SubmitState::Initial);
    assert_eq!(exercise.submit_button().label(), "Submit");
    assert_eq!(exercise.warning(), "");

    assert_eq!(exercise.submit(), SubmitAction::Submit);
}

#[test]
fn test_hints_are_revealed_in_order() {
    let spots = widget(json!([]));
    let content = ExerciseContent {
        hints: vec!["Look left".to_string(), "Look up".to_string()],
        ..ExerciseContent::default()
    };
    let mut exercise = exercise(content, &spots);
    assert_eq!(exercise.hint_button().label(), "Next Hint");
    assert_eq!(exercise.reveal_hint(), Some("Look left"));

    let root = render(&exercise);
    let hints = section(&root, "hints");
    assert_eq!(hints.children.len(), 1);
    assert_eq!(hints.text_content().trim(), "Look left");

    assert_eq!(exercise.reveal_hint(), Some("Look up"));
    assert_eq!(exercise.reveal_hint(), None);
    assert_eq!(exercise.hint_button().label(), "No Further Hints");
}

#[test]
fn test_render_places_control_only_in_problem() {
    let spots = widget(json!(["30,40"]));
    let content = ExerciseContent {
        preamble: "Count <<n>> spots".to_string(),
        problem: "Pick <<n>>: <<spots>>".to_string(),
        feedback: "Also <<spots>>".to_string(),
        ..ExerciseContent::default()
    };
    let root = render(&exercise(content, &spots));

    assert_eq!(section(&root, "preamble").text_content().trim(), "Count 2 spots");
    let problem = section(&root, "problem");
    assert!(problem.find(&|e| e.has_class("spatial-widget")).is_some());
    let feedback = section(&root, "feedback");
    assert!(feedback.find(&|e| e.has_class("spatial-widget")).is_none());
}

#[test]
fn test_separators_hide_with_empty_sections() {
    let spots = widget(json!([]));
    let content = ExerciseContent {
        problem: "Pick one".to_string(),
        feedback: "Well done".to_string(),
        ..ExerciseContent::default()
    };
    let root = render(&exercise(content, &spots));
    let separators: Vec<bool> = root
        .children
        .iter()
        .filter_map(Node::as_element)
        .filter(|e| e.tag == "hr")
        .map(|e| e.has_class("hide"))
        .collect();
    // after user output, preamble, hints, feedback and debug area
    assert_eq!(separators, vec![false, true, false, false, true]);
}

#[test]
fn test_total_score_alert() {
    let spots = widget(json!([]));
    let mut exercise = exercise(ExerciseContent::default(), &spots);
    exercise.set_total_score(Some(3.0), Some(4.0));
    let root = render(&exercise);
    let shown: Vec<String> = root
        .find_all(&|e| e.has_class("alert") && e.has_class("show"))
        .into_iter()
        .map(Element::text_content)
        .collect();
    assert_eq!(shown, vec!["Total Score: 3.0/4.0".to_string()]);
}

#[test]
fn test_remote_value_change_rearms_submit() {
    let record = Rc::new(MemoryRecord::with_values([(VALUE_KEY, json!([]))]));
    let spots = widget_with_record(record.clone());
    let mut exercise = exercise(ExerciseContent::default(), &spots);
    exercise.submit();
    assert_eq!(exercise.warning(), "There are empty input fields.");

    record.apply_remote(VALUE_KEY, json!(["30,40"]));
    assert_eq!(exercise.submit_button().label(), "Submit");
    assert_eq!(exercise.warning(), "");
}

#[test]
fn test_submit_displays_control_score() {
    let record = Rc::new(MemoryRecord::with_values([
        (VALUE_KEY, json!(["10,20"])),
        (SCORE_KEY, json!("")),
        (DISPLAYED_SCORE_KEY, json!(1.0)),
        (DISPLAYED_MAX_SCORE_KEY, json!(2.0)),
    ]));
    let spots = widget_with_record(record.clone());
    let mut exercise = exercise(ExerciseContent::default(), &spots);
    assert!(spots.panel().is_disabled());

    assert_eq!(exercise.submit(), SubmitAction::Submit);
    assert_eq!(record.get(SCORE_KEY), Some(json!("Score: 1.0/2.0")));
    let panel = spots.panel();
    assert!(!panel.is_disabled());
    assert_eq!(panel.score(), "Score: 1.0/2.0");
}

#[test]
fn test_submit_without_score_parts_leaves_score() {
    let record = Rc::new(MemoryRecord::with_values([
        (VALUE_KEY, json!(["10,20"])),
        (SCORE_KEY, json!("")),
    ]));
    let spots = widget_with_record(record.clone());
    let mut exercise = exercise(ExerciseContent::default(), &spots);
    exercise.submit();
    assert_eq!(record.get(SCORE_KEY), Some(json!("")));
    assert!(spots.panel().is_disabled());
}
