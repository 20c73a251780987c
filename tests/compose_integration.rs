//! Integration tests for template composition

use std::rc::Rc;

use pretty_assertions::assert_eq;
use serde_json::json;

use exercise_widgets::compositor::Compositor;
use exercise_widgets::dom::{serialize_element, Element};
use exercise_widgets::render::{AllowListSanitizer, MarkdownRenderer};
use exercise_widgets::spatial::{ControlKind, Coord, Surface};
use exercise_widgets::{
    ControlHandle, FieldRegistry, InputControl, MemoryRecord, MimeBundle, SpatialConfig,
    SpatialControl, SpatialWidget, WidgetError,
};

fn registry(fields: &[(&str, &str)]) -> FieldRegistry {
    FieldRegistry::rebuild(
        fields
            .iter()
            .map(|(name, text)| (name.to_string(), MimeBundle::plain(*text))),
        Vec::new(),
    )
}

fn compose(template: &str, registry: &FieldRegistry) -> (Element, Vec<String>) {
    let (sanitizer, renderer) = (AllowListSanitizer::new(), MarkdownRenderer::new());
    let compositor = Compositor::new(&sanitizer, &renderer);
    let mut host = Element::new("div");
    let report = pollster::block_on(compositor.render_template(template, registry, &mut host))
        .expect("compose");
    (host, report.placed().map(str::to_string).collect())
}

fn hotspot_widget(id: &str) -> Rc<SpatialWidget> {
    let control = SpatialControl::with_spots(
        id,
        ControlKind::Hotspot,
        Surface::new(100, 60),
        &[Coord::new(10, 20), Coord::new(30, 40)],
        SpatialConfig::default(),
    );
    let record = Rc::new(MemoryRecord::with_values([("value", json!([]))]));
    Rc::new(SpatialWidget::new(control, record))
}

#[test]
fn test_brace_field_renders_value() {
    let (host, placed) = compose("Value: {{x}}", &registry(&[("x", "42")]));
    assert_eq!(host.text_content().trim(), "Value: 42");
    assert_eq!(placed, vec!["x".to_string()]);
}

#[test]
fn test_latex_field_is_inlined_into_math() {
    let (host, placed) = compose("Solve $x = <<a:latex>>$", &registry(&[("a", "3")]));
    let math = host
        .find(&|e| e.has_class("math"))
        .expect("math span");
    assert_eq!(math.text_content(), "x = 3");
    assert_eq!(placed, vec!["a".to_string()]);
}

#[test]
fn test_each_placeholder_is_filled_once() {
    let (host, placed) = compose("<<a>> then <<b>> then <<a>>", &registry(&[("a", "1"), ("b", "2")]));
    assert_eq!(placed.len(), 3);
    let fields = host.find_all(&|e| e.has_class("field"));
    assert_eq!(fields.len(), 3);
    for field in fields {
        assert_eq!(field.children.len(), 1);
    }
}

#[test]
fn test_compose_twice_gives_same_tree() {
    let fields = registry(&[("x", "42")]);
    let (sanitizer, renderer) = (AllowListSanitizer::new(), MarkdownRenderer::new());
    let compositor = Compositor::new(&sanitizer, &renderer);
    let mut host = Element::new("div");
    pollster::block_on(compositor.render_template("**Value** <<x>>", &fields, &mut host)).unwrap();
    let first = serialize_element(&host);
    pollster::block_on(compositor.render_template("**Value** <<x>>", &fields, &mut host)).unwrap();
    assert_eq!(serialize_element(&host), first);
}

#[test]
fn test_unknown_field_is_left_literal() {
    let (host, placed) = compose("Keep {{z}} as is", &FieldRegistry::new());
    assert_eq!(host.text_content().trim(), "Keep {{z}} as is");
    assert!(placed.is_empty());
}

#[test]
fn test_script_is_sanitized_away() {
    let (host, _) = compose("<script>alert(1)</script>Safe <<x>>", &registry(&[("x", "ok")]));
    assert!(host.find(&|e| e.tag == "script").is_none());
    assert_eq!(host.text_content().trim(), "Safe ok");
}

#[test]
fn test_control_is_mounted_into_its_field() {
    let widget = hotspot_widget("spots");
    let fields = FieldRegistry::new().with_controls([("spots".to_string(), widget.clone() as ControlHandle)]);
    let (host, placed) = compose("Click: <<spots>>", &fields);
    assert_eq!(placed, vec!["spots".to_string()]);
    assert!(widget.is_displayed());
    let field = host
        .find(&|e| e.has_class("ifield"))
        .expect("input field span");
    assert!(field.find(&|e| e.has_class("spatial-widget")).is_some());
}

#[test]
fn test_mount_before_display_fails() {
    let widget = hotspot_widget("spots");
    let renderer = MarkdownRenderer::new();
    let err = pollster::block_on(widget.mount(&renderer)).unwrap_err();
    assert!(matches!(err, WidgetError::NotDisplayed { id } if id == "spots"));
}

#[test]
fn test_entity_encoded_script_stays_inert() {
    let (host, _) = compose("a &lt;script&gt;alert(1)&lt;/script&gt; b", &FieldRegistry::new());
    assert!(host.find(&|e| e.tag == "script").is_none());
}

#[test]
fn test_latex_field_markup_outside_math_is_sanitized() {
    let fields = registry(&[("x", "<img src=x onerror=alert(1)>")]);
    let (host, placed) = compose("$<<x:latex>>$ and <<x:latex>>", &fields);
    assert_eq!(placed.len(), 2);
    let handlers = host.find_all(&|e| e.attrs.iter().any(|(name, _)| name.starts_with("on")));
    assert!(handlers.is_empty());
}

#[test]
fn test_control_in_math_is_skipped() {
    let widget = hotspot_widget("w");
    let fields = FieldRegistry::new().with_controls([("w".to_string(), widget.clone() as ControlHandle)]);
    let (sanitizer, renderer) = (AllowListSanitizer::new(), MarkdownRenderer::new());
    let compositor = Compositor::new(&sanitizer, &renderer);
    let mut host = Element::new("div");
    let report = pollster::block_on(compositor.render_template("$x = <<w:latex>>$", &fields, &mut host))
        .expect("compose");

    assert_eq!(report.skipped, vec!["w".to_string()]);
    assert!(report.placed().next().is_none());
    assert!(!widget.is_displayed());
    let math = host.find(&|e| e.has_class("math")).expect("math span");
    assert!(!math.text_content().contains("data-field-name"));
}
