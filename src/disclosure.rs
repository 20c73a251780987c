//! Result disclosure panel and alert boxes
//!
//! Every input control carries a small panel revealing its score and the
//! reference solution. Exercises use alert boxes for warnings, hints and the
//! total score.

use std::str::FromStr;

use crate::dom::{Element, Node};
use crate::error::WidgetError;
use crate::fragment::MimeBundle;
use crate::host::{get_string, HostRecord};
use crate::render::RichRenderer;

pub const SCORE_KEY: &str = "_score";
pub const SOLUTION_KEY: &str = "_solution_mime_bundle";
pub const DISPLAYED_SCORE_KEY: &str = "displayed_score";
pub const DISPLAYED_MAX_SCORE_KEY: &str = "displayed_max_score";

/// Score number as the grader reports it: integral values keep a `.0`
pub fn format_score(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}inf")
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// `"{label}: {score}/{max}"` with `?` for an unknown part, or nothing when
/// both parts are unknown
pub fn score_text(label: &str, score: Option<f64>, max_score: Option<f64>) -> Option<String> {
    if score.is_none() && max_score.is_none() {
        return None;
    }
    let part = |v: Option<f64>| v.map_or_else(|| "?".to_string(), format_score);
    Some(format!("{label}: {}/{}", part(score), part(max_score)))
}

/// Score/solution panel state.
///
/// The toggle is disabled while there is neither a score nor a solution;
/// the divider between them is shown only when both are present. Both
/// flags are recomputed the same way whichever of the two changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPanel {
    score: String,
    solution: Option<MimeBundle>,
    disabled: bool,
    divider_visible: bool,
    open: bool,
}

impl Default for ResultPanel {
    fn default() -> Self {
        Self {
            score: String::new(),
            solution: None,
            disabled: true,
            divider_visible: false,
            open: false,
        }
    }
}

impl ResultPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: &dyn HostRecord) -> Self {
        let mut panel = Self::new();
        panel.score = get_string(record, SCORE_KEY);
        panel.solution = record.get(SOLUTION_KEY).as_ref().and_then(MimeBundle::from_wire);
        panel.recompute();
        panel
    }

    pub fn on_score_changed(&mut self, score: impl Into<String>) {
        self.score = score.into();
        self.recompute();
    }

    pub fn on_solution_changed(&mut self, solution: Option<MimeBundle>) {
        self.solution = solution;
        self.recompute();
    }

    fn recompute(&mut self) {
        let has_score = !self.score.is_empty();
        let has_solution = self.solution.is_some();
        self.disabled = !has_score && !has_solution;
        self.divider_visible = has_score && has_solution;
    }

    /// Open or close the tooltip; returns whether it is open
    pub fn toggle(&mut self) -> bool {
        if !self.disabled {
            self.open = !self.open;
        }
        self.open
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn divider_visible(&self) -> bool {
        self.divider_visible
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn score(&self) -> &str {
        &self.score
    }

    pub fn solution(&self) -> Option<&MimeBundle> {
        self.solution.as_ref()
    }

    /// Build the panel. A solution the renderer cannot display is left out.
    pub async fn render(&self, renderer: &dyn RichRenderer) -> Element {
        let mut solution = Element::new("span").with_class("solution");
        if let Some(bundle) = &self.solution {
            match renderer.render(bundle).await {
                Ok(node) => solution.append(node),
                Err(err) => tracing::warn!(error = %err, "solution not rendered"),
            }
        }

        let mut divider = Element::new("hr").with_class("tooltip");
        divider.set_class("hide", !self.divider_visible);

        let mut content = Element::new("span")
            .with_class("tooltip-content")
            .with_child(solution)
            .with_child(divider)
            .with_child(Element::new("span").with_class("score").with_text(self.score.clone()));
        content.set_class("show", self.open);

        let mut button = Element::new("button")
            .with_class("result")
            .with_child(Element::new("i").with_class("bi").with_class("bi-question-circle"))
            .with_child(content);
        if self.disabled {
            button.set_attr("disabled", "");
        }

        Element::new("div").with_class("tooltip").with_child(button)
    }
}

/// Kinds of alert boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Warning,
}

impl AlertKind {
    fn class(&self) -> &'static str {
        match self {
            AlertKind::Info => "info",
            AlertKind::Warning => "warning",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            AlertKind::Info => "bi-info-circle",
            AlertKind::Warning => "bi-exclamation-triangle",
        }
    }
}

impl FromStr for AlertKind {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(AlertKind::Info),
            "warning" => Ok(AlertKind::Warning),
            other => Err(WidgetError::InvalidAlertKind(other.to_string())),
        }
    }
}

/// Build a hidden alert box: icon followed by a content span
pub fn alert_box(kind: AlertKind) -> Element {
    Element::new("div")
        .with_class("alert")
        .with_class(kind.class())
        .with_child(Element::new("i").with_class("bi").with_class(kind.icon()))
        .with_child(Element::new("span").with_class("alert-content"))
}

/// Build an alert box from its kind name; only `info` and `warning` exist
pub fn create_alert_box(kind: &str) -> Result<Element, WidgetError> {
    Ok(alert_box(kind.parse()?))
}

/// Set the text of an alert box and show it unless the text is empty
pub fn render_alert_box(host: &mut Element, text: &str) {
    if let Some(Node::Element(content)) = host.children.last_mut() {
        content.set_text_content(text);
    }
    host.set_class("show", !text.is_empty());
}

/// The content span of an alert box
pub fn alert_content_mut(host: &mut Element) -> Option<&mut Element> {
    host.children.last_mut().and_then(Node::as_element_mut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::serialize_element;
    use crate::render::MarkdownRenderer;
    use serde_json::json;

    #[test]
    fn test_panel_flags_in_either_order() {
        let mut a = ResultPanel::new();
        assert!(a.is_disabled());
        a.on_score_changed("1/2");
        assert!(!a.is_disabled());
        assert!(!a.divider_visible());
        a.on_solution_changed(Some(MimeBundle::plain("42")));
        assert!(a.divider_visible());

        let mut b = ResultPanel::new();
        b.on_solution_changed(Some(MimeBundle::plain("42")));
        assert!(!b.is_disabled());
        assert!(!b.divider_visible());
        b.on_score_changed("1/2");
        assert_eq!(a, b);
    }

    #[test]
    fn test_panel_disabled_again_when_cleared() {
        let mut panel = ResultPanel::new();
        panel.on_score_changed("1/2");
        panel.on_score_changed("");
        assert!(panel.is_disabled());
        assert!(!panel.toggle());
    }

    #[test]
    fn test_panel_from_record() {
        let record = crate::host::MemoryRecord::with_values([
            (SCORE_KEY, json!("")),
            (SOLUTION_KEY, json!([{"text/plain": "42"}, {}])),
        ]);
        let mut panel = ResultPanel::from_record(&record);
        assert!(!panel.is_disabled());
        assert!(panel.toggle());
        assert!(panel.is_open());
    }

    #[test]
    fn test_panel_render() {
        let mut panel = ResultPanel::new();
        panel.on_score_changed("2/2");
        let el = pollster::block_on(panel.render(&MarkdownRenderer::new()));
        insta::assert_snapshot!(serialize_element(&el), @r#"<div class="tooltip"><button class="result"><i class="bi bi-question-circle"></i><span class="tooltip-content"><span class="solution"></span><hr class="tooltip hide"><span class="score">2/2</span></span></button></div>"#);
    }

    #[test]
    fn test_score_text() {
        assert_eq!(score_text("Score", None, None), None);
        assert_eq!(score_text("Score", Some(1.0), None).as_deref(), Some("Score: 1.0/?"));
        assert_eq!(score_text("Score", None, Some(2.5)).as_deref(), Some("Score: ?/2.5"));
        assert_eq!(format_score(-3.0), "-3.0");
        assert_eq!(format_score(0.1), "0.1");
    }

    #[test]
    fn test_invalid_alert_kind() {
        assert!(matches!(
            create_alert_box("danger"),
            Err(WidgetError::InvalidAlertKind(kind)) if kind == "danger"
        ));
    }

    #[test]
    fn test_render_alert_box() {
        let mut alert = create_alert_box("warning").expect("alert");
        render_alert_box(&mut alert, "Fill in all fields");
        assert!(alert.has_class("show"));
        assert_eq!(alert.text_content(), "Fill in all fields");
        render_alert_box(&mut alert, "");
        assert!(!alert.has_class("show"));
        assert_eq!(alert.text_content(), "");
    }
}
