//! Exercise composition shell
//!
//! An exercise stacks its sections in a fixed order: user output, preamble,
//! problem, buttons, warning, hints, feedback, total score and debug area.
//! Every prose section is composed from its template; only the problem has
//! input controls available.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;

use crate::compositor::{ComposeReport, Compositor};
use crate::disclosure::{alert_box, alert_content_mut, render_alert_box, score_text, AlertKind};
use crate::dom::Element;
use crate::error::WidgetError;
use crate::fragment::FieldRegistry;
use crate::host::SubscriptionId;
use crate::input::ControlHandle;

/// Templates and flags of an exercise
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExerciseContent {
    pub preamble: String,
    pub problem: String,
    pub feedback: String,
    pub hints: Vec<String>,
    pub debug: bool,
}

/// Button revealing one hint at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintButton {
    hints: Vec<String>,
    index: usize,
    label: &'static str,
    disabled: bool,
}

impl Default for HintButton {
    fn default() -> Self {
        Self {
            hints: Vec::new(),
            index: 0,
            label: "No Hints",
            disabled: true,
        }
    }
}

impl HintButton {
    pub fn new(hints: Vec<String>) -> Self {
        let mut button = Self::default();
        button.set_hints(hints);
        button
    }

    /// Replace the hints and start over
    pub fn set_hints(&mut self, hints: Vec<String>) {
        self.index = 0;
        if hints.is_empty() {
            self.label = "No Hints";
            self.disabled = true;
        } else {
            self.label = "Next Hint";
            self.disabled = false;
        }
        self.hints = hints;
    }

    /// The next hint, or `None` once all were shown
    pub fn next_hint(&mut self) -> Option<String> {
        if self.disabled {
            return None;
        }
        let hint = self.hints.get(self.index)?.clone();
        self.index += 1;
        if self.index >= self.hints.len() {
            self.label = "No Further Hints";
            self.disabled = true;
        }
        Some(hint)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Initial,
    /// A submit attempt found empty or invalid inputs
    Unfinished,
}

/// What pressing submit should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    Submit,
    Warn(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmitButton {
    state: SubmitState,
    disabled: bool,
}

impl SubmitButton {
    pub fn label(&self) -> &'static str {
        match self.state {
            SubmitState::Initial => "Submit",
            SubmitState::Unfinished => "Submit anyway?",
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Press the button. A second press after a warning submits anyway.
    pub fn press(&mut self, invalid: bool, empty: bool) -> SubmitAction {
        if self.state == SubmitState::Unfinished || (!invalid && !empty) {
            return SubmitAction::Submit;
        }
        self.state = SubmitState::Unfinished;
        SubmitAction::Warn(match (invalid, empty) {
            (true, true) => "There are empty and invalid input fields.",
            (true, false) => "There are invalid input fields.",
            _ => "There are empty input fields.",
        })
    }

    /// Any input change re-arms the normal submit
    pub fn reset(&mut self) {
        self.state = SubmitState::Initial;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }
}

/// Text of the total score alert; nothing if both parts are unknown
pub fn total_score_text(score: Option<f64>, max_score: Option<f64>) -> Option<String> {
    score_text("Total Score", score, max_score)
}

/// Submit button and warning, shared with the controls' value listeners
#[derive(Debug, Default)]
struct SubmitStatus {
    button: SubmitButton,
    warning: String,
}

impl SubmitStatus {
    fn rearm(&mut self) {
        self.button.reset();
        self.warning.clear();
    }
}

/// An exercise with its fields, controls and button state.
///
/// Any value change of a control re-arms the submit button, so the
/// exercise listens to every control for as long as it lives.
pub struct Exercise {
    content: ExerciseContent,
    fields: FieldRegistry,
    controls: Vec<(String, ControlHandle)>,
    listeners: Vec<SubscriptionId>,
    hint_button: HintButton,
    submit: Rc<RefCell<SubmitStatus>>,
    displayed_hints: Vec<String>,
    total_score: String,
    submitted: bool,
}

impl Exercise {
    pub fn new(
        content: ExerciseContent,
        fields: FieldRegistry,
        controls: Vec<(String, ControlHandle)>,
    ) -> Self {
        let hint_button = HintButton::new(content.hints.clone());
        let submit = Rc::new(RefCell::new(SubmitStatus::default()));
        let listeners = controls
            .iter()
            .map(|(_, control)| {
                let weak = Rc::downgrade(&submit);
                control.on_value_change(Rc::new(move || {
                    if let Some(submit) = weak.upgrade() {
                        submit.borrow_mut().rearm();
                    }
                }))
            })
            .collect();
        Self {
            content,
            fields,
            controls,
            listeners,
            hint_button,
            submit,
            displayed_hints: Vec::new(),
            total_score: String::new(),
            submitted: false,
        }
    }

    pub fn content(&self) -> &ExerciseContent {
        &self.content
    }

    /// Replace the formatted fields; the registry is rebuilt wholesale
    pub fn set_fields(&mut self, fields: FieldRegistry) {
        self.fields = fields;
    }

    pub fn hint_button(&self) -> &HintButton {
        &self.hint_button
    }

    pub fn submit_button(&self) -> SubmitButton {
        self.submit.borrow().button
    }

    pub fn displayed_hints(&self) -> &[String] {
        &self.displayed_hints
    }

    pub fn warning(&self) -> String {
        self.submit.borrow().warning.clone()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Show the next hint, if any
    pub fn reveal_hint(&mut self) -> Option<&str> {
        let hint = self.hint_button.next_hint()?;
        self.displayed_hints.push(hint);
        self.displayed_hints.last().map(String::as_str)
    }

    /// Re-arm the submit button; runs on every control value change
    pub fn on_input_changed(&self) {
        self.submit.borrow_mut().rearm();
    }

    /// Press submit. On success every control is disabled and shows its
    /// own score.
    pub fn submit(&mut self) -> SubmitAction {
        let invalid = self
            .controls
            .iter()
            .any(|(_, c)| c.status().valid == Some(false));
        let empty = self.controls.iter().any(|(_, c)| c.is_empty());
        let action = {
            let mut submit = self.submit.borrow_mut();
            let action = submit.button.press(invalid, empty);
            match action {
                SubmitAction::Warn(message) => {
                    tracing::debug!(warning = message, "submit held back");
                    submit.warning = message.to_string();
                }
                SubmitAction::Submit => submit.warning.clear(),
            }
            action
        };
        if action == SubmitAction::Submit {
            self.disable();
            for (_, control) in &self.controls {
                control.display_score();
            }
        }
        action
    }

    pub fn disable(&mut self) {
        self.submitted = true;
        self.hint_button.disable();
        self.submit.borrow_mut().button.disable();
        for (_, control) in &self.controls {
            control.disable();
        }
    }

    pub fn set_total_score(&mut self, score: Option<f64>, max_score: Option<f64>) {
        if let Some(text) = total_score_text(score, max_score) {
            self.total_score = text;
        }
    }

    /// Compose every section
    pub async fn render(&self, compositor: &Compositor<'_>) -> Result<Element, WidgetError> {
        let debug = self.content.debug;
        let problem_fields = self.fields.with_controls(self.controls.iter().cloned());
        let mut root = Element::new("div").with_class("exercise");

        let mut user_output = section("user-output");
        if debug {
            user_output.append(Element::new("pre").with_class("output"));
        }
        root.append(user_output);
        root.append(separator(true));

        let mut preamble = section("preamble");
        self.compose("preamble", compositor, &self.content.preamble, &self.fields, &mut preamble)
            .await?;
        root.append(preamble);
        root.append(separator(!self.content.preamble.is_empty()));

        let mut problem = section("problem");
        self.compose("problem", compositor, &self.content.problem, &problem_fields, &mut problem)
            .await?;
        root.append(problem);

        root.append(self.button_area());

        let mut warning = alert_box(AlertKind::Warning);
        render_alert_box(&mut warning, &self.warning());
        root.append(warning);

        let mut hints = section("hints");
        for hint in &self.displayed_hints {
            let mut alert = alert_box(AlertKind::Info).with_class("show");
            if let Some(content) = alert_content_mut(&mut alert) {
                self.compose("hint", compositor, hint, &self.fields, content).await?;
            }
            hints.append(alert);
        }
        root.append(hints);
        root.append(separator(true));

        let mut feedback = section("feedback");
        self.compose("feedback", compositor, &self.content.feedback, &self.fields, &mut feedback)
            .await?;
        root.append(feedback);

        let mut total_score = alert_box(AlertKind::Info);
        render_alert_box(&mut total_score, &self.total_score);
        root.append(total_score);
        root.append(separator(!self.content.feedback.is_empty()));

        let mut debug_area = section("debug");
        if debug {
            debug_area.append(
                Element::new("div").with_child(Element::new("pre").with_class("debug-output")),
            );
        }
        root.append(debug_area);
        root.append(separator(debug));

        Ok(root)
    }

    async fn compose(
        &self,
        name: &str,
        compositor: &Compositor<'_>,
        template: &str,
        registry: &FieldRegistry,
        host: &mut Element,
    ) -> Result<ComposeReport, WidgetError> {
        let report = compositor.render_template(template, registry, host).await?;
        tracing::debug!(
            section = name,
            inlined = report.inlined.len(),
            rendered = report.rendered.len(),
            skipped = report.skipped.len(),
            "section composed"
        );
        Ok(report)
    }

    fn button_area(&self) -> Element {
        let submit = self.submit_button();
        let mut area = section("button-area");
        area.append(button("submit", submit.label(), submit.is_disabled()));
        area.append(button("hint", self.hint_button.label(), self.hint_button.is_disabled()));
        if self.content.debug {
            area.append(button("clear-debug", "Clear Debug", self.submitted));
        }
        area
    }
}

impl Drop for Exercise {
    fn drop(&mut self) {
        for ((_, control), id) in self.controls.iter().zip(self.listeners.drain(..)) {
            control.remove_value_listener(id);
        }
    }
}

fn section(class: &str) -> Element {
    Element::new("div").with_class(class)
}

fn separator(visible: bool) -> Element {
    let mut hr = Element::new("hr");
    hr.set_class("hide", !visible);
    hr
}

fn button(class: &str, label: &str, disabled: bool) -> Element {
    let mut el = Element::new("button").with_class(class).with_text(label);
    if disabled {
        el.set_attr("disabled", "");
    }
    el
}
