//! Spatial controls bound to a host record

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures_util::future::{FutureExt, LocalBoxFuture};
use serde_json::Value;

use super::control::{Outcome, SpatialControl};
use super::state::SurfaceEvent;
use super::value::ValueSet;
use crate::disclosure::{
    score_text, ResultPanel, DISPLAYED_MAX_SCORE_KEY, DISPLAYED_SCORE_KEY, SCORE_KEY, SOLUTION_KEY,
};
use crate::dom::Element;
use crate::error::WidgetError;
use crate::fragment::MimeBundle;
use crate::host::{HostRecord, SubscriptionId};
use crate::input::{InputControl, InputStatus, DISABLED_KEY};
use crate::render::RichRenderer;

pub const VALUE_KEY: &str = "value";

/// A spatial control whose value lives in a host record.
///
/// Every value-changing event reads the current value from the record,
/// mutates it, writes it back and commits, all before returning.
pub struct SpatialWidget {
    id: String,
    control: Rc<RefCell<SpatialControl>>,
    panel: Rc<RefCell<ResultPanel>>,
    record: Rc<dyn HostRecord>,
    displayed: Cell<bool>,
    subscriptions: Vec<SubscriptionId>,
}

impl SpatialWidget {
    pub fn new(mut control: SpatialControl, record: Rc<dyn HostRecord>) -> Self {
        control.on_value_externally_changed(read_value(record.as_ref()));
        let id = control.id().to_string();
        let control = Rc::new(RefCell::new(control));
        let panel = Rc::new(RefCell::new(ResultPanel::from_record(record.as_ref())));

        let mut subscriptions = Vec::new();
        let weak = Rc::downgrade(&control);
        subscriptions.push(record.on_change(
            VALUE_KEY,
            Rc::new(move |value: &Value| {
                if let Some(control) = weak.upgrade() {
                    control
                        .borrow_mut()
                        .on_value_externally_changed(ValueSet::from_json(value));
                }
            }),
        ));
        let weak = Rc::downgrade(&panel);
        subscriptions.push(record.on_change(
            SCORE_KEY,
            Rc::new(move |value: &Value| {
                if let Some(panel) = weak.upgrade() {
                    panel
                        .borrow_mut()
                        .on_score_changed(value.as_str().unwrap_or_default());
                }
            }),
        ));
        let weak = Rc::downgrade(&panel);
        subscriptions.push(record.on_change(
            SOLUTION_KEY,
            Rc::new(move |value: &Value| {
                if let Some(panel) = weak.upgrade() {
                    panel
                        .borrow_mut()
                        .on_solution_changed(MimeBundle::from_wire(value));
                }
            }),
        ));

        Self {
            id,
            control,
            panel,
            record,
            displayed: Cell::new(false),
            subscriptions,
        }
    }

    /// Handle one surface event, committing the value if it changed
    pub fn dispatch(&self, event: &SurfaceEvent) -> Outcome {
        if self.status().disabled {
            return Outcome::Ignored;
        }
        let current = read_value(self.record.as_ref());
        let (outcome, value) = {
            let mut control = self.control.borrow_mut();
            control.adopt_value(current);
            let outcome = control.handle(event);
            (outcome, control.value().to_json())
        };
        if outcome == Outcome::Changed {
            self.commit(value);
        }
        outcome
    }

    /// Clear the value and all decorations
    pub fn reset(&self) -> Outcome {
        let (outcome, value) = {
            let mut control = self.control.borrow_mut();
            let outcome = control.reset();
            (outcome, control.value().to_json())
        };
        if outcome == Outcome::Changed {
            self.commit(value);
        }
        outcome
    }

    fn commit(&self, value: Value) {
        tracing::debug!(control = %self.id, %value, "committing value");
        self.record.set(VALUE_KEY, value);
        self.record.commit();
    }

    pub fn value(&self) -> ValueSet {
        self.control.borrow().value().clone()
    }

    /// Run `f` with the bound control
    pub fn with_control<R>(&self, f: impl FnOnce(&SpatialControl) -> R) -> R {
        f(&self.control.borrow())
    }

    pub fn toggle_result(&self) -> bool {
        self.panel.borrow_mut().toggle()
    }

    pub fn panel(&self) -> ResultPanel {
        self.panel.borrow().clone()
    }

    async fn mount_inner(&self, renderer: &dyn RichRenderer) -> Result<Element, WidgetError> {
        if !self.displayed.get() {
            return Err(WidgetError::NotDisplayed {
                id: self.id.clone(),
            });
        }
        let mut surface = self.control.borrow().render();
        self.status().apply(&mut surface);
        // Clone so the panel borrow is not held across the render await
        let panel = self.panel.borrow().clone();
        let tooltip = panel.render(renderer).await;
        Ok(Element::new("div")
            .with_class("spatial-widget")
            .with_child(surface)
            .with_child(tooltip))
    }
}

impl Drop for SpatialWidget {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.record.unsubscribe(id);
        }
    }
}

impl InputControl for SpatialWidget {
    fn control_id(&self) -> &str {
        &self.id
    }

    fn mark_displayed(&self) {
        self.displayed.set(true);
    }

    fn is_displayed(&self) -> bool {
        self.displayed.get()
    }

    fn is_empty(&self) -> bool {
        self.control.borrow().value().is_empty()
    }

    fn status(&self) -> InputStatus {
        InputStatus::from_record(self.record.as_ref())
    }

    fn disable(&self) {
        self.record.set(DISABLED_KEY, Value::Bool(true));
        self.record.commit();
    }

    fn on_value_change(&self, callback: Rc<dyn Fn()>) -> SubscriptionId {
        self.record.on_change(VALUE_KEY, Rc::new(move |_: &Value| callback()))
    }

    fn remove_value_listener(&self, id: SubscriptionId) {
        self.record.unsubscribe(id);
    }

    fn display_score(&self) {
        let part = |key| self.record.get(key).and_then(|v| v.as_f64());
        let Some(text) = score_text("Score", part(DISPLAYED_SCORE_KEY), part(DISPLAYED_MAX_SCORE_KEY))
        else {
            return;
        };
        tracing::debug!(control = %self.id, score = %text, "displaying score");
        self.record.set(SCORE_KEY, Value::String(text));
        self.record.commit();
    }

    fn mount<'a>(
        &'a self,
        renderer: &'a dyn RichRenderer,
    ) -> LocalBoxFuture<'a, Result<Element, WidgetError>> {
        self.mount_inner(renderer).boxed_local()
    }
}

fn read_value(record: &dyn HostRecord) -> ValueSet {
    record
        .get(VALUE_KEY)
        .map(|v| ValueSet::from_json(&v))
        .unwrap_or_default()
}
