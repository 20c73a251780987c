//! Input controls as seen by the compositor
//!
//! A control is mounted into a placeholder span during the second
//! composition pass. Every control shares the same status styling, driven by
//! the `valid`, `correct` and `disabled` flags of its host record.

use std::rc::Rc;

use futures_util::future::LocalBoxFuture;

use crate::dom::Element;
use crate::error::WidgetError;
use crate::host::{get_flag, HostRecord, SubscriptionId};
use crate::render::RichRenderer;

/// A live, mountable input control
pub trait InputControl {
    fn control_id(&self) -> &str;

    /// The host signals that the control's view has been displayed
    fn mark_displayed(&self);

    fn is_displayed(&self) -> bool;

    /// Whether the control holds no answer yet
    fn is_empty(&self) -> bool;

    fn status(&self) -> InputStatus;

    /// Stop accepting input
    fn disable(&self);

    /// Run `callback` after every change of the value, local or remote
    fn on_value_change(&self, callback: Rc<dyn Fn()>) -> SubscriptionId;

    fn remove_value_listener(&self, id: SubscriptionId);

    /// Publish the control's own score from its displayed score parts
    fn display_score(&self);

    /// Build the control's subtree. Fails if the control was never displayed.
    fn mount<'a>(
        &'a self,
        renderer: &'a dyn RichRenderer,
    ) -> LocalBoxFuture<'a, Result<Element, WidgetError>>;
}

pub const DISABLED_KEY: &str = "disabled";

/// Shared handle to a control, as stored in a field registry
pub type ControlHandle = Rc<dyn InputControl>;

/// Validity styling of an input control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputStatus {
    pub disabled: bool,
    pub valid: Option<bool>,
    pub correct: Option<bool>,
}

impl InputStatus {
    pub fn from_record(record: &dyn HostRecord) -> Self {
        Self {
            disabled: get_flag(record, DISABLED_KEY).unwrap_or(false),
            valid: get_flag(record, "valid"),
            correct: get_flag(record, "correct"),
        }
    }

    /// `valid`/`invalid` from the `correct` flag once disabled, from the
    /// `valid` flag while enabled
    pub fn status_class(&self) -> Option<&'static str> {
        let flag = if self.disabled {
            self.correct
        } else {
            self.valid
        };
        match flag {
            Some(true) => Some("valid"),
            Some(false) => Some("invalid"),
            None => None,
        }
    }

    pub fn apply(&self, el: &mut Element) {
        el.remove_class("valid");
        el.remove_class("invalid");
        if let Some(class) = self.status_class() {
            el.add_class(class);
        }
        el.set_class("disabled", self.disabled);
    }
}
