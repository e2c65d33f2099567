//! UI tree collaborator traits.
//!
//! The engine never owns controls; it reads and writes stylesheet slots and
//! triggers style invalidation through these object-safe traits, implemented
//! by the host UI framework.

use std::rc::Rc;

use crate::sheet::RuleSet;

/// The host's UI root: a global stylesheet slot plus the root controls.
pub trait UiRoot {
    fn active_stylesheet(&self) -> Option<Rc<RuleSet>>;
    fn set_active_stylesheet(&mut self, sheet: Option<Rc<RuleSet>>);
    /// Visit each root control, in order.
    fn for_each_root(&mut self, visit: &mut dyn FnMut(&mut dyn Control));
}

/// A single control in the live tree.
pub trait Control {
    fn stylesheet(&self) -> Option<Rc<RuleSet>>;
    fn set_stylesheet(&mut self, sheet: Option<Rc<RuleSet>>);
    /// Visit each direct child, in order.
    fn for_each_child(&mut self, visit: &mut dyn FnMut(&mut dyn Control));
    /// Host hook forcing a visual style refresh.
    fn invalidate_styles(&mut self);
}
