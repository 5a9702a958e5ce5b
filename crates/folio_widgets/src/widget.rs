//! Widget identity

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a registered widget
    ///
    /// Issued by [`WidgetContext::register_widget`] and stable for the
    /// widget's lifetime. Slotmap versioning means a recycled slot never
    /// aliases a previously unregistered widget.
    ///
    /// [`WidgetContext::register_widget`]: crate::context::WidgetContext::register_widget
    pub struct WidgetId;
}
