//! SpyHost: everything MenuSpy needs from the page
//!
//! Geometry, scroll and navigation reads/writes go through this trait so the
//! resolution logic runs against a real DOM (`web::DomHost`) or an in-memory
//! model in tests. Methods take `&self`; DOM handles are shared references
//! and mutation happens on the host side.

/// Environment access for a scroll spy
pub trait SpyHost {
    /// Handle to a node on the page. Equality must mean "same node".
    type Element: Clone + PartialEq;

    // ----- geometry -----

    /// Rendered height of the menu container
    fn element_height(&self, element: &Self::Element) -> f64;

    /// Distance of the element's top edge from the top of the document
    fn offset_top(&self, element: &Self::Element) -> f64;

    /// Current vertical scroll offset of the document
    fn scroll_top(&self) -> f64;

    fn scroll_to(&self, y: f64);

    // ----- tree queries -----

    /// Descendants of `container` matching `selector`, in document order.
    /// An invalid selector yields nothing.
    fn select_all(&self, container: &Self::Element, selector: &str) -> Vec<Self::Element>;

    /// First document match for `selector`, if any
    fn select_one(&self, selector: &str) -> Option<Self::Element>;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Explicit target selector carried by an entry (`data-target`)
    fn target_selector(&self, entry: &Self::Element) -> Option<String>;

    /// Fragment of the entry's link including the leading `#`, empty if none
    fn link_hash(&self, entry: &Self::Element) -> String;

    fn element_id(&self, element: &Self::Element) -> String;

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    // ----- mutation -----

    fn add_class(&self, element: &Self::Element, class: &str);

    fn remove_class(&self, element: &Self::Element, class: &str);

    // ----- navigation -----

    /// Whether the history API can replace the URL without a new entry
    fn can_replace_history(&self) -> bool;

    /// Replace the current URL's fragment without adding a history entry
    fn replace_hash(&self, hash: &str);

    /// Assign `location.hash` directly (may scroll the page)
    fn assign_hash(&self, hash: &str);

    // ----- time -----

    /// Monotonic clock in milliseconds
    fn now(&self) -> f64;
}
