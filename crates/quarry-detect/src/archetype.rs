//! The component archetype table.
//!
//! A closed enumeration of the component shapes the detector recognizes,
//! each with the evidence profile the eight scoring signals consult:
//! selector substrings, ARIA roles and attributes, semantic tags,
//! computed-style expectations, visual cues, and a behavior profile.
//!
//! The table is data, not code: adding an archetype is one entry, and the
//! closed enum keeps scoring exhaustive and deterministic.

use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// Every component archetype the detector can report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[allow(missing_docs)] // variant names are the documentation
pub enum ComponentKind {
    Accordion,
    Alert,
    AlertDialog,
    AspectRatio,
    Avatar,
    Badge,
    Breadcrumb,
    Button,
    Calendar,
    Card,
    Carousel,
    Chart,
    Checkbox,
    Collapsible,
    Combobox,
    Command,
    ContextMenu,
    DataTable,
    DatePicker,
    Dialog,
    Drawer,
    DropdownMenu,
    Form,
    HoverCard,
    Input,
    InputOtp,
    Label,
    Menubar,
    NavigationMenu,
    Pagination,
    Popover,
    Progress,
    RadioGroup,
    Resizable,
    ScrollArea,
    Select,
    Separator,
    Sheet,
    Sidebar,
    Skeleton,
    Slider,
    Sonner,
    Switch,
    Table,
    Tabs,
    Textarea,
    Toast,
    Toggle,
    ToggleGroup,
    Tooltip,
    Typography,
}

/// A computed-style expectation consulted by the style signal.
#[derive(Debug, Clone, Copy)]
pub enum StyleExpectation {
    /// The property's value must be one of the listed strings.
    OneOf(&'static str, &'static [&'static str]),
    /// The property must be present with any non-initial value.
    Exists(&'static str),
    /// The property must parse to at most this many pixels.
    MaxPx(&'static str, f64),
    /// The property must parse to at least this many pixels.
    MinPx(&'static str, f64),
}

/// A visual-signature cue consulted by the visual signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualCue {
    /// Border radius in the rounded band (2-16px).
    Rounded,
    /// Pill corners: radius at least half the height, or 9999px.
    Pill,
    /// A circle: equal width/height with 50% (or full) radius.
    Circle,
    /// Carries a drop shadow.
    Elevated,
    /// Carries a visible border.
    Bordered,
    /// Lays out as a flex container.
    FlexContainer,
    /// Lays out as a grid container.
    GridContainer,
    /// Paddings sit on the 4px spacing grid.
    SpacingScale,
    /// Truncates text with an ellipsis.
    Truncation,
    /// A thin line: one axis at most 2px.
    ThinLine,
    /// Positioned out of flow (absolute/fixed).
    OutOfFlow,
    /// Horizontal padding at least the vertical padding (control shape).
    WidePadding,
}

/// How an archetype is expected to behave; the behavioral signal scores
/// evidence against this profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorProfile {
    /// Responds to hover/focus/active with transitions.
    Interactive,
    /// Floats above content: positioned, stacked, usually elevated.
    Overlay,
    /// Owns its scrolling.
    Scrollable,
    /// Animates continuously while loading.
    Loading,
    /// Draggable or resizable.
    Draggable,
    /// No interaction expected.
    Static,
}

/// One archetype's complete evidence profile.
#[derive(Debug, Clone, Copy)]
pub struct ArchetypePattern {
    /// Which archetype this profile describes.
    pub kind: ComponentKind,
    /// Substrings matched against selector and class text.
    pub selector_hints: &'static [&'static str],
    /// ARIA roles that identify the archetype.
    pub roles: &'static [&'static str],
    /// `aria-*` attribute names that support the archetype.
    pub aria_hints: &'static [&'static str],
    /// Semantic tags that identify the archetype.
    pub tags: &'static [&'static str],
    /// Computed-style expectations.
    pub style: &'static [StyleExpectation],
    /// Visual cues.
    pub visual: &'static [VisualCue],
    /// Behavior profile.
    pub behavior: BehaviorProfile,
}

use self::BehaviorProfile as B;
use self::StyleExpectation::{Exists, MaxPx, MinPx, OneOf};
use self::VisualCue as V;

/// The full archetype table.
#[must_use]
pub fn patterns() -> &'static [ArchetypePattern] {
    PATTERNS
}

static PATTERNS: &[ArchetypePattern] = &[
    ArchetypePattern {
        kind: ComponentKind::Accordion,
        selector_hints: &["accordion", "collapse-group", "expander"],
        roles: &[],
        aria_hints: &["expanded", "controls"],
        tags: &["details"],
        style: &[],
        visual: &[V::Bordered],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Alert,
        selector_hints: &["alert", "banner", "notice", "callout"],
        roles: &["alert", "status"],
        aria_hints: &["live"],
        tags: &[],
        style: &[Exists("background-color"), Exists("padding")],
        visual: &[V::Rounded, V::SpacingScale],
        behavior: B::Static,
    },
    ArchetypePattern {
        kind: ComponentKind::AlertDialog,
        selector_hints: &["alert-dialog", "alertdialog", "confirm"],
        roles: &["alertdialog"],
        aria_hints: &["modal", "labelledby"],
        tags: &["dialog"],
        style: &[OneOf("position", &["fixed", "absolute"])],
        visual: &[V::Elevated, V::OutOfFlow, V::Rounded],
        behavior: B::Overlay,
    },
    ArchetypePattern {
        kind: ComponentKind::AspectRatio,
        selector_hints: &["aspect-ratio", "aspect"],
        roles: &[],
        aria_hints: &[],
        tags: &[],
        style: &[Exists("aspect-ratio")],
        visual: &[],
        behavior: B::Static,
    },
    ArchetypePattern {
        kind: ComponentKind::Avatar,
        selector_hints: &["avatar", "profile-pic", "user-image"],
        roles: &["img"],
        aria_hints: &["label"],
        tags: &["img"],
        style: &[Exists("border-radius"), MaxPx("width", 128.0)],
        visual: &[V::Circle],
        behavior: B::Static,
    },
    ArchetypePattern {
        kind: ComponentKind::Badge,
        selector_hints: &["badge", "chip", "tag", "pill"],
        roles: &["status"],
        aria_hints: &[],
        tags: &[],
        style: &[MaxPx("font-size", 13.0), Exists("border-radius")],
        visual: &[V::Pill, V::WidePadding],
        behavior: B::Static,
    },
    ArchetypePattern {
        kind: ComponentKind::Breadcrumb,
        selector_hints: &["breadcrumb", "crumbs"],
        roles: &["navigation"],
        aria_hints: &["label", "current"],
        tags: &["nav"],
        style: &[OneOf("display", &["flex", "inline-flex"])],
        visual: &[V::FlexContainer],
        behavior: B::Static,
    },
    ArchetypePattern {
        kind: ComponentKind::Button,
        selector_hints: &["btn", "button", "cta"],
        roles: &["button"],
        aria_hints: &["pressed", "label"],
        tags: &["button"],
        style: &[
            OneOf("cursor", &["pointer"]),
            OneOf("display", &["inline-flex", "inline-block", "flex", "block"]),
        ],
        visual: &[V::Rounded, V::WidePadding, V::SpacingScale],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Calendar,
        selector_hints: &["calendar", "month-view", "day-grid"],
        roles: &["grid"],
        aria_hints: &["label", "selected"],
        tags: &[],
        style: &[OneOf("display", &["grid", "table"])],
        visual: &[V::GridContainer],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Card,
        selector_hints: &["card", "panel", "tile"],
        roles: &[],
        aria_hints: &[],
        tags: &["article", "section"],
        style: &[Exists("border-radius"), Exists("padding")],
        visual: &[V::Rounded, V::Elevated, V::SpacingScale],
        behavior: B::Static,
    },
    ArchetypePattern {
        kind: ComponentKind::Carousel,
        selector_hints: &["carousel", "slider-track", "swiper", "slideshow"],
        roles: &["region"],
        aria_hints: &["roledescription", "live"],
        tags: &[],
        style: &[OneOf("overflow", &["hidden"]), OneOf("overflow-x", &["hidden", "scroll"])],
        visual: &[V::FlexContainer],
        behavior: B::Scrollable,
    },
    ArchetypePattern {
        kind: ComponentKind::Chart,
        selector_hints: &["chart", "graph", "sparkline", "recharts", "plot"],
        roles: &["img", "figure"],
        aria_hints: &["label"],
        tags: &["svg", "canvas", "figure"],
        style: &[],
        visual: &[],
        behavior: B::Static,
    },
    ArchetypePattern {
        kind: ComponentKind::Checkbox,
        selector_hints: &["checkbox", "check-box"],
        roles: &["checkbox"],
        aria_hints: &["checked"],
        tags: &["input"],
        style: &[MaxPx("width", 28.0), MaxPx("height", 28.0)],
        visual: &[V::Rounded, V::Bordered],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Collapsible,
        selector_hints: &["collapsible", "collapse", "expandable"],
        roles: &[],
        aria_hints: &["expanded", "controls"],
        tags: &["details"],
        style: &[],
        visual: &[],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Combobox,
        selector_hints: &["combobox", "autocomplete", "typeahead"],
        roles: &["combobox"],
        aria_hints: &["expanded", "autocomplete", "activedescendant"],
        tags: &["input"],
        style: &[Exists("border")],
        visual: &[V::Rounded, V::Bordered],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Command,
        selector_hints: &["command", "cmdk", "command-palette", "spotlight"],
        roles: &["dialog", "combobox"],
        aria_hints: &["expanded"],
        tags: &[],
        style: &[OneOf("position", &["fixed", "absolute"])],
        visual: &[V::Elevated, V::OutOfFlow, V::Rounded],
        behavior: B::Overlay,
    },
    ArchetypePattern {
        kind: ComponentKind::ContextMenu,
        selector_hints: &["context-menu", "contextmenu", "right-click"],
        roles: &["menu"],
        aria_hints: &["orientation"],
        tags: &[],
        style: &[OneOf("position", &["fixed", "absolute"])],
        visual: &[V::Elevated, V::OutOfFlow, V::Rounded],
        behavior: B::Overlay,
    },
    ArchetypePattern {
        kind: ComponentKind::DataTable,
        selector_hints: &["data-table", "datatable", "data-grid", "grid-table"],
        roles: &["grid", "table"],
        aria_hints: &["rowcount", "colcount", "sort"],
        tags: &["table"],
        style: &[OneOf("display", &["table", "grid", "block"])],
        visual: &[V::Bordered],
        behavior: B::Scrollable,
    },
    ArchetypePattern {
        kind: ComponentKind::DatePicker,
        selector_hints: &["date-picker", "datepicker", "date-input"],
        roles: &["dialog", "grid"],
        aria_hints: &["label", "selected"],
        tags: &["input"],
        style: &[],
        visual: &[V::Rounded, V::Bordered],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Dialog,
        selector_hints: &["dialog", "modal", "lightbox"],
        roles: &["dialog"],
        aria_hints: &["modal", "labelledby", "describedby"],
        tags: &["dialog"],
        style: &[OneOf("position", &["fixed", "absolute"]), MinPx("z-index", 10.0)],
        visual: &[V::Elevated, V::OutOfFlow, V::Rounded],
        behavior: B::Overlay,
    },
    ArchetypePattern {
        kind: ComponentKind::Drawer,
        selector_hints: &["drawer", "offcanvas", "off-canvas", "slide-panel"],
        roles: &["dialog"],
        aria_hints: &["modal"],
        tags: &["aside"],
        style: &[OneOf("position", &["fixed"]), Exists("transform")],
        visual: &[V::Elevated, V::OutOfFlow],
        behavior: B::Overlay,
    },
    ArchetypePattern {
        kind: ComponentKind::DropdownMenu,
        selector_hints: &["dropdown", "drop-down", "menu-list"],
        roles: &["menu", "listbox"],
        aria_hints: &["expanded", "haspopup", "orientation"],
        tags: &[],
        style: &[OneOf("position", &["absolute", "fixed"]), MinPx("z-index", 10.0)],
        visual: &[V::Elevated, V::OutOfFlow, V::Rounded],
        behavior: B::Overlay,
    },
    ArchetypePattern {
        kind: ComponentKind::Form,
        selector_hints: &["form", "form-group", "fieldset"],
        roles: &["form"],
        aria_hints: &["labelledby"],
        tags: &["form", "fieldset"],
        style: &[],
        visual: &[V::SpacingScale],
        behavior: B::Static,
    },
    ArchetypePattern {
        kind: ComponentKind::HoverCard,
        selector_hints: &["hover-card", "hovercard", "preview-card"],
        roles: &["tooltip", "dialog"],
        aria_hints: &["describedby"],
        tags: &[],
        style: &[OneOf("position", &["absolute", "fixed"])],
        visual: &[V::Elevated, V::OutOfFlow, V::Rounded],
        behavior: B::Overlay,
    },
    ArchetypePattern {
        kind: ComponentKind::Input,
        selector_hints: &["input", "text-field", "textfield", "form-control"],
        roles: &["textbox", "searchbox"],
        aria_hints: &["label", "invalid", "required"],
        tags: &["input"],
        style: &[Exists("border"), Exists("padding")],
        visual: &[V::Rounded, V::Bordered, V::WidePadding],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::InputOtp,
        selector_hints: &["otp", "one-time", "pin-input", "code-input"],
        roles: &["textbox"],
        aria_hints: &["label"],
        tags: &["input"],
        style: &[MaxPx("width", 64.0), OneOf("text-align", &["center"])],
        visual: &[V::Rounded, V::Bordered],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Label,
        selector_hints: &["label", "field-label"],
        roles: &[],
        aria_hints: &[],
        tags: &["label"],
        style: &[MaxPx("font-size", 15.0)],
        visual: &[],
        behavior: B::Static,
    },
    ArchetypePattern {
        kind: ComponentKind::Menubar,
        selector_hints: &["menubar", "menu-bar", "app-menu"],
        roles: &["menubar"],
        aria_hints: &["orientation"],
        tags: &[],
        style: &[OneOf("display", &["flex", "inline-flex"])],
        visual: &[V::FlexContainer],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::NavigationMenu,
        selector_hints: &["nav", "navigation", "navbar", "site-menu"],
        roles: &["navigation"],
        aria_hints: &["label", "current"],
        tags: &["nav"],
        style: &[OneOf("display", &["flex", "inline-flex", "grid"])],
        visual: &[V::FlexContainer],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Pagination,
        selector_hints: &["pagination", "pager", "page-nav"],
        roles: &["navigation"],
        aria_hints: &["label", "current"],
        tags: &["nav"],
        style: &[OneOf("display", &["flex", "inline-flex"])],
        visual: &[V::FlexContainer, V::SpacingScale],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Popover,
        selector_hints: &["popover", "pop-over", "floating-panel"],
        roles: &["dialog", "tooltip"],
        aria_hints: &["haspopup", "expanded"],
        tags: &[],
        style: &[OneOf("position", &["absolute", "fixed"]), MinPx("z-index", 10.0)],
        visual: &[V::Elevated, V::OutOfFlow, V::Rounded],
        behavior: B::Overlay,
    },
    ArchetypePattern {
        kind: ComponentKind::Progress,
        selector_hints: &["progress", "progress-bar", "loading-bar"],
        roles: &["progressbar"],
        aria_hints: &["valuenow", "valuemin", "valuemax"],
        tags: &["progress"],
        style: &[MaxPx("height", 16.0)],
        visual: &[V::Pill, V::ThinLine],
        behavior: B::Loading,
    },
    ArchetypePattern {
        kind: ComponentKind::RadioGroup,
        selector_hints: &["radio-group", "radiogroup", "radio"],
        roles: &["radiogroup", "radio"],
        aria_hints: &["checked"],
        tags: &["input"],
        style: &[],
        visual: &[V::Circle],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Resizable,
        selector_hints: &["resizable", "resize-handle", "splitter", "split-pane"],
        roles: &["separator"],
        aria_hints: &["orientation", "valuenow"],
        tags: &[],
        style: &[OneOf("cursor", &["col-resize", "row-resize", "ew-resize", "ns-resize"])],
        visual: &[V::ThinLine],
        behavior: B::Draggable,
    },
    ArchetypePattern {
        kind: ComponentKind::ScrollArea,
        selector_hints: &["scroll-area", "scrollarea", "scrollable", "overflow-auto"],
        roles: &[],
        aria_hints: &[],
        tags: &[],
        style: &[OneOf("overflow", &["auto", "scroll", "overlay"])],
        visual: &[],
        behavior: B::Scrollable,
    },
    ArchetypePattern {
        kind: ComponentKind::Select,
        selector_hints: &["select", "picker", "listbox"],
        roles: &["listbox", "combobox"],
        aria_hints: &["expanded", "haspopup", "selected"],
        tags: &["select"],
        style: &[Exists("border"), OneOf("cursor", &["pointer", "default"])],
        visual: &[V::Rounded, V::Bordered, V::WidePadding],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Separator,
        selector_hints: &["separator", "divider", "hr"],
        roles: &["separator"],
        aria_hints: &["orientation"],
        tags: &["hr"],
        style: &[MaxPx("height", 2.0)],
        visual: &[V::ThinLine],
        behavior: B::Static,
    },
    ArchetypePattern {
        kind: ComponentKind::Sheet,
        selector_hints: &["sheet", "side-sheet", "bottom-sheet"],
        roles: &["dialog"],
        aria_hints: &["modal"],
        tags: &[],
        style: &[OneOf("position", &["fixed"]), MinPx("z-index", 10.0)],
        visual: &[V::Elevated, V::OutOfFlow],
        behavior: B::Overlay,
    },
    ArchetypePattern {
        kind: ComponentKind::Sidebar,
        selector_hints: &["sidebar", "side-nav", "sidenav", "rail"],
        roles: &["navigation", "complementary"],
        aria_hints: &["label"],
        tags: &["aside", "nav"],
        style: &[MinPx("height", 200.0)],
        visual: &[V::FlexContainer],
        behavior: B::Scrollable,
    },
    ArchetypePattern {
        kind: ComponentKind::Skeleton,
        selector_hints: &["skeleton", "placeholder", "shimmer", "ghost-line"],
        roles: &[],
        aria_hints: &["busy", "hidden"],
        tags: &[],
        style: &[Exists("animation"), Exists("background-color")],
        visual: &[V::Rounded],
        behavior: B::Loading,
    },
    ArchetypePattern {
        kind: ComponentKind::Slider,
        selector_hints: &["slider", "range", "track-thumb"],
        roles: &["slider"],
        aria_hints: &["valuenow", "valuemin", "valuemax", "orientation"],
        tags: &["input"],
        style: &[OneOf("cursor", &["pointer", "grab", "ew-resize"])],
        visual: &[V::ThinLine, V::Pill],
        behavior: B::Draggable,
    },
    ArchetypePattern {
        kind: ComponentKind::Sonner,
        selector_hints: &["sonner", "toaster", "toast-stack", "notification-stack"],
        roles: &["region"],
        aria_hints: &["live", "label"],
        tags: &["ol", "ul"],
        style: &[OneOf("position", &["fixed"]), MinPx("z-index", 100.0)],
        visual: &[V::OutOfFlow],
        behavior: B::Overlay,
    },
    ArchetypePattern {
        kind: ComponentKind::Switch,
        selector_hints: &["switch", "toggle-switch"],
        roles: &["switch"],
        aria_hints: &["checked"],
        tags: &["button", "input"],
        style: &[MaxPx("height", 32.0), MinPx("width", 28.0)],
        visual: &[V::Pill],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Table,
        selector_hints: &["table"],
        roles: &["table"],
        aria_hints: &["rowcount"],
        tags: &["table", "thead", "tbody"],
        style: &[OneOf("display", &["table", "table-row-group"])],
        visual: &[],
        behavior: B::Static,
    },
    ArchetypePattern {
        kind: ComponentKind::Tabs,
        selector_hints: &["tabs", "tab-list", "tablist", "tab-bar"],
        roles: &["tablist", "tab", "tabpanel"],
        aria_hints: &["selected", "controls", "orientation"],
        tags: &[],
        style: &[OneOf("display", &["flex", "inline-flex"])],
        visual: &[V::FlexContainer, V::Bordered],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Textarea,
        selector_hints: &["textarea", "text-area", "multiline"],
        roles: &["textbox"],
        aria_hints: &["label", "invalid"],
        tags: &["textarea"],
        style: &[Exists("border"), MinPx("height", 48.0)],
        visual: &[V::Rounded, V::Bordered],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Toast,
        selector_hints: &["toast", "snackbar", "notification"],
        roles: &["status", "alert"],
        aria_hints: &["live", "atomic"],
        tags: &[],
        style: &[OneOf("position", &["fixed", "absolute"]), Exists("background-color")],
        visual: &[V::Elevated, V::Rounded, V::OutOfFlow],
        behavior: B::Overlay,
    },
    ArchetypePattern {
        kind: ComponentKind::Toggle,
        selector_hints: &["toggle", "toggle-button"],
        roles: &["button"],
        aria_hints: &["pressed"],
        tags: &["button"],
        style: &[OneOf("cursor", &["pointer"])],
        visual: &[V::Rounded],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::ToggleGroup,
        selector_hints: &["toggle-group", "togglegroup", "segmented", "button-group"],
        roles: &["group", "radiogroup"],
        aria_hints: &["pressed", "orientation"],
        tags: &[],
        style: &[OneOf("display", &["flex", "inline-flex"])],
        visual: &[V::FlexContainer, V::Rounded],
        behavior: B::Interactive,
    },
    ArchetypePattern {
        kind: ComponentKind::Tooltip,
        selector_hints: &["tooltip", "tip", "hint-bubble"],
        roles: &["tooltip"],
        aria_hints: &["describedby", "hidden"],
        tags: &[],
        style: &[
            OneOf("position", &["absolute", "fixed"]),
            MaxPx("font-size", 13.0),
            MinPx("z-index", 100.0),
        ],
        visual: &[V::Rounded, V::OutOfFlow],
        behavior: B::Overlay,
    },
    ArchetypePattern {
        kind: ComponentKind::Typography,
        selector_hints: &["heading", "title", "prose", "typography"],
        roles: &["heading"],
        aria_hints: &["level"],
        tags: &["h1", "h2", "h3", "h4", "h5", "h6", "blockquote"],
        style: &[MinPx("font-size", 18.0)],
        visual: &[],
        behavior: B::Static,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use strum::IntoEnumIterator;

    #[test]
    fn every_kind_has_exactly_one_pattern() {
        let mut seen = BTreeSet::new();
        for pattern in patterns() {
            assert!(seen.insert(pattern.kind), "duplicate pattern for {}", pattern.kind);
        }
        for kind in ComponentKind::iter() {
            assert!(seen.contains(&kind), "missing pattern for {kind}");
        }
    }

    #[test]
    fn kind_names_are_kebab_case() {
        assert_eq!(ComponentKind::DropdownMenu.to_string(), "dropdown-menu");
        assert_eq!(ComponentKind::InputOtp.to_string(), "input-otp");
        assert_eq!(ComponentKind::AlertDialog.to_string(), "alert-dialog");
    }
}
