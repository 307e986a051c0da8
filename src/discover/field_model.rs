use crate::dom::page_model::NodeRef;

/// What a discovered control accepts, driving both the spoken description
/// and the fill dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Tel,
    Url,
    Search,
    Number,
    Date,
    Time,
    Datetime,
    Month,
    Week,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Contenteditable,
    Combobox,
    Spinbutton,
    Slider,
    PickerButton,
}

impl FieldKind {
    /// Spoken / printed name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Tel => "phone",
            FieldKind::Url => "web address",
            FieldKind::Search => "search",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::Datetime => "date and time",
            FieldKind::Month => "month",
            FieldKind::Week => "week",
            FieldKind::Textarea => "text area",
            FieldKind::Select => "drop-down",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "choice",
            FieldKind::Contenteditable => "editable region",
            FieldKind::Combobox => "combo box",
            FieldKind::Spinbutton => "spin button",
            FieldKind::Slider => "slider",
            FieldKind::PickerButton => "picker",
        }
    }
}

/// Kind-specific extras; only picker buttons carry anything today.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMeta {
    pub has_popup: bool,
    pub expanded: bool,
    pub controls: Option<String>,
}

/// One discovered, voice-addressable control. The ordered sequence of these
/// from a single discovery pass defines the "field N" index space; a fresh
/// pass invalidates earlier indices.
#[derive(Debug, Clone)]
pub struct FillableField {
    pub node: NodeRef,
    pub kind: FieldKind,
    /// Secondary classifier for generic-role widgets ("textbox", "combobox").
    pub role_kind: Option<String>,
    /// Best-effort human-readable name; never empty.
    pub label: String,
    pub required: bool,
    pub placeholder: String,
    pub name: String,
    pub meta: FieldMeta,
}
