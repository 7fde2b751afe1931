//! Individual controls.

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::form::FormId;

/// Index of a control in its [`FormSet`](crate::FormSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ControlId(pub usize);

/// [§ 17.4 The INPUT element](https://www.w3.org/TR/html401/interact/forms.html#h-17.4)
/// plus the `select` and `textarea` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ControlType {
    /// "Creates a single-line text input control."
    Text,
    /// "Like 'text', but the input text is rendered in such a way as to
    /// hide the characters"
    Password,
    /// "Creates a checkbox."
    Checkbox,
    /// "Creates a radio button."
    Radio,
    /// "Creates a submit button."
    Submit,
    /// "Creates a reset button."
    Reset,
    /// "Creates a graphical submit button."
    Image,
    /// "Creates a hidden control."
    Hidden,
    /// "Creates a push button."
    Button,
    /// A `select` element.
    Select,
    /// A `textarea` element.
    Textarea,
}

impl ControlType {
    /// Parse an `input` element's `type` attribute. Unknown or missing
    /// types are text fields.
    #[must_use]
    pub fn from_input_type(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().parse::<Self>()) {
            Some(Ok(Self::Select | Self::Textarea)) | Some(Err(_)) | None => Self::Text,
            Some(Ok(kind)) => kind,
        }
    }
}

/// [§ 17.6 The OPTION element](https://www.w3.org/TR/html401/interact/forms.html#h-17.6)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOption {
    /// Displayed text.
    pub text: String,
    /// "specifies the initial value of the control. If this attribute is
    /// not set, the initial value is set to the contents of the OPTION
    /// element."
    pub value: String,
    /// Current selection state.
    pub selected: bool,
    /// Selection state from markup, restored on reset.
    pub initially_selected: bool,
}

/// One control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormControl {
    /// What kind of control this is.
    pub kind: ControlType,
    /// "The control name is given by its name attribute."
    pub name: Option<String>,
    /// Current value.
    pub value: String,
    /// Value from markup, restored on reset.
    pub initial_value: String,
    /// Checkbox and radio state.
    pub checked: bool,
    /// Checked state from markup.
    pub initially_checked: bool,
    /// "Disabled controls cannot be successful."
    pub disabled: bool,
    /// Maximum characters for text fields.
    pub maxlength: usize,
    /// Visible width in characters for text fields and rows for selects.
    pub size: usize,
    /// Whether a select allows more than one selected option.
    pub multiple: bool,
    /// Options of a select, in document order.
    pub options: Vec<FormOption>,
    /// Owning form, if the control sits inside one.
    pub form: Option<FormId>,
    /// Gadget box in the box tree.
    pub layout_box: Option<usize>,
    /// Last click position for image buttons, relative to the image.
    pub click: Option<(i32, i32)>,
}

/// Default `maxlength` for text fields.
pub const DEFAULT_MAXLENGTH: usize = 255;
/// Default `size` for text fields.
pub const DEFAULT_SIZE: usize = 20;

impl FormControl {
    /// A control of `kind` with defaults for everything else.
    #[must_use]
    pub fn new(kind: ControlType) -> Self {
        Self {
            kind,
            name: None,
            value: String::new(),
            initial_value: String::new(),
            checked: false,
            initially_checked: false,
            disabled: false,
            maxlength: DEFAULT_MAXLENGTH,
            size: DEFAULT_SIZE,
            multiple: false,
            options: Vec::new(),
            form: None,
            layout_box: None,
            click: None,
        }
    }

    /// Builder-style name setter.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder-style value setter; also sets the initial value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.initial_value = self.value.clone();
        self
    }

    /// Builder-style checked setter; also sets the initial state.
    #[must_use]
    pub const fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self.initially_checked = checked;
        self
    }

    /// Append an option to a select.
    pub fn add_option(&mut self, text: impl Into<String>, value: Option<String>, selected: bool) {
        let text = text.into();
        let value = value.unwrap_or_else(|| text.clone());
        self.options.push(FormOption {
            text,
            value,
            selected,
            initially_selected: selected,
        });
    }

    /// Make sure a single select has exactly one selected option.
    ///
    /// "If no OPTION element has the selected attribute set, user agent
    /// behavior for choosing which option is initially selected is
    /// undefined." The first option is chosen here, and only the last of
    /// several preselected options is kept.
    pub fn normalize_selection(&mut self) {
        if self.kind != ControlType::Select || self.multiple || self.options.is_empty() {
            return;
        }
        let keep = self
            .options
            .iter()
            .rposition(|o| o.selected)
            .unwrap_or(0);
        for (i, option) in self.options.iter_mut().enumerate() {
            option.selected = i == keep;
            option.initially_selected = option.selected;
        }
    }

    /// Truncate the current value to `maxlength` characters.
    pub fn clamp_to_maxlength(&mut self) {
        if let Some((cut, _)) = self.value.char_indices().nth(self.maxlength) {
            self.value.truncate(cut);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_parsing() {
        assert_eq!(ControlType::from_input_type(Some("PASSWORD")), ControlType::Password);
        assert_eq!(ControlType::from_input_type(Some("bogus")), ControlType::Text);
        assert_eq!(ControlType::from_input_type(Some("select")), ControlType::Text);
        assert_eq!(ControlType::from_input_type(None), ControlType::Text);
    }

    #[test]
    fn test_single_select_normalization() {
        let mut select = FormControl::new(ControlType::Select);
        select.add_option("a", None, true);
        select.add_option("b", Some("B".into()), true);
        select.normalize_selection();
        let selected: Vec<_> = select.options.iter().map(|o| o.selected).collect();
        assert_eq!(selected, vec![false, true]);
        assert_eq!(select.options[0].value, "a");

        let mut none = FormControl::new(ControlType::Select);
        none.add_option("x", None, false);
        none.add_option("y", None, false);
        none.normalize_selection();
        assert!(none.options[0].selected);
    }

    #[test]
    fn test_maxlength_clamp_counts_chars() {
        let mut field = FormControl::new(ControlType::Text).with_value("héllo");
        field.maxlength = 2;
        field.clamp_to_maxlength();
        assert_eq!(field.value, "hé");
    }
}
