//! Forms and the control arena.

use serde::Serialize;
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::control::{ControlId, ControlType, FormControl};
use crate::encoding::{Submission, SuccessfulControl, urlencode};

/// Index of a form in its [`FormSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FormId(pub usize);

/// [§ 17.3 The FORM element](https://www.w3.org/TR/html401/interact/forms.html#h-17.3)
///
/// "method = get|post ... specifies which HTTP method will be used to
/// submit the form data set."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Method {
    /// "With the HTTP 'get' method, the form data set is appended to the
    /// URI specified by the action attribute"
    #[default]
    Get,
    /// "With the HTTP 'post' method, the form data set is included in the
    /// body of the form"
    Post,
}

/// A form element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Form {
    /// "This attribute specifies a form processing agent."
    pub action: String,
    /// Submission method.
    pub method: Method,
    /// Controls in document order.
    pub controls: Vec<ControlId>,
}

/// Errors from form queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The form id does not belong to this set.
    #[error("no form with index {0}")]
    UnknownForm(usize),
    /// The control id does not belong to this set.
    #[error("no control with index {0}")]
    UnknownControl(usize),
    /// The submitting control belongs to another form.
    #[error("control {control} is not part of form {form}")]
    ForeignSubmitter {
        /// The submitter.
        control: usize,
        /// The form being submitted.
        form: usize,
    },
}

/// Source of the visual lines of a textarea after wrapping.
///
/// The layout engine implements this over the box tree. `None` means no
/// layout is available and the raw value is split at newlines instead.
pub trait WrappedText {
    /// The wrapped lines of `control`'s text, top to bottom.
    fn wrapped_lines(&self, control: &FormControl) -> Option<Vec<String>>;
}

/// No layout: textareas submit their value split at newlines.
impl WrappedText for () {
    fn wrapped_lines(&self, _: &FormControl) -> Option<Vec<String>> {
        None
    }
}

/// All forms and controls of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormSet {
    forms: Vec<Form>,
    controls: Vec<FormControl>,
}

impl FormSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a form.
    pub fn add_form(&mut self, action: impl Into<String>, method: Method) -> FormId {
        let id = FormId(self.forms.len());
        self.forms.push(Form {
            action: action.into(),
            method,
            controls: Vec::new(),
        });
        id
    }

    /// Register a control, attaching it to `form` when given.
    ///
    /// # Errors
    /// [`FormError::UnknownForm`] if `form` is not in this set.
    pub fn add_control(
        &mut self,
        mut control: FormControl,
        form: Option<FormId>,
    ) -> Result<ControlId, FormError> {
        let id = ControlId(self.controls.len());
        if let Some(form_id) = form {
            self.forms
                .get_mut(form_id.0)
                .ok_or(FormError::UnknownForm(form_id.0))?
                .controls
                .push(id);
        }
        control.form = form;
        self.controls.push(control);
        Ok(id)
    }

    /// All forms in document order.
    #[must_use]
    pub fn forms(&self) -> &[Form] {
        &self.forms
    }

    /// All controls in document order.
    #[must_use]
    pub fn controls(&self) -> &[FormControl] {
        &self.controls
    }

    /// Look up a form.
    ///
    /// # Errors
    /// [`FormError::UnknownForm`] for a foreign id.
    pub fn form(&self, id: FormId) -> Result<&Form, FormError> {
        self.forms.get(id.0).ok_or(FormError::UnknownForm(id.0))
    }

    /// Look up a control.
    ///
    /// # Errors
    /// [`FormError::UnknownControl`] for a foreign id.
    pub fn control(&self, id: ControlId) -> Result<&FormControl, FormError> {
        self.controls.get(id.0).ok_or(FormError::UnknownControl(id.0))
    }

    /// Look up a control for mutation.
    ///
    /// # Errors
    /// [`FormError::UnknownControl`] for a foreign id.
    pub fn control_mut(&mut self, id: ControlId) -> Result<&mut FormControl, FormError> {
        self.controls
            .get_mut(id.0)
            .ok_or(FormError::UnknownControl(id.0))
    }

    /// Find the first control called `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ControlId> {
        self.controls
            .iter()
            .position(|c| c.name.as_deref() == Some(name))
            .map(ControlId)
    }

    /// Check a checkbox or radio button. Checking a radio button unchecks
    /// the others with the same name in the same form.
    ///
    /// # Errors
    /// [`FormError::UnknownControl`] for a foreign id.
    pub fn set_checked(&mut self, id: ControlId, checked: bool) -> Result<(), FormError> {
        let control = self.control(id)?;
        if checked && control.kind == ControlType::Radio {
            let (form, name) = (control.form, control.name.clone());
            for (index, other) in self.controls.iter_mut().enumerate() {
                if index != id.0
                    && other.kind == ControlType::Radio
                    && other.form == form
                    && other.name == name
                {
                    other.checked = false;
                }
            }
        }
        self.control_mut(id)?.checked = checked;
        Ok(())
    }

    /// Select option `index` of a select. In a single select every other
    /// option is deselected; in a multiple select the option toggles.
    ///
    /// # Errors
    /// [`FormError::UnknownControl`] for a foreign id.
    pub fn select_option(&mut self, id: ControlId, index: usize) -> Result<(), FormError> {
        let control = self.control_mut(id)?;
        if control.multiple {
            if let Some(option) = control.options.get_mut(index) {
                option.selected = !option.selected;
            }
        } else if index < control.options.len() {
            for (i, option) in control.options.iter_mut().enumerate() {
                option.selected = i == index;
            }
        }
        Ok(())
    }

    /// Record where an image button was clicked.
    ///
    /// # Errors
    /// [`FormError::UnknownControl`] for a foreign id.
    pub fn record_click(&mut self, id: ControlId, x: i32, y: i32) -> Result<(), FormError> {
        self.control_mut(id)?.click = Some((x, y));
        Ok(())
    }

    /// Restore every control of `form` to its markup state.
    ///
    /// # Errors
    /// [`FormError::UnknownForm`] for a foreign id.
    pub fn reset(&mut self, form: FormId) -> Result<(), FormError> {
        let ids = self.form(form)?.controls.clone();
        for id in ids {
            let control = self.control_mut(id)?;
            control.value.clone_from(&control.initial_value);
            control.checked = control.initially_checked;
            for option in &mut control.options {
                option.selected = option.initially_selected;
            }
        }
        Ok(())
    }

    /// [§ 17.13.2 Successful controls](https://www.w3.org/TR/html401/interact/forms.html#h-17.13.2)
    ///
    /// "A successful control is "valid" for submission. Every successful
    /// control has its control name paired with its current value as part
    /// of the submitted form data set."
    ///
    /// `submitter` is the control that triggered submission, if any.
    ///
    /// # Errors
    /// Fails for foreign ids or a submitter from another form.
    pub fn successful_controls(
        &self,
        form: FormId,
        submitter: Option<ControlId>,
        text: &dyn WrappedText,
    ) -> Result<Vec<SuccessfulControl>, FormError> {
        let form_data = self.form(form)?;
        if let Some(sub) = submitter
            && self.control(sub)?.form != Some(form)
        {
            return Err(FormError::ForeignSubmitter {
                control: sub.0,
                form: form.0,
            });
        }

        let mut out = Vec::new();
        for &id in &form_data.controls {
            let control = self.control(id)?;
            // "Controls that are disabled cannot be successful."
            if control.disabled {
                continue;
            }
            // "A successful control must be defined within a FORM element
            // and must have a control name."
            let Some(name) = control.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            let is_submitter = submitter == Some(id);

            match control.kind {
                ControlType::Hidden | ControlType::Text | ControlType::Password => {
                    if !control.value.is_empty() {
                        out.push(SuccessfulControl::new(name, control.value.as_str()));
                    }
                }
                // "All "on" checkboxes may be successful."
                // "For radio buttons that share the same value of the name
                // attribute, only the "on" radio button may be successful."
                ControlType::Checkbox | ControlType::Radio => {
                    if control.checked {
                        let value = if control.value.is_empty() {
                            "on"
                        } else {
                            control.value.as_str()
                        };
                        out.push(SuccessfulControl::new(name, value));
                    }
                }
                // "For menus, the control name is provided by a SELECT
                // element and values are provided by OPTION elements. Only
                // selected options may be successful."
                ControlType::Select => {
                    out.extend(
                        control
                            .options
                            .iter()
                            .filter(|o| o.selected)
                            .map(|o| SuccessfulControl::new(name, o.value.as_str())),
                    );
                }
                ControlType::Textarea => {
                    let lines = text.wrapped_lines(control).unwrap_or_else(|| {
                        control.value.lines().map(str::to_string).collect()
                    });
                    let value: String = lines.iter().map(|l| format!("{l}\r\n")).collect();
                    out.push(SuccessfulControl::new(name, value));
                }
                // "If a form contains more than one submit button, only the
                // activated submit button is successful."
                ControlType::Submit => {
                    if is_submitter {
                        out.push(SuccessfulControl::new(name, control.value.as_str()));
                    }
                }
                // "When a pointing device is used to click on the image, the
                // form is submitted and the click coordinates passed to the
                // server ... name.x=x-value and name.y=y-value"
                ControlType::Image => {
                    if is_submitter {
                        let (x, y) = control.click.unwrap_or((0, 0));
                        out.push(SuccessfulControl::new(format!("{name}.x"), x.to_string()));
                        out.push(SuccessfulControl::new(format!("{name}.y"), y.to_string()));
                    }
                }
                // "Reset buttons ... are never successful."
                ControlType::Reset | ControlType::Button => {}
            }
        }
        Ok(out)
    }

    /// [§ 17.13.3 Processing form data](https://www.w3.org/TR/html401/interact/forms.html#h-17.13.3)
    ///
    /// Build the request for submitting `form`.
    ///
    /// # Errors
    /// As for [`FormSet::successful_controls`].
    pub fn submit(
        &self,
        form: FormId,
        submitter: Option<ControlId>,
        text: &dyn WrappedText,
    ) -> Result<Submission, FormError> {
        let data = urlencode(&self.successful_controls(form, submitter, text)?);
        let form = self.form(form)?;
        Ok(match form.method {
            Method::Get => {
                // Any query already on the action is replaced.
                let base = form.action.split('?').next().unwrap_or_default();
                Submission::Get {
                    url: format!("{base}?{data}"),
                }
            }
            Method::Post => Submission::Post {
                url: form.action.clone(),
                body: data,
            },
        })
    }
}
