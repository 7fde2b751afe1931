//! Form control model for the Marten layout core.
//!
//! Forms and their controls live in a [`FormSet`] arena owned by the
//! document, separate from the box tree. A control's gadget box and the
//! control refer to each other by index. At submission time the set
//! computes the successful controls
//! ([HTML 4.01 § 17.13.2](https://www.w3.org/TR/html401/interact/forms.html#h-17.13.2))
//! and encodes them as `application/x-www-form-urlencoded`.

mod control;
mod encoding;
mod form;

pub use control::{ControlId, ControlType, FormControl, FormOption};
pub use encoding::{Submission, SuccessfulControl, urldecode, urlencode};
pub use form::{Form, FormError, FormId, FormSet, Method, WrappedText};
