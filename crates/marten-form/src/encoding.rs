//! Submission encoding.
//!
//! [§ 17.13.4 Form content types](https://www.w3.org/TR/html401/interact/forms.html#h-17.13.4)

use serde::Serialize;
use url::form_urlencoded;

/// A name/value pair contributed by a successful control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessfulControl {
    /// Control name (with `.x`/`.y` suffixes for image buttons).
    pub name: String,
    /// Submitted value.
    pub value: String,
}

impl SuccessfulControl {
    /// Build a pair.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// "application/x-www-form-urlencoded ... Control names and values are
/// escaped. Space characters are replaced by '+', and then reserved
/// characters are escaped ... The control names/values are listed in the
/// order they appear in the document. The name is separated from the value
/// by '=' and name/value pairs are separated from each other by '&'."
#[must_use]
pub fn urlencode(controls: &[SuccessfulControl]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for control in controls {
        let _ = serializer.append_pair(&control.name, &control.value);
    }
    serializer.finish()
}

/// Inverse of [`urlencode`].
#[must_use]
pub fn urldecode(encoded: &str) -> Vec<SuccessfulControl> {
    form_urlencoded::parse(encoded.as_bytes())
        .map(|(name, value)| SuccessfulControl::new(name, value))
        .collect()
}

/// A request ready to hand to the fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "UPPERCASE")]
pub enum Submission {
    /// "the user agent takes the value of action, appends a '?' to it, then
    /// appends the form data set"
    Get {
        /// Action with the encoded data set as its query.
        url: String,
    },
    /// "the user agent conducts an HTTP 'post' transaction using the value
    /// of the action attribute and a message created according to the
    /// content type"
    Post {
        /// The form action.
        url: String,
        /// Encoded data set.
        body: String,
    },
}

impl Submission {
    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Get { url } | Self::Post { url, .. } => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_space_and_reserved_characters() {
        let encoded = urlencode(&[
            SuccessfulControl::new("q", "hello world"),
            SuccessfulControl::new("a&b", "1=2"),
        ]);
        assert_eq!(encoded, "q=hello+world&a%26b=1%3D2");
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(urlencode(&[]), "");
        assert!(urldecode("").is_empty());
    }

    #[quickcheck]
    fn prop_encoding_round_trips(pairs: Vec<(String, String)>) -> bool {
        let controls: Vec<_> = pairs
            .into_iter()
            .map(|(n, v)| SuccessfulControl::new(n, v))
            .collect();
        urldecode(&urlencode(&controls)) == controls
    }
}
