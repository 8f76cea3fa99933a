/// A failed page-fragment request, as reported by the request layer.
///
/// Consumed by value: a notification is handled exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureEvent {
    /// Id of the element the request was issued for, if any.
    pub target: Option<String>,
    pub response_body: String,
    /// Raw `Content-Type` header value of the response.
    pub content_type: String,
}

impl FailureEvent {
    pub fn new(
        target: impl Into<String>,
        response_body: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            target: Some(target.into()),
            response_body: response_body.into(),
            content_type: content_type.into(),
        }
    }

    /// An HTML failure response for `target`.
    pub fn html(target: impl Into<String>, response_body: impl Into<String>) -> Self {
        Self::new(target, response_body, "text/html; charset=utf-8")
    }

    /// A failure with no associated element.
    pub fn untargeted(response_body: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            target: None,
            response_body: response_body.into(),
            content_type: content_type.into(),
        }
    }
}
