use crate::prelude::*;

///
/// Method
///

#[derive(Clone, Debug, Serialize)]
pub struct Method {
    pub name: String,
    /// Fully-qualified request message type name.
    pub request_type: String,
    /// Fully-qualified response message type name.
    pub response_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
    /// One binding per HTTP route exposed for this RPC; order is
    /// significant, the positional index names generated symbols.
    pub bindings: Vec<Binding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
