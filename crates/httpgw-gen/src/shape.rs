use httpgw_descriptor::node::Method;
use serde::Serialize;

///
/// MethodShape
///
/// Exactly one shape applies to every method; the shape picks the synthesis
/// strategy and the generated request function's return contract. Unary and
/// client-streaming handlers return a single response plus trailing
/// metadata; server-streaming and bidi handlers return a stream handle with
/// header metadata, trailers resolving once the caller drains the stream.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum MethodShape {
    Unary,
    ClientStream,
    ServerStream,
    BidiStream,
}

impl MethodShape {
    #[must_use]
    pub const fn of(method: &Method) -> Self {
        match (method.client_streaming, method.server_streaming) {
            (false, false) => Self::Unary,
            (true, false) => Self::ClientStream,
            (false, true) => Self::ServerStream,
            (true, true) => Self::BidiStream,
        }
    }

    /// Whether the generated function hands back a stream instead of a
    /// single message.
    #[must_use]
    pub const fn returns_stream(self) -> bool {
        matches!(self, Self::ServerStream | Self::BidiStream)
    }

    /// Whether the HTTP body is a stream of request elements.
    #[must_use]
    pub const fn streams_body(self) -> bool {
        matches!(self, Self::ClientStream | Self::BidiStream)
    }
}
