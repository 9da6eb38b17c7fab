use crate::prelude::*;

///
/// Parameter
///
/// A path parameter: the field path a pattern segment binds to, plus the
/// resolved terminal field. Construction goes through
/// [`Registry::parameter`](crate::registry::Registry::parameter) so an
/// unresolvable path fails before a parameter ever exists.
///

#[derive(Clone, Debug, Serialize)]
pub struct Parameter {
    pub field_path: FieldPath,
    /// Terminal field the path resolves to within the request message tree.
    pub target: Field,
}

impl Parameter {
    /// Name used in pattern lookup and runtime error messages.
    #[must_use]
    pub fn name(&self) -> String {
        self.field_path.to_string()
    }

    #[must_use]
    pub const fn is_repeated(&self) -> bool {
        self.target.repeated
    }

    /// Proto3 nested addressing: the path traverses at least one
    /// sub-message.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.field_path.is_nested()
    }
}
