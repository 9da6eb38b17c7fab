use crate::prelude::*;

///
/// Field
///

#[derive(Clone, Debug, Serialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub repeated: bool,
}

impl Field {
    /// Fully-qualified type name for message and enum fields.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.kind.type_name()
    }

    /// Whether this field is of the well-known update-mask type.
    #[must_use]
    pub fn is_field_mask(&self) -> bool {
        self.type_name() == Some(FIELD_MASK_TYPE)
    }
}
