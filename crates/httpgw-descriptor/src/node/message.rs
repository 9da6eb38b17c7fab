use crate::prelude::*;

///
/// Message
///

#[derive(Clone, Debug, Serialize)]
pub struct Message {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Message {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields of the well-known field-mask type, in declaration order.
    pub fn field_mask_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_field_mask())
    }
}
