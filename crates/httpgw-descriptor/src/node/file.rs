use crate::prelude::*;

///
/// File
///
/// One compilation unit of the descriptor model. Constructed once per
/// generation run by the descriptor layer; read-only to the generator except
/// for the single identifier-normalization pass applied before emission.
///

#[derive(Clone, Debug, Serialize)]
pub struct File {
    /// Source file name, e.g. `items/v1/items.proto`.
    pub name: String,
    /// Package the file's types belong to.
    pub package: String,
    pub messages: Vec<Message>,
    pub services: Vec<Service>,
}

impl File {
    #[must_use]
    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.name == name)
    }

    /// Fully-qualified name for a type declared in this file.
    #[must_use]
    pub fn qualified(&self, name: &str) -> String {
        if self.package.is_empty() {
            format!(".{name}")
        } else {
            format!(".{}.{name}", self.package)
        }
    }
}
