use crate::{
    node::{Enum, Field, File, Message, Parameter},
    path::FieldPath,
    types::FieldKind,
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("message '{0}' not found")]
    MessageNotFound(String),

    #[error("field path is empty")]
    EmptyFieldPath,

    #[error("no field '{field}' in message '{message}' while resolving '{path}'")]
    UnresolvedFieldPath {
        field: String,
        message: String,
        path: String,
    },

    #[error("field '{field}' in '{path}' is not a message, cannot descend")]
    NotAMessage { field: String, path: String },
}

///
/// Registry
///
/// Cross-file type index. Owns messages and enums keyed by fully-qualified
/// name and resolves dotted field paths against a message's field tree.
/// Passed explicitly to every component; no ambient state.
///

#[derive(Debug, Default)]
pub struct Registry {
    messages: BTreeMap<String, Message>,
    enums: BTreeMap<String, Enum>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every type declared in `file` under its fully-qualified name.
    pub fn load_file(&mut self, file: &File) {
        for msg in &file.messages {
            self.messages
                .insert(file.qualified(&msg.name), msg.clone());
        }
    }

    pub fn insert_message(&mut self, fq_name: impl Into<String>, message: Message) {
        self.messages.insert(fq_name.into(), message);
    }

    pub fn insert_enum(&mut self, fq_name: impl Into<String>, enu: Enum) {
        self.enums.insert(fq_name.into(), enu);
    }

    pub fn lookup_message(&self, fq_name: &str) -> Result<&Message, RegistryError> {
        self.messages
            .get(fq_name)
            .ok_or_else(|| RegistryError::MessageNotFound(fq_name.to_string()))
    }

    /// Enum lookup is fallible-by-design: an unresolved enum type name means
    /// the caller treats the field as a plain scalar.
    #[must_use]
    pub fn lookup_enum(&self, fq_name: &str) -> Option<&Enum> {
        self.enums.get(fq_name)
    }

    /// Resolve a dotted field path against `message`, descending through
    /// sub-messages. Returns the parsed path and the terminal field. An
    /// unresolvable path is a hard error.
    pub fn resolve_field_path(
        &self,
        message: &Message,
        dotted: &str,
    ) -> Result<(FieldPath, Field), RegistryError> {
        let path = FieldPath::parse(dotted);
        if path.is_empty() {
            return Err(RegistryError::EmptyFieldPath);
        }

        let mut current = message;
        let mut terminal: Option<&Field> = None;

        for (i, segment) in path.segments().iter().enumerate() {
            let field = current.field(segment).ok_or_else(|| {
                RegistryError::UnresolvedFieldPath {
                    field: segment.clone(),
                    message: current.name.clone(),
                    path: dotted.to_string(),
                }
            })?;

            if i + 1 < path.len() {
                let FieldKind::Message(type_name) = &field.kind else {
                    return Err(RegistryError::NotAMessage {
                        field: segment.clone(),
                        path: dotted.to_string(),
                    });
                };
                current = self.lookup_message(type_name)?;
            } else {
                terminal = Some(field);
            }
        }

        // non-empty path always sets a terminal
        let target = terminal
            .cloned()
            .ok_or(RegistryError::EmptyFieldPath)?;

        Ok((path, target))
    }

    /// Build a path parameter, failing on an unresolvable path.
    pub fn parameter(
        &self,
        message: &Message,
        dotted: &str,
    ) -> Result<Parameter, RegistryError> {
        let (field_path, target) = self.resolve_field_path(message, dotted)?;

        Ok(Parameter { field_path, target })
    }
}
