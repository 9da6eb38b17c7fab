use crate::prelude::*;

///
/// Service
///

#[derive(Clone, Debug, Serialize)]
pub struct Service {
    pub name: String,
    pub methods: Vec<Method>,

    /// Extra crate paths requested via service-level annotations, emitted as
    /// `use` items in the generated header. Deduplicated across services.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_imports: Vec<String>,
}

impl Service {
    /// A service is eligible for emission iff at least one of its methods
    /// carries at least one binding.
    #[must_use]
    pub fn has_bound_method(&self) -> bool {
        self.methods.iter().any(|m| !m.bindings.is_empty())
    }
}
