use crate::prelude::*;

///
/// Binding
///
/// One HTTP-route exposure of a method.
///

#[derive(Clone, Debug, Serialize)]
pub struct Binding {
    /// Position within the method's binding list; stable, and used to name
    /// generated symbols.
    pub index: usize,
    pub verb: HttpVerb,
    pub path: PathTemplate,

    /// Which part of the request message the HTTP body populates. `None`
    /// means the route takes no body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,

    /// Sub-field of the response message returned as the HTTP body; the
    /// whole message when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<FieldPath>,

    pub path_params: Vec<Parameter>,
}

impl Binding {
    /// Dotted body field path, `*` for the whole-message wildcard. Routes
    /// without a body also report `*`.
    #[must_use]
    pub fn body_field_path(&self) -> String {
        match &self.body {
            None | Some(Body::Wildcard) => "*".to_string(),
            Some(Body::Field(path)) => path.to_string(),
        }
    }
}

///
/// Body
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Body {
    /// `*`: the whole request message is populated from the body.
    Wildcard,
    /// A named (possibly nested) field is populated from the body.
    Field(FieldPath),
}

impl Body {
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(body: Option<Body>) -> Binding {
        Binding {
            index: 0,
            verb: HttpVerb::Get,
            path: PathTemplate::default(),
            body,
            response_body: None,
            path_params: vec![],
        }
    }

    #[test]
    fn optional_parts_are_omitted_from_serialized_form() {
        let json = serde_json::to_value(binding(None)).unwrap();
        assert!(json.get("body").is_none());
        assert!(json.get("response_body").is_none());
        assert_eq!(json["verb"], "Get");
    }

    #[test]
    fn body_field_path_defaults_to_wildcard() {
        assert_eq!(binding(None).body_field_path(), "*");
        assert_eq!(binding(Some(Body::Wildcard)).body_field_path(), "*");
        assert_eq!(
            binding(Some(Body::Field(FieldPath::parse("item.name")))).body_field_path(),
            "item.name"
        );
    }
}
