use crate::prelude::*;

///
/// Enum
///

#[derive(Clone, Debug, Serialize)]
pub struct Enum {
    pub name: String,
    pub variants: Vec<EnumVariant>,
}

impl Enum {
    /// Name → value lookup used by generated conversion code.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.variants
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.number)
    }
}

///
/// EnumVariant
///

#[derive(Clone, Debug, Serialize)]
pub struct EnumVariant {
    pub name: String,
    pub number: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color() -> Enum {
        Enum {
            name: "Color".to_string(),
            variants: vec![
                EnumVariant {
                    name: "COLOR_UNSPECIFIED".to_string(),
                    number: 0,
                },
                EnumVariant {
                    name: "RED".to_string(),
                    number: 1,
                },
            ],
        }
    }

    #[test]
    fn value_lookup_by_variant_name() {
        let e = color();
        assert_eq!(e.value_of("RED"), Some(1));
        assert_eq!(e.value_of("BLUE"), None);
    }
}
