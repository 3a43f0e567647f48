//! Annotation parameter lists.

use crate::relationship::config::{CascadeSet, FetchType};

/// `CascadeType.ALL` for all five, a bare constant for one, nothing for
/// none, otherwise a brace list in fixed order.
pub fn cascade_value(cascades: &CascadeSet) -> Option<String> {
    match cascades.len() {
        0 => None,
        5 => Some("CascadeType.ALL".to_string()),
        1 => cascades
            .iter()
            .next()
            .map(|c| format!("CascadeType.{}", c.as_str())),
        _ => {
            let items: Vec<String> = cascades
                .iter()
                .map(|c| format!("CascadeType.{}", c.as_str()))
                .collect();
            Some(format!("{{{}}}", items.join(", ")))
        }
    }
}

/// Keys render in the order `name`, `mappedBy`, `nullable`, `optional`,
/// `unique`, `length`, `orphanRemoval`, `fetch`, `cascade`.
#[derive(Debug, Clone, Default)]
pub struct AnnotationParams {
    pub name: Option<String>,
    pub mapped_by: Option<String>,
    pub nullable: Option<bool>,
    pub optional: Option<bool>,
    pub unique: Option<bool>,
    pub orphan_removal: Option<bool>,
    pub fetch: Option<FetchType>,
    pub cascade: Option<String>,
    pub length: Option<u32>,
}

impl AnnotationParams {
    pub fn render(&self) -> Vec<String> {
        let mut params = Vec::new();
        if let Some(name) = &self.name {
            params.push(format!("name = \"{name}\""));
        }
        if let Some(mapped_by) = &self.mapped_by {
            params.push(format!("mappedBy = \"{}\"", mapped_by.to_lowercase()));
        }
        if let Some(nullable) = self.nullable {
            params.push(format!("nullable = {nullable}"));
        }
        if let Some(optional) = self.optional {
            params.push(format!("optional = {optional}"));
        }
        if let Some(unique) = self.unique {
            params.push(format!("unique = {unique}"));
        }
        if let Some(length) = self.length {
            params.push(format!("length = {length}"));
        }
        if let Some(orphan_removal) = self.orphan_removal {
            params.push(format!("orphanRemoval = {orphan_removal}"));
        }
        if let Some(fetch) = self.fetch {
            params.push(format!("fetch = FetchType.{}", fetch.as_str()));
        }
        if let Some(cascade) = &self.cascade {
            params.push(format!("cascade = {cascade}"));
        }
        params
    }
}

/// `@Name` or `@Name(a, b)`; never empty parentheses.
pub fn annotation(name: &str, params: &AnnotationParams) -> String {
    let rendered = params.render();
    if rendered.is_empty() {
        format!("@{name}")
    } else {
        format!("@{name}({})", rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::config::CascadeType;

    fn subset(mask: u8) -> CascadeSet {
        CascadeType::EVERY
            .into_iter()
            .enumerate()
            .filter(|(i, _)| mask & (1u8 << *i) != 0)
            .map(|(_, c)| c)
            .collect()
    }

    #[test]
    fn cascade_value_for_every_subset() {
        for mask in 0u8..32 {
            let set = subset(mask);
            let value = cascade_value(&set);
            match set.len() {
                0 => assert_eq!(value, None),
                5 => assert_eq!(value.as_deref(), Some("CascadeType.ALL")),
                1 => {
                    let only = set.iter().next().unwrap();
                    assert_eq!(value, Some(format!("CascadeType.{}", only.as_str())));
                }
                _ => {
                    let value = value.unwrap();
                    assert!(value.starts_with('{') && value.ends_with('}'));
                    let names: Vec<&str> = value[1..value.len() - 1].split(", ").collect();
                    let expected: Vec<String> = CascadeType::EVERY
                        .iter()
                        .filter(|c| set.contains(**c))
                        .map(|c| format!("CascadeType.{}", c.as_str()))
                        .collect();
                    assert_eq!(names, expected);
                }
            }
        }
    }

    #[test]
    fn cascade_order_ignores_insertion_order() {
        let set: CascadeSet = [CascadeType::Detach, CascadeType::Persist]
            .into_iter()
            .collect();
        assert_eq!(
            cascade_value(&set).as_deref(),
            Some("{CascadeType.PERSIST, CascadeType.DETACH}")
        );
    }

    #[test]
    fn annotation_without_params_has_no_parentheses() {
        assert_eq!(annotation("ManyToMany", &AnnotationParams::default()), "@ManyToMany");
    }

    #[test]
    fn annotation_param_order() {
        let params = AnnotationParams {
            cascade: Some("CascadeType.ALL".to_string()),
            fetch: Some(FetchType::Lazy),
            optional: Some(true),
            mapped_by: Some("Order".to_string()),
            ..Default::default()
        };
        assert_eq!(
            annotation("OneToOne", &params),
            "@OneToOne(mappedBy = \"order\", optional = true, fetch = FetchType.LAZY, cascade = CascadeType.ALL)"
        );
    }
}
