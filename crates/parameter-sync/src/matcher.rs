//! Parameter equivalence strategies.
//!
//! Grouping is conservative: two parameters only share a group when every
//! compared field matches exactly. A wrong merge would put unrelated
//! quantities on one legend scale.

use covjson::{Category, Parameter, Unit};

/// Decides whether two parameters describe the same quantity.
pub trait ParameterMatcher {
    fn matches(&self, a: &Parameter, b: &Parameter) -> bool;
}

impl<F> ParameterMatcher for F
where
    F: Fn(&Parameter, &Parameter) -> bool,
{
    fn matches(&self, a: &Parameter, b: &Parameter) -> bool {
        self(a, b)
    }
}

/// Identifier-based matching of observed property, unit and categories.
///
/// - Observed properties must both carry an id, and the ids must be equal.
/// - Units: absent on both sides matches; present on one side only does not.
///   With both present, ids are compared when both have one, otherwise
///   symbols are compared; a unit pair with neither does not match.
/// - Categories: absent on both sides matches; present on one side only does
///   not. Both lists must be the same length, every category must carry an
///   id, and each id on one side must appear on the other.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMatcher;

impl ParameterMatcher for DefaultMatcher {
    fn matches(&self, a: &Parameter, b: &Parameter) -> bool {
        same_observed_property(a, b)
            && same_unit(a.unit.as_ref(), b.unit.as_ref())
            && same_categories(a.categories(), b.categories())
    }
}

fn same_observed_property(a: &Parameter, b: &Parameter) -> bool {
    match (&a.observed_property.id, &b.observed_property.id) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn same_unit(a: Option<&Unit>, b: Option<&Unit>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => match (&a.id, &b.id) {
            (Some(x), Some(y)) => x == y,
            _ => match (&a.symbol, &b.symbol) {
                (Some(x), Some(y)) => x.value() == y.value(),
                _ => false,
            },
        },
        _ => false,
    }
}

fn same_categories(a: Option<&[Category]>, b: Option<&[Category]>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            if a.len() != b.len() {
                return false;
            }
            let ids_a: Option<Vec<&str>> = a.iter().map(|c| c.id.as_deref()).collect();
            let ids_b: Option<Vec<&str>> = b.iter().map(|c| c.id.as_deref()).collect();
            match (ids_a, ids_b) {
                (Some(ids_a), Some(ids_b)) => {
                    ids_a.iter().all(|id| ids_b.contains(id))
                        && ids_b.iter().all(|id| ids_a.contains(id))
                }
                _ => false,
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covjson::{ObservedProperty, UnitSymbol};

    fn param(id: Option<&str>) -> Parameter {
        let mut prop = ObservedProperty::new("Sea water temperature");
        prop.id = id.map(str::to_string);
        Parameter::new(prop)
    }

    #[test]
    fn test_observed_property_ids() {
        let m = DefaultMatcher;
        assert!(m.matches(&param(Some("sst")), &param(Some("sst"))));
        assert!(!m.matches(&param(Some("sst")), &param(Some("sal"))));
        assert!(!m.matches(&param(None), &param(Some("sst"))));
        assert!(!m.matches(&param(None), &param(None)));
    }

    #[test]
    fn test_unit_presence_must_agree() {
        let m = DefaultMatcher;
        let with_unit = param(Some("sst")).with_unit(Unit::kelvin());
        assert!(!m.matches(&with_unit, &param(Some("sst"))));
        assert!(!m.matches(&param(Some("sst")), &with_unit));
    }

    #[test]
    fn test_unit_id_takes_priority() {
        let m = DefaultMatcher;
        let a = param(Some("sst")).with_unit(Unit::kelvin().with_id("ucum:K"));
        let b = param(Some("sst")).with_unit(Unit::from_symbol("kelvin").with_id("ucum:K"));
        let c = param(Some("sst")).with_unit(Unit::kelvin().with_id("ucum:Cel"));
        assert!(m.matches(&a, &b));
        assert!(!m.matches(&a, &c));
    }

    #[test]
    fn test_unit_symbol_fallback() {
        let m = DefaultMatcher;
        let a = param(Some("sst")).with_unit(Unit::kelvin().with_id("ucum:K"));
        let b = param(Some("sst")).with_unit(Unit {
            id: None,
            label: None,
            symbol: Some(UnitSymbol::Structured {
                value: "K".to_string(),
                type_: Some("http://www.opengis.net/def/uom/UCUM/".to_string()),
            }),
        });
        let c = param(Some("sst")).with_unit(Unit::celsius());
        assert!(m.matches(&a, &b));
        assert!(!m.matches(&b, &c));
    }

    #[test]
    fn test_unit_without_id_or_symbol() {
        let m = DefaultMatcher;
        let bare = Unit {
            id: None,
            label: None,
            symbol: None,
        };
        let a = param(Some("sst")).with_unit(bare.clone());
        let b = param(Some("sst")).with_unit(bare);
        assert!(!m.matches(&a, &b));
    }

    #[test]
    fn test_categories() {
        let m = DefaultMatcher;
        let a = param(Some("lc")).with_categories(vec![
            Category::new("water", "Water"),
            Category::new("forest", "Forest"),
        ]);
        let reordered = param(Some("lc")).with_categories(vec![
            Category::new("forest", "Wald"),
            Category::new("water", "Wasser"),
        ]);
        let shorter = param(Some("lc")).with_categories(vec![Category::new("water", "Water")]);
        let other = param(Some("lc")).with_categories(vec![
            Category::new("water", "Water"),
            Category::new("urban", "Urban"),
        ]);

        assert!(m.matches(&a, &reordered));
        assert!(!m.matches(&a, &shorter));
        assert!(!m.matches(&a, &other));
        assert!(!m.matches(&a, &param(Some("lc"))));
    }

    #[test]
    fn test_categories_need_ids() {
        let m = DefaultMatcher;
        let mut anonymous = Category::new("water", "Water");
        anonymous.id = None;
        let a = param(Some("lc")).with_categories(vec![anonymous.clone()]);
        let b = param(Some("lc")).with_categories(vec![anonymous]);
        assert!(!m.matches(&a, &b));
    }

    #[test]
    fn test_duplicate_category_ids_need_both_directions() {
        let m = DefaultMatcher;
        let a = param(Some("lc")).with_categories(vec![
            Category::new("water", "Water"),
            Category::new("water", "Water again"),
        ]);
        let b = param(Some("lc")).with_categories(vec![
            Category::new("water", "Water"),
            Category::new("forest", "Forest"),
        ]);
        assert!(!m.matches(&a, &b));
        assert!(!m.matches(&b, &a));
    }

    #[test]
    fn test_closure_matcher() {
        let by_label = |a: &Parameter, b: &Parameter| a.display_label() == b.display_label();
        assert!(by_label.matches(&param(None), &param(Some("x"))));
    }
}
