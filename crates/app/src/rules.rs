//! Declarative rules to validators.

use crate::validators::{validate_boolean, validate_enum, validate_multiple_enum};
use param_guard_domain::{ParamRule, Validators};

/// Build a validator registry from `(parameter, rule)` pairs.
///
/// Each rule maps onto the matching stock validator, including the inverted
/// polarity of [`validate_enum`] for `enum` rules.
pub fn build_validators<'a, I, K>(rules: I) -> Validators
where
    I: IntoIterator<Item = (K, &'a ParamRule)>,
    K: AsRef<str>,
{
    let mut validators = Validators::new();
    for (name, rule) in rules {
        let name = name.as_ref();
        let param = name.to_owned();
        match rule.clone() {
            ParamRule::Boolean => {
                validators.insert(name, move |value: &str| validate_boolean(&param, value));
            },
            ParamRule::Enum { values } => {
                validators.insert(name, move |value: &str| {
                    validate_enum(&param, value, &values)
                });
            },
            ParamRule::MultiEnum { values } => {
                validators.insert(name, move |value: &str| {
                    validate_multiple_enum(&param, value, &values)
                });
            },
        }
    }
    validators
}

#[cfg(test)]
mod tests {
    use super::*;
    use param_guard_domain::ValidatorOutcome;
    use std::collections::BTreeMap;
    use std::error::Error;

    fn outcome(validators: &Validators, name: &str, value: &str) -> Option<ValidatorOutcome> {
        validators.get(name).map(|validator| validator.validate(value))
    }

    #[test]
    fn rules_map_to_stock_validators() -> Result<(), Box<dyn Error>> {
        let rules = BTreeMap::from([
            ("debug".to_string(), ParamRule::Boolean),
            (
                "sort".to_string(),
                ParamRule::Enum {
                    values: vec!["asc".to_string(), "desc".to_string()],
                },
            ),
            (
                "fields".to_string(),
                ParamRule::MultiEnum {
                    values: vec!["id".to_string(), "name".to_string()],
                },
            ),
        ]);

        let validators = build_validators(&rules);
        assert_eq!(validators.len(), 3);

        assert_eq!(outcome(&validators, "debug", "true"), Some(ValidatorOutcome::Valid));
        assert_eq!(
            outcome(&validators, "debug", "yes"),
            Some(ValidatorOutcome::InvalidWithMessage(
                "Valid debug parameters are \"true\" and \"false\". You passed \"yes\"."
                    .to_string()
            ))
        );
        assert_eq!(outcome(&validators, "fields", "id,name"), Some(ValidatorOutcome::Valid));
        let fields = outcome(&validators, "fields", "id,email").ok_or("missing validator")?;
        assert!(!fields.is_valid());
        Ok(())
    }

    #[test]
    fn borrowed_names_build_validators() {
        let debug = ParamRule::Boolean;
        let validators = build_validators([("debug", &debug), ("verbose", &debug)]);

        let names: Vec<&str> = validators.names().collect();
        assert_eq!(names, vec!["debug", "verbose"]);
        assert_eq!(outcome(&validators, "verbose", "false"), Some(ValidatorOutcome::Valid));
    }

    #[test]
    fn enum_rule_keeps_inverted_polarity() {
        let rules = BTreeMap::from([(
            "sort".to_string(),
            ParamRule::Enum {
                values: vec!["asc".to_string()],
            },
        )]);
        let validators = build_validators(&rules);

        assert_eq!(outcome(&validators, "sort", "other"), Some(ValidatorOutcome::Valid));
        assert!(
            outcome(&validators, "sort", "asc").is_some_and(|outcome| !outcome.is_valid())
        );
    }
}
