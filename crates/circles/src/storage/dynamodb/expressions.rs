//! DynamoDB expression building.
//!
//! Pure functions turning [`Condition`]s and attribute sets into expression
//! strings with their placeholder maps. Attribute names always go through `#`
//! placeholders so reserved words never leak into expressions.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::storage::keys;
use crate::storage::table::{Condition, Item};

/// An expression string together with its name and value placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub text: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl Expression {
    /// Value placeholders, or `None` when there are none (DynamoDB rejects an empty map).
    pub fn values_or_none(&mut self) -> Option<HashMap<String, AttributeValue>> {
        if self.values.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.values))
        }
    }

    fn merge(&mut self, other: Expression) {
        self.names.extend(other.names);
        self.values.extend(other.values);
    }
}

/// Builds the condition expression for `condition`, or `None` for an unconditioned write.
pub fn condition_expression(condition: &Condition) -> Option<Expression> {
    let pk_name = || HashMap::from([("#pk".to_string(), keys::PK.to_string())]);

    match condition {
        Condition::None => None,
        Condition::Exists => Some(Expression {
            text: "attribute_exists(#pk)".to_string(),
            names: pk_name(),
            values: HashMap::new(),
        }),
        Condition::NotExists => Some(Expression {
            text: "attribute_not_exists(#pk)".to_string(),
            names: pk_name(),
            values: HashMap::new(),
        }),
        Condition::AttributeEquals { attribute, value } => {
            let mut names = pk_name();
            names.insert("#cond".to_string(), attribute.to_string());
            Some(Expression {
                text: "attribute_exists(#pk) AND #cond = :cond".to_string(),
                names,
                values: HashMap::from([(":cond".to_string(), AttributeValue::S(value.clone()))]),
            })
        }
    }
}

/// Builds a `SET` expression assigning every attribute in `set`.
///
/// Placeholders are numbered in attribute name order so the output is deterministic.
pub fn update_expression(set: Item) -> Expression {
    let mut attributes: Vec<(String, AttributeValue)> = set.into_iter().collect();
    attributes.sort_by(|a, b| a.0.cmp(&b.0));

    let mut expression = Expression::default();
    let mut clauses = Vec::with_capacity(attributes.len());
    for (i, (name, value)) in attributes.into_iter().enumerate() {
        let name_placeholder = format!("#a{i}");
        let value_placeholder = format!(":a{i}");
        clauses.push(format!("{name_placeholder} = {value_placeholder}"));
        expression.names.insert(name_placeholder, name);
        expression.values.insert(value_placeholder, value);
    }
    expression.text = format!("SET {}", clauses.join(", "));
    expression
}

/// Combines an update expression with an optional condition into one placeholder set.
///
/// Returns the update expression (with merged placeholders) and the condition text.
pub fn conditional_update(set: Item, condition: &Condition) -> (Expression, Option<String>) {
    let mut update = update_expression(set);
    let condition_text = condition_expression(condition).map(|condition| {
        let text = condition.text.clone();
        update.merge(condition);
        text
    });
    (update, condition_text)
}
