//! Schema walk over a generic tree.
//!
//! Produces a normalized JSON value (defaults filled in, comma lists split,
//! names rendered as text) ready for typed deserialization, or the full list
//! of structural errors found anywhere in the document.

use serde_json::{Map, Value};

use crate::document::{FieldPath, Node};
use crate::error::{ValidationError, ValidationWarning};
use crate::schema::{
    DefaultValue, FieldKind, ListSpec, Presence, RecordSpec, Schema, Shape, TextRule,
    Uniqueness, UnknownKeyPolicy,
};

/// Successful walk: normalized value plus any warnings.
#[derive(Debug, Clone)]
pub struct Checked {
    pub value: Value,
    pub warnings: Vec<ValidationWarning>,
}

/// Everything a walk found, errors and warnings side by side.
#[derive(Debug, Clone)]
pub struct Walked {
    pub value: Value,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// Walk `tree` against `schema`, keeping warnings even when errors occur.
pub fn walk(tree: &Node, schema: &Schema) -> Walked {
    let mut walk = Walk {
        schema,
        errors: Vec::new(),
        warnings: Vec::new(),
    };
    let value = walk.root(tree);
    Walked {
        value,
        errors: walk.errors,
        warnings: walk.warnings,
    }
}

/// Walk `tree` against `schema`, collecting every error.
pub fn check(tree: &Node, schema: &Schema) -> Result<Checked, Vec<ValidationError>> {
    let walked = walk(tree, schema);
    if walked.errors.is_empty() {
        Ok(Checked {
            value: walked.value,
            warnings: walked.warnings,
        })
    } else {
        Err(walked.errors)
    }
}

struct Walk<'s> {
    schema: &'s Schema,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl<'s> Walk<'s> {
    fn error(&mut self, path: FieldPath, expected: impl Into<String>, actual: impl Into<String>) {
        self.errors
            .push(ValidationError::new(self.schema.kind, path, expected, actual));
    }

    fn unknown_key(&mut self, path: FieldPath, policy: UnknownKeyPolicy, known: &[&str]) {
        match policy {
            UnknownKeyPolicy::Warn => self.warnings.push(ValidationWarning {
                kind: self.schema.kind,
                path,
                message: "unknown field ignored".to_string(),
            }),
            UnknownKeyPolicy::Reject => {
                self.error(path, format!("one of the fields: {}", known.join(", ")), "an unknown field")
            }
        }
    }

    fn root(&mut self, tree: &Node) -> Value {
        let root = FieldPath::root();
        if tree.is_null() {
            self.error(
                root,
                format!("a {} document", self.schema.kind.describe()),
                "an empty document",
            );
            return Value::Null;
        }

        match self.schema.shape {
            Shape::Record(spec) => self.record(tree, spec, &root),
            Shape::List { root_key, list } => {
                let list_path = root.key(root_key);
                let items = match tree {
                    Node::Sequence(_) => Some(tree),
                    Node::Map(entries) => {
                        let policy = self.schema.unknown_keys;
                        for (key, _) in entries.iter().filter(|(k, _)| k != root_key) {
                            self.unknown_key(root.key(key.as_str()), policy, &[root_key]);
                        }
                        let found = tree.get(root_key);
                        if found.is_none() {
                            self.error(list_path.clone(), "a required field", "nothing");
                        }
                        found
                    }
                    other => {
                        self.error(
                            root.clone(),
                            format!("a mapping with `{}` or a sequence", root_key),
                            other.describe(),
                        );
                        None
                    }
                };

                let mut out = Map::new();
                if let Some(items) = items {
                    let value = self.list(items, list, &list_path);
                    out.insert(root_key.to_string(), value);
                }
                Value::Object(out)
            }
        }
    }

    fn record(&mut self, node: &Node, spec: &RecordSpec, path: &FieldPath) -> Value {
        let Node::Map(entries) = node else {
            self.error(path.clone(), "a mapping", node.describe());
            return Value::Null;
        };

        let policy = self.schema.policy_for(spec);
        let known: Vec<&str> = spec.fields.iter().map(|f| f.key).collect();
        for (key, _) in entries {
            if known.contains(&key.as_str()) {
                continue;
            }
            if let Some((_, hint)) = spec.removed.iter().find(|(k, _)| k == key) {
                self.error(path.key(key.as_str()), format!("no `{}` field ({})", key, hint), "the field");
                continue;
            }
            self.unknown_key(path.key(key.as_str()), policy, &known);
        }

        let mut out = Map::new();
        for field in spec.fields {
            let field_path = path.key(field.key);
            let value = match (node.get(field.key), field.presence) {
                (None, Presence::Required) => {
                    self.error(field_path, "a required field", "nothing");
                    continue;
                }
                (None, Presence::Optional) => continue,
                (None, Presence::Default(default)) => self.default_value(default, field.kind, &field_path),
                (Some(Node::Null), _) => {
                    self.error(field_path, expectation(&field.kind), "an empty value");
                    continue;
                }
                (Some(present), _) => self.value(present, &field.kind, &field_path),
            };
            out.insert(field.key.to_string(), value);
        }
        Value::Object(out)
    }

    fn default_value(&mut self, default: DefaultValue, kind: FieldKind, path: &FieldPath) -> Value {
        match default {
            DefaultValue::Bool(b) => Value::Bool(b),
            DefaultValue::Integer(i) => Value::from(i),
            DefaultValue::Number(x) => float(x),
            DefaultValue::Text(s) => Value::String(s.to_string()),
            DefaultValue::TextList(items) => {
                Value::Array(items.iter().map(|s| Value::String(s.to_string())).collect())
            }
            DefaultValue::EmptyMap => Value::Object(Map::new()),
            DefaultValue::EmptyRecord => match kind {
                FieldKind::Record(spec) => self.record(&Node::Map(Vec::new()), spec, path),
                _ => Value::Object(Map::new()),
            },
        }
    }

    fn value(&mut self, node: &Node, kind: &FieldKind, path: &FieldPath) -> Value {
        match (kind, node) {
            (FieldKind::Text(rules), Node::String(s)) => self.text(s, rules, path),
            (FieldKind::Name(rules), Node::String(s)) => self.text(s, rules, path),
            (FieldKind::Name(rules), Node::Integer(i)) => self.text(&i.to_string(), rules, path),

            (FieldKind::Integer { min, max }, Node::Integer(i)) => {
                if i < min || i > max {
                    self.error(path.clone(), expectation(kind), node.describe());
                }
                Value::from(*i)
            }
            (FieldKind::Integer { .. }, Node::Float(_)) => {
                self.error(
                    path.clone(),
                    expectation(kind),
                    format!("{} (not a whole number)", node.describe()),
                );
                Value::Null
            }

            (FieldKind::Number { min }, Node::Integer(i)) => {
                if (*i as f64) < *min {
                    self.error(path.clone(), expectation(kind), node.describe());
                }
                Value::from(*i)
            }
            (FieldKind::Number { min }, Node::Float(x)) => {
                if !x.is_finite() || x < min {
                    self.error(path.clone(), expectation(kind), node.describe());
                }
                float(*x)
            }

            (FieldKind::Boolean, Node::Bool(b)) => Value::Bool(*b),

            (FieldKind::Choice(options), Node::String(s)) => {
                if !options.contains(&s.as_str()) {
                    self.error(path.clone(), expectation(kind), node.describe());
                }
                Value::String(s.clone())
            }

            (FieldKind::TextList(rules), Node::String(s)) => Value::Array(
                split_list(s)
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| self.text(&item, rules, &path.index(i)))
                    .collect(),
            ),
            (FieldKind::TextList(rules), Node::Sequence(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Node::String(s) => out.push(self.text(s, rules, &path.index(i))),
                        other => self.error(path.index(i), "text", other.describe()),
                    }
                }
                Value::Array(out)
            }

            (FieldKind::TextMap { key_rules, value_rules }, Node::Map(entries)) => {
                let mut out = Map::new();
                for (key, value) in entries {
                    let entry_path = path.key(key.as_str());
                    self.apply_rules(key, key_rules, &entry_path);
                    let text = match value {
                        Node::String(s) => s.clone(),
                        Node::Integer(i) => i.to_string(),
                        other => {
                            self.error(entry_path, "text", other.describe());
                            continue;
                        }
                    };
                    let value = self.text(&text, value_rules, &entry_path);
                    out.insert(key.clone(), value);
                }
                Value::Object(out)
            }

            (FieldKind::Record(spec), _) => self.record(node, spec, path),
            (FieldKind::List(spec), _) => self.list(node, spec, path),

            _ => {
                self.error(path.clone(), expectation(kind), node.describe());
                Value::Null
            }
        }
    }

    fn list(&mut self, node: &Node, spec: &ListSpec, path: &FieldPath) -> Value {
        let Node::Sequence(items) = node else {
            self.error(path.clone(), "a sequence", node.describe());
            return Value::Null;
        };

        if items.len() < spec.min_len {
            self.error(
                path.clone(),
                format!("at least {} item(s)", spec.min_len),
                format!("{} item(s)", items.len()),
            );
        }

        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_path = path.index(i);
            if item.is_null() {
                self.error(item_path, expectation(&spec.item), "an empty item");
                out.push(Value::Null);
                continue;
            }
            out.push(self.value(item, &spec.item, &item_path));
        }

        self.check_unique(&out, spec.unique, path);
        Value::Array(out)
    }

    fn check_unique(&mut self, items: &[Value], unique: Uniqueness, path: &FieldPath) {
        let mut seen: Vec<(&str, usize)> = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let (value, item_path) = match unique {
                Uniqueness::None => return,
                Uniqueness::Value => (item.as_str(), path.index(i)),
                Uniqueness::Key(key) => (item.get(key).and_then(Value::as_str), path.index(i).key(key)),
            };
            let Some(value) = value else { continue };
            match seen.iter().find(|(v, _)| *v == value) {
                Some((_, first)) => {
                    let first_path = match unique {
                        Uniqueness::Key(key) => path.index(*first).key(key),
                        _ => path.index(*first),
                    };
                    self.error(
                        item_path,
                        format!("a unique value (already used at {})", first_path),
                        format!("duplicate text {:?}", value),
                    );
                }
                None => seen.push((value, i)),
            }
        }
    }

    fn text(&mut self, s: &str, rules: &[TextRule], path: &FieldPath) -> Value {
        self.apply_rules(s, rules, path);
        Value::String(s.to_string())
    }

    fn apply_rules(&mut self, s: &str, rules: &[TextRule], path: &FieldPath) {
        for rule in rules {
            let expected = match rule {
                TextRule::NonEmpty if s.trim().is_empty() => "non-empty text".to_string(),
                TextRule::ProtocolSafe if s.starts_with('%') || s.contains('#') => {
                    "text without a leading `%` or any `#`".to_string()
                }
                TextRule::NoRelativePath if has_relative_component(s) => {
                    "a name without `.` or `..` path components".to_string()
                }
                TextRule::NotReserved(reserved) if reserved.contains(&s) => {
                    format!("a name other than {}", reserved.join(", "))
                }
                TextRule::NoSpaces if s.contains(' ') => "text without spaces".to_string(),
                TextRule::NoPipe if s.contains('|') => "text without `|`".to_string(),
                _ => continue,
            };
            self.error(path.clone(), expected, format!("text {:?}", s));
        }
    }
}

fn float(x: f64) -> Value {
    serde_json::Number::from_f64(x)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Human description of what a field kind accepts.
fn expectation(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Text(_) => "text".to_string(),
        FieldKind::Name(_) => "text or integer".to_string(),
        FieldKind::Integer { min, max } if *max == i64::MAX => format!("an integer >= {}", min),
        FieldKind::Integer { min, max } => format!("an integer in {}..={}", min, max),
        FieldKind::Number { min } if min.is_finite() => format!("a number >= {}", min),
        FieldKind::Number { .. } => "a number".to_string(),
        FieldKind::Boolean => "true or false".to_string(),
        FieldKind::Choice(options) => format!("one of {}", options.join(", ")),
        FieldKind::TextList(_) => "a list of texts".to_string(),
        FieldKind::TextMap { .. } => "a mapping of texts".to_string(),
        FieldKind::Record(_) => "a mapping".to_string(),
        FieldKind::List(_) => "a sequence".to_string(),
    }
}

/// Split an authored comma list (`"A, B"`); `,\` stands for a literal comma.
pub fn split_list(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    s.split(", ").map(|part| part.replace(",\\", ",")).collect()
}

fn has_relative_component(s: &str) -> bool {
    s.split(['/', '\\']).any(|part| part == "." || part == "..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;
    use crate::schema::documents::builtin;

    fn yaml(text: &str) -> Node {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("Lobby, Courtroom"), vec!["Lobby", "Courtroom"]);
        assert_eq!(split_list("A,\\ B, C"), vec!["A, B", "C"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_relative_components() {
        assert!(has_relative_component(".."));
        assert!(has_relative_component("music/../secret"));
        assert!(!has_relative_component("Trial...mp3"));
    }

    #[test]
    fn test_defaults_are_filled() {
        let tree = yaml("areas:\n  - name: Lobby\n    background: lobby\n");
        let checked = check(&tree, &builtin(DocumentKind::Areas)).unwrap();
        let area = &checked.value["areas"][0];
        assert_eq!(area["has_lights"], Value::Bool(true));
        assert_eq!(area["reachable_areas"], serde_json::json!(["<ALL>"]));
        assert_eq!(area["afk_delay"], serde_json::json!(0));
        assert!(area.get("description").is_none());
    }

    #[test]
    fn test_collects_every_error() {
        let tree = yaml(
            "areas:\n  - name: Lobby\n    afk_delay: 400\n  - name: '%bad'\n    background: x\n    bglock: 'yes'\n",
        );
        let errors = check(&tree, &builtin(DocumentKind::Areas)).unwrap_err();
        let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "areas[0].background",
                "areas[0].afk_delay",
                "areas[1].name",
                "areas[1].bglock",
            ]
        );
        assert_eq!(errors[1].expected, "an integer in 0..=360");
        assert_eq!(errors[3].actual, "text \"yes\"");
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let tree = yaml("areas:\n  - name: Lobby\n    background: lobby\n    afk_sendto: 1.0\n");
        let errors = check(&tree, &builtin(DocumentKind::Areas)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.to_string(), "areas[0].afk_sendto");
        assert!(errors[0].actual.contains("not a whole number"));
    }

    #[test]
    fn test_unknown_keys_follow_policy() {
        let tree = yaml("backgrounds: [a, b]\nthemes: [dark]\n");
        let mut schema = builtin(DocumentKind::Backgrounds);
        let checked = check(&tree, &schema).unwrap();
        assert_eq!(checked.warnings.len(), 1);
        assert_eq!(checked.warnings[0].path.to_string(), "themes");

        schema.unknown_keys = UnknownKeyPolicy::Reject;
        let errors = check(&tree, &schema).unwrap_err();
        assert_eq!(errors[0].path.to_string(), "themes");
    }

    #[test]
    fn test_walk_keeps_warnings_beside_errors() {
        let tree = yaml("backgrounds: []
themes: [dark]
");
        let walked = walk(&tree, &builtin(DocumentKind::Backgrounds));
        assert_eq!(walked.errors.len(), 1);
        assert_eq!(walked.warnings.len(), 1);
        assert_eq!(walked.warnings[0].path.to_string(), "themes");
    }

    #[test]
    fn test_duplicate_values_point_at_later_entry() {
        let tree = yaml("- courtroom\n- lobby\n- courtroom\n");
        let errors = check(&tree, &builtin(DocumentKind::Backgrounds)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.to_string(), "backgrounds[2]");
        assert!(errors[0].expected.contains("backgrounds[0]"));
    }

    #[test]
    fn test_null_field_is_reported() {
        let tree = yaml("areas:\n  - name: Lobby\n    background: lobby\n    bglock:\n");
        let errors = check(&tree, &builtin(DocumentKind::Areas)).unwrap_err();
        assert_eq!(errors[0].path.to_string(), "areas[0].bglock");
        assert_eq!(errors[0].actual, "an empty value");
    }

    #[test]
    fn test_removed_key_is_rejected_with_hint() {
        let tree = yaml("areas:\n  - name: Lobby\n    background: lobby\n    sound_proof: true\n");
        let errors = check(&tree, &builtin(DocumentKind::Areas)).unwrap_err();
        assert_eq!(errors[0].path.to_string(), "areas[0].sound_proof");
        assert!(errors[0].expected.contains("scream_range"));
    }

    #[test]
    fn test_empty_document() {
        let errors = check(&Node::Null, &builtin(DocumentKind::Gimp)).unwrap_err();
        assert_eq!(errors[0].actual, "an empty document");
    }
}
