//! Declarative schema tables and the record walk that enforces them.
//!
//! A schema is an ordered list of field rules; validating a record is a
//! single pass over that list, collecting every violation instead of
//! stopping at the first. Tables are `'static` data; the walk holds no
//! mutable state outside the error accumulator.

use serde_json::{Map, Value};
use strum::VariantNames;

use crate::error::{ROOT_FIELD, ValidationErrors, Violation};
use crate::models::users::UserRole;
use crate::validation;

/// Identifies one of the declared record shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    UserBase,
    UserCreate,
    UserUpdate,
    UserResponse,
    UserListResponse,
    LoginRequest,
}

impl SchemaVariant {
    /// The rule table for this variant.
    pub fn schema(self) -> &'static Schema {
        match self {
            SchemaVariant::UserBase => &USER_BASE,
            SchemaVariant::UserCreate => &USER_CREATE,
            SchemaVariant::UserUpdate => &USER_UPDATE,
            SchemaVariant::UserResponse => &USER_RESPONSE,
            SchemaVariant::UserListResponse => &USER_LIST_RESPONSE,
            SchemaVariant::LoginRequest => &LOGIN_REQUEST,
        }
    }
}

/// The type-and-format constraint attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form string.
    Text,
    /// String with a minimum character count.
    MinLengthText { min: usize },
    /// Email address.
    Email,
    /// Member of [`UserRole`], matched exactly.
    Role,
    /// UUID in canonical string form.
    Uuid,
    /// RFC 3339 or offset-less timestamp.
    Timestamp,
    /// Integer, honoring boundary coercions.
    Integer,
    /// Ordered sequence of nested records.
    Items(SchemaVariant),
}

/// One field rule: name, constraint, and optionality.
///
/// `example` is documentation metadata for introspection tooling; it is
/// never enforced.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub reject_empty: bool,
    pub example: Option<&'static str>,
}

impl FieldRule {
    const fn new(name: &'static str, kind: FieldKind, required: bool) -> Self {
        Self {
            name,
            kind,
            required,
            reject_empty: false,
            example: None,
        }
    }

    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self::new(name, kind, true)
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self::new(name, kind, false)
    }

    /// Marks a supplied-but-empty value (null or `""`) as a violation.
    pub const fn rejecting_empty(mut self) -> Self {
        self.reject_empty = true;
        self
    }

    pub const fn example(mut self, example: &'static str) -> Self {
        self.example = Some(example);
        self
    }
}

/// An ordered set of field rules for one record shape.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldRule],
}

static USER_BASE: Schema = Schema {
    name: "UserBase",
    fields: &[
        FieldRule::required("email", FieldKind::Email).example("john.doe@example.com"),
        FieldRule::optional("first_name", FieldKind::Text).example("John"),
        FieldRule::optional("last_name", FieldKind::Text).example("Doe"),
        FieldRule::optional("bio", FieldKind::Text).example("Experienced software developer."),
        FieldRule::optional("profile_picture_url", FieldKind::Text)
            .example("https://example.com/profile.jpg"),
        FieldRule::optional("role", FieldKind::Role),
    ],
};

static USER_CREATE: Schema = Schema {
    name: "UserCreate",
    fields: &[
        FieldRule::required("email", FieldKind::Email).example("john.doe@example.com"),
        FieldRule::optional("first_name", FieldKind::Text).example("John"),
        FieldRule::optional("last_name", FieldKind::Text).example("Doe"),
        FieldRule::optional("bio", FieldKind::Text).example("Experienced software developer."),
        FieldRule::optional("profile_picture_url", FieldKind::Text)
            .example("https://example.com/profile.jpg"),
        FieldRule::optional("role", FieldKind::Role),
        FieldRule::required("password", FieldKind::MinLengthText { min: 6 })
            .example("Secure*1234"),
    ],
};

static USER_UPDATE: Schema = Schema {
    name: "UserUpdate",
    fields: &[
        FieldRule::optional("first_name", FieldKind::Text)
            .rejecting_empty()
            .example("John"),
        FieldRule::optional("last_name", FieldKind::Text)
            .rejecting_empty()
            .example("Doe"),
        FieldRule::optional("bio", FieldKind::Text)
            .rejecting_empty()
            .example("Experienced backend developer."),
        FieldRule::optional("profile_picture_url", FieldKind::Text)
            .rejecting_empty()
            .example("https://example.com/profile.jpg"),
        FieldRule::optional("role", FieldKind::Role).rejecting_empty(),
    ],
};

static USER_RESPONSE: Schema = Schema {
    name: "UserResponse",
    fields: &[
        FieldRule::required("email", FieldKind::Email).example("john.doe@example.com"),
        FieldRule::optional("first_name", FieldKind::Text).example("John"),
        FieldRule::optional("last_name", FieldKind::Text).example("Doe"),
        FieldRule::optional("bio", FieldKind::Text).example("Experienced software developer."),
        FieldRule::optional("profile_picture_url", FieldKind::Text)
            .example("https://example.com/profile.jpg"),
        FieldRule::optional("role", FieldKind::Role),
        FieldRule::required("id", FieldKind::Uuid)
            .example("123e4567-e89b-12d3-a456-426614174000"),
        FieldRule::required("created_at", FieldKind::Timestamp).example("2024-01-01T00:00:00"),
        FieldRule::required("updated_at", FieldKind::Timestamp).example("2024-01-01T12:00:00"),
    ],
};

static USER_LIST_RESPONSE: Schema = Schema {
    name: "UserListResponse",
    fields: &[
        FieldRule::required("items", FieldKind::Items(SchemaVariant::UserResponse)),
        FieldRule::required("total", FieldKind::Integer),
        FieldRule::required("page", FieldKind::Integer),
        FieldRule::required("size", FieldKind::Integer),
    ],
};

static LOGIN_REQUEST: Schema = Schema {
    name: "LoginRequest",
    fields: &[
        FieldRule::required("email", FieldKind::Email).example("john.doe@example.com"),
        FieldRule::required("password", FieldKind::Text).example("Secure*1234"),
    ],
};

impl Schema {
    /// Checks a raw record against this schema.
    ///
    /// Walks every field rule in declaration order and reports every
    /// violation; unknown fields in the input are ignored.
    pub fn check(&self, value: &Value) -> Result<(), ValidationErrors> {
        tracing::trace!(schema = self.name, "checking record");

        let mut errors = ValidationErrors::new();
        let Some(object) = value.as_object() else {
            errors.push(ROOT_FIELD, Violation::NotAnObject);
            return Err(errors);
        };

        for rule in self.fields {
            check_field(rule, object, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                schema = self.name,
                violations = errors.len(),
                "record rejected"
            );
            Err(errors)
        }
    }
}

fn check_field(rule: &FieldRule, object: &Map<String, Value>, errors: &mut ValidationErrors) {
    let raw = match object.get(rule.name) {
        None => {
            if rule.required {
                errors.push(rule.name, Violation::MissingRequiredField);
            }
            return;
        }
        Some(Value::Null) => {
            // Supplied-but-null: an update schema rejects it, everything
            // else treats it as absent.
            if rule.reject_empty {
                errors.push(rule.name, Violation::EmptyUpdateField);
            } else if rule.required {
                errors.push(rule.name, Violation::MissingRequiredField);
            }
            return;
        }
        Some(raw) => raw,
    };

    if rule.reject_empty {
        if let Value::String(text) = raw {
            if text.is_empty() {
                errors.push(rule.name, Violation::EmptyUpdateField);
                return;
            }
        }
    }

    match rule.kind {
        FieldKind::Text => {
            if !raw.is_string() {
                errors.push(rule.name, Violation::NotAString);
            }
        }
        FieldKind::MinLengthText { min } => match raw.as_str() {
            Some(text) => {
                if let Err(violation) = validation::validate_min_length(text, min) {
                    errors.push(rule.name, violation);
                }
            }
            None => errors.push(rule.name, Violation::NotAString),
        },
        FieldKind::Email => match raw.as_str() {
            Some(text) => {
                if let Err(violation) = validation::validate_email(text) {
                    errors.push(rule.name, violation);
                }
            }
            None => errors.push(rule.name, Violation::NotAString),
        },
        FieldKind::Role => match raw.as_str() {
            Some(text) => {
                if let Err(violation) = validation::parse_role(text) {
                    errors.push(rule.name, violation);
                }
            }
            None => errors.push(
                rule.name,
                Violation::InvalidEnumMember {
                    permitted: UserRole::VARIANTS,
                },
            ),
        },
        FieldKind::Uuid => match raw.as_str() {
            Some(text) => {
                if let Err(violation) = validation::parse_uuid(text) {
                    errors.push(rule.name, violation);
                }
            }
            None => errors.push(rule.name, Violation::InvalidUuid),
        },
        FieldKind::Timestamp => match raw.as_str() {
            Some(text) => {
                if let Err(violation) = validation::parse_timestamp(text) {
                    errors.push(rule.name, violation);
                }
            }
            None => errors.push(rule.name, Violation::InvalidTimestamp),
        },
        FieldKind::Integer => {
            if let Err(violation) = validation::parse_integer(raw) {
                errors.push(rule.name, violation);
            }
        }
        FieldKind::Items(variant) => match raw.as_array() {
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    if let Err(nested) = variant.schema().check(item) {
                        errors.extend_prefixed(&format!("{}.{index}", rule.name), nested);
                    }
                }
            }
            None => errors.push(rule.name, Violation::NotAList),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_reports_all_violations_in_field_order() {
        let record = json!({
            "email": "invalid-email",
            "password": "123",
        });

        let errors = SchemaVariant::UserCreate.schema().check(&record).unwrap_err();
        assert_eq!(errors.len(), 2, "Both fields should be reported");

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["email", "password"],
            "Errors should follow schema declaration order"
        );
    }

    #[test]
    fn test_check_rejects_non_object_record() {
        let errors = SchemaVariant::LoginRequest
            .schema()
            .check(&json!("not a record"))
            .unwrap_err();

        assert_eq!(errors.as_slice()[0].field, "__root__");
        assert_eq!(errors.as_slice()[0].message, "value is not a valid dict");
    }

    #[test]
    fn test_check_ignores_unknown_fields() {
        let record = json!({
            "email": "john.doe@example.com",
            "password": "Secure*1234",
            "nickname": "john_doe",
        });

        assert!(SchemaVariant::LoginRequest.schema().check(&record).is_ok());
    }

    #[test]
    fn test_update_accepts_empty_record() {
        assert!(SchemaVariant::UserUpdate.schema().check(&json!({})).is_ok());
    }

    #[test]
    fn test_nested_items_use_dotted_paths() {
        let record = json!({
            "items": [{
                "email": "john.doe@example.com",
                "id": "not-a-uuid",
                "created_at": "2024-01-01T00:00:00",
                "updated_at": "2024-01-01T12:00:00",
            }],
            "total": 1,
            "page": 1,
            "size": 10,
        });

        let errors = SchemaVariant::UserListResponse
            .schema()
            .check(&record)
            .unwrap_err();

        assert_eq!(errors.as_slice()[0].field, "items.0.id");
        assert_eq!(errors.as_slice()[0].message, "value is not a valid uuid");
    }

    #[test]
    fn test_example_metadata_is_carried_not_enforced() {
        let email_rule = SchemaVariant::UserBase
            .schema()
            .fields
            .iter()
            .find(|rule| rule.name == "email")
            .unwrap();
        assert_eq!(email_rule.example, Some("john.doe@example.com"));

        // A valid address that differs from the example still passes.
        let record = json!({ "email": "someone.else@sub.domain.org" });
        assert!(SchemaVariant::UserBase.schema().check(&record).is_ok());
    }
}
