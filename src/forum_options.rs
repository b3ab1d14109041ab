//! Per-user forum preferences: who may invite to private threads and how
//! thread subscriptions are created.

use log::info;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use serde::Deserialize;
use serde_json::Value;

use crate::entity::user;
use crate::error::{AppError, FieldErrors};

const REQUIRED: &str = "This field is required.";
const NOT_INTEGER: &str = "A valid integer is required.";
const NOT_BOOLEAN: &str = "Must be a valid boolean.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrivateThreadInvites {
    Everybody = 0,
    Followed = 1,
    Nobody = 2,
}

impl TryFrom<i64> for PrivateThreadInvites {
    type Error = ();

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Everybody),
            1 => Ok(Self::Followed),
            2 => Ok(Self::Nobody),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionMode {
    Off = 0,
    Notify = 1,
    NotifyAndEmail = 2,
}

impl TryFrom<i64> for SubscriptionMode {
    type Error = ();

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::Notify),
            2 => Ok(Self::NotifyAndEmail),
            _ => Err(()),
        }
    }
}

/// Submitted form. Values stay untyped until validation so that every bad
/// field can be reported instead of failing on the first.
#[derive(Deserialize, Debug, Default)]
pub struct ForumOptionsRequest {
    pub limits_private_thread_invites_to: Option<Value>,
    pub subscribe_to_started_threads: Option<Value>,
    pub subscribe_to_replied_threads: Option<Value>,
    pub is_hiding_presence: Option<Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForumOptions {
    pub limits_private_thread_invites_to: PrivateThreadInvites,
    pub subscribe_to_started_threads: SubscriptionMode,
    pub subscribe_to_replied_threads: SubscriptionMode,
    pub is_hiding_presence: bool,
}

impl ForumOptionsRequest {
    pub fn validate(&self) -> Result<ForumOptions, FieldErrors> {
        let mut errors = FieldErrors::new();

        let invites = choice::<PrivateThreadInvites>(
            &mut errors,
            "limits_private_thread_invites_to",
            self.limits_private_thread_invites_to.as_ref(),
        );
        let started = choice::<SubscriptionMode>(
            &mut errors,
            "subscribe_to_started_threads",
            self.subscribe_to_started_threads.as_ref(),
        );
        let replied = choice::<SubscriptionMode>(
            &mut errors,
            "subscribe_to_replied_threads",
            self.subscribe_to_replied_threads.as_ref(),
        );
        let hiding = match self.is_hiding_presence.as_ref().map(as_bool) {
            None => Some(false),
            Some(Some(v)) => Some(v),
            Some(None) => {
                add_error(&mut errors, "is_hiding_presence", NOT_BOOLEAN.to_string());
                None
            }
        };

        match (invites, started, replied, hiding) {
            (Some(invites), Some(started), Some(replied), Some(hiding)) if errors.is_empty() => {
                Ok(ForumOptions {
                    limits_private_thread_invites_to: invites,
                    subscribe_to_started_threads: started,
                    subscribe_to_replied_threads: replied,
                    is_hiding_presence: hiding,
                })
            }
            _ => Err(errors),
        }
    }
}

fn add_error(errors: &mut FieldErrors, field: &str, msg: String) {
    errors.entry(field.to_string()).or_default().push(msg);
}

fn choice<T: TryFrom<i64>>(errors: &mut FieldErrors, field: &str, value: Option<&Value>) -> Option<T> {
    let raw = match value {
        None | Some(Value::Null) => {
            add_error(errors, field, REQUIRED.to_string());
            return None;
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            add_error(errors, field, REQUIRED.to_string());
            return None;
        }
        Some(v) => v,
    };

    let number = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let Some(number) = number else {
        add_error(errors, field, NOT_INTEGER.to_string());
        return None;
    };

    match T::try_from(number) {
        Ok(v) => Some(v),
        Err(_) => {
            add_error(errors, field, format!("\"{}\" is not a valid choice.", number));
            None
        }
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Null => Some(false),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "" | "0" | "false" | "off" => Some(false),
            "1" | "true" | "on" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

/// Writes the options to `user_id` in one update and returns the stored row.
pub async fn save<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    options: &ForumOptions,
) -> Result<user::Model, AppError> {
    let existing = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    let mut active: user::ActiveModel = existing.into();
    active.limits_private_thread_invites_to = Set(options.limits_private_thread_invites_to as i32);
    active.subscribe_to_started_threads = Set(options.subscribe_to_started_threads as i32);
    active.subscribe_to_replied_threads = Set(options.subscribe_to_replied_threads as i32);
    active.is_hiding_presence = Set(options.is_hiding_presence);
    let updated = active.update(db).await?;

    info!("forum options changed for user {}", user_id);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> ForumOptionsRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn empty_request_names_every_required_field() {
        let errors = ForumOptionsRequest::default().validate().unwrap_err();
        let fields: Vec<&str> = errors.keys().map(|k| k.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "limits_private_thread_invites_to",
                "subscribe_to_replied_threads",
                "subscribe_to_started_threads",
            ]
        );
        assert!(errors.values().all(|msgs| msgs == &vec![REQUIRED.to_string()]));
    }

    #[test]
    fn valid_values_are_typed() {
        let options = request(json!({
            "limits_private_thread_invites_to": 1,
            "subscribe_to_started_threads": 2,
            "subscribe_to_replied_threads": "1",
        }))
        .validate()
        .unwrap();

        assert_eq!(options.limits_private_thread_invites_to, PrivateThreadInvites::Followed);
        assert_eq!(options.subscribe_to_started_threads, SubscriptionMode::NotifyAndEmail);
        assert_eq!(options.subscribe_to_replied_threads, SubscriptionMode::Notify);
        assert!(!options.is_hiding_presence);
    }

    #[test]
    fn bad_values_are_reported_per_field() {
        let errors = request(json!({
            "limits_private_thread_invites_to": 7,
            "subscribe_to_started_threads": "often",
            "subscribe_to_replied_threads": 0,
            "is_hiding_presence": "maybe",
        }))
        .validate()
        .unwrap_err();

        assert_eq!(
            errors["limits_private_thread_invites_to"],
            vec!["\"7\" is not a valid choice.".to_string()]
        );
        assert_eq!(errors["subscribe_to_started_threads"], vec![NOT_INTEGER.to_string()]);
        assert_eq!(errors["is_hiding_presence"], vec![NOT_BOOLEAN.to_string()]);
        assert!(!errors.contains_key("subscribe_to_replied_threads"));
    }

    #[test]
    fn hiding_presence_accepts_form_style_booleans() {
        let options = request(json!({
            "limits_private_thread_invites_to": 0,
            "subscribe_to_started_threads": 0,
            "subscribe_to_replied_threads": 0,
            "is_hiding_presence": "on",
        }))
        .validate()
        .unwrap();
        assert!(options.is_hiding_presence);
    }
}
