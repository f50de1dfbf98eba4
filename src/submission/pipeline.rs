use std::sync::Arc;

use crate::error::AppError;
use crate::notify::{self, Delivery, DeliveryPolicy};
use crate::state::SharedState;

use super::fields::{BASE_FIELDS, CODE_FIELDS, Field, RawFields};
use super::phone::PhoneRule;
use super::Submission;

/// When the notification is sent relative to the HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Awaited before responding.
    Inline,
    /// Spawned once the submission is accepted; the outcome is only logged.
    AfterResponse,
}

/// Body returned on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{success, message}`
    Ack,
    /// `{success, message, data: {id, telegramSent}, redirect}`
    Tracked,
    /// `{success, message, data: {id, tarif, nohp, nama, saldo, timestamp}, redirect}`
    Echo,
}

/// Everything that differs between the submission endpoints.
#[derive(Debug, Clone, Copy)]
pub struct EndpointProfile {
    pub name: &'static str,
    pub fields: &'static [Field],
    pub phone: PhoneRule,
    pub delivery: DeliveryPolicy,
    pub dispatch: Dispatch,
    pub persist: bool,
    pub response: ResponseShape,
}

pub const CONFIRM: EndpointProfile = EndpointProfile {
    name: "confirm",
    fields: BASE_FIELDS,
    phone: PhoneRule::Digits,
    delivery: DeliveryPolicy::Mandatory,
    dispatch: Dispatch::Inline,
    persist: false,
    response: ResponseShape::Ack,
};

pub const CONFIRM_TRACKED: EndpointProfile = EndpointProfile {
    name: "confirm_tracked",
    fields: BASE_FIELDS,
    phone: PhoneRule::Digits,
    delivery: DeliveryPolicy::BestEffort,
    dispatch: Dispatch::Inline,
    persist: false,
    response: ResponseShape::Tracked,
};

pub const CONFIRM_CODE: EndpointProfile = EndpointProfile {
    name: "confirm_code",
    fields: CODE_FIELDS,
    phone: PhoneRule::CountryStripped,
    delivery: DeliveryPolicy::Mandatory,
    dispatch: Dispatch::Inline,
    persist: false,
    response: ResponseShape::Ack,
};

pub const SUBMIT: EndpointProfile = EndpointProfile {
    name: "submit",
    fields: BASE_FIELDS,
    phone: PhoneRule::Digits,
    delivery: DeliveryPolicy::BestEffort,
    dispatch: Dispatch::AfterResponse,
    persist: false,
    response: ResponseShape::Echo,
};

pub const SUBMIT_STORE: EndpointProfile = EndpointProfile {
    name: "submit_store",
    fields: BASE_FIELDS,
    phone: PhoneRule::Digits,
    delivery: DeliveryPolicy::BestEffort,
    dispatch: Dispatch::Inline,
    persist: true,
    response: ResponseShape::Tracked,
};

pub struct PipelineResult {
    pub submission: Submission,
    /// `None` when delivery was dispatched after the response.
    pub delivery: Option<Delivery>,
}

/// Validate, normalize, optionally persist, then notify.
pub async fn run(
    state: &SharedState,
    profile: &EndpointProfile,
    raw: &RawFields,
    ip: Option<String>,
) -> Result<PipelineResult, AppError> {
    let submission = Submission::from_raw(raw, profile.fields, profile.phone, ip)?;

    if profile.persist {
        state.store.append(&submission).await?;
    }

    let delivery = match profile.dispatch {
        Dispatch::Inline => {
            Some(notify::deliver(state.notifier.as_ref(), &submission, profile.delivery).await?)
        }
        Dispatch::AfterResponse => {
            let notifier = Arc::clone(&state.notifier);
            let pending = submission.clone();
            let policy = profile.delivery;
            tokio::spawn(async move {
                if let Err(e) = notify::deliver(notifier.as_ref(), &pending, policy).await {
                    tracing::warn!(id = %pending.id, "Background notification failed: {e}");
                }
            });
            None
        }
    };

    Ok(PipelineResult {
        submission,
        delivery,
    })
}
