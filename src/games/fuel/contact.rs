//! Contact-gated reward collection.
//!
//! Physical items and vouchers need an email and phone number on file.
//! When a reward like that is requested without them, the gate parks it
//! and prompts for details; a valid submission releases the parked reward
//! exactly once.
//!
//! ```text
//! Idle ──request (no contact)──▶ AwaitingContact ──valid submit──▶ Fulfilled ──finish──▶ Idle
//!   ▲                                │  ▲     │
//!   └───────────── dismiss ──────────┘  └─────┘ invalid submit
//! ```

use thiserror::Error;

/// Minimum phone number length, in characters.
pub const MIN_PHONE_LEN: usize = 10;

/// A reward parked until contact details exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingReward {
    LadderItem { ladder_id: String, step_id: String },
    StorePurchase { item_id: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactField {
    Email,
    Phone,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("Please fill in all fields to claim your reward.")]
    MissingField(ContactField),
    #[error("Please enter a valid email.")]
    InvalidEmail,
    #[error("Please enter a valid phone number.")]
    InvalidPhone,
}

impl ContactError {
    /// The form field to highlight.
    pub fn field(&self) -> ContactField {
        match self {
            ContactError::MissingField(field) => *field,
            ContactError::InvalidEmail => ContactField::Email,
            ContactError::InvalidPhone => ContactField::Phone,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contact {
    pub email: String,
    pub phone: String,
}

impl Contact {
    pub fn parse(email: &str, phone: &str) -> Result<Self, ContactError> {
        if email.is_empty() {
            return Err(ContactError::MissingField(ContactField::Email));
        }
        if phone.is_empty() {
            return Err(ContactError::MissingField(ContactField::Phone));
        }
        if !email.contains('@') {
            return Err(ContactError::InvalidEmail);
        }
        if phone.chars().count() < MIN_PHONE_LEN {
            return Err(ContactError::InvalidPhone);
        }
        Ok(Self {
            email: email.to_string(),
            phone: phone.to_string(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatePhase {
    Idle,
    AwaitingContact,
    /// Details accepted; the released reward is being applied.
    Fulfilled,
}

/// Values typed into the prompt so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub email: String,
    pub phone: String,
}

#[derive(Clone, Debug)]
pub struct ContactGate {
    phase: GatePhase,
    pending: Option<PendingReward>,
    pub draft: ContactDraft,
    /// Last validation failure, shown inline under the form.
    pub error: Option<ContactError>,
}

impl ContactGate {
    pub fn new() -> Self {
        Self {
            phase: GatePhase::Idle,
            pending: None,
            draft: ContactDraft::default(),
            error: None,
        }
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    pub fn pending(&self) -> Option<&PendingReward> {
        self.pending.as_ref()
    }

    pub fn is_prompting(&self) -> bool {
        self.phase == GatePhase::AwaitingContact
    }

    /// Route `reward` through the gate. Returns it straight back when the
    /// player already has contact details; otherwise parks it (replacing
    /// any unanswered request) and opens the prompt.
    pub fn request(&mut self, reward: PendingReward, has_contact: bool) -> Option<PendingReward> {
        if has_contact {
            return Some(reward);
        }
        if let Some(previous) = self.pending.replace(reward) {
            log::debug!("contact gate: replacing unanswered request {previous:?}");
        }
        self.phase = GatePhase::AwaitingContact;
        self.error = None;
        None
    }

    /// Validate a submission. On success the gate moves to `Fulfilled` and
    /// hands back the contact details plus the parked reward (if any); call
    /// [`finish`](Self::finish) once the reward is applied. On failure the
    /// typed values and the parked reward are kept.
    pub fn submit(
        &mut self,
        email: &str,
        phone: &str,
    ) -> Result<(Contact, Option<PendingReward>), ContactError> {
        self.draft = ContactDraft {
            email: email.to_string(),
            phone: phone.to_string(),
        };
        match Contact::parse(email, phone) {
            Ok(contact) => {
                self.error = None;
                self.draft = ContactDraft::default();
                self.phase = GatePhase::Fulfilled;
                Ok((contact, self.pending.take()))
            }
            Err(e) => {
                log::debug!("contact gate: rejected submission ({:?})", e.field());
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn finish(&mut self) {
        self.phase = GatePhase::Idle;
    }

    /// Close the prompt without submitting. The parked reward is dropped.
    pub fn dismiss(&mut self) -> Option<PendingReward> {
        self.phase = GatePhase::Idle;
        self.error = None;
        self.draft = ContactDraft::default();
        self.pending.take()
    }
}

impl Default for ContactGate {
    fn default() -> Self {
        Self::new()
    }
}
