use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    PersonName, Rating, TestimonialId, TestimonialMessage, TypeConstraintError,
};

/// Moderation state of a testimonial.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl TestimonialStatus {
    pub const ALL: [TestimonialStatus; 3] = [
        TestimonialStatus::Pending,
        TestimonialStatus::Approved,
        TestimonialStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TestimonialStatus::Pending => "pending",
            TestimonialStatus::Approved => "approved",
            TestimonialStatus::Rejected => "rejected",
        }
    }

    /// Whether the approve/reject actions may move a testimonial from `self`
    /// to `target`. Switching between approved and rejected goes through the
    /// edit form instead.
    pub fn can_moderate_to(self, target: TestimonialStatus) -> bool {
        matches!(
            (self, target),
            (TestimonialStatus::Pending, TestimonialStatus::Approved)
                | (TestimonialStatus::Pending, TestimonialStatus::Rejected)
        )
    }
}

impl Display for TestimonialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestimonialStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(TestimonialStatus::Pending),
            "approved" => Ok(TestimonialStatus::Approved),
            "rejected" => Ok(TestimonialStatus::Rejected),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown testimonial status `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub patient_name: String,
    pub message: String,
    pub rating: Rating,
    pub status: TestimonialStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Testimonial {
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.patient_name.to_lowercase().contains(&term)
            || self.message.to_lowercase().contains(&term)
    }
}

/// Validated testimonial content, shared by create and update.
#[derive(Clone, Debug)]
pub struct TestimonialDetails {
    pub patient_name: PersonName,
    pub message: TestimonialMessage,
    pub rating: Rating,
    pub status: TestimonialStatus,
}

pub type NewTestimonial = TestimonialDetails;
pub type UpdateTestimonial = TestimonialDetails;

impl TestimonialDetails {
    pub fn into_testimonial(self, id: TestimonialId, now: NaiveDateTime) -> Testimonial {
        Testimonial {
            id,
            patient_name: self.patient_name.into_inner(),
            message: self.message.into_inner(),
            rating: self.rating,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_to(&self, testimonial: &mut Testimonial, now: NaiveDateTime) {
        testimonial.patient_name = self.patient_name.as_str().to_string();
        testimonial.message = self.message.as_str().to_string();
        testimonial.rating = self.rating;
        testimonial.status = self.status;
        testimonial.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moderation_only_leaves_pending() {
        use TestimonialStatus::*;

        assert!(Pending.can_moderate_to(Approved));
        assert!(Pending.can_moderate_to(Rejected));
        assert!(!Approved.can_moderate_to(Rejected));
        assert!(!Rejected.can_moderate_to(Approved));
        assert!(!Approved.can_moderate_to(Pending));
    }

    #[test]
    fn status_parses_known_codes_only() {
        assert_eq!(
            "approved".parse::<TestimonialStatus>(),
            Ok(TestimonialStatus::Approved)
        );
        assert!("archived".parse::<TestimonialStatus>().is_err());
    }
}
