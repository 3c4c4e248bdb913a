//! Testimonial forms: the admin modal and the public "share your story" form.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::testimonial::{Testimonial, TestimonialDetails, TestimonialStatus};
use crate::domain::types::{PersonName, Rating, TestimonialId, TestimonialMessage};
use crate::forms::{FormError, optional_text};
use crate::store::crud::EditableEntity;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
pub struct TestimonialForm {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub patient_name: String,
    #[validate(length(
        min = 10,
        max = 1000,
        message = "Message must be between 10 and 1000 characters"
    ))]
    pub message: String,
    /// Kept as text so a tampered value becomes a field error.
    pub rating: String,
    #[serde(default)]
    pub status: String,
}

impl Default for TestimonialForm {
    fn default() -> Self {
        Self {
            patient_name: String::new(),
            message: String::new(),
            rating: Rating::MAX.to_string(),
            status: TestimonialStatus::default().as_str().to_string(),
        }
    }
}

impl From<&Testimonial> for TestimonialForm {
    fn from(testimonial: &Testimonial) -> Self {
        Self {
            patient_name: testimonial.patient_name.clone(),
            message: testimonial.message.clone(),
            rating: testimonial.rating.get().to_string(),
            status: testimonial.status.as_str().to_string(),
        }
    }
}

fn parse_rating(value: &str) -> Result<Rating, FormError> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(|rating| Rating::new(rating).ok())
        .ok_or(FormError::InvalidRating)
}

fn content(
    patient_name: &str,
    message: String,
    rating: &str,
) -> Result<(PersonName, TestimonialMessage, Rating), FormError> {
    Ok((
        PersonName::new(ammonia::clean(patient_name)).map_err(|_| FormError::InvalidName)?,
        TestimonialMessage::new(message).map_err(|_| FormError::InvalidMessage)?,
        parse_rating(rating)?,
    ))
}

impl TryFrom<TestimonialForm> for TestimonialDetails {
    type Error = FormError;

    fn try_from(form: TestimonialForm) -> Result<Self, Self::Error> {
        let status = match optional_text(&form.status) {
            Some(status) => status
                .parse::<TestimonialStatus>()
                .map_err(|_| FormError::InvalidStatus)?,
            None => TestimonialStatus::default(),
        };
        let (patient_name, message, rating) =
            content(&form.patient_name, form.message, &form.rating)?;

        Ok(Self {
            patient_name,
            message,
            rating,
            status,
        })
    }
}

impl EditableEntity for Testimonial {
    type Id = TestimonialId;
    type Form = TestimonialForm;
    type Payload = TestimonialDetails;

    const LABEL: &'static str = "Testimonial";

    fn id(&self) -> &TestimonialId {
        &self.id
    }
}

/// Public submission; always lands in moderation as pending.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
pub struct ShareStoryForm {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub patient_name: String,
    #[validate(length(
        min = 10,
        max = 1000,
        message = "Message must be between 10 and 1000 characters"
    ))]
    pub message: String,
    pub rating: String,
}

impl TryFrom<ShareStoryForm> for TestimonialDetails {
    type Error = FormError;

    fn try_from(form: ShareStoryForm) -> Result<Self, Self::Error> {
        let (patient_name, message, rating) =
            content(&form.patient_name, form.message, &form.rating)?;

        Ok(Self {
            patient_name,
            message,
            rating,
            status: TestimonialStatus::Pending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(message: &str, rating: &str, status: &str) -> TestimonialForm {
        TestimonialForm {
            patient_name: "Anna Berg".to_string(),
            message: message.to_string(),
            rating: rating.to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn approved_five_star_form_is_accepted() {
        let form = form("Back on the slopes after six weeks.", "5", "approved");
        assert!(form.validate().is_ok());

        let details = TestimonialDetails::try_from(form).unwrap();
        assert_eq!(details.rating.get(), 5);
        assert_eq!(details.status, TestimonialStatus::Approved);
    }

    #[test]
    fn rating_outside_scale_is_rejected() {
        for rating in ["0", "6", "300", "x", ""] {
            let err = TestimonialDetails::try_from(form("Back on the slopes.", rating, "pending"))
                .unwrap_err();
            assert_eq!(err.field(), Some("rating"), "rating {rating:?}");
        }
    }

    #[test]
    fn short_message_is_rejected() {
        let errors = form("Great!", "4", "pending").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("message"));
    }

    #[test]
    fn shared_story_is_always_pending() {
        let story = ShareStoryForm {
            patient_name: "Leo".to_string(),
            message: "The team fixed my shoulder in no time.".to_string(),
            rating: "5".to_string(),
        };

        let details = TestimonialDetails::try_from(story).unwrap();
        assert_eq!(details.status, TestimonialStatus::Pending);
    }
}
