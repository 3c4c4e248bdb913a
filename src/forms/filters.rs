//! Filter forms of the admin lists, converted into filter patches.
//!
//! Values are not validated beyond their shape: an unknown status or an
//! unparsable date simply clears that criterion.

use std::str::FromStr;

use serde::Deserialize;

use crate::domain::types::{DoctorId, Rating, parse_picker_date};
use crate::store::filters::{
    AppointmentFilterPatch, DateRange, PatientFilterPatch, TestimonialFilterPatch,
};

/// `?page=` and `?page_size=` on list pages.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// Select value meaning "no restriction".
const ALL: &str = "all";

fn choice<T: FromStr>(value: Option<&str>) -> Option<Option<T>> {
    let value = value?.trim();
    if value.is_empty() || value == ALL {
        return Some(None);
    }
    Some(value.parse().ok())
}

#[derive(Debug, Default, Deserialize)]
pub struct PatientFilterForm {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl From<PatientFilterForm> for PatientFilterPatch {
    fn from(form: PatientFilterForm) -> Self {
        Self {
            status: choice(form.status.as_deref()),
            search: form.search,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TestimonialFilterForm {
    pub search: Option<String>,
    pub status: Option<String>,
    pub min_rating: Option<String>,
}

impl From<TestimonialFilterForm> for TestimonialFilterPatch {
    fn from(form: TestimonialFilterForm) -> Self {
        let min_rating = choice::<u8>(form.min_rating.as_deref())
            .map(|rating| rating.and_then(|value| Rating::new(value).ok()));
        Self {
            status: choice(form.status.as_deref()),
            min_rating,
            search: form.search,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentFilterForm {
    pub search: Option<String>,
    pub doctor_id: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl From<AppointmentFilterForm> for AppointmentFilterPatch {
    fn from(form: AppointmentFilterForm) -> Self {
        let date_range = (form.date_from.is_some() || form.date_to.is_some()).then(|| {
            let parse = |value: Option<&str>| value.and_then(|v| parse_picker_date(v).ok());
            DateRange::new(
                parse(form.date_from.as_deref()),
                parse(form.date_to.as_deref()),
            )
        });
        Self {
            doctor_id: choice::<DoctorId>(form.doctor_id.as_deref()),
            status: choice(form.status.as_deref()),
            date_range,
            search: form.search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::appointment::AppointmentStatus;
    use crate::domain::patient::PatientStatus;

    #[test]
    fn all_and_blank_reset_a_criterion() {
        let patch = PatientFilterPatch::from(PatientFilterForm {
            search: Some("maria".to_string()),
            status: Some("all".to_string()),
        });
        assert_eq!(patch.status, Some(None));

        let patch = PatientFilterPatch::from(PatientFilterForm {
            search: None,
            status: Some("discharged".to_string()),
        });
        assert_eq!(patch.status, Some(Some(PatientStatus::Discharged)));
        assert!(patch.search.is_none());
    }

    #[test]
    fn appointment_form_builds_full_patch() {
        let patch = AppointmentFilterPatch::from(AppointmentFilterForm {
            search: Some(String::new()),
            doctor_id: Some("dr-hana-ito".to_string()),
            status: Some("cancelled".to_string()),
            date_from: Some("2026-10-01".to_string()),
            date_to: Some("garbage".to_string()),
        });

        assert_eq!(
            patch.doctor_id.unwrap().unwrap().as_str(),
            "dr-hana-ito"
        );
        assert_eq!(patch.status, Some(Some(AppointmentStatus::Cancelled)));
        let range = patch.date_range.unwrap();
        assert!(range.from.is_some());
        assert!(range.to.is_none());
    }

    #[test]
    fn out_of_scale_min_rating_clears_filter() {
        let patch = TestimonialFilterPatch::from(TestimonialFilterForm {
            min_rating: Some("9".to_string()),
            ..TestimonialFilterForm::default()
        });
        assert_eq!(patch.min_rating, Some(None));
    }
}
