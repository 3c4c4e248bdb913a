//! Filter criteria for the admin lists and their partial updates.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::appointment::AppointmentStatus;
use crate::domain::patient::PatientStatus;
use crate::domain::testimonial::TestimonialStatus;
use crate::domain::types::{DoctorId, Rating};
use crate::repository::{AppointmentListQuery, PatientListQuery, TestimonialListQuery};

/// Criteria a list slice can be filtered by.
///
/// A patch only carries the fields that change; `None` leaves a field as is,
/// `Some(None)` resets an optional criterion to "all".
pub trait Filters: Clone + Default + PartialEq + Serialize {
    type Patch;

    fn merge(&mut self, patch: Self::Patch);

    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

fn trimmed(term: String) -> String {
    term.trim().to_string()
}

fn non_blank(term: &str) -> Option<&str> {
    Some(term).filter(|term| !term.is_empty())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PatientFilters {
    pub search: String,
    pub status: Option<PatientStatus>,
}

#[derive(Clone, Debug, Default)]
pub struct PatientFilterPatch {
    pub search: Option<String>,
    pub status: Option<Option<PatientStatus>>,
}

impl PatientFilterPatch {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn status(status: Option<PatientStatus>) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Filters for PatientFilters {
    type Patch = PatientFilterPatch;

    fn merge(&mut self, patch: PatientFilterPatch) {
        if let Some(search) = patch.search {
            self.search = trimmed(search);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

impl PatientFilters {
    pub fn to_query(&self, page: usize, page_size: usize) -> PatientListQuery {
        let mut query = PatientListQuery::new().paginate(page, page_size);
        if let Some(term) = non_blank(&self.search) {
            query = query.search(term);
        }
        if let Some(status) = self.status {
            query = query.status(status);
        }
        query
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TestimonialFilters {
    pub search: String,
    pub status: Option<TestimonialStatus>,
    pub min_rating: Option<Rating>,
}

#[derive(Clone, Debug, Default)]
pub struct TestimonialFilterPatch {
    pub search: Option<String>,
    pub status: Option<Option<TestimonialStatus>>,
    pub min_rating: Option<Option<Rating>>,
}

impl TestimonialFilterPatch {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn status(status: Option<TestimonialStatus>) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn min_rating(rating: Option<Rating>) -> Self {
        Self {
            min_rating: Some(rating),
            ..Self::default()
        }
    }
}

impl Filters for TestimonialFilters {
    type Patch = TestimonialFilterPatch;

    fn merge(&mut self, patch: TestimonialFilterPatch) {
        if let Some(search) = patch.search {
            self.search = trimmed(search);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(min_rating) = patch.min_rating {
            self.min_rating = min_rating;
        }
    }
}

impl TestimonialFilters {
    pub fn to_query(&self, page: usize, page_size: usize) -> TestimonialListQuery {
        let mut query = TestimonialListQuery::new().paginate(page, page_size);
        if let Some(term) = non_blank(&self.search) {
            query = query.search(term);
        }
        if let Some(status) = self.status {
            query = query.status(status);
        }
        if let Some(rating) = self.min_rating {
            query = query.min_rating(rating);
        }
        query
    }
}

/// Inclusive date window; either end may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AppointmentFilters {
    pub search: String,
    pub doctor_id: Option<DoctorId>,
    pub status: Option<AppointmentStatus>,
    pub date_range: DateRange,
}

#[derive(Clone, Debug, Default)]
pub struct AppointmentFilterPatch {
    pub search: Option<String>,
    pub doctor_id: Option<Option<DoctorId>>,
    pub status: Option<Option<AppointmentStatus>>,
    pub date_range: Option<DateRange>,
}

impl AppointmentFilterPatch {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn doctor(doctor_id: Option<DoctorId>) -> Self {
        Self {
            doctor_id: Some(doctor_id),
            ..Self::default()
        }
    }

    pub fn status(status: Option<AppointmentStatus>) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn date_range(range: DateRange) -> Self {
        Self {
            date_range: Some(range),
            ..Self::default()
        }
    }
}

impl Filters for AppointmentFilters {
    type Patch = AppointmentFilterPatch;

    fn merge(&mut self, patch: AppointmentFilterPatch) {
        if let Some(search) = patch.search {
            self.search = trimmed(search);
        }
        if let Some(doctor_id) = patch.doctor_id {
            self.doctor_id = doctor_id;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(range) = patch.date_range {
            self.date_range = range;
        }
    }
}

impl AppointmentFilters {
    pub fn to_query(&self, page: usize, page_size: usize) -> AppointmentListQuery {
        let mut query = AppointmentListQuery::new()
            .paginate(page, page_size)
            .between(self.date_range.from, self.date_range.to);
        if let Some(term) = non_blank(&self.search) {
            query = query.search(term);
        }
        if let Some(doctor_id) = &self.doctor_id {
            query = query.doctor(doctor_id.clone());
        }
        if let Some(status) = self.status {
            query = query.status(status);
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patches_only_touch_named_fields() {
        let mut filters = AppointmentFilters {
            search: "maria".to_string(),
            status: Some(AppointmentStatus::Scheduled),
            ..AppointmentFilters::default()
        };

        filters.merge(AppointmentFilterPatch::doctor(Some(
            DoctorId::new("dr-hana-ito").unwrap(),
        )));

        assert_eq!(filters.search, "maria");
        assert_eq!(filters.status, Some(AppointmentStatus::Scheduled));
        assert_eq!(filters.doctor_id.as_ref().unwrap().as_str(), "dr-hana-ito");

        filters.merge(AppointmentFilterPatch::status(None));
        assert_eq!(filters.status, None);
    }

    #[test]
    fn blank_search_is_not_sent() {
        let mut filters = PatientFilters::default();
        filters.merge(PatientFilterPatch::search("   "));

        assert!(filters.is_default());
        assert!(filters.to_query(1, 10).search.is_none());
    }
}
