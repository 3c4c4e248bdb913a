use chrono::NaiveDate;

use crate::domain::appointment::AppointmentStatus;
use crate::domain::patient::PatientStatus;
use crate::domain::testimonial::TestimonialStatus;
use crate::dto::dashboard::DashboardData;
use crate::repository::{
    AppointmentListQuery, AppointmentReader, PatientListQuery, PatientReader,
    TestimonialListQuery, TestimonialReader,
};
use crate::services::ServiceResult;
use crate::services::site::approved_average_rating;

const NEXT_APPOINTMENTS: usize = 5;
const LATEST_PENDING: usize = 3;

/// Collects the admin dashboard figures as of `today`.
pub fn load_dashboard<R>(repo: &R, today: NaiveDate) -> ServiceResult<DashboardData>
where
    R: PatientReader + TestimonialReader + AppointmentReader + ?Sized,
{
    let (total_patients, _) = repo.list_patients(PatientListQuery::new().paginate(1, 1))?;
    let (active_patients, _) = repo.list_patients(
        PatientListQuery::new()
            .status(PatientStatus::Active)
            .paginate(1, 1),
    )?;
    let (pending_testimonials, latest_pending) = repo.list_testimonials(
        TestimonialListQuery::new()
            .status(TestimonialStatus::Pending)
            .paginate(1, LATEST_PENDING),
    )?;
    let (upcoming_appointments, next_appointments) = repo.list_appointments(
        AppointmentListQuery::new()
            .status(AppointmentStatus::Scheduled)
            .between(Some(today), None)
            .paginate(1, NEXT_APPOINTMENTS),
    )?;

    Ok(DashboardData {
        total_patients,
        active_patients,
        pending_testimonials,
        average_rating: approved_average_rating(repo)?,
        upcoming_appointments,
        next_appointments,
        latest_pending,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    #[test]
    fn counts_reflect_seeded_clinic() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let repo = InMemoryRepository::seeded(today).unwrap();

        let data = load_dashboard(&repo, today).unwrap();

        assert_eq!(data.total_patients, 8);
        assert_eq!(data.active_patients, 6);
        assert_eq!(data.pending_testimonials, 2);
        assert_eq!(data.upcoming_appointments, 4);
        assert!(data.next_appointments.iter().all(|a| a.date >= today));
        let rating = data.average_rating.unwrap();
        assert!((1.0..=5.0).contains(&rating));
    }
}
