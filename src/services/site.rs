//! Public site pages: catalog, about, testimonials and the contact form.

use validator::Validate;

use crate::domain::catalog::{ClinicService, Doctor};
use crate::domain::testimonial::{Testimonial, TestimonialDetails, TestimonialStatus};
use crate::domain::types::{DoctorId, ServiceId};
use crate::dto::site::{
    AboutPageData, BookingCatalog, HomePageData, ServiceDetailData, TestimonialsPageData,
};
use crate::forms::contact::ContactForm;
use crate::forms::testimonials::ShareStoryForm;
use crate::pagination::Paginated;
use crate::repository::{
    CatalogReader, PatientListQuery, PatientReader, TestimonialListQuery, TestimonialReader,
    TestimonialWriter,
};
use crate::services::{ServiceError, ServiceResult};

const FEATURED_SERVICES: usize = 3;
const HOME_TESTIMONIALS: usize = 3;
pub const TESTIMONIALS_PER_PAGE: usize = 6;

fn approved(page: usize, per_page: usize) -> TestimonialListQuery {
    TestimonialListQuery::new()
        .status(TestimonialStatus::Approved)
        .paginate(page, per_page)
}

pub fn load_home<R>(repo: &R) -> ServiceResult<HomePageData>
where
    R: CatalogReader + TestimonialReader + ?Sized,
{
    let mut featured_services = repo.list_services()?;
    featured_services.truncate(FEATURED_SERVICES);
    let (_, testimonials) = repo.list_testimonials(approved(1, HOME_TESTIMONIALS))?;

    Ok(HomePageData {
        featured_services,
        testimonials,
        doctors: repo.list_doctors()?,
    })
}

pub fn load_services<R>(repo: &R) -> ServiceResult<Vec<ClinicService>>
where
    R: CatalogReader + ?Sized,
{
    Ok(repo.list_services()?)
}

/// Loads a treatment by its slug. Unknown slugs are `NotFound`.
pub fn load_service<R>(repo: &R, service_id: &str) -> ServiceResult<ServiceDetailData>
where
    R: CatalogReader + ?Sized,
{
    let id = ServiceId::new(service_id).map_err(|_| ServiceError::NotFound)?;
    let service = repo.get_service_by_id(&id)?.ok_or(ServiceError::NotFound)?;
    let related = repo
        .list_services()?
        .into_iter()
        .filter(|other| other.id != service.id)
        .take(FEATURED_SERVICES)
        .collect();

    Ok(ServiceDetailData {
        service,
        doctors: repo.list_doctors()?,
        related,
    })
}

fn average_rating(testimonials: &[Testimonial]) -> Option<f32> {
    if testimonials.is_empty() {
        return None;
    }
    let sum: u32 = testimonials.iter().map(|t| u32::from(t.rating.get())).sum();
    Some(sum as f32 / testimonials.len() as f32)
}

/// Mean rating of approved testimonials, `None` when there are none.
pub fn approved_average_rating<R>(repo: &R) -> ServiceResult<Option<f32>>
where
    R: TestimonialReader + ?Sized,
{
    let (_, testimonials) = repo.list_testimonials(
        TestimonialListQuery::new().status(TestimonialStatus::Approved),
    )?;
    Ok(average_rating(&testimonials))
}

pub fn load_about<R>(repo: &R) -> ServiceResult<AboutPageData>
where
    R: CatalogReader + PatientReader + TestimonialReader + ?Sized,
{
    let (patients_treated, _) = repo.list_patients(PatientListQuery::new().paginate(1, 1))?;

    Ok(AboutPageData {
        doctors: repo.list_doctors()?,
        service_count: repo.list_services()?.len(),
        patients_treated,
        average_rating: approved_average_rating(repo)?,
    })
}

pub fn load_testimonials<R>(repo: &R, page: usize) -> ServiceResult<TestimonialsPageData>
where
    R: TestimonialReader + ?Sized,
{
    let page = page.max(1);
    let (total, testimonials) = repo.list_testimonials(approved(page, TESTIMONIALS_PER_PAGE))?;

    Ok(TestimonialsPageData {
        testimonials: Paginated::new(
            testimonials,
            page,
            total.div_ceil(TESTIMONIALS_PER_PAGE),
        ),
        total,
    })
}

/// Stores a visitor's story for moderation.
pub fn share_story<R>(repo: &R, form: ShareStoryForm) -> ServiceResult<Testimonial>
where
    R: TestimonialWriter + ?Sized,
{
    if let Err(errors) = form.validate() {
        log::debug!("Rejected shared story: {errors}");
        return Err(ServiceError::Form(
            crate::forms::field_errors(&errors)
                .into_values()
                .next()
                .unwrap_or_else(|| "Please check the form".to_string()),
        ));
    }
    let details = TestimonialDetails::try_from(form)?;
    let testimonial = repo.create_testimonial(&details).map_err(|err| {
        log::error!("Failed to store shared story: {err}");
        err
    })?;
    log::info!("New testimonial {} awaits moderation", testimonial.id);
    Ok(testimonial)
}

/// Validates a contact message. Valid messages are only logged.
pub fn submit_contact(form: &ContactForm) -> ServiceResult<()> {
    let report = form.validate();
    if !report.is_valid {
        return Err(ServiceError::Validation(report));
    }
    log::info!(
        "Contact request from {} <{}>: {} characters",
        form.name.trim(),
        form.email.trim(),
        form.message.trim().chars().count()
    );
    Ok(())
}

/// Resolves the service and doctor a new booking starts with: the requested
/// service or the first one, and the first doctor.
pub fn load_booking_catalog<R>(repo: &R, service_id: Option<&str>) -> ServiceResult<BookingCatalog>
where
    R: CatalogReader + ?Sized,
{
    let services = repo.list_services()?;
    let doctors = repo.list_doctors()?;

    let service = match service_id {
        Some(id) => services
            .iter()
            .find(|service| service.id.as_str() == id)
            .ok_or(ServiceError::NotFound)?,
        None => services.first().ok_or(ServiceError::NotFound)?,
    }
    .clone();
    let doctor = doctors.first().cloned().ok_or(ServiceError::NotFound)?;

    Ok(BookingCatalog {
        service,
        doctor,
        services,
        doctors,
    })
}

pub fn load_doctors<R>(repo: &R) -> ServiceResult<Vec<Doctor>>
where
    R: CatalogReader + ?Sized,
{
    Ok(repo.list_doctors()?)
}

pub fn find_doctor<R>(repo: &R, doctor_id: &str) -> ServiceResult<Doctor>
where
    R: CatalogReader + ?Sized,
{
    let id = DoctorId::new(doctor_id).map_err(|_| ServiceError::NotFound)?;
    repo.get_doctor_by_id(&id)?.ok_or(ServiceError::NotFound)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::repository::InMemoryRepository;

    fn repo() -> InMemoryRepository {
        InMemoryRepository::seeded(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()).unwrap()
    }

    #[test]
    fn home_features_first_services_and_approved_stories() {
        let data = load_home(&repo()).unwrap();

        assert_eq!(data.featured_services.len(), 3);
        assert!(data.testimonials.len() <= 3);
        assert!(
            data.testimonials
                .iter()
                .all(|t| t.status == TestimonialStatus::Approved)
        );
    }

    #[test]
    fn unknown_service_is_not_found() {
        assert!(matches!(
            load_service(&repo(), "acupuncture"),
            Err(ServiceError::NotFound)
        ));
        let detail = load_service(&repo(), "manual-therapy").unwrap();
        assert_eq!(detail.service.name, "Manual Therapy");
        assert!(detail.related.iter().all(|s| s.id != detail.service.id));
    }

    #[test]
    fn shared_story_is_pending() {
        let repo = repo();
        let form = ShareStoryForm {
            patient_name: "Olga".to_string(),
            message: "Walking without pain for the first time in years.".to_string(),
            rating: "5".to_string(),
        };

        let testimonial = share_story(&repo, form).unwrap();

        assert_eq!(testimonial.status, TestimonialStatus::Pending);
        let public = load_testimonials(&repo, 1).unwrap();
        assert!(public.testimonials.items.iter().all(|t| t.id != testimonial.id));
    }

    #[test]
    fn contact_form_reports_field_errors() {
        let form = ContactForm {
            name: "Jo".to_string(),
            email: "not-an-email".to_string(),
            phone: String::new(),
            message: "short".to_string(),
        };

        match submit_contact(&form) {
            Err(ServiceError::Validation(report)) => {
                assert_eq!(report.error("email"), Some("Please enter a valid email address"));
                assert!(report.error("message").is_some());
                assert!(report.error("name").is_none());
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn booking_defaults_to_first_service_and_doctor() {
        let catalog = load_booking_catalog(&repo(), None).unwrap();
        assert_eq!(catalog.service.id.as_str(), "sports-rehabilitation");
        assert_eq!(catalog.doctor.id.as_str(), "dr-elena-marsh");

        let catalog = load_booking_catalog(&repo(), Some("dry-needling")).unwrap();
        assert_eq!(catalog.service.id.as_str(), "dry-needling");
    }
}
