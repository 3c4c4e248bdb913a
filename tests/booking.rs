use chrono::TimeDelta;

use physio_clinic::booking::{BookingError, BookingFlow, BookingStep};
use physio_clinic::repository::{AppointmentListQuery, AppointmentReader, seed};

mod common;

async fn flow_for(backend: &physio_clinic::ClinicBackend) -> BookingFlow {
    let service = seed::services().remove(0);
    let doctor = seed::doctors().remove(0);
    BookingFlow::start(backend, service, doctor, common::today()).await
}

#[actix_web::test]
async fn confirmed_booking_is_stored_and_takes_the_slot() {
    let backend = common::backend();
    let tomorrow = common::today() + TimeDelta::days(1);
    let mut flow = flow_for(&backend).await;
    flow.select_date(backend.as_ref(), tomorrow, common::today())
        .await
        .unwrap();
    let slot = flow
        .slots
        .iter()
        .find(|slot| slot.available)
        .map(|slot| slot.id.clone())
        .unwrap();
    assert!(flow.select_time_slot(&slot));
    flow.next(common::today()).unwrap();

    let appointment = flow
        .confirm(backend.as_ref(), Some("Nina Park".to_string()))
        .await
        .unwrap()
        .clone();

    assert_eq!(flow.step, BookingStep::Success);
    let (_, stored) = backend
        .repository()
        .list_appointments(AppointmentListQuery::new().search("Nina Park"))
        .unwrap();
    assert!(stored.iter().any(|a| a.id == appointment.id));

    let mut second = flow_for(&backend).await;
    second
        .select_date(backend.as_ref(), tomorrow, common::today())
        .await
        .unwrap();
    assert!(!second.select_time_slot(&slot));
}

#[actix_web::test]
async fn slot_taken_meanwhile_is_a_conflict() {
    let backend = common::backend();
    let tomorrow = common::today() + TimeDelta::days(1);
    let mut first = flow_for(&backend).await;
    let mut second = flow_for(&backend).await;
    for flow in [&mut first, &mut second] {
        flow.select_date(backend.as_ref(), tomorrow, common::today())
            .await
            .unwrap();
        assert!(flow.select_time_slot("17:00"));
        flow.next(common::today()).unwrap();
    }

    first.confirm(backend.as_ref(), None).await.unwrap();
    let result = second.confirm(backend.as_ref(), None).await;

    assert_eq!(
        result.unwrap_err(),
        BookingError::Conflict("This time slot is no longer available".to_string())
    );
    assert_eq!(second.step, BookingStep::Confirm);
}

#[actix_web::test]
async fn unreachable_backend_is_reported_as_unavailable() {
    let backend = common::backend();
    let mut flow = flow_for(&backend).await;
    assert!(flow.select_time_slot("12:00"));
    backend.set_failing(true);

    let result = flow
        .select_date(
            backend.as_ref(),
            common::today() + TimeDelta::days(2),
            common::today(),
        )
        .await;

    assert_eq!(result, Err(BookingError::Unavailable));
    assert!(flow.slots.is_empty());
    assert!(flow.selected_time_slot.is_none());
}
