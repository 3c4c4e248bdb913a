//! Mock clinic content standing in for a backend database.
//!
//! Dates are expressed relative to the day the store is built so the booking
//! calendar and dashboard always have upcoming entries.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::domain::appointment::{Appointment, AppointmentStatus};
use crate::domain::catalog::{ClinicService, Doctor};
use crate::domain::patient::{Patient, PatientStatus};
use crate::domain::testimonial::{Testimonial, TestimonialStatus};
use crate::domain::types::{
    AppointmentId, DoctorId, PatientId, Rating, ServiceId, TestimonialId, TypeConstraintError,
};
use crate::repository::memory::ClinicData;

fn service(
    id: &'static str,
    name: &str,
    summary: &str,
    description: &str,
    duration_minutes: u32,
    price: u32,
) -> ClinicService {
    ClinicService {
        id: ServiceId::from_static(id),
        name: name.to_string(),
        summary: summary.to_string(),
        description: description.to_string(),
        duration_minutes,
        price,
    }
}

pub fn services() -> Vec<ClinicService> {
    vec![
        service(
            "sports-rehabilitation",
            "Sports Rehabilitation",
            "Return to play after strains, sprains and overuse injuries.",
            "Assessment of the injured structure followed by a graded loading programme, \
             sport-specific drills and return-to-play testing.",
            45,
            70,
        ),
        service(
            "manual-therapy",
            "Manual Therapy",
            "Hands-on mobilisation for stiff joints and muscle tension.",
            "Joint mobilisation, soft tissue techniques and manipulation combined with \
             a home exercise plan to keep the gains between sessions.",
            30,
            55,
        ),
        service(
            "post-surgical-rehab",
            "Post-Surgical Rehabilitation",
            "Structured recovery after joint replacement or ligament reconstruction.",
            "Protocol-driven rehabilitation coordinated with your surgeon, from early \
             range of motion work to strength and functional goals.",
            60,
            80,
        ),
        service(
            "orthopedic-assessment",
            "Orthopedic Assessment",
            "A thorough examination to find the source of your pain.",
            "Movement screening, neurological and orthopedic tests and a written \
             treatment plan with clear milestones.",
            60,
            90,
        ),
        service(
            "dry-needling",
            "Dry Needling",
            "Targeted release of trigger points and muscle knots.",
            "Fine filament needles applied to myofascial trigger points to reduce pain \
             and restore normal muscle function.",
            30,
            50,
        ),
        service(
            "pediatric-physiotherapy",
            "Pediatric Physiotherapy",
            "Gentle care for growing bodies and developmental milestones.",
            "Play-based treatment for children and adolescents covering posture, \
             coordination and sports injuries.",
            45,
            60,
        ),
    ]
}

pub fn doctors() -> Vec<Doctor> {
    vec![
        Doctor {
            id: DoctorId::from_static("dr-elena-marsh"),
            name: "Dr. Elena Marsh".to_string(),
            specialty: "Sports & Orthopedic Physiotherapy".to_string(),
            bio: "Fifteen years treating athletes from weekend runners to national teams."
                .to_string(),
        },
        Doctor {
            id: DoctorId::from_static("dr-samuel-okafor"),
            name: "Dr. Samuel Okafor".to_string(),
            specialty: "Post-Surgical Rehabilitation".to_string(),
            bio: "Works closely with orthopedic surgeons on joint replacement recovery."
                .to_string(),
        },
        Doctor {
            id: DoctorId::from_static("dr-hana-ito"),
            name: "Dr. Hana Ito".to_string(),
            specialty: "Manual Therapy & Dry Needling".to_string(),
            bio: "Certified manual therapist with a focus on chronic neck and back pain."
                .to_string(),
        },
    ]
}

struct PatientSeed {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    phone: Option<&'static str>,
    age_years: i64,
    condition: &'static str,
    status: PatientStatus,
}

const PATIENTS: [PatientSeed; 8] = [
    PatientSeed {
        id: "pat-0001",
        name: "Maria Lopez",
        email: "maria.lopez@example.com",
        phone: Some("+12025550143"),
        age_years: 34,
        condition: "ACL reconstruction",
        status: PatientStatus::Active,
    },
    PatientSeed {
        id: "pat-0002",
        name: "James Carter",
        email: "james.carter@example.com",
        phone: Some("+12025550178"),
        age_years: 52,
        condition: "Lower back pain",
        status: PatientStatus::Active,
    },
    PatientSeed {
        id: "pat-0003",
        name: "Aiko Tanaka",
        email: "aiko.tanaka@example.com",
        phone: None,
        age_years: 27,
        condition: "Rotator cuff tendinopathy",
        status: PatientStatus::Active,
    },
    PatientSeed {
        id: "pat-0004",
        name: "Peter Novak",
        email: "peter.novak@example.com",
        phone: Some("+442079460958"),
        age_years: 68,
        condition: "Total knee replacement",
        status: PatientStatus::Discharged,
    },
    PatientSeed {
        id: "pat-0005",
        name: "Sofia Rossi",
        email: "sofia.rossi@example.com",
        phone: None,
        age_years: 15,
        condition: "Ankle sprain",
        status: PatientStatus::Active,
    },
    PatientSeed {
        id: "pat-0006",
        name: "David Kim",
        email: "david.kim@example.com",
        phone: Some("+12025550112"),
        age_years: 41,
        condition: "Tennis elbow",
        status: PatientStatus::Discharged,
    },
    PatientSeed {
        id: "pat-0007",
        name: "Amara Okoye",
        email: "amara.okoye@example.com",
        phone: None,
        age_years: 30,
        condition: "Plantar fasciitis",
        status: PatientStatus::Active,
    },
    PatientSeed {
        id: "pat-0008",
        name: "Lukas Becker",
        email: "lukas.becker@example.com",
        phone: Some("+4930901820"),
        age_years: 45,
        condition: "Neck pain",
        status: PatientStatus::Active,
    },
];

fn patients(today: NaiveDate, now: NaiveDateTime) -> Vec<Patient> {
    PATIENTS
        .iter()
        .enumerate()
        .map(|(index, seed)| {
            let created_at = now - TimeDelta::days(90 - 10 * index as i64);
            Patient {
                id: PatientId::from_static(seed.id),
                name: seed.name.to_string(),
                email: seed.email.to_string(),
                phone: seed.phone.map(str::to_string),
                date_of_birth: today - TimeDelta::days(seed.age_years * 365),
                condition: seed.condition.to_string(),
                notes: None,
                status: seed.status,
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}

const TESTIMONIALS: [(&str, &str, &str, u8, TestimonialStatus); 7] = [
    (
        "tst-0001",
        "Maria L.",
        "After my ACL surgery I was back on the pitch in seven months. The team kept me motivated every week.",
        5,
        TestimonialStatus::Approved,
    ),
    (
        "tst-0002",
        "James C.",
        "Years of back pain finally under control. Clear explanations and exercises that actually fit my day.",
        5,
        TestimonialStatus::Approved,
    ),
    (
        "tst-0003",
        "Peter N.",
        "Walking without a cane six weeks after my knee replacement. Patient and professional staff.",
        4,
        TestimonialStatus::Approved,
    ),
    (
        "tst-0004",
        "Aiko T.",
        "Shoulder feels strong again and I can swim without pain.",
        5,
        TestimonialStatus::Pending,
    ),
    (
        "tst-0005",
        "Anonymous",
        "Waiting room was crowded on a Saturday morning.",
        2,
        TestimonialStatus::Rejected,
    ),
    (
        "tst-0006",
        "Sofia R.",
        "My daughter loved the sessions and her ankle healed quickly.",
        4,
        TestimonialStatus::Pending,
    ),
    (
        "tst-0007",
        "David K.",
        "Dry needling sorted out my tennis elbow in three sessions.",
        5,
        TestimonialStatus::Approved,
    ),
];

fn testimonials(now: NaiveDateTime) -> Result<Vec<Testimonial>, TypeConstraintError> {
    TESTIMONIALS
        .iter()
        .enumerate()
        .map(|(index, (id, author, message, rating, status))| {
            let created_at = now - TimeDelta::days(60 - 7 * index as i64);
            Ok(Testimonial {
                id: TestimonialId::from_static(*id),
                patient_name: author.to_string(),
                message: message.to_string(),
                rating: Rating::new(*rating)?,
                status: *status,
                created_at,
                updated_at: created_at,
            })
        })
        .collect()
}

fn appointments(
    today: NaiveDate,
    now: NaiveDateTime,
    services: &[ClinicService],
    doctors: &[Doctor],
) -> Vec<Appointment> {
    // (id, patient, service index, doctor index, day offset, slot, status)
    let plan: [(&'static str, &str, usize, usize, i64, &str, AppointmentStatus); 7] = [
        ("apt-0001", "Maria Lopez", 2, 1, -14, "10:00", AppointmentStatus::Completed),
        ("apt-0002", "James Carter", 1, 2, -3, "15:00", AppointmentStatus::Completed),
        ("apt-0003", "Lukas Becker", 4, 2, -1, "09:00", AppointmentStatus::Cancelled),
        ("apt-0004", "Aiko Tanaka", 0, 0, 1, "10:00", AppointmentStatus::Scheduled),
        ("apt-0005", "Amara Okoye", 3, 0, 1, "14:00", AppointmentStatus::Scheduled),
        ("apt-0006", "Maria Lopez", 2, 1, 2, "11:00", AppointmentStatus::Scheduled),
        ("apt-0007", "Sofia Rossi", 5, 0, 6, "16:00", AppointmentStatus::Scheduled),
    ];

    plan.iter()
        .filter_map(|(id, patient, service, doctor, offset, slot, status)| {
            let service = services.get(*service)?;
            let doctor = doctors.get(*doctor)?;
            Some(Appointment {
                id: AppointmentId::from_static(*id),
                patient_name: Some(patient.to_string()),
                service_id: service.id.clone(),
                service_name: service.name.clone(),
                doctor_id: doctor.id.clone(),
                doctor_name: doctor.name.clone(),
                date: today + TimeDelta::days(*offset),
                time_slot: slot.to_string(),
                status: *status,
                created_at: now - TimeDelta::days(20),
            })
        })
        .collect()
}

/// Builds the full mock dataset relative to `today`.
pub fn clinic_data(today: NaiveDate, now: NaiveDateTime) -> Result<ClinicData, TypeConstraintError> {
    let services = services();
    let doctors = doctors();
    let appointments = appointments(today, now, &services, &doctors);

    Ok(ClinicData {
        patients: patients(today, now),
        testimonials: testimonials(now)?,
        appointments,
        services,
        doctors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_consistent() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let data = clinic_data(today, today.and_hms_opt(9, 0, 0).unwrap()).unwrap();

        assert_eq!(data.services.len(), 6);
        assert_eq!(data.doctors.len(), 3);
        assert_eq!(data.patients.len(), 8);
        assert_eq!(data.appointments.len(), 7);
        assert!(
            data.testimonials
                .iter()
                .any(|t| t.status == TestimonialStatus::Pending)
        );
        assert!(data.appointments.iter().any(|a| a.date > today));
    }
}
