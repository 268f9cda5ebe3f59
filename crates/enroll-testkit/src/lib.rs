// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use enroll_app::{ApplicationRecord, FieldValue};

const FIRST_NAMES: [&str; 16] = [
    "Ali", "Omar", "Fatima", "Layla", "Yousef", "Mariam", "Khalid", "Noor", "Hassan", "Sara",
    "Ahmed", "Huda", "Zaid", "Reem", "Tariq", "Aisha",
];
const LAST_NAMES: [&str; 14] = [
    "Hassan", "Haddad", "Khoury", "Nasser", "Saleh", "Mansour", "Farouk", "Qasim", "Aziz",
    "Rahman", "Hamdan", "Jaber", "Karim", "Sabbagh",
];

/// English and Arabic status labels, index-aligned.
const STATUSES: [(&str, &str); 4] = [
    ("Pending", "قيد الانتظار"),
    ("Approved", "مقبول"),
    ("Rejected", "مرفوض"),
    ("Under Review", "قيد المراجعة"),
];

const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of plausible application records. The same seed always
/// yields the same sequence.
#[derive(Debug, Clone)]
pub struct ApplicationFaker {
    rng: DeterministicRng,
    next_number: u32,
}

impl ApplicationFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_number: 1,
        }
    }

    pub fn record(&mut self) -> ApplicationRecord {
        let number = self.next_number;
        self.next_number += 1;

        let (status_en, status_ar) = STATUSES[self.rng.int_n(STATUSES.len())];
        let applied_month = 1 + self.rng.int_n(9) as u32;
        let applied_day = self.day_in(applied_month);
        let updated_month = applied_month + 1 + self.rng.int_n(3) as u32;
        let updated_day = self.day_in(updated_month);
        let paid = 250 * (1 + self.rng.int_n(12)) as u32;

        ApplicationRecord {
            application_no: Some(FieldValue::Text(format!("APP-{:05}", 10_000 + number))),
            applicant_name: Some(FieldValue::Text(self.full_name())),
            application_date: Some(FieldValue::Text(iso_date(applied_month, applied_day))),
            student_id: Some(FieldValue::Text(format!(
                "S{:06}",
                100_000 + self.rng.int_n(900_000)
            ))),
            paid_amount: Some(FieldValue::Number(f64::from(paid))),
            status_en: Some(FieldValue::text(status_en)),
            status_ar: Some(FieldValue::text(status_ar)),
            last_date: Some(FieldValue::Text(iso_date(updated_month, updated_day))),
        }
    }

    pub fn records(&mut self, count: usize) -> Vec<ApplicationRecord> {
        (0..count).map(|_| self.record()).collect()
    }

    fn full_name(&mut self) -> String {
        format!(
            "{} {}",
            FIRST_NAMES[self.rng.int_n(FIRST_NAMES.len())],
            LAST_NAMES[self.rng.int_n(LAST_NAMES.len())],
        )
    }

    fn day_in(&mut self, month: u32) -> u32 {
        let days = DAYS_IN_MONTH[(month as usize - 1) % DAYS_IN_MONTH.len()];
        1 + self.rng.int_n(days as usize) as u32
    }
}

fn iso_date(month: u32, day: u32) -> String {
    format!("2024-{month:02}-{day:02}")
}

/// A record with only the applicant name set.
pub fn named_record(name: &str) -> ApplicationRecord {
    ApplicationRecord {
        applicant_name: Some(FieldValue::text(name)),
        ..ApplicationRecord::default()
    }
}

/// Serializes records the way the feed publishes them.
pub fn records_json(records: &[ApplicationRecord]) -> Result<String> {
    serde_json::to_string(records).context("serialize application records")
}
