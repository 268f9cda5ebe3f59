// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;

/// A single cell value as it arrives from the feed. Anything that is not a
/// string, number or boolean is treated as missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(text) => Some(Self::Text(text)),
            serde_json::Value::Number(number) => number.as_f64().map(Self::Number),
            serde_json::Value::Bool(flag) => Some(Self::Text(flag.to_string())),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }

    /// Numbers order before text; within a kind the natural order applies.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) => left.total_cmp(right),
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

fn lenient_field<'de, D>(deserializer: D) -> Result<Option<FieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(FieldValue::from_json(value))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(
        rename = "applicationNO",
        default,
        deserialize_with = "lenient_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub application_no: Option<FieldValue>,
    #[serde(
        rename = "applicantName",
        default,
        deserialize_with = "lenient_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub applicant_name: Option<FieldValue>,
    #[serde(
        rename = "applicationDate",
        default,
        deserialize_with = "lenient_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub application_date: Option<FieldValue>,
    #[serde(
        rename = "studentID",
        default,
        deserialize_with = "lenient_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub student_id: Option<FieldValue>,
    #[serde(
        rename = "paidAmount",
        default,
        deserialize_with = "lenient_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub paid_amount: Option<FieldValue>,
    #[serde(
        rename = "status_En",
        default,
        deserialize_with = "lenient_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_en: Option<FieldValue>,
    #[serde(
        rename = "status_Ar",
        default,
        deserialize_with = "lenient_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_ar: Option<FieldValue>,
    #[serde(
        rename = "lastDate",
        default,
        deserialize_with = "lenient_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_date: Option<FieldValue>,
}

impl ApplicationRecord {
    pub fn field(&self, column: Column) -> Option<&FieldValue> {
        match column {
            Column::ApplicationNo => self.application_no.as_ref(),
            Column::ApplicantName => self.applicant_name.as_ref(),
            Column::ApplicationDate => self.application_date.as_ref(),
            Column::StudentId => self.student_id.as_ref(),
            Column::PaidAmount => self.paid_amount.as_ref(),
            Column::StatusEn => self.status_en.as_ref(),
            Column::StatusAr => self.status_ar.as_ref(),
            Column::LastDate => self.last_date.as_ref(),
        }
    }

    /// Blank when the field is missing.
    pub fn cell_text(&self, column: Column) -> String {
        self.field(column)
            .map(FieldValue::display)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    ApplicationNo,
    ApplicantName,
    ApplicationDate,
    StudentId,
    PaidAmount,
    StatusEn,
    StatusAr,
    LastDate,
}

impl Column {
    pub const ALL: [Self; 8] = [
        Self::ApplicationNo,
        Self::ApplicantName,
        Self::ApplicationDate,
        Self::StudentId,
        Self::PaidAmount,
        Self::StatusEn,
        Self::StatusAr,
        Self::LastDate,
    ];

    /// Fields consulted by the search box.
    pub const SEARCHABLE: [Self; 4] = [
        Self::ApplicantName,
        Self::StatusEn,
        Self::StatusAr,
        Self::StudentId,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::ApplicationNo => "Application No",
            Self::ApplicantName => "Applicant Name",
            Self::ApplicationDate => "Application Date",
            Self::StudentId => "Student ID",
            Self::PaidAmount => "Paid Amount",
            Self::StatusEn => "Status (English)",
            Self::StatusAr => "Status (Arabic)",
            Self::LastDate => "Last Updated",
        }
    }

    pub const fn field_name(self) -> &'static str {
        match self {
            Self::ApplicationNo => "applicationNO",
            Self::ApplicantName => "applicantName",
            Self::ApplicationDate => "applicationDate",
            Self::StudentId => "studentID",
            Self::PaidAmount => "paidAmount",
            Self::StatusEn => "status_En",
            Self::StatusAr => "status_Ar",
            Self::LastDate => "lastDate",
        }
    }

    pub const fn sort_key(self) -> Option<SortKey> {
        match self {
            Self::ApplicationNo => Some(SortKey::ApplicationNo),
            Self::ApplicantName => Some(SortKey::ApplicantName),
            Self::ApplicationDate => Some(SortKey::ApplicationDate),
            Self::StudentId | Self::PaidAmount | Self::StatusEn | Self::StatusAr | Self::LastDate => {
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    ApplicationNo,
    ApplicantName,
    ApplicationDate,
}

impl SortKey {
    pub const ALL: [Self; 3] = [
        Self::ApplicationNo,
        Self::ApplicantName,
        Self::ApplicationDate,
    ];

    pub const fn column(self) -> Column {
        match self {
            Self::ApplicationNo => Column::ApplicationNo,
            Self::ApplicantName => Column::ApplicantName,
            Self::ApplicationDate => Column::ApplicationDate,
        }
    }

    pub const fn as_str(self) -> &'static str {
        self.column().field_name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Missing values sort after present ones regardless of direction.
    pub fn compare(self, left: &ApplicationRecord, right: &ApplicationRecord) -> Ordering {
        let column = self.key.column();
        match (left.field(column), right.field(column)) {
            (Some(left), Some(right)) => {
                let ordering = left.compare(right);
                match self.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplicationRecord, Column, FieldValue, SortDirection, SortKey, SortSpec};
    use std::cmp::Ordering;

    #[test]
    fn deserializes_feed_field_names() -> serde_json::Result<()> {
        let record: ApplicationRecord = serde_json::from_str(
            r#"{
                "applicationNO": "APP-1",
                "applicantName": "Ali Hassan",
                "applicationDate": "2024-01-05",
                "studentID": "S100",
                "paidAmount": 1500,
                "status_En": "Approved",
                "status_Ar": "مقبول",
                "lastDate": "2024-02-01",
                "extra": {"ignored": true}
            }"#,
        )?;
        assert_eq!(record.application_no, Some(FieldValue::text("APP-1")));
        assert_eq!(record.paid_amount, Some(FieldValue::Number(1500.0)));
        assert_eq!(record.cell_text(Column::StatusAr), "مقبول");
        assert_eq!(record.cell_text(Column::PaidAmount), "1500");
        Ok(())
    }

    #[test]
    fn missing_and_structured_fields_degrade_to_blank() -> serde_json::Result<()> {
        let record: ApplicationRecord = serde_json::from_str(
            r#"{"applicantName": null, "studentID": {"nested": 1}, "status_En": true}"#,
        )?;
        assert_eq!(record.applicant_name, None);
        assert_eq!(record.student_id, None);
        assert_eq!(record.cell_text(Column::ApplicationNo), "");
        assert_eq!(record.cell_text(Column::StatusEn), "true");
        Ok(())
    }

    #[test]
    fn only_first_three_columns_sort() {
        let sortable: Vec<Column> = Column::ALL
            .into_iter()
            .filter(|column| column.sort_key().is_some())
            .collect();
        assert_eq!(
            sortable,
            vec![
                Column::ApplicationNo,
                Column::ApplicantName,
                Column::ApplicationDate,
            ]
        );
        for key in SortKey::ALL {
            assert_eq!(key.column().sort_key(), Some(key));
        }
    }

    #[test]
    fn numbers_compare_numerically_and_before_text() {
        assert_eq!(
            FieldValue::Number(9.0).compare(&FieldValue::Number(10.0)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::text("10").compare(&FieldValue::text("9")),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Number(100.0).compare(&FieldValue::text("1")),
            Ordering::Less
        );
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let present = ApplicationRecord {
            applicant_name: Some(FieldValue::text("Omar")),
            ..ApplicationRecord::default()
        };
        let missing = ApplicationRecord::default();

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let spec = SortSpec {
                key: SortKey::ApplicantName,
                direction,
            };
            assert_eq!(spec.compare(&present, &missing), Ordering::Less);
            assert_eq!(spec.compare(&missing, &present), Ordering::Greater);
        }
    }
}
