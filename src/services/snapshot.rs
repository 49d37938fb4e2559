//! Backup file format.
//!
//! Rows keep the PascalCase column names and `0`/`1` flags written by the
//! earlier deployment, so its backup files restore unchanged. Every
//! collection is optional on input.

use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use crate::db::repositories::settings::SettingsFields;
use crate::domain::lenient;
use crate::entities::{
    clinic_appointments, daily_visits, referrals, settings, special_follow_ups, students,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub settings: Vec<SettingsRecord>,
    pub students: Vec<StudentRecord>,
    pub visits: Vec<VisitRecord>,
    pub special_cases: Vec<SpecialCaseRecord>,
    pub referrals: Vec<ReferralRecord>,
    pub clinic_appointments: Vec<ClinicAppointmentRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SettingsRecord {
    #[serde(default = "singleton_id")]
    pub id: i32,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub school_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub supervisor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub logo_path: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub daily_closing_time: Option<String>,
}

const fn singleton_id() -> i32 {
    settings::SINGLETON_ID
}

impl From<settings::Model> for SettingsRecord {
    fn from(m: settings::Model) -> Self {
        Self {
            id: m.id,
            school_name: m.school_name,
            supervisor_name: m.supervisor_name,
            logo_path: m.logo_path,
            daily_closing_time: m.daily_closing_time,
        }
    }
}

impl From<SettingsRecord> for SettingsFields {
    fn from(r: SettingsRecord) -> Self {
        Self {
            school_name: r.school_name,
            supervisor_name: r.supervisor_name,
            logo_path: r.logo_path,
            daily_closing_time: r.daily_closing_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StudentRecord {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub phone: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::flag",
        serialize_with = "lenient::flag_as_int"
    )]
    pub is_special_case: bool,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub chronic_condition: Option<String>,
}

impl From<students::Model> for StudentRecord {
    fn from(m: students::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            grade: m.grade,
            phone: m.phone,
            is_special_case: m.is_special_case,
            chronic_condition: m.chronic_condition,
        }
    }
}

impl From<StudentRecord> for students::ActiveModel {
    fn from(r: StudentRecord) -> Self {
        Self {
            id: Set(r.id),
            name: Set(r.name),
            grade: Set(r.grade),
            phone: Set(r.phone),
            is_special_case: Set(r.is_special_case),
            chronic_condition: Set(r.chronic_condition),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VisitRecord {
    pub id: i32,
    pub student_id: i32,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub diagnosis: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub treatment: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::flag",
        serialize_with = "lenient::flag_as_int"
    )]
    pub parac_syrup: bool,
    #[serde(
        default,
        deserialize_with = "lenient::flag",
        serialize_with = "lenient::flag_as_int"
    )]
    pub parac_tab: bool,
    #[serde(
        default,
        deserialize_with = "lenient::flag",
        serialize_with = "lenient::flag_as_int"
    )]
    pub hyoscine: bool,
    #[serde(
        default,
        deserialize_with = "lenient::flag",
        serialize_with = "lenient::flag_as_int"
    )]
    pub referred: bool,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub referral_time: Option<String>,
    pub date_time: String,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub created_by_user_id: Option<i32>,
    #[serde(
        rename = "WhatsAppNotified",
        default,
        deserialize_with = "lenient::flag",
        serialize_with = "lenient::flag_as_int"
    )]
    pub whatsapp_notified: bool,
    #[serde(
        rename = "WhatsAppSentDate",
        default,
        deserialize_with = "lenient::opt_text"
    )]
    pub whatsapp_sent_date: Option<String>,
}

impl From<daily_visits::Model> for VisitRecord {
    fn from(m: daily_visits::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            diagnosis: m.diagnosis,
            treatment: m.treatment,
            parac_syrup: m.parac_syrup,
            parac_tab: m.parac_tab,
            hyoscine: m.hyoscine,
            referred: m.referred,
            referral_time: m.referral_time,
            date_time: m.date_time,
            created_by_user_id: m.created_by_user_id,
            whatsapp_notified: m.whatsapp_notified,
            whatsapp_sent_date: m.whatsapp_sent_date,
        }
    }
}

impl From<VisitRecord> for daily_visits::ActiveModel {
    fn from(r: VisitRecord) -> Self {
        Self {
            id: Set(r.id),
            student_id: Set(r.student_id),
            diagnosis: Set(r.diagnosis),
            treatment: Set(r.treatment),
            parac_syrup: Set(r.parac_syrup),
            parac_tab: Set(r.parac_tab),
            hyoscine: Set(r.hyoscine),
            referred: Set(r.referred),
            referral_time: Set(r.referral_time),
            date_time: Set(r.date_time),
            created_by_user_id: Set(r.created_by_user_id),
            whatsapp_notified: Set(r.whatsapp_notified),
            whatsapp_sent_date: Set(r.whatsapp_sent_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpecialCaseRecord {
    pub id: i32,
    pub student_id: i32,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub follow_up_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub follow_up_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub symptoms: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub services: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub recommendations: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::flag",
        serialize_with = "lenient::flag_as_int"
    )]
    pub referred: bool,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub created_by_user_id: Option<i32>,
    #[serde(
        rename = "WhatsAppNotified",
        default,
        deserialize_with = "lenient::flag",
        serialize_with = "lenient::flag_as_int"
    )]
    pub whatsapp_notified: bool,
}

impl From<special_follow_ups::Model> for SpecialCaseRecord {
    fn from(m: special_follow_ups::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            follow_up_date: m.follow_up_date,
            follow_up_type: m.follow_up_type,
            symptoms: m.symptoms,
            services: m.services,
            recommendations: m.recommendations,
            referred: m.referred,
            created_by_user_id: m.created_by_user_id,
            whatsapp_notified: m.whatsapp_notified,
        }
    }
}

impl From<SpecialCaseRecord> for special_follow_ups::ActiveModel {
    fn from(r: SpecialCaseRecord) -> Self {
        Self {
            id: Set(r.id),
            student_id: Set(r.student_id),
            follow_up_date: Set(r.follow_up_date),
            follow_up_type: Set(r.follow_up_type),
            symptoms: Set(r.symptoms),
            services: Set(r.services),
            recommendations: Set(r.recommendations),
            referred: Set(r.referred),
            created_by_user_id: Set(r.created_by_user_id),
            whatsapp_notified: Set(r.whatsapp_notified),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReferralRecord {
    pub id: i32,
    pub student_id: i32,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub destination: Option<String>,
    pub date_time: String,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub created_by_user_id: Option<i32>,
    #[serde(
        rename = "WhatsAppNotified",
        default,
        deserialize_with = "lenient::flag",
        serialize_with = "lenient::flag_as_int"
    )]
    pub whatsapp_notified: bool,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub history: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub referral_time: Option<String>,
}

impl From<referrals::Model> for ReferralRecord {
    fn from(m: referrals::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            reason: m.reason,
            destination: m.destination,
            date_time: m.date_time,
            created_by_user_id: m.created_by_user_id,
            whatsapp_notified: m.whatsapp_notified,
            age: m.age,
            gender: m.gender,
            history: m.history,
            referral_time: m.referral_time,
        }
    }
}

impl From<ReferralRecord> for referrals::ActiveModel {
    fn from(r: ReferralRecord) -> Self {
        Self {
            id: Set(r.id),
            student_id: Set(r.student_id),
            reason: Set(r.reason),
            destination: Set(r.destination),
            date_time: Set(r.date_time),
            created_by_user_id: Set(r.created_by_user_id),
            whatsapp_notified: Set(r.whatsapp_notified),
            age: Set(r.age),
            gender: Set(r.gender),
            history: Set(r.history),
            referral_time: Set(r.referral_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClinicAppointmentRecord {
    pub id: i32,
    pub student_id: i32,
    pub date: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub health_problem: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub clinic_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub created_by_user_id: Option<i32>,
    #[serde(
        rename = "WhatsAppNotified",
        default,
        deserialize_with = "lenient::flag",
        serialize_with = "lenient::flag_as_int"
    )]
    pub whatsapp_notified: bool,
}

impl From<clinic_appointments::Model> for ClinicAppointmentRecord {
    fn from(m: clinic_appointments::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            date: m.date,
            health_problem: m.health_problem,
            clinic_name: m.clinic_name,
            created_by_user_id: m.created_by_user_id,
            whatsapp_notified: m.whatsapp_notified,
        }
    }
}

impl From<ClinicAppointmentRecord> for clinic_appointments::ActiveModel {
    fn from(r: ClinicAppointmentRecord) -> Self {
        Self {
            id: Set(r.id),
            student_id: Set(r.student_id),
            date: Set(r.date),
            health_problem: Set(r.health_problem),
            clinic_name: Set(r.clinic_name),
            created_by_user_id: Set(r.created_by_user_id),
            whatsapp_notified: Set(r.whatsapp_notified),
        }
    }
}
