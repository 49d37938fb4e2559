use std::fmt;

/// Action tags written to `audit_logs.action_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    LoginSuccess,
    LoginFailedUserNotFound,
    LoginFailedWrongPassword,
    LoginLocked,
    LoginInactive,

    CreateUser,
    UpdateUser,
    ResetPassword,

    CreateStudent,
    UpdateStudent,
    DeleteStudent,
    DeleteAllStudents,
    BulkImportStudents,

    CreateVisit,
    DeleteVisit,
    CreateSpecialCase,
    DeleteSpecialCase,
    CreateReferral,
    DeleteReferral,
    CreateClinicAppointment,
    DeleteClinicAppointment,

    /// Guardian notified about a visit, follow-up or referral.
    WhatsappNotified,
    WhatsappClinicAppointment,

    UpdateSettings,
    BackupData,
    RestoreData,
    ResetNewYear,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoginSuccess => "LOGIN_SUCCESS",
            Self::LoginFailedUserNotFound => "LOGIN_FAILED_USER_NOT_FOUND",
            Self::LoginFailedWrongPassword => "LOGIN_FAILED_WRONG_PASSWORD",
            Self::LoginLocked => "LOGIN_LOCKED",
            Self::LoginInactive => "LOGIN_INACTIVE",
            Self::CreateUser => "CREATE_USER",
            Self::UpdateUser => "UPDATE_USER",
            Self::ResetPassword => "RESET_PASSWORD",
            Self::CreateStudent => "CREATE_STUDENT",
            Self::UpdateStudent => "UPDATE_STUDENT",
            Self::DeleteStudent => "DELETE_STUDENT",
            Self::DeleteAllStudents => "DELETE_ALL_STUDENTS",
            Self::BulkImportStudents => "BULK_IMPORT_STUDENTS",
            Self::CreateVisit => "CREATE_VISIT",
            Self::DeleteVisit => "DELETE_VISIT",
            Self::CreateSpecialCase => "CREATE_SPECIAL_CASE",
            Self::DeleteSpecialCase => "DELETE_SPECIAL_CASE",
            Self::CreateReferral => "CREATE_REFERRAL",
            Self::DeleteReferral => "DELETE_REFERRAL",
            Self::CreateClinicAppointment => "CREATE_CLINIC_APPOINTMENT",
            Self::DeleteClinicAppointment => "DELETE_CLINIC_APPOINTMENT",
            Self::WhatsappNotified => "WHATSAPP_NOTIFIED",
            Self::WhatsappClinicAppointment => "WHATSAPP_CLINIC_APPOINTMENT",
            Self::UpdateSettings => "UPDATE_SETTINGS",
            Self::BackupData => "BACKUP_DATA",
            Self::RestoreData => "RESTORE_DATA",
            Self::ResetNewYear => "RESET_NEW_YEAR",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table names recorded alongside audit entries.
pub mod tables {
    pub const USERS: &str = "Users";
    pub const STUDENTS: &str = "Students";
    pub const VISITS: &str = "DailyVisits";
    pub const SPECIAL_CASES: &str = "SpecialFollowUps";
    pub const REFERRALS: &str = "Referrals";
    pub const CLINIC_APPOINTMENTS: &str = "ClinicAppointments";
    pub const SETTINGS: &str = "Settings";
    pub const ALL: &str = "All";
}
