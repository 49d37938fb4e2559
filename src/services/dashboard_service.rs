//! Read-only figures for the landing page.

use chrono::{Days, NaiveDate, Utc};
use sea_orm::DbErr;
use serde::Serialize;

use crate::db::{DayCount, Store};

/// Window of the visit histogram, today included.
const WEEK_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub school_name: String,
    pub visits_today: u64,
    pub special_cases: u64,
    pub referrals_today: u64,
    pub clinic_appointments_today: u64,
    /// Ascending by date; days without visits are omitted.
    pub weekly_stats: Vec<DayCount>,
}

pub struct DashboardService {
    store: Store,
    placeholder_name: String,
}

impl DashboardService {
    #[must_use]
    pub fn new(store: Store, placeholder_name: impl Into<String>) -> Self {
        Self {
            store,
            placeholder_name: placeholder_name.into(),
        }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, DbErr> {
        self.summary_for(Utc::now().date_naive()).await
    }

    pub async fn summary_for(&self, today: NaiveDate) -> Result<DashboardSummary, DbErr> {
        let day = today.format("%Y-%m-%d").to_string();
        let week_start = today
            .checked_sub_days(Days::new(WEEK_DAYS - 1))
            .unwrap_or(today)
            .format("%Y-%m-%d")
            .to_string();

        let school_name = self
            .store
            .settings()
            .get()
            .await?
            .and_then(|s| s.school_name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.placeholder_name.clone());

        Ok(DashboardSummary {
            school_name,
            visits_today: self.store.visits().count_on(&day).await?,
            special_cases: self.store.special_cases().count_on(&day).await?,
            referrals_today: self.store.referrals().count_on(&day).await?,
            clinic_appointments_today: self.store.clinic_appointments().count_on(&day).await?,
            weekly_stats: self.store.visits().daily_counts(&week_start, &day).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::referral::NewReferral;
    use crate::db::repositories::student::StudentFields;
    use crate::db::repositories::visit::NewVisit;
    use crate::db::test_support::temp_store;

    async fn add_visit(store: &Store, student_id: i32, date_time: &str) {
        store
            .visits()
            .insert(NewVisit {
                student_id,
                diagnosis: "Headache".to_string(),
                treatment: "Rest".to_string(),
                parac_syrup: false,
                parac_tab: false,
                hyoscine: false,
                referred: false,
                referral_time: None,
                date_time: date_time.to_string(),
                created_by_user_id: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn counts_today_regardless_of_time_of_day() {
        let store = temp_store().await;
        let student = store
            .students()
            .insert(StudentFields {
                name: "Zainab".to_string(),
                grade: "4".to_string(),
                phone: None,
                is_special_case: true,
                chronic_condition: Some("Diabetes".to_string()),
            })
            .await
            .unwrap();

        add_visit(&store, student, "2025-04-10 00:00:01").await;
        add_visit(&store, student, "2025-04-10 23:59:59").await;
        add_visit(&store, student, "2025-04-08 09:00:00").await;
        add_visit(&store, student, "2025-04-03 09:00:00").await;
        add_visit(&store, student, "2025-04-11 09:00:00").await;
        store
            .referrals()
            .insert(NewReferral {
                student_id: student,
                reason: "Eye test".to_string(),
                destination: "Health centre".to_string(),
                age: None,
                gender: None,
                history: None,
                referral_time: None,
                date_time: "2025-04-10 10:00:00".to_string(),
                created_by_user_id: None,
            })
            .await
            .unwrap();

        let service = DashboardService::new(store, "School");
        let today = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        let summary = service.summary_for(today).await.unwrap();

        assert_eq!(summary.school_name, "School");
        assert_eq!(summary.visits_today, 2);
        assert_eq!(summary.referrals_today, 1);
        assert_eq!(summary.special_cases, 0);
        assert_eq!(summary.clinic_appointments_today, 0);
        assert_eq!(
            summary.weekly_stats,
            vec![
                DayCount {
                    date: "2025-04-08".to_string(),
                    count: 1
                },
                DayCount {
                    date: "2025-04-10".to_string(),
                    count: 2
                },
            ]
        );
    }
}
