use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{prelude::*, students};

/// Field values for inserting or replacing a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFields {
    pub name: String,
    pub grade: String,
    pub phone: Option<String>,
    pub is_special_case: bool,
    pub chronic_condition: Option<String>,
}

impl StudentFields {
    fn into_active_model(self) -> students::ActiveModel {
        students::ActiveModel {
            name: Set(self.name),
            grade: Set(self.grade),
            phone: Set(self.phone),
            is_special_case: Set(self.is_special_case),
            chronic_condition: Set(self.chronic_condition),
            ..Default::default()
        }
    }
}

pub struct StudentRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> StudentRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<students::Model>, DbErr> {
        Students::find()
            .order_by_asc(students::Column::Id)
            .all(self.conn)
            .await
    }

    pub async fn get(&self, id: i32) -> Result<Option<students::Model>, DbErr> {
        Students::find_by_id(id).one(self.conn).await
    }

    /// Exact, case-sensitive match.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<students::Model>, DbErr> {
        Students::find()
            .filter(students::Column::Name.eq(name))
            .one(self.conn)
            .await
    }

    pub async fn insert(&self, fields: StudentFields) -> Result<i32, DbErr> {
        let model = fields.into_active_model().insert(self.conn).await?;
        Ok(model.id)
    }

    /// Returns `false` when no student has this id.
    pub async fn update(&self, id: i32, fields: StudentFields) -> Result<bool, DbErr> {
        let result = Students::update_many()
            .set(fields.into_active_model())
            .filter(students::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = Students::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_all(&self) -> Result<u64, DbErr> {
        let result = Students::delete_many().exec(self.conn).await?;
        Ok(result.rows_affected)
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        Students::find().count(self.conn).await
    }
}
