use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建家长-学生关联表
        manager
            .create_table(
                Table::create()
                    .table(ParentStudentLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParentStudentLinks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ParentStudentLinks::ParentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParentStudentLinks::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParentStudentLinks::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParentStudentLinks::Source)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParentStudentLinks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParentStudentLinks::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParentStudentLinks::RespondedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ParentStudentLinks::Table, ParentStudentLinks::ParentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ParentStudentLinks::Table, ParentStudentLinks::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建邀请码表
        manager
            .create_table(
                Table::create()
                    .table(InviteCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InviteCodes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InviteCodes::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InviteCodes::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(InviteCodes::ExpiresAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InviteCodes::UsedBy).big_integer().null())
                    .col(ColumnDef::new(InviteCodes::UsedAt).big_integer().null())
                    .col(
                        ColumnDef::new(InviteCodes::Revoked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(InviteCodes::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(InviteCodes::Table, InviteCodes::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一对家长与学生只保留一条关联
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_parent_student_links_pair")
                    .table(ParentStudentLinks::Table)
                    .col(ParentStudentLinks::ParentId)
                    .col(ParentStudentLinks::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_parent_student_links_student")
                    .table(ParentStudentLinks::Table)
                    .col(ParentStudentLinks::StudentId)
                    .col(ParentStudentLinks::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_invite_codes_student")
                    .table(InviteCodes::Table)
                    .col(InviteCodes::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InviteCodes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ParentStudentLinks::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ParentStudentLinks {
    #[sea_orm(iden = "parent_student_links")]
    Table,
    Id,
    ParentId,
    StudentId,
    Status,
    Source,
    CreatedAt,
    UpdatedAt,
    RespondedAt,
}

#[derive(DeriveIden)]
enum InviteCodes {
    #[sea_orm(iden = "invite_codes")]
    Table,
    Id,
    StudentId,
    Code,
    ExpiresAt,
    UsedBy,
    UsedAt,
    Revoked,
    CreatedAt,
}
