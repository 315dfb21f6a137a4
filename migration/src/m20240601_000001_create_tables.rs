use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(PlanId::Enum)
                    .values([PlanId::Starter, PlanId::Pro, PlanId::Yearly])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(ContentCategory::Enum)
                    .values([
                        ContentCategory::Posts,
                        ContentCategory::Images,
                        ContentCategory::Scripts,
                        ContentCategory::Agents,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Plan)
                            .enumeration(
                                PlanId::Enum,
                                [PlanId::Starter, PlanId::Pro, PlanId::Yearly],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Users::PostsUsed).big_integer().not_null())
                    .col(ColumnDef::new(Users::PostsTotal).big_integer().not_null())
                    .col(ColumnDef::new(Users::ImagesUsed).big_integer().not_null())
                    .col(ColumnDef::new(Users::ImagesTotal).big_integer().not_null())
                    .col(ColumnDef::new(Users::ScriptsUsed).big_integer().not_null())
                    .col(ColumnDef::new(Users::ScriptsTotal).big_integer().not_null())
                    .col(ColumnDef::new(Users::AgentsUsed).big_integer().not_null())
                    .col(ColumnDef::new(Users::AgentsTotal).big_integer().not_null())
                    .col(ColumnDef::new(Users::CurrentPeriodEnd).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::PendingOrderId).string())
                    .col(ColumnDef::new(Users::PendingPlan).enumeration(
                        PlanId::Enum,
                        [PlanId::Starter, PlanId::Pro, PlanId::Yearly],
                    ))
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // The webhook looks users up by order id.
        manager
            .create_index(
                Index::create()
                    .name("idx_users_pending_order_id")
                    .table(Users::Table)
                    .col(Users::PendingOrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Drafts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Drafts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Drafts::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Drafts::Category)
                            .enumeration(
                                ContentCategory::Enum,
                                [
                                    ContentCategory::Posts,
                                    ContentCategory::Images,
                                    ContentCategory::Scripts,
                                    ContentCategory::Agents,
                                ],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Drafts::Topic).string().not_null())
                    .col(ColumnDef::new(Drafts::Content).json_binary().not_null())
                    .col(ColumnDef::new(Drafts::CreatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_drafts_user_id")
                            .from(Drafts::Table, Drafts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_drafts_user_created")
                    .table(Drafts::Table)
                    .col(Drafts::UserId)
                    .col(Drafts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChainTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChainTransactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChainTransactions::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChainTransactions::Signature)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChainTransactions::ContentHash)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChainTransactions::Topic).string().not_null())
                    .col(ColumnDef::new(ChainTransactions::CreatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chain_transactions_user_id")
                            .from(ChainTransactions::Table, ChainTransactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chain_transactions_user_created")
                    .table(ChainTransactions::Table)
                    .col(ChainTransactions::UserId)
                    .col(ChainTransactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChainTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Drafts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(ContentCategory::Enum).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(PlanId::Enum).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum PlanId {
    #[sea_orm(iden = "plan_id")]
    Enum,
    #[sea_orm(iden = "starter")]
    Starter,
    #[sea_orm(iden = "pro")]
    Pro,
    #[sea_orm(iden = "yearly")]
    Yearly,
}

#[derive(DeriveIden)]
enum ContentCategory {
    #[sea_orm(iden = "content_category")]
    Enum,
    #[sea_orm(iden = "posts")]
    Posts,
    #[sea_orm(iden = "images")]
    Images,
    #[sea_orm(iden = "scripts")]
    Scripts,
    #[sea_orm(iden = "agents")]
    Agents,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    PasswordHash,
    Plan,
    PostsUsed,
    PostsTotal,
    ImagesUsed,
    ImagesTotal,
    ScriptsUsed,
    ScriptsTotal,
    AgentsUsed,
    AgentsTotal,
    CurrentPeriodEnd,
    PendingOrderId,
    PendingPlan,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Drafts {
    Table,
    Id,
    UserId,
    Category,
    Topic,
    Content,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ChainTransactions {
    Table,
    Id,
    UserId,
    Signature,
    ContentHash,
    Topic,
    CreatedAt,
}
