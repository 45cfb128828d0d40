//! Initial database migration.
//!
//! Creates the users, expenses, and budgets tables with their indexes and
//! the `updated_at` trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;
        db.execute_unprepared(BUDGETS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    currency VARCHAR(3) NOT NULL DEFAULT 'USD',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_email_lowercase CHECK (email = lower(email))
);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    amount NUMERIC(19, 4) NOT NULL,
    category VARCHAR(32) NOT NULL,
    description VARCHAR(200) NOT NULL,
    date TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_recurring BOOLEAN NOT NULL DEFAULT false,
    recurring_period VARCHAR(10),
    receipt_url TEXT,
    tags JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_expense_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_expense_category CHECK (category IN (
        'Food & Dining', 'Transportation', 'Entertainment', 'Shopping',
        'Bills & Utilities', 'Healthcare', 'Education', 'Travel',
        'Home & Garden', 'Personal Care', 'Gifts & Donations', 'Investment', 'Other'
    )),
    CONSTRAINT chk_recurring_period CHECK (
        recurring_period IS NULL OR recurring_period IN ('daily', 'weekly', 'monthly', 'yearly')
    ),
    CONSTRAINT chk_recurring_has_period CHECK (NOT is_recurring OR recurring_period IS NOT NULL)
);

CREATE INDEX idx_expenses_user_date ON expenses(user_id, date DESC);
CREATE INDEX idx_expenses_user_category_date ON expenses(user_id, category, date);
";

const BUDGETS_SQL: &str = r"
CREATE TABLE budgets (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category VARCHAR(32) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    period VARCHAR(10) NOT NULL DEFAULT 'monthly',
    start_date TIMESTAMPTZ NOT NULL,
    end_date TIMESTAMPTZ NOT NULL,
    spent NUMERIC(19, 4) NOT NULL DEFAULT 0,
    alert_threshold SMALLINT NOT NULL DEFAULT 80,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_budget_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_budget_spent_non_negative CHECK (spent >= 0),
    CONSTRAINT chk_budget_dates CHECK (end_date > start_date),
    CONSTRAINT chk_budget_threshold CHECK (alert_threshold BETWEEN 0 AND 100),
    CONSTRAINT chk_budget_period CHECK (period IN ('weekly', 'monthly', 'quarterly', 'yearly')),
    CONSTRAINT chk_budget_category CHECK (category IN (
        'Food & Dining', 'Transportation', 'Entertainment', 'Shopping',
        'Bills & Utilities', 'Healthcare', 'Education', 'Travel',
        'Home & Garden', 'Personal Care', 'Gifts & Donations', 'Investment', 'Other'
    ))
);

CREATE INDEX idx_budgets_user_category ON budgets(user_id, category);
CREATE INDEX idx_budgets_user_active ON budgets(user_id, is_active);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at() RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_expenses_updated_at BEFORE UPDATE ON expenses
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_budgets_updated_at BEFORE UPDATE ON budgets
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS budgets CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP FUNCTION IF EXISTS set_updated_at() CASCADE;
";
