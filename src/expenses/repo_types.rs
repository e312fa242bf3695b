use rust_decimal::Decimal;
use sqlx::FromRow;
use time::Date;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: Date,
}

/// The four fields a client may set; an update replaces all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFields {
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: Date,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub user_id: i64,
    pub fields: ExpenseFields,
}

impl Expense {
    pub fn apply(&mut self, fields: ExpenseFields) {
        self.amount = fields.amount;
        self.category = fields.category;
        self.description = fields.description;
        self.date = fields.date;
    }
}
