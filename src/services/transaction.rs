//! Transaction service

use serde::Deserialize;
use crate::models::Transaction;
use crate::utils::errors::Result;
use super::api::ApiClient;

#[derive(Deserialize)]
struct TransactionList {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

#[derive(Clone)]
pub struct TransactionService {
    api: ApiClient,
}

impl TransactionService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let list: Option<TransactionList> = self.api.get(&format!("/transactions/user/{}", user_id)).await?;
        Ok(list.map(|l| l.transactions).unwrap_or_default())
    }

    pub async fn get(&self, transaction_id: i64) -> Result<Transaction> {
        self.api.get(&format!("/transactions/{}", transaction_id)).await
    }
}
