// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::utils::errors::DomainError;

/// 钱包交易类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Recharge,
    Debit,
    Refund,
    Adjustment,
    SuspenseDebit,
    SuspenseRefund,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransactionType::Recharge => write!(f, "RECHARGE"),
            TransactionType::Debit => write!(f, "DEBIT"),
            TransactionType::Refund => write!(f, "REFUND"),
            TransactionType::Adjustment => write!(f, "ADJUSTMENT"),
            TransactionType::SuspenseDebit => write!(f, "SUSPENSE_DEBIT"),
            TransactionType::SuspenseRefund => write!(f, "SUSPENSE_REFUND"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RECHARGE" => Ok(TransactionType::Recharge),
            "DEBIT" => Ok(TransactionType::Debit),
            "REFUND" => Ok(TransactionType::Refund),
            "ADJUSTMENT" => Ok(TransactionType::Adjustment),
            "SUSPENSE_DEBIT" => Ok(TransactionType::SuspenseDebit),
            "SUSPENSE_REFUND" => Ok(TransactionType::SuspenseRefund),
            _ => Err(()),
        }
    }
}

/// 钱包余额快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Balances {
    pub balance_paise: i64,
    pub suspense_balance_paise: i64,
}

impl Balances {
    pub fn new(balance_paise: i64, suspense_balance_paise: i64) -> Self {
        Self {
            balance_paise,
            suspense_balance_paise,
        }
    }

    /// 计算应用一笔交易后的余额
    ///
    /// - RECHARGE / REFUND: 主余额增加
    /// - DEBIT: 主余额减少
    /// - ADJUSTMENT: 主余额按带符号增量变化
    /// - SUSPENSE_DEBIT: 资金从主余额转入暂挂余额
    /// - SUSPENSE_REFUND: 资金从暂挂余额退回主余额
    ///
    /// 任一余额变为负数时返回 `InsufficientFunds`。
    pub fn apply(
        &self,
        transaction_type: TransactionType,
        amount_paise: i64,
    ) -> Result<Balances, DomainError> {
        validate_amount(transaction_type, amount_paise)?;

        let (balance, suspense) = match transaction_type {
            TransactionType::Recharge | TransactionType::Refund => (
                self.balance_paise.checked_add(amount_paise),
                Some(self.suspense_balance_paise),
            ),
            TransactionType::Debit => (
                self.balance_paise.checked_sub(amount_paise),
                Some(self.suspense_balance_paise),
            ),
            TransactionType::Adjustment => (
                self.balance_paise.checked_add(amount_paise),
                Some(self.suspense_balance_paise),
            ),
            TransactionType::SuspenseDebit => (
                self.balance_paise.checked_sub(amount_paise),
                self.suspense_balance_paise.checked_add(amount_paise),
            ),
            TransactionType::SuspenseRefund => (
                self.balance_paise.checked_add(amount_paise),
                self.suspense_balance_paise.checked_sub(amount_paise),
            ),
        };

        let (balance, suspense) = match (balance, suspense) {
            (Some(b), Some(s)) => (b, s),
            _ => {
                return Err(DomainError::Validation(
                    "Amount overflows the wallet balance".to_string(),
                ))
            }
        };

        if balance < 0 {
            return Err(DomainError::InsufficientFunds {
                available: self.balance_paise,
                required: amount_paise.abs(),
            });
        }
        if suspense < 0 {
            return Err(DomainError::InsufficientFunds {
                available: self.suspense_balance_paise,
                required: amount_paise,
            });
        }

        Ok(Balances::new(balance, suspense))
    }
}

fn validate_amount(transaction_type: TransactionType, amount_paise: i64) -> Result<(), DomainError> {
    match transaction_type {
        TransactionType::Adjustment if amount_paise == 0 => Err(DomainError::Validation(
            "Adjustment amount must be non-zero".to_string(),
        )),
        TransactionType::Adjustment => Ok(()),
        _ if amount_paise <= 0 => Err(DomainError::Validation(format!(
            "{} amount must be positive",
            transaction_type
        ))),
        _ => Ok(()),
    }
}

/// 用户钱包账户
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance_paise: i64,
    pub suspense_balance_paise: i64,
    pub currency: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl WalletAccount {
    pub fn balances(&self) -> Balances {
        Balances::new(self.balance_paise, self.suspense_balance_paise)
    }
}

/// 钱包流水，只追加
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub transaction_id: String,
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount_paise: i64,
    pub balance_after_paise: i64,
    pub suspense_balance_after_paise: i64,
    pub description: Option<String>,
    pub reference_id: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl WalletTransaction {
    /// 判断重放请求是否与已存储的交易一致
    pub fn matches(&self, request: &PostTransaction) -> bool {
        self.user_id == request.user_id
            && self.transaction_type == request.transaction_type
            && self.amount_paise == request.amount_paise
    }
}

/// 记账请求
#[derive(Debug, Clone)]
pub struct PostTransaction {
    /// 调用方提供的幂等键
    pub transaction_id: String,
    pub user_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount_paise: i64,
    pub description: Option<String>,
    pub reference_id: Option<String>,
}

/// 记账结果
#[derive(Debug, Clone)]
pub struct PostedTransaction {
    pub transaction: WalletTransaction,
    /// false 表示这是一次幂等重放
    pub created: bool,
}

/// 系统钱包类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemWalletType {
    Main,
    Reserve,
}

impl fmt::Display for SystemWalletType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SystemWalletType::Main => write!(f, "main"),
            SystemWalletType::Reserve => write!(f, "reserve"),
        }
    }
}

impl FromStr for SystemWalletType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(SystemWalletType::Main),
            "reserve" => Ok(SystemWalletType::Reserve),
            _ => Err(()),
        }
    }
}

/// 平台级系统钱包
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemWallet {
    pub wallet_type: SystemWalletType,
    pub balance_paise: i64,
    pub updated_at: DateTime<FixedOffset>,
}
