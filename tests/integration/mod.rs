// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod api_tests;
pub mod billing_log_test;
pub mod helpers;
pub mod price_plan_test;
pub mod wallet_ledger_test;
pub mod webhook_test;
