// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::config::settings::MetricsSettings;

/// 启动 Prometheus 导出器并注册计费相关计数器
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(
                "Invalid metrics address {}: {}. Metrics will not be exported.",
                settings.listen_addr, e
            );
            return;
        }
    };

    // 端口被占用时（开发/测试环境）只记录告警
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
}

fn describe_metrics() {
    describe_counter!(
        "billing_charges_total",
        "Conversations charged, labelled by message category"
    );
    describe_counter!(
        "billing_duplicate_charges_total",
        "Charge requests that matched an existing conversation"
    );
    describe_counter!(
        "wallet_transactions_total",
        "Wallet ledger entries posted, labelled by transaction type"
    );
    describe_counter!(
        "wallet_insufficient_funds_total",
        "Wallet postings rejected for insufficient funds"
    );
    describe_counter!(
        "webhook_events_total",
        "WhatsApp status events processed, labelled by outcome"
    );
}
