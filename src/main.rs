// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use wabill::application::context::AppContext;
use wabill::config::settings::Settings;
use wabill::infrastructure::database::connection;
use wabill::infrastructure::metrics;
use wabill::presentation::routes;
use wabill::utils::telemetry;

const DEV_SECRET: &str = "change-me-in-production";

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting wabill...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");
    if settings.auth.jwt_secret == DEV_SECRET || settings.webhook.app_secret == DEV_SECRET {
        warn!("Running with development secrets; set WABILL__AUTH__JWT_SECRET and WABILL__WEBHOOK__APP_SECRET");
    }

    // 3. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    info!("Running database migrations...");
    connection::run_migrations(db.as_ref()).await?;
    info!("Database migrations applied");

    // 4. Metrics exporter
    metrics::init_metrics(&settings.metrics);

    // 5. Wire services and routes
    let ctx = AppContext::new(db, &settings);
    let app = routes::build_router(ctx);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
