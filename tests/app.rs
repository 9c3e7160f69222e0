use axum::Router;
use futures::future::join_all;
use lognest::{app::AppState, db, http, ingest, parser};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::task::JoinHandle;

async fn mem_pool() -> SqlitePool {
    // One connection, so every handle sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite://:memory:")
        .await
        .expect("connect memory sqlite");
    db::run_migrations(&pool).await.expect("migrate");
    pool
}

async fn file_pool(dir: &tempfile::TempDir) -> SqlitePool {
    let db_url = format!("sqlite://{}/lognest.db", dir.path().display());
    let db_url = db::ensure_sqlite_path(&db_url);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .expect("connect file sqlite");
    db::run_migrations(&pool).await.expect("migrate");
    pool
}

async fn start_server(pool: SqlitePool) -> (String, JoinHandle<()>) {
    let state = AppState { db: pool };
    let app: Router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), handle)
}

#[tokio::test]
async fn ingest_and_list_end_to_end() {
    let pool = mem_pool().await;
    let raw = "<134>Dec 15 10:30:45 testhost sshd[1234]: Failed password for user admin";
    let parsed = parser::parse_message(raw);
    ingest::ingest(&pool, &parsed).await.expect("ingest");

    let (base, _srv) = start_server(pool).await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    assert!(res.status().is_success());
    let logs: serde_json::Value = res.json().await.unwrap();
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    let entry = &logs[0];
    assert_eq!(entry["device_ip"], "testhost");
    assert_eq!(entry["log_level"], "info");
    assert_eq!(entry["process_name"], "sshd");
    assert_eq!(entry["message"], "Failed password for user admin");
    assert_eq!(entry["raw_message"], raw);
    assert_eq!(entry["pushed_to_ai"], false);
    assert_eq!(entry["push_attempts"], 0);
    let sd: serde_json::Value =
        serde_json::from_str(entry["structured_data"].as_str().unwrap()).unwrap();
    assert_eq!(sd["pid"], 1234);
    assert_eq!(sd["priority"], 134);

    let res = client.get(format!("{}/devices", base)).send().await.unwrap();
    assert!(res.status().is_success());
    let devices: serde_json::Value = res.json().await.unwrap();
    let devices = devices.as_array().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["ip_address"], "testhost");
    assert_eq!(devices[0]["name"], "Device-testhost");
}

#[tokio::test]
async fn same_identity_reuses_the_device_row() {
    let pool = mem_pool().await;
    for raw in [
        "<134>Dec 15 10:30:45 router7 dropbear[100]: login attempt",
        "<131>Dec 15 10:31:02 router7 dropbear[101]: login failed",
    ] {
        let parsed = parser::parse_message(raw);
        ingest::ingest(&pool, &parsed).await.expect("ingest");
    }

    let devices: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM devices")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(devices, 1);
    let device_ids: Vec<i64> = sqlx::query_scalar("SELECT device_id FROM log_entries")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(device_ids.len(), 2);
    assert_eq!(device_ids[0], device_ids[1]);
}

#[tokio::test]
async fn numeric_hostname_lands_on_the_fallback_device() {
    let pool = mem_pool().await;
    // "23" is a parsing artifact, not an identity
    let parsed = parser::parse_message("<13>Dec 15 10:30:45 23 sshd[9]: who am I");
    assert_eq!(parsed.hostname.as_deref(), Some("23"));
    ingest::ingest(&pool, &parsed).await.expect("ingest");

    let identity: String = sqlx::query_scalar("SELECT ip_address FROM devices")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(identity, "unknown-device");
}

#[tokio::test]
async fn hostless_message_lands_on_the_fallback_device() {
    let pool = mem_pool().await;
    let raw = "Jun 20 18:07:02 miniupnpd[3227]: Invalid Callback in SUBSCRIBE <http://192.168.10.82:2869/upnp/eventing/jurkesulrl>";
    let parsed = parser::parse_message(raw);
    ingest::ingest(&pool, &parsed).await.expect("ingest");

    let (base, _srv) = start_server(pool).await;
    let client = reqwest::Client::new();
    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    let logs: serde_json::Value = res.json().await.unwrap();
    let entry = &logs.as_array().unwrap()[0];
    assert_eq!(entry["device_ip"], "unknown-device");
    assert_eq!(entry["process_name"], "miniupnpd");
    assert_eq!(entry["log_level"], "info");
    assert_eq!(entry["raw_message"], raw);
}

#[tokio::test]
async fn rfc5424_structured_data_round_trips() {
    let pool = mem_pool().await;
    let raw = r#"<165>1 2024-03-01T09:00:00Z edge01 appd 77 ID12 [exampleSDID@32473 iut="3"] boot complete"#;
    let parsed = parser::parse_message(raw);
    ingest::ingest(&pool, &parsed).await.expect("ingest");

    let stored: String =
        sqlx::query_scalar("SELECT structured_data FROM log_entries")
            .fetch_one(&pool)
            .await
            .unwrap();
    let sd: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(sd["sd"], r#"[exampleSDID@32473 iut="3"]"#);
    assert_eq!(sd["procid"], "77");
    assert_eq!(sd["msgid"], "ID12");
}

#[tokio::test]
async fn list_logs_filters_by_device_and_level() {
    let pool = mem_pool().await;
    for raw in [
        "<134>Dec 15 10:30:45 hosta nginx: request ok",
        "<131>Dec 15 10:30:46 hosta nginx: request failed",
        "<134>Dec 15 10:30:47 hostb cron: job started",
    ] {
        let parsed = parser::parse_message(raw);
        ingest::ingest(&pool, &parsed).await.expect("ingest");
    }

    let (base, _srv) = start_server(pool).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/logs?device_ip=hosta", base))
        .send()
        .await
        .unwrap();
    let logs: serde_json::Value = res.json().await.unwrap();
    assert_eq!(logs.as_array().unwrap().len(), 2);

    let res = client
        .get(format!("{}/logs?device_ip=hosta&level=error", base))
        .send()
        .await
        .unwrap();
    let logs: serde_json::Value = res.json().await.unwrap();
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["message"], "request failed");

    let res = client
        .get(format!("{}/logs?q=job", base))
        .send()
        .await
        .unwrap();
    let logs: serde_json::Value = res.json().await.unwrap();
    assert_eq!(logs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn health_reports_counts() {
    let pool = mem_pool().await;
    let parsed = parser::parse_message("<134>Dec 15 10:30:45 hosta nginx: up");
    ingest::ingest(&pool, &parsed).await.expect("ingest");

    let (base, _srv) = start_server(pool).await;
    let client = reqwest::Client::new();
    let res = client.get(format!("{}/health", base)).send().await.unwrap();
    assert!(res.status().is_success());
    let h: serde_json::Value = res.json().await.unwrap();
    assert_eq!(h["status"], "ok");
    assert_eq!(h["devices"], 1);
    assert_eq!(h["log_entries"], 1);
}

#[tokio::test]
async fn concurrent_ingestion_never_duplicates_devices() {
    let dir = tempfile::tempdir().unwrap();
    let pool = file_pool(&dir).await;

    // 1000 messages across 10 identities, with every identity's first
    // sighting raced by several tasks at once.
    let mut tasks = Vec::new();
    for task in 0..100 {
        let pool = pool.clone();
        tasks.push(tokio::spawn(async move {
            for i in 0..10 {
                let raw = format!(
                    "<134>Dec 15 10:30:45 host-{} app[1]: message {} from task {}",
                    task % 10,
                    i,
                    task
                );
                let parsed = parser::parse_message(&raw);
                ingest::ingest(&pool, &parsed).await.expect("ingest");
            }
        }));
    }
    for res in join_all(tasks).await {
        res.expect("task");
    }

    let devices: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM devices")
        .fetch_one(&pool)
        .await
        .unwrap();
    let entries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM log_entries")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(devices, 10);
    assert_eq!(entries, 1000);

    let distinct: i64 =
        sqlx::query_scalar("SELECT COUNT(DISTINCT device_id) FROM log_entries")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(distinct, 10);
}
