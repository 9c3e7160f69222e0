//! Dashboard HTML.

use crate::{
  app::AppState,
  http::logs::{ListParams, LOG_COLUMNS, compute_list_params},
  models::log::log_entry::LogEntry,
  util::html_escape,
};
use axum::{extract::Query, response::Html};

pub async fn ui_index(
  axum::extract::State(state): axum::extract::State<AppState>,
  Query(params): Query<ListParams>,
) -> Html<String> {
  let (limit, offset, like) = compute_list_params(&params);
  let sql = if like.is_some() {
    format!(
      "SELECT {LOG_COLUMNS} FROM log_entries WHERE message LIKE ? OR raw_message LIKE ? ORDER BY id DESC LIMIT ? OFFSET ?"
    )
  } else {
    format!("SELECT {LOG_COLUMNS} FROM log_entries ORDER BY id DESC LIMIT ? OFFSET ?")
  };
  let mut query = sqlx::query_as::<_, LogEntry>(&sql);
  if let Some(like_val) = like.as_ref() {
    query = query.bind(like_val).bind(like_val);
  }
  let entries: Vec<LogEntry> = query
    .bind(limit as i64)
    .bind(offset as i64)
    .fetch_all(&state.db)
    .await
    .unwrap_or_default();

  let mut rows = String::new();
  for e in entries.iter() {
    let program = e.process_name.as_deref().unwrap_or("-");
    rows.push_str(&format!(
      "<tr><td>{id}</td><td>{when}</td><td>{host}</td><td>{program}</td><td class=\"lvl-{lvl}\">{lvl}</td><td>{msg}</td></tr>",
      id = e.id,
      when = e.timestamp,
      host = html_escape(&e.device_ip),
      program = html_escape(program),
      lvl = e.log_level,
      msg = html_escape(&e.message)
    ));
  }
  let template = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>lognest</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 2rem; }
    h1 { margin: 0 0 1rem 0; }
    table { width: 100%; border-collapse: collapse; }
    th, td { border-bottom: 1px solid #ddd; text-align: left; padding: .5rem; }
    .actions { margin: 1rem 0; }
    code { background: #f6f8fa; padding: .2rem .4rem; border-radius: 4px; }
    .lvl-info, .lvl-notice, .lvl-debug { color:#1a7f37; }
    .lvl-warning { color:#9a6700; }
    .lvl-error, .lvl-critical, .lvl-alert, .lvl-emergency { color:#cf222e; }
  </style>
  <script>
    async function doSearch() {
      const q = (document.getElementById('q')).value;
      location.href = '/?q=' + encodeURIComponent(q);
    }
    async function loadCounts() {
      const res = await fetch('/health');
      const h = await res.json();
      document.getElementById('counts').textContent =
        h.devices + ' devices, ' + h.log_entries + ' log entries';
    }
    setInterval(loadCounts, 5000);
    window.addEventListener('load', loadCounts);
  </script>
  </head>
<body>
  <h1>lognest</h1>
  <p id="counts"></p>
  <div class="actions">
    <input id="q" placeholder="Search messages" onkeydown="if(event.key==='Enter')doSearch()" />
    <button onclick="doSearch()">Search</button>
  </div>
  <p>Inventory: <code>GET /devices</code> &nbsp; Entries: <code>GET /logs?device_ip=&amp;level=&amp;q=</code></p>
  <table>
    <thead><tr><th>ID</th><th>Timestamp</th><th>Device</th><th>Program</th><th>Level</th><th>Message</th></tr></thead>
    <tbody>__ROWS__</tbody>
  </table>
</body>
</html>
"#;
  Html(template.replace("__ROWS__", &rows))
}
